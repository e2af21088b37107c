//! Proptest generators for GGA sentences, plus arbitrary byte soup for the
//! sentence locator and field extractor.

use proptest::prelude::*;
use rtk_relay::{
    decode_coordinates, decode_fix, extract_field, find_last_sentence, ChecksumStatus,
    FixQuality, Sentence,
};

/// One GGA as the receiver would print it, along with the values put in.
#[derive(Debug, Clone)]
struct GgaInput {
    latitude: f64,
    longitude: f64,
    quality: u8,
    talker: &'static str,
}

impl GgaInput {
    fn to_bytes(&self) -> Vec<u8> {
        let lat = self.latitude.abs();
        let lon = self.longitude.abs();
        let lat_deg = lat.trunc();
        let lon_deg = lon.trunc();
        let body = format!(
            "{}GGA,092725.00,{:02}{:08.5},{},{:03}{:08.5},{},{},12,0.80,499.6,M,48.0,M,,",
            self.talker,
            lat_deg as u32,
            (lat - lat_deg) * 60.0,
            if self.latitude < 0.0 { 'S' } else { 'N' },
            lon_deg as u32,
            (lon - lon_deg) * 60.0,
            if self.longitude < 0.0 { 'W' } else { 'E' },
            self.quality,
        );
        let checksum = body.bytes().fold(0u8, |acc, b| acc ^ b);
        format!("${}*{:02X}\r\n", body, checksum).into_bytes()
    }
}

fn gga_strategy() -> impl Strategy<Value = GgaInput> {
    (
        -89.9f64..89.9,
        -179.9f64..179.9,
        0u8..=9,
        prop_oneof![Just("GN"), Just("GP"), Just("GL")],
    )
        .prop_map(|(latitude, longitude, quality, talker)| GgaInput {
            latitude,
            longitude,
            quality,
            talker,
        })
}

fn expected_quality(code: u8) -> FixQuality {
    match code {
        1 => FixQuality::Gps,
        2 => FixQuality::Dgps,
        4 => FixQuality::RtkFixed,
        5 => FixQuality::RtkFloat,
        _ => FixQuality::Invalid,
    }
}

proptest! {
    #[test]
    fn test_gga_decodes_what_was_printed(input in gga_strategy()) {
        let raw = input.to_bytes();
        let sentence = Sentence::from_bytes(&raw).unwrap();
        prop_assert_eq!(sentence.checksum_status(), ChecksumStatus::Valid);
        prop_assert_eq!(decode_fix(&raw), expected_quality(input.quality));

        let pos = decode_coordinates(&raw).unwrap();
        prop_assert!((pos.latitude - input.latitude).abs() < 1e-4);
        prop_assert!((pos.longitude - input.longitude).abs() < 1e-4);
    }

    #[test]
    fn test_newest_gga_wins(inputs in prop::collection::vec(gga_strategy(), 1..8)) {
        let mut window = Vec::new();
        let mut last_start = 0;
        for input in &inputs {
            last_start = window.len();
            window.extend(input.to_bytes());
        }
        prop_assert_eq!(find_last_sentence(&window, b"GGA"), Some(last_start));
    }

    #[test]
    fn test_truncated_gga_is_never_complete(input in gga_strategy(), cut in 1usize..70) {
        let raw = input.to_bytes();
        let cut = cut.min(raw.len() - 2);
        prop_assert_eq!(find_last_sentence(&raw[..cut], b"GGA"), None);
    }

    #[test]
    fn test_extract_field_total(
        bytes in prop::collection::vec(any::<u8>(), 0..200),
        index in 0usize..40,
        max_len in 0usize..32,
    ) {
        let field = extract_field(&bytes, index, max_len);
        prop_assert!(field.len() < max_len.max(1));
        prop_assert!(!field.contains(','));
    }

    #[test]
    fn test_locator_on_noise(bytes in prop::collection::vec(any::<u8>(), 0..300)) {
        if let Some(offset) = find_last_sentence(&bytes, b"GGA") {
            prop_assert_eq!(bytes[offset], b'$');
            let sentence = Sentence::at(&bytes, offset).unwrap();
            let _ = decode_fix(sentence.as_bytes());
            let _ = sentence.checksum_status();
        }
    }
}
