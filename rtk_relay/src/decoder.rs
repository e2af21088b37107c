//! GGA and GSA decoding: fix quality, coordinates, DOP.

use chrono::NaiveTime;

use crate::{
    constants::*,
    sentence::{extract_field, find_last_sentence, Sentence},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// GGA quality indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum FixQuality {
    #[default]
    Invalid = 0,
    Gps = 1,
    Dgps = 2,
    /// PPS fix. Defined by NMEA but never reported by RTK receivers; the decoder
    /// treats code 3 as Invalid.
    Pps = 3,
    /// Centimeter level
    RtkFixed = 4,
    /// Decimeter level
    RtkFloat = 5,
}

impl FixQuality {
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(FixQuality::Invalid),
            1 => Some(FixQuality::Gps),
            2 => Some(FixQuality::Dgps),
            3 => Some(FixQuality::Pps),
            4 => Some(FixQuality::RtkFixed),
            5 => Some(FixQuality::RtkFloat),
            _ => None,
        }
    }

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn is_rtk(self) -> bool {
        matches!(self, FixQuality::RtkFixed | FixQuality::RtkFloat)
    }

    pub fn name(self) -> &'static str {
        match self {
            FixQuality::Invalid => "Invalid",
            FixQuality::Gps => "GPS",
            FixQuality::Dgps => "DGPS",
            FixQuality::Pps => "PPS",
            FixQuality::RtkFixed => "RTK Fixed",
            FixQuality::RtkFloat => "RTK Float",
        }
    }
}

impl core::fmt::Display for FixQuality {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// Geodetic position in decimal degrees, south and west negative.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
}

/// Quality field as read, `None` when it is absent or not a single digit.
///
/// Codes 0, 1, 2, 4 and 5 are kept, any other digit reads as [FixQuality::Invalid].
pub fn decode_fix_reading(sentence: &[u8]) -> Option<FixQuality> {
    let field = extract_field(sentence, GGA_QUALITY_FIELD, MAX_FIELD_LEN);
    let digit = match field.as_bytes() {
        [d] if d.is_ascii_digit() => d - b'0',
        _ => return None,
    };
    let quality = match FixQuality::from_code(digit) {
        Some(FixQuality::Pps) | None => FixQuality::Invalid,
        Some(q) => q,
    };
    Some(quality)
}

/// Fix quality of a GGA sentence. Never fails: anything unreadable is
/// [FixQuality::Invalid]. Use [decode_fix_reading] to tell "quality 0" from
/// "no quality at all".
///
/// ```
/// use rtk_relay::{decode_fix, FixQuality};
///
/// let gga = b"$GNGGA,123519,4807.038,N,01131.000,E,4,08,0.9,545.4,M,46.9,M,,*5C";
/// assert_eq!(decode_fix(gga), FixQuality::RtkFixed);
/// ```
pub fn decode_fix(sentence: &[u8]) -> FixQuality {
    decode_fix_reading(sentence).unwrap_or(FixQuality::Invalid)
}

/// `DDMM.MMMMM` (or `DDDMM.MMMMM`) to decimal degrees.
fn parse_angle(value: &str, hemisphere: &str, negative: char) -> Option<f64> {
    if value.is_empty() {
        return None;
    }
    let raw: f64 = value.parse().ok()?;
    if !raw.is_finite() {
        return None;
    }
    let degrees = (raw / 100.0) as i64 as f64;
    let minutes = raw - degrees * 100.0;
    let angle = degrees + minutes / 60.0;
    if hemisphere.starts_with(negative) {
        Some(-angle)
    } else {
        Some(angle)
    }
}

/// Latitude and longitude of a GGA sentence, `None` ("no position") when either
/// is missing or not numeric.
///
/// ```
/// use rtk_relay::decode_coordinates;
///
/// let gga = b"$GNGGA,123519,4807.038,N,01131.000,E,4,08,0.9,545.4,M,46.9,M,,*5C";
/// let pos = decode_coordinates(gga).unwrap();
/// assert!((pos.latitude - 48.1173).abs() < 1e-4);
/// assert!((pos.longitude - 11.5167).abs() < 1e-4);
/// ```
pub fn decode_coordinates(sentence: &[u8]) -> Option<Position> {
    let latitude = parse_angle(
        extract_field(sentence, GGA_LAT_FIELD, MAX_FIELD_LEN),
        extract_field(sentence, GGA_LAT_HEMISPHERE_FIELD, MAX_FIELD_LEN),
        'S',
    )?;
    let longitude = parse_angle(
        extract_field(sentence, GGA_LON_FIELD, MAX_FIELD_LEN),
        extract_field(sentence, GGA_LON_HEMISPHERE_FIELD, MAX_FIELD_LEN),
        'W',
    )?;
    Some(Position {
        latitude,
        longitude,
    })
}

/// `hhmmss.ss` UTC time of day.
fn parse_utc_time(field: &str) -> Option<NaiveTime> {
    let digits = field.as_bytes();
    if digits.len() < 6 || !digits[..6].iter().all(u8::is_ascii_digit) {
        return None;
    }
    let two = |i: usize| u32::from(digits[i] - b'0') * 10 + u32::from(digits[i + 1] - b'0');
    let nanos = match field.get(6..) {
        None | Some("") => 0,
        Some(frac) => {
            let frac: f64 = frac.parse().ok()?;
            (frac * 1e9) as u32
        },
    };
    NaiveTime::from_hms_nano_opt(two(0), two(2), two(4), nanos)
}

/// Everything the rover reports out of one GGA sentence.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GgaFix {
    pub time: Option<NaiveTime>,
    pub position: Option<Position>,
    pub quality: FixQuality,
    pub satellites: Option<u8>,
    pub hdop: Option<f32>,
    /// Above mean sea level, meters
    pub altitude: Option<f64>,
}

/// Decodes a whole GGA sentence. Fields that are missing or malformed come out as
/// `None`, the quality as [FixQuality::Invalid].
pub fn decode_gga(sentence: &[u8]) -> GgaFix {
    let field = |index| extract_field(sentence, index, MAX_FIELD_LEN);
    GgaFix {
        time: parse_utc_time(field(GGA_TIME_FIELD)),
        position: decode_coordinates(sentence),
        quality: decode_fix(sentence),
        satellites: field(GGA_SATELLITES_FIELD).parse().ok(),
        hdop: field(GGA_HDOP_FIELD).parse().ok(),
        altitude: field(GGA_ALTITUDE_FIELD).parse().ok(),
    }
}

/// Dilution of precision as printed by the receiver, display only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DopReport<'a> {
    pub pdop: &'a str,
    pub hdop: &'a str,
    pub vdop: &'a str,
}

impl DopReport<'_> {
    pub fn is_empty(&self) -> bool {
        self.pdop.is_empty() && self.hdop.is_empty() && self.vdop.is_empty()
    }
}

/// PDOP, HDOP and VDOP of one GSA sentence.
pub fn decode_dop_fields(sentence: &[u8]) -> DopReport<'_> {
    DopReport {
        pdop: extract_field(sentence, GSA_PDOP_FIELD, MAX_DOP_LEN),
        hdop: extract_field(sentence, GSA_HDOP_FIELD, MAX_DOP_LEN),
        vdop: extract_field(sentence, GSA_VDOP_FIELD, MAX_DOP_LEN),
    }
}

/// DOP of the last complete GSA sentence in `window`. Never fails: no sentence, or
/// missing fields, give empty strings.
///
/// ```
/// use rtk_relay::decode_dop;
///
/// let dop = decode_dop(b"$GNGSA,A,3,04,05,,09,12,,,24,,,,,2.5,1.3,2.1*27\r\n");
/// assert_eq!((dop.pdop, dop.hdop, dop.vdop), ("2.5", "1.3", "2.1"));
/// ```
pub fn decode_dop(window: &[u8]) -> DopReport<'_> {
    match Sentence::find_last(window, GSA) {
        Some(sentence) => decode_dop_fields(sentence.as_bytes()),
        None => DopReport::default(),
    }
}

/// Fix quality of the newest complete GGA sentence in `window`; `None` if there is
/// none, which is distinct from a sentence reporting quality 0.
pub fn latest_fix(window: &[u8]) -> Option<FixQuality> {
    let offset = find_last_sentence(window, GGA)?;
    let sentence = Sentence::at(window, offset)?;
    Some(decode_fix(sentence.as_bytes()))
}

#[cfg(test)]
mod test {
    use super::*;

    const GGA_RTK: &[u8] = b"$GNGGA,123519,4807.038,N,01131.000,E,4,08,0.9,545.4,M,46.9,M,,*5C\r\n";
    const GGA_SOUTH_WEST: &[u8] =
        b"$GNGGA,092726.00,3351.50000,S,15112.25000,W,2,10,0.80,12.3,M,-20.1,M,,*51\r\n";

    #[test]
    fn reference_gga_decodes() {
        assert_eq!(decode_fix(GGA_RTK), FixQuality::RtkFixed);
        let pos = decode_coordinates(GGA_RTK).unwrap();
        assert!((pos.latitude - 48.1173).abs() < 1e-4);
        assert!((pos.longitude - 11.5167).abs() < 1e-4);
    }

    #[test]
    fn fix_codes() {
        let with_quality = |q: &str| {
            let mut s = b"$GNGGA,1,4807.038,N,01131.000,E,".to_vec();
            s.extend_from_slice(q.as_bytes());
            s.extend_from_slice(b",08*00");
            s
        };
        assert_eq!(decode_fix(&with_quality("0")), FixQuality::Invalid);
        assert_eq!(decode_fix(&with_quality("1")), FixQuality::Gps);
        assert_eq!(decode_fix(&with_quality("2")), FixQuality::Dgps);
        assert_eq!(decode_fix(&with_quality("3")), FixQuality::Invalid);
        assert_eq!(decode_fix(&with_quality("4")), FixQuality::RtkFixed);
        assert_eq!(decode_fix(&with_quality("5")), FixQuality::RtkFloat);
        assert_eq!(decode_fix(&with_quality("6")), FixQuality::Invalid);
        assert_eq!(decode_fix(&with_quality("x")), FixQuality::Invalid);
        assert_eq!(decode_fix(&with_quality("")), FixQuality::Invalid);
        assert_eq!(decode_fix(&with_quality("45")), FixQuality::Invalid);
    }

    #[test]
    fn fix_reading_tells_zero_from_unknown() {
        assert_eq!(
            decode_fix_reading(b"$GNGGA,1,,,,,0,00*00"),
            Some(FixQuality::Invalid)
        );
        assert_eq!(decode_fix_reading(b"$GNGGA,1,,,,,x,00*00"), None);
        assert_eq!(decode_fix_reading(b"$GNGGA,1,,,,,,00*00"), None);
        assert_eq!(decode_fix_reading(b"$GNGGA,1,,,"), None);
    }

    #[test]
    fn coordinates_negated_south_west() {
        let pos = decode_coordinates(GGA_SOUTH_WEST).unwrap();
        assert!((pos.latitude + 33.858333).abs() < 1e-6);
        assert!((pos.longitude + 151.204166).abs() < 1e-5);
    }

    #[test]
    fn coordinates_missing_is_no_position() {
        assert_eq!(decode_coordinates(b"$GNGGA,123519,,,,,0,00,,,M,,M,,*00"), None);
        assert_eq!(decode_coordinates(b"$GNGGA,123519,4807.038,N,,,0*00"), None);
        assert_eq!(decode_coordinates(b"$GNGGA,123519,48x7.038,N,01131.000,E*00"), None);
        assert_eq!(decode_coordinates(b"$GNGGA"), None);
    }

    #[test]
    fn gga_full_decode() {
        let fix = decode_gga(GGA_RTK);
        assert_eq!(fix.quality, FixQuality::RtkFixed);
        assert_eq!(fix.time, NaiveTime::from_hms_opt(12, 35, 19));
        assert_eq!(fix.satellites, Some(8));
        assert_eq!(fix.hdop, Some(0.9));
        assert_eq!(fix.altitude, Some(545.4));
        assert!(fix.position.is_some());
    }

    #[test]
    fn gga_fractional_time() {
        let fix = decode_gga(GGA_SOUTH_WEST);
        assert_eq!(fix.time, NaiveTime::from_hms_milli_opt(9, 27, 26, 0));
        assert_eq!(fix.quality, FixQuality::Dgps);
        assert_eq!(fix.altitude, Some(12.3));

        let fix = decode_gga(b"$GNGGA,092726.50,,,,,0,00*00");
        assert_eq!(fix.time, NaiveTime::from_hms_milli_opt(9, 27, 26, 500));
        assert_eq!(fix.position, None);
    }

    #[test]
    fn gga_garbage_never_panics() {
        let fix = decode_gga(b"$GNGGA,99xx99,a,b,c,d,e,f,g,h*00");
        assert_eq!(fix, GgaFix::default());
    }

    #[test]
    fn dop_from_window() {
        let mut window = GGA_RTK.to_vec();
        window.extend_from_slice(b"$GNGSA,A,3,04,05,,09,12,,,24,,,,,2.5,1.3,2.1*27\r\n");
        let dop = decode_dop(&window);
        assert_eq!(dop.pdop, "2.5");
        assert_eq!(dop.hdop, "1.3");
        assert_eq!(dop.vdop, "2.1");
    }

    #[test]
    fn dop_absent() {
        assert!(decode_dop(GGA_RTK).is_empty());
        let dop = decode_dop(b"$GNGSA,A,3,04,05\r\n");
        assert!(dop.is_empty());
    }

    #[test]
    fn dop_nmea41_system_id() {
        let dop = decode_dop_fields(b"$GNGSA,A,3,80,71,73,79,69,,,,,,,,1.83,1.09,1.47,4*33");
        assert_eq!((dop.pdop, dop.hdop, dop.vdop), ("1.83", "1.09", "1.47"));
    }

    #[test]
    fn latest_fix_in_window() {
        assert_eq!(latest_fix(b"no sentences here"), None);
        let mut window = GGA_SOUTH_WEST.to_vec();
        window.extend_from_slice(GGA_RTK);
        assert_eq!(latest_fix(&window), Some(FixQuality::RtkFixed));
    }

    #[test]
    fn quality_names() {
        assert_eq!(FixQuality::RtkFixed.to_string(), "RTK Fixed");
        assert_eq!(FixQuality::from_code(5), Some(FixQuality::RtkFloat));
        assert_eq!(FixQuality::from_code(9), None);
        assert_eq!(FixQuality::Dgps.code(), 2);
        assert!(FixQuality::RtkFloat.is_rtk());
        assert!(!FixQuality::Dgps.is_rtk());
    }
}
