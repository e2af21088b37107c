//! Locating NMEA sentences inside a raw byte window and splitting them into
//! fields, without ever reading past the bytes handed in.

use crate::constants::{
    MAX_FIELD_LEN, MAX_SENTENCE_FIELDS, NMEA_CHECKSUM_CHAR, NMEA_END_CHAR_1, NMEA_END_CHAR_2,
    NMEA_FIELD_SEPARATOR, NMEA_MAX_TALKER_LEN, NMEA_SYNC_CHAR, NMEA_TYPE_LEN,
};

#[inline]
fn is_line_end(b: u8) -> bool {
    b == NMEA_END_CHAR_1 || b == NMEA_END_CHAR_2
}

// Anything that closes the data part of a sentence.
#[inline]
fn is_data_end(b: u8) -> bool {
    is_line_end(b) || b == NMEA_CHECKSUM_CHAR || b == NMEA_SYNC_CHAR
}

#[inline]
fn is_talker_char(b: u8) -> bool {
    b.is_ascii_alphanumeric()
}

/// Offset of the line terminator closing the sentence that starts at `offset`.
/// `None` if the window ends first, or if another `$` shows up before it (the
/// sentence was cut short).
fn sentence_end(window: &[u8], offset: usize) -> Option<usize> {
    let body = window.get(offset + 1..)?;
    for (i, &b) in body.iter().enumerate() {
        if is_line_end(b) {
            return Some(offset + 1 + i);
        }
        if b == NMEA_SYNC_CHAR {
            return None;
        }
    }
    None
}

/// Does a `$` + talker (1 or 2 chars) + `kind` header start at `offset`?
fn header_matches(window: &[u8], offset: usize, kind: &[u8; NMEA_TYPE_LEN]) -> bool {
    if window.get(offset) != Some(&NMEA_SYNC_CHAR) {
        return false;
    }
    (1..=NMEA_MAX_TALKER_LEN).any(|talker_len| {
        let kind_start = offset + 1 + talker_len;
        let kind_end = kind_start + NMEA_TYPE_LEN;
        let talker_ok = window
            .get(offset + 1..kind_start)
            .is_some_and(|talker| talker.iter().all(|&b| is_talker_char(b)));
        let kind_ok = window.get(kind_start..kind_end) == Some(&kind[..]);
        let closed = matches!(
            window.get(kind_end),
            Some(&NMEA_FIELD_SEPARATOR) | Some(&NMEA_CHECKSUM_CHAR)
        );
        talker_ok && kind_ok && closed
    })
}

/// Offset of the most recent complete sentence of type `kind` (for example
/// `b"GGA"`) in `window`. Complete means its line terminator is inside the window.
///
/// The newest match wins: older sentences carry values that were already reported.
///
/// ```
/// use rtk_relay::find_last_sentence;
///
/// let window = b"$GPGGA,1*00\r\n$GNGGA,2*00\r\n$GNGGA,3";
/// assert_eq!(find_last_sentence(window, b"GGA"), Some(13));
/// assert_eq!(find_last_sentence(window, b"GSA"), None);
/// ```
pub fn find_last_sentence(window: &[u8], kind: &[u8; NMEA_TYPE_LEN]) -> Option<usize> {
    (0..window.len())
        .rev()
        .filter(|&i| window[i] == NMEA_SYNC_CHAR)
        .find(|&i| header_matches(window, i, kind) && sentence_end(window, i).is_some())
}

/// Field `index` of `sentence`, 0 being the header (`GNGGA`), 1 the text after the
/// first comma, and so on.
///
/// The field ends on `,`, `*`, a line terminator or the end of the slice, and is cut to
/// `max_len - 1` bytes. A field that is missing, empty, past the end of a truncated
/// sentence or not valid text comes back as `""`.
///
/// ```
/// use rtk_relay::extract_field;
///
/// let gga = b"$GNGGA,123519,4807.038,N,01131.000,E,4,08*5C";
/// assert_eq!(extract_field(gga, 6, 20), "4");
/// assert_eq!(extract_field(gga, 2, 4), "480");
/// assert_eq!(extract_field(gga, 12, 20), "");
/// ```
pub fn extract_field(sentence: &[u8], index: usize, max_len: usize) -> &str {
    if max_len == 0 {
        return "";
    }
    let mut start = usize::from(sentence.first() == Some(&NMEA_SYNC_CHAR));
    for _ in 0..index {
        let rest = &sentence[start..];
        match rest
            .iter()
            .position(|&b| b == NMEA_FIELD_SEPARATOR || is_data_end(b))
        {
            Some(pos) if rest[pos] == NMEA_FIELD_SEPARATOR => start += pos + 1,
            // sentence ends before the requested field
            _ => return "",
        }
    }

    let rest = &sentence[start..];
    let end = rest
        .iter()
        .position(|&b| b == NMEA_FIELD_SEPARATOR || is_data_end(b))
        .unwrap_or(rest.len());
    let field = &rest[..core::cmp::min(end, max_len - 1)];
    match core::str::from_utf8(field) {
        Ok(s) => s,
        // keep what decodes, a cut may have split a multi-byte char
        Err(e) => core::str::from_utf8(&field[..e.valid_up_to()]).unwrap_or_default(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChecksumStatus {
    Valid,
    Invalid { expect: u8, got: u8 },
    /// No `*hh` suffix, or not hexadecimal
    Missing,
}

/// Borrowed view of one sentence, from its `$` up to (not including) the line
/// terminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sentence<'a> {
    raw: &'a [u8],
}

impl<'a> Sentence<'a> {
    /// View of the complete sentence starting at `offset`, `None` if there is no `$`
    /// there or its terminator is not in the window yet.
    pub fn at(window: &'a [u8], offset: usize) -> Option<Self> {
        if window.get(offset) != Some(&NMEA_SYNC_CHAR) {
            return None;
        }
        let end = sentence_end(window, offset)?;
        Some(Self {
            raw: &window[offset..end],
        })
    }

    /// Most recent complete sentence of type `kind` in `window`.
    pub fn find_last(window: &'a [u8], kind: &[u8; NMEA_TYPE_LEN]) -> Option<Self> {
        find_last_sentence(window, kind).and_then(|offset| Self::at(window, offset))
    }

    /// Wraps a single sentence, terminated or not. Anything after the first line
    /// terminator is ignored.
    pub fn from_bytes(bytes: &'a [u8]) -> Option<Self> {
        if bytes.first() != Some(&NMEA_SYNC_CHAR) {
            return None;
        }
        let end = bytes
            .iter()
            .position(|&b| is_line_end(b))
            .unwrap_or(bytes.len());
        Some(Self { raw: &bytes[..end] })
    }

    pub fn as_bytes(&self) -> &'a [u8] {
        self.raw
    }

    /// Talker and type, `GNGGA` for `$GNGGA,...`
    pub fn header(&self) -> &'a str {
        extract_field(self.raw, 0, self.raw.len() + 1)
    }

    pub fn talker(&self) -> &'a str {
        let header = self.header();
        header.get(..header.len().saturating_sub(NMEA_TYPE_LEN)).unwrap_or_default()
    }

    pub fn kind(&self) -> &'a str {
        let header = self.header();
        header.get(header.len().saturating_sub(NMEA_TYPE_LEN)..).unwrap_or_default()
    }

    /// See [extract_field], bounded to [MAX_FIELD_LEN].
    pub fn field(&self, index: usize) -> &'a str {
        extract_field(self.raw, index, MAX_FIELD_LEN)
    }

    /// Fields in the data part, header included.
    pub fn field_count(&self) -> usize {
        let data_end = self
            .raw
            .iter()
            .skip(1)
            .position(|&b| is_data_end(b))
            .map_or(self.raw.len(), |pos| pos + 1);
        1 + self.raw[..data_end]
            .iter()
            .filter(|&&b| b == NMEA_FIELD_SEPARATOR)
            .count()
    }

    /// Splits the sentence into at most [MAX_SENTENCE_FIELDS] bounded fields.
    pub fn record(&self) -> SentenceRecord<'a> {
        let mut fields = heapless::Vec::new();
        for index in 0..core::cmp::min(self.field_count(), MAX_SENTENCE_FIELDS) {
            if fields.push(self.field(index)).is_err() {
                break;
            }
        }
        SentenceRecord {
            talker: self.talker(),
            kind: self.kind(),
            fields,
        }
    }

    /// XOR of everything between `$` and `*`, compared against the hex suffix.
    pub fn checksum_status(&self) -> ChecksumStatus {
        let Some(star) = self.raw.iter().position(|&b| b == NMEA_CHECKSUM_CHAR) else {
            return ChecksumStatus::Missing;
        };
        let expect = self
            .raw
            .get(star + 1..star + 3)
            .and_then(|hex| core::str::from_utf8(hex).ok())
            .and_then(|hex| u8::from_str_radix(hex, 16).ok());
        let Some(expect) = expect else {
            return ChecksumStatus::Missing;
        };
        let got = self.raw[1..star].iter().fold(0u8, |acc, b| acc ^ b);
        if got == expect {
            ChecksumStatus::Valid
        } else {
            ChecksumStatus::Invalid { expect, got }
        }
    }
}

/// Tokenized sentence. Lives only as long as the window it was cut from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentenceRecord<'a> {
    pub talker: &'a str,
    pub kind: &'a str,
    /// Field 0 is the header, like [Sentence::field]
    pub fields: heapless::Vec<&'a str, MAX_SENTENCE_FIELDS>,
}

impl<'a> SentenceRecord<'a> {
    /// Field `index`, `""` if the sentence had fewer fields.
    pub fn get(&self, index: usize) -> &'a str {
        self.fields.get(index).copied().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
