pub const RTCM_SYNC_CHAR: u8 = 0xd3;

pub const NMEA_SYNC_CHAR: u8 = 0x24; // '$'
pub const NMEA_END_CHAR_1: u8 = 0x0d; // '\r' (<CR>)
pub const NMEA_END_CHAR_2: u8 = 0x0a; // '\n' (<LF>)
pub const NMEA_FIELD_SEPARATOR: u8 = 0x2c; // ','
pub const NMEA_CHECKSUM_CHAR: u8 = 0x2a; // '*'
pub(crate) const NMEA_TYPE_LEN: usize = 3;
pub(crate) const NMEA_MAX_TALKER_LEN: usize = 2;

/// Largest field kept by the extractor, terminator slot included.
pub const MAX_FIELD_LEN: usize = 20;
/// Upper bound on the fields tokenized out of one sentence.
pub const MAX_SENTENCE_FIELDS: usize = 24;
pub(crate) const MAX_DOP_LEN: usize = 10;

// GGA field indices, 0 being the "GNGGA" header itself
pub(crate) const GGA_TIME_FIELD: usize = 1;
pub(crate) const GGA_LAT_FIELD: usize = 2;
pub(crate) const GGA_LAT_HEMISPHERE_FIELD: usize = 3;
pub(crate) const GGA_LON_FIELD: usize = 4;
pub(crate) const GGA_LON_HEMISPHERE_FIELD: usize = 5;
pub(crate) const GGA_QUALITY_FIELD: usize = 6;
pub(crate) const GGA_SATELLITES_FIELD: usize = 7;
pub(crate) const GGA_HDOP_FIELD: usize = 8;
pub(crate) const GGA_ALTITUDE_FIELD: usize = 9;

// GSA field indices
pub(crate) const GSA_PDOP_FIELD: usize = 15;
pub(crate) const GSA_HDOP_FIELD: usize = 16;
pub(crate) const GSA_VDOP_FIELD: usize = 17;

pub const GGA: &[u8; 3] = b"GGA";
pub const GSA: &[u8; 3] = b"GSA";

pub const DEFAULT_WINDOW_CAPACITY: usize = 2048;
pub const DEFAULT_RESERVE_MARGIN: usize = 256;
pub const DEFAULT_DISCARD_CHUNK: usize = 1024;

/// Frame limit of the ESP-NOW style broadcast link.
pub const BROADCAST_MAX_FRAME_LEN: usize = 250;
/// Frame limit of the pub/sub broker transport.
pub const BROKER_MAX_FRAME_LEN: usize = 512;
/// Frame limit of the UDP datagram transport.
pub const DATAGRAM_MAX_FRAME_LEN: usize = 250;
/// Storage reserved per queued frame, the largest of all transports.
pub const MAX_FRAME_LEN: usize = BROKER_MAX_FRAME_LEN;

pub const DEFAULT_QUEUE_CAPACITY: usize = 10;
pub const DEFAULT_MAX_BATCH: usize = 4;
pub const DEFAULT_DROP_REPORT_INTERVAL: u32 = 20;
pub const DEFAULT_RECEIVE_REPORT_INTERVAL: u32 = 100;

pub const DEFAULT_ROVER_STATUS_INTERVAL: u32 = 100;
pub const DEFAULT_BASE_IDLE_REPORT_INTERVAL: u32 = 20;
