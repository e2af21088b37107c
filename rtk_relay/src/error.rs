use core::fmt;

/// Reasons a transport payload cannot become a [CorrectionFrame](crate::CorrectionFrame)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameError {
    Empty,
    Oversized { len: usize, max: usize },
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameError::Empty => f.write_str("empty correction frame"),
            FrameError::Oversized { len, max } => write!(
                f,
                "correction frame too large, got {} bytes, transport max {}",
                len, max
            ),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for FrameError {}

/// Error that possible while validating a [RelayConfig](crate::RelayConfig)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    ZeroWindowCapacity,
    ReserveExceedsCapacity {
        reserve: usize,
        capacity: usize,
    },
    ZeroDiscardChunk,
    ZeroQueueCapacity,
    ZeroBatch,
    FrameLenOutOfRange {
        max_frame_len: usize,
        limit: usize,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroWindowCapacity => f.write_str("byte window capacity must be non zero"),
            ConfigError::ReserveExceedsCapacity { reserve, capacity } => write!(
                f,
                "reserve margin {} must be smaller than window capacity {}",
                reserve, capacity
            ),
            ConfigError::ZeroDiscardChunk => f.write_str("discard chunk must be non zero"),
            ConfigError::ZeroQueueCapacity => f.write_str("relay queue capacity must be non zero"),
            ConfigError::ZeroBatch => f.write_str("relay batch size must be non zero"),
            ConfigError::FrameLenOutOfRange {
                max_frame_len,
                limit,
            } => write!(
                f,
                "max frame length {} must be within 1..={}",
                max_frame_len, limit
            ),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}
