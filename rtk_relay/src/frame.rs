use crate::{
    constants::{MAX_FRAME_LEN, RTCM_SYNC_CHAR},
    error::FrameError,
};

/// One opaque correction payload as it travels over the wireless link.
///
/// The relay never looks inside: the only thing inspected is whether the
/// payload opens on an RTCM3 preamble.
#[derive(Clone, PartialEq, Eq)]
pub struct CorrectionFrame {
    data: heapless::Vec<u8, MAX_FRAME_LEN>,
}

impl CorrectionFrame {
    /// Copies `payload`, refusing empty payloads and anything above `max_len`
    /// (itself capped at [MAX_FRAME_LEN]).
    pub fn new(payload: &[u8], max_len: usize) -> Result<Self, FrameError> {
        let max = core::cmp::min(max_len, MAX_FRAME_LEN);
        if payload.is_empty() {
            return Err(FrameError::Empty);
        }
        if payload.len() > max {
            return Err(FrameError::Oversized {
                len: payload.len(),
                max,
            });
        }
        let data = heapless::Vec::from_slice(payload).map_err(|_| FrameError::Oversized {
            len: payload.len(),
            max,
        })?;
        Ok(Self { data })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Payload starts on an RTCM3 preamble
    pub fn starts_with_preamble(&self) -> bool {
        self.data.first() == Some(&RTCM_SYNC_CHAR)
    }
}

impl AsRef<[u8]> for CorrectionFrame {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl core::fmt::Debug for CorrectionFrame {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CorrectionFrame")
            .field("len", &self.len())
            .field("preamble", &self.starts_with_preamble())
            .finish()
    }
}
