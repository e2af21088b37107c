use crate::{
    classifier::{ClassifierEvent, CorrectionClassifier},
    config::{is_report_due, BaseConfig},
    constants::MAX_FRAME_LEN,
    link::{ByteSource, CorrectionLink},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BaseStats {
    pub polls: u32,
    /// Polls that read nothing
    pub idle_polls: u32,
    pub bytes_read: u32,
    pub frames_sent: u32,
    pub send_errors: u32,
}

/// Outcome of one [BaseStation::poll].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BasePoll {
    /// Bytes read from the receiver, and offered to the link
    pub read: usize,
    pub sent: bool,
    pub event: Option<ClassifierEvent>,
}

/// Base role: whatever the receiver emits is relayed as is, one read burst per frame.
///
/// Bursts are not reassembled into RTCM3 messages: the receiver is expected to emit
/// corrections in bursts that fit a frame, and NMEA mixed in does no harm on the rover.
#[derive(Debug, Default, Clone)]
pub struct BaseStation {
    config: BaseConfig,
    classifier: CorrectionClassifier,
    stats: BaseStats,
}

impl BaseStation {
    pub fn new(config: BaseConfig) -> Self {
        Self {
            config,
            classifier: CorrectionClassifier::new(),
            stats: BaseStats::default(),
        }
    }

    pub fn stats(&self) -> BaseStats {
        self.stats
    }

    /// RTCM3 output seen from the receiver since start-up
    pub fn corrections_active(&self) -> bool {
        self.classifier.is_active()
    }

    pub fn classifier(&self) -> &CorrectionClassifier {
        &self.classifier
    }

    /// One read-classify-send cycle.
    ///
    /// A link failure is logged and counted, the burst is lost. Only a failing source
    /// is reported to the caller.
    pub fn poll<S, L>(&mut self, source: &mut S, link: &mut L) -> Result<BasePoll, S::Error>
    where
        S: ByteSource,
        L: CorrectionLink,
    {
        self.stats.polls = self.stats.polls.wrapping_add(1);

        let mut burst = [0u8; MAX_FRAME_LEN];
        let limit = core::cmp::min(link.max_frame_len(), MAX_FRAME_LEN);
        let read = source.read_bytes(&mut burst[..limit])?;
        // a misbehaving source cannot claim more than it was given
        let read = core::cmp::min(read, limit);

        if read == 0 {
            let idle = self.stats.idle_polls;
            self.stats.idle_polls = idle.wrapping_add(1);
            if is_report_due(idle, self.config.idle_report_interval) {
                log::info!("No GNSS data yet, survey-in in progress...");
            }
            return Ok(BasePoll::default());
        }

        let burst = &burst[..read];
        self.stats.bytes_read = self.stats.bytes_read.wrapping_add(read as u32);
        log::trace!("read {} bytes from GNSS: {:02X?}", read, burst);
        let event = self.classifier.observe(burst);

        let sent = match link.send(burst) {
            Ok(()) => {
                self.stats.frames_sent = self.stats.frames_sent.wrapping_add(1);
                true
            },
            Err(_) => {
                self.stats.send_errors = self.stats.send_errors.wrapping_add(1);
                log::warn!(
                    "failed to send {} correction bytes ({} send errors so far)",
                    read,
                    self.stats.send_errors
                );
                false
            },
        };

        Ok(BasePoll { read, sent, event })
    }
}
