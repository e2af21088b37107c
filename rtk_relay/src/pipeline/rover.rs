use std::sync::Arc;

use crate::{
    config::{is_report_due, RelayConfig, RoverConfig},
    constants::GGA,
    decoder::{decode_dop, decode_fix_reading, decode_gga, DopReport, FixQuality, GgaFix},
    link::{ByteSink, ByteSource},
    relay_queue::RelayQueue,
    sentence::{find_last_sentence, ChecksumStatus, Sentence},
    tracker::{FixTracker, FixTransition},
    window::{ByteWindow, CompactionPolicy},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RoverStats {
    pub polls: u32,
    pub bytes_read: u32,
    /// Correction frames written to the receiver
    pub frames_forwarded: u32,
    pub bytes_forwarded: u32,
    pub forward_errors: u32,
    /// Bytes thrown away by window compaction
    pub bytes_discarded: u32,
    /// Complete GGA sentences with a bad checksum or no readable quality
    pub malformed_sentences: u32,
}

/// Outcome of one [Rover::poll].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RoverPoll {
    /// Correction frames handed to the receiver this poll
    pub forwarded: usize,
    /// Receiver bytes appended to the window
    pub read: usize,
    /// Newest GGA found after new bytes came in
    pub gga: Option<GgaFix>,
    pub transition: Option<FixTransition>,
}

/// Rover role: drains the relay queue into the receiver, then watches the receiver's
/// NMEA output for fix quality changes.
///
/// The queue is shared with whatever context receives frames from the link; the byte
/// window is owned by the rover.
pub struct Rover<'a> {
    window: ByteWindow<'a>,
    queue: Arc<RelayQueue>,
    tracker: FixTracker,
    config: RoverConfig,
    stats: RoverStats,
    /// Window offset past the newest GGA already looked at
    seen_until: usize,
}

impl<'a> Rover<'a> {
    /// `buffer` backs the NMEA window, its size is the window capacity.
    pub fn new(buffer: &'a mut [u8], queue: Arc<RelayQueue>, config: &RelayConfig) -> Self {
        Self {
            window: ByteWindow::new(buffer, CompactionPolicy::from(&config.window)),
            queue,
            tracker: FixTracker::new(),
            config: config.rover,
            stats: RoverStats::default(),
            seen_until: 0,
        }
    }

    pub fn queue(&self) -> &Arc<RelayQueue> {
        &self.queue
    }

    pub fn window(&self) -> &ByteWindow<'a> {
        &self.window
    }

    pub fn stats(&self) -> RoverStats {
        self.stats
    }

    /// Last fix quality read, `None` before the first GGA
    pub fn current_fix(&self) -> Option<FixQuality> {
        self.tracker.current()
    }

    pub fn tracker(&self) -> &FixTracker {
        &self.tracker
    }

    /// DOP of the newest GSA still in the window.
    pub fn dop(&self) -> DopReport<'_> {
        decode_dop(self.window.as_slice())
    }

    /// One forward-read-decode cycle.
    ///
    /// Corrections are forwarded before reading so a failing source never holds them
    /// back. Write failures are logged and counted, the frame is lost.
    pub fn poll<S, K>(&mut self, source: &mut S, sink: &mut K) -> Result<RoverPoll, S::Error>
    where
        S: ByteSource,
        K: ByteSink,
    {
        self.stats.polls = self.stats.polls.wrapping_add(1);
        let mut report = RoverPoll {
            forwarded: self.forward(sink),
            ..Default::default()
        };

        let read = self.window.fill_from(source)?;
        report.read = read;
        if read > 0 {
            self.stats.bytes_read = self.stats.bytes_read.wrapping_add(read as u32);
            let window = self.window.as_slice();
            let newest = find_last_sentence(window, GGA).and_then(|offset| {
                Sentence::at(window, offset).map(|sentence| (offset, sentence))
            });
            if let Some((offset, sentence)) = newest {
                let fresh = offset >= self.seen_until;
                self.seen_until = offset + sentence.as_bytes().len();
                let raw = sentence.as_bytes();
                if let ChecksumStatus::Invalid { expect, got } = sentence.checksum_status() {
                    if fresh {
                        self.stats.malformed_sentences =
                            self.stats.malformed_sentences.wrapping_add(1);
                        log::debug!(
                            "GGA checksum mismatch, expected {:02X} got {:02X}",
                            expect,
                            got
                        );
                    }
                } else {
                    report.gga = Some(decode_gga(raw));
                    match decode_fix_reading(raw) {
                        Some(quality) => report.transition = self.tracker.observe(quality),
                        None if fresh => {
                            self.stats.malformed_sentences =
                                self.stats.malformed_sentences.wrapping_add(1);
                            log::debug!("GGA without a readable fix quality");
                        },
                        None => {},
                    }
                }
            }
        }

        let discarded = self.window.compact_if_needed();
        self.stats.bytes_discarded = self.stats.bytes_discarded.wrapping_add(discarded as u32);
        self.seen_until = self.seen_until.saturating_sub(discarded);

        if is_report_due(self.stats.polls, self.config.status_interval) {
            if let Some(fix) = self.tracker.current() {
                log::info!("Current fix: {}", fix);
            }
        }

        Ok(report)
    }

    fn forward<K: ByteSink>(&mut self, sink: &mut K) -> usize {
        let frames = self.queue.dequeue_batch();
        let mut forwarded = 0;
        for frame in &frames {
            match sink.write_bytes(frame.as_bytes()) {
                Ok(()) => {
                    forwarded += 1;
                    self.stats.frames_forwarded = self.stats.frames_forwarded.wrapping_add(1);
                    self.stats.bytes_forwarded =
                        self.stats.bytes_forwarded.wrapping_add(frame.len() as u32);
                    log::debug!("forwarded {} correction bytes to GNSS", frame.len());
                },
                Err(_) => {
                    self.stats.forward_errors = self.stats.forward_errors.wrapping_add(1);
                    log::warn!(
                        "failed to forward {} correction bytes to GNSS ({} errors so far)",
                        frame.len(),
                        self.stats.forward_errors
                    );
                },
            }
        }
        forwarded
    }
}

impl core::fmt::Debug for Rover<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Rover")
            .field("window", &self.window)
            .field("queued", &self.queue.len())
            .field("fix", &self.tracker.current())
            .field("stats", &self.stats)
            .finish()
    }
}
