use std::{
    collections::VecDeque,
    sync::{
        atomic::{AtomicU32, Ordering},
        Mutex, MutexGuard, PoisonError,
    },
};

use crate::{
    config::{is_report_due, QueueConfig},
    error::FrameError,
    frame::CorrectionFrame,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Snapshot of the [RelayQueue] counters, for diagnostics only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RelayStats {
    /// Payloads handed to the queue, accepted or not
    pub received: u32,
    pub enqueued: u32,
    pub dequeued: u32,
    /// Frames refused because the queue was full
    pub dropped_full: u32,
    pub dropped_oversized: u32,
    pub dropped_empty: u32,
}

impl RelayStats {
    pub fn dropped(&self) -> u32 {
        self.dropped_full
            .wrapping_add(self.dropped_oversized)
            .wrapping_add(self.dropped_empty)
    }
}

/// Bounded FIFO between the wireless receive context and the GNSS forward loop.
///
/// One producer calls [RelayQueue::offer] / [RelayQueue::enqueue], one consumer calls
/// [RelayQueue::dequeue_all]; both only need `&self`, so the queue is shared
/// through an `Arc` and synchronizes internally.
///
/// When full, the queue drops the *newest* frame: the one being offered is discarded and
/// counted, queued frames are left untouched.
///
/// ```
/// use rtk_relay::{QueueConfig, RelayQueue};
///
/// let queue = RelayQueue::new(QueueConfig::default());
/// assert!(queue.offer(&[0xd3, 0x00, 0x13]));
/// let frames = queue.dequeue_all(4);
/// assert_eq!(frames.len(), 1);
/// assert_eq!(frames[0].as_bytes(), &[0xd3, 0x00, 0x13]);
/// ```
#[derive(Debug)]
pub struct RelayQueue {
    frames: Mutex<VecDeque<CorrectionFrame>>,
    config: QueueConfig,
    received: AtomicU32,
    enqueued: AtomicU32,
    dequeued: AtomicU32,
    dropped_full: AtomicU32,
    dropped_oversized: AtomicU32,
    dropped_empty: AtomicU32,
}

impl RelayQueue {
    pub fn new(config: QueueConfig) -> Self {
        // a zero capacity queue would drop everything
        let capacity = config.capacity.max(1);
        Self {
            frames: Mutex::new(VecDeque::with_capacity(capacity)),
            config: QueueConfig {
                capacity,
                max_batch: config.max_batch.max(1),
                ..config
            },
            received: AtomicU32::new(0),
            enqueued: AtomicU32::new(0),
            dequeued: AtomicU32::new(0),
            dropped_full: AtomicU32::new(0),
            dropped_oversized: AtomicU32::new(0),
            dropped_empty: AtomicU32::new(0),
        }
    }

    pub fn config(&self) -> &QueueConfig {
        &self.config
    }

    pub fn capacity(&self) -> usize {
        self.config.capacity
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // A panicking peer cannot leave a frame half written, so a poisoned lock is
    // still a consistent queue.
    fn lock(&self) -> MutexGuard<'_, VecDeque<CorrectionFrame>> {
        self.frames.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Producer side, raw transport bytes. Empty and oversized payloads are
    /// discarded at the boundary and counted. Returns whether the frame was queued.
    pub fn offer(&self, payload: &[u8]) -> bool {
        match CorrectionFrame::new(payload, self.config.max_frame_len) {
            Ok(frame) => self.enqueue(frame),
            Err(e) => {
                let received = self.received.fetch_add(1, Ordering::Relaxed).wrapping_add(1);
                match e {
                    FrameError::Empty => {
                        self.dropped_empty.fetch_add(1, Ordering::Relaxed);
                    },
                    FrameError::Oversized { .. } => {
                        self.dropped_oversized.fetch_add(1, Ordering::Relaxed);
                    },
                }
                log::debug!("discarding inbound payload #{}: {}", received, e);
                false
            },
        }
    }

    /// Producer side. Fails when the queue is full, in which case `frame` is
    /// dropped and counted.
    pub fn enqueue(&self, frame: CorrectionFrame) -> bool {
        let received = self.received.fetch_add(1, Ordering::Relaxed).wrapping_add(1);
        let accepted = {
            let mut frames = self.lock();
            if frames.len() >= self.config.capacity {
                false
            } else {
                frames.push_back(frame);
                true
            }
        };

        if !accepted {
            let dropped = self.dropped_full.fetch_add(1, Ordering::Relaxed).wrapping_add(1);
            if is_report_due(dropped, self.config.drop_report_interval) {
                log::warn!("Dropped {} correction frames (queue full)", dropped);
            }
            return false;
        }

        self.enqueued.fetch_add(1, Ordering::Relaxed);
        if is_report_due(received, self.config.receive_report_interval) {
            log::info!(
                "received {} correction frames (dropped: {})",
                received,
                self.stats().dropped()
            );
        }
        true
    }

    /// Consumer side. Pops up to `max_batch` frames in arrival order; anything left
    /// waits for the next call.
    pub fn dequeue_all(&self, max_batch: usize) -> Vec<CorrectionFrame> {
        let batch: Vec<CorrectionFrame> = {
            let mut frames = self.lock();
            let count = core::cmp::min(max_batch, frames.len());
            frames.drain(..count).collect()
        };
        self.dequeued
            .fetch_add(batch.len() as u32, Ordering::Relaxed);
        batch
    }

    /// [RelayQueue::dequeue_all] with the configured batch size.
    pub fn dequeue_batch(&self) -> Vec<CorrectionFrame> {
        self.dequeue_all(self.config.max_batch)
    }

    pub fn stats(&self) -> RelayStats {
        RelayStats {
            received: self.received.load(Ordering::Relaxed),
            enqueued: self.enqueued.load(Ordering::Relaxed),
            dequeued: self.dequeued.load(Ordering::Relaxed),
            dropped_full: self.dropped_full.load(Ordering::Relaxed),
            dropped_oversized: self.dropped_oversized.load(Ordering::Relaxed),
            dropped_empty: self.dropped_empty.load(Ordering::Relaxed),
        }
    }
}
