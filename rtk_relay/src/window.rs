use crate::{
    config::WindowConfig,
    constants::{DEFAULT_DISCARD_CHUNK, DEFAULT_RESERVE_MARGIN},
    link::ByteSource,
};

/// When and how much a [ByteWindow] sheds once it runs close to full.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompactionPolicy {
    /// Room kept free at the tail, sized to the longest sentence that must stay intact.
    pub reserve_margin: usize,
    /// Leading bytes discarded per compaction.
    pub discard_chunk: usize,
}

impl Default for CompactionPolicy {
    fn default() -> Self {
        Self {
            reserve_margin: DEFAULT_RESERVE_MARGIN,
            discard_chunk: DEFAULT_DISCARD_CHUNK,
        }
    }
}

impl From<&WindowConfig> for CompactionPolicy {
    fn from(cfg: &WindowConfig) -> Self {
        Self {
            reserve_margin: cfg.reserve_margin,
            discard_chunk: cfg.discard_chunk,
        }
    }
}

/// Sliding window over the GNSS byte stream, backed by caller provided storage.
///
/// The window never grows: `append` accepts what fits and reports the rest as
/// refused, `compact_if_needed` drops the oldest bytes so fresh data keeps coming in.
/// Compaction is a freshness policy only, a sentence cut in half by it is simply
/// never matched.
///
/// ```
/// let mut storage = [0; 64];
/// let mut window = rtk_relay::ByteWindow::new(&mut storage[..], Default::default());
/// assert_eq!(window.append(b"$GNGGA,"), 7);
/// assert_eq!(window.as_slice(), b"$GNGGA,");
/// ```
pub struct ByteWindow<'a> {
    buffer: &'a mut [u8],
    len: usize,
    policy: CompactionPolicy,
}

impl<'a> ByteWindow<'a> {
    pub fn new(buf: &'a mut [u8], policy: CompactionPolicy) -> Self {
        Self {
            buffer: buf,
            len: 0,
            policy,
        }
    }

    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Free bytes left at the tail.
    pub fn remaining(&self) -> usize {
        self.buffer.len() - self.len
    }

    pub fn policy(&self) -> CompactionPolicy {
        self.policy
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buffer[..self.len]
    }

    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Copies as many bytes as fit at the tail and returns how many were taken.
    /// The caller decides what to do with the refused remainder.
    pub fn append(&mut self, other: &[u8]) -> usize {
        let to_copy = core::cmp::min(other.len(), self.remaining());
        self.buffer[self.len..self.len + to_copy].copy_from_slice(&other[..to_copy]);
        self.len += to_copy;
        to_copy
    }

    /// Reads straight into the free tail, so a single read never exceeds
    /// [ByteWindow::remaining].
    pub fn fill_from<S: ByteSource>(&mut self, source: &mut S) -> Result<usize, S::Error> {
        if self.remaining() == 0 {
            return Ok(0);
        }
        let tail = &mut self.buffer[self.len..];
        let nbytes = source.read_bytes(tail)?;
        // a misbehaving source cannot push len past capacity
        let nbytes = core::cmp::min(nbytes, tail.len());
        self.len += nbytes;
        Ok(nbytes)
    }

    /// Removes the first `count` bytes, shifting the rest to index 0. Cannot fail.
    pub fn drain(&mut self, count: usize) {
        if count >= self.len {
            self.len = 0;
            return;
        }

        self.buffer.copy_within(count..self.len, 0);
        self.len -= count;
    }

    /// True once the free tail is smaller than the reserve margin.
    pub fn needs_compaction(&self) -> bool {
        let threshold = self.capacity().saturating_sub(self.policy.reserve_margin);
        self.len > threshold
    }

    /// Discards a leading chunk when the window is past its threshold.
    /// Returns the number of bytes discarded, 0 when nothing was done.
    pub fn compact_if_needed(&mut self) -> usize {
        if !self.needs_compaction() {
            return 0;
        }
        let discarded = core::cmp::min(self.policy.discard_chunk.max(1), self.len);
        self.drain(discarded);
        log::trace!(
            "byte window compacted, discarded {} bytes, {} kept",
            discarded,
            self.len
        );
        discarded
    }
}

impl core::fmt::Debug for ByteWindow<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ByteWindow")
            .field("len", &self.len)
            .field("capacity", &self.capacity())
            .field("policy", &self.policy)
            .finish()
    }
}
