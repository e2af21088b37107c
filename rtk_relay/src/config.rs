use crate::{constants::*, error::ConfigError};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Wireless transport carrying the corrections, which bounds the frame size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Transport {
    /// Connectionless broadcast link (ESP-NOW style)
    #[default]
    Broadcast,
    /// Pub/sub broker (MQTT style)
    Broker,
    /// UDP datagrams
    Datagram,
}

impl Transport {
    pub const fn max_frame_len(self) -> usize {
        match self {
            Transport::Broadcast => BROADCAST_MAX_FRAME_LEN,
            Transport::Broker => BROKER_MAX_FRAME_LEN,
            Transport::Datagram => DATAGRAM_MAX_FRAME_LEN,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WindowConfig {
    pub capacity: usize,
    pub reserve_margin: usize,
    pub discard_chunk: usize,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_WINDOW_CAPACITY,
            reserve_margin: DEFAULT_RESERVE_MARGIN,
            discard_chunk: DEFAULT_DISCARD_CHUNK,
        }
    }
}

impl WindowConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::ZeroWindowCapacity);
        }
        if self.reserve_margin >= self.capacity {
            return Err(ConfigError::ReserveExceedsCapacity {
                reserve: self.reserve_margin,
                capacity: self.capacity,
            });
        }
        if self.discard_chunk == 0 {
            return Err(ConfigError::ZeroDiscardChunk);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct QueueConfig {
    /// Frames held before new arrivals are dropped
    pub capacity: usize,
    /// Frames forwarded per consumer poll
    pub max_batch: usize,
    /// Payloads above this size are discarded on arrival
    pub max_frame_len: usize,
    /// Log every Nth drop
    pub drop_report_interval: u32,
    /// Log every Mth received frame
    pub receive_report_interval: u32,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self::for_transport(Transport::default())
    }
}

impl QueueConfig {
    pub fn for_transport(transport: Transport) -> Self {
        Self {
            capacity: DEFAULT_QUEUE_CAPACITY,
            max_batch: DEFAULT_MAX_BATCH,
            max_frame_len: transport.max_frame_len(),
            drop_report_interval: DEFAULT_DROP_REPORT_INTERVAL,
            receive_report_interval: DEFAULT_RECEIVE_REPORT_INTERVAL,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::ZeroQueueCapacity);
        }
        if self.max_batch == 0 {
            return Err(ConfigError::ZeroBatch);
        }
        if self.max_frame_len == 0 || self.max_frame_len > MAX_FRAME_LEN {
            return Err(ConfigError::FrameLenOutOfRange {
                max_frame_len: self.max_frame_len,
                limit: MAX_FRAME_LEN,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RoverConfig {
    /// Polls between two "current fix" reports, 0 disables them
    pub status_interval: u32,
}

impl Default for RoverConfig {
    fn default() -> Self {
        Self {
            status_interval: DEFAULT_ROVER_STATUS_INTERVAL,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BaseConfig {
    /// Idle polls between two "waiting for GNSS data" notices, 0 disables them
    pub idle_report_interval: u32,
}

impl Default for BaseConfig {
    fn default() -> Self {
        Self {
            idle_report_interval: DEFAULT_BASE_IDLE_REPORT_INTERVAL,
        }
    }
}

/// Periodic log gate shared by the report intervals below, 0 disables the report.
pub(crate) fn is_report_due(count: u32, interval: u32) -> bool {
    interval != 0 && count % interval == 0
}

/// Everything tunable in the relay, one section per component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RelayConfig {
    pub transport: Transport,
    pub window: WindowConfig,
    pub queue: QueueConfig,
    pub rover: RoverConfig,
    pub base: BaseConfig,
}

impl RelayConfig {
    pub fn for_transport(transport: Transport) -> Self {
        Self {
            transport,
            queue: QueueConfig::for_transport(transport),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.window.validate()?;
        self.queue.validate()?;
        if self.queue.max_frame_len > self.transport.max_frame_len() {
            return Err(ConfigError::FrameLenOutOfRange {
                max_frame_len: self.queue.max_frame_len,
                limit: self.transport.max_frame_len(),
            });
        }
        Ok(())
    }
}
