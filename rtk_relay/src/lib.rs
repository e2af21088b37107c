//! # rtk_relay
//!
//! Byte-level plumbing for an RTK base/rover pair linked by a lossy wireless transport.
//! The base relays its receiver's RTCM3 output frame by frame; the rover injects the
//! frames it receives into its own receiver and watches the NMEA GGA sentences coming
//! back for fix quality changes (GPS, DGPS, RTK Float, RTK Fixed).
//!
//! A working host node, serial port plus UDP, lives in the demos/relay-node crate of
//! this workspace.
//!
//! Reading NMEA from a byte window
//! ===============================
//!
//! Receiver output is appended into a [ByteWindow] backed by a caller-owned buffer.
//! Sentences are located in place, newest first:
//! ```
//! use rtk_relay::{decode_coordinates, decode_fix, ByteWindow, CompactionPolicy, FixQuality, Sentence};
//!
//! let mut buf = [0u8; 256];
//! let mut window = ByteWindow::new(&mut buf, CompactionPolicy::default());
//! window.append(b"$GNGGA,123519,4807.038,N,01131.000,E,4,08,0.9,545.4,M,46.9,M,,*5C\r\n");
//!
//! let gga = Sentence::find_last(window.as_slice(), b"GGA").unwrap();
//! assert_eq!(decode_fix(gga.as_bytes()), FixQuality::RtkFixed);
//! assert!(decode_coordinates(gga.as_bytes()).is_some());
//! ```
//! A sentence is only ever reported once its line terminator is in the window, a
//! half-received one is left for the next read.
//!
//! Relaying corrections
//! ====================
//!
//! On the rover, frames arriving from the link go through a bounded [RelayQueue] (drops
//! the newest frame when full) and are drained by the [Rover] poll loop:
//! ```
//! # #[cfg(feature = "std")] {
//! use std::sync::Arc;
//! use rtk_relay::{RelayConfig, RelayQueue, Rover};
//!
//! let config = RelayConfig::default();
//! let queue = Arc::new(RelayQueue::new(config.queue));
//! let mut buf = vec![0u8; config.window.capacity];
//! let rover = Rover::new(&mut buf, Arc::clone(&queue), &config);
//!
//! // from the link receive thread
//! queue.offer(&[0xd3, 0x00, 0x13]);
//! # drop(rover);
//! # }
//! ```
//!
//! no_std Support
//! ==============
//!
//! Without the default `std` feature the window, the sentence and GGA/GSA decoders, the
//! fix tracker and the [BaseStation] are still available; none of them allocate.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate core;
#[cfg(feature = "serde")]
extern crate serde;

pub use crate::{
    classifier::{has_correction_marker, ClassifierEvent, CorrectionClassifier},
    config::{BaseConfig, QueueConfig, RelayConfig, RoverConfig, Transport, WindowConfig},
    decoder::{
        decode_coordinates, decode_dop, decode_dop_fields, decode_fix, decode_fix_reading,
        decode_gga, latest_fix, DopReport, FixQuality, GgaFix, Position,
    },
    error::{ConfigError, FrameError},
    frame::CorrectionFrame,
    link::{ByteSink, ByteSource, CorrectionLink},
    pipeline::{BasePoll, BaseStation, BaseStats},
    sentence::{extract_field, find_last_sentence, ChecksumStatus, Sentence, SentenceRecord},
    tracker::{FixTracker, FixTransition},
    window::{ByteWindow, CompactionPolicy},
};

#[cfg(feature = "std")]
pub use crate::{
    link::IoPort,
    pipeline::{Rover, RoverPoll, RoverStats},
    relay_queue::{RelayQueue, RelayStats},
};

mod classifier;
mod config;
pub mod constants;
mod decoder;
mod error;
mod frame;
mod link;
mod pipeline;
#[cfg(feature = "std")]
mod relay_queue;
mod sentence;
mod tracker;
mod window;
