//! The two polling loops: the base station pushing its receiver output onto the
//! correction link, and the rover injecting queued corrections into its receiver
//! while tracking the fix quality it reports.
//!
//! Each pipeline object owns its state; the caller owns the loop, the cadence and the
//! collaborators, and hands them in on every poll.

mod base;
#[cfg(feature = "std")]
mod rover;

pub use base::{BasePoll, BaseStation, BaseStats};
#[cfg(feature = "std")]
pub use rover::{Rover, RoverPoll, RoverStats};
