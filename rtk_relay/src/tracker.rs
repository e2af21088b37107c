use crate::decoder::FixQuality;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A change of reported fix quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FixTransition {
    /// `None` for the very first non-Invalid reading after start-up
    pub from: Option<FixQuality>,
    pub to: FixQuality,
}

impl core::fmt::Display for FixTransition {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.from {
            Some(from) => write!(f, "{} -> {}", from, self.to),
            None => write!(f, "{}", self.to),
        }
    }
}

/// Remembers the last fix quality read and reports changes.
///
/// Before any reading [FixTracker::current] is `None`. The first reading is compared
/// against [FixQuality::Invalid], so a receiver starting without a fix stays silent
/// until it gets one.
///
/// ```
/// use rtk_relay::{FixQuality, FixTracker};
///
/// let mut tracker = FixTracker::new();
/// assert_eq!(tracker.observe(FixQuality::Invalid), None);
/// let event = tracker.observe(FixQuality::RtkFloat).unwrap();
/// assert_eq!(event.to, FixQuality::RtkFloat);
/// assert_eq!(tracker.current(), Some(FixQuality::RtkFloat));
/// ```
#[derive(Debug, Default, Clone)]
pub struct FixTracker {
    current: Option<FixQuality>,
    transitions: u32,
}

impl FixTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<FixQuality> {
        self.current
    }

    /// Number of transitions reported so far
    pub fn transitions(&self) -> u32 {
        self.transitions
    }

    /// Feeds one reading. Returns the transition when it differs from the last one.
    pub fn observe(&mut self, quality: FixQuality) -> Option<FixTransition> {
        let previous = self.current.replace(quality);
        if previous.unwrap_or(FixQuality::Invalid) == quality {
            return None;
        }
        self.transitions = self.transitions.wrapping_add(1);
        let transition = FixTransition {
            from: previous,
            to: quality,
        };
        log::info!("Fix quality changed: {}", transition);
        Some(transition)
    }

    /// Back to the start-up state
    pub fn reset(&mut self) {
        self.current = None;
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn reports_only_changes() {
        let mut tracker = FixTracker::new();
        let events: Vec<FixTransition> = [
            FixQuality::Invalid,
            FixQuality::Invalid,
            FixQuality::Gps,
            FixQuality::Gps,
            FixQuality::RtkFixed,
        ]
        .into_iter()
        .filter_map(|q| tracker.observe(q))
        .collect();

        assert_eq!(
            events,
            vec![
                FixTransition {
                    from: Some(FixQuality::Invalid),
                    to: FixQuality::Gps
                },
                FixTransition {
                    from: Some(FixQuality::Gps),
                    to: FixQuality::RtkFixed
                },
            ]
        );
        assert_eq!(tracker.transitions(), 2);
        assert_eq!(tracker.current(), Some(FixQuality::RtkFixed));
    }

    #[test]
    fn first_reading_against_invalid() {
        let mut tracker = FixTracker::new();
        assert_eq!(tracker.current(), None);
        assert_eq!(
            tracker.observe(FixQuality::Dgps),
            Some(FixTransition {
                from: None,
                to: FixQuality::Dgps
            })
        );

        let mut tracker = FixTracker::new();
        assert_eq!(tracker.observe(FixQuality::Invalid), None);
        assert_eq!(tracker.current(), Some(FixQuality::Invalid));
    }

    #[test]
    fn losing_fix_is_a_transition() {
        let mut tracker = FixTracker::new();
        tracker.observe(FixQuality::RtkFixed);
        let event = tracker.observe(FixQuality::Invalid).unwrap();
        assert_eq!(event.from, Some(FixQuality::RtkFixed));
        assert_eq!(event.to.to_string(), "Invalid");
    }

    #[test]
    fn reset_forgets_state() {
        let mut tracker = FixTracker::new();
        tracker.observe(FixQuality::Gps);
        tracker.reset();
        assert_eq!(tracker.current(), None);
        assert!(tracker.observe(FixQuality::Gps).is_some());
    }

    #[test]
    fn transition_display() {
        let t = FixTransition {
            from: Some(FixQuality::RtkFloat),
            to: FixQuality::RtkFixed,
        };
        assert_eq!(t.to_string(), "RTK Float -> RTK Fixed");
    }
}
