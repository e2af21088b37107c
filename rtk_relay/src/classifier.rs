use crate::constants::RTCM_SYNC_CHAR;

/// Returns true if any byte of `bytes` is the RTCM3 preamble.
pub fn has_correction_marker(bytes: &[u8]) -> bool {
    bytes.contains(&RTCM_SYNC_CHAR)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassifierEvent {
    /// First burst carrying an RTCM3 preamble since start-up.
    CorrectionsActive,
}

/// Watches read bursts from the base receiver for RTCM3 traffic.
///
/// The "active" state is latched: once a preamble was seen it stays set for the
/// process lifetime. This is an observability signal only, relaying never waits on it.
#[derive(Debug, Default, Clone)]
pub struct CorrectionClassifier {
    active: bool,
    marked_bursts: u32,
    unmarked_bursts: u32,
}

impl CorrectionClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Bursts that contained at least one preamble byte
    pub fn marked_bursts(&self) -> u32 {
        self.marked_bursts
    }

    pub fn unmarked_bursts(&self) -> u32 {
        self.unmarked_bursts
    }

    /// Classifies one burst. Yields [ClassifierEvent::CorrectionsActive] the first
    /// time a preamble shows up, `None` for every other call.
    pub fn observe(&mut self, burst: &[u8]) -> Option<ClassifierEvent> {
        if burst.is_empty() {
            return None;
        }
        if !has_correction_marker(burst) {
            self.unmarked_bursts = self.unmarked_bursts.wrapping_add(1);
            return None;
        }
        self.marked_bursts = self.marked_bursts.wrapping_add(1);
        if self.active {
            return None;
        }
        self.active = true;
        log::info!("RTCM3 corrections detected on GNSS output");
        Some(ClassifierEvent::CorrectionsActive)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn marker_found_anywhere() {
        assert!(has_correction_marker(&[0xd3, 0x00, 0x13]));
        assert!(has_correction_marker(&[0x24, 0x47, 0xd3]));
        assert!(!has_correction_marker(b"$GNGGA,123519*47\r\n"));
        assert!(!has_correction_marker(&[]));
    }

    #[test]
    fn active_event_is_edge_triggered() {
        let mut classifier = CorrectionClassifier::new();
        assert_eq!(classifier.observe(b"$GNGSA,A,3*00\r\n"), None);
        assert!(!classifier.is_active());

        assert_eq!(
            classifier.observe(&[0xd3, 0x00, 0x13, 0x3e, 0xd0]),
            Some(ClassifierEvent::CorrectionsActive)
        );
        assert!(classifier.is_active());
        assert_eq!(classifier.observe(&[0xd3, 0x00, 0x08]), None);
        assert_eq!(classifier.marked_bursts(), 2);
    }

    #[test]
    fn active_state_is_latched() {
        let mut classifier = CorrectionClassifier::new();
        classifier.observe(&[0xd3]);
        for _ in 0..5 {
            assert_eq!(classifier.observe(&[0x00, 0x01]), None);
        }
        assert!(classifier.is_active());
        assert_eq!(classifier.unmarked_bursts(), 5);
    }

    #[test]
    fn empty_burst_is_not_counted() {
        let mut classifier = CorrectionClassifier::new();
        assert_eq!(classifier.observe(&[]), None);
        assert_eq!(classifier.unmarked_bursts(), 0);
        assert_eq!(classifier.marked_bursts(), 0);
    }
}
