//! Fade-out after playback stops.

use crate::frame::LastFrameSnapshot;

/// An in-progress fade over a frozen snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct FadeState {
    pub start_timestamp: f64,
    pub duration_ms: f64,
    /// Never modified while the fade runs
    snapshot: LastFrameSnapshot,
}

impl FadeState {
    pub fn new(start_timestamp: f64, duration_ms: f64, snapshot: LastFrameSnapshot) -> Self {
        Self {
            start_timestamp,
            duration_ms,
            snapshot,
        }
    }

    pub fn snapshot(&self) -> &LastFrameSnapshot {
        &self.snapshot
    }

    /// Fraction of the fade elapsed at `now_ms`, in [0, 1]
    pub fn progress(&self, now_ms: f64) -> f32 {
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        ((now_ms - self.start_timestamp) / self.duration_ms).clamp(0.0, 1.0) as f32
    }

    /// Opacity multiplier at `now_ms`: 1 at the start, 0 at the end
    pub fn alpha(&self, now_ms: f64) -> f32 {
        1.0 - self.progress(now_ms)
    }

    pub fn is_complete(&self, now_ms: f64) -> bool {
        self.progress(now_ms) >= 1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::FrequencyFrame;

    fn fade_at(start: f64) -> FadeState {
        let snapshot = LastFrameSnapshot {
            energy: 0.5,
            frequency_data: FrequencyFrame::new(64),
            timestamp: start - 16.0,
            pulse: 0.3,
        };
        FadeState::new(start, 550.0, snapshot)
    }

    #[test]
    fn test_alpha_decays_linearly() {
        let fade = fade_at(1000.0);
        assert_eq!(fade.alpha(1000.0), 1.0);
        assert!((fade.alpha(1275.0) - 0.5).abs() < 1e-6);
        assert_eq!(fade.alpha(1550.0), 0.0);
        assert_eq!(fade.alpha(9000.0), 0.0);
    }

    #[test]
    fn test_clock_going_backwards_holds_full_alpha() {
        let fade = fade_at(1000.0);
        assert_eq!(fade.progress(900.0), 0.0);
        assert!(!fade.is_complete(900.0));
    }

    #[test]
    fn test_completion() {
        let fade = fade_at(0.0);
        assert!(!fade.is_complete(549.0));
        assert!(fade.is_complete(550.0));
    }

    #[test]
    fn test_zero_duration_completes_immediately() {
        let fade = FadeState::new(0.0, 0.0, fade_at(0.0).snapshot().clone());
        assert!(fade.is_complete(0.0));
        assert_eq!(fade.alpha(0.0), 0.0);
    }

    #[test]
    fn test_snapshot_is_kept_verbatim() {
        let fade = fade_at(200.0);
        assert_eq!(fade.snapshot().energy, 0.5);
        assert_eq!(fade.snapshot().pulse, 0.3);
    }
}
