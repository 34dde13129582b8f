//! Damped spring that turns jittery energy into a physical-feeling pulse.
//!
//! This is the only temporal smoothing in the pipeline. Energy reaches the
//! spring raw; smoothing it again upstream makes the visuals sluggish.

/// Pull towards the target, per second
pub const STIFFNESS: f32 = 12.0;
/// Velocity retained per 60 Hz frame
pub const DAMPING: f32 = 0.82;
/// Longest step integrated in one tick, in seconds. Stalled frames (hidden
/// window, debugger) would otherwise fling the spring.
pub const MAX_DT: f32 = 0.05;
/// Step used when the clock did not advance
const FALLBACK_DT: f32 = 0.016;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MotionState {
    pub pulse: f32,
    pub velocity: f32,
    /// Milliseconds of the previous tick
    pub last_timestamp: f64,
}

impl MotionState {
    /// Restart the clock without touching pulse/velocity, so time spent
    /// paused is not integrated on the next tick.
    pub fn restart_clock(&mut self, now_ms: f64) {
        self.last_timestamp = now_ms;
    }

    /// Back to rest: no pulse, no motion
    pub fn reset(&mut self) {
        self.pulse = 0.0;
        self.velocity = 0.0;
    }

    /// Advance one tick towards `energy`. Returns the new pulse.
    pub fn step(&mut self, energy: f32, now_ms: f64) -> f32 {
        let dt = clamp_dt(((now_ms - self.last_timestamp) / 1000.0) as f32);
        self.last_timestamp = now_ms;
        self.integrate(energy, dt)
    }

    /// Advance by an explicit `dt` in seconds (clamped like [`Self::step`])
    pub fn integrate(&mut self, energy: f32, dt: f32) -> f32 {
        let dt = clamp_dt(dt);
        self.velocity += (energy - self.pulse) * STIFFNESS * dt;
        self.velocity *= DAMPING.powf(dt * 60.0);
        self.pulse += self.velocity;
        self.pulse
    }
}

fn clamp_dt(dt: f32) -> f32 {
    if dt > 0.0 && dt.is_finite() {
        dt.min(MAX_DT)
    } else {
        FALLBACK_DT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Largest |pulse - target| over each consecutive window of `window` ticks
    fn error_envelope(start: f32, target: f32, dt: f32, windows: usize, window: usize) -> Vec<f32> {
        let mut state = MotionState {
            pulse: start,
            ..Default::default()
        };
        (0..windows)
            .map(|_| {
                (0..window)
                    .map(|_| (state.integrate(target, dt) - target).abs())
                    .fold(0.0f32, f32::max)
            })
            .collect()
    }

    #[test]
    fn test_converges_for_any_stable_dt() {
        for dt in [1.0 / 144.0, 1.0 / 60.0, 1.0 / 30.0, MAX_DT] {
            for start in [0.0, 1.0, -0.5, 0.3] {
                let mut state = MotionState {
                    pulse: start,
                    ..Default::default()
                };
                for _ in 0..2000 {
                    state.integrate(0.6, dt);
                }
                assert!(
                    (state.pulse - 0.6).abs() < 1e-3,
                    "dt={} start={} pulse={}",
                    dt,
                    start,
                    state.pulse
                );
                assert!(state.velocity.abs() < 1e-3);
            }
        }
    }

    #[test]
    fn test_error_envelope_shrinks() {
        let envelope = error_envelope(0.0, 0.5, 1.0 / 60.0, 4, 30);
        for pair in envelope.windows(2) {
            assert!(pair[1] < pair[0], "envelope not shrinking: {:?}", envelope);
        }
    }

    #[test]
    fn test_overshoots_slightly() {
        let mut state = MotionState::default();
        let peak = (0..120)
            .map(|_| state.integrate(0.5, 1.0 / 60.0))
            .fold(0.0f32, f32::max);
        assert!(peak > 0.5, "spring should overshoot, peak={}", peak);
        assert!(peak < 1.0, "overshoot too large, peak={}", peak);
    }

    #[test]
    fn test_large_dt_is_clamped() {
        let mut clamped = MotionState::default();
        let mut stalled = MotionState::default();
        clamped.integrate(1.0, MAX_DT);
        stalled.integrate(1.0, 5.0);
        assert_eq!(clamped, stalled);

        let mut state = MotionState::default();
        for _ in 0..2000 {
            state.integrate(0.8, 10.0);
        }
        assert!(state.pulse.is_finite());
        assert!((state.pulse - 0.8).abs() < 1e-3);
    }

    #[test]
    fn test_step_uses_wall_clock() {
        let mut state = MotionState::default();
        state.restart_clock(1000.0);
        state.step(1.0, 1016.0);
        assert_eq!(state.last_timestamp, 1016.0);

        let mut manual = MotionState::default();
        manual.integrate(1.0, 0.016);
        assert!((state.pulse - manual.pulse).abs() < 1e-6);
    }

    #[test]
    fn test_zero_dt_uses_fallback() {
        let mut state = MotionState::default();
        state.restart_clock(500.0);
        state.step(1.0, 500.0);
        assert!(state.pulse > 0.0);
    }
}
