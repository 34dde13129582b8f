//! Frame → scalar energy reduction.

use crate::frame::FrequencyFrame;

/// Weight applied to the lowest bin; rises linearly by 1.0 across the frame
const LOW_BIN_WEIGHT: f32 = 0.6;
/// Empirical ceiling for the weighted mean. Speech rarely gets near 255,
/// so normalising against it would leave typical speech looking flat.
const ENERGY_CEILING: f32 = 200.0;

const IDLE_BASE: f32 = 0.08;
const IDLE_SWING: f32 = 0.04;
/// Radians per millisecond of the idle oscillation
const IDLE_RATE: f64 = 0.002;

/// Treble-weighted loudness of a frame in [0, 1], without the idle floor
pub fn raw_energy(frame: &FrequencyFrame) -> f32 {
    let bins = frame.bins();
    if bins.is_empty() {
        return 0.0;
    }

    let len = bins.len() as f32;
    let sum: f32 = bins
        .iter()
        .enumerate()
        .map(|(i, &b)| b as f32 * (LOW_BIN_WEIGHT + i as f32 / len))
        .sum();

    (sum / len / ENERGY_CEILING).min(1.0)
}

/// Slow breathing floor so silence still animates. Lies in [0.04, 0.12].
pub fn idle_floor(elapsed_ms: f64) -> f32 {
    IDLE_BASE + IDLE_SWING * (elapsed_ms * IDLE_RATE).sin() as f32
}

/// Final per-frame energy: the louder of the frame and the idle floor
pub fn energy(frame: &FrequencyFrame, elapsed_ms: f64) -> f32 {
    raw_energy(frame).max(idle_floor(elapsed_ms)).clamp(0.0, 1.0)
}
