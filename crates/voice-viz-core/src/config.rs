//! Engine-level settings.
//!
//! The application layer reads these from the user config file and hands them
//! to [`crate::Visualizer::new`]; tests use [`VizConfig::default`].

use serde::{Deserialize, Serialize};

use crate::draw::Rgb;

/// Analyser resolution (FFT size). Yields `DEFAULT_FFT_SIZE / 2` bins.
pub const DEFAULT_FFT_SIZE: usize = 128;
/// Particles in the ring
pub const DEFAULT_PARTICLE_COUNT: usize = 120;
/// Length of the fade-out after playback stops
pub const DEFAULT_FADE_DURATION_MS: f64 = 550.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VizConfig {
    pub fft_size: usize,
    pub particle_count: usize,
    pub fade_duration_ms: f64,
    /// Particle colour at mix = 0
    pub brand_blue: Rgb,
    /// Particle colour at mix = 1
    pub brand_orange: Rgb,
}

impl Default for VizConfig {
    fn default() -> Self {
        Self {
            fft_size: DEFAULT_FFT_SIZE,
            particle_count: DEFAULT_PARTICLE_COUNT,
            fade_duration_ms: DEFAULT_FADE_DURATION_MS,
            brand_blue: Rgb::new(5, 83, 156),
            brand_orange: Rgb::new(245, 146, 34),
        }
    }
}

impl VizConfig {
    /// Number of frequency bins the analyser produces
    pub fn bin_count(&self) -> usize {
        self.fft_size / 2
    }
}
