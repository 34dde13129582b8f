//! FFT analysis producing byte-scaled frequency bins.
//!
//! Mirrors the behaviour of a browser analyser node so the energy constants
//! keep their meaning: Blackman window, magnitudes scaled by 1/N, temporal
//! smoothing of 0.8 between calls, then decibels mapped linearly from
//! [`MIN_DB`, `MAX_DB`] onto 0..=255.

use num_complex::Complex;
use rustfft::{Fft, FftPlanner};
use std::sync::Arc;

use crate::frame::FrequencyFrame;

/// Weight of the previous magnitude when smoothing between frames
pub const SMOOTHING: f32 = 0.8;
/// Magnitude mapped to byte 0
pub const MIN_DB: f32 = -100.0;
/// Magnitude mapped to byte 255
pub const MAX_DB: f32 = -30.0;

const MIN_FFT_SIZE: usize = 32;
const MAX_FFT_SIZE: usize = 32768;

/// FFT size actually used for a requested size: a power of two in [32, 32768]
pub fn resolve_fft_size(requested: usize) -> usize {
    requested.clamp(MIN_FFT_SIZE, MAX_FFT_SIZE).next_power_of_two()
}

pub struct Analyser {
    // FFT resources (pre-allocated)
    fft: Arc<dyn Fft<f32>>,
    fft_buffer: Vec<Complex<f32>>,
    fft_window: Vec<f32>,

    /// Smoothed linear magnitude per bin, carried between calls
    smoothed: Vec<f32>,
}

impl Analyser {
    /// `fft_size` goes through [`resolve_fft_size`]
    pub fn new(fft_size: usize) -> Self {
        let fft_size = resolve_fft_size(fft_size);

        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(fft_size);

        // Blackman window
        let n = fft_size as f32;
        let fft_window: Vec<f32> = (0..fft_size)
            .map(|i| {
                let x = std::f32::consts::TAU * i as f32 / n;
                0.42 - 0.5 * x.cos() + 0.08 * (2.0 * x).cos()
            })
            .collect();

        Self {
            fft,
            fft_buffer: vec![Complex::new(0.0, 0.0); fft_size],
            fft_window,
            smoothed: vec![0.0; fft_size / 2],
        }
    }

    pub fn fft_size(&self) -> usize {
        self.fft_buffer.len()
    }

    pub fn bin_count(&self) -> usize {
        self.smoothed.len()
    }

    /// Forget the smoothing history
    pub fn reset(&mut self) {
        self.smoothed.iter_mut().for_each(|m| *m = 0.0);
    }

    /// Analyse the most recent `fft_size` samples and write byte magnitudes
    /// into `out` (resized to [`Self::bin_count`] if needed). Shorter input is
    /// zero-padded at the front so the newest sample stays last.
    pub fn byte_frequency_data(&mut self, samples: &[f32], out: &mut FrequencyFrame) {
        let fft_size = self.fft_size();
        let take = samples.len().min(fft_size);
        let recent = &samples[samples.len() - take..];
        let pad = fft_size - take;

        for (i, slot) in self.fft_buffer.iter_mut().enumerate() {
            let sample = if i < pad { 0.0 } else { recent[i - pad] };
            *slot = Complex::new(sample * self.fft_window[i], 0.0);
        }

        self.fft.process(&mut self.fft_buffer);

        if out.len() != self.bin_count() {
            *out = FrequencyFrame::new(self.bin_count());
        }

        let scale = 1.0 / fft_size as f32;
        let db_range = MAX_DB - MIN_DB;
        for (k, (smoothed, byte)) in self
            .smoothed
            .iter_mut()
            .zip(out.bins_mut().iter_mut())
            .enumerate()
        {
            let magnitude = self.fft_buffer[k].norm() * scale;
            *smoothed = SMOOTHING * *smoothed + (1.0 - SMOOTHING) * magnitude;

            let db = 20.0 * (*smoothed + 1e-12).log10();
            let scaled = 255.0 * (db - MIN_DB) / db_range;
            *byte = scaled.clamp(0.0, 255.0) as u8;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: f32 = 48000.0;

    fn tone(freq: f32, amplitude: f32, len: usize) -> Vec<f32> {
        (0..len)
            .map(|i| amplitude * (std::f32::consts::TAU * freq * i as f32 / SAMPLE_RATE).sin())
            .collect()
    }

    #[test]
    fn test_bin_count_follows_fft_size() {
        assert_eq!(Analyser::new(128).bin_count(), 64);
        assert_eq!(Analyser::new(100).fft_size(), 128);
        assert_eq!(Analyser::new(4).fft_size(), 32);
    }

    #[test]
    fn test_silence_is_zero() {
        let mut analyser = Analyser::new(128);
        let mut frame = FrequencyFrame::default();
        analyser.byte_frequency_data(&[0.0; 128], &mut frame);
        assert_eq!(frame.len(), 64);
        assert!(frame.bins().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_tone_peaks_in_its_bin() {
        let mut analyser = Analyser::new(128);
        let mut frame = FrequencyFrame::default();
        // Bin 8 of a 128-point FFT at 48 kHz sits at 3 kHz. Quiet enough
        // that the main lobe does not saturate.
        let samples = tone(3000.0, 0.05, 128);
        for _ in 0..10 {
            analyser.byte_frequency_data(&samples, &mut frame);
        }

        let bins = frame.bins();
        let peak = bins
            .iter()
            .enumerate()
            .max_by_key(|(_, &b)| b)
            .map(|(i, _)| i)
            .unwrap();
        assert_eq!(peak, 8);
        assert!(bins[8] > bins[9]);
        assert!(bins[8] > 200);
        assert_eq!(bins[40], 0);
    }

    #[test]
    fn test_smoothing_decays_after_signal_stops() {
        let mut analyser = Analyser::new(128);
        let mut frame = FrequencyFrame::default();
        let samples = tone(3000.0, 0.8, 128);
        for _ in 0..10 {
            analyser.byte_frequency_data(&samples, &mut frame);
        }

        analyser.byte_frequency_data(&[0.0; 128], &mut frame);
        let after_one = frame.bins()[8];
        assert!(after_one > 0, "smoothing keeps some energy for a frame");

        for _ in 0..200 {
            analyser.byte_frequency_data(&[0.0; 128], &mut frame);
        }
        assert_eq!(frame.bins()[8], 0);
    }

    #[test]
    fn test_short_input_is_padded() {
        let mut analyser = Analyser::new(128);
        let mut frame = FrequencyFrame::default();
        analyser.byte_frequency_data(&[0.0; 10], &mut frame);
        assert_eq!(frame.len(), 64);
    }
}
