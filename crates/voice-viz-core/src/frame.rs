//! Per-tick frequency data and the snapshot kept for the fade-out.

/// Byte magnitudes, one per frequency bin (0 = silent, 255 = loudest).
///
/// Refreshed in place every tick; the only copy that outlives a tick is the
/// one inside [`LastFrameSnapshot`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FrequencyFrame {
    bins: Vec<u8>,
}

impl FrequencyFrame {
    /// All-zero frame with `bin_count` bins
    pub fn new(bin_count: usize) -> Self {
        Self {
            bins: vec![0; bin_count],
        }
    }

    pub fn from_bins(bins: Vec<u8>) -> Self {
        Self { bins }
    }

    pub fn bins(&self) -> &[u8] {
        &self.bins
    }

    pub fn bins_mut(&mut self) -> &mut [u8] {
        &mut self.bins
    }

    pub fn len(&self) -> usize {
        self.bins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    pub fn zero(&mut self) {
        self.bins.iter_mut().for_each(|b| *b = 0);
    }

    /// Magnitude of bin `idx` normalised to [0, 1]; 0 when out of range
    pub fn amplitude(&self, idx: usize) -> f32 {
        self.bins.get(idx).map_or(0.0, |&b| b as f32 / 255.0)
    }
}

/// Parameters of the last rendered Playing frame, replayed by the fade-out
#[derive(Debug, Clone, PartialEq)]
pub struct LastFrameSnapshot {
    pub energy: f32,
    pub frequency_data: FrequencyFrame,
    /// Milliseconds, same clock as the visualizer ticks
    pub timestamp: f64,
    pub pulse: f32,
}
