//! Audio capture tap: binds one playing source to one analyser.
//!
//! The source keeps playing to the speakers as before; it only copies a mono
//! mix of what it outputs into a [`SampleTap`]. The [`AnalysisContext`] that
//! owns the tap is built lazily on first bind and then lives until
//! [`CaptureTap::release`].

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use tracing::{info, trace, warn};

use crate::analyser::{resolve_fft_size, Analyser};
use crate::error::{Result, VizError};
use crate::frame::FrequencyFrame;

/// A playable audio handle the visualizer can listen to.
///
/// The visualizer never controls playback; it only asks for a copy of the
/// output. A source accepts a single tap for its whole life and must return
/// [`VizError::BindingFailure`] when asked for another.
pub trait AudioSource {
    fn connect_tap(&self, tap: SampleTap) -> Result<()>;
}

impl<S: AudioSource + ?Sized> AudioSource for Arc<S> {
    fn connect_tap(&self, tap: SampleTap) -> Result<()> {
        (**self).connect_tap(tap)
    }
}

struct TapBuffer {
    samples: VecDeque<f32>,
    capacity: usize,
}

/// Ring of the most recent output samples, shared with the audio thread
#[derive(Clone)]
pub struct SampleTap {
    inner: Arc<Mutex<TapBuffer>>,
}

impl SampleTap {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(TapBuffer {
                samples: VecDeque::with_capacity(capacity),
                capacity,
            })),
        }
    }

    /// Append samples, dropping the oldest beyond capacity. Called from the
    /// audio callback; silently does nothing if the lock is poisoned.
    pub fn push<I: IntoIterator<Item = f32>>(&self, samples: I) {
        if let Ok(mut buf) = self.inner.lock() {
            for sample in samples {
                if buf.samples.len() == buf.capacity {
                    buf.samples.pop_front();
                }
                buf.samples.push_back(sample);
            }
        }
    }

    /// Copy the buffered samples into `out`. Returns false until the ring has
    /// filled up once, or if the lock is unavailable.
    pub fn copy_recent(&self, out: &mut Vec<f32>) -> bool {
        match self.inner.lock() {
            Ok(buf) if buf.samples.len() == buf.capacity => {
                out.clear();
                out.extend(buf.samples.iter().copied());
                true
            }
            _ => false,
        }
    }

    pub fn clear(&self) {
        if let Ok(mut buf) = self.inner.lock() {
            buf.samples.clear();
        }
    }
}

/// Analysis resources bound to one source
pub struct AnalysisContext {
    analyser: Analyser,
    tap: SampleTap,
    scratch: Vec<f32>,
    suspended: bool,
}

impl AnalysisContext {
    fn new(fft_size: usize) -> Self {
        let analyser = Analyser::new(fft_size);
        let tap = SampleTap::new(analyser.fft_size());
        Self {
            scratch: Vec::with_capacity(analyser.fft_size()),
            analyser,
            tap,
            suspended: false,
        }
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    fn read_frame(&mut self, frame: &mut FrequencyFrame) -> Result<()> {
        if self.suspended || !self.tap.copy_recent(&mut self.scratch) {
            return Err(VizError::FrameNotReady);
        }
        self.analyser.byte_frequency_data(&self.scratch, frame);
        Ok(())
    }
}

/// Lazily-bound analyser for a single audio source.
pub struct CaptureTap {
    fft_size: usize,
    context: Option<AnalysisContext>,
    /// Binding failed; frames read as silence from now on
    degraded: bool,
}

impl CaptureTap {
    pub fn new(fft_size: usize) -> Self {
        Self {
            fft_size,
            context: None,
            degraded: false,
        }
    }

    /// Attach to `source`. A no-op once a context exists or after a failed
    /// attempt. On failure the tap degrades to idle-only frames and the error
    /// is returned once for reporting.
    pub fn bind<S: AudioSource + ?Sized>(&mut self, source: &S) -> Result<()> {
        if self.context.is_some() || self.degraded {
            return Ok(());
        }

        let context = AnalysisContext::new(self.fft_size);
        match source.connect_tap(context.tap.clone()) {
            Ok(()) => {
                info!(
                    fft_size = context.analyser.fft_size(),
                    bins = context.analyser.bin_count(),
                    "Analyser bound to audio source"
                );
                self.context = Some(context);
                Ok(())
            }
            Err(e) => {
                warn!("{}; falling back to idle visuals", e);
                self.degraded = true;
                Err(e)
            }
        }
    }

    pub fn is_bound(&self) -> bool {
        self.context.is_some()
    }

    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    pub fn context(&self) -> Option<&AnalysisContext> {
        self.context.as_ref()
    }

    /// Stop analysing while playback is paused
    pub fn suspend(&mut self) {
        if let Some(ctx) = self.context.as_mut() {
            ctx.suspended = true;
        }
    }

    /// Continue after [`Self::suspend`]. Smoothing starts over so the first
    /// frame does not blend in audio from before the pause.
    pub fn resume(&mut self) {
        if let Some(ctx) = self.context.as_mut() {
            if ctx.suspended {
                ctx.analyser.reset();
                ctx.suspended = false;
            }
        }
    }

    /// Fill `frame` with the current spectrum.
    ///
    /// Degraded taps always produce an all-zero frame. Unbound, suspended or
    /// still-filling taps report [`VizError::FrameNotReady`].
    pub fn read_frame(&mut self, frame: &mut FrequencyFrame) -> Result<()> {
        if self.degraded {
            let bins = resolve_fft_size(self.fft_size) / 2;
            if frame.len() != bins {
                *frame = FrequencyFrame::new(bins);
            } else {
                frame.zero();
            }
            return Ok(());
        }

        match self.context.as_mut() {
            Some(ctx) => ctx.read_frame(frame),
            None => {
                trace!("read_frame before bind");
                Err(VizError::FrameNotReady)
            }
        }
    }

    /// Drop the analysis context (final teardown)
    pub fn release(&mut self) {
        if let Some(ctx) = self.context.take() {
            ctx.tap.clear();
        }
    }
}

#[cfg(test)]
pub(crate) mod fake {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// In-memory source. Counts binds and refuses a second one, like a
    /// media element that can only feed one analyser.
    #[derive(Default)]
    pub struct FakeSource {
        pub binds: AtomicUsize,
        pub tap: Mutex<Option<SampleTap>>,
        pub refuse: bool,
    }

    impl FakeSource {
        pub fn refusing() -> Self {
            Self {
                refuse: true,
                ..Default::default()
            }
        }

        /// Simulate the audio thread producing output
        pub fn play(&self, samples: &[f32]) {
            if let Some(tap) = self.tap.lock().unwrap().as_ref() {
                tap.push(samples.iter().copied());
            }
        }
    }

    impl AudioSource for FakeSource {
        fn connect_tap(&self, tap: SampleTap) -> Result<()> {
            if self.refuse {
                return Err(VizError::BindingFailure("cross-origin media".into()));
            }
            let mut slot = self.tap.lock().unwrap();
            if slot.is_some() {
                return Err(VizError::BindingFailure("already connected".into()));
            }
            self.binds.fetch_add(1, Ordering::SeqCst);
            *slot = Some(tap);
            Ok(())
        }
    }
}
