//! The animation loop.
//!
//! One [`Visualizer`] per audio source. The host calls [`Visualizer::set_playing`]
//! whenever playback starts or stops and [`Visualizer::tick`] once per display
//! frame. Which work a tick does is decided by [`LoopState`] alone, so there is
//! never a playing loop and a fade loop running side by side.

use tracing::{debug, trace};

use crate::config::VizConfig;
use crate::draw::Canvas;
use crate::energy;
use crate::fade::FadeState;
use crate::frame::{FrequencyFrame, LastFrameSnapshot};
use crate::orb::OrbParams;
use crate::particles::ParticleRing;
use crate::spring::MotionState;
use crate::tap::{AudioSource, CaptureTap};

/// Opacity multiplier applied to everything while audio is playing
pub const PLAYING_DIM: f32 = 0.8;

#[derive(Debug, Clone, PartialEq)]
pub enum LoopState {
    Idle,
    Playing,
    Fading(FadeState),
}

/// What a single tick did
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// Nothing to animate
    Idle,
    /// Drew a live frame
    Drawn,
    /// No frame available yet; nothing drawn, snapshot untouched
    Skipped,
    /// Drew the frozen snapshot at this opacity
    Fading { alpha: f32 },
    /// The fade ran out; visuals are back at rest
    FadeComplete,
}

pub struct Visualizer<S: AudioSource> {
    source: S,
    config: VizConfig,
    tap: CaptureTap,
    frame: FrequencyFrame,
    motion: MotionState,
    snapshot: Option<LastFrameSnapshot>,
    state: LoopState,
    ring: ParticleRing,
    orb: OrbParams,
    fade_ticks: usize,
    /// Rest was entered outside a tick; wipe the canvas on the next one
    clear_pending: bool,
}

impl<S: AudioSource> Visualizer<S> {
    pub fn new(source: S, config: VizConfig) -> Self {
        let ring = ParticleRing::new(config.particle_count, config.brand_blue, config.brand_orange);
        Self {
            source,
            tap: CaptureTap::new(config.fft_size),
            frame: FrequencyFrame::new(config.bin_count()),
            motion: MotionState::default(),
            snapshot: None,
            state: LoopState::Idle,
            ring,
            orb: OrbParams::REST,
            fade_ticks: 0,
            clear_pending: false,
            config,
        }
    }

    /// Follow the host's "is playing" signal.
    ///
    /// Starting binds the analyser on first use and resumes it; a running
    /// fade is abandoned. Stopping hands the last live frame to a fade, or
    /// goes straight to rest if no frame was ever drawn.
    pub fn set_playing(&mut self, playing: bool, now_ms: f64) {
        if playing {
            self.start(now_ms);
        } else {
            self.stop(now_ms);
        }
    }

    fn start(&mut self, now_ms: f64) {
        match self.state {
            LoopState::Playing => return,
            LoopState::Fading(_) => debug!("Playback resumed mid-fade"),
            LoopState::Idle => {}
        }

        // A refused bind has already been logged by the tap; carry on with
        // idle-only frames.
        let _ = self.tap.bind(&self.source);
        self.tap.resume();
        self.motion.restart_clock(now_ms);
        self.clear_pending = false;
        self.state = LoopState::Playing;
        self.capture(now_ms);
    }

    /// Take a snapshot of what is playing right now without drawing, so a
    /// stop before the next tick fades from current audio
    fn capture(&mut self, now_ms: f64) {
        if self.tap.read_frame(&mut self.frame).is_err() {
            return;
        }
        let energy = energy::energy(&self.frame, now_ms);
        self.snapshot = Some(LastFrameSnapshot {
            energy,
            frequency_data: self.frame.clone(),
            timestamp: now_ms,
            pulse: self.motion.pulse,
        });
    }

    fn stop(&mut self, now_ms: f64) {
        if self.state != LoopState::Playing {
            return;
        }

        self.tap.suspend();
        match self.snapshot.clone() {
            Some(snapshot) => {
                debug!(energy = snapshot.energy, pulse = snapshot.pulse, "Fade-out started");
                self.fade_ticks = 0;
                self.state = LoopState::Fading(FadeState::new(
                    now_ms,
                    self.config.fade_duration_ms,
                    snapshot,
                ));
            }
            None => {
                self.fade_ticks = 0;
                self.rest();
                self.state = LoopState::Idle;
            }
        }
    }

    /// Advance one display frame and draw into `canvas`
    pub fn tick(&mut self, now_ms: f64, canvas: &mut dyn Canvas) -> TickOutcome {
        match self.state {
            LoopState::Idle => {
                if self.clear_pending {
                    canvas.clear();
                    self.clear_pending = false;
                }
                TickOutcome::Idle
            }
            LoopState::Playing => self.tick_playing(now_ms, canvas),
            LoopState::Fading(_) => self.tick_fading(now_ms, canvas),
        }
    }

    fn tick_playing(&mut self, now_ms: f64, canvas: &mut dyn Canvas) -> TickOutcome {
        if let Err(e) = self.tap.read_frame(&mut self.frame) {
            trace!("{}", e);
            return TickOutcome::Skipped;
        }

        let energy = energy::energy(&self.frame, now_ms);
        let pulse = self.motion.step(energy, now_ms);

        self.orb = OrbParams::reactive(energy, pulse, PLAYING_DIM);
        self.ring
            .draw(canvas, energy, pulse, &self.frame, now_ms, PLAYING_DIM);

        self.snapshot = Some(LastFrameSnapshot {
            energy,
            frequency_data: self.frame.clone(),
            timestamp: now_ms,
            pulse,
        });
        TickOutcome::Drawn
    }

    fn tick_fading(&mut self, now_ms: f64, canvas: &mut dyn Canvas) -> TickOutcome {
        let LoopState::Fading(fade) = &self.state else {
            return TickOutcome::Idle;
        };

        if fade.is_complete(now_ms) {
            debug!(ticks = self.fade_ticks, "Fade-out complete");
            self.rest();
            canvas.clear();
            self.clear_pending = false;
            self.state = LoopState::Idle;
            return TickOutcome::FadeComplete;
        }

        let alpha = fade.alpha(now_ms);
        let snap = fade.snapshot();
        self.ring.draw(
            canvas,
            snap.energy,
            snap.pulse,
            &snap.frequency_data,
            now_ms,
            alpha,
        );
        self.orb = OrbParams::reactive(snap.energy, snap.pulse, alpha);
        self.fade_ticks += 1;
        TickOutcome::Fading { alpha }
    }

    /// Motion to zero, orb to rest, canvas to be wiped
    fn rest(&mut self) {
        self.motion.reset();
        self.snapshot = None;
        self.orb = OrbParams::REST;
        self.clear_pending = true;
    }

    /// Stop animating and release the analyser
    pub fn shutdown(&mut self) {
        self.state = LoopState::Idle;
        self.tap.release();
    }

    pub fn state(&self) -> &LoopState {
        &self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == LoopState::Playing
    }

    pub fn orb(&self) -> OrbParams {
        self.orb
    }

    pub fn motion(&self) -> &MotionState {
        &self.motion
    }

    pub fn snapshot(&self) -> Option<&LastFrameSnapshot> {
        self.snapshot.as_ref()
    }

    /// Ticks drawn by the current (or most recent) fade
    pub fn fade_ticks(&self) -> usize {
        self.fade_ticks
    }

    pub fn tap(&self) -> &CaptureTap {
        &self.tap
    }

}

impl<S: AudioSource> Drop for Visualizer<S> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::recording::{Op, RecordingCanvas};
    use crate::tap::fake::FakeSource;
    use std::sync::Arc;

    fn setup() -> (Arc<FakeSource>, Visualizer<Arc<FakeSource>>, RecordingCanvas) {
        let source = Arc::new(FakeSource::default());
        let viz = Visualizer::new(source.clone(), VizConfig::default());
        (source, viz, RecordingCanvas::new(576.0, 576.0))
    }

    #[test]
    fn test_starts_idle_at_rest() {
        let (_, mut viz, mut canvas) = setup();
        assert_eq!(viz.state(), &LoopState::Idle);
        assert_eq!(viz.orb(), OrbParams::REST);
        assert_eq!(viz.tick(0.0, &mut canvas), TickOutcome::Idle);
        assert!(canvas.ops.is_empty());
    }

    #[test]
    fn test_play_binds_once() {
        let (source, mut viz, _) = setup();
        viz.set_playing(true, 0.0);
        viz.set_playing(false, 10.0);
        viz.set_playing(true, 20.0);
        assert!(viz.tap().is_bound());
        assert_eq!(source.binds.load(std::sync::atomic::Ordering::SeqCst), 1);
    }

    #[test]
    fn test_skips_until_tap_fills() {
        let (source, mut viz, mut canvas) = setup();
        viz.set_playing(true, 0.0);

        assert_eq!(viz.tick(16.0, &mut canvas), TickOutcome::Skipped);
        assert!(viz.snapshot().is_none());
        assert!(canvas.ops.is_empty());

        source.play(&[0.0; 128]);
        assert_eq!(viz.tick(32.0, &mut canvas), TickOutcome::Drawn);
        assert_eq!(viz.snapshot().unwrap().timestamp, 32.0);
    }

    #[test]
    fn test_silent_playback_runs_on_idle_floor() {
        let (source, mut viz, mut canvas) = setup();
        viz.set_playing(true, 0.0);
        source.play(&[0.0; 128]);
        viz.tick(16.0, &mut canvas);

        let snap = viz.snapshot().unwrap();
        assert!(snap.energy >= 0.04 && snap.energy <= 0.12);
        assert!(viz.motion().pulse > 0.0);
        assert_eq!(canvas.ops[1], Op::GlobalAlpha(PLAYING_DIM));

        let expected = OrbParams::reactive(snap.energy, snap.pulse, PLAYING_DIM);
        assert_eq!(viz.orb(), expected);
    }

    #[test]
    fn test_stop_without_frame_goes_to_rest() {
        let (_, mut viz, mut canvas) = setup();
        viz.set_playing(true, 0.0);
        viz.set_playing(false, 100.0);

        assert_eq!(viz.state(), &LoopState::Idle);
        assert_eq!(viz.orb(), OrbParams::REST);
        assert_eq!(viz.fade_ticks(), 0);

        assert_eq!(viz.tick(116.0, &mut canvas), TickOutcome::Idle);
        assert_eq!(canvas.ops, vec![Op::Clear]);
        // Only once
        viz.tick(132.0, &mut canvas);
        assert_eq!(canvas.ops.len(), 1);
    }

    #[test]
    fn test_fade_replays_snapshot_then_rests() {
        let (source, mut viz, mut canvas) = setup();
        viz.set_playing(true, 0.0);
        source.play(&[0.0; 128]);
        viz.tick(16.0, &mut canvas);
        let snap = viz.snapshot().unwrap().clone();

        viz.set_playing(false, 1000.0);
        assert!(matches!(viz.state(), LoopState::Fading(_)));

        assert_eq!(
            viz.tick(1000.0, &mut canvas),
            TickOutcome::Fading { alpha: 1.0 }
        );
        assert_eq!(viz.tick(1275.0, &mut canvas), TickOutcome::Fading { alpha: 0.5 });
        assert_eq!(viz.orb(), OrbParams::reactive(snap.energy, snap.pulse, 0.5));
        assert_eq!(viz.fade_ticks(), 2);

        canvas.ops.clear();
        assert_eq!(viz.tick(1550.0, &mut canvas), TickOutcome::FadeComplete);
        assert_eq!(canvas.ops, vec![Op::Clear]);
        assert_eq!(viz.state(), &LoopState::Idle);
        assert_eq!(viz.orb(), OrbParams::REST);
        assert_eq!(viz.motion().pulse, 0.0);
        assert_eq!(viz.motion().velocity, 0.0);
        assert!(viz.snapshot().is_none());
    }

    #[test]
    fn test_resume_abandons_fade() {
        let (source, mut viz, mut canvas) = setup();
        viz.set_playing(true, 0.0);
        source.play(&[0.0; 128]);
        viz.tick(16.0, &mut canvas);

        viz.set_playing(false, 100.0);
        viz.tick(200.0, &mut canvas);
        viz.set_playing(true, 250.0);
        assert_eq!(viz.state(), &LoopState::Playing);

        // Pulse was not reset by the abandoned fade
        assert!(viz.motion().pulse != 0.0);
        assert_eq!(viz.tick(266.0, &mut canvas), TickOutcome::Drawn);
    }

    #[test]
    fn test_stop_while_idle_is_noop() {
        let (_, mut viz, _) = setup();
        viz.set_playing(false, 0.0);
        assert_eq!(viz.state(), &LoopState::Idle);
        assert_eq!(viz.fade_ticks(), 0);
    }

    #[test]
    fn test_refused_binding_still_animates() {
        let source = FakeSource::refusing();
        let mut viz = Visualizer::new(source, VizConfig::default());
        let mut canvas = RecordingCanvas::new(576.0, 576.0);

        viz.set_playing(true, 0.0);
        assert!(viz.tap().is_degraded());
        assert_eq!(viz.tick(16.0, &mut canvas), TickOutcome::Drawn);
        assert_eq!(canvas.circles().len(), 120);
    }

    #[test]
    fn test_resume_snapshots_current_audio() {
        let (source, mut viz, mut canvas) = setup();
        viz.set_playing(true, 0.0);
        source.play(&[0.0; 128]);
        viz.tick(16.0, &mut canvas);
        viz.set_playing(false, 100.0);

        // Resume and stop again with no tick in between
        viz.set_playing(true, 210.0);
        viz.set_playing(false, 220.0);
        match viz.state() {
            LoopState::Fading(fade) => {
                assert_eq!(fade.start_timestamp, 220.0);
                assert_eq!(fade.snapshot().timestamp, 210.0);
            }
            other => panic!("expected fade, got {:?}", other),
        }
    }

    #[test]
    fn test_shutdown_mid_fade_stops_drawing() {
        let (source, mut viz, mut canvas) = setup();
        viz.set_playing(true, 0.0);
        source.play(&[0.0; 128]);
        viz.tick(16.0, &mut canvas);
        viz.set_playing(false, 100.0);
        assert!(matches!(viz.tick(150.0, &mut canvas), TickOutcome::Fading { .. }));

        viz.shutdown();
        assert_eq!(viz.state(), &LoopState::Idle);
        assert!(!viz.tap().is_bound());

        canvas.ops.clear();
        assert_eq!(viz.tick(200.0, &mut canvas), TickOutcome::Idle);
        assert!(canvas.circles().is_empty());
        assert_eq!(viz.fade_ticks(), 1);
    }

    #[test]
    fn test_shutdown_releases_context() {
        let (_, mut viz, _) = setup();
        viz.set_playing(true, 0.0);
        viz.shutdown();
        assert_eq!(viz.state(), &LoopState::Idle);
        assert!(!viz.tap().is_bound());
    }
}
