//! Ring of audio-reactive particles.
//!
//! One particle per slot around a circle, each listening to its own frequency
//! bin. Radius breathes with energy and pulse, size and alpha sparkle with the
//! particle's bin, and colour washes slowly between the two brand colours
//! regardless of audio. Everything is redrawn from scratch each frame with an
//! additive blend, which is where the glow comes from.

use std::f32::consts::TAU;

use crate::draw::{Blend, Canvas, Rgb, Rgba};
use crate::frame::FrequencyFrame;

/// Base ring radius at zero energy
const BASE_RADIUS: f32 = 140.0;
/// Ring rotation in radians per millisecond
const ROTATION_RATE: f32 = 0.0011;
/// Colour wash speed in radians per millisecond
const COLOR_RATE: f32 = 0.0008;
const DRIFT_RATE: f32 = 0.001;
const JITTER_RATE: f32 = 0.002;
const JITTER_AMOUNT: f32 = 2.0;

/// One computed particle, in canvas coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub color: Rgba,
}

/// Blend factor between the two brand colours for a particle at `angle`
/// (radians) at `time_ms`. 0 at angle 0, time 0; sweeps 0..=1 around the ring.
pub fn color_mix(angle: f32, time_ms: f32) -> f32 {
    (1.0 - (angle + time_ms * COLOR_RATE).cos()) / 2.0
}

pub struct ParticleRing {
    count: usize,
    blue: Rgb,
    orange: Rgb,
}

impl ParticleRing {
    pub fn new(count: usize, blue: Rgb, orange: Rgb) -> Self {
        Self {
            count,
            blue,
            orange,
        }
    }

    /// Colour of a particle at `angle` and `time_ms`
    pub fn color_at(&self, angle: f32, time_ms: f32) -> Rgb {
        self.blue.lerp(self.orange, color_mix(angle, time_ms))
    }

    /// Position, size and colour of particle `i` around `(cx, cy)`
    pub fn particle(
        &self,
        i: usize,
        center: (f32, f32),
        energy: f32,
        pulse: f32,
        frame: &FrequencyFrame,
        time_ms: f64,
    ) -> Particle {
        // Keep the phase terms in range before going to f32
        let time = (time_ms % 1.0e7) as f32;
        let fi = i as f32;
        let t = fi / self.count as f32;
        let angle = t * TAU + time * ROTATION_RATE;

        let bin = (t * frame.len() as f32).floor() as usize;
        let amp = frame.amplitude(bin);

        let base = BASE_RADIUS + energy * 28.0 + pulse * 10.0;
        let drift = 10.0 + energy * 16.0;
        let radius = base + amp * (26.0 + energy * 24.0) + (time * DRIFT_RATE + fi).sin() * drift;
        let jitter = (time * JITTER_RATE + fi * 1.7).sin() * JITTER_AMOUNT;

        let x = center.0 + angle.cos() * radius + (angle * 3.0).cos() * jitter;
        let y = center.1 + angle.sin() * radius + (angle * 2.0).sin() * jitter;

        Particle {
            x,
            y,
            size: 1.6 + amp * 3.2,
            color: self
                .color_at(angle, time)
                .with_alpha(0.14 + amp * 0.5),
        }
    }

    /// Clear `canvas` and draw the full ring at opacity `alpha`
    pub fn draw(
        &self,
        canvas: &mut dyn Canvas,
        energy: f32,
        pulse: f32,
        frame: &FrequencyFrame,
        time_ms: f64,
        alpha: f32,
    ) {
        canvas.clear();
        let (w, h) = canvas.size();
        let center = (w / 2.0, h / 2.0);

        canvas.set_global_alpha(alpha.clamp(0.0, 1.0));
        canvas.set_blend(Blend::Lighter);
        for i in 0..self.count {
            let p = self.particle(i, center, energy, pulse, frame, time_ms);
            canvas.fill_circle(p.x, p.y, p.size, p.color);
        }
        canvas.set_blend(Blend::Normal);
        canvas.set_global_alpha(1.0);
    }
}
