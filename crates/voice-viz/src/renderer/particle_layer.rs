//! Retained particle canvas.
//!
//! The visualizer draws into this between frames; `view` replays it with
//! nannou. Like a browser canvas, whatever was drawn last stays on screen until
//! the next clear, so skipped ticks keep showing the previous frame.

use nannou::prelude::*;
use voice_viz_core::{Blend, Canvas, Rgba};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dot {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub color: Rgba,
    /// Global alpha in effect when it was drawn
    pub alpha: f32,
    pub blend: Blend,
}

pub struct ParticleLayer {
    width: f32,
    height: f32,
    dots: Vec<Dot>,
    global_alpha: f32,
    blend: Blend,
}

impl ParticleLayer {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            dots: Vec::new(),
            global_alpha: 1.0,
            blend: Blend::Normal,
        }
    }

    /// Canvas space (top-left origin, y down) to window space around `center`
    pub fn to_world(&self, x: f32, y: f32, center: Vec2, scale: f32) -> Vec2 {
        pt2(
            center.x + (x - self.width / 2.0) * scale,
            center.y + (self.height / 2.0 - y) * scale,
        )
    }

    /// Replay into `draw`, fitting the canvas into a square of side `side`
    pub fn draw(&self, draw: &Draw, center: Vec2, side: f32) {
        let scale = side / self.width.max(self.height).max(1.0);
        let additive = draw.color_blend(BLEND_ADD);

        for dot in &self.dots {
            let target = match dot.blend {
                Blend::Lighter => &additive,
                Blend::Normal => draw,
            };
            let alpha = (dot.color.a * dot.alpha).clamp(0.0, 1.0);
            target
                .ellipse()
                .xy(self.to_world(dot.x, dot.y, center, scale))
                .radius(dot.radius * scale)
                .color(srgba(dot.color.r, dot.color.g, dot.color.b, (alpha * 255.0) as u8));
        }
    }
}

impl Canvas for ParticleLayer {
    fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    fn clear(&mut self) {
        self.dots.clear();
    }

    fn set_global_alpha(&mut self, alpha: f32) {
        self.global_alpha = alpha;
    }

    fn set_blend(&mut self, blend: Blend) {
        self.blend = blend;
    }

    fn fill_circle(&mut self, x: f32, y: f32, radius: f32, color: Rgba) {
        self.dots.push(Dot {
            x,
            y,
            radius,
            color,
            alpha: self.global_alpha,
            blend: self.blend,
        });
    }
}
