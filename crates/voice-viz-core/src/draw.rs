//! Drawing surface abstraction.
//!
//! The engine draws in canvas space: origin at the top-left corner, y growing
//! downwards, units in logical pixels. The window layer implements [`Canvas`]
//! on top of `nannou::Draw`; tests implement it with a recorder.

use serde::{Deserialize, Serialize};

/// Opaque 8-bit RGB colour. Serialized as `[r, g, b]`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "[u8; 3]", into = "[u8; 3]")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Linear interpolation towards `other`, rounding each channel.
    /// `t` is clamped to [0, 1].
    pub fn lerp(self, other: Rgb, t: f32) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Rgb::new(mix(self.r, other.r), mix(self.g, other.g), mix(self.b, other.b))
    }

    pub fn with_alpha(self, a: f32) -> Rgba {
        Rgba {
            r: self.r,
            g: self.g,
            b: self.b,
            a,
        }
    }
}

impl From<[u8; 3]> for Rgb {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self::new(r, g, b)
    }
}

impl From<Rgb> for [u8; 3] {
    fn from(c: Rgb) -> Self {
        [c.r, c.g, c.b]
    }
}

/// RGB colour with a straight alpha in [0, 1]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub fn rgb(&self) -> Rgb {
        Rgb::new(self.r, self.g, self.b)
    }
}

/// Compositing mode for subsequent fills
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum Blend {
    /// Source-over
    #[default]
    Normal,
    /// Additive: overlapping fills brighten instead of occluding
    Lighter,
}

/// A 2D immediate-mode drawing surface.
pub trait Canvas {
    /// Logical (width, height)
    fn size(&self) -> (f32, f32);

    /// Wipe everything drawn so far
    fn clear(&mut self);

    /// Multiplier applied to the alpha of every later fill
    fn set_global_alpha(&mut self, alpha: f32);

    fn set_blend(&mut self, blend: Blend);

    /// Fill a circle centred at (x, y)
    fn fill_circle(&mut self, x: f32, y: f32, radius: f32, color: Rgba);
}
