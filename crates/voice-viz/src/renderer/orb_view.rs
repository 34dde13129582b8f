//! The orb behind the particle ring.
//!
//! Back to front: glow halo, the three morphing blobs, then the silver sheen.
//! Shapes come from [`AmbientOrb`] on time alone; every opacity is scaled by
//! the reactive [`OrbParams`].

use nannou::prelude::*;
use voice_viz_core::{AmbientOrb, OrbParams, Rgb, BLOB_LAYERS};

/// Outline resolution of each blob
const BLOB_SEGMENTS: usize = 96;
/// Rings used to fake a soft edge
const GLOW_RINGS: usize = 12;

/// Sheen offset and radius, as fractions of the orb radius
const SHEEN_OFFSET: (f32, f32) = (-0.1, 0.3);
const SHEEN_RADIUS: f32 = 0.45;

pub struct OrbPalette {
    pub blue: Rgb,
    pub blue_soft: Rgb,
    pub orange: Rgb,
    pub silver: Rgb,
}

fn color(c: Rgb, alpha: f32) -> Srgba<u8> {
    srgba(c.r, c.g, c.b, (alpha.clamp(0.0, 1.0) * 255.0) as u8)
}

pub struct OrbView {
    palette: OrbPalette,
}

impl OrbView {
    pub fn new(palette: OrbPalette) -> Self {
        Self { palette }
    }

    /// Draw the orb of base `radius` around `center` at `time_secs`
    pub fn draw(&self, draw: &Draw, center: Vec2, radius: f32, params: &OrbParams, time_secs: f32) {
        let r = radius * params.orb_scale;

        // Glow: stacked discs, faint and wide
        if params.glow > 0.0 {
            for i in 0..GLOW_RINGS {
                let t = i as f32 / GLOW_RINGS as f32;
                let ring_r = r * (1.6 - t * 0.6);
                let alpha = params.glow * 0.12 * (0.3 + t);
                draw.ellipse()
                    .xy(center)
                    .radius(ring_r)
                    .color(color(self.palette.blue_soft, alpha));
            }
        }

        let layer_colors = [self.palette.blue, self.palette.blue_soft, self.palette.orange];
        for (i, layer) in BLOB_LAYERS.iter().enumerate() {
            let layer_r = r * (1.0 - i as f32 * 0.14);
            let alpha = layer.opacity * params.orb_opacity;
            let outline = AmbientOrb::outline(layer, time_secs, BLOB_SEGMENTS);

            // Soft edge first, then the body
            let edge_scale = layer_r * (1.0 + layer.softness);
            draw.polygon()
                .points(outline.iter().map(|&(x, y)| pt2(center.x + x * edge_scale, center.y + y * edge_scale)))
                .color(color(layer_colors[i], alpha * 0.35));
            draw.polygon()
                .points(outline.iter().map(|&(x, y)| pt2(center.x + x * layer_r, center.y + y * layer_r)))
                .color(color(layer_colors[i], alpha));
        }

        // Sheen
        if params.shine > 0.0 {
            let sheen_center = center + vec2(SHEEN_OFFSET.0, SHEEN_OFFSET.1) * r;
            let sheen_r = r * SHEEN_RADIUS;
            for i in 0..GLOW_RINGS / 2 {
                let t = i as f32 / (GLOW_RINGS / 2) as f32;
                draw.ellipse()
                    .xy(sheen_center)
                    .radius(sheen_r * (1.0 - t * 0.7))
                    .color(color(self.palette.silver, params.shine * 0.15));
            }
        }
    }
}
