//! The orb: a free-running ambient layer plus audio-reactive intensity.
//!
//! [`AmbientOrb`] morphs and rotates its blob layers from time alone and never
//! looks at audio. [`OrbParams`] carries the reactive opacity/scale that the
//! window applies on top of it every frame.

use std::f32::consts::TAU;

/// Opacity/scale written every tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbParams {
    /// Soft halo behind the orb
    pub glow: f32,
    /// Highlight sweep over the orb
    pub shine: f32,
    pub orb_scale: f32,
    pub orb_opacity: f32,
}

impl OrbParams {
    /// Values shown when nothing is playing
    pub const REST: OrbParams = OrbParams {
        glow: 0.0,
        shine: 0.0,
        orb_scale: 1.0,
        orb_opacity: 0.12,
    };

    /// Reactive values for `energy` and `pulse`; `intensity` scales every
    /// opacity (playing dim, or the fade alpha).
    pub fn reactive(energy: f32, pulse: f32, intensity: f32) -> Self {
        let unit = |v: f32| v.clamp(0.0, 1.0);
        Self {
            glow: unit((0.12 + energy * 0.7 + pulse * 0.1) * intensity),
            shine: unit((0.12 + energy * 0.65 + pulse * 0.1) * intensity),
            orb_scale: 0.95 + energy * 0.55 + pulse * 0.22,
            orb_opacity: unit((0.3 + energy * 0.6) * intensity),
        }
    }
}

impl Default for OrbParams {
    fn default() -> Self {
        Self::REST
    }
}

/// Radius multiplier per lobe
pub const LOBES: usize = 6;

/// Keyframe shapes the blobs morph through, as lobe radii around a unit circle
const KEYFRAMES: [[f32; LOBES]; 6] = [
    [1.00, 0.96, 1.04, 1.00, 0.97, 1.03],
    [1.06, 0.92, 1.00, 1.05, 0.95, 0.99],
    [0.98, 1.02, 0.94, 1.00, 1.04, 0.96],
    [1.08, 0.95, 1.06, 0.93, 1.02, 1.00],
    [1.04, 1.01, 0.96, 1.07, 0.94, 1.03],
    [0.95, 1.08, 1.00, 0.97, 1.05, 0.92],
];

/// One morphing, rotating blob
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlobLayer {
    /// First keyframe of this layer's cycle
    pub keyframe_offset: usize,
    /// Seconds for a full pass through all keyframes
    pub morph_period: f32,
    /// Seconds per revolution
    pub rotation_period: f32,
    pub counter_clockwise: bool,
    /// Layer opacity before the reactive multiplier
    pub opacity: f32,
    /// Softness of the edge, in blob-radius units
    pub softness: f32,
}

/// Back-to-front: wide glow, soft body, sharp accent
pub const BLOB_LAYERS: [BlobLayer; 3] = [
    BlobLayer {
        keyframe_offset: 0,
        morph_period: 14.0,
        rotation_period: 36.0,
        counter_clockwise: false,
        opacity: 0.95,
        softness: 0.18,
    },
    BlobLayer {
        keyframe_offset: 2,
        morph_period: 11.0,
        rotation_period: 28.0,
        counter_clockwise: true,
        opacity: 0.9,
        softness: 0.08,
    },
    BlobLayer {
        keyframe_offset: 4,
        morph_period: 9.0,
        rotation_period: 22.0,
        counter_clockwise: false,
        opacity: 0.88,
        softness: 0.03,
    },
];

/// Time-only animation of the orb's blob layers
#[derive(Debug, Clone, Default)]
pub struct AmbientOrb;

impl AmbientOrb {
    /// Lobe radii of `layer` at `time_secs`, linearly interpolated between
    /// consecutive keyframes and looping back to the first
    pub fn lobes(layer: &BlobLayer, time_secs: f32) -> [f32; LOBES] {
        let n = KEYFRAMES.len();
        let phase = (time_secs / layer.morph_period).rem_euclid(1.0) * n as f32;
        let seg = (phase.floor() as usize).min(n - 1);
        let frac = phase - seg as f32;

        let a = &KEYFRAMES[(layer.keyframe_offset + seg) % n];
        let b = &KEYFRAMES[(layer.keyframe_offset + seg + 1) % n];
        let mut out = [0.0; LOBES];
        for (i, r) in out.iter_mut().enumerate() {
            *r = a[i] + (b[i] - a[i]) * frac;
        }
        out
    }

    /// Rotation of `layer` at `time_secs`, in radians
    pub fn rotation(layer: &BlobLayer, time_secs: f32) -> f32 {
        let turn = (time_secs / layer.rotation_period).rem_euclid(1.0) * TAU;
        if layer.counter_clockwise {
            -turn
        } else {
            turn
        }
    }

    /// Closed outline of `layer` around the origin with unit mean radius.
    /// Radii are cosine-interpolated between lobes so the edge stays smooth.
    pub fn outline(layer: &BlobLayer, time_secs: f32, segments: usize) -> Vec<(f32, f32)> {
        let lobes = Self::lobes(layer, time_secs);
        let rotation = Self::rotation(layer, time_secs);
        let segments = segments.max(LOBES);

        (0..segments)
            .map(|s| {
                let theta = s as f32 / segments as f32 * TAU;
                let pos = theta / TAU * LOBES as f32;
                let i = (pos.floor() as usize) % LOBES;
                let f = pos - pos.floor();
                let w = (1.0 - (f * std::f32::consts::PI).cos()) / 2.0;
                let r = lobes[i] * (1.0 - w) + lobes[(i + 1) % LOBES] * w;
                let a = theta + rotation;
                (a.cos() * r, a.sin() * r)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rest_values() {
        let rest = OrbParams::default();
        assert_eq!(rest.glow, 0.0);
        assert_eq!(rest.shine, 0.0);
        assert_eq!(rest.orb_scale, 1.0);
        assert_eq!(rest.orb_opacity, 0.12);
    }

    #[test]
    fn test_reactive_formulas() {
        let p = OrbParams::reactive(0.5, 0.3, 1.0);
        assert!((p.glow - (0.12 + 0.35 + 0.03)).abs() < 1e-6);
        assert!((p.shine - (0.12 + 0.325 + 0.03)).abs() < 1e-6);
        assert!((p.orb_scale - (0.95 + 0.275 + 0.066)).abs() < 1e-6);
        assert!((p.orb_opacity - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_opacities_are_clamped() {
        let p = OrbParams::reactive(1.0, 3.0, 1.0);
        assert_eq!(p.glow, 1.0);
        assert_eq!(p.shine, 1.0);
        assert!(p.orb_opacity <= 1.0);

        let p = OrbParams::reactive(0.2, -4.0, 1.0);
        assert_eq!(p.glow, 0.0);
    }

    #[test]
    fn test_intensity_scales_opacity_not_scale() {
        let full = OrbParams::reactive(0.5, 0.3, 1.0);
        let faded = OrbParams::reactive(0.5, 0.3, 0.0);
        assert_eq!(faded.glow, 0.0);
        assert_eq!(faded.orb_opacity, 0.0);
        assert_eq!(faded.orb_scale, full.orb_scale);
    }

    #[test]
    fn test_lobes_loop_back_to_start() {
        let layer = &BLOB_LAYERS[1];
        let start = AmbientOrb::lobes(layer, 0.0);
        let end = AmbientOrb::lobes(layer, layer.morph_period);
        assert_eq!(start, KEYFRAMES[2]);
        for (a, b) in start.iter().zip(end.iter()) {
            assert!((a - b).abs() < 1e-5);
        }
    }

    #[test]
    fn test_lobes_interpolate_between_keyframes() {
        let layer = &BLOB_LAYERS[0];
        // Halfway through the first segment
        let mid = AmbientOrb::lobes(layer, layer.morph_period / 12.0);
        let expected = (KEYFRAMES[0][0] + KEYFRAMES[1][0]) / 2.0;
        assert!((mid[0] - expected).abs() < 1e-4);
    }

    #[test]
    fn test_rotation_direction() {
        let cw = AmbientOrb::rotation(&BLOB_LAYERS[0], 9.0);
        let ccw = AmbientOrb::rotation(&BLOB_LAYERS[1], 7.0);
        assert!((cw - TAU / 4.0).abs() < 1e-5);
        assert!((ccw + TAU / 4.0).abs() < 1e-5);
    }

    #[test]
    fn test_outline_stays_near_unit_circle() {
        for layer in &BLOB_LAYERS {
            for t in [0.0, 1.3, 7.7, 40.0] {
                let outline = AmbientOrb::outline(layer, t, 96);
                assert_eq!(outline.len(), 96);
                for (x, y) in outline {
                    let r = (x * x + y * y).sqrt();
                    assert!(r > 0.85 && r < 1.15, "r={}", r);
                }
            }
        }
    }
}
