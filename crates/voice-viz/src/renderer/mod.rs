//! Window-side drawing: the orb and the particle canvas.

mod orb_view;
mod particle_layer;

pub use orb_view::{OrbPalette, OrbView};
pub use particle_layer::ParticleLayer;
