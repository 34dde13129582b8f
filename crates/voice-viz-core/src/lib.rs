//! Audio-reactive visuals for speech playback
//!
//! This crate turns whatever an [`AudioSource`] is playing into a ring of
//! particles and a pulsing orb. It knows nothing about windows or audio
//! devices: the host implements [`AudioSource`] and [`Canvas`], forwards the
//! "is playing" signal, and calls [`Visualizer::tick`] once per frame.

pub mod analyser;
pub mod config;
pub mod draw;
pub mod energy;
pub mod error;
pub mod fade;
pub mod frame;
pub mod orb;
pub mod particles;
pub mod spring;
pub mod tap;
pub mod visualizer;

pub use config::VizConfig;
pub use draw::{Blend, Canvas, Rgb, Rgba};
pub use error::{Result, VizError};
pub use fade::FadeState;
pub use frame::{FrequencyFrame, LastFrameSnapshot};
pub use orb::{AmbientOrb, BlobLayer, OrbParams, BLOB_LAYERS};
pub use particles::ParticleRing;
pub use spring::MotionState;
pub use tap::{AudioSource, CaptureTap, SampleTap};
pub use visualizer::{LoopState, TickOutcome, Visualizer, PLAYING_DIM};
