//! Audio playback for generated and local speech.

mod player;

pub use player::{list_output_devices, OutputTap, Player, Track};

/// Failures opening the output device or decoding audio
#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    #[error("no audio output device found")]
    NoDevice,

    #[error("output device '{0}' not found")]
    DeviceNotFound(String),

    #[error("failed to query output config: {0}")]
    Config(#[from] cpal::DefaultStreamConfigError),

    #[error("failed to build output stream: {0}")]
    Build(#[from] cpal::BuildStreamError),

    #[error("failed to start output stream: {0}")]
    Play(#[from] cpal::PlayStreamError),

    #[error("failed to decode WAV: {0}")]
    Decode(#[from] hound::Error),

    #[error("unsupported sample format: {0}")]
    UnsupportedFormat(String),
}
