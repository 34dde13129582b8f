//! Error types for the visualization engine.

/// Result type alias for visualizer operations.
pub type Result<T> = std::result::Result<T, VizError>;

/// Failures that can occur inside the capture/analysis path.
///
/// None of these are fatal: the animation loop absorbs them and keeps the
/// idle animation running.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum VizError {
    /// The analyser could not attach to the audio source
    #[error("failed to bind analyser to audio source: {0}")]
    BindingFailure(String),

    /// The analyser has no usable data yet (not bound, suspended, or still filling)
    #[error("frequency frame not ready")]
    FrameNotReady,
}
