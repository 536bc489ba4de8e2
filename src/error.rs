//! Error taxonomy for a single orchestration run.
//!
//! Low confidence is not an error: it is handled by the retry gate. Everything
//! here is fatal to the current run and is surfaced unchanged to the caller.
use std::path::PathBuf;

/// Shape or range violation detected before an image reaches a collaborator.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum MalformedInputError {
    #[error("image has no pixels")]
    Empty,
    #[error("image {width}x{height} does not match buffer length {len}")]
    ShapeMismatch {
        width: usize,
        height: usize,
        len: usize,
    },
    #[error("image stride {stride} differs from width {width}")]
    StrideMismatch { width: usize, stride: usize },
    #[error("pixel {index} is not finite")]
    NonFinite { index: usize },
    #[error("pixel {index} = {value} lies outside [0, 1]")]
    OutOfRange { index: usize, value: f32 },
}

/// Failure of an orchestration run.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// The image source could not be resolved to image data.
    #[error("failed to load image {}: {source}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Image data broke the shape/range invariants.
    #[error("malformed input: {0}")]
    Malformed(#[from] MalformedInputError),

    /// Orchestrator parameters were rejected.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
