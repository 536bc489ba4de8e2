#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod conversation;
pub mod diagnostics;
pub mod error;
pub mod image;
pub mod orchestrator;
pub mod types;

// Collaborators consumed by the orchestrator, each with a default heuristic.
pub mod classify;
pub mod preprocess;
pub mod quality;

// Outer surfaces used by the binaries.
pub mod config;
pub mod dataset;

// --- High-level re-exports -------------------------------------------------

// Main entry points: orchestrator + results.
pub use crate::orchestrator::{Orchestrator, OrchestratorParams};
pub use crate::types::RunResult;

pub use crate::conversation::{ConversationLog, Message, Role};
pub use crate::error::{MalformedInputError, PipelineError};
pub use crate::image::ImageData;

// Collaborator seams.
pub use crate::classify::{ClassificationResult, Classifier, GalaxyClass, Prediction};
pub use crate::preprocess::ImagePreprocessor;
pub use crate::quality::{QualityAnalyzer, QualityReport};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use galaxy_pipeline::prelude::*;
/// use std::path::Path;
///
/// # fn main() -> Result<(), PipelineError> {
/// let orchestrator = Orchestrator::new(OrchestratorParams::default());
/// let mut log = ConversationLog::new();
///
/// let result = orchestrator.run(Path::new("data/samples/spiral_00.png"), &mut log)?;
/// println!("{} conf={:.2} iterations={}", result.label, result.confidence, result.iterations);
/// # Ok(())
/// # }
/// ```
pub mod prelude {
    pub use crate::image::ImageF32;
    pub use crate::{
        ConversationLog, GalaxyClass, Orchestrator, OrchestratorParams, PipelineError, RunResult,
    };
}
