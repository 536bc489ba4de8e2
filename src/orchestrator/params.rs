//! Parameters of the confidence-gated retry loop.
//!
//! Both values materially change retry behaviour, so they are configuration
//! rather than constants. `working_size` only affects [`Orchestrator::run`],
//! which decodes from disk.
//!
//! [`Orchestrator::run`]: crate::Orchestrator::run

use crate::error::PipelineError;
use crate::image::io::DEFAULT_WORKING_SIZE;
use serde::Deserialize;

pub const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 0.75;
pub const DEFAULT_MAX_ITERATIONS: usize = 3;

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct OrchestratorParams {
    /// Classifications below this confidence trigger another pass.
    pub confidence_threshold: f32,
    /// Upper bound on classification attempts, the first one included.
    pub max_iterations: usize,
    /// Size images are resampled to when loaded from disk; `None` keeps the
    /// decoded size.
    pub working_size: Option<(usize, usize)>,
}

impl Default for OrchestratorParams {
    fn default() -> Self {
        Self {
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            working_size: Some(DEFAULT_WORKING_SIZE),
        }
    }
}

impl OrchestratorParams {
    pub fn validate(&self) -> Result<(), PipelineError> {
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(PipelineError::InvalidConfig(format!(
                "confidence_threshold must lie in [0, 1], got {}",
                self.confidence_threshold
            )));
        }
        if self.max_iterations == 0 {
            return Err(PipelineError::InvalidConfig(
                "max_iterations must be at least 1".to_string(),
            ));
        }
        if let Some((w, h)) = self.working_size {
            if w == 0 || h == 0 {
                return Err(PipelineError::InvalidConfig(format!(
                    "working_size must be positive, got {w}x{h}"
                )));
            }
        }
        Ok(())
    }
}
