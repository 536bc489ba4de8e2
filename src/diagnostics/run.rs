use super::TimingBreakdown;
use crate::classify::ClassificationResult;
use crate::quality::QualityReport;
use serde::Serialize;

/// Telemetry of the initial preprocessing pass.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreprocessStage {
    pub before: QualityReport,
    /// Re-assessment of the transformed image. Informational only: it never
    /// gates the rest of the run.
    pub after: QualityReport,
}

/// One pass of the confidence retry loop.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RetryPass {
    /// 1-based pass number.
    pub pass: usize,
    /// Confidence of the classification that triggered this pass.
    pub trigger_confidence: f32,
    pub trigger_variance: f32,
    pub quality_before: QualityReport,
    pub quality_after: QualityReport,
    pub confidence_after: f32,
}

/// Structured trace of one orchestration run.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunTrace {
    pub input: InputDescriptor,
    pub initial_quality: QualityReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preprocess: Option<PreprocessStage>,
    pub retries: Vec<RetryPass>,
    /// Every classification in order; the last one is the reported result.
    pub attempts: Vec<ClassificationResult>,
    pub timings: TimingBreakdown,
}

impl RunTrace {
    pub fn final_attempt(&self) -> Option<&ClassificationResult> {
        self.attempts.last()
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InputDescriptor {
    pub width: usize,
    pub height: usize,
    pub confidence_threshold: f32,
    pub max_iterations: usize,
}
