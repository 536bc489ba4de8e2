use crate::classify::GalaxyClass;
use crate::conversation::Message;
use crate::diagnostics::RunTrace;
use serde::Serialize;

/// Outcome of one orchestration run. Built once, after the final message has
/// been appended to the log.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunResult {
    pub success: bool,
    pub label: GalaxyClass,
    pub confidence: f32,
    pub preprocessed: bool,
    /// Classification attempts made, in `1..=max_iterations`.
    pub iterations: usize,
    /// Snapshot of the conversation log taken at the end of the run.
    pub log: Vec<Message>,
    pub trace: RunTrace,
}

impl RunResult {
    /// Number of retry passes beyond the initial classification.
    pub fn retries(&self) -> usize {
        self.iterations.saturating_sub(1)
    }
}
