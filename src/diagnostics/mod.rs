//! Diagnostics data model returned alongside every run.
//!
//! `RunTrace` records what each stage of the orchestrator saw and decided:
//! the initial quality assessment, the optional preprocessing delta, every
//! retry pass and every classification attempt, plus per-stage timings. It
//! complements the human-readable conversation log with structured values.

pub mod run;
pub mod timing;

pub use run::{InputDescriptor, PreprocessStage, RetryPass, RunTrace};
pub use timing::{StageTiming, TimingBreakdown};
