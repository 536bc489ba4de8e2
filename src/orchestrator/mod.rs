//! Orchestration of the two-stage preprocess → classify pipeline.
//!
//! Overview
//! - Assesses image quality once. An image with any issue (too dark, too
//!   bright, low contrast) is preprocessed before classification.
//! - Classifies the current image and gates the confidence against
//!   `confidence_threshold`.
//! - While confidence stays below the threshold and fewer than
//!   `max_iterations` attempts have been made, re-applies the same
//!   preprocessing to the current image and classifies again. The latest
//!   classification always replaces the previous one.
//! - Every decision is appended to a caller-owned [`ConversationLog`]; the
//!   final [`RunResult`] carries a snapshot of it plus a structured trace.
//!
//! Modules
//! - [`params`] – loop configuration (`OrchestratorParams`).
//! - `pipeline` – the [`Orchestrator`] state machine.
//! - `messages` – text templates for the conversation log.
//!
//! Message count per run: 3 fixed messages (quality summary, hand-off,
//! first classification), 1 if the image was preprocessed, 2 per retry pass
//! and 1 final report.
//!
//! [`ConversationLog`]: crate::conversation::ConversationLog
//! [`RunResult`]: crate::types::RunResult

mod messages;
pub mod params;
mod pipeline;

pub use params::{OrchestratorParams, DEFAULT_CONFIDENCE_THRESHOLD, DEFAULT_MAX_ITERATIONS};
pub use pipeline::{Orchestrator, Stage};

/// Number of messages one run appends to the log.
pub fn expected_message_count(preprocessed: bool, iterations: usize) -> usize {
    3 + usize::from(preprocessed) + 2 * iterations.saturating_sub(1) + 1
}
