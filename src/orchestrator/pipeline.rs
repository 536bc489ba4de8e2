//! The confidence-gated preprocess/classify state machine.
//!
//! Stages run strictly in sequence, one collaborator call at a time:
//!
//! ```text
//! Start → QualityCheck → (Preprocess?) → Classify → (Retry)* → Finalize → Done
//! ```
//!
//! All run state lives in a local [`RunState`] moved through the stage
//! functions; the orchestrator itself holds only configuration and the
//! collaborators, so `run` takes `&self`. Each stage validates the image it is
//! about to hand over, and any failure ends the run without recovery.

use super::messages;
use super::params::OrchestratorParams;
use crate::classify::{ClassificationResult, Classifier, MorphologyClassifier};
use crate::conversation::ConversationLog;
use crate::diagnostics::{InputDescriptor, PreprocessStage, RetryPass, RunTrace, TimingBreakdown};
use crate::error::PipelineError;
use crate::image::{io, ImageData};
use crate::preprocess::{ContrastStretch, ImagePreprocessor};
use crate::quality::{IntensityQualityAnalyzer, QualityAnalyzer, QualityReport};
use crate::types::RunResult;
use log::{debug, info};
use std::fmt;
use std::path::Path;
use std::time::Instant;

/// Orchestration stage, used to label log lines and timings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Start,
    QualityCheck,
    Preprocess,
    Classify,
    Retry,
    Finalize,
    Done,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Start => "start",
            Stage::QualityCheck => "quality_check",
            Stage::Preprocess => "preprocess",
            Stage::Classify => "classify",
            Stage::Retry => "retry",
            Stage::Finalize => "finalize",
            Stage::Done => "done",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Working values of one run. `image` and `quality` are rebound after every
/// transformation; `result` is replaced by every classification.
struct RunState {
    image: ImageData,
    quality: QualityReport,
    iteration: usize,
    result: ClassificationResult,
    attempts: Vec<ClassificationResult>,
    retries: Vec<RetryPass>,
}

/// Drives one image through quality check, optional preprocessing,
/// classification and the bounded retry loop.
pub struct Orchestrator {
    params: OrchestratorParams,
    analyzer: Box<dyn QualityAnalyzer>,
    preprocessor: Box<dyn ImagePreprocessor>,
    classifier: Box<dyn Classifier>,
}

impl Default for Orchestrator {
    fn default() -> Self {
        Self::new(OrchestratorParams::default())
    }
}

impl Orchestrator {
    /// Create an orchestrator using the built-in collaborators.
    pub fn new(params: OrchestratorParams) -> Self {
        Self::with_collaborators(
            params,
            IntensityQualityAnalyzer::default(),
            ContrastStretch::default(),
            MorphologyClassifier::default(),
        )
    }

    /// Create an orchestrator around caller-supplied collaborators.
    pub fn with_collaborators(
        params: OrchestratorParams,
        analyzer: impl QualityAnalyzer + 'static,
        preprocessor: impl ImagePreprocessor + 'static,
        classifier: impl Classifier + 'static,
    ) -> Self {
        Self {
            params,
            analyzer: Box::new(analyzer),
            preprocessor: Box::new(preprocessor),
            classifier: Box::new(classifier),
        }
    }

    pub fn params(&self) -> &OrchestratorParams {
        &self.params
    }


    /// Load `path` and run the pipeline on it.
    ///
    /// Load failures are returned as [`PipelineError::Load`]; they are not
    /// retried. Messages are appended to `log`, which is never cleared here.
    pub fn run(&self, path: &Path, log: &mut ConversationLog) -> Result<RunResult, PipelineError> {
        self.params.validate()?;
        debug!("loading {}", path.display());
        let image = io::load_normalized(path, self.params.working_size)?;
        self.run_image(image, log)
    }

    /// Run the pipeline on an image already in memory.
    pub fn run_image(
        &self,
        image: ImageData,
        log: &mut ConversationLog,
    ) -> Result<RunResult, PipelineError> {
        self.params.validate()?;
        let total_start = Instant::now();
        let mut timings = TimingBreakdown::default();
        let input = InputDescriptor {
            width: image.w,
            height: image.h,
            confidence_threshold: self.params.confidence_threshold,
            max_iterations: self.params.max_iterations,
        };
        debug!("{} -> {} ({}x{})", Stage::Start, Stage::QualityCheck, image.w, image.h);

        let t = Instant::now();
        let initial_quality = self.quality_check(&image, log)?;
        timings.push(Stage::QualityCheck.as_str(), elapsed_ms(t));

        let (image, quality, preprocess) = if initial_quality.needs_preprocessing {
            let t = Instant::now();
            let (image, stage) = self.preprocess(image, &initial_quality, log)?;
            timings.push(Stage::Preprocess.as_str(), elapsed_ms(t));
            let quality = stage.after.clone();
            (image, quality, Some(stage))
        } else {
            debug!("quality gate passed, skipping preprocessing");
            (image, initial_quality.clone(), None)
        };
        let preprocessed = preprocess.is_some();
        log.append(messages::hand_off(&initial_quality, preprocessed));

        let t = Instant::now();
        let result = self.classify(&image, log)?;
        timings.push(Stage::Classify.as_str(), elapsed_ms(t));

        let state = RunState {
            image,
            quality,
            iteration: 1,
            result,
            attempts: vec![result],
            retries: Vec::new(),
        };
        let state = self.retry_loop(state, log, &mut timings)?;

        let t = Instant::now();
        debug!("{} after {} iteration(s)", Stage::Finalize, state.iteration);
        log.append(messages::final_report(&state.result));
        timings.push(Stage::Finalize.as_str(), elapsed_ms(t));
        timings.total_ms = elapsed_ms(total_start);

        info!(
            "classified as {} (confidence {:.2}, preprocessed={}, iterations={})",
            state.result.label, state.result.confidence, preprocessed, state.iteration
        );
        debug!("{}", Stage::Done);

        Ok(RunResult {
            success: true,
            label: state.result.label,
            confidence: state.result.confidence,
            preprocessed,
            iterations: state.iteration,
            log: log.snapshot(),
            trace: RunTrace {
                input,
                initial_quality,
                preprocess,
                retries: state.retries,
                attempts: state.attempts,
                timings,
            },
        })
    }

    fn quality_check(
        &self,
        image: &ImageData,
        log: &mut ConversationLog,
    ) -> Result<QualityReport, PipelineError> {
        image.validate()?;
        let report = self.analyzer.analyze(image).reconciled();
        debug!(
            "quality={} brightness={:.3} contrast={:.3} issues=[{}]",
            report.quality,
            report.brightness,
            report.contrast,
            report.issues_summary()
        );
        log.append(messages::quality_summary(&report));
        Ok(report)
    }

    fn preprocess(
        &self,
        image: ImageData,
        before: &QualityReport,
        log: &mut ConversationLog,
    ) -> Result<(ImageData, PreprocessStage), PipelineError> {
        debug!("{} -> {}", Stage::QualityCheck, Stage::Preprocess);
        let (image, after) = self.transform(&image)?;
        log.append(messages::preprocess_delta(before, &after));
        Ok((
            image,
            PreprocessStage {
                before: before.clone(),
                after,
            },
        ))
    }

    /// Apply the preprocessor and re-assess the output for telemetry.
    fn transform(&self, image: &ImageData) -> Result<(ImageData, QualityReport), PipelineError> {
        let out = self.preprocessor.apply(image);
        out.validate()?;
        let quality = self.analyzer.analyze(&out).reconciled();
        debug!(
            "preprocessed: brightness={:.3} contrast={:.3}",
            quality.brightness, quality.contrast
        );
        Ok((out, quality))
    }

    fn classify(
        &self,
        image: &ImageData,
        log: &mut ConversationLog,
    ) -> Result<ClassificationResult, PipelineError> {
        image.validate()?;
        let prediction = self.classifier.classify(image);
        let result = ClassificationResult::gate(prediction, self.params.confidence_threshold);
        debug!(
            "label={} confidence={:.2} variance={:.4} needs_reprocessing={}",
            result.label, result.confidence, result.features.variance, result.needs_reprocessing
        );
        log.append(messages::classification(&result));
        Ok(result)
    }

    /// Re-preprocess and re-classify while confidence stays below the
    /// threshold and attempts remain. Every pass applies the same fixed
    /// transformation to the current image.
    fn retry_loop(
        &self,
        mut state: RunState,
        log: &mut ConversationLog,
        timings: &mut TimingBreakdown,
    ) -> Result<RunState, PipelineError> {
        while state.result.needs_reprocessing && state.iteration < self.params.max_iterations {
            let t = Instant::now();
            let pass = state.iteration;
            debug!(
                "{} pass {pass}: confidence {:.2} < {:.2}",
                Stage::Retry,
                state.result.confidence,
                self.params.confidence_threshold
            );
            let trigger = state.result;
            log.append(messages::reprocess_request(&trigger));

            let (image, quality) = self.transform(&state.image)?;
            log.append(messages::reprocess_report(pass, &state.quality, &quality));

            image.validate()?;
            let prediction = self.classifier.classify(&image);
            let result = ClassificationResult::gate(prediction, self.params.confidence_threshold);
            debug!(
                "reclassified: label={} confidence={:.2}",
                result.label, result.confidence
            );

            state.retries.push(RetryPass {
                pass,
                trigger_confidence: trigger.confidence,
                trigger_variance: trigger.features.variance,
                quality_before: std::mem::replace(&mut state.quality, quality.clone()),
                quality_after: quality,
                confidence_after: result.confidence,
            });
            state.image = image;
            state.result = result;
            state.attempts.push(result);
            state.iteration += 1;
            timings.push(Stage::Retry.as_str(), elapsed_ms(t));
        }

        if state.result.needs_reprocessing {
            debug!(
                "iteration budget of {} exhausted at confidence {:.2}",
                self.params.max_iterations, state.result.confidence
            );
        }
        Ok(state)
    }
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}
