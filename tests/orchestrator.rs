mod common;

use common::fakes::{
    call_log, count, BrokenPreprocessor, Call, CallLog, CountingPreprocessor, HalvingPreprocessor,
    InconsistentAnalyzer, ScriptedAnalyzer, ScriptedClassifier,
};
use common::synthetic_image::well_exposed;
use galaxy_pipeline::orchestrator::expected_message_count;
use galaxy_pipeline::quality::{Quality, QualityIssue};
use galaxy_pipeline::{
    ConversationLog, GalaxyClass, ImageData, MalformedInputError, Orchestrator,
    OrchestratorParams, PipelineError, Role,
};
use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use galaxy_pipeline::GalaxyClass::{Elliptical, Spiral};

fn orchestrator(
    params: OrchestratorParams,
    issues: Vec<QualityIssue>,
    script: &[(GalaxyClass, f32)],
    calls: &CallLog,
) -> Orchestrator {
    Orchestrator::with_collaborators(
        params,
        ScriptedAnalyzer::new(issues, calls),
        CountingPreprocessor {
            calls: calls.clone(),
        },
        ScriptedClassifier::new(script, calls),
    )
}

fn image() -> ImageData {
    well_exposed(16, 16)
}

fn roles(log: &[galaxy_pipeline::Message]) -> Vec<(Role, Role)> {
    log.iter().map(|m| (m.from, m.to)).collect()
}

#[test]
fn clean_image_is_classified_without_preprocessing() {
    let _ = env_logger::builder().is_test(true).try_init();
    let calls = call_log();
    let orch = orchestrator(OrchestratorParams::default(), vec![], &[(Spiral, 0.9)], &calls);
    let mut log = ConversationLog::new();

    let result = orch.run_image(image(), &mut log).expect("run succeeds");

    assert!(result.success);
    assert!(!result.preprocessed);
    assert_eq!(result.iterations, 1);
    assert_eq!(*calls.borrow(), vec![Call::Analyze, Call::Classify]);
    assert!(result.trace.preprocess.is_none());
    assert!(result.log[1]
        .text
        .starts_with("Image analysed - good quality, no preprocessing needed."));
    assert!(result.log[1].text.contains("Brightness: 0.45, Contrast: 0.08"));
}

#[test]
fn clean_image_is_not_preprocessed_before_first_classification_even_when_retrying() {
    let calls = call_log();
    let orch = orchestrator(
        OrchestratorParams::default(),
        vec![],
        &[(Spiral, 0.4), (Spiral, 0.9)],
        &calls,
    );
    let mut log = ConversationLog::new();

    let result = orch.run_image(image(), &mut log).unwrap();

    let calls = calls.borrow();
    let first_classify = calls.iter().position(|c| *c == Call::Classify).unwrap();
    assert!(!calls[..first_classify].contains(&Call::Preprocess));
    assert!(!result.preprocessed);
    assert_eq!(result.iterations, 2);
}

#[test]
fn scenario_a_single_issue_triggers_preprocessing() {
    let calls = call_log();
    let orch = orchestrator(
        OrchestratorParams::default(),
        vec![QualityIssue::LowContrast],
        &[(Elliptical, 0.85)],
        &calls,
    );
    let mut log = ConversationLog::new();

    let result = orch.run_image(image(), &mut log).unwrap();

    assert_eq!(result.trace.initial_quality.quality, Quality::Acceptable);
    assert!(result.preprocessed);
    assert_eq!(result.iterations, 1);
    assert_eq!(count(&calls, Call::Preprocess), 1);
    // Telemetry re-assessment after the transformation.
    assert_eq!(count(&calls, Call::Analyze), 2);
    assert_eq!(
        roles(&result.log),
        vec![
            (Role::Preprocessor, Role::System),
            (Role::Preprocessor, Role::Classifier),
            (Role::Preprocessor, Role::Classifier),
            (Role::Classifier, Role::System),
            (Role::Classifier, Role::User),
        ]
    );
    assert_eq!(
        result.log[1].text,
        "Image preprocessed. Brightness 0.45 -> 0.50, contrast 0.08 -> 0.25"
    );
    assert!(result.log[2].text.starts_with("Image preprocessed and ready"));
}

#[test]
fn scenario_b_second_attempt_replaces_first() {
    let calls = call_log();
    let orch = orchestrator(
        OrchestratorParams::default(),
        vec![],
        &[(Spiral, 0.60), (Elliptical, 0.80)],
        &calls,
    );
    let mut log = ConversationLog::new();

    let result = orch.run_image(image(), &mut log).unwrap();

    assert_eq!(result.iterations, 2);
    assert_eq!(result.label, Elliptical);
    assert_eq!(result.confidence, 0.80);
    assert_eq!(result.trace.attempts.len(), 2);
    assert_eq!(result.trace.retries.len(), 1);
    assert_eq!(result.trace.retries[0].trigger_confidence, 0.60);
    assert_eq!(
        roles(&result.log),
        vec![
            (Role::Preprocessor, Role::System),
            (Role::Preprocessor, Role::Classifier),
            (Role::Classifier, Role::System),
            (Role::Classifier, Role::Preprocessor),
            (Role::Preprocessor, Role::Classifier),
            (Role::Classifier, Role::User),
        ]
    );
    let request = &result.log[3].text;
    assert!(request.contains("(0.60)"), "{request}");
    assert!(request.contains("variance=0.0100"), "{request}");
    assert!(result.log[5].text.contains("Type: ELLIPTICAL"));
    assert!(result.log[5].text.contains("Confidence: 80.0%"));
}

#[test]
fn scenario_c_loop_exits_on_iteration_bound() {
    let calls = call_log();
    let orch = orchestrator(OrchestratorParams::default(), vec![], &[(Spiral, 0.50)], &calls);
    let mut log = ConversationLog::new();

    let result = orch.run_image(image(), &mut log).unwrap();

    assert_eq!(result.iterations, 3);
    assert_eq!(result.confidence, 0.50);
    assert!(result.trace.final_attempt().unwrap().needs_reprocessing);
    assert_eq!(count(&calls, Call::Classify), 3);
    assert_eq!(count(&calls, Call::Preprocess), 2);
    assert_eq!(result.log.len(), expected_message_count(false, 3));
    let retry_entries = result
        .trace
        .timings
        .stages
        .iter()
        .filter(|s| s.label == "retry")
        .count();
    assert_eq!(retry_entries, 2);
}

#[test]
fn exhausted_budget_reports_last_attempt() {
    let calls = call_log();
    let orch = orchestrator(
        OrchestratorParams::default(),
        vec![QualityIssue::TooDark],
        &[(Spiral, 0.50), (Elliptical, 0.55), (Spiral, 0.60)],
        &calls,
    );
    let mut log = ConversationLog::new();

    let result = orch.run_image(image(), &mut log).unwrap();

    assert_eq!(result.iterations, 3);
    assert_eq!(result.label, Spiral);
    assert_eq!(result.confidence, 0.60);
    assert_eq!(result.trace.attempts.last().unwrap().confidence, 0.60);
    // One initial pass plus two retries.
    assert_eq!(count(&calls, Call::Preprocess), 3);
}

#[test]
fn confident_first_attempt_skips_retry_messages() {
    let calls = call_log();
    let orch = orchestrator(OrchestratorParams::default(), vec![], &[(Spiral, 0.75)], &calls);
    let mut log = ConversationLog::new();

    let result = orch.run_image(image(), &mut log).unwrap();

    assert_eq!(result.iterations, 1);
    assert!(result
        .log
        .iter()
        .all(|m| !(m.from == Role::Classifier && m.to == Role::Preprocessor)));
    assert!(result.trace.retries.is_empty());
}

#[test]
fn iterations_stay_within_budget_for_any_limit() {
    for max_iterations in 1..=5 {
        for issues in [vec![], vec![QualityIssue::LowContrast]] {
            let calls = call_log();
            let preprocessed = !issues.is_empty();
            let params = OrchestratorParams {
                max_iterations,
                ..Default::default()
            };
            let orch = orchestrator(params, issues, &[(Elliptical, 0.1)], &calls);
            let mut log = ConversationLog::new();

            let result = orch.run_image(image(), &mut log).unwrap();

            assert!(result.iterations >= 1 && result.iterations <= max_iterations);
            assert_eq!(result.iterations, max_iterations);
            assert_eq!(result.retries(), max_iterations - 1);
            assert_eq!(
                count(&calls, Call::Preprocess),
                max_iterations - 1 + usize::from(preprocessed)
            );
            assert_eq!(
                result.log.len(),
                expected_message_count(preprocessed, result.iterations)
            );
        }
    }
}

#[test]
fn threshold_comes_from_params() {
    let calls = call_log();
    let params = OrchestratorParams {
        confidence_threshold: 0.5,
        ..Default::default()
    };
    let orch = orchestrator(params, vec![], &[(Spiral, 0.6)], &calls);
    let mut log = ConversationLog::new();

    let result = orch.run_image(image(), &mut log).unwrap();

    assert_eq!(result.iterations, 1);
    assert!(!result.trace.attempts[0].needs_reprocessing);
}

#[test]
fn log_accumulates_until_caller_clears_it() {
    let calls = call_log();
    let orch = orchestrator(OrchestratorParams::default(), vec![], &[(Spiral, 0.9)], &calls);
    let mut log = ConversationLog::new();

    let first = orch.run_image(image(), &mut log).unwrap();
    let second = orch.run_image(image(), &mut log).unwrap();
    assert_eq!(first.log.len(), 4);
    assert_eq!(second.log.len(), 8);
    assert_eq!(second.log[..4], first.log[..]);

    log.clear();
    let third = orch.run_image(image(), &mut log).unwrap();
    assert_eq!(third.log.len(), 4);
}

#[test]
fn malformed_image_fails_before_any_collaborator() {
    let calls = call_log();
    let orch = orchestrator(OrchestratorParams::default(), vec![], &[(Spiral, 0.9)], &calls);
    let mut log = ConversationLog::new();
    let mut bad = image();
    bad.data[3] = f32::NAN;

    let err = orch.run_image(bad, &mut log).unwrap_err();

    assert!(matches!(
        err,
        PipelineError::Malformed(MalformedInputError::NonFinite { index: 3 })
    ));
    assert!(calls.borrow().is_empty());
    assert!(log.is_empty());
}

#[test]
fn preprocessor_output_is_validated() {
    let calls = call_log();
    let orch = Orchestrator::with_collaborators(
        OrchestratorParams::default(),
        ScriptedAnalyzer::new(vec![QualityIssue::TooBright], &calls),
        BrokenPreprocessor,
        ScriptedClassifier::new(&[(Spiral, 0.9)], &calls),
    );
    let mut log = ConversationLog::new();

    let err = orch.run_image(image(), &mut log).unwrap_err();

    assert!(matches!(
        err,
        PipelineError::Malformed(MalformedInputError::OutOfRange { .. })
    ));
    assert_eq!(count(&calls, Call::Classify), 0);
}

#[test]
fn invalid_params_are_rejected() {
    let calls = call_log();
    let params = OrchestratorParams {
        max_iterations: 0,
        ..Default::default()
    };
    let orch = orchestrator(params, vec![], &[(Spiral, 0.9)], &calls);
    let mut log = ConversationLog::new();

    let err = orch.run_image(image(), &mut log).unwrap_err();
    assert!(matches!(err, PipelineError::InvalidConfig(_)));
}

#[test]
fn missing_file_surfaces_load_error() {
    let orch = Orchestrator::default();
    let mut log = ConversationLog::new();

    let err = orch
        .run(Path::new("does/not/exist/galaxy.png"), &mut log)
        .unwrap_err();

    match err {
        PipelineError::Load { path, .. } => {
            assert_eq!(path, Path::new("does/not/exist/galaxy.png"))
        }
        other => panic!("expected load error, got {other:?}"),
    }
    assert!(log.is_empty());
}

#[test]
fn issues_trigger_preprocessing_even_if_report_flag_disagrees() {
    let calls = call_log();
    let orch = Orchestrator::with_collaborators(
        OrchestratorParams::default(),
        InconsistentAnalyzer {
            calls: calls.clone(),
        },
        CountingPreprocessor {
            calls: calls.clone(),
        },
        ScriptedClassifier::new(&[(Spiral, 0.9)], &calls),
    );
    let mut log = ConversationLog::new();

    let result = orch.run_image(image(), &mut log).unwrap();

    assert!(result.preprocessed);
    assert_eq!(count(&calls, Call::Preprocess), 1);
    assert!(result.trace.initial_quality.needs_preprocessing);
    assert_eq!(result.trace.initial_quality.quality, Quality::Acceptable);
    assert_eq!(result.log.len(), expected_message_count(true, 1));
}

#[test]
fn each_retry_transforms_the_latest_image() {
    let calls = call_log();
    let input_means = Rc::new(RefCell::new(Vec::new()));
    let orch = Orchestrator::with_collaborators(
        OrchestratorParams::default(),
        ScriptedAnalyzer::new(vec![QualityIssue::TooBright], &calls),
        HalvingPreprocessor {
            calls: calls.clone(),
            input_means: input_means.clone(),
        },
        ScriptedClassifier::new(&[(Spiral, 0.3)], &calls),
    );
    let mut log = ConversationLog::new();

    let result = orch.run_image(image(), &mut log).unwrap();

    assert_eq!(result.iterations, 3);
    // Initial pass plus two retries, each fed the previous output.
    let means = input_means.borrow();
    assert_eq!(means.len(), 3);
    for (i, expected) in [0.5f32, 0.25, 0.125].iter().enumerate() {
        assert!((means[i] - expected).abs() < 1e-6, "pass {i}: {}", means[i]);
    }
}
