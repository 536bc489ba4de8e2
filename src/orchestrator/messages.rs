//! Message templates appended to the conversation log by each stage.

use crate::classify::ClassificationResult;
use crate::conversation::{Message, Role};
use crate::quality::QualityReport;

pub(crate) fn quality_summary(report: &QualityReport) -> Message {
    Message::new(
        Role::Preprocessor,
        Role::System,
        format!(
            "Quality analysis: {} (brightness={:.2}, contrast={:.2})",
            report.quality, report.brightness, report.contrast
        ),
    )
}

pub(crate) fn preprocess_delta(before: &QualityReport, after: &QualityReport) -> Message {
    Message::new(
        Role::Preprocessor,
        Role::Classifier,
        format!(
            "Image preprocessed. Brightness {:.2} -> {:.2}, contrast {:.2} -> {:.2}",
            before.brightness, after.brightness, before.contrast, after.contrast
        ),
    )
}

/// Hand-off note; `quality` is always the initial assessment.
pub(crate) fn hand_off(quality: &QualityReport, preprocessed: bool) -> Message {
    let text = if preprocessed {
        format!(
            "Image preprocessed and ready for classification.\n\
             Quality: {}\n\
             Brightness adjusted, contrast enhanced.\n\
             Please classify this galaxy.",
            quality.quality
        )
    } else {
        format!(
            "Image analysed - good quality, no preprocessing needed.\n\
             Brightness: {:.2}, Contrast: {:.2}\n\
             Please classify this galaxy.",
            quality.brightness, quality.contrast
        )
    };
    Message::new(Role::Preprocessor, Role::Classifier, text)
}

pub(crate) fn classification(result: &ClassificationResult) -> Message {
    Message::new(
        Role::Classifier,
        Role::System,
        format!(
            "Classification: {} (confidence={:.2})",
            result.label, result.confidence
        ),
    )
}

pub(crate) fn reprocess_request(result: &ClassificationResult) -> Message {
    Message::new(
        Role::Classifier,
        Role::Preprocessor,
        format!(
            "Low-confidence classification ({:.2}).\n\
             Detected features: variance={:.4}\n\
             Recommend reprocessing the image with a more aggressive contrast adjustment.",
            result.confidence, result.features.variance
        ),
    )
}

/// Preprocessor's answer to a reprocess request. Pairs with
/// [`reprocess_request`] so every retry pass adds exactly two messages to the
/// log, which `expected_message_count` relies on.
pub(crate) fn reprocess_report(
    pass: usize,
    before: &QualityReport,
    after: &QualityReport,
) -> Message {
    Message::new(
        Role::Preprocessor,
        Role::Classifier,
        format!(
            "Image reprocessed (pass {pass}). Brightness {:.2} -> {:.2}, contrast {:.2} -> {:.2}",
            before.brightness, after.brightness, before.contrast, after.contrast
        ),
    )
}

pub(crate) fn final_report(result: &ClassificationResult) -> Message {
    let rule = "=".repeat(50);
    let f = &result.features;
    Message::new(
        Role::Classifier,
        Role::User,
        format!(
            "{rule}\n\
             CLASSIFICATION RESULT\n\
             {rule}\n\
             Type: {}\n\
             Confidence: {:.1}%\n\
             Features:\n   \
             - Variance: {:.4}\n   \
             - Mean brightness: {:.4}\n   \
             - Max intensity: {:.4}\n\
             {rule}",
            result.label.as_str().to_uppercase(),
            result.confidence * 100.0,
            f.variance,
            f.mean_brightness,
            f.max_intensity,
        ),
    )
}
