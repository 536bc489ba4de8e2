//! Galaxy morphology classification.
//!
//! A classifier collaborator returns a raw [`Prediction`]. The orchestrator
//! gates it against its configured confidence threshold to obtain a
//! [`ClassificationResult`], so `needs_reprocessing` always refers to the
//! threshold of the run that produced it.
//!
//! [`MorphologyClassifier`] is a fixed heuristic: spiral arms add pixel
//! variance, elliptical profiles are smooth. It is deterministic and has no
//! learned parameters.
use crate::image::{stats, ImageData};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GalaxyClass {
    Spiral,
    Elliptical,
}

impl GalaxyClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            GalaxyClass::Spiral => "spiral",
            GalaxyClass::Elliptical => "elliptical",
        }
    }
}

impl fmt::Display for GalaxyClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Summary statistics the classifier based its decision on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Features {
    pub variance: f32,
    pub mean_brightness: f32,
    pub max_intensity: f32,
}

impl Features {
    /// Measure the image, rounding each value to 4 decimals.
    pub fn measure(image: &ImageData) -> Self {
        Self {
            variance: stats::round_to(stats::variance(image), 4),
            mean_brightness: stats::round_to(stats::mean(image), 4),
            max_intensity: stats::round_to(stats::max(image), 4),
        }
    }
}

/// Raw classifier output before confidence gating.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Prediction {
    pub label: GalaxyClass,
    pub confidence: f32,
    pub features: Features,
}

/// Prediction gated against a confidence threshold.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ClassificationResult {
    pub label: GalaxyClass,
    /// Always within `[0, 1]`.
    pub confidence: f32,
    pub features: Features,
    /// `confidence < threshold` for the threshold this result was gated with.
    pub needs_reprocessing: bool,
}

impl ClassificationResult {
    pub fn gate(prediction: Prediction, threshold: f32) -> Self {
        let confidence = if prediction.confidence.is_finite() {
            prediction.confidence.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self {
            label: prediction.label,
            confidence,
            features: prediction.features,
            needs_reprocessing: confidence < threshold,
        }
    }
}

/// Collaborator predicting a galaxy class. Must be pure.
pub trait Classifier {
    fn classify(&self, image: &ImageData) -> Prediction;
}

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(default)]
pub struct ClassifierOptions {
    /// Variance above which an image is called spiral.
    pub variance_split: f32,
    pub base_confidence: f32,
    /// Confidence gained per unit of variance distance from the split.
    pub variance_gain: f32,
    pub max_confidence: f32,
    /// Mean brightness below which confidence is penalised.
    pub dark_mean: f32,
    pub dark_penalty: f32,
}

impl Default for ClassifierOptions {
    fn default() -> Self {
        Self {
            variance_split: 0.015,
            base_confidence: 0.65,
            variance_gain: 10.0,
            max_confidence: 0.92,
            dark_mean: 0.3,
            dark_penalty: 0.85,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct MorphologyClassifier {
    pub options: ClassifierOptions,
}

impl MorphologyClassifier {
    pub fn new(options: ClassifierOptions) -> Self {
        Self { options }
    }
}

impl Classifier for MorphologyClassifier {
    fn classify(&self, image: &ImageData) -> Prediction {
        let opts = &self.options;
        let variance = stats::variance(image);
        let mean = stats::mean(image);

        let (label, distance) = if variance > opts.variance_split {
            (GalaxyClass::Spiral, variance)
        } else {
            (GalaxyClass::Elliptical, opts.variance_split - variance)
        };
        let mut confidence =
            (opts.base_confidence + distance * opts.variance_gain).min(opts.max_confidence);
        if mean < opts.dark_mean {
            confidence *= opts.dark_penalty;
        }

        Prediction {
            label,
            confidence: stats::round_to(confidence, 2),
            features: Features::measure(image),
        }
    }
}
