//! Image quality assessment used by the quality gate.
//!
//! Brightness is the mean intensity and contrast the population standard
//! deviation, both over normalized `[0, 1]` pixels. Each measurement that
//! falls outside its band contributes one [`QualityIssue`]; the issue count
//! alone decides the overall [`Quality`] grade and whether the image should
//! be preprocessed.
use crate::image::{stats, ImageData};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Overall grade derived from the number of detected issues.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    Good,
    Acceptable,
    Poor,
}

impl Quality {
    /// 0 issues → good, 1 → acceptable, anything more → poor.
    pub fn from_issue_count(count: usize) -> Self {
        match count {
            0 => Quality::Good,
            1 => Quality::Acceptable,
            _ => Quality::Poor,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Quality::Good => "good",
            Quality::Acceptable => "acceptable",
            Quality::Poor => "poor",
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityIssue {
    TooDark,
    TooBright,
    LowContrast,
}

impl QualityIssue {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityIssue::TooDark => "too dark",
            QualityIssue::TooBright => "too bright",
            QualityIssue::LowContrast => "low contrast",
        }
    }
}

impl fmt::Display for QualityIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one quality assessment. Immutable once built; a re-assessment
/// after preprocessing produces a fresh report.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct QualityReport {
    pub quality: Quality,
    pub brightness: f32,
    pub contrast: f32,
    pub issues: Vec<QualityIssue>,
    /// Always equal to `!issues.is_empty()`.
    pub needs_preprocessing: bool,
}

impl QualityReport {
    /// Build a report, deriving the grade and the preprocessing flag from
    /// `issues`.
    pub fn from_issues(brightness: f32, contrast: f32, issues: Vec<QualityIssue>) -> Self {
        Self {
            quality: Quality::from_issue_count(issues.len()),
            brightness,
            contrast,
            needs_preprocessing: !issues.is_empty(),
            issues,
        }
    }

    /// Re-derive `quality` and `needs_preprocessing` from `issues`, so a
    /// report built field by field cannot disagree with its own issue list.
    pub fn reconciled(self) -> Self {
        Self::from_issues(self.brightness, self.contrast, self.issues)
    }

    /// Issues joined for display, or `"none"`.
    pub fn issues_summary(&self) -> String {
        if self.issues.is_empty() {
            return "none".to_string();
        }
        self.issues
            .iter()
            .map(QualityIssue::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Collaborator measuring image quality. Must be pure: the same image always
/// yields the same report.
pub trait QualityAnalyzer {
    fn analyze(&self, image: &ImageData) -> QualityReport;
}

/// Bands outside of which a measurement counts as an issue.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityThresholds {
    /// Mean intensity below this is "too dark".
    pub dark_below: f32,
    /// Mean intensity above this is "too bright".
    pub bright_above: f32,
    /// Standard deviation below this is "low contrast".
    pub low_contrast_below: f32,
}

impl Default for QualityThresholds {
    fn default() -> Self {
        Self {
            dark_below: 0.2,
            bright_above: 0.8,
            low_contrast_below: 0.1,
        }
    }
}

/// Default analyzer: mean/std thresholds, measurements rounded to 3 decimals.
#[derive(Clone, Debug, Default)]
pub struct IntensityQualityAnalyzer {
    pub thresholds: QualityThresholds,
}

impl IntensityQualityAnalyzer {
    pub fn new(thresholds: QualityThresholds) -> Self {
        Self { thresholds }
    }
}

impl QualityAnalyzer for IntensityQualityAnalyzer {
    fn analyze(&self, image: &ImageData) -> QualityReport {
        let brightness = stats::mean(image);
        let contrast = stats::std_dev(image);
        let t = &self.thresholds;

        let mut issues = Vec::with_capacity(2);
        if brightness < t.dark_below {
            issues.push(QualityIssue::TooDark);
        } else if brightness > t.bright_above {
            issues.push(QualityIssue::TooBright);
        }
        if contrast < t.low_contrast_below {
            issues.push(QualityIssue::LowContrast);
        }

        QualityReport::from_issues(
            stats::round_to(brightness, 3),
            stats::round_to(contrast, 3),
            issues,
        )
    }
}
