//! Scripted collaborators recording the order in which they are called.
use galaxy_pipeline::classify::Features;
use galaxy_pipeline::image::stats;
use galaxy_pipeline::quality::{Quality, QualityIssue, QualityReport};
use galaxy_pipeline::{
    Classifier, GalaxyClass, ImageData, ImagePreprocessor, Prediction, QualityAnalyzer,
};
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Call {
    Analyze,
    Preprocess,
    Classify,
}

pub type CallLog = Rc<RefCell<Vec<Call>>>;

pub fn call_log() -> CallLog {
    Rc::new(RefCell::new(Vec::new()))
}

pub fn count(calls: &CallLog, kind: Call) -> usize {
    calls.borrow().iter().filter(|c| **c == kind).count()
}

/// Returns `first` on the first call and a clean report afterwards.
pub struct ScriptedAnalyzer {
    pub first: QualityReport,
    pub calls: CallLog,
}

impl ScriptedAnalyzer {
    pub fn new(issues: Vec<QualityIssue>, calls: &CallLog) -> Self {
        Self {
            first: QualityReport::from_issues(0.45, 0.08, issues),
            calls: calls.clone(),
        }
    }
}

impl QualityAnalyzer for ScriptedAnalyzer {
    fn analyze(&self, _image: &ImageData) -> QualityReport {
        let seen = count(&self.calls, Call::Analyze);
        self.calls.borrow_mut().push(Call::Analyze);
        if seen == 0 {
            self.first.clone()
        } else {
            QualityReport::from_issues(0.5, 0.25, Vec::new())
        }
    }
}

/// Reports an issue while claiming no preprocessing is needed.
pub struct InconsistentAnalyzer {
    pub calls: CallLog,
}

impl QualityAnalyzer for InconsistentAnalyzer {
    fn analyze(&self, _image: &ImageData) -> QualityReport {
        self.calls.borrow_mut().push(Call::Analyze);
        QualityReport {
            quality: Quality::Good,
            brightness: 0.5,
            contrast: 0.05,
            issues: vec![QualityIssue::LowContrast],
            needs_preprocessing: false,
        }
    }
}

/// Halves every pixel and records the mean of each image it receives.
pub struct HalvingPreprocessor {
    pub calls: CallLog,
    pub input_means: Rc<RefCell<Vec<f32>>>,
}

impl ImagePreprocessor for HalvingPreprocessor {
    fn apply(&self, image: &ImageData) -> ImageData {
        self.calls.borrow_mut().push(Call::Preprocess);
        self.input_means.borrow_mut().push(stats::mean(image));
        image.map(|v| v * 0.5)
    }
}

/// Nudges every pixel towards 0.5 so each pass yields a new value.
pub struct CountingPreprocessor {
    pub calls: CallLog,
}

impl ImagePreprocessor for CountingPreprocessor {
    fn apply(&self, image: &ImageData) -> ImageData {
        self.calls.borrow_mut().push(Call::Preprocess);
        image.map(|v| 0.5 * (v + 0.5))
    }
}

/// Produces values outside `[0, 1]`.
pub struct BrokenPreprocessor;

impl ImagePreprocessor for BrokenPreprocessor {
    fn apply(&self, image: &ImageData) -> ImageData {
        image.map(|v| v + 2.0)
    }
}

/// Replays a fixed list of predictions, repeating the last one once exhausted.
pub struct ScriptedClassifier {
    pub script: Vec<(GalaxyClass, f32)>,
    pub calls: CallLog,
}

impl ScriptedClassifier {
    pub fn new(script: &[(GalaxyClass, f32)], calls: &CallLog) -> Self {
        assert!(!script.is_empty(), "script needs at least one prediction");
        Self {
            script: script.to_vec(),
            calls: calls.clone(),
        }
    }
}

impl Classifier for ScriptedClassifier {
    fn classify(&self, _image: &ImageData) -> Prediction {
        let seen = count(&self.calls, Call::Classify);
        self.calls.borrow_mut().push(Call::Classify);
        let (label, confidence) = self.script[seen.min(self.script.len() - 1)];
        Prediction {
            label,
            confidence,
            features: Features {
                variance: 0.01 * (seen + 1) as f32,
                mean_brightness: 0.5,
                max_intensity: 1.0,
            },
        }
    }
}
