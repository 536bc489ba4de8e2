//! Brightness and contrast correction applied before classification.
//!
//! The default [`ContrastStretch`] runs two steps on a copy of the input:
//! 1. a global gain when the mean intensity is outside `[dark_mean, bright_mean]`;
//! 2. a percentile stretch mapping `[p_lo, p_hi]` onto `[0, 1]`.
//!
//! The output is clamped to `[0, 1]` and keeps the input dimensions. The
//! parameters are fixed per instance, so applying the same preprocessor to
//! its own output repeats the same transformation.
use crate::image::{stats, ImageData, ImageViewMut};
use serde::Deserialize;

/// Keeps the stretch finite when `p_hi == p_lo`.
const STRETCH_EPS: f32 = 1e-8;

/// Collaborator transforming an image to correct exposure problems.
pub trait ImagePreprocessor {
    /// Return a new image of the same dimensions with values in `[0, 1]`.
    fn apply(&self, image: &ImageData) -> ImageData;
}

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(default)]
pub struct PreprocessOptions {
    pub adjust_brightness: bool,
    pub enhance_contrast: bool,
    /// Mean intensity below which `brighten_gain` is applied.
    pub dark_mean: f32,
    pub brighten_gain: f32,
    /// Mean intensity above which `darken_gain` is applied.
    pub bright_mean: f32,
    pub darken_gain: f32,
    /// Lower stretch anchor (percent, 0–100).
    pub low_percentile: f32,
    /// Upper stretch anchor (percent, 0–100).
    pub high_percentile: f32,
}

impl Default for PreprocessOptions {
    fn default() -> Self {
        Self {
            adjust_brightness: true,
            enhance_contrast: true,
            dark_mean: 0.3,
            brighten_gain: 1.5,
            bright_mean: 0.7,
            darken_gain: 0.7,
            low_percentile: 2.0,
            high_percentile: 98.0,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ContrastStretch {
    pub options: PreprocessOptions,
}

impl ContrastStretch {
    pub fn new(options: PreprocessOptions) -> Self {
        Self { options }
    }

    fn brightness_gain(&self, image: &ImageData) -> Option<f32> {
        let opts = &self.options;
        let mean = stats::mean(image);
        if mean < opts.dark_mean {
            Some(opts.brighten_gain)
        } else if mean > opts.bright_mean {
            Some(opts.darken_gain)
        } else {
            None
        }
    }
}

impl ImagePreprocessor for ContrastStretch {
    fn apply(&self, image: &ImageData) -> ImageData {
        let opts = &self.options;
        let mut out = image.clone();

        if opts.adjust_brightness {
            if let Some(gain) = self.brightness_gain(&out) {
                out = out.map(|v| v * gain);
            }
        }

        if opts.enhance_contrast {
            let lo = stats::percentile(&out, opts.low_percentile);
            let hi = stats::percentile(&out, opts.high_percentile);
            let scale = 1.0 / (hi - lo + STRETCH_EPS);
            out = out.map(|v| (v - lo) * scale);
        }

        for y in 0..out.h {
            for v in out.row_mut(y) {
                *v = (*v).clamp(0.0, 1.0);
            }
        }
        out
    }
}
