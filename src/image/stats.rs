//! Intensity statistics over float images.
//!
//! Sums are accumulated in `f64`; the results are returned as `f32` to match
//! the pixel type. Variance is the population variance (divide by N).
use super::ImageView;

/// Mean intensity. Returns 0 for an empty image.
pub fn mean<I: ImageView<Pixel = f32>>(img: &I) -> f32 {
    let n = img.width() * img.height();
    if n == 0 {
        return 0.0;
    }
    let sum: f64 = img.pixels().map(|&v| v as f64).sum();
    (sum / n as f64) as f32
}

/// Population variance of the intensities.
pub fn variance<I: ImageView<Pixel = f32>>(img: &I) -> f32 {
    let n = img.width() * img.height();
    if n == 0 {
        return 0.0;
    }
    let mu = mean(img) as f64;
    let acc: f64 = img
        .pixels()
        .map(|&v| {
            let d = v as f64 - mu;
            d * d
        })
        .sum();
    (acc / n as f64) as f32
}

/// Population standard deviation.
pub fn std_dev<I: ImageView<Pixel = f32>>(img: &I) -> f32 {
    variance(img).sqrt()
}

/// Largest intensity, or 0 for an empty image.
pub fn max<I: ImageView<Pixel = f32>>(img: &I) -> f32 {
    img.pixels()
        .copied()
        .fold(None, |acc: Option<f32>, v| Some(acc.map_or(v, |m| m.max(v))))
        .unwrap_or(0.0)
}

/// Percentile `q` in `[0, 100]` with linear interpolation between the two
/// nearest ranks.
pub fn percentile<I: ImageView<Pixel = f32>>(img: &I, q: f32) -> f32 {
    let mut values: Vec<f32> = img.pixels().copied().collect();
    if values.is_empty() {
        return 0.0;
    }
    values.sort_by(|a, b| a.total_cmp(b));
    let q = q.clamp(0.0, 100.0) as f64 / 100.0;
    let pos = q * (values.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = (pos - lo as f64) as f32;
    values[lo] + (values[hi] - values[lo]) * frac
}

/// Round to a fixed number of decimal places.
pub fn round_to(v: f32, decimals: i32) -> f32 {
    let scale = 10f64.powi(decimals);
    ((v as f64 * scale).round() / scale) as f32
}
