//! Deterministic synthetic galaxy images for demos and tests.
//!
//! - `spiral_galaxy`: two arms traced along `r = 5θ` for θ in `[0, 4π]`, a
//!   Gaussian core and additive Gaussian noise.
//! - `elliptical_galaxy`: a smooth elliptical profile with a wider halo and
//!   additive Gaussian noise; the semi-axes are jittered per seed.
//!
//! The same `(size, seed)` always produces the same pixels.
use crate::image::io::{save_grayscale_u8, GrayImageU8};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::PI;
use std::path::{Path, PathBuf};

pub const DEFAULT_SIZE: usize = 128;
const ARM_SAMPLES: usize = 1000;
const NOISE_SIGMA: f64 = 10.0;
/// Seed offset separating elliptical samples from spiral ones.
const ELLIPTICAL_SEED_OFFSET: u64 = 100;

/// Generate a spiral galaxy of `size × size` pixels.
pub fn spiral_galaxy(size: usize, seed: u64) -> GrayImageU8 {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut img = vec![0.0f64; size * size];
    let center = (size / 2) as f64;

    for arm in 0..2 {
        let offset = arm as f64 * PI;
        for i in 0..ARM_SAMPLES {
            let theta = 4.0 * PI * i as f64 / (ARM_SAMPLES - 1) as f64;
            let r = theta * 5.0;
            let x = center as i64 + (r * (theta + offset).cos()) as i64;
            let y = center as i64 + (r * (theta + offset).sin()) as i64;
            if x >= 0 && y >= 0 && (x as usize) < size && (y as usize) < size {
                img[y as usize * size + x as usize] = 200.0 + rng.gen_range(-50..50) as f64;
            }
        }
    }

    for y in 0..size {
        for x in 0..size {
            let dx = x as f64 - center;
            let dy = y as f64 - center;
            img[y * size + x] += 100.0 * (-(dx * dx + dy * dy) / 200.0).exp();
        }
    }

    add_noise(&mut img, &mut rng);
    quantize(size, &img)
}

/// Generate an elliptical galaxy of `size × size` pixels.
pub fn elliptical_galaxy(size: usize, seed: u64) -> GrayImageU8 {
    let mut rng = StdRng::seed_from_u64(seed);
    let center = (size / 2) as f64;
    let a = (30 + rng.gen_range(-5..5)) as f64;
    let b = (20 + rng.gen_range(-5..5)) as f64;

    let mut img = vec![0.0f64; size * size];
    for y in 0..size {
        for x in 0..size {
            let dx = x as f64 - center;
            let dy = y as f64 - center;
            let d = dx * dx / (a * a) + dy * dy / (b * b);
            img[y * size + x] = 200.0 * (-d * 2.0).exp() + 50.0 * (-d * 0.5).exp();
        }
    }

    add_noise(&mut img, &mut rng);
    quantize(size, &img)
}

/// Write `per_class` spiral and elliptical samples into `dir` as
/// `spiral_NN.png` / `elliptical_NN.png`. Returns the written paths.
pub fn write_dataset(dir: &Path, per_class: usize, size: usize) -> Result<Vec<PathBuf>, String> {
    let mut written = Vec::with_capacity(per_class * 2);
    for i in 0..per_class {
        let path = dir.join(format!("spiral_{i:02}.png"));
        save_grayscale_u8(&spiral_galaxy(size, i as u64), &path)?;
        written.push(path);
    }
    for i in 0..per_class {
        let path = dir.join(format!("elliptical_{i:02}.png"));
        let seed = i as u64 + ELLIPTICAL_SEED_OFFSET;
        save_grayscale_u8(&elliptical_galaxy(size, seed), &path)?;
        written.push(path);
    }
    log::info!("wrote {} images to {}", written.len(), dir.display());
    Ok(written)
}

fn add_noise(img: &mut [f64], rng: &mut StdRng) {
    for v in img.iter_mut() {
        *v += NOISE_SIGMA * standard_normal(rng);
    }
}

/// Box–Muller transform over two uniform samples.
fn standard_normal(rng: &mut StdRng) -> f64 {
    let u1: f64 = rng.gen_range(f64::EPSILON..1.0);
    let u2: f64 = rng.gen();
    (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
}

fn quantize(size: usize, img: &[f64]) -> GrayImageU8 {
    let data = img.iter().map(|&v| v.clamp(0.0, 255.0) as u8).collect();
    GrayImageU8::new(size, size, data)
}
