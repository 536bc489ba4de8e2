//! I/O helpers for grayscale images and JSON.
//!
//! - `load_normalized`: read a PNG/JPEG/etc. into a normalized `ImageF32`,
//!   optionally resized to a fixed working size.
//! - `save_grayscale_f32`: write an `ImageF32` to a grayscale PNG.
//! - `save_grayscale_u8`: write an owned 8-bit gray buffer to a PNG.
//! - `write_json_file`: pretty-print a serializable value to disk.
use super::{ImageF32, ImageU8, ImageView};
use crate::error::PipelineError;
use image::imageops::FilterType;
use image::{GrayImage, ImageBuffer, Luma};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Working size images are resampled to before analysis.
pub const DEFAULT_WORKING_SIZE: (usize, usize) = (128, 128);

/// Owned 8-bit grayscale buffer with borrowed view conversion.
#[derive(Clone, Debug)]
pub struct GrayImageU8 {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl GrayImageU8 {
    /// Construct an owned grayscale buffer given raw bytes.
    pub fn new(width: usize, height: usize, data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            data,
        }
    }

    /// Image width in pixels
    pub fn width(&self) -> usize {
        self.width
    }

    /// Image height in pixels
    pub fn height(&self) -> usize {
        self.height
    }

    /// Borrow as a read-only `ImageU8` view
    pub fn as_view(&self) -> ImageU8<'_> {
        ImageU8::packed(self.width, self.height, &self.data)
    }

    /// Normalize into `[0, 1]`.
    pub fn to_f32(&self) -> ImageF32 {
        ImageF32::from_u8(&self.as_view())
    }
}

/// Load an image from disk as 8-bit grayscale, resampling to `size` when given.
pub fn load_grayscale_image(
    path: &Path,
    size: Option<(usize, usize)>,
) -> Result<GrayImageU8, PipelineError> {
    let mut img = image::open(path)
        .map_err(|source| PipelineError::Load {
            path: path.to_path_buf(),
            source,
        })?
        .into_luma8();
    if let Some((w, h)) = size {
        if img.width() as usize != w || img.height() as usize != h {
            img = image::imageops::resize(&img, w as u32, h as u32, FilterType::CatmullRom);
        }
    }
    let width = img.width() as usize;
    let height = img.height() as usize;
    Ok(GrayImageU8::new(width, height, img.into_raw()))
}

/// Load an image and normalize it to `[0, 1]` intensities.
pub fn load_normalized(
    path: &Path,
    size: Option<(usize, usize)>,
) -> Result<ImageF32, PipelineError> {
    let gray = load_grayscale_image(path, size)?;
    let img = gray.to_f32();
    img.validate()?;
    Ok(img)
}

/// Save a float image to a grayscale PNG, clamping values in [0, 255].
pub fn save_grayscale_f32(image: &ImageF32, path: &Path) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let mut out = GrayImage::new(image.w as u32, image.h as u32);
    for y in 0..image.h {
        let row = image.row(y);
        for (x, &px) in row.iter().enumerate() {
            let v = (px * 255.0).round().clamp(0.0, 255.0);
            out.put_pixel(x as u32, y as u32, Luma([v as u8]));
        }
    }
    out.save(path)
        .map_err(|e| format!("Failed to save {}: {e}", path.display()))
}

/// Save an 8-bit grayscale buffer to a PNG.
pub fn save_grayscale_u8(buffer: &GrayImageU8, path: &Path) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let image: ImageBuffer<Luma<u8>, Vec<u8>> =
        ImageBuffer::from_raw(buffer.width as u32, buffer.height as u32, buffer.data.clone())
            .ok_or_else(|| "Failed to create image buffer".to_string())?;
    image
        .save(path)
        .map_err(|e| format!("Failed to save {}: {e}", path.display()))
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Failed to serialize JSON for {}: {e}", path.display()))?;
    fs::write(path, json).map_err(|e| format!("Failed to write JSON {}: {e}", path.display()))
}

fn ensure_parent_dir(path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create {}: {e}", parent.display()))?;
        }
    }
    Ok(())
}
