//! Owned single-channel f32 image in row-major layout (stride == width).
//!
//! This is the working value handed between the quality analyzer, the
//! preprocessor and the classifier. Intensities are normalized to `[0, 1]`;
//! [`ImageF32::validate`] checks that before a collaborator sees the data.
use super::ImageU8;
use crate::error::MalformedInputError;

#[derive(Clone, Debug, PartialEq)]
pub struct ImageF32 {
    /// Image width in pixels
    pub w: usize,
    /// Image height in pixels
    pub h: usize,
    /// Number of f32 elements between consecutive rows (equals `w`)
    pub stride: usize,
    /// Backing storage in row-major order
    pub data: Vec<f32>,
}

impl ImageF32 {
    /// Construct a zero-initialized buffer of size `w × h`.
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            stride: w,
            data: vec![0.0; w * h],
        }
    }

    /// Wrap an existing buffer, checking shape and range.
    pub fn from_vec(w: usize, h: usize, data: Vec<f32>) -> Result<Self, MalformedInputError> {
        let img = Self {
            w,
            h,
            stride: w,
            data,
        };
        img.validate()?;
        Ok(img)
    }

    /// Normalize an 8-bit view into `[0, 1]` by dividing by 255.
    pub fn from_u8(src: &ImageU8<'_>) -> Self {
        let mut out = Self::new(src.w, src.h);
        for y in 0..src.h {
            let row = &src.data[y * src.stride..y * src.stride + src.w];
            let dst = &mut out.data[y * out.stride..(y + 1) * out.stride];
            for (d, &s) in dst.iter_mut().zip(row) {
                *d = s as f32 / 255.0;
            }
        }
        out
    }

    /// A `w × h` image with every pixel set to `v`.
    pub fn filled(w: usize, h: usize, v: f32) -> Self {
        Self {
            w,
            h,
            stride: w,
            data: vec![v; w * h],
        }
    }

    #[inline]
    /// Convert (x, y) to a linear index into `data`.
    pub fn idx(&self, x: usize, y: usize) -> usize {
        y * self.stride + x
    }
    #[inline]
    /// Get the pixel value at (x, y).
    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.data[self.idx(x, y)]
    }
    #[inline]
    /// Set the pixel value at (x, y).
    pub fn set(&mut self, x: usize, y: usize, v: f32) {
        let i = self.idx(x, y);
        self.data[i] = v;
    }

    /// Number of pixels.
    pub fn len(&self) -> usize {
        self.w * self.h
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Return a new image with `f` applied to every pixel.
    pub fn map(&self, f: impl Fn(f32) -> f32) -> Self {
        Self {
            w: self.w,
            h: self.h,
            stride: self.stride,
            data: self.data.iter().map(|&v| f(v)).collect(),
        }
    }

    /// Check the invariants every collaborator relies on: non-empty, tightly
    /// packed, finite and within `[0, 1]`.
    pub fn validate(&self) -> Result<(), MalformedInputError> {
        if self.w == 0 || self.h == 0 {
            return Err(MalformedInputError::Empty);
        }
        if self.stride != self.w {
            return Err(MalformedInputError::StrideMismatch {
                width: self.w,
                stride: self.stride,
            });
        }
        if self.data.len() != self.w * self.h {
            return Err(MalformedInputError::ShapeMismatch {
                width: self.w,
                height: self.h,
                len: self.data.len(),
            });
        }
        for (index, &value) in self.data.iter().enumerate() {
            if !value.is_finite() {
                return Err(MalformedInputError::NonFinite { index });
            }
            if !(0.0..=1.0).contains(&value) {
                return Err(MalformedInputError::OutOfRange { index, value });
            }
        }
        Ok(())
    }
}

impl crate::image::traits::ImageView for ImageF32 {
    type Pixel = f32;

    #[inline]
    fn width(&self) -> usize {
        self.w
    }
    #[inline]
    fn height(&self) -> usize {
        self.h
    }
    #[inline]
    fn stride(&self) -> usize {
        self.stride
    }
    #[inline]
    fn row(&self, y: usize) -> &[f32] {
        let start = y * self.stride;
        &self.data[start..start + self.w]
    }
}

impl crate::image::traits::ImageViewMut for ImageF32 {
    #[inline]
    fn row_mut(&mut self, y: usize) -> &mut [f32] {
        let start = y * self.stride;
        let end = start + self.w;
        &mut self.data[start..end]
    }
}
