use galaxy_pipeline::image::ImageF32;

/// Generates a checkerboard alternating between `lo` and `hi`.
pub fn checkerboard_f32(width: usize, height: usize, cell: usize, lo: f32, hi: f32) -> ImageF32 {
    assert!(width > 0 && height > 0, "image dimensions must be positive");
    assert!(cell > 0, "cell size must be positive");

    let mut img = ImageF32::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let sum = x / cell + y / cell;
            img.set(x, y, if sum & 1 == 0 { lo } else { hi });
        }
    }
    img
}

/// Well-exposed, high-contrast image: passes the quality gate.
pub fn well_exposed(width: usize, height: usize) -> ImageF32 {
    checkerboard_f32(width, height, 4, 0.2, 0.8)
}

/// Dark, flat image: too dark and low contrast.
pub fn dark_flat(width: usize, height: usize) -> ImageF32 {
    checkerboard_f32(width, height, 4, 0.05, 0.08)
}
