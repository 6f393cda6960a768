use image::GrayImage;

/// Contrast gain
pub const ALPHA: f32 = 1.5;
/// Brightness offset
pub const BETA: f32 = 50.0;

/// Boost contrast and brightness: `clamp(1.5 * p + 50, 0, 255)`
pub fn apply(image: GrayImage) -> GrayImage {
    scale_abs(image, ALPHA, BETA)
}

/// Affine intensity transform `|alpha * p + beta|`, rounded half to even and
/// saturated to 8 bits.
pub fn scale_abs(mut image: GrayImage, alpha: f32, beta: f32) -> GrayImage {
    let lut: [u8; 256] = std::array::from_fn(|v| {
        let scaled = (alpha * v as f32 + beta).abs().round_ties_even();
        scaled.clamp(0.0, 255.0) as u8
    });

    for pixel in image.pixels_mut() {
        pixel.0[0] = lut[pixel.0[0] as usize];
    }
    image
}
