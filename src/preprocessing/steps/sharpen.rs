use image::GrayImage;
use imageproc::filter::filter3x3;

/// Laplacian-based sharpening kernel.
/// Center weight 5, edge neighbours -1 each, corners 0.
pub const KERNEL: [f32; 9] = [0.0, -1.0, 0.0, -1.0, 5.0, -1.0, 0.0, -1.0, 0.0];

/// Apply Laplacian-based sharpening, clamped to the 8-bit range
pub fn apply(image: GrayImage) -> GrayImage {
    let sharpened: GrayImage = filter3x3(&image, &KERNEL);
    sharpened
}
