use image::{GrayImage, Luma};

/// Side length of the Gaussian neighbourhood
pub const BLOCK_SIZE: u32 = 11;
/// Subtracted from the local mean before comparison
pub const OFFSET: i32 = 2;

/// Binarize with an inverted adaptive Gaussian threshold.
/// Dark ink on light paper becomes foreground (255), everything else 0.
pub fn apply(image: GrayImage) -> GrayImage {
    adaptive_gaussian_threshold(&image, BLOCK_SIZE, OFFSET)
}

/// Inverted adaptive threshold.
///
/// A pixel is foreground when it lies at or below its Gaussian-weighted local
/// mean minus `offset`. Uniform regions therefore always come out as
/// background, whatever their brightness.
pub fn adaptive_gaussian_threshold(image: &GrayImage, block_size: u32, offset: i32) -> GrayImage {
    let mean = gaussian_mean(image, block_size);

    GrayImage::from_fn(image.width(), image.height(), |x, y| {
        let pixel = image.get_pixel(x, y).0[0] as i32;
        let local = mean.get_pixel(x, y).0[0] as i32;
        if pixel <= local - offset {
            Luma([255u8])
        } else {
            Luma([0u8])
        }
    })
}

/// Normalized 1-D Gaussian kernel of odd `size`.
///
/// Sigma is derived from the size as `0.3 * ((size - 1) / 2 - 1) + 0.8`,
/// which gives 2.0 for the 11-tap kernel.
pub fn gaussian_kernel(size: u32) -> Vec<f32> {
    let sigma = 0.3 * ((size as f32 - 1.0) * 0.5 - 1.0) + 0.8;
    let half = (size / 2) as i32;
    let denom = 2.0 * sigma * sigma;

    let raw: Vec<f32> = (-half..=half)
        .map(|i| (-((i * i) as f32) / denom).exp())
        .collect();
    let sum: f32 = raw.iter().sum();
    raw.into_iter().map(|w| w / sum).collect()
}

/// Separable Gaussian blur with replicated borders, rounded back to 8 bits
pub fn gaussian_mean(image: &GrayImage, block_size: u32) -> GrayImage {
    let (width, height) = image.dimensions();
    let (w, h) = (width as usize, height as usize);
    let kernel = gaussian_kernel(block_size);
    let half = (kernel.len() / 2) as isize;

    let clamp = |i: isize, len: usize| i.clamp(0, len as isize - 1) as usize;
    let src = image.as_raw();

    let mut horizontal = vec![0.0f32; w * h];
    for y in 0..h {
        let row = &src[y * w..(y + 1) * w];
        for x in 0..w {
            horizontal[y * w + x] = kernel
                .iter()
                .enumerate()
                .map(|(k, weight)| weight * row[clamp(x as isize + k as isize - half, w)] as f32)
                .sum();
        }
    }

    GrayImage::from_fn(width, height, |x, y| {
        let (x, y) = (x as usize, y as usize);
        let value: f32 = kernel
            .iter()
            .enumerate()
            .map(|(k, weight)| weight * horizontal[clamp(y as isize + k as isize - half, h) * w + x])
            .sum();
        Luma([value.round().clamp(0.0, 255.0) as u8])
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gaussian_kernel_is_normalized_and_symmetric() {
        let kernel = gaussian_kernel(BLOCK_SIZE);
        assert_eq!(kernel.len(), 11);

        let sum: f32 = kernel.iter().sum();
        assert!((sum - 1.0).abs() < 1e-5);

        for i in 0..5 {
            assert!((kernel[i] - kernel[10 - i]).abs() < 1e-7);
            assert!(kernel[i] < kernel[i + 1]);
        }
    }

    #[test]
    fn test_threshold_binarizes_image() {
        let img = GrayImage::from_fn(50, 50, |x, y| Luma([((x * 5 + y * 3) % 256) as u8]));

        let result = apply(img);

        for pixel in result.pixels() {
            assert!(
                pixel.0[0] == 0 || pixel.0[0] == 255,
                "Expected binary pixel, got {}",
                pixel.0[0]
            );
        }
    }

    #[test]
    fn test_threshold_uniform_image_is_background() {
        let img = GrayImage::from_pixel(20, 20, Luma([90]));
        let result = apply(img);
        assert!(result.pixels().all(|p| p.0[0] == 0));
    }

    #[test]
    fn test_threshold_marks_dark_ink_as_foreground() {
        // Dark stroke on light paper
        let mut img = GrayImage::from_pixel(50, 20, Luma([240]));
        for x in 10..40 {
            img.put_pixel(x, 10, Luma([20]));
        }

        let result = apply(img);

        // Ink is foreground (inverted output)
        assert_eq!(result.get_pixel(25, 10).0[0], 255);
        // Paper next to the stroke is brighter than its local mean
        assert_eq!(result.get_pixel(25, 9).0[0], 0);
        // Far from the stroke the paper is uniform
        assert_eq!(result.get_pixel(25, 2).0[0], 0);
    }

    #[test]
    fn test_threshold_offset_tolerates_faint_variation() {
        // A pixel only 1 level darker than its surroundings stays background
        let mut img = GrayImage::from_pixel(21, 21, Luma([200]));
        img.put_pixel(10, 10, Luma([199]));

        let result = apply(img);

        assert_eq!(result.get_pixel(10, 10).0[0], 0);
    }
}
