use image::{GrayImage, Luma};

/// Side length of the patch compared between two pixels
pub const TEMPLATE_WINDOW: u32 = 17;
/// Side length of the neighbourhood searched for similar patches
pub const SEARCH_WINDOW: u32 = 28;
/// Filter strength; larger values average dissimilar patches more aggressively
pub const FILTER_STRENGTH: f32 = 20.0;
/// Candidates weighted below this contribute nothing
const WEIGHT_THRESHOLD: f64 = 0.001;

/// Remove scan noise with non-local means (17x17 template, 28x28 search, h=20)
pub fn apply(image: GrayImage) -> GrayImage {
    non_local_means(&image, TEMPLATE_WINDOW, SEARCH_WINDOW, FILTER_STRENGTH)
}

/// Non-local means denoising.
///
/// Every output pixel is the weighted average of the pixels in its search
/// window, where a candidate's weight is `exp(-d / h^2)` and `d` is the mean
/// squared difference between the template patch around the output pixel and
/// the one around the candidate. Window sizes are rounded down to the nearest
/// odd size around the centre (`size / 2` on each side), borders are reflected.
///
/// Patch distances are evaluated one search offset at a time through an
/// integral image of squared differences, so each offset costs O(pixels)
/// instead of O(pixels * template area).
pub fn non_local_means(
    image: &GrayImage,
    template_window: u32,
    search_window: u32,
    h: f32,
) -> GrayImage {
    let (width, height) = image.dimensions();
    let (w, hgt) = (width as usize, height as usize);
    let t = (template_window / 2) as usize;
    let s = (search_window / 2) as usize;
    let padded = Padded::reflect101(image, t + s);

    let template_area = ((2 * t + 1) * (2 * t + 1)) as f64;
    let h = h as f64;
    let scale = 1.0 / (h * h * template_area);

    let mut weight_sum = vec![0.0f64; w * hgt];
    let mut value_sum = vec![0.0f64; w * hgt];

    // Region of the padded image covered by the template of any output pixel,
    // starting at padded coordinate (s, s).
    let region_w = w + 2 * t;
    let region_h = hgt + 2 * t;
    let stride = region_w + 1;
    let mut integral = vec![0u64; stride * (region_h + 1)];

    let s = s as isize;
    for dy in -s..=s {
        for dx in -s..=s {
            for ry in 0..region_h {
                let py = ry + s as usize;
                let qy = (py as isize + dy) as usize;
                let mut row_sum = 0u64;
                for rx in 0..region_w {
                    let px = rx + s as usize;
                    let qx = (px as isize + dx) as usize;
                    let d = padded.at(px, py) as i64 - padded.at(qx, qy) as i64;
                    row_sum += (d * d) as u64;
                    integral[(ry + 1) * stride + rx + 1] = integral[ry * stride + rx + 1] + row_sum;
                }
            }

            let side = 2 * t + 1;
            for y in 0..hgt {
                for x in 0..w {
                    let (x1, y1) = (x + side, y + side);
                    let ssd = integral[y1 * stride + x1] + integral[y * stride + x]
                        - integral[y * stride + x1]
                        - integral[y1 * stride + x];
                    let weight = (-(ssd as f64) * scale).exp();
                    if weight < WEIGHT_THRESHOLD {
                        continue;
                    }
                    let cx = (x + padded.border) as isize + dx;
                    let cy = (y + padded.border) as isize + dy;
                    let candidate = padded.at(cx as usize, cy as usize) as f64;
                    let idx = y * w + x;
                    weight_sum[idx] += weight;
                    value_sum[idx] += weight * candidate;
                }
            }
        }
    }

    GrayImage::from_fn(width, height, |x, y| {
        let idx = y as usize * w + x as usize;
        // The zero offset always weighs 1, so the sum is never zero.
        let value = value_sum[idx] / weight_sum[idx];
        Luma([value.round().clamp(0.0, 255.0) as u8])
    })
}

/// Grayscale samples surrounded by a reflected border (`gfedcb|abcdefgh|gfedcba`)
struct Padded {
    data: Vec<u8>,
    stride: usize,
    border: usize,
}

impl Padded {
    fn reflect101(image: &GrayImage, border: usize) -> Self {
        let (width, height) = (image.width() as usize, image.height() as usize);
        let stride = width + 2 * border;
        let rows = height + 2 * border;
        let mut data = Vec::with_capacity(stride * rows);
        for py in 0..rows {
            let sy = reflect101(py as isize - border as isize, height);
            for px in 0..stride {
                let sx = reflect101(px as isize - border as isize, width);
                data.push(image.get_pixel(sx as u32, sy as u32).0[0]);
            }
        }
        Self {
            data,
            stride,
            border,
        }
    }

    #[inline]
    fn at(&self, x: usize, y: usize) -> u8 {
        self.data[y * self.stride + x]
    }
}

/// Map an out-of-range index back into `0..len` by mirroring around the edge
/// samples without repeating them.
fn reflect101(mut i: isize, len: usize) -> usize {
    if len == 1 {
        return 0;
    }
    let last = len as isize - 1;
    loop {
        if i < 0 {
            i = -i;
        } else if i > last {
            i = 2 * last - i;
        } else {
            return i as usize;
        }
    }
}
