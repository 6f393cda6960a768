use image::{imageops, GrayImage, Luma};
use imageproc::contours::{find_contours, BorderType, Contour};
use imageproc::point::Point;
use serde::Serialize;

/// Pixels at or above this level count as paper
pub const WHITE_THRESHOLD: u8 = 240;

/// Axis-aligned rectangle in pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BoundingBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Crop away the white margin around the selected external contour.
/// Images without any non-white content are returned untouched.
pub fn apply(image: GrayImage) -> GrayImage {
    match find_crop_box(&image) {
        Some(bbox) => crop(&image, bbox),
        None => image,
    }
}

/// Bounding box of the external contour traced last.
///
/// `find_contours` appends borders in tracing order, so this is the region
/// whose first pixel comes last in raster order: the bottom-most (then
/// rightmost) region, not the largest one. It is the head of a contour list
/// built by prepending each traced border.
pub fn find_crop_box(image: &GrayImage) -> Option<BoundingBox> {
    let mask = foreground_mask(image, WHITE_THRESHOLD);
    external_contours(&mask)
        .last()
        .and_then(|contour| bounding_rect(&contour.points))
}

/// 255 where the pixel is darker than `threshold`, 0 elsewhere
pub fn foreground_mask(image: &GrayImage, threshold: u8) -> GrayImage {
    GrayImage::from_fn(image.width(), image.height(), |x, y| {
        if image.get_pixel(x, y).0[0] < threshold {
            Luma([255u8])
        } else {
            Luma([0u8])
        }
    })
}

/// Outer borders that are not nested inside any other region
pub fn external_contours(mask: &GrayImage) -> Vec<Contour<u32>> {
    find_contours::<u32>(mask)
        .into_iter()
        .filter(|c| c.border_type == BorderType::Outer && c.parent.is_none())
        .collect()
}

/// Smallest rectangle containing every point, `None` for an empty slice
pub fn bounding_rect(points: &[Point<u32>]) -> Option<BoundingBox> {
    let first = points.first()?;
    let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
    for p in &points[1..] {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }
    Some(BoundingBox {
        x: min_x,
        y: min_y,
        width: max_x - min_x + 1,
        height: max_y - min_y + 1,
    })
}

/// Copy out the part of the image covered by `bbox`, clipped to the canvas
pub fn crop(image: &GrayImage, bbox: BoundingBox) -> GrayImage {
    imageops::crop_imm(image, bbox.x, bbox.y, bbox.width, bbox.height).to_image()
}
