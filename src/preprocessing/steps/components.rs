use image::{imageops, GrayImage, Luma};
use imageproc::region_labelling::{connected_components, Connectivity};
use std::collections::BTreeMap;

/// Regions with an area at or below this many pixels are treated as speckle
pub const MIN_COMPONENT_AREA: u32 = 50;

/// One 8-connected region of foreground pixels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectedComponent {
    pub label: u32,
    pub area: u32,
    pub pixels: Vec<(u32, u32)>,
}

/// Drop speckle from a binary ink mask, then invert it so that the surviving
/// strokes render dark on a light background again.
pub fn apply(binary: GrayImage) -> GrayImage {
    let mut kept = filter_small_components(&binary, MIN_COMPONENT_AREA);
    imageops::invert(&mut kept);
    kept
}

/// Label the 8-connected foreground (non-zero) regions of a binary image.
/// Components are returned in label order.
pub fn label_components(binary: &GrayImage) -> Vec<ConnectedComponent> {
    let labels = connected_components(binary, Connectivity::Eight, Luma([0u8]));

    let mut components: BTreeMap<u32, ConnectedComponent> = BTreeMap::new();
    for (x, y, label) in labels.enumerate_pixels() {
        let label = label.0[0];
        if label == 0 {
            continue;
        }
        let component = components.entry(label).or_insert_with(|| ConnectedComponent {
            label,
            area: 0,
            pixels: Vec::new(),
        });
        component.area += 1;
        component.pixels.push((x, y));
    }

    components.into_values().collect()
}

/// Keep only components whose area is strictly greater than `min_area`.
/// Returns a mask with kept pixels at 255 and everything else at 0.
pub fn filter_small_components(binary: &GrayImage, min_area: u32) -> GrayImage {
    let mut output = GrayImage::new(binary.width(), binary.height());

    for component in label_components(binary) {
        if component.area <= min_area {
            continue;
        }
        for &(x, y) in &component.pixels {
            output.put_pixel(x, y, Luma([255u8]));
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill(img: &mut GrayImage, x0: u32, y0: u32, w: u32, h: u32) {
        for y in y0..y0 + h {
            for x in x0..x0 + w {
                img.put_pixel(x, y, Luma([255]));
            }
        }
    }

    #[test]
    fn test_label_components_uses_eight_connectivity() {
        let mut img = GrayImage::new(6, 6);
        // Diagonal chain is one component under 8-connectivity
        img.put_pixel(0, 0, Luma([255]));
        img.put_pixel(1, 1, Luma([255]));
        img.put_pixel(2, 2, Luma([255]));
        // Separate blob
        img.put_pixel(5, 5, Luma([255]));

        let components = label_components(&img);

        assert_eq!(components.len(), 2);
        let mut areas: Vec<u32> = components.iter().map(|c| c.area).collect();
        areas.sort();
        assert_eq!(areas, vec![1, 3]);
        for c in &components {
            assert_eq!(c.area as usize, c.pixels.len());
            assert_ne!(c.label, 0);
        }
    }

    #[test]
    fn test_label_components_empty_image() {
        let img = GrayImage::new(8, 8);
        assert!(label_components(&img).is_empty());
    }

    #[test]
    fn test_filter_keeps_only_regions_above_area_threshold() {
        let mut img = GrayImage::new(40, 20);
        fill(&mut img, 2, 2, 8, 5); // area 40
        fill(&mut img, 20, 2, 10, 6); // area 60

        let filtered = filter_small_components(&img, MIN_COMPONENT_AREA);

        assert_eq!(filtered.get_pixel(5, 4).0[0], 0);
        assert_eq!(filtered.get_pixel(25, 4).0[0], 255);
        let surviving = filtered.pixels().filter(|p| p.0[0] == 255).count();
        assert_eq!(surviving, 60);
    }

    #[test]
    fn test_filter_area_threshold_is_exclusive() {
        let mut img = GrayImage::new(30, 30);
        fill(&mut img, 0, 0, 10, 5); // exactly 50
        fill(&mut img, 0, 10, 17, 3); // 51

        let filtered = filter_small_components(&img, MIN_COMPONENT_AREA);

        assert_eq!(filtered.get_pixel(0, 0).0[0], 0);
        assert_eq!(filtered.get_pixel(0, 10).0[0], 255);
    }

    #[test]
    fn test_apply_inverts_surviving_strokes() {
        let mut img = GrayImage::new(40, 20);
        fill(&mut img, 2, 2, 8, 5); // area 40, removed
        fill(&mut img, 20, 2, 10, 6); // area 60, kept

        let result = apply(img);

        // Kept stroke is dark, removed speckle and background are light
        assert_eq!(result.get_pixel(25, 4).0[0], 0);
        assert_eq!(result.get_pixel(5, 4).0[0], 255);
        assert_eq!(result.get_pixel(35, 15).0[0], 255);
    }
}
