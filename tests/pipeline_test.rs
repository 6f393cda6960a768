use image::{GrayImage, Luma};
use living_portfolio_server::clean;
use living_portfolio_server::preprocessing::steps::{components, contrast, crop};

fn staff_lines(width: u32, height: u32) -> GrayImage {
    // Five staff lines with a note head and a few dust specks
    GrayImage::from_fn(width, height, |x, y| {
        let on_line = (10..60).step_by(10).any(|line| y == line) && (4..width - 4).contains(&x);
        let dx = x as i32 - 40;
        let dy = y as i32 - 25;
        let in_note = dx * dx + 2 * dy * dy <= 30;
        let dust = (x, y) == (3, 66) || (x, y) == (70, 4);
        if on_line || in_note || dust {
            Luma([20])
        } else {
            Luma([235])
        }
    })
}

#[test]
fn test_clean_output_fits_inside_input() {
    let img = staff_lines(80, 70);
    let out = clean(img);
    assert!(out.width() <= 80);
    assert!(out.height() <= 70);
}

#[test]
fn test_clean_is_bit_identical_across_runs() {
    let img = staff_lines(80, 70);
    assert_eq!(clean(img.clone()), clean(img));
}

#[test]
fn test_uniform_gray_contrast() {
    let out = contrast::apply(GrayImage::from_pixel(10, 10, Luma([100])));
    assert!(out.pixels().all(|p| p.0[0] == 200));
}

#[test]
fn test_component_filter_removes_small_region() {
    let mut img = GrayImage::new(30, 30);
    // 40 pixels
    for y in 0..4 {
        for x in 0..10 {
            img.put_pixel(x, y, Luma([255]));
        }
    }
    // 60 pixels
    for y in 10..16 {
        for x in 0..10 {
            img.put_pixel(x, y, Luma([255]));
        }
    }

    let kept = components::filter_small_components(&img, components::MIN_COMPONENT_AREA);

    assert_eq!(kept.get_pixel(0, 0).0[0], 0);
    assert_eq!(kept.get_pixel(0, 10).0[0], 255);
    assert_eq!(kept.pixels().filter(|p| p.0[0] == 255).count(), 60);
}

#[test]
fn test_crop_leaves_blank_page_alone() {
    let img = GrayImage::from_pixel(25, 35, Luma([255]));
    assert_eq!(crop::apply(img.clone()), img);
}
