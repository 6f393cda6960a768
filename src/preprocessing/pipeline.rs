use serde::Serialize;
use std::time::Instant;

use super::steps;
use super::RasterImage;
use super::steps::crop::BoundingBox;

/// Timing information for a single cleanup stage
#[derive(Debug, Clone, Serialize)]
pub struct StageTiming {
    pub name: &'static str,
    pub time_ms: u64,
}

/// Result of a cleanup run including timing stats
#[derive(Debug, Clone, Serialize)]
pub struct CleanupResult {
    /// Cleaned image (not serialized)
    #[serde(skip)]
    pub image: RasterImage,
    /// Total processing time in milliseconds
    pub total_time_ms: u64,
    /// Region the output was cropped to, `None` when nothing was cropped
    pub crop: Option<BoundingBox>,
    /// Individual stage timings
    pub stages: Vec<StageTiming>,
}

/// Sheet-music cleanup pipeline.
///
/// Stages run strictly in order, each consuming the full output of the one
/// before: denoise, adaptive threshold, speckle removal, sharpen, contrast,
/// auto-crop. Only the final crop may change the image size, and it can only
/// shrink it.
#[derive(Debug, Clone, Copy, Default)]
pub struct Pipeline;

impl Pipeline {
    pub fn new() -> Self {
        Self
    }

    /// Run every stage on `image` and report how long each one took
    pub fn process(&self, image: RasterImage) -> CleanupResult {
        let start = Instant::now();
        let mut timings = Vec::with_capacity(6);
        let (width, height) = image.dimensions();

        let mut img = image;
        img = self.run_stage("denoise", img, &mut timings, steps::denoise::apply);
        img = self.run_stage("threshold", img, &mut timings, steps::threshold::apply);
        img = self.run_stage("components", img, &mut timings, steps::components::apply);
        img = self.run_stage("sharpen", img, &mut timings, steps::sharpen::apply);
        img = self.run_stage("contrast", img, &mut timings, steps::contrast::apply);

        let crop_start = Instant::now();
        let crop = steps::crop::find_crop_box(&img);
        if let Some(bbox) = crop {
            img = steps::crop::crop(&img, bbox);
        }
        timings.push(StageTiming {
            name: "crop",
            time_ms: crop_start.elapsed().as_millis() as u64,
        });

        let total_time_ms = start.elapsed().as_millis() as u64;
        tracing::debug!(
            width,
            height,
            out_width = img.width(),
            out_height = img.height(),
            total_time_ms,
            "Cleanup pipeline finished"
        );

        CleanupResult {
            image: img,
            total_time_ms,
            crop,
            stages: timings,
        }
    }

    fn run_stage<F>(
        &self,
        name: &'static str,
        img: RasterImage,
        timings: &mut Vec<StageTiming>,
        stage_fn: F,
    ) -> RasterImage
    where
        F: FnOnce(RasterImage) -> RasterImage,
    {
        let stage_start = Instant::now();
        let result = stage_fn(img);
        let time_ms = stage_start.elapsed().as_millis() as u64;
        tracing::trace!(stage = name, time_ms, "Stage complete");
        timings.push(StageTiming { name, time_ms });
        result
    }
}

/// Clean a grayscale scan. Total over any image with non-zero dimensions.
pub fn clean(image: RasterImage) -> RasterImage {
    Pipeline::new().process(image).image
}
