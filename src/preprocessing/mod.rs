//! Cleanup pipeline for scanned sheet-music images
//!
//! Turns a noisy grayscale scan into a denoised, contrast-enhanced and
//! cropped grayscale image. Every stage is deterministic and has fixed
//! parameters.

pub mod pipeline;
pub mod steps;

pub use pipeline::{clean, CleanupResult, Pipeline, StageTiming};
pub use steps::components::ConnectedComponent;
pub use steps::crop::BoundingBox;

/// Single-channel 8-bit raster consumed and produced by the pipeline
pub type RasterImage = image::GrayImage;
