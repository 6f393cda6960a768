//! Individual cleanup stages, in pipeline order:
//! denoise, threshold, components, sharpen, contrast, crop.

pub mod components;
pub mod contrast;
pub mod crop;
pub mod denoise;
pub mod sharpen;
pub mod threshold;
