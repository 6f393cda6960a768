//! Backend of a personal portfolio site.
//!
//! Serves the project list, weather-based theming and the contact form
//! recorder, plus a demo that cleans up scanned sheet-music images. The
//! cleanup itself lives in [`preprocessing`] and is a pure function over
//! grayscale rasters.

pub mod config;
pub mod contact;
pub mod error;
pub mod pages;
pub mod portfolio;
pub mod preprocessing;
pub mod server;
pub mod storage;

pub use preprocessing::clean;
