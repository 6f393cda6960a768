//! Portfolio content: the project list and weather-driven theming

pub mod context;
pub mod projects;
pub mod weather;

pub use context::{Context, ContextResponse};
pub use projects::Project;
pub use weather::{CurrentWeather, OpenMeteo, WeatherSource};
