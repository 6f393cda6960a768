use serde::Serialize;

use super::projects::{self, Project};
use super::weather::CurrentWeather;

/// Visual context derived from the visitor's weather
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Context {
    Default,
    Night,
    Rainy,
    Stormy,
    HotDay,
    SunnyDay,
}

impl Context {
    /// Classify current conditions. Night wins over everything else, then
    /// precipitation, then temperature.
    pub fn classify(weather: &CurrentWeather) -> Self {
        if weather.is_day == 0 {
            Self::Night
        } else if (51..80).contains(&weather.weather_code) {
            Self::Rainy
        } else if weather.weather_code >= 95 {
            Self::Stormy
        } else if weather.temperature > 30.0 {
            Self::HotDay
        } else {
            Self::SunnyDay
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Night => "night",
            Self::Rainy => "rainy",
            Self::Stormy => "stormy",
            Self::HotDay => "hot-day",
            Self::SunnyDay => "sunny-day",
        }
    }

    /// CSS custom properties for this context
    pub fn theme(&self) -> Theme {
        let (bg, text, accent, card) = match self {
            Self::Default => ("#1a1a2e", "#e6e6e6", "#4cc9f0", "rgba(255,255,255,0.1)"),
            Self::Night => ("#0f0f1f", "#a0a0d0", "#7b68ee", "rgba(160,160,208,0.15)"),
            Self::Rainy => ("#2b4162", "#f0f8ff", "#a0d2db", "rgba(176,224,230,0.2)"),
            Self::Stormy => ("#0d1b2a", "#ff6b6b", "#e63946", "rgba(230,57,70,0.15)"),
            Self::HotDay => ("#ffd166", "#3d348b", "#f18701", "rgba(241,135,1,0.2)"),
            Self::SunnyDay => ("#f9dbbd", "#6a4c93", "#ffa62b", "rgba(255,166,43,0.2)"),
        };
        Theme {
            bg_color: bg,
            text_color: text,
            accent_color: accent,
            card_bg: card,
        }
    }

    /// Project highlighted for this context
    pub fn featured_project(&self) -> &'static Project {
        let index = match self {
            Self::Night | Self::HotDay => 0,
            Self::Rainy | Self::SunnyDay => 1,
            Self::Stormy | Self::Default => 2,
        };
        projects::by_index(index)
    }
}

/// CSS custom properties applied by the frontend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Theme {
    #[serde(rename = "--bg-color")]
    pub bg_color: &'static str,
    #[serde(rename = "--text-color")]
    pub text_color: &'static str,
    #[serde(rename = "--accent-color")]
    pub accent_color: &'static str,
    #[serde(rename = "--card-bg")]
    pub card_bg: &'static str,
}

/// Weather fields echoed back to the frontend
#[derive(Debug, Clone, Serialize)]
pub struct WeatherData {
    pub is_day: bool,
    pub temperature: f64,
    pub weather_code: u16,
}

/// Response of the context endpoint
#[derive(Debug, Clone, Serialize)]
pub struct ContextResponse {
    pub context: Context,
    pub theme: Theme,
    pub featured_project: &'static Project,
    pub ai_message: String,
    pub weather_data: WeatherData,
}

impl ContextResponse {
    pub fn from_weather(weather: &CurrentWeather) -> Self {
        let context = Context::classify(weather);
        Self {
            context,
            theme: context.theme(),
            featured_project: context.featured_project(),
            ai_message: format!(
                "Weather: {:?}°C. Context: {}.",
                weather.temperature,
                context.as_str()
            ),
            weather_data: WeatherData {
                is_day: weather.is_day != 0,
                temperature: weather.temperature,
                weather_code: weather.weather_code,
            },
        }
    }
}
