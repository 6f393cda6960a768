use crate::error::AppError;
use serde::Deserialize;

/// Current conditions at a location
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct CurrentWeather {
    /// 1 during daylight, 0 at night
    pub is_day: u8,
    /// Air temperature in degrees Celsius
    pub temperature: f64,
    /// WMO weather interpretation code
    #[serde(rename = "weathercode")]
    pub weather_code: u16,
}

/// Trait that weather backends must implement
pub trait WeatherSource: Send + Sync {
    /// Returns the backend identifier
    fn name(&self) -> &'static str;

    /// Look up the current conditions. Blocking; call off the async runtime.
    fn current(&self, latitude: f64, longitude: f64) -> Result<CurrentWeather, AppError>;
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current_weather: CurrentWeather,
}

/// Open-Meteo forecast API client
pub struct OpenMeteo {
    endpoint: String,
}

impl OpenMeteo {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }

    fn request_url(&self, latitude: f64, longitude: f64) -> String {
        format!(
            "{}?latitude={}&longitude={}&current_weather=true",
            self.endpoint, latitude, longitude
        )
    }
}

impl WeatherSource for OpenMeteo {
    fn name(&self) -> &'static str {
        "open-meteo"
    }

    fn current(&self, latitude: f64, longitude: f64) -> Result<CurrentWeather, AppError> {
        let url = self.request_url(latitude, longitude);
        tracing::debug!("Fetching weather from {}", url);

        let mut response = ureq::get(&url)
            .call()
            .map_err(|e| AppError::Weather(format!("Weather request failed: {}", e)))?;

        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| AppError::Weather(format!("Failed to read weather response: {}", e)))?;

        parse_forecast(&body)
    }
}

fn parse_forecast(body: &str) -> Result<CurrentWeather, AppError> {
    let forecast: ForecastResponse = serde_json::from_str(body)
        .map_err(|e| AppError::Weather(format!("Unexpected weather response: {}", e)))?;
    Ok(forecast.current_weather)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_url_includes_coordinates() {
        let client = OpenMeteo::new("https://api.open-meteo.com/v1/forecast");
        assert_eq!(
            client.request_url(52.52, 13.41),
            "https://api.open-meteo.com/v1/forecast?latitude=52.52&longitude=13.41&current_weather=true"
        );
    }

    #[test]
    fn test_parse_forecast_reads_current_weather() {
        let body = r#"{
            "latitude": 52.52,
            "longitude": 13.419998,
            "current_weather": {
                "time": "2026-10-19T12:00",
                "temperature": 14.2,
                "windspeed": 9.4,
                "winddirection": 250,
                "is_day": 1,
                "weathercode": 61
            }
        }"#;

        let weather = parse_forecast(body).unwrap();
        assert_eq!(
            weather,
            CurrentWeather {
                is_day: 1,
                temperature: 14.2,
                weather_code: 61
            }
        );
    }

    #[test]
    fn test_parse_forecast_rejects_missing_section() {
        let err = parse_forecast(r#"{"error": true, "reason": "bad latitude"}"#).unwrap_err();
        assert!(matches!(err, AppError::Weather(_)));
    }
}
