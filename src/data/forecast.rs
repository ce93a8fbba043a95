use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

use crate::domain::{location::Location, weather::WeatherSnapshot};

const FORECAST_BASE_URL: &str = "https://api.open-meteo.com";
const CURRENT_FIELDS: &str =
    "temperature_2m,is_day,weather_code,wind_speed_10m,wind_direction_10m";

#[derive(Debug, Error)]
pub enum ForecastError {
    #[error("forecast request failed")]
    Request(#[from] reqwest::Error),
    #[error("forecast service returned {0}")]
    Status(reqwest::StatusCode),
    #[error("failed to parse forecast payload")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Clone)]
pub struct ForecastClient {
    client: Client,
    endpoint: String,
}

impl Default for ForecastClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ForecastClient {
    pub fn new() -> Self {
        Self::with_base_url(FORECAST_BASE_URL)
    }

    /// `base_url` is the service root; `/v1/forecast` is appended.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .expect("reqwest client"),
            endpoint: format!("{}/v1/forecast", base_url.trim_end_matches('/')),
        }
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub async fn fetch_current(&self, location: &Location) -> Result<WeatherSnapshot, ForecastError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("latitude", location.latitude.to_string()),
                ("longitude", location.longitude.to_string()),
                ("current", CURRENT_FIELDS.to_string()),
                ("timezone", "auto".to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ForecastError::Status(status));
        }
        let body = response.text().await?;
        parse_current(&body)
    }
}

pub fn parse_current(body: &str) -> Result<WeatherSnapshot, ForecastError> {
    let payload: ForecastResponse = serde_json::from_str(body)?;
    let current = payload.current;
    Ok(WeatherSnapshot {
        weather_code: current.weather_code,
        wind_speed_kmh: current.wind_speed_10m,
        wind_direction_deg: current.wind_direction_10m,
        temperature_c: current.temperature_2m,
        is_day: current.is_day == 1,
    })
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current: CurrentBlock,
}

#[derive(Debug, Deserialize)]
struct CurrentBlock {
    temperature_2m: f32,
    is_day: u8,
    weather_code: u8,
    wind_speed_10m: f32,
    wind_direction_10m: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_current_block() {
        let body = r#"{
            "latitude": 48.86,
            "longitude": 2.34,
            "current": {
                "time": "2026-03-01T12:00",
                "temperature_2m": 8.4,
                "is_day": 1,
                "weather_code": 61,
                "wind_speed_10m": 17.3,
                "wind_direction_10m": 225
            }
        }"#;
        let snapshot = parse_current(body).expect("valid payload");
        assert_eq!(snapshot.weather_code, 61);
        assert!(snapshot.is_day);
        assert!((snapshot.wind_speed_kmh - 17.3).abs() < 1e-4);
        assert!((snapshot.wind_direction_deg - 225.0).abs() < f32::EPSILON);
    }

    #[test]
    fn night_flag_is_zero() {
        let body = r#"{"current":{"temperature_2m":-2,"is_day":0,"weather_code":3,
            "wind_speed_10m":0,"wind_direction_10m":0}}"#;
        assert!(!parse_current(body).expect("valid payload").is_day);
    }

    #[test]
    fn missing_current_block_is_a_decode_error() {
        let err = parse_current(r#"{"hourly":{}}"#).expect_err("no current block");
        assert!(matches!(err, ForecastError::Decode(_)));
    }

    #[test]
    fn endpoint_ignores_trailing_slash() {
        let client = ForecastClient::with_base_url("http://127.0.0.1:9999/");
        assert_eq!(client.endpoint(), "http://127.0.0.1:9999/v1/forecast");
    }
}
