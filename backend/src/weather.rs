//! OpenWeatherMap "current weather" lookup.
//!
//! Callers only ever see a [`WeatherSnapshot`]: [`WeatherClient::fetch`]
//! swaps any failure for [`WeatherSnapshot::unavailable`].

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::config::Config;
use crate::models::weather::{WeatherSnapshot, UNKNOWN_CITY};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("No weather API key configured")]
    MissingApiKey,

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Weather API error {status}: {body}")]
    Api { status: StatusCode, body: String },

    #[error("Weather response had no conditions")]
    NoConditions,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// New York City.
    pub const DEFAULT: Coordinates = Coordinates {
        latitude: 40.7128,
        longitude: -74.0060,
    };

    /// Both parts or nothing: a lone latitude or longitude falls back to the
    /// default location.
    pub fn from_optional(latitude: Option<f64>, longitude: Option<f64>) -> Self {
        match (latitude, longitude) {
            (Some(latitude), Some(longitude)) => Self { latitude, longitude },
            _ => Self::DEFAULT,
        }
    }
}

// ── OpenWeatherMap payload ───────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct CurrentWeatherResponse {
    #[serde(default)]
    weather: Vec<ConditionPayload>,
    main: MainPayload,
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
struct ConditionPayload {
    main: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct MainPayload {
    temp: f64,
    humidity: f64,
}

impl TryFrom<CurrentWeatherResponse> for WeatherSnapshot {
    type Error = WeatherError;

    fn try_from(resp: CurrentWeatherResponse) -> Result<Self, Self::Error> {
        let condition = resp
            .weather
            .into_iter()
            .next()
            .ok_or(WeatherError::NoConditions)?;

        let city = if resp.name.trim().is_empty() {
            UNKNOWN_CITY.to_string()
        } else {
            resp.name
        };

        Ok(WeatherSnapshot {
            condition: condition.main.to_lowercase(),
            temperature: round_half_up(resp.main.temp),
            description: condition.description,
            humidity: round_half_up(resp.main.humidity),
            city,
        })
    }
}

/// Halves go toward positive infinity: -2.5 becomes -2, 2.5 becomes 3.
fn round_half_up(value: f64) -> i32 {
    (value + 0.5).floor() as i32
}

// ── Client ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct WeatherClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl WeatherClient {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Result<Self, WeatherError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, WeatherError> {
        Self::new(config.weather_api_url.clone(), config.weather_api_key.clone())
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Current weather for the given coordinates, or the fallback snapshot.
    pub async fn fetch(&self, latitude: Option<f64>, longitude: Option<f64>) -> WeatherSnapshot {
        let coords = Coordinates::from_optional(latitude, longitude);

        match self.try_fetch(coords).await {
            Ok(snapshot) => snapshot,
            Err(WeatherError::MissingApiKey) => {
                tracing::debug!("No weather API key, using fallback weather");
                WeatherSnapshot::unavailable()
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    lat = coords.latitude,
                    lon = coords.longitude,
                    "Weather lookup failed, using fallback weather"
                );
                WeatherSnapshot::unavailable()
            }
        }
    }

    pub async fn try_fetch(&self, coords: Coordinates) -> Result<WeatherSnapshot, WeatherError> {
        let api_key = self.api_key.as_deref().ok_or(WeatherError::MissingApiKey)?;

        let response = self
            .client
            .get(format!("{}/data/2.5/weather", self.base_url))
            .query(&[
                ("lat", coords.latitude.to_string()),
                ("lon", coords.longitude.to_string()),
                ("appid", api_key.to_string()),
                ("units", "metric".to_string()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(WeatherError::Api { status, body });
        }

        let payload: CurrentWeatherResponse = response.json().await?;
        let snapshot = WeatherSnapshot::try_from(payload)?;

        tracing::debug!(
            condition = %snapshot.condition,
            city = %snapshot.city,
            "Fetched current weather"
        );

        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::{
        matchers::{method, path, query_param},
        Mock, MockServer, ResponseTemplate,
    };

    fn owm_body() -> serde_json::Value {
        serde_json::json!({
            "weather": [{"id": 500, "main": "Rain", "description": "light rain", "icon": "10d"}],
            "main": {"temp": 12.6, "feels_like": 11.9, "humidity": 87},
            "name": "Bergen"
        })
    }

    // ── Coordinates ──────────────────────────────────────────────────────

    #[test]
    fn test_coordinates_default_when_absent() {
        assert_eq!(Coordinates::from_optional(None, None), Coordinates::DEFAULT);
    }

    #[test]
    fn test_coordinates_default_when_partial() {
        assert_eq!(Coordinates::from_optional(Some(1.0), None), Coordinates::DEFAULT);
        assert_eq!(Coordinates::from_optional(None, Some(1.0)), Coordinates::DEFAULT);
    }

    #[test]
    fn test_coordinates_used_when_complete() {
        let c = Coordinates::from_optional(Some(60.39), Some(5.32));
        assert_eq!(c.latitude, 60.39);
        assert_eq!(c.longitude, 5.32);
    }

    // ── Payload normalization ────────────────────────────────────────────

    #[test]
    fn test_payload_normalizes_fields() {
        let payload: CurrentWeatherResponse = serde_json::from_value(owm_body()).unwrap();
        let w = WeatherSnapshot::try_from(payload).unwrap();
        assert_eq!(w.condition, "rain");
        assert_eq!(w.temperature, 13);
        assert_eq!(w.description, "light rain");
        assert_eq!(w.humidity, 87);
        assert_eq!(w.city, "Bergen");
    }

    #[test]
    fn test_payload_without_conditions_fails() {
        let payload: CurrentWeatherResponse = serde_json::from_value(serde_json::json!({
            "weather": [],
            "main": {"temp": 1.0, "humidity": 10}
        }))
        .unwrap();
        assert!(matches!(
            WeatherSnapshot::try_from(payload),
            Err(WeatherError::NoConditions)
        ));
    }

    #[test]
    fn test_payload_blank_city_is_unknown() {
        let payload: CurrentWeatherResponse = serde_json::from_value(serde_json::json!({
            "weather": [{"main": "Clear", "description": "clear sky"}],
            "main": {"temp": -0.4, "humidity": 40},
            "name": ""
        }))
        .unwrap();
        let w = WeatherSnapshot::try_from(payload).unwrap();
        assert_eq!(w.city, "Unknown");
        assert_eq!(w.temperature, 0);
    }

    #[test]
    fn test_negative_half_temperature_rounds_up() {
        let payload: CurrentWeatherResponse = serde_json::from_value(serde_json::json!({
            "weather": [{"main": "Snow", "description": "light snow"}],
            "main": {"temp": -2.5, "humidity": 80.5},
            "name": "Tromsø"
        }))
        .unwrap();
        let w = WeatherSnapshot::try_from(payload).unwrap();
        assert_eq!(w.temperature, -2);
        assert_eq!(w.humidity, 81);
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(2.5), 3);
        assert_eq!(round_half_up(-2.5), -2);
        assert_eq!(round_half_up(-2.6), -3);
        assert_eq!(round_half_up(12.4), 12);
    }

    // ── Client ───────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_fetch_without_key_returns_fallback() {
        let client = WeatherClient::new("http://127.0.0.1:9", None).unwrap();
        assert!(!client.has_api_key());
        assert_eq!(client.fetch(None, None).await, WeatherSnapshot::unavailable());
    }

    #[tokio::test]
    async fn test_fetch_success() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .and(query_param("appid", "test-key"))
            .and(query_param("units", "metric"))
            .and(query_param("lat", "60.39"))
            .and(query_param("lon", "5.32"))
            .respond_with(ResponseTemplate::new(200).set_body_json(owm_body()))
            .expect(1)
            .mount(&server)
            .await;

        let client = WeatherClient::new(server.uri(), Some("test-key".into())).unwrap();
        let w = client.fetch(Some(60.39), Some(5.32)).await;
        assert_eq!(w.condition, "rain");
        assert_eq!(w.city, "Bergen");
    }

    #[tokio::test]
    async fn test_fetch_uses_default_coordinates() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .and(query_param("lat", "40.7128"))
            .and(query_param("lon", "-74.006"))
            .respond_with(ResponseTemplate::new(200).set_body_json(owm_body()))
            .expect(1)
            .mount(&server)
            .await;

        let client = WeatherClient::new(server.uri(), Some("test-key".into())).unwrap();
        let w = client.fetch(None, None).await;
        assert_eq!(w.city, "Bergen");
    }

    #[tokio::test]
    async fn test_fetch_api_error_returns_fallback() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "cod": 401,
                "message": "Invalid API key"
            })))
            .mount(&server)
            .await;

        let client = WeatherClient::new(server.uri(), Some("bad-key".into())).unwrap();

        let err = client.try_fetch(Coordinates::DEFAULT).await.unwrap_err();
        assert!(matches!(err, WeatherError::Api { status, .. } if status == StatusCode::UNAUTHORIZED));

        assert_eq!(client.fetch(None, None).await, WeatherSnapshot::unavailable());
    }

    #[tokio::test]
    async fn test_fetch_garbage_body_returns_fallback() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = WeatherClient::new(server.uri(), Some("test-key".into())).unwrap();
        assert_eq!(client.fetch(None, None).await, WeatherSnapshot::unavailable());
    }
}
