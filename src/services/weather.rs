//! Weather gateway backed by the OpenWeatherMap current-weather API.

use crate::{
    models::{Reading, WeatherObservation},
    services::{
        http_client::{HttpClient, HttpClientError, OperationType},
        location::LocationQuery,
    },
};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;

/// Source of current weather observations
#[async_trait]
pub trait WeatherGateway: Send + Sync {
    async fn fetch_current(&self, query: &LocationQuery)
        -> Result<WeatherObservation, WeatherError>;
}

/// Errors returned by a weather gateway
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("Location not found")]
    NotFound,

    #[error("Weather API request failed: {0}")]
    Transport(#[from] HttpClientError),

    #[error("Weather API returned status: {0}")]
    Status(u16),

    #[error("Failed to parse weather data: {0}")]
    InvalidPayload(String),
}

/// OpenWeatherMap API response structure
#[derive(Debug, Default, Deserialize)]
struct OpenWeatherResponse {
    name: Option<String>,
    #[serde(default)]
    weather: Vec<WeatherCondition>,
    main: Option<MainReadings>,
    visibility: Option<i64>,
    wind: Option<WindReadings>,
    clouds: Option<CloudReadings>,
    sys: Option<SunAndCountry>,
}

#[derive(Debug, Deserialize)]
struct WeatherCondition {
    description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct MainReadings {
    temp: Option<Reading>,
    feels_like: Option<Reading>,
    pressure: Option<i64>,
    humidity: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
struct WindReadings {
    speed: Option<Reading>,
    deg: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
struct CloudReadings {
    all: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
struct SunAndCountry {
    country: Option<String>,
    sunrise: Option<i64>,
    sunset: Option<i64>,
}

impl From<OpenWeatherResponse> for WeatherObservation {
    fn from(data: OpenWeatherResponse) -> Self {
        let main = data.main.unwrap_or_default();
        let wind = data.wind.unwrap_or_default();
        let sys = data.sys.unwrap_or_default();

        WeatherObservation {
            place: data.name.filter(|name| !name.is_empty()),
            country: sys.country,
            description: data.weather.into_iter().next().and_then(|w| w.description),
            temperature: main.temp,
            feels_like: main.feels_like,
            pressure: main.pressure,
            humidity: main.humidity,
            visibility: data.visibility,
            wind_speed: wind.speed,
            wind_deg: wind.deg,
            cloudiness: data.clouds.and_then(|c| c.all),
            sunrise: sys.sunrise,
            sunset: sys.sunset,
        }
    }
}

/// OpenWeatherMap client
pub struct OpenWeatherClient {
    http: HttpClient,
    api_key: String,
    base_url: String,
}

impl OpenWeatherClient {
    pub fn new(http: HttpClient, api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            http,
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl WeatherGateway for OpenWeatherClient {
    async fn fetch_current(
        &self,
        query: &LocationQuery,
    ) -> Result<WeatherObservation, WeatherError> {
        let url = format!("{}/weather", self.base_url);

        let mut params = query.query_params();
        params.push(("appid", self.api_key.clone()));
        params.push(("lang", "ru".to_string()));
        params.push(("units", "metric".to_string()));

        let response = self
            .http
            .send(self.http.get(&url).query(&params), OperationType::Read)
            .await?;

        match response.status() {
            status if status.is_success() => {}
            StatusCode::NOT_FOUND | StatusCode::BAD_REQUEST => {
                tracing::info!(query = %query, "Weather provider has no match");
                return Err(WeatherError::NotFound);
            }
            status => return Err(WeatherError::Status(status.as_u16())),
        }

        let data: OpenWeatherResponse = response
            .json()
            .await
            .map_err(|e| WeatherError::InvalidPayload(e.without_url().to_string()))?;

        Ok(data.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::formatter::{LocalClock, format_long};

    const LONDON: &str = r#"{
        "coord": {"lon": -0.1257, "lat": 51.5085},
        "weather": [{"id": 500, "main": "Rain", "description": "небольшой дождь", "icon": "10d"}],
        "base": "stations",
        "main": {"temp": 11.3, "feels_like": 10.52, "temp_min": 10.1, "temp_max": 12.2,
                 "pressure": 1009, "humidity": 82},
        "visibility": 10000,
        "wind": {"speed": 5.66, "deg": 240},
        "clouds": {"all": 75},
        "dt": 1700000000,
        "sys": {"type": 2, "id": 2075535, "country": "GB", "sunrise": 1699946000, "sunset": 1699978000},
        "timezone": 0,
        "id": 2643743,
        "name": "London",
        "cod": 200
    }"#;

    #[test]
    fn test_observation_from_provider_payload() {
        let data: OpenWeatherResponse = serde_json::from_str(LONDON).unwrap();
        let observation = WeatherObservation::from(data);

        assert_eq!(observation.place.as_deref(), Some("London"));
        assert_eq!(observation.country.as_deref(), Some("GB"));
        assert_eq!(observation.description.as_deref(), Some("небольшой дождь"));
        assert_eq!(observation.temperature, Reading::from_f64(11.3));
        assert_eq!(observation.pressure, Some(1009));
        assert_eq!(observation.wind_deg, Some(240));
        assert_eq!(observation.cloudiness, Some(75));
        assert_eq!(observation.sunset, Some(1699978000));
        assert_eq!(observation.location_label(), "London, GB");
    }

    #[test]
    fn test_whole_number_readings_keep_their_form() {
        let data: OpenWeatherResponse = serde_json::from_str(
            r#"{
                "weather": [{"description": "ясно"}],
                "main": {"temp": 5, "feels_like": 2, "pressure": 1013, "humidity": 40},
                "visibility": 10000,
                "wind": {"speed": 3, "deg": 44},
                "clouds": {"all": 0},
                "sys": {"country": "RU", "sunrise": 1704088680, "sunset": 1704114000},
                "name": "Москва"
            }"#,
        )
        .unwrap();
        let observation = WeatherObservation::from(data);

        let text = format_long(&observation, &LocalClock::default()).unwrap();
        assert!(text.contains("Температура 5 ℃, ощущается как 2 ℃."));
        assert!(text.contains("Ветер 3 м/с, СВ."));
        assert!(!text.contains("5.0"));
    }

    #[test]
    fn test_partial_payload_keeps_gaps() {
        let data: OpenWeatherResponse =
            serde_json::from_str(r#"{"name": "", "main": {"temp": 1.5}}"#).unwrap();
        let observation = WeatherObservation::from(data);

        assert_eq!(observation.place, None);
        assert_eq!(observation.temperature, Reading::from_f64(1.5));
        assert_eq!(observation.description, None);
        assert_eq!(observation.sunrise, None);
    }
}
