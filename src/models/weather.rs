//! Current-weather observation as delivered by the weather provider.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A provider number kept in the form it arrived in.
///
/// `5` renders as `5` and `5.0` as `5.0`; the value is only widened to
/// `f64` when arithmetic needs it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Reading(serde_json::Number);

impl Reading {
    /// `None` for NaN and infinities, which JSON cannot carry
    pub fn from_f64(value: f64) -> Option<Self> {
        serde_json::Number::from_f64(value).map(Self)
    }

    pub fn as_f64(&self) -> f64 {
        self.0.as_f64().unwrap_or_default()
    }

    pub fn is_integer(&self) -> bool {
        !self.0.is_f64()
    }
}

impl From<i64> for Reading {
    fn from(value: i64) -> Self {
        Self(value.into())
    }
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// One current-weather observation.
///
/// Values are kept exactly as the provider delivered them. Everything except
/// `place` and `country` is required for rendering; an absent value is
/// reported by the formatter instead of being papered over.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherObservation {
    /// Place name, absent for some coordinate lookups
    pub place: Option<String>,
    /// ISO country code
    pub country: Option<String>,
    /// Free-text description in the requested language
    pub description: Option<String>,
    /// Temperature, °C
    pub temperature: Option<Reading>,
    /// Feels-like temperature, °C
    pub feels_like: Option<Reading>,
    /// Pressure, hPa
    pub pressure: Option<i64>,
    /// Relative humidity, percent
    pub humidity: Option<i64>,
    /// Visibility, metres
    pub visibility: Option<i64>,
    /// Wind speed, m/s
    pub wind_speed: Option<Reading>,
    /// Wind direction, degrees
    pub wind_deg: Option<i64>,
    /// Cloudiness, percent
    pub cloudiness: Option<i64>,
    /// Sunrise, UTC epoch seconds
    pub sunrise: Option<i64>,
    /// Sunset, UTC epoch seconds
    pub sunset: Option<i64>,
}

impl WeatherObservation {
    /// Location label for logs, e.g. "Moscow, RU"
    pub fn location_label(&self) -> String {
        match (&self.place, &self.country) {
            (Some(place), Some(country)) => format!("{place}, {country}"),
            (Some(place), None) => place.clone(),
            _ => "unknown".to_string(),
        }
    }
}
