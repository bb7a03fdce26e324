//! Location resolution for weather lookups.

use std::fmt;

/// Reply used when a coordinate lookup finds nothing; coordinates are never
/// echoed back to the user.
pub const UNKNOWN_PLACE_MESSAGE: &str = "Я не знаю какая погода в этом месте.";

/// What the weather provider is asked for
#[derive(Debug, Clone, PartialEq)]
pub enum LocationQuery {
    ByName(String),
    ByCoordinates { lat: f64, lon: f64 },
}

/// Where a location came from in the inbound message
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LocationSource<'a> {
    Text(&'a str),
    Transcript(&'a str),
    Geolocation { latitude: f64, longitude: f64 },
}

/// Map an inbound source to a query. Text and voice transcripts are always
/// place names; shared geolocation is always coordinates.
pub fn resolve(source: LocationSource<'_>) -> LocationQuery {
    match source {
        LocationSource::Text(text) | LocationSource::Transcript(text) => {
            LocationQuery::ByName(text.trim().to_string())
        }
        LocationSource::Geolocation {
            latitude,
            longitude,
        } => LocationQuery::ByCoordinates {
            lat: latitude,
            lon: longitude,
        },
    }
}

impl LocationQuery {
    /// Provider query parameters: `q=<name>` or `lat=<>&lon=<>`
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        match self {
            LocationQuery::ByName(name) => vec![("q", name.clone())],
            LocationQuery::ByCoordinates { lat, lon } => {
                vec![("lat", lat.to_string()), ("lon", lon.to_string())]
            }
        }
    }

    /// User-facing text when the provider has no match
    pub fn not_found_message(&self) -> String {
        match self {
            LocationQuery::ByName(name) => format!("Я не нашел населенный пункт \"{name}\"."),
            LocationQuery::ByCoordinates { .. } => UNKNOWN_PLACE_MESSAGE.to_string(),
        }
    }
}

impl fmt::Display for LocationQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocationQuery::ByName(name) => write!(f, "name '{name}'"),
            LocationQuery::ByCoordinates { lat, lon } => write!(f, "coordinates ({lat}, {lon})"),
        }
    }
}
