//! Weather reply rendering.
//!
//! Two renderings share one observation: a long multi-line text for chat
//! replies and a terse script for speech synthesis. Both are pure and fail
//! with [`FormatError::MissingField`] instead of printing placeholders.

use crate::models::WeatherObservation;
use crate::services::units::{
    degrees_to_compass, epoch_to_local_clock, pressure_to_mm_hg, round_whole,
};

/// Errors raised while rendering an observation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    #[error("Weather payload is missing required field '{0}'")]
    MissingField(&'static str),
}

/// Fixed local zone used for sunrise/sunset times
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalClock {
    pub utc_offset_hours: i32,
    pub zone_label: String,
}

impl Default for LocalClock {
    fn default() -> Self {
        Self {
            utc_offset_hours: 3,
            zone_label: "МСК".to_string(),
        }
    }
}

impl LocalClock {
    fn time_of(&self, epoch_seconds: i64) -> String {
        epoch_to_local_clock(epoch_seconds, self.utc_offset_hours)
    }
}

/// Rendered reply: display text always, voice script on request
#[derive(Debug, Clone, PartialEq)]
pub struct FormattedReply {
    pub display_text: String,
    pub voice_script: Option<String>,
}

fn required<T>(value: Option<T>, field: &'static str) -> Result<T, FormatError> {
    value.ok_or(FormatError::MissingField(field))
}

fn required_description(observation: &WeatherObservation) -> Result<String, FormatError> {
    observation
        .description
        .as_deref()
        .map(capitalize)
        .ok_or(FormatError::MissingField("description"))
}

/// Upper-case the first character and lower-case the rest.
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Long multi-line report for a text reply.
///
/// Temperatures and wind speed print as the provider sent them: `5` stays
/// `5`, `5.0` stays `5.0`.
pub fn format_long(
    observation: &WeatherObservation,
    clock: &LocalClock,
) -> Result<String, FormatError> {
    let description = required_description(observation)?;
    let temperature = required(observation.temperature.as_ref(), "temperature")?;
    let feels_like = required(observation.feels_like.as_ref(), "feels_like")?;
    let pressure = pressure_to_mm_hg(required(observation.pressure, "pressure")?);
    let humidity = required(observation.humidity, "humidity")?;
    let visibility = required(observation.visibility, "visibility")?;
    let wind_speed = required(observation.wind_speed.as_ref(), "wind_speed")?;
    let direction = degrees_to_compass(required(observation.wind_deg, "wind_deg")?);
    required(observation.cloudiness, "cloudiness")?;
    let sunrise = clock.time_of(required(observation.sunrise, "sunrise")?);
    let sunset = clock.time_of(required(observation.sunset, "sunset")?);
    let zone = &clock.zone_label;

    Ok(format!(
        "{description}.\n\
         Температура {temperature} ℃, ощущается как {feels_like} ℃.\n\
         Атмосферное давление {pressure} мм рт. ст.\n\
         Влажность {humidity}%.\n\
         Видимость {visibility} метров.\n\
         Ветер {wind_speed} м/с, {direction}.\n\
         Восход солнца {sunrise} {zone}. Закат {sunset} {zone}."
    ))
}

/// Short script for speech synthesis; every number is rounded to a whole.
pub fn format_voice(observation: &WeatherObservation) -> Result<String, FormatError> {
    let description = required_description(observation)?;
    let temperature = required(observation.temperature.as_ref(), "temperature")?;
    let feels_like = required(observation.feels_like.as_ref(), "feels_like")?;
    let temperature = round_whole(temperature.as_f64());
    let feels_like = round_whole(feels_like.as_f64());
    let pressure = pressure_to_mm_hg(required(observation.pressure, "pressure")?);
    let humidity = required(observation.humidity, "humidity")?;

    Ok(format!(
        "{description}. \
         Температура {temperature} градусов цельсия. \
         Ощущается как {feels_like} градусов цельсия. \
         Давление {pressure} миллиметров ртутного столба. \
         Влажность {humidity} процентов."
    ))
}

/// Render the display text and, when `voice` is set, the voice script.
pub fn render(
    observation: &WeatherObservation,
    clock: &LocalClock,
    voice: bool,
) -> Result<FormattedReply, FormatError> {
    let display_text = format_long(observation, clock)?;
    let voice_script = if voice {
        Some(format_voice(observation)?)
    } else {
        None
    };

    Ok(FormattedReply {
        display_text,
        voice_script,
    })
}
