//! Bot credentials and reply settings.

use crate::{
    errors::BotError,
    services::{DispatchSettings, LocalClock, SpeechSettings},
};
use std::env;

pub const DEFAULT_TELEGRAM_API_BASE_URL: &str = "https://api.telegram.org";
pub const DEFAULT_OPENWEATHER_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

/// Largest offset a real zone uses; anything beyond is clamped
const MAX_UTC_OFFSET_HOURS: i32 = 14;

/// Configuration for the Telegram bot and its upstream services
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// Bot API token; the bot stays silent without it
    pub telegram_token: Option<String>,
    pub telegram_api_base_url: String,
    /// Expected `X-Telegram-Bot-Api-Secret-Token` header value
    pub webhook_secret_token: Option<String>,
    pub openweather_api_key: String,
    pub openweather_base_url: String,
    pub speech: SpeechSettings,
    pub clock: LocalClock,
    pub max_voice_duration_secs: u32,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            telegram_token: None,
            telegram_api_base_url: DEFAULT_TELEGRAM_API_BASE_URL.to_string(),
            webhook_secret_token: None,
            openweather_api_key: String::new(),
            openweather_base_url: DEFAULT_OPENWEATHER_BASE_URL.to_string(),
            speech: SpeechSettings::default(),
            clock: LocalClock::default(),
            max_voice_duration_secs: 30,
        }
    }
}

impl BotConfig {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    ///
    /// Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();

        let utc_offset_hours = var("BOT_UTC_OFFSET_HOURS")
            .and_then(|v| v.trim().parse::<i32>().ok())
            .map(|hours| hours.clamp(-MAX_UTC_OFFSET_HOURS, MAX_UTC_OFFSET_HOURS))
            .unwrap_or(defaults.clock.utc_offset_hours);

        let clock = LocalClock {
            utc_offset_hours,
            zone_label: var("BOT_ZONE_LABEL").unwrap_or(defaults.clock.zone_label),
        };

        let speech_defaults = SpeechSettings::default();
        let speech = SpeechSettings {
            stt_url: var("SPEECH_STT_URL").unwrap_or(speech_defaults.stt_url),
            tts_url: var("SPEECH_TTS_URL").unwrap_or(speech_defaults.tts_url),
            iam_token: var("SPEECH_IAM_TOKEN").unwrap_or_default(),
            folder_id: var("SPEECH_FOLDER_ID"),
            voice: var("SPEECH_VOICE").unwrap_or(speech_defaults.voice),
            ..speech_defaults
        };

        Self {
            telegram_token: var("TELEGRAM_BOT_TOKEN"),
            telegram_api_base_url: var("TELEGRAM_API_BASE_URL")
                .unwrap_or(defaults.telegram_api_base_url),
            webhook_secret_token: var("WEBHOOK_SECRET_TOKEN"),
            openweather_api_key: var("OPENWEATHER_API_KEY").unwrap_or_default(),
            openweather_base_url: var("OPENWEATHER_BASE_URL")
                .unwrap_or(defaults.openweather_base_url),
            speech,
            clock,
            max_voice_duration_secs: var("BOT_MAX_VOICE_DURATION_SECS")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.max_voice_duration_secs),
        }
    }

    /// The bot token, or [`BotError::MissingCredential`] when unset
    pub fn require_token(&self) -> Result<&str, BotError> {
        self.telegram_token
            .as_deref()
            .ok_or(BotError::MissingCredential)
    }

    pub fn dispatch_settings(&self) -> DispatchSettings {
        DispatchSettings {
            max_voice_duration_secs: self.max_voice_duration_secs,
            clock: self.clock.clone(),
        }
    }
}
