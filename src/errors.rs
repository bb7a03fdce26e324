//! Bot-level error taxonomy.
//!
//! Every variant carries the text the user receives in the chat. None of
//! them ever change the webhook response status.

use crate::services::location::LocationQuery;

pub const CAPABILITIES_MESSAGE: &str = "Могу обработать только текстовое или голосовое сообщение \
     с названием населенного пункта или сообщение с геопозицией!";
pub const FILE_UNAVAILABLE_MESSAGE: &str = "Не удалось получить файл";
pub const TRANSCRIPTION_FAILED_MESSAGE: &str = "Не удалось распознать сообщение";
pub const SYNTHESIS_FAILED_MESSAGE: &str = "Не удалось синтезировать голосовое сообщение";
pub const UPSTREAM_UNAVAILABLE_MESSAGE: &str = "Произошла ошибка при получении данных о погоде.";

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BotError {
    /// Bot token absent; the service acknowledges updates and does nothing
    #[error("Telegram bot token is not configured")]
    MissingCredential,

    #[error("Update carries no text, voice or location")]
    UnrecognizedUpdateShape,

    #[error("No weather for {0}")]
    LocationNotFound(LocationQuery),

    #[error("Voice message of {duration}s exceeds the {max}s limit")]
    VoiceTooLong { duration: u32, max: u32 },

    #[error("Voice file could not be downloaded")]
    FileUnavailable,

    #[error("Speech could not be transcribed")]
    TranscriptionFailed,

    #[error("Speech could not be synthesized")]
    SynthesisFailed,

    #[error("Weather data is unavailable")]
    UpstreamUnavailable,
}

impl BotError {
    /// Text sent to the user for this failure
    pub fn user_message(&self) -> String {
        match self {
            // never sent: without a token there is nobody to send it
            BotError::MissingCredential => String::new(),
            BotError::UnrecognizedUpdateShape => CAPABILITIES_MESSAGE.to_string(),
            BotError::LocationNotFound(query) => query.not_found_message(),
            BotError::VoiceTooLong { max, .. } => {
                format!("Я могу обрабатывать голосовые сообщения не длиннее {max} секунд")
            }
            BotError::FileUnavailable => FILE_UNAVAILABLE_MESSAGE.to_string(),
            BotError::TranscriptionFailed => TRANSCRIPTION_FAILED_MESSAGE.to_string(),
            BotError::SynthesisFailed => SYNTHESIS_FAILED_MESSAGE.to_string(),
            BotError::UpstreamUnavailable => UPSTREAM_UNAVAILABLE_MESSAGE.to_string(),
        }
    }

    /// Short label for metrics
    pub fn kind(&self) -> &'static str {
        match self {
            BotError::MissingCredential => "missing_credential",
            BotError::UnrecognizedUpdateShape => "unrecognized",
            BotError::LocationNotFound(_) => "not_found",
            BotError::VoiceTooLong { .. } => "voice_too_long",
            BotError::FileUnavailable => "file_unavailable",
            BotError::TranscriptionFailed => "transcription_failed",
            BotError::SynthesisFailed => "synthesis_failed",
            BotError::UpstreamUnavailable => "upstream_unavailable",
        }
    }
}
