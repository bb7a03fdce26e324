//! Per-update orchestration: classify the update, run exactly one terminal
//! action, and send exactly one reply.

use crate::{
    config::BotConfig,
    errors::BotError,
    models::{Location, Message, Update, Voice, WeatherObservation},
    services::{
        formatter::{self, FormatError, LocalClock},
        http_client::HttpClient,
        location::{self, LocationQuery, LocationSource},
        speech::{SpeechError, SpeechGateway, YandexSpeechClient},
        telegram::{MessagingGateway, TelegramClient},
        weather::{OpenWeatherClient, WeatherError, WeatherGateway},
    },
};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

pub const START_MESSAGE: &str = "Я расскажу о текущей погоде для населенного пункта.";
pub const HELP_MESSAGE: &str = "Я могу ответить на:\n\
     - Текстовое сообщение с названием населенного пункта.\n\
     - Голосовое сообщение с названием населенного пункта.\n\
     - Сообщение с геопозицией.";

/// What an inbound message asks for; first match wins
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateKind<'a> {
    Start,
    Help,
    Text(&'a str),
    Voice(&'a Voice),
    Location(Location),
    Unrecognized,
}

impl<'a> UpdateKind<'a> {
    pub fn classify(message: &'a Message) -> Self {
        if let Some(text) = message.text.as_deref() {
            return match text {
                "/start" => UpdateKind::Start,
                "/help" => UpdateKind::Help,
                other => UpdateKind::Text(other),
            };
        }
        if let Some(voice) = &message.voice {
            return UpdateKind::Voice(voice);
        }
        if let Some(location) = message.location {
            return UpdateKind::Location(location);
        }
        UpdateKind::Unrecognized
    }

    pub fn label(&self) -> &'static str {
        match self {
            UpdateKind::Start => "start",
            UpdateKind::Help => "help",
            UpdateKind::Text(_) => "text",
            UpdateKind::Voice(_) => "voice",
            UpdateKind::Location(_) => "location",
            UpdateKind::Unrecognized => "unrecognized",
        }
    }
}

/// The single outbound message for an update
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Text(String),
    Voice(Vec<u8>),
}

/// Result of dispatching one update
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Update had no message; nothing was sent
    Ignored,
    Replied {
        kind: &'static str,
        /// `"ok"` or the [`BotError::kind`] that produced the reply
        result: &'static str,
        delivered: bool,
    },
}

/// Dispatcher knobs taken from configuration
#[derive(Debug, Clone)]
pub struct DispatchSettings {
    pub max_voice_duration_secs: u32,
    pub clock: LocalClock,
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self {
            max_voice_duration_secs: 30,
            clock: LocalClock::default(),
        }
    }
}

/// Maps an update to its reply through the three gateways
#[derive(Clone)]
pub struct ReplyDispatcher {
    messaging: Arc<dyn MessagingGateway>,
    weather: Arc<dyn WeatherGateway>,
    speech: Arc<dyn SpeechGateway>,
    settings: DispatchSettings,
}

impl ReplyDispatcher {
    pub fn new(
        messaging: Arc<dyn MessagingGateway>,
        weather: Arc<dyn WeatherGateway>,
        speech: Arc<dyn SpeechGateway>,
        settings: DispatchSettings,
    ) -> Self {
        Self {
            messaging,
            weather,
            speech,
            settings,
        }
    }

    /// Wire the production gateways over one shared HTTP client.
    ///
    /// Fails with [`BotError::MissingCredential`] when no bot token is set.
    pub fn from_config(config: &BotConfig, http: HttpClient) -> Result<Self, BotError> {
        let token = config.require_token()?;

        if config.openweather_api_key.is_empty() {
            warn!("OPENWEATHER_API_KEY is not set; weather lookups will fail");
        }
        if config.speech.iam_token.is_empty() {
            warn!("SPEECH_IAM_TOKEN is not set; voice messages will fail");
        }

        let messaging = TelegramClient::new(http.clone(), token, &config.telegram_api_base_url);
        let weather = OpenWeatherClient::new(
            http.clone(),
            &config.openweather_api_key,
            &config.openweather_base_url,
        );
        let speech = YandexSpeechClient::new(http, config.speech.clone());

        Ok(Self::new(
            Arc::new(messaging),
            Arc::new(weather),
            Arc::new(speech),
            config.dispatch_settings(),
        ))
    }

    /// Process one update to completion.
    ///
    /// Sends exactly one reply when the update has a message and none
    /// otherwise. Failures become the reply text; they are never returned.
    pub async fn dispatch(&self, update: &Update) -> DispatchOutcome {
        let Some(message) = &update.message else {
            debug!(update_id = ?update.update_id, "Update has no message, ignoring");
            return DispatchOutcome::Ignored;
        };

        let chat_id = message.chat.id;
        let kind = UpdateKind::classify(message);

        let (reply, result) = match self.reply_for(&kind).await {
            Ok(reply) => (reply, "ok"),
            Err(err) => {
                info!(
                    chat_id,
                    kind = kind.label(),
                    error = %err,
                    "Replying with failure message"
                );
                (Reply::Text(err.user_message()), err.kind())
            }
        };

        let delivered = self.deliver(chat_id, reply).await;

        DispatchOutcome::Replied {
            kind: kind.label(),
            result,
            delivered,
        }
    }

    async fn reply_for(&self, kind: &UpdateKind<'_>) -> Result<Reply, BotError> {
        match kind {
            UpdateKind::Start => Ok(Reply::Text(START_MESSAGE.to_string())),
            UpdateKind::Help => Ok(Reply::Text(HELP_MESSAGE.to_string())),
            UpdateKind::Text(text) => {
                let query = location::resolve(LocationSource::Text(text));
                self.weather_text(&query).await.map(Reply::Text)
            }
            UpdateKind::Location(shared) => {
                let query = location::resolve(LocationSource::Geolocation {
                    latitude: shared.latitude,
                    longitude: shared.longitude,
                });
                self.weather_text(&query).await.map(Reply::Text)
            }
            UpdateKind::Voice(voice) => self.voice_reply(voice).await.map(Reply::Voice),
            UpdateKind::Unrecognized => Err(BotError::UnrecognizedUpdateShape),
        }
    }

    async fn observe(&self, query: &LocationQuery) -> Result<WeatherObservation, BotError> {
        match self.weather.fetch_current(query).await {
            Ok(observation) => {
                debug!(query = %query, location = %observation.location_label(), "Weather fetched");
                Ok(observation)
            }
            Err(WeatherError::NotFound) => Err(BotError::LocationNotFound(query.clone())),
            Err(e) => {
                error!(query = %query, error = %e, "Weather lookup failed");
                Err(BotError::UpstreamUnavailable)
            }
        }
    }

    fn malformed(e: FormatError) -> BotError {
        error!(error = %e, "Weather payload cannot be rendered");
        BotError::UpstreamUnavailable
    }

    async fn weather_text(&self, query: &LocationQuery) -> Result<String, BotError> {
        let observation = self.observe(query).await?;
        formatter::format_long(&observation, &self.settings.clock).map_err(Self::malformed)
    }

    async fn voice_script(&self, query: &LocationQuery) -> Result<String, BotError> {
        let observation = self.observe(query).await?;
        let rendered =
            formatter::render(&observation, &self.settings.clock, true).map_err(Self::malformed)?;

        rendered
            .voice_script
            .ok_or(BotError::UpstreamUnavailable)
    }

    async fn voice_reply(&self, voice: &Voice) -> Result<Vec<u8>, BotError> {
        let max = self.settings.max_voice_duration_secs;
        if voice.duration > max {
            return Err(BotError::VoiceTooLong {
                duration: voice.duration,
                max,
            });
        }

        let audio = self
            .messaging
            .fetch_file(&voice.file_id)
            .await
            .map_err(|e| {
                warn!(file_id = %voice.file_id, error = %e, "Voice download failed");
                BotError::FileUnavailable
            })?;

        let transcript = self.speech.transcribe(audio).await.map_err(|e| {
            match e {
                SpeechError::Unrecognized => info!("Voice message not recognized"),
                other => warn!(error = %other, "Transcription failed"),
            }
            BotError::TranscriptionFailed
        })?;

        let query = location::resolve(LocationSource::Transcript(&transcript));

        // lookup failures are spoken back like a regular answer
        let script = match self.voice_script(&query).await {
            Ok(script) => script,
            Err(err) => err.user_message(),
        };

        self.speech.synthesize(&script).await.map_err(|e| {
            warn!(error = %e, "Speech synthesis failed");
            BotError::SynthesisFailed
        })
    }

    async fn deliver(&self, chat_id: i64, reply: Reply) -> bool {
        let result = match reply {
            Reply::Text(text) => self.messaging.send_text(chat_id, &text).await,
            Reply::Voice(audio) => self.messaging.send_voice(chat_id, audio).await,
        };

        match result {
            Ok(()) => true,
            Err(e) => {
                error!(chat_id, error = %e, "Failed to deliver reply");
                false
            }
        }
    }
}
