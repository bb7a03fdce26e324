//! Weather Bot - a Telegram webhook service answering with the current weather
//!
//! Users send the bot a place name as text, a voice message naming a place,
//! or a shared geolocation. The bot looks up the current weather and replies
//! with a Russian-language summary, as text or as synthesized speech.
//!
//! ## Architecture
//!
//! - `models/` - Telegram update payloads, weather observations, API responses
//! - `services/` - Unit conversion, reply formatting, location resolution,
//!   the reply dispatcher and the messaging, weather and speech gateways
//! - `handlers/` - Webhook, health, version and metrics endpoints
//! - `middleware/` - Request IDs and HTTP metrics
//! - `config/` - Environment-driven configuration
//! - `errors` - User-facing error taxonomy
//! - `utils/` - Request inspection helpers
//!
//! ## Quick Start
//!
//! ```no_run
//! use weather_bot::{AppMetrics, AppState, create_base_app};
//!
//! #[actix_web::main]
//! async fn main() -> std::io::Result<()> {
//!     let metrics = AppMetrics::new().map_err(std::io::Error::other)?;
//!     let state = AppState::new(metrics);
//!     let _app = create_base_app(state);
//!     // Configure and run the server
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod utils;

pub use config::{BotConfig, MetricsConfig, ServerConfig};
pub use errors::BotError;
pub use handlers::{
    AppState, WebhookSecret, create_base_app, create_openapi_spec, get_metrics, health, version,
    webhook,
};
pub use middleware::{MetricsMiddleware, RequestId, RequestIdMiddleware};
pub use models::{HealthResponse, Reading, Update, VersionResponse, WeatherObservation};
pub use services::{
    AppMetrics, DispatchOutcome, DispatchSettings, HttpClient, HttpClientConfig,
    HttpClientMetrics, LocalClock, LocationQuery, MessagingGateway, MessagingError,
    OpenWeatherClient, ReplyDispatcher, SpeechError, SpeechGateway, SpeechSettings,
    TelegramClient, UpdateKind, WeatherError, WeatherGateway, YandexSpeechClient,
};
