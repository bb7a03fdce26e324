//! OpenAPI specification generation and app factory.

use crate::{
    config::MetricsConfig,
    handlers::{WebhookSecret, get_metrics, health, version, webhook},
    middleware::{MetricsMiddleware, RequestIdMiddleware},
    services::{AppMetrics, ReplyDispatcher},
    utils::route::WEBHOOK_ROUTE,
};
use actix_web::App;
use paperclip::actix::{OpenApiExt, web};
use paperclip::v2::models::{DefaultApiRaw, Info};

/// Creates the OpenAPI specification for the operational endpoints
pub fn create_openapi_spec() -> DefaultApiRaw {
    DefaultApiRaw {
        info: Info {
            title: "Weather Bot".into(),
            version: env!("CARGO_PKG_VERSION").into(),
            description: Some(
                "Telegram bot answering with the current weather for a named place, a voice \
                 message naming a place, or a shared geolocation.\n\n\
                 ## Webhook\n\
                 Telegram delivers updates with `POST /webhook`. The endpoint always answers \
                 `200 OK` with an empty body; replies are sent back through the Bot API.\n\
                 \n\
                 **Headers:**\n\
                 - `X-Telegram-Bot-Api-Secret-Token`: must match `WEBHOOK_SECRET_TOKEN` when it is set\n\
                 - `X-Request-ID`: optional; echoed back or generated\n\
                 \n\
                 **Configuration:**\n\
                 - `TELEGRAM_BOT_TOKEN`: without it every update is acknowledged and ignored\n\
                 - `OPENWEATHER_API_KEY`: weather provider key\n\
                 - `SPEECH_IAM_TOKEN`, `SPEECH_FOLDER_ID`: speech recognition and synthesis"
                    .into(),
            ),
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Shared state handed to every worker's app
#[derive(Clone)]
pub struct AppState {
    /// `None` when the bot token is missing
    pub dispatcher: Option<ReplyDispatcher>,
    pub webhook_secret: WebhookSecret,
    pub metrics: AppMetrics,
    pub metrics_config: MetricsConfig,
}

impl AppState {
    /// State for a bot without credentials
    pub fn new(metrics: AppMetrics) -> Self {
        Self {
            dispatcher: None,
            webhook_secret: WebhookSecret::default(),
            metrics,
            metrics_config: MetricsConfig::default(),
        }
    }

    pub fn with_dispatcher(mut self, dispatcher: ReplyDispatcher) -> Self {
        self.dispatcher = Some(dispatcher);
        self
    }

    pub fn with_webhook_secret(mut self, secret: Option<String>) -> Self {
        self.webhook_secret = WebhookSecret(secret);
        self
    }

    pub fn with_metrics_config(mut self, config: MetricsConfig) -> Self {
        self.metrics_config = config;
        self
    }
}

/// Creates the application with every route and middleware
///
/// Used by `main` for each worker and by the integration tests, so both
/// exercise the same middleware stack:
/// - Request ID propagation and request logging
/// - Metrics collection
/// - OpenAPI specification at `/api/spec/v2`
///
/// The webhook is mounted on the plain actix app after the OpenAPI routes;
/// the middleware still applies to it.
pub fn create_base_app(
    state: AppState,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let mut app = App::new()
        .wrap(RequestIdMiddleware)
        .wrap(MetricsMiddleware)
        .wrap_api_with_spec(create_openapi_spec())
        .app_data(web::Data::new(state.metrics))
        .app_data(web::Data::new(state.metrics_config))
        .app_data(web::Data::new(state.webhook_secret));

    if let Some(dispatcher) = state.dispatcher {
        app = app.app_data(web::Data::new(dispatcher));
    }

    app.service(web::resource("/api/health").route(web::get().to(health)))
        .service(web::resource("/api/version").route(web::get().to(version)))
        .service(web::resource("/api/metrics").route(web::get().to(get_metrics)))
        .with_json_spec_at("/api/spec/v2")
        .build()
        .service(actix_web::web::resource(WEBHOOK_ROUTE).route(actix_web::web::post().to(webhook)))
}
