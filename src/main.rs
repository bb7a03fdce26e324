use actix_web::HttpServer;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use weather_bot::{
    AppMetrics, AppState, BotConfig, HttpClient, HttpClientConfig, HttpClientMetrics,
    MetricsConfig, ReplyDispatcher, ServerConfig, create_base_app,
};

/// Log as JSON lines when `LOG_FORMAT=json`, human-readable otherwise
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT").is_ok_and(|format| format.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    init_tracing();

    info!(version = env!("CARGO_PKG_VERSION"), "Starting weather bot");

    let bot_config = BotConfig::from_env();
    let server_config = ServerConfig::from_env();
    let metrics_config = MetricsConfig::from_env();

    let metrics = AppMetrics::new().map_err(std::io::Error::other)?;
    let client_metrics =
        HttpClientMetrics::new(&metrics.registry).map_err(std::io::Error::other)?;
    let http = HttpClient::new(HttpClientConfig::from_env(), Some(client_metrics))
        .map_err(std::io::Error::other)?;

    let mut state = AppState::new(metrics)
        .with_webhook_secret(bot_config.webhook_secret_token.clone())
        .with_metrics_config(metrics_config);

    match ReplyDispatcher::from_config(&bot_config, http) {
        Ok(dispatcher) => state = state.with_dispatcher(dispatcher),
        Err(e) => warn!(error = %e, "Bot disabled; updates will be acknowledged and ignored"),
    }

    info!(
        bind_address = %server_config.bind_address,
        bot_enabled = state.dispatcher.is_some(),
        webhook_secret = state.webhook_secret.0.is_some(),
        "Server starting"
    );

    HttpServer::new(move || create_base_app(state.clone()))
        .bind(&server_config.bind_address)?
        .run()
        .await
}
