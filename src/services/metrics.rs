//! Metrics collection and Prometheus integration service.

use crate::services::dispatcher::DispatchOutcome;
use prometheus::{
    CounterVec, Gauge, Histogram, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder,
};
use std::time::{Duration, Instant};

/// Build metadata emitted by `build.rs`; absent when git is unavailable
pub const GIT_SHA: &str = match option_env!("VERGEN_GIT_SHA") {
    Some(sha) => sha,
    None => "unknown",
};
pub const BUILD_TIMESTAMP: &str = match option_env!("VERGEN_BUILD_TIMESTAMP") {
    Some(ts) => ts,
    None => "unknown",
};

/// Application metrics collector for Prometheus integration
#[derive(Clone)]
pub struct AppMetrics {
    pub registry: Registry,
    pub http_requests_total: CounterVec,
    pub http_request_duration_seconds: HistogramVec,
    pub app_uptime_seconds: Gauge,
    pub app_info: CounterVec,
    pub bot_updates_total: CounterVec,
    pub bot_replies_total: CounterVec,
    pub webhook_deliveries_total: CounterVec,
    pub webhook_payload_bytes: Histogram,
    pub start_time: Instant,
}

impl AppMetrics {
    /// Create a new metrics collector with default Prometheus metrics
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        // HTTP request counter by method, status, and route
        let http_requests_total = CounterVec::new(
            Opts::new("http_requests_total", "Total number of HTTP requests"),
            &["method", "status", "route"],
        )?;

        let http_request_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "http_request_duration_seconds",
                "HTTP request duration in seconds",
            )
            .buckets(vec![
                0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
            ]),
            &["method", "route"],
        )?;

        let app_uptime_seconds = Gauge::new("app_uptime_seconds", "Application uptime in seconds")?;

        let app_info = CounterVec::new(
            Opts::new("app_info", "Application information"),
            &["version", "commit", "build_time"],
        )?;

        // Inbound updates by classified kind
        let bot_updates_total = CounterVec::new(
            Opts::new("bot_updates_total", "Total number of webhook updates received"),
            &["kind"],
        )?;

        let bot_replies_total = CounterVec::new(
            Opts::new("bot_replies_total", "Total number of replies by kind and outcome"),
            &["kind", "outcome"],
        )?;

        // Telegram redelivers anything not answered with a 2xx
        let webhook_deliveries_total = CounterVec::new(
            Opts::new(
                "webhook_deliveries_total",
                "Webhook deliveries by acknowledgement status",
            ),
            &["status"],
        )?;

        let webhook_payload_bytes = Histogram::with_opts(
            HistogramOpts::new("webhook_payload_bytes", "Webhook request body size in bytes")
                .buckets(vec![256.0, 512.0, 1024.0, 2048.0, 4096.0, 8192.0, 16384.0]),
        )?;

        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;
        registry.register(Box::new(app_uptime_seconds.clone()))?;
        registry.register(Box::new(app_info.clone()))?;
        registry.register(Box::new(bot_updates_total.clone()))?;
        registry.register(Box::new(bot_replies_total.clone()))?;
        registry.register(Box::new(webhook_deliveries_total.clone()))?;
        registry.register(Box::new(webhook_payload_bytes.clone()))?;

        let start_time = Instant::now();

        app_info
            .with_label_values(&[env!("CARGO_PKG_VERSION"), GIT_SHA, BUILD_TIMESTAMP])
            .inc();

        Ok(Self {
            registry,
            http_requests_total,
            http_request_duration_seconds,
            app_uptime_seconds,
            app_info,
            bot_updates_total,
            bot_replies_total,
            webhook_deliveries_total,
            webhook_payload_bytes,
            start_time,
        })
    }

    /// Record an HTTP request with method, route, status, and duration
    pub fn record_request(&self, method: &str, route: &str, status: u16, duration: Duration) {
        if route == "/api/metrics" {
            // Don't record metrics for the metrics endpoint itself to avoid noise
            return;
        }

        self.http_requests_total
            .with_label_values(&[method, &status.to_string(), route])
            .inc();

        self.http_request_duration_seconds
            .with_label_values(&[method, route])
            .observe(duration.as_secs_f64());
    }

    /// Record one webhook delivery as seen on the wire
    pub fn record_webhook_delivery(&self, status: u16, payload_bytes: Option<u64>) {
        self.webhook_deliveries_total
            .with_label_values(&[&status.to_string()])
            .inc();

        if let Some(bytes) = payload_bytes {
            self.webhook_payload_bytes.observe(bytes as f64);
        }
    }

    /// Record how a webhook update was handled.
    ///
    /// Updates that fail to parse or carry no message are counted under
    /// `kind` `"malformed"` and `"ignored"`; they produce no reply series.
    pub fn record_update(&self, outcome: &DispatchOutcome) {
        match outcome {
            DispatchOutcome::Ignored => {
                self.bot_updates_total.with_label_values(&["ignored"]).inc();
            }
            DispatchOutcome::Replied {
                kind,
                result,
                delivered,
            } => {
                let kind: &str = kind;
                let outcome: &str = if *delivered { result } else { "send_failed" };
                self.bot_updates_total.with_label_values(&[kind]).inc();
                self.bot_replies_total
                    .with_label_values(&[kind, outcome])
                    .inc();
            }
        }
    }

    /// Count an update that never reached the dispatcher
    pub fn record_skipped_update(&self, reason: &str) {
        self.bot_updates_total.with_label_values(&[reason]).inc();
    }

    /// Update the application uptime gauge
    pub fn update_uptime(&self) {
        let uptime = self.start_time.elapsed().as_secs_f64();
        self.app_uptime_seconds.set(uptime);
    }

    /// Render metrics in Prometheus text format
    pub fn render(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        encoder.encode_to_string(&metric_families)
    }
}
