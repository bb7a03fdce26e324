//! Outbound HTTP client shared by the Telegram, weather and speech gateways.
//!
//! This module provides a thin wrapper around `reqwest` that adds:
//! - Separate timeouts for read and write operations
//! - Structured logging of every outbound call, with bot tokens redacted
//! - Per-destination Prometheus metrics
//!
//! Every call is attempted exactly once; there is no retry policy.

use prometheus::{CounterVec, HistogramOpts, HistogramVec, Opts, Registry};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Configuration for the outbound HTTP client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpClientConfig {
    /// Timeout for read operations (in seconds)
    pub read_timeout_seconds: u64,

    /// Timeout for write operations (in seconds)
    pub write_timeout_seconds: u64,

    /// Connection timeout (in seconds)
    pub connect_timeout_seconds: u64,

    /// Enable detailed logging
    pub enable_detailed_logging: bool,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            read_timeout_seconds: 10,
            write_timeout_seconds: 30,
            connect_timeout_seconds: 3,
            enable_detailed_logging: true,
        }
    }
}

/// Metrics for outbound HTTP calls
#[derive(Clone)]
pub struct HttpClientMetrics {
    /// Requests by destination, method, and outcome
    pub requests_total: CounterVec,

    /// Request duration by destination and method
    pub request_duration_seconds: HistogramVec,

    /// Timeout occurrences by destination and type
    pub timeouts_total: CounterVec,
}

impl HttpClientMetrics {
    /// Create the collectors and register them with `registry`
    pub fn new(registry: &Registry) -> Result<Self, prometheus::Error> {
        let requests_total = CounterVec::new(
            Opts::new(
                "outbound_http_requests_total",
                "Total outbound HTTP requests by destination, method, and outcome",
            ),
            &["destination", "method", "outcome"],
        )?;

        let request_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "outbound_http_request_duration_seconds",
                "Duration of outbound HTTP requests",
            )
            .buckets(vec![0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
            &["destination", "method"],
        )?;

        let timeouts_total = CounterVec::new(
            Opts::new(
                "outbound_http_timeouts_total",
                "Total outbound timeouts by destination and type",
            ),
            &["destination", "timeout_type"],
        )?;

        registry.register(Box::new(requests_total.clone()))?;
        registry.register(Box::new(request_duration_seconds.clone()))?;
        registry.register(Box::new(timeouts_total.clone()))?;

        Ok(Self {
            requests_total,
            request_duration_seconds,
            timeouts_total,
        })
    }
}

/// Operation type for determining the applicable timeout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationType {
    Read,
    Write,
}

impl OperationType {
    fn as_str(&self) -> &'static str {
        match self {
            OperationType::Read => "read",
            OperationType::Write => "write",
        }
    }
}

/// Request context for logging and metrics
#[derive(Debug, Clone)]
struct RequestContext {
    destination: String,
    method: String,
    path: String,
}

/// Single-attempt HTTP client with timeouts, logging and metrics
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
    metrics: Option<HttpClientMetrics>,
}

impl HttpClient {
    /// Create a new HTTP client
    pub fn new(
        config: HttpClientConfig,
        metrics: Option<HttpClientMetrics>,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(std::cmp::max(
                config.read_timeout_seconds,
                config.write_timeout_seconds,
            )))
            .connect_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            config,
            metrics,
        })
    }

    /// Start building a request; finish it and hand it to [`HttpClient::send`]
    pub fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.client.request(method, url)
    }

    pub fn get(&self, url: &str) -> RequestBuilder {
        self.request(Method::GET, url)
    }

    pub fn post(&self, url: &str) -> RequestBuilder {
        self.request(Method::POST, url)
    }

    /// Execute a request once under the timeout of `operation`.
    ///
    /// Any HTTP status is returned as `Ok`; callers decide what a non-success
    /// status means for their gateway.
    pub async fn send(
        &self,
        builder: RequestBuilder,
        operation: OperationType,
    ) -> Result<Response, HttpClientError> {
        let request = builder
            .build()
            .map_err(|e| HttpClientError::InvalidRequest(e.to_string()))?;

        let context = RequestContext {
            destination: request.url().host_str().unwrap_or("unknown").to_string(),
            method: request.method().to_string(),
            path: redact_path(request.url().path()),
        };

        let timeout = match operation {
            OperationType::Read => Duration::from_secs(self.config.read_timeout_seconds),
            OperationType::Write => Duration::from_secs(self.config.write_timeout_seconds),
        };

        let start = Instant::now();
        let result = tokio::time::timeout(timeout, self.client.execute(request)).await;
        let duration = start.elapsed();

        match result {
            Ok(Ok(response)) => {
                let status = response.status();
                let outcome = if status.is_success() {
                    "success"
                } else {
                    "http_error"
                };
                if self.config.enable_detailed_logging {
                    info!(
                        destination = %context.destination,
                        method = %context.method,
                        path = %context.path,
                        status = status.as_u16(),
                        duration_ms = duration.as_millis(),
                        "Outbound request completed"
                    );
                }
                self.record_request(&context, outcome, duration);
                Ok(response)
            }
            Ok(Err(e)) => {
                // the URL may carry a bot token or API key
                let e = e.without_url();
                warn!(
                    destination = %context.destination,
                    method = %context.method,
                    path = %context.path,
                    error = %e,
                    duration_ms = duration.as_millis(),
                    "Outbound request failed with network error"
                );
                self.record_request(&context, "network_error", duration);
                Err(HttpClientError::NetworkError(e))
            }
            Err(_) => {
                warn!(
                    destination = %context.destination,
                    method = %context.method,
                    path = %context.path,
                    timeout_seconds = timeout.as_secs(),
                    "Outbound request timed out"
                );
                self.record_request(&context, "timeout", duration);
                self.record_timeout(&context, operation);
                Err(HttpClientError::Timeout)
            }
        }
    }

    fn record_request(&self, context: &RequestContext, outcome: &str, duration: Duration) {
        if let Some(metrics) = &self.metrics {
            metrics
                .requests_total
                .with_label_values(&[context.destination.as_str(), context.method.as_str(), outcome])
                .inc();

            metrics
                .request_duration_seconds
                .with_label_values(&[context.destination.as_str(), context.method.as_str()])
                .observe(duration.as_secs_f64());
        }
    }

    fn record_timeout(&self, context: &RequestContext, operation: OperationType) {
        if let Some(metrics) = &self.metrics {
            metrics
                .timeouts_total
                .with_label_values(&[context.destination.as_str(), operation.as_str()])
                .inc();
        }
    }
}

/// Mask Telegram bot tokens (`/bot<id>:<secret>/...`) in a URL path
pub fn redact_path(path: &str) -> String {
    path.split('/')
        .map(|segment| {
            if segment.starts_with("bot") && segment.contains(':') {
                "bot<redacted>"
            } else {
                segment
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Errors that can occur with the HTTP client
#[derive(Debug, thiserror::Error)]
pub enum HttpClientError {
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Request timed out")]
    Timeout,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}
