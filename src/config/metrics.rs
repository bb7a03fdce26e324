//! Metrics configuration.

use std::env;

/// Configuration for application metrics collection
#[derive(Debug, Clone)]
pub struct MetricsConfig {
    /// When false `/api/metrics` answers 503
    pub enabled: bool,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl MetricsConfig {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        Self::from_value(env::var("METRICS_ENABLED").ok())
    }

    fn from_value(value: Option<String>) -> Self {
        let enabled = value
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(true);

        Self { enabled }
    }
}
