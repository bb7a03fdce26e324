//! Configuration for the outbound HTTP client.

use crate::services::http_client::HttpClientConfig;
use std::env;

impl HttpClientConfig {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let read_timeout_seconds = lookup("HTTP_CLIENT_READ_TIMEOUT")
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.read_timeout_seconds);

        let write_timeout_seconds = lookup("HTTP_CLIENT_WRITE_TIMEOUT")
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.write_timeout_seconds);

        let connect_timeout_seconds = lookup("HTTP_CLIENT_CONNECT_TIMEOUT")
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.connect_timeout_seconds);

        let enable_detailed_logging = lookup("HTTP_CLIENT_DETAILED_LOGGING")
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.enable_detailed_logging);

        Self {
            read_timeout_seconds,
            write_timeout_seconds,
            connect_timeout_seconds,
            enable_detailed_logging,
        }
    }
}
