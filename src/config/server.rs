//! Listener configuration.

use std::{env, path::Path};

const LOCAL_BIND_ADDRESS: &str = "127.0.0.1:8080";
const CONTAINER_BIND_ADDRESS: &str = "0.0.0.0:8080";

/// Where the HTTP server listens
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: LOCAL_BIND_ADDRESS.to_string(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// `BIND_ADDRESS` wins; otherwise all interfaces inside a container and
    /// localhost everywhere else.
    pub fn from_env() -> Self {
        let in_container = is_container_environment(
            env::var("KUBERNETES_SERVICE_HOST").ok().as_deref(),
            env::var("DOCKER_CONTAINER").ok().as_deref(),
            Path::new("/.dockerenv").exists(),
        );

        Self::detect(env::var("BIND_ADDRESS").ok(), in_container)
    }

    pub fn detect(bind_override: Option<String>, in_container: bool) -> Self {
        let bind_address = match bind_override.filter(|addr| !addr.trim().is_empty()) {
            Some(addr) => addr,
            None if in_container => CONTAINER_BIND_ADDRESS.to_string(),
            None => LOCAL_BIND_ADDRESS.to_string(),
        };

        Self { bind_address }
    }
}

pub fn is_container_environment(
    k8s_service_host: Option<&str>,
    docker_container: Option<&str>,
    dockerenv_exists: bool,
) -> bool {
    k8s_service_host.is_some() || docker_container.is_some() || dockerenv_exists
}
