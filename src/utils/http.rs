//! HTTP utility functions for extracting request information.

use actix_web::HttpRequest;

/// Proxy headers consulted for the client address, most trusted first
const CLIENT_IP_HEADERS: &[&str] = &["X-Forwarded-For", "X-Real-IP", "CF-Connecting-IP"];

/// Extract client IP address from request headers
///
/// Webhooks usually arrive through a reverse proxy, so proxy headers are
/// checked before the connection peer address.
pub fn extract_client_ip(req: &HttpRequest) -> String {
    for header_name in CLIENT_IP_HEADERS {
        let Some(value) = req.headers().get(*header_name).and_then(|h| h.to_str().ok()) else {
            continue;
        };

        // X-Forwarded-For can contain multiple IPs, take the first one
        let ip = value.split(',').next().unwrap_or(value).trim();
        if !ip.is_empty() {
            return ip.to_string();
        }
    }

    req.connection_info()
        .peer_addr()
        .unwrap_or("unknown")
        .to_string()
}

/// Extract user agent from request headers
pub fn extract_user_agent(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get("User-Agent")
        .and_then(|h| h.to_str().ok())
        .map(|s| s.to_string())
}
