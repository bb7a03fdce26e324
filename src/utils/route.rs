//! Route pattern extraction utilities.

pub const WEBHOOK_ROUTE: &str = "/webhook";

/// Paths served by the app; anything else is grouped as `/unknown`
const KNOWN_ROUTES: &[&str] = &[
    WEBHOOK_ROUTE,
    "/api/health",
    "/api/version",
    "/api/metrics",
    "/api/spec/v2",
];

/// Route label for metrics.
///
/// Scanners probing random paths would otherwise create one series per path.
pub fn normalize_route(path: &str) -> &'static str {
    let trimmed = match path.trim_end_matches('/') {
        "" => "/",
        other => other,
    };

    KNOWN_ROUTES
        .iter()
        .find(|route| **route == trimmed)
        .copied()
        .unwrap_or("/unknown")
}
