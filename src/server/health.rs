//! Liveness endpoint.

use axum::http::StatusCode;

/// Returns 200 with the text "OK" while the server is accepting connections.
///
/// Does not check Slack or GitHub reachability; a collaborator outage shows
/// up as stage failures in the logs, not as a dead process.
pub async fn health_handler() -> (StatusCode, &'static str) {
    (StatusCode::OK, "OK")
}
