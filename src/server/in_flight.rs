//! In-flight inspection endpoint.

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};

use super::{AppState, IssueTracker, SlackApi};
use crate::types::MessageId;

/// Messages that currently have a pipeline running.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InFlightReport {
    pub count: usize,

    /// Sorted by channel, then timestamp.
    pub messages: Vec<MessageId>,
}

/// Returns the in-flight registry contents as JSON.
///
/// # Example
///
/// ```ignore
/// GET /api/v1/in-flight HTTP/1.1
///
/// HTTP/1.1 200 OK
/// Content-Type: application/json
///
/// {"count":1,"messages":[{"channel":"C5150OU812","ts":"1360782804.083113"}]}
/// ```
pub async fn in_flight_handler<S: SlackApi, G: IssueTracker>(
    State(app_state): State<AppState<S, G>>,
) -> Json<InFlightReport> {
    let messages = app_state.middleware().registry().snapshot();
    Json(InFlightReport {
        count: messages.len(),
        messages,
    })
}
