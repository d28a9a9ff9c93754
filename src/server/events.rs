//! Slack Events API endpoint handler.
//!
//! Verifies the request signature, answers the URL verification handshake,
//! and routes workspace events: reactions go to the middleware on their own
//! task, channel lifecycle events update the channel directory. Slack only
//! needs a quick 200; outcomes reach users as chat replies.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::{debug, info, warn};

use super::{AppState, IssueTracker, SlackApi, dispatch};
use crate::webhooks::{
    ParseError, SIGNATURE_HEADER, SignatureError, SlackEvent, SlackPayload, TIMESTAMP_HEADER,
    parse_payload, verify_request,
};

/// Errors that can occur when processing an events request.
#[derive(Debug, Error)]
pub enum EventsError {
    /// Missing or invalid signature, or a stale timestamp.
    #[error("unauthorized: {0}")]
    Unauthorized(#[from] SignatureError),

    /// Body is not a recognizable Events API payload.
    #[error("invalid payload: {0}")]
    InvalidPayload(#[from] ParseError),
}

impl IntoResponse for EventsError {
    fn into_response(self) -> Response {
        let status = match &self {
            EventsError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            EventsError::InvalidPayload(_) => StatusCode::BAD_REQUEST,
        };

        (status, self.to_string()).into_response()
    }
}

/// Events handler.
///
/// # Request
///
/// - Method: POST
/// - Required headers:
///   - `X-Slack-Request-Timestamp`: Unix time the request was sent
///   - `X-Slack-Signature`: `v0=` + hex HMAC-SHA256 of `v0:<timestamp>:<body>`
/// - Body: JSON Events API payload
///
/// # Response
///
/// - 200 OK: Event accepted (challenge echoed for `url_verification`)
/// - 400 Bad Request: Malformed payload
/// - 401 Unauthorized: Missing headers, bad signature, or stale timestamp
pub async fn events_handler<S: SlackApi, G: IssueTracker>(
    State(app_state): State<AppState<S, G>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, EventsError> {
    let timestamp = get_header(&headers, TIMESTAMP_HEADER)?;
    let signature = get_header(&headers, SIGNATURE_HEADER)?;

    // Verify before parsing anything.
    if let Err(e) = verify_request(
        &timestamp,
        &body,
        &signature,
        app_state.signing_secret(),
        chrono::Utc::now().timestamp(),
    ) {
        warn!(error = %e, "rejected Slack request");
        return Err(e.into());
    }

    let payload = match parse_payload(&body) {
        Ok(payload) => payload,
        Err(e) => {
            warn!(error = %e, "unparseable Slack payload");
            return Err(e.into());
        }
    };

    match payload {
        Some(SlackPayload::UrlVerification { challenge }) => {
            info!("answering URL verification");
            Ok((StatusCode::OK, challenge).into_response())
        }
        Some(SlackPayload::EventCallback {
            event_id, event, ..
        }) => {
            handle_event(&app_state, event_id.as_deref(), event);
            Ok(StatusCode::OK.into_response())
        }
        Some(SlackPayload::AppRateLimited {
            minute_rate_limited,
        }) => {
            warn!(?minute_rate_limited, "Slack is rate limiting event delivery");
            Ok(StatusCode::OK.into_response())
        }
        None => {
            debug!("ignoring unknown payload type");
            Ok(StatusCode::OK.into_response())
        }
    }
}

fn handle_event<S: SlackApi, G: IssueTracker>(
    app_state: &AppState<S, G>,
    event_id: Option<&str>,
    event: Option<SlackEvent>,
) {
    match event {
        Some(SlackEvent::ReactionAdded(reaction)) => {
            debug!(
                ?event_id,
                reaction = %reaction.reaction,
                msg_id = %reaction.message_id(),
                "reaction_added"
            );
            dispatch(app_state, reaction);
        }
        Some(SlackEvent::ChannelCreated(channel)) | Some(SlackEvent::ChannelRename(channel)) => {
            info!(channel = %channel.id, name = %channel.name, "channel directory updated");
            app_state.channels().insert(channel.id, channel.name);
        }
        Some(SlackEvent::ChannelDeleted(id)) => {
            info!(channel = %id, "channel removed from directory");
            app_state.channels().remove(&id);
        }
        None => debug!(?event_id, "ignoring unhandled event type"),
    }
}

fn get_header(headers: &HeaderMap, name: &'static str) -> Result<String, SignatureError> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .ok_or(SignatureError::MissingHeader(name))
}
