//! Slack Events API payload parser.
//!
//! Parses raw request bodies into typed [`SlackPayload`] values.
//!
//! # Parsing Strategy
//!
//! 1. The outer `type` picks the envelope kind
//! 2. For `event_callback`, the inner `event.type` picks the event
//! 3. Unknown envelope types return `Ok(None)`; unknown inner events parse
//!    as an `EventCallback` with no event
//! 4. Malformed payloads return `Err` with details

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::types::ChannelId;

use super::events::{ChannelInfo, SlackEvent, SlackPayload};

/// Error type for payload parsing failures.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON deserialization failed (includes missing required fields).
    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("missing field {0}")]
    MissingField(&'static str),
}

#[derive(Debug, Deserialize)]
struct RawEnvelope {
    #[serde(rename = "type")]
    envelope_type: String,
    #[serde(default)]
    challenge: Option<String>,
    #[serde(default)]
    event_id: Option<String>,
    #[serde(default)]
    team_id: Option<String>,
    #[serde(default)]
    event: Option<Value>,
    #[serde(default)]
    minute_rate_limited: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct ChannelObjectEvent {
    channel: ChannelInfo,
}

#[derive(Debug, Deserialize)]
struct ChannelIdEvent {
    channel: ChannelId,
}

/// Parses an Events API request body.
///
/// # Returns
///
/// * `Ok(Some(payload))` - A known envelope type
/// * `Ok(None)` - Unknown envelope type (ignored, not an error)
/// * `Err(e)` - Malformed payload or missing required fields
///
/// # Examples
///
/// ```
/// use reaction_issues::webhooks::{parse_payload, SlackEvent, SlackPayload};
///
/// let body = br#"{
///     "type": "event_callback",
///     "event_id": "Ev0PV52K21",
///     "event": {
///         "type": "reaction_added",
///         "user": "U024BE7LH",
///         "reaction": "evergreen_tree",
///         "item": { "type": "message", "channel": "C5150OU812", "ts": "1360782804.083113" }
///     }
/// }"#;
///
/// match parse_payload(body).unwrap() {
///     Some(SlackPayload::EventCallback { event: Some(SlackEvent::ReactionAdded(e)), .. }) => {
///         assert_eq!(e.reaction, "evergreen_tree");
///     }
///     other => panic!("unexpected {:?}", other),
/// }
/// ```
pub fn parse_payload(body: &[u8]) -> Result<Option<SlackPayload>, ParseError> {
    let raw: RawEnvelope = serde_json::from_slice(body)?;

    match raw.envelope_type.as_str() {
        "url_verification" => {
            let challenge = raw.challenge.ok_or(ParseError::MissingField("challenge"))?;
            Ok(Some(SlackPayload::UrlVerification { challenge }))
        }
        "event_callback" => {
            let event = raw.event.ok_or(ParseError::MissingField("event"))?;
            Ok(Some(SlackPayload::EventCallback {
                event_id: raw.event_id,
                team_id: raw.team_id,
                event: parse_event(event)?,
            }))
        }
        "app_rate_limited" => Ok(Some(SlackPayload::AppRateLimited {
            minute_rate_limited: raw.minute_rate_limited,
        })),
        _ => Ok(None),
    }
}

/// Parses an inner event. Unknown event types return `Ok(None)`.
pub fn parse_event(event: Value) -> Result<Option<SlackEvent>, ParseError> {
    let event_type = event
        .get("type")
        .and_then(Value::as_str)
        .ok_or(ParseError::MissingField("event.type"))?;

    let parsed = match event_type {
        "reaction_added" => SlackEvent::ReactionAdded(serde_json::from_value(event)?),
        "channel_created" => {
            let e: ChannelObjectEvent = serde_json::from_value(event)?;
            SlackEvent::ChannelCreated(e.channel)
        }
        "channel_rename" => {
            let e: ChannelObjectEvent = serde_json::from_value(event)?;
            SlackEvent::ChannelRename(e.channel)
        }
        "channel_deleted" => {
            let e: ChannelIdEvent = serde_json::from_value(event)?;
            SlackEvent::ChannelDeleted(e.channel)
        }
        _ => return Ok(None),
    };
    Ok(Some(parsed))
}
