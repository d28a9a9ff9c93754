//! Slack Events API payload types.
//!
//! Only the payloads the bot acts on get a typed representation:
//!
//! - `url_verification` - the handshake Slack performs when the request URL
//!   is configured
//! - `event_callback` wrapping `reaction_added` - the trigger for filing
//! - `event_callback` wrapping `channel_created`, `channel_rename` or
//!   `channel_deleted` - keeps the channel directory current
//! - `app_rate_limited` - logged and acknowledged

use serde::{Deserialize, Serialize};

use crate::types::{ChannelId, ReactionEvent};

/// A parsed Events API request body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlackPayload {
    /// Slack is checking the endpoint; the challenge must be echoed back.
    UrlVerification { challenge: String },

    /// A workspace event.
    ///
    /// `event` is `None` for inner event types the bot does not handle.
    EventCallback {
        event_id: Option<String>,
        team_id: Option<String>,
        event: Option<SlackEvent>,
    },

    /// Slack is dropping events for this app because it answered too slowly.
    AppRateLimited { minute_rate_limited: Option<i64> },
}

/// An inner event the bot handles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlackEvent {
    ReactionAdded(ReactionEvent),
    ChannelCreated(ChannelInfo),
    ChannelRename(ChannelInfo),
    ChannelDeleted(ChannelId),
}

/// The channel object carried by `channel_created` and `channel_rename`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelInfo {
    pub id: ChannelId,
    pub name: String,
}

impl SlackEvent {
    /// The Slack type tag of this event.
    pub fn event_type(&self) -> &'static str {
        match self {
            SlackEvent::ReactionAdded(_) => "reaction_added",
            SlackEvent::ChannelCreated(_) => "channel_created",
            SlackEvent::ChannelRename(_) => "channel_rename",
            SlackEvent::ChannelDeleted(_) => "channel_deleted",
        }
    }
}
