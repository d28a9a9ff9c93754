//! The inbound reaction notification.
//!
//! Field names follow Slack's `reaction_added` event payload so the struct
//! can be deserialized straight out of an Events API callback.

use serde::{Deserialize, Serialize};

use super::ids::{ChannelId, MessageId, MessageTs};

/// Event type tag for a reaction being added.
pub const REACTION_ADDED: &str = "reaction_added";

/// Item type tag for reactions on messages (as opposed to files).
pub const ITEM_MESSAGE: &str = "message";

/// A reaction event, as delivered by Slack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionEvent {
    /// Event type; only `reaction_added` is eligible for processing.
    #[serde(rename = "type")]
    pub event_type: String,

    /// The user who added the reaction.
    #[serde(default)]
    pub user: String,

    /// The reaction name, without colons (e.g. `evergreen_tree`).
    pub reaction: String,

    /// The thing the reaction was added to.
    pub item: ReactionItem,
}

/// The target of a reaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionItem {
    /// Item type; only `message` is eligible for processing.
    #[serde(rename = "type")]
    pub item_type: String,

    /// Channel holding the message. Empty for file reactions.
    #[serde(default)]
    pub channel: ChannelId,

    /// Timestamp of the message. Empty for file reactions.
    #[serde(default)]
    pub ts: MessageTs,
}

impl ReactionEvent {
    /// Builds a `reaction_added` event on a message.
    pub fn reaction_added(
        user: impl Into<String>,
        reaction: impl Into<String>,
        channel: impl Into<String>,
        ts: impl Into<String>,
    ) -> Self {
        ReactionEvent {
            event_type: REACTION_ADDED.to_string(),
            user: user.into(),
            reaction: reaction.into(),
            item: ReactionItem {
                item_type: ITEM_MESSAGE.to_string(),
                channel: ChannelId::new(channel),
                ts: MessageTs::new(ts),
            },
        }
    }

    /// True if this is a reaction added to a message.
    pub fn is_eligible(&self) -> bool {
        self.event_type == REACTION_ADDED && self.item.item_type == ITEM_MESSAGE
    }

    /// The message this reaction targets.
    pub fn message_id(&self) -> MessageId {
        MessageId {
            channel: self.item.channel.clone(),
            ts: self.item.ts.clone(),
        }
    }
}
