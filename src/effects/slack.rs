//! Slack capabilities the pipeline depends on.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::types::{ChannelId, MessageTs, ReactionEvent};

/// A single reaction on a message, as reported by `reactions.get`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reaction {
    pub name: String,
    #[serde(default)]
    pub count: u32,
    #[serde(default)]
    pub users: Vec<String>,
}

/// The current reactions on a message.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MessageReactions {
    #[serde(default)]
    pub reactions: Vec<Reaction>,

    /// Permalink to the message, when Slack includes one.
    #[serde(default)]
    pub permalink: Option<String>,

    pub ts: MessageTs,
}

impl MessageReactions {
    /// True if any user has added `name` to the message.
    pub fn has_reaction(&self, name: &str) -> bool {
        self.reactions.iter().any(|r| r.name == name)
    }
}

/// Maps a channel id to its human-readable name.
///
/// Resolution is synchronous; implementations answer from a local cache.
/// Unknown ids resolve to the id itself.
pub trait ChannelNameResolver {
    fn channel_name(&self, channel: &ChannelId) -> String;
}

/// Provides the Slack team domain (the `<domain>` in `<domain>.slack.com`).
pub trait TeamDomain {
    fn team_domain(&self) -> String;
}

/// Reads the reactions currently on a message.
pub trait ReactionReader {
    type Error: std::error::Error + Send + Sync + 'static;

    fn get_reactions(
        &self,
        channel: &ChannelId,
        ts: &MessageTs,
    ) -> impl Future<Output = Result<MessageReactions, Self::Error>> + Send;
}

/// Marks a message as filed by adding the configured success reaction.
pub trait ReactionWriter {
    type Error: std::error::Error + Send + Sync + 'static;

    fn add_success_reaction(
        &self,
        channel: &ChannelId,
        ts: &MessageTs,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;
}

/// Sends the outcome of a pipeline run back to the conversation it came from.
///
/// Delivery failures are the implementation's to log; the pipeline does not
/// wait on or react to them.
pub trait Responder {
    fn reply(&self, text: &str) -> impl Future<Output = ()> + Send;
}

/// Opens a [`Responder`] for the conversation a reaction came from.
pub trait ResponderFactory {
    type Responder: Responder + Send + Sync + 'static;

    fn responder_for(&self, event: &ReactionEvent) -> Self::Responder;
}
