//! Replies to the user who added the reaction.

use tracing::warn;

use crate::effects::{Responder, ResponderFactory};
use crate::types::{ChannelId, ReactionEvent};

use super::client::SlackClient;

/// Posts pipeline outcomes to the reaction's channel, addressed to the user
/// who reacted.
#[derive(Debug, Clone)]
pub struct SlackResponder {
    client: SlackClient,
    channel: ChannelId,
    user: String,
}

impl SlackResponder {
    pub fn new(client: SlackClient, channel: ChannelId, user: impl Into<String>) -> Self {
        Self {
            client,
            channel,
            user: user.into(),
        }
    }

    /// The text actually sent for a reply.
    pub fn format_reply(&self, text: &str) -> String {
        if self.user.is_empty() {
            text.to_string()
        } else {
            format!("<@{}> {}", self.user, text)
        }
    }
}

impl Responder for SlackResponder {
    async fn reply(&self, text: &str) {
        let text = self.format_reply(text);
        if let Err(e) = self.client.post_message(&self.channel, &text).await {
            warn!(channel = %self.channel, error = %e, "failed to post reply");
        }
    }
}

impl ResponderFactory for SlackClient {
    type Responder = SlackResponder;

    fn responder_for(&self, event: &ReactionEvent) -> SlackResponder {
        SlackResponder::new(self.clone(), event.item.channel.clone(), event.user.clone())
    }
}
