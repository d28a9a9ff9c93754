//! Newtype wrappers for Slack identifiers.
//!
//! These keep channel ids and message timestamps from being swapped by
//! accident, and give the pipeline a single hashable key per message.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A Slack channel id (e.g. `C5150OU812`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelId(pub String);

impl ChannelId {
    pub fn new(s: impl Into<String>) -> Self {
        ChannelId(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ChannelId {
    fn from(s: &str) -> Self {
        ChannelId(s.to_string())
    }
}

/// A Slack message timestamp (e.g. `1360782804.083113`).
///
/// Slack uses the timestamp as the message id within a channel, so it is kept
/// as the exact string Slack sent rather than parsed into a float.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageTs(pub String);

impl MessageTs {
    pub fn new(s: impl Into<String>) -> Self {
        MessageTs(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The `p<digits>` path segment Slack uses in message permalinks.
    pub fn permalink_segment(&self) -> String {
        format!("p{}", self.0.replace('.', ""))
    }
}

impl fmt::Display for MessageTs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for MessageTs {
    fn from(s: &str) -> Self {
        MessageTs(s.to_string())
    }
}

/// Identifies the message a reaction was applied to.
///
/// Two reaction events on the same message always produce the same
/// `MessageId`, so it doubles as the de-duplication key for the pipeline.
/// Its `Display` form, `<channel>:<ts>`, is the correlation id attached to
/// every log line about that message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MessageId {
    pub channel: ChannelId,
    pub ts: MessageTs,
}

impl MessageId {
    pub fn new(channel: impl Into<String>, ts: impl Into<String>) -> Self {
        MessageId {
            channel: ChannelId::new(channel),
            ts: MessageTs::new(ts),
        }
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.channel, self.ts)
    }
}
