//! Core domain types for the reaction-to-issue bot.

pub mod event;
pub mod ids;
pub mod issue;

pub use event::{ITEM_MESSAGE, REACTION_ADDED, ReactionEvent, ReactionItem};
pub use ids::{ChannelId, MessageId, MessageTs};
pub use issue::{IssueMetadata, format_rfc1123, parse_slack_ts};
