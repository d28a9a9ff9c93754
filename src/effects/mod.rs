//! Capabilities the pipeline needs from the outside world.
//!
//! The pipeline never talks to Slack or GitHub directly. It is generic over
//! these traits, which are implemented by the real clients in [`crate::slack`]
//! and [`crate::github`] and by in-memory fakes in tests.

pub mod github;
pub mod slack;

pub use github::IssueFiler;
pub use slack::{
    ChannelNameResolver, MessageReactions, Reaction, ReactionReader, ReactionWriter, Responder,
    ResponderFactory, TeamDomain,
};

/// Type-erased collaborator error, kept as the source of pipeline errors.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;
