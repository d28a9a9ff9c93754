//! Reaction Issues - a Slack bot that files GitHub issues from emoji reactions.
//!
//! When someone adds a configured reaction to a Slack message, the bot files
//! an issue linking to the message in the repository the matching rule names,
//! marks the message with a success reaction, and replies with the outcome.
//! Each message is processed at most once at a time.

pub mod config;
pub mod effects;
pub mod github;
pub mod middleware;
pub mod rules;
pub mod server;
pub mod slack;
pub mod types;
pub mod webhooks;

#[cfg(test)]
pub mod test_utils;
