//! Slack Web API client and the capabilities it provides to the pipeline.

mod channels;
mod client;
mod responder;

pub use channels::ChannelDirectory;
pub use client::{SLACK_API_BASE, SlackClient, SlackClientError};
pub use responder::SlackResponder;
