//! Slack Events API handling.
//!
//! This module provides:
//! - Request signature verification (HMAC-SHA256, `v0` scheme)
//! - Payload parsing into typed events

pub mod events;
pub mod parser;
pub mod signature;

pub use events::{ChannelInfo, SlackEvent, SlackPayload};
pub use parser::{ParseError, parse_event, parse_payload};
pub use signature::{
    MAX_REQUEST_AGE_SECS, SIGNATURE_HEADER, SignatureError, TIMESTAMP_HEADER, check_timestamp,
    compute_signature, format_signature_header, parse_signature_header, verify_request,
    verify_signature,
};
