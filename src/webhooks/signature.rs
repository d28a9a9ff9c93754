//! Slack request signature verification using HMAC-SHA256.
//!
//! Slack signs every Events API request with the app's signing secret. The
//! signed content is `v0:<timestamp>:<raw body>`, where the timestamp comes
//! from the `X-Slack-Request-Timestamp` header, and the signature is sent in
//! `X-Slack-Signature` as `v0=<hex>`.
//!
//! Requests whose timestamp is more than five minutes away from the local
//! clock are rejected even when correctly signed, so a captured request
//! cannot be replayed later.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the request signature.
pub const SIGNATURE_HEADER: &str = "x-slack-signature";

/// Header carrying the request timestamp (Unix seconds).
pub const TIMESTAMP_HEADER: &str = "x-slack-request-timestamp";

/// Maximum distance between the request timestamp and the local clock.
pub const MAX_REQUEST_AGE_SECS: i64 = 5 * 60;

const VERSION: &str = "v0";

/// Why a request failed verification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureError {
    #[error("missing {0} header")]
    MissingHeader(&'static str),

    #[error("malformed request timestamp: {0}")]
    MalformedTimestamp(String),

    #[error("request timestamp is {age_secs}s from local time")]
    Stale { age_secs: i64 },

    #[error("signature mismatch")]
    Mismatch,
}

/// Builds the string Slack signs: `v0:<timestamp>:<body>`.
pub fn signing_basestring(timestamp: &str, body: &[u8]) -> Vec<u8> {
    let mut base = Vec::with_capacity(VERSION.len() + timestamp.len() + body.len() + 2);
    base.extend_from_slice(VERSION.as_bytes());
    base.push(b':');
    base.extend_from_slice(timestamp.as_bytes());
    base.push(b':');
    base.extend_from_slice(body);
    base
}

/// Parses a Slack signature header (e.g., "v0=abc123...") into raw bytes.
///
/// Returns `None` for malformed headers (missing prefix, invalid hex, etc.).
/// Never panics.
///
/// # Examples
///
/// ```
/// use reaction_issues::webhooks::parse_signature_header;
///
/// assert!(parse_signature_header("v0=abcd1234").is_some());
/// assert!(parse_signature_header("abcd1234").is_none());
/// assert!(parse_signature_header("v1=abcd1234").is_none());
/// assert!(parse_signature_header("v0=xyz").is_none());
/// ```
pub fn parse_signature_header(header: &str) -> Option<Vec<u8>> {
    let hex_sig = header.strip_prefix("v0=")?;
    hex::decode(hex_sig).ok()
}

/// Computes the signature Slack would send for a request.
///
/// This is useful for testing purposes (generating expected signatures).
pub fn compute_signature(timestamp: &str, body: &[u8], secret: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(secret).expect("HMAC can take key of any size");
    mac.update(&signing_basestring(timestamp, body));
    mac.finalize().into_bytes().to_vec()
}

/// Formats a signature as a Slack-style header value, `v0=<hex>`.
pub fn format_signature_header(signature: &[u8]) -> String {
    format!("{}={}", VERSION, hex::encode(signature))
}

/// Verifies a Slack signature against the timestamp, body and secret.
///
/// Uses constant-time comparison. Does not check the timestamp's age; see
/// [`verify_request`].
///
/// # Examples
///
/// ```
/// use reaction_issues::webhooks::{compute_signature, format_signature_header, verify_signature};
///
/// let body = br#"{"type":"url_verification","challenge":"abc"}"#;
/// let secret = b"my-signing-secret";
/// let header = format_signature_header(&compute_signature("1531420618", body, secret));
///
/// assert!(verify_signature("1531420618", body, &header, secret));
/// assert!(!verify_signature("1531420619", body, &header, secret));
/// assert!(!verify_signature("1531420618", body, &header, b"wrong-secret"));
/// ```
pub fn verify_signature(timestamp: &str, body: &[u8], signature_header: &str, secret: &[u8]) -> bool {
    let expected_signature = match parse_signature_header(signature_header) {
        Some(sig) => sig,
        None => return false,
    };

    let mut mac = match HmacSha256::new_from_slice(secret) {
        Ok(mac) => mac,
        Err(_) => return false,
    };
    mac.update(&signing_basestring(timestamp, body));

    mac.verify_slice(&expected_signature).is_ok()
}

/// Checks that `timestamp` is within [`MAX_REQUEST_AGE_SECS`] of `now`.
pub fn check_timestamp(timestamp: &str, now: i64) -> Result<(), SignatureError> {
    let sent: i64 = timestamp
        .trim()
        .parse()
        .map_err(|_| SignatureError::MalformedTimestamp(timestamp.to_string()))?;

    let age_secs = now.saturating_sub(sent);
    if age_secs.unsigned_abs() > MAX_REQUEST_AGE_SECS.unsigned_abs() {
        return Err(SignatureError::Stale { age_secs });
    }
    Ok(())
}

/// Full request check: timestamp freshness, then signature.
pub fn verify_request(
    timestamp: &str,
    body: &[u8],
    signature_header: &str,
    secret: &[u8],
    now: i64,
) -> Result<(), SignatureError> {
    check_timestamp(timestamp, now)?;
    if !verify_signature(timestamp, body, signature_header, secret) {
        return Err(SignatureError::Mismatch);
    }
    Ok(())
}
