//! GitHub API error types.
//!
//! Failures are classified as transient or permanent. The bot never retries
//! on its own (a user can simply react again), but the classification goes
//! into the log so operators can tell an outage from a misconfiguration.

use std::fmt;
use thiserror::Error;

/// The kind of GitHub API error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GitHubErrorKind {
    /// The request might succeed if tried again later.
    ///
    /// Examples:
    /// - HTTP 5xx (server errors)
    /// - HTTP 429 (rate limited)
    /// - HTTP 403 with rate limit wording
    /// - Network timeouts
    Transient,

    /// The request will keep failing until someone changes something.
    ///
    /// Examples:
    /// - Repository not found (404), often a typo in `githubRepository`
    /// - Issues disabled on the repository (410)
    /// - Authentication failures (401, 403 non-rate-limit)
    /// - Validation failures (422)
    Permanent,
}

impl GitHubErrorKind {
    /// Returns true if reacting again later could plausibly succeed.
    pub fn is_retriable(&self) -> bool {
        matches!(self, GitHubErrorKind::Transient)
    }
}

impl fmt::Display for GitHubErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GitHubErrorKind::Transient => f.write_str("transient"),
            GitHubErrorKind::Permanent => f.write_str("permanent"),
        }
    }
}

/// A classified GitHub API error.
#[derive(Debug, Error)]
pub struct GitHubApiError {
    pub kind: GitHubErrorKind,

    /// The HTTP status code, if available.
    pub status_code: Option<u16>,

    /// A human-readable description of the error.
    pub message: String,

    /// The underlying octocrab error, if available.
    #[source]
    pub source: Option<octocrab::Error>,
}

impl fmt::Display for GitHubApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status_code {
            Some(code) => write!(f, "GitHub API error (HTTP {}): {}", code, self.message),
            None => write!(f, "GitHub API error: {}", self.message),
        }
    }
}

impl GitHubApiError {
    /// Creates a permanent error without an octocrab source.
    pub fn permanent_without_source(message: impl Into<String>) -> Self {
        Self {
            kind: GitHubErrorKind::Permanent,
            status_code: None,
            message: message.into(),
            source: None,
        }
    }

    /// Categorizes an octocrab error.
    pub fn from_octocrab(err: octocrab::Error) -> Self {
        let (status_code, message) = match &err {
            octocrab::Error::GitHub { source, .. } => (
                Some(source.status_code.as_u16()),
                source.message.clone(),
            ),
            other => (None, other.to_string()),
        };
        let kind = classify(status_code, &message);

        Self {
            kind,
            status_code,
            message,
            source: Some(err),
        }
    }
}

/// Classifies a failure from its status code and message.
fn classify(status_code: Option<u16>, message: &str) -> GitHubErrorKind {
    if is_transient_message(message) {
        return GitHubErrorKind::Transient;
    }

    match status_code {
        Some(429) => GitHubErrorKind::Transient,
        Some(403) if is_rate_limit_error(message) => GitHubErrorKind::Transient,
        Some(code) if (500..600).contains(&code) => GitHubErrorKind::Transient,
        Some(_) => GitHubErrorKind::Permanent,
        None if is_network_error(message) => GitHubErrorKind::Transient,
        None => GitHubErrorKind::Permanent,
    }
}

fn is_transient_message(message: &str) -> bool {
    message.to_lowercase().contains("try again")
}

fn is_rate_limit_error(message: &str) -> bool {
    let message_lower = message.to_lowercase();
    message_lower.contains("rate limit")
        || message_lower.contains("api rate")
        || message_lower.contains("secondary rate")
        || message_lower.contains("abuse detection")
}

fn is_network_error(message: &str) -> bool {
    let message_lower = message.to_lowercase();
    message_lower.contains("timeout")
        || message_lower.contains("connection")
        || message_lower.contains("network")
        || message_lower.contains("dns")
        || message_lower.contains("timed out")
}
