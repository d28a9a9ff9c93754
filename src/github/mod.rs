//! GitHub API client.
//!
//! Files issues via octocrab and classifies failures as transient or
//! permanent for the logs.

mod client;
mod error;
mod issues;

pub use client::OctocrabClient;
pub use error::{GitHubApiError, GitHubErrorKind};
pub use issues::create_issue;
