//! Octocrab client wrapper scoped to a GitHub user or organization.
//!
//! Every issue the bot files lands in a repository owned by the same account,
//! so the owner is fixed at construction and callers only name the repository.

use std::time::Duration;

use octocrab::Octocrab;

/// A GitHub API client scoped to a single repository owner.
#[derive(Clone)]
pub struct OctocrabClient {
    /// The underlying octocrab client.
    client: Octocrab,

    /// The user or organization that owns the target repositories.
    user: String,
}

impl OctocrabClient {
    /// Creates a new client scoped to the given owner.
    pub fn new(client: Octocrab, user: impl Into<String>) -> Self {
        Self {
            client,
            user: user.into(),
        }
    }

    /// Creates a client from a personal access token.
    ///
    /// `timeout` bounds both connecting and reading a response.
    pub fn from_token(
        token: impl Into<String>,
        user: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, octocrab::Error> {
        let client = Octocrab::builder()
            .personal_token(token.into())
            .set_connect_timeout(Some(timeout))
            .set_read_timeout(Some(timeout))
            .build()?;
        Ok(Self::new(client, user))
    }

    /// Creates a client that talks to a different API root, e.g. GitHub
    /// Enterprise or a local mock server.
    pub fn with_base_uri(
        token: impl Into<String>,
        user: impl Into<String>,
        base_uri: &str,
        timeout: Duration,
    ) -> Result<Self, octocrab::Error> {
        let client = Octocrab::builder()
            .personal_token(token.into())
            .base_uri(base_uri)?
            .set_connect_timeout(Some(timeout))
            .set_read_timeout(Some(timeout))
            .build()?;
        Ok(Self::new(client, user))
    }

    /// Returns a reference to the underlying octocrab client.
    pub fn inner(&self) -> &Octocrab {
        &self.client
    }

    /// Returns the repository owner.
    pub fn user(&self) -> &str {
        &self.user
    }
}

impl std::fmt::Debug for OctocrabClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OctocrabClient")
            .field("user", &self.user)
            .finish_non_exhaustive()
    }
}
