//! Issue creation.

use tracing::{debug, warn};

use crate::effects::IssueFiler;
use crate::types::IssueMetadata;

use super::client::OctocrabClient;
use super::error::GitHubApiError;

impl IssueFiler for OctocrabClient {
    type Error = GitHubApiError;

    fn owner(&self) -> &str {
        self.user()
    }

    async fn file_new_issue(
        &self,
        metadata: &IssueMetadata,
        repository: &str,
    ) -> Result<String, GitHubApiError> {
        create_issue(self, metadata, repository).await
    }
}

/// Opens an issue titled after the message, with the message permalink as
/// its body, and returns the issue's web URL.
pub async fn create_issue(
    client: &OctocrabClient,
    metadata: &IssueMetadata,
    repository: &str,
) -> Result<String, GitHubApiError> {
    if repository.is_empty() {
        return Err(GitHubApiError::permanent_without_source(
            "repository name is empty",
        ));
    }

    let result = client
        .inner()
        .issues(client.user(), repository)
        .create(&metadata.title)
        .body(&metadata.url)
        .send()
        .await;

    match result {
        Ok(issue) => {
            debug!(number = issue.number, url = %issue.html_url, "issue created");
            Ok(issue.html_url.to_string())
        }
        Err(e) => {
            let err = GitHubApiError::from_octocrab(e);
            warn!(
                owner = %client.user(),
                repository = %repository,
                kind = %err.kind,
                status = ?err.status_code,
                "issue creation failed"
            );
            Err(err)
        }
    }
}
