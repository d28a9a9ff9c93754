//! Issue tracker capability the pipeline depends on.

use std::future::Future;

use crate::types::IssueMetadata;

/// Files issues in the configured GitHub account.
///
/// # Example (fake for testing)
///
/// ```ignore
/// struct FixedIssueFiler;
///
/// impl IssueFiler for FixedIssueFiler {
///     type Error = std::io::Error;
///
///     fn owner(&self) -> &str {
///         "18F"
///     }
///
///     async fn file_new_issue(
///         &self,
///         _metadata: &IssueMetadata,
///         repository: &str,
///     ) -> Result<String, Self::Error> {
///         Ok(format!("https://github.com/18F/{}/issues/1", repository))
///     }
/// }
/// ```
pub trait IssueFiler {
    type Error: std::error::Error + Send + Sync + 'static;

    /// The user or organization that owns every target repository.
    fn owner(&self) -> &str;

    /// Creates an issue in `repository` and returns its URL.
    fn file_new_issue(
        &self,
        metadata: &IssueMetadata,
        repository: &str,
    ) -> impl Future<Output = Result<String, Self::Error>> + Send;
}
