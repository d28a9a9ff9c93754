//! Pipeline outcomes that are not a freshly filed issue.
//!
//! Each variant's message is what the user sees in the channel. The
//! stage-three variant always names the issue it created.

use thiserror::Error;

use crate::effects::BoxError;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// Another pipeline for the same message has not finished yet.
    #[error("already in progress")]
    InProgress,

    /// The message already carries the success reaction.
    #[error("already processed {permalink}")]
    AlreadyProcessed { permalink: String },

    /// Stage one: reading the message's reactions failed.
    #[error("failed to get reactions for {permalink}: {source}")]
    GetReactions { permalink: String, source: BoxError },

    /// Stage two: the issue tracker refused or could not be reached.
    #[error("failed to create a GitHub issue in {repository}: {source}")]
    FileIssue { repository: String, source: BoxError },

    /// Stage three: the issue exists but the message was not marked.
    #[error("created {issue_url} but failed to add {reaction}: {source}")]
    AddSuccessReaction {
        issue_url: String,
        reaction: String,
        source: BoxError,
    },
}

impl PipelineError {
    /// True for outcomes that reflect a skipped run rather than a failure.
    pub fn is_skip(&self) -> bool {
        matches!(
            self,
            PipelineError::InProgress | PipelineError::AlreadyProcessed { .. }
        )
    }

    /// The issue URL, if one was created before the failure.
    pub fn created_issue(&self) -> Option<&str> {
        match self {
            PipelineError::AddSuccessReaction { issue_url, .. } => Some(issue_url),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boxed(message: &str) -> BoxError {
        message.into()
    }

    #[test]
    fn stage_three_message_names_created_issue() {
        let err = PipelineError::AddSuccessReaction {
            issue_url: "https://issues.example/handbook/1".to_string(),
            reaction: "heavy_check_mark".to_string(),
            source: boxed("network down"),
        };
        assert_eq!(
            err.to_string(),
            "created https://issues.example/handbook/1 but failed to add heavy_check_mark: network down"
        );
        assert_eq!(err.created_issue(), Some("https://issues.example/handbook/1"));
    }

    #[test]
    fn file_issue_message_names_repository() {
        let err = PipelineError::FileIssue {
            repository: "18F/handbook".to_string(),
            source: boxed("Bad credentials"),
        };
        assert_eq!(
            err.to_string(),
            "failed to create a GitHub issue in 18F/handbook: Bad credentials"
        );
        assert!(!err.is_skip());
        assert_eq!(err.created_issue(), None);
    }

    #[test]
    fn skips_are_not_failures() {
        assert!(PipelineError::InProgress.is_skip());
        assert!(
            PipelineError::AlreadyProcessed {
                permalink: "https://example".to_string()
            }
            .is_skip()
        );
    }

    #[test]
    fn sources_are_exposed() {
        let err = PipelineError::GetReactions {
            permalink: "https://example".to_string(),
            source: boxed("timeout"),
        };
        let source = std::error::Error::source(&err).unwrap();
        assert_eq!(source.to_string(), "timeout");
    }
}
