//! The reaction-to-issue pipeline.
//!
//! For a matched reaction the pipeline runs three stages, each only after the
//! previous one succeeded:
//!
//! 1. read the message's reactions (stop if it already has the success
//!    reaction),
//! 2. file an issue in the rule's repository,
//! 3. add the success reaction to the message.
//!
//! Whatever happens, the caller's conversation gets exactly one reply and the
//! continuation runs exactly once, after the in-flight claim is released.

use std::future::Future;

use tracing::{error, info};

use crate::effects::{
    ChannelNameResolver, IssueFiler, MessageReactions, ReactionReader, ReactionWriter, Responder,
    TeamDomain,
};
use crate::rules::{Rule, RuleSet};
use crate::types::{IssueMetadata, MessageId, ReactionEvent};

use super::error::PipelineError;
use super::registry::InFlightRegistry;

/// Watches reaction events and files issues for the ones that match a rule.
///
/// Owns its in-flight registry; the Slack and GitHub collaborators are
/// supplied by the caller.
#[derive(Debug)]
pub struct Middleware<S, G> {
    rules: RuleSet,
    success_reaction: String,
    slack: S,
    github: G,
    registry: InFlightRegistry,
}

impl<S, G> Middleware<S, G> {
    pub fn new(rules: RuleSet, success_reaction: impl Into<String>, slack: S, github: G) -> Self {
        Middleware {
            rules,
            success_reaction: success_reaction.into(),
            slack,
            github,
            registry: InFlightRegistry::new(),
        }
    }

    /// Replaces the registry, e.g. to inspect it from outside.
    pub fn with_registry(mut self, registry: InFlightRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn success_reaction(&self) -> &str {
        &self.success_reaction
    }

    pub fn registry(&self) -> &InFlightRegistry {
        &self.registry
    }

    pub fn slack(&self) -> &S {
        &self.slack
    }

    pub fn github(&self) -> &G {
        &self.github
    }
}

impl<S, G> Middleware<S, G>
where
    S: ChannelNameResolver + TeamDomain + ReactionReader + ReactionWriter + Sync,
    G: IssueFiler + Sync,
{
    /// Returns the first rule `event` triggers, if any.
    pub fn find_matching_rule(&self, event: &ReactionEvent) -> Option<&Rule> {
        self.rules.find_matching_rule(event, &self.slack)
    }

    /// Handles a reaction event.
    ///
    /// If no rule matches, `next` is called immediately and `None` is
    /// returned. Otherwise the message is claimed in the registry before this
    /// function returns, and the returned future runs the pipeline (or reports
    /// the duplicate), replies through `responder`, releases the claim, calls
    /// `next`, and resolves to the created issue's URL or the reason there is
    /// none.
    pub fn execute<R, N>(
        &self,
        event: ReactionEvent,
        responder: R,
        next: N,
    ) -> Option<impl Future<Output = Result<String, PipelineError>> + Send + '_>
    where
        R: Responder + Send + Sync + 'static,
        N: FnOnce() + Send + 'static,
    {
        let Some(rule) = self.find_matching_rule(&event) else {
            next();
            return None;
        };

        let id = event.message_id();
        let claim = self.registry.try_claim(id.clone());

        Some(async move {
            let result = if claim.is_some() {
                info!(
                    msg_id = %id,
                    reaction = %rule.reaction_name(),
                    repository = %rule.github_repository(),
                    user = %event.user,
                    "processing"
                );
                self.run(rule, &id).await
            } else {
                Err(PipelineError::InProgress)
            };

            self.report(&id, &responder, &result).await;
            drop(claim);
            next();
            result
        })
    }

    /// Builds the issue metadata for a message.
    pub fn parse_metadata(
        &self,
        id: &MessageId,
        message: &MessageReactions,
        permalink: String,
    ) -> IssueMetadata {
        let timestamp = if message.ts.as_str().is_empty() {
            &id.ts
        } else {
            &message.ts
        };
        IssueMetadata::new(
            self.slack.channel_name(&id.channel),
            timestamp.as_str(),
            permalink,
        )
    }

    /// Permalink built from the team domain, for when Slack does not send one.
    pub fn permalink(&self, id: &MessageId) -> String {
        format!(
            "https://{}.slack.com/archives/{}/{}",
            self.slack.team_domain(),
            id.channel,
            id.ts.permalink_segment()
        )
    }

    async fn run(&self, rule: &Rule, id: &MessageId) -> Result<String, PipelineError> {
        let fallback = self.permalink(id);
        let message = self
            .slack
            .get_reactions(&id.channel, &id.ts)
            .await
            .map_err(|e| PipelineError::GetReactions {
                permalink: fallback.clone(),
                source: e.into(),
            })?;

        let permalink = message.permalink.clone().unwrap_or(fallback);
        if message.has_reaction(&self.success_reaction) {
            return Err(PipelineError::AlreadyProcessed { permalink });
        }

        let metadata = self.parse_metadata(id, &message, permalink);
        let repository = format!("{}/{}", self.github.owner(), rule.github_repository());
        info!(
            msg_id = %id,
            url = %metadata.url,
            repository = %repository,
            "making GitHub request"
        );

        let issue_url = self
            .github
            .file_new_issue(&metadata, rule.github_repository())
            .await
            .map_err(|e| PipelineError::FileIssue {
                repository,
                source: e.into(),
            })?;

        info!(
            msg_id = %id,
            issue_url = %issue_url,
            reaction = %self.success_reaction,
            "adding success reaction"
        );

        if let Err(e) = self.slack.add_success_reaction(&id.channel, &id.ts).await {
            return Err(PipelineError::AddSuccessReaction {
                issue_url,
                reaction: self.success_reaction.clone(),
                source: e.into(),
            });
        }

        Ok(issue_url)
    }

    async fn report<R: Responder>(
        &self,
        id: &MessageId,
        responder: &R,
        result: &Result<String, PipelineError>,
    ) {
        let text = match result {
            Ok(issue_url) => {
                let text = format!("created: {}", issue_url);
                info!(msg_id = %id, "{}", text);
                text
            }
            Err(err) if err.is_skip() => {
                info!(msg_id = %id, "{}", err);
                err.to_string()
            }
            Err(err) => {
                error!(msg_id = %id, "{}", err);
                err.to_string()
            }
        };
        responder.reply(&text).await;
    }
}
