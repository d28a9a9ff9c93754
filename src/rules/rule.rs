//! A single reaction-to-repository rule.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::effects::ChannelNameResolver;
use crate::types::ReactionEvent;

/// Pairs a trigger reaction with the repository its issues are filed in.
///
/// Rules are built once from validated configuration and never change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rule {
    reaction_name: String,
    github_repository: String,

    /// `None` matches every channel. `Some` of an empty set matches none.
    channel_names: Option<BTreeSet<String>>,
}

impl Rule {
    pub fn new(
        reaction_name: impl Into<String>,
        github_repository: impl Into<String>,
        channel_names: Option<BTreeSet<String>>,
    ) -> Self {
        Rule {
            reaction_name: reaction_name.into(),
            github_repository: github_repository.into(),
            channel_names,
        }
    }

    /// A rule with no channel restriction.
    pub fn any_channel(
        reaction_name: impl Into<String>,
        github_repository: impl Into<String>,
    ) -> Self {
        Self::new(reaction_name, github_repository, None)
    }

    /// A rule restricted to the named channels.
    pub fn in_channels<I, S>(
        reaction_name: impl Into<String>,
        github_repository: impl Into<String>,
        channels: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            reaction_name,
            github_repository,
            Some(channels.into_iter().map(Into::into).collect()),
        )
    }

    pub fn reaction_name(&self) -> &str {
        &self.reaction_name
    }

    pub fn github_repository(&self) -> &str {
        &self.github_repository
    }

    pub fn channel_names(&self) -> Option<&BTreeSet<String>> {
        self.channel_names.as_ref()
    }

    /// Returns true if `event` should trigger this rule.
    ///
    /// The resolver is consulted only when the reaction name matches and the
    /// rule restricts channels.
    pub fn matches<R>(&self, event: &ReactionEvent, resolver: &R) -> bool
    where
        R: ChannelNameResolver + ?Sized,
    {
        if event.reaction != self.reaction_name {
            return false;
        }
        match &self.channel_names {
            None => true,
            Some(names) => names.contains(&resolver.channel_name(&event.item.channel)),
        }
    }
}
