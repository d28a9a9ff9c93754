//! Ordered rule lookup.

use serde::Serialize;

use crate::effects::ChannelNameResolver;
use crate::types::ReactionEvent;

use super::rule::Rule;

/// The configured rules, in configuration order.
///
/// Order matters: when several rules could match the same event, the first
/// one wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new(rules: Vec<Rule>) -> Self {
        RuleSet { rules }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Returns the first rule `event` should trigger, if any.
    ///
    /// Events that are not a reaction added to a message never reach rule
    /// evaluation. `None` is the usual answer, not an error.
    pub fn find_matching_rule<R>(&self, event: &ReactionEvent, resolver: &R) -> Option<&Rule>
    where
        R: ChannelNameResolver + ?Sized,
    {
        if !event.is_eligible() {
            return None;
        }
        self.rules.iter().find(|rule| rule.matches(event, resolver))
    }
}

impl FromIterator<Rule> for RuleSet {
    fn from_iter<I: IntoIterator<Item = Rule>>(iter: I) -> Self {
        RuleSet::new(iter.into_iter().collect())
    }
}
