//! Deciding which reactions are worth an issue.
//!
//! A [`Rule`] is a pure predicate over a reaction event. A [`RuleSet`] holds
//! the configured rules in order and returns the first one that applies.

mod matcher;
mod rule;

pub use matcher::RuleSet;
pub use rule::Rule;
