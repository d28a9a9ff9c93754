//! Configuration validation.
//!
//! Works on the raw JSON value rather than a derived struct so that every
//! problem can be reported at once instead of stopping at the first.

use std::collections::BTreeSet;
use std::time::Duration;

use serde_json::{Map, Value};

use crate::rules::{Rule, RuleSet};

use super::{Config, ConfigError};

const TOP_LEVEL_FIELDS: [&str; 5] = [
    "githubUser",
    "githubTimeout",
    "slackTimeout",
    "successReaction",
    "rules",
];

const RULE_REQUIRED_FIELDS: [&str; 2] = ["reactionName", "githubRepository"];
const RULE_OPTIONAL_FIELDS: [&str; 1] = ["channelNames"];

/// Validates a parsed configuration document and builds a [`Config`].
pub fn validate(value: &Value) -> Result<Config, ConfigError> {
    let Some(obj) = value.as_object() else {
        return Err(ConfigError::Invalid {
            problems: vec!["configuration must be a JSON object".to_string()],
        });
    };

    let mut problems = Vec::new();

    for field in TOP_LEVEL_FIELDS {
        if !obj.contains_key(field) {
            problems.push(format!("missing {}", field));
        }
    }
    for key in obj.keys() {
        if !TOP_LEVEL_FIELDS.contains(&key.as_str()) {
            problems.push(format!("unknown property {}", key));
        }
    }

    let github_user = string_field(obj, "githubUser", "", &mut problems);
    let github_timeout = timeout_field(obj, "githubTimeout", &mut problems);
    let slack_timeout = timeout_field(obj, "slackTimeout", &mut problems);
    let success_reaction = string_field(obj, "successReaction", "", &mut problems);
    let rules = rules_field(obj, &mut problems);

    match (
        github_user,
        github_timeout,
        slack_timeout,
        success_reaction,
        rules,
    ) {
        (
            Some(github_user),
            Some(github_timeout),
            Some(slack_timeout),
            Some(success_reaction),
            Some(rules),
        ) if problems.is_empty() => Ok(Config {
            github_user,
            github_timeout,
            slack_timeout,
            success_reaction,
            rules,
        }),
        _ => Err(ConfigError::Invalid { problems }),
    }
}

/// Reads a non-empty string. Absence is reported by the caller.
fn string_field(
    obj: &Map<String, Value>,
    field: &str,
    prefix: &str,
    problems: &mut Vec<String>,
) -> Option<String> {
    match obj.get(field)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        _ => {
            problems.push(format!("{}{} must be a non-empty string", prefix, field));
            None
        }
    }
}

fn timeout_field(
    obj: &Map<String, Value>,
    field: &str,
    problems: &mut Vec<String>,
) -> Option<Duration> {
    match obj.get(field)?.as_u64() {
        Some(ms) if ms > 0 => Some(Duration::from_millis(ms)),
        _ => {
            problems.push(format!(
                "{} must be a positive number of milliseconds",
                field
            ));
            None
        }
    }
}

fn rules_field(obj: &Map<String, Value>, problems: &mut Vec<String>) -> Option<RuleSet> {
    let Some(list) = obj.get("rules")?.as_array() else {
        problems.push("rules must be a list".to_string());
        return None;
    };

    let before = problems.len();
    let rules: Vec<Rule> = list
        .iter()
        .enumerate()
        .filter_map(|(index, raw)| parse_rule(index, raw, problems))
        .collect();

    (problems.len() == before).then(|| RuleSet::new(rules))
}

fn parse_rule(index: usize, raw: &Value, problems: &mut Vec<String>) -> Option<Rule> {
    let Some(obj) = raw.as_object() else {
        problems.push(format!("rule {} must be an object", index));
        return None;
    };

    let before = problems.len();
    let prefix = format!("rule {} ", index);

    for field in RULE_REQUIRED_FIELDS {
        if !obj.contains_key(field) {
            problems.push(format!("rule {} missing {}", index, field));
        }
    }
    for key in obj.keys() {
        let known = RULE_REQUIRED_FIELDS.contains(&key.as_str())
            || RULE_OPTIONAL_FIELDS.contains(&key.as_str());
        if !known {
            problems.push(format!("rule {} contains unknown property {}", index, key));
        }
    }

    let reaction_name = string_field(obj, "reactionName", &prefix, problems);
    let github_repository = string_field(obj, "githubRepository", &prefix, problems);
    let channel_names = match obj.get("channelNames") {
        None => None,
        Some(value) => Some(channel_names(index, value, problems)?),
    };

    if problems.len() != before {
        return None;
    }
    Some(Rule::new(reaction_name?, github_repository?, channel_names))
}

fn channel_names(index: usize, value: &Value, problems: &mut Vec<String>) -> Option<BTreeSet<String>> {
    let names = value.as_array().and_then(|items| {
        items
            .iter()
            .map(|item| item.as_str().map(str::to_string))
            .collect::<Option<BTreeSet<_>>>()
    });
    if names.is_none() {
        problems.push(format!(
            "rule {} channelNames must be a list of strings",
            index
        ));
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid() -> Value {
        json!({
            "githubUser": "18F",
            "githubTimeout": 5000,
            "slackTimeout": 5000,
            "successReaction": "heavy_check_mark",
            "rules": [
                { "reactionName": "evergreen_tree", "githubRepository": "handbook",
                  "channelNames": ["handbook", "general"] },
                { "reactionName": "evergreen_tree", "githubRepository": "hub" }
            ]
        })
    }

    fn problems(value: &Value) -> Vec<String> {
        match validate(value) {
            Err(ConfigError::Invalid { problems }) => problems,
            other => panic!("expected invalid configuration, got {:?}", other),
        }
    }

    #[test]
    fn builds_rules_in_order() {
        let config = validate(&valid()).unwrap();
        let rules = config.rules.rules();
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].github_repository(), "handbook");
        assert_eq!(
            rules[0].channel_names().unwrap().iter().collect::<Vec<_>>(),
            vec!["general", "handbook"]
        );
        assert_eq!(rules[1].github_repository(), "hub");
        assert_eq!(rules[1].channel_names(), None);
    }

    #[test]
    fn empty_channel_list_is_kept_distinct_from_absent() {
        let mut value = valid();
        value["rules"][1]["channelNames"] = json!([]);
        let config = validate(&value).unwrap();
        assert_eq!(config.rules.rules()[1].channel_names(), Some(&BTreeSet::new()));
    }

    #[test]
    fn reports_every_missing_field() {
        let value = json!({ "githubUser": "18F" });
        assert_eq!(
            problems(&value),
            vec![
                "missing githubTimeout",
                "missing slackTimeout",
                "missing successReaction",
                "missing rules",
            ]
        );
    }

    #[test]
    fn reports_unknown_properties() {
        let mut value = valid();
        value["color"] = json!("blue");
        value["rules"][0]["priority"] = json!(1);
        assert_eq!(
            problems(&value),
            vec![
                "unknown property color",
                "rule 0 contains unknown property priority",
            ]
        );
    }

    #[test]
    fn reports_rule_problems_with_index() {
        let mut value = valid();
        value["rules"] = json!([
            { "githubRepository": "handbook" },
            { "reactionName": "smiley", "githubRepository": "hub", "channelNames": "general" },
            "not a rule"
        ]);
        assert_eq!(
            problems(&value),
            vec![
                "rule 0 missing reactionName",
                "rule 1 channelNames must be a list of strings",
                "rule 2 must be an object",
            ]
        );
    }

    #[test]
    fn rejects_bad_values() {
        let mut value = valid();
        value["githubTimeout"] = json!("soon");
        value["slackTimeout"] = json!(0);
        value["successReaction"] = json!("");
        assert_eq!(
            problems(&value),
            vec![
                "githubTimeout must be a positive number of milliseconds",
                "slackTimeout must be a positive number of milliseconds",
                "successReaction must be a non-empty string",
            ]
        );
    }

    #[test]
    fn error_message_lists_problems_on_separate_lines() {
        let err = validate(&json!({
            "githubUser": "18F",
            "githubTimeout": 5000,
            "slackTimeout": 5000,
            "successReaction": "heavy_check_mark"
        }))
        .unwrap_err();
        assert_eq!(err.to_string(), "Invalid configuration:\n  missing rules");
    }

    #[test]
    fn non_object_document_is_invalid() {
        assert_eq!(
            problems(&json!([1, 2, 3])),
            vec!["configuration must be a JSON object"]
        );
    }
}
