//! Bot configuration.
//!
//! Rules and timeouts come from a JSON file; tokens and secrets come from the
//! environment so the file can be checked in.
//!
//! ```json
//! {
//!   "githubUser": "18F",
//!   "githubTimeout": 5000,
//!   "slackTimeout": 5000,
//!   "successReaction": "heavy_check_mark",
//!   "rules": [
//!     {
//!       "reactionName": "evergreen_tree",
//!       "githubRepository": "handbook",
//!       "channelNames": ["handbook"]
//!     }
//!   ]
//! }
//! ```

use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

use crate::rules::RuleSet;

mod validation;

pub use validation::validate;

/// Environment variable naming the config file.
pub const CONFIG_PATH_ENV: &str = "SLACK_GITHUB_ISSUES_CONFIG_PATH";

/// Config file used when [`CONFIG_PATH_ENV`] is unset.
pub const DEFAULT_CONFIG_PATH: &str = "config/slack-github-issues.json";

/// Validated bot configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Owner of every repository issues are filed in.
    pub github_user: String,
    pub github_timeout: Duration,
    pub slack_timeout: Duration,

    /// Reaction added to a message once its issue exists.
    pub success_reaction: String,
    pub rules: RuleSet,
}

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse configuration: {0}")]
    Json(#[from] serde_json::Error),

    /// Every problem found, one per line.
    #[error("Invalid configuration:\n  {}", .problems.join("\n  "))]
    Invalid { problems: Vec<String> },

    #[error("missing required environment variable {0}")]
    MissingEnv(&'static str),

    #[error("invalid value for {name}: {value}")]
    InvalidEnv { name: &'static str, value: String },
}

impl Config {
    /// Parses and validates a JSON configuration document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        validate(&value)
    }

    /// Loads configuration from a file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&contents)
    }

    /// Loads configuration from [`CONFIG_PATH_ENV`], or [`DEFAULT_CONFIG_PATH`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(config_path())
    }
}

/// The config file path the bot will read.
pub fn config_path() -> PathBuf {
    std::env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

/// Credentials and listener settings, read from the environment.
#[derive(Clone)]
pub struct Secrets {
    pub github_token: String,
    pub slack_bot_token: String,
    pub slack_signing_secret: Vec<u8>,
    pub listen_addr: SocketAddr,
}

impl Secrets {
    pub const GITHUB_TOKEN: &'static str = "GITHUB_TOKEN";
    pub const SLACK_BOT_TOKEN: &'static str = "SLACK_BOT_TOKEN";
    pub const SLACK_SIGNING_SECRET: &'static str = "SLACK_SIGNING_SECRET";
    pub const LISTEN_ADDR: &'static str = "LISTEN_ADDR";
    pub const DEFAULT_LISTEN_ADDR: &'static str = "0.0.0.0:3000";

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds secrets from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::MissingEnv(name))
        };

        let listen = lookup(Self::LISTEN_ADDR).unwrap_or_else(|| Self::DEFAULT_LISTEN_ADDR.into());
        let listen_addr = listen.parse().map_err(|_| ConfigError::InvalidEnv {
            name: Self::LISTEN_ADDR,
            value: listen.clone(),
        })?;

        Ok(Secrets {
            github_token: required(Self::GITHUB_TOKEN)?,
            slack_bot_token: required(Self::SLACK_BOT_TOKEN)?,
            slack_signing_secret: required(Self::SLACK_SIGNING_SECRET)?.into_bytes(),
            listen_addr,
        })
    }
}

impl std::fmt::Debug for Secrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Secrets")
            .field("listen_addr", &self.listen_addr)
            .finish_non_exhaustive()
    }
}
