//! Slack Web API client.
//!
//! Covers the handful of methods the bot needs: reading and adding
//! reactions, posting replies, and loading the channel list and team domain
//! it uses to name channels and build permalinks.

use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use reqwest::RequestBuilder;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::effects::{
    ChannelNameResolver, MessageReactions, ReactionReader, ReactionWriter, TeamDomain,
};
use crate::types::{ChannelId, MessageTs};

use super::channels::ChannelDirectory;

pub const SLACK_API_BASE: &str = "https://slack.com/api";

/// Page size requested from `conversations.list`.
const CHANNEL_PAGE_SIZE: u32 = 200;

/// Errors from the Slack Web API.
#[derive(Debug, Error)]
pub enum SlackClientError {
    #[error("Slack request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("unexpected response from Slack: {error}")]
    Parse {
        body: String,
        #[source]
        error: serde_json::Error,
    },

    /// Slack answered with `"ok": false`. Displays as Slack's error code.
    #[error("{error}")]
    Api { method: &'static str, error: String },
}

impl SlackClientError {
    /// The Slack error code, for `"ok": false` responses.
    pub fn api_error(&self) -> Option<&str> {
        match self {
            SlackClientError::Api { error, .. } => Some(error),
            _ => None,
        }
    }
}

// ─── Response Types ───

#[derive(Debug, Deserialize)]
struct ReactionsGetResponse {
    message: MessageReactions,
}

#[derive(Debug, Deserialize)]
struct ConversationsListResponse {
    #[serde(default)]
    channels: Vec<ChannelInfo>,
    #[serde(default)]
    response_metadata: Option<ResponseMetadata>,
}

#[derive(Debug, Deserialize)]
struct ChannelInfo {
    id: ChannelId,
    name: String,
}

#[derive(Debug, Deserialize)]
struct ResponseMetadata {
    #[serde(default)]
    next_cursor: String,
}

#[derive(Debug, Deserialize)]
struct TeamInfoResponse {
    team: TeamInfo,
}

#[derive(Debug, Deserialize)]
struct TeamInfo {
    domain: String,
}

// ─── Client ───

/// A bot-token Slack client. Clones share the HTTP pool, channel directory
/// and team domain.
#[derive(Clone)]
pub struct SlackClient {
    http: reqwest::Client,
    api_base: String,
    bot_token: String,
    success_reaction: String,
    channels: ChannelDirectory,
    team_domain: Arc<RwLock<String>>,
}

impl SlackClient {
    /// Creates a client against the public Slack API.
    pub fn new(
        bot_token: impl Into<String>,
        success_reaction: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, SlackClientError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(SlackClientError::Request)?;

        Ok(Self {
            http,
            api_base: SLACK_API_BASE.to_string(),
            bot_token: bot_token.into().trim().to_string(),
            success_reaction: success_reaction.into(),
            channels: ChannelDirectory::new(),
            team_domain: Arc::new(RwLock::new(String::new())),
        })
    }

    /// Points the client at a different API root.
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn channels(&self) -> &ChannelDirectory {
        &self.channels
    }

    pub fn success_reaction(&self) -> &str {
        &self.success_reaction
    }

    pub fn set_team_domain(&self, domain: impl Into<String>) {
        *self
            .team_domain
            .write()
            .unwrap_or_else(PoisonError::into_inner) = domain.into();
    }

    /// Fetches the reactions on a message via `reactions.get`.
    pub async fn reactions_get(
        &self,
        channel: &ChannelId,
        ts: &MessageTs,
    ) -> Result<MessageReactions, SlackClientError> {
        let response: ReactionsGetResponse = self
            .call(
                "reactions.get",
                self.http
                    .get(self.url("reactions.get"))
                    .query(&[
                        ("channel", channel.as_str()),
                        ("timestamp", ts.as_str()),
                        ("full", "true"),
                    ]),
            )
            .await?;
        Ok(response.message)
    }

    /// Adds `name` to a message via `reactions.add`.
    ///
    /// A reaction the bot already added counts as success.
    pub async fn reactions_add(
        &self,
        channel: &ChannelId,
        ts: &MessageTs,
        name: &str,
    ) -> Result<(), SlackClientError> {
        let request = self.http.post(self.url("reactions.add")).json(&json!({
            "channel": channel,
            "timestamp": ts,
            "name": name,
        }));

        match self.call::<Value>("reactions.add", request).await {
            Ok(_) => Ok(()),
            Err(e) if e.api_error() == Some("already_reacted") => {
                debug!(channel = %channel, ts = %ts, name, "reaction already present");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Posts a plain-text message to a channel.
    pub async fn post_message(
        &self,
        channel: &ChannelId,
        text: &str,
    ) -> Result<(), SlackClientError> {
        let request = self.http.post(self.url("chat.postMessage")).json(&json!({
            "channel": channel,
            "text": text,
            "unfurl_links": false,
            "unfurl_media": false,
        }));
        self.call::<Value>("chat.postMessage", request).await?;
        Ok(())
    }

    /// Reloads the channel directory from `conversations.list`, following
    /// pagination cursors. Returns the number of channels seen.
    pub async fn refresh_channels(&self) -> Result<usize, SlackClientError> {
        let mut cursor = String::new();
        let mut seen = 0;

        loop {
            let limit = CHANNEL_PAGE_SIZE.to_string();
            let request = self.http.get(self.url("conversations.list")).query(&[
                ("types", "public_channel,private_channel"),
                ("exclude_archived", "true"),
                ("limit", limit.as_str()),
                ("cursor", cursor.as_str()),
            ]);
            let page: ConversationsListResponse = self.call("conversations.list", request).await?;

            seen += page.channels.len();
            for channel in page.channels {
                self.channels.insert(channel.id, channel.name);
            }

            match page.response_metadata {
                Some(meta) if !meta.next_cursor.is_empty() => cursor = meta.next_cursor,
                _ => break,
            }
        }

        debug!(channels = seen, "channel directory loaded");
        Ok(seen)
    }

    /// Loads the team domain from `team.info`.
    pub async fn refresh_team_domain(&self) -> Result<String, SlackClientError> {
        let response: TeamInfoResponse = self
            .call("team.info", self.http.get(self.url("team.info")))
            .await?;
        self.set_team_domain(response.team.domain.clone());
        Ok(response.team.domain)
    }

    fn url(&self, method: &str) -> String {
        format!("{}/{}", self.api_base, method)
    }

    /// Sends a request and unwraps Slack's `{"ok": ..., "error": ...}`
    /// envelope.
    async fn call<T: DeserializeOwned>(
        &self,
        method: &'static str,
        request: RequestBuilder,
    ) -> Result<T, SlackClientError> {
        trace!(method, "calling Slack");

        let response = request
            .bearer_auth(&self.bot_token)
            .send()
            .await
            .map_err(SlackClientError::Request)?;
        let status = response.status();
        let body = response.text().await.map_err(SlackClientError::Request)?;

        let value: Value = serde_json::from_str(&body).map_err(|error| SlackClientError::Parse {
            body: body.clone(),
            error,
        })?;

        if value.get("ok").and_then(Value::as_bool) != Some(true) {
            let error = value
                .get("error")
                .and_then(Value::as_str)
                .unwrap_or("unknown_error")
                .to_string();
            warn!(method, status = %status, error = %error, "Slack API error");
            return Err(SlackClientError::Api { method, error });
        }

        serde_json::from_value(value).map_err(|error| SlackClientError::Parse { body, error })
    }
}

impl std::fmt::Debug for SlackClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlackClient")
            .field("api_base", &self.api_base)
            .field("channels", &self.channels.len())
            .finish_non_exhaustive()
    }
}

// ─── Capabilities ───

impl ChannelNameResolver for SlackClient {
    fn channel_name(&self, channel: &ChannelId) -> String {
        self.channels.channel_name(channel)
    }
}

impl TeamDomain for SlackClient {
    fn team_domain(&self) -> String {
        self.team_domain
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl ReactionReader for SlackClient {
    type Error = SlackClientError;

    async fn get_reactions(
        &self,
        channel: &ChannelId,
        ts: &MessageTs,
    ) -> Result<MessageReactions, SlackClientError> {
        self.reactions_get(channel, ts).await
    }
}

impl ReactionWriter for SlackClient {
    type Error = SlackClientError;

    async fn add_success_reaction(
        &self,
        channel: &ChannelId,
        ts: &MessageTs,
    ) -> Result<(), SlackClientError> {
        self.reactions_add(channel, ts, &self.success_reaction).await
    }
}

#[cfg(test)]
mod tests {
    use httpmock::prelude::*;

    use super::*;

    fn client(server: &MockServer) -> SlackClient {
        SlackClient::new("xoxb-test", "heavy_check_mark", Duration::from_secs(5))
            .unwrap()
            .with_api_base(server.base_url())
    }

    fn channel() -> ChannelId {
        ChannelId::new("C5150OU812")
    }

    fn ts() -> MessageTs {
        MessageTs::new("1360782804.083113")
    }

    #[tokio::test]
    async fn reads_reactions_and_permalink() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/reactions.get")
                .header("authorization", "Bearer xoxb-test")
                .query_param("channel", "C5150OU812")
                .query_param("timestamp", "1360782804.083113");
            then.status(200).json_body(json!({
                "ok": true,
                "type": "message",
                "channel": "C5150OU812",
                "message": {
                    "type": "message",
                    "text": "Hello world",
                    "ts": "1360782804.083113",
                    "permalink": "https://18f.slack.com/archives/handbook/p1360782804083113",
                    "reactions": [
                        { "name": "evergreen_tree", "count": 1, "users": ["U024BE7LH"] }
                    ]
                }
            }));
        });

        let message = client(&server)
            .get_reactions(&channel(), &ts())
            .await
            .unwrap();

        mock.assert();
        assert!(message.has_reaction("evergreen_tree"));
        assert!(!message.has_reaction("heavy_check_mark"));
        assert_eq!(message.ts, ts());
        assert_eq!(
            message.permalink.as_deref(),
            Some("https://18f.slack.com/archives/handbook/p1360782804083113")
        );
    }

    #[tokio::test]
    async fn api_error_displays_slack_code() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/reactions.get");
            then.status(200)
                .json_body(json!({ "ok": false, "error": "message_not_found" }));
        });

        let err = client(&server)
            .get_reactions(&channel(), &ts())
            .await
            .unwrap_err();

        assert_eq!(err.api_error(), Some("message_not_found"));
        assert_eq!(err.to_string(), "message_not_found");
    }

    #[tokio::test]
    async fn non_json_body_is_parse_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/reactions.get");
            then.status(502).body("<html>Bad Gateway</html>");
        });

        let err = client(&server)
            .get_reactions(&channel(), &ts())
            .await
            .unwrap_err();

        match err {
            SlackClientError::Parse { body, .. } => assert!(body.contains("Bad Gateway")),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn adds_configured_success_reaction() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/reactions.add")
                .body_includes("\"name\":\"heavy_check_mark\"")
                .body_includes("\"timestamp\":\"1360782804.083113\"");
            then.status(200).json_body(json!({ "ok": true }));
        });

        client(&server)
            .add_success_reaction(&channel(), &ts())
            .await
            .unwrap();
        mock.assert();
    }

    #[tokio::test]
    async fn already_reacted_counts_as_success() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/reactions.add");
            then.status(200)
                .json_body(json!({ "ok": false, "error": "already_reacted" }));
        });

        assert!(
            client(&server)
                .add_success_reaction(&channel(), &ts())
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn channel_list_follows_cursor() {
        let server = MockServer::start();
        let first = server.mock(|when, then| {
            when.method(GET)
                .path("/conversations.list")
                .query_param("cursor", "");
            then.status(200).json_body(json!({
                "ok": true,
                "channels": [
                    { "id": "C5150OU812", "name": "handbook" },
                    { "id": "C0FFEE", "name": "general" }
                ],
                "response_metadata": { "next_cursor": "dGVhbTpDMDYxRkE1UEI=" }
            }));
        });
        let second = server.mock(|when, then| {
            when.method(GET)
                .path("/conversations.list")
                .query_param("cursor", "dGVhbTpDMDYxRkE1UEI=");
            then.status(200).json_body(json!({
                "ok": true,
                "channels": [{ "id": "C0DEC", "name": "hub" }],
                "response_metadata": { "next_cursor": "" }
            }));
        });

        let client = client(&server);
        assert_eq!(client.refresh_channels().await.unwrap(), 3);

        first.assert();
        second.assert();
        assert_eq!(client.channel_name(&ChannelId::new("C0FFEE")), "general");
        assert_eq!(client.channel_name(&ChannelId::new("C0DEC")), "hub");
    }

    #[tokio::test]
    async fn team_domain_comes_from_team_info() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/team.info");
            then.status(200).json_body(json!({
                "ok": true,
                "team": { "id": "T12345", "name": "18F", "domain": "18f" }
            }));
        });

        let client = client(&server);
        assert_eq!(client.team_domain(), "");
        assert_eq!(client.refresh_team_domain().await.unwrap(), "18f");
        assert_eq!(client.clone().team_domain(), "18f");
    }
}
