//! Shared test fakes and arbitrary generators for property-based testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use proptest::prelude::*;
use thiserror::Error;
use tokio::sync::Notify;

use crate::effects::{
    ChannelNameResolver, IssueFiler, MessageReactions, Reaction, ReactionReader, ReactionWriter,
    Responder, ResponderFactory, TeamDomain,
};
use crate::types::{ChannelId, IssueMetadata, MessageTs, ReactionEvent};

pub fn arb_reaction_name() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("evergreen_tree".to_string()),
        Just("heavy_check_mark".to_string()),
        "[a-z_+-]{1,20}",
    ]
}

pub fn arb_channel_name() -> impl Strategy<Value = String> {
    prop_oneof![Just("handbook".to_string()), "[a-z][a-z0-9_-]{0,20}"]
}

/// An error whose message is exactly the given text.
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct FakeError(pub String);

/// Channel directory with a fixed id-to-name table that counts lookups.
#[derive(Debug, Default)]
pub struct StaticChannels {
    names: HashMap<String, String>,
    lookups: AtomicUsize,
}

impl StaticChannels {
    pub fn new<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        StaticChannels {
            names: entries
                .into_iter()
                .map(|(id, name)| (id.to_string(), name.to_string()))
                .collect(),
            lookups: AtomicUsize::new(0),
        }
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

impl ChannelNameResolver for StaticChannels {
    fn channel_name(&self, channel: &ChannelId) -> String {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.names
            .get(channel.as_str())
            .cloned()
            .unwrap_or_else(|| channel.to_string())
    }
}

/// In-memory Slack with scripted responses.
#[derive(Debug)]
pub struct FakeSlack {
    pub channels: StaticChannels,
    pub domain: String,
    pub reactions: Mutex<Result<MessageReactions, String>>,
    pub add_result: Mutex<Result<(), String>>,
    pub get_calls: AtomicUsize,
    pub add_calls: AtomicUsize,

    /// When set, `get_reactions` waits for a notification before answering.
    pub gate: Option<Arc<Notify>>,

    /// Every reply sent through a responder this fake opened.
    pub replies: RecordingResponder,

    /// When set, `get_reactions` panics with this message.
    pub panic_with: Option<&'static str>,
}

impl FakeSlack {
    pub fn new() -> Self {
        FakeSlack {
            channels: StaticChannels::new([("C5150OU812", "handbook"), ("C0FFEE", "general")]),
            domain: "18f".to_string(),
            reactions: Mutex::new(Ok(MessageReactions {
                reactions: vec![reaction("evergreen_tree")],
                permalink: Some(
                    "https://18f.slack.com/archives/handbook/p1360782804083113".to_string(),
                ),
                ts: MessageTs::new("1360782804.083113"),
            })),
            add_result: Mutex::new(Ok(())),
            get_calls: AtomicUsize::new(0),
            add_calls: AtomicUsize::new(0),
            gate: None,
            replies: RecordingResponder::new(),
            panic_with: None,
        }
    }

    pub fn gated(gate: Arc<Notify>) -> Self {
        FakeSlack {
            gate: Some(gate),
            ..Self::new()
        }
    }

    pub fn panicking(message: &'static str) -> Self {
        FakeSlack {
            panic_with: Some(message),
            ..Self::new()
        }
    }

    pub fn with_reactions(self, reactions: Result<MessageReactions, String>) -> Self {
        *self.reactions.lock().unwrap() = reactions;
        self
    }

    pub fn with_add_result(self, result: Result<(), String>) -> Self {
        *self.add_result.lock().unwrap() = result;
        self
    }

    pub fn get_calls(&self) -> usize {
        self.get_calls.load(Ordering::SeqCst)
    }

    pub fn add_calls(&self) -> usize {
        self.add_calls.load(Ordering::SeqCst)
    }
}

impl Default for FakeSlack {
    fn default() -> Self {
        Self::new()
    }
}

pub fn reaction(name: &str) -> Reaction {
    Reaction {
        name: name.to_string(),
        count: 1,
        users: vec!["U024BE7LH".to_string()],
    }
}

impl ChannelNameResolver for FakeSlack {
    fn channel_name(&self, channel: &ChannelId) -> String {
        self.channels.channel_name(channel)
    }
}

impl TeamDomain for FakeSlack {
    fn team_domain(&self) -> String {
        self.domain.clone()
    }
}

impl ReactionReader for FakeSlack {
    type Error = FakeError;

    async fn get_reactions(
        &self,
        _channel: &ChannelId,
        _ts: &MessageTs,
    ) -> Result<MessageReactions, FakeError> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = self.panic_with {
            panic!("{}", message);
        }
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        let response = self.reactions.lock().unwrap().clone();
        response.map_err(FakeError)
    }
}

impl ReactionWriter for FakeSlack {
    type Error = FakeError;

    async fn add_success_reaction(
        &self,
        _channel: &ChannelId,
        _ts: &MessageTs,
    ) -> Result<(), FakeError> {
        self.add_calls.fetch_add(1, Ordering::SeqCst);
        let result = self.add_result.lock().unwrap().clone();
        result.map_err(FakeError)
    }
}

impl ResponderFactory for FakeSlack {
    type Responder = RecordingResponder;

    fn responder_for(&self, _event: &ReactionEvent) -> RecordingResponder {
        self.replies.clone()
    }
}

/// In-memory issue tracker that records every request.
#[derive(Debug)]
pub struct FakeGitHub {
    pub owner: String,
    pub result: Mutex<Result<String, String>>,
    pub filed: Mutex<Vec<(IssueMetadata, String)>>,
}

impl FakeGitHub {
    pub fn new() -> Self {
        FakeGitHub {
            owner: "18F".to_string(),
            result: Mutex::new(Ok("https://issues.example/handbook/1".to_string())),
            filed: Mutex::new(Vec::new()),
        }
    }

    pub fn with_result(self, result: Result<String, String>) -> Self {
        *self.result.lock().unwrap() = result;
        self
    }

    pub fn calls(&self) -> usize {
        self.filed.lock().unwrap().len()
    }

    pub fn filed(&self) -> Vec<(IssueMetadata, String)> {
        self.filed.lock().unwrap().clone()
    }
}

impl Default for FakeGitHub {
    fn default() -> Self {
        Self::new()
    }
}

impl IssueFiler for FakeGitHub {
    type Error = FakeError;

    fn owner(&self) -> &str {
        &self.owner
    }

    async fn file_new_issue(
        &self,
        metadata: &IssueMetadata,
        repository: &str,
    ) -> Result<String, FakeError> {
        self.filed
            .lock()
            .unwrap()
            .push((metadata.clone(), repository.to_string()));
        let result = self.result.lock().unwrap().clone();
        result.map_err(FakeError)
    }
}

/// Collects replies for later inspection. Clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct RecordingResponder {
    replies: Arc<Mutex<Vec<String>>>,
}

impl RecordingResponder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replies(&self) -> Vec<String> {
        self.replies.lock().unwrap().clone()
    }
}

impl Responder for RecordingResponder {
    async fn reply(&self, text: &str) {
        self.replies.lock().unwrap().push(text.to_string());
    }
}

/// A continuation that counts how often it runs.
#[derive(Debug, Clone, Default)]
pub struct CallCounter {
    count: Arc<AtomicUsize>,
}

impl CallCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn callback(&self) -> impl FnOnce() + Send + 'static {
        let count = Arc::clone(&self.count);
        move || {
            count.fetch_add(1, Ordering::SeqCst);
        }
    }

    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}
