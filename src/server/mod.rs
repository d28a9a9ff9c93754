//! HTTP server for the reaction bot.
//!
//! This module implements the HTTP server that:
//! - Accepts Slack Events API requests, validates signatures, and hands
//!   reaction events to the middleware on their own tasks
//! - Provides an in-flight inspection endpoint for observability
//! - Provides health checks for liveness probes
//!
//! # Endpoints
//!
//! - `POST /slack/events` - Accepts Slack event deliveries
//! - `GET /api/v1/in-flight` - Lists messages with a pipeline in progress
//! - `GET /health` - Returns 200 if server is running

use std::sync::Arc;

use tower_http::trace::TraceLayer;

use crate::effects::{
    ChannelNameResolver, IssueFiler, ReactionReader, ReactionWriter, ResponderFactory, TeamDomain,
};
use crate::middleware::Middleware;
use crate::slack::ChannelDirectory;

pub mod dispatch;
pub mod events;
pub mod health;
pub mod in_flight;

pub use dispatch::dispatch;
pub use events::events_handler;
pub use health::health_handler;
pub use in_flight::in_flight_handler;

/// Everything the server needs from Slack.
pub trait SlackApi:
    ChannelNameResolver
    + TeamDomain
    + ReactionReader
    + ReactionWriter
    + ResponderFactory
    + Send
    + Sync
    + 'static
{
}

impl<T> SlackApi for T where
    T: ChannelNameResolver
        + TeamDomain
        + ReactionReader
        + ReactionWriter
        + ResponderFactory
        + Send
        + Sync
        + 'static
{
}

/// Everything the server needs from the issue tracker.
pub trait IssueTracker: IssueFiler + Send + Sync + 'static {}

impl<T> IssueTracker for T where T: IssueFiler + Send + Sync + 'static {}

/// Shared application state.
///
/// This is passed to all handlers via Axum's `State` extractor.
pub struct AppState<S, G> {
    inner: Arc<AppStateInner<S, G>>,
}

struct AppStateInner<S, G> {
    middleware: Middleware<S, G>,

    /// Directory updated from channel events. Shared with the Slack client
    /// in production.
    channels: ChannelDirectory,

    /// Slack signing secret for request verification.
    signing_secret: Vec<u8>,
}

impl<S, G> Clone for AppState<S, G> {
    fn clone(&self) -> Self {
        AppState {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S, G> AppState<S, G> {
    pub fn new(
        middleware: Middleware<S, G>,
        channels: ChannelDirectory,
        signing_secret: impl Into<Vec<u8>>,
    ) -> Self {
        AppState {
            inner: Arc::new(AppStateInner {
                middleware,
                channels,
                signing_secret: signing_secret.into(),
            }),
        }
    }

    pub fn middleware(&self) -> &Middleware<S, G> {
        &self.inner.middleware
    }

    pub fn channels(&self) -> &ChannelDirectory {
        &self.inner.channels
    }

    pub fn signing_secret(&self) -> &[u8] {
        &self.inner.signing_secret
    }
}

/// Builds the axum Router with all endpoints.
pub fn build_router<S: SlackApi, G: IssueTracker>(app_state: AppState<S, G>) -> axum::Router {
    use axum::routing::{get, post};

    axum::Router::new()
        .route("/slack/events", post(events_handler::<S, G>))
        .route("/api/v1/in-flight", get(in_flight_handler::<S, G>))
        .route("/health", get(health_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
