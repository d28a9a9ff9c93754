//! Runs reaction events through the middleware on their own tasks.

use std::any::Any;

use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

use super::{AppState, IssueTracker, SlackApi};
use crate::effects::{Responder, ResponderFactory};
use crate::types::ReactionEvent;

/// Spawns the middleware for `event` and returns a handle that completes once
/// the event has been fully handled.
///
/// A panic anywhere in matching or the pipeline stays inside the spawned
/// task: it is logged as an unhandled error with the raw event and reported
/// to the user. The in-flight claim is released as the task unwinds.
pub fn dispatch<S: SlackApi, G: IssueTracker>(
    app_state: &AppState<S, G>,
    event: ReactionEvent,
) -> JoinHandle<()> {
    let slack = app_state.middleware().slack();
    let responder = slack.responder_for(&event);
    let fallback = slack.responder_for(&event);
    let raw = event.clone();

    let state = app_state.clone();
    let task = tokio::spawn(async move {
        let msg_id = event.message_id();
        let next = move || debug!(msg_id = %msg_id, "reaction handled");

        if let Some(pipeline) = state.middleware().execute(event, responder, next) {
            // The pipeline logs and replies with its own outcome.
            let _ = pipeline.await;
        }
    });

    tokio::spawn(async move {
        match task.await {
            Ok(()) => {}
            Err(e) if e.is_panic() => {
                let message = panic_message(e.into_panic());
                error!(event = ?raw, panic = %message, "unhandled error");
                fallback
                    .reply(&format!("unhandled error: {}", message))
                    .await;
            }
            Err(e) => warn!(event = ?raw, error = %e, "reaction task cancelled"),
        }
    })
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
