//! In-flight registry: which messages currently have a pipeline running.
//!
//! Claiming is synchronous and atomic, so two events for the same message
//! can never both start a pipeline. The claim is released when its
//! [`InFlightGuard`] is dropped, whether the pipeline succeeded, failed, or
//! was abandoned mid-flight.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;

use crate::types::MessageId;

/// Pipeline state for a single message.
///
/// Completed runs are not stored: their outcome is the pipeline's result, and
/// the message goes back to `NotStarted` so a later event can file again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineState {
    NotStarted,
    InProgress,
}

/// Shared handle to the set of in-flight messages.
///
/// Cloning the handle shares the underlying set. Each `Middleware` is given
/// its own registry so tests can run isolated instances side by side.
#[derive(Debug, Clone, Default)]
pub struct InFlightRegistry {
    inner: Arc<Mutex<HashSet<MessageId>>>,
}

impl InFlightRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `id` as in progress.
    ///
    /// Returns `None` if a pipeline for `id` is already running.
    pub fn try_claim(&self, id: MessageId) -> Option<InFlightGuard> {
        if !self.lock().insert(id.clone()) {
            return None;
        }
        Some(InFlightGuard {
            registry: self.clone(),
            id,
        })
    }

    pub fn state(&self, id: &MessageId) -> PipelineState {
        if self.lock().contains(id) {
            PipelineState::InProgress
        } else {
            PipelineState::NotStarted
        }
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// The in-flight ids, sorted for stable output.
    pub fn snapshot(&self) -> Vec<MessageId> {
        let mut ids: Vec<_> = self.lock().iter().cloned().collect();
        ids.sort();
        ids
    }

    fn release(&self, id: &MessageId) {
        self.lock().remove(id);
    }

    // A panic while holding the lock cannot leave the set half-updated, so a
    // poisoned lock is still safe to use.
    fn lock(&self) -> MutexGuard<'_, HashSet<MessageId>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Proof that a message is claimed. Dropping it releases the claim.
#[derive(Debug)]
pub struct InFlightGuard {
    registry: InFlightRegistry,
    id: MessageId,
}

impl InFlightGuard {
    pub fn id(&self) -> &MessageId {
        &self.id
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.registry.release(&self.id);
    }
}
