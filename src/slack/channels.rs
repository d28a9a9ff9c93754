//! Channel id to name directory.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::effects::ChannelNameResolver;
use crate::types::ChannelId;

/// Cached channel names, filled at startup from `conversations.list` and
/// kept current from `channel_created` / `channel_rename` events.
///
/// Clones share the same table.
#[derive(Debug, Clone, Default)]
pub struct ChannelDirectory {
    names: Arc<RwLock<HashMap<ChannelId, String>>>,
}

impl ChannelDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a channel's current name, replacing any earlier one.
    pub fn insert(&self, id: ChannelId, name: impl Into<String>) {
        self.names
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, name.into());
    }

    pub fn remove(&self, id: &ChannelId) {
        self.names
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(id);
    }

    pub fn get(&self, id: &ChannelId) -> Option<String> {
        self.names
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.names
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ChannelNameResolver for ChannelDirectory {
    fn channel_name(&self, channel: &ChannelId) -> String {
        self.get(channel).unwrap_or_else(|| channel.to_string())
    }
}
