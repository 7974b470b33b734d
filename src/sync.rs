//! Cross-surface sync channel
//!
//! A payload-less "storage changed" broadcast for surfaces in the same
//! process, plus a completion broadcast so the focused surface can play the
//! cue no matter which surface performed the transition. Surfaces also poll
//! storage on their own cadence, which covers late mounts and writers in other
//! processes that cannot reach this channel.

use tokio::sync::broadcast;
use tracing::debug;

use crate::engine::PhaseComplete;

/// Something changed in storage; re-read it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorageChanged;

#[derive(Debug, Clone)]
pub struct SyncChannel {
    changes: broadcast::Sender<StorageChanged>,
    completions: broadcast::Sender<PhaseComplete>,
}

impl SyncChannel {
    /// Create both broadcast channels with no subscribers yet
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(64);
        let (completions, _) = broadcast::channel(16);
        Self {
            changes,
            completions,
        }
    }

    /// Tell every subscribed surface to re-read storage
    pub fn notify(&self) {
        if self.changes.send(StorageChanged).is_err() {
            debug!("No surfaces subscribed to storage changes");
        }
    }

    /// Receiver for change notifications
    pub fn subscribe(&self) -> broadcast::Receiver<StorageChanged> {
        self.changes.subscribe()
    }

    /// Announce a completed phase to every surface
    pub fn publish_completion(&self, event: PhaseComplete) {
        if self.completions.send(event).is_err() {
            debug!("No surfaces subscribed to completions");
        }
    }

    /// Receiver for completion events
    pub fn subscribe_completions(&self) -> broadcast::Receiver<PhaseComplete> {
        self.completions.subscribe()
    }
}

impl Default for SyncChannel {
    fn default() -> Self {
        Self::new()
    }
}
