//! Persistence module
//!
//! Keyed string blobs (the `Storage` trait and its backends) and the
//! repository that reads and writes the timer's settings and state through them.

pub mod file;
pub mod memory;
pub mod repository;

use std::{
    io,
    sync::{Mutex, MutexGuard},
};
use thiserror::Error;
use tracing::warn;

// Re-export main types
pub use file::FileStorage;
pub use memory::MemoryStorage;
pub use repository::{RecordWrite, Snapshot, TimerRepository, RECORD_KEY, SETTINGS_KEY};

/// Failure to reach or update the backing store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Invalid storage key: {0:?}")]
    InvalidKey(String),

    #[error("Storage I/O failed for {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to encode {key}: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Held for the duration of one read-modify-write
pub type StorageLock<'a> = MutexGuard<'a, ()>;

/// A keyed blob store shared by every surface in one context
///
/// Values are replaced wholesale; there is no partial update.
pub trait Storage: Send + Sync {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn write(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
    /// Serialise writers within this process
    fn lock(&self) -> StorageLock<'_>;
}

/// Take the write lock even if a previous holder panicked
pub(crate) fn lock_or_recover<'a, T>(lock: &'a Mutex<T>, context: &str) -> MutexGuard<'a, T> {
    match lock.lock() {
        Ok(guard) => guard,
        Err(poisoned) => {
            warn!("Mutex poisoned in {}; recovering", context);
            poisoned.into_inner()
        }
    }
}
