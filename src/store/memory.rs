//! In-process storage backend

use std::{collections::HashMap, sync::Mutex};

use super::{lock_or_recover, Storage, StorageLock, StoreError};

/// Storage that lives only as long as the process
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
    write_lock: Mutex<()>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(lock_or_recover(&self.entries, "memory storage read")
            .get(key)
            .cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StoreError> {
        lock_or_recover(&self.entries, "memory storage write")
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        lock_or_recover(&self.entries, "memory storage remove").remove(key);
        Ok(())
    }

    fn lock(&self) -> StorageLock<'_> {
        lock_or_recover(&self.write_lock, "memory storage lock")
    }
}
