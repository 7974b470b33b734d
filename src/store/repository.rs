//! Typed access to the two persisted blobs: settings and timer state
//!
//! Settings and state are keyed separately so a settings edit never rewrites
//! an in-flight record. Anything unreadable is treated as absent.

use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use super::{Storage, StoreError};
use crate::{settings::TimerSettings, state::TimerStateRecord};

pub const SETTINGS_KEY: &str = "timer.settings";
pub const RECORD_KEY: &str = "timer.state";

/// Everything a command needs to compute the next record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub record: Option<TimerStateRecord>,
    pub settings: TimerSettings,
}

impl Snapshot {
    /// The stored record, or the idle default when there is none
    pub fn record_or_idle(&self) -> TimerStateRecord {
        self.record
            .clone()
            .unwrap_or_else(|| TimerStateRecord::idle(&self.settings))
    }
}

/// Outcome of a read-modify-write on the record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordWrite {
    Put(TimerStateRecord),
    Remove,
    Keep,
}

/// Handle onto the shared storage. Cheap to clone; holds no timer state itself.
#[derive(Clone)]
pub struct TimerRepository {
    storage: Arc<dyn Storage>,
}

impl TimerRepository {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Current settings, defaults when absent or invalid
    pub fn load_settings(&self) -> TimerSettings {
        match self.load::<TimerSettings>(SETTINGS_KEY) {
            Some(settings) => match settings.validate() {
                Ok(()) => settings,
                Err(e) => {
                    warn!("Stored settings rejected ({}), using defaults", e);
                    TimerSettings::default()
                }
            },
            None => TimerSettings::default(),
        }
    }

    /// Overwrite settings. Callers validate first.
    pub fn save_settings(&self, settings: &TimerSettings) -> Result<(), StoreError> {
        let _guard = self.storage.lock();
        self.store(SETTINGS_KEY, settings)
    }

    /// The persisted record, `None` when absent or corrupted
    pub fn load_record(&self) -> Option<TimerStateRecord> {
        self.load(RECORD_KEY)
    }

    /// Record and settings as one consistent view
    ///
    /// A cycle count at or past the interval (a corrupted record, or the
    /// interval lowered mid-run) is clamped to one below the interval.
    pub fn snapshot(&self) -> Snapshot {
        let settings = self.load_settings();
        let record = self.load_record().map(|mut record| {
            let ceiling = settings.long_break_interval_cycles.saturating_sub(1);
            if record.completed_work_cycles > ceiling {
                warn!(
                    "Stored completedWorkCycles {} not below interval {}, clamping to {}",
                    record.completed_work_cycles, settings.long_break_interval_cycles, ceiling
                );
                record.completed_work_cycles = ceiling;
            }
            record
        });
        Snapshot { record, settings }
    }

    /// Read, compute, and write the record as one unit
    ///
    /// The storage lock is held across the whole cycle, so writers in this
    /// process never interleave. Across processes the last rename wins.
    pub fn modify<T>(
        &self,
        f: impl FnOnce(&Snapshot) -> (RecordWrite, T),
    ) -> Result<T, StoreError> {
        let _guard = self.storage.lock();
        let snapshot = self.snapshot();
        let (write, out) = f(&snapshot);
        match write {
            RecordWrite::Put(record) => self.store(RECORD_KEY, &record)?,
            RecordWrite::Remove => {
                self.storage.remove(RECORD_KEY)?;
                debug!("Timer record removed");
            }
            RecordWrite::Keep => {}
        }
        Ok(out)
    }

    fn load<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.storage.read(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!("Failed to read {}: {}", key, e);
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Ignoring corrupted {}: {}", key, e);
                None
            }
        }
    }

    fn store<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let encoded = serde_json::to_string(value).map_err(|source| StoreError::Encode {
            key: key.to_string(),
            source,
        })?;
        self.storage.write(key, &encoded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        state::{Phase, Segment},
        store::MemoryStorage,
    };

    fn repo() -> (Arc<MemoryStorage>, TimerRepository) {
        let storage = Arc::new(MemoryStorage::new());
        (storage.clone(), TimerRepository::new(storage))
    }

    #[test]
    fn empty_storage_yields_defaults() {
        let (_, repo) = repo();
        let snapshot = repo.snapshot();
        assert_eq!(snapshot.record, None);
        assert_eq!(snapshot.settings, TimerSettings::default());
        assert_eq!(
            snapshot.record_or_idle(),
            TimerStateRecord::idle(&TimerSettings::default())
        );
    }

    #[test]
    fn malformed_record_is_treated_as_absent() {
        let (storage, repo) = repo();
        for garbage in ["not json", "{\"phase\":\"Work\"}", "{\"phase\":\"Nap\",\"running\":false}", ""] {
            storage.write(RECORD_KEY, garbage).unwrap();
            assert_eq!(repo.load_record(), None);
        }
    }

    #[test]
    fn invalid_stored_settings_fall_back_to_defaults() {
        let (storage, repo) = repo();
        storage
            .write(
                SETTINGS_KEY,
                r#"{"workMinutes":0,"shortBreakMinutes":5,"longBreakMinutes":15,"longBreakIntervalCycles":4}"#,
            )
            .unwrap();
        assert_eq!(repo.load_settings(), TimerSettings::default());
    }

    #[test]
    fn modify_puts_and_removes() {
        let (_, repo) = repo();
        let record = TimerStateRecord {
            phase: Phase::ShortBreak,
            segment: Segment::Running { anchor_ms: 5 },
            total_phase_duration_seconds: 300,
            completed_work_cycles: 1,
        };

        let seen = repo
            .modify(|snapshot| (RecordWrite::Put(record.clone()), snapshot.record.clone()))
            .unwrap();
        assert_eq!(seen, None);
        assert_eq!(repo.load_record(), Some(record));

        repo.modify(|_| (RecordWrite::Remove, ())).unwrap();
        assert_eq!(repo.load_record(), None);
    }

    #[test]
    fn snapshot_clamps_cycle_count_below_interval() {
        let (storage, repo) = repo();
        storage
            .write(
                RECORD_KEY,
                r#"{"phase":"ShortBreak","running":false,"remainingSecondsAtPause":60,"totalPhaseDurationSeconds":300,"completedWorkCycles":5}"#,
            )
            .unwrap();

        let snapshot = repo.snapshot();
        assert_eq!(snapshot.record.map(|r| r.completed_work_cycles), Some(3));
        // The raw blob is left alone until the next write
        assert_eq!(repo.load_record().map(|r| r.completed_work_cycles), Some(5));
    }

    #[test]
    fn settings_and_record_are_independent() {
        let (_, repo) = repo();
        let record = TimerStateRecord::idle(&TimerSettings::default());
        repo.modify(|_| (RecordWrite::Put(record.clone()), ())).unwrap();

        let edited = TimerSettings::new(10, 2, 20, 3).unwrap();
        repo.save_settings(&edited).unwrap();

        assert_eq!(repo.load_settings(), edited);
        assert_eq!(repo.load_record(), Some(record));
    }
}
