//! Surface adapter: one independently mounted view of the timer
//!
//! A surface keeps only a cached copy of what it last read from storage. It
//! re-reads on every change notification and poll tick, and derives the
//! countdown from the record's anchor on each refresh. Commands are a single
//! locked read-modify-write against storage followed by a notification.

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};
use tokio::{
    sync::broadcast::error::RecvError,
    task::JoinHandle,
    time::{interval, MissedTickBehavior},
};
use tracing::{debug, info, warn};

use crate::{
    clock::Clock,
    engine::{self, PhaseComplete},
    error::TimerError,
    services::CompletionCue,
    settings::TimerSettings,
    state::{Phase, TimerStateRecord, TimerView},
    store::{lock_or_recover, RecordWrite, Snapshot, Storage, TimerRepository},
    sync::SyncChannel,
};

/// Refresh and reconciliation cadences
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceOptions {
    /// Display refresh, not authoritative
    pub refresh: Duration,
    /// Fallback re-read of storage
    pub poll: Duration,
}

impl Default for SurfaceOptions {
    fn default() -> Self {
        Self {
            refresh: Duration::from_secs(1),
            poll: Duration::from_secs(3),
        }
    }
}

/// Shared storage context a surface mounts into
#[derive(Clone)]
pub struct SurfaceContext {
    pub storage: Arc<dyn Storage>,
    pub sync: SyncChannel,
    pub clock: Arc<dyn Clock>,
}

/// A mounted timer surface. Clones refer to the same surface.
#[derive(Clone)]
pub struct Surface {
    inner: Arc<Inner>,
}

struct Inner {
    name: String,
    repo: TimerRepository,
    sync: SyncChannel,
    clock: Arc<dyn Clock>,
    cue: Arc<dyn CompletionCue>,
    options: SurfaceOptions,
    focused: AtomicBool,
    cached: Mutex<Snapshot>,
}

impl Surface {
    /// Mount a surface, reading the current state from storage
    pub fn mount(
        name: impl Into<String>,
        context: &SurfaceContext,
        cue: Arc<dyn CompletionCue>,
        options: SurfaceOptions,
    ) -> Self {
        let name = name.into();
        let repo = TimerRepository::new(Arc::clone(&context.storage));
        let cached = repo.snapshot();
        info!("Mounted surface {}", name);

        Self {
            inner: Arc::new(Inner {
                name,
                repo,
                sync: context.sync.clone(),
                clock: Arc::clone(&context.clock),
                cue,
                options,
                focused: AtomicBool::new(false),
                cached: Mutex::new(cached),
            }),
        }
    }

    /// Label used in logs
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Mark whether this surface plays completion cues
    pub fn set_focused(&self, focused: bool) {
        self.inner.focused.store(focused, Ordering::SeqCst);
    }

    pub fn is_focused(&self) -> bool {
        self.inner.focused.load(Ordering::SeqCst)
    }

    /// Countdown derived from the cached record; does not touch storage
    pub fn snapshot(&self) -> TimerView {
        let record = self.cached().record_or_idle();
        TimerView::at(&record, self.inner.clock.now_ms())
    }

    /// Settings as last read from storage
    pub fn settings(&self) -> TimerSettings {
        self.cached().settings
    }

    /// Re-read storage and replace the cached copy
    pub fn reconcile(&self) -> TimerView {
        let snapshot = self.inner.repo.snapshot();
        let now = self.inner.clock.now_ms();
        if let Some(record) = &snapshot.record {
            if record.is_clock_skewed(now) {
                warn!(
                    "Surface {}: record anchor is {}ms in the future, showing full phase",
                    self.inner.name,
                    record.anchor_ms().unwrap_or(now).saturating_sub(now)
                );
            }
        }
        let view = TimerView::at(&snapshot.record_or_idle(), now);
        *self.cached_mut() = snapshot;
        view
    }

    /// Resume counting from the current remaining time
    pub fn start(&self) -> Result<TimerView, TimerError> {
        self.command("start", |record, settings, now| {
            engine::start(record, settings, now)
        })
    }

    /// Freeze the countdown at what is left right now
    pub fn pause(&self) -> Result<TimerView, TimerError> {
        self.command("pause", |record, _, now| engine::pause(record, now))
    }

    /// Jump to `phase`, stopped at its full duration
    pub fn switch_phase(&self, phase: Phase) -> Result<TimerView, TimerError> {
        self.command("switch-phase", |record, settings, _| {
            engine::switch_phase(record, phase, settings)
        })
    }

    /// Finish the current phase early, as if it had run out
    pub fn skip(&self) -> Result<TimerView, TimerError> {
        let now = self.inner.clock.now_ms();
        let events = self.inner.repo.modify(|snapshot| {
            // An already-expired phase completes first; the skip then applies to its successor
            let (record, expired) = settle(snapshot.record_or_idle(), &snapshot.settings, now);
            let transition = engine::complete(&record, &snapshot.settings, now);
            let events: Vec<_> = expired.into_iter().chain([transition.event]).collect();
            (RecordWrite::Put(transition.record), events)
        })?;
        info!("Surface {}: skip", self.inner.name);
        Ok(self.after_write(events))
    }

    /// Drop the record; the timer reads as idle work afterwards
    pub fn reset(&self) -> Result<TimerView, TimerError> {
        self.inner.repo.modify(|_| (RecordWrite::Remove, ()))?;
        info!("Surface {}: reset", self.inner.name);
        Ok(self.after_write(Vec::new()))
    }

    /// Validate and persist new settings. A running phase keeps its length.
    pub fn update_settings(&self, settings: TimerSettings) -> Result<TimerSettings, TimerError> {
        settings.validate()?;
        self.inner.repo.save_settings(&settings)?;
        info!("Surface {}: settings updated to {:?}", self.inner.name, settings);
        self.reconcile();
        self.inner.sync.notify();
        Ok(settings)
    }

    /// Complete the phase if the authoritative record has run out
    ///
    /// The record is re-checked under the storage lock, so when several
    /// surfaces notice the same expiry only the first one advances it.
    pub fn check_expiry(&self) -> Result<Option<PhaseComplete>, TimerError> {
        if !self.snapshot().is_expired() {
            return Ok(None);
        }
        let now = self.inner.clock.now_ms();
        let outcome = self.inner.repo.modify(|snapshot| {
            match snapshot
                .record
                .as_ref()
                .and_then(|record| engine::advance_if_expired(record, &snapshot.settings, now))
            {
                Some(transition) => (RecordWrite::Put(transition.record), Some(transition.event)),
                None => (RecordWrite::Keep, None),
            }
        })?;

        match outcome {
            Some(event) => {
                info!(
                    "Surface {}: {} complete, entering {}",
                    self.inner.name, event.completed, event.next
                );
                self.reconcile();
                self.inner.sync.notify();
                self.inner.sync.publish_completion(event);
                Ok(Some(event))
            }
            None => {
                debug!("Surface {}: expiry already handled elsewhere", self.inner.name);
                self.reconcile();
                Ok(None)
            }
        }
    }

    /// Drive this surface: `callback` gets the current view every refresh
    ///
    /// The task also reconciles on notifications and poll ticks, advances
    /// expired phases, and plays the completion cue while focused. Abort the
    /// handle to unmount.
    pub fn on_tick<F>(&self, mut callback: F) -> JoinHandle<()>
    where
        F: FnMut(TimerView) + Send + 'static,
    {
        let surface = self.clone();
        let mut changes = self.inner.sync.subscribe();
        let mut completions = self.inner.sync.subscribe_completions();

        tokio::spawn(async move {
            let mut refresh = interval(surface.inner.options.refresh);
            refresh.set_missed_tick_behavior(MissedTickBehavior::Skip);
            let mut poll = interval(surface.inner.options.poll);
            poll.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = refresh.tick() => {
                        if let Err(e) = surface.check_expiry() {
                            warn!("Surface {}: failed to advance phase: {}", surface.inner.name, e);
                        }
                        callback(surface.snapshot());
                    }
                    _ = poll.tick() => {
                        debug!("Surface {}: poll", surface.inner.name);
                        surface.reconcile();
                    }
                    changed = changes.recv() => match changed {
                        Ok(_) => {
                            surface.reconcile();
                        }
                        Err(RecvError::Lagged(skipped)) => {
                            debug!("Surface {}: skipped {} notifications", surface.inner.name, skipped);
                            surface.reconcile();
                        }
                        Err(RecvError::Closed) => break,
                    },
                    completed = completions.recv() => match completed {
                        Ok(event) => {
                            if surface.is_focused() {
                                surface.inner.cue.play(&event);
                            }
                        }
                        Err(RecvError::Lagged(skipped)) => {
                            warn!("Surface {}: missed {} completion cues", surface.inner.name, skipped);
                        }
                        Err(RecvError::Closed) => break,
                    },
                }
            }
        })
    }

    fn command<F>(&self, action: &str, apply: F) -> Result<TimerView, TimerError>
    where
        F: FnOnce(&TimerStateRecord, &TimerSettings, i64) -> TimerStateRecord,
    {
        let now = self.inner.clock.now_ms();
        let expired = self.inner.repo.modify(|snapshot| {
            let (record, expired) = settle(snapshot.record_or_idle(), &snapshot.settings, now);
            let next = apply(&record, &snapshot.settings, now);
            (RecordWrite::Put(next), expired)
        })?;
        info!("Surface {}: {}", self.inner.name, action);
        Ok(self.after_write(expired.into_iter().collect()))
    }

    /// Refresh the cache from what was just written and tell the other surfaces
    fn after_write(&self, events: Vec<PhaseComplete>) -> TimerView {
        let view = self.reconcile();
        self.inner.sync.notify();
        for event in events {
            self.inner.sync.publish_completion(event);
        }
        view
    }

    fn cached(&self) -> Snapshot {
        self.cached_mut().clone()
    }

    fn cached_mut(&self) -> std::sync::MutexGuard<'_, Snapshot> {
        lock_or_recover(&self.inner.cached, "surface cache")
    }
}

/// Complete a phase that ran out before the command arrived
fn settle(
    record: TimerStateRecord,
    settings: &TimerSettings,
    now_ms: i64,
) -> (TimerStateRecord, Option<PhaseComplete>) {
    match engine::advance_if_expired(&record, settings, now_ms) {
        Some(transition) => (transition.record, Some(transition.event)),
        None => (record, None),
    }
}
