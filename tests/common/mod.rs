#![allow(dead_code)]

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use study_timer::{
    services::CompletionCue, ManualClock, MemoryStorage, PhaseComplete, Storage, Surface,
    SurfaceContext, SurfaceOptions, SyncChannel,
};

pub const T0: i64 = 1_700_000_000_000;

/// Cue that remembers every completion it was asked to play
#[derive(Default)]
pub struct RecordingCue {
    played: Mutex<Vec<PhaseComplete>>,
}

impl RecordingCue {
    pub fn played(&self) -> Vec<PhaseComplete> {
        self.played.lock().unwrap().clone()
    }
}

impl CompletionCue for RecordingCue {
    fn play(&self, event: &PhaseComplete) {
        self.played.lock().unwrap().push(*event);
    }
}

pub struct Harness {
    pub storage: Arc<MemoryStorage>,
    pub clock: Arc<ManualClock>,
    pub context: SurfaceContext,
}

impl Harness {
    pub fn new() -> Self {
        let storage = Arc::new(MemoryStorage::new());
        let clock = Arc::new(ManualClock::new(T0));
        let context = SurfaceContext {
            storage: storage.clone() as Arc<dyn Storage>,
            sync: SyncChannel::new(),
            clock: clock.clone(),
        };
        Self {
            storage,
            clock,
            context,
        }
    }

    /// Same storage and clock, but a separate notification channel, as a
    /// writer in another process would see it
    pub fn detached_context(&self) -> SurfaceContext {
        SurfaceContext {
            sync: SyncChannel::new(),
            ..self.context.clone()
        }
    }

    pub fn mount(&self, name: &str) -> Surface {
        Surface::mount(name, &self.context, Arc::new(RecordingCue::default()), fast_options())
    }

    pub fn mount_with_cue(&self, name: &str, cue: Arc<RecordingCue>) -> Surface {
        Surface::mount(name, &self.context, cue, fast_options())
    }
}

pub fn fast_options() -> SurfaceOptions {
    SurfaceOptions {
        refresh: Duration::from_millis(100),
        poll: Duration::from_millis(500),
    }
}
