//! Study Timer - A Pomodoro timer shared across independent surfaces
//!
//! The timer's running state lives in one persisted record. Surfaces read it,
//! derive the countdown from its wall-clock anchor, and write it back
//! wholesale; a change broadcast plus a slow poll keeps them in step.

pub mod api;
pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod reconstruct;
pub mod services;
pub mod settings;
pub mod state;
pub mod store;
pub mod surface;
pub mod sync;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use api::create_router;
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::Config;
pub use engine::PhaseComplete;
pub use error::TimerError;
pub use reconstruct::remaining;
pub use settings::{SettingsError, TimerSettings};
pub use state::{AppState, Phase, Segment, TimerStateRecord, TimerView};
pub use store::{FileStorage, MemoryStorage, Storage, TimerRepository};
pub use surface::{Surface, SurfaceContext, SurfaceOptions};
pub use sync::SyncChannel;
pub use utils::signals::shutdown_signal;
