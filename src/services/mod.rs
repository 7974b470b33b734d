//! Side-effect services module
//!
//! Cues played outside the timer core when a phase completes.

pub mod cue;

// Re-export main types
pub use cue::{cue_message, CommandCue, CompletionCue, LogCue};
