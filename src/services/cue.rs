//! Completion cues played when a phase runs out

use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::engine::PhaseComplete;

/// Side effect fired once per phase completion on the focused surface
pub trait CompletionCue: Send + Sync {
    fn play(&self, event: &PhaseComplete);
}

/// Announces completions in the log only
#[derive(Debug, Default, Clone, Copy)]
pub struct LogCue;

impl CompletionCue for LogCue {
    fn play(&self, event: &PhaseComplete) {
        info!("{}", cue_message(event));
    }
}

/// Runs a user-supplied shell command, e.g. a sound player
///
/// The phase names are exported as `STUDY_TIMER_COMPLETED` and
/// `STUDY_TIMER_NEXT` for the command to use.
#[derive(Debug, Clone)]
pub struct CommandCue {
    command: String,
}

impl CommandCue {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

impl CompletionCue for CommandCue {
    fn play(&self, event: &PhaseComplete) {
        info!("{}", cue_message(event));
        let command = self.command.clone();
        let completed = event.completed.slug();
        let next = event.next.slug();

        tokio::spawn(async move {
            debug!("Running cue command: {}", command);
            let result = Command::new("sh")
                .args(["-c", command.as_str()])
                .env("STUDY_TIMER_COMPLETED", completed)
                .env("STUDY_TIMER_NEXT", next)
                .output()
                .await;

            match result {
                Ok(output) if output.status.success() => debug!("Cue command finished"),
                Ok(output) => {
                    let stderr = String::from_utf8_lossy(&output.stderr);
                    warn!("Cue command failed: {}", stderr.trim());
                }
                Err(e) => warn!("Failed to execute cue command: {}", e),
            }
        });
    }
}

/// Text shown or logged for a completion
pub fn cue_message(event: &PhaseComplete) -> String {
    if event.completed.is_break() {
        format!("{} over! Time to work.", event.completed)
    } else {
        format!("Work done! {}.", event.next)
    }
}
