//! Configuration and CLI argument handling

use std::{path::PathBuf, time::Duration};

use clap::Parser;

use crate::surface::SurfaceOptions;

/// CLI argument parsing structure
#[derive(Parser, Debug, Clone)]
#[command(name = "study-timer")]
#[command(about = "A Pomodoro study timer shared across independent surfaces")]
#[command(version)]
pub struct Config {
    /// Port to bind the HTTP surface to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Directory holding the persisted settings and timer record
    #[arg(long, default_value = ".study-timer")]
    pub data_dir: PathBuf,

    /// Display refresh interval in milliseconds
    #[arg(long, default_value = "1000")]
    pub refresh_ms: u64,

    /// Storage reconciliation poll interval in seconds
    #[arg(long, default_value = "3")]
    pub poll_secs: u64,

    /// Shell command run when a phase completes
    #[arg(long)]
    pub cue_command: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.refresh_ms == 0 {
            return Err("--refresh-ms must be positive".to_string());
        }
        if self.poll_secs == 0 {
            return Err("--poll-secs must be positive".to_string());
        }
        Ok(())
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    pub fn surface_options(&self) -> SurfaceOptions {
        SurfaceOptions {
            refresh: Duration::from_millis(self.refresh_ms),
            poll: Duration::from_secs(self.poll_secs),
        }
    }
}
