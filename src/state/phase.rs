//! Timer phases

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// One of the three timer modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    Work,
    ShortBreak,
    LongBreak,
}

impl Phase {
    /// Human readable label for status lines
    pub fn label(&self) -> &'static str {
        match self {
            Phase::Work => "Work",
            Phase::ShortBreak => "Short Break",
            Phase::LongBreak => "Long Break",
        }
    }

    /// Path segment used by the HTTP surface
    pub fn slug(&self) -> &'static str {
        match self {
            Phase::Work => "work",
            Phase::ShortBreak => "short-break",
            Phase::LongBreak => "long-break",
        }
    }

    pub fn is_break(&self) -> bool {
        !matches!(self, Phase::Work)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Phase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "work" => Ok(Phase::Work),
            "short-break" | "shortbreak" | "short_break" => Ok(Phase::ShortBreak),
            "long-break" | "longbreak" | "long_break" => Ok(Phase::LongBreak),
            other => Err(format!("Unknown phase: {}", other)),
        }
    }
}
