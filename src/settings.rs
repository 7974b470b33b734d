//! Configurable phase durations and the long-break interval

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::state::Phase;

/// Longest allowed phase, in minutes
pub const MAX_PHASE_MINUTES: u32 = 24 * 60;
/// Largest allowed long-break interval
pub const MAX_INTERVAL_CYCLES: u32 = 100;

/// Rejected settings edit. The previous settings stay in effect.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    #[error("{field} must be a positive number of minutes")]
    NonPositiveDuration { field: &'static str },

    #[error("{field} must be at most {} minutes, got {value}", MAX_PHASE_MINUTES)]
    DurationTooLong { field: &'static str, value: u32 },

    #[error("longBreakIntervalCycles must be between 1 and {}, got {0}", MAX_INTERVAL_CYCLES)]
    InvalidInterval(u32),
}

/// Phase durations in minutes plus the number of work phases before a long break
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerSettings {
    pub work_minutes: u32,
    pub short_break_minutes: u32,
    pub long_break_minutes: u32,
    pub long_break_interval_cycles: u32,
}

impl TimerSettings {
    pub fn new(
        work_minutes: u32,
        short_break_minutes: u32,
        long_break_minutes: u32,
        long_break_interval_cycles: u32,
    ) -> Result<Self, SettingsError> {
        let settings = Self {
            work_minutes,
            short_break_minutes,
            long_break_minutes,
            long_break_interval_cycles,
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Check every field, reporting the first offending one
    pub fn validate(&self) -> Result<(), SettingsError> {
        check_minutes("workMinutes", self.work_minutes)?;
        check_minutes("shortBreakMinutes", self.short_break_minutes)?;
        check_minutes("longBreakMinutes", self.long_break_minutes)?;

        if self.long_break_interval_cycles == 0
            || self.long_break_interval_cycles > MAX_INTERVAL_CYCLES
        {
            return Err(SettingsError::InvalidInterval(self.long_break_interval_cycles));
        }
        Ok(())
    }

    pub fn minutes_for(&self, phase: Phase) -> u32 {
        match phase {
            Phase::Work => self.work_minutes,
            Phase::ShortBreak => self.short_break_minutes,
            Phase::LongBreak => self.long_break_minutes,
        }
    }

    /// Full duration of a fresh instance of `phase`
    pub fn duration_seconds(&self, phase: Phase) -> u64 {
        u64::from(self.minutes_for(phase)) * 60
    }
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self {
            work_minutes: 25,
            short_break_minutes: 5,
            long_break_minutes: 15,
            long_break_interval_cycles: 4,
        }
    }
}

fn check_minutes(field: &'static str, value: u32) -> Result<(), SettingsError> {
    if value == 0 {
        return Err(SettingsError::NonPositiveDuration { field });
    }
    if value > MAX_PHASE_MINUTES {
        return Err(SettingsError::DurationTooLong { field, value });
    }
    Ok(())
}
