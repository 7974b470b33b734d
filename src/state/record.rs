//! The persisted timer record, the single source of truth shared by all surfaces

use serde::{Deserialize, Serialize};

use super::Phase;
use crate::settings::TimerSettings;

/// How the remaining time of the current phase is represented
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    /// Counting down; elapsed time is measured from `anchor_ms` (epoch millis)
    Running { anchor_ms: i64 },
    /// Stopped; the snapshot is authoritative
    Paused { remaining_seconds: u64 },
}

/// Authoritative timer state. Always replaced wholesale in storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PersistedRecord", into = "PersistedRecord")]
pub struct TimerStateRecord {
    pub phase: Phase,
    pub segment: Segment,
    /// Captured from settings when the phase instance began; never resized afterwards
    pub total_phase_duration_seconds: u64,
    /// Work phases completed since the last long break
    pub completed_work_cycles: u32,
}

impl TimerStateRecord {
    /// Idle work phase at full duration, the state of a timer nobody has started
    pub fn idle(settings: &TimerSettings) -> Self {
        Self::fresh(Phase::Work, settings, 0)
    }

    /// Paused instance of `phase` at its full duration
    pub fn fresh(phase: Phase, settings: &TimerSettings, completed_work_cycles: u32) -> Self {
        let total = settings.duration_seconds(phase);
        Self {
            phase,
            segment: Segment::Paused {
                remaining_seconds: total,
            },
            total_phase_duration_seconds: total,
            completed_work_cycles,
        }
    }

    /// Whether the countdown is live
    pub fn is_running(&self) -> bool {
        matches!(self.segment, Segment::Running { .. })
    }

    /// Anchor of a running record, `None` while paused
    pub fn anchor_ms(&self) -> Option<i64> {
        match self.segment {
            Segment::Running { anchor_ms } => Some(anchor_ms),
            Segment::Paused { .. } => None,
        }
    }

    /// True when a running record's anchor lies in the future relative to `now_ms`
    pub fn is_clock_skewed(&self, now_ms: i64) -> bool {
        self.anchor_ms().is_some_and(|anchor| now_ms < anchor)
    }
}

/// Flat wire form: `running` plus exactly one of the anchor or the pause snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedRecord {
    pub phase: Phase,
    pub running: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor_timestamp: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remaining_seconds_at_pause: Option<u64>,
    pub total_phase_duration_seconds: u64,
    pub completed_work_cycles: u32,
}

impl TryFrom<PersistedRecord> for TimerStateRecord {
    type Error = String;

    fn try_from(raw: PersistedRecord) -> Result<Self, Self::Error> {
        let segment = match (raw.running, raw.anchor_timestamp, raw.remaining_seconds_at_pause) {
            (true, Some(anchor_ms), _) => Segment::Running { anchor_ms },
            (false, _, Some(remaining_seconds)) => Segment::Paused { remaining_seconds },
            (true, None, _) => return Err("running record without anchorTimestamp".to_string()),
            (false, _, None) => {
                return Err("paused record without remainingSecondsAtPause".to_string())
            }
        };

        if let Segment::Paused { remaining_seconds } = segment {
            if remaining_seconds > raw.total_phase_duration_seconds {
                return Err(format!(
                    "remainingSecondsAtPause {} exceeds phase duration {}",
                    remaining_seconds, raw.total_phase_duration_seconds
                ));
            }
        }

        Ok(Self {
            phase: raw.phase,
            segment,
            total_phase_duration_seconds: raw.total_phase_duration_seconds,
            completed_work_cycles: raw.completed_work_cycles,
        })
    }
}

impl From<TimerStateRecord> for PersistedRecord {
    fn from(record: TimerStateRecord) -> Self {
        let (running, anchor_timestamp, remaining_seconds_at_pause) = match record.segment {
            Segment::Running { anchor_ms } => (true, Some(anchor_ms), None),
            Segment::Paused { remaining_seconds } => (false, None, Some(remaining_seconds)),
        };
        Self {
            phase: record.phase,
            running,
            anchor_timestamp,
            remaining_seconds_at_pause,
            total_phase_duration_seconds: record.total_phase_duration_seconds,
            completed_work_cycles: record.completed_work_cycles,
        }
    }
}
