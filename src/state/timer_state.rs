//! Display snapshot derived from the persisted record

use serde::{Deserialize, Serialize};

use super::{Phase, TimerStateRecord};
use crate::reconstruct::remaining;

/// What a surface renders on each refresh tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerView {
    pub phase: Phase,
    pub running: bool,
    pub remaining_seconds: u64,
    pub total_phase_duration_seconds: u64,
    pub completed_work_cycles: u32,
}

impl TimerView {
    /// Derive the view of `record` at `now_ms`
    pub fn at(record: &TimerStateRecord, now_ms: i64) -> Self {
        Self {
            phase: record.phase,
            running: record.is_running(),
            remaining_seconds: remaining(record, now_ms),
            total_phase_duration_seconds: record.total_phase_duration_seconds,
            completed_work_cycles: record.completed_work_cycles,
        }
    }

    /// Running with nothing left: the phase is due for completion
    pub fn is_expired(&self) -> bool {
        self.running && self.remaining_seconds == 0
    }

    /// Fraction of the phase already elapsed, clamped to `[0, 1]`
    pub fn progress_fraction(&self) -> f32 {
        if self.total_phase_duration_seconds == 0 {
            return 1.0;
        }
        let elapsed = self
            .total_phase_duration_seconds
            .saturating_sub(self.remaining_seconds);
        (elapsed as f32 / self.total_phase_duration_seconds as f32).min(1.0)
    }
}
