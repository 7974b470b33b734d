//! Phase transition engine
//!
//! Pure functions from (record, settings, now) to the next record. Nothing
//! here touches storage; surfaces persist whatever these return.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    reconstruct::{anchor_for, remaining},
    settings::TimerSettings,
    state::{Phase, Segment, TimerStateRecord},
};

/// Fire-once notice that a phase ran out (or was skipped)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseComplete {
    pub completed: Phase,
    pub next: Phase,
    pub completed_work_cycles: u32,
}

/// Record produced by a completion together with its event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub record: TimerStateRecord,
    pub event: PhaseComplete,
}

/// Phase and cycle count following a completed `phase`
pub fn next_phase(phase: Phase, completed_work_cycles: u32, interval: u32) -> (Phase, u32) {
    match phase {
        Phase::Work => {
            let cycles = completed_work_cycles.saturating_add(1);
            // `>=` covers an interval lowered by a settings edit mid-run
            if cycles >= interval {
                (Phase::LongBreak, 0)
            } else {
                (Phase::ShortBreak, cycles)
            }
        }
        Phase::ShortBreak | Phase::LongBreak => (Phase::Work, completed_work_cycles),
    }
}

/// Begin or resume counting down
pub fn start(record: &TimerStateRecord, settings: &TimerSettings, now_ms: i64) -> TimerStateRecord {
    match record.segment {
        Segment::Running { .. } => record.clone(),
        Segment::Paused { remaining_seconds: 0 } => {
            let mut next = TimerStateRecord::fresh(record.phase, settings, record.completed_work_cycles);
            next.segment = Segment::Running { anchor_ms: now_ms };
            next
        }
        Segment::Paused { remaining_seconds } => TimerStateRecord {
            segment: Segment::Running {
                anchor_ms: anchor_for(record.total_phase_duration_seconds, remaining_seconds, now_ms),
            },
            ..record.clone()
        },
    }
}

/// Freeze the countdown at its current value
pub fn pause(record: &TimerStateRecord, now_ms: i64) -> TimerStateRecord {
    match record.segment {
        Segment::Paused { .. } => record.clone(),
        Segment::Running { .. } => TimerStateRecord {
            segment: Segment::Paused {
                remaining_seconds: remaining(record, now_ms),
            },
            ..record.clone()
        },
    }
}

/// User override: jump to `target`, stopped at its full duration
///
/// Leaving `Work` part-way through an interval drops the partial cycle count.
pub fn switch_phase(
    record: &TimerStateRecord,
    target: Phase,
    settings: &TimerSettings,
) -> TimerStateRecord {
    let cycles = if record.phase == Phase::Work && target != Phase::Work {
        0
    } else {
        record.completed_work_cycles
    };
    TimerStateRecord::fresh(target, settings, cycles)
}

/// Finish the current phase and enter the next one
///
/// The running flag carries over; the new phase is sized from current settings.
pub fn complete(record: &TimerStateRecord, settings: &TimerSettings, now_ms: i64) -> Transition {
    let (phase, cycles) = next_phase(
        record.phase,
        record.completed_work_cycles,
        settings.long_break_interval_cycles,
    );
    let mut next = TimerStateRecord::fresh(phase, settings, cycles);
    if record.is_running() {
        next.segment = Segment::Running { anchor_ms: now_ms };
    }
    debug!("Phase {} complete, entering {} (cycles={})", record.phase, phase, cycles);

    Transition {
        record: next,
        event: PhaseComplete {
            completed: record.phase,
            next: phase,
            completed_work_cycles: cycles,
        },
    }
}

/// Complete the phase only if it is running and has run out at `now_ms`
pub fn advance_if_expired(
    record: &TimerStateRecord,
    settings: &TimerSettings,
    now_ms: i64,
) -> Option<Transition> {
    if record.is_running() && remaining(record, now_ms) == 0 {
        Some(complete(record, settings, now_ms))
    } else {
        None
    }
}
