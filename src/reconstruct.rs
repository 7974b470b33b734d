//! Remaining-time reconstruction from the persisted record
//!
//! Every surface derives the countdown from the same anchor instead of
//! decrementing its own counter, so two surfaces reading the same record at
//! the same instant always agree and missed ticks cannot accumulate drift.

use crate::state::{Segment, TimerStateRecord};

/// Whole seconds left in the current phase at `now_ms` (epoch millis)
///
/// Pure and deterministic. An anchor in the future (clock skew or a corrupted
/// record) yields the full phase duration rather than an overflowed value.
pub fn remaining(record: &TimerStateRecord, now_ms: i64) -> u64 {
    match record.segment {
        Segment::Paused { remaining_seconds } => remaining_seconds,
        Segment::Running { anchor_ms } => {
            if now_ms < anchor_ms {
                return record.total_phase_duration_seconds;
            }
            let elapsed_seconds = now_ms.saturating_sub(anchor_ms) as u64 / 1000;
            record
                .total_phase_duration_seconds
                .saturating_sub(elapsed_seconds)
        }
    }
}

/// Anchor that makes a running segment report `remaining_seconds` at `now_ms`
pub fn anchor_for(total_seconds: u64, remaining_seconds: u64, now_ms: i64) -> i64 {
    let elapsed_ms = total_seconds.saturating_sub(remaining_seconds).saturating_mul(1000);
    now_ms.saturating_sub(i64::try_from(elapsed_ms).unwrap_or(i64::MAX))
}
