mod common;

use std::sync::Arc;

use common::{Harness, RecordingCue};
use study_timer::{
    store::{RECORD_KEY, SETTINGS_KEY},
    Phase, Segment, Storage, TimerError, TimerRepository, TimerSettings,
};

#[test]
fn late_mount_computes_the_same_remaining_time() {
    let harness = Harness::new();
    let a = harness.mount("page");
    a.start().unwrap();

    harness.clock.advance_secs(600);
    let b = harness.mount("widget");

    assert_eq!(b.snapshot().remaining_seconds, 900);
    assert_eq!(a.snapshot().remaining_seconds, 900);
    assert_eq!(a.snapshot(), b.snapshot());
}

#[test]
fn stale_surface_catches_up_on_reconcile() {
    let harness = Harness::new();
    let a = harness.mount("page");
    let b = harness.mount("widget");
    a.start().unwrap();
    b.reconcile();

    harness.clock.advance_secs(90);
    a.pause().unwrap();
    harness.clock.advance_secs(30);

    // B has not re-read yet, so its cached record still counts down
    assert!(b.snapshot().running);
    let view = b.reconcile();
    assert!(!view.running);
    assert_eq!(view.remaining_seconds, 1410);
}

#[test]
fn last_write_wins() {
    let harness = Harness::new();
    let a = harness.mount("page");
    let b = harness.mount("widget");
    a.start().unwrap();
    harness.clock.advance_secs(60);

    a.pause().unwrap();
    b.reset().unwrap();

    assert_eq!(TimerRepository::new(harness.context.storage.clone()).load_record(), None);
    let view = a.reconcile();
    assert_eq!(view.phase, Phase::Work);
    assert_eq!(view.remaining_seconds, 1500);
    assert!(!view.running);
}

#[test]
fn pause_resume_round_trip_keeps_remaining() {
    let harness = Harness::new();
    let page = harness.mount("page");
    page.start().unwrap();

    harness.clock.advance_secs(725);
    let paused = page.pause().unwrap();
    assert_eq!(paused.remaining_seconds, 775);

    harness.clock.advance_secs(3600);
    let resumed = page.start().unwrap();
    assert!(resumed.running);
    assert_eq!(resumed.remaining_seconds, 775);

    harness.clock.advance_secs(5);
    assert_eq!(page.snapshot().remaining_seconds, 770);
}

#[test]
fn pausing_twice_persists_the_same_snapshot() {
    let harness = Harness::new();
    let page = harness.mount("page");
    page.start().unwrap();
    harness.clock.advance_secs(100);

    page.pause().unwrap();
    let first = harness.storage.read(RECORD_KEY).unwrap();
    harness.clock.advance_secs(100);
    page.pause().unwrap();
    let second = harness.storage.read(RECORD_KEY).unwrap();

    assert!(first.is_some());
    assert_eq!(first, second);
}

#[test]
fn reset_is_idempotent() {
    let harness = Harness::new();
    let page = harness.mount("page");
    page.start().unwrap();

    let once = page.reset().unwrap();
    let twice = page.reset().unwrap();
    assert_eq!(once, twice);
    assert_eq!(harness.storage.read(RECORD_KEY).unwrap(), None);
}

#[test]
fn settings_edit_leaves_running_phase_alone() {
    let harness = Harness::new();
    let page = harness.mount("page");
    page.start().unwrap();
    harness.clock.advance_secs(60);

    page.update_settings(TimerSettings::new(10, 5, 15, 4).unwrap())
        .unwrap();
    let view = page.snapshot();
    assert_eq!(view.total_phase_duration_seconds, 1500);
    assert_eq!(view.remaining_seconds, 1440);

    // The next work phase picks up the new length
    harness.clock.advance_secs(1440);
    page.check_expiry().unwrap();
    assert_eq!(page.snapshot().phase, Phase::ShortBreak);
    harness.clock.advance_secs(300);
    page.check_expiry().unwrap();
    let next_work = page.snapshot();
    assert_eq!(next_work.phase, Phase::Work);
    assert_eq!(next_work.total_phase_duration_seconds, 600);
}

#[test]
fn invalid_settings_are_rejected_whole() {
    let harness = Harness::new();
    let page = harness.mount("page");
    let custom = TimerSettings::new(50, 10, 30, 2).unwrap();
    page.update_settings(custom).unwrap();

    let bad = TimerSettings {
        work_minutes: 40,
        long_break_interval_cycles: 0,
        ..custom
    };
    assert!(matches!(
        page.update_settings(bad),
        Err(TimerError::InvalidSettings(_))
    ));

    let repo = TimerRepository::new(harness.context.storage.clone());
    assert_eq!(repo.load_settings(), custom);
    assert_eq!(page.settings(), custom);
}

#[test]
fn corrupted_record_recovers_to_idle_work() {
    let harness = Harness::new();
    harness
        .storage
        .write(RECORD_KEY, "{\"phase\":\"Work\",\"running\":tru")
        .unwrap();
    harness.storage.write(SETTINGS_KEY, "[]").unwrap();

    let page = harness.mount("page");
    let view = page.snapshot();
    assert_eq!(view.phase, Phase::Work);
    assert!(!view.running);
    assert_eq!(view.remaining_seconds, 1500);
    assert_eq!(view.completed_work_cycles, 0);

    // Commands overwrite the garbage with a valid record
    assert!(page.start().unwrap().running);
    let record = TimerRepository::new(harness.context.storage.clone())
        .load_record()
        .unwrap();
    assert_eq!(record.segment, Segment::Running { anchor_ms: common::T0 });
}

#[test]
fn expiry_noticed_by_two_surfaces_completes_once() {
    let harness = Harness::new();
    let a = harness.mount("page");
    let b = harness.mount("widget");
    let mut completions = harness.context.sync.subscribe_completions();

    a.start().unwrap();
    b.reconcile();
    harness.clock.advance_secs(1500);

    let first = a.check_expiry().unwrap();
    let second = b.check_expiry().unwrap();

    assert_eq!(first.map(|e| e.next), Some(Phase::ShortBreak));
    assert_eq!(second, None);
    assert!(completions.try_recv().is_ok());
    assert!(completions.try_recv().is_err());

    let view = b.snapshot();
    assert_eq!(view.phase, Phase::ShortBreak);
    assert_eq!(view.completed_work_cycles, 1);
    assert!(view.running);
}

#[test]
fn four_work_phases_end_in_a_long_break() {
    let harness = Harness::new();
    let page = harness.mount("page");
    page.start().unwrap();

    let mut phases = vec![page.snapshot().phase];
    for _ in 0..7 {
        harness
            .clock
            .advance_secs(page.snapshot().remaining_seconds as i64);
        page.check_expiry().unwrap();
        phases.push(page.snapshot().phase);
    }

    assert_eq!(
        phases,
        vec![
            Phase::Work,
            Phase::ShortBreak,
            Phase::Work,
            Phase::ShortBreak,
            Phase::Work,
            Phase::ShortBreak,
            Phase::Work,
            Phase::LongBreak,
        ]
    );
    assert_eq!(page.snapshot().completed_work_cycles, 0);
}

#[test]
fn command_after_unobserved_expiry_settles_first() {
    let harness = Harness::new();
    let page = harness.mount("page");
    let mut completions = harness.context.sync.subscribe_completions();
    page.start().unwrap();

    harness.clock.advance_secs(1600);
    let view = page.pause().unwrap();

    assert_eq!(view.phase, Phase::ShortBreak);
    assert!(!view.running);
    assert_eq!(view.remaining_seconds, 300);
    assert_eq!(completions.try_recv().unwrap().completed, Phase::Work);
}

#[test]
fn manual_switch_stops_and_drops_partial_interval() {
    let harness = Harness::new();
    let page = harness.mount("page");
    page.start().unwrap();
    harness.clock.advance_secs(1500);
    page.check_expiry().unwrap();
    harness.clock.advance_secs(300);
    page.check_expiry().unwrap();
    assert_eq!(page.snapshot().completed_work_cycles, 1);

    let view = page.switch_phase(Phase::LongBreak).unwrap();
    assert_eq!(view.phase, Phase::LongBreak);
    assert!(!view.running);
    assert_eq!(view.remaining_seconds, 900);
    assert_eq!(view.completed_work_cycles, 0);
}

#[test]
fn skip_counts_as_completion() {
    let harness = Harness::new();
    let cue = Arc::new(RecordingCue::default());
    let page = harness.mount_with_cue("page", cue);
    let mut completions = harness.context.sync.subscribe_completions();
    page.start().unwrap();
    harness.clock.advance_secs(10);

    let view = page.skip().unwrap();
    assert_eq!(view.phase, Phase::ShortBreak);
    assert_eq!(view.completed_work_cycles, 1);
    assert!(view.running);
    assert_eq!(view.remaining_seconds, 300);
    assert_eq!(completions.try_recv().unwrap().next, Phase::ShortBreak);
}

#[test]
fn extreme_anchor_from_storage_shows_full_phase() {
    let harness = Harness::new();
    harness
        .storage
        .write(
            RECORD_KEY,
            &format!(
                "{{\"phase\":\"Work\",\"running\":true,\"anchorTimestamp\":{},\"totalPhaseDurationSeconds\":1500,\"completedWorkCycles\":0}}",
                i64::MAX
            ),
        )
        .unwrap();
    harness.clock.set(-1_000);

    let page = harness.mount("page");
    let view = page.reconcile();
    assert!(view.running);
    assert_eq!(view.remaining_seconds, 1500);
    assert!(!view.is_expired());
}

#[test]
fn out_of_range_cycle_count_is_clamped_on_load() {
    let harness = Harness::new();
    harness
        .storage
        .write(
            RECORD_KEY,
            r#"{"phase":"Work","running":false,"remainingSecondsAtPause":10,"totalPhaseDurationSeconds":1500,"completedWorkCycles":5}"#,
        )
        .unwrap();

    let page = harness.mount("page");
    assert_eq!(page.snapshot().completed_work_cycles, 3);

    let view = page.skip().unwrap();
    assert_eq!(view.phase, Phase::LongBreak);
    assert_eq!(view.completed_work_cycles, 0);
}
