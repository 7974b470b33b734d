//! Compact status widget surface

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::{
    state::{Phase, TimerView},
    surface::Surface,
    utils::format_clock,
};

/// One-line status such as `[Work 14:59 ▶ 2/4]`
pub fn status_line(view: &TimerView, interval: u32) -> String {
    let marker = if view.running { '▶' } else { '⏸' };
    format!(
        "[{} {} {} {}/{}]",
        view.phase.label(),
        format_clock(view.remaining_seconds),
        marker,
        view.completed_work_cycles,
        interval
    )
}

/// Drive `surface` as the navbar-style widget, logging its status every tick
pub fn spawn_widget(surface: Surface) -> JoinHandle<()> {
    info!("Starting status widget on surface {}", surface.name());

    let reader = surface.clone();
    let mut last: Option<(Phase, bool)> = None;

    surface.on_tick(move |view| {
        let line = status_line(&view, reader.settings().long_break_interval_cycles);
        debug!("{}", line);

        let current = (view.phase, view.running);
        if last != Some(current) {
            info!("Widget: {}", line);
            last = Some(current);
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_compact_status() {
        let view = TimerView {
            phase: Phase::Work,
            running: true,
            remaining_seconds: 899,
            total_phase_duration_seconds: 1500,
            completed_work_cycles: 2,
        };
        assert_eq!(status_line(&view, 4), "[Work 14:59 ▶ 2/4]");

        let paused = TimerView {
            running: false,
            phase: Phase::LongBreak,
            ..view
        };
        assert_eq!(status_line(&paused, 4), "[Long Break 14:59 ⏸ 2/4]");
    }
}
