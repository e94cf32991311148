//! Pomodoro work/break state machine.
//!
//! # Responsibility
//! - Own the countdown, the run state and the Work/Break mode.
//! - Record completed work segments through `PomodoroRepository`.
//!
//! # Invariants
//! - `start` while Running and `pause` while not Running are no-ops.
//! - `reset` always lands in Idle with the full duration of the current mode.
//! - Completing a segment flips the mode and returns to Idle; the next
//!   segment needs an explicit `start`.
//! - Duration changes only move the countdown while Idle.

use crate::model::pomodoro::PomodoroSettings;
use crate::repo::pomodoro_repo::PomodoroRepository;
use crate::repo::MutationResult;
use crate::store::DocumentStore;
use log::{info, warn};
use std::fmt::{Display, Formatter};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    Idle,
    Running,
    Paused,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerMode {
    Work,
    Break,
}

impl Display for TimerMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Work => f.write_str("work"),
            Self::Break => f.write_str("break"),
        }
    }
}

/// Notification raised when a segment finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// A work segment finished; `today_count` includes it.
    WorkComplete { today_count: u32, persisted: bool },
    /// A break finished; the timer is back in Work mode.
    BreakComplete,
}

impl TimerEvent {
    /// Short user-facing notification text.
    pub fn message(&self) -> String {
        match self {
            Self::WorkComplete { today_count, .. } => {
                format!("Work session complete. Pomodoro #{today_count} today, take a break.")
            }
            Self::BreakComplete => "Break complete. Ready for the next work session.".to_string(),
        }
    }
}

/// Read-only view of the timer for renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerSnapshot {
    pub state: TimerState,
    pub mode: TimerMode,
    pub remaining_secs: u64,
    pub work_minutes: u32,
    pub break_minutes: u32,
    pub today_count: u32,
}

/// Source of one-second ticks.
pub trait TickSource {
    /// Waits for the next tick. Returns `false` to stop driving the timer.
    fn next_tick(&mut self) -> bool;
}

/// Wall-clock ticker that sleeps one period per tick.
#[derive(Debug, Clone, Copy)]
pub struct IntervalTicker {
    period: Duration,
}

impl IntervalTicker {
    pub fn new(period: Duration) -> Self {
        Self { period }
    }
}

impl Default for IntervalTicker {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

impl TickSource for IntervalTicker {
    fn next_tick(&mut self) -> bool {
        std::thread::sleep(self.period);
        true
    }
}

pub struct PomodoroTimer<'s> {
    settings: PomodoroRepository<'s>,
    state: TimerState,
    mode: TimerMode,
    remaining_secs: u64,
    work_minutes: u32,
    break_minutes: u32,
}

impl<'s> PomodoroTimer<'s> {
    /// Creates an Idle timer in Work mode from the stored durations.
    pub fn new(store: &'s DocumentStore) -> Self {
        let settings = PomodoroRepository::new(store);
        let stored = settings.get().into_value();
        Self {
            settings,
            state: TimerState::Idle,
            mode: TimerMode::Work,
            remaining_secs: stored.work_seconds(),
            work_minutes: stored.work_time,
            break_minutes: stored.break_time,
        }
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn mode(&self) -> TimerMode {
        self.mode
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    /// Idle/Paused -> Running. Returns `false` when already running.
    pub fn start(&mut self) -> bool {
        if self.state == TimerState::Running {
            return false;
        }
        self.state = TimerState::Running;
        info!(
            "event=timer_start module=pomodoro status=ok mode={} remaining_secs={}",
            self.mode, self.remaining_secs
        );
        true
    }

    /// Running -> Paused. Returns `false` when not running.
    pub fn pause(&mut self) -> bool {
        if self.state != TimerState::Running {
            return false;
        }
        self.state = TimerState::Paused;
        true
    }

    /// Any state -> Idle with a full countdown for the current mode.
    pub fn reset(&mut self) {
        self.state = TimerState::Idle;
        self.remaining_secs = self.segment_secs();
    }

    /// Advances the countdown by one second while Running.
    ///
    /// Returns the completion event when the countdown reaches zero.
    pub fn tick(&mut self) -> Option<TimerEvent> {
        if self.state != TimerState::Running {
            return None;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            return Some(self.complete());
        }
        None
    }

    /// Drives a running segment with `ticks` until it completes or the
    /// source stops.
    pub fn run(&mut self, ticks: &mut impl TickSource) -> Option<TimerEvent> {
        while self.state == TimerState::Running && ticks.next_tick() {
            if let Some(event) = self.tick() {
                return Some(event);
            }
        }
        None
    }

    /// Stores new durations. While Idle the countdown moves to the new
    /// duration of the current mode; otherwise it is left alone.
    pub fn set_durations(
        &mut self,
        work_minutes: u32,
        break_minutes: u32,
    ) -> MutationResult<PomodoroSettings> {
        let saved = self
            .settings
            .update_durations(work_minutes, break_minutes)?;
        self.work_minutes = work_minutes;
        self.break_minutes = break_minutes;
        if self.state == TimerState::Idle {
            self.remaining_secs = self.segment_secs();
        }
        Ok(saved)
    }

    pub fn set_work_minutes(&mut self, minutes: u32) -> MutationResult<PomodoroSettings> {
        self.set_durations(minutes, self.break_minutes)
    }

    pub fn set_break_minutes(&mut self, minutes: u32) -> MutationResult<PomodoroSettings> {
        self.set_durations(self.work_minutes, minutes)
    }

    /// Completed work segments today, after rollover.
    pub fn today_count(&self) -> u32 {
        self.settings.get().into_value().today_count
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            state: self.state,
            mode: self.mode,
            remaining_secs: self.remaining_secs,
            work_minutes: self.work_minutes,
            break_minutes: self.break_minutes,
            today_count: self.today_count(),
        }
    }

    /// Countdown as `MM:SS`.
    pub fn display(&self) -> String {
        format!(
            "{:02}:{:02}",
            self.remaining_secs / 60,
            self.remaining_secs % 60
        )
    }

    /// Elapsed fraction of the current segment in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        let total = self.segment_secs();
        if total == 0 {
            return 0.0;
        }
        let elapsed = total.saturating_sub(self.remaining_secs);
        (elapsed as f64 / total as f64).clamp(0.0, 1.0)
    }

    fn segment_secs(&self) -> u64 {
        let minutes = match self.mode {
            TimerMode::Work => self.work_minutes,
            TimerMode::Break => self.break_minutes,
        };
        u64::from(minutes) * 60
    }

    fn complete(&mut self) -> TimerEvent {
        self.state = TimerState::Idle;
        let event = match self.mode {
            TimerMode::Work => {
                let saved = self.settings.increment_today_count();
                if let Some(err) = &saved.persist_error {
                    warn!(
                        "event=timer_complete module=pomodoro status=error error_code=count_not_saved error={err}"
                    );
                }
                self.mode = TimerMode::Break;
                TimerEvent::WorkComplete {
                    today_count: saved.value,
                    persisted: saved.is_persisted(),
                }
            }
            TimerMode::Break => {
                self.mode = TimerMode::Work;
                TimerEvent::BreakComplete
            }
        };
        self.remaining_secs = self.segment_secs();
        info!(
            "event=timer_complete module=pomodoro status=ok next_mode={} remaining_secs={}",
            self.mode, self.remaining_secs
        );
        event
    }
}

#[cfg(test)]
mod tests {
    use super::{PomodoroTimer, TickSource, TimerMode, TimerState};
    use crate::clock::ManualClock;
    use crate::store::{DocumentStore, MemoryBackend, DEFAULT_STORAGE_KEY};
    use chrono::{TimeZone, Utc};

    struct CountedTicks(u32);

    impl TickSource for CountedTicks {
        fn next_tick(&mut self) -> bool {
            if self.0 == 0 {
                return false;
            }
            self.0 -= 1;
            true
        }
    }

    fn store() -> DocumentStore {
        DocumentStore::open(
            Box::new(MemoryBackend::new()),
            Box::new(ManualClock::new(
                Utc.with_ymd_and_hms(2026, 10, 19, 9, 0, 0).unwrap(),
            )),
            DEFAULT_STORAGE_KEY,
        )
    }

    #[test]
    fn display_and_progress_track_countdown() {
        let store = store();
        let mut timer = PomodoroTimer::new(&store);
        assert_eq!(timer.display(), "25:00");
        assert_eq!(timer.progress(), 0.0);

        timer.start();
        for _ in 0..750 {
            timer.tick();
        }
        assert_eq!(timer.display(), "12:30");
        assert!((timer.progress() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn run_stops_when_tick_source_is_exhausted() {
        let store = store();
        let mut timer = PomodoroTimer::new(&store);
        timer.start();

        assert_eq!(timer.run(&mut CountedTicks(10)), None);
        assert_eq!(timer.remaining_secs(), 1490);
        assert_eq!(timer.state(), TimerState::Running);
    }

    #[test]
    fn run_returns_event_at_segment_end() {
        let store = store();
        let mut timer = PomodoroTimer::new(&store);
        timer.set_durations(1, 1).unwrap().into_value();
        timer.start();

        let event = timer.run(&mut CountedTicks(1000));
        assert!(event.is_some());
        assert_eq!(timer.mode(), TimerMode::Break);
        assert_eq!(timer.state(), TimerState::Idle);
    }
}
