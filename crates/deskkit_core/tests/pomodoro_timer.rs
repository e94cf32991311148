use chrono::{Duration, NaiveDate, TimeZone, Utc};
use deskkit_core::repo::pomodoro_repo::PomodoroRepository;
use deskkit_core::service::pomodoro_timer::{
    PomodoroTimer, TickSource, TimerEvent, TimerMode, TimerState,
};
use deskkit_core::{Document, DocumentStore, ManualClock, MemoryBackend, DEFAULT_STORAGE_KEY};

fn store_at(clock: &ManualClock) -> DocumentStore {
    DocumentStore::open(
        Box::new(MemoryBackend::new()),
        Box::new(clock.clone()),
        DEFAULT_STORAGE_KEY,
    )
}

fn clock() -> ManualClock {
    ManualClock::new(Utc.with_ymd_and_hms(2026, 10, 19, 9, 0, 0).unwrap())
}

/// Emits a fixed number of ticks, then stops.
struct Ticks(u64);

impl TickSource for Ticks {
    fn next_tick(&mut self) -> bool {
        if self.0 == 0 {
            return false;
        }
        self.0 -= 1;
        true
    }
}

#[test]
fn full_work_segment_switches_to_break_and_counts() {
    let clock = clock();
    let store = store_at(&clock);
    let mut timer = PomodoroTimer::new(&store);
    assert_eq!(timer.display(), "25:00");

    assert!(timer.start());
    let mut event = None;
    for _ in 0..1500 {
        event = timer.tick();
    }

    assert_eq!(
        event,
        Some(TimerEvent::WorkComplete {
            today_count: 1,
            persisted: true
        })
    );
    assert_eq!(timer.mode(), TimerMode::Break);
    assert_eq!(timer.state(), TimerState::Idle);
    assert_eq!(timer.remaining_secs(), 5 * 60);
    assert_eq!(store.load().unwrap().unwrap().pomodoro.today_count, 1);
}

#[test]
fn break_completion_returns_to_work_without_counting() {
    let clock = clock();
    let store = store_at(&clock);
    let mut timer = PomodoroTimer::new(&store);
    timer.set_durations(1, 1).unwrap().into_value();

    timer.start();
    assert!(matches!(
        timer.run(&mut Ticks(60)),
        Some(TimerEvent::WorkComplete { .. })
    ));
    timer.start();
    assert_eq!(timer.run(&mut Ticks(60)), Some(TimerEvent::BreakComplete));

    assert_eq!(timer.mode(), TimerMode::Work);
    assert_eq!(timer.today_count(), 1);
}

#[test]
fn start_while_running_is_a_no_op() {
    let clock = clock();
    let store = store_at(&clock);
    let mut timer = PomodoroTimer::new(&store);

    assert!(timer.start());
    timer.tick();
    assert!(!timer.start());
    assert_eq!(timer.remaining_secs(), 1499);
}

#[test]
fn pause_keeps_remaining_time_and_resume_continues() {
    let clock = clock();
    let store = store_at(&clock);
    let mut timer = PomodoroTimer::new(&store);

    timer.start();
    timer.run(&mut Ticks(10));
    assert!(timer.pause());
    assert_eq!(timer.state(), TimerState::Paused);

    assert_eq!(timer.tick(), None);
    assert_eq!(timer.remaining_secs(), 1490);
    assert_eq!(timer.display(), "24:50");

    assert!(timer.start());
    timer.tick();
    assert_eq!(timer.remaining_secs(), 1489);
}

#[test]
fn duration_change_while_paused_keeps_countdown() {
    let clock = clock();
    let store = store_at(&clock);
    let mut timer = PomodoroTimer::new(&store);

    timer.start();
    timer.run(&mut Ticks(30));
    timer.pause();
    timer.set_work_minutes(50).unwrap().into_value();
    assert_eq!(timer.remaining_secs(), 1470);

    timer.reset();
    assert_eq!(timer.remaining_secs(), 50 * 60);
    assert_eq!(timer.state(), TimerState::Idle);
}

#[test]
fn duration_change_while_idle_resets_countdown() {
    let clock = clock();
    let store = store_at(&clock);
    let mut timer = PomodoroTimer::new(&store);

    timer.set_work_minutes(40).unwrap().into_value();
    assert_eq!(timer.display(), "40:00");
    assert!(timer.set_break_minutes(0).is_err());
    assert_eq!(store.load().unwrap().unwrap().pomodoro.break_time, 5);
}

#[test]
fn counter_rolls_over_on_new_day_when_read() {
    let clock = clock();
    let store = store_at(&clock);
    let repo = PomodoroRepository::new(&store);
    repo.increment_today_count().into_value();
    repo.increment_today_count().into_value();
    assert_eq!(repo.get().into_value().today_count, 2);

    clock.advance(Duration::days(1));
    let saved = repo.get();
    assert!(saved.is_persisted());
    let settings = saved.into_value();
    assert_eq!(settings.today_count, 0);
    assert_eq!(settings.last_date, NaiveDate::from_ymd_opt(2026, 10, 20).unwrap());
    assert_eq!(store.load().unwrap().unwrap().pomodoro, settings);
}

#[test]
fn increment_after_midnight_starts_from_one() {
    let clock = clock();
    let store = store_at(&clock);
    let mut doc = Document::new(NaiveDate::from_ymd_opt(2026, 10, 17).unwrap());
    doc.pomodoro.today_count = 7;
    store.save(&doc).unwrap();

    let repo = PomodoroRepository::new(&store);
    assert_eq!(repo.increment_today_count().into_value(), 1);
}

#[test]
fn imported_count_at_u32_max_saturates_on_completion() {
    let clock = clock();
    let store = store_at(&clock);
    let mut doc = Document::new(clock_today());
    doc.pomodoro.today_count = u32::MAX;
    doc.pomodoro.work_time = 1;
    store.save(&doc).unwrap();

    let mut timer = PomodoroTimer::new(&store);
    timer.start();
    assert_eq!(
        timer.run(&mut Ticks(60)),
        Some(TimerEvent::WorkComplete {
            today_count: u32::MAX,
            persisted: true
        })
    );
    assert_eq!(store.load().unwrap().unwrap().pomodoro.today_count, u32::MAX);
}

fn clock_today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
}
