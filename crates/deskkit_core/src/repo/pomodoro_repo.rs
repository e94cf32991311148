//! Pomodoro settings repository.
//!
//! # Invariants
//! - Every read rolls the daily counter over before returning it; a rollover
//!   is persisted immediately.
//! - Durations are validated before they are stored.

use crate::model::pomodoro::PomodoroSettings;
use crate::model::validation::require_positive;
use crate::repo::MutationResult;
use crate::store::{DocumentStore, Saved};
use log::info;

pub struct PomodoroRepository<'s> {
    store: &'s DocumentStore,
}

impl<'s> PomodoroRepository<'s> {
    pub fn new(store: &'s DocumentStore) -> Self {
        Self { store }
    }

    /// Returns settings with the daily counter current for today.
    pub fn get(&self) -> Saved<PomodoroSettings> {
        let today = self.store.today();
        let settings = self.store.read(|doc| doc.pomodoro.clone());
        if settings.last_date == today {
            return Saved::persisted(settings);
        }
        self.store.mutate(|doc| {
            if doc.pomodoro.roll_over(today) {
                info!("event=pomodoro_rollover module=pomodoro status=ok date={today}");
            }
            doc.pomodoro.clone()
        })
    }

    /// Stores new work/break durations in minutes.
    pub fn update_durations(
        &self,
        work_minutes: u32,
        break_minutes: u32,
    ) -> MutationResult<PomodoroSettings> {
        require_positive("workTime", work_minutes)?;
        require_positive("breakTime", break_minutes)?;
        let today = self.store.today();
        Ok(self.store.mutate(|doc| {
            doc.pomodoro.roll_over(today);
            doc.pomodoro.work_time = work_minutes;
            doc.pomodoro.break_time = break_minutes;
            doc.pomodoro.clone()
        }))
    }

    /// Records one completed work segment and returns today's new total.
    pub fn increment_today_count(&self) -> Saved<u32> {
        let today = self.store.today();
        let saved = self.store.mutate(|doc| {
            doc.pomodoro.roll_over(today);
            doc.pomodoro.today_count = doc.pomodoro.today_count.saturating_add(1);
            doc.pomodoro.today_count
        });
        info!(
            "event=pomodoro_count module=pomodoro status=ok today_count={} persisted={}",
            saved.value,
            saved.is_persisted()
        );
        saved
    }
}
