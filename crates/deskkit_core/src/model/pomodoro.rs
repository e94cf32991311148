//! Persisted pomodoro settings and the daily completion counter.
//!
//! # Invariants
//! - `work_time` and `break_time` are minutes and always greater than zero.
//! - `today_count` only counts completions on `last_date`; a read on a later
//!   date must roll the counter over before reporting it.

use crate::model::validation::{require_positive, ValidationError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const DEFAULT_WORK_MINUTES: u32 = 25;
pub const DEFAULT_BREAK_MINUTES: u32 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PomodoroSettings {
    pub work_time: u32,
    pub break_time: u32,
    #[serde(default)]
    pub today_count: u32,
    pub last_date: NaiveDate,
}

impl PomodoroSettings {
    /// Default 25/5 settings with a zero counter keyed to `today`.
    pub fn new(today: NaiveDate) -> Self {
        Self {
            work_time: DEFAULT_WORK_MINUTES,
            break_time: DEFAULT_BREAK_MINUTES,
            today_count: 0,
            last_date: today,
        }
    }

    /// Resets the counter when `last_date` is not `today`.
    ///
    /// Returns `true` when the settings changed and need to be saved.
    pub fn roll_over(&mut self, today: NaiveDate) -> bool {
        if self.last_date == today {
            return false;
        }
        self.today_count = 0;
        self.last_date = today;
        true
    }

    pub fn work_seconds(&self) -> u64 {
        u64::from(self.work_time) * 60
    }

    pub fn break_seconds(&self) -> u64 {
        u64::from(self.break_time) * 60
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_positive("workTime", self.work_time)?;
        require_positive("breakTime", self.break_time)?;
        Ok(())
    }
}
