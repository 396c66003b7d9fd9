//! Daily habits with a toggle-maintained streak.
//!
//! The streak is adjusted by the toggle itself (+1 on completing today, -1
//! floored at zero on undoing today). It is never recomputed from
//! `completed_dates`, so it can disagree with the actual run of consecutive
//! days if history is edited out of order.

use std::collections::BTreeSet;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub streak: u32,
    /// Calendar days the habit was done on, serialized as `YYYY-MM-DD`.
    #[serde(default)]
    pub completed_dates: BTreeSet<NaiveDate>,
}

impl Habit {
    /// # Errors
    /// Returns a [`ValidationError`] when `name` is blank.
    pub fn new(name: &str) -> Result<Self, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::Empty { field: "Habit name" });
        }
        Ok(Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            streak: 0,
            completed_dates: BTreeSet::new(),
        })
    }

    pub fn is_done_on(&self, day: NaiveDate) -> bool {
        self.completed_dates.contains(&day)
    }

    /// Flip `today` between done and not done. Returns whether it is done
    /// after the call.
    pub fn toggle(&mut self, today: NaiveDate) -> bool {
        if self.completed_dates.remove(&today) {
            self.streak = self.streak.saturating_sub(1);
            false
        } else {
            self.completed_dates.insert(today);
            self.streak += 1;
            true
        }
    }

    /// Done flags for the seven days ending at `today`, oldest first.
    pub fn week_history(&self, today: NaiveDate) -> [bool; 7] {
        let mut week = [false; 7];
        for (slot, back) in week.iter_mut().zip((0..7u64).rev()) {
            *slot = today
                .checked_sub_days(Days::new(back))
                .is_some_and(|day| self.is_done_on(day));
        }
        week
    }
}
