//! Reminder records and the polling scheduler that fires them.
//!
//! Reminders are swept by a single periodic `tick(now)` rather than one
//! timer per reminder. A sweep fires every active reminder that is due
//! against one fixed `now`, then drops fired reminders older than the
//! retention window.
//!
//! A reminder refers to its task only by id. The engine keeps the two in
//! step: deleting a task removes its reminders, completing it deactivates
//! them.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;
use crate::task::Task;

/// Fired reminders are kept this long before a sweep prunes them.
pub const DEFAULT_RETENTION_HOURS: i64 = 24;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    pub id: Uuid,
    pub task_id: Uuid,
    /// Title at creation time; later renames are not tracked.
    pub task_title: String,
    pub reminder_time: DateTime<Utc>,
    #[serde(alias = "minutesBefore")]
    pub lead_minutes: u32,
    pub active: bool,
}

impl Reminder {
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.active && self.reminder_time <= now
    }

    pub fn is_pending(&self, now: DateTime<Utc>) -> bool {
        self.active && self.reminder_time > now
    }
}

/// Result of one sweep.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SweepOutcome {
    /// Reminders that fired in this sweep, as they were when fired.
    pub fired: Vec<Reminder>,
    pub pruned: usize,
}

impl SweepOutcome {
    pub fn changed(&self) -> bool {
        !self.fired.is_empty() || self.pruned > 0
    }
}

/// Exclusive owner of all reminder records.
#[derive(Debug, Clone)]
pub struct ReminderScheduler {
    reminders: Vec<Reminder>,
    retention: Duration,
}

impl Default for ReminderScheduler {
    fn default() -> Self {
        Self::new(Duration::hours(DEFAULT_RETENTION_HOURS))
    }
}

impl ReminderScheduler {
    pub fn new(retention: Duration) -> Self {
        Self {
            reminders: Vec::new(),
            retention,
        }
    }

    pub fn from_reminders(reminders: Vec<Reminder>, retention: Duration) -> Self {
        Self {
            reminders,
            retention,
        }
    }

    pub fn reminders(&self) -> &[Reminder] {
        &self.reminders
    }

    pub fn len(&self) -> usize {
        self.reminders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reminders.is_empty()
    }

    pub fn for_task(&self, task_id: Uuid) -> impl Iterator<Item = &Reminder> + '_ {
        self.reminders.iter().filter(move |r| r.task_id == task_id)
    }

    /// Schedule a reminder `lead_minutes` before the task is due.
    ///
    /// Returns `Ok(None)` without storing anything when that moment is not
    /// strictly after `now`, or when the task is already completed.
    ///
    /// # Errors
    /// Returns a [`ValidationError`] when `lead_minutes` is zero.
    pub fn create(
        &mut self,
        task: &Task,
        lead_minutes: u32,
        now: DateTime<Utc>,
    ) -> Result<Option<&Reminder>, ValidationError> {
        if lead_minutes == 0 {
            return Err(ValidationError::InvalidValue {
                field: "lead_minutes",
                message: "must be at least one minute".into(),
            });
        }
        if task.completed {
            return Ok(None);
        }

        let reminder_time = task.due_date - Duration::minutes(i64::from(lead_minutes));
        if reminder_time <= now {
            return Ok(None);
        }

        self.reminders.push(Reminder {
            id: Uuid::new_v4(),
            task_id: task.id,
            task_title: task.title.clone(),
            reminder_time,
            lead_minutes,
            active: true,
        });
        Ok(self.reminders.last())
    }

    /// Fire everything due at `now`, then prune stale inactive reminders.
    pub fn tick(&mut self, now: DateTime<Utc>) -> SweepOutcome {
        let mut fired = Vec::new();
        for reminder in self.reminders.iter_mut().filter(|r| r.is_due(now)) {
            fired.push(reminder.clone());
            reminder.active = false;
        }

        let before = self.reminders.len();
        // A retention reaching past the earliest representable instant prunes nothing.
        if let Some(cutoff) = now.checked_sub_signed(self.retention) {
            self.reminders
                .retain(|r| r.active || r.reminder_time >= cutoff);
        }

        SweepOutcome {
            fired,
            pruned: before - self.reminders.len(),
        }
    }

    /// Pending reminders, soonest first.
    pub fn active_upcoming(&self, now: DateTime<Utc>, limit: usize) -> Vec<&Reminder> {
        let mut pending: Vec<&Reminder> =
            self.reminders.iter().filter(|r| r.is_pending(now)).collect();
        pending.sort_by_key(|r| r.reminder_time);
        pending.truncate(limit);
        pending
    }

    pub fn has_pending(&self, task_id: Uuid, now: DateTime<Utc>) -> bool {
        self.for_task(task_id).any(|r| r.is_pending(now))
    }

    /// Deactivate every reminder of a task. Returns how many were active.
    pub fn deactivate_for_task(&mut self, task_id: Uuid) -> usize {
        let mut count = 0;
        for reminder in self
            .reminders
            .iter_mut()
            .filter(|r| r.task_id == task_id && r.active)
        {
            reminder.active = false;
            count += 1;
        }
        count
    }

    /// Remove every reminder of a task. Returns how many were removed.
    pub fn remove_for_task(&mut self, task_id: Uuid) -> usize {
        let before = self.reminders.len();
        self.reminders.retain(|r| r.task_id != task_id);
        before - self.reminders.len()
    }
}
