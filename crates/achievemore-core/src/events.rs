use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::timer::TimerState;

/// Every state change worth surfacing produces an Event.
/// Commands return `None` when they were no-ops.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TaskCompleted {
        task_id: Uuid,
        title: String,
        at: DateTime<Utc>,
    },
    ReminderFired {
        reminder_id: Uuid,
        task_id: Uuid,
        task_title: String,
        reminder_time: DateTime<Utc>,
        at: DateTime<Utc>,
    },
    HabitToggled {
        habit_id: Uuid,
        done_today: bool,
        streak: u32,
        at: DateTime<Utc>,
    },
    TimerStarted {
        remaining_secs: u32,
        task_id: Option<Uuid>,
        at: DateTime<Utc>,
    },
    TimerPaused {
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    TimerReset {
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    /// Focus length changed while not running.
    TimerAdjusted {
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    TimerCompleted {
        task_id: Option<Uuid>,
        at: DateTime<Utc>,
    },
    TimerSnapshot {
        state: TimerState,
        remaining_secs: u32,
        default_secs: u32,
        task_id: Option<Uuid>,
        at: DateTime<Utc>,
    },
}
