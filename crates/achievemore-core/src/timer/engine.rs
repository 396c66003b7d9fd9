//! Focus timer state machine.
//!
//! The timer counts whole seconds and has no internal thread; a driver calls
//! `tick()` once per second while it is running.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running -> Paused -> Running -> (Completed) -> Idle
//! ```
//!
//! `Completed` only exists inside `tick()`: the same call that reaches zero
//! resets the timer to `Idle` with the default length.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::events::Event;

/// Default focus length: 25 minutes.
pub const DEFAULT_FOCUS_SECS: u32 = 25 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Idle,
    Running,
    Paused,
    Completed,
}

/// Countdown timer for focus sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FocusTimer {
    default_secs: u32,
    remaining_secs: u32,
    state: TimerState,
    /// Task whose duration seeded the current countdown.
    #[serde(default)]
    task_id: Option<Uuid>,
}

impl Default for FocusTimer {
    fn default() -> Self {
        Self::new(DEFAULT_FOCUS_SECS)
    }
}

impl FocusTimer {
    /// Create an idle timer whose reset length is `default_secs`.
    pub fn new(default_secs: u32) -> Self {
        Self {
            default_secs,
            remaining_secs: default_secs,
            state: TimerState::Idle,
            task_id: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == TimerState::Running
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn default_secs(&self) -> u32 {
        self.default_secs
    }

    pub fn task_id(&self) -> Option<Uuid> {
        self.task_id
    }

    /// Full state as an event, for a renderer that joins mid-session.
    pub fn snapshot(&self, at: DateTime<Utc>) -> Event {
        Event::TimerSnapshot {
            state: self.state,
            remaining_secs: self.remaining_secs,
            default_secs: self.default_secs,
            task_id: self.task_id,
            at,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self, at: DateTime<Utc>) -> Option<Event> {
        match self.state {
            TimerState::Idle | TimerState::Paused => {
                if self.remaining_secs == 0 {
                    return None;
                }
                self.state = TimerState::Running;
                Some(Event::TimerStarted {
                    remaining_secs: self.remaining_secs,
                    task_id: self.task_id,
                    at,
                })
            }
            TimerState::Completed => {
                self.reset(at);
                self.start(at)
            }
            TimerState::Running => None, // Already running.
        }
    }

    pub fn pause(&mut self, at: DateTime<Utc>) -> Option<Event> {
        if self.state != TimerState::Running {
            return None;
        }
        self.state = TimerState::Paused;
        Some(Event::TimerPaused {
            remaining_secs: self.remaining_secs,
            at,
        })
    }

    pub fn reset(&mut self, at: DateTime<Utc>) -> Option<Event> {
        self.state = TimerState::Idle;
        self.remaining_secs = self.default_secs;
        self.task_id = None;
        Some(Event::TimerReset {
            remaining_secs: self.remaining_secs,
            at,
        })
    }

    /// Set the countdown to `minutes`. Ignored while running.
    pub fn set_focus_time(&mut self, minutes: u32, at: DateTime<Utc>) -> Option<Event> {
        if self.is_running() {
            return None;
        }
        self.remaining_secs = minutes.saturating_mul(60);
        self.task_id = None;
        Some(Event::TimerAdjusted {
            remaining_secs: self.remaining_secs,
            at,
        })
    }

    /// Seed the countdown from a task's duration and start it.
    ///
    /// While running this is a no-op, like `set_focus_time` followed by `start`.
    pub fn start_for_task(
        &mut self,
        task_id: Uuid,
        duration_min: u32,
        at: DateTime<Utc>,
    ) -> Option<Event> {
        if self.is_running() {
            return None;
        }
        self.set_focus_time(duration_min, at);
        self.task_id = Some(task_id);
        self.start(at)
    }

    /// Advance one second. Returns `Some(Event::TimerCompleted)` when the
    /// countdown reaches zero.
    pub fn tick(&mut self, at: DateTime<Utc>) -> Option<Event> {
        if self.state != TimerState::Running {
            return None;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs > 0 {
            return None;
        }

        self.state = TimerState::Completed;
        let event = Event::TimerCompleted {
            task_id: self.task_id,
            at,
        };
        self.reset(at);
        Some(event)
    }
}
