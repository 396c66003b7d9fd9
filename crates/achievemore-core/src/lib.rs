//! # AchieveMore Core Library
//!
//! This library provides the core logic for AchieveMore, a personal task and
//! reminder planner with a focus timer, daily habits and progress stats.
//! Rendering is left to the host: every command returns plain data or an
//! [`Event`], and side effects go through injected collaborators.
//!
//! ## Architecture
//!
//! - **Engine**: One context owning tasks, reminders, habits, the focus timer
//!   and the profile. Mutations save a snapshot before returning
//! - **Timer**: A tick-driven countdown state machine
//! - **Reminders**: Lead-time reminders fired at most once by a periodic sweep
//! - **Storage**: JSON snapshot persistence and TOML-based configuration
//! - **Drivers**: Cancellable tokio tasks that run the reminder sweep and the
//!   timer tick against a shared engine
//!
//! ## Key Components
//!
//! - [`Engine`]: Command surface for the whole application
//! - [`FocusTimer`]: Countdown state machine
//! - [`ReminderScheduler`]: Reminder creation and sweep
//! - [`SnapshotStore`]: Persistence seam
//! - [`Config`]: Engine configuration management

pub mod clock;
pub mod display;
pub mod driver;
pub mod engine;
pub mod error;
pub mod events;
pub mod habit;
pub mod notify;
pub mod reminder;
pub mod stats;
pub mod storage;
pub mod task;
pub mod timer;

pub use clock::{Clock, ManualClock, SystemClock};
pub use driver::{shared, spawn_reminder_driver, spawn_timer_driver, DriverHandle, SharedEngine};
pub use engine::{Engine, Profile};
pub use error::{ConfigError, CoreError, PersistenceError, ValidationError};
pub use events::Event;
pub use habit::Habit;
pub use notify::{NotificationSink, NotifyKind, NullSink, RecordingSink, SoundCue};
pub use reminder::{Reminder, ReminderScheduler};
pub use stats::{Badge, StatsSnapshot};
pub use storage::{Config, JsonFileStore, MemoryStore, Snapshot, SnapshotStore};
pub use task::{Category, NewTask, Priority, SortCriterion, Task, TaskRegistry, UserType};
pub use timer::{FocusTimer, TimerState};
