//! The engine context.
//!
//! [`Engine`] owns every collection (tasks, reminders, habits), the focus
//! timer, the profile fields and the three collaborators: clock, snapshot
//! store and notification sink. Each public command runs to completion,
//! keeps reminders consistent with their tasks, and saves a snapshot before
//! returning if it changed anything durable.
//!
//! ## Persistence failures
//!
//! A failed save never undoes the in-memory change. The engine drops into
//! non-durable mode, notifies the sink once, and keeps trying on later
//! mutations; the first successful save restores durable mode.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::clock::Clock;
use crate::error::{Result, ValidationError};
use crate::events::Event;
use crate::habit::Habit;
use crate::notify::{NotificationSink, NotifyKind, SoundCue};
use crate::reminder::{Reminder, ReminderScheduler};
use crate::stats::{self, StatsSnapshot};
use crate::storage::{Config, MemoryStore, Snapshot, SnapshotStore};
use crate::task::{self, NewTask, SortCriterion, Task, TaskRegistry, UserType};
use crate::timer::FocusTimer;

/// Hours from now a template task is due.
const TEMPLATE_DUE_HOURS: i64 = 2;

/// User-level fields persisted alongside the collections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Profile {
    pub user_type: Option<UserType>,
    pub user_name: String,
    /// Opaque image reference (URL or data URI); never inspected.
    pub profile_image: String,
    /// Global day streak carried in the snapshot.
    pub streak: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Export<'a> {
    tasks: &'a [Task],
    habits: &'a [Habit],
    user_type: Option<UserType>,
    user_name: &'a str,
    reminders: &'a [Reminder],
    export_date: DateTime<Utc>,
}

pub struct Engine {
    config: Config,
    clock: Box<dyn Clock>,
    store: Box<dyn SnapshotStore>,
    sink: Box<dyn NotificationSink>,
    tasks: TaskRegistry,
    reminders: ReminderScheduler,
    habits: Vec<Habit>,
    timer: FocusTimer,
    profile: Profile,
    durable: bool,
    /// Cancelled when the current timer run stops for any reason.
    timer_run: Option<CancellationToken>,
}

impl Engine {
    /// Build an engine and restore whatever `store` holds.
    ///
    /// A missing snapshot starts fresh. An unreadable or malformed one is
    /// reported through `sink` and also starts fresh.
    pub fn open(
        config: Config,
        clock: impl Clock + 'static,
        store: impl SnapshotStore + 'static,
        sink: impl NotificationSink + 'static,
    ) -> Self {
        let loaded = store.load();
        let mut engine = Self {
            timer: FocusTimer::new(config.focus_secs()),
            reminders: ReminderScheduler::new(config.reminder_retention()),
            config,
            clock: Box::new(clock),
            store: Box::new(store),
            sink: Box::new(sink),
            tasks: TaskRegistry::new(),
            habits: Vec::new(),
            profile: Profile::default(),
            durable: true,
            timer_run: None,
        };

        match loaded {
            Ok(Some(snapshot)) => {
                info!(
                    tasks = snapshot.tasks.len(),
                    reminders = snapshot.reminders.len(),
                    habits = snapshot.habits.len(),
                    "restored snapshot"
                );
                engine.restore(snapshot);
            }
            Ok(None) => info!("no saved snapshot, starting fresh"),
            Err(e) => {
                warn!(error = %e, "failed to load snapshot, starting fresh");
                engine.sink.notify(
                    &format!("Could not load saved data: {e}"),
                    NotifyKind::Error,
                    true,
                );
            }
        }
        engine
    }

    /// Engine with default config backed by a fresh [`MemoryStore`].
    pub fn in_memory(clock: impl Clock + 'static, sink: impl NotificationSink + 'static) -> Self {
        Self::open(Config::default(), clock, MemoryStore::new(), sink)
    }

    fn restore(&mut self, snapshot: Snapshot) {
        self.tasks = TaskRegistry::from_tasks(snapshot.tasks);
        let fallback = snapshot.last_saved.unwrap_or_else(|| self.clock.now());
        let repaired = self.tasks.repair_completion(fallback);
        if repaired > 0 {
            warn!(repaired, "loaded tasks with inconsistent completion state");
        }
        self.reminders =
            ReminderScheduler::from_reminders(snapshot.reminders, self.config.reminder_retention());
        self.habits = snapshot.habits;
        self.profile = Profile {
            user_type: snapshot.user_type,
            user_name: snapshot.user_name,
            profile_image: snapshot.user_profile_image,
            streak: snapshot.streak,
        };
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn tasks(&self) -> &[Task] {
        self.tasks.tasks()
    }

    pub fn task(&self, id: Uuid) -> Option<&Task> {
        self.tasks.get(id)
    }

    pub fn reminders(&self) -> &[Reminder] {
        self.reminders.reminders()
    }

    pub fn habits(&self) -> &[Habit] {
        &self.habits
    }

    pub fn timer(&self) -> &FocusTimer {
        &self.timer
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    /// False after a failed save, until a later save succeeds.
    pub fn is_durable(&self) -> bool {
        self.durable
    }

    /// Tasks due on the current calendar day, earliest first.
    pub fn today_tasks(&self) -> impl Iterator<Item = &Task> + '_ {
        self.tasks.today(self.clock.today())
    }

    /// Open tasks due after now, earliest first, capped at the upcoming limit.
    pub fn upcoming_tasks(&self) -> Vec<&Task> {
        self.tasks
            .upcoming(self.clock.now(), self.config.tasks.upcoming_limit)
    }

    /// Search every task by title or category. A blank query lists today's
    /// tasks instead.
    pub fn search(&self, query: &str) -> Vec<&Task> {
        if query.trim().is_empty() {
            return self.today_tasks().collect();
        }
        self.tasks.search(query, self.config.tasks.search_limit)
    }

    /// Pending reminders, soonest first, capped at the display limit.
    pub fn active_reminders(&self) -> Vec<&Reminder> {
        self.reminders
            .active_upcoming(self.clock.now(), self.config.reminders.display_limit)
    }

    pub fn has_active_reminder(&self, task_id: Uuid) -> bool {
        self.reminders.has_pending(task_id, self.clock.now())
    }

    pub fn stats(&self) -> StatsSnapshot {
        stats::compute(
            &self.tasks,
            &self.habits,
            self.profile.streak,
            self.clock.today(),
        )
    }

    /// The state that would be persisted right now.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            user_type: self.profile.user_type,
            tasks: self.tasks.tasks().to_vec(),
            habits: self.habits.clone(),
            user_name: self.profile.user_name.clone(),
            user_profile_image: self.profile.profile_image.clone(),
            streak: self.profile.streak,
            reminders: self.reminders.reminders().to_vec(),
            last_saved: Some(self.clock.now()),
        }
    }

    /// Pretty JSON export of the user's data.
    ///
    /// # Errors
    /// Returns an error if serialization fails.
    pub fn export_json(&self) -> Result<String> {
        let export = Export {
            tasks: self.tasks.tasks(),
            habits: &self.habits,
            user_type: self.profile.user_type,
            user_name: &self.profile.user_name,
            reminders: self.reminders.reminders(),
            export_date: self.clock.now(),
        };
        Ok(serde_json::to_string_pretty(&export)?)
    }

    /// Suggested file name for [`export_json`](Self::export_json).
    pub fn export_file_name(&self) -> String {
        format!("achievemore-data-{}.json", self.clock.today().format("%Y-%m-%d"))
    }

    // ── Tasks ────────────────────────────────────────────────────────

    /// Create a task, plus its reminder if `new` asks for one.
    ///
    /// # Errors
    /// Returns a [`ValidationError`] for a missing due date, blank title,
    /// zero duration or zero reminder lead. Nothing is stored in that case.
    pub fn add_task(&mut self, new: NewTask) -> Result<Task, ValidationError> {
        if new.reminder_lead_min == Some(0) {
            return Err(ValidationError::InvalidValue {
                field: "lead_minutes",
                message: "must be at least one minute".into(),
            });
        }
        let lead = new.reminder_lead_min;
        let task = self.tasks.insert(new)?.clone();

        if let Some(lead) = lead {
            let now = self.clock.now();
            if let Ok(None) = self.reminders.create(&task, lead, now) {
                debug!(task_id = %task.id, lead, "reminder time already passed, not scheduled");
            }
        }

        debug!(task_id = %task.id, title = %task.title, due = %task.due_date, "task added");
        self.persist();
        Ok(task)
    }

    /// Complete a task and deactivate its reminders.
    ///
    /// Missing or already-completed tasks are left alone and return `None`.
    pub fn complete_task(&mut self, id: Uuid) -> Option<Event> {
        let now = self.clock.now();
        let title = self.tasks.complete(id, now)?.title.clone();
        let silenced = self.reminders.deactivate_for_task(id);
        info!(task_id = %id, silenced, "task completed");

        self.persist();
        self.sink.notify(
            &format!("Task completed: \"{title}\". Great work!"),
            NotifyKind::Success,
            false,
        );
        self.sink.play_cue(SoundCue::Completion);
        Some(Event::TaskCompleted {
            task_id: id,
            title,
            at: now,
        })
    }

    /// Delete a task and every reminder that refers to it.
    ///
    /// Returns whether a task was removed.
    pub fn delete_task(&mut self, id: Uuid) -> bool {
        let Some(task) = self.tasks.remove(id) else {
            return false;
        };
        let dropped = self.reminders.remove_for_task(id);
        info!(task_id = %id, title = %task.title, reminders = dropped, "task deleted");
        self.persist();
        true
    }

    /// Reorder the stored task list. The order is persisted.
    pub fn sort_tasks(&mut self, criterion: SortCriterion) {
        self.tasks.sort(criterion);
        self.persist();
    }

    /// Add the `index`-th template of the current user type, due in two hours.
    ///
    /// Returns `None` without changes when no user type is set or the index
    /// is out of range.
    pub fn add_from_template(&mut self, index: usize) -> Option<Task> {
        let user_type = self.profile.user_type?;
        let template = task::templates(user_type).get(index)?;
        let due = self.clock.now() + Duration::hours(TEMPLATE_DUE_HOURS);
        let task = self.tasks.insert(template.to_new_task(due)).ok()?.clone();
        self.persist();
        Some(task)
    }

    /// Record the user type and seed sample tasks into an empty registry.
    pub fn select_user_type(&mut self, user_type: UserType) {
        self.profile.user_type = Some(user_type);
        if self.tasks.is_empty() {
            let now = self.clock.now();
            for sample in task::sample_tasks(user_type, now) {
                if let Err(e) = self.tasks.insert(sample) {
                    warn!(error = %e, "sample task rejected");
                }
            }
            info!(?user_type, seeded = self.tasks.len(), "seeded sample tasks");
        }
        self.persist();
    }

    /// # Errors
    /// Returns a [`ValidationError`] when `name` is blank.
    pub fn set_user_name(&mut self, name: &str) -> Result<(), ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::Empty { field: "Name" });
        }
        self.profile.user_name = name.to_string();
        self.persist();
        Ok(())
    }

    pub fn set_profile_image(&mut self, image: impl Into<String>) {
        self.profile.profile_image = image.into();
        self.persist();
    }

    // ── Reminders ────────────────────────────────────────────────────

    /// Schedule a reminder `lead_minutes` before a task is due.
    ///
    /// Returns `Ok(None)` when the task does not exist, is completed, or the
    /// reminder time is not in the future; nothing is stored then.
    ///
    /// # Errors
    /// Returns a [`ValidationError`] when `lead_minutes` is zero.
    pub fn create_reminder(
        &mut self,
        task_id: Uuid,
        lead_minutes: u32,
    ) -> Result<Option<Reminder>, ValidationError> {
        let Some(task) = self.tasks.get(task_id) else {
            return Ok(None);
        };
        let now = self.clock.now();
        let Some(reminder) = self.reminders.create(task, lead_minutes, now)?.cloned() else {
            debug!(%task_id, lead_minutes, "reminder not scheduled");
            return Ok(None);
        };
        debug!(reminder_id = %reminder.id, at = %reminder.reminder_time, "reminder scheduled");
        self.persist();
        Ok(Some(reminder))
    }

    /// Reminder sweep against the clock's current instant.
    pub fn tick_reminders(&mut self) -> Vec<Event> {
        let now = self.clock.now();
        self.tick_reminders_at(now)
    }

    /// Reminder sweep against an explicit `now`.
    ///
    /// Fires every due reminder once, prunes stale ones, and saves if
    /// anything changed.
    pub fn tick_reminders_at(&mut self, now: DateTime<Utc>) -> Vec<Event> {
        let outcome = self.reminders.tick(now);

        let events: Vec<Event> = outcome
            .fired
            .iter()
            .map(|reminder| {
                info!(reminder_id = %reminder.id, task_id = %reminder.task_id, "reminder fired");
                self.sink.notify(
                    &format!("Reminder: \"{}\" is due soon!", reminder.task_title),
                    NotifyKind::Warning,
                    true,
                );
                self.sink.play_cue(SoundCue::Reminder);
                Event::ReminderFired {
                    reminder_id: reminder.id,
                    task_id: reminder.task_id,
                    task_title: reminder.task_title.clone(),
                    reminder_time: reminder.reminder_time,
                    at: now,
                }
            })
            .collect();

        if outcome.pruned > 0 {
            debug!(pruned = outcome.pruned, "pruned stale reminders");
        }
        if outcome.changed() {
            self.persist();
        }
        events
    }

    // ── Habits ───────────────────────────────────────────────────────

    /// # Errors
    /// Returns a [`ValidationError`] when `name` is blank.
    pub fn add_habit(&mut self, name: &str) -> Result<Habit, ValidationError> {
        let habit = Habit::new(name)?;
        self.habits.push(habit.clone());
        self.persist();
        Ok(habit)
    }

    /// Flip today's completion for a habit. Unknown ids return `None`.
    pub fn toggle_habit(&mut self, id: Uuid) -> Option<Event> {
        let today = self.clock.today();
        let habit = self.habits.iter_mut().find(|h| h.id == id)?;
        let done_today = habit.toggle(today);
        let event = Event::HabitToggled {
            habit_id: id,
            done_today,
            streak: habit.streak,
            at: self.clock.now(),
        };
        self.persist();
        Some(event)
    }

    /// Last seven days of a habit, oldest first, ending today.
    pub fn habit_week(&self, id: Uuid) -> Option<[bool; 7]> {
        let today = self.clock.today();
        self.habits
            .iter()
            .find(|h| h.id == id)
            .map(|h| h.week_history(today))
    }

    // ── Focus timer ──────────────────────────────────────────────────

    /// Current timer state as a [`Event::TimerSnapshot`].
    pub fn timer_snapshot(&self) -> Event {
        self.timer.snapshot(self.clock.now())
    }

    /// Token for the current timer run, or `None` when the timer is not
    /// running. It is cancelled as soon as that run pauses, resets or
    /// completes, so a driver holding it never outlives its run.
    pub fn timer_run(&self) -> Option<CancellationToken> {
        self.timer_run.clone()
    }

    pub fn start_timer(&mut self) -> Option<Event> {
        let event = self.timer.start(self.clock.now())?;
        self.begin_timer_run();
        Some(event)
    }

    pub fn pause_timer(&mut self) -> Option<Event> {
        let event = self.timer.pause(self.clock.now())?;
        self.end_timer_run();
        Some(event)
    }

    pub fn reset_timer(&mut self) -> Option<Event> {
        self.end_timer_run();
        self.timer.reset(self.clock.now())
    }

    /// Set the focus length. Ignored (returns `Ok(None)`) while running.
    ///
    /// # Errors
    /// Returns a [`ValidationError`] when `minutes` is zero.
    pub fn set_focus_time(&mut self, minutes: u32) -> Result<Option<Event>, ValidationError> {
        if minutes == 0 {
            return Err(ValidationError::InvalidValue {
                field: "focus_minutes",
                message: "must be at least one minute".into(),
            });
        }
        Ok(self.timer.set_focus_time(minutes, self.clock.now()))
    }

    /// Start a countdown seeded from the task's duration.
    pub fn start_task_timer(&mut self, task_id: Uuid) -> Option<Event> {
        let duration = self.tasks.get(task_id)?.duration;
        let event = self
            .timer
            .start_for_task(task_id, duration, self.clock.now())?;
        self.begin_timer_run();
        Some(event)
    }

    /// One-second timer step. Notifies the sink when the session completes.
    pub fn tick_timer(&mut self) -> Option<Event> {
        let event = self.timer.tick(self.clock.now())?;
        self.end_timer_run();
        info!("focus session completed");
        self.sink.notify(
            "Focus session completed! Great job!",
            NotifyKind::Success,
            false,
        );
        self.sink.play_cue(SoundCue::Completion);
        Some(event)
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn begin_timer_run(&mut self) {
        self.end_timer_run();
        self.timer_run = Some(CancellationToken::new());
    }

    fn end_timer_run(&mut self) {
        if let Some(run) = self.timer_run.take() {
            run.cancel();
        }
    }

    fn persist(&mut self) {
        let snapshot = self.snapshot();
        match self.store.save(&snapshot) {
            Ok(()) => {
                if !self.durable {
                    info!("snapshot saved, persistence restored");
                    self.durable = true;
                }
            }
            Err(e) => {
                error!(error = %e, "failed to save snapshot");
                if self.durable {
                    self.durable = false;
                    self.sink.notify(
                        &format!("Changes could not be saved: {e}"),
                        NotifyKind::Error,
                        true,
                    );
                }
            }
        }
    }
}
