//! Task records and the registry that owns them.
//!
//! The registry keeps tasks in a plain `Vec` whose order is user-visible:
//! [`TaskRegistry::sort`] reorders it in place and the new order is what gets
//! persisted. Due-relative views (`today`, `upcoming`, `search`) are computed
//! on every call.

pub mod templates;

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::clock::calendar_day;
use crate::error::ValidationError;

pub use templates::{sample_tasks, templates, TaskTemplate, UserType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Work,
    Study,
    Personal,
    Health,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Work,
        Category::Study,
        Category::Personal,
        Category::Health,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Work => "work",
            Category::Study => "study",
            Category::Personal => "personal",
            Category::Health => "health",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Task priority. Variant order is the sort order: `Low < Medium < High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

/// Where a task came from. Informational only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskSource {
    Manual,
    Template,
    Sample,
    Derived,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub category: Category,
    pub priority: Priority,
    /// Estimated duration in minutes.
    pub duration: u32,
    pub due_date: DateTime<Utc>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<TaskSource>,
}

impl Task {
    pub fn is_due_on(&self, day: NaiveDate) -> bool {
        calendar_day(self.due_date) == day
    }

    fn matches(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle) || self.category.as_str().contains(needle)
    }
}

/// Input for creating a task.
///
/// `due_date` is optional here so a form with an empty date field can be
/// passed straight through; the registry rejects it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTask {
    pub title: String,
    pub category: Category,
    pub priority: Priority,
    pub duration_min: u32,
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub source: Option<TaskSource>,
    /// Create a reminder this many minutes before the due date.
    #[serde(default)]
    pub reminder_lead_min: Option<u32>,
}

impl NewTask {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            category: Category::Personal,
            priority: Priority::Medium,
            duration_min: 30,
            due_date: None,
            source: None,
            reminder_lead_min: None,
        }
    }

    pub fn due(mut self, at: DateTime<Utc>) -> Self {
        self.due_date = Some(at);
        self
    }

    pub fn category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn duration(mut self, minutes: u32) -> Self {
        self.duration_min = minutes;
        self
    }

    pub fn source(mut self, source: TaskSource) -> Self {
        self.source = Some(source);
        self
    }

    pub fn remind_before(mut self, minutes: u32) -> Self {
        self.reminder_lead_min = Some(minutes);
        self
    }

    fn validate(&self) -> Result<DateTime<Utc>, ValidationError> {
        let due = self.due_date.ok_or(ValidationError::MissingDueDate)?;
        if self.title.trim().is_empty() {
            return Err(ValidationError::Empty { field: "Title" });
        }
        if self.duration_min == 0 {
            return Err(ValidationError::InvalidValue {
                field: "duration",
                message: "must be at least one minute".into(),
            });
        }
        Ok(due)
    }
}

/// Order applied by [`TaskRegistry::sort`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortCriterion {
    /// High priority first.
    Priority,
    /// Earliest due date first.
    DueDate,
}

/// Exclusive owner of all task records.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskRegistry {
    tasks: Vec<Task>,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: Uuid) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Validate `new` and append it.
    ///
    /// # Errors
    /// Returns a [`ValidationError`] when the due date is missing, the title
    /// is blank or the duration is zero.
    pub fn insert(&mut self, new: NewTask) -> Result<&Task, ValidationError> {
        let due_date = new.validate()?;
        self.tasks.push(Task {
            id: Uuid::new_v4(),
            title: new.title.trim().to_string(),
            category: new.category,
            priority: new.priority,
            duration: new.duration_min,
            due_date,
            completed: false,
            completed_at: None,
            source: new.source,
        });
        let last = self.tasks.len() - 1;
        Ok(&self.tasks[last])
    }

    /// Mark a task completed at `now`.
    ///
    /// Returns `None` when the task is missing or already completed, in which
    /// case nothing changes.
    pub fn complete(&mut self, id: Uuid, now: DateTime<Utc>) -> Option<&Task> {
        let task = self.tasks.iter_mut().find(|t| t.id == id)?;
        if task.completed {
            return None;
        }
        task.completed = true;
        task.completed_at = Some(now);
        Some(&*task)
    }

    pub fn remove(&mut self, id: Uuid) -> Option<Task> {
        let idx = self.tasks.iter().position(|t| t.id == id)?;
        Some(self.tasks.remove(idx))
    }

    /// Tasks due on `day`, earliest first.
    pub fn today(&self, day: NaiveDate) -> impl Iterator<Item = &Task> + '_ {
        let mut due: Vec<&Task> = self.tasks.iter().filter(|t| t.is_due_on(day)).collect();
        due.sort_by_key(|t| t.due_date);
        due.into_iter()
    }

    /// Open tasks due after `now`, earliest first.
    pub fn upcoming(&self, now: DateTime<Utc>, limit: usize) -> Vec<&Task> {
        let mut open: Vec<&Task> = self
            .tasks
            .iter()
            .filter(|t| !t.completed && t.due_date > now)
            .collect();
        open.sort_by_key(|t| t.due_date);
        open.truncate(limit);
        open
    }

    /// Case-insensitive match on title or category across every task,
    /// earliest due first.
    pub fn search(&self, query: &str, limit: usize) -> Vec<&Task> {
        let needle = query.trim().to_lowercase();
        let mut hits: Vec<&Task> = self.tasks.iter().filter(|t| t.matches(&needle)).collect();
        hits.sort_by_key(|t| t.due_date);
        hits.truncate(limit);
        hits
    }

    /// Reorder the stored tasks. The sort is stable.
    pub fn sort(&mut self, criterion: SortCriterion) {
        match criterion {
            SortCriterion::Priority => self.tasks.sort_by(|a, b| b.priority.cmp(&a.priority)),
            SortCriterion::DueDate => self.tasks.sort_by_key(|t| t.due_date),
        }
    }

    /// Make `completed` and `completed_at` agree on loaded tasks.
    ///
    /// A completed task without a completion time gets `fallback`; an open
    /// task loses a stray one. Returns how many tasks changed.
    pub fn repair_completion(&mut self, fallback: DateTime<Utc>) -> usize {
        let mut repaired = 0;
        for task in &mut self.tasks {
            match (task.completed, task.completed_at) {
                (true, None) => task.completed_at = Some(fallback),
                (false, Some(_)) => task.completed_at = None,
                _ => continue,
            }
            repaired += 1;
        }
        repaired
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Local, TimeZone};

    fn local_noon() -> DateTime<Utc> {
        Local
            .with_ymd_and_hms(2026, 6, 10, 12, 0, 0)
            .single()
            .unwrap()
            .with_timezone(&Utc)
    }

    fn registry_with(items: Vec<NewTask>) -> TaskRegistry {
        let mut reg = TaskRegistry::new();
        for new in items {
            reg.insert(new).unwrap();
        }
        reg
    }

    #[test]
    fn insert_requires_due_date() {
        let mut reg = TaskRegistry::new();
        let err = reg.insert(NewTask::new("No date")).unwrap_err();
        assert_eq!(err, ValidationError::MissingDueDate);
        assert!(reg.is_empty());
    }

    #[test]
    fn insert_rejects_blank_title_and_zero_duration() {
        let mut reg = TaskRegistry::new();
        let due = local_noon();
        assert!(matches!(
            reg.insert(NewTask::new("   ").due(due)),
            Err(ValidationError::Empty { .. })
        ));
        assert!(matches!(
            reg.insert(NewTask::new("Zero").due(due).duration(0)),
            Err(ValidationError::InvalidValue { field: "duration", .. })
        ));
    }

    #[test]
    fn complete_is_idempotent() {
        let now = local_noon();
        let mut reg = registry_with(vec![NewTask::new("Write").due(now)]);
        let id = reg.tasks()[0].id;

        assert!(reg.complete(id, now).is_some());
        assert!(reg.complete(id, now + Duration::hours(1)).is_none());
        assert_eq!(reg.get(id).unwrap().completed_at, Some(now));
        assert!(reg.complete(Uuid::new_v4(), now).is_none());
    }

    #[test]
    fn today_is_sorted_and_excludes_other_days() {
        let now = local_noon();
        let reg = registry_with(vec![
            NewTask::new("Late").due(now + Duration::hours(3)),
            NewTask::new("Tomorrow").due(now + Duration::days(1)),
            NewTask::new("Early").due(now - Duration::hours(2)),
        ]);
        let titles: Vec<&str> = reg
            .today(calendar_day(now))
            .map(|t| t.title.as_str())
            .collect();
        assert_eq!(titles, vec!["Early", "Late"]);
    }

    #[test]
    fn upcoming_skips_completed_and_past() {
        let now = local_noon();
        let mut reg = registry_with(vec![
            NewTask::new("Past").due(now - Duration::hours(1)),
            NewTask::new("Soon").due(now + Duration::hours(1)),
            NewTask::new("Done").due(now + Duration::hours(2)),
            NewTask::new("Later").due(now + Duration::days(3)),
        ]);
        let done = reg.tasks()[2].id;
        reg.complete(done, now);

        let titles: Vec<&str> = reg.upcoming(now, 5).iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["Soon", "Later"]);
        assert_eq!(reg.upcoming(now, 1).len(), 1);
    }

    #[test]
    fn search_matches_title_or_category_case_insensitively() {
        let now = local_noon();
        let reg = registry_with(vec![
            NewTask::new("Gym session")
                .due(now + Duration::days(2))
                .category(Category::Health),
            NewTask::new("Quarterly REPORT")
                .due(now + Duration::days(1))
                .category(Category::Work),
            NewTask::new("Run").due(now).category(Category::Health),
        ]);

        let by_title: Vec<&str> = reg.search("report", 10).iter().map(|t| t.title.as_str()).collect();
        assert_eq!(by_title, vec!["Quarterly REPORT"]);

        let by_category: Vec<&str> = reg.search("HEALTH", 10).iter().map(|t| t.title.as_str()).collect();
        assert_eq!(by_category, vec!["Run", "Gym session"]);
    }

    #[test]
    fn search_truncates_to_limit() {
        let now = local_noon();
        let items = (0..15)
            .map(|i| NewTask::new(format!("Read chapter {i}")).due(now + Duration::hours(i)))
            .collect();
        let reg = registry_with(items);
        assert_eq!(reg.search("chapter", 10).len(), 10);
    }

    #[test]
    fn sort_by_priority_is_stable_and_descending() {
        let now = local_noon();
        let mut reg = registry_with(vec![
            NewTask::new("a").due(now).priority(Priority::Low),
            NewTask::new("b").due(now).priority(Priority::High),
            NewTask::new("c").due(now).priority(Priority::Medium),
            NewTask::new("d").due(now).priority(Priority::High),
        ]);
        reg.sort(SortCriterion::Priority);
        let titles: Vec<&str> = reg.tasks().iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["b", "d", "c", "a"]);

        reg.sort(SortCriterion::DueDate);
        assert_eq!(reg.tasks()[0].title, "b");
    }

    #[test]
    fn task_json_uses_camel_case_and_rfc3339() {
        let now = local_noon();
        let reg = registry_with(vec![NewTask::new("Json").due(now)]);
        let json = serde_json::to_value(&reg.tasks()[0]).unwrap();

        assert!(json.get("dueDate").unwrap().is_string());
        assert!(json.get("completedAt").is_none());
        let back: Task = serde_json::from_value(json).unwrap();
        assert_eq!(back.due_date, now);
    }

    #[test]
    fn repair_completion_aligns_flag_and_time() {
        let now = local_noon();
        let mut reg = registry_with(vec![
            NewTask::new("done, no time").due(now),
            NewTask::new("open, stray time").due(now),
            NewTask::new("fine").due(now),
        ]);
        reg.tasks[0].completed = true;
        reg.tasks[1].completed_at = Some(now);

        assert_eq!(reg.repair_completion(now + Duration::hours(1)), 2);
        assert_eq!(reg.tasks[0].completed_at, Some(now + Duration::hours(1)));
        assert_eq!(reg.tasks[1].completed_at, None);
        assert_eq!(reg.repair_completion(now), 0);
    }
}
