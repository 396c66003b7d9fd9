//! Built-in task templates and first-run sample tasks, keyed by user type.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::{Category, NewTask, Priority, TaskSource};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    Student,
    Professional,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskTemplate {
    pub title: &'static str,
    pub category: Category,
    pub priority: Priority,
    pub duration_min: u32,
}

impl TaskTemplate {
    const fn new(
        title: &'static str,
        category: Category,
        priority: Priority,
        duration_min: u32,
    ) -> Self {
        Self {
            title,
            category,
            priority,
            duration_min,
        }
    }

    pub fn to_new_task(&self, due: DateTime<Utc>) -> NewTask {
        NewTask::new(self.title)
            .category(self.category)
            .priority(self.priority)
            .duration(self.duration_min)
            .due(due)
            .source(TaskSource::Template)
    }
}

const STUDENT_TEMPLATES: [TaskTemplate; 6] = [
    TaskTemplate::new("Study for Math Exam", Category::Study, Priority::High, 120),
    TaskTemplate::new("Complete Assignment", Category::Study, Priority::Medium, 90),
    TaskTemplate::new("Read Chapter", Category::Study, Priority::Low, 45),
    TaskTemplate::new("Group Project Meeting", Category::Study, Priority::Medium, 60),
    TaskTemplate::new("Lab Report", Category::Study, Priority::High, 75),
    TaskTemplate::new("Research Paper", Category::Study, Priority::Medium, 150),
];

const PROFESSIONAL_TEMPLATES: [TaskTemplate; 6] = [
    TaskTemplate::new("Client Meeting", Category::Work, Priority::High, 60),
    TaskTemplate::new("Project Review", Category::Work, Priority::Medium, 90),
    TaskTemplate::new("Email Responses", Category::Work, Priority::Low, 30),
    TaskTemplate::new("Team Standup", Category::Work, Priority::Medium, 30),
    TaskTemplate::new("Quarterly Planning", Category::Work, Priority::High, 120),
    TaskTemplate::new("Code Review", Category::Work, Priority::Medium, 45),
];

pub fn templates(user_type: UserType) -> &'static [TaskTemplate] {
    match user_type {
        UserType::Student => &STUDENT_TEMPLATES,
        UserType::Professional => &PROFESSIONAL_TEMPLATES,
    }
}

/// Tasks seeded the first time a user type is chosen on an empty registry.
pub fn sample_tasks(user_type: UserType, now: DateTime<Utc>) -> Vec<NewTask> {
    // (title, hours from now, priority, minutes)
    let rows: [(&str, i64, Priority, u32); 2] = match user_type {
        UserType::Student => [
            ("Complete Math Assignment", 2, Priority::High, 90),
            ("Review Biology Chapter 5", 4, Priority::Medium, 60),
        ],
        UserType::Professional => [
            ("Team Meeting Preparation", 1, Priority::High, 45),
            ("Client Proposal Review", 3, Priority::High, 120),
        ],
    };
    let category = match user_type {
        UserType::Student => Category::Study,
        UserType::Professional => Category::Work,
    };

    rows.into_iter()
        .map(|(title, hours, priority, minutes)| {
            NewTask::new(title)
                .category(category)
                .priority(priority)
                .duration(minutes)
                .due(now + Duration::hours(hours))
                .source(TaskSource::Sample)
        })
        .collect()
}
