//! Statistics and badges.
//!
//! Everything here is a pure function of the current task and habit state
//! and is recomputed on every call. Badges are not remembered: a badge earned
//! earlier disappears again if the state no longer qualifies.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::habit::Habit;
use crate::task::{Category, Task, TaskRegistry};

const PRODUCTIVE_THRESHOLD: u32 = 3;
const WEEK_STREAK_DAYS: u32 = 7;

/// Completion of the tasks due today.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyProgress {
    pub completed: u32,
    pub total: u32,
    /// Rounded to the nearest whole percent; 0 when there are no tasks.
    pub percentage: u8,
}

impl DailyProgress {
    pub fn from_tasks<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Self {
        let (completed, total) = tasks.into_iter().fold((0u32, 0u32), |(done, all), task| {
            (done + u32::from(task.completed), all + 1)
        });
        Self {
            completed,
            total,
            percentage: percent(completed, total),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Badge {
    FirstTask,
    Productive,
    PerfectDay,
    WeekStreak,
}

impl Badge {
    pub fn label(&self) -> &'static str {
        match self {
            Badge::FirstTask => "First Task",
            Badge::Productive => "Productive",
            Badge::PerfectDay => "Perfect Day",
            Badge::WeekStreak => "Week Streak",
        }
    }
}

/// Badges earned for `progress`, given the longest current streak.
pub fn badges(progress: &DailyProgress, streak: u32) -> Vec<Badge> {
    let mut earned = Vec::new();
    if progress.completed >= 1 {
        earned.push(Badge::FirstTask);
    }
    if progress.completed >= PRODUCTIVE_THRESHOLD {
        earned.push(Badge::Productive);
    }
    if progress.total > 0 && progress.percentage == 100 {
        earned.push(Badge::PerfectDay);
    }
    if streak >= WEEK_STREAK_DAYS {
        earned.push(Badge::WeekStreak);
    }
    earned
}

/// The larger of the global streak and every habit streak.
pub fn longest_streak(global: u32, habits: &[Habit]) -> u32 {
    habits.iter().map(|h| h.streak).fold(global, u32::max)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryShare {
    pub category: Category,
    pub count: u32,
    pub percentage: u8,
}

/// Task counts per category over the whole registry, in `Category::ALL` order.
pub fn category_breakdown(tasks: &[Task]) -> Vec<CategoryShare> {
    let total = tasks.len() as u32;
    Category::ALL
        .iter()
        .map(|&category| {
            let count = tasks.iter().filter(|t| t.category == category).count() as u32;
            CategoryShare {
                category,
                count,
                percentage: percent(count, total),
            }
        })
        .collect()
}

/// Everything the dashboard shows, computed in one pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub today: DailyProgress,
    pub total_tasks: u32,
    pub streak: u32,
    pub badges: Vec<Badge>,
    pub categories: Vec<CategoryShare>,
}

pub fn compute(
    tasks: &TaskRegistry,
    habits: &[Habit],
    global_streak: u32,
    today: NaiveDate,
) -> StatsSnapshot {
    let progress = DailyProgress::from_tasks(tasks.today(today));
    let streak = longest_streak(global_streak, habits);
    StatsSnapshot {
        today: progress,
        total_tasks: tasks.len() as u32,
        streak,
        badges: badges(&progress, streak),
        categories: category_breakdown(tasks.tasks()),
    }
}

fn percent(part: u32, whole: u32) -> u8 {
    if whole == 0 {
        return 0;
    }
    (f64::from(part) / f64::from(whole) * 100.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::NewTask;
    use chrono::{Duration, Local, TimeZone, Utc};

    fn progress(completed: u32, total: u32) -> DailyProgress {
        DailyProgress {
            completed,
            total,
            percentage: percent(completed, total),
        }
    }

    #[test]
    fn percentage_rounds_and_handles_empty() {
        assert_eq!(percent(0, 0), 0);
        assert_eq!(percent(1, 3), 33);
        assert_eq!(percent(2, 3), 67);
        assert_eq!(percent(1, 2), 50);
        assert_eq!(percent(3, 3), 100);
    }

    #[test]
    fn badge_thresholds() {
        assert!(badges(&progress(0, 0), 0).is_empty());
        assert_eq!(badges(&progress(1, 4), 0), vec![Badge::FirstTask]);
        assert_eq!(
            badges(&progress(3, 5), 0),
            vec![Badge::FirstTask, Badge::Productive]
        );
        assert_eq!(
            badges(&progress(2, 2), 0),
            vec![Badge::FirstTask, Badge::PerfectDay]
        );
        assert_eq!(badges(&progress(0, 1), 7), vec![Badge::WeekStreak]);
        assert!(badges(&progress(0, 1), 6).is_empty());
    }

    #[test]
    fn longest_streak_considers_habits() {
        let mut habit = Habit::new("Run").unwrap();
        habit.streak = 9;
        assert_eq!(longest_streak(2, &[habit]), 9);
        assert_eq!(longest_streak(4, &[]), 4);
    }

    #[test]
    fn breakdown_covers_all_categories() {
        let now = Utc::now();
        let mut reg = TaskRegistry::new();
        for category in [Category::Work, Category::Work, Category::Health] {
            reg.insert(NewTask::new("t").due(now).category(category)).unwrap();
        }
        let shares = category_breakdown(reg.tasks());
        assert_eq!(shares.len(), 4);
        assert_eq!(shares[0].count, 2);
        assert_eq!(shares[0].percentage, 67);
        assert_eq!(shares[1].count, 0);
        assert_eq!(shares[3].percentage, 33);
    }

    #[test]
    fn compute_uses_only_todays_tasks_for_progress() {
        let noon = Local
            .with_ymd_and_hms(2026, 6, 10, 12, 0, 0)
            .single()
            .unwrap()
            .with_timezone(&Utc);
        let mut reg = TaskRegistry::new();
        let id = reg.insert(NewTask::new("today").due(noon)).unwrap().id;
        reg.insert(NewTask::new("next week").due(noon + Duration::days(7)))
            .unwrap();
        reg.complete(id, noon);

        let snap = compute(&reg, &[], 0, crate::clock::calendar_day(noon));
        assert_eq!(snap.today, progress(1, 1));
        assert_eq!(snap.total_tasks, 2);
        assert_eq!(snap.badges, vec![Badge::FirstTask, Badge::PerfectDay]);
    }
}
