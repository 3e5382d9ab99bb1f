//! Due-date index across every project.
//!
//! The index is rebuilt from a snapshot whenever the calendar is drawn.
//! Buckets are keyed by calendar date only; tasks without a due date are
//! left out.

use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate};

use crate::project::Project;
use crate::task::Task;

/// A task in a calendar bucket, with the project it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarEntry<'a> {
    pub project_id: &'a str,
    pub project_name: &'a str,
    pub task: &'a Task,
}

/// Map from due date to the tasks due that day.
#[derive(Debug, Clone, Default)]
pub struct CalendarIndex<'a> {
    by_date: BTreeMap<NaiveDate, Vec<CalendarEntry<'a>>>,
}

impl<'a> CalendarIndex<'a> {
    /// Index every dated task, in project order then creation order.
    pub fn build(projects: &'a [Project]) -> Self {
        let mut by_date: BTreeMap<NaiveDate, Vec<CalendarEntry<'a>>> = BTreeMap::new();
        for project in projects {
            for task in &project.tasks {
                let Some(due) = task.due_date else { continue };
                by_date.entry(due).or_default().push(CalendarEntry {
                    project_id: &project.id,
                    project_name: &project.name,
                    task,
                });
            }
        }
        CalendarIndex { by_date }
    }

    /// Tasks due on `date`, in stable order. Empty when nothing is due.
    pub fn tasks_on(&self, date: NaiveDate) -> &[CalendarEntry<'a>] {
        self.by_date.get(&date).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has_tasks(&self, date: NaiveDate) -> bool {
        self.by_date.contains_key(&date)
    }

    /// Every date with at least one task, ascending.
    pub fn dates_with_tasks(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.by_date.keys().copied()
    }

    /// Number of indexed tasks.
    pub fn len(&self) -> usize {
        self.by_date.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_date.is_empty()
    }
}

/// First day of the month containing `date`.
pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Number of days in the month containing `date`.
pub fn days_in_month(date: NaiveDate) -> u32 {
    let first = first_of_month(date);
    let next = first
        .checked_add_months(chrono::Months::new(1))
        .unwrap_or(first + Duration::days(31));
    (next - first).num_days() as u32
}

/// Month grid as weeks of `Option<day>` starting on Monday.
pub fn month_grid(date: NaiveDate) -> Vec<[Option<NaiveDate>; 7]> {
    let first = first_of_month(date);
    let offset = first.weekday().num_days_from_monday() as usize;
    let days = days_in_month(date) as usize;

    let mut weeks = Vec::new();
    let mut week = [None; 7];
    for cell in 0..(offset + days) {
        if cell >= offset {
            week[cell % 7] = Some(first + Duration::days((cell - offset) as i64));
        }
        if cell % 7 == 6 {
            weeks.push(week);
            week = [None; 7];
        }
    }
    if week.iter().any(Option::is_some) {
        weeks.push(week);
    }
    weeks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::NewProject;
    use crate::store::ProjectStore;
    use crate::task::NewTask;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn task_lands_only_in_its_own_bucket() {
        let store = ProjectStore::new();
        let index = CalendarIndex::build(store.projects());

        let on_20th: Vec<&str> = index.tasks_on(d(2025, 5, 20)).iter().map(|e| e.task.id.as_str()).collect();
        assert_eq!(on_20th, vec!["task1"]);
        for date in index.dates_with_tasks().filter(|date| *date != d(2025, 5, 20)) {
            assert!(index.tasks_on(date).iter().all(|e| e.task.id != "task1"));
        }
        assert!(index.tasks_on(d(2025, 5, 21)).is_empty());
    }

    #[test]
    fn undated_tasks_are_not_indexed() {
        let mut store = ProjectStore::new();
        let tid = store.create_task("proj1", NewTask::new("undated", "", "user1")).unwrap();
        let index = CalendarIndex::build(store.projects());

        assert_eq!(index.len(), 3);
        for date in index.dates_with_tasks() {
            assert!(index.tasks_on(date).iter().all(|e| e.task.id != tid));
        }
    }

    #[test]
    fn same_day_tasks_keep_project_then_creation_order() {
        let mut store = ProjectStore::new();
        let due = Some(d(2025, 5, 20));
        let later = store.create_task("proj1", NewTask::new("later", "", "user1").with_due(due)).unwrap();
        let other = store.create_project(NewProject::new("Other", "Other work", "user2"));
        let remote = store.create_task(&other, NewTask::new("remote", "", "user2").with_due(due)).unwrap();

        let index = CalendarIndex::build(store.projects());
        let ids: Vec<&str> = index.tasks_on(d(2025, 5, 20)).iter().map(|e| e.task.id.as_str()).collect();
        assert_eq!(ids, vec!["task1", later.as_str(), remote.as_str()]);
        assert_eq!(index.tasks_on(d(2025, 5, 20))[2].project_name, "Other");
    }

    #[test]
    fn month_grid_covers_every_day_once() {
        let grid = month_grid(d(2025, 5, 14));
        let days: Vec<NaiveDate> = grid.iter().flatten().flatten().copied().collect();
        assert_eq!(days.len(), 31);
        assert_eq!(days.first(), Some(&d(2025, 5, 1)));
        // 1 May 2025 is a Thursday.
        assert_eq!(grid[0][3], Some(d(2025, 5, 1)));
        assert_eq!(days_in_month(d(2024, 2, 10)), 29);
    }
}
