//! Aggregate views over every task: dashboard counters, project progress
//! and the globally sorted task table.

use std::cmp::Ordering;

use crate::fields::{Priority, Status};
use crate::project::Project;
use crate::task::Task;

/// Task counts per status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub todo: usize,
    pub in_progress: usize,
    pub done: usize,
}

impl StatusCounts {
    pub fn get(&self, status: Status) -> usize {
        match status {
            Status::Todo => self.todo,
            Status::InProgress => self.in_progress,
            Status::Done => self.done,
        }
    }
}

/// Task counts per priority.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PriorityCounts {
    pub low: usize,
    pub medium: usize,
    pub high: usize,
}

/// Figures shown on the dashboard cards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DashboardStats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    pub high_priority: usize,
    pub by_status: StatusCounts,
    pub by_priority: PriorityCounts,
}

impl DashboardStats {
    pub fn from_projects(projects: &[Project]) -> Self {
        let mut stats = DashboardStats::default();
        for task in projects.iter().flat_map(|p| p.tasks.iter()) {
            stats.total += 1;
            match task.status {
                Status::Todo => stats.by_status.todo += 1,
                Status::InProgress => stats.by_status.in_progress += 1,
                Status::Done => stats.by_status.done += 1,
            }
            match task.priority {
                Priority::Low => stats.by_priority.low += 1,
                Priority::Medium => stats.by_priority.medium += 1,
                Priority::High => stats.by_priority.high += 1,
            }
        }
        stats.completed = stats.by_status.done;
        stats.pending = stats.total - stats.completed;
        stats.high_priority = stats.by_priority.high;
        stats
    }
}

/// Percentage of a project's tasks that are done, rounded. 0 when empty.
pub fn project_progress(project: &Project) -> u8 {
    let total = project.tasks.len();
    if total == 0 {
        return 0;
    }
    ((project.completed_count() as f64 / total as f64) * 100.0).round() as u8
}

/// A row of the global task table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskRow<'a> {
    pub project_id: &'a str,
    pub project_name: &'a str,
    pub task: &'a Task,
}

/// Table ordering: priority rank, then due date with undated tasks last.
pub fn compare_tasks(a: &Task, b: &Task) -> Ordering {
    a.priority.rank().cmp(&b.priority.rank()).then_with(|| match (a.due_date, b.due_date) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    })
}

/// Every task across all projects in table order. Ties keep their original
/// project/creation order.
pub fn sorted_tasks(projects: &[Project]) -> Vec<TaskRow<'_>> {
    let mut rows: Vec<TaskRow<'_>> = projects
        .iter()
        .flat_map(|p| {
            p.tasks.iter().map(move |task| TaskRow {
                project_id: &p.id,
                project_name: &p.name,
                task,
            })
        })
        .collect();
    rows.sort_by(|a, b| compare_tasks(a.task, b.task));
    rows
}
