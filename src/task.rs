//! Task data structure and its create/update inputs.
//!
//! A `Task` always lives inside exactly one project. Identity and creation
//! metadata are fixed at creation; everything else changes through a
//! `TaskPatch`.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::fields::{Priority, Status};

/// A unit of work on a project board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    pub description: String,
    pub status: Status,
    pub priority: Priority,
    pub assignee_id: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
}

/// Fields supplied when creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub status: Status,
    pub priority: Priority,
    pub assignee_id: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub created_by: String,
}

impl NewTask {
    /// A `todo`/`medium` task with no assignee or due date.
    pub fn new(title: impl Into<String>, description: impl Into<String>, created_by: impl Into<String>) -> Self {
        NewTask {
            title: title.into(),
            description: description.into(),
            status: Status::Todo,
            priority: Priority::Medium,
            assignee_id: None,
            due_date: None,
            created_by: created_by.into(),
        }
    }

    pub fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_assignee(mut self, assignee_id: Option<String>) -> Self {
        self.assignee_id = assignee_id;
        self
    }

    pub fn with_due(mut self, due_date: Option<NaiveDate>) -> Self {
        self.due_date = due_date;
        self
    }

    pub(crate) fn into_task(self, id: String, created_at: DateTime<Utc>) -> Task {
        Task {
            id,
            title: self.title,
            description: self.description,
            status: self.status,
            priority: self.priority,
            assignee_id: self.assignee_id,
            due_date: self.due_date,
            created_at,
            created_by: self.created_by,
        }
    }
}

/// Partial update for a task. `None` leaves a field untouched; the nested
/// options on `assignee_id` and `due_date` allow clearing them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<Status>,
    pub priority: Option<Priority>,
    pub assignee_id: Option<Option<String>>,
    pub due_date: Option<Option<NaiveDate>>,
}

impl TaskPatch {
    /// A patch that only changes the status.
    pub fn status(status: Status) -> Self {
        TaskPatch {
            status: Some(status),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == TaskPatch::default()
    }

    /// Merge the set fields into `task`.
    pub fn apply(self, task: &mut Task) {
        if let Some(title) = self.title {
            task.title = title;
        }
        if let Some(description) = self.description {
            task.description = description;
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(assignee_id) = self.assignee_id {
            task.assignee_id = assignee_id;
        }
        if let Some(due_date) = self.due_date {
            task.due_date = due_date;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Task {
        NewTask::new("Write docs", "User guide", "user1")
            .with_assignee(Some("user2".into()))
            .with_due(NaiveDate::from_ymd_opt(2025, 6, 1))
            .into_task("task9".into(), Utc::now())
    }

    #[test]
    fn patch_merges_only_set_fields() {
        let mut task = sample();
        let before = task.clone();
        TaskPatch {
            title: Some("Write better docs".into()),
            priority: Some(Priority::High),
            ..Default::default()
        }
        .apply(&mut task);

        assert_eq!(task.title, "Write better docs");
        assert_eq!(task.priority, Priority::High);
        assert_eq!(task.description, before.description);
        assert_eq!(task.assignee_id, before.assignee_id);
        assert_eq!(task.due_date, before.due_date);
        assert_eq!(task.created_at, before.created_at);
    }

    #[test]
    fn patch_can_clear_optional_fields() {
        let mut task = sample();
        TaskPatch {
            assignee_id: Some(None),
            due_date: Some(None),
            ..Default::default()
        }
        .apply(&mut task);
        assert!(task.assignee_id.is_none());
        assert!(task.due_date.is_none());
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["assigneeId"], "user2");
        assert_eq!(json["dueDate"], "2025-06-01");
        assert_eq!(json["status"], "todo");
    }
}
