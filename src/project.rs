//! Project data structure and its create/update inputs.
//!
//! A project owns an ordered list of tasks (insertion order is creation
//! order) and a list of member user ids.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::task::Task;

/// A named container of tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub members: Vec<String>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

impl Project {
    /// Get a task by ID.
    pub fn task(&self, task_id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == task_id)
    }

    /// Get a mutable reference to a task by ID.
    pub fn task_mut(&mut self, task_id: &str) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == task_id)
    }

    /// Number of tasks whose status is `done`.
    pub fn completed_count(&self) -> usize {
        self.tasks
            .iter()
            .filter(|t| t.status == crate::fields::Status::Done)
            .count()
    }
}

/// Fields supplied when creating a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProject {
    pub name: String,
    pub description: String,
    pub members: Vec<String>,
    pub created_by: String,
}

impl NewProject {
    /// A project whose only member is its creator.
    pub fn new(name: impl Into<String>, description: impl Into<String>, created_by: impl Into<String>) -> Self {
        let created_by = created_by.into();
        NewProject {
            name: name.into(),
            description: description.into(),
            members: vec![created_by.clone()],
            created_by,
        }
    }

    pub(crate) fn into_project(self, id: String, created_at: DateTime<Utc>) -> Project {
        Project {
            id,
            name: self.name,
            description: self.description,
            tasks: Vec::new(),
            members: self.members,
            created_by: self.created_by,
            created_at,
        }
    }
}

/// Partial update for a project. Tasks are only changed through the task
/// operations of the store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub members: Option<Vec<String>>,
}

impl ProjectPatch {
    /// Merge the set fields into `project`.
    pub fn apply(self, project: &mut Project) {
        if let Some(name) = self.name {
            project.name = name;
        }
        if let Some(description) = self.description {
            project.description = description;
        }
        if let Some(members) = self.members {
            project.members = members;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_project_lists_its_creator_as_member() {
        let p = NewProject::new("Launch", "Launch plan", "user3").into_project("proj2".into(), Utc::now());
        assert_eq!(p.members, vec!["user3".to_string()]);
        assert!(p.tasks.is_empty());
    }

    #[test]
    fn patch_keeps_unset_fields() {
        let mut p = NewProject::new("Launch", "Launch plan", "user3").into_project("proj2".into(), Utc::now());
        ProjectPatch {
            description: Some("Revised plan".into()),
            ..Default::default()
        }
        .apply(&mut p);
        assert_eq!(p.name, "Launch");
        assert_eq!(p.description, "Revised plan");
        assert_eq!(p.id, "proj2");
    }
}
