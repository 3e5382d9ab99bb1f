//! Demo collection the store starts from.

use chrono::{DateTime, NaiveDate, Utc};

use crate::fields::{Priority, Status};
use crate::project::Project;
use crate::task::Task;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn midnight(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    date(y, m, d).and_hms_opt(0, 0, 0).unwrap_or_default().and_utc()
}

/// One project with three tasks, one per board column.
pub fn demo_projects() -> Vec<Project> {
    let tasks = vec![
        Task {
            id: "task1".into(),
            title: "Design homepage with rangoli patterns".into(),
            description: "Create a vibrant homepage with traditional rangoli designs and motifs".into(),
            status: Status::Done,
            priority: Priority::High,
            assignee_id: Some("user1".into()),
            due_date: Some(date(2025, 5, 20)),
            created_at: midnight(2025, 5, 1),
            created_by: "user1".into(),
        },
        Task {
            id: "task2".into(),
            title: "Implement diya lighting animation".into(),
            description: "Create an interactive animation for lighting virtual diyas on the app".into(),
            status: Status::InProgress,
            priority: Priority::Medium,
            assignee_id: Some("user2".into()),
            due_date: Some(date(2025, 5, 25)),
            created_at: midnight(2025, 5, 5),
            created_by: "user1".into(),
        },
        Task {
            id: "task3".into(),
            title: "Add sweets and gifts marketplace".into(),
            description: "Integrate local vendors for ordering traditional sweets and gifts".into(),
            status: Status::Todo,
            priority: Priority::Low,
            assignee_id: None,
            due_date: Some(date(2025, 5, 30)),
            created_at: midnight(2025, 5, 10),
            created_by: "user1".into(),
        },
    ];

    vec![Project {
        id: "proj1".into(),
        name: "Diwali Festival App".into(),
        description: "Create a mobile app for tracking and organizing Diwali celebrations and events".into(),
        tasks,
        members: vec!["user1".into(), "user2".into()],
        created_by: "user1".into(),
        created_at: midnight(2025, 5, 1),
    }]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_has_one_project_with_three_tasks() {
        let projects = demo_projects();
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].tasks.len(), 3);
        let statuses: Vec<Status> = projects[0].tasks.iter().map(|t| t.status).collect();
        assert_eq!(statuses, vec![Status::Done, Status::InProgress, Status::Todo]);
    }
}
