//! Task form handling for the terminal user interface.
//!
//! The same form creates a task and edits one. Text fields take typed
//! input; status, priority and assignee are selectors cycled with
//! Left/Right.

use chrono::NaiveDate;

use crate::display::parse_due_input;
use crate::error::{AppError, AppResult};
use crate::fields::{Priority, Status};
use crate::task::{NewTask, Task, TaskPatch};
use crate::team::TeamMember;
use crate::tui::input::InputField;

/// Field order, top to bottom.
pub const TITLE_FIELD: usize = 0;
pub const DESCRIPTION_FIELD: usize = 1;
pub const STATUS_FIELD: usize = 2;
pub const PRIORITY_FIELD: usize = 3;
pub const ASSIGNEE_FIELD: usize = 4;
pub const DUE_FIELD: usize = 5;
pub const FIELD_COUNT: usize = 6;

/// Task form for creating or editing one task of one project.
#[derive(Debug, Clone)]
pub struct TaskForm {
    pub title: InputField,
    pub description: InputField,
    pub due: InputField,
    pub status: usize,
    pub priority: usize,
    pub assignee: usize,
    pub current_field: usize,
    /// `(id, label)`, with "Unassigned" first.
    pub assignees: Vec<(Option<String>, String)>,
    pub project_id: String,
    /// Set when editing.
    pub task_id: Option<String>,
}

fn cycle(index: &mut usize, len: usize, forward: bool) {
    if len == 0 {
        return;
    }
    *index = if forward { (*index + 1) % len } else { (*index + len - 1) % len };
}

impl TaskForm {
    /// Empty form for a new task: todo, medium priority, unassigned.
    pub fn new(project_id: &str, team: &[TeamMember]) -> Self {
        let mut assignees = vec![(None, "Unassigned".to_string())];
        assignees.extend(team.iter().map(|m| (Some(m.id.clone()), m.name.clone())));
        let mut form = TaskForm {
            title: InputField::new(),
            description: InputField::new(),
            due: InputField::new(),
            status: Status::Todo.column(),
            priority: Priority::ALL.iter().position(|p| *p == Priority::Medium).unwrap_or(0),
            assignee: 0,
            current_field: TITLE_FIELD,
            assignees,
            project_id: project_id.to_string(),
            task_id: None,
        };
        form.update_active_field();
        form
    }

    /// New task that starts in a given board column.
    pub fn for_status(project_id: &str, status: Status, team: &[TeamMember]) -> Self {
        let mut form = Self::new(project_id, team);
        form.status = status.column();
        form
    }

    /// Form populated from an existing task. An assignee outside the roster
    /// is kept as its own option.
    pub fn from_task(project_id: &str, task: &Task, team: &[TeamMember]) -> Self {
        let mut form = Self::new(project_id, team);
        form.title = InputField::with_value(&task.title);
        form.description = InputField::with_value(&task.description);
        form.due = InputField::with_value(&task.due_date.map(|d| d.to_string()).unwrap_or_default());
        form.status = task.status.column();
        form.priority = Priority::ALL.iter().position(|p| *p == task.priority).unwrap_or(1);
        if let Some(id) = &task.assignee_id {
            form.assignee = match form.assignees.iter().position(|(a, _)| a.as_ref() == Some(id)) {
                Some(i) => i,
                None => {
                    form.assignees.push((Some(id.clone()), id.clone()));
                    form.assignees.len() - 1
                }
            };
        }
        form.task_id = Some(task.id.clone());
        form.update_active_field();
        form
    }

    pub fn is_edit(&self) -> bool {
        self.task_id.is_some()
    }

    pub fn next_field(&mut self) {
        self.current_field = (self.current_field + 1) % FIELD_COUNT;
        self.update_active_field();
    }

    pub fn prev_field(&mut self) {
        self.current_field = (self.current_field + FIELD_COUNT - 1) % FIELD_COUNT;
        self.update_active_field();
    }

    fn update_active_field(&mut self) {
        self.title.active = self.current_field == TITLE_FIELD;
        self.description.active = self.current_field == DESCRIPTION_FIELD;
        self.due.active = self.current_field == DUE_FIELD;
    }

    fn active_input(&mut self) -> Option<&mut InputField> {
        match self.current_field {
            TITLE_FIELD => Some(&mut self.title),
            DESCRIPTION_FIELD => Some(&mut self.description),
            DUE_FIELD => Some(&mut self.due),
            _ => None,
        }
    }

    pub fn handle_char(&mut self, c: char) {
        if let Some(field) = self.active_input() {
            field.handle_char(c);
        }
    }

    pub fn handle_backspace(&mut self) {
        if let Some(field) = self.active_input() {
            field.handle_backspace();
        }
    }

    pub fn handle_delete(&mut self) {
        if let Some(field) = self.active_input() {
            field.handle_delete();
        }
    }

    /// Left/right moves the cursor in text fields and cycles selectors.
    pub fn handle_left_right(&mut self, right: bool) {
        match self.current_field {
            STATUS_FIELD => cycle(&mut self.status, Status::ALL.len(), right),
            PRIORITY_FIELD => cycle(&mut self.priority, Priority::ALL.len(), right),
            ASSIGNEE_FIELD => cycle(&mut self.assignee, self.assignees.len(), right),
            _ => {
                if let Some(field) = self.active_input() {
                    if right {
                        field.move_cursor_right()
                    } else {
                        field.move_cursor_left()
                    }
                }
            }
        }
    }

    pub fn selected_status(&self) -> Status {
        Status::ALL[self.status % Status::ALL.len()]
    }

    pub fn selected_priority(&self) -> Priority {
        Priority::ALL[self.priority % Priority::ALL.len()]
    }

    pub fn selected_assignee(&self) -> Option<String> {
        self.assignees.get(self.assignee).and_then(|(id, _)| id.clone())
    }

    pub fn assignee_label(&self) -> &str {
        self.assignees.get(self.assignee).map(|(_, l)| l.as_str()).unwrap_or("Unassigned")
    }

    fn validated_title(&self) -> AppResult<String> {
        let title = self.title.trimmed();
        if title.is_empty() {
            return Err(AppError::validation("Title is required"));
        }
        Ok(title.to_string())
    }

    fn parsed_due(&self, today: NaiveDate) -> AppResult<Option<NaiveDate>> {
        let raw = self.due.trimmed();
        if raw.is_empty() {
            return Ok(None);
        }
        parse_due_input(raw, today)
            .map(Some)
            .ok_or_else(|| AppError::validation(format!("unrecognised due date '{raw}'")))
    }

    pub fn to_new_task(&self, created_by: &str, today: NaiveDate) -> AppResult<NewTask> {
        Ok(NewTask::new(self.validated_title()?, self.description.trimmed(), created_by)
            .with_status(self.selected_status())
            .with_priority(self.selected_priority())
            .with_assignee(self.selected_assignee())
            .with_due(self.parsed_due(today)?))
    }

    /// Patch that sets every editable field to the form's value.
    pub fn to_patch(&self, today: NaiveDate) -> AppResult<TaskPatch> {
        Ok(TaskPatch {
            title: Some(self.validated_title()?),
            description: Some(self.description.trimmed().to_string()),
            status: Some(self.selected_status()),
            priority: Some(self.selected_priority()),
            assignee_id: Some(self.selected_assignee()),
            due_date: Some(self.parsed_due(today)?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::demo_projects;
    use crate::team::demo_team;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, 14).unwrap()
    }

    fn type_str(form: &mut TaskForm, s: &str) {
        for c in s.chars() {
            form.handle_char(c);
        }
    }

    #[test]
    fn new_form_defaults_to_todo_medium_unassigned() {
        let form = TaskForm::new("proj1", &demo_team());
        assert_eq!(form.selected_status(), Status::Todo);
        assert_eq!(form.selected_priority(), Priority::Medium);
        assert_eq!(form.selected_assignee(), None);
        assert!(!form.is_edit());
    }

    #[test]
    fn builds_a_new_task_from_input() {
        let mut form = TaskForm::for_status("proj1", Status::InProgress, &demo_team());
        type_str(&mut form, "  Book venue ");
        form.current_field = PRIORITY_FIELD;
        form.handle_left_right(true);
        form.current_field = ASSIGNEE_FIELD;
        form.handle_left_right(true);
        form.current_field = DUE_FIELD;
        type_str(&mut form, "tomorrow");

        let input = form.to_new_task("user1", today()).unwrap();
        assert_eq!(input.title, "Book venue");
        assert_eq!(input.status, Status::InProgress);
        assert_eq!(input.priority, Priority::High);
        assert_eq!(input.assignee_id.as_deref(), Some("user1"));
        assert_eq!(input.due_date, NaiveDate::from_ymd_opt(2025, 5, 15));
    }

    #[test]
    fn blank_title_and_bad_due_are_rejected() {
        let mut form = TaskForm::new("proj1", &demo_team());
        assert!(matches!(form.to_new_task("user1", today()), Err(AppError::Validation(_))));
        type_str(&mut form, "Title");
        form.current_field = DUE_FIELD;
        type_str(&mut form, "whenever");
        assert!(matches!(form.to_patch(today()), Err(AppError::Validation(_))));
    }

    #[test]
    fn edit_form_round_trips_task_fields() {
        let projects = demo_projects();
        let task = &projects[0].tasks[1];
        let form = TaskForm::from_task("proj1", task, &demo_team());
        assert!(form.is_edit());

        let mut copy = task.clone();
        form.to_patch(today()).unwrap().apply(&mut copy);
        assert_eq!(&copy, task);
    }

    #[test]
    fn unknown_assignee_is_kept() {
        let projects = demo_projects();
        let mut task = projects[0].tasks[0].clone();
        task.assignee_id = Some("user42".into());
        let form = TaskForm::from_task("proj1", &task, &demo_team());
        assert_eq!(form.selected_assignee().as_deref(), Some("user42"));
    }
}
