//! Project create/edit form.

use crate::error::{AppError, AppResult};
use crate::project::{NewProject, Project, ProjectPatch};
use crate::tui::input::InputField;

pub const NAME_FIELD: usize = 0;
pub const DESCRIPTION_FIELD: usize = 1;

pub const MIN_NAME_LEN: usize = 3;
pub const MIN_DESCRIPTION_LEN: usize = 10;

#[derive(Debug, Clone, Default)]
pub struct ProjectForm {
    pub name: InputField,
    pub description: InputField,
    pub current_field: usize,
    /// Set when editing.
    pub project_id: Option<String>,
}

impl ProjectForm {
    pub fn new() -> Self {
        let mut form = Self::default();
        form.name.active = true;
        form
    }

    pub fn from_project(project: &Project) -> Self {
        let mut form = ProjectForm {
            name: InputField::with_value(&project.name),
            description: InputField::with_value(&project.description),
            current_field: NAME_FIELD,
            project_id: Some(project.id.clone()),
        };
        form.name.active = true;
        form
    }

    pub fn toggle_field(&mut self) {
        self.current_field = if self.current_field == NAME_FIELD { DESCRIPTION_FIELD } else { NAME_FIELD };
        self.name.active = self.current_field == NAME_FIELD;
        self.description.active = self.current_field == DESCRIPTION_FIELD;
    }

    pub fn active_input(&mut self) -> &mut InputField {
        match self.current_field {
            NAME_FIELD => &mut self.name,
            _ => &mut self.description,
        }
    }

    pub fn to_new_project(&self, created_by: &str) -> AppResult<NewProject> {
        let (name, description) = validate_project_input(&self.name.value, &self.description.value)?;
        Ok(NewProject::new(name, description, created_by))
    }

    pub fn to_patch(&self) -> AppResult<ProjectPatch> {
        let (name, description) = validate_project_input(&self.name.value, &self.description.value)?;
        Ok(ProjectPatch {
            name: Some(name),
            description: Some(description),
            members: None,
        })
    }
}

/// Trimmed name and description, once both are long enough.
pub fn validate_project_input(name: &str, description: &str) -> AppResult<(String, String)> {
    let name = name.trim();
    if name.chars().count() < MIN_NAME_LEN {
        return Err(AppError::validation(format!(
            "Project name must be at least {MIN_NAME_LEN} characters"
        )));
    }
    let description = description.trim();
    if description.chars().count() < MIN_DESCRIPTION_LEN {
        return Err(AppError::validation(format!(
            "Description must be at least {MIN_DESCRIPTION_LEN} characters"
        )));
    }
    Ok((name.to_string(), description.to_string()))
}
