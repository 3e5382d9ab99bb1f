//! The project store: single owner of every project and task.
//!
//! All views read from `ProjectStore::projects()` and re-derive what they
//! show; nothing outside this module mutates the collection. Every applied
//! mutation emits exactly one [`StoreEvent`] to the subscribers, a lookup
//! miss emits nothing and reports [`Outcome::NotFound`].

use std::fmt;

use chrono::Utc;
use tracing::{debug, info};

use crate::fields::Status;
use crate::ids::IdGenerator;
use crate::project::{NewProject, Project, ProjectPatch};
use crate::seed::demo_projects;
use crate::task::{NewTask, Task, TaskPatch};

/// Result of an id-keyed mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    NotFound,
}

impl Outcome {
    pub fn is_applied(self) -> bool {
        self == Outcome::Applied
    }
}

/// Change notification sent after each applied mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    ProjectCreated { id: String, name: String },
    ProjectUpdated { id: String },
    ProjectDeleted { id: String, removed_tasks: usize },
    TaskCreated { project_id: String, task_id: String },
    TaskUpdated { project_id: String, task_id: String },
    TaskDeleted { project_id: String, task_id: String },
}

impl StoreEvent {
    /// User-facing confirmation text.
    pub fn message(&self) -> String {
        match self {
            StoreEvent::ProjectCreated { name, .. } => format!("Project \"{name}\" created successfully"),
            StoreEvent::ProjectUpdated { .. } => "Project updated successfully".to_string(),
            StoreEvent::ProjectDeleted { .. } => "Project deleted successfully".to_string(),
            StoreEvent::TaskCreated { .. } => "Task created successfully".to_string(),
            StoreEvent::TaskUpdated { .. } => "Task updated successfully".to_string(),
            StoreEvent::TaskDeleted { .. } => "Task deleted successfully".to_string(),
        }
    }
}

/// Handle returned by [`ProjectStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionId(u64);

type Subscriber = Box<dyn FnMut(&StoreEvent, &[Project])>;

/// In-memory store of projects with change notification.
pub struct ProjectStore {
    projects: Vec<Project>,
    current: Option<String>,
    ids: IdGenerator,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: u64,
}

impl fmt::Debug for ProjectStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProjectStore")
            .field("projects", &self.projects.len())
            .field("current", &self.current)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl Default for ProjectStore {
    fn default() -> Self {
        Self::with_projects(demo_projects())
    }
}

impl ProjectStore {
    /// Create a store holding the demo collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store from an existing collection.
    pub fn with_projects(projects: Vec<Project>) -> Self {
        let ids = IdGenerator::seeded_from(&projects);
        ProjectStore {
            projects,
            current: None,
            ids,
            subscribers: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Current snapshot of the collection.
    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    /// Take the collection out of the store.
    pub fn into_projects(self) -> Vec<Project> {
        self.projects
    }

    /// Get a project by ID.
    pub fn project(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    fn project_mut(&mut self, id: &str) -> Option<&mut Project> {
        self.projects.iter_mut().find(|p| p.id == id)
    }

    /// Get a task by project and task ID.
    pub fn task(&self, project_id: &str, task_id: &str) -> Option<&Task> {
        self.project(project_id)?.task(task_id)
    }

    /// Every task in project order, then creation order.
    pub fn all_tasks(&self) -> impl Iterator<Item = (&Project, &Task)> {
        self.projects
            .iter()
            .flat_map(|p| p.tasks.iter().map(move |t| (p, t)))
    }

    /// Register a callback run after every applied mutation.
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&StoreEvent, &[Project]) + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Remove a subscriber. Unknown ids are ignored.
    pub fn unsubscribe(&mut self, id: SubscriptionId) {
        self.subscribers.retain(|(sid, _)| *sid != id);
    }

    fn emit(&mut self, event: StoreEvent) {
        info!(event = ?event, "{}", event.message());
        debug!(subscribers = self.subscribers.len(), "notifying subscribers");
        let projects = &self.projects;
        for (_, subscriber) in self.subscribers.iter_mut() {
            subscriber(&event, projects);
        }
    }

    /// Append a new project and return its id.
    pub fn create_project(&mut self, input: NewProject) -> String {
        let id = self.ids.next_project();
        let project = input.into_project(id.clone(), Utc::now());
        let name = project.name.clone();
        self.projects.push(project);
        self.emit(StoreEvent::ProjectCreated { id: id.clone(), name });
        id
    }

    /// Merge `patch` into the project with this id.
    pub fn update_project(&mut self, id: &str, patch: ProjectPatch) -> Outcome {
        let Some(project) = self.project_mut(id) else {
            debug!(project_id = id, "update_project: no such project");
            return Outcome::NotFound;
        };
        patch.apply(project);
        self.emit(StoreEvent::ProjectUpdated { id: id.to_string() });
        Outcome::Applied
    }

    /// Remove a project together with all of its tasks.
    pub fn delete_project(&mut self, id: &str) -> Outcome {
        let Some(index) = self.projects.iter().position(|p| p.id == id) else {
            debug!(project_id = id, "delete_project: no such project");
            return Outcome::NotFound;
        };
        let removed = self.projects.remove(index);
        if self.current.as_deref() == Some(id) {
            self.current = None;
        }
        self.emit(StoreEvent::ProjectDeleted {
            id: removed.id,
            removed_tasks: removed.tasks.len(),
        });
        Outcome::Applied
    }

    /// Point the current selection at a project, or clear it with `None`.
    /// An unknown id clears the selection.
    pub fn select_project(&mut self, id: Option<&str>) {
        self.current = id
            .and_then(|id| self.project(id))
            .map(|p| p.id.clone());
        debug!(current = ?self.current, "selection changed");
    }

    /// The selected project, resolved against the live collection.
    pub fn current_project(&self) -> Option<&Project> {
        self.current.as_deref().and_then(|id| self.project(id))
    }

    /// Id of the selected project.
    pub fn current_project_id(&self) -> Option<&str> {
        self.current_project().map(|p| p.id.as_str())
    }

    /// Append a new task to a project. Returns `None` if the project is unknown.
    pub fn create_task(&mut self, project_id: &str, input: NewTask) -> Option<String> {
        let id = {
            let Some(project) = self.projects.iter_mut().find(|p| p.id == project_id) else {
                debug!(project_id, "create_task: no such project");
                return None;
            };
            let id = self.ids.next_task();
            project.tasks.push(input.into_task(id.clone(), Utc::now()));
            id
        };
        self.emit(StoreEvent::TaskCreated {
            project_id: project_id.to_string(),
            task_id: id.clone(),
        });
        Some(id)
    }

    /// Merge `patch` into a task.
    pub fn update_task(&mut self, project_id: &str, task_id: &str, patch: TaskPatch) -> Outcome {
        let Some(task) = self.project_mut(project_id).and_then(|p| p.task_mut(task_id)) else {
            debug!(project_id, task_id, "update_task: no such task");
            return Outcome::NotFound;
        };
        patch.apply(task);
        self.emit(StoreEvent::TaskUpdated {
            project_id: project_id.to_string(),
            task_id: task_id.to_string(),
        });
        Outcome::Applied
    }

    /// Remove a task from its project.
    pub fn delete_task(&mut self, project_id: &str, task_id: &str) -> Outcome {
        let Some(project) = self.project_mut(project_id) else {
            debug!(project_id, task_id, "delete_task: no such project");
            return Outcome::NotFound;
        };
        let before = project.tasks.len();
        project.tasks.retain(|t| t.id != task_id);
        if project.tasks.len() == before {
            debug!(project_id, task_id, "delete_task: no such task");
            return Outcome::NotFound;
        }
        self.emit(StoreEvent::TaskDeleted {
            project_id: project_id.to_string(),
            task_id: task_id.to_string(),
        });
        Outcome::Applied
    }

    /// Move a task to another status. Any status may move to any other.
    pub fn update_task_status(&mut self, project_id: &str, task_id: &str, status: Status) -> Outcome {
        self.update_task(project_id, task_id, TaskPatch::status(status))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::Priority;
    use std::cell::RefCell;
    use std::collections::HashSet;
    use std::rc::Rc;

    fn recording(store: &mut ProjectStore) -> Rc<RefCell<Vec<StoreEvent>>> {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        store.subscribe(move |event, _| sink.borrow_mut().push(event.clone()));
        events
    }

    fn flattened_len(store: &ProjectStore) -> usize {
        store.all_tasks().count()
    }

    #[test]
    fn create_project_appends_with_fresh_id() {
        let mut store = ProjectStore::new();
        let before: HashSet<String> = store.projects().iter().map(|p| p.id.clone()).collect();

        let id = store.create_project(NewProject::new("X", "Y description", "user1"));

        assert_eq!(store.projects().len(), before.len() + 1);
        assert!(!before.contains(&id));
        assert_eq!(store.projects().last().map(|p| p.id.as_str()), Some(id.as_str()));
    }

    #[test]
    fn rapid_creates_get_distinct_ids() {
        let mut store = ProjectStore::new();
        let pid = store.create_project(NewProject::new("X", "Y", "user1"));
        let ids: HashSet<String> = (0..200)
            .filter_map(|i| store.create_task(&pid, NewTask::new(format!("t{i}"), "d", "user1")))
            .collect();
        assert_eq!(ids.len(), 200);
    }

    #[test]
    fn unknown_ids_leave_collection_untouched() {
        let mut store = ProjectStore::new();
        let events = recording(&mut store);
        let before = store.projects().to_vec();

        assert_eq!(
            store.update_project("nope", ProjectPatch { name: Some("Z".into()), ..Default::default() }),
            Outcome::NotFound
        );
        assert_eq!(store.update_task("proj1", "nope", TaskPatch::status(Status::Done)), Outcome::NotFound);
        assert_eq!(store.update_task("nope", "task1", TaskPatch::status(Status::Todo)), Outcome::NotFound);
        assert_eq!(store.delete_task("proj1", "nope"), Outcome::NotFound);
        assert_eq!(store.delete_project("nope"), Outcome::NotFound);
        assert_eq!(store.create_task("nope", NewTask::new("t", "d", "user1")), None);

        assert_eq!(store.projects(), before.as_slice());
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn delete_project_cascades_to_tasks() {
        let mut store = ProjectStore::new();
        let pid = store.create_project(NewProject::new("X", "Y", "user1"));
        store.create_task(&pid, NewTask::new("a", "d", "user1"));
        store.create_task(&pid, NewTask::new("b", "d", "user1"));
        let before = flattened_len(&store);
        let own = store.project(&pid).map(|p| p.tasks.len()).unwrap();

        assert!(store.delete_project(&pid).is_applied());

        assert_eq!(flattened_len(&store), before - own);
        assert!(store.project(&pid).is_none());
    }

    #[test]
    fn update_task_status_is_idempotent() {
        let mut once = ProjectStore::new();
        once.update_task_status("proj1", "task3", Status::Done);

        let mut twice = ProjectStore::new();
        twice.update_task_status("proj1", "task3", Status::Done);
        twice.update_task_status("proj1", "task3", Status::Done);

        assert_eq!(once.projects(), twice.projects());
    }

    #[test]
    fn status_moves_are_unconstrained() {
        let mut store = ProjectStore::new();
        assert!(store.update_task_status("proj1", "task1", Status::Todo).is_applied());
        assert_eq!(store.task("proj1", "task1").map(|t| t.status), Some(Status::Todo));
    }

    #[test]
    fn one_event_per_applied_mutation() {
        let mut store = ProjectStore::new();
        let events = recording(&mut store);

        let pid = store.create_project(NewProject::new("X", "Y", "user1"));
        let tid = store.create_task(&pid, NewTask::new("a", "d", "user1")).unwrap();
        store.update_task(&pid, &tid, TaskPatch { priority: Some(Priority::High), ..Default::default() });
        store.update_task_status(&pid, &tid, Status::Done);
        store.delete_task(&pid, &tid);
        store.update_project(&pid, ProjectPatch::default());
        store.delete_project(&pid);

        let events = events.borrow();
        assert_eq!(events.len(), 7);
        assert_eq!(events[0], StoreEvent::ProjectCreated { id: pid.clone(), name: "X".into() });
        assert_eq!(events[0].message(), "Project \"X\" created successfully");
        assert!(matches!(events[3], StoreEvent::TaskUpdated { .. }));
        assert_eq!(events[6], StoreEvent::ProjectDeleted { id: pid, removed_tasks: 0 });
    }

    #[test]
    fn subscribers_see_the_new_snapshot() {
        let mut store = ProjectStore::new();
        let seen = Rc::new(RefCell::new(0usize));
        let sink = Rc::clone(&seen);
        let sub = store.subscribe(move |_, projects| *sink.borrow_mut() = projects.len());

        store.create_project(NewProject::new("X", "Y", "user1"));
        assert_eq!(*seen.borrow(), 2);

        store.unsubscribe(sub);
        store.create_project(NewProject::new("Z", "W", "user1"));
        assert_eq!(*seen.borrow(), 2);
    }

    #[test]
    fn selection_tracks_updates_and_clears_on_delete() {
        let mut store = ProjectStore::new();
        store.select_project(Some("proj1"));
        store.update_project("proj1", ProjectPatch { name: Some("Renamed".into()), ..Default::default() });
        assert_eq!(store.current_project().map(|p| p.name.as_str()), Some("Renamed"));

        store.create_task("proj1", NewTask::new("new", "d", "user1"));
        assert_eq!(store.current_project().map(|p| p.tasks.len()), Some(4));

        store.delete_project("proj1");
        assert!(store.current_project().is_none());
        assert!(store.current_project_id().is_none());
    }

    #[test]
    fn selecting_unknown_or_none_clears() {
        let mut store = ProjectStore::new();
        store.select_project(Some("proj1"));
        store.select_project(Some("missing"));
        assert!(store.current_project().is_none());

        store.select_project(Some("proj1"));
        store.select_project(None);
        assert!(store.current_project().is_none());
    }

    #[test]
    fn created_task_keeps_creation_metadata_on_update() {
        let mut store = ProjectStore::new();
        let tid = store
            .create_task("proj1", NewTask::new("a", "d", "user2"))
            .unwrap();
        let created = store.task("proj1", &tid).map(|t| t.created_at);

        store.update_task("proj1", &tid, TaskPatch { title: Some("b".into()), ..Default::default() });

        let task = store.task("proj1", &tid).cloned();
        assert_eq!(task.as_ref().map(|t| t.created_at), created);
        assert_eq!(task.as_ref().map(|t| t.created_by.as_str()), Some("user2"));
        assert_eq!(store.project("proj1").and_then(|p| p.tasks.last()).map(|t| t.id.clone()), Some(tid));
    }
}
