//! Kanban board derivation and the drag protocol.
//!
//! A board is rebuilt from a project snapshot on every render. Dragging a
//! card is modelled as picking it up (remembering its id and status) and
//! dropping it on a column; only a drop on a different column writes to the
//! store.

use crate::fields::{format_status, Status};
use crate::project::Project;
use crate::store::{Outcome, ProjectStore};
use crate::task::Task;

/// One status column of a board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardColumn<'a> {
    pub status: Status,
    pub tasks: Vec<&'a Task>,
}

impl BoardColumn<'_> {
    pub fn title(&self) -> &'static str {
        format_status(self.status)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

/// A project's tasks split into the three status columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board<'a> {
    pub columns: [BoardColumn<'a>; 3],
}

impl<'a> Board<'a> {
    /// Partition a project's tasks by status, keeping their relative order.
    pub fn for_project(project: &'a Project) -> Self {
        let mut columns = Status::ALL.map(|status| BoardColumn {
            status,
            tasks: Vec::new(),
        });
        for task in &project.tasks {
            columns[task.status.column()].tasks.push(task);
        }
        Board { columns }
    }

    /// The column holding tasks with this status.
    pub fn column(&self, status: Status) -> &BoardColumn<'a> {
        &self.columns[status.column()]
    }

    /// Total number of cards across all columns.
    pub fn total(&self) -> usize {
        self.columns.iter().map(BoardColumn::len).sum()
    }
}

/// A card that has been picked up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragState {
    pub task_id: String,
    pub from: Status,
}

/// A status change requested by a drop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChange {
    pub task_id: String,
    pub to: Status,
}

impl DragState {
    /// Capture the task's id and its status at pick-up time.
    pub fn pick_up(task: &Task) -> Self {
        DragState {
            task_id: task.id.clone(),
            from: task.status,
        }
    }

    /// Drop onto a column. Dropping onto the original column yields nothing.
    pub fn drop_on(&self, target: Status) -> Option<StatusChange> {
        (target != self.from).then(|| StatusChange {
            task_id: self.task_id.clone(),
            to: target,
        })
    }
}

/// Complete a drag: issue at most one status update for the dropped card.
/// Returns `None` when the drop landed on the card's own column.
pub fn apply_drop(store: &mut ProjectStore, project_id: &str, drag: &DragState, target: Status) -> Option<Outcome> {
    let change = drag.drop_on(target)?;
    Some(store.update_task_status(project_id, &change.task_id, change.to))
}
