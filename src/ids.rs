//! Identifier generation for projects and tasks.
//!
//! Ids are `proj{n}` / `task{n}` with a per-kind monotonic counter. The
//! generator is seeded past every id already in the collection, so a store
//! built from the demo data or a saved snapshot never reissues an id.

use crate::project::Project;

const PROJECT_PREFIX: &str = "proj";
const TASK_PREFIX: &str = "task";

/// Monotonic id source owned by a single store.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    last_project: u64,
    last_task: u64,
}

impl IdGenerator {
    /// Create a generator that continues after the highest id in `projects`.
    pub fn seeded_from(projects: &[Project]) -> Self {
        let last_project = projects
            .iter()
            .filter_map(|p| numeric_suffix(&p.id, PROJECT_PREFIX))
            .max()
            .unwrap_or(0);
        let last_task = projects
            .iter()
            .flat_map(|p| p.tasks.iter())
            .filter_map(|t| numeric_suffix(&t.id, TASK_PREFIX))
            .max()
            .unwrap_or(0);
        IdGenerator { last_project, last_task }
    }

    /// Generate the next available project ID.
    pub fn next_project(&mut self) -> String {
        self.last_project += 1;
        format!("{PROJECT_PREFIX}{}", self.last_project)
    }

    /// Generate the next available task ID.
    pub fn next_task(&mut self) -> String {
        self.last_task += 1;
        format!("{TASK_PREFIX}{}", self.last_task)
    }
}

fn numeric_suffix(id: &str, prefix: &str) -> Option<u64> {
    id.strip_prefix(prefix)?.parse().ok()
}
