//! Optional on-disk snapshot of the project collection.
//!
//! The store itself keeps everything in memory. CLI invocations that pass
//! `--state FILE` wrap their store calls in a load/save of this snapshot so
//! changes survive between runs.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{AppError, AppResult};
use crate::project::Project;
use crate::seed::demo_projects;
use crate::store::ProjectStore;

/// Serialized form of the whole collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceSnapshot {
    pub projects: Vec<Project>,
}

impl WorkspaceSnapshot {
    /// Load from a JSON file. A missing file yields the demo collection.
    pub fn load(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no snapshot yet, starting from demo data");
            return Ok(WorkspaceSnapshot { projects: demo_projects() });
        }
        let buf = fs::read_to_string(path).map_err(|e| AppError::file(path, e))?;
        let snapshot: WorkspaceSnapshot = serde_json::from_str(&buf)?;
        debug!(path = %path.display(), projects = snapshot.projects.len(), "loaded snapshot");
        Ok(snapshot)
    }

    /// Save using an atomic write (temp file + rename).
    pub fn save(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| AppError::file(parent, e))?;
        }
        let data = serde_json::to_string_pretty(self)?;
        write_atomic(path, &data)?;
        info!(path = %path.display(), "saved snapshot");
        Ok(())
    }

    pub fn from_store(store: &ProjectStore) -> Self {
        WorkspaceSnapshot {
            projects: store.projects().to_vec(),
        }
    }

    pub fn into_store(self) -> ProjectStore {
        ProjectStore::with_projects(self.projects)
    }
}

/// Write via temp file + rename so a crash never leaves half a file.
pub(crate) fn write_atomic(path: &Path, contents: &str) -> AppResult<()> {
    let tmp = path.with_extension("json.tmp");
    let mut f = File::create(&tmp).map_err(|e| AppError::file(&tmp, e))?;
    f.write_all(contents.as_bytes()).map_err(|e| AppError::file(&tmp, e))?;
    f.flush().map_err(|e| AppError::file(&tmp, e))?;
    fs::rename(&tmp, path).map_err(|e| AppError::file(path, e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::Status;
    use crate::project::NewProject;
    use tempfile::TempDir;

    #[test]
    fn missing_file_starts_from_seed() {
        let dir = TempDir::new().unwrap();
        let snapshot = WorkspaceSnapshot::load(&dir.path().join("state.json")).unwrap();
        assert_eq!(snapshot.projects, demo_projects());
    }

    #[test]
    fn changes_survive_a_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("state.json");

        let mut store = WorkspaceSnapshot::load(&path).unwrap().into_store();
        let pid = store.create_project(NewProject::new("Holi Planner", "Colours and logistics", "user1"));
        store.update_task_status("proj1", "task3", Status::Done);
        WorkspaceSnapshot::from_store(&store).save(&path).unwrap();

        let mut reloaded = WorkspaceSnapshot::load(&path).unwrap().into_store();
        assert_eq!(reloaded.projects(), store.projects());
        assert_eq!(reloaded.task("proj1", "task3").map(|t| t.status), Some(Status::Done));

        // ids keep counting after a reload
        let next = reloaded.create_project(NewProject::new("Next", "After reload", "user1"));
        assert_ne!(next, pid);
        assert_eq!(next, "proj3");
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, "[oops").unwrap();
        assert!(matches!(WorkspaceSnapshot::load(&path), Err(AppError::Json(_))));
    }
}
