//! The store plus where it came from, shared by the CLI and the TUI.

use tracing::debug;

use crate::auth::{AuthService, FileSessionStore, User};
use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::snapshot::WorkspaceSnapshot;
use crate::store::ProjectStore;

#[derive(Debug)]
pub struct Workspace {
    pub config: Config,
    pub store: ProjectStore,
}

impl Workspace {
    /// Load the snapshot named by the config, or start from the demo data.
    pub fn open(config: Config) -> AppResult<Self> {
        let store = match &config.state_file {
            Some(path) => WorkspaceSnapshot::load(path)?.into_store(),
            None => {
                debug!("no state file, using demo workspace");
                ProjectStore::new()
            }
        };
        Ok(Workspace { config, store })
    }

    /// Write the collection back. Returns false when there is nowhere to
    /// write it.
    pub fn commit(&self) -> AppResult<bool> {
        match &self.config.state_file {
            Some(path) => {
                WorkspaceSnapshot::from_store(&self.store).save(path)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn auth(&self) -> AppResult<AuthService<FileSessionStore>> {
        let dir = self.config.ensure_data_dir()?;
        Ok(AuthService::restore(FileSessionStore::new(dir)))
    }

    /// The logged-in user, required for anything that records an author.
    pub fn require_user(&self) -> AppResult<User> {
        self.auth()?
            .current_user()
            .cloned()
            .ok_or(AppError::NotAuthenticated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::NewProject;
    use tempfile::TempDir;

    fn config(dir: &TempDir, with_state: bool) -> Config {
        Config {
            data_dir: dir.path().join("data"),
            state_file: with_state.then(|| dir.path().join("state.json")),
            log_level: "info".into(),
        }
    }

    #[test]
    fn commit_without_state_file_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let mut ws = Workspace::open(config(&dir, false)).unwrap();
        ws.store.create_project(NewProject::new("Temp", "", "user1"));
        assert!(!ws.commit().unwrap());
        assert!(!dir.path().join("state.json").exists());
    }

    #[test]
    fn commit_round_trips_through_state_file() {
        let dir = TempDir::new().unwrap();
        let mut ws = Workspace::open(config(&dir, true)).unwrap();
        ws.store.create_project(NewProject::new("Kept", "", "user1"));
        assert!(ws.commit().unwrap());

        let reopened = Workspace::open(config(&dir, true)).unwrap();
        assert_eq!(reopened.store.projects().len(), 2);
    }

    #[test]
    fn author_requires_a_session() {
        let dir = TempDir::new().unwrap();
        let ws = Workspace::open(config(&dir, false)).unwrap();
        assert!(matches!(ws.require_user(), Err(AppError::NotAuthenticated)));

        ws.auth().unwrap().login("arjun@example.com", "password123").unwrap();
        assert_eq!(ws.require_user().unwrap().id, "user1");
    }
}
