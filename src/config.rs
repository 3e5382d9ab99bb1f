//! Runtime configuration.
//!
//! Values come from CLI flags first, then the `TASKBOARD_DIR` /
//! `TASKBOARD_LOG` environment variables, then defaults.

use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

pub const DIR_ENV: &str = "TASKBOARD_DIR";
pub const LOG_ENV: &str = "TASKBOARD_LOG";
pub const DEFAULT_LOG_LEVEL: &str = "info";
const LOG_FILE: &str = "taskboard.log";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Holds the session file and the TUI log.
    pub data_dir: PathBuf,
    /// Snapshot file. Without one the collection lives only for this run.
    pub state_file: Option<PathBuf>,
    pub log_level: String,
}

/// Values given on the command line, all optional.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub data_dir: Option<PathBuf>,
    pub state_file: Option<PathBuf>,
    pub log_level: Option<String>,
}

impl Config {
    pub fn resolve(overrides: ConfigOverrides) -> AppResult<Self> {
        Self::resolve_with(overrides, |key| std::env::var(key).ok())
    }

    /// Resolution with an injectable environment lookup.
    pub fn resolve_with(
        overrides: ConfigOverrides,
        env: impl Fn(&str) -> Option<String>,
    ) -> AppResult<Self> {
        let data_dir = match overrides.data_dir.or_else(|| env(DIR_ENV).map(PathBuf::from)) {
            Some(dir) => dir,
            None => default_data_dir(&env)?,
        };
        let log_level = overrides
            .log_level
            .or_else(|| env(LOG_ENV))
            .filter(|l| !l.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());

        Ok(Config {
            data_dir,
            state_file: overrides.state_file,
            log_level,
        })
    }

    /// Create the data directory if it does not exist yet.
    pub fn ensure_data_dir(&self) -> AppResult<&Path> {
        std::fs::create_dir_all(&self.data_dir).map_err(|e| AppError::file(&self.data_dir, e))?;
        Ok(&self.data_dir)
    }

    pub fn log_file(&self) -> PathBuf {
        self.data_dir.join(LOG_FILE)
    }
}

fn default_data_dir(env: &impl Fn(&str) -> Option<String>) -> AppResult<PathBuf> {
    env("HOME")
        .filter(|h| !h.is_empty())
        .map(|home| PathBuf::from(home).join(".taskboard"))
        .ok_or_else(|| AppError::Config(format!("HOME is not set; pass --data-dir or set {DIR_ENV}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_to_home_directory() {
        let config = Config::resolve_with(ConfigOverrides::default(), env_of(&[("HOME", "/home/asha")])).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/home/asha/.taskboard"));
        assert_eq!(config.log_level, "info");
        assert_eq!(config.state_file, None);
        assert_eq!(config.log_file(), PathBuf::from("/home/asha/.taskboard/taskboard.log"));
    }

    #[test]
    fn flags_win_over_environment() {
        let env = env_of(&[("HOME", "/home/asha"), (DIR_ENV, "/srv/board"), (LOG_ENV, "debug")]);

        let from_env = Config::resolve_with(ConfigOverrides::default(), &env).unwrap();
        assert_eq!(from_env.data_dir, PathBuf::from("/srv/board"));
        assert_eq!(from_env.log_level, "debug");

        let overrides = ConfigOverrides {
            data_dir: Some("/tmp/flag".into()),
            state_file: Some("/tmp/flag/state.json".into()),
            log_level: Some("warn".into()),
        };
        let from_flags = Config::resolve_with(overrides, &env).unwrap();
        assert_eq!(from_flags.data_dir, PathBuf::from("/tmp/flag"));
        assert_eq!(from_flags.log_level, "warn");
        assert_eq!(from_flags.state_file, Some(PathBuf::from("/tmp/flag/state.json")));
    }

    #[test]
    fn missing_home_without_override_is_a_config_error() {
        let err = Config::resolve_with(ConfigOverrides::default(), env_of(&[])).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn data_dir_is_created_on_demand() {
        let tmp = TempDir::new().unwrap();
        let overrides = ConfigOverrides {
            data_dir: Some(tmp.path().join("a").join("b")),
            ..Default::default()
        };
        let config = Config::resolve_with(overrides, env_of(&[])).unwrap();
        assert!(!config.data_dir.exists());
        config.ensure_data_dir().unwrap();
        assert!(config.data_dir.is_dir());
    }
}
