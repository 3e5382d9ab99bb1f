use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;
use crate::config::{ConfigOverrides, DIR_ENV, LOG_ENV};

/// Project and task dashboard for the terminal.
/// Without --state the demo workspace is used and changes last for one run.
#[derive(Parser)]
#[command(name = "taskboard", version, about = "Project and task dashboard")]
pub struct Cli {
    /// Directory for the session and the TUI log (default: ~/.taskboard).
    #[arg(long, global = true, env = DIR_ENV)]
    pub data_dir: Option<PathBuf>,

    /// JSON file holding the project collection between runs.
    #[arg(long, global = true)]
    pub state: Option<PathBuf>,

    /// Log filter, e.g. "debug" or "warn".
    #[arg(long, global = true, env = LOG_ENV)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            data_dir: self.data_dir.clone(),
            state_file: self.state.clone(),
            log_level: self.log_level.clone(),
        }
    }
}
