//! # taskboard - project and task dashboard
//!
//! Manage projects and their tasks from the command line or a terminal
//! dashboard with a kanban board, a sorted task table and a due-date calendar.
//!
//! ## Quick Start
//!
//! ```bash
//! # Log in with a demo account
//! taskboard login --email arjun@example.com --password password123
//!
//! # Open the dashboard, keeping changes in a state file
//! taskboard --state ~/.taskboard/state.json ui
//!
//! # Add a task and move it across the board
//! taskboard --state ~/.taskboard/state.json task add proj1 "Ship build" --priority high --due fri
//! taskboard --state ~/.taskboard/state.json task move proj1 "Ship build" in-progress
//! ```
//!
//! ## Key Commands
//!
//! - `taskboard ui` - Terminal dashboard
//! - `taskboard projects` / `taskboard project add <name> --desc <text>` - Project management
//! - `taskboard task add|update|move|delete` - Task management
//! - `taskboard board <project>` - Kanban columns for one project
//! - `taskboard calendar --date <day>` - Month view and tasks due that day
//! - `taskboard tasks` / `taskboard stats` - Global table and counters
//!
//! The session lives in `~/.taskboard/` (override with `--data-dir` or
//! `TASKBOARD_DIR`). Without `--state`, commands run against the demo
//! workspace and changes are discarded when the command exits.

use clap::Parser;

pub mod auth;
pub mod board;
pub mod calendar;
pub mod cli;
pub mod cmd;
pub mod config;
pub mod display;
pub mod error;
pub mod fields;
pub mod ids;
pub mod logging;
pub mod project;
pub mod seed;
pub mod snapshot;
pub mod store;
pub mod summary;
pub mod task;
pub mod team;
pub mod workspace;
pub mod tui {
    pub mod app;
    pub mod board;
    pub mod calendar;
    pub mod colors;
    pub mod dashboard;
    pub mod enums;
    pub mod input;
    pub mod login;
    pub mod project_form;
    pub mod run;
    pub mod task_form;
    pub mod utils;
}

use cli::Cli;
use cmd::*;
use config::Config;
use error::AppResult;
use logging::{init_tracing, LogTarget};
use workspace::Workspace;

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> AppResult<()> {
    let config = Config::resolve(cli.overrides())?;

    // The TUI owns the terminal, so its logs go to a file.
    let target = match cli.command {
        Commands::Ui => LogTarget::File,
        _ => LogTarget::Stderr,
    };
    init_tracing(&config, target)?;

    if let Commands::Completions { shell } = cli.command {
        cmd_completions(shell);
        return Ok(());
    }
    if let Commands::Team = cli.command {
        cmd_team();
        return Ok(());
    }

    let mut ws = Workspace::open(config)?;

    match cli.command {
        Commands::Ui => cmd_ui(ws)?,
        Commands::Login { email, password } => cmd_login(&ws, email, password)?,
        Commands::Register { name, email, password } => cmd_register(&ws, name, email, password)?,
        Commands::Logout => cmd_logout(&ws)?,
        Commands::Whoami => cmd_whoami(&ws)?,
        Commands::Projects => cmd_projects(&ws),
        Commands::Project { action } => cmd_project(&mut ws, action)?,
        Commands::Task { action } => cmd_task(&mut ws, action)?,
        Commands::Board { project } => cmd_board(&ws, project)?,
        Commands::Calendar { date } => cmd_calendar(&ws, date)?,
        Commands::Tasks => cmd_tasks(&ws),
        Commands::Stats => cmd_stats(&ws),
        Commands::Team | Commands::Completions { .. } => unreachable!("handled above"),
    }
    Ok(())
}
