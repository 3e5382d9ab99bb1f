//! Command implementations for the CLI interface.
//!
//! Each handler works on a [`Workspace`], prints plain tables to stdout and
//! returns errors to `main`. Handlers that change the collection finish with
//! [`save`], which writes the snapshot when `--state` was given.

use chrono::{Datelike, Local, NaiveDate};
use clap::{Args, Subcommand};
use clap_complete::{generate, Shell};
use tracing::warn;

use crate::auth::{validate_credentials, validate_registration};
use crate::board::{apply_drop, Board, DragState};
use crate::calendar::{month_grid, CalendarIndex};
use crate::display::{format_due_long, format_due_relative, parse_due_input, truncate};
use crate::error::{AppError, AppResult};
use crate::fields::{Priority, Status};
use crate::project::{NewProject, Project, ProjectPatch};
use crate::store::{Outcome, StoreEvent};
use crate::summary::{project_progress, sorted_tasks, DashboardStats};
use crate::task::{NewTask, Task, TaskPatch};
use crate::team::{assignee_label, demo_team};
use crate::tui::project_form::validate_project_input;
use crate::tui::run::run_tui;
use crate::workspace::Workspace;

#[derive(Subcommand)]
pub enum Commands {
    /// Launch the terminal dashboard.
    Ui,

    /// Log in with a demo account.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },

    /// Create an account and log it in.
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },

    /// End the saved session.
    Logout,

    /// Show the logged-in user.
    Whoami,

    /// List projects with progress.
    Projects,

    /// Create, update, delete or show a project.
    Project {
        #[command(subcommand)]
        action: ProjectAction,
    },

    /// Create, update, move or delete a task.
    Task {
        #[command(subcommand)]
        action: TaskAction,
    },

    /// Show a project's kanban board.
    Board {
        /// Project id or name.
        project: String,
    },

    /// Show a month calendar and the tasks due on one day.
    Calendar {
        /// Day to show: YYYY-MM-DD, "today", "fri", "in 3d". Defaults to today.
        #[arg(long)]
        date: Option<String>,
    },

    /// List every task, highest priority and soonest due first.
    Tasks,

    /// Dashboard counters.
    Stats,

    /// List the team roster.
    Team,

    /// Generate shell completions.
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum ProjectAction {
    /// Create a project owned by the logged-in user.
    Add {
        name: String,
        #[arg(long)]
        desc: String,
        /// Member user id. May be repeated; the creator is always a member.
        #[arg(long = "member")]
        members: Vec<String>,
    },
    /// Change name, description or members.
    Update {
        /// Project id or name.
        project: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        desc: Option<String>,
        /// Replace the member list. May be repeated.
        #[arg(long = "member")]
        members: Vec<String>,
    },
    /// Delete a project and all of its tasks.
    Delete {
        /// Project id or name.
        project: String,
    },
    /// Show a project and its tasks.
    Show {
        /// Project id or name.
        project: String,
    },
}

/// Fields shared by `task add` and `task update`.
#[derive(Args)]
pub struct TaskFields {
    #[arg(long)]
    desc: Option<String>,
    #[arg(long, value_enum)]
    status: Option<Status>,
    #[arg(long, value_enum)]
    priority: Option<Priority>,
    /// Assignee user id.
    #[arg(long)]
    assignee: Option<String>,
    /// Due date: YYYY-MM-DD, "today", "tomorrow", "fri", or "in Nd".
    #[arg(long)]
    due: Option<String>,
}

#[derive(Subcommand)]
pub enum TaskAction {
    /// Add a task to a project.
    Add {
        /// Project id or name.
        project: String,
        title: String,
        #[command(flatten)]
        fields: TaskFields,
    },
    /// Update fields on a task.
    Update {
        /// Project id or name.
        project: String,
        /// Task id or title.
        task: String,
        #[arg(long)]
        title: Option<String>,
        #[command(flatten)]
        fields: TaskFields,
        #[arg(long, conflicts_with = "assignee")]
        clear_assignee: bool,
        #[arg(long, conflicts_with = "due")]
        clear_due: bool,
    },
    /// Move a task to another board column.
    Move {
        /// Project id or name.
        project: String,
        /// Task id or title.
        task: String,
        #[arg(value_enum)]
        status: Status,
    },
    /// Delete a task.
    Delete {
        /// Project id or name.
        project: String,
        /// Task id or title.
        task: String,
    },
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Persist the collection, or warn that the change lives only in this run.
fn save(ws: &Workspace) -> AppResult<()> {
    if !ws.commit()? {
        warn!("no --state file given; the change will not outlive this command");
    }
    Ok(())
}

fn required(value: &str, what: &str) -> AppResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::validation(format!("{what} is required")));
    }
    Ok(value.to_string())
}

fn parse_due(input: &str) -> AppResult<NaiveDate> {
    parse_due_input(input, today())
        .ok_or_else(|| AppError::validation(format!("unrecognised due date '{input}'")))
}

/// Resolve a project by exact id, then by case-insensitive name.
pub fn resolve_project<'a>(projects: &'a [Project], ident: &str) -> AppResult<&'a Project> {
    projects
        .iter()
        .find(|p| p.id == ident)
        .or_else(|| projects.iter().find(|p| p.name.eq_ignore_ascii_case(ident)))
        .ok_or_else(|| AppError::ProjectNotFound(ident.to_string()))
}

/// Resolve a task within a project by exact id, then by case-insensitive title.
pub fn resolve_task<'a>(project: &'a Project, ident: &str) -> AppResult<&'a Task> {
    project
        .task(ident)
        .or_else(|| project.tasks.iter().find(|t| t.title.eq_ignore_ascii_case(ident)))
        .ok_or_else(|| AppError::TaskNotFound(ident.to_string()))
}

fn ids_for(ws: &Workspace, project: &str, task: &str) -> AppResult<(String, String)> {
    let p = resolve_project(ws.store.projects(), project)?;
    let t = resolve_task(p, task)?;
    Ok((p.id.clone(), t.id.clone()))
}

fn report(outcome: Outcome, what: &str) -> AppResult<()> {
    match outcome {
        Outcome::Applied => Ok(()),
        Outcome::NotFound => Err(AppError::TaskNotFound(what.to_string())),
    }
}

/// Print store confirmations as they happen.
fn echo_events(ws: &mut Workspace) {
    ws.store.subscribe(|event: &StoreEvent, _| println!("{}", event.message()));
}

/// Launch the terminal dashboard.
pub fn cmd_ui(ws: Workspace) -> AppResult<()> {
    run_tui(ws)
}

pub fn cmd_login(ws: &Workspace, email: String, password: String) -> AppResult<()> {
    validate_credentials(&email, &password)?;
    let mut auth = ws.auth()?;
    let event = auth.login(email.trim(), &password)?;
    println!("{}", event.message());
    Ok(())
}

pub fn cmd_register(ws: &Workspace, name: String, email: String, password: String) -> AppResult<()> {
    validate_registration(&name, &email, &password)?;
    let mut auth = ws.auth()?;
    let event = auth.register(name.trim(), email.trim(), &password)?;
    println!("{}", event.message());
    Ok(())
}

pub fn cmd_logout(ws: &Workspace) -> AppResult<()> {
    let mut auth = ws.auth()?;
    println!("{}", auth.logout()?.message());
    Ok(())
}

pub fn cmd_whoami(ws: &Workspace) -> AppResult<()> {
    let user = ws.require_user()?;
    println!("{} <{}> ({}, {})", user.name, user.email, user.id, user.role);
    Ok(())
}

/// List all projects with their task counts and progress.
pub fn cmd_projects(ws: &Workspace) {
    println!("{:<8} {:<24} {:<7} {:<6} {}", "ID", "Name", "Tasks", "Done", "Progress");
    for p in ws.store.projects() {
        println!(
            "{:<8} {:<24} {:<7} {:<6} {}%",
            p.id,
            truncate(&p.name, 24),
            p.tasks.len(),
            p.completed_count(),
            project_progress(p)
        );
    }
}

pub fn cmd_project(ws: &mut Workspace, action: ProjectAction) -> AppResult<()> {
    match action {
        ProjectAction::Add { name, desc, members } => {
            let user = ws.require_user()?;
            let (name, desc) = validate_project_input(&name, &desc)?;
            let mut input = NewProject::new(name, desc, user.id);
            for m in members {
                if !input.members.contains(&m) {
                    input.members.push(m);
                }
            }
            echo_events(ws);
            let id = ws.store.create_project(input);
            save(ws)?;
            println!("Added project {id}");
        }
        ProjectAction::Update { project, name, desc, members } => {
            ws.require_user()?;
            let existing = resolve_project(ws.store.projects(), &project)?;
            let id = existing.id.clone();
            let (checked_name, checked_desc) = validate_project_input(
                name.as_deref().unwrap_or(&existing.name),
                desc.as_deref().unwrap_or(&existing.description),
            )?;
            let patch = ProjectPatch {
                name: name.map(|_| checked_name),
                description: desc.map(|_| checked_desc),
                members: (!members.is_empty()).then_some(members),
            };
            if patch == ProjectPatch::default() {
                println!("Nothing to update.");
                return Ok(());
            }
            echo_events(ws);
            if ws.store.update_project(&id, patch) == Outcome::NotFound {
                return Err(AppError::ProjectNotFound(id));
            }
            save(ws)?;
        }
        ProjectAction::Delete { project } => {
            ws.require_user()?;
            let id = resolve_project(ws.store.projects(), &project)?.id.clone();
            echo_events(ws);
            if ws.store.delete_project(&id) == Outcome::NotFound {
                return Err(AppError::ProjectNotFound(id));
            }
            save(ws)?;
        }
        ProjectAction::Show { project } => {
            let p = resolve_project(ws.store.projects(), &project)?;
            print_project(p);
        }
    }
    Ok(())
}

fn print_project(p: &Project) {
    println!("ID:          {}", p.id);
    println!("Name:        {}", p.name);
    if !p.description.is_empty() {
        println!("Description: {}", p.description);
    }
    println!("Members:     {}", p.members.join(", "));
    println!("Created:     {} by {}", p.created_at.format("%Y-%m-%d"), p.created_by);
    println!("Progress:    {}% ({}/{})", project_progress(p), p.completed_count(), p.tasks.len());
    println!();
    print_task_table(p.tasks.iter().map(|t| (p.name.as_str(), t)));
}

fn print_task_table<'a>(rows: impl Iterator<Item = (&'a str, &'a Task)>) {
    let team = demo_team();
    let today = today();
    println!(
        "{:<8} {:<12} {:<8} {:<10} {:<16} {:<18} {}",
        "ID", "Status", "Pri", "Due", "Assignee", "Project", "Title"
    );
    for (project, t) in rows {
        println!(
            "{:<8} {:<12} {:<8} {:<10} {:<16} {:<18} {}",
            t.id,
            t.status,
            t.priority,
            format_due_relative(t.due_date, today),
            truncate(&assignee_label(t.assignee_id.as_deref(), &team), 16),
            truncate(project, 18),
            t.title
        );
    }
}

pub fn cmd_task(ws: &mut Workspace, action: TaskAction) -> AppResult<()> {
    let user = ws.require_user()?;
    match action {
        TaskAction::Add { project, title, fields } => {
            let project_id = resolve_project(ws.store.projects(), &project)?.id.clone();
            let mut input = NewTask::new(
                required(&title, "Title")?,
                fields.desc.unwrap_or_default(),
                user.id,
            )
            .with_assignee(fields.assignee)
            .with_due(fields.due.as_deref().map(parse_due).transpose()?);
            if let Some(s) = fields.status {
                input = input.with_status(s);
            }
            if let Some(p) = fields.priority {
                input = input.with_priority(p);
            }
            echo_events(ws);
            let id = ws
                .store
                .create_task(&project_id, input)
                .ok_or(AppError::ProjectNotFound(project_id))?;
            save(ws)?;
            println!("Added task {id}");
        }
        TaskAction::Update { project, task, title, fields, clear_assignee, clear_due } => {
            let (project_id, task_id) = ids_for(ws, &project, &task)?;
            let patch = TaskPatch {
                title: title.as_deref().map(|t| required(t, "Title")).transpose()?,
                description: fields.desc,
                status: fields.status,
                priority: fields.priority,
                assignee_id: if clear_assignee { Some(None) } else { fields.assignee.map(Some) },
                due_date: if clear_due {
                    Some(None)
                } else {
                    fields.due.as_deref().map(parse_due).transpose()?.map(Some)
                },
            };
            if patch.is_empty() {
                println!("Nothing to update.");
                return Ok(());
            }
            echo_events(ws);
            report(ws.store.update_task(&project_id, &task_id, patch), &task_id)?;
            save(ws)?;
        }
        TaskAction::Move { project, task, status } => {
            let (project_id, task_id) = ids_for(ws, &project, &task)?;
            let drag = match ws.store.task(&project_id, &task_id) {
                Some(t) => DragState::pick_up(t),
                None => return Err(AppError::TaskNotFound(task_id)),
            };
            echo_events(ws);
            match apply_drop(&mut ws.store, &project_id, &drag, status) {
                None => println!("Task is already in {status}."),
                Some(outcome) => {
                    report(outcome, &task_id)?;
                    save(ws)?;
                }
            }
        }
        TaskAction::Delete { project, task } => {
            let (project_id, task_id) = ids_for(ws, &project, &task)?;
            echo_events(ws);
            report(ws.store.delete_task(&project_id, &task_id), &task_id)?;
            save(ws)?;
        }
    }
    Ok(())
}

/// Print a project's board one column after another.
pub fn cmd_board(ws: &Workspace, project: String) -> AppResult<()> {
    let p = resolve_project(ws.store.projects(), &project)?;
    let team = demo_team();
    let board = Board::for_project(p);
    println!("{} ({} tasks)", p.name, board.total());
    for column in &board.columns {
        println!();
        println!("{} ({})", column.title(), column.len());
        if column.is_empty() {
            println!("  No tasks");
        }
        for t in &column.tasks {
            println!(
                "  {:<8} [{:<6}] {} - {}, {}",
                t.id,
                t.priority,
                t.title,
                assignee_label(t.assignee_id.as_deref(), &team),
                format_due_long(t.due_date)
            );
        }
    }
    Ok(())
}

pub fn cmd_calendar(ws: &Workspace, date: Option<String>) -> AppResult<()> {
    let day = match date {
        Some(d) => parse_due(&d)?,
        None => today(),
    };
    let index = CalendarIndex::build(ws.store.projects());

    println!("{:^28}", day.format("%B %Y").to_string());
    println!(" Mo  Tu  We  Th  Fr  Sa  Su");
    for week in month_grid(day) {
        let line: String = week
            .iter()
            .map(|cell| match cell {
                None => "    ".to_string(),
                Some(d) => {
                    let mark = if *d == day {
                        '<'
                    } else if index.has_tasks(*d) {
                        '*'
                    } else {
                        ' '
                    };
                    format!("{:>3}{}", d.day(), mark)
                }
            })
            .collect();
        println!("{}", line.trim_end());
    }

    println!();
    println!("Tasks due {}", day.format("%A, %B %-d, %Y"));
    let entries = index.tasks_on(day);
    if entries.is_empty() {
        println!("  No tasks due on this day");
    }
    for e in entries {
        println!("  {:<8} {:<12} {:<8} {} ({})", e.task.id, e.task.status, e.task.priority, e.task.title, e.project_name);
    }
    Ok(())
}

/// Every task across projects in priority/due order.
pub fn cmd_tasks(ws: &Workspace) {
    let rows = sorted_tasks(ws.store.projects());
    if rows.is_empty() {
        println!("No tasks.");
        return;
    }
    print_task_table(rows.into_iter().map(|r| (r.project_name, r.task)));
}

pub fn cmd_stats(ws: &Workspace) {
    let stats = DashboardStats::from_projects(ws.store.projects());
    println!("{:<16} {}", "Total tasks", stats.total);
    println!("{:<16} {}", "Completed", stats.completed);
    println!("{:<16} {}", "Pending", stats.pending);
    println!("{:<16} {}", "High priority", stats.high_priority);
    println!();
    for s in Status::ALL {
        println!("{:<16} {}", s.to_string(), stats.by_status.get(s));
    }
}

pub fn cmd_team() {
    println!("{:<8} {:<16} {:<22} {:<8} {}", "ID", "Name", "Email", "Role", "Department");
    for m in demo_team() {
        println!(
            "{:<8} {:<16} {:<22} {:<8} {}",
            m.id,
            m.name,
            m.email,
            m.role.to_string(),
            m.department
        );
    }
}

/// Generate shell completion scripts.
pub fn cmd_completions(shell: Shell) {
    use crate::cli::Cli;
    use clap::CommandFactory;

    let mut app = Cli::command();
    let app_name = app.get_name().to_string();
    generate(shell, &mut app, app_name, &mut std::io::stdout());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::demo_projects;

    #[test]
    fn resolves_projects_by_id_or_name() {
        let projects = demo_projects();
        assert_eq!(resolve_project(&projects, "proj1").unwrap().id, "proj1");
        assert_eq!(resolve_project(&projects, "diwali festival app").unwrap().id, "proj1");
        assert!(matches!(
            resolve_project(&projects, "proj9"),
            Err(AppError::ProjectNotFound(_))
        ));
    }

    #[test]
    fn resolves_tasks_by_id_or_title() {
        let projects = demo_projects();
        let p = &projects[0];
        assert_eq!(resolve_task(p, "task2").unwrap().id, "task2");
        let by_title = resolve_task(p, &p.tasks[2].title.to_uppercase()).unwrap();
        assert_eq!(by_title.id, "task3");
        assert!(matches!(resolve_task(p, "nope"), Err(AppError::TaskNotFound(_))));
    }

    #[test]
    fn blank_required_text_is_rejected() {
        assert_eq!(required("  Launch  ", "Title").unwrap(), "Launch");
        let err = required("   ", "Title").unwrap_err();
        assert_eq!(err.to_string(), "Validation error: Title is required");
    }

    fn signed_in(dir: &tempfile::TempDir) -> Workspace {
        let config = crate::config::Config {
            data_dir: dir.path().to_path_buf(),
            state_file: None,
            log_level: "info".into(),
        };
        let ws = Workspace::open(config).unwrap();
        ws.auth().unwrap().login(crate::auth::DEMO_EMAIL, crate::auth::DEMO_PASSWORD).unwrap();
        ws
    }

    #[test]
    fn project_add_and_update_check_the_description() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut ws = signed_in(&dir);

        let add = |desc: &str| ProjectAction::Add {
            name: "Holi Planner".into(),
            desc: desc.into(),
            members: vec![],
        };
        assert!(matches!(cmd_project(&mut ws, add("")), Err(AppError::Validation(_))));
        assert!(matches!(cmd_project(&mut ws, add("colours")), Err(AppError::Validation(_))));
        assert_eq!(ws.store.projects().len(), 1);

        cmd_project(&mut ws, add("Colours and water balloons")).unwrap();
        assert_eq!(ws.store.projects()[1].description, "Colours and water balloons");

        let update = ProjectAction::Update {
            project: "proj2".into(),
            name: Some("Ho".into()),
            desc: None,
            members: vec![],
        };
        let err = cmd_project(&mut ws, update).unwrap_err();
        assert_eq!(err.to_string(), "Validation error: Project name must be at least 3 characters");
        assert_eq!(ws.store.projects()[1].name, "Holi Planner");
    }

    #[test]
    fn register_rejects_one_letter_names() {
        let dir = tempfile::TempDir::new().unwrap();
        let ws = signed_in(&dir);
        let err = cmd_register(&ws, "A".into(), "a@b.co".into(), "password123".into()).unwrap_err();
        assert_eq!(err.to_string(), "Validation error: Name must be at least 2 characters");
        assert_eq!(ws.require_user().unwrap().id, "user1");
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        crate::cli::Cli::command().debug_assert();
    }
}
