//! Main application logic for the terminal user interface.
//!
//! This module contains the `App` struct which manages the TUI state,
//! handles user input, renders the interface, and coordinates between the
//! login screen, the tabs, the forms and the confirmation dialog.
//!
//! All changes go through the workspace's `ProjectStore`. The app listens to
//! store events: each one becomes the status bar message and triggers a
//! snapshot write when a state file is configured.

use std::cell::RefCell;
use std::io;
use std::rc::Rc;
use std::time::Duration;

use chrono::{Local, NaiveDate};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, TableState, Tabs, Wrap},
    Frame, Terminal,
};
use tracing::{debug, error, info};

use crate::auth::{AuthService, FileSessionStore};
use crate::board::Board;
use crate::calendar::CalendarIndex;
use crate::error::AppResult;
use crate::store::{Outcome, StoreEvent, SubscriptionId};
use crate::summary::sorted_tasks;
use crate::team::{demo_team, TeamMember};
use crate::tui::{
    board::BoardView,
    calendar::CalendarView,
    colors::{DARK_PURPLE, DARK_RED, GOLD},
    dashboard::{render_dashboard, render_task_table, render_team},
    enums::{AppState, ConfirmAction, Tab},
    login::{Credentials, LoginForm},
    project_form::ProjectForm,
    task_form::{TaskForm, ASSIGNEE_FIELD, DESCRIPTION_FIELD, DUE_FIELD, PRIORITY_FIELD, STATUS_FIELD, TITLE_FIELD},
    utils::centered_rect,
};
use crate::workspace::Workspace;

/// Main application state for the terminal user interface.
pub struct App {
    ws: Workspace,
    auth: AuthService<FileSessionStore>,
    team: Vec<TeamMember>,
    state: AppState,
    tab: Tab,
    login: LoginForm,
    project_form: ProjectForm,
    task_form: TaskForm,
    board: BoardView,
    calendar: CalendarView,
    task_table: TableState,
    project_cursor: usize,
    confirm: Option<ConfirmAction>,
    status_message: String,
    events: Rc<RefCell<Vec<StoreEvent>>>,
    subscription: SubscriptionId,
    today: NaiveDate,
}

impl App {
    /// Create the app over a workspace, restoring any saved session.
    pub fn new(mut ws: Workspace) -> AppResult<Self> {
        let auth = ws.auth()?;
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        let subscription = ws.store.subscribe(move |event, _| sink.borrow_mut().push(event.clone()));

        let first = ws.store.projects().first().map(|p| p.id.clone());
        ws.store.select_project(first.as_deref());

        let state = if auth.is_authenticated() { AppState::Browse } else { AppState::Login };
        let today = Local::now().date_naive();
        let team = demo_team();
        Ok(App {
            ws,
            auth,
            task_form: TaskForm::new("", &team),
            team,
            state,
            tab: Tab::Dashboard,
            login: LoginForm::new(),
            project_form: ProjectForm::new(),
            board: BoardView::new(),
            calendar: CalendarView::new(today),
            task_table: TableState::default(),
            project_cursor: 0,
            confirm: None,
            status_message: String::new(),
            events,
            subscription,
            today,
        })
    }

    /// Hand the workspace back, e.g. for a final save.
    pub fn into_workspace(mut self) -> Workspace {
        self.ws.store.unsubscribe(self.subscription);
        self.ws
    }

    fn set_status_message(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
    }

    fn clear_status_message(&mut self) {
        self.status_message.clear();
    }

    /// Turn queued store events into a status message and persist.
    fn after_change(&mut self) {
        let events: Vec<StoreEvent> = self.events.borrow_mut().drain(..).collect();
        let Some(last) = events.last() else { return };
        self.set_status_message(last.message());

        let project_count = self.ws.store.projects().len();
        if self.project_cursor >= project_count {
            self.project_cursor = project_count.saturating_sub(1);
        }
        if self.ws.store.current_project().is_none() {
            self.board.reset();
        }

        match self.ws.commit() {
            Ok(true) => debug!(events = events.len(), "workspace saved"),
            Ok(false) => {}
            Err(e) => {
                error!(error = %e, "failed to save workspace");
                self.set_status_message(format!("Error saving: {e}"));
            }
        }
    }

    fn user_id(&self) -> Option<String> {
        self.auth.current_user().map(|u| u.id.clone())
    }

    fn current_project_id(&self) -> Option<String> {
        self.ws.store.current_project_id().map(str::to_string)
    }

    // --- input -----------------------------------------------------------

    /// Handle one key press. Returns true when the app should quit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.kind != KeyEventKind::Press {
            return false;
        }
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return true;
        }
        match self.state {
            AppState::Login => self.handle_login_input(key),
            AppState::Browse => self.handle_browse_input(key),
            AppState::TaskDetail => {
                self.handle_detail_input(key.code);
                false
            }
            AppState::AddProject | AppState::EditProject => {
                self.handle_project_form_input(key.code);
                false
            }
            AppState::AddTask | AppState::EditTask => {
                self.handle_task_form_input(key.code);
                false
            }
            AppState::Confirm => {
                self.handle_confirm_input(key.code);
                false
            }
            AppState::Help => {
                self.state = AppState::Browse;
                false
            }
        }
    }

    fn handle_input(&mut self) -> io::Result<bool> {
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                return Ok(self.handle_key(key));
            }
        }
        Ok(false)
    }

    fn handle_login_input(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Esc => return true,
            KeyCode::Char('r') if key.modifiers.contains(KeyModifiers::CONTROL) => self.login.toggle_mode(),
            KeyCode::Tab | KeyCode::Down => self.login.next_field(),
            KeyCode::BackTab | KeyCode::Up => self.login.prev_field(),
            KeyCode::Left => self.login.active_input().move_cursor_left(),
            KeyCode::Right => self.login.active_input().move_cursor_right(),
            KeyCode::Backspace => self.login.active_input().handle_backspace(),
            KeyCode::Delete => self.login.active_input().handle_delete(),
            KeyCode::Enter => self.submit_login(),
            KeyCode::Char(c) => self.login.active_input().handle_char(c),
            _ => {}
        }
        false
    }

    fn submit_login(&mut self) {
        let result = self.login.submit().and_then(|creds| match creds {
            Credentials::SignIn { email, password } => self.auth.login(&email, &password),
            Credentials::Register { name, email, password } => self.auth.register(&name, &email, &password),
        });
        match result {
            Ok(event) => {
                self.login = LoginForm::new();
                self.state = AppState::Browse;
                self.tab = Tab::Dashboard;
                self.set_status_message(event.message());
            }
            Err(e) => self.login.error = Some(e.to_string()),
        }
    }

    fn logout(&mut self) {
        match self.auth.logout() {
            Ok(event) => {
                info!("logged out from dashboard");
                self.state = AppState::Login;
                self.login = LoginForm::new();
                self.set_status_message(event.message());
            }
            Err(e) => self.set_status_message(format!("Error: {e}")),
        }
    }

    fn handle_browse_input(&mut self, key: KeyEvent) -> bool {
        self.clear_status_message();

        // a carried card swallows Esc before anything else
        if self.tab == Tab::Board && self.board.carrying.is_some() && key.code == KeyCode::Esc {
            self.board.cancel_drag();
            self.set_status_message("Move cancelled");
            return false;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Tab => self.tab = self.tab.next(),
            KeyCode::BackTab => self.tab = self.tab.prev(),
            KeyCode::Char(c @ '1'..='5') => {
                let i = c as usize - '1' as usize;
                self.tab = Tab::ALL[i];
            }
            KeyCode::Char('?') => self.state = AppState::Help,
            KeyCode::Char('L') => self.logout(),
            _ => match self.tab {
                Tab::Dashboard => self.handle_dashboard_input(key.code),
                Tab::Board => self.handle_board_input(key.code),
                Tab::Tasks => self.handle_tasks_input(key.code),
                Tab::Calendar => self.handle_calendar_input(key.code),
                Tab::Team => {}
            },
        }
        false
    }

    fn handle_dashboard_input(&mut self, code: KeyCode) {
        let count = self.ws.store.projects().len();
        match code {
            KeyCode::Up => self.project_cursor = self.project_cursor.saturating_sub(1),
            KeyCode::Down => {
                if self.project_cursor + 1 < count {
                    self.project_cursor += 1;
                }
            }
            KeyCode::Enter => {
                let Some(id) = self.ws.store.projects().get(self.project_cursor).map(|p| p.id.clone()) else {
                    return;
                };
                self.ws.store.select_project(Some(&id));
                self.board.reset();
                self.tab = Tab::Board;
            }
            KeyCode::Char('n') => {
                self.project_form = ProjectForm::new();
                self.state = AppState::AddProject;
            }
            KeyCode::Char('e') => {
                if let Some(p) = self.ws.store.projects().get(self.project_cursor) {
                    self.project_form = ProjectForm::from_project(p);
                    self.state = AppState::EditProject;
                }
            }
            KeyCode::Char('d') => {
                if let Some(p) = self.ws.store.projects().get(self.project_cursor) {
                    self.confirm = Some(ConfirmAction::DeleteProject {
                        project_id: p.id.clone(),
                        name: p.name.clone(),
                    });
                    self.state = AppState::Confirm;
                }
            }
            _ => {}
        }
    }

    fn handle_board_input(&mut self, code: KeyCode) {
        let Some(project_id) = self.current_project_id() else {
            if code == KeyCode::Char('n') {
                self.set_status_message("Select a project on the Dashboard first");
            }
            return;
        };

        match code {
            KeyCode::Char(' ') => {
                if self.board.carrying.is_some() {
                    match self.board.drop_card(&mut self.ws.store, &project_id) {
                        Some(Outcome::NotFound) => self.set_status_message("Task no longer exists"),
                        Some(Outcome::Applied) => self.after_change(),
                        None => self.set_status_message("Card put back"),
                    }
                } else {
                    let picked = match self.ws.store.current_project() {
                        Some(project) => self.board.pick_up(&Board::for_project(project)),
                        None => false,
                    };
                    if picked {
                        self.set_status_message("Moving card: ←/→ to choose a column, Space to drop, Esc to cancel");
                    }
                }
            }
            KeyCode::Enter => {
                if let Some(project) = self.ws.store.current_project() {
                    if self.board.selected_task(&Board::for_project(project)).is_some() {
                        self.board.show_detail = true;
                        self.state = AppState::TaskDetail;
                    }
                }
            }
            KeyCode::Char('n') => {
                self.task_form = TaskForm::for_status(&project_id, self.board.selected_status(), &self.team);
                self.state = AppState::AddTask;
            }
            KeyCode::Char('e') => self.edit_board_selection(&project_id),
            KeyCode::Char('d') => {
                if let Some(project) = self.ws.store.current_project() {
                    if let Some(task) = self.board.selected_task(&Board::for_project(project)) {
                        self.confirm = Some(ConfirmAction::DeleteTask {
                            project_id: project_id.clone(),
                            task_id: task.id.clone(),
                            title: task.title.clone(),
                        });
                        self.state = AppState::Confirm;
                    }
                }
            }
            KeyCode::Left | KeyCode::Right | KeyCode::Up | KeyCode::Down => {
                if let Some(project) = self.ws.store.current_project() {
                    let board = Board::for_project(project);
                    match code {
                        KeyCode::Left => self.board.move_left(&board),
                        KeyCode::Right => self.board.move_right(&board),
                        KeyCode::Up => self.board.move_up(),
                        _ => self.board.move_down(&board),
                    }
                }
            }
            _ => {}
        }
    }

    fn edit_board_selection(&mut self, project_id: &str) {
        let Some(project) = self.ws.store.current_project() else { return };
        if let Some(task) = self.board.selected_task(&Board::for_project(project)) {
            self.task_form = TaskForm::from_task(project_id, task, &self.team);
            self.board.show_detail = false;
            self.state = AppState::EditTask;
        }
    }

    fn handle_detail_input(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('e') => {
                if let Some(id) = self.current_project_id() {
                    self.edit_board_selection(&id);
                }
            }
            KeyCode::Enter | KeyCode::Esc => {
                self.board.show_detail = false;
                self.state = AppState::Browse;
            }
            _ => {}
        }
    }

    fn handle_tasks_input(&mut self, code: KeyCode) {
        let rows = sorted_tasks(self.ws.store.projects());
        let selected = self.task_table.selected().unwrap_or(0);
        match code {
            KeyCode::Up => self.task_table.select(Some(selected.saturating_sub(1))),
            KeyCode::Down => {
                if selected + 1 < rows.len() {
                    self.task_table.select(Some(selected + 1));
                }
            }
            KeyCode::Char('e') | KeyCode::Enter => {
                if let Some(row) = rows.get(selected) {
                    self.task_form = TaskForm::from_task(row.project_id, row.task, &self.team);
                    self.state = AppState::EditTask;
                }
            }
            KeyCode::Char('d') => {
                if let Some(row) = rows.get(selected) {
                    self.confirm = Some(ConfirmAction::DeleteTask {
                        project_id: row.project_id.to_string(),
                        task_id: row.task.id.clone(),
                        title: row.task.title.clone(),
                    });
                    self.state = AppState::Confirm;
                }
            }
            _ => {}
        }
    }

    fn handle_calendar_input(&mut self, code: KeyCode) {
        let index = CalendarIndex::build(self.ws.store.projects());
        match code {
            KeyCode::Left => self.calendar.shift_days(-1),
            KeyCode::Right => self.calendar.shift_days(1),
            KeyCode::Up => self.calendar.shift_days(-7),
            KeyCode::Down => self.calendar.shift_days(7),
            KeyCode::Char('[') => self.calendar.shift_months(false),
            KeyCode::Char(']') => self.calendar.shift_months(true),
            KeyCode::Char('t') => self.calendar = CalendarView::new(self.today),
            KeyCode::Char('n') => {
                if !self.calendar.next_busy_day(&index) {
                    self.status_message = "No later due dates".into();
                }
            }
            KeyCode::Char('p') => {
                if !self.calendar.prev_busy_day(&index) {
                    self.status_message = "No earlier due dates".into();
                }
            }
            KeyCode::Char('j') => self.calendar.next_entry(&index),
            KeyCode::Char('k') => self.calendar.prev_entry(),
            KeyCode::Char('e') | KeyCode::Enter => {
                if let Some(entry) = self.calendar.entry_under_cursor(&index) {
                    self.task_form = TaskForm::from_task(entry.project_id, entry.task, &self.team);
                    self.state = AppState::EditTask;
                }
            }
            _ => {}
        }
    }

    fn handle_project_form_input(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => self.state = AppState::Browse,
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => self.project_form.toggle_field(),
            KeyCode::Left => self.project_form.active_input().move_cursor_left(),
            KeyCode::Right => self.project_form.active_input().move_cursor_right(),
            KeyCode::Backspace => self.project_form.active_input().handle_backspace(),
            KeyCode::Delete => self.project_form.active_input().handle_delete(),
            KeyCode::Enter => self.submit_project_form(),
            KeyCode::Char(c) => self.project_form.active_input().handle_char(c),
            _ => {}
        }
    }

    fn submit_project_form(&mut self) {
        let Some(user_id) = self.user_id() else {
            self.state = AppState::Login;
            return;
        };
        let result = match self.project_form.project_id.clone() {
            Some(id) => self.project_form.to_patch().map(|patch| {
                if self.ws.store.update_project(&id, patch) == Outcome::NotFound {
                    self.set_status_message("Project no longer exists");
                }
            }),
            None => self.project_form.to_new_project(&user_id).map(|input| {
                let id = self.ws.store.create_project(input);
                self.project_cursor = self.ws.store.projects().iter().position(|p| p.id == id).unwrap_or(0);
            }),
        };
        match result {
            Ok(()) => {
                self.state = AppState::Browse;
                self.after_change();
            }
            Err(e) => self.set_status_message(e.to_string()),
        }
    }

    fn handle_task_form_input(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => self.state = AppState::Browse,
            KeyCode::Tab | KeyCode::Down => self.task_form.next_field(),
            KeyCode::BackTab | KeyCode::Up => self.task_form.prev_field(),
            KeyCode::Left => self.task_form.handle_left_right(false),
            KeyCode::Right => self.task_form.handle_left_right(true),
            KeyCode::Backspace => self.task_form.handle_backspace(),
            KeyCode::Delete => self.task_form.handle_delete(),
            KeyCode::Enter => self.submit_task_form(),
            KeyCode::Char(c) => self.task_form.handle_char(c),
            _ => {}
        }
    }

    fn submit_task_form(&mut self) {
        let Some(user_id) = self.user_id() else {
            self.state = AppState::Login;
            return;
        };
        let project_id = self.task_form.project_id.clone();
        let result = match self.task_form.task_id.clone() {
            Some(task_id) => self.task_form.to_patch(self.today).map(|patch| {
                if self.ws.store.update_task(&project_id, &task_id, patch) == Outcome::NotFound {
                    self.set_status_message("Task no longer exists");
                }
            }),
            None => self.task_form.to_new_task(&user_id, self.today).map(|input| {
                match self.ws.store.create_task(&project_id, input) {
                    Some(task_id) => {
                        if let Some(project) = self.ws.store.project(&project_id) {
                            self.board.focus_task(&Board::for_project(project), &task_id);
                        }
                    }
                    None => self.set_status_message("Project no longer exists"),
                }
            }),
        };
        match result {
            Ok(()) => {
                self.state = AppState::Browse;
                self.after_change();
            }
            Err(e) => self.set_status_message(e.to_string()),
        }
    }

    fn handle_confirm_input(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                match self.confirm.take() {
                    Some(ConfirmAction::DeleteProject { project_id, .. }) => {
                        self.ws.store.delete_project(&project_id);
                    }
                    Some(ConfirmAction::DeleteTask { project_id, task_id, .. }) => {
                        self.ws.store.delete_task(&project_id, &task_id);
                    }
                    None => {}
                }
                self.state = AppState::Browse;
                self.after_change();
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.confirm = None;
                self.state = AppState::Browse;
            }
            _ => {}
        }
    }

    // --- rendering -------------------------------------------------------

    fn render(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0), Constraint::Length(1)])
            .split(f.area());

        if self.state == AppState::Login {
            self.render_header(f, chunks[0]);
            self.login.render(f, chunks[1]);
            self.render_status_bar(f, chunks[2]);
            return;
        }

        self.render_header(f, chunks[0]);
        self.render_tab(f, chunks[1]);

        match self.state {
            AppState::AddProject | AppState::EditProject => self.render_project_form(f, chunks[1]),
            AppState::AddTask | AppState::EditTask => self.render_task_form(f, chunks[1]),
            AppState::Confirm => self.render_confirm(f, chunks[1]),
            AppState::Help => self.render_help(f, chunks[1]),
            _ => {}
        }
        self.render_status_bar(f, chunks[2]);
    }

    fn render_header(&self, f: &mut Frame, area: Rect) {
        let user = match self.auth.current_user() {
            Some(u) => format!("{} ({})", u.name, u.role),
            None => "not signed in".to_string(),
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .title(Span::styled(" TASKBOARD ", Style::default().add_modifier(Modifier::BOLD)))
            .title_top(Line::from(format!(" {user} ")).right_aligned())
            .border_style(Style::default().fg(DARK_PURPLE));

        if self.state == AppState::Login {
            f.render_widget(block, area);
            return;
        }
        let tabs = Tabs::new(
            Tab::ALL
                .iter()
                .enumerate()
                .map(|(i, t)| format!("{} {}", i + 1, t.title())),
        )
        .select(self.tab.index())
        .block(block)
        .highlight_style(Style::default().fg(GOLD).add_modifier(Modifier::BOLD));
        f.render_widget(tabs, area);
    }

    fn render_tab(&mut self, f: &mut Frame, area: Rect) {
        let projects = self.ws.store.projects();
        match self.tab {
            Tab::Dashboard => render_dashboard(f, area, projects, self.project_cursor, self.auth.current_user()),
            Tab::Board => match self.ws.store.current_project() {
                Some(project) => self.board.render(f, area, project, &self.team),
                None => {
                    let msg = Paragraph::new("No project selected. Pick one on the Dashboard with Enter.")
                        .alignment(Alignment::Center)
                        .block(Block::default().borders(Borders::ALL));
                    f.render_widget(msg, area);
                }
            },
            Tab::Tasks => {
                let rows = sorted_tasks(projects);
                render_task_table(f, area, &rows, &self.team, &mut self.task_table);
            }
            Tab::Calendar => self.calendar.render(f, area, projects, &self.team, self.today),
            Tab::Team => render_team(f, area, &self.team, projects, self.today),
        }
    }

    fn render_project_form(&self, f: &mut Frame, area: Rect) {
        let area = centered_rect(60, 50, area);
        f.render_widget(Clear, area);
        let title = if self.project_form.project_id.is_some() { "Edit Project" } else { "New Project" };
        let block = Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(Style::default().fg(DARK_PURPLE).add_modifier(Modifier::BOLD));
        let inner = block.inner(area);
        f.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Length(5), Constraint::Min(1)])
            .split(inner);

        let field_style = |active: bool| if active { Style::default().fg(GOLD) } else { Style::default() };
        let name = Paragraph::new(self.project_form.name.value.as_str()).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Name *")
                .border_style(field_style(self.project_form.name.active)),
        );
        f.render_widget(name, chunks[0]);
        let desc = Paragraph::new(self.project_form.description.value.as_str())
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Description *")
                    .border_style(field_style(self.project_form.description.active)),
            );
        f.render_widget(desc, chunks[1]);
        f.render_widget(
            Paragraph::new("Tab: switch field | Enter: save | Esc: cancel").style(Style::default().fg(Color::Gray)),
            chunks[2],
        );
    }

    fn render_task_form(&self, f: &mut Frame, area: Rect) {
        let area = centered_rect(70, 80, area);
        f.render_widget(Clear, area);
        let form = &self.task_form;
        let project_name = self
            .ws
            .store
            .project(&form.project_id)
            .map(|p| p.name.as_str())
            .unwrap_or("-");
        let title = if form.is_edit() {
            format!("Edit Task · {project_name}")
        } else {
            format!("New Task · {project_name}")
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(Style::default().fg(DARK_PURPLE).add_modifier(Modifier::BOLD));
        let inner = block.inner(area);
        f.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Title
                Constraint::Length(5), // Description
                Constraint::Length(3), // Status
                Constraint::Length(3), // Priority
                Constraint::Length(3), // Assignee
                Constraint::Length(3), // Due
                Constraint::Min(1),
            ])
            .split(inner);

        let style_for = |field: usize| {
            if form.current_field == field {
                Style::default().fg(GOLD)
            } else {
                Style::default()
            }
        };
        let boxed = |label: &'static str, field: usize| {
            Block::default().borders(Borders::ALL).title(label).border_style(style_for(field))
        };

        f.render_widget(Paragraph::new(form.title.value.as_str()).block(boxed("Title *", TITLE_FIELD)), chunks[0]);
        f.render_widget(
            Paragraph::new(form.description.value.as_str())
                .wrap(Wrap { trim: true })
                .block(boxed("Description", DESCRIPTION_FIELD)),
            chunks[1],
        );
        f.render_widget(
            Paragraph::new(format!("< {} >", form.selected_status())).block(boxed("Status", STATUS_FIELD)),
            chunks[2],
        );
        f.render_widget(
            Paragraph::new(format!("< {} >", form.selected_priority())).block(boxed("Priority", PRIORITY_FIELD)),
            chunks[3],
        );
        f.render_widget(
            Paragraph::new(format!("< {} >", form.assignee_label())).block(boxed("Assignee", ASSIGNEE_FIELD)),
            chunks[4],
        );
        f.render_widget(
            Paragraph::new(form.due.value.as_str()).block(boxed("Due (YYYY-MM-DD, today, fri, in 3d)", DUE_FIELD)),
            chunks[5],
        );
        f.render_widget(
            Paragraph::new("Tab/↑↓: field | ←/→: change | Enter: save | Esc: cancel")
                .style(Style::default().fg(Color::Gray)),
            chunks[6],
        );
    }

    fn render_confirm(&self, f: &mut Frame, area: Rect) {
        let block = Block::default()
            .title("Confirm Action")
            .borders(Borders::ALL)
            .style(Style::default().bg(DARK_RED));

        let area = centered_rect(50, 30, area);
        f.render_widget(Clear, area);

        let text = vec![
            Line::from(""),
            Line::from(Span::styled(
                "Are you sure you want to:",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(self.confirm.as_ref().map(ConfirmAction::describe).unwrap_or_default()),
            Line::from(""),
            Line::from("This action cannot be undone."),
            Line::from(""),
            Line::from("Press 'y' to confirm, 'n' to cancel"),
        ];

        let paragraph = Paragraph::new(text)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        f.render_widget(paragraph, area);
    }

    fn render_help(&self, f: &mut Frame, area: Rect) {
        let area = centered_rect(70, 80, area);
        f.render_widget(Clear, area);
        let lines: Vec<Line> = [
            ("Tab / 1-5", "switch tab"),
            ("q / Esc", "quit"),
            ("L", "log out"),
            ("", ""),
            ("Dashboard", "↑↓ pick project, Enter open board, n new, e edit, d delete"),
            ("Board", "←→↑↓ move, Space pick up / drop, Enter details, n new, e edit, d delete"),
            ("Tasks", "↑↓ move, Enter/e edit, d delete"),
            ("Calendar", "←→ day, ↑↓ week, [ ] month, n/p next/prev due date, j/k task, e edit, t today"),
        ]
        .iter()
        .map(|(k, v)| {
            Line::from(vec![
                Span::styled(format!("{k:<12}"), Style::default().fg(GOLD).add_modifier(Modifier::BOLD)),
                Span::raw(*v),
            ])
        })
        .collect();
        let help = Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(Block::default().borders(Borders::ALL).title("Help (any key to close)"));
        f.render_widget(help, area);
    }

    fn render_status_bar(&self, f: &mut Frame, area: Rect) {
        let text = if !self.status_message.is_empty() {
            self.status_message.clone()
        } else {
            match (self.state, self.tab) {
                (AppState::Login, _) => "Sign in to continue".to_string(),
                (AppState::Browse, Tab::Board) if self.board.carrying.is_some() => {
                    format!("Drop into {} with Space, Esc to cancel", self.board.selected_status())
                }
                (AppState::Browse, tab) => format!("{} | Tab: next tab | ?: help | q: quit", tab.title()),
                (AppState::TaskDetail, _) => "Task details".to_string(),
                (AppState::AddProject, _) => "New project".to_string(),
                (AppState::EditProject, _) => "Edit project".to_string(),
                (AppState::AddTask, _) => "New task".to_string(),
                (AppState::EditTask, _) => "Edit task".to_string(),
                (AppState::Confirm, _) => "Confirm action".to_string(),
                (AppState::Help, _) => "Help".to_string(),
            }
        };
        let status = Paragraph::new(text)
            .style(Style::default().bg(DARK_PURPLE).fg(Color::White))
            .alignment(Alignment::Left);
        f.render_widget(status, area);
    }

    /// Main event loop: draw, then handle input, until the user quits.
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.handle_input()? {
                break;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::fields::Status;
    use crate::snapshot::WorkspaceSnapshot;
    use ratatui::backend::TestBackend;
    use tempfile::TempDir;

    fn app_in(dir: &TempDir) -> App {
        let config = Config {
            data_dir: dir.path().join("data"),
            state_file: Some(dir.path().join("state.json")),
            log_level: "info".into(),
        };
        App::new(Workspace::open(config).unwrap()).unwrap()
    }

    fn press(app: &mut App, code: KeyCode) -> bool {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_str(app: &mut App, s: &str) {
        for c in s.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn logged_in(dir: &TempDir) -> App {
        let mut app = app_in(dir);
        assert_eq!(app.state, AppState::Login);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.state, AppState::Browse);
        app
    }

    fn draw(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|f| app.render(f)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer.content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn demo_login_reaches_dashboard_and_session_survives() {
        let dir = TempDir::new().unwrap();
        let app = logged_in(&dir);
        assert_eq!(app.status_message, "Login successful!");
        assert_eq!(app_in(&dir).state, AppState::Browse);
    }

    #[test]
    fn bad_password_stays_on_login() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir);
        press(&mut app, KeyCode::Tab);
        type_str(&mut app, "x");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.state, AppState::Login);
        assert_eq!(app.login.error.as_deref(), Some("Invalid email or password"));
    }

    #[test]
    fn creating_a_project_saves_and_reports() {
        let dir = TempDir::new().unwrap();
        let mut app = logged_in(&dir);
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.state, AppState::AddProject);
        type_str(&mut app, "Holi Planner");
        press(&mut app, KeyCode::Tab);
        type_str(&mut app, "Colours and water balloons");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.state, AppState::Browse);
        assert_eq!(app.status_message, "Project \"Holi Planner\" created successfully");
        assert_eq!(app.project_cursor, 1);

        let saved = WorkspaceSnapshot::load(&dir.path().join("state.json")).unwrap();
        assert_eq!(saved.projects.len(), 2);
        assert_eq!(saved.projects[1].created_by, "user1");
    }

    #[test]
    fn project_form_keeps_incomplete_input_open() {
        let dir = TempDir::new().unwrap();
        let mut app = logged_in(&dir);
        press(&mut app, KeyCode::Char('n'));
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.state, AppState::AddProject);
        assert_eq!(app.status_message, "Validation error: Project name must be at least 3 characters");

        type_str(&mut app, "Holi");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.state, AppState::AddProject);
        assert_eq!(app.status_message, "Validation error: Description must be at least 10 characters");
        assert_eq!(app.ws.store.projects().len(), 1);
    }

    #[test]
    fn board_drag_moves_card_between_columns() {
        let dir = TempDir::new().unwrap();
        let mut app = logged_in(&dir);
        press(&mut app, KeyCode::Enter); // open proj1 board
        assert_eq!(app.tab, Tab::Board);

        press(&mut app, KeyCode::Char(' '));
        assert!(app.board.carrying.is_some());
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Char(' '));

        assert_eq!(app.ws.store.task("proj1", "task3").unwrap().status, Status::InProgress);
        assert_eq!(app.status_message, "Task updated successfully");
    }

    #[test]
    fn esc_cancels_a_drag_without_quitting() {
        let dir = TempDir::new().unwrap();
        let mut app = logged_in(&dir);
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char(' '));
        press(&mut app, KeyCode::Right);
        assert!(!press(&mut app, KeyCode::Esc));
        assert!(app.board.carrying.is_none());
        assert_eq!(app.ws.store.task("proj1", "task3").unwrap().status, Status::Todo);
    }

    #[test]
    fn new_task_from_board_lands_in_current_column() {
        let dir = TempDir::new().unwrap();
        let mut app = logged_in(&dir);
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.state, AppState::AddTask);
        type_str(&mut app, "Light diyas");
        press(&mut app, KeyCode::Enter);

        let project = app.ws.store.project("proj1").unwrap();
        let task = project.tasks.last().unwrap();
        assert_eq!(task.title, "Light diyas");
        assert_eq!(task.status, Status::InProgress);
        assert_eq!(task.id, "task4");
        assert_eq!(app.status_message, "Task created successfully");
    }

    #[test]
    fn deleting_a_task_needs_confirmation() {
        let dir = TempDir::new().unwrap();
        let mut app = logged_in(&dir);
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char('d'));
        assert_eq!(app.state, AppState::Confirm);
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.ws.store.project("proj1").unwrap().tasks.len(), 3);

        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Char('y'));
        assert!(app.ws.store.task("proj1", "task3").is_none());
        assert_eq!(app.status_message, "Task deleted successfully");
    }

    #[test]
    fn deleting_the_open_project_clears_the_board() {
        let dir = TempDir::new().unwrap();
        let mut app = logged_in(&dir);
        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Char('y'));
        assert!(app.ws.store.projects().is_empty());
        assert!(app.ws.store.current_project().is_none());
        assert_eq!(app.status_message, "Project deleted successfully");

        press(&mut app, KeyCode::Char('2'));
        assert!(draw(&mut app).contains("No project selected"));
    }

    #[test]
    fn every_tab_renders() {
        let dir = TempDir::new().unwrap();
        let mut app = logged_in(&dir);
        assert!(draw(&mut app).contains("Diwali Festival App"));
        for tab in Tab::ALL {
            app.tab = tab;
            let screen = draw(&mut app);
            assert!(screen.contains(tab.title()));
        }
        app.tab = Tab::Tasks;
        assert!(draw(&mut app).contains("Design homepage"));
    }

    #[test]
    fn logout_returns_to_login_screen() {
        let dir = TempDir::new().unwrap();
        let mut app = logged_in(&dir);
        press(&mut app, KeyCode::Char('L'));
        assert_eq!(app.state, AppState::Login);
        assert_eq!(app.status_message, "Logged out successfully");
        assert!(draw(&mut app).contains("Namaste"));
    }
}
