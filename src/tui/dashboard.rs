//! Read-only tabs: dashboard cards with the project list, the sorted task
//! table and the team roster.

use chrono::NaiveDate;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Gauge, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::auth::User;
use crate::display::{format_due_long, truncate};
use crate::fields::Status;
use crate::project::Project;
use crate::summary::{project_progress, DashboardStats, TaskRow};
use crate::team::{assignee_label, initials, TeamMember};
use crate::tui::colors::{priority_color, status_color, DARK_GREEN, GOLD};

fn stat_card(f: &mut Frame, area: Rect, label: &str, value: usize, color: Color) {
    let card = Paragraph::new(vec![
        Line::from(Span::styled(
            value.to_string(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(label.to_string()),
    ])
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(card, area);
}

/// Stat cards across the top, one progress row per project below.
pub fn render_dashboard(f: &mut Frame, area: Rect, projects: &[Project], cursor: usize, user: Option<&User>) {
    let stats = DashboardStats::from_projects(projects);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(4), Constraint::Min(0)])
        .split(area);

    let greeting = match user {
        Some(u) => format!("Welcome back, {}", u.name),
        None => "Welcome".to_string(),
    };
    f.render_widget(Paragraph::new(greeting).style(Style::default().add_modifier(Modifier::BOLD)), chunks[0]);

    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(chunks[1]);
    stat_card(f, cards[0], "Total Tasks", stats.total, Color::Cyan);
    stat_card(f, cards[1], "Completed", stats.completed, Color::Green);
    stat_card(f, cards[2], "Pending", stats.pending, Color::Yellow);
    stat_card(f, cards[3], "High Priority", stats.high_priority, Color::Red);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!("Projects ({})", projects.len()));
    let inner = block.inner(chunks[2]);
    f.render_widget(block, chunks[2]);

    if projects.is_empty() {
        let empty = Paragraph::new("No projects yet. Press 'n' to create one.")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        f.render_widget(empty, inner);
        return;
    }

    const ROW_HEIGHT: u16 = 3;
    let visible = (inner.height / ROW_HEIGHT).max(1) as usize;
    let skip = cursor.saturating_sub(visible - 1);
    for (i, project) in projects.iter().enumerate().skip(skip).take(visible) {
        let y = inner.y + ((i - skip) as u16) * ROW_HEIGHT;
        if y + ROW_HEIGHT > inner.y + inner.height {
            break;
        }
        let row = Rect::new(inner.x, y, inner.width, ROW_HEIGHT);
        render_project_row(f, row, project, i == cursor);
    }
}

fn render_project_row(f: &mut Frame, area: Rect, project: &Project, selected: bool) {
    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1), Constraint::Length(1)])
        .split(area);

    let name_style = if selected {
        Style::default().fg(GOLD).add_modifier(Modifier::BOLD)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };
    let marker = if selected { "> " } else { "  " };
    let title = Line::from(vec![
        Span::styled(format!("{marker}{}", project.name), name_style),
        Span::styled(
            format!(
                "  {}/{} done · {} members",
                project.completed_count(),
                project.tasks.len(),
                project.members.len()
            ),
            Style::default().fg(Color::Gray),
        ),
    ]);
    f.render_widget(Paragraph::new(title), parts[0]);

    let progress = project_progress(project);
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(DARK_GREEN).bg(Color::Black))
        .percent(u16::from(progress))
        .label(format!("{progress}%"));
    f.render_widget(gauge, Rect { x: parts[1].x + 2, width: parts[1].width.saturating_sub(2), ..parts[1] });
}

/// Every task, highest priority and soonest due first.
pub fn render_task_table(f: &mut Frame, area: Rect, rows: &[TaskRow], team: &[TeamMember], state: &mut TableState) {
    let header = Row::new(["Task", "Project", "Status", "Priority", "Assignee", "Due"])
        .style(Style::default().add_modifier(Modifier::BOLD))
        .bottom_margin(1);

    let body = rows.iter().map(|r| {
        Row::new(vec![
            Cell::from(truncate(&r.task.title, 40)),
            Cell::from(truncate(r.project_name, 24)),
            Cell::from(r.task.status.to_string()).style(Style::default().fg(status_color(r.task.status))),
            Cell::from(r.task.priority.to_string()).style(Style::default().fg(priority_color(r.task.priority))),
            Cell::from(assignee_label(r.task.assignee_id.as_deref(), team)),
            Cell::from(format_due_long(r.task.due_date)),
        ])
    });

    let table = Table::new(
        body,
        [
            Constraint::Percentage(32),
            Constraint::Percentage(18),
            Constraint::Length(12),
            Constraint::Length(9),
            Constraint::Length(16),
            Constraint::Length(13),
        ],
    )
    .header(header)
    .block(Block::default().borders(Borders::ALL).title(format!("All Tasks ({})", rows.len())))
    .row_highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
    .highlight_symbol("> ");

    if rows.is_empty() {
        state.select(None);
    } else if state.selected().map_or(true, |i| i >= rows.len()) {
        state.select(Some(0));
    }
    f.render_stateful_widget(table, area, state);
}

pub fn render_team(f: &mut Frame, area: Rect, team: &[TeamMember], projects: &[Project], today: NaiveDate) {
    let rows = team.iter().map(|m| {
        let open: Vec<_> = projects
            .iter()
            .flat_map(|p| p.tasks.iter())
            .filter(|t| t.assignee_id.as_deref() == Some(m.id.as_str()) && t.status != Status::Done)
            .collect();
        let overdue = open.iter().filter(|t| t.due_date.is_some_and(|d| d < today)).count();
        let open = open.len();
        Row::new(vec![
            Cell::from(format!("({}) {}", initials(&m.name), m.name)),
            Cell::from(m.email.clone()),
            Cell::from(m.role.to_string()),
            Cell::from(m.department.clone()),
            Cell::from(open.to_string()),
            Cell::from(overdue.to_string()).style(if overdue > 0 {
                Style::default().fg(Color::Red)
            } else {
                Style::default()
            }),
        ])
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(22),
            Constraint::Length(22),
            Constraint::Length(8),
            Constraint::Length(14),
            Constraint::Length(10),
            Constraint::Length(8),
        ],
    )
    .header(
        Row::new(["Name", "Email", "Role", "Department", "Open tasks", "Overdue"])
            .style(Style::default().add_modifier(Modifier::BOLD))
            .bottom_margin(1),
    )
    .block(Block::default().borders(Borders::ALL).title(format!("Team ({})", team.len())));
    f.render_widget(table, area);
}
