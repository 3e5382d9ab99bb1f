//! Kanban board tab.
//!
//! Cards sit in three status columns. A card is moved by picking it up
//! (Space), walking to another column (Left/Right) and dropping it (Space
//! again). Esc puts it back without touching the store.

use chrono::Local;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::board::{apply_drop, Board, DragState};
use crate::display::{format_due_long, format_due_relative};
use crate::fields::Status;
use crate::project::Project;
use crate::store::{Outcome, ProjectStore};
use crate::task::Task;
use crate::team::{assignee_label, TeamMember};
use crate::tui::colors::{priority_color, status_color, GOLD};
use crate::tui::utils::centered_rect;

const CARD_HEIGHT: usize = 5;

/// Cursor, scroll and drag state of the board tab.
#[derive(Debug, Clone, Default)]
pub struct BoardView {
    pub selected_column: usize,
    pub selected_card: usize,
    scroll: [usize; 3],
    pub carrying: Option<DragState>,
    pub show_detail: bool,
}

impl BoardView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget cursor and drag, e.g. after switching project.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn selected_status(&self) -> Status {
        Status::ALL[self.selected_column.min(Status::ALL.len() - 1)]
    }

    /// Keep the card cursor inside the current column.
    pub fn clamp(&mut self, board: &Board) {
        let len = board.columns[self.selected_column].len();
        if len == 0 {
            self.selected_card = 0;
        } else if self.selected_card >= len {
            self.selected_card = len - 1;
        }
    }

    pub fn move_left(&mut self, board: &Board) {
        if self.selected_column > 0 {
            self.selected_column -= 1;
            self.clamp(board);
        }
    }

    pub fn move_right(&mut self, board: &Board) {
        if self.selected_column + 1 < board.columns.len() {
            self.selected_column += 1;
            self.clamp(board);
        }
    }

    pub fn move_up(&mut self) {
        self.selected_card = self.selected_card.saturating_sub(1);
    }

    pub fn move_down(&mut self, board: &Board) {
        let len = board.columns[self.selected_column].len();
        if self.selected_card + 1 < len {
            self.selected_card += 1;
        }
    }

    pub fn selected_task<'a>(&self, board: &Board<'a>) -> Option<&'a Task> {
        board.columns[self.selected_column].tasks.get(self.selected_card).copied()
    }

    /// Pick up the card under the cursor. Returns false on an empty column.
    pub fn pick_up(&mut self, board: &Board) -> bool {
        match self.selected_task(board) {
            Some(task) => {
                self.carrying = Some(DragState::pick_up(task));
                true
            }
            None => false,
        }
    }

    pub fn cancel_drag(&mut self) {
        self.carrying = None;
    }

    /// Drop the carried card on the current column. `None` when nothing was
    /// carried or it went back to its own column.
    pub fn drop_card(&mut self, store: &mut ProjectStore, project_id: &str) -> Option<Outcome> {
        let drag = self.carrying.take()?;
        let outcome = apply_drop(store, project_id, &drag, self.selected_status());
        if let Some(project) = store.project(project_id) {
            self.focus_task(&Board::for_project(project), &drag.task_id);
        }
        outcome
    }

    /// Put the cursor on a task wherever it now is.
    pub fn focus_task(&mut self, board: &Board, task_id: &str) {
        for (ci, column) in board.columns.iter().enumerate() {
            if let Some(i) = column.tasks.iter().position(|t| t.id == task_id) {
                self.selected_column = ci;
                self.selected_card = i;
                return;
            }
        }
        self.clamp(board);
    }

    pub fn render(&mut self, f: &mut Frame, area: Rect, project: &Project, team: &[TeamMember]) {
        let board = Board::for_project(project);
        self.clamp(&board);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(area);

        let carrying = match &self.carrying {
            Some(drag) => format!("  Moving {} → {}", drag.task_id, self.selected_status()),
            None => String::new(),
        };
        let header = Paragraph::new(Line::from(vec![
            Span::styled(project.name.clone(), Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(format!("  {} tasks", board.total())),
            Span::styled(carrying, Style::default().fg(GOLD).add_modifier(Modifier::ITALIC)),
        ]))
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Center);
        f.render_widget(header, chunks[0]);

        let columns_layout = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
            ])
            .split(chunks[1]);

        for (i, &column_area) in columns_layout.iter().enumerate() {
            self.render_column(f, column_area, &board, i, team);
        }

        if self.show_detail {
            if let Some(task) = self.selected_task(&board) {
                render_task_detail_popup(f, task, project, team);
            }
        }
    }

    fn render_column(&mut self, f: &mut Frame, area: Rect, board: &Board, column_index: usize, team: &[TeamMember]) {
        let column = &board.columns[column_index];
        let is_selected = column_index == self.selected_column;
        let color = status_color(column.status);

        let border_style = if is_selected && self.carrying.is_some() {
            Style::default().fg(GOLD).add_modifier(Modifier::BOLD)
        } else if is_selected {
            Style::default().fg(color).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!("{} ({})", column.title(), column.len()))
            .border_style(border_style);
        let inner = block.inner(area);
        f.render_widget(block, area);

        if column.is_empty() {
            let empty = Paragraph::new("No tasks")
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center);
            f.render_widget(empty, inner);
            return;
        }

        let available_height = inner.height as usize;
        let visible_cards = (available_height / CARD_HEIGHT).max(1);

        // keep the cursor card in view
        let offset = &mut self.scroll[column_index];
        if is_selected {
            if self.selected_card < *offset {
                *offset = self.selected_card;
            } else if self.selected_card >= *offset + visible_cards {
                *offset = self.selected_card + 1 - visible_cards;
            }
        }
        let offset = (*offset).min(column.len().saturating_sub(1));

        let mut y = 0;
        for (card_index, task) in column.tasks.iter().enumerate().skip(offset) {
            if y + CARD_HEIGHT > available_height {
                break;
            }
            let card_area = Rect {
                x: inner.x,
                y: inner.y + y as u16,
                width: inner.width,
                height: CARD_HEIGHT as u16,
            };
            let carried = self.carrying.as_ref().is_some_and(|d| d.task_id == task.id);
            render_card(f, card_area, task, team, is_selected && card_index == self.selected_card, carried);
            y += CARD_HEIGHT;
        }

        if offset > 0 {
            let indicator = Paragraph::new(format!("▲ +{offset} above")).style(Style::default().fg(Color::Cyan));
            f.render_widget(indicator, Rect { height: 1, ..inner });
        }
        let shown = y / CARD_HEIGHT;
        let remaining = column.len().saturating_sub(offset + shown);
        if remaining > 0 && inner.height > 0 {
            let indicator = Paragraph::new(format!("▼ +{remaining} below")).style(Style::default().fg(Color::Cyan));
            f.render_widget(
                indicator,
                Rect {
                    y: inner.y + inner.height - 1,
                    height: 1,
                    ..inner
                },
            );
        }
    }
}

fn render_card(f: &mut Frame, area: Rect, task: &Task, team: &[TeamMember], is_selected: bool, carried: bool) {
    let style = if carried {
        Style::default().bg(GOLD).fg(Color::Black).add_modifier(Modifier::BOLD | Modifier::ITALIC)
    } else if is_selected {
        Style::default().bg(Color::Gray).fg(Color::Black).add_modifier(Modifier::BOLD)
    } else {
        Style::default().bg(Color::DarkGray)
    };

    let today = Local::now().date_naive();
    let lines = vec![
        Line::from(vec![
            Span::styled(
                format!("[{}]", task.priority),
                Style::default().fg(priority_color(task.priority)).add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!(" {}", task.title)),
        ]),
        Line::from(format!(
            "{} | {}",
            assignee_label(task.assignee_id.as_deref(), team),
            format_due_relative(task.due_date, today)
        )),
    ];

    let card = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL))
        .style(style)
        .wrap(Wrap { trim: true });
    f.render_widget(card, area);
}

fn render_task_detail_popup(f: &mut Frame, task: &Task, project: &Project, team: &[TeamMember]) {
    let area = centered_rect(70, 60, f.area());
    f.render_widget(Clear, area);

    let description = if task.description.is_empty() { "-" } else { task.description.as_str() };
    let lines = vec![
        Line::from(Span::styled(
            format!("{}: {}", task.id, task.title),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::raw("Status:    "),
            Span::styled(task.status.to_string(), Style::default().fg(status_color(task.status))),
        ]),
        Line::from(vec![
            Span::raw("Priority:  "),
            Span::styled(task.priority.to_string(), Style::default().fg(priority_color(task.priority))),
        ]),
        Line::from(format!("Assignee:  {}", assignee_label(task.assignee_id.as_deref(), team))),
        Line::from(format!("Due:       {}", format_due_long(task.due_date))),
        Line::from(format!("Project:   {}", project.name)),
        Line::from(format!(
            "Created:   {} by {}",
            task.created_at.format("%b %-d, %Y"),
            assignee_label(Some(&task.created_by), team)
        )),
        Line::from(""),
        Line::from("Description:"),
        Line::from(description.to_string()),
    ];

    let popup = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Task Details (Enter to close, e to edit)")
                .title_alignment(Alignment::Center)
                .border_style(Style::default().fg(status_color(task.status)).add_modifier(Modifier::BOLD)),
        )
        .wrap(Wrap { trim: true })
        .style(Style::default().bg(Color::Black));
    f.render_widget(popup, area);
}
