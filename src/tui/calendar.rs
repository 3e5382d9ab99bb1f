//! Calendar tab: month grid with due dates marked, and the selected day's
//! tasks underneath.

use chrono::{Datelike, Duration, Months, NaiveDate};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, List, ListItem, ListState, Paragraph, Row, Table},
    Frame,
};

use crate::calendar::{month_grid, CalendarEntry, CalendarIndex};
use crate::project::Project;
use crate::team::{assignee_label, TeamMember};
use crate::tui::colors::{priority_color, status_color, GOLD};

const WEEKDAYS: [&str; 7] = ["Mo", "Tu", "We", "Th", "Fr", "Sa", "Su"];

#[derive(Debug, Clone)]
pub struct CalendarView {
    pub selected: NaiveDate,
    pub selected_entry: usize,
}

impl CalendarView {
    pub fn new(today: NaiveDate) -> Self {
        CalendarView {
            selected: today,
            selected_entry: 0,
        }
    }

    fn select(&mut self, date: NaiveDate) {
        if date != self.selected {
            self.selected = date;
            self.selected_entry = 0;
        }
    }

    pub fn shift_days(&mut self, days: i64) {
        self.select(self.selected + Duration::days(days));
    }

    pub fn shift_months(&mut self, forward: bool) {
        let months = Months::new(1);
        let date = if forward {
            self.selected.checked_add_months(months)
        } else {
            self.selected.checked_sub_months(months)
        };
        if let Some(d) = date {
            self.select(d);
        }
    }

    /// Jump to the next date after the selection that has tasks due.
    pub fn next_busy_day(&mut self, index: &CalendarIndex) -> bool {
        match index.dates_with_tasks().find(|d| *d > self.selected) {
            Some(d) => {
                self.select(d);
                true
            }
            None => false,
        }
    }

    pub fn prev_busy_day(&mut self, index: &CalendarIndex) -> bool {
        match index.dates_with_tasks().filter(|d| *d < self.selected).last() {
            Some(d) => {
                self.select(d);
                true
            }
            None => false,
        }
    }

    pub fn next_entry(&mut self, index: &CalendarIndex) {
        let len = index.tasks_on(self.selected).len();
        if self.selected_entry + 1 < len {
            self.selected_entry += 1;
        }
    }

    pub fn prev_entry(&mut self) {
        self.selected_entry = self.selected_entry.saturating_sub(1);
    }

    pub fn entry_under_cursor<'a>(&self, index: &CalendarIndex<'a>) -> Option<CalendarEntry<'a>> {
        index.tasks_on(self.selected).get(self.selected_entry).copied()
    }

    pub fn render(&self, f: &mut Frame, area: Rect, projects: &[Project], team: &[TeamMember], today: NaiveDate) {
        let index = CalendarIndex::build(projects);
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(38), Constraint::Min(0)])
            .split(area);

        self.render_month(f, chunks[0], &index, today);
        self.render_day(f, chunks[1], &index, team);
    }

    fn render_month(&self, f: &mut Frame, area: Rect, index: &CalendarIndex, today: NaiveDate) {
        let header = Row::new(WEEKDAYS.iter().map(|d| Cell::from(*d)))
            .style(Style::default().add_modifier(Modifier::BOLD));

        let rows = month_grid(self.selected).into_iter().map(|week| {
            Row::new(week.iter().map(|cell| match cell {
                None => Cell::from(""),
                Some(d) => {
                    let mut style = Style::default();
                    if index.has_tasks(*d) {
                        style = style.fg(GOLD).add_modifier(Modifier::BOLD);
                    }
                    if *d == today {
                        style = style.add_modifier(Modifier::UNDERLINED);
                    }
                    if *d == self.selected {
                        style = style.bg(Color::Gray).fg(Color::Black);
                    }
                    Cell::from(format!("{:>2}", d.day())).style(style)
                }
            }))
        });

        let table = Table::new(rows, [Constraint::Length(4); 7])
            .header(header)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(self.selected.format(" %B %Y ").to_string())
                    .title_alignment(Alignment::Center),
            );
        f.render_widget(table, area);
    }

    fn render_day(&self, f: &mut Frame, area: Rect, index: &CalendarIndex, team: &[TeamMember]) {
        let entries = index.tasks_on(self.selected);
        let block = Block::default()
            .borders(Borders::ALL)
            .title(self.selected.format(" Tasks due %A, %B %-d ").to_string());

        if entries.is_empty() {
            let empty = Paragraph::new("No tasks due on this day")
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center)
                .block(block);
            f.render_widget(empty, area);
            return;
        }

        let items: Vec<ListItem> = entries
            .iter()
            .map(|e| {
                ListItem::new(vec![
                    Line::from(vec![
                        Span::styled(
                            format!("{:<12}", e.task.status),
                            Style::default().fg(status_color(e.task.status)),
                        ),
                        Span::styled(
                            format!("{:<8}", e.task.priority),
                            Style::default().fg(priority_color(e.task.priority)),
                        ),
                        Span::styled(e.task.title.clone(), Style::default().add_modifier(Modifier::BOLD)),
                    ]),
                    Line::from(Span::styled(
                        format!(
                            "    {} · {}",
                            e.project_name,
                            assignee_label(e.task.assignee_id.as_deref(), team)
                        ),
                        Style::default().fg(Color::Gray),
                    )),
                ])
            })
            .collect();

        let mut state = ListState::default();
        state.select(Some(self.selected_entry.min(entries.len() - 1)));
        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
            .highlight_symbol("> ");
        f.render_stateful_widget(list, area, &mut state);
    }
}
