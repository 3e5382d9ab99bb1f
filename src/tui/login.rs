//! Sign-in and registration screen shown when there is no saved session.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::auth::{validate_credentials, validate_registration, DEMO_EMAIL, DEMO_PASSWORD};
use crate::error::AppResult;
use crate::tui::colors::{DARK_PURPLE, GOLD};
use crate::tui::input::InputField;
use crate::tui::utils::centered_rect;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LoginMode {
    SignIn,
    Register,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Field {
    Name,
    Email,
    Password,
}

/// What the user asked for when submitting the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
    SignIn { email: String, password: String },
    Register { name: String, email: String, password: String },
}

#[derive(Debug, Clone)]
pub struct LoginForm {
    pub mode: LoginMode,
    pub name: InputField,
    pub email: InputField,
    pub password: InputField,
    focus: Field,
    pub error: Option<String>,
}

impl Default for LoginForm {
    fn default() -> Self {
        Self::new()
    }
}

impl LoginForm {
    /// Sign-in form pre-filled with the demo account.
    pub fn new() -> Self {
        let mut form = LoginForm {
            mode: LoginMode::SignIn,
            name: InputField::new(),
            email: InputField::with_value(DEMO_EMAIL),
            password: InputField::with_value(DEMO_PASSWORD),
            focus: Field::Email,
            error: None,
        };
        form.sync_active();
        form
    }

    fn fields(&self) -> &'static [Field] {
        match self.mode {
            LoginMode::SignIn => &[Field::Email, Field::Password],
            LoginMode::Register => &[Field::Name, Field::Email, Field::Password],
        }
    }

    fn sync_active(&mut self) {
        self.name.active = self.focus == Field::Name;
        self.email.active = self.focus == Field::Email;
        self.password.active = self.focus == Field::Password;
    }

    pub fn next_field(&mut self) {
        let fields = self.fields();
        let i = fields.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.focus = fields[(i + 1) % fields.len()];
        self.sync_active();
    }

    pub fn prev_field(&mut self) {
        let fields = self.fields();
        let i = fields.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.focus = fields[(i + fields.len() - 1) % fields.len()];
        self.sync_active();
    }

    /// Switch between signing in and registering. Register starts blank.
    pub fn toggle_mode(&mut self) {
        *self = match self.mode {
            LoginMode::SignIn => {
                let mut form = LoginForm {
                    mode: LoginMode::Register,
                    name: InputField::new(),
                    email: InputField::new(),
                    password: InputField::new(),
                    focus: Field::Name,
                    error: None,
                };
                form.sync_active();
                form
            }
            LoginMode::Register => LoginForm::new(),
        };
    }

    pub fn active_input(&mut self) -> &mut InputField {
        match self.focus {
            Field::Name => &mut self.name,
            Field::Email => &mut self.email,
            Field::Password => &mut self.password,
        }
    }

    pub fn submit(&self) -> AppResult<Credentials> {
        let email = self.email.trimmed().to_string();
        let password = self.password.value.clone();
        match self.mode {
            LoginMode::SignIn => {
                validate_credentials(&email, &password)?;
                Ok(Credentials::SignIn { email, password })
            }
            LoginMode::Register => {
                let name = self.name.trimmed().to_string();
                validate_registration(&name, &email, &password)?;
                Ok(Credentials::Register { name, email, password })
            }
        }
    }

    pub fn render(&self, f: &mut Frame, area: Rect) {
        let area = centered_rect(50, 60, area);
        f.render_widget(Clear, area);

        let (title, subtitle) = match self.mode {
            LoginMode::SignIn => ("नमस्ते (Namaste)", "Enter your credentials to sign in"),
            LoginMode::Register => ("Create an account", "Join the team board"),
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" taskboard ")
            .title_alignment(Alignment::Center)
            .border_style(Style::default().fg(DARK_PURPLE).add_modifier(Modifier::BOLD));
        let inner = block.inner(area);
        f.render_widget(block, area);

        let mut constraints = vec![Constraint::Length(3)];
        constraints.extend(self.fields().iter().map(|_| Constraint::Length(3)));
        constraints.push(Constraint::Length(2));
        constraints.push(Constraint::Min(0));
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(inner);

        let header = Paragraph::new(vec![
            Line::from(Span::styled(title, Style::default().add_modifier(Modifier::BOLD))),
            Line::from(Span::styled(subtitle, Style::default().fg(Color::Gray))),
        ])
        .alignment(Alignment::Center);
        f.render_widget(header, chunks[0]);

        for (i, field) in self.fields().iter().enumerate() {
            let (label, text) = match field {
                Field::Name => ("Name", self.name.value.clone()),
                Field::Email => ("Email", self.email.value.clone()),
                Field::Password => ("Password", self.password.masked()),
            };
            let style = if *field == self.focus {
                Style::default().fg(GOLD)
            } else {
                Style::default()
            };
            let input = Paragraph::new(text)
                .block(Block::default().borders(Borders::ALL).title(label).border_style(style));
            f.render_widget(input, chunks[i + 1]);
        }

        let footer_idx = self.fields().len() + 1;
        let footer = match &self.error {
            Some(e) => Line::from(Span::styled(e.clone(), Style::default().fg(Color::Red))),
            None => Line::from(match self.mode {
                LoginMode::SignIn => "Enter: sign in | Ctrl+R: register | Esc: quit",
                LoginMode::Register => "Enter: register | Ctrl+R: back to sign in | Esc: quit",
            }),
        };
        f.render_widget(Paragraph::new(footer).alignment(Alignment::Center), chunks[footer_idx]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    #[test]
    fn sign_in_is_prefilled_with_demo_account() {
        let form = LoginForm::new();
        assert_eq!(
            form.submit().unwrap(),
            Credentials::SignIn {
                email: DEMO_EMAIL.into(),
                password: DEMO_PASSWORD.into()
            }
        );
    }

    #[test]
    fn register_cycles_three_fields_and_validates() {
        let mut form = LoginForm::new();
        form.toggle_mode();
        assert_eq!(form.mode, LoginMode::Register);
        assert!(form.submit().is_err());

        for c in "Kavya".chars() {
            form.active_input().handle_char(c);
        }
        form.next_field();
        for c in "kavya@example.com".chars() {
            form.active_input().handle_char(c);
        }
        form.next_field();
        for c in "short".chars() {
            form.active_input().handle_char(c);
        }
        assert!(matches!(form.submit(), Err(AppError::Validation(_))));

        for c in "enough".chars() {
            form.active_input().handle_char(c);
        }
        assert!(matches!(form.submit(), Ok(Credentials::Register { .. })));

        form.next_field();
        assert!(form.name.active);
        form.prev_field();
        assert!(form.password.active);
    }
}
