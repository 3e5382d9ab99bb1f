//! Color constants for the terminal user interface.

use ratatui::style::Color;

use crate::fields::{Priority, Status};

/// Focused field and selected card highlight.
pub const GOLD: Color = Color::Rgb(255, 215, 0);
/// Completed work.
pub const DARK_GREEN: Color = Color::Rgb(0, 80, 0);
/// Destructive confirmations.
pub const DARK_RED: Color = Color::Rgb(114, 0, 0);
/// Header and status bar brand colour.
pub const DARK_PURPLE: Color = Color::Rgb(86, 60, 92);

pub fn status_color(status: Status) -> Color {
    match status {
        Status::Todo => Color::Blue,
        Status::InProgress => Color::Yellow,
        Status::Done => Color::Green,
    }
}

pub fn priority_color(priority: Priority) -> Color {
    match priority {
        Priority::Low => Color::Green,
        Priority::Medium => Color::Yellow,
        Priority::High => Color::Red,
    }
}
