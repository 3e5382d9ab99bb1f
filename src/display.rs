//! Text helpers shared by the CLI tables and the TUI: due-date parsing and
//! formatting, and column truncation.

use chrono::{Datelike, Duration, NaiveDate};

/// Parse human-readable due date input relative to `today`.
///
/// Supports:
/// - "today", "tomorrow"
/// - weekday names ("fri", "next monday")
/// - "in 3d", "in 2w"
/// - "YYYY-MM-DD" format
pub fn parse_due_input(s: &str, today: NaiveDate) -> Option<NaiveDate> {
    let s = s.trim().to_lowercase();

    match s.as_str() {
        "today" => return Some(today),
        "tomorrow" => return Some(today + Duration::days(1)),
        _ => {}
    }

    if let Some(rest) = s.strip_prefix("in ") {
        if let Some(n) = rest.strip_suffix('d').and_then(|n| n.trim().parse::<i64>().ok()) {
            return Some(today + Duration::days(n));
        }
        if let Some(n) = rest.strip_suffix('w').and_then(|n| n.trim().parse::<i64>().ok()) {
            return Some(today + Duration::weeks(n));
        }
    }

    let (next_week, day) = match s.strip_prefix("next ") {
        Some(day) => (true, day),
        None => (false, s.as_str()),
    };
    if let Some(target) = weekday_index(day) {
        let current = today.weekday().num_days_from_monday() as i64;
        let mut ahead = (target - current).rem_euclid(7);
        if next_week {
            ahead += 7;
        }
        return Some(today + Duration::days(ahead));
    }

    NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()
}

fn weekday_index(name: &str) -> Option<i64> {
    const DAYS: [&str; 7] = ["monday", "tuesday", "wednesday", "thursday", "friday", "saturday", "sunday"];
    DAYS.iter()
        .position(|d| *d == name || (name.len() == 3 && d.starts_with(name)))
        .map(|i| i as i64)
}

/// Format a due date relative to today ("today", "tomorrow", "in 3d", "2d late").
pub fn format_due_relative(due: Option<NaiveDate>, today: NaiveDate) -> String {
    match due {
        None => "-".into(),
        Some(d) => match (d - today).num_days() {
            0 => "today".into(),
            1 => "tomorrow".into(),
            n if n > 1 => format!("in {n}d"),
            n => format!("{}d late", -n),
        },
    }
}

/// Long form used in the task table, e.g. "May 20, 2025".
pub fn format_due_long(due: Option<NaiveDate>) -> String {
    match due {
        Some(d) => d.format("%b %-d, %Y").to_string(),
        None => "No due date".into(),
    }
}

/// Truncate a string to a maximum width, adding an ellipsis if needed.
pub fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        return s.to_string();
    }
    let mut out: String = s.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn parses_relative_and_iso_dates() {
        // Wednesday
        let today = d(2025, 5, 14);
        assert_eq!(parse_due_input("today", today), Some(today));
        assert_eq!(parse_due_input(" Tomorrow ", today), Some(d(2025, 5, 15)));
        assert_eq!(parse_due_input("in 3d", today), Some(d(2025, 5, 17)));
        assert_eq!(parse_due_input("in 2w", today), Some(d(2025, 5, 28)));
        assert_eq!(parse_due_input("fri", today), Some(d(2025, 5, 16)));
        assert_eq!(parse_due_input("wednesday", today), Some(today));
        assert_eq!(parse_due_input("next monday", today), Some(d(2025, 5, 26)));
        assert_eq!(parse_due_input("2025-06-01", today), Some(d(2025, 6, 1)));
        assert_eq!(parse_due_input("someday", today), None);
    }

    #[test]
    fn formats_relative_due() {
        let today = d(2025, 5, 14);
        assert_eq!(format_due_relative(None, today), "-");
        assert_eq!(format_due_relative(Some(today), today), "today");
        assert_eq!(format_due_relative(Some(d(2025, 5, 15)), today), "tomorrow");
        assert_eq!(format_due_relative(Some(d(2025, 5, 20)), today), "in 6d");
        assert_eq!(format_due_relative(Some(d(2025, 5, 12)), today), "2d late");
        assert_eq!(format_due_long(Some(d(2025, 5, 20))), "May 20, 2025");
    }

    #[test]
    fn truncates_on_char_boundaries() {
        assert_eq!(truncate("Diwali", 10), "Diwali");
        assert_eq!(truncate("Diwali Festival App", 8), "Diwali …");
        assert_eq!(truncate("दिवाली उत्सव", 4).chars().count(), 4);
    }
}
