//! Enumerations for TUI state management.

/// Which screen has the keyboard.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum AppState {
    Login,
    Browse,
    TaskDetail,
    AddProject,
    EditProject,
    AddTask,
    EditTask,
    Confirm,
    Help,
}

/// Top-level tabs of the dashboard.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Tab {
    Dashboard,
    Board,
    Tasks,
    Calendar,
    Team,
}

impl Tab {
    pub const ALL: [Tab; 5] = [Tab::Dashboard, Tab::Board, Tab::Tasks, Tab::Calendar, Tab::Team];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Dashboard => "Dashboard",
            Tab::Board => "Board",
            Tab::Tasks => "Tasks",
            Tab::Calendar => "Calendar",
            Tab::Team => "Team",
        }
    }

    pub fn index(self) -> usize {
        Tab::ALL.iter().position(|t| *t == self).unwrap_or(0)
    }

    pub fn next(self) -> Tab {
        Tab::ALL[(self.index() + 1) % Tab::ALL.len()]
    }

    pub fn prev(self) -> Tab {
        Tab::ALL[(self.index() + Tab::ALL.len() - 1) % Tab::ALL.len()]
    }
}

/// Destructive action waiting for a yes/no.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum ConfirmAction {
    DeleteProject { project_id: String, name: String },
    DeleteTask { project_id: String, task_id: String, title: String },
}

impl ConfirmAction {
    pub fn describe(&self) -> String {
        match self {
            ConfirmAction::DeleteProject { name, .. } => {
                format!("Delete project \"{name}\" and all of its tasks")
            }
            ConfirmAction::DeleteTask { title, .. } => format!("Delete task \"{title}\""),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tabs_cycle_both_ways() {
        assert_eq!(Tab::Dashboard.next(), Tab::Board);
        assert_eq!(Tab::Team.next(), Tab::Dashboard);
        assert_eq!(Tab::Dashboard.prev(), Tab::Team);
        for t in Tab::ALL {
            assert_eq!(t.next().prev(), t);
        }
    }
}
