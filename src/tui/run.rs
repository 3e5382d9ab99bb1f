//! Dashboard entry point and terminal setup.

use std::io;

use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{prelude::CrosstermBackend, Terminal};
use tracing::info;

use crate::error::AppResult;
use crate::tui::app::App;
use crate::workspace::Workspace;

/// Initialise the terminal, run the dashboard until the user quits and
/// restore the terminal. The workspace is saved once more on the way out.
pub fn run_tui(ws: Workspace) -> AppResult<()> {
    let mut app = App::new(ws)?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    info!("dashboard started");
    let result = app.run(&mut terminal);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    result?;
    let ws = app.into_workspace();
    if ws.commit()? {
        info!("dashboard closed, workspace saved");
    }
    Ok(())
}
