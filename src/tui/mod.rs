//! Terminal grid editor.

mod actions;
mod app;
mod clipboard;
mod help;
mod input;
mod keymap;
mod ui;

use std::io;

use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};

pub use app::App;

/// Take over the terminal and run the editor until the user quits.
/// The terminal is restored even when the event loop fails.
pub fn run(app: &mut App) -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    log::info!("editor started on {}", app.config.source.display());
    let res = input::run_app(&mut terminal, app, &mut clipboard::SystemClipboard);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = &res {
        log::error!("editor loop failed: {}", e);
    }
    res
}
