mod app;
mod controller;
mod logging;
mod model;
mod player;
mod view;

use std::io;

use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use player::AppleMusicPlayer;

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(e) = logging::init_logging() {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }

    tracing::info!("=== Music Remote Starting ===");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = app::run(&mut terminal, AppleMusicPlayer::new()).await;

    // Restore terminal best-effort; a teardown failure must not swallow
    // the application result.
    if let Err(e) = disable_raw_mode() {
        tracing::warn!(error = %e, "failed to disable raw mode");
    }
    if let Err(e) = execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    ) {
        tracing::warn!(error = %e, "failed to restore terminal screen");
    }
    if let Err(e) = terminal.show_cursor() {
        tracing::warn!(error = %e, "failed to restore cursor");
    }

    if let Err(err) = &res {
        tracing::error!(error = ?err, "Application error");
    }

    tracing::info!("Music Remote shutting down");
    res
}
