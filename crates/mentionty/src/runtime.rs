use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::sync::mpsc;
use tracing::info;

use crate::app::App;
use crate::ui;

mod event;
mod key_handler;
mod mouse_handler;
mod terminal;

pub(crate) type TuiTerminal = Terminal<CrosstermBackend<io::Stdout>>;

#[derive(Debug, Eq, PartialEq)]
pub(crate) enum EventResult {
    Continue,
    Quit,
}

/// Runs the TUI event/render loop until the user exits.
///
/// # Errors
/// Returns an error if terminal setup, rendering, or event processing fails.
pub async fn run(app: &mut App) -> io::Result<()> {
    let _terminal_guard = terminal::TerminalGuard;
    let mut terminal = terminal::setup_terminal()?;

    // Crossterm reads block, so they run on a dedicated thread feeding the
    // async loop.
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let shutdown = Arc::new(AtomicBool::new(false));
    event::spawn_event_reader(event_tx, Arc::clone(&shutdown));
    info!("editor started");

    let result = run_main_loop(app, &mut terminal, &mut event_rx).await;

    shutdown.store(true, Ordering::Relaxed);
    terminal.show_cursor()?;
    info!("editor stopped");

    result
}

async fn run_main_loop(
    app: &mut App,
    terminal: &mut TuiTerminal,
    event_rx: &mut mpsc::UnboundedReceiver<crossterm::event::Event>,
) -> io::Result<()> {
    loop {
        render_frame(app, terminal)?;

        if event::process_events(app, terminal, event_rx).await? == EventResult::Quit {
            break;
        }
    }

    Ok(())
}

fn render_frame(app: &App, terminal: &mut TuiTerminal) -> io::Result<()> {
    terminal.draw(|frame| {
        ui::render(
            frame,
            ui::RenderContext {
                directory_size: app.directory.len(),
                editor: &app.editor,
                suggestions: &app.suggestions,
            },
        );
    })?;

    Ok(())
}
