use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crossterm::event::Event;
use ratatui::layout::Rect;
use tokio::sync::mpsc;
use tracing::debug;

use crate::app::App;
use crate::runtime::{EventResult, TuiTerminal, key_handler, mouse_handler};

pub(crate) fn spawn_event_reader(
    event_tx: mpsc::UnboundedSender<Event>,
    shutdown: Arc<AtomicBool>,
) {
    std::thread::spawn(move || {
        while !shutdown.load(Ordering::Relaxed) {
            match crossterm::event::poll(Duration::from_millis(250)) {
                Ok(true) => {
                    if let Ok(event) = crossterm::event::read()
                        && event_tx.send(event).is_err()
                    {
                        break;
                    }
                }
                Ok(false) => {}
                Err(_) => break,
            }
        }
    });
}

/// Waits for the next terminal event, then handles it and every event already
/// queued behind it before the next redraw.
pub(crate) async fn process_events(
    app: &mut App,
    terminal: &TuiTerminal,
    event_rx: &mut mpsc::UnboundedReceiver<Event>,
) -> io::Result<EventResult> {
    let Some(event) = event_rx.recv().await else {
        return Ok(EventResult::Quit);
    };

    let size = terminal.size()?;
    let area = Rect::new(0, 0, size.width, size.height);

    if process_event(app, area, event) == EventResult::Quit {
        return Ok(EventResult::Quit);
    }

    while let Ok(event) = event_rx.try_recv() {
        if process_event(app, area, event) == EventResult::Quit {
            return Ok(EventResult::Quit);
        }
    }

    Ok(EventResult::Continue)
}

/// Handles one event to completion; `area` is the frame the last draw used.
pub(crate) fn process_event(app: &mut App, area: Rect, event: Event) -> EventResult {
    match event {
        Event::Key(key) => key_handler::handle_key_event(app, key),
        Event::Mouse(mouse) => {
            mouse_handler::handle_mouse_event(app, area, mouse);

            EventResult::Continue
        }
        Event::Paste(text) => {
            app.paste(&text);

            EventResult::Continue
        }
        Event::FocusLost => {
            debug!("focus lost");
            app.close_suggestions();

            EventResult::Continue
        }
        Event::FocusGained | Event::Resize(..) => EventResult::Continue,
    }
}
