use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::info;

use crate::app::App;
use crate::domain::document::Removed;
use crate::runtime::EventResult;

/// Whether the re-scan half of a keystroke runs after its key-down half.
#[derive(Debug, Eq, PartialEq)]
enum KeyUpPass {
    Rescan,
    Skip,
}

/// Handles one keystroke: key-down handling, then the re-scan pass.
///
/// Terminals report no key releases, so the re-scan that would run on key-up
/// follows the key-down half of the same keystroke directly.
pub(crate) fn handle_key_event(app: &mut App, key: KeyEvent) -> EventResult {
    if key.kind == KeyEventKind::Release {
        return EventResult::Continue;
    }
    if is_quit_key(key) {
        return EventResult::Quit;
    }

    if handle_key_down(app, key) == KeyUpPass::Rescan {
        app.refresh_suggestions();
    }

    EventResult::Continue
}

fn handle_key_down(app: &mut App, key: KeyEvent) -> KeyUpPass {
    let list_open = app.suggestions.is_open();

    match key.code {
        KeyCode::Up if list_open => {
            app.suggestions.select_previous();

            return KeyUpPass::Rescan;
        }
        KeyCode::Down if list_open => {
            app.suggestions.select_next();

            return KeyUpPass::Rescan;
        }
        KeyCode::Enter if list_open => {
            app.commit_selected();

            return KeyUpPass::Skip;
        }
        KeyCode::Enter => {
            app.editor.insert_line_break();
            app.close_suggestions();

            return KeyUpPass::Skip;
        }
        KeyCode::Esc => {
            app.close_suggestions();

            return KeyUpPass::Skip;
        }
        _ => {}
    }

    app.suggestions.reset_selection();

    match key.code {
        KeyCode::Up => app.editor.move_up(),
        KeyCode::Down => app.editor.move_down(),
        KeyCode::Left => app.editor.move_left(),
        KeyCode::Right => app.editor.move_right(),
        KeyCode::Home => app.editor.move_home(),
        KeyCode::End => app.editor.move_end(),
        KeyCode::Backspace => log_removed(app.editor.delete_backward()),
        KeyCode::Delete => log_removed(app.editor.delete_forward()),
        KeyCode::Char(character) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.editor.insert_char(character);
        }
        _ => return KeyUpPass::Skip,
    }

    KeyUpPass::Rescan
}

fn log_removed(removed: Option<Removed>) {
    if let Some(Removed::Mention(element)) = removed {
        info!(
            user_id = %element.user_id,
            display_name = %element.display_name,
            "removed mention"
        );
    }
}

fn is_quit_key(key: KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('c' | 'q'))
}
