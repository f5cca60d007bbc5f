use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;

use crate::app::App;
use crate::ui::layout::frame_layout;

/// Handles a left click on the suggestion popup or the composer.
///
/// The layout is rebuilt from `area` so hit-testing always uses the anchor of
/// the current caret. Clicks on the overflow row and outside both areas are
/// ignored.
pub(crate) fn handle_mouse_event(app: &mut App, area: Rect, mouse: MouseEvent) {
    if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
        return;
    }

    let layout = frame_layout(area, &app.editor, &app.suggestions);

    if let Some(row) = layout.suggestion_row_at(mouse.column, mouse.row) {
        if let Some(user) = app.suggestions.user_at_row(row).cloned() {
            app.commit_user(&user);
        }

        return;
    }

    if let Some(caret) = layout.composer_caret_at(app.editor.document(), mouse.column, mouse.row)
    {
        app.editor.set_caret(caret);
        app.suggestions.reset_selection();
        app.refresh_suggestions();
    }
}
