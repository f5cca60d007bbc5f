use ratatui::Frame;
use ratatui::layout::Rect;

use crate::domain::editor::MentionEditor;
use crate::ui::components;
use crate::ui::layout::frame_layout;
use crate::ui::state::suggestion::SuggestionList;

const COMPOSER_TITLE: &str = " Message ";
const COMPOSER_PLACEHOLDER: &str = "Type @ to mention someone";

/// A trait for UI components that enforces a standard rendering interface.
pub trait Component {
    /// Renders a component in the provided frame and area.
    fn render(&self, f: &mut Frame, area: Rect);
}

/// Immutable data required to draw a single UI frame.
pub struct RenderContext<'a> {
    pub directory_size: usize,
    pub editor: &'a MentionEditor,
    pub suggestions: &'a SuggestionList,
}

/// Renders a complete frame: status bar, composer, footer, and the suggestion
/// popup anchored to the caret.
pub fn render(f: &mut Frame, context: RenderContext<'_>) {
    let RenderContext {
        directory_size,
        editor,
        suggestions,
    } = context;
    let layout = frame_layout(f.area(), editor, suggestions);

    components::status_bar::StatusBar::new(directory_size, editor.document().mention_count())
        .render(f, layout.status_bar);
    components::composer::Composer::new(COMPOSER_TITLE, editor.document())
        .placeholder(COMPOSER_PLACEHOLDER)
        .caret_cell(layout.caret_cell)
        .scroll_offset(layout.scroll_offset)
        .render(f, layout.composer);
    components::footer_bar::FooterBar::new(suggestions.is_open()).render(f, layout.footer_bar);

    if let Some(popup_area) = layout.suggestion_popup {
        components::suggestion_list::SuggestionPopup::new(suggestions).render(f, popup_area);
    }
}
