use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::domain::document::Document;
use crate::ui::Component;
use crate::ui::layout::{PROMPT_PREFIX, compute_composer_layout, prompt_style};

/// Editable message field with committed mentions.
pub struct Composer<'a> {
    caret_cell: Option<Position>,
    document: &'a Document,
    placeholder: &'a str,
    scroll_offset: u16,
    title: &'a str,
}

impl<'a> Composer<'a> {
    /// Creates a composer for `document`.
    pub fn new(title: &'a str, document: &'a Document) -> Self {
        Self {
            caret_cell: None,
            document,
            placeholder: "",
            scroll_offset: 0,
            title,
        }
    }

    /// Sets the placeholder shown while the document is empty.
    #[must_use]
    pub fn placeholder(mut self, placeholder: &'a str) -> Self {
        self.placeholder = placeholder;
        self
    }

    /// Sets the terminal cell the cursor is drawn at.
    #[must_use]
    pub fn caret_cell(mut self, caret_cell: Option<Position>) -> Self {
        self.caret_cell = caret_cell;
        self
    }

    /// Sets the number of content lines scrolled out above the viewport.
    #[must_use]
    pub fn scroll_offset(mut self, scroll_offset: u16) -> Self {
        self.scroll_offset = scroll_offset;
        self
    }
}

impl Component for Composer<'_> {
    fn render(&self, f: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(Span::styled(self.title, Style::default().fg(Color::Cyan)));

        let widget = if self.document.is_empty() {
            Paragraph::new(Line::from(vec![
                Span::styled(PROMPT_PREFIX, prompt_style()),
                Span::styled(self.placeholder, Style::default().fg(Color::DarkGray)),
            ]))
            .block(block)
        } else {
            let composer_layout = compute_composer_layout(self.document, area.width);

            Paragraph::new(composer_layout.display_lines)
                .scroll((self.scroll_offset, 0))
                .block(block)
        };

        f.render_widget(Clear, area);
        f.render_widget(widget, area);

        if let Some(caret_cell) = self.caret_cell {
            f.set_cursor_position(caret_cell);
        }
    }
}
