use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::ui::Component;

const CLOSED_HINTS: &[(&str, &str)] = &[
    ("@", "mention"),
    ("Enter", "new line"),
    ("Ctrl+C", "quit"),
];
const OPEN_HINTS: &[(&str, &str)] = &[
    ("↑/↓", "select"),
    ("Enter", "insert"),
    ("Esc", "dismiss"),
    ("click", "insert"),
];

/// Bottom bar with key hints for the current list state.
pub struct FooterBar {
    suggestions_open: bool,
}

impl FooterBar {
    pub fn new(suggestions_open: bool) -> Self {
        Self { suggestions_open }
    }
}

impl Component for FooterBar {
    fn render(&self, f: &mut Frame, area: Rect) {
        let hints = if self.suggestions_open {
            OPEN_HINTS
        } else {
            CLOSED_HINTS
        };

        let mut spans = vec![Span::raw(" ")];
        for (index, (key, action)) in hints.iter().enumerate() {
            if index > 0 {
                spans.push(Span::styled(" · ", Style::default().fg(Color::Gray)));
            }
            spans.push(Span::styled(
                *key,
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::styled(
                format!(" {action}"),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::DIM),
            ));
        }

        let footer = Paragraph::new(Line::from(spans))
            .style(Style::default().bg(Color::DarkGray).fg(Color::White));
        f.render_widget(footer, area);
    }
}
