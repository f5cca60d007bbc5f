use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::domain::token::TRIGGER;
use crate::ui::Component;
use crate::ui::state::suggestion::{SuggestionEntry, SuggestionList};

/// Returns the text drawn for one suggestion row.
pub fn entry_text(entry: &SuggestionEntry<'_>) -> String {
    match entry {
        SuggestionEntry::User { selected, user } => {
            let prefix = if *selected { ">" } else { " " };

            format!("{prefix} {TRIGGER}{}", user.display_name)
        }
        SuggestionEntry::Overflow { hidden } => format!("  … {hidden} more"),
    }
}

/// Bordered `@` suggestion popup drawn over the composer.
pub struct SuggestionPopup<'a> {
    suggestions: &'a SuggestionList,
}

impl<'a> SuggestionPopup<'a> {
    /// Creates a popup for the given list state.
    pub fn new(suggestions: &'a SuggestionList) -> Self {
        Self { suggestions }
    }
}

impl Component for SuggestionPopup<'_> {
    fn render(&self, f: &mut Frame, area: Rect) {
        let rows = self
            .suggestions
            .entries()
            .iter()
            .map(|entry| {
                let style = match entry {
                    SuggestionEntry::User { selected: true, .. } => Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                    SuggestionEntry::User { selected: false, .. } => {
                        Style::default().fg(Color::Gray)
                    }
                    SuggestionEntry::Overflow { .. } => Style::default().fg(Color::DarkGray),
                };

                Line::from(Span::styled(entry_text(entry), style))
            })
            .collect::<Vec<_>>();

        let popup = Paragraph::new(rows).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(Span::styled("Mention", Style::default().fg(Color::Cyan))),
        );

        f.render_widget(Clear, area);
        f.render_widget(popup, area);
    }
}

#[cfg(test)]
mod tests {
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use super::*;
    use crate::domain::token::scan;
    use crate::domain::user::User;
    use crate::ui::state::suggestion::MAX_VISIBLE_USERS;

    fn suggestions(count: usize) -> SuggestionList {
        let users = (0..count)
            .map(|index| User::new(index.to_string(), format!("Ada {index}")))
            .collect();
        let mut suggestions = SuggestionList::new();
        suggestions.update(scan("@a"), users);

        suggestions
    }

    fn render_to_text(suggestions: &SuggestionList) -> String {
        let backend = TestBackend::new(30, 12);
        let mut terminal = Terminal::new(backend).expect("failed to create terminal");
        let popup = SuggestionPopup::new(suggestions);

        terminal
            .draw(|f| {
                let area = f.area();
                popup.render(f, area);
            })
            .expect("failed to draw");

        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(ratatui::buffer::Cell::symbol)
            .collect()
    }

    #[test]
    fn test_entry_text_marks_selected_user() {
        // Arrange
        let user = User::new("1", "Ann Lee");

        // Act
        let selected = entry_text(&SuggestionEntry::User {
            selected: true,
            user: &user,
        });
        let unselected = entry_text(&SuggestionEntry::User {
            selected: false,
            user: &user,
        });

        // Assert
        assert_eq!(selected, "> @Ann Lee");
        assert_eq!(unselected, "  @Ann Lee");
    }

    #[test]
    fn test_render_shows_selected_entry() {
        // Arrange
        let suggestions = suggestions(2);

        // Act
        let text = render_to_text(&suggestions);

        // Assert
        assert!(text.contains("> @Ada 0"));
        assert!(text.contains("  @Ada 1"));
        assert!(!text.contains("more"));
    }

    #[test]
    fn test_render_caps_entries_and_shows_overflow_row() {
        // Arrange
        let suggestions = suggestions(MAX_VISIBLE_USERS + 2);

        // Act
        let text = render_to_text(&suggestions);

        // Assert
        assert!(text.contains("@Ada 7"));
        assert!(!text.contains("@Ada 8"));
        assert!(text.contains("… 2 more"));
    }
}
