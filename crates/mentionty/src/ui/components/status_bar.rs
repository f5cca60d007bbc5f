use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::ui::Component;

const BAR_STYLE: Style = Style::new().bg(Color::DarkGray).fg(Color::White);

/// Top bar with the app name on the left and mention and directory counters
/// on the right.
pub struct StatusBar {
    directory_size: usize,
    mention_count: usize,
}

impl StatusBar {
    pub fn new(directory_size: usize, mention_count: usize) -> Self {
        Self {
            directory_size,
            mention_count,
        }
    }

    fn counter_spans(&self) -> Vec<Span<'static>> {
        let mut spans = Vec::new();

        match self.mention_count {
            0 => {}
            1 => spans.push(Span::styled("1 mention", Style::new().fg(Color::Cyan))),
            count => spans.push(Span::styled(
                format!("{count} mentions"),
                Style::new().fg(Color::Cyan),
            )),
        }
        if !spans.is_empty() {
            spans.push(Span::raw(" · "));
        }

        spans.push(match self.directory_size {
            0 => Span::styled("no users", Style::new().fg(Color::Yellow)),
            1 => Span::styled("1 user", Style::new().fg(Color::Gray)),
            count => Span::styled(format!("{count} users"), Style::new().fg(Color::Gray)),
        });
        spans.push(Span::raw(" "));

        spans
    }
}

impl Component for StatusBar {
    fn render(&self, f: &mut Frame, area: Rect) {
        let counters = Line::from(self.counter_spans());
        let counters_width = u16::try_from(counters.width()).unwrap_or(u16::MAX);
        let [title_area, counters_area] =
            Layout::horizontal([Constraint::Min(0), Constraint::Length(counters_width)])
                .areas(area);

        let title = Line::from(Span::styled(
            format!(" Mentionty v{}", env!("CARGO_PKG_VERSION")),
            Style::new().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ));

        f.render_widget(Paragraph::new(title).style(BAR_STYLE), title_area);
        f.render_widget(Paragraph::new(counters).style(BAR_STYLE), counters_area);
    }
}

#[cfg(test)]
mod tests {
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use super::*;

    fn render_to_text(status_bar: &StatusBar) -> String {
        let backend = TestBackend::new(60, 1);
        let mut terminal = Terminal::new(backend).expect("failed to create terminal");

        terminal
            .draw(|f| {
                let area = f.area();
                status_bar.render(f, area);
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
    fn test_status_bar_render_shows_version_and_user_count() {
        // Arrange
        let status_bar = StatusBar::new(12, 0);

        // Act
        let text = render_to_text(&status_bar);

        // Assert
        assert!(text.contains(&format!("Mentionty v{}", env!("CARGO_PKG_VERSION"))));
        assert!(text.trim_end().ends_with("12 users"));
    }

    #[test]
    fn test_status_bar_render_singular_user() {
        // Arrange
        let status_bar = StatusBar::new(1, 0);

        // Act
        let text = render_to_text(&status_bar);

        // Assert
        assert!(text.contains("1 user"));
        assert!(!text.contains("1 users"));
    }

    #[test]
    fn test_status_bar_render_counts_mentions_before_users() {
        // Arrange
        let status_bar = StatusBar::new(12, 2);

        // Act
        let text = render_to_text(&status_bar);

        // Assert
        assert!(text.trim_end().ends_with("2 mentions · 12 users"));
    }

    #[test]
    fn test_status_bar_render_flags_empty_directory() {
        // Arrange
        let status_bar = StatusBar::new(0, 0);

        // Act
        let text = render_to_text(&status_bar);

        // Assert
        assert!(text.trim_end().ends_with("no users"));
        assert!(!text.contains("mention"));
    }
}
