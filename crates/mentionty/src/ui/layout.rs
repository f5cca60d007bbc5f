use ratatui::layout::{Constraint, Layout, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use unicode_width::UnicodeWidthChar;

use crate::domain::document::{Document, UnitKind};
use crate::domain::editor::MentionEditor;
use crate::domain::token::NBSP_MARKER;
use crate::ui::components::suggestion_list::entry_text;
use crate::ui::state::suggestion::SuggestionList;

/// Maximum number of visible content lines inside the composer viewport.
pub const COMPOSER_MAX_VISIBLE_LINES: u16 = 10;

/// Prompt shown at the start of the first composer line.
pub const PROMPT_PREFIX: &str = " › ";

const COMPOSER_BORDER_HEIGHT: u16 = 2;
const SUGGESTION_POPUP_MIN_WIDTH: u16 = 16;

/// Wrapped composer lines and the cell of every caret offset.
///
/// `caret_positions[caret]` holds the `(x, y)` cell of `caret` relative to
/// the composer's inner area, before scrolling.
pub struct ComposerLayout {
    pub caret_positions: Vec<(usize, usize)>,
    pub display_lines: Vec<Line<'static>>,
}

impl ComposerLayout {
    /// Returns the cell of `caret`, clamped to the document end.
    pub fn caret_cell(&self, caret: usize) -> (usize, usize) {
        let clamped_caret = caret.min(self.caret_positions.len().saturating_sub(1));

        self.caret_positions
            .get(clamped_caret)
            .copied()
            .unwrap_or((prompt_prefix_width(), 0))
    }

    /// Returns the caret offset closest to the content cell `(x, y)`.
    ///
    /// Rows below the last line resolve to the last line.
    pub fn caret_at(&self, x: usize, y: usize) -> usize {
        let max_y = self
            .caret_positions
            .iter()
            .map(|(_, cursor_y)| *cursor_y)
            .max()
            .unwrap_or(0);

        select_cursor_on_line(y.min(max_y), x, &self.caret_positions, 0)
    }

    /// Returns the number of wrapped lines, counting a caret that wrapped onto
    /// an empty trailing line.
    pub fn line_count(&self) -> usize {
        let caret_lines = self
            .caret_positions
            .last()
            .map_or(1, |(_, cursor_y)| cursor_y + 1);

        self.display_lines.len().max(caret_lines)
    }
}

/// Screen areas of a single frame.
///
/// Computed from scratch for every draw and every click, so the suggestion
/// popup anchor always follows the current caret.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FrameLayout {
    /// Terminal cell of the caret; `None` when the composer has no room.
    pub caret_cell: Option<Position>,
    pub composer: Rect,
    pub footer_bar: Rect,
    /// Lines of composer content hidden above the viewport.
    pub scroll_offset: u16,
    pub status_bar: Rect,
    pub suggestion_popup: Option<Rect>,
}

impl FrameLayout {
    /// Maps a terminal cell inside the composer to a caret offset.
    pub fn composer_caret_at(&self, document: &Document, column: u16, row: u16) -> Option<usize> {
        let inner = composer_inner_area(self.composer);
        if !inner.contains(Position::new(column, row)) {
            return None;
        }

        let composer_layout = compute_composer_layout(document, self.composer.width);
        let x = usize::from(column - inner.x);
        let y = usize::from(row - inner.y + self.scroll_offset);

        Some(composer_layout.caret_at(x, y))
    }

    /// Returns the suggestion row under a terminal cell, excluding borders.
    pub fn suggestion_row_at(&self, column: u16, row: u16) -> Option<usize> {
        let popup = self.suggestion_popup?;
        let inner = composer_inner_area(popup);
        if !inner.contains(Position::new(column, row)) {
            return None;
        }

        Some(usize::from(row - inner.y))
    }
}

/// Splits the frame into status bar, composer, and footer, and anchors the
/// suggestion popup to the caret cell.
pub fn frame_layout(
    area: Rect,
    editor: &MentionEditor,
    suggestions: &SuggestionList,
) -> FrameLayout {
    let [status_bar, content, footer_bar] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    let composer_height = calculate_composer_height(editor.document(), content.width);
    let [_, composer] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(composer_height)]).areas(content);

    let composer_layout = compute_composer_layout(editor.document(), composer.width);
    let (cursor_x, cursor_y) = composer_layout.caret_cell(editor.caret());
    let viewport_height = composer
        .height
        .saturating_sub(COMPOSER_BORDER_HEIGHT)
        .min(COMPOSER_MAX_VISIBLE_LINES);
    let (scroll_offset, cursor_row) = calculate_composer_viewport(
        composer_layout.line_count(),
        u16::try_from(cursor_y).unwrap_or(u16::MAX),
        viewport_height,
    );

    let inner = composer_inner_area(composer);
    let caret_cell = u16::try_from(cursor_x)
        .ok()
        .map(|cursor_x| {
            Position::new(
                inner.x.saturating_add(cursor_x),
                inner.y.saturating_add(cursor_row),
            )
        })
        .filter(|position| inner.contains(*position));
    let suggestion_popup =
        caret_cell.and_then(|caret_cell| suggestion_popup_area(area, caret_cell, suggestions));

    FrameLayout {
        caret_cell,
        composer,
        footer_bar,
        scroll_offset,
        status_bar,
        suggestion_popup,
    }
}

/// Calculates the composer height with a capped visible viewport.
///
/// The returned height includes top and bottom borders and limits the visible
/// content area to [`COMPOSER_MAX_VISIBLE_LINES`].
pub fn calculate_composer_height(document: &Document, width: u16) -> u16 {
    let content_line_count =
        u16::try_from(compute_composer_layout(document, width).line_count()).unwrap_or(u16::MAX);

    content_line_count
        .min(COMPOSER_MAX_VISIBLE_LINES)
        .saturating_add(COMPOSER_BORDER_HEIGHT)
}

/// Calculates the composer viewport scroll offset and caret row inside it.
///
/// Returns `(scroll_offset, cursor_row)`.
pub fn calculate_composer_viewport(
    total_line_count: usize,
    cursor_y: u16,
    viewport_height: u16,
) -> (u16, u16) {
    if viewport_height == 0 {
        return (0, 0);
    }

    let total_line_count = u16::try_from(total_line_count).unwrap_or(u16::MAX).max(1);
    let clamped_cursor_y = cursor_y.min(total_line_count.saturating_sub(1));
    let viewport_height = viewport_height.min(total_line_count);
    let max_scroll = total_line_count.saturating_sub(viewport_height);
    let scroll_offset = clamped_cursor_y
        .saturating_sub(viewport_height.saturating_sub(1))
        .min(max_scroll);
    let cursor_row = clamped_cursor_y.saturating_sub(scroll_offset);

    (scroll_offset, cursor_row)
}

/// Computes composer lines and caret cells for `document` in a block of
/// `width` columns.
///
/// The first line starts with [`PROMPT_PREFIX`]; continuation lines are padded
/// to the same column. Mention labels are styled and moved to the next line
/// as a whole when they do not fit, unless they start a line. The marker
/// after a mention is drawn as a plain space.
pub fn compute_composer_layout(document: &Document, width: u16) -> ComposerLayout {
    let inner_width = usize::from(width.saturating_sub(2));
    let prefix_span = Span::styled(PROMPT_PREFIX, prompt_style());
    let prefix_width = prefix_span.width();
    let continuation_padding = " ".repeat(prefix_width);
    let units = document.units();

    let mut display_lines = Vec::new();
    let mut caret_positions = Vec::with_capacity(units.len() + 1);
    let mut current_line_spans = vec![prefix_span];
    let mut current_width = prefix_width;
    let mut line_index: usize = 0;

    for unit in units {
        if unit.kind == UnitKind::LineBreak {
            caret_positions.push((current_width, line_index));
            display_lines.push(Line::from(std::mem::take(&mut current_line_spans)));
            current_line_spans = vec![Span::raw(continuation_padding.clone())];
            current_width = prefix_width;
            line_index += 1;

            continue;
        }

        let (symbol, style) = match unit.kind {
            UnitKind::Mention { .. } => (unit.ch, mention_style()),
            _ if unit.ch == NBSP_MARKER => (' ', Style::default()),
            _ => (unit.ch, Style::default()),
        };
        let char_width = symbol.width().unwrap_or(0);
        let required_width = match unit.kind {
            UnitKind::Mention {
                element,
                position: 0,
            } if current_width > prefix_width => element
                .label()
                .chars()
                .map(|ch| ch.width().unwrap_or(0))
                .sum(),
            _ => char_width,
        };

        if current_width + required_width > inner_width {
            display_lines.push(Line::from(std::mem::take(&mut current_line_spans)));
            current_line_spans = vec![Span::raw(continuation_padding.clone())];
            current_width = prefix_width;
            line_index += 1;
        }

        caret_positions.push((current_width, line_index));
        current_line_spans.push(Span::styled(symbol.to_string(), style));
        current_width += char_width;
    }

    if current_width >= inner_width {
        caret_positions.push((prefix_width, line_index + 1));
    } else {
        caret_positions.push((current_width, line_index));
    }

    if !current_line_spans.is_empty() {
        display_lines.push(Line::from(current_line_spans));
    }

    ComposerLayout {
        caret_positions,
        display_lines,
    }
}

/// Places the suggestion popup with its left edge on the caret column and
/// its bottom edge on the row above the caret, clamped inside `frame`.
///
/// Returns `None` while the list is closed.
pub fn suggestion_popup_area(
    frame: Rect,
    caret_cell: Position,
    suggestions: &SuggestionList,
) -> Option<Rect> {
    let entries = suggestions.entries();
    if entries.is_empty() {
        return None;
    }

    let content_width = entries
        .iter()
        .map(|entry| {
            entry_text(entry)
                .chars()
                .map(|ch| ch.width().unwrap_or(0))
                .sum::<usize>()
        })
        .max()
        .unwrap_or(0);
    let width = u16::try_from(content_width)
        .unwrap_or(u16::MAX)
        .saturating_add(2)
        .max(SUGGESTION_POPUP_MIN_WIDTH)
        .min(frame.width);
    let height = u16::try_from(entries.len())
        .unwrap_or(u16::MAX)
        .saturating_add(2)
        .min(frame.height);

    let max_x = frame.right().saturating_sub(width);
    let x = caret_cell.x.clamp(frame.x, max_x.max(frame.x));
    let y = caret_cell.y.saturating_sub(height).max(frame.y);

    Some(Rect::new(x, y, width, height))
}

/// Style of the prompt prefix.
pub fn prompt_style() -> Style {
    Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

/// Style of committed mention labels.
pub fn mention_style() -> Style {
    Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

fn prompt_prefix_width() -> usize {
    Span::raw(PROMPT_PREFIX).width()
}

fn composer_inner_area(area: Rect) -> Rect {
    Rect::new(
        area.x.saturating_add(1),
        area.y.saturating_add(1),
        area.width.saturating_sub(2),
        area.height.saturating_sub(2),
    )
}

fn select_cursor_on_line(
    target_y: usize,
    target_x: usize,
    cursor_positions: &[(usize, usize)],
    fallback_cursor: usize,
) -> usize {
    let mut best_cursor_on_left: Option<(usize, usize)> = None;
    let mut nearest_cursor_on_right: Option<(usize, usize)> = None;

    for (cursor_index, (cursor_x, cursor_y)) in cursor_positions.iter().copied().enumerate() {
        if cursor_y != target_y {
            continue;
        }

        if cursor_x <= target_x {
            match best_cursor_on_left {
                Some((_, best_x)) if cursor_x < best_x => {}
                _ => {
                    best_cursor_on_left = Some((cursor_index, cursor_x));
                }
            }
        } else {
            match nearest_cursor_on_right {
                Some((_, nearest_x)) if cursor_x > nearest_x => {}
                _ => {
                    nearest_cursor_on_right = Some((cursor_index, cursor_x));
                }
            }
        }
    }

    best_cursor_on_left
        .or(nearest_cursor_on_right)
        .map_or(fallback_cursor, |(cursor_index, _)| cursor_index)
}
