use thiserror::Error;

use crate::domain::document::{CursorPosition, Document, MentionElement, Node, Removed};
use crate::domain::token::{MentionToken, NBSP_MARKER};
use crate::domain::user::User;

/// Direction of a delete key.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DeleteDirection {
    Backward,
    Forward,
}

/// Failure to apply an edit; content is left untouched.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum EditError {
    #[error("mention token `{raw_text}` no longer ends at the cursor")]
    StaleToken { raw_text: String },
}

/// Editable field content with a caret measured in rendered units.
///
/// The caret is the only stored position; [`CursorPosition`] values are
/// resolved from it on demand and never kept across edits.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct MentionEditor {
    caret: usize,
    document: Document,
}

impl MentionEditor {
    /// Creates an empty editor with the caret at position `0`.
    pub fn new() -> Self {
        Self {
            caret: 0,
            document: Document::new(),
        }
    }

    /// Creates an editor from plain text with the caret at the end.
    pub fn with_text(text: &str) -> Self {
        let document = Document::from_text(text);
        let caret = document.len();

        Self { caret, document }
    }

    /// Returns the field content.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Returns the caret offset.
    pub fn caret(&self) -> usize {
        self.caret
    }

    /// Moves the caret, clamped to the document.
    pub fn set_caret(&mut self, caret: usize) {
        self.caret = caret.min(self.document.len());
    }

    /// Returns the resolved `(node, offset)` of the caret.
    pub fn cursor_position(&self) -> CursorPosition {
        self.document.cursor_position(self.caret)
    }

    /// Returns whether the field is empty.
    pub fn is_empty(&self) -> bool {
        self.document.is_empty()
    }

    /// Returns the rendered content text.
    pub fn text(&self) -> String {
        self.document.rendered_text()
    }

    /// Returns the text a mention token may be scanned from: everything
    /// between the last mention or line break and the caret.
    ///
    /// Empty while the caret sits inside a mention.
    pub fn text_before_cursor(&self) -> String {
        if self.document.mention_around(self.caret).is_some() {
            return String::new();
        }

        let start = self.document.scan_start(self.caret);

        self.document.slice(start, self.caret)
    }

    /// Inserts one character at the caret and advances past it.
    pub fn insert_char(&mut self, ch: char) {
        if ch == '\n' {
            self.insert_line_break();

            return;
        }

        self.insert_text(ch.encode_utf8(&mut [0; 4]));
    }

    /// Inserts `text` at the caret and moves the caret to its end.
    pub fn insert_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }

        self.leave_mention();
        self.document.insert_text(self.caret, text);
        self.caret += text.chars().count();
    }

    /// Inserts a line break at the caret and advances past it.
    pub fn insert_line_break(&mut self) {
        self.leave_mention();
        self.document.insert_nodes(self.caret, vec![Node::LineBreak]);
        self.caret += 1;
    }

    /// Replaces `token` with a mention of `user` followed by one
    /// non-breaking-space marker, leaving the caret after the marker.
    ///
    /// The token is located relative to the caret; text before the token and
    /// after the caret is kept as is.
    ///
    /// # Errors
    /// Returns [`EditError::StaleToken`] when the text before the caret no
    /// longer ends with `token`.
    pub fn commit_mention(
        &mut self,
        token: &MentionToken,
        user: &User,
    ) -> Result<MentionElement, EditError> {
        let stale = || EditError::StaleToken {
            raw_text: token.raw_text().to_string(),
        };
        let before = self.text_before_cursor();
        let token_len = token.char_len();
        let before_len = before.chars().count();

        if before_len < token_len
            || before_len - token_len != token.span_start_offset()
            || !before.ends_with(token.raw_text())
        {
            return Err(stale());
        }

        let start = self.caret - token_len;
        if !self.document.remove_text_range(start, self.caret) {
            return Err(stale());
        }

        let element = MentionElement::from_user(user);
        let element_len = element.label_len();
        self.document.insert_nodes(
            start,
            vec![
                Node::Mention(element.clone()),
                Node::Text(NBSP_MARKER.to_string()),
            ],
        );
        self.caret = start + element_len + 1;

        Ok(element)
    }

    /// Removes the whole mention the caret is inside of, or the one directly
    /// behind (backward) or ahead of (forward) the caret. Forward also covers
    /// a caret sitting between a mention and its marker.
    ///
    /// Returns `None` without touching content when no mention is at the
    /// boundary, so ordinary deletion can proceed.
    pub fn delete_mention_if_at_boundary(
        &mut self,
        direction: DeleteDirection,
    ) -> Option<MentionElement> {
        let span = self.document.mention_around(self.caret).or_else(|| {
            match direction {
                DeleteDirection::Backward => self.document.mention_span(self.caret.checked_sub(1)?),
                DeleteDirection::Forward => self
                    .document
                    .mention_span(self.caret)
                    .or_else(|| self.document.mention_ending_at(self.caret)),
            }
        })?;

        let element = self.document.remove_mention(span.node)?;
        self.caret = span.start;

        Some(element)
    }

    /// Deletes the unit before the caret; a mention there goes as a whole.
    pub fn delete_backward(&mut self) -> Option<Removed> {
        if let Some(element) = self.delete_mention_if_at_boundary(DeleteDirection::Backward) {
            return Some(Removed::Mention(element));
        }
        if self.caret == 0 {
            return None;
        }

        let removed = self.document.remove_unit(self.caret - 1)?;
        self.caret -= 1;

        Some(removed)
    }

    /// Deletes the unit at the caret; a mention there goes as a whole.
    pub fn delete_forward(&mut self) -> Option<Removed> {
        if let Some(element) = self.delete_mention_if_at_boundary(DeleteDirection::Forward) {
            return Some(Removed::Mention(element));
        }

        self.document.remove_unit(self.caret)
    }

    /// Moves the caret one unit left, stepping over a mention as a whole.
    pub fn move_left(&mut self) {
        self.caret = self.caret.saturating_sub(1);
        if let Some(span) = self.document.mention_around(self.caret) {
            self.caret = span.start;
        }
    }

    /// Moves the caret one unit right, stepping over a mention as a whole.
    pub fn move_right(&mut self) {
        if self.caret < self.document.len() {
            self.caret += 1;
        }
        if let Some(span) = self.document.mention_around(self.caret) {
            self.caret = span.end;
        }
    }

    /// Moves the caret to the start of the field.
    pub fn move_home(&mut self) {
        self.caret = 0;
    }

    /// Moves the caret to the end of the field.
    pub fn move_end(&mut self) {
        self.caret = self.document.len();
    }

    /// Moves the caret to the previous line while preserving its column.
    pub fn move_up(&mut self) {
        let text = self.document.rendered_text();
        let (line, column) = line_column(&text, self.caret);
        if line == 0 {
            self.caret = 0;

            return;
        }

        let prev_line_start = line_start(&text, line - 1);
        let prev_line_len = line_len(&text, prev_line_start);
        self.caret = prev_line_start + column.min(prev_line_len);
    }

    /// Moves the caret to the next line while preserving its column.
    pub fn move_down(&mut self) {
        let text = self.document.rendered_text();
        let (line, column) = line_column(&text, self.caret);
        let line_count = text.chars().filter(|&ch| ch == '\n').count() + 1;

        if line >= line_count - 1 {
            self.caret = text.chars().count();

            return;
        }

        let next_line_start = line_start(&text, line + 1);
        let next_line_len = line_len(&text, next_line_start);
        self.caret = next_line_start + column.min(next_line_len);
    }

    /// Moves a caret that sits inside a mention, or between a mention and its
    /// marker, past the mention and the marker.
    fn leave_mention(&mut self) {
        let Some(span) = self
            .document
            .mention_around(self.caret)
            .or_else(|| self.document.mention_ending_at(self.caret))
        else {
            return;
        };

        self.caret = span.end;
        if self.document.slice(span.end, span.end + 1).starts_with(NBSP_MARKER) {
            self.caret += 1;
        }
    }
}

fn line_column(text: &str, caret: usize) -> (usize, usize) {
    let mut line = 0;
    let mut column = 0;

    for (index, ch) in text.chars().enumerate() {
        if index == caret {
            break;
        }
        if ch == '\n' {
            line += 1;
            column = 0;
        } else {
            column += 1;
        }
    }

    (line, column)
}

fn line_start(text: &str, line: usize) -> usize {
    if line == 0 {
        return 0;
    }

    text.chars()
        .enumerate()
        .filter(|(_, ch)| *ch == '\n')
        .nth(line - 1)
        .map_or(text.chars().count(), |(index, _)| index + 1)
}

fn line_len(text: &str, start: usize) -> usize {
    text.chars()
        .skip(start)
        .take_while(|&ch| ch != '\n')
        .count()
}
