//! Detection of the in-progress `@` token preceding the caret.

/// Character that starts a mention token.
pub const TRIGGER: char = '@';

/// Number of trailing words examined for a trigger; a mention query may span
/// at most this many words (a three-word name).
pub const LOOKBACK_WORDS: usize = 3;

/// Marker inserted after every committed mention.
pub const NBSP_MARKER: char = '\u{a0}';

/// Active mention token found before the caret.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MentionToken {
    query: String,
    raw_text: String,
    span_start: usize,
}

impl MentionToken {
    /// Returns the literal token text from the trigger through the caret.
    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    /// Returns the search text: the token words without the trigger, joined
    /// by single spaces.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Returns the character offset of the trigger in the scanned text.
    pub fn span_start_offset(&self) -> usize {
        self.span_start
    }

    /// Returns the token length in characters.
    pub fn char_len(&self) -> usize {
        self.raw_text.chars().count()
    }
}

/// Finds the active mention token in `text_before_cursor`.
///
/// Only the last [`LOOKBACK_WORDS`] whitespace-delimited words are examined.
/// The right-most of them starting with [`TRIGGER`] opens the token, and the
/// words after it inside the window extend it. Returns `None` when no word in
/// the window starts with the trigger.
pub fn scan(text_before_cursor: &str) -> Option<MentionToken> {
    let words = split_words(text_before_cursor);
    let window = &words[words.len().saturating_sub(LOOKBACK_WORDS)..];
    let anchor = window
        .iter()
        .rposition(|word| word.text.starts_with(TRIGGER))?;
    let token_words = &window[anchor..];
    let span_start = token_words[0].start;

    let query = token_words
        .iter()
        .enumerate()
        .map(|(index, word)| {
            if index == 0 {
                word.text[TRIGGER.len_utf8()..].to_string()
            } else {
                word.text.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(" ");
    let raw_text = text_before_cursor.chars().skip(span_start).collect();

    Some(MentionToken {
        query,
        raw_text,
        span_start,
    })
}

struct Word {
    start: usize,
    text: String,
}

/// Splits on runs of whitespace after normalizing [`NBSP_MARKER`] to a plain
/// space, keeping each word's character offset.
fn split_words(text: &str) -> Vec<Word> {
    let mut words = Vec::new();
    let mut current: Option<Word> = None;

    for (index, ch) in text.chars().enumerate() {
        let ch = if ch == NBSP_MARKER { ' ' } else { ch };

        if ch.is_whitespace() {
            if let Some(word) = current.take() {
                words.push(word);
            }

            continue;
        }

        current
            .get_or_insert_with(|| Word {
                start: index,
                text: String::new(),
            })
            .text
            .push(ch);
    }

    if let Some(word) = current {
        words.push(word);
    }

    words
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_single_word_token() {
        // Arrange
        let text = "Hi @Ann";

        // Act
        let token = scan(text).expect("token should be found");

        // Assert
        assert_eq!(token.query(), "Ann");
        assert_eq!(token.raw_text(), "@Ann");
        assert_eq!(token.span_start_offset(), 3);
    }

    #[test]
    fn test_scan_joins_following_words_inside_window() {
        // Arrange
        let text = "hello there @ann lee";

        // Act
        let token = scan(text).expect("token should be found");

        // Assert
        assert_eq!(token.query(), "ann lee");
        assert_eq!(token.raw_text(), "@ann lee");
    }

    #[test]
    fn test_scan_returns_none_when_trigger_left_the_window() {
        // Arrange: "@ann" is the fourth word from the end
        let text = "@ann lee van der";

        // Act
        let token = scan(text);

        // Assert
        assert!(token.is_none());
    }

    #[test]
    fn test_scan_accepts_three_word_query() {
        // Arrange
        let text = "@ann lee van";

        // Act
        let token = scan(text).expect("token should be found");

        // Assert
        assert_eq!(token.query(), "ann lee van");
        assert_eq!(token.span_start_offset(), 0);
    }

    #[test]
    fn test_scan_prefers_right_most_trigger() {
        // Arrange
        let text = "@bo and @ann";

        // Act
        let token = scan(text).expect("token should be found");

        // Assert
        assert_eq!(token.query(), "ann");
        assert_eq!(token.span_start_offset(), 8);
    }

    #[test]
    fn test_scan_handles_short_and_empty_input() {
        // Arrange & Act & Assert
        assert!(scan("").is_none());
        assert!(scan("   ").is_none());
        assert!(scan("hi").is_none());
        assert_eq!(scan("@").map(|token| token.query().to_string()), Some(String::new()));
    }

    #[test]
    fn test_scan_keeps_trailing_whitespace_in_raw_text() {
        // Arrange
        let text = "x @ann ";

        // Act
        let token = scan(text).expect("token should be found");

        // Assert
        assert_eq!(token.query(), "ann");
        assert_eq!(token.raw_text(), "@ann ");
        assert_eq!(token.char_len(), 5);
    }

    #[test]
    fn test_scan_normalizes_nbsp_marker_to_space() {
        // Arrange
        let text = "a\u{a0}@ann\u{a0}lee";

        // Act
        let token = scan(text).expect("token should be found");

        // Assert
        assert_eq!(token.query(), "ann lee");
        assert_eq!(token.raw_text(), "@ann\u{a0}lee");
    }

    #[test]
    fn test_scan_ignores_trigger_inside_word() {
        // Arrange
        let text = "mail me at ann@example.com";

        // Act
        let token = scan(text);

        // Assert
        assert!(token.is_none());
    }

    #[test]
    fn test_scan_counts_offsets_in_characters() {
        // Arrange
        let text = "żółw @Łukasz";

        // Act
        let token = scan(text).expect("token should be found");

        // Assert
        assert_eq!(token.span_start_offset(), 5);
        assert_eq!(token.query(), "Łukasz");
    }
}
