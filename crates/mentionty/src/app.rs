use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::domain::editor::MentionEditor;
use crate::domain::matcher::match_users;
use crate::domain::token::scan;
use crate::domain::user::{User, UserDirectory};
use crate::ui::state::suggestion::SuggestionList;

/// Directory under the home folder holding logs.
pub const MENTIONTY_DIR: &str = ".mentionty";

/// Returns the mentionty home directory, falling back to a relative path when
/// no home directory is known.
pub fn mentionty_home() -> PathBuf {
    if let Some(home_dir) = dirs::home_dir() {
        return home_dir.join(MENTIONTY_DIR);
    }

    PathBuf::from(MENTIONTY_DIR)
}

/// Editing session: the user directory, the field, and the suggestion list.
///
/// All state is owned here and only mutated from the event loop.
pub struct App {
    pub directory: UserDirectory,
    pub editor: MentionEditor,
    pub suggestions: SuggestionList,
}

impl App {
    /// Creates an app with an empty field and a closed list.
    pub fn new(directory: UserDirectory) -> Self {
        Self {
            directory,
            editor: MentionEditor::new(),
            suggestions: SuggestionList::new(),
        }
    }

    /// Runs one scan and match pass for the current caret and updates the
    /// suggestion list with the result.
    pub fn refresh_suggestions(&mut self) {
        let token = scan(&self.editor.text_before_cursor());
        let candidates: Vec<User> = token
            .as_ref()
            .map(|token| {
                match_users(token, &self.directory)
                    .into_iter()
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        if let Some(token) = &token {
            debug!(
                search_term = token.query(),
                match_count = candidates.len(),
                "scanned mention token"
            );
        }

        self.suggestions.update(token, candidates);
    }

    /// Commits the highlighted user. Returns whether the list was open.
    pub fn commit_selected(&mut self) -> bool {
        let Some(user) = self.suggestions.selected_user().cloned() else {
            self.suggestions.close();

            return false;
        };

        self.commit_user(&user);

        true
    }

    /// Replaces the active token with a mention of `user` and closes the
    /// list.
    ///
    /// A token that no longer matches the field is logged and dropped,
    /// leaving the content untouched.
    pub fn commit_user(&mut self, user: &User) {
        let Some(token) = self.suggestions.active_token().cloned() else {
            self.suggestions.close();

            return;
        };

        match self.editor.commit_mention(&token, user) {
            Ok(element) => {
                info!(
                    user_id = %element.user_id,
                    display_name = %element.display_name,
                    "committed mention"
                );
            }
            Err(error) => {
                warn!(%error, "discarded mention commit");
            }
        }

        self.suggestions.close();
    }

    /// Closes the suggestion list without touching the field.
    pub fn close_suggestions(&mut self) {
        self.suggestions.close();
    }

    /// Inserts pasted text at the caret and re-scans.
    pub fn paste(&mut self, text: &str) {
        let normalized = text.replace("\r\n", "\n").replace('\r', "\n");

        for (index, line) in normalized.split('\n').enumerate() {
            if index > 0 {
                self.editor.insert_line_break();
            }
            self.editor.insert_text(line);
        }

        self.suggestions.reset_selection();
        self.refresh_suggestions();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::document::Node;

    fn directory() -> UserDirectory {
        UserDirectory::new(vec![
            User::new("1", "Ann Lee"),
            User::new("2", "Bob Stone"),
            User::new("3", "Anna Park"),
        ])
    }

    fn type_text(app: &mut App, text: &str) {
        for ch in text.chars() {
            app.editor.insert_char(ch);
            app.refresh_suggestions();
        }
    }

    #[test]
    fn test_mentionty_home_ends_with_dir() {
        // Arrange & Act
        let home = mentionty_home();

        // Assert
        assert!(home.ends_with(MENTIONTY_DIR));
    }

    #[test]
    fn test_refresh_suggestions_opens_list_for_matching_token() {
        // Arrange
        let mut app = App::new(directory());

        // Act
        type_text(&mut app, "Hi @an");

        // Assert
        assert!(app.suggestions.is_open());
        assert_eq!(app.suggestions.selection().candidates.len(), 2);
        assert_eq!(
            app.suggestions.active_token().map(|token| token.query()),
            Some("an")
        );
    }

    #[test]
    fn test_refresh_suggestions_closes_list_without_match() {
        // Arrange
        let mut app = App::new(directory());
        type_text(&mut app, "@an");

        // Act
        type_text(&mut app, "x");

        // Assert
        assert!(!app.suggestions.is_open());
    }

    #[test]
    fn test_commit_selected_replaces_token_with_mention() {
        // Arrange
        let mut app = App::new(directory());
        type_text(&mut app, "Hi @bo");

        // Act
        let committed = app.commit_selected();

        // Assert
        assert!(committed);
        assert!(!app.suggestions.is_open());
        let nodes = app.editor.document().nodes();
        assert_eq!(nodes.len(), 3);
        assert!(matches!(&nodes[1], Node::Mention(element) if element.user_id.as_str() == "2"));
    }

    #[test]
    fn test_commit_selected_on_closed_list_is_noop() {
        // Arrange
        let mut app = App::new(directory());
        type_text(&mut app, "plain");

        // Act
        let committed = app.commit_selected();

        // Assert
        assert!(!committed);
        assert_eq!(app.editor.text(), "plain");
    }

    #[test]
    fn test_commit_user_with_stale_token_leaves_content() {
        // Arrange
        let mut app = App::new(directory());
        type_text(&mut app, "@ann");
        app.editor.insert_text(" later");

        // Act
        app.commit_user(&User::new("1", "Ann Lee"));

        // Assert
        assert_eq!(app.editor.text(), "@ann later");
        assert!(!app.suggestions.is_open());
    }

    #[test]
    fn test_refresh_after_commit_keeps_list_closed() {
        // Arrange
        let mut app = App::new(directory());
        type_text(&mut app, "@ann");
        app.commit_selected();

        // Act
        app.refresh_suggestions();

        // Assert
        assert!(!app.suggestions.is_open());
    }

    #[test]
    fn test_paste_inserts_lines_and_rescans() {
        // Arrange
        let mut app = App::new(directory());

        // Act
        app.paste("first\r\nsecond @bob");

        // Assert
        assert_eq!(app.editor.text(), "first\nsecond @bob");
        assert!(app.suggestions.is_open());
        assert_eq!(
            app.suggestions.selected_user().map(|user| user.id.as_str()),
            Some("2")
        );
    }
}
