use tracing::debug;

use crate::domain::token::MentionToken;
use crate::domain::user::User;

/// Maximum number of selectable entries shown in the suggestion list.
pub const MAX_VISIBLE_USERS: usize = 8;

/// Visibility of the suggestion list.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ListStatus {
    #[default]
    Closed,
    Open,
}

/// Highlighted index and the candidate snapshot it indexes into.
///
/// The index is only meaningful while `candidates` is non-empty.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SelectionState {
    pub candidates: Vec<User>,
    pub selected_index: usize,
}

impl SelectionState {
    /// Returns the highest selectable index, or `None` without candidates.
    fn max_index(&self) -> Option<usize> {
        self.candidates
            .len()
            .min(MAX_VISIBLE_USERS)
            .checked_sub(1)
    }
}

/// One rendered row of the suggestion list.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SuggestionEntry<'a> {
    User { selected: bool, user: &'a User },
    /// Non-selectable marker for matches beyond [`MAX_VISIBLE_USERS`].
    Overflow { hidden: usize },
}

/// State of the `@` suggestion dropdown.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SuggestionList {
    selection: SelectionState,
    status: ListStatus,
    token: Option<MentionToken>,
}

impl SuggestionList {
    /// Creates a closed list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies the result of a scan and match pass.
    ///
    /// Opens the list for a token with at least one candidate and closes it
    /// otherwise. The current highlight is kept, clamped to the new
    /// candidates.
    pub fn update(&mut self, token: Option<MentionToken>, candidates: Vec<User>) {
        let Some(token) = token else {
            self.close();

            return;
        };
        if candidates.is_empty() {
            self.close();

            return;
        }

        if self.status == ListStatus::Closed {
            debug!(query = token.query(), "suggestion list opened");
        }
        self.status = ListStatus::Open;
        self.token = Some(token);
        self.selection.candidates = candidates;
        self.select_index(self.selection.selected_index);
    }

    /// Closes the list and clears the selection.
    pub fn close(&mut self) {
        if self.status == ListStatus::Open {
            debug!("suggestion list closed");
        }
        self.status = ListStatus::Closed;
        self.token = None;
        self.selection = SelectionState::default();
    }

    /// Returns whether the list is open.
    pub fn is_open(&self) -> bool {
        self.status == ListStatus::Open
    }

    /// Returns the list status.
    pub fn status(&self) -> ListStatus {
        self.status
    }

    /// Returns the token the candidates were matched against.
    pub fn active_token(&self) -> Option<&MentionToken> {
        self.token.as_ref()
    }

    /// Returns the current selection snapshot.
    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    /// Returns the highlighted index while there are candidates.
    pub fn selected_index(&self) -> Option<usize> {
        self.selection
            .max_index()
            .map(|_| self.selection.selected_index)
    }

    /// Returns the highlighted user.
    pub fn selected_user(&self) -> Option<&User> {
        self.selected_index()
            .and_then(|index| self.selection.candidates.get(index))
    }

    /// Highlights `index`, clamped to the visible entries. No-op without
    /// candidates.
    pub fn select_index(&mut self, index: usize) {
        if let Some(max_index) = self.selection.max_index() {
            self.selection.selected_index = index.min(max_index);
        }
    }

    /// Moves the highlight one entry up, stopping at the first.
    pub fn select_previous(&mut self) {
        self.select_index(self.selection.selected_index.saturating_sub(1));
    }

    /// Moves the highlight one entry down, stopping at the last visible.
    pub fn select_next(&mut self) {
        self.select_index(self.selection.selected_index.saturating_add(1));
    }

    /// Moves the highlight back to the first entry.
    pub fn reset_selection(&mut self) {
        self.selection.selected_index = 0;
    }

    /// Returns the rows to render: up to [`MAX_VISIBLE_USERS`] users in match
    /// order, then one overflow marker when more matched.
    pub fn entries(&self) -> Vec<SuggestionEntry<'_>> {
        if !self.is_open() {
            return Vec::new();
        }

        let selected_index = self.selected_index();
        let mut entries: Vec<SuggestionEntry<'_>> = self
            .selection
            .candidates
            .iter()
            .take(MAX_VISIBLE_USERS)
            .enumerate()
            .map(|(index, user)| SuggestionEntry::User {
                selected: selected_index == Some(index),
                user,
            })
            .collect();

        let hidden = self
            .selection
            .candidates
            .len()
            .saturating_sub(MAX_VISIBLE_USERS);
        if hidden > 0 {
            entries.push(SuggestionEntry::Overflow { hidden });
        }

        entries
    }

    /// Returns the user rendered on `row`, if that row is selectable.
    pub fn user_at_row(&self, row: usize) -> Option<&User> {
        match self.entries().get(row) {
            Some(SuggestionEntry::User { user, .. }) => Some(*user),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::token::scan;

    fn users(count: usize) -> Vec<User> {
        (0..count)
            .map(|index| User::new(index.to_string(), format!("User {index}")))
            .collect()
    }

    fn open_list(count: usize) -> SuggestionList {
        let mut list = SuggestionList::new();
        list.update(scan("@u"), users(count));

        list
    }

    #[test]
    fn test_update_opens_with_first_entry_selected() {
        // Arrange & Act
        let list = open_list(1);

        // Assert
        assert!(list.is_open());
        assert_eq!(list.selected_index(), Some(0));
        assert_eq!(
            list.selected_user().map(|user| user.id.as_str()),
            Some("0")
        );
    }

    #[test]
    fn test_update_closes_on_empty_match_or_missing_token() {
        // Arrange
        let mut empty_match = open_list(3);
        let mut missing_token = open_list(3);

        // Act
        empty_match.update(scan("@zz"), Vec::new());
        missing_token.update(None, users(3));

        // Assert
        assert_eq!(empty_match.status(), ListStatus::Closed);
        assert_eq!(missing_token.status(), ListStatus::Closed);
        assert_eq!(empty_match.selected_index(), None);
        assert!(missing_token.active_token().is_none());
    }

    #[test]
    fn test_select_next_stops_at_last_visible_entry() {
        // Arrange
        let mut list = open_list(10);

        // Act
        for _ in 0..9 {
            list.select_next();
        }

        // Assert
        assert_eq!(list.selected_index(), Some(MAX_VISIBLE_USERS - 1));
    }

    #[test]
    fn test_select_previous_stops_at_first_entry() {
        // Arrange
        let mut list = open_list(3);
        list.select_index(2);

        // Act
        for _ in 0..5 {
            list.select_previous();
        }

        // Assert
        assert_eq!(list.selected_index(), Some(0));
    }

    #[test]
    fn test_select_index_clamps_to_candidate_count() {
        // Arrange
        let mut list = open_list(3);

        // Act
        list.select_index(42);

        // Assert
        assert_eq!(list.selected_index(), Some(2));
    }

    #[test]
    fn test_select_index_on_empty_list_is_noop() {
        // Arrange
        let mut list = SuggestionList::new();

        // Act
        list.select_index(3);

        // Assert
        assert_eq!(list.selected_index(), None);
        assert!(list.entries().is_empty());
    }

    #[test]
    fn test_entries_cap_visible_users_and_add_overflow_marker() {
        // Arrange
        let list = open_list(10);

        // Act
        let entries = list.entries();

        // Assert
        assert_eq!(entries.len(), MAX_VISIBLE_USERS + 1);
        assert_eq!(entries[MAX_VISIBLE_USERS], SuggestionEntry::Overflow { hidden: 2 });
        let selected_count = entries
            .iter()
            .filter(|entry| matches!(entry, SuggestionEntry::User { selected: true, .. }))
            .count();
        assert_eq!(selected_count, 1);
    }

    #[test]
    fn test_entries_move_selected_flag() {
        // Arrange
        let mut list = open_list(3);

        // Act
        list.select_next();
        let entries = list.entries();

        // Assert
        assert!(matches!(entries[0], SuggestionEntry::User { selected: false, .. }));
        assert!(matches!(entries[1], SuggestionEntry::User { selected: true, .. }));
    }

    #[test]
    fn test_update_keeps_clamped_highlight() {
        // Arrange
        let mut list = open_list(5);
        list.select_index(4);

        // Act
        list.update(scan("@us"), users(2));

        // Assert
        assert_eq!(list.selected_index(), Some(1));
    }

    #[test]
    fn test_close_resets_selection() {
        // Arrange
        let mut list = open_list(5);
        list.select_index(3);

        // Act
        list.close();

        // Assert
        assert_eq!(list.selection(), &SelectionState::default());
        assert!(list.active_token().is_none());
    }

    #[test]
    fn test_user_at_row_skips_overflow_marker() {
        // Arrange
        let list = open_list(9);

        // Act
        let user = list.user_at_row(1);
        let overflow = list.user_at_row(MAX_VISIBLE_USERS);

        // Assert
        assert_eq!(user.map(|user| user.id.as_str()), Some("1"));
        assert!(overflow.is_none());
    }
}
