use crate::domain::token::MentionToken;
use crate::domain::user::{User, UserDirectory};

/// Returns every user whose display name contains the token query,
/// compared case-insensitively.
///
/// Results keep directory order and are never truncated; capping the visible
/// count is the suggestion list's job.
pub fn match_users<'a>(token: &MentionToken, directory: &'a UserDirectory) -> Vec<&'a User> {
    let query = token.query().to_lowercase();

    directory
        .all()
        .iter()
        .filter(|user| user.display_name.to_lowercase().contains(&query))
        .collect()
}
