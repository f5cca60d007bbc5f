use std::fmt;

/// Opaque identifier of a mentionable user.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct UserId(String);

impl UserId {
    /// Creates an identifier from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A candidate for `@` mentions.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct User {
    pub display_name: String,
    pub id: UserId,
}

impl User {
    /// Creates a user from an id and display name.
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            id: UserId::new(id),
        }
    }
}

/// Read-only, ordered collection of mentionable users.
///
/// Loaded once at startup; the order of [`UserDirectory::all`] is the order
/// suggestions are shown in.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct UserDirectory {
    users: Vec<User>,
}

impl UserDirectory {
    /// Creates a directory preserving the given order.
    pub fn new(users: Vec<User>) -> Self {
        Self { users }
    }

    /// Returns every user in directory order.
    pub fn all(&self) -> &[User] {
        &self.users
    }

    /// Returns the number of users.
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Returns whether the directory has no users.
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}
