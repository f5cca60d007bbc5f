use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::domain::user::{User, UserDirectory};

/// Failure to load the user directory.
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("failed to read user directory `{}`: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse user directory `{}`: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("duplicate user id `{id}` in user directory")]
    DuplicateId { id: String },
}

/// Supplier of raw, unvalidated directory entries.
///
/// Production reads a JSON file or the built-in demo list; tests inject
/// `MockUserSource`.
#[cfg_attr(test, mockall::automock)]
pub trait UserSource {
    /// Returns every entry in source order.
    ///
    /// # Errors
    /// Returns an error when the entries cannot be read or decoded.
    fn load_users(&self) -> Result<Vec<User>, DirectoryError>;
}

/// Reads `[{"id": .., "displayName": ..}]` from a JSON file.
///
/// `name` is accepted in place of `displayName`, and numeric ids are
/// stringified.
pub struct JsonFileUserSource {
    path: PathBuf,
}

impl JsonFileUserSource {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl UserSource for JsonFileUserSource {
    fn load_users(&self) -> Result<Vec<User>, DirectoryError> {
        let content = fs::read_to_string(&self.path).map_err(|source| DirectoryError::Read {
            path: self.path.clone(),
            source,
        })?;
        let records: Vec<UserRecord> =
            serde_json::from_str(&content).map_err(|source| DirectoryError::Parse {
                path: self.path.clone(),
                source,
            })?;

        Ok(records.into_iter().map(UserRecord::into_user).collect())
    }
}

/// Demo directory used when no users file is given.
pub struct BuiltinUserSource;

const BUILTIN_USERS: &[(&str, &str)] = &[
    ("1", "Ann Lee"),
    ("2", "Anna Park"),
    ("3", "Bob Stone"),
    ("4", "Carla Diaz"),
    ("5", "Dana Whitfield"),
    ("6", "Elena Fisher"),
    ("7", "Frank Castle"),
    ("8", "Grace Hopper"),
    ("9", "Hank Moody"),
    ("10", "Ivan Petrov"),
    ("11", "Jules Verne"),
    ("12", "Mary Ann Evans"),
];

impl UserSource for BuiltinUserSource {
    fn load_users(&self) -> Result<Vec<User>, DirectoryError> {
        Ok(BUILTIN_USERS
            .iter()
            .map(|(id, display_name)| User::new(*id, *display_name))
            .collect())
    }
}

/// Loads and validates the directory from `source`.
///
/// Entries with a blank display name are skipped with a warning. An empty
/// directory is valid.
///
/// # Errors
/// Returns an error when the source fails or two entries share an id.
pub fn load_directory(source: &dyn UserSource) -> Result<UserDirectory, DirectoryError> {
    let mut seen_ids = HashSet::new();
    let mut users = Vec::new();

    for user in source.load_users()? {
        if user.display_name.trim().is_empty() {
            warn!(user_id = %user.id, "skipped user without display name");

            continue;
        }
        if !seen_ids.insert(user.id.clone()) {
            return Err(DirectoryError::DuplicateId {
                id: user.id.to_string(),
            });
        }

        users.push(user);
    }

    info!(user_count = users.len(), "loaded user directory");

    Ok(UserDirectory::new(users))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserRecord {
    #[serde(alias = "name")]
    display_name: String,
    id: UserIdRecord,
}

impl UserRecord {
    fn into_user(self) -> User {
        let id = match self.id {
            UserIdRecord::Number(number) => number.to_string(),
            UserIdRecord::Text(text) => text,
        };

        User::new(id, self.display_name)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum UserIdRecord {
    Number(serde_json::Number),
    Text(String),
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    fn write_users_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("failed to create temp file");
        file.write_all(content.as_bytes())
            .expect("failed to write temp file");

        file
    }

    #[test]
    fn test_json_source_reads_display_name_and_name_alias() {
        // Arrange
        let file = write_users_file(
            r#"[{"id": 1, "displayName": "Ann Lee"}, {"id": "u-2", "name": "Bob Stone"}]"#,
        );
        let source = JsonFileUserSource::new(file.path().to_path_buf());

        // Act
        let users = source.load_users().expect("users should load");

        // Assert
        assert_eq!(
            users,
            vec![User::new("1", "Ann Lee"), User::new("u-2", "Bob Stone")]
        );
    }

    #[test]
    fn test_json_source_reports_missing_file() {
        // Arrange
        let directory = tempfile::tempdir().expect("failed to create temp dir");
        let source = JsonFileUserSource::new(directory.path().join("missing.json"));

        // Act
        let result = source.load_users();

        // Assert
        assert!(matches!(result, Err(DirectoryError::Read { .. })));
    }

    #[test]
    fn test_json_source_reports_malformed_json() {
        // Arrange
        let file = write_users_file(r#"[{"id": 1}]"#);
        let source = JsonFileUserSource::new(file.path().to_path_buf());

        // Act
        let result = source.load_users();

        // Assert
        let error = result.expect_err("missing display name should fail");
        assert!(matches!(error, DirectoryError::Parse { .. }));
        assert!(error.to_string().contains("failed to parse user directory"));
    }

    #[test]
    fn test_builtin_source_has_more_matches_than_visible_rows() {
        // Arrange
        let source = BuiltinUserSource;

        // Act
        let users = source.load_users().expect("builtin users should load");

        // Assert
        let matching = users
            .iter()
            .filter(|user| user.display_name.to_lowercase().contains('a'))
            .count();
        assert!(matching > crate::ui::state::suggestion::MAX_VISIBLE_USERS);
    }

    #[test]
    fn test_load_directory_skips_blank_names() {
        // Arrange
        let mut source = MockUserSource::new();
        source.expect_load_users().times(1).returning(|| {
            Ok(vec![
                User::new("1", "Ann Lee"),
                User::new("2", "   "),
                User::new("3", "Bob Stone"),
            ])
        });

        // Act
        let directory = load_directory(&source).expect("directory should load");

        // Assert
        let ids: Vec<&str> = directory.all().iter().map(|user| user.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);
    }

    #[test]
    fn test_load_directory_rejects_duplicate_ids() {
        // Arrange
        let mut source = MockUserSource::new();
        source
            .expect_load_users()
            .returning(|| Ok(vec![User::new("1", "Ann Lee"), User::new("1", "Anna Park")]));

        // Act
        let result = load_directory(&source);

        // Assert
        assert!(matches!(
            result,
            Err(DirectoryError::DuplicateId { id }) if id == "1"
        ));
    }

    #[test]
    fn test_load_directory_accepts_empty_source() {
        // Arrange
        let mut source = MockUserSource::new();
        source.expect_load_users().returning(|| Ok(Vec::new()));

        // Act
        let directory = load_directory(&source).expect("directory should load");

        // Assert
        assert!(directory.is_empty());
    }

    #[test]
    fn test_load_directory_propagates_source_error() {
        // Arrange
        let mut source = MockUserSource::new();
        source.expect_load_users().returning(|| {
            Err(DirectoryError::DuplicateId {
                id: "x".to_string(),
            })
        });

        // Act
        let result = load_directory(&source);

        // Assert
        assert!(result.is_err());
    }
}
