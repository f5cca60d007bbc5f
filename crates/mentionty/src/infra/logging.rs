use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use thiserror::Error;
use tracing::Level;

/// Failure to set up file logging.
#[derive(Debug, Error)]
pub enum LogSetupError {
    #[error("failed to create log directory `{}`: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to open log file `{}`: {source}", path.display())]
    OpenFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to install log subscriber: {0}")]
    Install(String),
}

/// Routes `tracing` output at `level` and above to `path`.
///
/// The terminal belongs to the UI, so nothing is written to stdout or stderr.
///
/// # Errors
/// Returns an error when the file cannot be opened or a global subscriber is
/// already installed.
pub fn init(path: &Path, level: Level) -> Result<(), LogSetupError> {
    let file = open_log_file(path)?;

    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_max_level(level)
        .try_init()
        .map_err(|error| LogSetupError::Install(error.to_string()))
}

/// Opens `path` for appending, creating missing parent directories.
fn open_log_file(path: &Path) -> Result<File, LogSetupError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|source| LogSetupError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| LogSetupError::OpenFile {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_open_log_file_creates_parent_directories() {
        // Arrange
        let directory = tempdir().expect("failed to create temp dir");
        let path = directory.path().join("nested").join("mentionty.log");

        // Act
        let file = open_log_file(&path);

        // Assert
        assert!(file.is_ok());
        assert!(path.exists());
    }

    #[test]
    fn test_open_log_file_appends_to_existing_file() {
        // Arrange
        let directory = tempdir().expect("failed to create temp dir");
        let path = directory.path().join("mentionty.log");
        fs::write(&path, "first\n").expect("failed to seed log file");

        // Act
        let mut file = open_log_file(&path).expect("log file should open");
        file.write_all(b"second\n").expect("failed to write log line");

        // Assert
        let content = fs::read_to_string(&path).expect("failed to read log file");
        assert_eq!(content, "first\nsecond\n");
    }

    #[test]
    fn test_open_log_file_reports_directory_path() {
        // Arrange
        let directory = tempdir().expect("failed to create temp dir");
        let blocker = directory.path().join("blocker");
        fs::write(&blocker, "").expect("failed to create blocking file");
        let path = blocker.join("mentionty.log");

        // Act
        let result = open_log_file(&path);

        // Assert
        assert!(matches!(result, Err(LogSetupError::CreateDir { .. })));
    }
}
