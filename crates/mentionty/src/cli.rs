use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tracing::Level;

use crate::app::mentionty_home;
use crate::infra::directory::{BuiltinUserSource, JsonFileUserSource, UserSource};

/// Log file name inside the mentionty home directory.
pub const LOG_FILE: &str = "mentionty.log";

/// Terminal message composer with `@` mention suggestions.
#[derive(Debug, Parser)]
#[command(name = "mentionty")]
#[command(version)]
#[command(about = "Terminal message composer with @ mention suggestions")]
pub struct Cli {
    /// JSON file with `[{"id": .., "displayName": ..}]` entries (default: built-in demo users)
    #[arg(long, value_name = "PATH")]
    pub users: Option<PathBuf>,

    /// Log destination (default: ~/.mentionty/mentionty.log)
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Most verbose level written to the log file
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,
}

impl Cli {
    /// Returns the log file path, defaulting into the mentionty home.
    pub fn log_file_path(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| mentionty_home().join(LOG_FILE))
    }

    /// Returns the configured user directory source.
    pub fn user_source(&self) -> Box<dyn UserSource> {
        match &self.users {
            Some(path) => Box::new(JsonFileUserSource::new(path.clone())),
            None => Box::new(BuiltinUserSource),
        }
    }
}

/// Log verbosity accepted on the command line.
#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}
