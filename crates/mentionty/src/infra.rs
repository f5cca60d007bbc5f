//! Infrastructure adapters for user directory loading and file logging.

/// User directory sources and validation.
pub mod directory;
pub mod logging;
