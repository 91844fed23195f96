//! Error types and Result aliases for pollwatch.
//!
//! This module defines the error hierarchy used throughout the crate.
//! All public functions return `Result<T, Error>` or `Result<T>`.
//!
//! Per-file problems met while polling (a file vanishing between the walk
//! and its stat, an unreadable directory) are not errors: they are logged
//! and absorbed by the watcher. Only misconfiguration and command-runner
//! failures surface here.

use thiserror::Error;

/// Result type alias using pollwatch's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for pollwatch operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// File watching error.
    #[error("watcher error: {0}")]
    Watcher(#[from] WatcherError),

    /// Command execution error.
    #[error("exec error: {0}")]
    Exec(#[from] ExecError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// File watcher errors.
#[derive(Error, Debug)]
pub enum WatcherError {
    /// Watch root is missing or not a directory.
    #[error("cannot watch '{path}': {reason}")]
    RootNotFound { path: String, reason: String },

    /// A duration-based run needs a non-zero poll interval.
    #[error("poll interval must be non-zero to run for {duration_ms}ms")]
    ZeroPollInterval { duration_ms: u128 },
}

/// Command runner errors.
#[derive(Error, Debug)]
pub enum ExecError {
    /// No program was given.
    #[error("no command given")]
    EmptyCommand,

    /// Failed to write the command's output.
    #[error("failed to write output of '{command}': {reason}")]
    Output { command: String, reason: String },
}

impl Error {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

impl WatcherError {
    /// Create a root-not-found error.
    pub fn root_not_found(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::RootNotFound {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
