use std::path::PathBuf;

use thiserror::Error;

/// Errors produced by platform backends.
///
/// Session-establishment failures must propagate to the caller; a missing
/// repository is never silently treated as "no repository". File reads are the
/// one place the taxonomy favors "absent" over "error" so that optional
/// configuration layers can be skipped.
#[derive(Debug, Error)]
pub enum PlatformError {
    /// Required connection parameters were absent at init time.
    #[error("invalid platform configuration: {0}")]
    Config(String),

    /// The repository could not be located or inspected.
    #[error("repository not found: {repository}: {reason}")]
    RepoNotFound { repository: String, reason: String },

    /// Repository autodiscovery failed.
    #[error("repository discovery failed: {0}")]
    Discovery(String),

    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// The file was read but its content did not match the selected grammar.
    #[error("failed to parse {file}: {reason}")]
    Parse { file: String, reason: String },

    /// A git subprocess exited non-zero or produced unusable output.
    #[error("git command failed: {0}")]
    GitCommand(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PlatformError>;
