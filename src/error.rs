use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while browsing a log tree
#[derive(Debug, Error)]
pub enum Error {
    /// Requested path resolves outside the jail root
    #[error("path escapes the log root: {}", .path.display())]
    OutsideRoot { path: PathBuf },

    /// Requested child name, channel name or date key does not exist
    #[error("no such resource: {name}")]
    NotFound { name: String },

    /// Failed to open a log file for reading
    #[error("failed to open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// I/O error while reading an already opened file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error while walking the tree for channels
    #[error("directory walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// Error when a path contains invalid UTF-8
    #[error("path contains invalid UTF-8: {}", .path.display())]
    InvalidUtf8 { path: PathBuf },
}

/// A specialized Result type for log tree operations
pub type Result<T> = std::result::Result<T, Error>;
