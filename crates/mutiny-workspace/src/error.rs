// error.rs — Error types for the scratch workspace.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during scratch workspace operations.
#[derive(Debug, Error)]
pub enum WorkspaceError {
    /// A file I/O operation failed.
    #[error("I/O error at {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    /// An instrumenter pipeline broke while streaming content into a file.
    ///
    /// Kept apart from [`WorkspaceError::IoError`] so callers can tell a
    /// failing disk from a failing transform.
    #[error("instrumenter stream failed for {path}: {source}")]
    StreamError {
        path: PathBuf,
        source: std::io::Error,
    },
}
