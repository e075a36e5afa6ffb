// fsutil.rs — Small filesystem helpers shared across the workspace crate.

use std::io;
use std::path::Path;

/// Recursively delete a directory tree.
///
/// A missing target counts as success: cleanup paths call this on
/// directories that may already be gone (a second cleanup pass, a user
/// who deleted the scratch area by hand), and neither case is an error.
pub async fn delete_dir(dir: impl AsRef<Path>) -> io::Result<()> {
    match tokio::fs::remove_dir_all(dir.as_ref()).await {
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}
