// scratch.rs — Process-scoped scratch area for staging code under test.
//
// Mutated copies of the project are staged on disk before a test runner
// executes against them. This module owns the place they live:
//
//   <root>/.mutiny-tmp/                      base directory, fixed name
//   <root>/.mutiny-tmp/8114022/              session directory, random per process
//   <root>/.mutiny-tmp/8114022/mutant-551387 one allocation
//
// Key design:
// - The base and session directories are created synchronously when the
//   workspace is opened, so no allocation can observe a half-built root
// - Allocations take fresh random suffixes instead of locks; directory
//   creation tolerates an existing directory, so a collision degrades to
//   sharing a name rather than failing
// - Cleanup is best-effort and infallible — a scratch directory that
//   refuses to die should never fail the mutation run that produced it

use std::fs;
use std::path::{Path, PathBuf};

use rand::Rng;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::error::WorkspaceError;
use crate::fsutil;
use crate::instrument::Instrumenter;

/// Name of the scratch directory created under the project root.
pub const SCRATCH_DIR_NAME: &str = ".mutiny-tmp";

/// Content to stage into a scratch file.
///
/// Text is written as UTF-8 and may be routed through an
/// [`Instrumenter`]; binary content always reaches disk untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileContent {
    Binary(Vec<u8>),
    Text(String),
}

impl From<String> for FileContent {
    fn from(text: String) -> Self {
        FileContent::Text(text)
    }
}

impl From<&str> for FileContent {
    fn from(text: &str) -> Self {
        FileContent::Text(text.to_string())
    }
}

impl From<Vec<u8>> for FileContent {
    fn from(bytes: Vec<u8>) -> Self {
        FileContent::Binary(bytes)
    }
}

impl From<&[u8]> for FileContent {
    fn from(bytes: &[u8]) -> Self {
        FileContent::Binary(bytes.to_vec())
    }
}

/// A process-scoped scratch area for staged code under test.
///
/// Opening the workspace creates the base directory and a random session
/// directory beneath it. Components that need scratch space receive the
/// workspace by reference and allocate uniquely named subdirectories;
/// one call to [`ScratchWorkspace::cleanup`] at the end of the run
/// removes everything at once.
pub struct ScratchWorkspace {
    /// Fixed-name base directory under the project root.
    base_dir: PathBuf,

    /// Random per-process directory beneath the base. Concurrent runs on
    /// the same project each get their own session.
    session_dir: PathBuf,
}

impl ScratchWorkspace {
    /// Open a scratch workspace under the current working directory.
    pub fn open() -> Result<Self, WorkspaceError> {
        let cwd = std::env::current_dir().map_err(|source| WorkspaceError::IoError {
            path: PathBuf::from("."),
            source,
        })?;
        Self::open_in(cwd)
    }

    /// Open a scratch workspace under the given project root.
    ///
    /// Both directories exist by the time this returns, so callers can
    /// allocate immediately without racing directory creation.
    pub fn open_in(root: impl AsRef<Path>) -> Result<Self, WorkspaceError> {
        let base_dir = root.as_ref().join(SCRATCH_DIR_NAME);
        let session_dir = base_dir.join(random_suffix().to_string());
        fs::create_dir_all(&session_dir).map_err(|source| WorkspaceError::IoError {
            path: session_dir.clone(),
            source,
        })?;

        Ok(Self {
            base_dir,
            session_dir,
        })
    }

    /// Get the base directory path (`<root>/.mutiny-tmp`).
    pub fn base_path(&self) -> &Path {
        &self.base_dir
    }

    /// Get the session directory path for this process.
    pub fn session_path(&self) -> &Path {
        &self.session_dir
    }

    /// Allocate a fresh directory under the session, named
    /// `<prefix><random>`.
    ///
    /// The directory exists when this returns. Two allocations drawing
    /// the same suffix end up sharing a directory instead of erroring.
    pub fn allocate_dir(&self, prefix: &str) -> Result<PathBuf, WorkspaceError> {
        let dir = self
            .session_dir
            .join(format!("{}{}", prefix, random_suffix()));
        fs::create_dir_all(&dir).map_err(|source| WorkspaceError::IoError {
            path: dir.clone(),
            source,
        })?;
        Ok(dir)
    }

    /// Stage content into a file at `path`.
    ///
    /// Binary content is written raw and never instrumented. Text is
    /// written as UTF-8; when an instrumenter is given, the text streams
    /// through the transform it attaches on its way to disk, and the
    /// write only succeeds once the transformed stream has shut down.
    pub async fn write_file(
        &self,
        path: impl AsRef<Path>,
        content: FileContent,
        instrumenter: Option<&dyn Instrumenter>,
    ) -> Result<(), WorkspaceError> {
        let path = path.as_ref();
        match content {
            FileContent::Binary(bytes) => {
                tokio::fs::write(path, &bytes)
                    .await
                    .map_err(|source| WorkspaceError::IoError {
                        path: path.to_path_buf(),
                        source,
                    })
            }
            FileContent::Text(text) => match instrumenter {
                None => tokio::fs::write(path, text.as_bytes()).await.map_err(|source| {
                    WorkspaceError::IoError {
                        path: path.to_path_buf(),
                        source,
                    }
                }),
                Some(instrumenter) => self.write_piped(path, text.as_bytes(), instrumenter).await,
            },
        }
    }

    /// Copy a file into the scratch area, optionally instrumenting it.
    ///
    /// Without an instrumenter this is a plain filesystem copy. With one,
    /// the source bytes stream through the attached transform into the
    /// destination file.
    pub async fn copy_file(
        &self,
        from: impl AsRef<Path>,
        to: impl AsRef<Path>,
        instrumenter: Option<&dyn Instrumenter>,
    ) -> Result<(), WorkspaceError> {
        let from = from.as_ref();
        let to = to.as_ref();
        match instrumenter {
            None => {
                tokio::fs::copy(from, to)
                    .await
                    .map_err(|source| WorkspaceError::IoError {
                        path: to.to_path_buf(),
                        source,
                    })?;
                Ok(())
            }
            Some(instrumenter) => {
                let mut reader =
                    tokio::fs::File::open(from)
                        .await
                        .map_err(|source| WorkspaceError::IoError {
                            path: from.to_path_buf(),
                            source,
                        })?;
                let file =
                    tokio::fs::File::create(to)
                        .await
                        .map_err(|source| WorkspaceError::IoError {
                            path: to.to_path_buf(),
                            source,
                        })?;
                let mut sink = instrumenter.attach(Box::new(file));
                tokio::io::copy(&mut reader, &mut sink).await.map_err(|source| {
                    WorkspaceError::StreamError {
                        path: to.to_path_buf(),
                        source,
                    }
                })?;
                sink.shutdown()
                    .await
                    .map_err(|source| WorkspaceError::StreamError {
                        path: to.to_path_buf(),
                        source,
                    })?;
                Ok(())
            }
        }
    }

    /// Remove the entire scratch area, sessions of other processes
    /// included.
    ///
    /// Failures are swallowed: cleanup runs at the very end of a mutation
    /// run, and an undeletable temp directory (antivirus holding a file
    /// open, say) must not turn a finished run into a failed one. The
    /// attempt is logged at debug level, a swallowed failure at info.
    /// Safe to call more than once.
    pub async fn cleanup(&self) {
        debug!("deleting scratch workspace at {}", self.base_dir.display());
        if let Err(err) = fsutil::delete_dir(&self.base_dir).await {
            info!(
                "scratch workspace at {} not fully deleted: {}",
                self.base_dir.display(),
                err
            );
        }
    }

    /// Stream `bytes` through the instrumenter's transform into a new
    /// file at `path`.
    async fn write_piped(
        &self,
        path: &Path,
        bytes: &[u8],
        instrumenter: &dyn Instrumenter,
    ) -> Result<(), WorkspaceError> {
        let file = tokio::fs::File::create(path)
            .await
            .map_err(|source| WorkspaceError::IoError {
                path: path.to_path_buf(),
                source,
            })?;

        let mut sink = instrumenter.attach(Box::new(file));
        sink.write_all(bytes)
            .await
            .map_err(|source| WorkspaceError::StreamError {
                path: path.to_path_buf(),
                source,
            })?;
        // Shutdown flushes whatever tail the transform buffered; only a
        // clean shutdown means the file is complete.
        sink.shutdown()
            .await
            .map_err(|source| WorkspaceError::StreamError {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(())
    }
}

/// Random integer suffix for scratch directory names, uniform in
/// `[1, 10_000_000]`.
///
/// Wide enough that collisions within a session are negligible, and
/// harmless when they do happen (see [`ScratchWorkspace::allocate_dir`]).
fn random_suffix() -> u32 {
    rand::thread_rng().gen_range(1..=10_000_000)
}
