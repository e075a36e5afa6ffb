//! # mutiny-workspace
//!
//! Scratch workspace manager for Mutiny.
//!
//! Mutiny stages instrumented copies of the code under test on disk
//! before handing them to a test runner. This crate owns that scratch
//! area: a fixed-name base directory under the project root, one random
//! session directory per process beneath it, uniquely named allocations
//! inside the session, and a single best-effort cleanup at the end of
//! the run.
//!
//! ## Key components
//!
//! - [`ScratchWorkspace`] — the handle owning the base and session
//!   directories. Allocates subdirectories and stages file content;
//!   components that need scratch space receive it by reference.
//! - [`Instrumenter`] — streaming transform seam. The mutation engine
//!   implements it to rewrite source text on its way into the scratch
//!   area; the workspace just drives the writer it returns.
//! - [`FileContent`] — binary or textual payload for
//!   [`ScratchWorkspace::write_file`]. Only text is ever instrumented.

pub mod error;
pub mod fsutil;
pub mod instrument;
pub mod scratch;

pub use error::WorkspaceError;
pub use instrument::{BoxedSink, Instrumenter};
pub use scratch::{FileContent, ScratchWorkspace, SCRATCH_DIR_NAME};
