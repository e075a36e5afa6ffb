//! # mutiny-runner
//!
//! Test-runner lifecycle management for Mutiny.
//!
//! Test runners are pluggable backends: one drives a cargo test child
//! process, another talks to a long-lived worker over a pipe. Backends
//! differ in which lifecycle hooks they need, crash at inconvenient
//! times, and get swapped freely by configuration — so the orchestrator
//! never touches one directly. It talks to a proxy that presents every
//! backend through one uniform async lifecycle: `init`, any number of
//! `run`s, `dispose`.
//!
//! ## Key components
//!
//! - [`TestRunner`] — the capability set a backend provides. `run` is
//!   mandatory; `init` and `dispose` are provided methods that complete
//!   immediately unless the backend overrides them.
//! - [`RunnerProxy`] — owns the live backend and a factory for building
//!   more. Pure delegation plus [`RunnerProxy::recreate_inner`] for
//!   swapping a wedged backend out.
//! - [`RetryRunner`] — opt-in crash recovery composed on top of the
//!   proxy: dispose, re-create, re-init, re-run, give up gracefully.

pub mod proxy;
pub mod retry;
pub mod runner;

pub use proxy::RunnerProxy;
pub use retry::{RetryRunner, DEFAULT_MAX_RETRIES};
pub use runner::{
    RunOptions, RunResult, RunStatus, RunnerError, RunnerFactory, TestResult, TestStatus,
    TestRunner,
};
