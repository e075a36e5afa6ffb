//! Core TestRunner trait and the option/result types that cross it

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors a test-runner backend can produce
///
/// These describe runner infrastructure failures — a worker process that
/// would not boot, a crashed child, a broken pipe. Failing *tests* are
/// not errors; they come back as ordinary data in [`RunResult`].
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("Test runner setup failed: {0}")]
    Setup(String),

    #[error("Test runner crashed: {0}")]
    Crashed(String),

    #[error("Test runner teardown failed: {0}")]
    Teardown(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RunnerError>;

/// Options for a single run, forwarded to the backend verbatim
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunOptions {
    /// Directory holding the staged tree the suite should run against
    pub working_dir: Option<PathBuf>,

    /// Per-run timeout hint. Nothing at this layer enforces it — backends
    /// that can cut a run short use it and report [`RunStatus::Timeout`]
    pub timeout: Option<Duration>,
}

/// Overall outcome of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// The suite ran to completion (individual tests may still have failed)
    Complete,

    /// The backend hit an error that prevented a verdict
    Error,

    /// The backend cut the run short on its timeout hint
    Timeout,
}

/// Outcome of one test case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestStatus {
    Passed,
    Failed,
    Skipped,
}

/// One executed test case
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    /// Fully qualified test name as the backend reports it
    pub name: String,

    pub status: TestStatus,

    /// Wall-clock time the test took
    pub time: Duration,

    /// Failure output; empty unless `status` is [`TestStatus::Failed`]
    #[serde(default)]
    pub failure_messages: Vec<String>,
}

/// What one run produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    pub status: RunStatus,

    /// Per-test outcomes, in backend report order
    pub tests: Vec<TestResult>,

    /// Runner-level error output; empty unless `status` is [`RunStatus::Error`]
    #[serde(default)]
    pub error_messages: Vec<String>,
}

impl RunResult {
    /// A completed run with the given per-test outcomes.
    pub fn completed(tests: Vec<TestResult>) -> Self {
        Self {
            status: RunStatus::Complete,
            tests,
            error_messages: Vec::new(),
        }
    }

    /// An errored run carrying the backend's error output.
    pub fn errored(error_messages: Vec<String>) -> Self {
        Self {
            status: RunStatus::Error,
            tests: Vec::new(),
            error_messages,
        }
    }
}

/// Pluggable backend that executes the test suite against staged code
///
/// `run` is the one mandatory operation. Backends with expensive setup —
/// spawning a worker process, warming a module cache — override `init`
/// and `dispose`; stateless backends keep the provided defaults, which
/// complete immediately. Callers get one uniform async lifecycle
/// whichever backend is plugged in, with no hook-presence checks.
#[async_trait]
pub trait TestRunner: Send {
    /// One-time setup before the first run
    ///
    /// Default: nothing to do.
    async fn init(&mut self) -> Result<()> {
        Ok(())
    }

    /// Execute the suite with the given options
    async fn run(&mut self, options: &RunOptions) -> Result<RunResult>;

    /// Tear the backend down
    ///
    /// Must be safe to call on a backend whose `init` never ran.
    /// Default: nothing to do.
    async fn dispose(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Produces a fresh backend instance on demand
///
/// Invoked once when a proxy is built and again each time the proxy is
/// asked to re-create its inner backend.
pub type RunnerFactory = Box<dyn Fn() -> Box<dyn TestRunner> + Send + Sync>;
