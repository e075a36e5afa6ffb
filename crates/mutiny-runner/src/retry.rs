// retry.rs — Crash recovery composed on top of the runner proxy.
//
// A backend that crashes mid-run (worker process killed, pipe gone)
// would otherwise take the whole mutation run down with it. The retry
// layer treats a crash as recoverable: tear the wreck down, build a
// fresh backend through the proxy, initialize it, try again. After
// `max_retries` crashed attempts the mutant is reported as an errored
// run result instead of an error — one hopeless mutant must not stop
// the campaign.
//
// The proxy itself never retries; orchestrators opt in by wrapping it.

use async_trait::async_trait;
use tracing::warn;

use crate::proxy::RunnerProxy;
use crate::runner::{Result, RunOptions, RunResult, TestRunner};

/// How many crashed attempts to absorb before giving up on a run.
pub const DEFAULT_MAX_RETRIES: usize = 2;

/// Opt-in crash-recovery decorator over [`RunnerProxy`].
pub struct RetryRunner {
    proxy: RunnerProxy,
    max_retries: usize,
}

impl RetryRunner {
    /// Wrap a proxy with the default retry budget.
    pub fn new(proxy: RunnerProxy) -> Self {
        Self::with_max_retries(proxy, DEFAULT_MAX_RETRIES)
    }

    /// Wrap a proxy with an explicit retry budget.
    pub fn with_max_retries(proxy: RunnerProxy, max_retries: usize) -> Self {
        Self { proxy, max_retries }
    }

    /// Replace the crashed backend: best-effort dispose, fresh instance,
    /// init. A failing dispose is logged and ignored — the backend
    /// already crashed, its teardown owes us nothing — but a failing
    /// init on the *replacement* propagates, because a backend that
    /// cannot even start is not worth retrying against.
    async fn recover(&mut self) -> Result<()> {
        if let Err(err) = self.proxy.dispose().await {
            warn!("disposing crashed test runner failed: {}", err);
        }
        self.proxy.recreate_inner();
        self.proxy.init().await
    }
}

#[async_trait]
impl TestRunner for RetryRunner {
    async fn init(&mut self) -> Result<()> {
        self.proxy.init().await
    }

    async fn run(&mut self, options: &RunOptions) -> Result<RunResult> {
        let mut last_error = String::new();
        for attempt in 1..=self.max_retries {
            match self.proxy.run(options).await {
                Ok(result) => return Ok(result),
                Err(err) => {
                    last_error = err.to_string();
                    warn!(
                        "test runner crashed on attempt {}/{}, replacing backend: {}",
                        attempt, self.max_retries, last_error
                    );
                    self.recover().await?;
                }
            }
        }

        Ok(RunResult::errored(vec![format!(
            "Test runner crashed {} times, reporting the run as errored. Last crash: {}",
            self.max_retries, last_error
        )]))
    }

    async fn dispose(&mut self) -> Result<()> {
        self.proxy.dispose().await
    }
}
