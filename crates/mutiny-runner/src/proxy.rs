// proxy.rs — Uniform lifecycle over a replaceable test-runner backend.
//
// The proxy owns exactly one live backend at a time, built from a
// factory it also owns. Every lifecycle call is pure delegation: no
// retry, no timeout, no result massaging. The one extra capability is
// recreate_inner, which swaps in a fresh backend from the factory so a
// composer can replace a wedged one — disposing the discarded backend
// stays the composer's call.
//
// Because the proxy implements TestRunner itself, decorators stack:
// wrap the proxy in a retry layer, wrap that in a timeout layer, and
// the orchestrator still sees one TestRunner.

use async_trait::async_trait;

use crate::runner::{Result, RunOptions, RunResult, RunnerFactory, TestRunner};

/// Decorator around a pluggable [`TestRunner`] backend.
///
/// Construction invokes the factory once; afterwards the proxy behaves
/// exactly like the backend it wraps. The `&mut self` receiver on every
/// operation means a caller cannot interleave calls on one proxy — the
/// backend sees a strictly serial lifecycle.
pub struct RunnerProxy {
    /// Produces backend instances; kept for re-creation.
    factory: RunnerFactory,

    /// The live backend all calls delegate to.
    inner: Box<dyn TestRunner>,
}

impl RunnerProxy {
    /// Build a proxy, creating the initial backend from `factory`.
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn() -> Box<dyn TestRunner> + Send + Sync + 'static,
    {
        let factory: RunnerFactory = Box::new(factory);
        let inner = factory();
        Self { factory, inner }
    }

    /// Drop the current backend and build a fresh one from the factory.
    ///
    /// The discarded backend is *not* disposed here. A composer replacing
    /// a healthy backend calls [`TestRunner::dispose`] first; one
    /// replacing a crashed backend may have nothing left worth disposing.
    pub fn recreate_inner(&mut self) {
        self.inner = (self.factory)();
    }
}

#[async_trait]
impl TestRunner for RunnerProxy {
    async fn init(&mut self) -> Result<()> {
        self.inner.init().await
    }

    async fn run(&mut self, options: &RunOptions) -> Result<RunResult> {
        self.inner.run(options).await
    }

    async fn dispose(&mut self) -> Result<()> {
        self.inner.dispose().await
    }
}
