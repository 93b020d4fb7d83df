//! Test runner that executes cases sequentially against one browser session

use std::any::Any;
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use futures::FutureExt;
use tracing::{debug, error, info, warn};

use crate::error::{E2eError, E2eResult};
use crate::provider::SessionProvider;
use crate::recorder::{TestOutcome, TestSuiteSummary};
use crate::session::BrowserSession;

/// A scripted interaction that fails by returning an error
#[async_trait]
pub trait TestProcedure: Send + Sync {
    async fn execute(&self, session: &mut dyn BrowserSession) -> E2eResult<()>;
}

/// A named test procedure
pub struct TestCase {
    name: String,
    procedure: Box<dyn TestProcedure>,
}

impl TestCase {
    pub fn new(name: impl Into<String>, procedure: impl TestProcedure + 'static) -> Self {
        Self {
            name: name.into(),
            procedure: Box::new(procedure),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for TestCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestCase").field("name", &self.name).finish()
    }
}

/// Configuration for the test runner
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Pause between consecutive cases to let page state settle
    pub pause_between: Duration,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            pause_between: Duration::from_millis(500),
        }
    }
}

/// Sequential test runner
#[derive(Debug, Clone, Default)]
pub struct TestRunner {
    config: RunnerConfig,
}

impl TestRunner {
    pub fn new() -> Self {
        Self::with_config(RunnerConfig::default())
    }

    pub fn with_config(config: RunnerConfig) -> Self {
        Self { config }
    }

    /// Run one case and convert whatever it does into an outcome.
    ///
    /// Errors and panics inside the procedure both become `Failed`.
    pub async fn run_case(&self, session: &mut dyn BrowserSession, case: &TestCase) -> TestOutcome {
        debug!("Running test: {}", case.name);
        let start = Instant::now();

        let result = match AssertUnwindSafe(case.procedure.execute(session))
            .catch_unwind()
            .await
        {
            Ok(result) => result,
            Err(payload) => Err(E2eError::Panicked(panic_message(payload.as_ref()))),
        };

        let duration = start.elapsed().as_secs_f64();

        match result {
            Ok(()) => {
                info!("✓ {}: PASSED ({:.3}s)", case.name, duration);
                TestOutcome::passed(&case.name, duration)
            }
            Err(e) => {
                error!("✗ {}: FAILED ({:.3}s) - {}", case.name, duration, e);
                TestOutcome::failed(&case.name, duration, e.to_string())
            }
        }
    }

    /// Run every case once, in order, recording each outcome
    pub async fn run_cases(&self, session: &mut dyn BrowserSession, cases: &[TestCase]) -> TestSuiteSummary {
        let mut summary = TestSuiteSummary::new();

        info!("Running {} test(s)...", cases.len());

        for (i, case) in cases.iter().enumerate() {
            if i > 0 && !self.config.pause_between.is_zero() {
                tokio::time::sleep(self.config.pause_between).await;
            }
            let outcome = self.run_case(session, case).await;
            summary.add_result(outcome);
        }

        info!(
            "Test Results: {} passed, {} failed ({:.2}%)",
            summary.passed(),
            summary.failed(),
            summary.success_rate()
        );

        summary
    }

    /// Acquire a session, run the cases, and release the session.
    ///
    /// A setup failure aborts the run with its error. `provider.release()` is
    /// called exactly once on every path, including a panic outside a case.
    pub async fn run(
        &self,
        provider: &mut dyn SessionProvider,
        cases: &[TestCase],
    ) -> E2eResult<TestSuiteSummary> {
        let body = AssertUnwindSafe(self.open_and_run(provider, cases))
            .catch_unwind()
            .await;

        provider.release().await;

        match body {
            Ok(result) => result,
            Err(payload) => std::panic::resume_unwind(payload),
        }
    }

    async fn open_and_run(
        &self,
        provider: &mut dyn SessionProvider,
        cases: &[TestCase],
    ) -> E2eResult<TestSuiteSummary> {
        let mut session = provider.open().await.map_err(|e| {
            error!("Setup failed: {}", e);
            e
        })?;

        let summary = self.run_cases(session.as_mut(), cases).await;

        if let Err(e) = session.close().await {
            warn!("Failed to close browser session: {}", e);
        }

        Ok(summary)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panic_message() {
        let boxed: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(panic_message(boxed.as_ref()), "boom");

        let boxed: Box<dyn Any + Send> = Box::new(String::from("kaboom"));
        assert_eq!(panic_message(boxed.as_ref()), "kaboom");

        let boxed: Box<dyn Any + Send> = Box::new(42u8);
        assert_eq!(panic_message(boxed.as_ref()), "unknown panic");
    }

    #[test]
    fn test_default_pause() {
        assert_eq!(RunnerConfig::default().pause_between, Duration::from_millis(500));
    }
}
