use std::future::Future;
use std::path::PathBuf;
use std::time::Instant;

use futures::future::BoxFuture;

use crate::browser::Session;
use crate::report::{CaseOutcome, SuiteReport};

pub type CaseFuture = BoxFuture<'static, anyhow::Result<()>>;
type CaseFn = Box<dyn Fn() -> CaseFuture + Send + Sync>;

/// A named, repeatable test body. The closure captures the page objects and
/// fixtures it needs and produces a fresh future per run.
pub struct TestCase {
    name: String,
    run: CaseFn,
}

impl TestCase {
    pub fn new<F, Fut>(name: impl Into<String>, run: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        Self {
            name: name.into(),
            run: Box::new(move || Box::pin(run())),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// An ordered collection of cases sharing one browser session.
pub struct TestSuite {
    pub name: String,
    cases: Vec<TestCase>,
    skipped: Vec<(String, String)>,
}

impl TestSuite {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cases: Vec::new(),
            skipped: Vec::new(),
        }
    }

    pub fn case(mut self, case: TestCase) -> Self {
        self.cases.push(case);
        self
    }

    /// Register a case that is recorded as skipped instead of run.
    pub fn skip(mut self, name: impl Into<String>, reason: impl Into<String>) -> Self {
        self.skipped.push((name.into(), reason.into()));
        self
    }

    pub fn len(&self) -> usize {
        self.cases.len() + self.skipped.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty() && self.skipped.is_empty()
    }
}

/// Sequential suite executor. Failures are recorded, screenshotted when a
/// session and screenshot directory are available, and never abort the run
/// unless fail-fast is set.
#[derive(Default)]
pub struct Runner {
    screenshot_dir: Option<PathBuf>,
    fail_fast: bool,
}

impl Runner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_screenshot_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.screenshot_dir = Some(dir.into());
        self
    }

    pub fn with_fail_fast(mut self) -> Self {
        self.fail_fast = true;
        self
    }

    pub async fn run(&self, suite: TestSuite, session: Option<&Session>) -> SuiteReport {
        let mut report = SuiteReport::new(&suite.name);

        for (name, reason) in &suite.skipped {
            tracing::info!("TEST CASE: {name} (skipped: {reason})");
            report.push(CaseOutcome::skipped(name, reason));
        }

        for case in &suite.cases {
            tracing::info!("TEST CASE: {}", case.name);
            let start = Instant::now();
            let result = (case.run)().await;
            let duration = start.elapsed();

            match result {
                Ok(()) => {
                    tracing::info!("PASSED: {} ({:.2}s)", case.name, duration.as_secs_f64());
                    report.push(CaseOutcome::passed(&case.name, duration));
                }
                Err(error) => {
                    tracing::error!("FAILED: {}: {error:#}", case.name);
                    let screenshot = self.capture_failure(&case.name, session).await;
                    report.push(CaseOutcome::failed(
                        &case.name,
                        duration,
                        format!("{error:#}"),
                        screenshot,
                    ));
                    if self.fail_fast {
                        tracing::warn!("fail-fast set, aborting suite {}", suite.name);
                        break;
                    }
                }
            }
        }

        report
    }

    async fn capture_failure(&self, case_name: &str, session: Option<&Session>) -> Option<PathBuf> {
        let dir = self.screenshot_dir.as_ref()?;
        let session = session?;

        let file_name = format!("{}.png", case_name.replace("::", "_"));
        let path = dir.join(file_name);
        match session.screenshot(&path).await {
            Ok(()) => Some(path),
            Err(e) => {
                tracing::error!("failed to capture screenshot for {case_name}: {e}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::CaseStatus;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn runner_records_pass_fail_and_skip() {
        let suite = TestSuite::new("demo")
            .case(TestCase::new("demo::ok", || async { Ok(()) }))
            .case(TestCase::new("demo::boom", || async {
                anyhow::bail!("expected title mismatch")
            }))
            .skip("demo::later", "not automatable yet");

        let report = Runner::new().run(suite, None).await;
        assert_eq!(report.total(), 3);
        assert_eq!(report.passed_count(), 1);
        assert_eq!(report.failed_count(), 1);
        assert_eq!(report.skipped_count(), 1);

        let failed = report
            .outcomes
            .iter()
            .find(|o| o.status == CaseStatus::Failed)
            .unwrap();
        assert_eq!(failed.name, "demo::boom");
        assert!(failed.error.as_deref().unwrap().contains("title mismatch"));
        assert!(failed.screenshot.is_none());
    }

    #[tokio::test]
    async fn fail_fast_stops_after_first_failure() {
        let ran = Arc::new(AtomicU32::new(0));
        let counter = ran.clone();

        let suite = TestSuite::new("demo")
            .case(TestCase::new("demo::boom", || async {
                anyhow::bail!("broken")
            }))
            .case(TestCase::new("demo::never", move || {
                counter.fetch_add(1, Ordering::SeqCst);
                async { Ok(()) }
            }));

        let report = Runner::new().with_fail_fast().run(suite, None).await;
        assert_eq!(report.total(), 1);
        assert_eq!(ran.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn cases_run_in_declaration_order() {
        let order = Arc::new(std::sync::Mutex::new(Vec::new()));
        let (first, second) = (order.clone(), order.clone());

        let suite = TestSuite::new("demo")
            .case(TestCase::new("demo::first", move || {
                first.lock().unwrap().push(1);
                async { Ok(()) }
            }))
            .case(TestCase::new("demo::second", move || {
                second.lock().unwrap().push(2);
                async { Ok(()) }
            }));

        Runner::new().run(suite, None).await;
        assert_eq!(*order.lock().unwrap(), vec![1, 2]);
    }
}
