//! Session harness and scenario results.
//!
//! A [`Harness`] bundles what every page object needs: the browser session,
//! the waiter (and through it the clock), the report sink and the config.
//! Page objects borrow it; none of them owns state of its own.

use crate::clock::{SharedClock, SystemClock};
use crate::config::HarnessConfig;
use crate::driver::WebDriver;
use crate::pages::{CartPage, CheckoutPage, LoginPage, ProductPage};
use crate::reporter::{ReportSink, ScenarioStatus};
use crate::result::ShopResult;
use crate::wait::Waiter;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Everything a scenario needs to drive one browser session
#[derive(Debug)]
pub struct Harness<D: WebDriver> {
    driver: D,
    waiter: Waiter,
    report: ReportSink,
    config: HarnessConfig,
}

impl<D: WebDriver> Harness<D> {
    /// Create a harness on the system clock, reporting to `config.report_path`
    #[must_use]
    pub fn new(driver: D, config: HarnessConfig) -> Self {
        let report = ReportSink::new(config.report_path.clone());
        Self::with_parts(driver, config, SystemClock::shared(), report)
    }

    /// Create a harness from explicit parts
    #[must_use]
    pub fn with_parts(driver: D, config: HarnessConfig, clock: SharedClock, report: ReportSink) -> Self {
        let waiter = Waiter::new(clock, config.wait_options());
        Self {
            driver,
            waiter,
            report,
            config,
        }
    }

    /// The browser session
    #[must_use]
    pub const fn driver(&self) -> &D {
        &self.driver
    }

    /// The waiter
    #[must_use]
    pub const fn waiter(&self) -> &Waiter {
        &self.waiter
    }

    /// The clock behind waits and retries
    #[must_use]
    pub fn clock(&self) -> &SharedClock {
        self.waiter.clock()
    }

    /// The report sink
    #[must_use]
    pub const fn report(&self) -> &ReportSink {
        &self.report
    }

    /// The configuration
    #[must_use]
    pub const fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Give the session back, e.g. to quit it
    pub fn into_driver(self) -> D {
        self.driver
    }

    /// Navigate to a site path such as `/inventory.html`
    pub fn open(&self, path: &str) -> ShopResult<()> {
        let url = self.config.url_for(path);
        debug!(%url, "navigating");
        self.driver.navigate(&url)
    }

    /// Absolute URL of a site path
    #[must_use]
    pub fn url_for(&self, path: &str) -> String {
        self.config.url_for(path)
    }

    /// Login page object
    #[must_use]
    pub fn login_page(&self) -> LoginPage<'_, D> {
        LoginPage::new(self)
    }

    /// Product listing page object
    #[must_use]
    pub fn product_page(&self) -> ProductPage<'_, D> {
        ProductPage::new(self)
    }

    /// Cart page object
    #[must_use]
    pub fn cart_page(&self) -> CartPage<'_, D> {
        CartPage::new(self)
    }

    /// Checkout page object
    #[must_use]
    pub fn checkout_page(&self) -> CheckoutPage<'_, D> {
        CheckoutPage::new(self)
    }
}

/// Result of a single scenario or API check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioResult {
    /// Scenario name
    pub name: String,
    /// Outcome
    pub status: ScenarioStatus,
    /// Failure or skip reason
    pub error: Option<String>,
    /// Wall time spent
    pub duration: Duration,
    /// Per-step notes (one per user for the multi-user journey)
    pub notes: Vec<String>,
}

impl ScenarioResult {
    /// Create a passing result
    #[must_use]
    pub fn pass(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: ScenarioStatus::Passed,
            error: None,
            duration: Duration::ZERO,
            notes: Vec::new(),
        }
    }

    /// Create a failing result
    #[must_use]
    pub fn fail(name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: ScenarioStatus::Failed,
            error: Some(error.into()),
            duration: Duration::ZERO,
            notes: Vec::new(),
        }
    }

    /// Create a skipped result
    #[must_use]
    pub fn skip(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: ScenarioStatus::Skipped,
            error: Some(reason.into()),
            duration: Duration::ZERO,
            notes: Vec::new(),
        }
    }

    /// Set duration
    #[must_use]
    pub const fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Set notes
    #[must_use]
    pub fn with_notes(mut self, notes: Vec<String>) -> Self {
        self.notes = notes;
        self
    }

    /// Whether the scenario passed
    #[must_use]
    pub const fn passed(&self) -> bool {
        self.status.is_passed()
    }
}

/// Results from running several scenarios
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SuiteResults {
    /// Suite name
    pub suite_name: String,
    /// Individual results
    pub results: Vec<ScenarioResult>,
    /// Total duration
    pub duration: Duration,
}

impl SuiteResults {
    /// Create an empty suite
    #[must_use]
    pub fn new(suite_name: impl Into<String>) -> Self {
        Self {
            suite_name: suite_name.into(),
            ..Self::default()
        }
    }

    /// Record a result
    pub fn push(&mut self, result: ScenarioResult) {
        self.results.push(result);
    }

    /// True when nothing failed (skips do not count as failures)
    #[must_use]
    pub fn all_passed(&self) -> bool {
        !self.results.iter().any(|r| r.status.is_failed())
    }

    /// Count passed results
    #[must_use]
    pub fn passed_count(&self) -> usize {
        self.count(ScenarioStatus::Passed)
    }

    /// Count failed results
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.count(ScenarioStatus::Failed)
    }

    /// Count skipped results
    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.count(ScenarioStatus::Skipped)
    }

    /// Total result count
    #[must_use]
    pub fn total(&self) -> usize {
        self.results.len()
    }

    /// Failed results
    #[must_use]
    pub fn failures(&self) -> Vec<&ScenarioResult> {
        self.results.iter().filter(|r| r.status.is_failed()).collect()
    }

    fn count(&self, status: ScenarioStatus) -> usize {
        self.results.iter().filter(|r| r.status == status).count()
    }
}
