//! Explicit waits.
//!
//! A bounded spin-poll over a predicate. Timing out is a normal outcome and
//! is reported through [`WaitOutcome::success`], never as an error. A
//! predicate that fails (element absent, stale handle) counts as "not yet"
//! and is polled again until the deadline.

use crate::clock::{SharedClock, SystemClock};
use crate::driver::{WebDriver, WebElement};
use crate::locator::Selector;
use crate::result::ShopResult;
use std::time::Duration;
use tracing::{debug, trace};

// =============================================================================
// CONSTANTS
// =============================================================================

/// Default timeout for element waits (10 seconds)
pub const DEFAULT_WAIT_TIMEOUT_MS: u64 = 10_000;

/// Default polling interval (500ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 500;

// =============================================================================
// WAIT OPTIONS
// =============================================================================

/// Options for wait operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOptions {
    /// Timeout in milliseconds
    pub timeout_ms: u64,
    /// Polling interval in milliseconds
    pub poll_interval_ms: u64,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_WAIT_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl WaitOptions {
    /// Create new wait options with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set timeout in milliseconds
    #[must_use]
    pub const fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set polling interval in milliseconds
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval_ms: u64) -> Self {
        self.poll_interval_ms = poll_interval_ms;
        self
    }

    /// Get timeout as Duration
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Get poll interval as Duration
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

// =============================================================================
// WAIT OUTCOME
// =============================================================================

/// Result of a wait
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitOutcome {
    /// Whether the condition was met before the deadline
    pub success: bool,
    /// Time spent waiting
    pub elapsed: Duration,
    /// Description of what was waited for
    pub waited_for: String,
    /// Number of times the predicate was evaluated
    pub polls: u32,
}

impl WaitOutcome {
    /// Create a successful outcome
    #[must_use]
    pub fn success(elapsed: Duration, waited_for: impl Into<String>, polls: u32) -> Self {
        Self {
            success: true,
            elapsed,
            waited_for: waited_for.into(),
            polls,
        }
    }

    /// Create a timed-out outcome
    #[must_use]
    pub fn timeout(elapsed: Duration, waited_for: impl Into<String>, polls: u32) -> Self {
        Self {
            success: false,
            elapsed,
            waited_for: waited_for.into(),
            polls,
        }
    }

    /// Whether the deadline passed first
    #[must_use]
    pub const fn timed_out(&self) -> bool {
        !self.success
    }
}

/// What an element wait requires of the element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementCondition {
    /// Present in the DOM
    Present,
    /// Present and visible
    Displayed,
    /// Visible and enabled
    Clickable,
}

impl ElementCondition {
    fn holds<E: WebElement>(self, element: &E) -> ShopResult<bool> {
        match self {
            Self::Present => Ok(true),
            Self::Displayed => element.is_displayed(),
            Self::Clickable => element.is_clickable(),
        }
    }

    const fn describe(self) -> &'static str {
        match self {
            Self::Present => "present",
            Self::Displayed => "visible",
            Self::Clickable => "clickable",
        }
    }
}

// =============================================================================
// WAITER IMPLEMENTATION
// =============================================================================

/// Waiter for synchronization operations
#[derive(Debug, Clone)]
pub struct Waiter {
    clock: SharedClock,
    options: WaitOptions,
}

impl Default for Waiter {
    fn default() -> Self {
        Self::new(SystemClock::shared(), WaitOptions::default())
    }
}

impl Waiter {
    /// Create a waiter over `clock`
    #[must_use]
    pub fn new(clock: SharedClock, options: WaitOptions) -> Self {
        Self { clock, options }
    }

    /// The clock driving this waiter
    #[must_use]
    pub fn clock(&self) -> &SharedClock {
        &self.clock
    }

    /// Default options
    #[must_use]
    pub const fn options(&self) -> &WaitOptions {
        &self.options
    }

    /// Default timeout
    #[must_use]
    pub const fn default_timeout(&self) -> Duration {
        self.options.timeout()
    }

    /// Poll `predicate` until it returns `Ok(true)` or `timeout` elapses.
    ///
    /// The predicate is evaluated at least once, even with a zero timeout.
    /// `Err` from the predicate is treated like `Ok(false)`.
    pub fn wait_until<F>(&self, waited_for: &str, timeout: Duration, mut predicate: F) -> WaitOutcome
    where
        F: FnMut() -> ShopResult<bool>,
    {
        let start = self.clock.now();
        let poll_interval = self.options.poll_interval();
        let mut polls = 0_u32;

        loop {
            polls += 1;
            match predicate() {
                Ok(true) => {
                    let elapsed = self.clock.elapsed_since(start);
                    trace!(waited_for, ?elapsed, polls, "wait satisfied");
                    return WaitOutcome::success(elapsed, waited_for, polls);
                }
                Ok(false) => {}
                Err(e) => trace!(waited_for, error = %e, "wait predicate failed, retrying"),
            }

            let elapsed = self.clock.elapsed_since(start);
            if elapsed >= timeout {
                debug!(waited_for, ?elapsed, polls, "wait timed out");
                return WaitOutcome::timeout(elapsed, waited_for, polls);
            }
            let remaining = timeout.saturating_sub(elapsed);
            self.clock.sleep(poll_interval.min(remaining).max(Duration::from_millis(1)));
        }
    }

    /// Wait for the first element matching `selector` to satisfy `condition`.
    ///
    /// Returns the element, or `None` on timeout.
    pub fn wait_for_element<D: WebDriver>(
        &self,
        driver: &D,
        selector: &Selector,
        condition: ElementCondition,
        timeout: Duration,
    ) -> Option<D::Element> {
        let mut found = None;
        let waited_for = format!("{selector} to be {}", condition.describe());
        let outcome = self.wait_until(&waited_for, timeout, || {
            let element = driver.find_element(selector)?;
            if condition.holds(&element)? {
                found = Some(element);
                Ok(true)
            } else {
                Ok(false)
            }
        });
        if outcome.success {
            found
        } else {
            None
        }
    }

    /// Wait until `selector` is displayed
    pub fn wait_for_displayed<D: WebDriver>(
        &self,
        driver: &D,
        selector: &Selector,
        timeout: Duration,
    ) -> Option<D::Element> {
        self.wait_for_element(driver, selector, ElementCondition::Displayed, timeout)
    }

    /// Wait until `selector` is displayed and enabled
    pub fn wait_for_clickable<D: WebDriver>(
        &self,
        driver: &D,
        selector: &Selector,
        timeout: Duration,
    ) -> Option<D::Element> {
        self.wait_for_element(driver, selector, ElementCondition::Clickable, timeout)
    }

    /// Wait until the current URL equals `expected`, ignoring ASCII case
    pub fn wait_for_url<D: WebDriver>(&self, driver: &D, expected: &str, timeout: Duration) -> WaitOutcome {
        let waited_for = format!("URL {expected}");
        self.wait_until(&waited_for, timeout, || {
            Ok(driver.current_url()?.eq_ignore_ascii_case(expected))
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================
