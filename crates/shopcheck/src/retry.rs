//! Fixed-backoff retry loop.
//!
//! Used for the two reads that race the storefront's rendering: the cart
//! listing and the order total. An attempt either yields a value or asks for
//! another try. There is no retry on errors; callers that can fail
//! structurally propagate before reaching the policy.

use crate::clock::Clock;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Default number of attempts
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default pause between attempts (2 seconds)
pub const DEFAULT_BACKOFF_MS: u64 = 2_000;

/// Attempt count and backoff
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Zero behaves like one.
    pub max_attempts: u32,
    /// Pause between attempts in milliseconds
    pub backoff_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            backoff_ms: DEFAULT_BACKOFF_MS,
        }
    }
}

/// Result of running a [`RetryPolicy`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryOutcome<T> {
    /// An attempt produced a value
    Succeeded {
        /// The value
        value: T,
        /// 1-based attempt that produced it
        attempts: u32,
    },
    /// Every attempt came back empty
    ExhaustedRetries {
        /// Attempts made
        attempts: u32,
    },
}

impl<T> RetryOutcome<T> {
    /// Whether an attempt succeeded
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded { .. })
    }

    /// Attempts made
    #[must_use]
    pub const fn attempts(&self) -> u32 {
        match self {
            Self::Succeeded { attempts, .. } | Self::ExhaustedRetries { attempts } => *attempts,
        }
    }

    /// The value, if any
    #[must_use]
    pub fn into_value(self) -> Option<T> {
        match self {
            Self::Succeeded { value, .. } => Some(value),
            Self::ExhaustedRetries { .. } => None,
        }
    }
}

impl RetryPolicy {
    /// Create a policy
    #[must_use]
    pub const fn new(max_attempts: u32, backoff_ms: u64) -> Self {
        Self {
            max_attempts,
            backoff_ms,
        }
    }

    /// Set the attempt count
    #[must_use]
    pub const fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Set the backoff
    #[must_use]
    pub const fn with_backoff_ms(mut self, backoff_ms: u64) -> Self {
        self.backoff_ms = backoff_ms;
        self
    }

    /// Backoff as a Duration
    #[must_use]
    pub const fn backoff(&self) -> Duration {
        Duration::from_millis(self.backoff_ms)
    }

    /// Run `attempt` until it returns `Some` or attempts run out.
    ///
    /// `attempt` receives the 1-based attempt number. The clock sleeps for
    /// the backoff between attempts, not after the last one.
    pub fn run<T, F>(&self, clock: &dyn Clock, mut attempt: F) -> RetryOutcome<T>
    where
        F: FnMut(u32) -> Option<T>,
    {
        let max_attempts = self.max_attempts.max(1);
        for n in 1..=max_attempts {
            if let Some(value) = attempt(n) {
                return RetryOutcome::Succeeded { value, attempts: n };
            }
            if n < max_attempts {
                debug!(attempt = n, backoff_ms = self.backoff_ms, "retrying after backoff");
                clock.sleep(self.backoff());
            }
        }
        RetryOutcome::ExhaustedRetries {
            attempts: max_attempts,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::clock::FakeClock;
    use proptest::prelude::*;

    mod policy_tests {
        use super::*;

        #[test]
        fn test_defaults() {
            let policy = RetryPolicy::default();
            assert_eq!(policy.max_attempts, 3);
            assert_eq!(policy.backoff(), Duration::from_secs(2));
        }

        #[test]
        fn test_serde_defaults_missing_fields() {
            let policy: RetryPolicy = serde_json::from_str(r#"{"max_attempts": 5}"#).unwrap();
            assert_eq!(policy, RetryPolicy::new(5, 2000));
        }
    }

    mod run_tests {
        use super::*;

        #[test]
        fn test_first_attempt_succeeds_without_sleep() {
            let clock = FakeClock::new();
            let outcome = RetryPolicy::default().run(&clock, |_| Some("total"));
            assert_eq!(
                outcome,
                RetryOutcome::Succeeded {
                    value: "total",
                    attempts: 1
                }
            );
            assert!(clock.sleeps().is_empty());
        }

        #[test]
        fn test_succeeds_on_third_attempt() {
            let clock = FakeClock::new();
            let outcome = RetryPolicy::default().run(&clock, |n| (n == 3).then_some(n));
            assert_eq!(outcome.attempts(), 3);
            assert_eq!(outcome.into_value(), Some(3));
            assert_eq!(clock.total_slept(), Duration::from_secs(4));
        }

        #[test]
        fn test_exhausted_has_no_trailing_sleep() {
            let clock = FakeClock::new();
            let outcome: RetryOutcome<()> = RetryPolicy::default().run(&clock, |_| None);
            assert_eq!(outcome, RetryOutcome::ExhaustedRetries { attempts: 3 });
            assert_eq!(clock.sleeps_of(Duration::from_secs(2)), 2);
            assert_eq!(clock.sleeps().len(), 2);
        }

        #[test]
        fn test_zero_attempts_runs_once() {
            let clock = FakeClock::new();
            let mut calls = 0;
            let outcome: RetryOutcome<()> = RetryPolicy::new(0, 100).run(&clock, |_| {
                calls += 1;
                None
            });
            assert_eq!(calls, 1);
            assert_eq!(outcome.attempts(), 1);
        }

        #[test]
        fn test_attempt_numbers_are_one_based() {
            let clock = FakeClock::new();
            let mut seen = Vec::new();
            let _: RetryOutcome<()> = RetryPolicy::default().run(&clock, |n| {
                seen.push(n);
                None
            });
            assert_eq!(seen, vec![1, 2, 3]);
        }
    }

    proptest! {
        #[test]
        fn prop_attempts_and_sleeps_are_bounded(max in 1_u32..8, backoff in 0_u64..5000, succeed_at in 1_u32..10) {
            let clock = FakeClock::new();
            let outcome = RetryPolicy::new(max, backoff).run(&clock, |n| (n == succeed_at).then_some(n));
            prop_assert!(outcome.attempts() <= max);
            prop_assert_eq!(clock.sleeps().len() as u32, outcome.attempts() - 1);
            prop_assert_eq!(outcome.is_success(), succeed_at <= max);
        }
    }
}
