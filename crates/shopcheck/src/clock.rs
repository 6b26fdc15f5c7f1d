//! Injectable clock for waits and retry backoff
//!
//! Every suspension point in the harness (the wait primitive's poll loop and
//! the fixed-backoff retries) goes through a [`Clock`]. Production code uses
//! [`SystemClock`]; tests use [`FakeClock`], whose `sleep` advances virtual
//! time instantly so a 2 s backoff costs nothing.

use std::fmt::Debug;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Shared, thread-safe clock handle
pub type SharedClock = Arc<dyn Clock>;

/// Monotonic time source with a blocking sleep
pub trait Clock: Send + Sync + Debug {
    /// Time elapsed since the clock's origin
    fn now(&self) -> Duration;

    /// Block the current thread for `duration`
    fn sleep(&self, duration: Duration);

    /// Time elapsed since an earlier reading of [`Clock::now`]
    fn elapsed_since(&self, start: Duration) -> Duration {
        self.now().saturating_sub(start)
    }
}

// =============================================================================
// System clock
// =============================================================================

/// Wall clock backed by [`Instant`] and [`std::thread::sleep`]
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    /// Create a clock whose origin is now
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    /// Create a shared handle to a new system clock
    #[must_use]
    pub fn shared() -> SharedClock {
        Arc::new(Self::new())
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

// =============================================================================
// Fake clock
// =============================================================================

/// Virtual clock for deterministic tests
///
/// `sleep` never blocks. It advances the virtual time and records the
/// requested duration so tests can assert on backoff behaviour.
#[derive(Debug, Default)]
pub struct FakeClock {
    current_ms: AtomicU64,
    sleeps: Mutex<Vec<Duration>>,
}

impl FakeClock {
    /// Create a fake clock at time zero
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a shared fake clock.
    ///
    /// Keep the returned `Arc<FakeClock>` for inspection and hand a clone to
    /// the harness as a [`SharedClock`].
    #[must_use]
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Advance virtual time without recording a sleep
    pub fn advance(&self, duration: Duration) {
        self.current_ms
            .fetch_add(duration.as_millis() as u64, Ordering::SeqCst);
    }

    /// Current virtual time in milliseconds
    #[must_use]
    pub fn now_ms(&self) -> u64 {
        self.current_ms.load(Ordering::SeqCst)
    }

    /// Every duration passed to `sleep`, in call order
    #[must_use]
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps
            .lock()
            .map(|s| s.clone())
            .unwrap_or_default()
    }

    /// Sum of all recorded sleeps
    #[must_use]
    pub fn total_slept(&self) -> Duration {
        self.sleeps().iter().sum()
    }

    /// Sleeps of exactly `duration`
    #[must_use]
    pub fn sleeps_of(&self, duration: Duration) -> usize {
        self.sleeps().iter().filter(|d| **d == duration).count()
    }
}

impl Clock for FakeClock {
    fn now(&self) -> Duration {
        Duration::from_millis(self.now_ms())
    }

    fn sleep(&self, duration: Duration) {
        if let Ok(mut sleeps) = self.sleeps.lock() {
            sleeps.push(duration);
        }
        self.advance(duration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod system_clock_tests {
        use super::*;

        #[test]
        fn test_now_is_monotonic() {
            let clock = SystemClock::new();
            let a = clock.now();
            let b = clock.now();
            assert!(b >= a);
        }

        #[test]
        fn test_sleep_blocks() {
            let clock = SystemClock::new();
            let start = clock.now();
            clock.sleep(Duration::from_millis(5));
            assert!(clock.elapsed_since(start) >= Duration::from_millis(5));
        }
    }

    mod fake_clock_tests {
        use super::*;

        #[test]
        fn test_starts_at_zero() {
            let clock = FakeClock::new();
            assert_eq!(clock.now(), Duration::ZERO);
            assert!(clock.sleeps().is_empty());
        }

        #[test]
        fn test_sleep_advances_and_records() {
            let clock = FakeClock::new();
            clock.sleep(Duration::from_secs(2));
            clock.sleep(Duration::from_millis(500));
            assert_eq!(clock.now_ms(), 2500);
            assert_eq!(clock.sleeps().len(), 2);
            assert_eq!(clock.total_slept(), Duration::from_millis(2500));
            assert_eq!(clock.sleeps_of(Duration::from_secs(2)), 1);
        }

        #[test]
        fn test_advance_does_not_record() {
            let clock = FakeClock::new();
            clock.advance(Duration::from_secs(1));
            assert_eq!(clock.now(), Duration::from_secs(1));
            assert!(clock.sleeps().is_empty());
        }

        #[test]
        fn test_elapsed_since() {
            let clock = FakeClock::new();
            let start = clock.now();
            clock.advance(Duration::from_millis(750));
            assert_eq!(clock.elapsed_since(start), Duration::from_millis(750));
        }

        #[test]
        fn test_shared_handle_coerces() {
            let fake = FakeClock::shared();
            let shared: SharedClock = fake.clone();
            shared.sleep(Duration::from_millis(100));
            assert_eq!(fake.now_ms(), 100);
        }
    }
}
