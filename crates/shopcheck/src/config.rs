//! Harness configuration.
//!
//! One value, loaded from JSON or assembled from CLI flags, carries every
//! tunable the page objects and the API checks need. Unset JSON fields fall
//! back to the defaults below.

use crate::driver::DriverConfig;
use crate::result::{ShopError, ShopResult};
use crate::retry::RetryPolicy;
use crate::wait::{WaitOptions, DEFAULT_POLL_INTERVAL_MS, DEFAULT_WAIT_TIMEOUT_MS};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default storefront
pub const DEFAULT_BASE_URL: &str = "https://www.saucedemo.com";

/// Default catalog API root
pub const DEFAULT_API_BASE_URL: &str = "https://fakestoreapi.com/";

/// Default report file
pub const DEFAULT_REPORT_PATH: &str = "reports/TestResults.txt";

/// Default bounded wait when probing for the checkout error element (1 second)
pub const DEFAULT_ERROR_CHECK_TIMEOUT_MS: u64 = 1_000;

/// Default API request timeout (60 seconds)
pub const DEFAULT_API_TIMEOUT_MS: u64 = 60_000;

/// Configuration shared by every component of a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Storefront root, without trailing slash
    pub base_url: String,
    /// Report file
    pub report_path: PathBuf,
    /// Element wait timeout in milliseconds
    pub wait_timeout_ms: u64,
    /// Poll interval of every wait in milliseconds
    pub poll_interval_ms: u64,
    /// Bounded wait for the checkout validation error
    pub error_check_timeout_ms: u64,
    /// Retry policy for cart and total reads
    pub retry: RetryPolicy,
    /// Run the browser headless
    pub headless: bool,
    /// Chromium executable override
    pub chromium_path: Option<String>,
    /// Catalog API root
    pub api_base_url: String,
    /// Catalog API request timeout in milliseconds
    pub api_timeout_ms: u64,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            report_path: PathBuf::from(DEFAULT_REPORT_PATH),
            wait_timeout_ms: DEFAULT_WAIT_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            error_check_timeout_ms: DEFAULT_ERROR_CHECK_TIMEOUT_MS,
            retry: RetryPolicy::default(),
            headless: true,
            chromium_path: None,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            api_timeout_ms: DEFAULT_API_TIMEOUT_MS,
        }
    }
}

impl HarnessConfig {
    /// Create config with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from a JSON file
    pub fn from_json_file(path: &Path) -> ShopResult<Self> {
        let text = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values no run can work with
    pub fn validate(&self) -> ShopResult<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ShopError::config(format!(
                "base_url must be an http(s) URL, got '{}'",
                self.base_url
            )));
        }
        if self.poll_interval_ms == 0 {
            return Err(ShopError::config("poll_interval_ms must be positive"));
        }
        if self.poll_interval_ms > self.wait_timeout_ms {
            return Err(ShopError::config(
                "poll_interval_ms must not exceed wait_timeout_ms",
            ));
        }
        if self.retry.max_attempts == 0 {
            return Err(ShopError::config("retry.max_attempts must be at least 1"));
        }
        Ok(())
    }

    /// Set the storefront root
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the report file
    #[must_use]
    pub fn with_report_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.report_path = path.into();
        self
    }

    /// Set the element wait timeout
    #[must_use]
    pub const fn with_wait_timeout_ms(mut self, ms: u64) -> Self {
        self.wait_timeout_ms = ms;
        self
    }

    /// Set the poll interval
    #[must_use]
    pub const fn with_poll_interval_ms(mut self, ms: u64) -> Self {
        self.poll_interval_ms = ms;
        self
    }

    /// Set the retry policy
    #[must_use]
    pub const fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Set headless mode
    #[must_use]
    pub const fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set the Chromium executable
    #[must_use]
    pub fn with_chromium_path(mut self, path: impl Into<String>) -> Self {
        self.chromium_path = Some(path.into());
        self
    }

    /// Set the catalog API root
    #[must_use]
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Absolute storefront URL for a site path such as `/inventory.html`
    #[must_use]
    pub fn url_for(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        if path.is_empty() || path == "/" {
            format!("{base}/")
        } else if path.starts_with('/') {
            format!("{base}{path}")
        } else {
            format!("{base}/{path}")
        }
    }

    /// Wait options derived from this config
    #[must_use]
    pub const fn wait_options(&self) -> WaitOptions {
        WaitOptions {
            timeout_ms: self.wait_timeout_ms,
            poll_interval_ms: self.poll_interval_ms,
        }
    }

    /// Element wait timeout
    #[must_use]
    pub const fn wait_timeout(&self) -> Duration {
        Duration::from_millis(self.wait_timeout_ms)
    }

    /// Checkout error check timeout
    #[must_use]
    pub const fn error_check_timeout(&self) -> Duration {
        Duration::from_millis(self.error_check_timeout_ms)
    }

    /// API request timeout
    #[must_use]
    pub const fn api_timeout(&self) -> Duration {
        Duration::from_millis(self.api_timeout_ms)
    }

    /// Browser launch settings
    #[must_use]
    pub fn driver_config(&self) -> DriverConfig {
        let config = DriverConfig::new().headless(self.headless);
        match &self.chromium_path {
            Some(path) => config.executable(path.clone()),
            None => config,
        }
    }
}
