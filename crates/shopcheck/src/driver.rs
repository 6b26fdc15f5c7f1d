//! Browser driver boundary.
//!
//! Page objects never talk to a browser directly. They talk to a [`WebDriver`],
//! which either controls a real Chromium instance (`ChromiumDriver`, feature
//! `browser`) or simulates the storefront in-process
//! ([`MockStorefront`](crate::mock::MockStorefront)).
//!
//! The traits are synchronous and take `&self`: one scenario owns one
//! session and drives it from a single thread, and page objects only ever
//! hold a shared borrow of the harness.

use crate::locator::Selector;
use crate::result::ShopResult;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A live handle to one DOM element.
///
/// Handles may go stale when the page re-renders; every method then fails
/// with [`ShopError::Driver`](crate::ShopError::Driver).
pub trait WebElement {
    /// Click the element
    fn click(&self) -> ShopResult<()>;

    /// Type text into the element
    fn send_keys(&self, text: &str) -> ShopResult<()>;

    /// Clear an input element
    fn clear(&self) -> ShopResult<()>;

    /// Whether the element is rendered and visible
    fn is_displayed(&self) -> ShopResult<bool>;

    /// Whether the element accepts interaction
    fn is_enabled(&self) -> ShopResult<bool>;

    /// Visible text content
    fn text(&self) -> ShopResult<String>;

    /// Displayed and enabled
    fn is_clickable(&self) -> ShopResult<bool> {
        Ok(self.is_displayed()? && self.is_enabled()?)
    }
}

/// One browser session
pub trait WebDriver {
    /// Element handle type returned by lookups
    type Element: WebElement;

    /// Navigate to an absolute URL
    fn navigate(&self, url: &str) -> ShopResult<()>;

    /// URL of the current document
    fn current_url(&self) -> ShopResult<String>;

    /// First element matching `selector`.
    ///
    /// Fails with [`ShopError::NotFound`](crate::ShopError::NotFound) when nothing matches.
    fn find_element(&self, selector: &Selector) -> ShopResult<Self::Element>;

    /// All elements matching `selector` in document order; empty when none match
    fn find_elements(&self, selector: &Selector) -> ShopResult<Vec<Self::Element>>;

    /// End the session. Calling it twice is harmless.
    fn quit(&self) -> ShopResult<()>;
}

/// Browser launch configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverConfig {
    /// Run in headless mode
    pub headless: bool,
    /// Viewport width
    pub viewport_width: u32,
    /// Viewport height
    pub viewport_height: u32,
    /// Timeout for navigation
    pub navigation_timeout: Duration,
    /// Executable path override
    pub executable_path: Option<String>,
    /// Disable the Chromium sandbox (needed inside most containers)
    pub no_sandbox: bool,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            headless: true,
            viewport_width: 1920,
            viewport_height: 1080,
            navigation_timeout: Duration::from_secs(30),
            executable_path: None,
            no_sandbox: true,
        }
    }
}

impl DriverConfig {
    /// Create new config with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set headless mode
    #[must_use]
    pub const fn headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set viewport dimensions
    #[must_use]
    pub const fn viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport_width = width;
        self.viewport_height = height;
        self
    }

    /// Set navigation timeout
    #[must_use]
    pub const fn navigation_timeout(mut self, timeout: Duration) -> Self {
        self.navigation_timeout = timeout;
        self
    }

    /// Set the Chromium executable
    #[must_use]
    pub fn executable(mut self, path: impl Into<String>) -> Self {
        self.executable_path = Some(path.into());
        self
    }

    /// Toggle the sandbox
    #[must_use]
    pub const fn no_sandbox(mut self, no_sandbox: bool) -> Self {
        self.no_sandbox = no_sandbox;
        self
    }
}
