//! shopcheck: storefront regression testing over a WebDriver boundary
//!
//! Page objects for a demo e-commerce site (login, product listing, cart,
//! checkout) written against a synchronous driver trait, with explicit
//! waits, fixed-backoff retries on an injectable clock, and an
//! append-only report file.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                   SHOPCHECK Architecture                      │
//! ├──────────────────────────────────────────────────────────────┤
//! │   ┌──────────┐    ┌──────────┐    ┌────────────────────┐      │
//! │   │ Workflow │───►│  Page    │───►│ WebDriver          │      │
//! │   │ Scenario │    │  Objects │    │  ChromiumDriver    │      │
//! │   └──────────┘    └────┬─────┘    │  MockStorefront    │      │
//! │                        │          └────────────────────┘      │
//! │                 Waiter · Retry · Clock · ReportSink           │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use shopcheck::{FakeClock, Harness, HarnessConfig, MockStorefront, ReportSink, site};
//!
//! let clock = FakeClock::shared();
//! let harness = Harness::with_parts(
//!     MockStorefront::new(clock.clone()),
//!     HarnessConfig::default(),
//!     clock,
//!     ReportSink::disabled(),
//! );
//! harness.open("/").unwrap();
//! assert!(harness.login_page().login(site::STANDARD_USER, site::PASSWORD).unwrap());
//! assert_eq!(harness.product_page().add_all_products_to_cart().unwrap(), 6);
//! ```

#![warn(missing_docs)]

#[cfg(feature = "api")]
pub mod api;
#[cfg(feature = "browser")]
mod browser;
mod clock;
mod config;
mod credentials;
mod driver;
mod fixture;
mod harness;
mod locator;
pub mod mock;
mod page_object;
pub mod pages;
mod reporter;
mod result;
mod retry;
pub mod site;
mod wait;
mod workflow;

#[cfg(feature = "browser")]
pub use browser::{ChromiumDriver, ChromiumElement};
pub use clock::{Clock, FakeClock, SharedClock, SystemClock};
pub use config::{
    HarnessConfig, DEFAULT_API_BASE_URL, DEFAULT_API_TIMEOUT_MS, DEFAULT_BASE_URL,
    DEFAULT_ERROR_CHECK_TIMEOUT_MS, DEFAULT_REPORT_PATH,
};
pub use credentials::{Credential, CredentialFixture};
pub use driver::{DriverConfig, WebDriver, WebElement};
pub use fixture::SessionGuard;
pub use harness::{Harness, ScenarioResult, SuiteResults};
pub use locator::Selector;
pub use mock::MockStorefront;
pub use page_object::{url_path, PageObject, UrlMatcher};
pub use pages::{CartPage, CheckoutForm, CheckoutPage, CheckoutStage, LoginPage, ProductPage};
pub use reporter::{format_line, ReportSink, ScenarioStatus, REPORT_HEADER, TIMESTAMP_FORMAT};
pub use result::{ShopError, ShopResult};
pub use retry::{RetryOutcome, RetryPolicy, DEFAULT_BACKOFF_MS, DEFAULT_MAX_ATTEMPTS};
pub use wait::{
    ElementCondition, WaitOptions, WaitOutcome, Waiter, DEFAULT_POLL_INTERVAL_MS,
    DEFAULT_WAIT_TIMEOUT_MS,
};
pub use workflow::{run_suite, Scenario, ScenarioInputs, UserOutcome, Workflow};

/// Prelude for convenient imports
pub mod prelude {
    pub use super::{
        run_suite, CheckoutForm, Clock, CredentialFixture, Harness, HarnessConfig, PageObject,
        ReportSink, Scenario, ScenarioInputs, ScenarioResult, ScenarioStatus, Selector,
        SessionGuard, ShopError, ShopResult, SuiteResults, WebDriver, WebElement, Workflow,
    };
}
