//! Simulated storefront for driving page objects without a browser.
//!
//! [`MockStorefront`] models the demo shop closely enough for every
//! scenario to run against it: the demo accounts (including the locked-out
//! one), the six-item catalog, the cart badge, the burger menu, and the
//! checkout steps with required-field validation. Optional render lag on the
//! cart listing and the order total exercises the retry paths.
//!
//! ```rust,ignore
//! use shopcheck::{FakeClock, Harness, HarnessConfig, MockStorefront, ReportSink};
//!
//! let clock = FakeClock::shared();
//! let site = MockStorefront::new(clock.clone());
//! let harness = Harness::with_parts(site, HarnessConfig::default(), clock, ReportSink::disabled());
//! harness.open("/")?;
//! assert!(harness.login_page().login("standard_user", "secret_sauce")?);
//! ```

mod state;
mod storefront;

pub use state::{reference_products, Product, TAX_RATE};
pub use storefront::{MockElement, MockStorefront};
