//! Session fixture.
//!
//! A [`SessionGuard`] owns one browser session for the length of a scenario
//! and quits it when dropped, whether the scenario passed, failed or
//! panicked.

use crate::driver::WebDriver;
use crate::locator::Selector;
use crate::result::ShopResult;
use std::ops::Deref;
use tracing::{debug, warn};

/// Owns a session and quits it on drop
#[derive(Debug)]
pub struct SessionGuard<D: WebDriver> {
    driver: Option<D>,
    label: String,
}

impl<D: WebDriver> SessionGuard<D> {
    /// Guard `driver` under a label used in teardown logs
    pub fn new(driver: D, label: impl Into<String>) -> Self {
        let label = label.into();
        debug!(session = %label, "session acquired");
        Self {
            driver: Some(driver),
            label,
        }
    }

    /// Label given at construction
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The guarded session
    #[must_use]
    #[allow(clippy::unreachable)]
    pub fn driver(&self) -> &D {
        // Only `release` and `drop` take the driver, and both consume the guard
        match self.driver.as_ref() {
            Some(driver) => driver,
            None => unreachable!("session guard used after release"),
        }
    }

    /// Quit now and report the result instead of logging it
    pub fn close(mut self) -> ShopResult<()> {
        match self.driver.take() {
            Some(driver) => {
                debug!(session = %self.label, "session closed");
                driver.quit()
            }
            None => Ok(()),
        }
    }

    /// Take the session back without quitting it
    #[must_use]
    #[allow(clippy::unreachable)]
    pub fn release(mut self) -> D {
        match self.driver.take() {
            Some(driver) => driver,
            None => unreachable!("session guard used after release"),
        }
    }
}

impl<D: WebDriver> Deref for SessionGuard<D> {
    type Target = D;

    fn deref(&self) -> &D {
        self.driver()
    }
}

impl<D: WebDriver> WebDriver for SessionGuard<D> {
    type Element = D::Element;

    fn navigate(&self, url: &str) -> ShopResult<()> {
        self.driver().navigate(url)
    }

    fn current_url(&self) -> ShopResult<String> {
        self.driver().current_url()
    }

    fn find_element(&self, selector: &Selector) -> ShopResult<D::Element> {
        self.driver().find_element(selector)
    }

    fn find_elements(&self, selector: &Selector) -> ShopResult<Vec<D::Element>> {
        self.driver().find_elements(selector)
    }

    fn quit(&self) -> ShopResult<()> {
        self.driver().quit()
    }
}

impl<D: WebDriver> Drop for SessionGuard<D> {
    fn drop(&mut self) {
        if let Some(driver) = self.driver.take() {
            match driver.quit() {
                Ok(()) => debug!(session = %self.label, "session closed"),
                Err(e) => warn!(session = %self.label, error = %e, "failed to quit session"),
            }
        }
    }
}
