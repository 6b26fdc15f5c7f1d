//! Login form and session menu.

use super::{alert, note};
use crate::driver::{WebDriver, WebElement};
use crate::harness::Harness;
use crate::page_object::PageObject;
use crate::result::{ShopError, ShopResult};
use crate::site::{inventory, login, paths};
use tracing::{debug, info};

/// Returned by [`LoginPage::get_error_message`] when no error is showing
pub const NO_ERROR_MESSAGE: &str = "No error message displayed.";

/// The login page
#[derive(Debug)]
pub struct LoginPage<'a, D: WebDriver> {
    harness: &'a Harness<D>,
}

impl<'a, D: WebDriver> LoginPage<'a, D> {
    /// Wrap a harness
    #[must_use]
    pub const fn new(harness: &'a Harness<D>) -> Self {
        Self { harness }
    }

    /// Fill in credentials and submit.
    ///
    /// `Ok(false)` means the site rejected the credentials; the reason is in
    /// the report. `Err` means the form itself could not be used.
    pub fn login(&self, username: &str, password: &str) -> ShopResult<bool> {
        let result = self.try_login(username, password);
        if let Err(e) = &result {
            alert(self.harness, &format!("Error during login for user '{username}': {e}"));
        }
        result
    }

    fn try_login(&self, username: &str, password: &str) -> ShopResult<bool> {
        let driver = self.harness.driver();
        let timeout = self.harness.config().wait_timeout();
        debug!(username, "submitting login form");

        let username_field = self
            .harness
            .waiter()
            .wait_for_displayed(driver, &login::username(), timeout)
            .ok_or_else(|| {
                ShopError::timeout(timeout.as_millis() as u64, format!("{} to be visible", login::username()))
            })?;
        username_field.clear()?;
        username_field.send_keys(username)?;

        let password_field = driver.find_element(&login::password())?;
        password_field.clear()?;
        password_field.send_keys(password)?;

        driver.find_element(&login::login_button())?.click()?;

        match self.displayed_error() {
            Some(message) => {
                alert(
                    self.harness,
                    &format!("Login failed for user '{username}': {message}"),
                );
                Ok(false)
            }
            None => {
                info!(username, "login accepted");
                Ok(true)
            }
        }
    }

    /// The validation error currently shown, or [`NO_ERROR_MESSAGE`]
    #[must_use]
    pub fn get_error_message(&self) -> String {
        match self.displayed_error() {
            Some(message) => {
                note(self.harness, &format!("Validation Error: {message}"));
                message
            }
            None => NO_ERROR_MESSAGE.to_string(),
        }
    }

    /// Whether the product listing is showing
    #[must_use]
    pub fn is_login_successful(&self) -> bool {
        self.harness
            .driver()
            .find_element(&inventory::container())
            .and_then(|el| el.is_displayed())
            .unwrap_or(false)
    }

    /// Open the burger menu and click its logout link
    pub fn logout(&self) -> ShopResult<()> {
        info!("Attempting to log out...");
        match self.try_logout() {
            Ok(()) => {
                note(self.harness, "Logout successful.");
                Ok(())
            }
            Err(e) => {
                alert(self.harness, &format!("Logout failed: {e}"));
                Err(e)
            }
        }
    }

    fn try_logout(&self) -> ShopResult<()> {
        let driver = self.harness.driver();
        let waiter = self.harness.waiter();
        let timeout = self.harness.config().wait_timeout();

        for selector in [inventory::menu_button(), inventory::logout_link()] {
            let element = waiter
                .wait_for_clickable(driver, &selector, timeout)
                .ok_or_else(|| {
                    ShopError::timeout(timeout.as_millis() as u64, format!("{selector} to be clickable"))
                })?;
            element.click()?;
        }
        Ok(())
    }

    /// Text of the visible error banner, if any
    fn displayed_error(&self) -> Option<String> {
        let element = self.harness.driver().find_element(&login::error()).ok()?;
        if !element.is_displayed().unwrap_or(false) {
            return None;
        }
        element.text().ok()
    }
}

impl<D: WebDriver> PageObject for LoginPage<'_, D> {
    fn url_pattern(&self) -> &'static str {
        paths::LOGIN
    }

    fn is_loaded(&self) -> ShopResult<bool> {
        let found = self.harness.driver().find_elements(&login::login_button())?;
        Ok(!found.is_empty())
    }

    fn page_name(&self) -> &'static str {
        "login"
    }
}
