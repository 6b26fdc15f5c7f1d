//! Checkout: shipping form, order overview and confirmation.

use super::{alert, note};
use crate::driver::{WebDriver, WebElement};
use crate::harness::Harness;
use crate::page_object::{url_path, PageObject};
use crate::result::{ShopError, ShopResult};
use crate::retry::RetryOutcome;
use crate::site::{checkout, paths};
use std::fmt;
use tracing::{debug, info};

/// Shipping details entered on the first checkout step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutForm {
    /// First name
    pub first_name: String,
    /// Last name
    pub last_name: String,
    /// Postal code
    pub zip_code: String,
}

impl CheckoutForm {
    /// Create a form
    #[must_use]
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>, zip_code: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            zip_code: zip_code.into(),
        }
    }

    /// John Doe, 12345
    #[must_use]
    pub fn reference() -> Self {
        Self::new("John", "Doe", "12345")
    }

    /// Name of the first empty field, in form order
    #[must_use]
    pub fn blank_field(&self) -> Option<&'static str> {
        if self.first_name.trim().is_empty() {
            Some("first name")
        } else if self.last_name.trim().is_empty() {
            Some("last name")
        } else if self.zip_code.trim().is_empty() {
            Some("zip code")
        } else {
            None
        }
    }

    /// Whether any required field is empty
    #[must_use]
    pub fn has_blank_field(&self) -> bool {
        self.blank_field().is_some()
    }
}

/// Where a checkout attempt currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutStage {
    /// Shipping form showing, nothing submitted
    ShippingForm,
    /// Shipping accepted, overview still rendering
    ShippingSubmitted,
    /// Overview with the order total visible
    Overview,
    /// Order placed
    Finished,
    /// Shipping form rejected the input
    InputError,
    /// Not in checkout
    Unknown,
}

impl CheckoutStage {
    /// Whether the attempt can go no further
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Finished | Self::InputError)
    }
}

impl fmt::Display for CheckoutStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ShippingForm => "shipping form",
            Self::ShippingSubmitted => "shipping submitted",
            Self::Overview => "overview",
            Self::Finished => "finished",
            Self::InputError => "input error",
            Self::Unknown => "unknown",
        })
    }
}

/// The checkout pages
#[derive(Debug)]
pub struct CheckoutPage<'a, D: WebDriver> {
    harness: &'a Harness<D>,
}

impl<'a, D: WebDriver> CheckoutPage<'a, D> {
    /// Wrap a harness
    #[must_use]
    pub const fn new(harness: &'a Harness<D>) -> Self {
        Self { harness }
    }

    /// Fill the shipping form and press Continue.
    ///
    /// Each field is waited for, cleared and typed into. A field that never
    /// shows up fails with `InvalidState` naming it.
    pub fn enter_shipping_information(&self, first_name: &str, last_name: &str, zip_code: &str) -> ShopResult<()> {
        let result = self.fill_and_continue(first_name, last_name, zip_code);
        match &result {
            Ok(()) => note(
                self.harness,
                &format!("Shipping information submitted: {first_name}, {last_name}, {zip_code}"),
            ),
            Err(e) => alert(
                self.harness,
                &format!("Error during shipping information submission: {e}"),
            ),
        }
        result
    }

    fn fill_and_continue(&self, first_name: &str, last_name: &str, zip_code: &str) -> ShopResult<()> {
        let fields = [
            (checkout::first_name(), first_name, "First name field not found."),
            (checkout::last_name(), last_name, "Last name field not found."),
            (checkout::postal_code(), zip_code, "ZIP code field not found."),
        ];
        for (selector, value, missing) in fields {
            let field = self.wait_visible(&selector, missing)?;
            field.clear()?;
            field.send_keys(value)?;
        }
        self.wait_visible(&checkout::continue_button(), "Continue button not found.")?
            .click()
    }

    fn wait_visible(&self, selector: &crate::locator::Selector, missing: &str) -> ShopResult<D::Element> {
        self.harness
            .waiter()
            .wait_for_displayed(self.harness.driver(), selector, self.harness.config().wait_timeout())
            .ok_or_else(|| ShopError::invalid_state(missing))
    }

    /// Non-raising form of [`CheckoutPage::enter_shipping_information`]
    #[must_use]
    pub fn submit_shipping_information(&self, form: &CheckoutForm) -> bool {
        self.enter_shipping_information(&form.first_name, &form.last_name, &form.zip_code)
            .is_ok()
    }

    /// Whether the shipping form shows a validation error.
    ///
    /// Waits at most the configured error check timeout.
    #[must_use]
    pub fn has_input_error(&self) -> bool {
        let within = self.harness.config().error_check_timeout();
        let found = self
            .harness
            .waiter()
            .wait_for_displayed(self.harness.driver(), &checkout::error(), within);
        match found {
            Some(element) => {
                let message = element.text().unwrap_or_default();
                note(self.harness, &format!("Error Message Displayed: {message}"));
                true
            }
            None => {
                debug!("No error message detected.");
                false
            }
        }
    }

    /// Order total text, e.g. `Total: $140.34`; empty when it never appears
    #[must_use]
    pub fn get_total_price(&self) -> String {
        let policy = self.harness.config().retry;
        let timeout = self.harness.config().wait_timeout();
        let outcome = policy.run(self.harness.clock().as_ref(), |attempt| {
            let label = self.harness.waiter().wait_for_displayed(
                self.harness.driver(),
                &checkout::total_label(),
                timeout,
            );
            let Some(label) = label else {
                note(self.harness, &format!("Attempt {attempt}: Total price label not found."));
                return None;
            };
            match label.text() {
                Ok(price) if !price.trim().is_empty() => {
                    note(self.harness, &format!("Attempt {attempt}: Total price found: {price}"));
                    Some(price)
                }
                Ok(_) => {
                    note(self.harness, &format!("Attempt {attempt}: Total price label is empty."));
                    None
                }
                Err(e) => {
                    note(
                        self.harness,
                        &format!("Attempt {attempt}: Error retrieving total price: {e}"),
                    );
                    None
                }
            }
        });
        match outcome {
            RetryOutcome::Succeeded { value, .. } => value,
            RetryOutcome::ExhaustedRetries { attempts } => {
                alert(
                    self.harness,
                    &format!("Total price retrieval failed after {attempts} attempts."),
                );
                String::new()
            }
        }
    }

    /// Click Finish once it is clickable; `false` if it never is
    #[must_use]
    pub fn click_finish_button(&self) -> bool {
        let timeout = self.harness.config().wait_timeout();
        let Some(button) = self
            .harness
            .waiter()
            .wait_for_clickable(self.harness.driver(), &checkout::finish_button(), timeout)
        else {
            alert(self.harness, "Finish button not found.");
            return false;
        };
        match button.click() {
            Ok(()) => {
                info!("Order finished.");
                true
            }
            Err(e) => {
                alert(self.harness, &format!("Error clicking finish button: {e}"));
                false
            }
        }
    }

    /// Raising form of [`CheckoutPage::click_finish_button`]
    pub fn finish_checkout(&self) -> ShopResult<()> {
        if self.click_finish_button() {
            Ok(())
        } else {
            Err(ShopError::invalid_state("Finish button not clicked."))
        }
    }

    /// Derive the checkout stage from the live URL and DOM
    pub fn current_stage(&self) -> ShopResult<CheckoutStage> {
        let driver = self.harness.driver();
        let url = driver.current_url()?;
        let stage = match url_path(&url) {
            paths::CHECKOUT_STEP_ONE => {
                let errors = driver.find_elements(&checkout::error())?;
                if errors.is_empty() {
                    CheckoutStage::ShippingForm
                } else {
                    CheckoutStage::InputError
                }
            }
            paths::CHECKOUT_STEP_TWO => {
                if driver.find_elements(&checkout::total_label())?.is_empty() {
                    CheckoutStage::ShippingSubmitted
                } else {
                    CheckoutStage::Overview
                }
            }
            paths::CHECKOUT_COMPLETE => CheckoutStage::Finished,
            _ => CheckoutStage::Unknown,
        };
        debug!(%stage, "checkout stage");
        Ok(stage)
    }
}

impl<D: WebDriver> PageObject for CheckoutPage<'_, D> {
    fn url_pattern(&self) -> &'static str {
        "/checkout-*.html"
    }

    fn is_loaded(&self) -> ShopResult<bool> {
        Ok(self.current_stage()? != CheckoutStage::Unknown)
    }

    fn page_name(&self) -> &'static str {
        "checkout"
    }
}
