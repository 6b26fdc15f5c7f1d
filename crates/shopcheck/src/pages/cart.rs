//! Cart page.

use super::{alert, note};
use crate::driver::{WebDriver, WebElement};
use crate::harness::Harness;
use crate::page_object::PageObject;
use crate::result::{ShopError, ShopResult};
use crate::retry::RetryOutcome;
use crate::site::{cart, paths};
use tracing::{debug, warn};

/// Case-insensitive product name comparison
#[must_use]
pub fn same_product(a: &str, b: &str) -> bool {
    a == b || a.to_lowercase() == b.to_lowercase()
}

/// Expected names absent from `actual`, in `expected` order
#[must_use]
pub fn missing_products<'e, S: AsRef<str>>(expected: &'e [S], actual: &[String]) -> Vec<&'e str> {
    expected
        .iter()
        .map(AsRef::as_ref)
        .filter(|want| !actual.iter().any(|have| same_product(have, want)))
        .collect()
}

/// The cart page
#[derive(Debug)]
pub struct CartPage<'a, D: WebDriver> {
    harness: &'a Harness<D>,
}

impl<'a, D: WebDriver> CartPage<'a, D> {
    /// Wrap a harness
    #[must_use]
    pub const fn new(harness: &'a Harness<D>) -> Self {
        Self { harness }
    }

    /// Whether `name` is listed, ignoring case
    #[must_use]
    pub fn verify_product_in_cart(&self, name: &str) -> bool {
        let names = self.get_cart_item_names();
        debug!(cart = %names.join(", "), product = name, "checking cart membership");
        names.iter().any(|have| same_product(have, name))
    }

    /// Whether every expected name is listed on some attempt.
    ///
    /// Re-reads the cart under the configured retry policy, so an expected
    /// item that renders late is still found.
    #[must_use]
    pub fn verify_all_products_in_cart<S: AsRef<str>>(&self, expected: &[S]) -> bool {
        let policy = self.harness.config().retry;
        let outcome = policy.run(self.harness.clock().as_ref(), |attempt| {
            let names = self.get_cart_item_names();
            note(
                self.harness,
                &format!("Attempt {attempt}: Cart contains: {}", names.join(", ")),
            );
            let missing = missing_products(expected, &names);
            if missing.is_empty() {
                note(self.harness, "All expected products are present in the cart.");
                Some(())
            } else {
                note(
                    self.harness,
                    &format!("Missing products: {}", missing.join(", ")),
                );
                None
            }
        });
        match outcome {
            RetryOutcome::Succeeded { .. } => true,
            RetryOutcome::ExhaustedRetries { attempts } => {
                alert(
                    self.harness,
                    &format!("Product verification failed after {attempts} attempts."),
                );
                false
            }
        }
    }

    /// Names of the listed items, in cart order; empty on any driver failure
    #[must_use]
    pub fn get_cart_item_names(&self) -> Vec<String> {
        let names = self
            .harness
            .driver()
            .find_elements(&cart::items())
            .and_then(|items| items.iter().map(WebElement::text).collect::<ShopResult<Vec<_>>>());
        names.unwrap_or_else(|e| {
            warn!(error = %e, "Error retrieving cart item names");
            Vec::new()
        })
    }

    /// Number of listed items
    #[must_use]
    pub fn get_cart_item_count(&self) -> usize {
        match self.harness.driver().find_elements(&cart::items()) {
            Ok(items) => {
                debug!(count = items.len(), "Number of items in the cart");
                items.len()
            }
            Err(e) => {
                warn!(error = %e, "Error retrieving cart item count");
                0
            }
        }
    }

    /// Click the checkout button
    pub fn checkout(&self) -> ShopResult<()> {
        let result = self.try_checkout();
        if let Err(e) = &result {
            alert(self.harness, &format!("Error clicking checkout button: {e}"));
        }
        result
    }

    fn try_checkout(&self) -> ShopResult<()> {
        let button = self.harness.driver().find_element(&cart::checkout_button())?;
        if !button.is_clickable()? {
            return Err(ShopError::invalid_state("Checkout button is not clickable."));
        }
        button.click()?;
        debug!("Proceeded to checkout.");
        Ok(())
    }
}

impl<D: WebDriver> PageObject for CartPage<'_, D> {
    fn url_pattern(&self) -> &'static str {
        paths::CART
    }

    fn is_loaded(&self) -> ShopResult<bool> {
        let found = self.harness.driver().find_elements(&cart::checkout_button())?;
        Ok(!found.is_empty())
    }

    fn page_name(&self) -> &'static str {
        "cart"
    }
}
