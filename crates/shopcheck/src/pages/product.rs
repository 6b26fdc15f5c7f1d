//! Product listing.

use super::{alert, note, CartPage};
use crate::driver::{WebDriver, WebElement};
use crate::harness::Harness;
use crate::page_object::PageObject;
use crate::result::{ShopError, ShopResult};
use crate::site::{inventory, paths};
use tracing::{debug, warn};

/// The product listing page
#[derive(Debug)]
pub struct ProductPage<'a, D: WebDriver> {
    harness: &'a Harness<D>,
}

impl<'a, D: WebDriver> ProductPage<'a, D> {
    /// Wrap a harness
    #[must_use]
    pub const fn new(harness: &'a Harness<D>) -> Self {
        Self { harness }
    }

    /// Click every visible, enabled add-to-cart button.
    ///
    /// Returns how many were clicked. Fails with `NotFound` when the page
    /// has no buttons at all.
    pub fn add_all_products_to_cart(&self) -> ShopResult<usize> {
        let result = self.try_add_all();
        if let Err(e) = &result {
            alert(self.harness, &format!("Error adding products to cart: {e}"));
        }
        result
    }

    fn try_add_all(&self) -> ShopResult<usize> {
        let buttons = self.harness.driver().find_elements(&inventory::add_buttons())?;
        if buttons.is_empty() {
            return Err(ShopError::not_found("No products found on the page."));
        }

        let mut clicked = 0;
        for (index, button) in buttons.iter().enumerate() {
            if button.is_clickable()? {
                button.click()?;
                clicked += 1;
                debug!(index, "clicked add to cart");
            } else {
                debug!(index, "skipped add to cart button that is hidden or disabled");
            }
        }
        note(
            self.harness,
            &format!("Added {clicked} of {} products to the cart.", buttons.len()),
        );
        Ok(clicked)
    }

    /// Product names in page order; empty when none are rendered
    #[must_use]
    pub fn get_product_names(&self) -> Vec<String> {
        let names = self
            .harness
            .driver()
            .find_elements(&inventory::item_names())
            .and_then(|items| items.iter().map(WebElement::text).collect::<ShopResult<Vec<_>>>());
        match names {
            Ok(names) => {
                debug!(products = %names.join(", "), "products on page");
                names
            }
            Err(e) => {
                warn!(error = %e, "could not read product names");
                Vec::new()
            }
        }
    }

    /// Click the header cart icon
    pub fn go_to_cart(&self) -> ShopResult<()> {
        let result = self.try_go_to_cart();
        if let Err(e) = &result {
            alert(self.harness, &format!("Error navigating to cart: {e}"));
        }
        result
    }

    fn try_go_to_cart(&self) -> ShopResult<()> {
        let icon = self.harness.driver().find_element(&inventory::cart_icon())?;
        if !icon.is_displayed()? {
            return Err(ShopError::invalid_state("Cart icon is not displayed."));
        }
        icon.click()?;
        debug!("Navigated to the cart page.");
        Ok(())
    }

    /// Number shown on the cart badge; zero when the badge is absent
    #[must_use]
    pub fn cart_badge_count(&self) -> usize {
        self.harness
            .driver()
            .find_elements(&inventory::cart_badge())
            .ok()
            .and_then(|badges| badges.into_iter().next())
            .and_then(|badge| badge.text().ok())
            .and_then(|text| text.trim().parse().ok())
            .unwrap_or(0)
    }

    /// Open the cart and check, once, that every expected name is listed
    #[must_use]
    pub fn verify_all_products_in_cart<S: AsRef<str>>(&self, expected: &[S]) -> bool {
        if let Err(e) = self.go_to_cart() {
            alert(self.harness, &format!("Error verifying products in cart: {e}"));
            return false;
        }
        let cart = CartPage::new(self.harness);
        let names = cart.get_cart_item_names();
        let missing = super::missing_products(expected, &names);
        for name in &missing {
            alert(self.harness, &format!("Missing product: {name}"));
        }
        missing.is_empty()
    }
}

impl<D: WebDriver> PageObject for ProductPage<'_, D> {
    fn url_pattern(&self) -> &'static str {
        paths::INVENTORY
    }

    fn is_loaded(&self) -> ShopResult<bool> {
        let found = self.harness.driver().find_elements(&inventory::container())?;
        Ok(!found.is_empty())
    }

    fn page_name(&self) -> &'static str {
        "inventory"
    }
}
