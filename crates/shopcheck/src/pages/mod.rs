//! Storefront page objects.
//!
//! Each page object borrows a [`Harness`] and exposes the operations a
//! scenario needs. Every state read is a live query against the driver.
//! Expected negative outcomes come back as `bool` or empty values; only
//! structural failures are `Err`.

mod cart;
mod checkout;
mod login;
mod product;

pub use cart::{missing_products, same_product, CartPage};
pub use checkout::{CheckoutForm, CheckoutPage, CheckoutStage};
pub use login::{LoginPage, NO_ERROR_MESSAGE};
pub use product::ProductPage;

use crate::driver::WebDriver;
use crate::harness::Harness;
use tracing::{info, warn};

/// Log at info level and append to the report
pub(crate) fn note<D: WebDriver>(harness: &Harness<D>, message: &str) {
    info!("{message}");
    harness.report().append(message);
}

/// Log at warn level and append to the report
pub(crate) fn alert<D: WebDriver>(harness: &Harness<D>, message: &str) {
    warn!("{message}");
    harness.report().append(message);
}
