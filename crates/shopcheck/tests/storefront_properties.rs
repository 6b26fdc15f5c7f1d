//! Behavioural properties of the page objects against the simulated storefront.
//!
//! Every test runs on a `FakeClock`, so the 10 s waits and 2 s retry
//! backoffs cost nothing and their timing can be asserted exactly.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use proptest::prelude::*;
use shopcheck::site::{self, paths};
use shopcheck::{
    CheckoutForm, FakeClock, Harness, HarnessConfig, MockStorefront, ReportSink, ShopError,
    WebDriver,
};
use std::sync::Arc;
use std::time::Duration;

fn harness(site: MockStorefront, clock: Arc<FakeClock>) -> Harness<MockStorefront> {
    let h = Harness::with_parts(site, HarnessConfig::default(), clock, ReportSink::disabled());
    h.open(paths::LOGIN).unwrap();
    h
}

fn fresh() -> (Arc<FakeClock>, Harness<MockStorefront>) {
    let clock = FakeClock::shared();
    let h = harness(MockStorefront::new(clock.clone()), clock.clone());
    (clock, h)
}

fn at_shipping_form() -> Harness<MockStorefront> {
    let (_clock, h) = fresh();
    assert!(h.login_page().login(site::STANDARD_USER, site::PASSWORD).unwrap());
    h.product_page().add_all_products_to_cart().unwrap();
    h.product_page().go_to_cart().unwrap();
    h.cart_page().checkout().unwrap();
    h
}

// ============================================================================
// Login
// ============================================================================

#[test]
fn test_valid_credentials_land_on_inventory() {
    let (_clock, h) = fresh();
    assert!(h.login_page().login(site::STANDARD_USER, site::PASSWORD).unwrap());
    assert_eq!(
        h.driver().current_url().unwrap(),
        "https://www.saucedemo.com/inventory.html"
    );
}

#[test]
fn test_every_demo_account_but_locked_out_signs_in() {
    for user in site::DEMO_USERS {
        let (_clock, h) = fresh();
        let accepted = h.login_page().login(user, site::PASSWORD).unwrap();
        assert_eq!(accepted, *user != site::LOCKED_OUT_USER, "{user}");
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_invalid_credentials_show_an_error(
        username in "[a-z_]{0,12}",
        password in "[a-z_]{0,12}",
    ) {
        prop_assume!(!(site::DEMO_USERS.contains(&username.as_str()) && password == site::PASSWORD));
        let (_clock, h) = fresh();
        let page = h.login_page();
        prop_assert!(!page.login(&username, &password).unwrap());
        let message = page.get_error_message();
        prop_assert!(!message.is_empty());
        prop_assert_ne!(message, shopcheck::pages::NO_ERROR_MESSAGE);
    }
}

#[test]
fn test_guarded_page_redirects_with_message() {
    let (_clock, h) = fresh();
    h.open(paths::CART).unwrap();
    assert!(h.driver().on_login_page());
    assert!(h.login_page().get_error_message().contains("'/cart.html'"));
}

// ============================================================================
// Cart
// ============================================================================

#[test]
fn test_add_all_then_count_matches_catalog() {
    let (_clock, h) = fresh();
    assert!(h.login_page().login(site::STANDARD_USER, site::PASSWORD).unwrap());
    let added = h.product_page().add_all_products_to_cart().unwrap();
    h.product_page().go_to_cart().unwrap();
    assert_eq!(added, site::REFERENCE_CATALOG.len());
    assert_eq!(h.cart_page().get_cart_item_count(), added);
}

#[test]
fn test_cart_listing_rendered_within_retries() {
    for (lag_secs, expect_found, backoffs) in [(0, true, 0), (2, true, 1), (4, true, 2), (5, false, 2)] {
        let clock = FakeClock::shared();
        let site = MockStorefront::new(clock.clone()).with_cart_render_lag(Duration::from_secs(lag_secs));
        let h = harness(site, clock.clone());
        assert!(h.login_page().login(site::STANDARD_USER, site::PASSWORD).unwrap());
        h.product_page().add_all_products_to_cart().unwrap();
        h.product_page().go_to_cart().unwrap();

        let found = h.cart_page().verify_all_products_in_cart(site::REFERENCE_CATALOG);
        assert_eq!(found, expect_found, "lag {lag_secs}s");
        assert_eq!(clock.sleeps_of(Duration::from_secs(2)), backoffs, "lag {lag_secs}s");
    }
}

#[test]
fn test_cart_verification_order_and_case_insensitive() {
    let (_clock, h) = fresh();
    assert!(h.login_page().login(site::STANDARD_USER, site::PASSWORD).unwrap());
    h.product_page().add_all_products_to_cart().unwrap();
    h.product_page().go_to_cart().unwrap();
    let cart = h.cart_page();
    assert!(cart.verify_all_products_in_cart(&["SAUCE LABS ONESIE", "sauce labs backpack"]));
    assert!(cart.verify_all_products_in_cart(&["SAUCE LABS ONESIE", "sauce labs backpack"]));
}

// ============================================================================
// Checkout
// ============================================================================

#[test]
fn test_happy_checkout_reaches_confirmation() {
    let h = at_shipping_form();
    let checkout = h.checkout_page();
    assert!(checkout.submit_shipping_information(&CheckoutForm::reference()));
    assert!(!checkout.has_input_error());
    assert!(!checkout.get_total_price().is_empty());
    checkout.finish_checkout().unwrap();
    assert!(h
        .driver()
        .current_url()
        .unwrap()
        .ends_with("/checkout-complete.html"));
    assert_eq!(h.driver().orders_completed(), 1);
}

#[test]
fn test_each_blank_field_is_rejected() {
    let forms = [
        CheckoutForm::new("", "Doe", "12345"),
        CheckoutForm::new("John", "", "12345"),
        CheckoutForm::new("John", "Doe", ""),
        CheckoutForm::new("", "", ""),
    ];
    for form in forms {
        let h = at_shipping_form();
        let checkout = h.checkout_page();
        checkout
            .enter_shipping_information(&form.first_name, &form.last_name, &form.zip_code)
            .unwrap();
        assert!(checkout.has_input_error(), "{form:?}");
        assert!(h
            .driver()
            .current_url()
            .unwrap()
            .ends_with(paths::CHECKOUT_STEP_ONE));
        assert!(h.driver().shipping().is_none());
    }
}

#[test]
fn test_finish_without_overview_is_invalid_state() {
    let h = at_shipping_form();
    let err = h.checkout_page().finish_checkout().unwrap_err();
    assert!(matches!(err, ShopError::InvalidState { .. }));
}
