//! Example: page objects against the simulated storefront
//!
//! Walks the checkout journey step by step, printing what each page object
//! sees. Runs on a fake clock, so the render lag below costs no real time.
//!
//! Run with: `cargo run --example page_object`

use shopcheck::prelude::*;
use shopcheck::{site, CheckoutStage, FakeClock, MockStorefront};
use std::time::Duration;

fn main() -> ShopResult<()> {
    println!("=== Page Object Example ===\n");

    let clock = FakeClock::shared();
    let storefront = MockStorefront::new(clock.clone())
        .with_cart_render_lag(Duration::from_secs(3));
    let harness = Harness::with_parts(
        storefront,
        HarnessConfig::default(),
        clock.clone(),
        ReportSink::disabled(),
    );

    // 1. Login
    println!("1. Logging in as {}...", site::STANDARD_USER);
    harness.open(site::paths::LOGIN)?;
    let login = harness.login_page();
    println!("   Page: {} ({})", login.page_name(), login.url_pattern());
    let accepted = login.login(site::STANDARD_USER, site::PASSWORD)?;
    println!("   Accepted: {accepted}");

    // 2. Products
    println!("\n2. Filling the cart...");
    let products = harness.product_page();
    for name in products.get_product_names() {
        println!("   - {name}");
    }
    let added = products.add_all_products_to_cart()?;
    println!("   Added {added}, badge shows {}", products.cart_badge_count());

    // 3. Cart, whose listing renders late
    println!("\n3. Verifying the cart...");
    products.go_to_cart()?;
    let cart = harness.cart_page();
    let all_there = cart.verify_all_products_in_cart(site::REFERENCE_CATALOG);
    println!("   All products present: {all_there}");
    println!("   Backoffs slept: {}", clock.sleeps_of(Duration::from_secs(2)));

    // 4. Checkout
    println!("\n4. Checking out...");
    cart.checkout()?;
    let checkout = harness.checkout_page();
    let form = CheckoutForm::reference();
    let submitted = checkout.submit_shipping_information(&form);
    println!("   Shipping form accepted: {submitted}");
    println!("   Stage: {}", checkout.current_stage()?);
    println!("   {}", checkout.get_total_price());
    checkout.finish_checkout()?;
    let stage = checkout.current_stage()?;
    println!("   Stage: {stage}");
    assert_eq!(stage, CheckoutStage::Finished);

    println!("\nSimulated time elapsed: {}ms", clock.now_ms());
    Ok(())
}
