//! Regression scenarios composed from the page objects.
//!
//! A [`Workflow`] runs one [`Scenario`] against a harness and turns every
//! `Err` and failed assertion into a failed [`ScenarioResult`]; nothing
//! escapes as a panic or an error. [`run_suite`] gives each scenario its own
//! session and quits it afterwards.

use crate::credentials::{Credential, CredentialFixture};
use crate::driver::WebDriver;
use crate::fixture::SessionGuard;
use crate::harness::{Harness, ScenarioResult, SuiteResults};
use crate::pages::CheckoutForm;
use crate::result::{ShopError, ShopResult};
use crate::site::{self, paths};
use std::fmt;
use std::str::FromStr;
use tracing::{info, warn};

/// The regression scenarios
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scenario {
    /// Log in with the valid account and land on the product listing
    LoginValid,
    /// Add every product and check the badge and cart agree
    AddAllToCart,
    /// Check the cart holds the expected products
    CartValidation,
    /// Place an order and land on the confirmation page
    Checkout,
    /// Submit shipping with a blank field and stay on the form
    CheckoutBlankField,
    /// Full journey for every configured account
    EndToEnd,
}

impl Scenario {
    /// Every scenario, in suite order
    pub const ALL: [Self; 6] = [
        Self::LoginValid,
        Self::AddAllToCart,
        Self::CartValidation,
        Self::Checkout,
        Self::CheckoutBlankField,
        Self::EndToEnd,
    ];

    /// Command-line name
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::LoginValid => "login-valid",
            Self::AddAllToCart => "add-all-to-cart",
            Self::CartValidation => "cart-validation",
            Self::Checkout => "checkout",
            Self::CheckoutBlankField => "checkout-blank-field",
            Self::EndToEnd => "end-to-end",
        }
    }

    /// One-line description
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::LoginValid => "Valid credentials reach the product listing",
            Self::AddAllToCart => "Every listed product lands in the cart and the badge agrees",
            Self::CartValidation => "The cart contains every expected product",
            Self::Checkout => "Shipping, total and finish reach the confirmation page",
            Self::CheckoutBlankField => "A blank shipping field is rejected on the form",
            Self::EndToEnd => "Login, cart, checkout and logout for every configured user",
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Scenario {
    type Err = ShopError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|scenario| scenario.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ShopError::config(format!("Unknown scenario: {s}")))
    }
}

/// Test data shared by the scenarios
#[derive(Debug, Clone)]
pub struct ScenarioInputs {
    /// Accounts
    pub credentials: CredentialFixture,
    /// Products the cart must contain
    pub expected_products: Vec<String>,
    /// Shipping details for the happy path
    pub form: CheckoutForm,
}

impl Default for ScenarioInputs {
    fn default() -> Self {
        Self {
            credentials: CredentialFixture::standard(),
            expected_products: site::REFERENCE_CATALOG.iter().map(|p| (*p).to_string()).collect(),
            form: CheckoutForm::reference(),
        }
    }
}

impl ScenarioInputs {
    /// Replace the accounts
    #[must_use]
    pub fn with_credentials(mut self, credentials: CredentialFixture) -> Self {
        self.credentials = credentials;
        self
    }

    /// Replace the expected cart contents
    #[must_use]
    pub fn with_expected_products<S: Into<String>>(mut self, products: impl IntoIterator<Item = S>) -> Self {
        self.expected_products = products.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the shipping details
    #[must_use]
    pub fn with_form(mut self, form: CheckoutForm) -> Self {
        self.form = form;
        self
    }

    /// The happy-path form with its first blank field, or the last name
    /// blanked when it has none
    #[must_use]
    pub fn blank_form(&self) -> CheckoutForm {
        if self.form.has_blank_field() {
            self.form.clone()
        } else {
            CheckoutForm {
                last_name: String::new(),
                ..self.form.clone()
            }
        }
    }
}

/// How one account's journey ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserOutcome {
    /// Order placed; carries the total shown on the overview
    Completed {
        /// Total label text
        total: String,
    },
    /// The site refused the credentials
    LoginRejected,
    /// A step failed after login
    Failed {
        /// What went wrong
        reason: String,
    },
}

impl UserOutcome {
    /// Whether this outcome fails the journey
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

fn ensure(condition: bool, message: impl FnOnce() -> String) -> ShopResult<()> {
    if condition {
        Ok(())
    } else {
        Err(ShopError::assertion(message()))
    }
}

/// Runs scenarios on one harness
#[derive(Debug)]
pub struct Workflow<'a, D: WebDriver> {
    harness: &'a Harness<D>,
    inputs: &'a ScenarioInputs,
}

impl<'a, D: WebDriver> Workflow<'a, D> {
    /// Bind a harness and its inputs
    #[must_use]
    pub const fn new(harness: &'a Harness<D>, inputs: &'a ScenarioInputs) -> Self {
        Self { harness, inputs }
    }

    /// Run one scenario; failures come back inside the result
    pub fn run(&self, scenario: Scenario) -> ScenarioResult {
        let clock = self.harness.clock();
        let start = clock.now();
        info!(%scenario, "scenario started");
        self.harness.report().append(&format!("Scenario started: {scenario}"));

        let result = match self.execute(scenario) {
            Ok(notes) => {
                self.harness.report().append(&format!("Scenario {scenario}: Passed"));
                ScenarioResult::pass(scenario.name()).with_notes(notes)
            }
            Err(e) => {
                warn!(%scenario, error = %e, "scenario failed");
                self.harness
                    .report()
                    .append(&format!("Scenario {scenario}: Failed: {e}"));
                ScenarioResult::fail(scenario.name(), e.to_string())
            }
        };
        result.with_duration(clock.elapsed_since(start))
    }

    fn execute(&self, scenario: Scenario) -> ShopResult<Vec<String>> {
        match scenario {
            Scenario::LoginValid => self.login_valid(),
            Scenario::AddAllToCart => self.add_all_to_cart(),
            Scenario::CartValidation => self.cart_validation(),
            Scenario::Checkout => self.checkout(),
            Scenario::CheckoutBlankField => self.checkout_blank_field(),
            Scenario::EndToEnd => self.end_to_end(),
        }
    }

    fn login_valid(&self) -> ShopResult<Vec<String>> {
        let user = self.inputs.credentials.valid_user()?;
        self.sign_in(&user)?;
        ensure(self.harness.login_page().is_login_successful(), || {
            "Product listing is not displayed after login.".to_string()
        })?;
        Ok(vec![format!("Logged in as {}", user.username)])
    }

    fn add_all_to_cart(&self) -> ShopResult<Vec<String>> {
        self.sign_in(&self.inputs.credentials.valid_user()?)?;
        let product = self.harness.product_page();
        let listed = product.get_product_names();
        let added = product.add_all_products_to_cart()?;
        ensure(added == listed.len(), || {
            format!("Added {added} of {} listed products.", listed.len())
        })?;
        let badge = product.cart_badge_count();
        ensure(badge == added, || {
            format!("Cart badge shows {badge}, expected {added}.")
        })?;
        product.go_to_cart()?;
        ensure(self.harness.cart_page().verify_all_products_in_cart(&listed), || {
            "Not every added product is in the cart.".to_string()
        })?;
        Ok(vec![format!("Added {added} products")])
    }

    fn cart_validation(&self) -> ShopResult<Vec<String>> {
        self.sign_in(&self.inputs.credentials.valid_user()?)?;
        self.fill_cart()?;
        self.verify_cart()?;
        Ok(vec![format!(
            "Cart holds all {} expected products",
            self.inputs.expected_products.len()
        )])
    }

    fn checkout(&self) -> ShopResult<Vec<String>> {
        self.sign_in(&self.inputs.credentials.valid_user()?)?;
        self.fill_cart()?;
        self.verify_cart()?;
        let total = self.place_order(&self.inputs.form)?;
        Ok(vec![total])
    }

    fn checkout_blank_field(&self) -> ShopResult<Vec<String>> {
        self.sign_in(&self.inputs.credentials.valid_user()?)?;
        self.fill_cart()?;
        self.harness.cart_page().checkout()?;

        let form = self.inputs.blank_form();
        let blank = form.blank_field().unwrap_or("last name");
        let checkout = self.harness.checkout_page();
        checkout.enter_shipping_information(&form.first_name, &form.last_name, &form.zip_code)?;
        ensure(checkout.has_input_error(), || {
            format!("No validation error for blank {blank}.")
        })?;
        self.expect_url(&self.harness.url_for(paths::CHECKOUT_STEP_ONE))?;
        Ok(vec![format!("Blank {blank} rejected")])
    }

    fn end_to_end(&self) -> ShopResult<Vec<String>> {
        let users = self.inputs.credentials.all_users();
        if users.is_empty() {
            return Err(ShopError::config("No users configured for the end-to-end journey."));
        }

        let mut notes = Vec::with_capacity(users.len());
        let mut failed = Vec::new();
        for user in &users {
            let outcome = self.journey(user);
            let line = match &outcome {
                UserOutcome::Completed { total } => format!("{}: completed ({total})", user.username),
                UserOutcome::LoginRejected => format!("{}: login rejected, skipped", user.username),
                UserOutcome::Failed { reason } => format!("{}: failed: {reason}", user.username),
            };
            self.harness.report().append(&format!("User {line}"));
            if outcome.is_failure() {
                warn!(user = %user.username, "journey failed");
                failed.push(user.username.clone());
            }
            notes.push(line);
        }

        ensure(failed.is_empty(), || {
            format!("End-to-end journey failed for: {}", failed.join(", "))
        })?;
        Ok(notes)
    }

    /// One account: login, cart, checkout, then logout whenever login worked
    fn journey(&self, user: &Credential) -> UserOutcome {
        let login = self
            .harness
            .open(paths::LOGIN)
            .and_then(|()| self.harness.login_page().login(&user.username, &user.password));
        match login {
            Ok(true) => {}
            Ok(false) => return UserOutcome::LoginRejected,
            Err(e) => return UserOutcome::Failed { reason: e.to_string() },
        }

        let order = self
            .fill_cart()
            .and_then(|()| self.verify_cart())
            .and_then(|()| self.place_order(&self.inputs.form));
        if let Err(e) = self.harness.login_page().logout() {
            warn!(user = %user.username, error = %e, "logout after journey failed");
        }
        match order {
            Ok(total) => UserOutcome::Completed { total },
            Err(e) => UserOutcome::Failed { reason: e.to_string() },
        }
    }

    fn sign_in(&self, user: &Credential) -> ShopResult<()> {
        self.harness.open(paths::LOGIN)?;
        let accepted = self.harness.login_page().login(&user.username, &user.password)?;
        ensure(accepted, || format!("Login rejected for user '{}'.", user.username))?;
        let landing = user
            .expected_url
            .clone()
            .unwrap_or_else(|| self.harness.url_for(paths::INVENTORY));
        self.expect_url(&landing)
    }

    fn fill_cart(&self) -> ShopResult<()> {
        let product = self.harness.product_page();
        product.add_all_products_to_cart()?;
        product.go_to_cart()
    }

    fn verify_cart(&self) -> ShopResult<()> {
        let expected = &self.inputs.expected_products;
        ensure(self.harness.cart_page().verify_all_products_in_cart(expected), || {
            "Cart is missing expected products.".to_string()
        })
    }

    /// From the cart to the confirmation page; returns the total shown
    fn place_order(&self, form: &CheckoutForm) -> ShopResult<String> {
        self.harness.cart_page().checkout()?;
        let checkout = self.harness.checkout_page();
        checkout.enter_shipping_information(&form.first_name, &form.last_name, &form.zip_code)?;
        ensure(!checkout.has_input_error(), || {
            "Shipping form reported a validation error.".to_string()
        })?;
        let total = checkout.get_total_price();
        ensure(!total.is_empty(), || "Total price was not displayed.".to_string())?;
        checkout.finish_checkout()?;
        self.expect_url(&self.harness.url_for(paths::CHECKOUT_COMPLETE))?;
        Ok(total)
    }

    fn expect_url(&self, expected: &str) -> ShopResult<()> {
        let driver = self.harness.driver();
        let outcome = self
            .harness
            .waiter()
            .wait_for_url(driver, expected, self.harness.config().wait_timeout());
        if outcome.success {
            return Ok(());
        }
        let current = driver.current_url().unwrap_or_default();
        Err(ShopError::assertion(format!(
            "Expected URL {expected}, but was {current}"
        )))
    }
}

/// Run `scenarios`, each in a fresh session from `open_session`.
///
/// The session is quit when its scenario ends, pass or fail.
pub fn run_suite<D, F>(
    suite_name: &str,
    scenarios: &[Scenario],
    inputs: &ScenarioInputs,
    mut open_session: F,
) -> SuiteResults
where
    D: WebDriver,
    F: FnMut(Scenario) -> ShopResult<Harness<SessionGuard<D>>>,
{
    let mut suite = SuiteResults::new(suite_name);
    for &scenario in scenarios {
        let result = match open_session(scenario) {
            Ok(harness) => Workflow::new(&harness, inputs).run(scenario),
            Err(e) => {
                warn!(%scenario, error = %e, "could not start session");
                ScenarioResult::fail(scenario.name(), format!("Session could not be started: {e}"))
            }
        };
        suite.duration += result.duration;
        suite.push(result);
    }
    suite
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::clock::FakeClock;
    use crate::config::HarnessConfig;
    use crate::mock::MockStorefront;
    use crate::reporter::{ReportSink, ScenarioStatus};
    use std::sync::Arc;

    fn harness_on(site: MockStorefront, clock: Arc<FakeClock>) -> Harness<MockStorefront> {
        Harness::with_parts(site, HarnessConfig::default(), clock, ReportSink::disabled())
    }

    fn run_on(site: MockStorefront, clock: Arc<FakeClock>, inputs: &ScenarioInputs, scenario: Scenario) -> ScenarioResult {
        let h = harness_on(site, clock);
        Workflow::new(&h, inputs).run(scenario)
    }

    fn run_default(scenario: Scenario) -> ScenarioResult {
        let clock = FakeClock::shared();
        run_on(MockStorefront::new(clock.clone()), clock, &ScenarioInputs::default(), scenario)
    }

    mod scenario_name_tests {
        use super::*;

        #[test]
        fn test_names_parse_back() {
            for scenario in Scenario::ALL {
                assert_eq!(scenario.name().parse::<Scenario>().unwrap(), scenario);
                assert!(!scenario.description().is_empty());
            }
        }

        #[test]
        fn test_unknown_name() {
            let err = "checkout-twice".parse::<Scenario>().unwrap_err();
            assert_eq!(err.to_string(), "Configuration error: Unknown scenario: checkout-twice");
        }

        #[test]
        fn test_blank_form_defaults_to_last_name() {
            let inputs = ScenarioInputs::default();
            assert_eq!(inputs.blank_form().blank_field(), Some("last name"));
            let inputs = inputs.with_form(CheckoutForm::new("", "Doe", "1"));
            assert_eq!(inputs.blank_form().blank_field(), Some("first name"));
        }
    }

    mod passing_tests {
        use super::*;

        #[test]
        fn test_every_scenario_passes_on_reference_site() {
            for scenario in Scenario::ALL {
                let result = run_default(scenario);
                assert!(result.passed(), "{scenario}: {:?}", result.error);
            }
        }

        #[test]
        fn test_checkout_notes_total() {
            let result = run_default(Scenario::Checkout);
            assert_eq!(result.notes, vec!["Total: $140.34".to_string()]);
        }

        #[test]
        fn test_end_to_end_skips_locked_out_user() {
            let clock = FakeClock::shared();
            let site = MockStorefront::new(clock.clone());
            let h = harness_on(site.clone(), clock);
            let result = Workflow::new(&h, &ScenarioInputs::default()).run(Scenario::EndToEnd);
            assert!(result.passed());
            assert_eq!(result.notes.len(), 6);
            assert!(result
                .notes
                .contains(&"locked_out_user: login rejected, skipped".to_string()));
            assert_eq!(site.orders_completed(), 5);
            assert!(site.logged_in_user().is_none());
        }

        #[test]
        fn test_cart_lag_absorbed_by_retry() {
            let clock = FakeClock::shared();
            let site = MockStorefront::new(clock.clone()).with_cart_render_lag(std::time::Duration::from_secs(3));
            let result = run_on(site, clock, &ScenarioInputs::default(), Scenario::CartValidation);
            assert!(result.passed(), "{:?}", result.error);
            assert!(result.duration >= std::time::Duration::from_secs(4));
        }
    }

    mod failing_tests {
        use super::*;

        #[test]
        fn test_locked_out_valid_user_fails_login() {
            let inputs = ScenarioInputs::default().with_credentials(CredentialFixture {
                valid_user: Some(Credential::new(site::LOCKED_OUT_USER, site::PASSWORD)),
                ..CredentialFixture::default()
            });
            let clock = FakeClock::shared();
            let result = run_on(MockStorefront::new(clock.clone()), clock, &inputs, Scenario::LoginValid);
            assert_eq!(result.status, ScenarioStatus::Failed);
            assert_eq!(
                result.error.as_deref(),
                Some("Assertion failed: Login rejected for user 'locked_out_user'.")
            );
        }

        #[test]
        fn test_missing_credentials_is_config_error() {
            let inputs = ScenarioInputs::default().with_credentials(CredentialFixture::default());
            let result = run_default_with(&inputs, Scenario::Checkout);
            assert!(result.error.unwrap().starts_with("Configuration error"));
        }

        #[test]
        fn test_unexpected_product_fails_cart_validation() {
            let inputs = ScenarioInputs::default().with_expected_products(["Sauce Labs Backpack", "Ghost Mug"]);
            let result = run_default_with(&inputs, Scenario::CartValidation);
            assert!(!result.passed());
            assert!(result.error.unwrap().contains("missing expected products"));
        }

        #[test]
        fn test_disabled_add_button_fails_add_all() {
            let clock = FakeClock::shared();
            let site = MockStorefront::new(clock.clone()).with_disabled_add_button(0);
            let result = run_on(site, clock, &ScenarioInputs::default(), Scenario::AddAllToCart);
            assert_eq!(result.error.as_deref(), Some("Assertion failed: Added 5 of 6 listed products."));
        }

        #[test]
        fn test_end_to_end_reports_failed_users() {
            let clock = FakeClock::shared();
            let site = MockStorefront::new(clock.clone()).with_disabled_checkout();
            let dir = tempfile::tempdir().unwrap();
            let report = ReportSink::new(dir.path().join("r.txt"));
            let h = Harness::with_parts(site, HarnessConfig::default(), clock, report);
            let result = Workflow::new(&h, &ScenarioInputs::default()).run(Scenario::EndToEnd);
            assert!(!result.passed());
            let error = result.error.unwrap();
            assert!(error.contains("standard_user"));
            assert!(!error.contains("locked_out_user"));
            assert!(h.report().contains("Scenario end-to-end: Failed"));
            assert!(h.report().contains("User standard_user: failed"));
        }

        #[test]
        fn test_empty_cart_listing_fails_checkout() {
            let clock = FakeClock::shared();
            let site = MockStorefront::new(clock.clone()).without_element(&site::cart::items());
            let result = run_on(site.clone(), clock, &ScenarioInputs::default(), Scenario::Checkout);
            assert_eq!(result.status, ScenarioStatus::Failed);
            assert_eq!(
                result.error.as_deref(),
                Some("Assertion failed: Cart is missing expected products.")
            );
            assert_eq!(site.orders_completed(), 0);
        }

        #[test]
        fn test_empty_cart_listing_fails_every_journey() {
            let clock = FakeClock::shared();
            let site = MockStorefront::new(clock.clone()).without_element(&site::cart::items());
            let result = run_on(site.clone(), clock, &ScenarioInputs::default(), Scenario::EndToEnd);
            assert_eq!(result.status, ScenarioStatus::Failed);
            let error = result.error.unwrap();
            assert!(error.starts_with("Assertion failed: End-to-end journey failed for: standard_user"));
            assert!(!error.contains("locked_out_user"));
            assert_eq!(site.orders_completed(), 0);
        }

        fn run_default_with(inputs: &ScenarioInputs, scenario: Scenario) -> ScenarioResult {
            let clock = FakeClock::shared();
            run_on(MockStorefront::new(clock.clone()), clock, inputs, scenario)
        }
    }

    mod suite_tests {
        use super::*;

        #[test]
        fn test_one_session_per_scenario_and_all_quit() {
            let clock = FakeClock::shared();
            let mut sessions = Vec::new();
            let suite = run_suite("ui", &Scenario::ALL, &ScenarioInputs::default(), |scenario| {
                let site = MockStorefront::new(clock.clone());
                sessions.push(site.clone());
                let guard = SessionGuard::new(site, scenario.name());
                Ok(Harness::with_parts(guard, HarnessConfig::default(), clock.clone(), ReportSink::disabled()))
            });
            assert!(suite.all_passed());
            assert_eq!(suite.total(), 6);
            assert_eq!(sessions.len(), 6);
            assert!(sessions.iter().all(MockStorefront::is_quit));
        }

        #[test]
        fn test_session_start_failure_is_a_failed_result() {
            let suite = run_suite::<MockStorefront, _>(
                "ui",
                &[Scenario::LoginValid],
                &ScenarioInputs::default(),
                |_| Err(ShopError::BrowserLaunch { message: "no chromium".into() }),
            );
            assert_eq!(suite.failed_count(), 1);
            assert!(suite.results[0]
                .error
                .as_deref()
                .unwrap()
                .starts_with("Session could not be started"));
        }
    }
}
