//! In-process storefront implementing [`WebDriver`].

use super::state::{ElementKind, Field, Page, Product, StoreState};
use crate::clock::SharedClock;
use crate::driver::{WebDriver, WebElement};
use crate::locator::Selector;
use crate::result::{ShopError, ShopResult};
use crate::site;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// Simulated demo storefront.
///
/// Clones share one session. Render lag is measured on the shared clock, so
/// a [`FakeClock`](crate::clock::FakeClock) makes lagging pages deterministic.
#[derive(Debug, Clone)]
pub struct MockStorefront {
    state: Arc<Mutex<StoreState>>,
    clock: SharedClock,
}

impl MockStorefront {
    /// Create a storefront at the public demo URL, showing `about:blank`
    #[must_use]
    pub fn new(clock: SharedClock) -> Self {
        Self {
            state: Arc::new(Mutex::new(StoreState::new(site::BASE_URL))),
            clock,
        }
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn live(&self) -> ShopResult<MutexGuard<'_, StoreState>> {
        let state = self.lock();
        if state.quit_count > 0 {
            return Err(ShopError::driver("invalid session id: session was quit"));
        }
        Ok(state)
    }

    /// Serve the storefront under a different root
    #[must_use]
    pub fn with_base_url(self, base_url: &str) -> Self {
        self.lock().base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Delay cart line items by `lag` after the cart page renders
    #[must_use]
    pub fn with_cart_render_lag(self, lag: Duration) -> Self {
        self.lock().knobs.cart_render_lag = lag;
        self
    }

    /// Delay the order total by `lag` after the overview renders
    #[must_use]
    pub fn with_total_render_lag(self, lag: Duration) -> Self {
        self.lock().knobs.total_render_lag = lag;
        self
    }

    /// Replace the catalog
    #[must_use]
    pub fn with_catalog(self, products: Vec<Product>) -> Self {
        self.lock().catalog = products;
        self
    }

    /// Disable the add button of catalog item `index`
    #[must_use]
    pub fn with_disabled_add_button(self, index: usize) -> Self {
        self.lock().knobs.disabled_add_buttons.insert(index);
        self
    }

    /// Render the cart icon invisible
    #[must_use]
    pub fn with_hidden_cart_icon(self) -> Self {
        self.lock().knobs.hidden_cart_icon = true;
        self
    }

    /// Render the checkout button disabled
    #[must_use]
    pub fn with_disabled_checkout(self) -> Self {
        self.lock().knobs.disabled_checkout = true;
        self
    }

    /// Make `selector` match nothing
    #[must_use]
    pub fn without_element(self, selector: &Selector) -> Self {
        self.lock().knobs.removed_selectors.insert(selector.to_css());
        self
    }

    /// Change render lag mid-session
    pub fn set_cart_render_lag(&self, lag: Duration) {
        self.lock().knobs.cart_render_lag = lag;
    }

    /// Product names in the cart, in the order they were added
    #[must_use]
    pub fn cart_names(&self) -> Vec<String> {
        self.lock().cart_names()
    }

    /// Logged-in username
    #[must_use]
    pub fn logged_in_user(&self) -> Option<String> {
        self.lock().user.clone()
    }

    /// Submitted shipping details
    #[must_use]
    pub fn shipping(&self) -> Option<(String, String, String)> {
        self.lock().shipping.clone()
    }

    /// Orders finished in this session
    #[must_use]
    pub fn orders_completed(&self) -> u32 {
        self.lock().orders_completed
    }

    /// Order total the overview would show
    #[must_use]
    pub fn order_total(&self) -> f64 {
        self.lock().order_total()
    }

    /// Number of `quit` calls
    #[must_use]
    pub fn quit_count(&self) -> u32 {
        self.lock().quit_count
    }

    /// Whether the session has been quit
    #[must_use]
    pub fn is_quit(&self) -> bool {
        self.quit_count() > 0
    }

    /// Driver call history
    #[must_use]
    pub fn history(&self) -> Vec<String> {
        self.lock().history.clone()
    }

    /// Check if a driver method was called
    #[must_use]
    pub fn was_called(&self, method: &str) -> bool {
        self.lock().history.iter().any(|c| c.starts_with(method))
    }

    /// Whether the login page is showing
    #[must_use]
    pub fn on_login_page(&self) -> bool {
        self.lock().page == Page::Login
    }
}

impl WebDriver for MockStorefront {
    type Element = MockElement;

    fn navigate(&self, url: &str) -> ShopResult<()> {
        let now = self.clock.now();
        let mut state = self.live()?;
        state.history.push(format!("navigate:{url}"));
        state.navigate(url, now);
        Ok(())
    }

    fn current_url(&self) -> ShopResult<String> {
        Ok(self.live()?.current_url())
    }

    fn find_element(&self, selector: &Selector) -> ShopResult<MockElement> {
        self.find_elements(selector)?
            .into_iter()
            .next()
            .ok_or_else(|| ShopError::not_found(format!("no such element: {selector}")))
    }

    fn find_elements(&self, selector: &Selector) -> ShopResult<Vec<MockElement>> {
        let now = self.clock.now();
        let css = selector.to_css();
        let state = self.live()?;
        let generation = state.generation;
        Ok(state
            .resolve(&css, now)
            .into_iter()
            .map(|kind| MockElement {
                site: self.clone(),
                css: css.clone(),
                kind,
                generation,
            })
            .collect())
    }

    fn quit(&self) -> ShopResult<()> {
        let mut state = self.lock();
        state.history.push("quit".to_string());
        state.quit_count += 1;
        Ok(())
    }
}

/// Handle to an element of the simulated storefront
#[derive(Debug, Clone)]
pub struct MockElement {
    site: MockStorefront,
    css: String,
    kind: ElementKind,
    generation: u64,
}

impl MockElement {
    /// The lookup selector this handle came from
    #[must_use]
    pub fn selector(&self) -> &str {
        &self.css
    }

    /// Lock the state, failing if this handle no longer points into the DOM
    fn attached(&self) -> ShopResult<MutexGuard<'_, StoreState>> {
        let now = self.site.clock.now();
        let state = self.site.live()?;
        if state.generation != self.generation || !state.resolve(&self.css, now).contains(&self.kind) {
            return Err(ShopError::driver(format!(
                "stale element reference: {} is not attached to the page document",
                self.css
            )));
        }
        Ok(state)
    }

    fn field(&self) -> ShopResult<Field> {
        match self.kind {
            ElementKind::Input(field) => Ok(field),
            _ => Err(ShopError::driver(format!(
                "invalid element state: {} is not an input",
                self.css
            ))),
        }
    }
}

impl WebElement for MockElement {
    fn click(&self) -> ShopResult<()> {
        let now = self.site.clock.now();
        let mut state = self.attached()?;
        state.history.push(format!("click:{}", self.css));
        if state.click(self.kind, now) {
            Ok(())
        } else {
            Err(ShopError::driver(format!(
                "element not interactable: {}",
                self.css
            )))
        }
    }

    fn send_keys(&self, text: &str) -> ShopResult<()> {
        let field = self.field()?;
        let mut state = self.attached()?;
        state.history.push(format!("send_keys:{}", self.css));
        state.type_into(field, text);
        Ok(())
    }

    fn clear(&self) -> ShopResult<()> {
        let field = self.field()?;
        let mut state = self.attached()?;
        state.clear(field);
        Ok(())
    }

    fn is_displayed(&self) -> ShopResult<bool> {
        Ok(self.attached()?.is_displayed(self.kind))
    }

    fn is_enabled(&self) -> ShopResult<bool> {
        Ok(self.attached()?.is_enabled(self.kind))
    }

    fn text(&self) -> ShopResult<String> {
        let state = self.attached()?;
        if state.is_displayed(self.kind) {
            Ok(state.text(self.kind))
        } else {
            Ok(String::new())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::clock::FakeClock;

    fn open_site() -> (Arc<FakeClock>, MockStorefront) {
        let clock = FakeClock::shared();
        let site = MockStorefront::new(clock.clone());
        site.navigate("https://www.saucedemo.com/").unwrap();
        (clock, site)
    }

    fn sign_in(site: &MockStorefront, user: &str) {
        site.find_element(&site::login::username())
            .unwrap()
            .send_keys(user)
            .unwrap();
        site.find_element(&site::login::password())
            .unwrap()
            .send_keys(site::PASSWORD)
            .unwrap();
        site.find_element(&site::login::login_button())
            .unwrap()
            .click()
            .unwrap();
    }

    mod driver_tests {
        use super::*;

        #[test]
        fn test_starts_blank() {
            let clock = FakeClock::shared();
            let site = MockStorefront::new(clock);
            assert_eq!(site.current_url().unwrap(), "about:blank");
        }

        #[test]
        fn test_missing_element_is_not_found() {
            let (_clock, site) = open_site();
            let err = site.find_element(&site::checkout::finish_button()).unwrap_err();
            assert!(err.is_not_found());
            assert!(site.find_elements(&site::checkout::finish_button()).unwrap().is_empty());
        }

        #[test]
        fn test_sign_in() {
            let (_clock, site) = open_site();
            sign_in(&site, "standard_user");
            assert_eq!(
                site.current_url().unwrap(),
                "https://www.saucedemo.com/inventory.html"
            );
            assert_eq!(site.logged_in_user().as_deref(), Some("standard_user"));
            assert!(site.was_called("click:#login-button"));
        }

        #[test]
        fn test_custom_base_url() {
            let clock = FakeClock::shared();
            let site = MockStorefront::new(clock).with_base_url("http://127.0.0.1:3000/");
            site.navigate("http://127.0.0.1:3000/").unwrap();
            assert_eq!(site.current_url().unwrap(), "http://127.0.0.1:3000/");
            assert!(site.find_element(&site::login::username()).is_ok());
        }

        #[test]
        fn test_quit_is_idempotent_and_ends_session() {
            let (_clock, site) = open_site();
            site.quit().unwrap();
            site.quit().unwrap();
            assert_eq!(site.quit_count(), 2);
            assert!(site.current_url().is_err());
        }

        #[test]
        fn test_custom_catalog() {
            let (_clock, site) = open_site();
            let site = site.with_catalog(vec![Product::new("Mug", 5.0)]);
            sign_in(&site, "standard_user");
            assert_eq!(site.find_elements(&site::inventory::add_buttons()).unwrap().len(), 1);
        }
    }

    mod element_tests {
        use super::*;

        #[test]
        fn test_handles_go_stale_on_navigation() {
            let (_clock, site) = open_site();
            let username = site.find_element(&site::login::username()).unwrap();
            sign_in(&site, "standard_user");
            let err = username.is_displayed().unwrap_err();
            assert!(err.to_string().contains("stale element reference"));
        }

        #[test]
        fn test_badge_handle_goes_stale_when_cart_empties() {
            let (_clock, site) = open_site();
            sign_in(&site, "standard_user");
            let button = site.find_element(&site::inventory::add_buttons()).unwrap();
            button.click().unwrap();
            let badge = site.find_element(&site::inventory::cart_badge()).unwrap();
            assert_eq!(badge.text().unwrap(), "1");
            button.click().unwrap();
            assert!(badge.text().is_err());
        }

        #[test]
        fn test_send_keys_to_button_fails() {
            let (_clock, site) = open_site();
            let button = site.find_element(&site::login::login_button()).unwrap();
            assert!(button.send_keys("x").is_err());
        }

        #[test]
        fn test_clear_then_type() {
            let (_clock, site) = open_site();
            let field = site.find_element(&site::login::username()).unwrap();
            field.send_keys("stale").unwrap();
            field.clear().unwrap();
            field.send_keys("fresh").unwrap();
            assert_eq!(field.text().unwrap(), "fresh");
        }

        #[test]
        fn test_hidden_logout_link() {
            let (_clock, site) = open_site();
            sign_in(&site, "standard_user");
            let link = site.find_element(&site::inventory::logout_link()).unwrap();
            assert!(!link.is_displayed().unwrap());
            assert!(link.click().is_err());
        }

        #[test]
        fn test_cart_lag_on_fake_clock() {
            let (clock, site) = open_site();
            let site = site.with_cart_render_lag(Duration::from_secs(3));
            sign_in(&site, "standard_user");
            site.find_element(&site::inventory::add_buttons()).unwrap().click().unwrap();
            site.find_element(&site::inventory::cart_icon()).unwrap().click().unwrap();
            assert!(site.find_elements(&site::cart::items()).unwrap().is_empty());
            clock.advance(Duration::from_secs(3));
            assert_eq!(site.find_elements(&site::cart::items()).unwrap().len(), 1);
        }
    }
}
