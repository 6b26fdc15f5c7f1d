//! DOM model of the simulated storefront.
//!
//! The state answers two questions: which elements a CSS selector resolves
//! to on the current page, and what happens when one of them is clicked or
//! typed into. Rendering is a pure function of the state plus the current
//! time, so nothing here is ever cached between queries.

use crate::page_object::url_path;
use crate::site::{self, paths};
use std::collections::{BTreeSet, HashMap};
use std::time::Duration;

/// Sales tax applied on the order overview
pub const TAX_RATE: f64 = 0.08;

/// A catalog entry
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    /// Display name
    pub name: String,
    /// Unit price in dollars
    pub price: f64,
}

impl Product {
    /// Create a product
    #[must_use]
    pub fn new(name: impl Into<String>, price: f64) -> Self {
        Self {
            name: name.into(),
            price,
        }
    }
}

/// Reference catalog with its list prices
#[must_use]
pub fn reference_products() -> Vec<Product> {
    const PRICES: [f64; 6] = [29.99, 9.99, 15.99, 49.99, 7.99, 15.99];
    site::REFERENCE_CATALOG
        .iter()
        .zip(PRICES)
        .map(|(name, price)| Product::new(*name, price))
        .collect()
}

/// Which document is showing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Page {
    /// Login form
    Login,
    /// Product listing
    Inventory,
    /// Cart
    Cart,
    /// Shipping form
    CheckoutStepOne,
    /// Order overview
    CheckoutStepTwo,
    /// Order confirmation
    CheckoutComplete,
    /// Unknown path on the site
    Missing(String),
    /// Any URL outside the storefront
    External(String),
}

impl Page {
    const fn requires_login(&self) -> bool {
        matches!(
            self,
            Self::Inventory
                | Self::Cart
                | Self::CheckoutStepOne
                | Self::CheckoutStepTwo
                | Self::CheckoutComplete
        )
    }

    const fn has_header(&self) -> bool {
        self.requires_login()
    }

    fn path(&self) -> &str {
        match self {
            Self::Login => paths::LOGIN,
            Self::Inventory => paths::INVENTORY,
            Self::Cart => paths::CART,
            Self::CheckoutStepOne => paths::CHECKOUT_STEP_ONE,
            Self::CheckoutStepTwo => paths::CHECKOUT_STEP_TWO,
            Self::CheckoutComplete => paths::CHECKOUT_COMPLETE,
            Self::Missing(path) => path,
            Self::External(_) => "",
        }
    }
}

/// Text inputs of the storefront
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// `#user-name`
    Username,
    /// `#password`
    Password,
    /// `#first-name`
    FirstName,
    /// `#last-name`
    LastName,
    /// `#postal-code`
    PostalCode,
}

/// A renderable element, identified by role and (for lists) catalog index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    /// A text input
    Input(Field),
    /// `#login-button`
    LoginButton,
    /// Bare `.error-message-container`
    ErrorContainer,
    /// `.error-message-container.error` on the login form
    LoginError,
    /// `.error-message-container.error` on the shipping form
    CheckoutError,
    /// `#inventory_container`
    InventoryContainer,
    /// `.btn_inventory` of catalog item `n`
    AddButton(usize),
    /// `.inventory_item_name` of catalog item `n`
    ItemName(usize),
    /// `#shopping_cart_container`
    CartIcon,
    /// `.shopping_cart_badge`
    CartBadge,
    /// `#react-burger-menu-btn`
    MenuButton,
    /// `#logout_sidebar_link`
    LogoutLink,
    /// `#checkout`
    CheckoutButton,
    /// `#continue`
    ContinueButton,
    /// `#finish`
    FinishButton,
    /// `.summary_total_label`
    TotalLabel,
}

/// Rendering knobs
#[derive(Debug, Clone, Default)]
pub struct Knobs {
    /// Delay before cart line items render
    pub cart_render_lag: Duration,
    /// Delay before the order total renders
    pub total_render_lag: Duration,
    /// Catalog indexes whose add button is disabled
    pub disabled_add_buttons: BTreeSet<usize>,
    /// Render the cart icon invisible
    pub hidden_cart_icon: bool,
    /// Render the checkout button disabled
    pub disabled_checkout: bool,
    /// Selectors that never match
    pub removed_selectors: BTreeSet<String>,
}

/// Complete storefront state
#[derive(Debug, Clone)]
pub struct StoreState {
    pub(crate) base_url: String,
    pub(crate) page: Page,
    pub(crate) generation: u64,
    pub(crate) user: Option<String>,
    pub(crate) catalog: Vec<Product>,
    pub(crate) cart: Vec<usize>,
    pub(crate) inputs: HashMap<Field, String>,
    pub(crate) login_error: Option<String>,
    pub(crate) checkout_error: Option<String>,
    pub(crate) menu_open: bool,
    pub(crate) shipping: Option<(String, String, String)>,
    pub(crate) rendered_at: Duration,
    pub(crate) orders_completed: u32,
    pub(crate) knobs: Knobs,
    pub(crate) quit_count: u32,
    pub(crate) history: Vec<String>,
}

impl StoreState {
    pub(crate) fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            page: Page::External("about:blank".to_string()),
            generation: 0,
            user: None,
            catalog: reference_products(),
            cart: Vec::new(),
            inputs: HashMap::new(),
            login_error: None,
            checkout_error: None,
            menu_open: false,
            shipping: None,
            rendered_at: Duration::ZERO,
            orders_completed: 0,
            knobs: Knobs::default(),
            quit_count: 0,
            history: Vec::new(),
        }
    }

    pub(crate) fn current_url(&self) -> String {
        match &self.page {
            Page::External(url) => url.clone(),
            page => format!("{}{}", self.base_url, page.path()),
        }
    }

    /// Replace the document; every previously found element goes stale
    fn render(&mut self, page: Page, now: Duration) {
        self.page = page;
        self.generation += 1;
        self.rendered_at = now;
        self.menu_open = false;
    }

    /// Re-render the current document (e.g. after a validation error)
    fn rerender(&mut self) {
        self.generation += 1;
    }

    pub(crate) fn navigate(&mut self, url: &str, now: Duration) {
        let target = if url.to_ascii_lowercase().starts_with(&self.base_url.to_ascii_lowercase()) {
            match url_path(url) {
                "" | "/" | "/index.html" => Page::Login,
                paths::INVENTORY => Page::Inventory,
                paths::CART => Page::Cart,
                paths::CHECKOUT_STEP_ONE => Page::CheckoutStepOne,
                paths::CHECKOUT_STEP_TWO => Page::CheckoutStepTwo,
                paths::CHECKOUT_COMPLETE => Page::CheckoutComplete,
                other => Page::Missing(other.to_string()),
            }
        } else {
            Page::External(url.to_string())
        };

        if target.requires_login() && self.user.is_none() {
            self.login_error = Some(format!(
                "Epic sadface: You can only access '{}' when you are logged in.",
                target.path()
            ));
            self.render(Page::Login, now);
            return;
        }
        if target == Page::Login {
            self.login_error = None;
            self.inputs.remove(&Field::Username);
            self.inputs.remove(&Field::Password);
        }
        if target == Page::CheckoutStepOne {
            self.checkout_error = None;
        }
        self.render(target, now);
    }

    fn cart_listing_visible(&self, now: Duration) -> bool {
        now >= self.rendered_at + self.knobs.cart_render_lag
    }

    fn total_visible(&self, now: Duration) -> bool {
        now >= self.rendered_at + self.knobs.total_render_lag
    }

    /// Elements `css` resolves to on the current document, in document order
    pub(crate) fn resolve(&self, css: &str, now: Duration) -> Vec<ElementKind> {
        if self.knobs.removed_selectors.contains(css) {
            return Vec::new();
        }
        let header = self.page.has_header();
        match (css, &self.page) {
            ("#user-name", Page::Login) => vec![ElementKind::Input(Field::Username)],
            ("#password", Page::Login) => vec![ElementKind::Input(Field::Password)],
            ("#login-button", Page::Login) => vec![ElementKind::LoginButton],
            (".error-message-container", Page::Login | Page::CheckoutStepOne) => {
                vec![ElementKind::ErrorContainer]
            }
            (".error-message-container.error", Page::Login) if self.login_error.is_some() => {
                vec![ElementKind::LoginError]
            }
            (".error-message-container.error", Page::CheckoutStepOne)
                if self.checkout_error.is_some() =>
            {
                vec![ElementKind::CheckoutError]
            }

            ("#inventory_container", Page::Inventory) => vec![ElementKind::InventoryContainer],
            (".btn_inventory", Page::Inventory) => {
                (0..self.catalog.len()).map(ElementKind::AddButton).collect()
            }
            (".inventory_item_name", Page::Inventory) => {
                (0..self.catalog.len()).map(ElementKind::ItemName).collect()
            }
            (".inventory_item_name", Page::Cart) if self.cart_listing_visible(now) => {
                self.cart.iter().copied().map(ElementKind::ItemName).collect()
            }
            (".inventory_item_name", Page::CheckoutStepTwo) => {
                self.cart.iter().copied().map(ElementKind::ItemName).collect()
            }

            ("#shopping_cart_container", _) if header => vec![ElementKind::CartIcon],
            (".shopping_cart_badge", _) if header && !self.cart.is_empty() => {
                vec![ElementKind::CartBadge]
            }
            ("#react-burger-menu-btn", _) if header => vec![ElementKind::MenuButton],
            ("#logout_sidebar_link", _) if header => vec![ElementKind::LogoutLink],

            ("#checkout", Page::Cart) => vec![ElementKind::CheckoutButton],
            ("#first-name", Page::CheckoutStepOne) => vec![ElementKind::Input(Field::FirstName)],
            ("#last-name", Page::CheckoutStepOne) => vec![ElementKind::Input(Field::LastName)],
            ("#postal-code", Page::CheckoutStepOne) => vec![ElementKind::Input(Field::PostalCode)],
            ("#continue", Page::CheckoutStepOne) => vec![ElementKind::ContinueButton],
            ("#finish", Page::CheckoutStepTwo) => vec![ElementKind::FinishButton],
            (".summary_total_label", Page::CheckoutStepTwo) if self.total_visible(now) => {
                vec![ElementKind::TotalLabel]
            }
            _ => Vec::new(),
        }
    }

    pub(crate) fn is_displayed(&self, kind: ElementKind) -> bool {
        match kind {
            ElementKind::LogoutLink => self.menu_open,
            ElementKind::CartIcon => !self.knobs.hidden_cart_icon,
            _ => true,
        }
    }

    pub(crate) fn is_enabled(&self, kind: ElementKind) -> bool {
        match kind {
            ElementKind::AddButton(i) => !self.knobs.disabled_add_buttons.contains(&i),
            ElementKind::CheckoutButton => !self.knobs.disabled_checkout,
            _ => true,
        }
    }

    pub(crate) fn text(&self, kind: ElementKind) -> String {
        match kind {
            ElementKind::Input(field) => self.inputs.get(&field).cloned().unwrap_or_default(),
            ElementKind::LoginError => self.login_error.clone().unwrap_or_default(),
            ElementKind::CheckoutError => self.checkout_error.clone().unwrap_or_default(),
            ElementKind::ErrorContainer => match self.page {
                Page::Login => self.login_error.clone().unwrap_or_default(),
                _ => self.checkout_error.clone().unwrap_or_default(),
            },
            ElementKind::ItemName(i) => self
                .catalog
                .get(i)
                .map(|p| p.name.clone())
                .unwrap_or_default(),
            ElementKind::AddButton(i) => {
                if self.cart.contains(&i) {
                    "Remove".to_string()
                } else {
                    "Add to cart".to_string()
                }
            }
            ElementKind::CartBadge => self.cart.len().to_string(),
            ElementKind::TotalLabel => format!("Total: ${:.2}", self.order_total()),
            ElementKind::LoginButton => "Login".to_string(),
            ElementKind::MenuButton => "Open Menu".to_string(),
            ElementKind::LogoutLink => "Logout".to_string(),
            ElementKind::CheckoutButton => "Checkout".to_string(),
            ElementKind::ContinueButton => "Continue".to_string(),
            ElementKind::FinishButton => "Finish".to_string(),
            ElementKind::InventoryContainer | ElementKind::CartIcon => String::new(),
        }
    }

    pub(crate) fn order_total(&self) -> f64 {
        let subtotal: f64 = self
            .cart
            .iter()
            .filter_map(|i| self.catalog.get(*i))
            .map(|p| p.price)
            .sum();
        subtotal * (1.0 + TAX_RATE)
    }

    pub(crate) fn cart_names(&self) -> Vec<String> {
        self.cart
            .iter()
            .filter_map(|i| self.catalog.get(*i))
            .map(|p| p.name.clone())
            .collect()
    }

    pub(crate) fn type_into(&mut self, field: Field, text: &str) {
        self.inputs.entry(field).or_default().push_str(text);
    }

    pub(crate) fn clear(&mut self, field: Field) {
        self.inputs.insert(field, String::new());
    }

    fn input(&self, field: Field) -> &str {
        self.inputs.get(&field).map_or("", String::as_str)
    }

    /// Apply a click. Returns `false` when the element refuses interaction.
    pub(crate) fn click(&mut self, kind: ElementKind, now: Duration) -> bool {
        if !self.is_displayed(kind) {
            return false;
        }
        if !self.is_enabled(kind) {
            // Disabled controls swallow clicks
            return true;
        }
        match kind {
            ElementKind::LoginButton => self.submit_login(now),
            ElementKind::AddButton(i) => {
                if let Some(pos) = self.cart.iter().position(|c| *c == i) {
                    self.cart.remove(pos);
                } else {
                    self.cart.push(i);
                }
            }
            ElementKind::CartIcon => self.render(Page::Cart, now),
            ElementKind::MenuButton => self.menu_open = true,
            ElementKind::LogoutLink => {
                self.user = None;
                self.cart.clear();
                self.shipping = None;
                self.navigate(&format!("{}/", self.base_url), now);
            }
            ElementKind::CheckoutButton => {
                self.checkout_error = None;
                for field in [Field::FirstName, Field::LastName, Field::PostalCode] {
                    self.inputs.remove(&field);
                }
                self.render(Page::CheckoutStepOne, now);
            }
            ElementKind::ContinueButton => self.submit_shipping(now),
            ElementKind::FinishButton => {
                self.cart.clear();
                self.orders_completed += 1;
                self.render(Page::CheckoutComplete, now);
            }
            _ => {}
        }
        true
    }

    fn submit_login(&mut self, now: Duration) {
        let username = self.input(Field::Username).to_string();
        let password = self.input(Field::Password).to_string();
        let error = if username.is_empty() {
            Some("Epic sadface: Username is required")
        } else if password.is_empty() {
            Some("Epic sadface: Password is required")
        } else if !site::DEMO_USERS.contains(&username.as_str()) || password != site::PASSWORD {
            Some("Epic sadface: Username and password do not match any user in this service")
        } else if username == site::LOCKED_OUT_USER {
            Some("Epic sadface: Sorry, this user has been locked out.")
        } else {
            None
        };

        match error {
            Some(message) => {
                self.login_error = Some(message.to_string());
                self.rerender();
            }
            None => {
                self.user = Some(username);
                self.login_error = None;
                self.inputs.clear();
                self.render(Page::Inventory, now);
            }
        }
    }

    fn submit_shipping(&mut self, now: Duration) {
        let first = self.input(Field::FirstName).to_string();
        let last = self.input(Field::LastName).to_string();
        let zip = self.input(Field::PostalCode).to_string();
        let error = if first.is_empty() {
            Some("Error: First Name is required")
        } else if last.is_empty() {
            Some("Error: Last Name is required")
        } else if zip.is_empty() {
            Some("Error: Postal Code is required")
        } else {
            None
        };

        match error {
            Some(message) => {
                self.checkout_error = Some(message.to_string());
                self.rerender();
            }
            None => {
                self.checkout_error = None;
                self.shipping = Some((first, last, zip));
                self.render(Page::CheckoutStepTwo, now);
            }
        }
    }
}
