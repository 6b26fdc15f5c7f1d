//! The storefront contract.
//!
//! Element ids, class names and paths of the demo shop. These must match the
//! live site exactly; the simulated storefront renders the same contract.

use crate::locator::Selector;

/// Public demo storefront
pub const BASE_URL: &str = "https://www.saucedemo.com";

/// Account that can complete a purchase
pub const STANDARD_USER: &str = "standard_user";

/// Account the site refuses to log in
pub const LOCKED_OUT_USER: &str = "locked_out_user";

/// Password shared by every demo account
pub const PASSWORD: &str = "secret_sauce";

/// Demo accounts listed on the login page
pub const DEMO_USERS: &[&str] = &[
    "standard_user",
    "locked_out_user",
    "problem_user",
    "performance_glitch_user",
    "error_user",
    "visual_user",
];

/// The six products of the reference catalog, in page order
pub const REFERENCE_CATALOG: &[&str] = &[
    "Sauce Labs Backpack",
    "Sauce Labs Bike Light",
    "Sauce Labs Bolt T-Shirt",
    "Sauce Labs Fleece Jacket",
    "Sauce Labs Onesie",
    "Test.allTheThings() T-Shirt (Red)",
];

/// Page paths
pub mod paths {
    /// Login page
    pub const LOGIN: &str = "/";
    /// Product listing
    pub const INVENTORY: &str = "/inventory.html";
    /// Cart
    pub const CART: &str = "/cart.html";
    /// Shipping form
    pub const CHECKOUT_STEP_ONE: &str = "/checkout-step-one.html";
    /// Order overview
    pub const CHECKOUT_STEP_TWO: &str = "/checkout-step-two.html";
    /// Order confirmation
    pub const CHECKOUT_COMPLETE: &str = "/checkout-complete.html";
}

/// Login page elements
pub mod login {
    use super::Selector;

    /// Username input
    #[must_use]
    pub fn username() -> Selector {
        Selector::id("user-name")
    }

    /// Password input
    #[must_use]
    pub fn password() -> Selector {
        Selector::id("password")
    }

    /// Submit button
    #[must_use]
    pub fn login_button() -> Selector {
        Selector::id("login-button")
    }

    /// Validation error banner (only carries `error` while showing a message)
    #[must_use]
    pub fn error() -> Selector {
        Selector::class("error-message-container error")
    }
}

/// Product listing and header elements
pub mod inventory {
    use super::Selector;

    /// Listing container, present only after login
    #[must_use]
    pub fn container() -> Selector {
        Selector::id("inventory_container")
    }

    /// Add-to-cart / remove buttons
    #[must_use]
    pub fn add_buttons() -> Selector {
        Selector::class("btn_inventory")
    }

    /// Product names (also used by cart line items)
    #[must_use]
    pub fn item_names() -> Selector {
        Selector::class("inventory_item_name")
    }

    /// Header cart icon
    #[must_use]
    pub fn cart_icon() -> Selector {
        Selector::id("shopping_cart_container")
    }

    /// Cart item count bubble; absent when the cart is empty
    #[must_use]
    pub fn cart_badge() -> Selector {
        Selector::class("shopping_cart_badge")
    }

    /// Burger menu toggle
    #[must_use]
    pub fn menu_button() -> Selector {
        Selector::id("react-burger-menu-btn")
    }

    /// Logout link inside the burger menu
    #[must_use]
    pub fn logout_link() -> Selector {
        Selector::id("logout_sidebar_link")
    }
}

/// Cart page elements
pub mod cart {
    use super::Selector;

    /// Cart line item names
    #[must_use]
    pub fn items() -> Selector {
        super::inventory::item_names()
    }

    /// Checkout button
    #[must_use]
    pub fn checkout_button() -> Selector {
        Selector::id("checkout")
    }
}

/// Checkout elements
pub mod checkout {
    use super::Selector;

    /// First name input
    #[must_use]
    pub fn first_name() -> Selector {
        Selector::id("first-name")
    }

    /// Last name input
    #[must_use]
    pub fn last_name() -> Selector {
        Selector::id("last-name")
    }

    /// Postal code input
    #[must_use]
    pub fn postal_code() -> Selector {
        Selector::id("postal-code")
    }

    /// Continue button
    #[must_use]
    pub fn continue_button() -> Selector {
        Selector::id("continue")
    }

    /// Finish button on the overview
    #[must_use]
    pub fn finish_button() -> Selector {
        Selector::id("finish")
    }

    /// Order total on the overview
    #[must_use]
    pub fn total_label() -> Selector {
        Selector::class("summary_total_label")
    }

    /// Validation error banner of the shipping form
    #[must_use]
    pub fn error() -> Selector {
        Selector::class("error-message-container error")
    }
}
