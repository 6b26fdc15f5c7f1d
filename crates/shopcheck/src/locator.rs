//! Element selectors.
//!
//! The storefront is addressed by element id (`#user-name`), by class
//! (`.inventory_item_name`) or by a raw CSS selector. Every variant lowers to
//! a CSS string, which is the only thing a driver needs.

use std::fmt;

/// Selector type for locating elements
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Selector {
    /// Element id, without the leading `#`
    Id(String),
    /// One or more space-separated class names, without leading dots
    Class(String),
    /// Raw CSS selector
    Css(String),
}

impl Selector {
    /// Create an id selector
    #[must_use]
    pub fn id(id: impl Into<String>) -> Self {
        Self::Id(id.into())
    }

    /// Create a class selector.
    ///
    /// `"error-message-container error"` selects elements carrying both classes.
    #[must_use]
    pub fn class(class: impl Into<String>) -> Self {
        Self::Class(class.into())
    }

    /// Create a CSS selector
    #[must_use]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    /// Lower to a CSS selector string
    #[must_use]
    pub fn to_css(&self) -> String {
        match self {
            Self::Id(id) => format!("#{id}"),
            Self::Class(classes) => classes
                .split_whitespace()
                .map(|c| format!(".{c}"))
                .collect(),
            Self::Css(css) => css.clone(),
        }
    }

    /// JavaScript expression returning the first match
    #[must_use]
    pub fn to_query(&self) -> String {
        format!("document.querySelector({:?})", self.to_css())
    }

    /// JavaScript expression returning the number of matches
    #[must_use]
    pub fn to_count_query(&self) -> String {
        format!("document.querySelectorAll({:?}).length", self.to_css())
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_to_css() {
        assert_eq!(Selector::id("user-name").to_css(), "#user-name");
    }

    #[test]
    fn test_single_class_to_css() {
        assert_eq!(
            Selector::class("inventory_item_name").to_css(),
            ".inventory_item_name"
        );
    }

    #[test]
    fn test_compound_class_to_css() {
        assert_eq!(
            Selector::class("error-message-container error").to_css(),
            ".error-message-container.error"
        );
    }

    #[test]
    fn test_css_passthrough() {
        assert_eq!(Selector::css("div > a").to_css(), "div > a");
    }

    #[test]
    fn test_display_matches_css() {
        assert_eq!(Selector::id("finish").to_string(), "#finish");
    }

    #[test]
    fn test_queries() {
        let sel = Selector::id("checkout");
        assert_eq!(sel.to_query(), "document.querySelector(\"#checkout\")");
        assert_eq!(
            sel.to_count_query(),
            "document.querySelectorAll(\"#checkout\").length"
        );
    }
}
