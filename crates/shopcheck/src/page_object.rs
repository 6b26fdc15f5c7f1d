//! Page Object Model support.
//!
//! Every storefront page implements [`PageObject`]: it knows its path and
//! how to tell, from the live DOM, that it is showing.

use crate::result::ShopResult;
use std::collections::HashMap;

/// A page or component of the storefront
pub trait PageObject {
    /// Path pattern that matches this page (e.g. `/cart.html`, `/checkout-*.html`)
    fn url_pattern(&self) -> &'static str;

    /// Whether the page's landmark elements are rendered
    fn is_loaded(&self) -> ShopResult<bool>;

    /// Page name for logging
    fn page_name(&self) -> &'static str;

    /// Whether `url` points at this page
    fn matches_url(&self, url: &str) -> bool {
        UrlMatcher::new(self.url_pattern()).matches_url(url)
    }
}

/// Strip scheme, host, query and fragment from `url`.
///
/// `https://www.saucedemo.com/cart.html?x=1` becomes `/cart.html`. A bare
/// path is returned unchanged.
#[must_use]
pub fn url_path(url: &str) -> &str {
    let without_scheme = match url.find("://") {
        Some(idx) => &url[idx + 3..],
        None => return strip_query(url),
    };
    match without_scheme.find('/') {
        Some(idx) => strip_query(&without_scheme[idx..]),
        None => "/",
    }
}

fn strip_query(path: &str) -> &str {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    &path[..end]
}

/// URL pattern matcher for page objects
#[derive(Debug, Clone)]
pub struct UrlMatcher {
    pattern: String,
    segments: Vec<UrlSegment>,
}

#[derive(Debug, Clone)]
enum UrlSegment {
    Literal(String),
    /// Literal with one `*`, e.g. `checkout-*.html`
    Glob { prefix: String, suffix: String },
    Parameter(String),
}

impl UrlMatcher {
    /// Create a new URL matcher from a pattern
    ///
    /// Patterns support:
    /// - Literal segments: `/cart.html`
    /// - Globs within a segment: `/checkout-*.html`
    /// - Named parameters: `/item/:id`
    #[must_use]
    pub fn new(pattern: &str) -> Self {
        let segments = pattern
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| {
                if let Some(name) = s.strip_prefix(':') {
                    UrlSegment::Parameter(name.to_string())
                } else if let Some((prefix, suffix)) = s.split_once('*') {
                    UrlSegment::Glob {
                        prefix: prefix.to_string(),
                        suffix: suffix.to_string(),
                    }
                } else {
                    UrlSegment::Literal(s.to_string())
                }
            })
            .collect();

        Self {
            pattern: pattern.to_string(),
            segments,
        }
    }

    /// Check if a path matches the pattern
    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        let path_segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        if path_segments.len() != self.segments.len() {
            return false;
        }

        self.segments
            .iter()
            .zip(&path_segments)
            .all(|(segment, actual)| match segment {
                UrlSegment::Literal(lit) => lit == actual,
                UrlSegment::Glob { prefix, suffix } => {
                    actual.len() >= prefix.len() + suffix.len()
                        && actual.starts_with(prefix.as_str())
                        && actual.ends_with(suffix.as_str())
                }
                UrlSegment::Parameter(_) => true,
            })
    }

    /// Check if an absolute URL's path matches the pattern
    #[must_use]
    pub fn matches_url(&self, url: &str) -> bool {
        self.matches(url_path(url))
    }

    /// Extract named parameters from a path
    #[must_use]
    pub fn extract_params(&self, path: &str) -> HashMap<String, String> {
        let path_segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        self.segments
            .iter()
            .zip(path_segments)
            .filter_map(|(segment, value)| match segment {
                UrlSegment::Parameter(name) => Some((name.clone(), value.to_string())),
                _ => None,
            })
            .collect()
    }

    /// Get the original pattern
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}
