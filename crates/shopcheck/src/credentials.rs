//! Test account fixtures.
//!
//! Three JSON layouts are accepted, alone or mixed in one file:
//!
//! ```json
//! { "users": [{ "username": "standard_user", "password": "secret_sauce",
//!               "expectedUrl": "https://www.saucedemo.com/inventory.html" }] }
//! { "validUser": { "username": "standard_user", "password": "secret_sauce" } }
//! { "usernames": ["standard_user", "problem_user"], "password": "secret_sauce" }
//! ```

use crate::result::{ShopError, ShopResult};
use crate::site;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

/// One account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
    /// Login name
    #[serde(default, alias = "Username")]
    pub username: String,
    /// Password
    #[serde(default, alias = "Password")]
    pub password: String,
    /// URL a successful login should land on
    #[serde(default, alias = "ExpectedUrl", skip_serializing_if = "Option::is_none")]
    pub expected_url: Option<String>,
}

impl Credential {
    /// Create a credential without an expected URL
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            expected_url: None,
        }
    }

    /// Set the expected landing URL
    #[must_use]
    pub fn with_expected_url(mut self, url: impl Into<String>) -> Self {
        self.expected_url = Some(url.into());
        self
    }

    /// Both username and password are non-empty
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.username.is_empty() && !self.password.is_empty()
    }
}

/// Contents of a credentials file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CredentialFixture {
    /// Explicit account list
    #[serde(alias = "Users")]
    pub users: Vec<Credential>,
    /// The account used by single-login scenarios
    #[serde(alias = "ValidUser", skip_serializing_if = "Option::is_none")]
    pub valid_user: Option<Credential>,
    /// Usernames sharing [`CredentialFixture::password`]
    #[serde(alias = "Usernames")]
    pub usernames: Vec<String>,
    /// Shared password for `usernames`
    #[serde(alias = "Password", skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl CredentialFixture {
    /// Parse from JSON text
    pub fn from_json_str(json: &str) -> ShopResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load from a JSON file
    pub fn load(path: &Path) -> ShopResult<Self> {
        if !path.exists() {
            return Err(ShopError::config(format!(
                "Test credentials file not found at path: {}",
                path.display()
            )));
        }
        let text = fs::read_to_string(path)?;
        let fixture = Self::from_json_str(&text)?;
        debug!(path = %path.display(), accounts = fixture.all_users().len(), "loaded credentials");
        Ok(fixture)
    }

    /// Built-in accounts of the public demo storefront
    #[must_use]
    pub fn standard() -> Self {
        Self {
            users: Vec::new(),
            valid_user: Some(Credential::new(site::STANDARD_USER, site::PASSWORD)),
            usernames: site::DEMO_USERS.iter().map(|u| (*u).to_string()).collect(),
            password: Some(site::PASSWORD.to_string()),
        }
    }

    /// The single-login account.
    ///
    /// `validUser` when present, otherwise the first complete entry of `users`.
    pub fn valid_user(&self) -> ShopResult<Credential> {
        let candidate = match &self.valid_user {
            Some(user) => Some(user),
            None => self.users.iter().find(|u| u.is_complete()),
        };
        candidate
            .filter(|u| u.is_complete())
            .cloned()
            .ok_or_else(|| ShopError::config("Test data is missing or invalid for validUser."))
    }

    /// Every account, `users` first, then `usernames`, then `validUser`.
    ///
    /// Duplicated usernames keep their first occurrence.
    #[must_use]
    pub fn all_users(&self) -> Vec<Credential> {
        let shared_password = self.password.clone().unwrap_or_default();
        let mut all: Vec<Credential> = Vec::new();
        let candidates = self
            .users
            .iter()
            .cloned()
            .chain(
                self.usernames
                    .iter()
                    .map(|name| Credential::new(name.clone(), shared_password.clone())),
            )
            .chain(self.valid_user.iter().cloned());
        for credential in candidates {
            if !all.iter().any(|c| c.username == credential.username) {
                all.push(credential);
            }
        }
        all
    }
}
