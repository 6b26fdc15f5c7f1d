//! HTTP client for the catalog REST API.

use crate::result::{ShopError, ShopResult};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Client, Method};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::debug;

/// Product body sent on create and update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductPayload {
    /// Title
    pub title: String,
    /// Price; negative only in the invalid payload
    pub price: f64,
    /// Description
    pub description: String,
    /// Category, omitted on update
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Image URL, omitted on update
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl ProductPayload {
    /// A product the API should accept
    #[must_use]
    pub fn valid() -> Self {
        Self {
            title: "Valid Product".into(),
            price: 29.99,
            description: "A valid test product".into(),
            category: Some("electronics".into()),
            image: Some("https://example.com/test-image.jpg".into()),
        }
    }

    /// A product with empty fields, a negative price and an unknown category
    #[must_use]
    pub fn invalid() -> Self {
        Self {
            title: String::new(),
            price: -1.0,
            description: String::new(),
            category: Some("invalid-category".into()),
            image: Some(String::new()),
        }
    }

    /// Partial update body
    #[must_use]
    pub fn update() -> Self {
        Self {
            title: "Updated Product".into(),
            price: 49.99,
            description: "Updated product description".into(),
            category: None,
            image: None,
        }
    }
}

/// A completed HTTP exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    /// Status code
    pub status: u16,
    /// Raw body text
    pub body: String,
    /// Time from send to body fully read
    pub elapsed: Duration,
}

impl ApiResponse {
    /// Body parsed as JSON, if it is JSON
    #[must_use]
    pub fn json(&self) -> Option<Value> {
        serde_json::from_str(&self.body).ok()
    }

    /// Body is empty or the literal `null`
    #[must_use]
    pub fn is_empty_body(&self) -> bool {
        let body = self.body.trim();
        body.is_empty() || body == "null"
    }

    /// Body is a JSON array
    #[must_use]
    pub fn is_json_array(&self) -> bool {
        matches!(self.json(), Some(Value::Array(_)))
    }

    /// Body is a JSON object carrying `name`
    #[must_use]
    pub fn has_property(&self, name: &str) -> bool {
        self.json()
            .as_ref()
            .and_then(Value::as_object)
            .is_some_and(|object| object.contains_key(name))
    }
}

/// Client for the catalog API
#[derive(Debug, Clone)]
pub struct CatalogClient {
    client: Client,
    base_url: String,
}

impl CatalogClient {
    /// Create a client rooted at `base_url` with a per-request timeout
    pub fn new(base_url: &str, timeout: Duration) -> ShopResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| ShopError::api(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// API root without a trailing slash
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL of a relative path such as `products/1`
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// GET `path`
    pub async fn get(&self, path: &str) -> ShopResult<ApiResponse> {
        self.send(Method::GET, path, None).await
    }

    /// POST a JSON body to `path`
    pub async fn post(&self, path: &str, body: &ProductPayload) -> ShopResult<ApiResponse> {
        self.send(Method::POST, path, Some(body)).await
    }

    /// PUT a JSON body to `path`
    pub async fn put(&self, path: &str, body: &ProductPayload) -> ShopResult<ApiResponse> {
        self.send(Method::PUT, path, Some(body)).await
    }

    /// DELETE `path`
    pub async fn delete(&self, path: &str) -> ShopResult<ApiResponse> {
        self.send(Method::DELETE, path, None).await
    }

    async fn send(&self, method: Method, path: &str, body: Option<&ProductPayload>) -> ShopResult<ApiResponse> {
        let url = self.url(path);
        debug!(%method, %url, "catalog request");
        let mut request = self.client.request(method.clone(), &url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let start = Instant::now();
        let response = request
            .send()
            .await
            .map_err(|e| ShopError::api(format!("{method} {url}: {e}")))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| ShopError::api(format!("{method} {url}: reading body: {e}")))?;
        let elapsed = start.elapsed();
        debug!(%method, %url, status, ?elapsed, "catalog response");
        Ok(ApiResponse {
            status,
            body,
            elapsed,
        })
    }
}
