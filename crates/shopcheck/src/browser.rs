//! Chromium session over the Chrome DevTools Protocol.
//!
//! chromiumoxide is async; the [`WebDriver`] boundary is not. The driver
//! owns a multi-threaded tokio runtime and blocks on it for every call,
//! while the CDP event handler runs on the same runtime in the background.

use crate::driver::{DriverConfig, WebDriver, WebElement};
use crate::locator::Selector;
use crate::result::{ShopError, ShopResult};
use chromiumoxide::browser::{Browser as CdpBrowser, BrowserConfig as CdpConfig};
use chromiumoxide::element::Element as CdpElement;
use chromiumoxide::page::Page as CdpPage;
use futures::StreamExt;
use std::future::Future;
use std::sync::Arc;
use tokio::runtime::Runtime;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

const IS_DISPLAYED_JS: &str = "function() { \
    const style = window.getComputedStyle(this); \
    const rect = this.getBoundingClientRect(); \
    return style.visibility !== 'hidden' && style.display !== 'none' \
        && (rect.width > 0 || rect.height > 0); }";

const IS_ENABLED_JS: &str = "function() { return !this.disabled; }";

const SELECT_ALL_JS: &str = "function() { this.focus(); if (this.select) { this.select(); } }";

fn cdp_error(e: impl std::fmt::Display) -> ShopError {
    ShopError::driver(e.to_string())
}

/// A real Chromium session
#[derive(Debug)]
pub struct ChromiumDriver {
    runtime: Arc<Runtime>,
    browser: Mutex<Option<CdpBrowser>>,
    page: CdpPage,
    config: DriverConfig,
}

impl ChromiumDriver {
    /// Launch Chromium and open a blank tab
    pub fn launch(config: DriverConfig) -> ShopResult<Self> {
        let runtime = Arc::new(Runtime::new().map_err(|e| ShopError::BrowserLaunch {
            message: format!("failed to start async runtime: {e}"),
        })?);

        let mut builder = CdpConfig::builder()
            .window_size(config.viewport_width, config.viewport_height)
            .request_timeout(config.navigation_timeout);
        if !config.headless {
            builder = builder.with_head();
        }
        if config.no_sandbox {
            builder = builder.no_sandbox();
        }
        if let Some(ref path) = config.executable_path {
            builder = builder.chrome_executable(path);
        }
        let cdp_config = builder
            .build()
            .map_err(|message| ShopError::BrowserLaunch { message })?;

        let (browser, page) = runtime.block_on(async {
            let (browser, mut handler) =
                CdpBrowser::launch(cdp_config)
                    .await
                    .map_err(|e| ShopError::BrowserLaunch {
                        message: e.to_string(),
                    })?;

            tokio::spawn(async move {
                while let Some(event) = handler.next().await {
                    if event.is_err() {
                        break;
                    }
                }
            });

            let page = browser
                .new_page("about:blank")
                .await
                .map_err(|e| ShopError::BrowserLaunch {
                    message: e.to_string(),
                })?;
            Ok::<_, ShopError>((browser, page))
        })?;

        info!(headless = config.headless, "chromium launched");
        Ok(Self {
            runtime,
            browser: Mutex::new(Some(browser)),
            page,
            config,
        })
    }

    /// Launch configuration
    #[must_use]
    pub const fn config(&self) -> &DriverConfig {
        &self.config
    }

    fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    fn wrap(&self, element: CdpElement) -> ChromiumElement {
        ChromiumElement {
            runtime: Arc::clone(&self.runtime),
            inner: Arc::new(element),
        }
    }
}

impl WebDriver for ChromiumDriver {
    type Element = ChromiumElement;

    fn navigate(&self, url: &str) -> ShopResult<()> {
        debug!(url, "navigate");
        let timeout = self.config.navigation_timeout;
        self.block_on(async {
            tokio::time::timeout(timeout, self.page.goto(url))
                .await
                .map_err(|_| ShopError::Navigation {
                    url: url.to_string(),
                    message: format!("no load event within {}ms", timeout.as_millis()),
                })?
                .map_err(|e| ShopError::Navigation {
                    url: url.to_string(),
                    message: e.to_string(),
                })?;
            Ok(())
        })
    }

    fn current_url(&self) -> ShopResult<String> {
        let url = self.block_on(self.page.url()).map_err(cdp_error)?;
        Ok(url.unwrap_or_default())
    }

    fn find_element(&self, selector: &Selector) -> ShopResult<ChromiumElement> {
        self.find_elements(selector)?
            .into_iter()
            .next()
            .ok_or_else(|| ShopError::not_found(format!("no such element: {selector}")))
    }

    fn find_elements(&self, selector: &Selector) -> ShopResult<Vec<ChromiumElement>> {
        let css = selector.to_css();
        let found = self.block_on(self.page.find_elements(css));
        match found {
            Ok(elements) => Ok(elements.into_iter().map(|e| self.wrap(e)).collect()),
            // querySelectorAll on a document mid-navigation reports no node
            Err(e) if e.to_string().contains("Could not find node") => Ok(Vec::new()),
            Err(e) => Err(cdp_error(e)),
        }
    }

    fn quit(&self) -> ShopResult<()> {
        self.block_on(async {
            let Some(mut browser) = self.browser.lock().await.take() else {
                return Ok(());
            };
            if let Err(e) = browser.close().await {
                warn!(error = %e, "browser close failed");
            }
            browser.wait().await.map_err(cdp_error)?;
            info!("chromium closed");
            Ok(())
        })
    }
}

/// Element handle in a Chromium page
#[derive(Debug, Clone)]
pub struct ChromiumElement {
    runtime: Arc<Runtime>,
    inner: Arc<CdpElement>,
}

impl ChromiumElement {
    fn eval_bool(&self, function: &str) -> ShopResult<bool> {
        let returns = self
            .runtime
            .block_on(self.inner.call_js_fn(function, false))
            .map_err(cdp_error)?;
        Ok(returns
            .result
            .value
            .and_then(|v| v.as_bool())
            .unwrap_or(false))
    }
}

impl WebElement for ChromiumElement {
    fn click(&self) -> ShopResult<()> {
        self.runtime
            .block_on(self.inner.click())
            .map(|_| ())
            .map_err(cdp_error)
    }

    fn send_keys(&self, text: &str) -> ShopResult<()> {
        self.runtime
            .block_on(self.inner.type_str(text))
            .map(|_| ())
            .map_err(cdp_error)
    }

    fn clear(&self) -> ShopResult<()> {
        // Select and delete through the keyboard so controlled inputs see it
        self.runtime.block_on(async {
            self.inner
                .call_js_fn(SELECT_ALL_JS, false)
                .await
                .map_err(cdp_error)?;
            self.inner.press_key("Backspace").await.map_err(cdp_error)?;
            Ok(())
        })
    }

    fn is_displayed(&self) -> ShopResult<bool> {
        self.eval_bool(IS_DISPLAYED_JS)
    }

    fn is_enabled(&self) -> ShopResult<bool> {
        self.eval_bool(IS_ENABLED_JS)
    }

    fn text(&self) -> ShopResult<String> {
        let text = self
            .runtime
            .block_on(self.inner.inner_text())
            .map_err(cdp_error)?;
        Ok(text.unwrap_or_default())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_executable_fails_launch() {
        let config = DriverConfig::new()
            .executable("/nonexistent/chromium-for-shopcheck")
            .no_sandbox(true);
        let err = ChromiumDriver::launch(config).unwrap_err();
        assert!(matches!(err, ShopError::BrowserLaunch { .. }));
    }

    #[test]
    fn test_scripts_are_functions() {
        for js in [IS_DISPLAYED_JS, IS_ENABLED_JS, SELECT_ALL_JS] {
            assert!(js.starts_with("function()"));
        }
    }
}
