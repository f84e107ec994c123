//! Browser control for the headless walkthrough.
//!
//! With the `browser` feature enabled this drives a real Chromium instance over
//! the Chrome DevTools Protocol (chromiumoxide). Without the feature a mock
//! implementation with the same async API backs the unit tests: the mock page
//! holds a scriptable set of visible labels and an in-memory localStorage, so
//! the walkthrough's guard logic can be exercised without a browser.

use crate::result::{RepasarError, RepasarResult};

/// Browser configuration
#[derive(Debug, Clone)]
pub struct BrowserConfig {
    /// Run in headless mode
    pub headless: bool,
    /// Viewport width
    pub viewport_width: u32,
    /// Viewport height
    pub viewport_height: u32,
    /// Path to chromium binary (None = auto-detect)
    pub chromium_path: Option<String>,
    /// Sandbox mode (disable for containers)
    pub sandbox: bool,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            viewport_width: 1280,
            viewport_height: 800,
            chromium_path: None,
            sandbox: true,
        }
    }
}

impl BrowserConfig {
    /// Set viewport dimensions
    #[must_use]
    pub const fn with_viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport_width = width;
        self.viewport_height = height;
        self
    }

    /// Set headless mode
    #[must_use]
    pub const fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set chromium path
    #[must_use]
    pub fn with_chromium_path(mut self, path: impl Into<String>) -> Self {
        self.chromium_path = Some(path.into());
        self
    }

    /// Disable sandbox (for containers/CI)
    #[must_use]
    pub const fn with_no_sandbox(mut self) -> Self {
        self.sandbox = false;
        self
    }
}

// ============================================================================
// Real CDP Implementation (when `browser` feature is enabled)
// ============================================================================

#[cfg(feature = "browser")]
mod cdp {
    use super::{BrowserConfig, RepasarError, RepasarResult};
    use crate::locator::Selector;
    use crate::wait::{poll_until, WaitOptions, WaitResult};
    use chromiumoxide::browser::{Browser as CdpBrowser, BrowserConfig as CdpConfig};
    use chromiumoxide::cdp::browser_protocol::page::{
        CaptureScreenshotFormat, CaptureScreenshotParams, ReloadParams,
    };
    use chromiumoxide::page::Page as CdpPage;
    use futures::StreamExt;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    /// Browser instance with a live CDP connection
    #[derive(Debug)]
    pub struct Browser {
        config: BrowserConfig,
        inner: Arc<Mutex<CdpBrowser>>,
        #[allow(dead_code)]
        handle: tokio::task::JoinHandle<()>,
    }

    impl Browser {
        /// Launch a new Chromium instance
        ///
        /// # Errors
        ///
        /// Returns [`RepasarError::BrowserLaunch`] if the browser cannot be
        /// started; the caller treats this as unrecoverable.
        pub async fn launch(config: BrowserConfig) -> RepasarResult<Self> {
            let mut builder = CdpConfig::builder()
                .window_size(config.viewport_width, config.viewport_height);

            if !config.headless {
                builder = builder.with_head();
            }

            if !config.sandbox {
                builder = builder.no_sandbox();
            }

            if let Some(ref path) = config.chromium_path {
                builder = builder.chrome_executable(path);
            }

            let cdp_config = builder
                .build()
                .map_err(|e| RepasarError::BrowserLaunch { message: e })?;

            let (browser, mut handler) = CdpBrowser::launch(cdp_config).await.map_err(|e| {
                RepasarError::BrowserLaunch {
                    message: e.to_string(),
                }
            })?;

            // CDP event loop; the walkthrough itself stays single-tasked.
            let handle = tokio::spawn(async move {
                while let Some(h) = handler.next().await {
                    if h.is_err() {
                        break;
                    }
                }
            });

            Ok(Self {
                config,
                inner: Arc::new(Mutex::new(browser)),
                handle,
            })
        }

        /// Create a new page
        pub async fn new_page(&self) -> RepasarResult<Page> {
            let browser = self.inner.lock().await;
            let cdp_page =
                browser
                    .new_page("about:blank")
                    .await
                    .map_err(|e| RepasarError::Page {
                        message: e.to_string(),
                    })?;

            Ok(Page {
                url: String::from("about:blank"),
                inner: Arc::new(Mutex::new(cdp_page)),
            })
        }

        /// Get the browser configuration
        #[must_use]
        pub const fn config(&self) -> &BrowserConfig {
            &self.config
        }

        /// Close the browser; always invoked at the end of a run
        pub async fn close(self) -> RepasarResult<()> {
            let mut browser = self.inner.lock().await;
            browser
                .close()
                .await
                .map_err(|e| RepasarError::BrowserLaunch {
                    message: e.to_string(),
                })?;
            Ok(())
        }
    }

    /// A browser page with a live CDP connection
    #[derive(Debug)]
    pub struct Page {
        url: String,
        inner: Arc<Mutex<CdpPage>>,
    }

    impl Page {
        /// Navigate to a URL
        pub async fn goto(&mut self, url: &str) -> RepasarResult<()> {
            let page = self.inner.lock().await;
            page.goto(url)
                .await
                .map_err(|e| RepasarError::Navigation {
                    url: url.to_string(),
                    message: e.to_string(),
                })?;
            drop(page);
            self.url = url.to_string();
            Ok(())
        }

        /// Reload the current page
        pub async fn reload(&mut self) -> RepasarResult<()> {
            let page = self.inner.lock().await;
            page.execute(ReloadParams::default())
                .await
                .map_err(|e| RepasarError::Page {
                    message: e.to_string(),
                })?;
            Ok(())
        }

        /// Write a key/value pair into the page's localStorage
        pub async fn set_local_storage(&mut self, key: &str, value: &str) -> RepasarResult<()> {
            let script = format!("localStorage.setItem({key:?}, {value:?})");
            let page = self.inner.lock().await;
            page.evaluate(script)
                .await
                .map_err(|e| RepasarError::Evaluation {
                    message: e.to_string(),
                })?;
            Ok(())
        }

        /// Click the first visible match; `false` when nothing matches
        pub async fn click(&mut self, selector: &Selector) -> RepasarResult<bool> {
            self.eval_bool(&selector.click_script()).await
        }

        /// Whether a matching element is currently visible
        pub async fn is_visible(&self, selector: &Selector) -> RepasarResult<bool> {
            self.eval_bool(&selector.visible_script()).await
        }

        /// Poll until a matching element is visible, bounded by the timeout
        pub async fn wait_for_visible(
            &self,
            selector: &Selector,
            options: &WaitOptions,
        ) -> RepasarResult<WaitResult> {
            poll_until(
                || self.is_visible(selector),
                &selector.to_string(),
                options,
            )
            .await
        }

        /// Take a full-page screenshot (PNG bytes)
        pub async fn screenshot(&self) -> RepasarResult<Vec<u8>> {
            let page = self.inner.lock().await;
            let params = CaptureScreenshotParams::builder()
                .format(CaptureScreenshotFormat::Png)
                .capture_beyond_viewport(true)
                .build();

            let screenshot =
                page.execute(params)
                    .await
                    .map_err(|e| RepasarError::Screenshot {
                        message: e.to_string(),
                    })?;

            use base64::Engine;
            base64::engine::general_purpose::STANDARD
                .decode(&screenshot.data)
                .map_err(|e| RepasarError::Screenshot {
                    message: e.to_string(),
                })
        }

        /// Get current URL
        #[must_use]
        pub fn current_url(&self) -> &str {
            &self.url
        }

        async fn eval_bool(&self, script: &str) -> RepasarResult<bool> {
            let page = self.inner.lock().await;
            let result = page
                .evaluate(script.to_string())
                .await
                .map_err(|e| RepasarError::Evaluation {
                    message: e.to_string(),
                })?;
            result
                .into_value::<bool>()
                .map_err(|e| RepasarError::Evaluation {
                    message: e.to_string(),
                })
        }
    }
}

// ============================================================================
// Mock Implementation (when `browser` feature is NOT enabled)
// ============================================================================

#[cfg(not(feature = "browser"))]
mod mock {
    use super::{BrowserConfig, RepasarError, RepasarResult};
    use crate::locator::Selector;
    use crate::wait::{WaitOptions, WaitResult};
    use std::collections::{HashMap, HashSet};
    use std::time::Duration;

    /// PNG signature; mock pages render nothing beyond it.
    const STUB_PNG: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

    /// Browser instance (mock when `browser` feature disabled)
    #[derive(Debug)]
    pub struct Browser {
        config: BrowserConfig,
    }

    impl Browser {
        /// Launch a mock browser
        pub async fn launch(config: BrowserConfig) -> RepasarResult<Self> {
            Ok(Self { config })
        }

        /// Create a new mock page
        pub async fn new_page(&self) -> RepasarResult<Page> {
            Ok(Page::new())
        }

        /// Get the browser configuration
        #[must_use]
        pub const fn config(&self) -> &BrowserConfig {
            &self.config
        }

        /// Close the mock browser
        pub async fn close(self) -> RepasarResult<()> {
            Ok(())
        }
    }

    /// A mock page with scriptable UI surface
    #[derive(Debug, Default)]
    pub struct Page {
        url: String,
        storage: HashMap<String, String>,
        visible: HashSet<String>,
    }

    impl Page {
        /// Create an empty mock page (no visible controls)
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Mark labels/selectors as visible on the mock UI surface
        #[must_use]
        pub fn with_visible<I, S>(mut self, labels: I) -> Self
        where
            I: IntoIterator<Item = S>,
            S: Into<String>,
        {
            self.visible.extend(labels.into_iter().map(Into::into));
            self
        }

        /// Read back a seeded storage value
        #[must_use]
        pub fn storage_value(&self, key: &str) -> Option<&str> {
            self.storage.get(key).map(String::as_str)
        }

        /// Navigate to a URL
        pub async fn goto(&mut self, url: &str) -> RepasarResult<()> {
            self.url = url.to_string();
            Ok(())
        }

        /// Reload; localStorage survives, matching the real thing
        pub async fn reload(&mut self) -> RepasarResult<()> {
            Ok(())
        }

        /// Write a key/value pair into the mock localStorage
        pub async fn set_local_storage(&mut self, key: &str, value: &str) -> RepasarResult<()> {
            self.storage.insert(key.to_string(), value.to_string());
            Ok(())
        }

        /// Click a control; `false` when it is not on the surface
        pub async fn click(&mut self, selector: &Selector) -> RepasarResult<bool> {
            Ok(self.visible.contains(&surface_key(selector)))
        }

        /// Whether a control is on the surface
        pub async fn is_visible(&self, selector: &Selector) -> RepasarResult<bool> {
            Ok(self.visible.contains(&surface_key(selector)))
        }

        /// Single-shot readiness check; mock surfaces never change mid-step
        pub async fn wait_for_visible(
            &self,
            selector: &Selector,
            options: &WaitOptions,
        ) -> RepasarResult<WaitResult> {
            if self.is_visible(selector).await? {
                Ok(WaitResult::new(Duration::ZERO, selector.to_string()))
            } else {
                Err(RepasarError::Timeout {
                    ms: options.timeout_ms,
                    waiting_for: selector.to_string(),
                })
            }
        }

        /// Take a stub screenshot
        pub async fn screenshot(&self) -> RepasarResult<Vec<u8>> {
            Ok(STUB_PNG.to_vec())
        }

        /// Get current URL
        #[must_use]
        pub fn current_url(&self) -> &str {
            &self.url
        }
    }

    fn surface_key(selector: &Selector) -> String {
        match selector {
            Selector::Text(t) => t.clone(),
            Selector::Role { name, .. } => name.clone(),
            Selector::Css(s) => s.clone(),
        }
    }
}

// Re-export based on feature
#[cfg(feature = "browser")]
pub use cdp::{Browser, Page};

#[cfg(not(feature = "browser"))]
pub use mock::{Browser, Page};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults_match_target_viewport() {
        let config = BrowserConfig::default();
        assert!(config.headless);
        assert_eq!(config.viewport_width, 1280);
        assert_eq!(config.viewport_height, 800);
        assert!(config.sandbox);
    }

    #[test]
    fn config_builders() {
        let config = BrowserConfig::default()
            .with_viewport(800, 600)
            .with_headless(false)
            .with_chromium_path("/usr/bin/chromium")
            .with_no_sandbox();
        assert_eq!(config.viewport_width, 800);
        assert_eq!(config.viewport_height, 600);
        assert!(!config.headless);
        assert_eq!(config.chromium_path.as_deref(), Some("/usr/bin/chromium"));
        assert!(!config.sandbox);
    }

    #[cfg(not(feature = "browser"))]
    mod mock_tests {
        use super::*;
        use crate::locator::Selector;
        use crate::wait::WaitOptions;

        #[tokio::test]
        async fn mock_page_tracks_storage_and_visibility() {
            let browser = Browser::launch(BrowserConfig::default()).await.unwrap();
            let mut page = browser.new_page().await.unwrap().with_visible(["Exams"]);

            page.goto("http://localhost:3002").await.unwrap();
            assert_eq!(page.current_url(), "http://localhost:3002");

            page.set_local_storage("demo_mode", "true").await.unwrap();
            page.reload().await.unwrap();
            assert_eq!(page.storage_value("demo_mode"), Some("true"));

            assert!(page.is_visible(&Selector::button("Exams")).await.unwrap());
            assert!(page.click(&Selector::button("Exams")).await.unwrap());
            assert!(!page.click(&Selector::button("Practice")).await.unwrap());

            browser.close().await.unwrap();
        }

        #[tokio::test]
        async fn mock_wait_times_out_on_absent_control() {
            let page = Page::new();
            let result = page
                .wait_for_visible(&Selector::button("Test Mode"), &WaitOptions::new())
                .await;
            assert!(matches!(
                result,
                Err(crate::result::RepasarError::Timeout { .. })
            ));
        }

        #[tokio::test]
        async fn mock_screenshot_is_png_tagged() {
            let page = Page::new();
            let bytes = page.screenshot().await.unwrap();
            assert_eq!(&bytes[..4], b"\x89PNG");
        }
    }
}
