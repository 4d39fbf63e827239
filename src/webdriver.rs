use std::time::Duration;

use anyhow::Result;
use fantoccini::error::CmdError;
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::json;
use tempfile::TempDir;
use tracing::{debug, info, warn};

use crate::config::BrowserConfig;
use crate::errors::{FieldError, LoadError};
use crate::page::{PageLoader, RenderedPage};
use crate::webdriver_manager::GLOBAL_WEBDRIVER_MANAGER;

/// Browser session driven over WebDriver
pub struct Browser {
    pub(crate) client: Client,
    browser_type: BrowserType,
    // Removed when the browser is dropped
    _profile_dir: Option<TempDir>,
}

/// Supported browser types
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum BrowserType {
    /// Mozilla Firefox
    Firefox,
    /// Google Chrome/Chromium
    Chrome,
}

impl std::str::FromStr for BrowserType {
    type Err = anyhow::Error;

    /// Parse browser type from string (case-insensitive)
    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "firefox" => Ok(BrowserType::Firefox),
            "chrome" | "chromium" => Ok(BrowserType::Chrome),
            _ => anyhow::bail!("Unsupported browser: {}", s),
        }
    }
}

impl BrowserType {
    /// Name of the WebDriver binary for this browser
    pub fn driver_name(&self) -> &'static str {
        match self {
            BrowserType::Firefox => "geckodriver",
            BrowserType::Chrome => "chromedriver",
        }
    }

    /// Port the driver listens on when started by hand
    pub fn default_port(&self) -> u16 {
        match self {
            BrowserType::Firefox => 4444,
            BrowserType::Chrome => 9515,
        }
    }
}

impl Browser {
    /// Start a new browser session according to `config`
    pub async fn new(config: &BrowserConfig) -> Result<Self, LoadError> {
        let browser_type = config.browser_type;
        info!("Connecting to {:?} WebDriver", browser_type);

        let webdriver_url = match &config.webdriver_url {
            Some(url) => url.clone(),
            None => GLOBAL_WEBDRIVER_MANAGER
                .ensure_driver(&browser_type)
                .await
                .map_err(|e| LoadError::Connect {
                    url: format!("localhost:{}", browser_type.default_port()),
                    reason: format!("{e:#}"),
                })?,
        };

        if !Self::is_webdriver_running(&webdriver_url).await {
            return Err(LoadError::Connect {
                url: webdriver_url,
                reason: format!(
                    "{} is not responding. Start it with `{} --port={}` or pass --webdriver-url",
                    browser_type.driver_name(),
                    browser_type.driver_name(),
                    browser_type.default_port()
                ),
            });
        }

        // Chrome is strict about profile directory reuse, so each session
        // gets its own.
        let profile_dir = match browser_type {
            BrowserType::Chrome => Some(
                tempfile::Builder::new()
                    .prefix("profileprobe-chrome-")
                    .tempdir()
                    .map_err(|e| LoadError::Session(format!("profile directory: {e}")))?,
            ),
            BrowserType::Firefox => None,
        };

        let caps = Self::capabilities(config, profile_dir.as_ref());

        debug!("Connecting to WebDriver at {}", webdriver_url);
        let client = ClientBuilder::rustls()
            .capabilities(caps)
            .connect(&webdriver_url)
            .await
            .map_err(|e| LoadError::Session(e.to_string()))?;

        if let Some(vp) = config.viewport {
            debug!("Setting viewport to {}x{}", vp.width, vp.height);
            if let Err(e) = client.set_window_size(vp.width, vp.height).await {
                debug!("Note: Could not set window size: {}", e);
            }
        }

        Ok(Browser {
            client,
            browser_type,
            _profile_dir: profile_dir,
        })
    }

    /// WebDriver capabilities carrying the headless/automation flags
    pub(crate) fn capabilities(
        config: &BrowserConfig,
        profile_dir: Option<&TempDir>,
    ) -> serde_json::Map<String, serde_json::Value> {
        let mut caps = serde_json::Map::new();

        match config.browser_type {
            BrowserType::Firefox => {
                let mut args = Vec::new();
                if config.headless {
                    args.push("--headless".to_string());
                }
                if let Some(vp) = &config.viewport {
                    args.push(format!("--width={}", vp.width));
                    args.push(format!("--height={}", vp.height));
                }

                let mut prefs = serde_json::Map::new();
                prefs.insert("dom.webdriver.enabled".to_string(), json!(false));
                if let Some(ua) = &config.user_agent {
                    prefs.insert("general.useragent.override".to_string(), json!(ua));
                }

                caps.insert(
                    "moz:firefoxOptions".to_string(),
                    json!({ "args": args, "prefs": prefs }),
                );
            }
            BrowserType::Chrome => {
                let mut args = vec![
                    "--no-sandbox".to_string(),
                    "--disable-dev-shm-usage".to_string(),
                    "--disable-blink-features=AutomationControlled".to_string(),
                ];
                if config.headless {
                    args.push("--headless=new".to_string());
                    args.push("--disable-gpu".to_string());
                }
                if let Some(vp) = &config.viewport {
                    args.push(format!("--window-size={},{}", vp.width, vp.height));
                }
                if let Some(ua) = &config.user_agent {
                    args.push(format!("--user-agent={ua}"));
                }
                if let Some(dir) = profile_dir {
                    args.push(format!("--user-data-dir={}", dir.path().display()));
                }

                caps.insert("goog:chromeOptions".to_string(), json!({ "args": args }));
            }
        }

        caps
    }

    async fn is_webdriver_running(url: &str) -> bool {
        let status_url = format!("{}/status", url.trim_end_matches('/'));

        match reqwest::Client::new()
            .get(&status_url)
            .timeout(Duration::from_secs(2))
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    /// Navigate and wait for the document to be ready, then let client-side
    /// rendering settle.
    pub async fn goto(&self, url: &str, config: &BrowserConfig) -> Result<(), LoadError> {
        info!("Navigating to {}", url);

        let navigate = async {
            self.client
                .goto(url)
                .await
                .map_err(|e| LoadError::Navigation {
                    url: url.to_string(),
                    reason: e.to_string(),
                })?;

            let wait_script = "return document.readyState === 'complete';";
            loop {
                match self.client.execute(wait_script, vec![]).await {
                    Ok(val) if val.as_bool().unwrap_or(false) => break,
                    _ => tokio::time::sleep(Duration::from_millis(100)).await,
                }
            }
            Ok::<(), LoadError>(())
        };

        tokio::time::timeout(config.load_timeout, navigate)
            .await
            .map_err(|_| LoadError::Timeout {
                url: url.to_string(),
                waited: config.load_timeout,
            })??;

        if !config.settle.is_zero() {
            debug!("Waiting {:?} for the page to settle", config.settle);
            tokio::time::sleep(config.settle).await;
        }

        Ok(())
    }

    pub fn browser_type(&self) -> BrowserType {
        self.browser_type
    }

    async fn find(&self, selector: &str) -> Result<fantoccini::elements::Element, FieldError> {
        self.client
            .find(Locator::Css(selector))
            .await
            .map_err(|e| field_error(selector, e))
    }
}

fn field_error(selector: &str, err: CmdError) -> FieldError {
    if err.is_miss() {
        FieldError::NotFound(selector.to_string())
    } else {
        FieldError::Driver(err.to_string())
    }
}

impl RenderedPage for Browser {
    async fn wait_for(&self, selector: &str, timeout: Duration) -> Result<(), FieldError> {
        debug!("Waiting up to {:?} for {}", timeout, selector);
        match self
            .client
            .wait()
            .at_most(timeout)
            .for_element(Locator::Css(selector))
            .await
        {
            Ok(_) => Ok(()),
            Err(CmdError::WaitTimeout) => Err(FieldError::Timeout {
                selector: selector.to_string(),
                waited: timeout,
            }),
            Err(e) => Err(field_error(selector, e)),
        }
    }

    async fn text(&self, selector: &str) -> Result<String, FieldError> {
        let element = self.find(selector).await?;
        element
            .text()
            .await
            .map_err(|e| field_error(selector, e))
    }

    async fn inner_html(&self, selector: &str) -> Result<String, FieldError> {
        let element = self.find(selector).await?;
        element
            .html(true)
            .await
            .map_err(|e| field_error(selector, e))
    }

    async fn attribute(&self, selector: &str, name: &str) -> Result<Option<String>, FieldError> {
        let element = self.find(selector).await?;
        element
            .attr(name)
            .await
            .map_err(|e| field_error(selector, e))
    }

    async fn click(&self, selector: &str) -> Result<(), FieldError> {
        let element = self.find(selector).await?;
        element.click().await.map_err(|e| field_error(selector, e))
    }

    async fn source(&self) -> Result<String, FieldError> {
        self.client
            .source()
            .await
            .map_err(|e| FieldError::Driver(e.to_string()))
    }

    async fn close(self) -> Result<()> {
        self.client.close().await?;
        Ok(())
    }
}

/// Loads each URL in a fresh WebDriver session
#[derive(Debug, Clone, Default)]
pub struct WebDriverLoader {
    config: BrowserConfig,
}

impl WebDriverLoader {
    pub fn new(config: BrowserConfig) -> Self {
        Self { config }
    }
}

impl PageLoader for WebDriverLoader {
    type Page = Browser;

    async fn load(&self, url: &str) -> Result<Browser, LoadError> {
        let browser = Browser::new(&self.config).await?;

        if let Err(e) = browser.goto(url, &self.config).await {
            if let Err(close_err) = browser.close().await {
                warn!("Failed to close browser after load error: {}", close_err);
            }
            return Err(e);
        }

        Ok(browser)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ViewportSize;

    #[test]
    fn test_browser_type_from_str() {
        assert_eq!("Chrome".parse::<BrowserType>().unwrap(), BrowserType::Chrome);
        assert_eq!("chromium".parse::<BrowserType>().unwrap(), BrowserType::Chrome);
        assert_eq!("firefox".parse::<BrowserType>().unwrap(), BrowserType::Firefox);
        assert!("safari".parse::<BrowserType>().is_err());
    }

    #[test]
    fn test_chrome_capabilities() {
        let config = BrowserConfig {
            user_agent: Some("Mozilla/5.0 test".to_string()),
            viewport: Some(ViewportSize {
                width: 1280,
                height: 800,
            }),
            ..Default::default()
        };
        let caps = Browser::capabilities(&config, None);
        let args = caps["goog:chromeOptions"]["args"].as_array().unwrap();
        let args: Vec<&str> = args.iter().filter_map(|a| a.as_str()).collect();

        assert!(args.contains(&"--headless=new"));
        assert!(args.contains(&"--no-sandbox"));
        assert!(args.contains(&"--disable-dev-shm-usage"));
        assert!(args.contains(&"--disable-blink-features=AutomationControlled"));
        assert!(args.contains(&"--window-size=1280,800"));
        assert!(args.contains(&"--user-agent=Mozilla/5.0 test"));
    }

    #[test]
    fn test_firefox_capabilities_visible() {
        let config = BrowserConfig {
            browser_type: BrowserType::Firefox,
            headless: false,
            user_agent: Some("ua".to_string()),
            ..Default::default()
        };
        let caps = Browser::capabilities(&config, None);
        let opts = &caps["moz:firefoxOptions"];

        assert!(opts["args"].as_array().unwrap().is_empty());
        assert_eq!(opts["prefs"]["general.useragent.override"], "ua");
    }

    #[tokio::test]
    async fn test_load_fails_without_webdriver() {
        let loader = WebDriverLoader::new(BrowserConfig {
            webdriver_url: Some("http://127.0.0.1:9".to_string()),
            ..Default::default()
        });
        let err = loader.load("https://www.tiktok.com/@jane").await.err().unwrap();
        assert!(matches!(err, LoadError::Connect { .. }));
    }
}
