//! Typed configuration for the browser session and the field extractor.

use std::path::PathBuf;
use std::time::Duration;

use crate::types::ViewportSize;
use crate::webdriver::BrowserType;

/// How the WebDriver-backed page loader starts and drives its browser
#[derive(Debug, Clone)]
pub struct BrowserConfig {
    pub browser_type: BrowserType,
    /// Explicit WebDriver endpoint; when unset a local driver is found or started
    pub webdriver_url: Option<String>,
    pub headless: bool,
    pub user_agent: Option<String>,
    pub viewport: Option<ViewportSize>,
    /// Upper bound for navigation plus `document.readyState` polling
    pub load_timeout: Duration,
    /// Extra time after the document is ready for client-side rendering
    pub settle: Duration,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            browser_type: BrowserType::Chrome,
            webdriver_url: None,
            headless: true,
            user_agent: None,
            viewport: None,
            load_timeout: Duration::from_secs(30),
            settle: Duration::from_secs(5),
        }
    }
}

/// One step of a selector fallback chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Probe {
    pub selector: String,
    /// Wait for the element (bounded by the field's budget) before reading it
    pub wait: bool,
}

impl Probe {
    pub fn waiting(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            wait: true,
        }
    }

    pub fn immediate(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            wait: false,
        }
    }
}

/// Selector chains for each profile field
#[derive(Debug, Clone)]
pub struct Selectors {
    pub name: Vec<Probe>,
    pub followers: Vec<Probe>,
    pub likes: Vec<Probe>,
    pub website: Vec<Probe>,
    pub bio: String,
    /// Control that reveals a truncated bio; clicking it is best effort
    pub bio_expand: String,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            name: vec![
                Probe::waiting("h2.css-1a4kl8x-H2SubTitle.e1457k4r3"),
                Probe::immediate("h2[data-e2e='user-subtitle']"),
                Probe::immediate("h1[data-e2e='user-title']"),
            ],
            followers: vec![Probe::waiting("[data-e2e='followers-count']")],
            likes: vec![Probe::immediate("[data-e2e='likes-count']")],
            website: vec![Probe::immediate("a[data-e2e='user-link']")],
            bio: "[data-e2e='user-bio']".to_string(),
            bio_expand: "[data-e2e='user-bio'] + button".to_string(),
        }
    }
}

/// Wait budgets and selector chains used by `ProfileExtractor`
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    pub selectors: Selectors,
    pub name_wait: Duration,
    pub count_wait: Duration,
    pub bio_wait: Duration,
    pub expand_bio: bool,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            selectors: Selectors::default(),
            name_wait: Duration::from_secs(10),
            count_wait: Duration::from_secs(5),
            bio_wait: Duration::from_secs(15),
            expand_bio: true,
        }
    }
}

/// Side outputs of a scrape, for debugging
#[derive(Debug, Clone, Default)]
pub struct ScrapeOptions {
    /// Write the rendered page markup here after loading
    pub dump_page: Option<PathBuf>,
}
