// Shared in-memory page and loader for tests
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use profileprobe::{FieldError, LoadError, PageLoader, RenderedPage};

/// Element stored by selector
#[derive(Debug, Clone, Default)]
pub struct FakeElement {
    pub text: String,
    pub html: String,
    pub attrs: HashMap<String, String>,
}

/// In-memory stand-in for a rendered page.
///
/// Every capability call is appended to `calls`, so tests can assert on
/// which sources were consulted.
#[derive(Debug, Clone, Default)]
pub struct FakePage {
    elements: HashMap<String, FakeElement>,
    source: String,
    pub calls: Arc<Mutex<Vec<String>>>,
    pub closed: Arc<AtomicBool>,
}

impl FakePage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(mut self, selector: &str, text: &str) -> Self {
        self.element(selector).text = text.to_string();
        self
    }

    pub fn with_html(mut self, selector: &str, html: &str) -> Self {
        self.element(selector).html = html.to_string();
        self
    }

    pub fn with_attr(mut self, selector: &str, name: &str, value: &str) -> Self {
        self.element(selector)
            .attrs
            .insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_source(mut self, source: &str) -> Self {
        self.source = source.to_string();
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn called(&self, call: &str) -> bool {
        self.calls().iter().any(|c| c == call)
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn element(&mut self, selector: &str) -> &mut FakeElement {
        self.elements.entry(selector.to_string()).or_default()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn lookup(&self, selector: &str) -> Result<&FakeElement, FieldError> {
        self.elements
            .get(selector)
            .ok_or_else(|| FieldError::NotFound(selector.to_string()))
    }
}

impl RenderedPage for FakePage {
    async fn wait_for(&self, selector: &str, timeout: Duration) -> Result<(), FieldError> {
        self.record(format!("wait {selector}"));
        if self.elements.contains_key(selector) {
            Ok(())
        } else {
            Err(FieldError::Timeout {
                selector: selector.to_string(),
                waited: timeout,
            })
        }
    }

    async fn text(&self, selector: &str) -> Result<String, FieldError> {
        self.record(format!("text {selector}"));
        Ok(self.lookup(selector)?.text.clone())
    }

    async fn inner_html(&self, selector: &str) -> Result<String, FieldError> {
        self.record(format!("html {selector}"));
        Ok(self.lookup(selector)?.html.clone())
    }

    async fn attribute(&self, selector: &str, name: &str) -> Result<Option<String>, FieldError> {
        self.record(format!("attr {selector} {name}"));
        Ok(self.lookup(selector)?.attrs.get(name).cloned())
    }

    async fn click(&self, selector: &str) -> Result<(), FieldError> {
        self.record(format!("click {selector}"));
        self.lookup(selector).map(|_| ())
    }

    async fn source(&self) -> Result<String, FieldError> {
        self.record("source".to_string());
        Ok(self.source.clone())
    }

    async fn close(self) -> anyhow::Result<()> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

/// Serves prepared pages by URL; unknown URLs fail to load
#[derive(Debug, Clone, Default)]
pub struct FakeLoader {
    pages: HashMap<String, FakePage>,
    pub loaded: Arc<Mutex<Vec<String>>>,
}

impl FakeLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &str, page: FakePage) -> Self {
        self.pages.insert(url.to_string(), page);
        self
    }

    pub fn loaded(&self) -> Vec<String> {
        self.loaded.lock().unwrap().clone()
    }
}

impl PageLoader for FakeLoader {
    type Page = FakePage;

    async fn load(&self, url: &str) -> Result<FakePage, LoadError> {
        self.loaded.lock().unwrap().push(url.to_string());
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| LoadError::Navigation {
                url: url.to_string(),
                reason: "net::ERR_NAME_NOT_RESOLVED".to_string(),
            })
    }
}

pub const NAME_PRIMARY: &str = "h2.css-1a4kl8x-H2SubTitle.e1457k4r3";
pub const NAME_SUBTITLE: &str = "h2[data-e2e='user-subtitle']";
pub const NAME_TITLE: &str = "h1[data-e2e='user-title']";
pub const FOLLOWERS: &str = "[data-e2e='followers-count']";
pub const LIKES: &str = "[data-e2e='likes-count']";
pub const WEBSITE: &str = "a[data-e2e='user-link']";
pub const BIO: &str = "[data-e2e='user-bio']";
pub const BIO_EXPAND: &str = "[data-e2e='user-bio'] + button";

/// A profile page where every field resolves
pub fn full_profile() -> FakePage {
    FakePage::new()
        .with_text(NAME_PRIMARY, "Jane Doe")
        .with_text(FOLLOWERS, "830.4K")
        .with_text(LIKES, "19.3M")
        .with_attr(WEBSITE, "href", "https://linktr.ee/janedoe")
        .with_text(BIO, "Dancer 💃\nBookings: jane@agency.example.com")
        .with_html(
            BIO,
            "Dancer 💃<br>Bookings: <a>jane@agency.example.com</a>",
        )
        .with_source("<html><body>support@tiktok.example.com</body></html>")
}
