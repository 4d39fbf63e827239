//! Capability interface between the extractor and whatever renders pages.
//!
//! The WebDriver-backed [`Browser`](crate::webdriver::Browser) is the
//! production implementation; tests substitute an in-memory page.

use std::future::Future;
use std::time::Duration;

use crate::errors::{FieldError, LoadError};

/// A fully loaded page whose regions can be queried by CSS selector.
///
/// All queries address the first element matching the selector.
pub trait RenderedPage: Send + Sync {
    /// Wait until an element matching `selector` exists, up to `timeout`
    fn wait_for(
        &self,
        selector: &str,
        timeout: Duration,
    ) -> impl Future<Output = Result<(), FieldError>> + Send;

    /// Visible text of the element
    fn text(&self, selector: &str) -> impl Future<Output = Result<String, FieldError>> + Send;

    /// Raw inner markup of the element
    fn inner_html(&self, selector: &str)
    -> impl Future<Output = Result<String, FieldError>> + Send;

    /// Attribute value of the element, `None` when the attribute is missing
    fn attribute(
        &self,
        selector: &str,
        name: &str,
    ) -> impl Future<Output = Result<Option<String>, FieldError>> + Send;

    /// Click the element
    fn click(&self, selector: &str) -> impl Future<Output = Result<(), FieldError>> + Send;

    /// Markup of the whole page
    fn source(&self) -> impl Future<Output = Result<String, FieldError>> + Send;

    /// Release the page and any browser session behind it
    fn close(self) -> impl Future<Output = anyhow::Result<()>> + Send
    where
        Self: Sized;
}

/// Produces rendered pages. Every call yields an independent page.
pub trait PageLoader: Send + Sync {
    type Page: RenderedPage;

    fn load(&self, url: &str) -> impl Future<Output = Result<Self::Page, LoadError>> + Send;
}
