use tracing::{debug, info, warn};

use crate::config::ScrapeOptions;
use crate::errors::LoadError;
use crate::extractor::ProfileExtractor;
use crate::normalize::normalize;
use crate::page::{PageLoader, RenderedPage};
use crate::types::ProfileRecord;

/// Normalize, load, extract, release.
///
/// Owns one page per call. The page is closed before `scrape` returns,
/// whatever happened during extraction.
pub struct ProfileScraper<L> {
    loader: L,
    extractor: ProfileExtractor,
    options: ScrapeOptions,
}

impl<L: PageLoader> ProfileScraper<L> {
    pub fn new(loader: L, extractor: ProfileExtractor) -> Self {
        Self {
            loader,
            extractor,
            options: ScrapeOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ScrapeOptions) -> Self {
        self.options = options;
        self
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    /// Scrape the profile behind `raw_url`.
    ///
    /// Always returns a record. When the page cannot be loaded only
    /// `source_url` is set.
    pub async fn scrape(&self, raw_url: &str) -> ProfileRecord {
        let url = normalize(raw_url);
        match self.try_scrape(&url).await {
            Ok(record) => record,
            Err(e) => {
                warn!("Could not load {}: {}", url, e);
                ProfileRecord::empty(url)
            }
        }
    }

    /// Like [`scrape`](Self::scrape) but reports a load failure instead of
    /// hiding it. `url` is used as given.
    pub async fn try_scrape(&self, url: &str) -> Result<ProfileRecord, LoadError> {
        info!("Scraping {}", url);
        let page = self.loader.load(url).await?;

        if let Some(path) = &self.options.dump_page {
            self.dump_page(&page, path).await;
        }

        let record = self.extractor.extract(&page, url).await;

        if let Err(e) = page.close().await {
            warn!("Failed to close page for {}: {:#}", url, e);
        }
        Ok(record)
    }

    async fn dump_page(&self, page: &L::Page, path: &std::path::Path) {
        match page.source().await {
            Ok(markup) => match tokio::fs::write(path, markup).await {
                Ok(()) => debug!("Saved page source to {}", path.display()),
                Err(e) => warn!("Could not write page source to {}: {}", path.display(), e),
            },
            Err(e) => warn!("Could not read page source: {}", e),
        }
    }
}
