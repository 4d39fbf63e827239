use std::net::SocketAddr;

use anyhow::{Context, Result};
use tracing::info;

use profileprobe::{ProfileExtractor, ProfileScraper, WebDriverLoader, server};

use super::{BrowserArgs, ExtractorArgs};

pub async fn handle_serve(bind: String, browser: BrowserArgs, extractor: ExtractorArgs) -> Result<()> {
    let addr: SocketAddr = bind
        .parse()
        .with_context(|| format!("Invalid bind address: {}", bind))?;

    let config = browser.to_config()?;
    info!("Serving profile extraction with {:?}", config.browser_type);

    let scraper = ProfileScraper::new(
        WebDriverLoader::new(config),
        ProfileExtractor::new(extractor.to_config()),
    );

    server::serve(scraper, addr).await
}
