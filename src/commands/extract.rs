use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::info;

use profileprobe::{
    OutputFormat, ProfileExtractor, ProfileScraper, ScrapeOptions, WebDriverLoader, normalize,
};

use super::{BrowserArgs, ExtractorArgs};

pub async fn handle_extract(
    url: String,
    browser: BrowserArgs,
    extractor: ExtractorArgs,
    format: OutputFormat,
    output: Option<PathBuf>,
    dump_page: Option<PathBuf>,
) -> Result<()> {
    let target = normalize(&url);
    if target.is_empty() {
        anyhow::bail!("URL must not be empty");
    }
    url::Url::parse(&target).with_context(|| format!("Not a profile URL: {}", url))?;
    info!("Normalized {} to {}", url, target);

    let scraper = ProfileScraper::new(
        WebDriverLoader::new(browser.to_config()?),
        ProfileExtractor::new(extractor.to_config()),
    )
    .with_options(ScrapeOptions { dump_page });

    let record = scraper.scrape(&target).await;

    if let Some(path) = output {
        let json = serde_json::to_string_pretty(&record)?;
        std::fs::write(&path, json)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!("Saved record to {}", path.display());
    }

    println!("{}", record.render(format)?);
    Ok(())
}
