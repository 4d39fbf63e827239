use std::time::Duration;

use anyhow::Result;
use clap::Args;

use profileprobe::{BrowserConfig, BrowserType, ExtractorConfig, ViewportSize};

pub mod extract;
pub mod normalize;
#[cfg(feature = "server")]
pub mod serve;

/// Browser session flags shared by `extract` and `serve`
#[derive(Args, Debug, Clone)]
pub struct BrowserArgs {
    /// Browser to drive (chrome or firefox)
    #[arg(short, long, default_value = "chrome", env = "PROFILEPROBE_BROWSER")]
    pub browser: String,

    /// WebDriver endpoint; a local driver is found or started if omitted
    #[arg(long, env = "PROFILEPROBE_WEBDRIVER_URL")]
    pub webdriver_url: Option<String>,

    /// Run browser in visible mode (disables headless)
    #[arg(long = "no-headless")]
    pub no_headless: bool,

    /// Override the browser user agent
    #[arg(long, env = "PROFILEPROBE_USER_AGENT")]
    pub user_agent: Option<String>,

    /// Set viewport size (WIDTHxHEIGHT, e.g., 1920x1080)
    #[arg(long)]
    pub viewport: Option<String>,

    /// Seconds allowed for navigation and document readiness
    #[arg(long, default_value = "30")]
    pub load_timeout: u64,

    /// Milliseconds to wait after load for client-side rendering
    #[arg(long, default_value = "5000", env = "PROFILEPROBE_SETTLE_MS")]
    pub settle_ms: u64,
}

impl BrowserArgs {
    pub fn to_config(&self) -> Result<BrowserConfig> {
        let browser_type: BrowserType = self.browser.parse()?;
        let viewport = self
            .viewport
            .as_deref()
            .map(ViewportSize::parse)
            .transpose()?;

        Ok(BrowserConfig {
            browser_type,
            webdriver_url: self.webdriver_url.clone(),
            headless: !self.no_headless,
            user_agent: self.user_agent.clone(),
            viewport,
            load_timeout: Duration::from_secs(self.load_timeout),
            settle: Duration::from_millis(self.settle_ms),
        })
    }
}

/// Wait budgets for the field extractor
#[derive(Args, Debug, Clone)]
pub struct ExtractorArgs {
    /// Seconds to wait for the display name
    #[arg(long, default_value = "10")]
    pub name_timeout: u64,

    /// Seconds to wait for follower/like counts
    #[arg(long, default_value = "5")]
    pub count_timeout: u64,

    /// Seconds to wait for the bio before giving up on the email
    #[arg(long, default_value = "15")]
    pub bio_timeout: u64,

    /// Don't try to expand a truncated bio
    #[arg(long)]
    pub no_expand_bio: bool,
}

impl ExtractorArgs {
    pub fn to_config(&self) -> ExtractorConfig {
        ExtractorConfig {
            name_wait: Duration::from_secs(self.name_timeout),
            count_wait: Duration::from_secs(self.count_timeout),
            bio_wait: Duration::from_secs(self.bio_timeout),
            expand_bio: !self.no_expand_bio,
            ..Default::default()
        }
    }
}

#[cfg(test)]
#[path = "../commands_test.rs"]
mod commands_test;
