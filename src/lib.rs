//! # profileprobe
//!
//! Extract public profile attributes (display name, follower and like
//! counts, website link, contact email) from a social-media profile page.
//!
//! Any profile-related URL is first normalized to the root profile URL, the
//! page is rendered in a real browser over WebDriver, and each field is
//! resolved independently through a chain of CSS selectors. A field that
//! cannot be found stays `null`; only a failure to load the page at all
//! empties the record.
//!
//! ## CLI Usage
//!
//! ```bash
//! # Scrape a profile (a video URL works too)
//! profileprobe extract "https://www.tiktok.com/@jane.doe/video/123"
//!
//! # Human readable output, saved copy of the record
//! profileprobe extract "https://www.tiktok.com/@jane.doe" --format simple --output profile.json
//!
//! # Use an already running chromedriver
//! profileprobe extract "https://www.tiktok.com/@jane.doe" --webdriver-url http://localhost:9515
//!
//! # Only normalize
//! profileprobe normalize "https://www.tiktok.com/@jane.doe/video/123/"
//!
//! # HTTP endpoint: GET /extract?url=...
//! profileprobe serve --bind 0.0.0.0:8000
//! ```
//!
//! ## Library Usage
//!
//! ```no_run
//! use profileprobe::{BrowserConfig, ProfileExtractor, ProfileScraper, WebDriverLoader};
//!
//! # async fn example() {
//! let scraper = ProfileScraper::new(
//!     WebDriverLoader::new(BrowserConfig::default()),
//!     ProfileExtractor::default(),
//! );
//! let record = scraper.scrape("https://www.tiktok.com/@jane.doe/video/1").await;
//! println!("{:?}", record.followers);
//! # }
//! ```

pub mod config;

/// Abbreviated count parsing (`830.4K`)
pub mod count;

pub mod email;

/// Error types for fields, page loads and the process
pub mod errors;

/// Field extraction over a rendered page
pub mod extractor;

/// Profile URL normalization
pub mod normalize;

/// Capability traits for rendered pages and page loaders
pub mod page;

pub mod scraper;

/// HTTP endpoint
#[cfg(feature = "server")]
pub mod server;

/// Output types
pub mod types;

/// WebDriver browser control
pub mod webdriver;

/// Automatic WebDriver process management
pub mod webdriver_manager;

pub use config::{BrowserConfig, ExtractorConfig, Probe, ScrapeOptions, Selectors};
pub use count::parse_count;
pub use errors::{FieldError, LoadError, ProbeError};
pub use extractor::ProfileExtractor;
pub use normalize::normalize;
pub use page::{PageLoader, RenderedPage};
pub use scraper::ProfileScraper;
pub use types::{OutputFormat, ProfileRecord, ViewportSize};
pub use webdriver::{Browser, BrowserType, WebDriverLoader};
