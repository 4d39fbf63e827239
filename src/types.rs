use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// Output format for CLI results
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// JSON format for programmatic consumption
    #[default]
    Json,
    /// Human-readable simple format
    Simple,
}

/// Public attributes scraped from one profile page.
///
/// Every field except `source_url` is independently optional; a field that
/// could not be resolved serializes as `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRecord {
    /// Normalized profile URL the page was loaded from
    #[serde(rename = "tiktok_url")]
    pub source_url: String,
    /// Display name shown on the profile
    pub name: Option<String>,
    /// First contact email found in the bio
    pub email: Option<String>,
    /// Follower count, resolved from the abbreviated form
    pub followers: Option<u64>,
    /// Total like count, resolved from the abbreviated form
    pub likes: Option<u64>,
    /// Raw `href` of the outbound profile link
    pub website_link: Option<String>,
}

impl ProfileRecord {
    /// A record with nothing resolved yet
    pub fn empty(source_url: impl Into<String>) -> Self {
        ProfileRecord {
            source_url: source_url.into(),
            ..Default::default()
        }
    }

    /// Number of optional fields that were resolved
    pub fn resolved_fields(&self) -> usize {
        [
            self.name.is_some(),
            self.email.is_some(),
            self.followers.is_some(),
            self.likes.is_some(),
            self.website_link.is_some(),
        ]
        .into_iter()
        .filter(|resolved| *resolved)
        .count()
    }

    /// Render the record in the requested output format
    pub fn render(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(self)?),
            OutputFormat::Simple => Ok(self.render_simple()),
        }
    }

    fn render_simple(&self) -> String {
        fn line(out: &mut String, label: &str, value: Option<String>) {
            let value = value.unwrap_or_else(|| "-".to_string());
            let _ = writeln!(out, "{label:<10} {value}");
        }

        let mut out = String::new();
        line(&mut out, "Profile:", Some(self.source_url.clone()));
        line(&mut out, "Name:", self.name.clone());
        line(&mut out, "Email:", self.email.clone());
        line(&mut out, "Followers:", self.followers.map(|n| n.to_string()));
        line(&mut out, "Likes:", self.likes.map(|n| n.to_string()));
        line(&mut out, "Website:", self.website_link.clone());
        out
    }
}

/// Browser window dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewportSize {
    /// Viewport width in pixels
    pub width: u32,
    /// Viewport height in pixels
    pub height: u32,
}

impl ViewportSize {
    /// Parse viewport size from "WIDTHxHEIGHT" format (e.g., "1920x1080")
    pub fn parse(s: &str) -> Result<Self> {
        let (width, height) = s
            .split_once('x')
            .ok_or_else(|| anyhow::anyhow!("Invalid viewport format. Use WIDTHxHEIGHT (e.g., 1920x1080)"))?;

        let width = width
            .parse::<u32>()
            .map_err(|_| anyhow::anyhow!("Invalid width in viewport size"))?;
        let height = height
            .parse::<u32>()
            .map_err(|_| anyhow::anyhow!("Invalid height in viewport size"))?;

        Ok(ViewportSize { width, height })
    }
}

impl std::str::FromStr for ViewportSize {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        ViewportSize::parse(s)
    }
}

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;
