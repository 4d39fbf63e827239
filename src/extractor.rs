use std::time::Duration;

use tracing::{debug, info};

use crate::config::{ExtractorConfig, Probe};
use crate::count::parse_count;
use crate::email;
use crate::errors::FieldError;
use crate::page::RenderedPage;
use crate::types::ProfileRecord;

/// Resolves profile fields from a rendered page.
///
/// Each field is resolved independently through its selector chain. A field
/// that cannot be resolved is left `None`; nothing here returns an error.
#[derive(Debug, Clone, Default)]
pub struct ProfileExtractor {
    config: ExtractorConfig,
}

impl ProfileExtractor {
    pub fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Run every field rule against `page`, one after another
    pub async fn extract<P: RenderedPage>(&self, page: &P, source_url: &str) -> ProfileRecord {
        let mut record = ProfileRecord::empty(source_url);

        record.name = settle("name", self.name(page).await);
        record.followers = settle(
            "followers",
            self.count(page, &self.config.selectors.followers).await,
        );
        record.likes = settle("likes", self.count(page, &self.config.selectors.likes).await);
        record.website_link = settle("website_link", self.website(page).await);
        record.email = settle("email", self.email(page).await);

        info!(
            "Resolved {}/5 fields for {}",
            record.resolved_fields(),
            source_url
        );
        record
    }

    async fn name<P: RenderedPage>(&self, page: &P) -> Result<String, FieldError> {
        let raw = first_text(page, &self.config.selectors.name, self.config.name_wait).await?;
        Ok(collapse_whitespace(&raw))
    }

    async fn count<P: RenderedPage>(&self, page: &P, chain: &[Probe]) -> Result<u64, FieldError> {
        let text = first_readable_text(page, chain, self.config.count_wait).await?;
        parse_count(&text)
    }

    async fn website<P: RenderedPage>(&self, page: &P) -> Result<String, FieldError> {
        let mut last_err = None;
        for probe in &self.config.selectors.website {
            match read_attribute(page, probe, "href", self.config.count_wait).await {
                Ok(Some(href)) if !href.trim().is_empty() => return Ok(href),
                Ok(_) => last_err = Some(FieldError::NotFound(format!("{}[href]", probe.selector))),
                Err(e) => last_err = Some(e),
            }
        }
        Err(exhausted(last_err))
    }

    async fn email<P: RenderedPage>(&self, page: &P) -> Result<String, FieldError> {
        let bio = self.config.selectors.bio.as_str();
        page.wait_for(bio, self.config.bio_wait).await?;

        if self.config.expand_bio
            && let Err(e) = page.click(&self.config.selectors.bio_expand).await
        {
            debug!("Bio expand control not clicked: {}", e);
        }

        // Priority: bio text, bio markup, whole page. Each source is only
        // fetched when the previous one had no match.
        let text = page.text(bio).await.unwrap_or_default();
        if let Some(found) = email::find_email(&text) {
            debug!("Email found in bio text");
            return Ok(found.to_string());
        }

        let markup = page.inner_html(bio).await.unwrap_or_default();
        if let Some(found) = email::find_email(&markup) {
            debug!("Email found in bio markup");
            return Ok(found.to_string());
        }

        let source = page.source().await?;
        if let Some(found) = email::find_email(&source) {
            debug!("Email found in page source");
            return Ok(found.to_string());
        }

        Err(FieldError::NotFound(format!("email in {bio}")))
    }
}

/// Field boundary: log the failure and turn it into absence
fn settle<T>(field: &str, result: Result<T, FieldError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            debug!("Could not resolve {}: {}", field, e);
            None
        }
    }
}

/// Text of the first probe in `chain` that yields non-empty text
async fn first_text<P: RenderedPage>(
    page: &P,
    chain: &[Probe],
    wait: Duration,
) -> Result<String, FieldError> {
    let mut last_err = None;
    for probe in chain {
        if probe.wait
            && let Err(e) = page.wait_for(&probe.selector, wait).await
        {
            last_err = Some(e);
            continue;
        }

        match page.text(&probe.selector).await {
            Ok(text) if !text.trim().is_empty() => return Ok(text),
            Ok(_) => last_err = Some(FieldError::NotFound(format!("text of {}", probe.selector))),
            Err(e) => last_err = Some(e),
        }
    }
    Err(exhausted(last_err))
}

/// Text of the first probe in `chain` that can be read, blank included
async fn first_readable_text<P: RenderedPage>(
    page: &P,
    chain: &[Probe],
    wait: Duration,
) -> Result<String, FieldError> {
    let mut last_err = None;
    for probe in chain {
        if probe.wait
            && let Err(e) = page.wait_for(&probe.selector, wait).await
        {
            last_err = Some(e);
            continue;
        }

        match page.text(&probe.selector).await {
            Ok(text) => return Ok(text),
            Err(e) => last_err = Some(e),
        }
    }
    Err(exhausted(last_err))
}

async fn read_attribute<P: RenderedPage>(
    page: &P,
    probe: &Probe,
    name: &str,
    wait: Duration,
) -> Result<Option<String>, FieldError> {
    if probe.wait {
        page.wait_for(&probe.selector, wait).await?;
    }
    page.attribute(&probe.selector, name).await
}

fn exhausted(last_err: Option<FieldError>) -> FieldError {
    last_err.unwrap_or_else(|| FieldError::NotFound("empty selector chain".to_string()))
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
