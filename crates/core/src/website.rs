//! Marketing-site context for the agent crews.
//!
//! The site is fetched fresh for each request and reduced to a short list of
//! text lines (title, meta description and the longer body text blocks) that
//! are pasted into the agents' prompts.

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use scraper::{Html, Selector};
use std::time::Duration;
use tracing::{debug, warn};

/// Returned when the site cannot be fetched or parsed.
pub const NO_WEBSITE_DATA: &str = "No website data available.";

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";
const MIN_TEXT_LEN: usize = 20;
const MAX_LINES: usize = 50;
const CONTENT_SELECTOR: &str = "p, li, div, h1, h2, h3, h4, h5, h6";
const HIGHLIGHT_WORDS: &[&str] = &["hour", "duration", "time", "course", "price", "cost", "999"];

/// Anything that can supply website context for a prompt.
#[async_trait]
pub trait WebsiteSource: Send + Sync {
    /// Never fails; returns [`NO_WEBSITE_DATA`] when nothing could be gathered.
    async fn site_context(&self) -> String;
}

pub struct WebsiteScraper {
    client: reqwest::Client,
    url: String,
}

impl WebsiteScraper {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to build website HTTP client")?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    async fn fetch(&self) -> Result<String> {
        let html = self
            .client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(html)
    }
}

#[async_trait]
impl WebsiteSource for WebsiteScraper {
    async fn site_context(&self) -> String {
        let lines = match self.fetch().await.and_then(|html| extract_site_text(&html)) {
            Ok(lines) => lines,
            Err(e) => {
                warn!(url = %self.url, error = ?e, "Failed to gather website context");
                return NO_WEBSITE_DATA.to_string();
            }
        };
        debug!(url = %self.url, lines = lines.len(), "Gathered website context");
        if lines.is_empty() {
            NO_WEBSITE_DATA.to_string()
        } else {
            lines.join("\n")
        }
    }
}

/// A fixed context string, for tests and offline runs.
pub struct StaticWebsite(pub String);

#[async_trait]
impl WebsiteSource for StaticWebsite {
    async fn site_context(&self) -> String {
        self.0.clone()
    }
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| anyhow!("Invalid selector '{}': {}", css, e))
}

/// Reduces an HTML page to at most 50 context lines.
pub fn extract_site_text(html: &str) -> Result<Vec<String>> {
    let document = Html::parse_document(html);
    let title = selector("title")?;
    let description = selector(r#"meta[name="description"]"#)?;
    let main = selector("main")?;
    let body = selector("body")?;
    let content = selector(CONTENT_SELECTOR)?;

    let mut lines = Vec::new();

    if let Some(el) = document.select(&title).next() {
        lines.push(format!("Website Title: {}", el.text().collect::<String>().trim()));
    }
    if let Some(el) = document.select(&description).next() {
        let text = el.value().attr("content").unwrap_or_default().trim();
        lines.push(format!("Description: {}", text));
    }

    let root = document
        .select(&main)
        .next()
        .or_else(|| document.select(&body).next());
    if let Some(root) = root {
        for el in root.select(&content) {
            let text = el.text().collect::<String>();
            let text = text.trim();
            if text.chars().count() <= MIN_TEXT_LEN {
                continue;
            }
            let lower = text.to_lowercase();
            if HIGHLIGHT_WORDS.iter().any(|w| lower.contains(w)) {
                lines.push(format!("Important: {}", text));
            } else {
                lines.push(text.to_string());
            }
        }
    }

    lines.truncate(MAX_LINES);
    Ok(lines)
}
