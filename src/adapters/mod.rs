//! Adapter interfaces for external systems.
//!
//! Adapters provide a unified interface for fetching page content from
//! content-extraction services like Firecrawl.

pub mod firecrawl;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{FetchedContent, ImageRef, DEFAULT_TITLE};

// Re-export the Firecrawl adapter
pub use firecrawl::FirecrawlClient;

/// Output formats a scraper can be asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Markdown,
    Images,
}

/// A scrape call for one URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeRequest {
    pub url: String,
    pub formats: Vec<Format>,
    pub only_main_content: bool,
}

impl ScrapeRequest {
    /// Markdown always, images only when media is wanted
    pub fn new(url: impl Into<String>, include_images: bool, only_main_content: bool) -> Self {
        let mut formats = vec![Format::Markdown];
        if include_images {
            formats.push(Format::Images);
        }

        Self {
            url: url.into(),
            formats,
            only_main_content,
        }
    }
}

/// Page metadata reported by the scraper
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMetadata {
    pub title: Option<String>,
    pub description: Option<String>,
}

/// What a scraper returns for one URL
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapeResponse {
    pub success: bool,
    pub error: Option<String>,
    pub metadata: Option<PageMetadata>,
    pub markdown: Option<String>,
    pub images: Option<Vec<ImageRef>>,
}

impl ScrapeResponse {
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            ..Default::default()
        }
    }

    /// Convert a successful response into content, or return the failure message
    pub fn into_content(self) -> Result<FetchedContent, String> {
        if !self.success {
            return Err(self
                .error
                .filter(|e| !e.is_empty())
                .unwrap_or_else(|| "Failed to fetch content".to_string()));
        }

        let metadata = self.metadata.unwrap_or_default();
        Ok(FetchedContent {
            title: metadata
                .title
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            description: metadata.description.filter(|d| !d.is_empty()),
            markdown: self.markdown.unwrap_or_default(),
            images: self.images.unwrap_or_default(),
        })
    }
}

/// Trait for content-extraction services
#[async_trait]
pub trait Scraper: Send + Sync {
    /// Human-readable adapter name
    fn name(&self) -> &str;

    /// Fetch a page.
    ///
    /// `Err` means the call itself broke (network, decoding); a service-side
    /// refusal comes back as `Ok` with `success: false`.
    async fn scrape(&self, request: &ScrapeRequest) -> Result<ScrapeResponse>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_formats() {
        let plain = ScrapeRequest::new("https://example.com", false, true);
        assert_eq!(plain.formats, vec![Format::Markdown]);

        let media = ScrapeRequest::new("https://example.com", true, false);
        assert_eq!(media.formats, vec![Format::Markdown, Format::Images]);
    }

    #[test]
    fn test_request_wire_shape() {
        let request = ScrapeRequest::new("https://example.com", true, true);
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "url": "https://example.com",
                "formats": ["markdown", "images"],
                "onlyMainContent": true
            })
        );
    }

    #[test]
    fn test_into_content_defaults_title() {
        let response = ScrapeResponse {
            success: true,
            metadata: Some(PageMetadata {
                title: Some(String::new()),
                description: Some("desc".to_string()),
            }),
            markdown: Some("# Body".to_string()),
            ..Default::default()
        };

        let content = response.into_content().unwrap();
        assert_eq!(content.title, "Untitled");
        assert_eq!(content.description.as_deref(), Some("desc"));
        assert_eq!(content.markdown, "# Body");
        assert!(content.images.is_empty());
    }

    #[test]
    fn test_into_content_failure_message() {
        let err = ScrapeResponse::failure("rate limited").into_content().unwrap_err();
        assert_eq!(err, "rate limited");

        let err = ScrapeResponse::default().into_content().unwrap_err();
        assert_eq!(err, "Failed to fetch content");
    }
}
