//! Firecrawl scrape API adapter.
//!
//! Calls `POST /v1/scrape` and unwraps Firecrawl's `{success, data, error}`
//! envelope into a [`ScrapeResponse`].

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::{PageMetadata, ScrapeRequest, ScrapeResponse, Scraper};
use crate::domain::ImageRef;

/// Default Firecrawl API root
pub const DEFAULT_API_URL: &str = "https://api.firecrawl.dev";

/// Firecrawl API client
pub struct FirecrawlClient {
    /// API key sent as a bearer token
    api_key: String,
    /// API root, without trailing slash
    base_url: String,
    /// HTTP client
    client: reqwest::Client,
}

/// Response envelope from Firecrawl
#[derive(Debug, Deserialize)]
struct FirecrawlResponse {
    #[serde(default)]
    success: bool,
    data: Option<FirecrawlData>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FirecrawlData {
    markdown: Option<String>,
    metadata: Option<PageMetadata>,
    images: Option<Vec<WireImage>>,
}

/// Images arrive either as bare URLs or as objects
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WireImage {
    Url(String),
    Object {
        #[serde(alias = "imageUrl")]
        url: String,
        position: Option<usize>,
    },
}

impl From<WireImage> for ImageRef {
    fn from(image: WireImage) -> Self {
        match image {
            WireImage::Url(url) => ImageRef::new(url),
            WireImage::Object { url, position } => ImageRef {
                image_url: url,
                position,
            },
        }
    }
}

impl FirecrawlResponse {
    fn into_response(self) -> ScrapeResponse {
        if !self.success {
            return ScrapeResponse {
                success: false,
                error: self.error,
                ..Default::default()
            };
        }

        let data = self.data.unwrap_or(FirecrawlData {
            markdown: None,
            metadata: None,
            images: None,
        });

        ScrapeResponse {
            success: true,
            error: None,
            metadata: data.metadata,
            markdown: data.markdown,
            images: data
                .images
                .map(|images| images.into_iter().map(ImageRef::from).collect()),
        }
    }
}

impl FirecrawlClient {
    /// Create a client against the public Firecrawl API
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, DEFAULT_API_URL)
    }

    /// Create a client against a custom API root (self-hosted or test server)
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Build API URL
    fn api_url(&self, endpoint: &str) -> String {
        format!("{}/v1/{}", self.base_url, endpoint)
    }
}

#[async_trait]
impl Scraper for FirecrawlClient {
    fn name(&self) -> &str {
        "firecrawl"
    }

    async fn scrape(&self, request: &ScrapeRequest) -> Result<ScrapeResponse> {
        let url = self.api_url("scrape");
        debug!(target_url = %request.url, "Requesting Firecrawl scrape");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .with_context(|| format!("Failed to reach Firecrawl for {}", request.url))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .context("Failed to read Firecrawl response")?;

        match serde_json::from_str::<FirecrawlResponse>(&body) {
            Ok(parsed) => Ok(parsed.into_response()),
            Err(_) if !status.is_success() => {
                Ok(ScrapeResponse::failure(format!("HTTP {}", status.as_u16())))
            }
            Err(e) => Err(e).context("Failed to parse Firecrawl response"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_api_url() {
        let client = FirecrawlClient::with_base_url("KEY", "https://firecrawl.local/");
        assert_eq!(client.api_url("scrape"), "https://firecrawl.local/v1/scrape");
        assert_eq!(client.name(), "firecrawl");
    }

    #[tokio::test]
    async fn test_scrape_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/scrape"))
            .and(header("Authorization", "Bearer KEY"))
            .and(body_json(serde_json::json!({
                "url": "https://example.com/post",
                "formats": ["markdown", "images"],
                "onlyMainContent": true
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true,
                "data": {
                    "markdown": "# Post",
                    "metadata": { "title": "Post", "description": "About", "statusCode": 200 },
                    "images": [
                        "https://cdn.example.com/a.png",
                        { "url": "https://cdn.example.com/b", "position": 4 }
                    ]
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = FirecrawlClient::with_base_url("KEY", server.uri());
        let response = client
            .scrape(&ScrapeRequest::new("https://example.com/post", true, true))
            .await
            .unwrap();

        assert!(response.success);
        assert_eq!(response.markdown.as_deref(), Some("# Post"));
        let metadata = response.metadata.unwrap();
        assert_eq!(metadata.title.as_deref(), Some("Post"));
        assert_eq!(metadata.description.as_deref(), Some("About"));
        assert_eq!(
            response.images.unwrap(),
            vec![
                ImageRef::new("https://cdn.example.com/a.png"),
                ImageRef::with_position("https://cdn.example.com/b", 4),
            ]
        );
    }

    #[tokio::test]
    async fn test_scrape_reported_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(402).set_body_json(serde_json::json!({
                "success": false,
                "error": "Payment required"
            })))
            .mount(&server)
            .await;

        let client = FirecrawlClient::with_base_url("KEY", server.uri());
        let response = client
            .scrape(&ScrapeRequest::new("https://example.com", false, true))
            .await
            .unwrap();

        assert!(!response.success);
        assert_eq!(response.error.as_deref(), Some("Payment required"));
    }

    #[tokio::test]
    async fn test_non_json_error_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
            .mount(&server)
            .await;

        let client = FirecrawlClient::with_base_url("KEY", server.uri());
        let response = client
            .scrape(&ScrapeRequest::new("https://example.com", false, true))
            .await
            .unwrap();

        assert!(!response.success);
        assert_eq!(response.error.as_deref(), Some("HTTP 502"));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_an_error() {
        let client = FirecrawlClient::with_base_url("KEY", "http://127.0.0.1:9");
        let result = client
            .scrape(&ScrapeRequest::new("https://example.com", false, true))
            .await;
        assert!(result.is_err());
    }
}
