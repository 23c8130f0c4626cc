//! Curation orchestrator.
//!
//! Coordinates cache lookups, scraping, document writes, image downloads
//! and cache updates for one URL, and fans out over many URLs.
//! Reporting to the user is left to the caller; events here are debug only.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use futures::future::join_all;
use tracing::{debug, instrument};

use crate::adapters::{ScrapeRequest, Scraper};
use crate::config::Config;
use crate::domain::{BatchSummary, Curation, CurationOptions, CurationOutcome, CurationRequest};
use crate::library::{
    create_content_dir, derive_name, write_markdown, CacheEntry, CacheStore, Frontmatter,
    ImageFetcher, CONTENT_FILE,
};

use super::error::CurationError;

/// Settings the orchestrator takes from configuration
#[derive(Debug, Clone)]
pub struct CuratorSettings {
    /// Base directory when a request has no output override
    pub default_output_dir: PathBuf,

    /// Consult and update the cache
    pub cache_enabled: bool,

    /// Relative output directories are resolved against this
    pub working_dir: PathBuf,
}

impl CuratorSettings {
    /// Settings from config, resolved against the current directory
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            default_output_dir: config.default_output_dir(),
            cache_enabled: config.is_cache_enabled(),
            working_dir: std::env::current_dir()
                .context("Failed to determine current directory")?,
        })
    }
}

/// Main curation orchestrator
pub struct Curator {
    scraper: Arc<dyn Scraper>,
    cache: Arc<dyn CacheStore>,
    images: ImageFetcher,
    settings: CuratorSettings,
}

impl Curator {
    /// Create a new orchestrator
    pub fn new(
        scraper: Arc<dyn Scraper>,
        cache: Arc<dyn CacheStore>,
        settings: CuratorSettings,
    ) -> Self {
        Self {
            scraper,
            cache,
            images: ImageFetcher::new(),
            settings,
        }
    }

    /// Replace the image fetcher (custom redirect limit)
    pub fn with_image_fetcher(mut self, images: ImageFetcher) -> Self {
        self.images = images;
        self
    }

    pub fn settings(&self) -> &CuratorSettings {
        &self.settings
    }

    /// Curate a single URL.
    ///
    /// Never fails: every error becomes a failed outcome.
    #[instrument(skip(self, request), fields(url = %request.url))]
    pub async fn curate_one(&self, request: &CurationRequest) -> CurationOutcome {
        match self.try_curate(request).await {
            Ok(outcome) => outcome,
            Err(e) => {
                debug!(error = %e, "Failed to process URL");
                CurationOutcome::failed(&request.url, e.to_string())
            }
        }
    }

    async fn try_curate(&self, request: &CurationRequest) -> Result<CurationOutcome, CurationError> {
        let url = request.url.as_str();
        let options = &request.options;

        // Fast path: no network, no files
        if !options.force_refresh && self.settings.cache_enabled {
            if let Some(cached) = self.cache.get(url).await {
                debug!(title = %cached.title, path = %cached.output_path.join(CONTENT_FILE).display(), "Already cached");
                return Ok(CurationOutcome::cached(url, cached.title, cached.output_path));
            }
        }

        let scrape = ScrapeRequest::new(url, options.download_media, !options.full_content);
        debug!(scraper = self.scraper.name(), formats = ?scrape.formats, "Fetching content");

        let response = self
            .scraper
            .scrape(&scrape)
            .await
            .map_err(|e| CurationError::Fetch(format!("{:#}", e)))?;
        let content = response.into_content().map_err(CurationError::Fetch)?;
        debug!(title = %content.title, "Fetched");

        let dir_name = options
            .name
            .clone()
            .unwrap_or_else(|| derive_name(&content.title, url));
        let base_dir = options
            .output_dir
            .clone()
            .unwrap_or_else(|| self.settings.default_output_dir.clone());

        let content_dir = create_content_dir(&self.settings.working_dir, &base_dir, &dir_name)
            .await
            .map_err(|e| {
                CurationError::io(self.settings.working_dir.join(&base_dir).join(&dir_name), e)
            })?;

        let document = content_dir.join(CONTENT_FILE);
        let frontmatter = Frontmatter::new(url, content.title.clone(), content.description.clone());
        write_markdown(&document, &content.markdown, &frontmatter)
            .await
            .map_err(|e| CurationError::io(&document, e))?;
        debug!(path = %document.display(), "Saved");

        let mut outcome = CurationOutcome::fetched(url, content.title.clone(), content_dir.clone());

        if options.download_media && !content.images.is_empty() {
            debug!(count = content.images.len(), "Downloading images");
            let tally = self.images.fetch_all(&content.images, &content_dir).await;
            debug!(downloaded = tally.downloaded, failed = tally.failed, "Images settled");
            outcome = outcome.with_images(tally);
        }

        if self.settings.cache_enabled {
            let entry = CacheEntry {
                url: url.to_string(),
                dir_name,
                title: content.title,
                fetched_at: Utc::now(),
                output_path: content_dir,
                content_hash: self.cache.hash(&content.markdown),
            };
            self.cache
                .set(url, entry)
                .await
                .map_err(|e| CurationError::Cache(format!("{:#}", e)))?;
        }

        Ok(outcome)
    }

    /// Curate one or more URLs.
    ///
    /// A single URL yields [`Curation::Single`]; several run concurrently
    /// and yield a [`Curation::Batch`] in request order. Repeated URLs are
    /// curated once and share their outcome.
    pub async fn curate_many(&self, urls: &[String], options: &CurationOptions) -> Curation {
        let name_ignored = options.name.is_some() && urls.len() > 1;
        let options = if name_ignored {
            debug!(count = urls.len(), "Name override dropped for multiple URLs");
            options.without_name()
        } else {
            options.clone()
        };

        if let [url] = urls {
            return Curation::Single(self.curate_one(&options.for_url(url.as_str())).await);
        }

        debug!(count = urls.len(), "Processing URLs in parallel");

        let mut seen = HashSet::new();
        let requests: Vec<CurationRequest> = urls
            .iter()
            .filter(|url| seen.insert(url.as_str()))
            .map(|url| options.for_url(url.as_str()))
            .collect();
        if requests.len() < urls.len() {
            debug!(duplicates = urls.len() - requests.len(), "Joining duplicate URLs");
        }

        let settled = join_all(requests.iter().map(|request| self.curate_one(request))).await;
        let by_url: HashMap<&str, &CurationOutcome> = requests
            .iter()
            .map(|request| request.url.as_str())
            .zip(settled.iter())
            .collect();

        let outcomes = urls
            .iter()
            .map(|url| match by_url.get(url.as_str()) {
                Some(outcome) => (*outcome).clone(),
                None => CurationOutcome::failed(url.as_str(), "URL was not processed"),
            })
            .collect();

        Curation::Batch(BatchSummary {
            outcomes,
            name_ignored,
        })
    }
}
