//! Curation requests.
//!
//! A request is built once per URL and never mutated afterwards; batch
//! processing derives new values from shared [`CurationOptions`] instead.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Options shared by every URL of one invocation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurationOptions {
    /// Base directory for content, instead of the configured default
    pub output_dir: Option<PathBuf>,

    /// Directory name to use instead of one derived from the title
    pub name: Option<String>,

    /// Keep navigation, footers, etc. instead of only the main content
    pub full_content: bool,

    /// Ignore any cached result and fetch again
    pub force_refresh: bool,

    /// Download the page's images next to the document
    pub download_media: bool,
}

impl CurationOptions {
    /// Copy of these options without the directory name override
    pub fn without_name(&self) -> Self {
        Self {
            name: None,
            ..self.clone()
        }
    }

    /// Build the request for a single URL
    pub fn for_url(&self, url: impl Into<String>) -> CurationRequest {
        CurationRequest {
            url: url.into(),
            options: self.clone(),
        }
    }
}

/// One URL to curate, with the options that apply to it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurationRequest {
    pub url: String,

    #[serde(flatten)]
    pub options: CurationOptions,
}

impl CurationRequest {
    /// Request with default options
    pub fn new(url: impl Into<String>) -> Self {
        CurationOptions::default().for_url(url)
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.options.output_dir = Some(dir.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.options.name = Some(name.into());
        self
    }

    pub fn with_full_content(mut self, full: bool) -> Self {
        self.options.full_content = full;
        self
    }

    pub fn with_force_refresh(mut self, refresh: bool) -> Self {
        self.options.force_refresh = refresh;
        self
    }

    pub fn with_download_media(mut self, media: bool) -> Self {
        self.options.download_media = media;
        self
    }
}
