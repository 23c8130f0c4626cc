//! Page content returned by a scraper.

use serde::{Deserialize, Serialize};

/// Title used when the page metadata has none
pub const DEFAULT_TITLE: &str = "Untitled";

/// An image referenced by a fetched page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRef {
    pub image_url: String,

    /// 1-based position declared by the source, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<usize>,
}

impl ImageRef {
    pub fn new(image_url: impl Into<String>) -> Self {
        Self {
            image_url: image_url.into(),
            position: None,
        }
    }

    pub fn with_position(image_url: impl Into<String>, position: usize) -> Self {
        Self {
            image_url: image_url.into(),
            position: Some(position),
        }
    }
}

/// Successfully fetched page, ready to be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedContent {
    pub title: String,
    pub description: Option<String>,
    pub markdown: String,
    pub images: Vec<ImageRef>,
}
