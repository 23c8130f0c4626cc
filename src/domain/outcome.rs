//! Results of curating one or many URLs.

use std::path::PathBuf;
use std::process::ExitCode;

use serde::{Deserialize, Serialize};

use crate::library::ImageTally;

/// What happened to one URL during one invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurationOutcome {
    pub url: String,

    pub succeeded: bool,

    /// Page title (successes only)
    pub title: Option<String>,

    /// Human-readable failure reason (failures only)
    pub error_message: Option<String>,

    /// Content directory holding `CONTENT.md`
    pub output_dir: Option<PathBuf>,

    /// Served from the cache without a network call
    #[serde(default)]
    pub from_cache: bool,

    /// Image download counts, when media was requested and present
    pub images: Option<ImageTally>,
}

impl CurationOutcome {
    /// Freshly fetched and written
    pub fn fetched(url: impl Into<String>, title: impl Into<String>, output_dir: PathBuf) -> Self {
        Self {
            url: url.into(),
            succeeded: true,
            title: Some(title.into()),
            error_message: None,
            output_dir: Some(output_dir),
            from_cache: false,
            images: None,
        }
    }

    /// Answered from a prior curation
    pub fn cached(url: impl Into<String>, title: impl Into<String>, output_dir: PathBuf) -> Self {
        Self {
            from_cache: true,
            ..Self::fetched(url, title, output_dir)
        }
    }

    pub fn failed(url: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            succeeded: false,
            title: None,
            error_message: Some(error.into()),
            output_dir: None,
            from_cache: false,
            images: None,
        }
    }

    pub fn with_images(mut self, images: ImageTally) -> Self {
        self.images = Some(images);
        self
    }
}

/// Aggregate of a multi-URL run, in request order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub outcomes: Vec<CurationOutcome>,

    /// A name override was supplied and dropped because of multiple URLs
    #[serde(default)]
    pub name_ignored: bool,
}

impl BatchSummary {
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn successful(&self) -> usize {
        self.outcomes.iter().filter(|o| o.succeeded).count()
    }

    pub fn failed(&self) -> usize {
        self.total() - self.successful()
    }

    /// `(url, error)` for each failed URL
    pub fn failures(&self) -> impl Iterator<Item = (&str, &str)> {
        self.outcomes.iter().filter(|o| !o.succeeded).map(|o| {
            (
                o.url.as_str(),
                o.error_message.as_deref().unwrap_or("unknown error"),
            )
        })
    }
}

/// Result of an invocation; the entry point maps it to an exit status
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Curation {
    Single(CurationOutcome),
    Batch(BatchSummary),
}

impl Curation {
    /// Only a failed single-URL curation counts as a process failure
    pub fn is_failure(&self) -> bool {
        matches!(self, Curation::Single(outcome) if !outcome.succeeded)
    }

    pub fn exit_code(&self) -> ExitCode {
        if self.is_failure() {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        }
    }
}
