//! Domain types for curator.
//!
//! This module contains the core data structures:
//! - Requests: What to curate and how
//! - Content: Pages as returned by a scraper
//! - Outcomes: Per-URL results and batch summaries

pub mod content;
pub mod outcome;
pub mod request;

// Re-export commonly used types
pub use content::{FetchedContent, ImageRef, DEFAULT_TITLE};
pub use outcome::{BatchSummary, Curation, CurationOutcome};
pub use request::{CurationOptions, CurationRequest};
