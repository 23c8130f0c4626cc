//! curator - Curate web pages into local markdown
//!
//! Fetches pages through the Firecrawl content-extraction API, writes them
//! as markdown documents with YAML frontmatter, optionally downloads their
//! images, and remembers what was fetched so repeat requests skip the
//! network.
//!
//! # Modules
//!
//! - `adapters`: Scraper trait and the Firecrawl client
//! - `core`: Orchestration (Curator, CurationError)
//! - `domain`: Data structures (CurationRequest, CurationOutcome, BatchSummary)
//! - `library`: Local storage (naming, documents, images, cache)
//! - `config`: Config file and environment
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Curate a page
//! curator curate https://example.com/post
//!
//! # Several pages at once, with images
//! curator curate https://a.example https://b.example --media
//!
//! # Ignore the cache
//! curator curate https://example.com/post --refresh
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod library;

// Re-export main types at crate root for convenience
pub use adapters::{FirecrawlClient, ScrapeRequest, ScrapeResponse, Scraper};
pub use core::{CurationError, Curator, CuratorSettings};
pub use domain::{BatchSummary, Curation, CurationOptions, CurationOutcome, CurationRequest};
pub use library::{CacheEntry, CacheStore, FileCache, ImageFetcher};
