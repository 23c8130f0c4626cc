//! Core curation logic.
//!
//! This module contains:
//! - Curator: Per-URL and batch orchestration
//! - CurationError: Reasons a URL fails to curate

pub mod error;
pub mod orchestrator;

// Re-export commonly used types
pub use error::CurationError;
pub use orchestrator::{Curator, CuratorSettings};
