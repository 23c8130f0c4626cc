//! Local storage for curated content.
//!
//! # Storage Layout
//!
//! ```text
//! <output_dir>/
//! └── <dir_name>/              # derived from the page title
//!     ├── CONTENT.md           # frontmatter + markdown body
//!     └── <image files>        # only with --media
//!
//! ~/.curator/
//! ├── config.yaml
//! └── cache.json               # URL -> prior curation
//! ```

pub mod cache;
pub mod content;
pub mod images;
pub mod naming;

pub use cache::{hash_content, CacheEntry, CacheStore, FileCache, NoCache};
pub use content::{create_content_dir, write_markdown, Frontmatter, CONTENT_FILE};
pub use images::{DownloadError, ImageFetcher, ImageTally, MAX_REDIRECTS};
pub use naming::{derive_name, derive_name_at, image_filename, image_position};
