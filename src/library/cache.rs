//! URL-keyed cache of prior curation results.
//!
//! The cache lets repeat curations of a URL skip the network entirely.
//! Entries are only ever added or overwritten, never expired.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::debug;

/// Result of a successful curation, keyed by its URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Curated URL (the cache key)
    pub url: String,

    /// Name of the content directory
    pub dir_name: String,

    /// Page title at the time of curation
    pub title: String,

    /// When the page was fetched
    pub fetched_at: DateTime<Utc>,

    /// Absolute path of the content directory
    pub output_path: PathBuf,

    /// Digest of the markdown body
    pub content_hash: String,
}

/// Contract the orchestrator relies on
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Look up the entry for a URL
    async fn get(&self, url: &str) -> Option<CacheEntry>;

    /// Check whether a URL has been curated before
    async fn has(&self, url: &str) -> bool {
        self.get(url).await.is_some()
    }

    /// Insert or replace the entry for a URL, persisting the change
    async fn set(&self, url: &str, entry: CacheEntry) -> Result<()>;

    /// Digest used to detect content changes
    fn hash(&self, content: &str) -> String {
        hash_content(content)
    }
}

/// SHA-256 of the content, hex encoded
pub fn hash_content(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}

/// On-disk document layout
#[derive(Debug, Default, Serialize, Deserialize)]
struct CacheFile {
    version: u32,
    #[serde(default)]
    entries: HashMap<String, CacheEntry>,
}

/// JSON-file backed cache, loaded once and rewritten on every `set`
pub struct FileCache {
    path: PathBuf,
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl FileCache {
    /// Open the cache file, starting empty if it does not exist yet
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        let entries = if path.exists() {
            let content = fs::read_to_string(&path)
                .await
                .with_context(|| format!("Failed to read cache: {}", path.display()))?;
            let file: CacheFile = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse cache: {}", path.display()))?;
            file.entries
        } else {
            HashMap::new()
        };

        debug!(path = %path.display(), entries = entries.len(), "Loaded cache");

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All entries, most recently fetched first
    pub async fn entries(&self) -> Vec<CacheEntry> {
        let mut items: Vec<_> = self.entries.lock().await.values().cloned().collect();
        items.sort_by(|a, b| b.fetched_at.cmp(&a.fetched_at));
        items
    }

    /// Number of cached URLs
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    /// Check if nothing has been cached
    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }

    async fn persist(&self, entries: &HashMap<String, CacheEntry>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create cache directory: {}", parent.display()))?;
        }

        let document = CacheFile {
            version: 1,
            entries: entries.clone(),
        };
        let content = serde_json::to_string_pretty(&document)?;
        fs::write(&self.path, content)
            .await
            .with_context(|| format!("Failed to write cache: {}", self.path.display()))?;

        Ok(())
    }
}

#[async_trait]
impl CacheStore for FileCache {
    async fn get(&self, url: &str) -> Option<CacheEntry> {
        self.entries.lock().await.get(url).cloned()
    }

    async fn set(&self, url: &str, entry: CacheEntry) -> Result<()> {
        // Held across the write so concurrent sets cannot interleave on disk
        let mut entries = self.entries.lock().await;
        let mut updated = entries.clone();
        updated.insert(url.to_string(), entry);
        self.persist(&updated).await?;
        *entries = updated;
        Ok(())
    }
}

/// Store used when caching is disabled: never hits, never writes
#[derive(Debug, Default, Clone, Copy)]
pub struct NoCache;

#[async_trait]
impl CacheStore for NoCache {
    async fn get(&self, _url: &str) -> Option<CacheEntry> {
        None
    }

    async fn set(&self, _url: &str, _entry: CacheEntry) -> Result<()> {
        Ok(())
    }
}
