//! Image downloads for curated pages.
//!
//! Redirects are followed by hand so the hop count stays bounded; reqwest's
//! own redirect handling is switched off.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use futures::future::join_all;
use futures::StreamExt;
use reqwest::header::LOCATION;
use reqwest::redirect::Policy;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, warn};
use url::Url;

use crate::domain::ImageRef;

use super::naming::{image_filename, image_position};

/// Redirect hops allowed before a download is abandoned
pub const MAX_REDIRECTS: usize = 5;

/// Errors from a single image download
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("invalid image URL: {url}")]
    InvalidUrl { url: String },

    #[error("network error downloading {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to download image: {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("redirect loop downloading {url}: gave up after {hops} hops")]
    RedirectLoop { url: String, hops: usize },

    #[error("IO error writing to {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl DownloadError {
    fn network(url: &Url, source: reqwest::Error) -> Self {
        Self::Network {
            url: url.to_string(),
            source,
        }
    }

    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Count of settled image downloads for one document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageTally {
    pub downloaded: usize,
    pub failed: usize,
}

/// Downloads images with manual, bounded redirect handling
#[derive(Debug, Clone)]
pub struct ImageFetcher {
    client: Client,
    max_redirects: usize,
}

impl Default for ImageFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageFetcher {
    /// Create a fetcher allowing [`MAX_REDIRECTS`] hops
    pub fn new() -> Self {
        Self::with_max_redirects(MAX_REDIRECTS)
    }

    /// Create a fetcher with a custom hop limit
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built from its static
    /// configuration (no TLS backend available).
    #[allow(clippy::expect_used)]
    pub fn with_max_redirects(max_redirects: usize) -> Self {
        let client = Client::builder()
            .redirect(Policy::none())
            .build()
            .expect("failed to build HTTP client with static configuration");

        Self {
            client,
            max_redirects,
        }
    }

    /// Download `image_url` into `dest`, returning the bytes written.
    ///
    /// 301/302 responses with a `Location` header are followed to the same
    /// destination. A partially written file is removed on failure.
    pub async fn fetch(&self, image_url: &str, dest: &Path) -> Result<u64, DownloadError> {
        let mut current = Url::parse(image_url).map_err(|_| DownloadError::InvalidUrl {
            url: image_url.to_string(),
        })?;
        let mut hops = 0;

        let response = loop {
            let response = self
                .client
                .get(current.clone())
                .send()
                .await
                .map_err(|e| DownloadError::network(&current, e))?;

            let status = response.status();
            let location = response
                .headers()
                .get(LOCATION)
                .and_then(|value| value.to_str().ok())
                .map(str::to_owned);

            match (status, location) {
                (StatusCode::MOVED_PERMANENTLY | StatusCode::FOUND, Some(location)) => {
                    if hops >= self.max_redirects {
                        return Err(DownloadError::RedirectLoop {
                            url: image_url.to_string(),
                            hops,
                        });
                    }
                    let next = current
                        .join(&location)
                        .map_err(|_| DownloadError::InvalidUrl { url: location })?;
                    debug!(from = %current, to = %next, "Following image redirect");
                    current = next;
                    hops += 1;
                }
                (StatusCode::OK, _) => break response,
                (status, _) => {
                    return Err(DownloadError::HttpStatus {
                        url: current.to_string(),
                        status: status.as_u16(),
                    })
                }
            }
        };

        let file = File::create(dest)
            .await
            .map_err(|e| DownloadError::io(dest, e))?;

        let result = stream_to_file(file, response, &current, dest).await;
        if result.is_err() {
            debug!(path = %dest.display(), "Removing partial image after error");
            let _ = tokio::fs::remove_file(dest).await;
        }
        result
    }

    /// Download every image into `dir` concurrently and tally the results.
    ///
    /// Each download settles on its own; a failure never affects the others.
    pub async fn fetch_all(&self, images: &[ImageRef], dir: &Path) -> ImageTally {
        let filenames = assign_filenames(images);
        let downloads = images.iter().zip(filenames).map(|(image, filename)| {
            let dest = dir.join(filename);
            async move {
                match self.fetch(&image.image_url, &dest).await {
                    Ok(bytes) => {
                        debug!(url = %image.image_url, bytes, "Downloaded image");
                        true
                    }
                    Err(e) => {
                        warn!(url = %image.image_url, error = %e, "Image download failed");
                        false
                    }
                }
            }
        });

        let results = join_all(downloads).await;
        let downloaded = results.iter().filter(|ok| **ok).count();

        ImageTally {
            downloaded,
            failed: results.len() - downloaded,
        }
    }
}

/// One filename per image, unique within the document.
///
/// A basename seen earlier falls back to `image-<position>.png`, then to
/// `image-<position>-<n>.png` if that is taken too.
fn assign_filenames(images: &[ImageRef]) -> Vec<String> {
    let mut taken = HashSet::new();

    images
        .iter()
        .enumerate()
        .map(|(index, image)| {
            let position = image_position(image.position, index);
            let mut name = image_filename(&image.image_url, position);
            if taken.contains(&name) {
                name = format!("image-{}.png", position);
            }
            let mut suffix = 2;
            while taken.contains(&name) {
                name = format!("image-{}-{}.png", position, suffix);
                suffix += 1;
            }
            taken.insert(name.clone());
            name
        })
        .collect()
}

async fn stream_to_file(
    file: File,
    response: reqwest::Response,
    url: &Url,
    dest: &Path,
) -> Result<u64, DownloadError> {
    let mut writer = BufWriter::new(file);
    let mut stream = response.bytes_stream();
    let mut bytes_written: u64 = 0;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| DownloadError::network(url, e))?;
        writer
            .write_all(&chunk)
            .await
            .map_err(|e| DownloadError::io(dest, e))?;
        bytes_written += chunk.len() as u64;
    }

    writer.flush().await.map_err(|e| DownloadError::io(dest, e))?;

    Ok(bytes_written)
}
