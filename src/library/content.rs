//! Markdown documents with YAML frontmatter.
//!
//! Every curated page lands in its own directory as `CONTENT.md`:
//!
//! ```text
//! ---
//! url: https://example.com/post
//! title: Example Post
//! description: Optional summary
//! fetched: 2024-05-01T12:00:00.000Z
//! ---
//!
//! <markdown body>
//! ```

use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use tokio::fs;

/// File name of the document inside each content directory
pub const CONTENT_FILE: &str = "CONTENT.md";

/// Metadata written ahead of the body
#[derive(Debug, Clone)]
pub struct Frontmatter {
    pub url: String,
    pub title: String,
    pub description: Option<String>,
    pub fetched: DateTime<Utc>,
}

impl Frontmatter {
    /// Create frontmatter stamped with the current time
    pub fn new(url: impl Into<String>, title: impl Into<String>, description: Option<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            description,
            fetched: Utc::now(),
        }
    }

    /// Render the delimited block, including the trailing blank line
    pub fn render(&self) -> String {
        let mut lines = vec![
            "---".to_string(),
            format!("url: {}", self.url),
            format!("title: {}", self.title),
        ];
        if let Some(description) = self.description.as_deref().filter(|d| !d.is_empty()) {
            lines.push(format!("description: {}", description));
        }
        lines.push(format!(
            "fetched: {}",
            self.fetched.to_rfc3339_opts(SecondsFormat::Millis, true)
        ));
        lines.push("---".to_string());
        lines.push(String::new());

        let mut block = lines.join("\n");
        block.push('\n');
        block
    }
}

/// Write `body` to `path` behind a frontmatter block.
///
/// Missing parent directories are created; an existing file is replaced.
pub async fn write_markdown(path: &Path, body: &str, frontmatter: &Frontmatter) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }

    let mut document = frontmatter.render();
    document.push_str(body);
    fs::write(path, document).await
}

/// Resolve `<working_dir>/<base_dir>/<dir_name>` and make sure it exists.
///
/// An absolute `base_dir` ignores `working_dir`.
pub async fn create_content_dir(
    working_dir: &Path,
    base_dir: &Path,
    dir_name: &str,
) -> io::Result<PathBuf> {
    let dir = working_dir.join(base_dir).join(dir_name);
    fs::create_dir_all(&dir).await?;
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn fixed_frontmatter(description: Option<&str>) -> Frontmatter {
        Frontmatter {
            url: "https://example.com/post".to_string(),
            title: "Example Post".to_string(),
            description: description.map(String::from),
            fetched: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_render_with_description() {
        let rendered = fixed_frontmatter(Some("A summary")).render();
        assert_eq!(
            rendered,
            "---\nurl: https://example.com/post\ntitle: Example Post\ndescription: A summary\nfetched: 2024-05-01T12:00:00.000Z\n---\n\n"
        );
    }

    #[test]
    fn test_render_omits_missing_description() {
        let rendered = fixed_frontmatter(None).render();
        assert!(!rendered.contains("description:"));
        assert!(rendered.starts_with("---\nurl: "));
        assert!(rendered.ends_with("---\n\n"));
    }

    #[tokio::test]
    async fn test_write_creates_directories_and_overwrites() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("a").join("b").join(CONTENT_FILE);

        write_markdown(&path, "# First", &fixed_frontmatter(None))
            .await
            .unwrap();
        write_markdown(&path, "# Second\n\nbody", &fixed_frontmatter(None))
            .await
            .unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.ends_with("---\n\n# Second\n\nbody"));
        assert!(!written.contains("# First"));
    }

    #[tokio::test]
    async fn test_create_content_dir_relative_and_absolute() {
        let work = TempDir::new().unwrap();
        let elsewhere = TempDir::new().unwrap();

        let relative = create_content_dir(work.path(), Path::new("out"), "page")
            .await
            .unwrap();
        assert_eq!(relative, work.path().join("out").join("page"));
        assert!(relative.is_dir());

        let absolute = create_content_dir(work.path(), elsewhere.path(), "page")
            .await
            .unwrap();
        assert_eq!(absolute, elsewhere.path().join("page"));
        assert!(absolute.is_dir());
    }

    #[tokio::test]
    async fn test_write_fails_when_parent_is_a_file() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("blocker");
        std::fs::write(&blocker, "not a dir").unwrap();

        let result = write_markdown(
            &blocker.join(CONTENT_FILE),
            "body",
            &fixed_frontmatter(None),
        )
        .await;
        assert!(result.is_err());
    }
}
