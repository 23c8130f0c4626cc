//! Deterministic names for content directories and downloaded images.

use chrono::{DateTime, Utc};
use url::Url;

/// Maximum length of a derived directory name
pub const MAX_NAME_LEN: usize = 100;

/// Extensions kept verbatim when naming downloaded images
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "svg", "bmp"];

/// Derive a directory name from a title, falling back to the URL.
///
/// Only the degenerate case (nothing survives normalization) depends on the
/// clock; see [`derive_name_at`].
pub fn derive_name(title: &str, url: &str) -> String {
    derive_name_at(title, url, Utc::now())
}

/// Same as [`derive_name`] with an explicit instant for the `untitled-<millis>` fallback.
pub fn derive_name_at(title: &str, url: &str, now: DateTime<Utc>) -> String {
    let source = if title.is_empty() {
        name_from_url(url)
    } else {
        title.to_string()
    };

    let name = normalize(&source);
    if name.is_empty() {
        format!("untitled-{}", now.timestamp_millis())
    } else {
        name
    }
}

/// Last non-empty path segment (extension stripped), else the host
fn name_from_url(url: &str) -> String {
    let Ok(parsed) = Url::parse(url) else {
        return "untitled".to_string();
    };

    let host = parsed.host_str().unwrap_or_default().to_string();
    let path = parsed.path().trim_matches('/');
    if path.is_empty() {
        return host;
    }

    let last = path.rsplit('/').next().unwrap_or_default();
    let stem = match last.rfind('.') {
        Some(idx) => &last[..idx],
        None => last,
    };

    if stem.is_empty() {
        host
    } else {
        stem.to_string()
    }
}

fn normalize(raw: &str) -> String {
    let lowered = raw.to_lowercase();

    let mut out = String::with_capacity(lowered.len());
    let mut pending_hyphen = false;
    for ch in lowered.trim().chars() {
        if ch.is_whitespace() || ch == '-' {
            pending_hyphen = true;
            continue;
        }
        if !(ch.is_ascii_lowercase() || ch.is_ascii_digit()) {
            continue;
        }
        if pending_hyphen && !out.is_empty() {
            out.push('-');
        }
        pending_hyphen = false;
        out.push(ch);
    }

    // Only ASCII remains, so byte truncation is char-safe
    out.truncate(MAX_NAME_LEN);
    out.trim_end_matches('-').to_string()
}

/// File name for a downloaded image.
///
/// Keeps the URL's basename when it carries a known image extension
/// (matched case-insensitively), otherwise `image-<position>.png`.
pub fn image_filename(image_url: &str, position: usize) -> String {
    let fallback = || format!("image-{}.png", position);

    let Ok(parsed) = Url::parse(image_url) else {
        return fallback();
    };

    let basename = parsed
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .unwrap_or_default();

    match basename.rfind('.') {
        // A leading dot is a hidden file, not an extension
        Some(idx) if idx > 0 => {
            let ext = basename[idx + 1..].to_ascii_lowercase();
            if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
                basename.to_string()
            } else {
                fallback()
            }
        }
        _ => fallback(),
    }
}

/// 1-based position of an image: the declared one if set, else its index + 1
pub fn image_position(declared: Option<usize>, index: usize) -> usize {
    declared.filter(|p| *p > 0).unwrap_or(index + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn is_well_formed(name: &str) -> bool {
        !name.is_empty()
            && name.len() <= MAX_NAME_LEN
            && !name.starts_with('-')
            && !name.ends_with('-')
            && !name.contains("--")
            && name
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    }

    #[test]
    fn test_title_is_normalized() {
        assert_eq!(
            derive_name("Hello, World! 2024", "https://x.com"),
            "hello-world-2024"
        );
        assert_eq!(
            derive_name("  Rust   --  The Book  ", "https://x.com"),
            "rust-the-book"
        );
    }

    #[test]
    fn test_url_path_fallback() {
        assert_eq!(derive_name("", "https://example.com/foo/bar.html"), "bar");
        assert_eq!(derive_name("", "https://example.com/foo/bar/"), "bar");
        assert_eq!(
            derive_name("", "https://example.com/a/Release-Notes.v2.md"),
            "release-notesv2"
        );
    }

    #[test]
    fn test_host_fallback_strips_dots() {
        assert_eq!(derive_name("", "https://example.com/"), "examplecom");
        assert_eq!(derive_name("", "https://my-site.example.org"), "my-siteexampleorg");
    }

    #[test]
    fn test_untitled_fallback() {
        let now = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        assert_eq!(derive_name_at("!!!", "https://x.com", now), "untitled-1700000000123");
        assert_eq!(derive_name_at("日本語", "https://x.com", now), "untitled-1700000000123");
        // Unparseable URL falls back to the literal "untitled"
        assert_eq!(derive_name_at("", "not a url", now), "untitled");
    }

    #[test]
    fn test_truncation_never_leaves_trailing_hyphen() {
        let title = format!("{} tail", "a".repeat(99));
        let name = derive_name(&title, "https://x.com");
        assert_eq!(name, "a".repeat(99));

        let long = "word ".repeat(60);
        let name = derive_name(&long, "https://x.com");
        assert!(name.len() <= MAX_NAME_LEN);
        assert!(is_well_formed(&name));
    }

    #[test]
    fn test_output_shape_over_assorted_inputs() {
        let cases = [
            ("Hello, World! 2024", "https://x.com"),
            ("--leading and trailing--", "https://x.com"),
            ("Tabs\tand\nnewlines", "https://x.com"),
            ("Ünïcödé Títle", "https://x.com"),
            ("", "https://example.com/path/to/page.html?q=1"),
            ("", "https://sub.domain.io"),
            ("C++ & Rust: a comparison", "https://x.com"),
        ];
        for (title, url) in cases {
            let name = derive_name(title, url);
            assert!(is_well_formed(&name), "bad name {:?} for {:?}", name, title);
        }
    }

    #[test]
    fn test_image_filename_keeps_known_extensions() {
        assert_eq!(image_filename("https://cdn.x.com/a/b.JPG", 1), "b.JPG");
        assert_eq!(image_filename("https://cdn.x.com/img/photo.webp?w=200", 2), "photo.webp");
        assert_eq!(image_filename("https://cdn.x.com/logo.svg", 5), "logo.svg");
    }

    #[test]
    fn test_image_filename_falls_back_to_position() {
        assert_eq!(image_filename("https://cdn.x.com/a/b", 3), "image-3.png");
        assert_eq!(image_filename("https://cdn.x.com/a/b.tiff", 4), "image-4.png");
        assert_eq!(image_filename("https://cdn.x.com/a/.png", 1), "image-1.png");
        assert_eq!(image_filename("https://cdn.x.com/", 7), "image-7.png");
        assert_eq!(image_filename("garbage", 2), "image-2.png");
    }

    #[test]
    fn test_image_position() {
        assert_eq!(image_position(Some(4), 0), 4);
        assert_eq!(image_position(Some(0), 2), 3);
        assert_eq!(image_position(None, 0), 1);
    }
}
