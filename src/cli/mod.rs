//! Command-line interface for curator.
//!
//! Provides commands for curating URLs, listing the cache, and showing
//! the resolved configuration.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::adapters::FirecrawlClient;
use crate::config::Config;
use crate::core::{CurationError, Curator, CuratorSettings};
use crate::domain::{BatchSummary, Curation, CurationOptions, CurationOutcome};
use crate::library::{CacheStore, FileCache, NoCache, CONTENT_FILE};

/// curator - Curate web pages into local markdown
#[derive(Parser, Debug)]
#[command(name = "curator")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch one or more URLs and save them as markdown
    Curate {
        /// URLs to curate
        #[arg(required = true)]
        urls: Vec<String>,

        /// Output directory (defaults to the configured one)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Directory name for the content (single URL only)
        #[arg(short, long)]
        name: Option<String>,

        /// Keep the full page instead of only the main content
        #[arg(long)]
        full: bool,

        /// Fetch again even if the URL is cached
        #[arg(long)]
        refresh: bool,

        /// Download the page's images
        #[arg(long)]
        media: bool,
    },

    /// List cached URLs
    Cache {
        /// Maximum number of entries to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Show resolved configuration (debug)
    Config,
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<ExitCode> {
        match self.command {
            Commands::Curate {
                urls,
                output,
                name,
                full,
                refresh,
                media,
            } => {
                let options = CurationOptions {
                    output_dir: output,
                    name,
                    full_content: full,
                    force_refresh: refresh,
                    download_media: media,
                };
                curate(&urls, &options).await
            }
            Commands::Cache { limit } => list_cache(limit).await.map(|_| ExitCode::SUCCESS),
            Commands::Config => show_config().map(|_| ExitCode::SUCCESS),
        }
    }
}

/// Curate URLs and report the results
async fn curate(urls: &[String], options: &CurationOptions) -> Result<ExitCode> {
    let mut config = Config::load()?;

    let api_key = match config.api_key() {
        Some(key) => key.to_string(),
        None => prompt_for_api_key(&mut config)?,
    };

    let cache = open_cache(&config).await?;
    let scraper = FirecrawlClient::with_base_url(api_key, config.api_url());
    let curator = Curator::new(
        Arc::new(scraper),
        cache,
        CuratorSettings::from_config(&config)?,
    );

    if urls.len() > 1 {
        eprintln!("\nProcessing {} URLs in parallel...\n", urls.len());
    }

    let curation = curator.curate_many(urls, options).await;
    match &curation {
        Curation::Single(outcome) => print_outcome(outcome),
        Curation::Batch(summary) => print_summary(summary),
    }

    Ok(curation.exit_code())
}

/// The configured cache; the file is not touched when caching is off
async fn open_cache(config: &Config) -> Result<Arc<dyn CacheStore>> {
    if !config.is_cache_enabled() {
        return Ok(Arc::new(NoCache));
    }
    let cache = FileCache::open(config.cache_path()).await?;
    Ok(Arc::new(cache))
}

/// Ask for a Firecrawl key and save it; an empty answer aborts
fn prompt_for_api_key(config: &mut Config) -> Result<String> {
    eprintln!("⚠ No API key found. Let's set up curator!\n");

    let answer = inquire::Text::new("Enter your Firecrawl API key:")
        .prompt()
        .unwrap_or_default();
    let key = answer.trim();

    if key.is_empty() {
        return Err(CurationError::Config(
            "API key is required. Get one at https://firecrawl.dev".to_string(),
        )
        .into());
    }

    config.save_api_key(key)?;
    eprintln!("✓ Config saved to {}\n", config.config_path().display());

    Ok(key.to_string())
}

fn print_outcome(outcome: &CurationOutcome) {
    if !outcome.succeeded {
        eprintln!(
            "✗ Failed to process {}: {}",
            outcome.url,
            outcome.error_message.as_deref().unwrap_or("unknown error")
        );
        return;
    }

    let title = outcome.title.as_deref().unwrap_or_default();
    if outcome.from_cache {
        eprintln!("✓ Already cached: {}", title);
    } else {
        eprintln!("✓ Saved: \"{}\"", title);
    }
    if let Some(dir) = &outcome.output_dir {
        eprintln!("  Location: {}", dir.join(CONTENT_FILE).display());
    }

    if let Some(images) = outcome.images {
        if images.downloaded > 0 {
            eprintln!("  Downloaded {}", plural(images.downloaded, "image"));
        }
        if images.failed > 0 {
            eprintln!("  ⚠ Failed to download {}", plural(images.failed, "image"));
        }
    }
}

fn print_summary(summary: &BatchSummary) {
    if summary.name_ignored {
        eprintln!("⚠ --name option only works with a single URL. Ignored --name for multiple URLs.\n");
    }

    for outcome in &summary.outcomes {
        print_outcome(outcome);
    }

    let total = summary.total();
    eprintln!("\n{}", "=".repeat(50));
    eprintln!("✓ Successfully processed: {}/{}", summary.successful(), total);
    if summary.failed() > 0 {
        eprintln!("⚠ Failed: {}/{}", summary.failed(), total);
        for (url, error) in summary.failures() {
            eprintln!("  ✗ {}: {}", url, error);
        }
    }
    eprintln!("{}", "=".repeat(50));
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{} {}", count, noun)
    } else {
        format!("{} {}s", count, noun)
    }
}

/// List cached URLs, most recent first
async fn list_cache(limit: usize) -> Result<()> {
    let config = Config::load()?;
    let cache = FileCache::open(config.cache_path())
        .await
        .context("Failed to open cache")?;

    if cache.is_empty().await {
        println!("Cache is empty. Use 'curator curate <url>' to add content.");
        return Ok(());
    }

    println!("{:<20} {:<40} {:<50}", "FETCHED", "TITLE", "URL");
    println!("{}", "-".repeat(110));

    for entry in cache.entries().await.iter().take(limit) {
        println!(
            "{:<20} {:<40} {:<50}",
            entry.fetched_at.format("%Y-%m-%d %H:%M"),
            truncate(&entry.title, 37),
            entry.url
        );
    }

    println!("\nTotal: {} entries", cache.len().await);

    Ok(())
}

/// Shorten to `max` characters, marking the cut with "..."
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let cut: String = text.chars().take(max).collect();
        format!("{}...", cut)
    } else {
        text.to_string()
    }
}

/// Show the resolved configuration (for debugging)
fn show_config() -> Result<()> {
    let config = Config::load()?;

    println!("Curator Configuration");
    println!();
    println!("Config dir:  {}", config.config_dir().display());
    println!(
        "Config file: {}{}",
        config.config_path().display(),
        if config.config_path().exists() { "" } else { " (not found - using defaults)" }
    );
    println!("Cache file:  {}", config.cache_path().display());
    println!();
    println!("API key:     {}", config.api_key().map(mask_key).unwrap_or_else(|| "(not set)".to_string()));
    println!("API URL:     {}", config.api_url());
    println!("Output dir:  {}", config.default_output_dir().display());
    println!("Cache:       {}", if config.is_cache_enabled() { "enabled" } else { "disabled" });

    Ok(())
}

/// Show only the start of a secret
fn mask_key(key: &str) -> String {
    let visible: String = key.chars().take(3).collect();
    format!("{}{}", visible, "*".repeat(key.chars().count().saturating_sub(3).min(12)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_curate_flags() {
        let cli = Cli::try_parse_from([
            "curator",
            "curate",
            "https://a.example",
            "https://b.example",
            "-o",
            "notes",
            "--media",
            "--refresh",
        ])
        .unwrap();

        match cli.command {
            Commands::Curate {
                urls,
                output,
                name,
                full,
                refresh,
                media,
            } => {
                assert_eq!(urls, vec!["https://a.example", "https://b.example"]);
                assert_eq!(output, Some(PathBuf::from("notes")));
                assert_eq!(name, None);
                assert!(!full);
                assert!(refresh);
                assert!(media);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_curate_requires_a_url() {
        assert!(Cli::try_parse_from(["curator", "curate"]).is_err());
    }

    #[test]
    fn test_mask_key() {
        assert_eq!(mask_key("fc-abcdef"), "fc-******");
        assert_eq!(mask_key("ab"), "ab");
    }

    #[test]
    fn test_truncate_and_plural() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a long title here", 6), "a long...");
        assert_eq!(plural(1, "image"), "1 image");
        assert_eq!(plural(3, "image"), "3 images");
    }

    #[tokio::test]
    async fn test_disabled_cache_skips_corrupt_file() {
        let temp = tempfile::TempDir::new().unwrap();
        std::fs::write(temp.path().join("cache.json"), "{not json").unwrap();
        std::fs::write(temp.path().join("config.yaml"), "cache: false\n").unwrap();

        let config = Config::load_from(temp.path(), None).unwrap();
        let cache = open_cache(&config).await.unwrap();
        assert!(!cache.has("https://example.com").await);

        std::fs::write(temp.path().join("config.yaml"), "cache: true\n").unwrap();
        let config = Config::load_from(temp.path(), None).unwrap();
        assert!(open_cache(&config).await.is_err());
    }
}
