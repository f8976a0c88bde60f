//! The llmsgen library generates llms.txt index files for websites so AI
//! crawlers can discover a site's most important pages.
//!
//! The pipeline reads URLs from an XML sitemap or a CSV file, fetches
//! every page (plain HTTP or headless-rendered), extracts the title and
//! main content, produces a short description per page (optionally with an
//! LLM), buckets the URLs into fixed sections and renders the result in
//! the llms.txt format.

pub mod categorize;
pub mod compose;
pub mod config;
pub mod constants;
pub mod describe;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod pipeline;
pub mod source;

/// Enum representing how page HTML is obtained.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum FetchMode {
    /// Plain HTTP fetch
    #[default]
    Http,
    /// Headless-browser rendering for script-generated content
    Rendered,
}

impl std::str::FromStr for FetchMode {
    type Err = String;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.to_lowercase().as_str() {
            "http" => Ok(FetchMode::Http),
            "rendered" => Ok(FetchMode::Rendered),
            _ => Err(format!("Invalid fetch mode: {}", input)),
        }
    }
}

pub use compose::compose;
pub use pipeline::{RunOutcome, RunReport, UrlEntry, run_pipeline};
pub use source::{UrlSource, read_urls};
