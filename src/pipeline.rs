//! The pipeline module drives a full generation run: bounded-parallel
//! fetch/extract/describe/categorize over the URL list, then rendering.

use futures::StreamExt;
use futures::stream;
use log::{debug, info, warn};

use crate::categorize::{Category, categorize};
use crate::compose::compose;
use crate::config::{ProcessingConfig, SiteMetadata};
use crate::describe::{
    DescriptionProvider, DescriptionSource, LlmDescriber, describe_page, provider_chain,
};
use crate::error::PipelineError;
use crate::extract::extract_content;
use crate::fetch::PageFetcher;

/// One URL flowing through the pipeline.
#[derive(Debug)]
pub struct UrlEntry {
    pub url: String,
    pub title: Option<String>,
    pub description: Option<String>,
    /// Which provider produced the description, when one did.
    pub description_source: Option<DescriptionSource>,
    pub category: Category,
    /// The per-URL failure this entry degraded through, if any.
    pub failure: Option<PipelineError>,
}

/// Summary of a finished run.
#[derive(Debug, Default, Clone, Copy)]
pub struct RunReport {
    pub total: usize,
    pub described: usize,
    pub failed: usize,
}

/// The rendered document plus the entries and summary behind it.
#[derive(Debug)]
pub struct RunOutcome {
    pub text: String,
    pub entries: Vec<UrlEntry>,
    pub report: RunReport,
}

/// Runs the full pipeline over an already-read URL list.
///
/// Workers are bounded by `max_workers` and results keep the input order,
/// not completion order. Per-URL failures degrade to entries with empty
/// content and are tallied in the report.
///
/// # Errors
///
/// Returns an error only when the LLM client cannot be built from the
/// configuration; everything later degrades per URL.
pub async fn run_pipeline(
    urls: Vec<String>,
    site: &SiteMetadata,
    fetcher: &dyn PageFetcher,
    config: &ProcessingConfig,
) -> Result<RunOutcome, PipelineError> {
    let describer = if config.use_ai_description {
        Some(LlmDescriber::from_config(config)?)
    } else {
        None
    };
    let providers = provider_chain(describer.as_ref());

    let entries: Vec<UrlEntry> = stream::iter(urls)
        .map(|url| process_url(url, fetcher, &providers, config))
        .buffered(config.max_workers.max(1))
        .collect()
        .await;

    let report = build_report(&entries);
    info!(
        "Processed {} URLs ({} described, {} failed)",
        report.total, report.described, report.failed
    );

    let text = compose(site, &entries, config.max_urls_per_section);
    Ok(RunOutcome {
        text,
        entries,
        report,
    })
}

/// Carries one URL through fetch, extraction, description and
/// categorization. Never fails: any error degrades the entry instead.
async fn process_url(
    url: String,
    fetcher: &dyn PageFetcher,
    providers: &[DescriptionProvider<'_>],
    config: &ProcessingConfig,
) -> UrlEntry {
    let html = match fetcher.fetch(&url).await {
        Ok(html) => html,
        Err(error) => {
            warn!("{error}");
            return failed_entry(url, error);
        }
    };

    let content = match extract_content(&html, &url, config.max_content_length) {
        Ok(content) => content,
        Err(error) => {
            warn!("{error}");
            return failed_entry(url, error);
        }
    };

    let (description, description_source) = describe_page(providers, &url, &content).await;
    let category = categorize(&url, content.title.as_deref(), description.as_deref());
    debug!("Processed {url} into {category:?}");

    UrlEntry {
        url,
        title: content.title,
        description,
        description_source,
        category,
        failure: None,
    }
}

/// An entry that failed before any content was available: it stays in the
/// output with empty title and description, categorized by URL alone.
fn failed_entry(url: String, error: PipelineError) -> UrlEntry {
    let category = categorize(&url, None, None);

    UrlEntry {
        url,
        title: None,
        description: None,
        description_source: None,
        category,
        failure: Some(error),
    }
}

fn build_report(entries: &[UrlEntry]) -> RunReport {
    RunReport {
        total: entries.len(),
        described: entries
            .iter()
            .filter(|entry| entry.description.is_some())
            .count(),
        failed: entries.iter().filter(|entry| entry.failure.is_some()).count(),
    }
}
