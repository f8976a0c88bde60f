//! The source module reads the URL list for a run from an XML sitemap or a
//! CSV file. Output order is first-appearance order with duplicates and
//! non-http(s) locations dropped.

use std::collections::{HashSet, VecDeque};
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{debug, info, warn};
use reqwest::Client;
use sitemap::{
    reader::{SiteMapEntity, SiteMapReader},
    structs::Location,
};
use url::Url;

use crate::constants::USER_AGENT;
use crate::error::PipelineError;

/// Header names that mark a CSV column as holding URLs.
const URL_COLUMN_KEYS: &[&str] = &["url", "link", "href", "path"];

/// Enum representing where the URL list comes from.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum UrlSource {
    /// An XML sitemap fetched over HTTP, nested sitemaps included.
    Sitemap { url: String },
    /// A local CSV file with one URL per row.
    Csv { path: PathBuf },
}

/// Reads the de-duplicated, order-preserving URL list for a run and
/// reports how many URLs were found.
///
/// # Errors
///
/// Returns `PipelineError::SourceParse` when the source cannot be fetched
/// or parsed, or when it yields no URLs. This is the only fatal stage of a
/// run.
pub async fn read_urls(source: &UrlSource, timeout: Duration) -> Result<Vec<String>, PipelineError> {
    let urls = match source {
        UrlSource::Sitemap { url } => read_sitemap_urls(url, timeout).await?,
        UrlSource::Csv { path } => read_csv_urls(path)?,
    };

    if urls.is_empty() {
        return Err(PipelineError::SourceParse(
            "no URLs found in source".to_string(),
        ));
    }

    info!("Found {} URLs in source", urls.len());
    Ok(urls)
}

/// Fetches a sitemap and every nested sitemap it references, collecting
/// page URLs in document order.
async fn read_sitemap_urls(
    sitemap_url: &str,
    timeout: Duration,
) -> Result<Vec<String>, PipelineError> {
    let client = Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
        .map_err(|e| PipelineError::SourceParse(format!("unable to build HTTP client: {e}")))?;

    let mut urls = Vec::new();
    let mut seen = HashSet::new();
    let mut pending = VecDeque::from([sitemap_url.to_string()]);

    while let Some(current) = pending.pop_front() {
        debug!("Reading sitemap {current}");
        let response = client.get(&current).send().await.map_err(|e| {
            PipelineError::SourceParse(format!("unable to fetch sitemap {current}: {e}"))
        })?;
        let status = response.status();
        if !status.is_success() {
            return Err(PipelineError::SourceParse(format!(
                "sitemap {current} returned HTTP status {status}"
            )));
        }
        let content = response.bytes().await.map_err(|e| {
            PipelineError::SourceParse(format!("unable to read sitemap {current}: {e}"))
        })?;

        collect_sitemap_entities(&content, &mut urls, &mut seen, &mut pending);
    }

    Ok(urls)
}

/// Collects `<loc>` values from one sitemap document. Page URLs land in
/// `urls` (first appearance wins), nested sitemap locations are queued in
/// `pending` for a follow-up fetch.
pub fn collect_sitemap_entities(
    content: &[u8],
    urls: &mut Vec<String>,
    seen: &mut HashSet<String>,
    pending: &mut VecDeque<String>,
) {
    let reader = SiteMapReader::new(content);

    for entity in reader {
        match entity {
            SiteMapEntity::Url(url_entry) => {
                if let Location::Url(ref url) = url_entry.loc {
                    let url = url.to_string();
                    if is_http_url(&url) && seen.insert(url.clone()) {
                        urls.push(url);
                    }
                }
            }
            SiteMapEntity::SiteMap(sitemap_entry) => {
                if let Location::Url(ref url) = sitemap_entry.loc {
                    pending.push_back(url.to_string());
                }
            }
            SiteMapEntity::Err(error) => {
                warn!("Skipping malformed sitemap entity: {error:?}");
            }
        }
    }
}

/// Reads URLs from a CSV file. A header row is detected by the absence of
/// URLs in the first record; the URL column is the first header mentioning
/// url/link/href/path, with column zero as the fallback.
fn read_csv_urls(path: &Path) -> Result<Vec<String>, PipelineError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|e| {
            PipelineError::SourceParse(format!("unable to open CSV {}: {e}", path.display()))
        })?;

    let mut records = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record.map_err(|e| {
            PipelineError::SourceParse(format!("CSV row {} is malformed: {e}", index + 1))
        })?;
        records.push(record);
    }

    let Some(first) = records.first() else {
        return Err(PipelineError::SourceParse(format!(
            "CSV file {} is empty",
            path.display()
        )));
    };

    let has_header = !first.iter().any(is_http_url);
    let column = url_column(first, has_header);

    let mut seen = HashSet::new();
    let mut urls = Vec::new();
    for record in records.iter().skip(usize::from(has_header)) {
        let Some(cell) = record.get(column) else {
            continue;
        };
        let cell = cell.trim();
        if is_http_url(cell) && seen.insert(cell.to_string()) {
            urls.push(cell.to_string());
        }
    }

    if urls.is_empty() {
        return Err(PipelineError::SourceParse(format!(
            "no URL column recognized in {}",
            path.display()
        )));
    }
    Ok(urls)
}

/// Picks the column to read URLs from: a header whose name mentions a
/// URL-ish key, the first URL cell of a headerless file, or column zero.
fn url_column(first: &csv::StringRecord, has_header: bool) -> usize {
    let position = if has_header {
        first.iter().position(|header| {
            let header = header.to_lowercase();
            URL_COLUMN_KEYS.iter().any(|key| header.contains(key))
        })
    } else {
        first.iter().position(is_http_url)
    };

    position.unwrap_or(0)
}

fn is_http_url(url: &str) -> bool {
    Url::parse(url)
        .map(|parsed| matches!(parsed.scheme(), "http" | "https"))
        .unwrap_or(false)
}
