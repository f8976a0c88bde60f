//! The extract module isolates a page's title, description candidates and
//! main article text from raw HTML.

use dom_smoothie::{Article, CandidateSelectMode, Config, Readability, TextMode};
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector as ScraperSelector};
use url::Url;

use crate::constants::MAX_STATIC_DESCRIPTION_LENGTH;
use crate::error::PipelineError;

static WHITESPACE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("Failed to compile WHITESPACE regex"));

/// Tags whose text never belongs to the main content.
const NON_CONTENT_TAGS: &[&str] = &[
    "script", "style", "nav", "header", "footer", "aside", "form", "iframe", "noscript",
];

/// Represents the content extracted from one page.
#[derive(Debug, Default)]
pub struct PageContent {
    /// The page title, if any was found.
    pub title: Option<String>,
    /// The meta description (or `og:description`), if present.
    pub meta_description: Option<String>,
    /// The first paragraph of body text, truncated, if present.
    pub first_paragraph: Option<String>,
    /// The main article text, truncated to the configured maximum.
    pub main_text: String,
}

/// Extracts title, description candidates and main text from page HTML.
///
/// The main text comes from a readability pass; when that pass rejects the
/// document (framesets, near-empty pages) the text is rebuilt from the DOM
/// with non-content elements skipped. The result is whitespace-normalized
/// and truncated to `max_content_length` characters.
///
/// # Errors
///
/// Returns `PipelineError::Extraction` for an empty document; callers must
/// treat this as non-fatal for the run.
pub fn extract_content(
    html: &str,
    url: &str,
    max_content_length: usize,
) -> Result<PageContent, PipelineError> {
    if html.trim().is_empty() {
        return Err(PipelineError::Extraction {
            url: url.to_string(),
            reason: "empty document".to_string(),
        });
    }

    let document = Html::parse_document(html);
    let title = parse_title(&document);
    let meta_description = parse_meta_description(&document);
    let first_paragraph = parse_first_paragraph(&document);

    let main_text = readability_text(html, url)
        .filter(|text| !text.trim().is_empty())
        .unwrap_or_else(|| filtered_text(&document));
    let main_text = truncate_text(
        WHITESPACE_REGEX.replace_all(main_text.trim(), " ").as_ref(),
        max_content_length,
    );

    Ok(PageContent {
        title,
        meta_description,
        first_paragraph,
        main_text,
    })
}

/// Runs the readability heuristic over the document, returning `None` when
/// it rejects the input.
fn readability_text(html: &str, url: &str) -> Option<String> {
    let config = Config {
        text_mode: TextMode::Markdown,
        candidate_select_mode: CandidateSelectMode::DomSmoothie,
        ..Default::default()
    };

    let mut readability = match Readability::new(html, None, Some(config)) {
        Ok(readability) => readability,
        Err(error) => {
            debug!("Readability rejected {url}: {error}");
            return None;
        }
    };

    let article: Article = match readability.parse() {
        Ok(article) => article,
        Err(error) => {
            debug!("Readability failed on {url}: {error}");
            return None;
        }
    };

    Some(article.text_content.to_string())
}

/// Parses the title from the document: `<title>`, then the first `h1`/`h2`.
fn parse_title(document: &Html) -> Option<String> {
    for tag in ["title", "h1", "h2"] {
        if let Ok(selector) = ScraperSelector::parse(tag)
            && let Some(element) = document.select(&selector).next()
        {
            let text = element_text(&element);
            if !text.is_empty() {
                return Some(text);
            }
        }
    }

    None
}

/// Reads the meta description, falling back to `og:description`.
fn parse_meta_description(document: &Html) -> Option<String> {
    for query in [
        r#"meta[name="description"]"#,
        r#"meta[property="og:description"]"#,
    ] {
        if let Ok(selector) = ScraperSelector::parse(query)
            && let Some(element) = document.select(&selector).next()
            && let Some(content) = element.value().attr("content")
        {
            let content = content.trim();
            if !content.is_empty() {
                return Some(content.to_string());
            }
        }
    }

    None
}

/// Returns the first non-empty paragraph, truncated to description length.
fn parse_first_paragraph(document: &Html) -> Option<String> {
    let selector = ScraperSelector::parse("p").ok()?;
    for element in document.select(&selector) {
        let text = element_text(&element);
        if !text.is_empty() {
            return Some(truncate_text(&text, MAX_STATIC_DESCRIPTION_LENGTH));
        }
    }

    None
}

fn element_text(element: &scraper::ElementRef<'_>) -> String {
    let joined = element.text().collect::<Vec<_>>().join(" ");
    WHITESPACE_REGEX
        .replace_all(joined.trim(), " ")
        .to_string()
}

/// Rebuilds plain text from the DOM, skipping text inside non-content
/// elements (navigation, page chrome, scripts, forms).
fn filtered_text(document: &Html) -> String {
    let mut parts: Vec<String> = Vec::new();

    for node in document.tree.nodes() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let in_chrome = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|element| NON_CONTENT_TAGS.contains(&element.name()))
        });
        if in_chrome {
            continue;
        }
        let text = text.trim();
        if !text.is_empty() {
            parts.push(text.to_string());
        }
    }

    parts.join(" ")
}

/// Truncates to `max_length` characters, ellipsis included, on a char
/// boundary.
pub fn truncate_text(text: &str, max_length: usize) -> String {
    if text.chars().count() <= max_length {
        return text.to_string();
    }

    let kept: String = text.chars().take(max_length.saturating_sub(3)).collect();
    format!("{kept}...")
}

/// Derives a readable title from the URL path when a page offered none,
/// e.g. `https://example.com/docs/getting-started` becomes
/// `Getting Started`; URLs without a path fall back to the host.
pub fn title_from_url(url: &str) -> String {
    let parsed = match Url::parse(url) {
        Ok(parsed) => parsed,
        Err(_) => return url.to_string(),
    };

    let slug = parsed
        .path_segments()
        .and_then(|segments| segments.rev().find(|segment| !segment.is_empty()))
        .map(|segment| title_case(&segment.replace(['-', '_'], " ")));

    if let Some(slug) = slug
        && !slug.is_empty()
    {
        return slug;
    }

    parsed.host_str().unwrap_or(url).to_string()
}

fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
