//! The fetch module obtains page HTML, either over plain HTTP or through a
//! headless-browser crawl for script-generated content. The strategy is
//! chosen once per run, not per call.

extern crate spider;

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use log::{info, warn};
use reqwest::Client;
use spider::configuration::{Configuration, WaitForDelay, WaitForIdleNetwork};
use spider::website::Website;
use url::Url;

use crate::FetchMode;
use crate::config::ProcessingConfig;
use crate::constants::{RENDER_SETTLE_DELAY, USER_AGENT};
use crate::error::PipelineError;

/// Obtains the HTML for a single page.
///
/// The pipeline holds one fetcher per run and shares it across workers, so
/// implementations must be safe to call concurrently.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Returns the page HTML for `url`.
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::Fetch` when the page cannot be obtained;
    /// callers must treat this as non-fatal for the run.
    async fn fetch(&self, url: &str) -> Result<String, PipelineError>;
}

/// Builds the fetch strategy for the run.
///
/// # Errors
///
/// Returns an error when the HTTP client cannot be built or the rendering
/// crawl cannot start.
pub async fn build_fetcher(
    urls: &[String],
    config: &ProcessingConfig,
) -> Result<Box<dyn PageFetcher>, PipelineError> {
    match config.fetch_mode {
        FetchMode::Http => Ok(Box::new(HttpFetcher::new(config.request_timeout)?)),
        FetchMode::Rendered => Ok(Box::new(RenderedFetcher::render(urls, config).await?)),
    }
}

/// Plain HTTP fetcher with a browser User-Agent and a per-request timeout.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// # Errors
    ///
    /// Returns `PipelineError::Validation` when the client cannot be built.
    pub fn new(timeout: Duration) -> Result<Self, PipelineError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| {
                PipelineError::Validation(format!("unable to build HTTP client: {e}"))
            })?;

        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, PipelineError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| PipelineError::Fetch {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(PipelineError::Fetch {
                url: url.to_string(),
                reason: format!("HTTP status {status}"),
            });
        }

        response.text().await.map_err(|e| PipelineError::Fetch {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }
}

/// Headless-rendered fetcher: the whole URL list is crawled up front with
/// a browser so every page's DOM reflects script-generated content, and
/// `fetch` then serves from the collected results.
pub struct RenderedFetcher {
    pages: HashMap<String, String>,
}

impl RenderedFetcher {
    /// Renders every URL in `urls` and collects the resulting DOM HTML.
    /// Crawl concurrency is bounded by `max_workers`; pages that fail to
    /// render keep no entry and surface later as fetch failures.
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::Fetch` when the crawl itself cannot start.
    pub async fn render(
        urls: &[String],
        config: &ProcessingConfig,
    ) -> Result<Self, PipelineError> {
        let Some(first_url) = urls.first() else {
            return Ok(Self {
                pages: HashMap::new(),
            });
        };
        let base_url = Url::parse(first_url)
            .and_then(|parsed| parsed.join("/"))
            .map_err(|e| PipelineError::Validation(format!("invalid page URL {first_url}: {e}")))?;

        let spider_config = Configuration::new()
            .with_user_agent(Some(USER_AGENT))
            .with_subdomains(false)
            .with_redirect_limit(3)
            .with_retry(1)
            .with_depth(0)
            .with_respect_robots_txt(true)
            .with_concurrency_limit(Some(config.max_workers.max(1)))
            .with_wait_for_idle_network(Some(WaitForIdleNetwork::new(Some(
                config.request_timeout,
            ))))
            .with_wait_for_delay(Some(WaitForDelay::new(Some(RENDER_SETTLE_DELAY))))
            .build();

        let mut website = Website::new(base_url.as_str())
            .with_config(spider_config)
            .build()
            .map_err(|e| PipelineError::Fetch {
                url: base_url.to_string(),
                reason: e.to_string(),
            })?;

        website.set_extra_links(
            urls.iter()
                .map(|url| spider::CaseInsensitiveString::new(url))
                .collect::<spider::hashbrown::HashSet<spider::CaseInsensitiveString>>(),
        );

        let mut receiver = website.subscribe(888);

        let collector = tokio::spawn(async move {
            let mut pages = HashMap::new();
            while let Ok(page) = receiver.recv().await {
                let url = page.get_url().to_string();
                if !page.status_code.is_success() {
                    warn!("Skipping {url} as {}", page.status_code);
                    continue;
                }
                pages.insert(url, page.get_html());
            }
            pages
        });

        info!("Rendering {} pages with a headless browser", urls.len());
        website.crawl().await;
        website.unsubscribe();

        let pages = collector.await.map_err(|e| PipelineError::Fetch {
            url: base_url.to_string(),
            reason: format!("render task failed: {e}"),
        })?;

        Ok(Self { pages })
    }
}

#[async_trait]
impl PageFetcher for RenderedFetcher {
    async fn fetch(&self, url: &str) -> Result<String, PipelineError> {
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| PipelineError::Fetch {
                url: url.to_string(),
                reason: "page was not rendered".to_string(),
            })
    }
}
