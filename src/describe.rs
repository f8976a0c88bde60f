//! The describe module produces a human-readable description for each page
//! from an ordered provider chain: the LLM (when enabled), the page's meta
//! description, then its first paragraph. The first provider that yields
//! text wins and its source is recorded on the entry.

use std::time::Duration;

use llm::builder::{LLMBackend, LLMBuilder};
use llm::chat::{ChatMessage, ChatProvider};
use log::{debug, warn};
use once_cell::sync::Lazy;
use rate_guard::{RateLimit, StdTokenBucket, TokenBucketBuilder};
use regex::Regex;

use crate::config::ProcessingConfig;
use crate::constants::{DESCRIPTION_PROMPT_TEMPLATE, OPENROUTER_BASE_URL, THINK_STRIPPER};
use crate::error::PipelineError;
use crate::extract::PageContent;

static THINK_STRIPPER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(THINK_STRIPPER).expect("Failed to compile THINK_STRIPPER regex"));

/// Enum recording which provider produced an entry's description.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum DescriptionSource {
    /// Generated by the configured LLM.
    Llm,
    /// Taken from the page's meta description.
    MetaTag,
    /// Taken from the page's first paragraph.
    FirstParagraph,
}

/// The LLM-backed provider: one model handle and an optional rate limit,
/// shared by every worker in the run.
pub struct LlmDescriber {
    model: Box<dyn ChatProvider>,
    rate_limiter: Option<StdTokenBucket>,
}

impl LlmDescriber {
    /// Builds the OpenRouter-backed describer from the run configuration.
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::Validation` when no API key is configured
    /// or the model handle cannot be built.
    pub fn from_config(config: &ProcessingConfig) -> Result<Self, PipelineError> {
        let api_key = config.api_key.clone().ok_or_else(|| {
            PipelineError::Validation("AI descriptions require OPENROUTER_API_KEY".to_string())
        })?;

        let model: Box<dyn ChatProvider> = LLMBuilder::new()
            .backend(LLMBackend::OpenAI)
            .base_url(OPENROUTER_BASE_URL.to_string())
            .model(config.llm_model.clone())
            .api_key(api_key)
            .max_tokens(200)
            .temperature(0.3)
            .build()
            .map_err(|e| PipelineError::Validation(format!("unable to build LLM client: {e}")))?;

        Ok(Self {
            model,
            rate_limiter: rate_limiter(config.rpm),
        })
    }

    /// Wraps an existing chat provider without a rate limit; lets tests
    /// inject a stub.
    pub fn from_provider(model: Box<dyn ChatProvider>) -> Self {
        Self {
            model,
            rate_limiter: None,
        }
    }

    /// Asks the model for a one-to-two sentence description of the page.
    /// `<think>` blocks are stripped from the response.
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::LlmApi` when the endpoint rejects the
    /// request or returns an empty response.
    pub async fn describe(
        &self,
        url: &str,
        title: &str,
        content: &str,
    ) -> Result<String, PipelineError> {
        let prompt = DESCRIPTION_PROMPT_TEMPLATE
            .replace("{title}", title)
            .replace("{url}", url)
            .replace("{content}", content);

        let messages = vec![ChatMessage::user().content(prompt).build()];

        if let Some(limiter) = &self.rate_limiter {
            loop {
                match limiter.try_acquire(1) {
                    Ok(()) => break,
                    Err(_) => {
                        tokio::time::sleep(Duration::from_millis(100)).await;
                    }
                }
            }
        }

        let response = self
            .model
            .chat(&messages)
            .await
            .map_err(|err| PipelineError::LlmApi(err.to_string()))?
            .to_string();

        let description = THINK_STRIPPER_REGEX
            .replace_all(&response, "")
            .trim()
            .to_owned();
        if description.is_empty() {
            return Err(PipelineError::LlmApi(
                "model returned an empty description".to_string(),
            ));
        }

        Ok(description)
    }
}

fn rate_limiter(rpm: Option<u32>) -> Option<StdTokenBucket> {
    rpm.and_then(|rpm| {
        let capacity = u64::from(rpm.max(1));
        let refill_interval = Duration::from_secs_f64(60.0 / capacity as f64);

        TokenBucketBuilder::builder()
            .capacity(capacity)
            .refill_amount(1_u64)
            .refill_every(refill_interval)
            .with_time(rate_guard::StdTimeSource::new())
            .with_precision::<rate_guard::Nanos>()
            .build()
            .ok()
    })
}

/// Enum representing one provider in the description chain.
pub enum DescriptionProvider<'a> {
    /// Ask the configured LLM.
    Llm(&'a LlmDescriber),
    /// Use the page's meta description.
    MetaTag,
    /// Use the page's first paragraph.
    FirstParagraph,
}

/// Builds the run's provider chain: the LLM first when AI descriptions are
/// enabled, then the static extractors.
pub fn provider_chain(llm_describer: Option<&LlmDescriber>) -> Vec<DescriptionProvider<'_>> {
    let mut providers = Vec::new();
    if let Some(describer) = llm_describer {
        providers.push(DescriptionProvider::Llm(describer));
    }
    providers.push(DescriptionProvider::MetaTag);
    providers.push(DescriptionProvider::FirstParagraph);

    providers
}

/// Runs the provider chain over a page; the first provider that yields
/// text wins. LLM failures are logged and degrade to the static providers.
pub async fn describe_page(
    providers: &[DescriptionProvider<'_>],
    url: &str,
    content: &PageContent,
) -> (Option<String>, Option<DescriptionSource>) {
    for provider in providers {
        match provider {
            DescriptionProvider::Llm(describer) => {
                if content.main_text.trim().is_empty() {
                    debug!("No content to summarize for {url}");
                    continue;
                }
                let title = content.title.as_deref().unwrap_or_default();
                match describer.describe(url, title, &content.main_text).await {
                    Ok(description) => {
                        return (Some(description), Some(DescriptionSource::Llm));
                    }
                    Err(error) => {
                        warn!("{error}; falling back to static description for {url}");
                    }
                }
            }
            DescriptionProvider::MetaTag => {
                if let Some(description) = content.meta_description.clone() {
                    return (Some(description), Some(DescriptionSource::MetaTag));
                }
            }
            DescriptionProvider::FirstParagraph => {
                if let Some(description) = content.first_paragraph.clone() {
                    return (Some(description), Some(DescriptionSource::FirstParagraph));
                }
            }
        }
    }

    (None, None)
}
