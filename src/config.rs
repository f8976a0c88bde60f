//! Run configuration: immutable per-run settings resolved from environment
//! variables and CLI flags, plus model identifier handling.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

use crate::FetchMode;
use crate::constants::{
    API_KEY_ENV_NAME, DEFAULT_MAX_URLS_PER_SECTION, DEFAULT_MAX_WORKERS,
    DEFAULT_REQUEST_TIMEOUT_SECS, MAX_CONTENT_LENGTH, MAX_URLS_PER_SECTION_ENV_NAME,
    MAX_WORKERS_ENV_NAME, REQUEST_TIMEOUT_ENV_NAME,
};
use crate::error::PipelineError;

static MODEL_ID_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9_-]+/[a-zA-Z0-9._-]+(?::[a-zA-Z0-9._-]+)?$")
        .expect("Failed to compile MODEL_ID regex")
});

/// Curated OpenRouter models grouped by provider. Any other identifier can
/// be supplied as a custom model, subject to [`validate_model_id`].
pub const MODEL_CATALOG: &[(&str, &[&str])] = &[
    (
        "Deepseek",
        &[
            "deepseek/deepseek-r1-0528",
            "deepseek/deepseek-prover-v2",
            "deepseek/deepseek-r1-0528:free",
            "deepseek/deepseek-prover-v2:free",
        ],
    ),
    (
        "OpenAI",
        &[
            "openai/gpt-4.1",
            "openai/gpt-4.1-mini",
            "openai/gpt-4.1-nano",
            "openai/chatgpt-4o-latest",
            "openai/gpt-4o-mini",
            "openai/o1-preview",
            "openai/o1-mini",
        ],
    ),
    (
        "Claude",
        &[
            "anthropic/claude-opus-4",
            "anthropic/claude-sonnet-4",
            "anthropic/claude-3.7-sonnet",
            "anthropic/claude-3.7-sonnet:thinking",
            "anthropic/claude-3.5-haiku",
            "anthropic/claude-3.5-sonnet",
        ],
    ),
    (
        "Gemini",
        &[
            "google/gemini-2.5-flash-preview-05-20",
            "google/gemini-2.5-flash-preview-05-20:thinking",
            "google/gemini-2.5-pro-preview",
            "google/gemma-3-27b-it",
        ],
    ),
    ("xAI", &["x-ai/grok-3-mini-beta", "x-ai/grok-3-beta"]),
    ("Qwen", &["qwen/qwen2.5-vl-32b-instruct"]),
];

/// Checks a model identifier against the `provider/model-name[:variant]`
/// format. Bare names, trailing slashes and embedded whitespace are
/// rejected.
///
/// # Errors
///
/// Returns `PipelineError::Validation` when the identifier does not match.
pub fn validate_model_id(model: &str) -> Result<(), PipelineError> {
    if MODEL_ID_REGEX.is_match(model.trim()) {
        Ok(())
    } else {
        Err(PipelineError::Validation(format!(
            "invalid model identifier {model:?}, expected provider/model-name[:variant]"
        )))
    }
}

/// Returns a user-friendly display name for a model identifier: the
/// provider prefix is dropped and the `:free`/`:thinking` variants become
/// ` (Free)`/` (Thinking)` suffixes.
pub fn model_display_name(model: &str) -> String {
    let Some((_, name)) = model.split_once('/') else {
        return model.to_string();
    };
    if let Some(base) = name.strip_suffix(":free") {
        format!("{base} (Free)")
    } else if let Some(base) = name.strip_suffix(":thinking") {
        format!("{base} (Thinking)")
    } else {
        name.to_string()
    }
}

/// Website name and description shown at the top of the generated file.
/// User-supplied and frozen before the pipeline starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteMetadata {
    pub name: String,
    pub description: String,
}

impl SiteMetadata {
    /// Fills in blanks: a missing name is derived from the first URL's
    /// domain and a missing description becomes a generic one-liner.
    pub fn resolve(
        name: Option<String>,
        description: Option<String>,
        first_url: Option<&str>,
    ) -> Self {
        let name = match name.filter(|value| !value.trim().is_empty()) {
            Some(value) => value.trim().to_string(),
            None => first_url
                .and_then(site_name_from_url)
                .unwrap_or_else(|| "Website".to_string()),
        };
        let description = match description.filter(|value| !value.trim().is_empty()) {
            Some(value) => value.trim().to_string(),
            None => format!("Information about {name}"),
        };

        Self { name, description }
    }
}

/// Derives a site name from the registrable part of a URL's host,
/// e.g. `https://www.example.com/a` becomes `Example`.
fn site_name_from_url(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?;
    let label = host.split('.').rev().nth(1).unwrap_or(host);
    let mut chars = label.chars();
    let first = chars.next()?;
    Some(first.to_uppercase().chain(chars).collect())
}

/// Immutable per-run settings. Resolved from the environment, overridden
/// by CLI flags, validated before the pipeline starts.
pub struct ProcessingConfig {
    /// How page HTML is obtained, chosen once for the whole run.
    pub fetch_mode: FetchMode,
    /// Whether descriptions are generated with an LLM.
    pub use_ai_description: bool,
    /// OpenRouter model identifier, `provider/model-name[:variant]`.
    pub llm_model: String,
    /// API key for the LLM endpoint, if configured.
    pub api_key: Option<String>,
    /// Bound on every network request.
    pub request_timeout: Duration,
    /// Number of URLs processed concurrently.
    pub max_workers: usize,
    /// Cap on entries listed per output section.
    pub max_urls_per_section: usize,
    /// Cap on extracted main text, in characters.
    pub max_content_length: usize,
    /// Optional rate limit for LLM requests per minute.
    pub rpm: Option<u32>,
}

impl ProcessingConfig {
    /// Resolves the baseline configuration from the environment. The model
    /// identifier is validated here when AI descriptions are requested, so
    /// a malformed one rejects the run before any URL is touched.
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::Validation` for a malformed model
    /// identifier or an unparseable environment override.
    pub fn from_env(
        fetch_mode: FetchMode,
        use_ai_description: bool,
        llm_model: String,
    ) -> Result<Self, PipelineError> {
        if use_ai_description {
            validate_model_id(&llm_model)?;
        }

        Ok(Self {
            fetch_mode,
            use_ai_description,
            llm_model,
            api_key: env::var(API_KEY_ENV_NAME)
                .ok()
                .filter(|key| !key.trim().is_empty()),
            request_timeout: Duration::from_secs(env_or(
                REQUEST_TIMEOUT_ENV_NAME,
                DEFAULT_REQUEST_TIMEOUT_SECS,
            )?),
            max_workers: env_or(MAX_WORKERS_ENV_NAME, DEFAULT_MAX_WORKERS)?,
            max_urls_per_section: env_or(
                MAX_URLS_PER_SECTION_ENV_NAME,
                DEFAULT_MAX_URLS_PER_SECTION,
            )?,
            max_content_length: MAX_CONTENT_LENGTH,
            rpm: None,
        })
    }
}

/// Reads an environment override, falling back to the default when the
/// variable is absent.
fn env_or<T: FromStr>(name: &str, default: T) -> Result<T, PipelineError> {
    match env::var(name) {
        Ok(raw) => raw.trim().parse().map_err(|_| {
            PipelineError::Validation(format!("{name} must be a positive integer, got {raw:?}"))
        }),
        Err(env::VarError::NotPresent) => Ok(default),
        Err(error) => Err(PipelineError::Validation(format!("{name}: {error}"))),
    }
}
