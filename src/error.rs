//! Error kinds for the generation pipeline.
//!
//! Only reading the URL source is fatal to a run. Every per-URL failure
//! degrades to an entry with empty content and is tallied in the run
//! report.

use thiserror::Error;

/// Enum representing everything that can go wrong during a run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The sitemap or CSV input could not be read. Aborts the run.
    #[error("failed to read URL source: {0}")]
    SourceParse(String),

    /// A page could not be fetched. The entry proceeds with empty content.
    #[error("failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },

    /// A fetched page could not be parsed. Same fallback as a fetch failure.
    #[error("failed to extract content from {url}: {reason}")]
    Extraction { url: String, reason: String },

    /// The LLM endpoint failed; the static description chain takes over.
    #[error("LLM request failed: {0}")]
    LlmApi(String),

    /// Invalid user input, rejected before the pipeline starts.
    #[error("invalid input: {0}")]
    Validation(String),
}
