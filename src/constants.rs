use std::time::Duration;

/// Environment variable holding the OpenRouter API key.
pub const API_KEY_ENV_NAME: &str = "OPENROUTER_API_KEY";
/// Environment variable overriding the per-request timeout in seconds.
pub const REQUEST_TIMEOUT_ENV_NAME: &str = "REQUEST_TIMEOUT";
/// Environment variable overriding the number of concurrent workers.
pub const MAX_WORKERS_ENV_NAME: &str = "MAX_WORKERS";
/// Environment variable overriding the per-section URL cap.
pub const MAX_URLS_PER_SECTION_ENV_NAME: &str = "MAX_URLS_PER_SECTION";

/// Chat-completion endpoint used for generated descriptions.
pub const OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";
/// Model used when none is supplied (first free catalog option).
pub const DEFAULT_MODEL: &str = "deepseek/deepseek-r1-0528:free";

pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_MAX_WORKERS: usize = 5;
pub const DEFAULT_MAX_URLS_PER_SECTION: usize = 10;

/// Maximum characters of main text kept per page; bounds the prompt size
/// sent to the model.
pub const MAX_CONTENT_LENGTH: usize = 8000;
/// First-paragraph descriptions are truncated to this many characters.
pub const MAX_STATIC_DESCRIPTION_LENGTH: usize = 150;

/// Extra wait after page load before reading the rendered DOM.
pub const RENDER_SETTLE_DELAY: Duration = Duration::from_millis(500);

pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

pub(crate) const THINK_STRIPPER: &str = r"<think>[\s\S]*</think>\s*";

pub(crate) const DESCRIPTION_PROMPT_TEMPLATE: &str = r"Analyze the following web page content and write a concise, informative description (1-2 sentences) of what the page is about.
Focus on the main topic, purpose and key information covered.
Make the description useful for someone deciding whether to visit the page.
Answer with the description only, it will be pasted directly into an index file.

Page title: {title}
Page URL: {url}
Page content:
{content}";
