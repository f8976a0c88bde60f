//! The categorize module buckets URLs into the fixed llms.txt sections.
//! Pure functions of (url, title, description); no state and no network.

use url::Url;

/// Enum representing the fixed llms.txt sections.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Category {
    Docs,
    Api,
    Examples,
    Guides,
    #[default]
    Other,
}

/// Categories that carry keyword rules, in match precedence order.
const KEYWORD_CATEGORIES: [Category; 4] = [
    Category::Docs,
    Category::Api,
    Category::Examples,
    Category::Guides,
];

impl Category {
    /// All categories in their output order.
    pub const ALL: [Category; 5] = [
        Category::Docs,
        Category::Api,
        Category::Examples,
        Category::Guides,
        Category::Other,
    ];

    /// The section heading used in the rendered file.
    pub fn section_title(self) -> &'static str {
        match self {
            Category::Docs => "Documentation",
            Category::Api => "API Reference",
            Category::Examples => "Examples",
            Category::Guides => "Guides & Tutorials",
            Category::Other => "Resources",
        }
    }

    fn keywords(self) -> &'static [&'static str] {
        match self {
            Category::Docs => &["docs", "documentation", "doc", "manual"],
            Category::Api => &["api", "apis", "reference", "schema"],
            Category::Examples => &[
                "example", "examples", "demo", "demos", "sample", "samples", "tutorial",
                "tutorials",
            ],
            Category::Guides => &["guide", "guides", "how-to", "howto"],
            Category::Other => &[],
        }
    }
}

/// Buckets a URL by its path segments first, then by title/description
/// keywords. Rules are checked in section order and the first match wins;
/// anything unmatched lands in `Other`.
pub fn categorize(url: &str, title: Option<&str>, description: Option<&str>) -> Category {
    if let Some(category) = match_tokens(&url_path_tokens(url)) {
        return category;
    }

    let mut text = String::new();
    if let Some(title) = title {
        text.push_str(title);
        text.push(' ');
    }
    if let Some(description) = description {
        text.push_str(description);
    }

    match_tokens(&tokenize(&text)).unwrap_or(Category::Other)
}

fn match_tokens(tokens: &[String]) -> Option<Category> {
    for category in KEYWORD_CATEGORIES {
        if category
            .keywords()
            .iter()
            .any(|keyword| tokens.iter().any(|token| token == keyword))
        {
            return Some(category);
        }
    }

    None
}

fn url_path_tokens(url: &str) -> Vec<String> {
    let path = Url::parse(url)
        .map(|parsed| parsed.path().to_string())
        .unwrap_or_else(|_| url.to_string());

    tokenize(&path)
}

/// Splits on everything except alphanumerics and `-`, so `how-to`
/// survives as a single token.
fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_ascii_alphanumeric() || c == '-'))
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}
