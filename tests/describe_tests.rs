use crate::describe_extras::StubLlmProvider;
use llmsgen::describe::{
    DescriptionSource, LlmDescriber, describe_page, provider_chain,
};
use llmsgen::extract::PageContent;
use spectral::assert_that;

mod describe_extras;

assert_descriptions![
    plain_response_used_verbatim:
        response => "A concise description of the page.",
        result => "A concise description of the page.",
    filled_think_removed:
        response => "<think>Reasoning about the page</think>\nA concise description.",
        result => "A concise description.",
    empty_think_removed:
        response => "<think>\n</think>\nA concise description.",
        result => "A concise description.",
    surrounding_whitespace_trimmed:
        response => "  A concise description.\n",
        result => "A concise description.",
];

fn content(meta: Option<&str>, paragraph: Option<&str>, main_text: &str) -> PageContent {
    PageContent {
        title: Some("Test Page".to_string()),
        meta_description: meta.map(str::to_string),
        first_paragraph: paragraph.map(str::to_string),
        main_text: main_text.to_string(),
    }
}

#[tokio::test]
async fn empty_llm_response_falls_back_to_meta_description() {
    let describer = LlmDescriber::from_provider(Box::new(StubLlmProvider::new(String::new())));
    let providers = provider_chain(Some(&describer));
    let page = content(Some("Meta text."), Some("First paragraph."), "Body text.");

    let (description, source) = describe_page(&providers, "http://example.com/", &page).await;

    assert_that(&description).is_equal_to(Some("Meta text.".to_string()));
    assert_that(&source).is_equal_to(Some(DescriptionSource::MetaTag));
}

#[tokio::test]
async fn think_only_response_falls_back_to_meta_description() {
    let describer = LlmDescriber::from_provider(Box::new(StubLlmProvider::new(
        "<think>Nothing but reasoning</think>".to_string(),
    )));
    let providers = provider_chain(Some(&describer));
    let page = content(Some("Meta text."), None, "Body text.");

    let (description, source) = describe_page(&providers, "http://example.com/", &page).await;

    assert_that(&description).is_equal_to(Some("Meta text.".to_string()));
    assert_that(&source).is_equal_to(Some(DescriptionSource::MetaTag));
}

#[tokio::test]
async fn llm_is_skipped_when_there_is_no_content_to_summarize() {
    let describer = LlmDescriber::from_provider(Box::new(StubLlmProvider::new(
        "Generated description.".to_string(),
    )));
    let providers = provider_chain(Some(&describer));
    let page = content(Some("Meta text."), None, "   ");

    let (description, source) = describe_page(&providers, "http://example.com/", &page).await;

    assert_that(&description).is_equal_to(Some("Meta text.".to_string()));
    assert_that(&source).is_equal_to(Some(DescriptionSource::MetaTag));
}

#[tokio::test]
async fn llm_response_wins_over_static_providers() {
    let describer = LlmDescriber::from_provider(Box::new(StubLlmProvider::new(
        "Generated description.".to_string(),
    )));
    let providers = provider_chain(Some(&describer));
    let page = content(Some("Meta text."), Some("First paragraph."), "Body text.");

    let (description, source) = describe_page(&providers, "http://example.com/", &page).await;

    assert_that(&description).is_equal_to(Some("Generated description.".to_string()));
    assert_that(&source).is_equal_to(Some(DescriptionSource::Llm));
}

#[tokio::test]
async fn static_chain_prefers_meta_over_first_paragraph() {
    let providers = provider_chain(None);
    let page = content(Some("Meta text."), Some("First paragraph."), "Body text.");

    let (description, source) = describe_page(&providers, "http://example.com/", &page).await;

    assert_that(&description).is_equal_to(Some("Meta text.".to_string()));
    assert_that(&source).is_equal_to(Some(DescriptionSource::MetaTag));
}

#[tokio::test]
async fn first_paragraph_is_used_when_there_is_no_meta_description() {
    let providers = provider_chain(None);
    let page = content(None, Some("First paragraph."), "Body text.");

    let (description, source) = describe_page(&providers, "http://example.com/", &page).await;

    assert_that(&description).is_equal_to(Some("First paragraph.".to_string()));
    assert_that(&source).is_equal_to(Some(DescriptionSource::FirstParagraph));
}

#[tokio::test]
async fn no_matching_provider_yields_no_description() {
    let providers = provider_chain(None);
    let page = content(None, None, "Body text.");

    let (description, source) = describe_page(&providers, "http://example.com/", &page).await;

    assert_that(&description).is_equal_to(None);
    assert_that(&source).is_equal_to(None);
}
