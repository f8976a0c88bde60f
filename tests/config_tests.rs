use llmsgen::config::{SiteMetadata, model_display_name, validate_model_id};
use llmsgen::constants::DEFAULT_MODEL;
use spectral::assert_that;

#[test]
fn accepts_well_formed_model_ids() {
    for model in [
        "deepseek/deepseek-r1-0528",
        "openai/gpt-4.1",
        "anthropic/claude-3.5-sonnet",
        "google/gemini-2.5-flash-preview-05-20:thinking",
        "x-ai/grok-3-beta",
        "custom-provider/my-model:variant",
    ] {
        assert_that(&validate_model_id(model).is_ok()).is_equal_to(true);
    }
}

#[test]
fn rejects_malformed_model_ids() {
    for model in [
        "",
        "invalid",
        "provider",
        "/model",
        "provider/",
        "provider model",
        "provider/model/extra",
        "provider/model:variant:extra",
    ] {
        assert_that(&validate_model_id(model).is_err()).is_equal_to(true);
    }
}

#[test]
fn default_model_is_well_formed() {
    assert_that(&validate_model_id(DEFAULT_MODEL).is_ok()).is_equal_to(true);
}

#[test]
fn display_name_marks_free_variants() {
    assert_that(&model_display_name("deepseek/deepseek-r1-0528:free"))
        .is_equal_to("deepseek-r1-0528 (Free)".to_string());
}

#[test]
fn display_name_marks_thinking_variants() {
    assert_that(&model_display_name("anthropic/claude-3.7-sonnet:thinking"))
        .is_equal_to("claude-3.7-sonnet (Thinking)".to_string());
}

#[test]
fn display_name_drops_the_provider_prefix() {
    assert_that(&model_display_name("openai/gpt-4.1-mini"))
        .is_equal_to("gpt-4.1-mini".to_string());
}

#[test]
fn display_name_passes_through_bare_names() {
    assert_that(&model_display_name("invalid")).is_equal_to("invalid".to_string());
}

#[test]
fn site_metadata_keeps_supplied_values() {
    let site = SiteMetadata::resolve(
        Some("My Site".to_string()),
        Some("All about my site".to_string()),
        Some("https://example.com/"),
    );

    assert_that(&site.name).is_equal_to("My Site".to_string());
    assert_that(&site.description).is_equal_to("All about my site".to_string());
}

#[test]
fn site_metadata_derives_name_from_first_url() {
    let site = SiteMetadata::resolve(None, None, Some("https://www.example.com/docs/"));

    assert_that(&site.name).is_equal_to("Example".to_string());
    assert_that(&site.description).is_equal_to("Information about Example".to_string());
}

#[test]
fn site_metadata_treats_blank_values_as_missing() {
    let site = SiteMetadata::resolve(
        Some("   ".to_string()),
        Some(String::new()),
        Some("https://example.com/"),
    );

    assert_that(&site.name).is_equal_to("Example".to_string());
    assert_that(&site.description).is_equal_to("Information about Example".to_string());
}
