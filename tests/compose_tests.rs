use llmsgen::categorize::Category;
use llmsgen::compose::compose;
use llmsgen::config::SiteMetadata;
use llmsgen::pipeline::UrlEntry;
use spectral::assert_that;

fn entry(
    url: &str,
    title: Option<&str>,
    description: Option<&str>,
    category: Category,
) -> UrlEntry {
    UrlEntry {
        url: url.to_string(),
        title: title.map(str::to_string),
        description: description.map(str::to_string),
        description_source: None,
        category,
        failure: None,
    }
}

fn site() -> SiteMetadata {
    SiteMetadata {
        name: "Example".to_string(),
        description: "Information about Example".to_string(),
    }
}

#[test]
fn renders_site_header_sections_and_entries() {
    let entries = [
        entry(
            "https://example.com/docs/intro",
            Some("Intro"),
            Some("Getting started."),
            Category::Docs,
        ),
        entry(
            "https://example.com/api/client",
            Some("Client API"),
            Some("The API surface."),
            Category::Api,
        ),
        entry(
            "https://example.com/blog/post",
            Some("Post"),
            None,
            Category::Other,
        ),
    ];

    let text = compose(&site(), &entries, 10);
    let expected = "# Example\n\
                    > Information about Example\n\
                    \n\
                    ## Documentation\n\
                    - [Intro](https://example.com/docs/intro): Getting started.\n\
                    \n\
                    ## API Reference\n\
                    - [Client API](https://example.com/api/client): The API surface.\n\
                    \n\
                    ## Resources\n\
                    - [Post](https://example.com/blog/post)\n";

    assert_that(&text).is_equal_to(expected.to_string());
}

#[test]
fn is_idempotent() {
    let entries = [
        entry(
            "https://example.com/docs/intro",
            Some("Intro"),
            Some("Getting started."),
            Category::Docs,
        ),
        entry("https://example.com/other", None, None, Category::Other),
    ];

    let first_pass = compose(&site(), &entries, 10);
    let second_pass = compose(&site(), &entries, 10);

    assert_that(&first_pass).is_equal_to(second_pass);
}

#[test]
fn keeps_source_order_within_a_section() {
    let entries = [
        entry("https://example.com/docs/b", Some("B"), None, Category::Docs),
        entry("https://example.com/docs/a", Some("A"), None, Category::Docs),
        entry("https://example.com/docs/c", Some("C"), None, Category::Docs),
    ];

    let text = compose(&site(), &entries, 10);
    let expected = "# Example\n\
                    > Information about Example\n\
                    \n\
                    ## Documentation\n\
                    - [B](https://example.com/docs/b)\n\
                    - [A](https://example.com/docs/a)\n\
                    - [C](https://example.com/docs/c)\n";

    assert_that(&text).is_equal_to(expected.to_string());
}

#[test]
fn caps_entries_per_section() {
    let entries = [
        entry("https://example.com/docs/a", Some("A"), None, Category::Docs),
        entry("https://example.com/docs/b", Some("B"), None, Category::Docs),
        entry("https://example.com/docs/c", Some("C"), None, Category::Docs),
    ];

    let text = compose(&site(), &entries, 2);

    assert_that(&text.matches("- [").count()).is_equal_to(2);
    assert_that(&text.contains("- [C]")).is_equal_to(false);
}

#[test]
fn skips_empty_sections() {
    let entries = [entry(
        "https://example.com/docs/intro",
        Some("Intro"),
        None,
        Category::Docs,
    )];

    let text = compose(&site(), &entries, 10);

    assert_that(&text.contains("## Documentation")).is_equal_to(true);
    assert_that(&text.contains("## Resources")).is_equal_to(false);
    assert_that(&text.contains("## Examples")).is_equal_to(false);
}

#[test]
fn falls_back_to_url_slug_titles() {
    let entries = [entry(
        "https://example.com/docs/getting-started",
        None,
        None,
        Category::Docs,
    )];

    let text = compose(&site(), &entries, 10);

    assert_that(
        &text.contains("- [Getting Started](https://example.com/docs/getting-started)"),
    )
    .is_equal_to(true);
}
