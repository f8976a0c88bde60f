//! The compose module renders categorized entries into the llms.txt
//! format: a site heading, a description blockquote and one section per
//! non-empty category.

use std::fmt::Write;

use crate::categorize::Category;
use crate::config::SiteMetadata;
use crate::extract::title_from_url;
use crate::pipeline::UrlEntry;

/// Renders the llms.txt document. Sections appear in fixed category order,
/// entries keep their source order and each section is capped at
/// `max_urls_per_section` entries. Deterministic: the same input always
/// yields byte-identical output.
pub fn compose(site: &SiteMetadata, entries: &[UrlEntry], max_urls_per_section: usize) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "# {}", site.name);
    let _ = writeln!(output, "> {}", site.description);

    for category in Category::ALL {
        let section: Vec<&UrlEntry> = entries
            .iter()
            .filter(|entry| entry.category == category)
            .take(max_urls_per_section)
            .collect();
        if section.is_empty() {
            continue;
        }

        let _ = writeln!(output);
        let _ = writeln!(output, "## {}", category.section_title());
        for entry in section {
            let title = entry
                .title
                .clone()
                .unwrap_or_else(|| title_from_url(&entry.url));
            match &entry.description {
                Some(description) => {
                    let _ = writeln!(output, "- [{title}]({}): {description}", entry.url);
                }
                None => {
                    let _ = writeln!(output, "- [{title}]({})", entry.url);
                }
            }
        }
    }

    output
}
