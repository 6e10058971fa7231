// src/site/llmstxt.rs
// =============================================================================
// Renders a Site as llms.txt markdown.
//
// Output shape:
//
//   # Site Name
//
//   > Site description
//
//   ## Section
//
//   - [Page title](https://example.com/page): Page description
//
//   ## Optional
//
//   - [Other page](https://example.com/other)
//
// The description line and the Optional section only appear when they have
// content. Formatting is pure string building, so it never fails.
// =============================================================================

use std::fmt::Write;

use super::{Page, Site};

/// Turns a structured Site into final text
pub trait Formatter: Send + Sync {
    fn format(&self, site: &Site) -> String;
}

/// The llms.txt markdown format
#[derive(Debug, Clone, Copy, Default)]
pub struct LlmsTxt;

impl Formatter for LlmsTxt {
    fn format(&self, site: &Site) -> String {
        let mut out = String::new();

        // Writing into a String cannot fail, so the fmt::Results are ignored
        let _ = writeln!(out, "# {}", site.name);

        if !site.description.is_empty() {
            let _ = write!(out, "\n> {}\n", site.description);
        }

        for section in &site.sections {
            let _ = write!(out, "\n## {}\n\n", section.name);
            for page in &section.pages {
                write_link(&mut out, page);
            }
        }

        if !site.optional.is_empty() {
            out.push_str("\n## Optional\n\n");
            for page in &site.optional {
                write_link(&mut out, page);
            }
        }

        out
    }
}

fn write_link(out: &mut String, page: &Page) {
    if page.description.is_empty() {
        let _ = writeln!(out, "- [{}]({})", page.title, page.url);
    } else {
        let _ = writeln!(out, "- [{}]({}): {}", page.title, page.url, page.description);
    }
}
