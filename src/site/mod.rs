// src/site/mod.rs
// =============================================================================
// This module holds the data model of a generated llms.txt and the logic
// that builds it.
//
// Submodules:
// - structure: groups a flat list of crawled pages into named sections
// - sections: the lookup table from URL path segments to section names
// - llmstxt: renders a Site into llms.txt markdown
//
// The types below are deliberately plain: a Page is what the crawler hands
// us, a Site is what the formatter consumes.
// =============================================================================

mod llmstxt;
mod sections;
mod structure;

use serde::{Deserialize, Serialize};

pub use llmstxt::{Formatter, LlmsTxt};
pub use structure::structure;

/// A single web page discovered during crawling
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    /// Absolute URL of the page
    pub url: String,
    /// Trimmed text of the first <title> element (empty if missing)
    pub title: String,
    /// Content of <meta name="description"> (empty if missing)
    pub description: String,
}

/// A named group of pages, e.g. "Documentation"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub name: String,
    /// Ordered by title
    pub pages: Vec<Page>,
}

/// Everything needed to write an llms.txt file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Site {
    pub name: String,
    pub description: String,
    /// Ordered by name
    pub sections: Vec<Section>,
    /// Pages demoted from the smallest sections when there are too many
    pub optional: Vec<Page>,
}
