// src/generate/mod.rs
// =============================================================================
// Ties the pieces together: crawl a site, structure it, format it.
//
// Two flavours:
// - generate: returns the finished llms.txt (or an error) in one go
// - generate_stream: reports progress event by event (see stream.rs)
// =============================================================================

mod stream;

use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::crawl::{Crawler, HttpTransport, Transport};
use crate::error::Result;
use crate::site::{structure, Formatter, LlmsTxt};

pub use stream::ProgressEvent;

/// Generates llms.txt content for websites
pub struct Generator<T = HttpTransport, F = LlmsTxt> {
    crawler: Crawler<T>,
    formatter: F,
}

impl<T: Transport, F: Formatter> Generator<T, F> {
    pub fn new(crawler: Crawler<T>, formatter: F) -> Self {
        Self { crawler, formatter }
    }

    // Crawls a site and returns its llms.txt
    //
    // Errors: InvalidInput for a bad site URL, Cancelled if cancelled.
    // Pages that fail to load are simply missing from the output.
    pub async fn generate(&self, site_url: &str, cancel: &CancellationToken) -> Result<String> {
        let pages = self.crawler.crawl(site_url, cancel).await?;
        let site = structure(site_url, &pages);
        info!(
            site = site_url,
            sections = site.sections.len(),
            optional = site.optional.len(),
            "structured site"
        );
        Ok(self.formatter.format(&site))
    }
}
