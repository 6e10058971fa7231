// src/crawl/mod.rs
// =============================================================================
// This module discovers the pages of a website and fetches their metadata.
//
// Discovery strategy:
// 1. Read /robots.txt (Disallow rules for "User-agent: *", Sitemap line)
// 2. Try the sitemap (robots-declared, else /sitemap.xml)
// 3. Only if the sitemap gives us nothing, crawl links breadth-first
// 4. Drop anything robots.txt disallows
//
// Politeness:
// - One request at a time per crawl, with a delay between requests
// - Fixed page and depth budgets
// - A fixed, identifying User-Agent
//
// Submodules:
// - crawler: the Crawler type (discover / fetch_page / crawl)
// - transport: the HTTP seam (real reqwest client, fakes in tests)
// - robots: robots.txt parsing
// - sitemap: sitemap.xml and sitemap index parsing
// - queue: breadth-first link crawl fallback
// - html: link and metadata extraction from HTML
// - pacing: cancellable delay between requests
// =============================================================================

mod crawler;
mod html;
mod pacing;
mod queue;
mod robots;
mod sitemap;
mod transport;

use std::time::Duration;

pub use crawler::{validate_site_url, Crawler};
pub use pacing::pause;
pub use transport::{HttpTransport, Transport};

#[cfg(test)]
pub(crate) use transport::testing;

/// Most pages a single crawl will ever return
pub const MAX_PAGES: usize = 100;

/// Deepest link level the breadth-first fallback follows (root = 0)
pub const MAX_DEPTH: usize = 3;

/// Pause between two network requests of the same crawl
pub const REQUEST_DELAY: Duration = Duration::from_millis(150);

/// Upper bound on any single request
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Sent with every request so site owners can identify us
pub const USER_AGENT: &str = "llms-txt-generator/1.0";
