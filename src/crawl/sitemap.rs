// src/crawl/sitemap.rs
// =============================================================================
// Sitemap-first discovery.
//
// Two document shapes are understood:
// - <urlset><url><loc>..</loc></url>...</urlset>: page URLs, taken as-is
// - <sitemapindex><sitemap><loc>..</loc></sitemap>...</sitemapindex>: links
//   to more sitemaps, fetched one after another (depth-first) and flattened
//
// Anything else (HTML error pages, broken XML, empty files) simply yields no
// URLs, which makes the crawler fall back to following links.
// =============================================================================

use futures::future::BoxFuture;
use quick_xml::events::Event;
use quick_xml::Reader;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use url::Url;

use super::crawler::Crawler;
use super::pacing::Pacer;
use super::robots::RobotsPolicy;
use super::transport::Transport;
use super::MAX_PAGES;
use crate::error::Result;

// Nested sitemap indexes deeper than this are not followed
const MAX_INDEX_DEPTH: usize = 3;

/// A parsed sitemap document
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SitemapDocument {
    /// Page URLs from a <urlset>
    UrlSet(Vec<String>),
    /// Child sitemap URLs from a <sitemapindex>
    Index(Vec<String>),
}

// Parses sitemap XML
//
// Returns: None for malformed XML or an unknown root element
pub(crate) fn parse_sitemap(xml: &str) -> Option<SitemapDocument> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    // The root element decides which child element holds the <loc>s
    let mut entry_tag: Option<&'static str> = None;
    let mut in_entry = false;
    let mut in_loc = false;
    let mut locs = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = e.local_name();
                match (entry_tag, name.as_ref()) {
                    (None, b"urlset") => entry_tag = Some("url"),
                    (None, b"sitemapindex") => entry_tag = Some("sitemap"),
                    (None, _) => return None,
                    (Some(tag), name) if name == tag.as_bytes() => in_entry = true,
                    (Some(_), b"loc") if in_entry => in_loc = true,
                    _ => {}
                }
            }
            Ok(Event::End(e)) => {
                let name = e.local_name();
                match name.as_ref() {
                    b"loc" => in_loc = false,
                    name if entry_tag.is_some_and(|tag| name == tag.as_bytes()) => {
                        in_entry = false
                    }
                    _ => {}
                }
            }
            Ok(Event::Text(text)) if in_loc => {
                let loc = text.unescape().ok()?;
                push_loc(&mut locs, &loc);
            }
            Ok(Event::CData(data)) if in_loc => {
                push_loc(&mut locs, &String::from_utf8_lossy(&data));
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                debug!(error = %e, "sitemap is not valid XML");
                return None;
            }
            _ => {}
        }
    }

    match entry_tag? {
        "url" => Some(SitemapDocument::UrlSet(locs)),
        _ => Some(SitemapDocument::Index(locs)),
    }
}

fn push_loc(locs: &mut Vec<String>, loc: &str) {
    let loc = loc.trim();
    if !loc.is_empty() {
        locs.push(loc.to_string());
    }
}

impl<T: Transport> Crawler<T> {
    // Collects page URLs from the site's sitemap
    //
    // Parameters:
    //   root: the crawl root ("{scheme}://{host}/")
    //   robots: supplies the declared sitemap URL, if any
    //
    // Returns: at most MAX_PAGES URLs; empty if there is no usable sitemap.
    // Only cancellation is an error.
    pub(super) async fn discover_via_sitemap(
        &self,
        root: &Url,
        robots: &RobotsPolicy,
        pacer: &mut Pacer,
        cancel: &CancellationToken,
    ) -> Result<Vec<String>> {
        let sitemap_url = match &robots.sitemap_url {
            Some(url) => url.clone(),
            None => match root.join("sitemap.xml") {
                Ok(url) => url.to_string(),
                Err(_) => return Ok(Vec::new()),
            },
        };

        let mut urls = Vec::new();
        self.collect_sitemap(sitemap_url, 0, &mut urls, pacer, cancel)
            .await?;
        urls.truncate(MAX_PAGES);

        debug!(count = urls.len(), "sitemap discovery finished");
        Ok(urls)
    }

    // Fetches one sitemap and appends its URLs, recursing into indexes
    //
    // Boxed because an async fn cannot call itself directly.
    fn collect_sitemap<'a>(
        &'a self,
        sitemap_url: String,
        depth: usize,
        urls: &'a mut Vec<String>,
        pacer: &'a mut Pacer,
        cancel: &'a CancellationToken,
    ) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            let xml = match self.get(&sitemap_url, pacer, cancel).await {
                Ok(xml) => xml,
                Err(e) if e.is_cancelled() => return Err(e),
                Err(e) => {
                    debug!(error = %e, "sitemap unavailable");
                    return Ok(());
                }
            };

            match parse_sitemap(&xml) {
                Some(SitemapDocument::UrlSet(locs)) => urls.extend(locs),
                Some(SitemapDocument::Index(children)) => {
                    if depth >= MAX_INDEX_DEPTH {
                        warn!(url = %sitemap_url, "sitemap index nested too deeply, skipping");
                        return Ok(());
                    }
                    for child in children {
                        self.collect_sitemap(child, depth + 1, &mut *urls, &mut *pacer, cancel)
                            .await?;
                        if urls.len() >= MAX_PAGES {
                            break;
                        }
                    }
                }
                None => debug!(url = %sitemap_url, "not a sitemap document"),
            }

            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_urlset() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
        <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
          <url>
            <loc>https://example.com/page1</loc>
            <lastmod>2024-01-15</lastmod>
          </url>
          <url><loc> https://example.com/page2?a=1&amp;b=2 </loc></url>
        </urlset>"#;

        assert_eq!(
            parse_sitemap(xml),
            Some(SitemapDocument::UrlSet(vec![
                "https://example.com/page1".to_string(),
                "https://example.com/page2?a=1&b=2".to_string(),
            ]))
        );
    }

    #[test]
    fn test_parse_index() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
        <sitemapindex xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
          <sitemap><loc>https://example.com/sitemap-1.xml</loc></sitemap>
          <sitemap><loc>https://example.com/sitemap-2.xml</loc></sitemap>
        </sitemapindex>"#;

        assert_eq!(
            parse_sitemap(xml),
            Some(SitemapDocument::Index(vec![
                "https://example.com/sitemap-1.xml".to_string(),
                "https://example.com/sitemap-2.xml".to_string(),
            ]))
        );
    }

    #[test]
    fn test_parse_cdata_loc() {
        let xml = "<urlset><url><loc><![CDATA[https://example.com/x]]></loc></url></urlset>";
        assert_eq!(
            parse_sitemap(xml),
            Some(SitemapDocument::UrlSet(vec!["https://example.com/x".to_string()]))
        );
    }

    #[test]
    fn test_loc_outside_entry_is_ignored() {
        let xml = "<urlset><loc>https://example.com/stray</loc><url><loc>https://example.com/a</loc></url></urlset>";
        assert_eq!(
            parse_sitemap(xml),
            Some(SitemapDocument::UrlSet(vec!["https://example.com/a".to_string()]))
        );
    }

    #[test]
    fn test_html_is_not_a_sitemap() {
        assert_eq!(parse_sitemap("<html><body>Not found</body></html>"), None);
    }

    #[test]
    fn test_empty_body_is_not_a_sitemap() {
        assert_eq!(parse_sitemap(""), None);
    }
}
