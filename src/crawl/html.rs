// src/crawl/html.rs
// =============================================================================
// Pulls what the crawler needs out of an HTML page:
// - same-host links (to feed the breadth-first crawl)
// - the page title and meta description (for the llms.txt entry)
//
// We use the `scraper` crate (html5ever underneath) with CSS selectors.
// Parsing is synchronous and the parsed document never crosses an .await.
// =============================================================================

use scraper::{Html, Selector};
use url::Url;

use crate::site::Page;

// Extracts the title and meta description of a page
//
// Parameters:
//   url: the page URL (copied into the result)
//   html: the page body
//
// Returns: a Page; missing title/description are left empty
pub(crate) fn extract_page(url: &str, html: &str) -> Page {
    let document = Html::parse_document(html);

    Page {
        url: url.to_string(),
        title: first_title(&document).unwrap_or_default(),
        description: meta_description(&document).unwrap_or_default(),
    }
}

fn first_title(document: &Html) -> Option<String> {
    let selector = Selector::parse("title").ok()?;
    let title = document.select(&selector).next()?;
    Some(title.text().collect::<String>().trim().to_string())
}

fn meta_description(document: &Html) -> Option<String> {
    let selector = Selector::parse("meta[name]").ok()?;
    let meta = document.select(&selector).find(|element| {
        element
            .value()
            .attr("name")
            .is_some_and(|name| name.eq_ignore_ascii_case("description"))
    })?;
    Some(meta.value().attr("content").unwrap_or_default().to_string())
}

// Extracts links that stay on the crawl's host
//
// Parameters:
//   html: the page body
//   page_url: URL of the page (relative hrefs resolve against it)
//   root: the crawl root; links must share its host and port
//
// Returns: absolute URLs with fragment and query removed, in document order
//
// Example:
//   page_url = "https://example.com/docs/"
//   href = "intro?tab=1#top" -> "https://example.com/docs/intro"
pub(crate) fn extract_same_host_links(html: &str, page_url: &str, root: &Url) -> Vec<String> {
    let mut links = Vec::new();

    let Ok(base) = Url::parse(page_url) else {
        return links;
    };
    let Ok(selector) = Selector::parse("a[href]") else {
        return links;
    };

    let document = Html::parse_document(html);

    for element in document.select(&selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        let Some(mut link) = resolve_link(&base, href) else {
            continue;
        };

        if !matches!(link.scheme(), "http" | "https") || !same_host(&link, root) {
            continue;
        }

        link.set_fragment(None);
        link.set_query(None);
        links.push(link.to_string());
    }

    links
}

// Resolves a link (possibly relative) to an absolute URL
fn resolve_link(base: &Url, href: &str) -> Option<Url> {
    let href = href.trim();

    // Skip in-page anchors and special protocols
    if href.is_empty()
        || href.starts_with('#')
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("javascript:")
    {
        return None;
    }

    base.join(href).ok()
}

// Host and explicit port must match; `port()` is None for a scheme's
// default port, so http://a/ and https://a/ count as the same host.
fn same_host(link: &Url, root: &Url) -> bool {
    link.host_str() == root.host_str() && link.port() == root.port()
}
