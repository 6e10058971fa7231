// src/crawl/crawler.rs
// =============================================================================
// The Crawler: the public face of the discovery engine.
//
// Three operations:
// - discover: robots.txt -> sitemap (or link crawl) -> ordered URL list
// - fetch_page: one GET, then title/description extraction
// - crawl: discover, then fetch_page for every URL, skipping failures
//
// Every network call races the caller's CancellationToken. When the token
// fires, the in-flight request future is dropped (which aborts the request)
// and the operation returns Error::Cancelled.
// =============================================================================

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use url::Url;

use super::html::extract_page;
use super::pacing::{pause, Pacer};
use super::robots::RobotsPolicy;
use super::transport::{HttpTransport, Transport};
use crate::error::{Error, Result};
use crate::site::Page;

/// Discovers and fetches the pages of one website at a time
///
/// A Crawler holds no per-crawl state, so one instance can serve many
/// concurrent crawls.
#[derive(Debug)]
pub struct Crawler<T = HttpTransport> {
    transport: T,
}

impl Crawler<HttpTransport> {
    /// Crawler that talks to the network with reqwest
    pub fn new() -> reqwest::Result<Self> {
        Ok(Self::with_transport(HttpTransport::new()?))
    }
}

impl<T: Transport> Crawler<T> {
    pub fn with_transport(transport: T) -> Self {
        Self { transport }
    }

    // Lists the pages of a site, in discovery order
    //
    // Parameters:
    //   site_url: root URL given by the caller, e.g. "https://example.com"
    //   cancel: aborts the discovery when triggered
    //
    // Returns: up to MAX_PAGES URLs, none of them disallowed by robots.txt
    //
    // Errors: InvalidInput for a bad site_url, Cancelled if cancelled.
    // Network failures never fail discovery; they just find fewer pages.
    pub async fn discover(&self, site_url: &str, cancel: &CancellationToken) -> Result<Vec<String>> {
        let site = validate_site_url(site_url)?;
        let root = crawl_root(&site);
        let mut pacer = Pacer::new();

        let robots = self.fetch_robots(&root, &mut pacer, cancel).await?;

        let mut urls = self
            .discover_via_sitemap(&root, &robots, &mut pacer, cancel)
            .await?;

        if urls.is_empty() {
            info!(site = %root, "no sitemap entries, following links instead");
            urls = self
                .discover_via_bfs(&root, &robots, &mut pacer, cancel)
                .await?;
        } else {
            info!(site = %root, count = urls.len(), "using sitemap");
        }

        urls.retain(|url| {
            let disallowed = robots.is_disallowed(url);
            if disallowed {
                debug!(%url, "disallowed by robots.txt");
            }
            !disallowed
        });

        Ok(urls)
    }

    // Fetches one page and extracts its title and description
    //
    // Errors: Fetch on non-200, transport error or timeout; Cancelled.
    pub async fn fetch_page(&self, page_url: &str, cancel: &CancellationToken) -> Result<Page> {
        let html = self.request(page_url, cancel).await?;
        Ok(extract_page(page_url, &html))
    }

    // Discovers a site and fetches metadata for every page found
    //
    // Pages that fail to load are left out; a partial result is still a
    // success. Requests are sent one at a time with a pause in between.
    pub async fn crawl(&self, site_url: &str, cancel: &CancellationToken) -> Result<Vec<Page>> {
        let urls = self.discover(site_url, cancel).await?;
        let mut pages = Vec::with_capacity(urls.len());

        for url in &urls {
            pause(cancel).await?;
            match self.fetch_page(url, cancel).await {
                Ok(page) => pages.push(page),
                Err(e) if e.is_cancelled() => return Err(e),
                Err(e) => warn!(error = %e, "skipping page"),
            }
        }

        info!(
            site = site_url,
            discovered = urls.len(),
            fetched = pages.len(),
            "crawl finished"
        );
        Ok(pages)
    }

    // Paced, cancellable GET used during discovery
    pub(super) async fn get(
        &self,
        url: &str,
        pacer: &mut Pacer,
        cancel: &CancellationToken,
    ) -> Result<String> {
        pacer.before_request(cancel).await?;
        self.request(url, cancel).await
    }

    // Cancellable GET; cancellation wins if both sides are ready
    async fn request(&self, url: &str, cancel: &CancellationToken) -> Result<String> {
        debug!(%url, "fetching");
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(Error::Cancelled),
            result = self.transport.get(url) => result,
        }
    }

    // Reads robots.txt; any failure other than cancellation means "no rules"
    async fn fetch_robots(
        &self,
        root: &Url,
        pacer: &mut Pacer,
        cancel: &CancellationToken,
    ) -> Result<RobotsPolicy> {
        let Ok(robots_url) = root.join("robots.txt") else {
            return Ok(RobotsPolicy::default());
        };

        match self.get(robots_url.as_str(), pacer, cancel).await {
            Ok(body) => {
                let policy = RobotsPolicy::parse(&body);
                debug!(
                    disallowed = policy.disallowed.len(),
                    sitemap = ?policy.sitemap_url,
                    "parsed robots.txt"
                );
                Ok(policy)
            }
            Err(e) if e.is_cancelled() => Err(e),
            Err(e) => {
                debug!(error = %e, "no usable robots.txt");
                Ok(RobotsPolicy::default())
            }
        }
    }
}

// Checks that a site URL is an absolute http(s) URL with a host
//
// Examples:
//   "https://example.com/docs" -> Ok
//   "example.com"              -> InvalidInput (no scheme)
//   "ftp://example.com"        -> InvalidInput (wrong scheme)
//   "http://"                  -> InvalidInput (no host)
pub fn validate_site_url(site_url: &str) -> Result<Url> {
    let url = Url::parse(site_url).map_err(|e| Error::InvalidInput(format!("{site_url:?}: {e}")))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::InvalidInput(format!(
            "scheme {:?} must be http or https",
            url.scheme()
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(Error::InvalidInput("missing host".to_string()));
    }

    Ok(url)
}

// "{scheme}://{host}[:port]/" for the site; where every crawl starts
fn crawl_root(site: &Url) -> Url {
    let mut root = site.clone();
    root.set_path("/");
    root.set_query(None);
    root.set_fragment(None);
    // Credentials never go into crawled URLs; these only fail for
    // cannot-be-a-base URLs, which validate_site_url already rejected
    let _ = root.set_username("");
    let _ = root.set_password(None);
    root
}

#[cfg(test)]
impl<T> Crawler<T> {
    pub(crate) fn transport(&self) -> &T {
        &self.transport
    }
}
