// src/crawl/queue.rs
// =============================================================================
// Breadth-first link crawl, used when a site has no usable sitemap.
//
// How it works:
// 1. Start with the root URL ("{scheme}://{host}/") in a queue at depth 0
// 2. Pop the next URL; skip it if robots.txt disallows it
// 3. Record it as discovered
// 4. If it is shallower than MAX_DEPTH, fetch it and queue its same-host
//    links at depth + 1 (each URL is queued at most once)
// 5. Repeat until the queue is empty or MAX_PAGES URLs are discovered
//
// Politeness:
// - Requests go out one at a time, spaced by the Pacer
// - Only the crawl's own host (and port) is followed
//
// Rust concepts:
// - HashSet: To track visited URLs (O(1) lookup)
// - VecDeque: Double-ended queue for breadth-first crawling
// =============================================================================

use std::collections::{HashSet, VecDeque};

use tokio_util::sync::CancellationToken;
use tracing::debug;
use url::Url;

use super::crawler::Crawler;
use super::html::extract_same_host_links;
use super::pacing::Pacer;
use super::robots::RobotsPolicy;
use super::transport::Transport;
use super::{MAX_DEPTH, MAX_PAGES};
use crate::error::Result;

// Represents a page in the crawl queue
#[derive(Debug, Clone)]
struct CrawlItem {
    url: String,
    depth: usize, // How many link hops from the root (root = 0)
}

impl<T: Transport> Crawler<T> {
    // Discovers pages by following links from the root
    //
    // Parameters:
    //   root: the crawl root ("{scheme}://{host}/")
    //   robots: disallowed URLs are neither recorded nor fetched
    //
    // Returns: discovered URLs in breadth-first order, root first.
    // Pages that fail to load are still listed; they just contribute no links.
    pub(super) async fn discover_via_bfs(
        &self,
        root: &Url,
        robots: &RobotsPolicy,
        pacer: &mut Pacer,
        cancel: &CancellationToken,
    ) -> Result<Vec<String>> {
        let start = root.to_string();

        // The root counts as visited before anything is fetched
        let mut visited = HashSet::from([start.clone()]);
        let mut queue = VecDeque::from([CrawlItem {
            url: start,
            depth: 0,
        }]);
        let mut discovered = Vec::new();

        while discovered.len() < MAX_PAGES {
            let Some(item) = queue.pop_front() else {
                break;
            };

            if robots.is_disallowed(&item.url) {
                debug!(url = %item.url, "disallowed by robots.txt");
                continue;
            }

            debug!(url = %item.url, depth = item.depth, "discovered");
            discovered.push(item.url.clone());

            if item.depth >= MAX_DEPTH {
                continue;
            }

            let links = match self.get(&item.url, pacer, cancel).await {
                Ok(html) => extract_same_host_links(&html, &item.url, root),
                Err(e) if e.is_cancelled() => return Err(e),
                Err(e) => {
                    debug!(error = %e, "could not follow links");
                    continue;
                }
            };

            for link in links {
                // Only add if not visited and the page budget has room
                if visited.contains(&link) || discovered.len() + queue.len() >= MAX_PAGES {
                    continue;
                }
                visited.insert(link.clone());
                queue.push_back(CrawlItem {
                    url: link,
                    depth: item.depth + 1,
                });
            }
        }

        Ok(discovered)
    }
}
