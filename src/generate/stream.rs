// src/generate/stream.rs
// =============================================================================
// Streaming generation: the same work as Generator::generate, reported step
// by step so a caller can show progress on a long crawl.
//
// Event order for one request:
//
//   discovered            (once, with every URL that will be fetched)
//   progress ...          (once per page that loaded, `done` = position)
//   done | error          (exactly one, always last)
//
// An invalid site URL produces a single `error` and nothing else.
// The events go into a tokio mpsc channel; the sender is dropped when
// generate_stream returns, which is how the receiver learns the stream is
// over.
// =============================================================================

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::Generator;
use crate::crawl::{pause, Transport};
use crate::error::Error;
use crate::site::{structure, Formatter};

/// One step of a streaming generation
///
/// Serialized as `{"type": "discovered", ...}` and so on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProgressEvent {
    /// Discovery finished; these URLs will be fetched
    Discovered { urls: Vec<String>, total: usize },
    /// A page loaded; `done` is its 1-based position in the URL list
    Progress {
        #[serde(rename = "currentURL")]
        current_url: String,
        done: usize,
        total: usize,
    },
    /// The finished llms.txt
    Done { result: String },
    /// Generation failed or was cancelled
    Error { error: String },
}

impl ProgressEvent {
    /// The `type` tag, also used as the SSE event name
    pub fn kind(&self) -> &'static str {
        match self {
            ProgressEvent::Discovered { .. } => "discovered",
            ProgressEvent::Progress { .. } => "progress",
            ProgressEvent::Done { .. } => "done",
            ProgressEvent::Error { .. } => "error",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ProgressEvent::Done { .. } | ProgressEvent::Error { .. })
    }
}

impl<T: Transport, F: Formatter> Generator<T, F> {
    // Generates llms.txt for a site, sending progress events as it goes
    //
    // Parameters:
    //   site_url: root URL of the site
    //   events: where events are sent; dropped (closed) on return
    //   cancel: stops the crawl early; a terminal error event is still sent
    //
    // If the receiver goes away, we stop working: nobody is listening.
    pub async fn generate_stream(
        &self,
        site_url: &str,
        events: mpsc::Sender<ProgressEvent>,
        cancel: &CancellationToken,
    ) {
        let urls = match self.crawler.discover(site_url, cancel).await {
            Ok(urls) => urls,
            Err(e) => {
                let _ = events.send(error_event(&e)).await;
                return;
            }
        };

        let total = urls.len();
        let discovered = ProgressEvent::Discovered {
            urls: urls.clone(),
            total,
        };
        if events.send(discovered).await.is_err() {
            return;
        }

        let mut pages = Vec::with_capacity(total);
        for (i, url) in urls.iter().enumerate() {
            let fetched = match pause(cancel).await {
                Ok(()) => self.crawler.fetch_page(url, cancel).await,
                Err(e) => Err(e),
            };

            match fetched {
                Ok(page) => {
                    pages.push(page);
                    let progress = ProgressEvent::Progress {
                        current_url: url.clone(),
                        done: i + 1,
                        total,
                    };
                    if events.send(progress).await.is_err() {
                        return;
                    }
                }
                Err(e) if e.is_cancelled() => {
                    info!(site = site_url, done = i, total, "stream cancelled");
                    let _ = events.send(error_event(&e)).await;
                    return;
                }
                Err(e) => debug!(error = %e, "skipping page"),
            }
        }

        let site = structure(site_url, &pages);
        let result = self.formatter.format(&site);
        info!(site = site_url, fetched = pages.len(), total, "stream finished");
        let _ = events.send(ProgressEvent::Done { result }).await;
    }
}

fn error_event(error: &Error) -> ProgressEvent {
    ProgressEvent::Error {
        error: error.to_string(),
    }
}
