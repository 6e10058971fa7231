// src/crawl/pacing.rs
// =============================================================================
// Polite crawling: a small, cancellable delay between requests.
//
// tokio::time::sleep on its own would keep a cancelled crawl alive for the
// rest of the delay, so every wait races the cancellation token instead.
// `biased;` makes select! poll the token first: if both are ready at the
// same moment, cancellation wins.
// =============================================================================

use tokio_util::sync::CancellationToken;

use super::REQUEST_DELAY;
use crate::error::{Error, Result};

// Waits REQUEST_DELAY, or returns Error::Cancelled as soon as `cancel` fires
pub async fn pause(cancel: &CancellationToken) -> Result<()> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(Error::Cancelled),
        _ = tokio::time::sleep(REQUEST_DELAY) => Ok(()),
    }
}

// Spaces out the requests made during discovery
//
// The first request goes out immediately, every later one waits.
#[derive(Debug, Default)]
pub(crate) struct Pacer {
    started: bool,
}

impl Pacer {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) async fn before_request(&mut self, cancel: &CancellationToken) -> Result<()> {
        if self.started {
            pause(cancel).await?;
        }
        self.started = true;
        Ok(())
    }
}
