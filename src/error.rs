// src/error.rs
// =============================================================================
// Error types shared by the crawler, the site generator and the gate.
//
// There are only three ways a generation request can go wrong:
// - InvalidInput: the site URL the caller gave us is not usable
// - Fetch: a single network request failed (almost always swallowed)
// - Cancelled: the caller gave up (Ctrl-C, or the request was dropped)
//
// The binary itself still uses anyhow::Result at the top level; these typed
// errors convert into anyhow automatically through the ? operator.
// =============================================================================

use thiserror::Error;

/// Errors produced while discovering, fetching or generating.
#[derive(Debug, Error)]
pub enum Error {
    /// The root site URL is not an absolute http(s) URL with a host
    #[error("invalid URL: {0}")]
    InvalidInput(String),

    /// A single network request failed (non-200, transport error, timeout)
    #[error("failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },

    /// The request was cancelled before it could finish
    #[error("request cancelled")]
    Cancelled,
}

impl Error {
    // Builds a Fetch error from anything printable
    pub fn fetch(url: &str, reason: impl std::fmt::Display) -> Self {
        Error::Fetch {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::Cancelled)
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;
