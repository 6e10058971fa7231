// src/crawl/transport.rs
// =============================================================================
// The network seam of the crawler.
//
// The crawler never talks to reqwest directly; it asks a Transport for the
// body of a URL. The real implementation is HttpTransport. Tests swap in
// in-memory transports so they can count requests or hang forever.
//
// Rules every Transport follows:
// - Only a 200 response is a success, anything else is Error::Fetch
// - The body is returned as text (HTML, XML or robots.txt)
// =============================================================================

use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use super::{REQUEST_TIMEOUT, USER_AGENT};
use crate::error::{Error, Result};

/// Fetches the body of a URL with a GET request
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str) -> Result<String>;
}

/// Transport backed by a reqwest client
///
/// The client carries the crawler's User-Agent and per-request timeout.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> reqwest::Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| describe_error(url, e))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(Error::fetch(url, format!("HTTP {}", status.as_u16())));
        }

        response.text().await.map_err(|e| describe_error(url, e))
    }
}

// Turns a reqwest error into a short, readable Fetch error
fn describe_error(url: &str, error: reqwest::Error) -> Error {
    if error.is_timeout() {
        Error::fetch(url, "request timed out")
    } else if error.is_connect() {
        Error::fetch(url, "connection failed")
    } else {
        Error::fetch(url, error)
    }
}
