//! Network utilities for provider queries and asset downloads.
//!
//! This module provides the networking infrastructure for pingrab:
//!
//! - **HTTP Client**: A configured HTTP client with connection pooling
//! - **Browser Headers**: The header set that makes requests look like a desktop
//!   browser visiting the provider's site
//! - **Content Parsing**: JSON extraction helpers in [`json`]
//!
//! # Examples
//!
//! ```rust,no_run
//! use pingrab::net::HttpClient;
//!
//! # async fn example() -> pingrab::Result<()> {
//! let client = HttpClient::new("pinterest")
//!     .with_header("X-Requested-With", "XMLHttpRequest");
//!
//! let json: serde_json::Value = client.get_json("https://example.com/api").await?;
//! # Ok(())
//! # }
//! ```

use bytes::Bytes;
use reqwest::header::{
    ACCEPT, ACCEPT_LANGUAGE, CONNECTION, HeaderMap, HeaderName, HeaderValue, REFERER, USER_AGENT,
};
use reqwest::{Client, Response};
use std::time::Duration;

use crate::error::{Error, Result};

pub mod json;

/// User-Agent of a current desktop Chrome on Windows.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/115.0.0.0 Safari/537.36";

/// Accept header a browser sends for `<img>` loads.
pub const IMAGE_ACCEPT: &str = "image/avif,image/webp,image/apng,image/svg+xml,image/*,*/*;q=0.8";

pub const ACCEPT_LANGUAGE_VALUE: &str = "en-US,en;q=0.9";

/// Referer sent with every request unless overridden.
pub const DEFAULT_REFERER: &str = "https://www.pinterest.com/";

/// Total deadline for provider requests, body included.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
/// Deadline for establishing a connection when streaming assets.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
/// Longest pause between two body chunks when streaming assets.
pub const IDLE_TIMEOUT: Duration = Duration::from_secs(30);

/// Deadlines a client enforces.
///
/// # Variants
///
/// * `Request` - One deadline covering the whole exchange, body included.
///   Suited to small JSON payloads.
/// * `Streaming` - A connect deadline plus a per-read idle deadline. The
///   transfer as a whole is unbounded, so a large asset arriving slowly but
///   steadily still completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timeouts {
    Request(Duration),
    Streaming { connect: Duration, idle: Duration },
}

impl Timeouts {
    pub fn request() -> Self {
        Timeouts::Request(REQUEST_TIMEOUT)
    }

    pub fn streaming() -> Self {
        Timeouts::Streaming {
            connect: CONNECT_TIMEOUT,
            idle: IDLE_TIMEOUT,
        }
    }
}

/// Builds a configured reqwest client.
///
/// Each [`HttpClient`] owns one, so its connection pool lives on the runtime
/// that uses it. The client is configured with:
/// - The given [`Timeouts`]
/// - Connection pooling (10 idle connections per host)
/// - Compression support (gzip, brotli)
///
/// Identity headers are not baked in here; they come from [`browser_headers`]
/// so that every caller can pick its own Referer.
fn build_client(timeouts: Timeouts) -> Client {
    let builder = match timeouts {
        Timeouts::Request(total) => Client::builder().timeout(total),
        Timeouts::Streaming { connect, idle } => {
            Client::builder().connect_timeout(connect).read_timeout(idle)
        }
    };

    builder
        .pool_max_idle_per_host(10)
        .gzip(true)
        .brotli(true)
        .build()
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Falling back to default HTTP client");
            Client::new()
        })
}

/// Builds the header set impersonating a desktop browser.
///
/// Providers serve or block responses depending on these headers, so both
/// searches and asset downloads send them.
///
/// # Examples
///
/// ```rust
/// use pingrab::net::{browser_headers, DEFAULT_REFERER};
///
/// let headers = browser_headers(DEFAULT_REFERER);
/// assert_eq!(headers["referer"], "https://www.pinterest.com/");
/// assert_eq!(headers["connection"], "keep-alive");
/// ```
pub fn browser_headers(referer: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
    headers.insert(ACCEPT, HeaderValue::from_static(IMAGE_ACCEPT));
    headers.insert(
        ACCEPT_LANGUAGE,
        HeaderValue::from_static(ACCEPT_LANGUAGE_VALUE),
    );
    headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));
    let referer = HeaderValue::from_str(referer)
        .unwrap_or_else(|_| HeaderValue::from_static(DEFAULT_REFERER));
    headers.insert(REFERER, referer);
    headers
}

/// HTTP client wrapper carrying a per-owner header set.
///
/// Each client is tagged with the identifier of its owner (a provider or the
/// downloader) which shows up in error messages and logs.
///
/// # Examples
///
/// ```rust
/// use pingrab::net::HttpClient;
///
/// let client = HttpClient::new("pinterest")
///     .with_referer("https://www.pinterest.com/search/pins/")
///     .with_header("X-Requested-With", "XMLHttpRequest");
/// assert_eq!(client.owner(), "pinterest");
/// ```
#[derive(Clone, Debug)]
pub struct HttpClient {
    owner: String,
    client: Client,
    headers: HeaderMap,
}

impl HttpClient {
    /// Creates a client sending the default browser header set, with a
    /// total [`REQUEST_TIMEOUT`] per request.
    pub fn new(owner: impl Into<String>) -> Self {
        Self::with_timeouts(owner, Timeouts::request())
    }

    pub fn with_timeouts(owner: impl Into<String>, timeouts: Timeouts) -> Self {
        Self {
            owner: owner.into(),
            client: build_client(timeouts),
            headers: browser_headers(DEFAULT_REFERER),
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Replaces the Referer header.
    pub fn with_referer(self, referer: &str) -> Self {
        self.with_header(REFERER.as_str(), referer)
    }

    /// Adds or replaces a header on all requests made by this client.
    ///
    /// Invalid names or values are ignored.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        if let (Ok(name), Ok(value)) = (name.parse::<HeaderName>(), value.parse::<HeaderValue>()) {
            self.headers.insert(name, value);
        }
        self
    }

    /// Sends a GET request and returns the response once its status is known
    /// to be successful. The body has not been read yet.
    ///
    /// # Errors
    ///
    /// * [`Error::Network`] - For connection and transport errors
    /// * [`Error::Http`] - For any non-2xx status
    pub async fn get_response(&self, url: &str) -> Result<Response> {
        tracing::trace!(owner = %self.owner, url, "GET");
        let response = self.client.get(url).headers(self.headers.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Http {
                url: url.to_string(),
                status,
            });
        }

        Ok(response)
    }

    /// Performs a GET request and buffers the whole body.
    pub async fn get(&self, url: &str) -> Result<Bytes> {
        let response = self.get_response(url).await?;
        Ok(response.bytes().await?)
    }

    /// Performs a GET request and deserializes the body as JSON.
    ///
    /// # Errors
    ///
    /// * All errors from [`get()`](HttpClient::get)
    /// * [`Error::Json`] - If the body is not valid JSON for `T`
    pub async fn get_json<T>(&self, url: &str) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let bytes = self.get(url).await?;
        serde_json::from_slice(&bytes).map_err(Into::into)
    }
}
