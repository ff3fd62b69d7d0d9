//! Error types and result handling for pingrab operations.
//!
//! All fallible operations return a [`Result<T>`], a type alias for
//! `std::result::Result<T, Error>`.
//!
//! # Error Categories
//!
//! Errors fall into two groups, which decide how far they travel:
//!
//! - **Cycle-level**: [`Config`](Error::Config), [`Filesystem`](Error::Filesystem)
//!   and [`Provider`](Error::Provider). These abort a cycle before the first
//!   download attempt and are returned to the caller.
//! - **Per-asset**: [`Network`](Error::Network), [`Http`](Error::Http) and
//!   [`Write`](Error::Write). These are recorded as a failed attempt and the
//!   download loop moves on to the next asset.
//!
//! # Examples
//!
//! ```rust
//! use pingrab::Error;
//!
//! let err = Error::config("keyword is missing");
//! assert!(!err.is_per_item());
//!
//! let err = Error::provider("pinterest", "HTTP 503");
//! assert_eq!(err.to_string(), "Provider error [pinterest]: HTTP 503");
//! ```

use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

/// Type alias for Results with pingrab errors.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for all pingrab operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Transport-level failures from the HTTP client.
    ///
    /// Connection resets, DNS failures, timeouts and body stream interruptions
    /// all end up here.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The server answered, but not with a success status.
    #[error("HTTP {status} for {url}")]
    Http { url: String, status: StatusCode },

    /// Persisting a downloaded body to storage failed.
    #[error("Write error for {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The destination directory could not be created or is not a directory.
    #[error("Filesystem error for {}: {source}", path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Keyword, destination or limit could not be resolved from arguments or
    /// the configuration file.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The query client failed to produce an asset list.
    #[error("Provider error [{provider}]: {message}")]
    Provider { provider: String, message: String },

    /// Provider payloads that don't have the expected shape.
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Creates a configuration error with the given message.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pingrab::Error;
    ///
    /// let error = Error::config("limit must be greater than zero");
    /// assert!(matches!(error, Error::Config(_)));
    /// ```
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Creates a provider error tagged with the provider's identifier.
    pub fn provider(provider: impl Into<String>, msg: impl Into<String>) -> Self {
        Error::Provider {
            provider: provider.into(),
            message: msg.into(),
        }
    }

    /// Creates a parse error with the given message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Error::Parse(msg.into())
    }

    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Write {
            path: path.into(),
            source,
        }
    }

    pub fn filesystem(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Filesystem {
            path: path.into(),
            source,
        }
    }

    /// Returns `true` for failures that only affect a single asset attempt.
    ///
    /// The orchestrator counts these as a failed download and keeps going;
    /// anything else ends the cycle.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pingrab::Error;
    /// use std::io;
    ///
    /// let write = Error::write("out/a.jpg", io::Error::other("disk full"));
    /// assert!(write.is_per_item());
    ///
    /// let fs = Error::filesystem("out", io::Error::other("denied"));
    /// assert!(!fs.is_per_item());
    /// ```
    pub fn is_per_item(&self) -> bool {
        matches!(
            self,
            Error::Network(_) | Error::Http { .. } | Error::Write { .. }
        )
    }
}
