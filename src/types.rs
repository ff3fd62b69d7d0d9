//! Core data types for assets, download outcomes and cycle configuration.
//!
//! - [`AssetDescriptor`] - A single media item discovered by a query client
//! - [`DownloadOutcome`] - The result of one fetch attempt
//! - [`CycleConfig`] - Keyword, destination and limit for a cycle
//! - [`RunPolicy`] - Whether cycles run once or repeat on an interval
//!
//! # Examples
//!
//! ```rust
//! use pingrab::types::{CycleConfigBuilder, RunPolicy};
//!
//! let config = CycleConfigBuilder::default()
//!     .keyword("cats")
//!     .destination_dir("./downloads")
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.limit, 5);
//! assert_eq!(config.run_policy, RunPolicy::Once);
//! ```

use std::path::PathBuf;
use std::time::Duration;

use derive_builder::Builder;

use crate::error::{Error, Result};

/// Number of assets downloaded per cycle when no limit is given.
pub const DEFAULT_LIMIT: usize = 5;

/// A single media asset as ranked by the query client.
///
/// Descriptors are immutable once produced; the orchestrator only reads the
/// source URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetDescriptor {
    /// Direct URL of the media file
    pub source_url: String,
}

impl AssetDescriptor {
    pub fn new(source_url: impl Into<String>) -> Self {
        Self {
            source_url: source_url.into(),
        }
    }
}

impl From<&str> for AssetDescriptor {
    fn from(url: &str) -> Self {
        Self::new(url)
    }
}

impl From<String> for AssetDescriptor {
    fn from(url: String) -> Self {
        Self::new(url)
    }
}

/// Result of a single fetch attempt.
///
/// Exactly one outcome is produced per attempted [`AssetDescriptor`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// The asset was persisted; `byte_size` is measured from the written file.
    Success { byte_size: u64, filename: String },
    /// The attempt failed; the reason is kept for reporting only.
    Failure { reason: String },
}

/// How many cycles an orchestrator runs.
///
/// # Variants
///
/// * `Once` - Run a single search-and-download cycle and stop
/// * `Periodic` - Repeat cycles, sleeping `interval` between them. With
///   `max_cycles` set, stop after that many cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunPolicy {
    #[default]
    Once,
    Periodic {
        interval: Duration,
        max_cycles: Option<usize>,
    },
}

impl RunPolicy {
    /// Repeat forever with the given pause between cycles.
    pub fn every(interval: Duration) -> Self {
        RunPolicy::Periodic {
            interval,
            max_cycles: None,
        }
    }
}

/// Parameters for one search-and-download cycle.
///
/// Passed by value into the orchestrator; nothing here is global. Use the
/// generated `CycleConfigBuilder` to construct one:
///
/// ```rust
/// use pingrab::types::CycleConfigBuilder;
///
/// let config = CycleConfigBuilder::default()
///     .keyword("mountain lake")
///     .destination_dir("./lakes")
///     .limit(12usize)
///     .build()
///     .unwrap();
///
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Builder)]
#[builder(setter(into))]
pub struct CycleConfig {
    /// Search keyword, also embedded in every stored filename
    pub keyword: String,
    /// Folder the assets are written into
    pub destination_dir: PathBuf,
    /// Maximum number of assets attempted per cycle
    #[builder(default = "DEFAULT_LIMIT")]
    pub limit: usize,
    #[builder(default)]
    pub run_policy: RunPolicy,
}

impl CycleConfig {
    /// Checks that the keyword and destination are present and the limit is
    /// positive.
    ///
    /// # Errors
    ///
    /// * [`Error::Config`] - describing the first problem found
    pub fn validate(&self) -> Result<()> {
        if self.keyword.trim().is_empty() {
            return Err(Error::config("keyword must not be empty"));
        }
        if self.destination_dir.as_os_str().is_empty() {
            return Err(Error::config("destination folder must not be empty"));
        }
        if self.limit == 0 {
            return Err(Error::config("limit must be greater than zero"));
        }
        Ok(())
    }
}
