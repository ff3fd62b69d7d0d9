//! # pingrab - Keyword-driven image harvesting with polite downloads
//!
//! pingrab asks a content-search provider for images matching a keyword and
//! stores a bounded number of them in a local folder. Downloads run strictly
//! one at a time with a randomized pause between requests, so the traffic
//! pattern stays close to that of a person browsing.
//!
//! ## Features
//!
//! - **Pluggable Providers**: Any [`QueryClient`] can feed the downloader;
//!   Pinterest is built in
//! - **Streaming Downloads**: Response bodies go straight to disk, memory use
//!   doesn't depend on asset size
//! - **Failure Isolation**: A broken asset is counted and skipped, the rest of
//!   the batch still runs
//! - **Politeness Pacing**: Swappable [`DelayPolicy`], uniform `[1s, 3s)` by default
//! - **Cycle Statistics**: Counts, byte totals and phase durations per cycle
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pingrab::prelude::*;
//! use pingrab::providers::PinterestClient;
//!
//! #[tokio::main]
//! async fn main() -> pingrab::Result<()> {
//!     let config = CycleConfigBuilder::default()
//!         .keyword("mountain lake")
//!         .destination_dir("./lakes")
//!         .limit(10usize)
//!         .build()
//!         .map_err(|e| pingrab::Error::config(e.to_string()))?;
//!
//!     let stats = Orchestrator::new(PinterestClient::new())
//!         .search_and_download(&config)
//!         .await?;
//!
//!     println!("{}", pingrab::report::render_report(&stats, &config));
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`orchestrator`]: The search-then-download cycle
//! - [`download`]: Destination folder, filenames and the streaming fetcher
//! - [`pacing`]: Delay policies between attempts
//! - [`stats`]: Statistics aggregation and byte formatting
//! - [`query`] / [`providers`]: The query client trait and its implementations
//! - [`net`]: Shared HTTP client and browser header set
//! - [`config`] / [`report`]: Argument resolution and the printed summary
//! - [`error`]: Error types

pub mod config;
pub mod download;
pub mod error;
pub mod net;
pub mod orchestrator;
pub mod pacing;
pub mod providers;
pub mod query;
pub mod report;
pub mod stats;
pub mod types;

/// Prelude module for convenient imports.
///
/// ```rust
/// use pingrab::prelude::*;
///
/// // Now you have access to:
/// // - Orchestrator, QueryClient
/// // - AssetFetcher, StreamingFetcher
/// // - DelayPolicy, UniformDelay, FixedDelay
/// // - AssetDescriptor, CycleConfig, CycleConfigBuilder, RunPolicy
/// // - CycleStatistics, format_bytes
/// ```
pub mod prelude {
    pub use crate::{
        download::{AssetFetcher, StreamingFetcher},
        orchestrator::Orchestrator,
        pacing::{DelayPolicy, FixedDelay, UniformDelay},
        query::QueryClient,
        stats::{CycleStatistics, format_bytes},
        types::{AssetDescriptor, CycleConfig, CycleConfigBuilder, DownloadOutcome, RunPolicy},
    };
}

// Re-export main types at crate root for direct access
pub use error::{Error, Result};
pub use orchestrator::Orchestrator;
pub use pacing::{DelayPolicy, UniformDelay};
pub use query::QueryClient;
pub use stats::CycleStatistics;
pub use types::{AssetDescriptor, CycleConfig, DownloadOutcome, RunPolicy};
