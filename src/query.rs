//! Query client trait: turns a keyword into a ranked list of assets.
//!
//! The orchestrator treats the query client as a black box. It only relies on
//! the order of the returned descriptors, which it never re-sorts.
//!
//! # Examples
//!
//! ```rust
//! use pingrab::prelude::*;
//! use pingrab::error::Result;
//! use async_trait::async_trait;
//!
//! struct FixedList(Vec<String>);
//!
//! #[async_trait]
//! impl QueryClient for FixedList {
//!     fn id(&self) -> &'static str { "fixed" }
//!
//!     async fn search(&self, _keyword: &str) -> Result<Vec<AssetDescriptor>> {
//!         Ok(self.0.iter().map(|url| AssetDescriptor::new(url.as_str())).collect())
//!     }
//! }
//! ```

use async_trait::async_trait;

use crate::{error::Result, types::AssetDescriptor};

/// Trait that all content-search providers implement.
///
/// # Implementation Guidelines
///
/// - Use [`net::HttpClient`](crate::net::HttpClient) so requests carry the
///   browser header set
/// - Preserve the provider's ranking in the returned order
/// - Report failures as [`Error::Provider`](crate::Error::Provider); the
///   orchestrator aborts the cycle on any error from `search`
#[async_trait]
pub trait QueryClient: Send + Sync {
    /// Short lowercase identifier, used in logs and provider errors.
    fn id(&self) -> &'static str;

    /// Searches the provider for `keyword`.
    ///
    /// # Returns
    ///
    /// The assets in provider ranking order. An empty vector is a valid
    /// result and leads to a cycle with zero attempts.
    async fn search(&self, keyword: &str) -> Result<Vec<AssetDescriptor>>;
}
