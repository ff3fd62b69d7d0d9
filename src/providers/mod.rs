//! Query client implementations for content-search providers.
//!
//! Each provider sits behind its own feature flag so minimal builds can leave
//! out the ones they don't need:
//! - `provider-pinterest` - Enables the Pinterest pin search (default)
//!
//! ```bash
//! cargo build --no-default-features --lib
//! ```

#[cfg(feature = "provider-pinterest")]
pub mod pinterest;

#[cfg(feature = "provider-pinterest")]
pub use pinterest::PinterestClient;
