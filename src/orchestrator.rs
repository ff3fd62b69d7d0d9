//! The download orchestrator: one search, then a sequential, paced fetch loop.
//!
//! A cycle runs in three phases:
//!
//! 1. Prepare the destination folder (a failure here aborts the cycle)
//! 2. Ask the [`QueryClient`] for ranked assets (a failure here aborts the cycle)
//! 3. Attempt the first `limit` assets in order, one at a time, pausing after
//!    every attempt. Per-asset failures are counted and never stop the loop.
//!
//! # Examples
//!
//! ```rust,no_run
//! use pingrab::prelude::*;
//! use pingrab::providers::PinterestClient;
//!
//! # async fn example() -> pingrab::Result<()> {
//! let config = CycleConfigBuilder::default()
//!     .keyword("cats")
//!     .destination_dir("./cats")
//!     .limit(3usize)
//!     .build()
//!     .map_err(|e| pingrab::Error::config(e.to_string()))?;
//!
//! let orchestrator = Orchestrator::new(PinterestClient::new());
//! let stats = orchestrator.search_and_download(&config).await?;
//! println!("{} of {} stored", stats.succeeded_count, stats.attempted_count);
//! # Ok(())
//! # }
//! ```

use std::time::Instant;

use crate::{
    download::{self, AssetFetcher, StreamingFetcher},
    error::{Error, Result},
    pacing::{DelayPolicy, UniformDelay},
    query::QueryClient,
    stats::{CycleStatistics, StatsAggregator},
    types::{AssetDescriptor, CycleConfig, DownloadOutcome, RunPolicy},
};

/// Drives search-and-download cycles.
///
/// At most one fetch is in flight at any time; concurrency would defeat the
/// pacing between requests.
pub struct Orchestrator {
    query: Box<dyn QueryClient>,
    fetcher: Box<dyn AssetFetcher>,
    delay: Box<dyn DelayPolicy>,
}

impl Orchestrator {
    /// Creates an orchestrator with the streaming fetcher and the default
    /// `[1000, 3000)` ms politeness delay.
    pub fn new(query: impl QueryClient + 'static) -> Self {
        Self {
            query: Box::new(query),
            fetcher: Box::new(StreamingFetcher::new()),
            delay: Box::new(UniformDelay::default()),
        }
    }

    pub fn with_fetcher(mut self, fetcher: impl AssetFetcher + 'static) -> Self {
        self.fetcher = Box::new(fetcher);
        self
    }

    pub fn with_delay_policy(mut self, delay: impl DelayPolicy + 'static) -> Self {
        self.delay = Box::new(delay);
        self
    }

    /// Runs cycles according to `config.run_policy`.
    ///
    /// `on_cycle` receives every finished report. Returns the number of
    /// completed cycles; a periodic policy without `max_cycles` only returns
    /// on error.
    ///
    /// # Errors
    ///
    /// The first cycle-level error ([`Error::Config`], [`Error::Filesystem`],
    /// [`Error::Provider`]) stops the run.
    pub async fn run<F>(&self, config: &CycleConfig, mut on_cycle: F) -> Result<usize>
    where
        F: FnMut(&CycleStatistics),
    {
        let mut completed = 0;
        loop {
            let stats = self.search_and_download(config).await?;
            on_cycle(&stats);
            completed += 1;

            match config.run_policy {
                RunPolicy::Once => return Ok(completed),
                RunPolicy::Periodic {
                    interval,
                    max_cycles,
                } => {
                    if max_cycles.is_some_and(|max| completed >= max) {
                        return Ok(completed);
                    }
                    tracing::info!(
                        next_in_secs = interval.as_secs(),
                        completed,
                        "Waiting for next cycle"
                    );
                    tokio::time::sleep(interval).await;
                }
            }
        }
    }

    /// Runs one full cycle: search for `config.keyword`, then download.
    ///
    /// # Errors
    ///
    /// * [`Error::Config`] - If the configuration is invalid
    /// * [`Error::Filesystem`] - If the destination can't be prepared
    /// * [`Error::Provider`] - If the query client fails; the cycle is aborted
    ///   rather than treated as an empty result
    pub async fn search_and_download(&self, config: &CycleConfig) -> Result<CycleStatistics> {
        config.validate()?;
        download::ensure_dir(&config.destination_dir).await?;

        tracing::info!(
            provider = self.query.id(),
            keyword = %config.keyword,
            limit = config.limit,
            "Starting cycle"
        );

        let cycle_start = Instant::now();
        let assets = self.query.search(&config.keyword).await.map_err(|e| match e {
            Error::Provider { .. } => e,
            other => Error::provider(self.query.id(), other.to_string()),
        })?;
        let search_duration_ms = elapsed_ms(cycle_start);

        Ok(self
            .download_phase(&assets, config, cycle_start, search_duration_ms)
            .await)
    }

    /// Downloads from an already retrieved asset list.
    ///
    /// The search phase is reported as zero.
    pub async fn run_cycle(
        &self,
        assets: &[AssetDescriptor],
        config: &CycleConfig,
    ) -> Result<CycleStatistics> {
        config.validate()?;
        download::ensure_dir(&config.destination_dir).await?;
        Ok(self.download_phase(assets, config, Instant::now(), 0).await)
    }

    async fn download_phase(
        &self,
        assets: &[AssetDescriptor],
        config: &CycleConfig,
        cycle_start: Instant,
        search_duration_ms: u64,
    ) -> CycleStatistics {
        let selected = &assets[..config.limit.min(assets.len())];
        let mut stats = StatsAggregator::new(config.limit, assets.len());
        tracing::info!(
            found = assets.len(),
            selected = selected.len(),
            "Downloading assets"
        );

        let download_start = Instant::now();
        for (i, asset) in selected.iter().enumerate() {
            let outcome = self.attempt(asset, i + 1, selected.len(), config).await;
            stats.record(outcome);

            let pause = self.delay.next_delay();
            tracing::debug!(pause_ms = pause.as_millis() as u64, "Pacing");
            tokio::time::sleep(pause).await;
        }
        let download_duration_ms = elapsed_ms(download_start);

        let stats = stats.finish(
            search_duration_ms,
            download_duration_ms,
            elapsed_ms(cycle_start),
        );
        tracing::info!(
            succeeded = stats.succeeded_count,
            failed = stats.failed_count,
            total_bytes = stats.total_bytes,
            "Cycle finished"
        );
        stats
    }

    async fn attempt(
        &self,
        asset: &AssetDescriptor,
        index: usize,
        total: usize,
        config: &CycleConfig,
    ) -> DownloadOutcome {
        let extension = download::extension_for(&asset.source_url);
        let timestamp_ms = chrono::Utc::now().timestamp_millis();
        let filename = download::name_for(&config.keyword, timestamp_ms, index, &extension);
        let destination = config.destination_dir.join(&filename);

        tracing::debug!(index, total, url = %asset.source_url, "Downloading asset");
        match self.fetcher.fetch(&asset.source_url, &destination).await {
            Ok(byte_size) => DownloadOutcome::Success {
                byte_size,
                filename,
            },
            Err(e) => {
                tracing::warn!(index, url = %asset.source_url, error = %e, "Download failed");
                DownloadOutcome::Failure {
                    reason: e.to_string(),
                }
            }
        }
    }
}

fn elapsed_ms(since: Instant) -> u64 {
    since.elapsed().as_millis() as u64
}
