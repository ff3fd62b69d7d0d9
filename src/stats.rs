//! Per-cycle statistics.
//!
//! [`StatsAggregator`] folds each [`DownloadOutcome`] into a running
//! [`CycleStatistics`] and stamps the phase durations at the end. It performs
//! no I/O and is owned by the orchestrator for the length of one cycle.
//!
//! # Examples
//!
//! ```rust
//! use pingrab::stats::StatsAggregator;
//! use pingrab::types::DownloadOutcome;
//!
//! let mut stats = StatsAggregator::new(2, 5);
//! stats.record(DownloadOutcome::Success { byte_size: 12_345, filename: "cats_1_1.jpg".into() });
//! stats.record(DownloadOutcome::Failure { reason: "connection reset".into() });
//!
//! let report = stats.finish(120, 4_000, 4_120);
//! assert_eq!(report.attempted_count, 2);
//! assert_eq!(report.succeeded_count, 1);
//! assert_eq!(report.total_bytes, 12_345);
//! ```

use serde::Serialize;

use crate::types::DownloadOutcome;

/// Aggregate report of one search-and-download cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CycleStatistics {
    /// Limit the cycle was configured with
    pub requested_limit: usize,
    /// Number of assets the query client returned
    pub found_count: usize,
    /// Always `min(requested_limit, found_count)`
    pub attempted_count: usize,
    pub succeeded_count: usize,
    pub failed_count: usize,
    /// Sum of persisted bytes over successful attempts only
    pub total_bytes: u64,
    pub search_duration_ms: u64,
    pub download_duration_ms: u64,
    pub total_duration_ms: u64,
    /// Stored filenames in attempt order
    pub downloaded_filenames: Vec<String>,
    /// Failure reasons in attempt order, kept for reporting
    pub failure_reasons: Vec<String>,
}

/// Accumulates outcomes into a [`CycleStatistics`].
#[derive(Debug, Clone)]
pub struct StatsAggregator {
    stats: CycleStatistics,
}

impl StatsAggregator {
    pub fn new(requested_limit: usize, found_count: usize) -> Self {
        Self {
            stats: CycleStatistics {
                requested_limit,
                found_count,
                ..Default::default()
            },
        }
    }

    /// Folds one attempt's outcome into the running totals.
    pub fn record(&mut self, outcome: DownloadOutcome) {
        self.stats.attempted_count += 1;
        match outcome {
            DownloadOutcome::Success {
                byte_size,
                filename,
            } => {
                self.stats.succeeded_count += 1;
                self.stats.total_bytes += byte_size;
                self.stats.downloaded_filenames.push(filename);
            }
            DownloadOutcome::Failure { reason } => {
                self.stats.failed_count += 1;
                self.stats.failure_reasons.push(reason);
            }
        }
    }

    /// Stamps the phase durations and hands out the finished report.
    pub fn finish(
        mut self,
        search_duration_ms: u64,
        download_duration_ms: u64,
        total_duration_ms: u64,
    ) -> CycleStatistics {
        self.stats.search_duration_ms = search_duration_ms;
        self.stats.download_duration_ms = download_duration_ms;
        self.stats.total_duration_ms = total_duration_ms;
        self.stats
    }
}

/// Formats a byte count with binary prefixes (base 1024).
///
/// # Examples
///
/// ```rust
/// use pingrab::stats::format_bytes;
///
/// assert_eq!(format_bytes(0), "0 Bytes");
/// assert_eq!(format_bytes(1536), "1.5 KB");
/// assert_eq!(format_bytes(12_345), "12.06 KB");
/// ```
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["Bytes", "KB", "MB", "GB", "TB"];

    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let formatted = format!("{:.2}", value);
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, UNITS[unit])
}
