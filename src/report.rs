//! Cycle summaries, as text for people or JSON for scripts.

use std::fmt::Write;

use crate::error::Result;
use crate::stats::{CycleStatistics, format_bytes};
use crate::types::CycleConfig;

fn seconds(ms: u64) -> String {
    format!("{:.2} s", ms as f64 / 1000.0)
}

/// Renders the end-of-cycle summary printed by the binary.
///
/// # Examples
///
/// ```rust
/// use pingrab::report::render_report;
/// use pingrab::stats::CycleStatistics;
/// use pingrab::types::CycleConfigBuilder;
///
/// let config = CycleConfigBuilder::default()
///     .keyword("cats")
///     .destination_dir("out")
///     .build()
///     .unwrap();
/// let stats = CycleStatistics {
///     requested_limit: 5,
///     found_count: 1,
///     attempted_count: 1,
///     succeeded_count: 1,
///     total_bytes: 2048,
///     downloaded_filenames: vec!["cats_1_1.jpg".into()],
///     ..Default::default()
/// };
///
/// let text = render_report(&stats, &config);
/// assert!(text.contains("Total size     : 2 KB"));
/// assert!(text.contains(" - cats_1_1.jpg"));
/// ```
pub fn render_report(stats: &CycleStatistics, config: &CycleConfig) -> String {
    let mut out = String::new();

    // Writing into a String never fails.
    let _ = writeln!(out, "Statistics:");
    let _ = writeln!(out, "Keyword        : {}", config.keyword);
    let _ = writeln!(out, "Requested      : {}", stats.requested_limit);
    let _ = writeln!(out, "Destination    : {}", config.destination_dir.display());
    let _ = writeln!(out, "Found          : {}", stats.found_count);
    let _ = writeln!(out, "Attempted      : {}", stats.attempted_count);
    let _ = writeln!(out, "Succeeded      : {}", stats.succeeded_count);
    let _ = writeln!(out, "Failed         : {}", stats.failed_count);
    let _ = writeln!(out, "Total size     : {}", format_bytes(stats.total_bytes));
    let _ = writeln!(out, "Search time    : {}", seconds(stats.search_duration_ms));
    let _ = writeln!(out, "Download time  : {}", seconds(stats.download_duration_ms));
    let _ = writeln!(out, "Total time     : {}", seconds(stats.total_duration_ms));

    if stats.downloaded_filenames.is_empty() {
        let _ = writeln!(out, "\nNo files were stored.");
    } else {
        let _ = writeln!(out, "\nStored files:");
        for name in &stats.downloaded_filenames {
            let _ = writeln!(out, " - {}", name);
        }
    }

    if !stats.failure_reasons.is_empty() {
        let _ = writeln!(out, "\nFailures:");
        for reason in &stats.failure_reasons {
            let _ = writeln!(out, " - {}", reason);
        }
    }

    out
}

/// Renders the cycle statistics as pretty-printed JSON.
///
/// Field names match [`CycleStatistics`]; durations are in milliseconds and
/// sizes in bytes.
///
/// # Errors
///
/// * [`Error::Json`](crate::Error::Json) - If serialization fails
pub fn render_json(stats: &CycleStatistics) -> Result<String> {
    Ok(serde_json::to_string_pretty(stats)?)
}
