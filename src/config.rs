//! Command line and configuration file resolution.
//!
//! A cycle needs a keyword and a destination folder. They come from the
//! positional arguments when both are present; otherwise the whole set is read
//! from a JSON configuration file:
//!
//! ```json
//! { "query": "cats", "folder": "./cats", "limit": 5 }
//! ```
//!
//! A missing, zero or unparseable limit falls back to
//! [`DEFAULT_LIMIT`](crate::types::DEFAULT_LIMIT). A fractional positional
//! limit is truncated.

use clap::Parser;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};
use crate::types::{CycleConfig, DEFAULT_LIMIT, RunPolicy};

pub const DEFAULT_CONFIG_PATH: &str = "config.json";

/// Command line arguments of the `pingrab` binary.
#[derive(Clone, Debug, Default, Parser)]
#[command(name = "pingrab", version = env!("CARGO_PKG_VERSION"), about, long_about = None)]
pub struct Args {
    /// Search keyword
    pub keyword: Option<String>,

    /// Folder the images are stored in
    pub folder: Option<PathBuf>,

    /// Maximum number of images to download
    pub limit: Option<String>,

    /// Configuration file used when keyword or folder is missing
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Repeat the cycle, waiting this many seconds between runs
    #[arg(long, value_name = "SECONDS")]
    pub every: Option<u64>,

    /// Print each cycle report as JSON instead of text
    #[arg(long)]
    pub json: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Shape of the JSON configuration file. Every field is optional so that
/// a partial file produces a configuration error instead of a parse error.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ConfigFile {
    pub query: Option<String>,
    pub folder: Option<PathBuf>,
    pub limit: Option<usize>,
}

/// Reads and parses a configuration file.
///
/// # Errors
///
/// * [`Error::Config`] - If the file can't be read or isn't valid JSON
pub fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| Error::config(format!("Failed to read {}: {}", path.display(), e)))?;
    serde_json::from_str(&raw)
        .map_err(|e| Error::config(format!("Failed to parse {}: {}", path.display(), e)))
}

/// Interprets a positional limit, falling back to the default.
///
/// Fractions are truncated toward zero; anything that doesn't leave at least
/// one asset to attempt yields [`DEFAULT_LIMIT`].
///
/// # Examples
///
/// ```rust
/// use pingrab::config::parse_limit;
///
/// assert_eq!(parse_limit(Some("12")), 12);
/// assert_eq!(parse_limit(Some("3.7")), 3);
/// assert_eq!(parse_limit(Some("0")), 5);
/// assert_eq!(parse_limit(Some("many")), 5);
/// assert_eq!(parse_limit(None), 5);
/// ```
pub fn parse_limit(raw: Option<&str>) -> usize {
    raw.map(str::trim)
        .and_then(|s| {
            s.parse::<usize>().ok().or_else(|| {
                s.parse::<f64>()
                    .ok()
                    .filter(|n| n.is_finite() && *n >= 1.0)
                    .map(|n| n.trunc() as usize)
            })
        })
        .filter(|limit| *limit > 0)
        .unwrap_or(DEFAULT_LIMIT)
}

/// Resolves arguments (and, if needed, the configuration file) into a
/// validated [`CycleConfig`].
///
/// # Errors
///
/// * [`Error::Config`] - If neither source yields both keyword and folder, or
///   the configuration file is unreadable or malformed
pub fn resolve(args: &Args) -> Result<CycleConfig> {
    let (keyword, destination_dir, limit) = match (&args.keyword, &args.folder) {
        (Some(keyword), Some(folder)) => (
            keyword.clone(),
            folder.clone(),
            parse_limit(args.limit.as_deref()),
        ),
        _ => {
            let file = load_config_file(&args.config)?;
            let (Some(query), Some(folder)) = (file.query, file.folder) else {
                return Err(Error::config(format!(
                    "{} must provide both \"query\" and \"folder\"",
                    args.config.display()
                )));
            };
            let limit = file
                .limit
                .filter(|limit| *limit > 0)
                .unwrap_or(DEFAULT_LIMIT);
            (query, folder, limit)
        }
    };

    let run_policy = match args.every {
        Some(secs) => RunPolicy::every(Duration::from_secs(secs)),
        None => RunPolicy::Once,
    };

    let config = CycleConfig {
        keyword,
        destination_dir,
        limit,
        run_policy,
    };
    config.validate()?;
    Ok(config)
}
