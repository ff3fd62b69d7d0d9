//! pingrab - download images for a keyword into a folder.
//!
//! Usage: `pingrab <KEYWORD> <FOLDER> [LIMIT]`, or with no arguments to read
//! `config.json`.

use clap::Parser;
use color_eyre::eyre::Result;
use pingrab::config::{self, Args};
use pingrab::providers::PinterestClient;
use pingrab::report::{render_json, render_report};
use pingrab::{Error, Orchestrator};
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    init_tracing(args.verbose);

    let config = match config::resolve(&args) {
        Ok(config) => config,
        Err(Error::Config(msg)) => {
            eprintln!("{}", msg);
            eprintln!("Usage: pingrab <KEYWORD> <FOLDER> [LIMIT]");
            std::process::exit(1);
        }
        Err(e) => return Err(e.into()),
    };

    let orchestrator = Orchestrator::new(PinterestClient::new());
    orchestrator
        .run(&config, |stats| {
            if !args.json {
                println!("\n{}", render_report(stats, &config));
                return;
            }
            match render_json(stats) {
                Ok(json) => println!("{}", json),
                Err(e) => tracing::error!(error = %e, "Failed to render JSON report"),
            }
        })
        .await?;

    Ok(())
}
