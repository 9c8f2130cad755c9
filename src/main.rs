//! Techtrawl main entry point
//!
//! Command-line interface for the Factorio research-tree crawler: loads
//! configuration, runs the crawl, resolve and invert passes, and writes
//! the JSONL export once the whole pipeline has completed.
//!
//! Exit codes: 0 on success, 2 on validation or runtime failure, 130 when
//! interrupted by the user.

use std::path::Path;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use url::Url;

use techtrawl::config::{self, Config};
use techtrawl::crawler::{HttpFetcher, ResearchCrawler, ResearchPageParser};
use techtrawl::graph::{invert_edges, resolve_identifiers};
use techtrawl::output::write_jsonl;

/// Techtrawl: a polite Factorio research-tree mapper
///
/// Crawls the wiki's research pages breadth-first from the configured
/// roots and stores the normalized tech graph as JSONL, one record per
/// technology, sorted by internal name.
#[derive(Parser, Debug)]
#[command(name = "techtrawl")]
#[command(version)]
#[command(about = "Map the Factorio research tree to JSONL", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file overriding the built-in defaults
    #[arg(long, value_name = "CONFIG")]
    config: Option<std::path::PathBuf>,

    /// Path to the output JSONL file
    #[arg(long, value_name = "PATH")]
    output_path: Option<String>,

    /// Delay in seconds between page fetches
    #[arg(long, value_name = "SECONDS")]
    delay_seconds: Option<f64>,

    /// Suppress progress logs
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = match build_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return ExitCode::from(2);
        }
    };

    tokio::select! {
        result = run(&config) => match result {
            Ok(count) => {
                tracing::info!(records = count, path = %config.output.jsonl_path, "export written");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Error: {:#}", e);
                ExitCode::from(2)
            }
        },
        _ = tokio::signal::ctrl_c() => {
            eprintln!("Interrupted by user.");
            ExitCode::from(130)
        }
    }
}

/// Sets up the tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("techtrawl=info,warn"),
            1 => EnvFilter::new("techtrawl=debug,info"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Loads the configuration and applies CLI overrides, re-validating the
/// result so that flag values face the same checks as file values.
fn build_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => config::load_config(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => Config::default(),
    };

    if let Some(output_path) = &cli.output_path {
        config.output.jsonl_path = output_path.clone();
    }
    if let Some(delay) = cli.delay_seconds {
        config.crawler.delay_seconds = delay;
    }

    config::validate(&config)?;
    Ok(config)
}

/// Runs the crawl → resolve → invert → export pipeline.
async fn run(config: &Config) -> anyhow::Result<usize> {
    let base = Url::parse(&config.wiki.base_url).context("invalid base URL")?;

    let timeout = Duration::from_secs(config.crawler.request_timeout_secs);
    let fetcher = HttpFetcher::from_config(&config.user_agent, timeout)
        .context("failed to build HTTP client")?;
    let parser = ResearchPageParser::new(base.clone());
    let delay = Duration::from_secs_f64(config.crawler.delay_seconds);
    let crawler = ResearchCrawler::new(fetcher, parser, delay);

    tracing::info!(
        roots = config.wiki.roots.len(),
        delay_seconds = config.crawler.delay_seconds,
        "starting crawl"
    );

    let records_by_url = crawler.crawl(&config.wiki.roots, &base).await?;

    let mut records_by_id = resolve_identifiers(&records_by_url)?;
    invert_edges(&mut records_by_id);

    write_jsonl(&records_by_id, Path::new(&config.output.jsonl_path))?;

    Ok(records_by_id.len())
}
