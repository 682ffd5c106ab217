//! Sumi-Lens main entry point
//!
//! This is the command-line interface for the Sumi-Lens page analyzer.

use anyhow::Context;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use sumi_lens::analyzer::Analyzer;
use sumi_lens::config::{load_config, validate, Config, HostMatching};
use sumi_lens::output::{render_failure, render_report, write_output, FailureResponse, OutputFormat};
use tracing_subscriber::EnvFilter;

/// Sumi-Lens: a single-page asset and link survey
///
/// Sumi-Lens fetches one page, groups its images by file type with their
/// total size, and splits its links into internal and external sets.
#[derive(Parser, Debug)]
#[command(name = "sumi-lens")]
#[command(version = "1.0.0")]
#[command(about = "Analyze the images and links of a web page", long_about = None)]
struct Cli {
    /// URL of the page to analyze (https:// is assumed when omitted)
    #[arg(value_name = "URL")]
    url: String,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Json)]
    format: Format,

    /// Write the result to a file instead of stdout
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Timeout for each image size probe, in milliseconds
    #[arg(long, value_name = "MS")]
    probe_timeout_ms: Option<u64>,

    /// Timeout for the whole analysis, in milliseconds
    #[arg(long, value_name = "MS")]
    overall_timeout_ms: Option<u64>,

    /// Maximum number of image probes in flight at once (default: all)
    #[arg(long, value_name = "N")]
    max_concurrent_probes: Option<usize>,

    /// Maximum number of links reported per category
    #[arg(long, value_name = "N")]
    max_links: Option<usize>,

    /// Omit the per-bucket image URL lists
    #[arg(long)]
    no_bucket_urls: bool,

    /// Subdomain matching rule: label-boundary or suffix
    #[arg(long, value_name = "MODE")]
    host_matching: Option<HostMatching>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Json,
    Markdown,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Json => OutputFormat::Json,
            Format::Markdown => OutputFormat::Markdown,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = load_effective_config(&cli)?;
    let format = OutputFormat::from(cli.format);

    let outcome = match Analyzer::new(&config) {
        Ok(analyzer) => analyzer.analyze(&cli.url).await,
        Err(e) => Err(e),
    };

    match outcome {
        Ok(report) => {
            let rendered = render_report(&report, format)?;
            emit(&rendered, cli.output.as_ref())?;
            Ok(())
        }
        Err(e) => {
            let failure = FailureResponse::from(&e);
            let rendered = render_failure(&failure, format)?;
            emit(&rendered, cli.output.as_ref())?;
            Err(e.into())
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr so that stdout carries only the report.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sumi_lens=info,warn"),
            1 => EnvFilter::new("sumi_lens=debug,info"),
            2 => EnvFilter::new("sumi_lens=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the configuration file, if any, and applies command-line overrides
fn load_effective_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let config = load_config(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
            tracing::info!("Configuration loaded successfully");
            config
        }
        None => Config::default(),
    };

    if let Some(ms) = cli.probe_timeout_ms {
        config.analyzer.probe_timeout_ms = ms;
    }
    if let Some(ms) = cli.overall_timeout_ms {
        config.analyzer.overall_timeout_ms = ms;
    }
    if let Some(max) = cli.max_concurrent_probes {
        config.analyzer.max_concurrent_probes = Some(max);
    }
    if let Some(max) = cli.max_links {
        config.analyzer.max_links_per_category = Some(max);
    }
    if cli.no_bucket_urls {
        config.analyzer.include_image_urls_per_bucket = false;
    }
    if let Some(mode) = cli.host_matching {
        config.analyzer.host_matching = mode;
    }

    validate(&config).context("Invalid configuration")?;

    Ok(config)
}

/// Prints rendered output or writes it to the requested file
fn emit(rendered: &str, output: Option<&PathBuf>) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            write_output(rendered, path)?;
            tracing::info!("Result written to: {}", path.display());
        }
        None => println!("{}", rendered),
    }
    Ok(())
}
