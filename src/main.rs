//! llmsgen is a CLI tool that generates an llms.txt index file for a
//! website so AI crawlers can discover its most important pages.
//!
//! The tool has two commands:
//! 1. `generate` - Reads URLs from a sitemap or CSV, processes every page
//!    and writes the categorized llms.txt file
//! 2. `models` - Lists the curated OpenRouter model catalog

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use env_logger::Builder;
use log::{LevelFilter, info};

use llmsgen::FetchMode;
use llmsgen::config::{MODEL_CATALOG, ProcessingConfig, SiteMetadata, model_display_name};
use llmsgen::constants::DEFAULT_MODEL;
use llmsgen::fetch::build_fetcher;
use llmsgen::pipeline::run_pipeline;
use llmsgen::source::{UrlSource, read_urls};

/// A CLI tool to generate llms.txt for a website
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// The command to execute (generate or models)
    #[command(subcommand)]
    command: Command,

    #[arg(long, short, action = clap::ArgAction::Count, help = "Output v(v...)erbosity: error (0), warn (1), info (2), debug (3), trace (4)", global = true, default_value_t = 2)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Command {
    /// Generate llms.txt from a sitemap URL or a CSV of URLs
    Generate(GenerateArgs),
    /// List the curated OpenRouter model catalog
    Models,
}

#[derive(Args)]
struct GenerateArgs {
    /// The sitemap URL to read (mutually exclusive with --csv)
    #[arg(long, short, conflicts_with = "csv")]
    sitemap: Option<String>,
    /// Path to a CSV file with one URL per row
    #[arg(long)]
    csv: Option<PathBuf>,
    /// Path to the output file
    #[arg(long, short, default_value = "llms.txt")]
    output: PathBuf,
    /// Website name for the top-level heading (derived from the first URL if omitted)
    #[arg(long, short)]
    name: Option<String>,
    /// Website description for the blockquote line
    #[arg(long, short)]
    description: Option<String>,
    /// How page HTML is obtained: "http" or "rendered" (headless browser)
    #[arg(long, default_value = "http")]
    fetch: FetchMode,
    /// Generate descriptions with an LLM (requires OPENROUTER_API_KEY)
    #[arg(long)]
    ai: bool,
    /// OpenRouter model identifier to use for descriptions
    #[arg(long, short, default_value = DEFAULT_MODEL)]
    model: String,
    /// Request timeout in seconds (overrides REQUEST_TIMEOUT)
    #[arg(long, short)]
    timeout: Option<u64>,
    /// Number of concurrent workers (overrides MAX_WORKERS)
    #[arg(long, short)]
    workers: Option<usize>,
    /// Maximum URLs listed per section (overrides MAX_URLS_PER_SECTION)
    #[arg(long)]
    max_per_section: Option<usize>,
    /// Rate limit: LLM requests per minute (default: no limit)
    #[arg(long, short)]
    rpm: Option<u32>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    Builder::new()
        .filter_level(match cli.verbose {
            0 => LevelFilter::Error,
            1 => LevelFilter::Warn,
            2 => LevelFilter::Info,
            3 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        })
        .init();

    match cli.command {
        Command::Generate(args) => handle_generate(args).await,
        Command::Models => {
            print_models();
            Ok(())
        }
    }
}

async fn handle_generate(args: GenerateArgs) -> Result<()> {
    let source = match (args.sitemap, args.csv) {
        (Some(url), None) => UrlSource::Sitemap { url },
        (None, Some(path)) => UrlSource::Csv { path },
        _ => bail!("Provide exactly one URL source: --sitemap or --csv"),
    };

    let mut config = ProcessingConfig::from_env(args.fetch, args.ai, args.model)?;
    if let Some(timeout) = args.timeout {
        config.request_timeout = Duration::from_secs(timeout);
    }
    if let Some(workers) = args.workers {
        config.max_workers = workers;
    }
    if let Some(max_per_section) = args.max_per_section {
        config.max_urls_per_section = max_per_section;
    }
    config.rpm = args.rpm;

    let urls = read_urls(&source, config.request_timeout).await?;
    let site = SiteMetadata::resolve(
        args.name,
        args.description,
        urls.first().map(String::as_str),
    );

    let fetcher = build_fetcher(&urls, &config).await?;
    let outcome = run_pipeline(urls, &site, fetcher.as_ref(), &config).await?;

    fs::write(&args.output, &outcome.text)
        .context(format!("Failed to write output file {}", args.output.display()))?;

    info!(
        "Wrote {} with {} entries ({} described, {} failed)",
        args.output.display(),
        outcome.report.total,
        outcome.report.described,
        outcome.report.failed
    );
    Ok(())
}

fn print_models() {
    for (provider, models) in MODEL_CATALOG {
        println!("{provider}:");
        for model in *models {
            println!("  {model}  ->  {}", model_display_name(model));
        }
    }
}
