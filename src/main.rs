//! Place-Enricher main entry point
//!
//! This is the command-line interface for the place enrichment pipeline.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use place_enricher::audit::{audit, AuditAction, AuditActions};
use place_enricher::backend::HttpBackend;
use place_enricher::cache::{json_files, strip_ids, StripOutcome};
use place_enricher::config::{load_config_with_hash, load_default_config, Config};
use place_enricher::crawler::HttpFetcher;
use place_enricher::extract::OpenAiClient;
use place_enricher::output::{print_report, BatchReport};
use place_enricher::pipeline::{AutoConfirm, Confirm, Enricher, Pipeline, Syncer};
use place_enricher::places::format_places_file;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Place-Enricher: crawl, extract and reconcile business places
///
/// Formats raw Google Places results into a local cache, enriches each place
/// from its own website through a schema-constrained extraction service, and
/// syncs the result with the backend place store.
#[derive(Parser, Debug)]
#[command(name = "place-enricher")]
#[command(version)]
#[command(about = "Crawl, extract and reconcile business places", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults apply when omitted)
    #[arg(short, long, value_name = "CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    /// Answer yes to every prompt
    #[arg(short, long, global = true)]
    yes: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Format a Google Places nearby-search JSON array into cache files
    Format {
        /// Raw nearby-search results
        input: PathBuf,

        /// Output directory (defaults to output.cache-dir)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Crawl and extract enriched records for cached places
    Enrich {
        /// Cache files (defaults to every file in output.cache-dir)
        paths: Vec<PathBuf>,
    },

    /// Create or update enriched places in the backend
    Sync {
        /// Enriched files (defaults to every file in output.enriched-dir)
        paths: Vec<PathBuf>,
    },

    /// Enrich then sync cached places
    Run {
        /// Cache files (defaults to every file in output.cache-dir)
        paths: Vec<PathBuf>,
    },

    /// Remove the locally held backend id from every JSON file in a directory
    StripIds {
        /// Directory to sweep (defaults to output.cache-dir)
        dir: Option<PathBuf>,
    },

    /// Look up a range of backend ids and apply an action per outcome
    Audit {
        /// First id (inclusive)
        #[arg(long)]
        start: i64,

        /// Last id (exclusive)
        #[arg(long)]
        end: i64,

        /// Action for places that exist (skip, delete)
        #[arg(long, default_value = "skip")]
        on_found: AuditAction,

        /// Action for ids answered with 404 (skip, delete)
        #[arg(long, default_value = "skip")]
        on_not_found: AuditAction,

        /// Action for ids answered with 5xx (skip, delete)
        #[arg(long, default_value = "skip")]
        on_server_error: AuditAction,
    },

    /// Validate the configuration and print it
    CheckConfig,
}

/// Asks on the terminal; anything but `y` is a no
struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        print!("{} (y/n): ", prompt);
        if std::io::stdout().flush().is_err() {
            return false;
        }

        let mut answer = String::new();
        match std::io::stdin().lock().read_line(&mut answer) {
            Ok(_) => answer.trim().eq_ignore_ascii_case("y"),
            Err(_) => false,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            match load_config_with_hash(path) {
                Ok((cfg, hash)) => {
                    tracing::info!("Configuration loaded successfully (hash: {})", hash);
                    cfg
                }
                Err(e) => {
                    tracing::error!("Failed to load configuration: {}", e);
                    return Err(e.into());
                }
            }
        }
        None => {
            tracing::debug!("No configuration file given, using defaults");
            load_default_config()?
        }
    };

    let confirm: Box<dyn Confirm> = if cli.yes {
        Box::new(AutoConfirm(true))
    } else {
        Box::new(StdinConfirm)
    };

    match cli.command {
        Command::Format { input, output } => handle_format(&config, &input, output, confirm)?,
        Command::Enrich { paths } => handle_enrich(&config, paths, confirm).await?,
        Command::Sync { paths } => handle_sync(&config, paths).await?,
        Command::Run { paths } => handle_run(&config, paths, confirm).await?,
        Command::StripIds { dir } => handle_strip_ids(&config, dir)?,
        Command::Audit {
            start,
            end,
            on_found,
            on_not_found,
            on_server_error,
        } => {
            let actions = AuditActions {
                found: on_found,
                not_found: on_not_found,
                server_error: on_server_error,
            };
            handle_audit(&config, start, end, actions).await?
        }
        Command::CheckConfig => handle_check_config(&config),
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("place_enricher=info,warn"),
            1 => EnvFilter::new("place_enricher=debug,info"),
            2 => EnvFilter::new("place_enricher=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Uses the given paths, or every JSON file in `default_dir`
fn resolve_paths(paths: Vec<PathBuf>, default_dir: &str) -> anyhow::Result<Vec<PathBuf>> {
    if !paths.is_empty() {
        return Ok(paths);
    }

    let files = json_files(Path::new(default_dir))
        .with_context(|| format!("Cannot list place files in {}", default_dir))?;
    if files.is_empty() {
        bail!("No place files found in {}", default_dir);
    }
    Ok(files)
}

/// Prints the report and fails if any place failed
fn finish_batch(report: &BatchReport) -> anyhow::Result<()> {
    print_report(report);
    if report.failed() > 0 {
        bail!(
            "{} of {} places failed",
            report.failed(),
            report.places.len()
        );
    }
    Ok(())
}

fn build_enricher(
    config: &Config,
    confirm: Box<dyn Confirm>,
) -> anyhow::Result<Enricher<HttpFetcher, OpenAiClient>> {
    let fetcher = HttpFetcher::new(&config.crawler).context("Cannot build page fetcher")?;
    let service = OpenAiClient::from_config(&config.extractor)?;
    tracing::info!("Extraction model: {}", service.model());

    Ok(Enricher::new(
        fetcher,
        service,
        confirm,
        config.crawler.max_pages,
        &config.output.enriched_dir,
    ))
}

fn build_syncer(config: &Config) -> anyhow::Result<Syncer<HttpBackend>> {
    let backend = HttpBackend::new(&config.backend).context("Cannot build backend client")?;
    tracing::info!("Backend: {}", backend.base_url());

    Ok(Syncer::new(
        backend,
        config.backend.bounds_epsilon,
        config.backend.publish_promotions,
    ))
}

fn handle_format(
    config: &Config,
    input: &Path,
    output: Option<PathBuf>,
    confirm: Box<dyn Confirm>,
) -> anyhow::Result<()> {
    let output = output.unwrap_or_else(|| PathBuf::from(&config.output.cache_dir));

    let summary = format_places_file(input, &output, confirm.as_ref())
        .with_context(|| format!("Cannot format {}", input.display()))?;

    println!("=== Format Summary ===\n");
    println!("  Written: {}", summary.written.len());
    println!("  Not operational: {}", summary.not_operational);
    println!("  Declined: {}", summary.declined);
    if summary.failed > 0 {
        println!("  Failed: {}", summary.failed);
    }
    println!("\nOutput: {}", output.display());

    if summary.failed > 0 {
        bail!("{} places could not be written", summary.failed);
    }
    Ok(())
}

async fn handle_enrich(
    config: &Config,
    paths: Vec<PathBuf>,
    confirm: Box<dyn Confirm>,
) -> anyhow::Result<()> {
    let paths = resolve_paths(paths, &config.output.cache_dir)?;
    let enricher = build_enricher(config, confirm)?;

    tracing::info!("Enriching {} places", paths.len());
    let report = enricher.enrich_all(&paths).await;
    finish_batch(&report)
}

async fn handle_sync(config: &Config, paths: Vec<PathBuf>) -> anyhow::Result<()> {
    let paths = resolve_paths(paths, &config.output.enriched_dir)?;
    let syncer = build_syncer(config)?;

    tracing::info!("Syncing {} places", paths.len());
    let report = syncer.sync_all(&paths).await;
    finish_batch(&report)
}

async fn handle_run(
    config: &Config,
    paths: Vec<PathBuf>,
    confirm: Box<dyn Confirm>,
) -> anyhow::Result<()> {
    let paths = resolve_paths(paths, &config.output.cache_dir)?;
    let pipeline = Pipeline::new(build_enricher(config, confirm)?, build_syncer(config)?);

    tracing::info!("Running pipeline over {} places", paths.len());
    let report = pipeline.run_all(&paths).await;
    finish_batch(&report)
}

fn handle_strip_ids(config: &Config, dir: Option<PathBuf>) -> anyhow::Result<()> {
    let dir = dir.unwrap_or_else(|| PathBuf::from(&config.output.cache_dir));
    let results = strip_ids(&dir).with_context(|| format!("Cannot sweep {}", dir.display()))?;

    let removed = results
        .iter()
        .filter(|(_, r)| matches!(r, Ok(StripOutcome::Removed)))
        .count();
    let untouched = results
        .iter()
        .filter(|(_, r)| matches!(r, Ok(StripOutcome::NoIdField)))
        .count();
    let errors = results.len() - removed - untouched;

    println!(
        "Removed {} ids, {} files had none, {} errors",
        removed, untouched, errors
    );
    Ok(())
}

async fn handle_audit(
    config: &Config,
    start: i64,
    end: i64,
    actions: AuditActions,
) -> anyhow::Result<()> {
    if end <= start {
        bail!("Audit range is empty: {}..{}", start, end);
    }

    let backend = HttpBackend::new(&config.backend).context("Cannot build backend client")?;
    tracing::info!(
        "Auditing ids {}..{} (found: {}, not found: {}, server error: {})",
        start,
        end,
        actions.found,
        actions.not_found,
        actions.server_error
    );

    let summary = audit(&backend, start..end, &actions).await;

    println!("=== Audit Summary ===\n");
    println!("  Found: {}", summary.found);
    println!("  Not found: {}", summary.not_found);
    println!("  Server errors: {}", summary.server_error);
    println!("  Other answers: {}", summary.other);
    println!("  Unreachable: {}", summary.unreachable);
    println!("  Deleted: {}", summary.deleted);
    if summary.delete_failures > 0 {
        println!("  Delete failures: {}", summary.delete_failures);
    }

    Ok(())
}

/// Prints the effective configuration
fn handle_check_config(config: &Config) {
    println!("=== Place-Enricher Configuration ===\n");

    println!("Crawler:");
    println!("  Max pages: {}", config.crawler.max_pages);
    println!("  Request timeout: {}s", config.crawler.request_timeout_secs);
    println!("  User agent: {}", config.crawler.user_agent);

    println!("\nExtractor:");
    println!("  API URL: {}", config.extractor.api_url);
    println!("  Model: {}", config.extractor.model);
    println!("  API key variable: {}", config.extractor.api_key_env);
    let key_set = std::env::var(&config.extractor.api_key_env).is_ok_and(|v| !v.is_empty());
    println!("  API key set: {}", if key_set { "yes" } else { "no" });
    println!("  Timeout: {}s", config.extractor.timeout_secs);

    println!("\nBackend:");
    println!("  API URL: {}", config.backend.api_url);
    println!("  Timeout: {}s", config.backend.timeout_secs);
    println!("  Bounds epsilon: {}°", config.backend.bounds_epsilon);
    println!("  Publish promotions: {}", config.backend.publish_promotions);

    println!("\nOutput:");
    println!("  Cache directory: {}", config.output.cache_dir);
    println!("  Enriched directory: {}", config.output.enriched_dir);

    println!("\n✓ Configuration is valid");
}
