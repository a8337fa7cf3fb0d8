//! copybench - compare file copy strategies
//!
//! Copies one file with read/write, mmap, sendfile and splice and reports
//! how long each took relative to plain read/write.

mod display;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use console::style;
use copybench_config::{BenchConfig, ConfigLoader, ReportFormat};
use copybench_engine::{destination_for, BenchmarkHarness};
use copybench_strategies::CapabilityTable;
use copybench_types::{BufferSize, StrategyKind};
use dialoguer::Confirm;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, info};

/// copybench - file copy strategy benchmark
#[derive(Parser, Debug)]
#[command(
    name = "copybench",
    version = env!("CARGO_PKG_VERSION"),
    about = "Compare file copy strategies",
    long_about = "copybench copies one file with a read/write loop, a memory mapping,\n\
                  sendfile and a pipe splice, and reports each duration as a\n\
                  percentage of the read/write loop."
)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Quiet mode - minimal output
    #[arg(short, long)]
    quiet: bool,

    /// Verbose mode - detailed output
    #[arg(short, long)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Copy SOURCE with every strategy and compare the timings
    Compare {
        /// File to copy
        source: PathBuf,
        /// Destination prefix; each strategy appends its own extension
        dest_prefix: PathBuf,
        /// Buffer size for the read/write strategy, in bytes
        #[arg(short, long)]
        buffer_size: Option<usize>,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
        /// Overwrite existing destinations without asking
        #[arg(short, long)]
        yes: bool,
    },
    /// Show which strategies this host and build can run
    Capabilities {
        /// Print the table as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())?;
    init_logging(cli.debug, cli.quiet, cli.verbose, &config.logging.level)?;

    info!("copybench v{} starting", env!("CARGO_PKG_VERSION"));
    debug!("Effective configuration: {:?}", config);

    match cli.command {
        Commands::Compare {
            source,
            dest_prefix,
            buffer_size,
            json,
            yes,
        } => {
            compare_command(
                config,
                source,
                dest_prefix,
                buffer_size,
                json,
                yes,
                cli.quiet,
            )
            .await
        }
        Commands::Capabilities { json } => {
            capabilities_command(json)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Config => {
            print!("{}", serde_yaml::to_string(&config)?);
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<BenchConfig> {
    let config = match path {
        Some(path) => ConfigLoader::load_from_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => ConfigLoader::load_default().context("Failed to load configuration")?,
    };
    Ok(config)
}

fn init_logging(debug: bool, quiet: bool, verbose: bool, default_level: &str) -> Result<()> {
    use tracing_subscriber::{fmt, EnvFilter};

    let level = if debug {
        "debug"
    } else if verbose {
        "info"
    } else if quiet {
        "error"
    } else {
        default_level
    };

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .context("Invalid log filter")?;

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

/// Paths that a run would overwrite
fn existing_destinations(dest_prefix: &Path) -> Vec<PathBuf> {
    std::iter::once(dest_prefix.to_path_buf())
        .chain(
            StrategyKind::ALL
                .iter()
                .map(|&kind| destination_for(dest_prefix, kind)),
        )
        .filter(|path| path.exists())
        .collect()
}

fn confirm_overwrite(existing: &[PathBuf]) -> Result<bool> {
    for path in existing {
        display::display_warning(&format!("{} already exists", path.display()));
    }
    Confirm::new()
        .with_prompt("Overwrite existing destination files?")
        .default(false)
        .interact()
        .context("Could not ask for confirmation (use --yes to skip the prompt)")
}

async fn compare_command(
    config: BenchConfig,
    source: PathBuf,
    dest_prefix: PathBuf,
    buffer_size: Option<usize>,
    json: bool,
    yes: bool,
    quiet: bool,
) -> Result<ExitCode> {
    if !source.is_file() {
        bail!("Source file {} does not exist", source.display());
    }

    let existing = existing_destinations(&dest_prefix);
    if !existing.is_empty() && !yes && !confirm_overwrite(&existing)? {
        display::display_info("Nothing copied");
        return Ok(ExitCode::SUCCESS);
    }

    let mut options = config.strategy_options();
    if let Some(size) = buffer_size {
        options.buffer_size = BufferSize::new(size)
            .map_err(anyhow::Error::msg)
            .context("Invalid --buffer-size")?;
    }
    let json = json || config.report.format == ReportFormat::Json;

    if !quiet && !json {
        println!(
            "{} Benchmarking {} -> {}.*",
            style("→").green().bold(),
            style(source.display()).cyan(),
            style(dest_prefix.display()).cyan()
        );
    }

    // The strategies block; keep them off the async runtime threads
    let report = tokio::task::spawn_blocking(move || {
        BenchmarkHarness::with_options(options).run(&source, &dest_prefix)
    })
    .await
    .context("Benchmark task panicked")?;

    if json {
        println!("{}", report.to_json()?);
    } else {
        display::print_report(&report);
    }

    if report.all_succeeded() {
        Ok(ExitCode::SUCCESS)
    } else {
        if !json {
            display::display_error("At least one strategy failed");
        }
        Ok(ExitCode::FAILURE)
    }
}

fn capabilities_command(json: bool) -> Result<()> {
    let table = CapabilityTable::detect();
    if json {
        println!("{}", serde_json::to_string_pretty(&table)?);
    } else {
        display::print_capabilities(&table);
    }
    Ok(())
}
