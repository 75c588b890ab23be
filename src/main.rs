use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use parquet_fixtures::{init_tracing, inspect, patch_file, run_generate};
use parquet_fixtures_config::{FixturesConfig, LogFormat};
use parquet_fixtures_writer::{FixtureOutcome, GenerationReport};
use std::path::PathBuf;

/// Generate Parquet fixtures with size-mismatched compressed data pages
#[derive(Parser)]
#[command(name = "parquet-fixtures")]
#[command(version)]
#[command(about = "Generate Parquet fixtures with size-mismatched compressed data pages", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Path to configuration file
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Output directory for generated fixtures (overrides config file)
    #[arg(short, long, value_name = "DIR", global = true)]
    output: Option<PathBuf>,

    /// Log level: trace, debug, info, warn, error
    #[arg(short = 'v', long, value_name = "LEVEL", global = true)]
    log_level: Option<String>,

    /// Log format: text or json
    #[arg(long, value_name = "FORMAT", global = true)]
    log_format: Option<LogFormat>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the fixture matrix (default if no subcommand given)
    Generate,
    /// Print the footer and page headers of a Parquet file as JSON
    Inspect {
        /// Parquet file to scan
        file: PathBuf,
    },
    /// Write a size-mismatched copy of a single Parquet file
    Patch {
        /// Existing Parquet file
        source: PathBuf,
        /// Where the size-mismatched copy goes
        dest: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Step 1: Load base configuration
    let mut config = if let Some(config_path) = &cli.config {
        parquet_fixtures_config::load_from_file_path(config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))?
    } else {
        FixturesConfig::load().context("Failed to load configuration")?
    };

    // Step 2: Apply CLI overrides (highest priority)
    apply_cli_overrides(&mut config, &cli);
    config.validate()?;

    // Step 3: Initialize tracing
    init_tracing(&config);

    match cli.command {
        Some(Commands::Generate) | None => {
            let report = run_generate(&config)?;
            print_summary(&report);
            Ok(())
        }
        Some(Commands::Inspect { file }) => {
            let layout = inspect(&file)?;
            println!("{}", serde_json::to_string_pretty(&layout)?);
            Ok(())
        }
        Some(Commands::Patch { source, dest }) => {
            let report = patch_file(&source, &dest, &config)?;
            println!(
                "Patched {} page(s): {} -> {} ({} bytes)",
                report.pages.len(),
                source.display(),
                dest.display(),
                report.file_size
            );
            Ok(())
        }
    }
}

fn apply_cli_overrides(config: &mut FixturesConfig, cli: &Cli) {
    if let Some(output) = &cli.output {
        config.output.dir = output.to_string_lossy().to_string();
    }
    if let Some(level) = &cli.log_level {
        config.log.level = level.clone();
    }
    if let Some(format) = cli.log_format {
        config.log.format = format;
    }
}

fn print_summary(report: &GenerationReport) {
    println!(
        "Fixtures in {} ({} rows):",
        report.output_dir.display(),
        report.rows
    );
    for c in &report.combinations {
        let status = match &c.outcome {
            FixtureOutcome::Patched { pages } => format!("patched ({pages} pages)"),
            FixtureOutcome::Skipped { reason } => format!("skipped: {reason}"),
            FixtureOutcome::BaselineOnly => "baseline only".to_string(),
            FixtureOutcome::WriteFailed { reason } => format!("write failed: {reason}"),
        };
        println!("  data_page={}_{:<7} {}", c.version, c.codec.name(), status);
    }
    println!(
        "{} patched, {} skipped, {} failed",
        report.patched().count(),
        report.skipped().count(),
        report.failed().count()
    );
}
