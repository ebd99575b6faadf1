//! hicpack binary entry point.
//!
//! This is a thin wrapper around the hicpack library that:
//! 1. Parses command-line arguments
//! 2. Initializes logging
//! 3. Dispatches to build, inspect, extract, or score

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use hicpack::{BuildConfig, BuildPlan, ExtractArgs, InspectArgs, ScoreArgs, inspect, score};
use std::io::Write;

#[derive(Parser)]
#[command(
    name = "hicpack",
    about = "Pack per-pair matrix text files into binary matrix containers",
    version
)]
struct Cli {
    /// Set the logging level (RUST_LOG overrides)
    #[arg(short, long, value_enum, global = true, default_value = "info")]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Commands,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    const fn as_filter(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Build one container per distance category
    Build(BuildConfig),

    /// Show header and layout of a container
    Inspect(InspectArgs),

    /// Print the matrix stored for a pair of keys
    Extract(ExtractArgs),

    /// Score stored pairs by centre/corner enrichment
    Score(ScoreArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so inspect/extract output stays clean
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(cli.log_level.as_filter())),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Build(config) => {
            let plan = BuildPlan::from_config(&config)?;
            tracing::info!(
                "Building {} categories over {} keys",
                plan.distances().len(),
                plan.keys().len()
            );
            let run = plan.run()?;
            for report in &run.reports {
                writeln!(
                    out,
                    "{}: {} matrices of {}x{}, {} zero-filled",
                    report.output.display(),
                    report.summary.matrices_written,
                    report.discovered.matrix_size,
                    report.discovered.matrix_size,
                    report.summary.substitutions.len()
                )?;
            }
            for skipped in &run.skipped {
                tracing::warn!("Skipped distance '{}' after an earlier failure", skipped);
            }
            run.into_result()?;
        }
        Commands::Inspect(args) => inspect::inspect(&args, &mut out)?,
        Commands::Extract(args) => inspect::extract(&args, &mut out)?,
        Commands::Score(args) => score::score(&args, &mut out)?,
    }

    Ok(())
}
