//! CLI for the Issue Migrator.
//!
//! This tool copies milestones, labels, issues and comments from one GitHub
//! repository to another, and resumes interrupted runs.

use clap::Parser;
use issue_migrator::{
    ConfigError, MigrationConfig, ResumePoint, RunMode, RunSummary, Runner, RunnerConfig,
    RunnerError,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Issue Migrator - Copy issues, comments, milestones and labels between GitHub repositories.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the migration configuration file.
    #[arg(long, env = "ISSUE_MIGRATOR_CONFIG", default_value = "migration.toml")]
    config: PathBuf,

    /// Resume an interrupted run using the `[resume]` section of the config.
    #[arg(long)]
    resume: bool,

    /// Issue page to resume from (implies --resume).
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    start_page: Option<u32>,

    /// Highest source issue number already migrated (implies --resume).
    #[arg(long)]
    retry_threshold: Option<u64>,

    /// Preview the migration without writing to the destination.
    #[arg(long)]
    dry_run: bool,

    /// Directory for raw response snapshots.
    #[arg(long)]
    archive_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize tracing
    init_tracing();

    // Both ring and aws-lc-rs end up enabled in rustls, so pick one explicitly
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

    // Parse arguments
    let args = Args::parse();

    // Run the main logic
    match run(args).await {
        Ok(summary) => {
            print_summary(&summary);

            if summary.has_failures() {
                ExitCode::from(1)
            } else {
                ExitCode::from(0)
            }
        }
        Err(e) => {
            error!(error = %e, "Critical failure");
            ExitCode::from(2)
        }
    }
}

/// Initializes tracing with environment filter support.
///
/// Sets up the global tracing subscriber with:
/// - Compact log formatting (single-line output)
/// - Log level filtering via `RUST_LOG` env var (defaults to "info")
fn init_tracing() {
    tracing_subscriber::registry()
        .with(fmt::layer().compact().with_target(false))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

/// Main execution logic.
async fn run(args: Args) -> Result<RunSummary, RunnerError> {
    let mut migration = MigrationConfig::load(&args.config)?;
    if let Some(dir) = args.archive_dir.clone() {
        migration.archive_dir = Some(dir);
    }

    let mode = run_mode(&args, &migration)?;
    let runner = Runner::new(RunnerConfig::new(migration, mode, args.dry_run))?;
    runner.run().await
}

/// Picks fresh or resume mode; command-line values override the config's
/// `[resume]` section.
fn run_mode(args: &Args, migration: &MigrationConfig) -> Result<RunMode, ConfigError> {
    if !args.resume && args.start_page.is_none() && args.retry_threshold.is_none() {
        return Ok(RunMode::Fresh);
    }

    let configured = migration.resume;
    let start_page = args.start_page.or(configured.map(|r| r.start_page));
    let retry_threshold = args
        .retry_threshold
        .or(configured.map(|r| r.retry_threshold));

    match (start_page, retry_threshold) {
        (Some(start_page), Some(retry_threshold)) => Ok(RunMode::Resume(ResumePoint {
            start_page,
            retry_threshold,
        })),
        _ => Err(ConfigError::ValidationError {
            path: args.config.display().to_string(),
            message: "resume runs need a start page and a retry threshold".to_string(),
        }),
    }
}

/// Prints the final run summary.
fn print_summary(summary: &RunSummary) {
    println!("\nSummary:");
    println!(
        "  Mode: {}",
        if summary.dry_run { "Dry Run" } else { "Live" }
    );
    println!(
        "  Milestones created: {} (failed: {})",
        summary.milestones_created, summary.milestones_failed
    );
    println!(
        "  Labels created: {} (failed: {})",
        summary.labels_created, summary.labels_failed
    );
    println!("  Pages processed: {}", summary.pages_processed);
    println!("  Issues migrated: {}", summary.issues_migrated);
    println!("  Issues skipped: {}", summary.issues_skipped);
    println!("  Issues failed: {}", summary.issues_failed);
    println!(
        "  Comments created: {} (failed: {})",
        summary.comments_created, summary.comments_failed
    );
    if let Some(issue) = summary.last_completed_issue {
        println!("  Last completed issue: #{issue}");
    }
}
