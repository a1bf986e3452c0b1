//! Command-line interface module for folder-cleaner.
//!
//! This module handles all CLI-related functionality including:
//! - Argument parsing
//! - Logging setup
//! - Running a pass on a worker thread while the main thread draws output
//! - Ctrl-C handling through the pass's stop flag
//! - Dry-run planning

use crate::cleaner::{ChannelReporter, FolderCleaner, PassOutcome, RunSummary};
use crate::config::CleanerConfig;
use crate::output::{OutputFormatter, PassView};
use anyhow::{Context, Result, anyhow};
use clap::Parser;
use std::path::PathBuf;

/// Sort the files of a directory into category subfolders.
#[derive(Debug, Parser)]
#[command(name = "folder-cleaner", version, about)]
pub struct Cli {
    /// Directory whose top-level files should be organized
    pub directory: PathBuf,

    /// Category table to use instead of the built-in one
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Show where each file would go without moving anything
    #[arg(long)]
    pub dry_run: bool,

    /// Print the run summary as JSON on stdout
    #[arg(long)]
    pub json: bool,

    /// Enable debug logging on stderr
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Initialize the `tracing` subscriber for this invocation.
    pub fn setup_logging(&self) {
        let level = if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::WARN
        };

        tracing_subscriber::fmt()
            .with_max_level(level)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }
}

/// What a CLI invocation produced.
#[derive(Debug)]
pub enum CliOutcome {
    /// A dry run; nothing was moved.
    Planned { files: usize },
    /// A real pass.
    Cleaned(RunSummary),
}

impl CliOutcome {
    /// True when the pass could not start (invalid or unreadable directory).
    pub fn is_failure(&self) -> bool {
        matches!(self, CliOutcome::Cleaned(summary) if summary.outcome == PassOutcome::Failed)
    }
}

/// Runs the CLI with parsed arguments.
///
/// # Examples
///
/// ```no_run
/// use clap::Parser;
/// use folder_cleaner::cli::{Cli, run_cli};
///
/// let cli = Cli::parse_from(["folder-cleaner", "/path/to/Downloads"]);
/// match run_cli(&cli) {
///     Ok(outcome) => println!("{:?}", outcome),
///     Err(e) => eprintln!("Error: {:#}", e),
/// }
/// ```
pub fn run_cli(cli: &Cli) -> Result<CliOutcome> {
    let table = CleanerConfig::load(cli.config.as_deref())
        .context("Error loading configuration")?
        .into_table()
        .context("Error loading configuration")?;
    let cleaner = FolderCleaner::new(table);

    if cli.dry_run {
        let plan = cleaner
            .plan(&cli.directory)
            .with_context(|| format!("Cannot plan {}", cli.directory.display()))?;
        OutputFormatter::plan(&plan);
        return Ok(CliOutcome::Planned { files: plan.len() });
    }

    let summary = clean_directory(&cleaner, cli)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else if summary.outcome != PassOutcome::Failed && summary.found > 0 {
        OutputFormatter::summary_table(&summary.category_counts(), &summary);
    }

    Ok(CliOutcome::Cleaned(summary))
}

/// Runs the pass on a worker thread and renders its events here.
fn clean_directory(cleaner: &FolderCleaner, cli: &Cli) -> Result<RunSummary> {
    let stop = cleaner.stop_flag();
    // Only one handler may exist per process.
    if let Err(e) = ctrlc::set_handler(move || stop.request_stop()) {
        tracing::warn!(error = %e, "Ctrl-C will not stop the pass");
    }

    let (tx, rx) = crossbeam_channel::unbounded();
    let handle = cleaner
        .spawn(cli.directory.clone(), ChannelReporter::new(tx))
        .context("Cannot start worker thread")?;

    let view = if cli.json {
        PassView::hidden()
    } else {
        PassView::new()
    };
    // Ends when the worker drops its reporter.
    for event in rx {
        view.handle(event);
    }
    view.finish();

    handle
        .join()
        .map_err(|_| anyhow!("worker thread panicked"))
}
