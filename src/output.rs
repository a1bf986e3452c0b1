//! Terminal presentation for the command-line front end.
//!
//! Renders pass events (status lines and progress) with `colored` and an
//! `indicatif` progress bar, and prints summaries. The cleaning pass itself
//! knows nothing about this module; it only talks to a `Reporter`.

use crate::cleaner::{
    CleanEvent, MARK_DONE, MARK_ERROR, MARK_MOVED, MARK_STOP, MARK_WARNING, PlannedMove,
    RunSummary,
};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashMap;

/// Resolution of the progress bar; fractions are scaled to this length.
const PROGRESS_STEPS: u64 = 1000;

/// Styling for a status line, chosen from its leading marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    Success,
    Error,
    Warning,
    Plain,
}

impl LineStyle {
    pub fn of(message: &str) -> Self {
        if message.starts_with(MARK_ERROR) {
            LineStyle::Error
        } else if message.starts_with(MARK_MOVED) || message.starts_with(MARK_DONE) {
            LineStyle::Success
        } else if message.starts_with(MARK_WARNING) || message.starts_with(MARK_STOP) {
            LineStyle::Warning
        } else {
            LineStyle::Plain
        }
    }
}

/// Manages all CLI output with consistent styling and formatting.
pub struct OutputFormatter;

impl OutputFormatter {
    /// Applies the colour for a status line.
    pub fn styled(message: &str) -> ColoredString {
        match LineStyle::of(message) {
            LineStyle::Success => message.green(),
            LineStyle::Error => message.red(),
            LineStyle::Warning => message.yellow(),
            LineStyle::Plain => message.normal(),
        }
    }

    /// Prints a section header.
    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    /// Creates a progress bar driven by fractions in `0.0..=1.0`.
    pub fn create_progress_bar() -> ProgressBar {
        let pb = ProgressBar::new(PROGRESS_STEPS);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.cyan} [{bar:40.cyan/blue}] {percent:>3}% {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░");
        pb.set_style(style);
        pb
    }

    /// Prints a summary table of moved files by category.
    pub fn summary_table(category_counts: &HashMap<String, usize>, summary: &RunSummary) {
        Self::header("SUMMARY");

        let mut categories: Vec<_> = category_counts.iter().collect();
        categories.sort_by_key(|&(name, _)| name);

        let width = categories
            .iter()
            .map(|(name, _)| name.len())
            .max()
            .unwrap_or(0)
            .max(8);

        println!(
            "{:<width$} | {}",
            "Category".bold(),
            "Files".bold(),
            width = width
        );
        println!("{}", "-".repeat(width + 10));

        for (category, count) in &categories {
            println!(
                "{:<width$} | {} {}",
                category,
                count.to_string().green(),
                plural(**count),
                width = width
            );
        }

        println!("{}", "-".repeat(width + 10));
        println!(
            "{:<width$} | {} {}",
            "Moved".bold(),
            summary.moved.to_string().green().bold(),
            plural(summary.moved),
            width = width
        );
        if summary.renamed > 0 {
            println!(
                "{:<width$} | {} {}",
                "Renamed",
                summary.renamed.to_string().yellow(),
                plural(summary.renamed),
                width = width
            );
        }
        if summary.errors > 0 {
            println!(
                "{:<width$} | {} {}",
                "Errors".bold(),
                summary.errors.to_string().red().bold(),
                plural(summary.errors),
                width = width
            );
        }
    }

    /// Prints the moves a dry run would perform.
    pub fn plan(plan: &[PlannedMove]) {
        if plan.is_empty() {
            Self::dry_run_notice("No files found to clean.");
            return;
        }

        Self::dry_run_notice("Files would be organized as follows:");
        let mut counts: HashMap<String, usize> = HashMap::new();
        for planned in plan {
            let name = planned
                .from
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            if planned.renamed {
                println!(
                    " - {} → {}/{} {}",
                    name,
                    planned.category.cyan(),
                    planned.file_name,
                    "(renamed)".yellow()
                );
            } else {
                println!(" - {} → {}", name, planned.category.cyan());
            }
            *counts.entry(planned.category.clone()).or_insert(0) += 1;
        }

        let mut categories: Vec<_> = counts.into_iter().collect();
        categories.sort();
        Self::header("DRY RUN SUMMARY");
        for (category, count) in categories {
            println!("  {}: {} {}", category, count, plural(count));
        }
        Self::dry_run_notice("No files were modified.");
    }

    /// Prints a dry-run notice message.
    pub fn dry_run_notice(message: &str) {
        println!("{}", format!("[DRY RUN] {}", message).yellow());
    }
}

/// Draws the events of one pass: lines above the bar, fractions on it.
pub struct PassView {
    bar: ProgressBar,
}

impl PassView {
    pub fn new() -> Self {
        Self {
            bar: OutputFormatter::create_progress_bar(),
        }
    }

    /// A view that prints lines but draws no bar (for `--json`).
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    pub fn handle(&self, event: CleanEvent) {
        match event {
            CleanEvent::Log(message) => {
                if self.bar.is_hidden() {
                    eprintln!("{}", OutputFormatter::styled(&message));
                } else {
                    self.bar.println(OutputFormatter::styled(&message).to_string());
                }
            }
            CleanEvent::Progress(fraction) => {
                self.bar.set_position(fraction_to_steps(fraction));
            }
        }
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl Default for PassView {
    fn default() -> Self {
        Self::new()
    }
}

fn fraction_to_steps(fraction: f64) -> u64 {
    (fraction.clamp(0.0, 1.0) * PROGRESS_STEPS as f64).round() as u64
}

fn plural(count: usize) -> &'static str {
    if count == 1 { "file" } else { "files" }
}
