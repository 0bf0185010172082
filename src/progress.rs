//! Progress reporting for a consolidation run
//!
//! Provides real-time progress display using indicatif progress bars.

use crate::consolidate::{SweepProgress, SweepReport};
use console::style;
use humansize::{format_size, BINARY};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Progress reporter that displays sweep status
pub struct ProgressReporter {
    bar: ProgressBar,
}

impl ProgressReporter {
    /// Create a new progress reporter
    pub fn new() -> Self {
        let bar = ProgressBar::new_spinner();

        // The template is a constant; fall back to the default style if it is rejected
        let style = ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏");
        bar.set_style(style);

        bar.enable_steady_tick(Duration::from_millis(100));

        Self { bar }
    }

    /// Update the progress display
    pub fn update(&self, progress: &SweepProgress) {
        let msg = format!(
            "Files: {}/{} | Tables: {} | Rows: {} | Skipped: {} | Rate: {:.0} rows/s",
            format_number(progress.processed),
            format_number(progress.total),
            format_number(progress.tables_written),
            format_number(progress.rows_written),
            format_number(progress.skipped),
            progress.rows_per_second(),
        );

        self.bar.set_message(msg);
    }

    /// Set a status message
    pub fn set_status(&self, status: &str) {
        self.bar.set_message(status.to_string());
    }

    /// Finish the progress display with a final message
    pub fn finish(&self, message: &str) {
        self.bar.finish_with_message(message.to_string());
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

/// Format a number with thousands separators
fn format_number(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Print a summary of the sweep results
pub fn print_summary(report: &SweepReport, db_size: Option<u64>) {
    let duration_secs = report.duration.as_secs_f64();
    let skipped = report.skipped().count() as u64;

    println!();
    if report.database().is_some() {
        println!("{}", style("Sweep Complete").green().bold());
    } else {
        println!("{}", style("Nothing Written").yellow().bold());
    }
    println!("{}", style("─".repeat(50)).dim());
    println!(
        "  {} {} ({} files seen)",
        style("Directories:").bold(),
        format_number(report.dirs),
        format_number(report.files)
    );
    println!(
        "  {} {}",
        style("Tables:").bold(),
        format_number(report.tables_written() as u64)
    );
    println!(
        "  {} {}",
        style("Rows:").bold(),
        format_number(report.total_rows())
    );
    println!("  {} {:.1}s", style("Duration:").bold(), duration_secs);
    if skipped > 0 {
        println!(
            "  {} {}",
            style("Skipped:").yellow().bold(),
            format_number(skipped)
        );
        for outcome in report.skipped() {
            println!("    {}", style(outcome.path().display()).dim());
        }
    }
    if report.scan_errors > 0 {
        println!(
            "  {} {}",
            style("Errors:").yellow().bold(),
            format_number(report.scan_errors)
        );
    }
    // Show database path with size if available
    let db_path = report.db_path.display();
    if let Some(size) = db_size {
        let db_size_str = format_size(size, BINARY);
        println!("  {} {} ({})", style("Database:").bold(), db_path, db_size_str);
    } else {
        println!("  {} {}", style("Database:").bold(), db_path);
    }
    println!();
}

/// Print a header at the start of the sweep
pub fn print_header(root: &str, filter: Option<&str>, output: &str) {
    println!();
    println!(
        "{} {}",
        style("tabsweep").cyan().bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!("{}", style("─".repeat(50)).dim());
    println!("  {} {}", style("Source:").bold(), root);
    if let Some(pattern) = filter {
        println!("  {} {}", style("Match:").bold(), pattern);
    }
    println!("  {} {}", style("Output:").bold(), output);
    println!();
}
