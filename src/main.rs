//! tabsweep - Consolidate tabular files into SQLite
//!
//! Entry point for the CLI application.

use anyhow::{Context, Result};
use clap::Parser;
use tabsweep::config::{CliArgs, NameFilter, SweepConfig};
use tabsweep::consolidate::Consolidator;
use tabsweep::progress::{print_header, print_summary, ProgressReporter};
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    // Parse CLI arguments
    let args = CliArgs::parse();

    // Setup logging
    setup_logging(args.verbose)?;

    // Validate and create config
    let config = SweepConfig::from_args(args).context("Invalid configuration")?;

    // Print header
    if config.show_progress {
        print_header(
            &config.root.display().to_string(),
            config.filter.as_ref().map(NameFilter::pattern),
            &config.db_path().display().to_string(),
        );
    }

    // Create progress reporter
    let progress = if config.show_progress {
        Some(ProgressReporter::new())
    } else {
        None
    };

    if let Some(ref p) = progress {
        p.set_status("Scanning...");
    }

    let show_progress = config.show_progress;
    let report = Consolidator::new(config)
        .run_with_progress(|snapshot| {
            if let Some(ref p) = progress {
                p.update(snapshot);
            }
        })
        .context("Sweep failed")?;

    if let Some(ref p) = progress {
        p.finish("Sweep completed");
    }

    if show_progress {
        let db_size = std::fs::metadata(&report.db_path).ok().map(|m| m.len());
        print_summary(&report, db_size);
    }

    match report.database() {
        Some(path) => info!(database = %path.display(), "Database written"),
        None => info!("No tables written"),
    }

    Ok(())
}

fn setup_logging(verbose: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new("tabsweep=debug,warn")
    } else {
        EnvFilter::new("tabsweep=info,warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}
