//! Configuration types for tabsweep
//!
//! This module defines:
//! - CLI argument parsing using clap derive macros
//! - Runtime configuration with validation
//! - The full-match file name filter

use crate::error::ConfigError;
use clap::Parser;
use regex::Regex;
use std::path::{Path, PathBuf};

/// Name of the database file written at the scan root
pub const DB_FILE_NAME: &str = "db.sqlite";

/// Consolidate tabular files into a single SQLite database
#[derive(Parser, Debug, Clone)]
#[command(
    name = "tabsweep",
    version,
    about = "Consolidate CSV, Excel, Parquet and JSON files into one SQLite database",
    long_about = "Recursively scans a directory for .csv, .xlsx, .parquet and .json files,\n\
                  loads each one with default parsing options and stores every non-empty\n\
                  result as a table in <PATH>/db.sqlite.\n\n\
                  Tables are named after their file. When several files share a name,\n\
                  the directory they live in (relative to PATH) is appended.",
    after_help = "EXAMPLES:\n    \
        tabsweep ./exports\n    \
        tabsweep ./exports --match 'sales_.*\\.csv'\n    \
        tabsweep ./exports --no-index -q\n    \
        sqlite3 ./exports/db.sqlite '.tables'"
)]
pub struct CliArgs {
    /// Directory to scan (the database is written here)
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Only load files whose name fully matches this regular expression
    #[arg(short = 'm', long = "match", value_name = "PATTERN")]
    pub pattern: Option<String>,

    /// Do not write the leading row-index column
    #[arg(long)]
    pub no_index: bool,

    /// Quiet mode - suppress progress output
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Verbose output (log every candidate and skipped file)
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

/// File name filter with full-string match semantics
///
/// The pattern is anchored at both ends, so `data.csv` does not match
/// `old_data.csv` the way a plain `is_match` would.
#[derive(Debug, Clone)]
pub struct NameFilter {
    pattern: String,
    regex: Regex,
}

impl NameFilter {
    /// Compile a filter from a regular expression
    pub fn new(pattern: &str) -> Result<Self, ConfigError> {
        let regex = Regex::new(&format!("^(?:{})$", pattern)).map_err(|e| {
            ConfigError::InvalidFilterPattern {
                pattern: pattern.to_string(),
                reason: e.to_string(),
            }
        })?;

        Ok(Self {
            pattern: pattern.to_string(),
            regex,
        })
    }

    /// Check whether a bare file name matches the whole pattern
    pub fn matches(&self, file_name: &str) -> bool {
        self.regex.is_match(file_name)
    }

    /// The pattern as given by the caller
    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}

/// Validated runtime configuration
#[derive(Debug, Clone)]
pub struct SweepConfig {
    /// Directory to scan
    pub root: PathBuf,

    /// Optional file name filter
    pub filter: Option<NameFilter>,

    /// Write a leading `index` column with the row number
    pub write_index: bool,

    /// Show progress indicator
    pub show_progress: bool,

    /// Verbose logging
    pub verbose: bool,
}

impl SweepConfig {
    /// Configuration with library defaults for the given root
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            filter: None,
            write_index: true,
            show_progress: false,
            verbose: false,
        }
    }

    /// Restrict candidates to file names fully matching `filter`
    pub fn with_filter(mut self, filter: NameFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Enable or disable the leading `index` column
    pub fn with_index(mut self, write_index: bool) -> Self {
        self.write_index = write_index;
        self
    }

    /// Create and validate configuration from CLI arguments
    pub fn from_args(args: CliArgs) -> Result<Self, ConfigError> {
        validate_root(&args.path)?;

        let filter = args
            .pattern
            .as_deref()
            .map(NameFilter::new)
            .transpose()?;

        Ok(Self {
            root: args.path,
            filter,
            write_index: !args.no_index,
            show_progress: !args.quiet,
            verbose: args.verbose,
        })
    }

    /// Location of the output database
    pub fn db_path(&self) -> PathBuf {
        self.root.join(DB_FILE_NAME)
    }

    /// Check if a file name passes the optional filter
    pub fn is_selected(&self, file_name: &str) -> bool {
        self.filter
            .as_ref()
            .map_or(true, |filter| filter.matches(file_name))
    }
}

fn validate_root(path: &Path) -> Result<(), ConfigError> {
    match path.metadata() {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(ConfigError::InvalidRoot {
            path: path.to_path_buf(),
            reason: "not a directory".to_string(),
        }),
        Err(e) => Err(ConfigError::InvalidRoot {
            path: path.to_path_buf(),
            reason: e.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_is_full_match() {
        let filter = NameFilter::new(r"data\.csv").unwrap();
        assert!(filter.matches("data.csv"));
        assert!(!filter.matches("old_data.csv"));
        assert!(!filter.matches("data.csv.bak"));
    }

    #[test]
    fn test_filter_alternation_is_anchored() {
        let filter = NameFilter::new(r"a|a\.csv").unwrap();
        assert!(filter.matches("a.csv"));
        assert!(filter.matches("a"));
        assert!(!filter.matches("b.csv"));
    }

    #[test]
    fn test_invalid_filter() {
        let err = NameFilter::new("(unclosed").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidFilterPattern { .. }));
    }

    #[test]
    fn test_selection_without_filter() {
        let config = SweepConfig::new("/data");
        assert!(config.is_selected("anything.json"));
        assert_eq!(config.db_path(), PathBuf::from("/data").join("db.sqlite"));
    }

    #[test]
    fn test_from_args_rejects_missing_root() {
        let args = CliArgs::parse_from(["tabsweep", "/definitely/not/here"]);
        let err = SweepConfig::from_args(args).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidRoot { .. }));
    }

    #[test]
    fn test_from_args() {
        let dir = tempfile::tempdir().unwrap();
        let args = CliArgs::parse_from([
            "tabsweep",
            dir.path().to_str().unwrap(),
            "--match",
            r".*\.csv",
            "--no-index",
            "-q",
        ]);
        let config = SweepConfig::from_args(args).unwrap();
        assert!(!config.write_index);
        assert!(!config.show_progress);
        assert!(config.is_selected("x.csv"));
        assert!(!config.is_selected("x.json"));
    }
}
