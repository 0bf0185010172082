//! Error types for tabsweep
//!
//! This module defines the error hierarchy for a consolidation run:
//! - Filesystem errors on the scan root (fatal)
//! - SQLite database errors (fatal)
//! - Configuration errors
//! - Per-file load errors (never fatal, the file is skipped)
//!
//! Design philosophy:
//! - Use thiserror for structured error types in library code
//! - Errors should be actionable - include the offending path or pattern
//! - Keep file-level errors separate so they cannot leak into the fatal path

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for a consolidation run
#[derive(Error, Debug)]
pub enum SweepError {
    /// Database errors
    #[error("Database error: {0}")]
    Database(#[from] DbError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// I/O errors (reading the scan root, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Database errors
#[derive(Error, Debug)]
pub enum DbError {
    /// SQLite error
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Failed to render a cell value for insertion
    #[error("Failed to convert column value: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// Failed to create database file
    #[error("Failed to create database at '{path}': {reason}")]
    CreateFailed { path: PathBuf, reason: String },
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Scan root missing or not a directory
    #[error("Invalid scan root '{path}': {reason}")]
    InvalidRoot { path: PathBuf, reason: String },

    /// File name filter did not compile
    #[error("Invalid filter pattern '{pattern}': {reason}")]
    InvalidFilterPattern { pattern: String, reason: String },
}

/// Errors raised while loading a single candidate file
///
/// None of these abort a run; the consolidator logs them and moves on.
#[derive(Error, Debug)]
pub enum LoadError {
    /// File could not be opened or read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parse or schema inference error
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// Parquet decode error
    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    /// Workbook decode error
    #[error("Excel error: {0}")]
    Excel(#[from] calamine::XlsxError),

    /// Malformed JSON document
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// JSON cell holding an object or array
    #[error("Nested value in column '{column}' cannot be stored as a table cell")]
    NestedJson { column: String },

    /// JSON document shape that does not describe a table
    #[error("Unsupported layout: {0}")]
    UnsupportedLayout(String),

    /// Workbook without any worksheet
    #[error("Workbook has no worksheets")]
    NoWorksheet,

    /// Parsed successfully but holds no rows
    #[error("Table is empty")]
    Empty,
}

impl LoadError {
    /// Check if the file parsed cleanly but produced zero rows
    pub fn is_empty_table(&self) -> bool {
        matches!(self, LoadError::Empty)
    }
}

/// Result type alias for SweepError
pub type Result<T> = std::result::Result<T, SweepError>;

/// Result type alias for DbError
pub type DbResult<T> = std::result::Result<T, DbError>;

/// Result type alias for LoadError
pub type LoadResult<T> = std::result::Result<T, LoadError>;

/// Represents the outcome of processing a single candidate file
#[derive(Debug)]
pub enum FileOutcome {
    /// Stored as a table
    Written {
        path: PathBuf,
        table: String,
        rows: usize,
    },

    /// Skipped because it failed to load or was empty
    Skipped { path: PathBuf, reason: String },
}

impl FileOutcome {
    /// Returns true if this outcome produced a table
    pub fn is_written(&self) -> bool {
        matches!(self, FileOutcome::Written { .. })
    }

    /// Returns the source file associated with this outcome
    pub fn path(&self) -> &std::path::Path {
        match self {
            FileOutcome::Written { path, .. } => path,
            FileOutcome::Skipped { path, .. } => path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_table_detection() {
        assert!(LoadError::Empty.is_empty_table());
        assert!(!LoadError::NoWorksheet.is_empty_table());
    }

    #[test]
    fn test_error_conversion() {
        let db_err = DbError::CreateFailed {
            path: "/data/db.sqlite".into(),
            reason: "read-only filesystem".into(),
        };
        let sweep_err: SweepError = db_err.into();
        assert!(matches!(sweep_err, SweepError::Database(_)));
        assert!(sweep_err.to_string().contains("read-only filesystem"));
    }

    #[test]
    fn test_outcome_path() {
        let outcome = FileOutcome::Skipped {
            path: "/data/bad.csv".into(),
            reason: "Table is empty".into(),
        };
        assert!(!outcome.is_written());
        assert_eq!(outcome.path(), std::path::Path::new("/data/bad.csv"));
    }
}
