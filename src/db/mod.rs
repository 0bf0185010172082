//! Database module for SQLite output
//!
//! Every loaded table becomes one SQLite table in the output file.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                  Table (Arrow batches)                  │
//! └─────────────────────────┬───────────────────────────────┘
//!                           │ TableLayout::from_schema
//!                           ▼
//! ┌─────────────────────────────────────────────────────────┐
//! │                      TableWriter                        │
//! │  - DROP TABLE IF EXISTS / CREATE TABLE                  │
//! │  - prepared INSERT, one transaction per table           │
//! │  - ColumnConverter: Arrow value → SQLite value          │
//! └─────────────────────────┬───────────────────────────────┘
//!                           │
//!                           ▼
//! ┌─────────────────────────────────────────────────────────┐
//! │                   <root>/db.sqlite                      │
//! └─────────────────────────────────────────────────────────┘
//! ```

pub mod convert;
pub mod schema;
pub mod writer;

/// Name of the row-number column written ahead of the data columns
pub const INDEX_COLUMN: &str = "index";

pub use schema::{count_rows, list_tables, TableLayout};
pub use writer::{TableWriter, WriterStats};
