//! tabsweep - Consolidate scattered tabular files into one SQLite database
//!
//! Recursively scans a directory for CSV, Excel, Parquet and JSON files,
//! loads each with default parsing options and stores every non-empty
//! result as a table in `<root>/db.sqlite`.
//!
//! # Features
//!
//! - **Extension Dispatch**: `.csv`, `.xlsx`, `.parquet` and `.json` files
//!   are routed to their loader; everything else is ignored.
//!
//! - **Name Filter**: an optional regular expression that must match the
//!   whole file name.
//!
//! - **Collision-Free Names**: tables are named after their file; files
//!   sharing a name get their root-relative directory appended.
//!
//! - **Fault Tolerant**: a file that fails to parse or holds no rows is
//!   skipped and never takes part in naming.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         Scan root                                │
//! └─────────────────────────────┬───────────────────────────────────┘
//!                               │ walker::scan
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │   Candidates (file name, sub-path, FileKind)                     │
//! │            │ naming::group_by_name                               │
//! │            ▼                                                     │
//! │   ┌─────────┐  ┌─────────┐  ┌─────────┐  ┌─────────┐            │
//! │   │   CSV   │  │  Excel  │  │ Parquet │  │  JSON   │  loaders   │
//! │   └────┬────┘  └────┬────┘  └────┬────┘  └────┬────┘            │
//! │        └────────────┴─────┬──────┴────────────┘                  │
//! │                           ▼                                      │
//! │              Table (Arrow schema + batches)                      │
//! │                           │ naming::table_name                   │
//! │                           ▼                                      │
//! │              ┌──────────────────────────┐                        │
//! │              │       TableWriter        │                        │
//! │              │  - one txn per table     │                        │
//! │              │  - DROP + CREATE + INSERT│                        │
//! │              └──────────────────────────┘                        │
//! └─────────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//!                   ┌────────────────────┐
//!                   │     SQLite DB      │
//!                   │ (<root>/db.sqlite) │
//!                   └────────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! let db = tabsweep::consolidate("./exports", Some(r"sales_.*\.csv"))?;
//! if let Some(path) = db {
//!     println!("wrote {}", path.display());
//! }
//! # Ok::<(), tabsweep::SweepError>(())
//! ```

pub mod config;
pub mod consolidate;
pub mod db;
pub mod error;
pub mod formats;
pub mod naming;
pub mod progress;
pub mod table;
pub mod walker;

pub use config::{CliArgs, NameFilter, SweepConfig, DB_FILE_NAME};
pub use consolidate::{consolidate, Consolidator, SweepProgress, SweepReport};
pub use error::{FileOutcome, LoadError, Result, SweepError};
pub use formats::FileKind;
pub use table::Table;
