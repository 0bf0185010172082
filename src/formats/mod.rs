//! Tabular file formats and their loaders
//!
//! Every supported format maps to exactly one loader through [`FileKind`].
//! Dispatch is a plain `match`, so adding a format means adding a variant,
//! an [`EXTENSIONS`] entry and a loader function.
//!
//! | Extension  | Kind      | Loader                                  |
//! |------------|-----------|-----------------------------------------|
//! | `.csv`     | `Csv`     | Arrow CSV reader, header row, inference |
//! | `.xlsx`    | `Excel`   | calamine, first worksheet               |
//! | `.parquet` | `Parquet` | Arrow Parquet reader, whole file        |
//! | `.json`    | `Json`    | serde_json, records or columns layout   |

pub mod cells;
pub mod csv;
pub mod excel;
pub mod json;
pub mod parquet;

use crate::error::LoadResult;
use crate::table::Table;
use std::path::Path;

/// Kind of tabular file, derived from its extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
    /// Comma separated values
    Csv,
    /// Office Open XML workbook
    Excel,
    /// Apache Parquet file
    Parquet,
    /// JSON document
    Json,
}

/// Recognised extensions, checked in order; the first suffix match wins
pub const EXTENSIONS: [(&str, FileKind); 4] = [
    (".csv", FileKind::Csv),
    (".xlsx", FileKind::Excel),
    (".parquet", FileKind::Parquet),
    (".json", FileKind::Json),
];

/// Signature shared by all loaders
pub type Loader = fn(&Path) -> LoadResult<Table>;

impl FileKind {
    /// Resolve the kind of a file from its name (case-sensitive suffix match)
    pub fn from_file_name(name: &str) -> Option<Self> {
        EXTENSIONS
            .iter()
            .find(|(ext, _)| name.ends_with(ext))
            .map(|(_, kind)| *kind)
    }

    /// Human-readable format name
    pub fn name(&self) -> &'static str {
        match self {
            FileKind::Csv => "CSV",
            FileKind::Excel => "Excel",
            FileKind::Parquet => "Parquet",
            FileKind::Json => "JSON",
        }
    }

    /// Loader bound to this kind
    pub fn loader(&self) -> Loader {
        match self {
            FileKind::Csv => csv::load_csv,
            FileKind::Excel => excel::load_excel,
            FileKind::Parquet => parquet::load_parquet,
            FileKind::Json => json::load_json,
        }
    }

    /// Load a file with default options, rejecting tables without rows
    pub fn load(&self, path: &Path) -> LoadResult<Table> {
        (self.loader())(path)?.non_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_file_name() {
        assert_eq!(FileKind::from_file_name("sales.csv"), Some(FileKind::Csv));
        assert_eq!(FileKind::from_file_name("book.xlsx"), Some(FileKind::Excel));
        assert_eq!(
            FileKind::from_file_name("part-0.parquet"),
            Some(FileKind::Parquet)
        );
        assert_eq!(FileKind::from_file_name("dump.json"), Some(FileKind::Json));
    }

    #[test]
    fn test_unsupported_names() {
        assert_eq!(FileKind::from_file_name("notes.txt"), None);
        assert_eq!(FileKind::from_file_name("legacy.xls"), None);
        assert_eq!(FileKind::from_file_name("db.sqlite"), None);
        assert_eq!(FileKind::from_file_name("csv"), None);
        // Suffix match is case-sensitive
        assert_eq!(FileKind::from_file_name("UPPER.CSV"), None);
    }

    #[test]
    fn test_only_final_suffix_counts() {
        assert_eq!(FileKind::from_file_name("a.csv.json"), Some(FileKind::Json));
        assert_eq!(FileKind::from_file_name("a.json.bak"), None);
    }
}
