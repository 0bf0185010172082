//! Table layout and SQL generation
//!
//! This module maps an Arrow schema onto an SQLite table definition and
//! provides the connection pragmas used while writing.

use crate::db::INDEX_COLUMN;
use crate::error::DbResult;
use crate::naming::quote_identifier;
use arrow::datatypes::{DataType, Schema};
use rusqlite::Connection;
use std::collections::HashSet;

/// SQLite pragmas for bulk loading
///
/// The journal stays in rollback mode so the output is a single file.
const WRITE_PRAGMAS: &str = r#"
PRAGMA synchronous = OFF;
PRAGMA temp_store = MEMORY;
PRAGMA cache_size = -65536;      -- 64MB cache
"#;

/// Restored before the connection is closed
const FINISH_PRAGMAS: &str = r#"
PRAGMA synchronous = NORMAL;
"#;

/// One column of the output table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
    pub name: String,
    pub sql_type: &'static str,
}

/// Column layout of an output table
#[derive(Debug, Clone)]
pub struct TableLayout {
    /// Whether a leading row-index column is written
    pub has_index: bool,

    /// All columns in insert order, index first when present
    pub columns: Vec<ColumnDef>,
}

impl TableLayout {
    /// Derive the layout for a schema
    ///
    /// Blank names become `Unnamed: <i>` and repeated names (compared
    /// case-insensitively) get `.1`, `.2` suffixes. The index column is
    /// dropped when the data already carries a column called `index`.
    pub fn from_schema(schema: &Schema, write_index: bool) -> Self {
        let has_index = write_index
            && !schema
                .fields()
                .iter()
                .any(|f| f.name().eq_ignore_ascii_case(INDEX_COLUMN));

        let mut seen: HashSet<String> = HashSet::new();
        let mut columns = Vec::with_capacity(schema.fields().len() + 1);

        if has_index {
            seen.insert(INDEX_COLUMN.to_string());
            columns.push(ColumnDef {
                name: INDEX_COLUMN.to_string(),
                sql_type: "INTEGER",
            });
        }

        for (i, field) in schema.fields().iter().enumerate() {
            let base = if field.name().trim().is_empty() {
                format!("Unnamed: {}", i)
            } else {
                field.name().clone()
            };

            let mut name = base.clone();
            let mut suffix = 1;
            while !seen.insert(name.to_lowercase()) {
                name = format!("{}.{}", base, suffix);
                suffix += 1;
            }

            columns.push(ColumnDef {
                name,
                sql_type: sql_type(field.data_type()),
            });
        }

        Self { has_index, columns }
    }

    pub fn create_sql(&self, table: &str) -> String {
        let columns = self
            .columns
            .iter()
            .map(|c| format!("{} {}", quote_identifier(&c.name), c.sql_type))
            .collect::<Vec<_>>()
            .join(", ");
        format!("CREATE TABLE {} ({})", quote_identifier(table), columns)
    }

    pub fn insert_sql(&self, table: &str) -> String {
        let placeholders = (1..=self.columns.len())
            .map(|i| format!("?{}", i))
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "INSERT INTO {} VALUES ({})",
            quote_identifier(table),
            placeholders
        )
    }
}

/// Declared SQLite type for an Arrow type
pub fn sql_type(data_type: &DataType) -> &'static str {
    match data_type {
        DataType::Boolean
        | DataType::Int8
        | DataType::Int16
        | DataType::Int32
        | DataType::Int64
        | DataType::UInt8
        | DataType::UInt16
        | DataType::UInt32
        | DataType::UInt64 => "INTEGER",
        DataType::Float16 | DataType::Float32 | DataType::Float64 => "REAL",
        DataType::Binary | DataType::LargeBinary => "BLOB",
        DataType::Date32 | DataType::Date64 | DataType::Timestamp(_, _) => "TIMESTAMP",
        _ => "TEXT",
    }
}

pub fn drop_sql(table: &str) -> String {
    format!("DROP TABLE IF EXISTS {}", quote_identifier(table))
}

/// Configure a fresh connection for bulk loading
pub fn prepare_connection(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(WRITE_PRAGMAS)?;
    Ok(())
}

/// Restore durable settings before closing
pub fn finish_connection(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(FINISH_PRAGMAS)?;
    Ok(())
}

/// Names of all user tables, sorted
pub fn list_tables(conn: &Connection) -> DbResult<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
    )?;
    let names = stmt
        .query_map([], |row| row.get(0))?
        .collect::<Result<Vec<String>, _>>()?;
    Ok(names)
}

/// Row count of a table
pub fn count_rows(conn: &Connection, table: &str) -> DbResult<i64> {
    let count = conn.query_row(
        &format!("SELECT COUNT(*) FROM {}", quote_identifier(table)),
        [],
        |row| row.get(0),
    )?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::datatypes::{Field, TimeUnit};

    fn schema(fields: &[(&str, DataType)]) -> Schema {
        Schema::new(
            fields
                .iter()
                .map(|(name, dt)| Field::new(*name, dt.clone(), true))
                .collect::<Vec<_>>(),
        )
    }

    fn names(layout: &TableLayout) -> Vec<&str> {
        layout.columns.iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn test_sql_types() {
        assert_eq!(sql_type(&DataType::Int32), "INTEGER");
        assert_eq!(sql_type(&DataType::Boolean), "INTEGER");
        assert_eq!(sql_type(&DataType::Float64), "REAL");
        assert_eq!(sql_type(&DataType::Utf8), "TEXT");
        assert_eq!(sql_type(&DataType::Binary), "BLOB");
        assert_eq!(
            sql_type(&DataType::Timestamp(TimeUnit::Millisecond, None)),
            "TIMESTAMP"
        );
        assert_eq!(sql_type(&DataType::Decimal128(10, 2)), "TEXT");
    }

    #[test]
    fn test_layout_with_index() {
        let layout = TableLayout::from_schema(
            &schema(&[("a", DataType::Int64), ("b", DataType::Utf8)]),
            true,
        );
        assert!(layout.has_index);
        assert_eq!(names(&layout), vec!["index", "a", "b"]);
        assert_eq!(layout.columns[0].sql_type, "INTEGER");
    }

    #[test]
    fn test_existing_index_column_wins() {
        let layout = TableLayout::from_schema(
            &schema(&[("Index", DataType::Int64), ("b", DataType::Utf8)]),
            true,
        );
        assert!(!layout.has_index);
        assert_eq!(names(&layout), vec!["Index", "b"]);
    }

    #[test]
    fn test_duplicate_and_blank_names() {
        let layout = TableLayout::from_schema(
            &schema(&[
                ("a", DataType::Int64),
                ("A", DataType::Int64),
                ("", DataType::Utf8),
                ("a", DataType::Utf8),
            ]),
            false,
        );
        assert_eq!(names(&layout), vec!["a", "A.1", "Unnamed: 2", "a.2"]);
    }

    #[test]
    fn test_generated_sql() {
        let layout = TableLayout::from_schema(&schema(&[("x y", DataType::Float64)]), true);
        assert_eq!(
            layout.create_sql("data.csv/sub"),
            "CREATE TABLE \"data.csv/sub\" (\"index\" INTEGER, \"x y\" REAL)"
        );
        assert_eq!(
            layout.insert_sql("data.csv/sub"),
            "INSERT INTO \"data.csv/sub\" VALUES (?1, ?2)"
        );
        assert_eq!(drop_sql("t"), "DROP TABLE IF EXISTS \"t\"");
    }

    #[test]
    fn test_list_tables() {
        let conn = Connection::open_in_memory().unwrap();
        prepare_connection(&conn).unwrap();
        conn.execute_batch("CREATE TABLE \"b.csv\" (x); CREATE TABLE \"a.json\" (y);")
            .unwrap();

        assert_eq!(list_tables(&conn).unwrap(), vec!["a.json", "b.csv"]);
        assert_eq!(count_rows(&conn, "a.json").unwrap(), 0);
    }
}
