//! SQLite table writer
//!
//! One connection per run. Each table is written inside its own
//! transaction: drop, create, then a prepared insert per row. A failure in
//! the middle of a table rolls that table back and leaves the tables already
//! committed in place.

use crate::db::convert::ColumnConverter;
use crate::db::schema::{self, TableLayout};
use crate::error::{DbError, DbResult};
use crate::table::Table;
use arrow::util::display::FormatOptions;
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Statistics about write operations
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriterStats {
    /// Tables created
    pub tables_written: u64,

    /// Rows inserted across all tables
    pub rows_written: u64,
}

/// Writes tables into a single SQLite database file
///
/// Dropping the writer closes the connection; [`TableWriter::close`] does the
/// same but reports close errors.
pub struct TableWriter {
    conn: Connection,
    db_path: PathBuf,
    stats: WriterStats,
}

impl TableWriter {
    /// Open (creating if absent) the database at `db_path`
    pub fn open(db_path: &Path) -> DbResult<Self> {
        let conn = Connection::open(db_path).map_err(|e| DbError::CreateFailed {
            path: db_path.to_path_buf(),
            reason: e.to_string(),
        })?;
        schema::prepare_connection(&conn)?;

        info!("Opened database: {}", db_path.display());

        Ok(Self {
            conn,
            db_path: db_path.to_path_buf(),
            stats: WriterStats::default(),
        })
    }

    /// Write `table` under `name`, replacing any table of that name
    ///
    /// Returns the number of rows inserted.
    pub fn write_table(&mut self, name: &str, table: &Table, write_index: bool) -> DbResult<usize> {
        let layout = TableLayout::from_schema(table.schema(), write_index);
        let options = FormatOptions::default();

        let tx = self.conn.transaction()?;
        tx.execute(&schema::drop_sql(name), [])?;
        tx.execute(&layout.create_sql(name), [])?;

        let mut rows: usize = 0;
        {
            let mut stmt = tx.prepare(&layout.insert_sql(name))?;
            let mut values: Vec<Value> = Vec::with_capacity(layout.columns.len());

            for batch in table.batches() {
                let converters = batch
                    .columns()
                    .iter()
                    .map(|array| ColumnConverter::new(array, &options))
                    .collect::<DbResult<Vec<_>>>()?;

                for row in 0..batch.num_rows() {
                    values.clear();
                    if layout.has_index {
                        values.push(Value::Integer(rows as i64));
                    }
                    values.extend(converters.iter().map(|c| c.value(row)));

                    stmt.execute(params_from_iter(values.iter()))?;
                    rows += 1;
                }
            }
        }

        tx.commit()?;

        self.stats.tables_written += 1;
        self.stats.rows_written += rows as u64;
        debug!(table = name, rows, columns = layout.columns.len(), "Table written");

        Ok(rows)
    }

    /// Restore durable settings and close the connection
    pub fn close(self) -> DbResult<WriterStats> {
        schema::finish_connection(&self.conn)?;
        self.conn.close().map_err(|(_, e)| DbError::Sqlite(e))?;

        info!(
            tables = self.stats.tables_written,
            rows = self.stats.rows_written,
            "Closed database: {}",
            self.db_path.display()
        );

        Ok(self.stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::cells::{columns_to_table, Cell, ColumnBuilder};

    fn sample_table(rows: i64) -> Table {
        let ids = ColumnBuilder::from_cells("id", (0..rows).map(Cell::Int).collect());
        let labels = ColumnBuilder::from_cells(
            "label",
            (0..rows).map(|i| Cell::Text(format!("row {}", i))).collect(),
        );
        columns_to_table(vec![ids, labels]).unwrap()
    }

    #[test]
    fn test_write_and_replace() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("db.sqlite");

        let mut writer = TableWriter::open(&db_path).unwrap();
        assert_eq!(writer.write_table("t.csv", &sample_table(5), true).unwrap(), 5);
        assert_eq!(writer.write_table("t.csv", &sample_table(2), true).unwrap(), 2);
        let stats = writer.close().unwrap();
        assert_eq!(stats.tables_written, 2);
        assert_eq!(stats.rows_written, 7);

        let conn = Connection::open(&db_path).unwrap();
        assert_eq!(schema::list_tables(&conn).unwrap(), vec!["t.csv"]);
        assert_eq!(schema::count_rows(&conn, "t.csv").unwrap(), 2);

        let (index, label): (i64, String) = conn
            .query_row(
                "SELECT \"index\", label FROM \"t.csv\" ORDER BY \"index\" DESC LIMIT 1",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .unwrap();
        assert_eq!(index, 1);
        assert_eq!(label, "row 1");
    }

    #[test]
    fn test_write_without_index() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("db.sqlite");

        let mut writer = TableWriter::open(&db_path).unwrap();
        writer.write_table("plain", &sample_table(3), false).unwrap();
        writer.close().unwrap();

        let conn = Connection::open(&db_path).unwrap();
        let columns: Vec<String> = conn
            .prepare("SELECT name FROM pragma_table_info('plain')")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(columns, vec!["id", "label"]);
    }

    #[test]
    fn test_open_in_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = TableWriter::open(&dir.path().join("nope").join("db.sqlite"));
        assert!(matches!(result, Err(DbError::CreateFailed { .. })));
    }
}
