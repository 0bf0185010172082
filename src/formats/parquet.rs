//! Parquet loader
//!
//! Reads a single Parquet file in full. Partitioned dataset directories are
//! not walked as one table; each `.parquet` file stands on its own.

use crate::error::LoadResult;
use crate::table::Table;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;

/// Load a Parquet file into a table
pub fn load_parquet(path: &Path) -> LoadResult<Table> {
    let file = File::open(path)?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let schema = Arc::clone(builder.schema());

    let reader = builder.build()?;
    let batches = reader.collect::<Result<Vec<_>, _>>()?;

    Ok(Table::new(schema, batches))
}
