//! In-memory table produced by the format loaders
//!
//! A thin wrapper around an Arrow schema and its record batches. Loaders
//! stream batches in, the SQLite writer streams them back out.

use crate::error::{LoadError, LoadResult};
use arrow::datatypes::SchemaRef;
use arrow::record_batch::RecordBatch;

/// Parsed tabular data for one source file
#[derive(Debug, Clone)]
pub struct Table {
    schema: SchemaRef,
    batches: Vec<RecordBatch>,
    num_rows: usize,
}

impl Table {
    /// Create a table from a schema and the batches decoded against it
    pub fn new(schema: SchemaRef, batches: Vec<RecordBatch>) -> Self {
        let num_rows = batches.iter().map(|b| b.num_rows()).sum();
        Self {
            schema,
            batches,
            num_rows,
        }
    }

    pub fn schema(&self) -> &SchemaRef {
        &self.schema
    }

    pub fn batches(&self) -> &[RecordBatch] {
        &self.batches
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    pub fn num_columns(&self) -> usize {
        self.schema.fields().len()
    }

    /// A table without rows or without columns has nothing to store
    pub fn is_empty(&self) -> bool {
        self.num_rows == 0 || self.num_columns() == 0
    }

    /// Pass the table through, or fail with `LoadError::Empty`
    pub fn non_empty(self) -> LoadResult<Self> {
        if self.is_empty() {
            Err(LoadError::Empty)
        } else {
            Ok(self)
        }
    }
}
