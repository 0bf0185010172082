//! CSV loader
//!
//! Header row plus type inference over every record, the same defaults a
//! dataframe reader applies. Short rows are null-filled; rows with more
//! fields than the header are a parse error. Values that look like dates or
//! timestamps stay text, exactly as written in the file.

use crate::error::{LoadError, LoadResult};
use crate::table::Table;
use arrow::csv::reader::Format;
use arrow::csv::ReaderBuilder;
use arrow::datatypes::{DataType, Field, Schema};
use std::fs::File;
use std::io::{Seek, SeekFrom};
use std::path::Path;
use std::sync::Arc;

/// Load a CSV file into a table
pub fn load_csv(path: &Path) -> LoadResult<Table> {
    let mut file = File::open(path)?;

    let (inferred, _records) = Format::default()
        .with_header(true)
        .with_truncated_rows(true)
        .infer_schema(&mut file, None)?;

    if inferred.fields().is_empty() {
        return Err(LoadError::Empty);
    }

    file.seek(SeekFrom::Start(0))?;

    let schema = Arc::new(keep_temporal_as_text(&inferred));
    let reader = ReaderBuilder::new(Arc::clone(&schema))
        .with_header(true)
        .with_truncated_rows(true)
        .build(file)?;

    let batches = reader.collect::<Result<Vec<_>, _>>()?;
    Ok(Table::new(schema, batches))
}

/// Replace inferred date, time and timestamp types with `Utf8`
fn keep_temporal_as_text(schema: &Schema) -> Schema {
    let fields = schema
        .fields()
        .iter()
        .map(|field| match field.data_type() {
            DataType::Date32
            | DataType::Date64
            | DataType::Time32(_)
            | DataType::Time64(_)
            | DataType::Timestamp(_, _) => Field::new(field.name(), DataType::Utf8, true),
            _ => field.as_ref().clone(),
        })
        .collect::<Vec<_>>();
    Schema::new(fields)
}
