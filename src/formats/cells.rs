//! Cell-level values for formats without a typed schema
//!
//! Excel and JSON hand us loosely typed cells. Each column is buffered as
//! [`Cell`]s and its Arrow type is decided once the whole column is known:
//! integers only → Int64, integers and floats → Float64, booleans only →
//! Boolean, anything else → Utf8.

use crate::error::{LoadError, LoadResult};
use crate::table::Table;
use arrow::array::{ArrayRef, BooleanArray, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use std::fmt;
use std::sync::Arc;

/// A single loosely typed value
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Null,
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Null => Ok(()),
            Cell::Int(v) => write!(f, "{}", v),
            Cell::Float(v) => write!(f, "{}", v),
            Cell::Bool(v) => write!(f, "{}", v),
            Cell::Text(v) => f.write_str(v),
        }
    }
}

/// Buffered column awaiting type resolution
#[derive(Debug, Clone)]
pub struct ColumnBuilder {
    name: String,
    cells: Vec<Cell>,
}

impl ColumnBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cells: Vec::new(),
        }
    }

    pub fn from_cells(name: impl Into<String>, cells: Vec<Cell>) -> Self {
        Self {
            name: name.into(),
            cells,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn push(&mut self, cell: Cell) {
        self.cells.push(cell);
    }

    /// Write `cell` at `row`, null-filling any gap left by earlier rows
    pub fn set(&mut self, row: usize, cell: Cell) {
        self.pad_to(row);
        self.push(cell);
    }

    /// Fill with nulls up to `len` rows
    pub fn pad_to(&mut self, len: usize) {
        if self.cells.len() < len {
            self.cells.resize(len, Cell::Null);
        }
    }

    /// Arrow type able to hold every cell of the column
    pub fn data_type(&self) -> DataType {
        let (mut ints, mut floats, mut bools, mut texts) = (false, false, false, false);
        for cell in &self.cells {
            match cell {
                Cell::Null => {}
                Cell::Int(_) => ints = true,
                Cell::Float(_) => floats = true,
                Cell::Bool(_) => bools = true,
                Cell::Text(_) => texts = true,
            }
        }

        if texts || (bools && (ints || floats)) {
            DataType::Utf8
        } else if bools {
            DataType::Boolean
        } else if floats {
            DataType::Float64
        } else if ints {
            DataType::Int64
        } else {
            DataType::Utf8
        }
    }

    fn finish(self) -> (Field, ArrayRef) {
        let data_type = self.data_type();
        let array: ArrayRef = match data_type {
            DataType::Int64 => Arc::new(Int64Array::from(
                self.cells
                    .iter()
                    .map(|c| match c {
                        Cell::Int(v) => Some(*v),
                        _ => None,
                    })
                    .collect::<Vec<_>>(),
            )),
            DataType::Float64 => Arc::new(Float64Array::from(
                self.cells
                    .iter()
                    .map(|c| match c {
                        Cell::Int(v) => Some(*v as f64),
                        Cell::Float(v) => Some(*v),
                        _ => None,
                    })
                    .collect::<Vec<_>>(),
            )),
            DataType::Boolean => Arc::new(BooleanArray::from(
                self.cells
                    .iter()
                    .map(|c| match c {
                        Cell::Bool(v) => Some(*v),
                        _ => None,
                    })
                    .collect::<Vec<_>>(),
            )),
            _ => Arc::new(StringArray::from(
                self.cells
                    .iter()
                    .map(|c| match c {
                        Cell::Null => None,
                        other => Some(other.to_string()),
                    })
                    .collect::<Vec<_>>(),
            )),
        };

        (Field::new(self.name, data_type, true), array)
    }
}

/// Assemble buffered columns into a single-batch table
///
/// Short columns are padded with nulls to the longest one.
pub fn columns_to_table(mut columns: Vec<ColumnBuilder>) -> LoadResult<Table> {
    if columns.is_empty() {
        return Err(LoadError::Empty);
    }

    let rows = columns.iter().map(ColumnBuilder::len).max().unwrap_or(0);
    let mut fields = Vec::with_capacity(columns.len());
    let mut arrays = Vec::with_capacity(columns.len());

    for mut column in columns.drain(..) {
        column.pad_to(rows);
        let (field, array) = column.finish();
        fields.push(field);
        arrays.push(array);
    }

    let schema = Arc::new(Schema::new(fields));
    let batch = RecordBatch::try_new(Arc::clone(&schema), arrays)?;
    Ok(Table::new(schema, vec![batch]))
}
