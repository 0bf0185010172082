//! JSON loader
//!
//! Accepted document layouts:
//!
//! ```text
//! [{"a": 1, "b": "x"}, {"a": 2}]        records
//! [[1, "x"], [2, "y"]]                  rows, columns named "0", "1", ...
//! [1, 2, 3]                             single column "0"
//! {"a": {"0": 1, "1": 2}, "b": {...}}   columns keyed by row label
//! {"a": [1, 2], "b": ["x", "y"]}        columns as equal-length arrays
//! ```
//!
//! Cells must be scalars. An object or array inside a cell fails the file
//! with `LoadError::NestedJson` instead of being flattened.

use crate::error::{LoadError, LoadResult};
use crate::formats::cells::{columns_to_table, Cell, ColumnBuilder};
use crate::table::Table;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Load a JSON document into a table
pub fn load_json(path: &Path) -> LoadResult<Table> {
    let file = File::open(path)?;
    let value: Value = serde_json::from_reader(BufReader::new(file))?;
    columns_to_table(value_to_columns(value)?)
}

/// Convert a parsed document into columns
pub fn value_to_columns(value: Value) -> LoadResult<Vec<ColumnBuilder>> {
    match value {
        Value::Array(items) => array_layout(items),
        Value::Object(map) => object_layout(map),
        other => Err(LoadError::UnsupportedLayout(format!(
            "top-level {} is not a table",
            kind_of(&other)
        ))),
    }
}

fn array_layout(items: Vec<Value>) -> LoadResult<Vec<ColumnBuilder>> {
    if items.iter().all(Value::is_object) {
        records(items)
    } else if items.iter().all(Value::is_array) {
        rows(items)
    } else if items.iter().all(is_scalar) {
        let cells = items
            .into_iter()
            .map(|v| scalar_cell("0", v))
            .collect::<LoadResult<Vec<_>>>()?;
        Ok(vec![ColumnBuilder::from_cells("0", cells)])
    } else {
        Err(LoadError::UnsupportedLayout(
            "array mixes objects, arrays and scalars".to_string(),
        ))
    }
}

fn records(items: Vec<Value>) -> LoadResult<Vec<ColumnBuilder>> {
    let total = items.len();
    let mut columns = Columns::default();

    for (row, item) in items.into_iter().enumerate() {
        if let Value::Object(map) = item {
            for (key, value) in map {
                let cell = scalar_cell(&key, value)?;
                columns.get_or_insert(&key).set(row, cell);
            }
        }
    }

    Ok(columns.into_padded(total))
}

fn rows(items: Vec<Value>) -> LoadResult<Vec<ColumnBuilder>> {
    let total = items.len();
    let mut columns = Columns::default();

    for (row, item) in items.into_iter().enumerate() {
        if let Value::Array(values) = item {
            for (position, value) in values.into_iter().enumerate() {
                let key = position.to_string();
                let cell = scalar_cell(&key, value)?;
                columns.get_or_insert(&key).set(row, cell);
            }
        }
    }

    Ok(columns.into_padded(total))
}

fn object_layout(map: Map<String, Value>) -> LoadResult<Vec<ColumnBuilder>> {
    if map.values().all(Value::is_object) {
        labelled_columns(map)
    } else if map.values().all(Value::is_array) {
        array_columns(map)
    } else {
        Err(LoadError::UnsupportedLayout(
            "object values must all be objects or all be arrays".to_string(),
        ))
    }
}

/// `{column: {row_label: value}}`; rows ordered by first appearance of the label
fn labelled_columns(map: Map<String, Value>) -> LoadResult<Vec<ColumnBuilder>> {
    let mut labels: HashMap<String, usize> = HashMap::new();
    let mut columns = Vec::with_capacity(map.len());

    for (name, column) in map {
        let mut cells: Vec<Cell> = Vec::new();
        if let Value::Object(values) = column {
            for (label, value) in values {
                let next = labels.len();
                let row = *labels.entry(label).or_insert(next);
                if row >= cells.len() {
                    cells.resize(row + 1, Cell::Null);
                }
                cells[row] = scalar_cell(&name, value)?;
            }
        }
        columns.push(ColumnBuilder::from_cells(name, cells));
    }

    let total = labels.len();
    for column in &mut columns {
        column.pad_to(total);
    }
    Ok(columns)
}

/// `{column: [values]}`; all arrays must have the same length
fn array_columns(map: Map<String, Value>) -> LoadResult<Vec<ColumnBuilder>> {
    let mut expected: Option<usize> = None;
    let mut columns = Vec::with_capacity(map.len());

    for (name, column) in map {
        if let Value::Array(values) = column {
            match expected {
                Some(len) if len != values.len() => {
                    return Err(LoadError::UnsupportedLayout(
                        "column arrays have different lengths".to_string(),
                    ));
                }
                _ => expected = Some(values.len()),
            }

            let cells = values
                .into_iter()
                .map(|v| scalar_cell(&name, v))
                .collect::<LoadResult<Vec<_>>>()?;
            columns.push(ColumnBuilder::from_cells(name, cells));
        }
    }

    Ok(columns)
}

fn scalar_cell(column: &str, value: Value) -> LoadResult<Cell> {
    match value {
        Value::Null => Ok(Cell::Null),
        Value::Bool(b) => Ok(Cell::Bool(b)),
        Value::Number(n) => Ok(match n.as_i64() {
            Some(i) => Cell::Int(i),
            None => Cell::Float(n.as_f64().unwrap_or(f64::NAN)),
        }),
        Value::String(s) => Ok(Cell::Text(s)),
        Value::Array(_) | Value::Object(_) => Err(LoadError::NestedJson {
            column: column.to_string(),
        }),
    }
}

fn is_scalar(value: &Value) -> bool {
    !(value.is_array() || value.is_object())
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Columns in first-seen order with name lookup
#[derive(Default)]
struct Columns {
    index: HashMap<String, usize>,
    columns: Vec<ColumnBuilder>,
}

impl Columns {
    fn get_or_insert(&mut self, name: &str) -> &mut ColumnBuilder {
        let position = match self.index.get(name) {
            Some(&position) => position,
            None => {
                self.columns.push(ColumnBuilder::new(name));
                self.index.insert(name.to_string(), self.columns.len() - 1);
                self.columns.len() - 1
            }
        };
        &mut self.columns[position]
    }

    /// Null-fill every column to `rows`, so empty records still count
    fn into_padded(mut self, rows: usize) -> Vec<ColumnBuilder> {
        for column in &mut self.columns {
            column.pad_to(rows);
        }
        self.columns
    }
}
