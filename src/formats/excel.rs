//! Excel (`.xlsx`) loader
//!
//! Only the first worksheet is read and its first row is the header. Cells
//! are normalised before typing:
//! - whole-number floats become integers (xlsx stores every number as a float)
//! - dates become `YYYY-MM-DD HH:MM:SS` text
//! - empty and error cells become nulls

use crate::error::{LoadError, LoadResult};
use crate::formats::cells::{columns_to_table, Cell, ColumnBuilder};
use crate::table::Table;
use calamine::{open_workbook, Data, Reader, Xlsx};
use chrono::NaiveDateTime;
use std::path::Path;

const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Largest magnitude at which every integer is exactly representable as f64
const MAX_EXACT_FLOAT_INT: f64 = 9_007_199_254_740_992.0;

/// Load the first worksheet of a workbook into a table
pub fn load_excel(path: &Path) -> LoadResult<Table> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(LoadError::NoWorksheet)??;

    let mut rows = range.rows();
    let header = rows.next().ok_or(LoadError::Empty)?;

    let mut columns: Vec<ColumnBuilder> = header
        .iter()
        .enumerate()
        .map(|(i, data)| ColumnBuilder::new(header_name(i, data)))
        .collect();

    for row in rows {
        for (i, column) in columns.iter_mut().enumerate() {
            column.push(row.get(i).map_or(Cell::Null, to_cell));
        }
    }

    columns_to_table(columns)
}

fn header_name(index: usize, data: &Data) -> String {
    match to_cell(data) {
        Cell::Null => format!("Unnamed: {}", index),
        cell => cell.to_string(),
    }
}

fn to_cell(data: &Data) -> Cell {
    match data {
        Data::Int(v) => Cell::Int(*v),
        Data::Float(v) => float_cell(*v),
        Data::String(s) if s.is_empty() => Cell::Null,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(value) => Cell::Text(format_datetime(&value)),
            None => float_cell(dt.as_f64()),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Error(_) | Data::Empty => Cell::Null,
    }
}

fn format_datetime(value: &NaiveDateTime) -> String {
    value.format(DATETIME_FORMAT).to_string()
}

fn float_cell(value: f64) -> Cell {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < MAX_EXACT_FLOAT_INT {
        Cell::Int(value as i64)
    } else {
        Cell::Float(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_whole_floats_become_ints() {
        assert_eq!(float_cell(3.0), Cell::Int(3));
        assert_eq!(float_cell(-12.0), Cell::Int(-12));
        assert_eq!(float_cell(2.5), Cell::Float(2.5));
        assert!(matches!(float_cell(f64::NAN), Cell::Float(_)));
    }

    #[test]
    fn test_datetime_text() {
        let value = chrono::NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(14, 5, 0)
            .unwrap();
        assert_eq!(format_datetime(&value), "2024-03-09 14:05:00");
    }

    #[test]
    fn test_header_names() {
        assert_eq!(header_name(0, &Data::String("city".into())), "city");
        assert_eq!(header_name(3, &Data::Empty), "Unnamed: 3");
        assert_eq!(header_name(1, &Data::Float(2020.0)), "2020");
    }

    #[test]
    fn test_cells() {
        assert_eq!(to_cell(&Data::Bool(true)), Cell::Bool(true));
        assert_eq!(to_cell(&Data::String(String::new())), Cell::Null);
        assert_eq!(
            to_cell(&Data::Error(calamine::CellErrorType::Div0)),
            Cell::Null
        );
    }

    #[test]
    fn test_not_a_workbook() {
        let mut file = tempfile::Builder::new().suffix(".xlsx").tempfile().unwrap();
        file.write_all(b"plain text pretending to be a workbook")
            .unwrap();

        let err = load_excel(file.path()).unwrap_err();
        assert!(matches!(err, LoadError::Excel(_)));
    }
}
