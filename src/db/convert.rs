//! Arrow → SQLite value conversion
//!
//! Primitive columns map straight onto SQLite storage classes. Every other
//! Arrow type (dates, timestamps, decimals, nested values, ...) is rendered
//! as text with Arrow's display formatter.

use crate::error::DbResult;
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{
    DataType, Float16Type, Float32Type, Float64Type, Int16Type, Int32Type, Int64Type, Int8Type,
    UInt16Type, UInt32Type, UInt64Type, UInt8Type,
};
use arrow::util::display::{ArrayFormatter, FormatOptions};
use rusqlite::types::Value;

/// Reads SQLite values out of one Arrow column
pub struct ColumnConverter<'a> {
    array: &'a ArrayRef,
    formatter: Option<ArrayFormatter<'a>>,
}

impl<'a> ColumnConverter<'a> {
    pub fn new(array: &'a ArrayRef, options: &'a FormatOptions<'a>) -> DbResult<Self> {
        let formatter = if is_native(array.data_type()) {
            None
        } else {
            Some(ArrayFormatter::try_new(array.as_ref(), options)?)
        };
        Ok(Self { array, formatter })
    }

    /// Value at `row`; nulls stay NULL
    pub fn value(&self, row: usize) -> Value {
        let array = self.array;
        if array.is_null(row) {
            return Value::Null;
        }

        match array.data_type() {
            // A NullArray carries no validity buffer, so `is_null` is false
            DataType::Null => Value::Null,
            DataType::Boolean => Value::Integer(array.as_boolean().value(row) as i64),
            DataType::Int8 => Value::Integer(array.as_primitive::<Int8Type>().value(row) as i64),
            DataType::Int16 => Value::Integer(array.as_primitive::<Int16Type>().value(row) as i64),
            DataType::Int32 => Value::Integer(array.as_primitive::<Int32Type>().value(row) as i64),
            DataType::Int64 => Value::Integer(array.as_primitive::<Int64Type>().value(row)),
            DataType::UInt8 => Value::Integer(array.as_primitive::<UInt8Type>().value(row) as i64),
            DataType::UInt16 => {
                Value::Integer(array.as_primitive::<UInt16Type>().value(row) as i64)
            }
            DataType::UInt32 => {
                Value::Integer(array.as_primitive::<UInt32Type>().value(row) as i64)
            }
            DataType::UInt64 => {
                let v = array.as_primitive::<UInt64Type>().value(row);
                i64::try_from(v)
                    .map(Value::Integer)
                    .unwrap_or(Value::Real(v as f64))
            }
            DataType::Float16 => {
                Value::Real(array.as_primitive::<Float16Type>().value(row).to_f64())
            }
            DataType::Float32 => {
                Value::Real(array.as_primitive::<Float32Type>().value(row) as f64)
            }
            DataType::Float64 => Value::Real(array.as_primitive::<Float64Type>().value(row)),
            DataType::Utf8 => Value::Text(array.as_string::<i32>().value(row).to_string()),
            DataType::LargeUtf8 => Value::Text(array.as_string::<i64>().value(row).to_string()),
            DataType::Binary => Value::Blob(array.as_binary::<i32>().value(row).to_vec()),
            DataType::LargeBinary => Value::Blob(array.as_binary::<i64>().value(row).to_vec()),
            _ => match &self.formatter {
                Some(formatter) => Value::Text(formatter.value(row).to_string()),
                None => Value::Null,
            },
        }
    }
}

fn is_native(data_type: &DataType) -> bool {
    matches!(
        data_type,
        DataType::Null
            | DataType::Boolean
            | DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float16
            | DataType::Float32
            | DataType::Float64
            | DataType::Utf8
            | DataType::LargeUtf8
            | DataType::Binary
            | DataType::LargeBinary
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{
        BooleanArray, Date32Array, Int32Array, NullArray, StringArray, UInt64Array,
    };
    use std::sync::Arc;

    fn values(array: ArrayRef) -> Vec<Value> {
        let options = FormatOptions::default();
        let converter = ColumnConverter::new(&array, &options).unwrap();
        (0..array.len()).map(|i| converter.value(i)).collect()
    }

    #[test]
    fn test_primitives() {
        assert_eq!(
            values(Arc::new(Int32Array::from(vec![Some(4), None]))),
            vec![Value::Integer(4), Value::Null]
        );
        assert_eq!(
            values(Arc::new(BooleanArray::from(vec![true, false]))),
            vec![Value::Integer(1), Value::Integer(0)]
        );
        assert_eq!(
            values(Arc::new(StringArray::from(vec!["x"]))),
            vec![Value::Text("x".into())]
        );
    }

    #[test]
    fn test_null_typed_column() {
        assert_eq!(
            values(Arc::new(NullArray::new(2))),
            vec![Value::Null, Value::Null]
        );
    }

    #[test]
    fn test_large_unsigned_falls_back_to_real() {
        assert_eq!(
            values(Arc::new(UInt64Array::from(vec![u64::MAX]))),
            vec![Value::Real(u64::MAX as f64)]
        );
    }

    #[test]
    fn test_dates_render_as_text() {
        // 19723 days after the epoch
        assert_eq!(
            values(Arc::new(Date32Array::from(vec![19723]))),
            vec![Value::Text("2024-01-01".into())]
        );
    }
}
