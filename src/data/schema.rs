// Schema description, kind inference and conversion
// Author: Gabriel Demetrios Lafis

use chrono::{NaiveDate, NaiveDateTime};

use super::{DataType, Value, DATETIME_FORMAT};
use crate::utils::{FrameError, FrameResult};

/// Order in which inference prefers kinds
const INFERENCE_ORDER: [DataType; 5] = [
    DataType::Integer,
    DataType::Float,
    DataType::Boolean,
    DataType::DateTime,
    DataType::String,
];

/// Represents a read-only description of a frame's columns
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    pub fields: Vec<Field>,
}

impl Schema {
    /// Create a new schema with the given fields
    pub fn new(fields: Vec<Field>) -> Self {
        Schema { fields }
    }

    /// Get a reference to a field by name
    pub fn get_field_by_name(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Get a reference to a field by index
    pub fn get_field(&self, index: usize) -> Option<&Field> {
        self.fields.get(index)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Represents one column in a schema
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub data_type: DataType,
    pub nullable: bool,
}

impl Field {
    /// Create a new field
    pub fn new(name: String, data_type: DataType, nullable: bool) -> Self {
        Field {
            name,
            data_type,
            nullable,
        }
    }
}

/// Parse a date/time in canonical, space-separated or date-only form
pub fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();

    NaiveDateTime::parse_from_str(s, DATETIME_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S"))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

/// Check whether a single non-null value is consistent with a kind
fn is_consistent(value: &Value, kind: DataType) -> bool {
    match (value, kind) {
        (Value::Null, _) => true,
        (_, DataType::String) => true,
        (Value::Integer(_), DataType::Integer | DataType::Float) => true,
        (Value::Float(_), DataType::Float) => true,
        (Value::Boolean(_), DataType::Boolean) => true,
        (Value::DateTime(_), DataType::DateTime) => true,
        (Value::String(s), DataType::Integer) => s.trim().parse::<i64>().is_ok(),
        (Value::String(s), DataType::Float) => s.trim().parse::<f64>().is_ok(),
        (Value::String(s), DataType::Boolean) => parse_bool(s).is_some(),
        (Value::String(s), DataType::DateTime) => parse_datetime(s).is_some(),
        _ => false,
    }
}

/// Infer the most specific kind every non-null value is consistent with.
///
/// Text cells count for every kind they parse as. A single value that fits
/// no preferred kind demotes the whole column to `String`; a column without
/// non-null values is `Null`.
pub fn infer_kind(values: &[Value]) -> DataType {
    if values.iter().all(Value::is_null) {
        return DataType::Null;
    }

    INFERENCE_ORDER
        .iter()
        .copied()
        .find(|kind| values.iter().all(|v| is_consistent(v, *kind)))
        .unwrap_or(DataType::String)
}

/// Kind shared by the stored variants, ignoring nulls.
///
/// Integer mixed with float reports `Float`; any other mix reports `None`.
pub fn storage_kind(values: &[Value]) -> Option<DataType> {
    let mut current = DataType::Null;

    for value in values {
        let kind = value.data_type();
        current = match (current, kind) {
            (_, DataType::Null) => current,
            (DataType::Null, k) => k,
            (a, b) if a == b => a,
            (DataType::Integer, DataType::Float) | (DataType::Float, DataType::Integer) => {
                DataType::Float
            }
            _ => return None,
        };
    }

    Some(current)
}

fn conversion_error(value: &Value, kind: DataType) -> FrameError {
    FrameError::ConversionError {
        value: value.to_string(),
        kind,
    }
}

/// Cast a value to the target kind
pub fn convert_value(value: &Value, target: DataType) -> FrameResult<Value> {
    match (value, target) {
        // Null remains null for any kind
        (Value::Null, _) => Ok(Value::Null),
        (_, DataType::Null) => Err(conversion_error(value, target)),

        // Anything renders to text
        (Value::String(s), DataType::String) => Ok(Value::String(s.clone())),
        (v, DataType::String) => Ok(Value::String(v.to_string())),

        // Boolean casts
        (Value::Boolean(b), DataType::Boolean) => Ok(Value::Boolean(*b)),
        (Value::Boolean(b), DataType::Integer) => Ok(Value::Integer(i64::from(*b))),
        (Value::Boolean(b), DataType::Float) => Ok(Value::Float(if *b { 1.0 } else { 0.0 })),

        // Integer casts
        (Value::Integer(i), DataType::Integer) => Ok(Value::Integer(*i)),
        (Value::Integer(i), DataType::Float) => Ok(Value::Float(*i as f64)),
        (Value::Integer(i), DataType::Boolean) => match i {
            0 => Ok(Value::Boolean(false)),
            1 => Ok(Value::Boolean(true)),
            _ => Err(conversion_error(value, target)),
        },

        // Float casts only when lossless
        (Value::Float(f), DataType::Float) => Ok(Value::Float(*f)),
        (Value::Float(f), DataType::Integer) => {
            if f.is_finite() && f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64 {
                Ok(Value::Integer(*f as i64))
            } else {
                Err(conversion_error(value, target))
            }
        }
        (Value::Float(f), DataType::Boolean) => {
            if *f == 0.0 {
                Ok(Value::Boolean(false))
            } else if *f == 1.0 {
                Ok(Value::Boolean(true))
            } else {
                Err(conversion_error(value, target))
            }
        }

        (Value::DateTime(dt), DataType::DateTime) => Ok(Value::DateTime(*dt)),

        // Text parses
        (Value::String(s), DataType::Integer) => s
            .trim()
            .parse::<i64>()
            .map(Value::Integer)
            .map_err(|_| conversion_error(value, target)),
        (Value::String(s), DataType::Float) => s
            .trim()
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|_| conversion_error(value, target)),
        (Value::String(s), DataType::Boolean) => parse_bool(s)
            .map(Value::Boolean)
            .ok_or_else(|| conversion_error(value, target)),
        (Value::String(s), DataType::DateTime) => parse_datetime(s)
            .map(Value::DateTime)
            .ok_or_else(|| conversion_error(value, target)),

        _ => Err(conversion_error(value, target)),
    }
}

/// Convert a whole column, failing on the first value that does not cast
pub fn convert_values(values: &[Value], target: DataType) -> FrameResult<Vec<Value>> {
    values.iter().map(|v| convert_value(v, target)).collect()
}
