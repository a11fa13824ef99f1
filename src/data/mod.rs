// Data module for frame storage, values and flat formats
// Author: Gabriel Demetrios Lafis

mod csv;
mod frame;
mod json;
mod schema;

pub use self::csv::*;
pub use frame::*;
pub use json::*;
pub use schema::*;

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::io::Write;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::utils::{FrameError, FrameResult};

/// Canonical text layout for date/time values
pub const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Represents a source that produces frames
pub trait FrameSource {
    /// Read a frame from the source
    fn read(&self) -> FrameResult<Frame>;

    /// Get the source name
    fn name(&self) -> &str;
}

/// Represents a sink that renders frames to flat text
pub trait FrameSink {
    /// Write the frame to a writer
    fn write(&self, frame: &Frame, writer: &mut dyn Write) -> FrameResult<()>;

    /// Render a frame to a string
    fn render(&self, frame: &Frame) -> FrameResult<String> {
        let mut buffer = Vec::new();
        self.write(frame, &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| FrameError::Parse(e.to_string()))
    }

    /// Get the sink name
    fn name(&self) -> &str;
}

/// Represents the kind of a value or column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    Null,
    Boolean,
    Integer,
    Float,
    String,
    DateTime,
}

impl DataType {
    /// Check if the kind is integer or float
    pub fn is_numeric(&self) -> bool {
        matches!(self, DataType::Integer | DataType::Float)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            DataType::Null => "null",
            DataType::Boolean => "boolean",
            DataType::Integer => "integer",
            DataType::Float => "float",
            DataType::String => "string",
            DataType::DateTime => "datetime",
        };
        f.write_str(name)
    }
}

/// Represents a single cell value
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
    DateTime(NaiveDateTime),
}

impl Value {
    /// Get the kind of this value
    pub fn data_type(&self) -> DataType {
        match self {
            Value::Null => DataType::Null,
            Value::Boolean(_) => DataType::Boolean,
            Value::Integer(_) => DataType::Integer,
            Value::Float(_) => DataType::Float,
            Value::String(_) => DataType::String,
            Value::DateTime(_) => DataType::DateTime,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Integer(_) | Value::Float(_))
    }

    /// Numeric view of integer and float values
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Compare two values.
    ///
    /// Same-kind pairs use their natural order, integers and floats compare
    /// numerically, and null is only comparable with null. Every other pair
    /// is an error rather than a silent coercion.
    pub fn try_cmp(&self, other: &Value) -> FrameResult<Ordering> {
        match (self, other) {
            (Value::Null, Value::Null) => Ok(Ordering::Equal),
            (Value::Boolean(a), Value::Boolean(b)) => Ok(a.cmp(b)),
            (Value::Integer(a), Value::Integer(b)) => Ok(a.cmp(b)),
            (Value::Float(a), Value::Float(b)) => Ok(cmp_f64(*a, *b)),
            (Value::Integer(a), Value::Float(b)) => Ok(cmp_int_f64(*a, *b)),
            (Value::Float(a), Value::Integer(b)) => Ok(cmp_int_f64(*b, *a).reverse()),
            (Value::String(a), Value::String(b)) => Ok(a.cmp(b)),
            (Value::DateTime(a), Value::DateTime(b)) => Ok(a.cmp(b)),
            _ => Err(FrameError::IncomparableValues {
                left: self.data_type(),
                right: other.data_type(),
            }),
        }
    }

    /// Check whether two values may be ordered against each other
    pub fn is_comparable_with(&self, other: &Value) -> bool {
        self.try_cmp(other).is_ok()
    }
}

fn normalized_f64(f: f64) -> f64 {
    // -0.0 and 0.0 are the same value
    if f == 0.0 {
        0.0
    } else {
        f
    }
}

fn cmp_f64(a: f64, b: f64) -> Ordering {
    normalized_f64(a).total_cmp(&normalized_f64(b))
}

/// Exact integer/float order, even past the 2^53 precision limit
fn cmp_int_f64(i: i64, f: f64) -> Ordering {
    match cmp_f64(i as f64, f) {
        // Rounding hid the difference; `f` is integral and in i128 range here
        Ordering::Equal => i128::from(i).cmp(&(f as i128)),
        unequal => unequal,
    }
}

fn float_key(f: f64) -> u64 {
    if f.is_nan() {
        f64::NAN.to_bits()
    } else {
        normalized_f64(f).to_bits()
    }
}

/// Format a float so integral values keep a decimal point
pub(crate) fn format_float(f: f64) -> String {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e16 {
        format!("{:.1}", f)
    } else {
        f.to_string()
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => float_key(*a) == float_key(*b),
            (Value::String(a), Value::String(b)) => a == b,
            (Value::DateTime(a), Value::DateTime(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Null => {}
            Value::Boolean(b) => b.hash(state),
            Value::Integer(i) => i.hash(state),
            Value::Float(f) => float_key(*f).hash(state),
            Value::String(s) => s.hash(state),
            Value::DateTime(dt) => dt.hash(state),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Float(x) => f.write_str(&format_float(*x)),
            Value::String(s) => f.write_str(s),
            Value::DateTime(dt) => write!(f, "{}", dt.format(DATETIME_FORMAT)),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(i64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Boolean(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(v: NaiveDateTime) -> Self {
        Value::DateTime(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

/// Represents an owned row used for row-major construction
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub values: Vec<Value>,
}

impl Row {
    /// Create a new row with the given values
    pub fn new(values: Vec<Value>) -> Self {
        Row { values }
    }

    /// Get a reference to a value by index
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl From<Vec<Value>> for Row {
    fn from(values: Vec<Value>) -> Self {
        Row::new(values)
    }
}
