// Error handling utilities
// Author: Gabriel Demetrios Lafis

use thiserror::Error;

use crate::data::DataType;

/// Engine error type
///
/// Every fallible frame operation returns one of these variants. Mutating
/// operations that fail leave the frame exactly as it was before the call.
#[derive(Debug, Error)]
pub enum FrameError {
    #[error("column '{0}' not found")]
    ColumnNotFound(String),

    #[error("column '{0}' already exists")]
    DuplicateColumn(String),

    #[error("column '{column}' has {actual} values, expected {expected}")]
    RowCountMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error("schema mismatch: {0}")]
    SchemaMismatch(String),

    #[error("a frame built row by row needs at least one column")]
    EmptySchema,

    #[error("column '{0}' has no values")]
    EmptyColumn(String),

    #[error("column '{column}' needs at least {required} values, found {actual}")]
    InsufficientData {
        column: String,
        required: usize,
        actual: usize,
    },

    #[error("column '{0}' contains non-numeric values")]
    NonNumericColumn(String),

    #[error("cannot convert '{value}' to {kind}")]
    ConversionError { value: String, kind: DataType },

    #[error("frames have no columns in common")]
    NoCommonColumns,

    #[error("column '{column}' holds {kind} values, which this operation does not support")]
    UnsupportedValueKind { column: String, kind: DataType },

    #[error("cannot compare {left} with {right}")]
    IncomparableValues { left: DataType, right: DataType },

    #[error("column '{0}' is constant and cannot be normalized")]
    ConstantColumn(String),

    #[error("column '{0}' holds NaN or infinite values")]
    NonFiniteValue(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<csv::Error> for FrameError {
    fn from(err: csv::Error) -> Self {
        FrameError::Parse(err.to_string())
    }
}

/// Result type alias for FrameError
pub type FrameResult<T> = Result<T, FrameError>;
