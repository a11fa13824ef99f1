// Rust Frame Engine
// Author: Gabriel Demetrios Lafis

//! # Rust Frame Engine
//!
//! An embeddable in-memory engine for column-oriented tabular data.
//!
//! ## Features
//!
//! - Frames built column by column or row by row, with strict length checks
//! - Type inference and all-or-nothing column conversion
//! - Filtering, stable multi-key sorting, grouping and aggregation
//! - Natural and N-way inner joins, first-match pivots
//! - Column statistics and min-max normalization, one-hot encoding
//! - Delimited and record-oriented text export, CSV import
//!
//! ## Example
//!
//! ```rust
//! use rust_frame_engine::{
//!     processing::{FilterProcessor, Pipeline, SortProcessor},
//!     Frame, Value,
//! };
//!
//! let mut frame = Frame::with_header(&["Name", "Age", "City"]).unwrap();
//! frame.push_row(vec![Value::from("Alice"), Value::from(25), Value::from("NYC")]).unwrap();
//! frame.push_row(vec![Value::from("Bob"), Value::from(35), Value::from("LA")]).unwrap();
//! frame.push_row(vec![Value::from("Carol"), Value::from(30), Value::from("NYC")]).unwrap();
//!
//! assert_eq!(frame.mean("Age").unwrap(), 30.0);
//!
//! let pipeline = Pipeline::new("adults")
//!     .add(FilterProcessor::greater_than("Age", Value::Integer(26)))
//!     .add(SortProcessor::ascending(&["Age"]));
//!
//! let result = pipeline.execute(&frame).unwrap();
//! assert_eq!(result.row_count(), 2);
//! assert_eq!(result.value(0, "Name"), Some(&Value::from("Carol")));
//!
//! let counts = frame.group_by(&["City"]).unwrap();
//! assert_eq!(counts.column("Count").unwrap(), &[Value::Integer(2), Value::Integer(1)]);
//! ```

pub mod data;
pub mod processing;
pub mod utils;

// Re-export main types
pub use data::{DataType, Field, Frame, Row, RowView, Schema, Value};
pub use processing::{FrameProcessor, Pipeline};
pub use utils::{Config, FrameError, FrameResult};
