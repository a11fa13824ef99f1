// Filter operations for frames
// Author: Gabriel Demetrios Lafis

use std::cmp::Ordering;

use log::trace;

use crate::data::{Frame, RowView, Value};
use crate::utils::FrameResult;
use super::{FrameProcessor, ProcessorType};

impl Frame {
    /// Keep the rows for which `predicate` holds.
    ///
    /// The result has the same header and keeps row order. No rows passing
    /// is not an error: the result is a zero-row frame.
    pub fn filter<F>(&self, predicate: F) -> Frame
    where
        F: Fn(&RowView<'_>) -> bool,
    {
        let indices: Vec<usize> = self
            .rows()
            .filter(|row| predicate(row))
            .map(|row| row.index())
            .collect();

        trace!("filter kept {} of {} rows", indices.len(), self.row_count());
        self.take_rows(&indices)
    }
}

fn compares_as(row: &RowView<'_>, column: &str, value: &Value, expected: Ordering) -> bool {
    match row.get(column) {
        Some(cell) if !cell.is_null() => cell.try_cmp(value).map_or(false, |o| o == expected),
        _ => false,
    }
}

/// Filter rows based on a predicate
pub struct FilterProcessor {
    name: String,
    predicate: Box<dyn Fn(&RowView<'_>) -> bool>,
}

impl FilterProcessor {
    /// Create a new filter processor with a predicate function
    pub fn new<F>(name: &str, predicate: F) -> Self
    where
        F: Fn(&RowView<'_>) -> bool + 'static,
    {
        FilterProcessor {
            name: name.to_string(),
            predicate: Box::new(predicate),
        }
    }

    /// Keep rows where a column equals a value
    pub fn equals(column: &str, value: Value) -> Self {
        let column = column.to_string();
        Self::new(&format!("equals_{}", column), move |row| {
            row.get(&column) == Some(&value)
        })
    }

    /// Keep rows where a column is greater than a value
    pub fn greater_than(column: &str, value: Value) -> Self {
        let column = column.to_string();
        Self::new(&format!("greater_than_{}", column), move |row| {
            compares_as(row, &column, &value, Ordering::Greater)
        })
    }

    /// Keep rows where a column is less than a value
    pub fn less_than(column: &str, value: Value) -> Self {
        let column = column.to_string();
        Self::new(&format!("less_than_{}", column), move |row| {
            compares_as(row, &column, &value, Ordering::Less)
        })
    }

    /// Keep rows where a column is not null
    pub fn not_null(column: &str) -> Self {
        let column = column.to_string();
        Self::new(&format!("not_null_{}", column), move |row| {
            row.get(&column).map_or(false, |v| !v.is_null())
        })
    }

    /// Keep rows where a text column contains a substring
    pub fn contains(column: &str, substring: &str) -> Self {
        let column = column.to_string();
        let substring = substring.to_string();
        Self::new(&format!("contains_{}", column), move |row| {
            row.get(&column)
                .and_then(Value::as_str)
                .map_or(false, |s| s.contains(&substring))
        })
    }
}

impl FrameProcessor for FilterProcessor {
    fn process(&self, input: &Frame) -> FrameResult<Frame> {
        Ok(input.filter(|row| (self.predicate)(row)))
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn processor_type(&self) -> ProcessorType {
        ProcessorType::Filter
    }
}
