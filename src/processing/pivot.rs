// Pivot operations for frames
// Author: Gabriel Demetrios Lafis

use std::collections::{HashMap, HashSet};

use log::debug;

use crate::data::{Frame, Value};
use crate::utils::{FrameError, FrameResult};
use super::{FrameProcessor, ProcessorType};

/// Distinct values in first-seen order
fn distinct_in_order(values: &[Value]) -> Vec<&Value> {
    let mut seen = HashSet::new();
    values.iter().filter(|v| seen.insert(*v)).collect()
}

impl Frame {
    /// Reshape the frame around two key columns.
    ///
    /// The output has one row per distinct `row_key` value and one column per
    /// distinct `col_key` value (named by its text form), both in first-seen
    /// order. A cell holds `value_col` from the first input row matching both
    /// keys; later matches are ignored, and cells with no match are null.
    pub fn pivot(&self, row_key: &str, col_key: &str, value_col: &str) -> FrameResult<Frame> {
        let row_values = self.column(row_key)?;
        let col_values = self.column(col_key)?;
        let cell_values = self.column(value_col)?;

        let row_axis = distinct_in_order(row_values);
        let col_axis = distinct_in_order(col_values);

        let mut header = vec![row_key.to_string()];
        for value in &col_axis {
            let name = value.to_string();
            if header.contains(&name) {
                return Err(FrameError::DuplicateColumn(name));
            }
            header.push(name);
        }

        // First matching row for each (row, column) pair
        let mut first_match: HashMap<(&Value, &Value), usize> = HashMap::new();
        for (i, (r, c)) in row_values.iter().zip(col_values).enumerate() {
            first_match.entry((r, c)).or_insert(i);
        }

        let mut columns: HashMap<String, Vec<Value>> = HashMap::new();
        columns.insert(
            row_key.to_string(),
            row_axis.iter().map(|v| (*v).clone()).collect(),
        );

        for (name, col) in header.iter().skip(1).zip(&col_axis) {
            let cells = row_axis
                .iter()
                .map(|r| {
                    first_match
                        .get(&(*r, *col))
                        .map_or(Value::Null, |&i| cell_values[i].clone())
                })
                .collect();
            columns.insert(name.clone(), cells);
        }

        debug!(
            "pivoted {} rows into {} x {}",
            self.row_count(),
            row_axis.len(),
            col_axis.len()
        );
        Ok(Frame::from_parts(header, columns))
    }
}

/// Pivot processor
pub struct PivotProcessor {
    row_key: String,
    col_key: String,
    value_col: String,
}

impl PivotProcessor {
    /// Create a new pivot processor
    pub fn new(row_key: &str, col_key: &str, value_col: &str) -> Self {
        PivotProcessor {
            row_key: row_key.to_string(),
            col_key: col_key.to_string(),
            value_col: value_col.to_string(),
        }
    }
}

impl FrameProcessor for PivotProcessor {
    fn process(&self, input: &Frame) -> FrameResult<Frame> {
        input.pivot(&self.row_key, &self.col_key, &self.value_col)
    }

    fn name(&self) -> &str {
        "pivot"
    }

    fn processor_type(&self) -> ProcessorType {
        ProcessorType::Pivot
    }
}
