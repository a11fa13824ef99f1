// Validation utilities
// Author: Gabriel Demetrios Lafis

use std::collections::HashSet;

use super::{FrameError, FrameResult};

/// Validate that a list of column names has no repeats
pub fn validate_unique_names<S: AsRef<str>>(names: &[S]) -> FrameResult<()> {
    let mut seen = HashSet::new();

    for name in names {
        if !seen.insert(name.as_ref()) {
            return Err(FrameError::DuplicateColumn(name.as_ref().to_string()));
        }
    }

    Ok(())
}

/// Validate that `order` is a permutation of `header`
pub fn validate_permutation<S: AsRef<str>>(header: &[String], order: &[S]) -> FrameResult<()> {
    if order.len() != header.len() {
        return Err(FrameError::SchemaMismatch(format!(
            "column order lists {} names, frame has {} columns",
            order.len(),
            header.len()
        )));
    }

    let mut seen = HashSet::new();
    for name in order {
        let name = name.as_ref();
        if !header.iter().any(|h| h == name) {
            return Err(FrameError::SchemaMismatch(format!(
                "column '{}' in order list is not in the frame",
                name
            )));
        }
        if !seen.insert(name) {
            return Err(FrameError::SchemaMismatch(format!(
                "column '{}' appears twice in order list",
                name
            )));
        }
    }

    Ok(())
}

/// Find the position of a column in a header
pub fn column_index(header: &[String], name: &str) -> FrameResult<usize> {
    header
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| FrameError::ColumnNotFound(name.to_string()))
}

/// Validate that a probability-like argument lies in [0, 1]
pub fn validate_unit_interval(value: f64, name: &str) -> FrameResult<()> {
    if !(0.0..=1.0).contains(&value) {
        Err(FrameError::SchemaMismatch(format!(
            "'{}' must be between 0 and 1, got {}",
            name, value
        )))
    } else {
        Ok(())
    }
}
