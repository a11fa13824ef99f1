// Sort operations for frames
// Author: Gabriel Demetrios Lafis

use std::cmp::Ordering;

use log::trace;

use crate::data::{Frame, Value};
use crate::utils::FrameResult;
use super::{FrameProcessor, ProcessorType};

/// Fail unless every non-null value can be ordered against every other
fn check_comparable(values: &[Value]) -> FrameResult<()> {
    let mut first: Option<&Value> = None;

    for value in values.iter().filter(|v| !v.is_null()) {
        match first {
            None => first = Some(value),
            Some(f) => {
                f.try_cmp(value)?;
            }
        }
    }

    Ok(())
}

/// Nulls go last in either direction
fn compare_values(a: &Value, b: &Value, ascending: bool) -> Ordering {
    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Greater,
        (_, Value::Null) => Ordering::Less,
        _ => {
            let cmp = a.try_cmp(b).unwrap_or(Ordering::Equal);
            if ascending {
                cmp
            } else {
                cmp.reverse()
            }
        }
    }
}

impl Frame {
    /// Stable row order for the given sort keys
    fn sort_order<S: AsRef<str>>(&self, columns: &[S], ascending: bool) -> FrameResult<Vec<usize>> {
        let keys = columns
            .iter()
            .map(|c| self.column(c.as_ref()))
            .collect::<FrameResult<Vec<_>>>()?;

        for key in &keys {
            check_comparable(key)?;
        }

        let mut order: Vec<usize> = (0..self.row_count()).collect();
        order.sort_by(|&a, &b| {
            for key in &keys {
                let cmp = compare_values(&key[a], &key[b], ascending);
                if cmp != Ordering::Equal {
                    return cmp;
                }
            }
            Ordering::Equal
        });

        Ok(order)
    }

    /// Sort rows in place by the listed columns.
    ///
    /// The first key that differs decides; ties keep their original relative
    /// order. Nulls sort after every non-null value. Fails before moving any
    /// row if a key is missing or holds values that cannot be compared.
    pub fn sort<S: AsRef<str>>(&mut self, columns: &[S], ascending: bool) -> FrameResult<()> {
        let order = self.sort_order(columns, ascending)?;
        *self = self.take_rows(&order);
        trace!("sorted {} rows by {} keys", order.len(), columns.len());
        Ok(())
    }

    /// Sorted copy of the frame
    pub fn sorted<S: AsRef<str>>(&self, columns: &[S], ascending: bool) -> FrameResult<Frame> {
        let order = self.sort_order(columns, ascending)?;
        Ok(self.take_rows(&order))
    }
}

/// Sort processor
pub struct SortProcessor {
    columns: Vec<String>,
    ascending: bool,
}

impl SortProcessor {
    /// Create a new sort processor
    pub fn new(columns: Vec<String>, ascending: bool) -> Self {
        SortProcessor { columns, ascending }
    }

    /// Sort ascending by the given columns
    pub fn ascending(columns: &[&str]) -> Self {
        Self::new(columns.iter().map(|c| c.to_string()).collect(), true)
    }

    /// Sort descending by the given columns
    pub fn descending(columns: &[&str]) -> Self {
        Self::new(columns.iter().map(|c| c.to_string()).collect(), false)
    }
}

impl FrameProcessor for SortProcessor {
    fn process(&self, input: &Frame) -> FrameResult<Frame> {
        input.sorted(&self.columns, self.ascending)
    }

    fn name(&self) -> &str {
        "sort"
    }

    fn processor_type(&self) -> ProcessorType {
        ProcessorType::Sort
    }
}
