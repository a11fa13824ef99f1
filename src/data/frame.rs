// Column-oriented frame storage
// Author: Gabriel Demetrios Lafis

use std::collections::HashMap;

use log::{debug, trace};

use super::{convert_values, infer_kind, storage_kind, DataType, Field, Row, Schema, Value};
use crate::utils::{
    column_index, validate_permutation, validate_unique_names, FillPolicy, FrameError, FrameResult,
};

/// Represents a table stored column by column.
///
/// The header fixes column order; every column holds exactly
/// [`row_count`](Frame::row_count) values. Operations that derive a new
/// frame always copy the values they keep, so frames never share storage.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    header: Vec<String>,
    columns: HashMap<String, Vec<Value>>,
}

/// Borrowed view of one row, aligned with the frame header
#[derive(Debug, Clone, Copy)]
pub struct RowView<'a> {
    frame: &'a Frame,
    index: usize,
}

impl<'a> RowView<'a> {
    /// Position of the row in its frame
    pub fn index(&self) -> usize {
        self.index
    }

    /// Get a value by column position
    pub fn value(&self, position: usize) -> Option<&'a Value> {
        self.frame.cell(self.index, position)
    }

    /// Get a value by column name
    pub fn get(&self, column: &str) -> Option<&'a Value> {
        self.frame.value(self.index, column)
    }

    /// Iterate over values in header order
    pub fn values(&self) -> impl Iterator<Item = &'a Value> + 'a {
        let frame = self.frame;
        let index = self.index;
        frame
            .header
            .iter()
            .filter_map(move |name| frame.columns.get(name).and_then(|c| c.get(index)))
    }

    pub fn len(&self) -> usize {
        self.frame.column_count()
    }

    pub fn is_empty(&self) -> bool {
        self.frame.header.is_empty()
    }

    /// Copy the row out of the frame
    pub fn to_row(&self) -> Row {
        Row::new(self.values().cloned().collect())
    }
}

impl Frame {
    /// Create a frame with no columns and no rows
    pub fn new() -> Self {
        Frame::default()
    }

    /// Create an empty frame with a fixed header, ready for `push_row`
    pub fn with_header<S: AsRef<str>>(names: &[S]) -> FrameResult<Self> {
        if names.is_empty() {
            return Err(FrameError::EmptySchema);
        }
        validate_unique_names(names)?;

        let header: Vec<String> = names.iter().map(|n| n.as_ref().to_string()).collect();
        let columns = header.iter().map(|n| (n.clone(), Vec::new())).collect();

        Ok(Frame { header, columns })
    }

    /// Create a frame from column-major data, keeping the given column order
    pub fn from_columns<S: Into<String>>(columns: Vec<(S, Vec<Value>)>) -> FrameResult<Self> {
        let columns: Vec<(String, Vec<Value>)> =
            columns.into_iter().map(|(n, v)| (n.into(), v)).collect();

        let names: Vec<&str> = columns.iter().map(|(n, _)| n.as_str()).collect();
        validate_unique_names(&names)?;

        if let Some((_, first)) = columns.first() {
            let expected = first.len();
            for (name, values) in &columns {
                if values.len() != expected {
                    return Err(FrameError::RowCountMismatch {
                        column: name.clone(),
                        expected,
                        actual: values.len(),
                    });
                }
            }
        }

        let header = columns.iter().map(|(n, _)| n.clone()).collect();
        Ok(Frame {
            header,
            columns: columns.into_iter().collect(),
        })
    }

    /// Create a frame from a header and row-major data
    pub fn from_rows<S: AsRef<str>>(names: &[S], rows: Vec<Row>) -> FrameResult<Self> {
        let mut frame = Frame::with_header(names)?;
        for row in &rows {
            frame.check_arity(row)?;
        }
        for row in rows {
            frame.append_unchecked(row);
        }
        Ok(frame)
    }

    /// Assemble a frame from parts already known to satisfy the invariants
    pub(crate) fn from_parts(header: Vec<String>, columns: HashMap<String, Vec<Value>>) -> Self {
        debug_assert!(header.iter().all(|h| columns.contains_key(h)));
        Frame { header, columns }
    }

    fn check_arity(&self, row: &Row) -> FrameResult<()> {
        if row.values.len() != self.header.len() {
            return Err(FrameError::SchemaMismatch(format!(
                "row has {} values, frame has {} columns",
                row.values.len(),
                self.header.len()
            )));
        }
        Ok(())
    }

    fn append_unchecked(&mut self, row: Row) {
        for (name, value) in self.header.iter().zip(row.values) {
            if let Some(column) = self.columns.get_mut(name) {
                column.push(value);
            }
        }
    }

    /// Append a row whose arity matches the header
    pub fn push_row<R: Into<Row>>(&mut self, row: R) -> FrameResult<()> {
        let row = row.into();
        if self.header.is_empty() {
            return Err(FrameError::EmptySchema);
        }
        self.check_arity(&row)?;
        self.append_unchecked(row);
        Ok(())
    }

    /// Get the ordered column names
    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn column_count(&self) -> usize {
        self.header.len()
    }

    /// Get the number of rows, 0 for a frame without columns
    pub fn row_count(&self) -> usize {
        self.header
            .first()
            .and_then(|name| self.columns.get(name))
            .map_or(0, Vec::len)
    }

    /// Check if the frame has no rows
    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    /// Position of a column in the header
    pub fn column_index(&self, name: &str) -> FrameResult<usize> {
        column_index(&self.header, name)
    }

    /// Get the values of a column
    pub fn column(&self, name: &str) -> FrameResult<&[Value]> {
        self.columns
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| FrameError::ColumnNotFound(name.to_string()))
    }

    /// Get a cell by row and column position
    pub fn cell(&self, row: usize, column: usize) -> Option<&Value> {
        self.header
            .get(column)
            .and_then(|name| self.columns.get(name))
            .and_then(|values| values.get(row))
    }

    /// Get a cell by row position and column name
    pub fn value(&self, row: usize, column: &str) -> Option<&Value> {
        self.columns.get(column).and_then(|values| values.get(row))
    }

    /// Get a view of a row
    pub fn row(&self, index: usize) -> Option<RowView<'_>> {
        if index < self.row_count() {
            Some(RowView { frame: self, index })
        } else {
            None
        }
    }

    /// Iterate over row views in order
    pub fn rows(&self) -> impl Iterator<Item = RowView<'_>> {
        (0..self.row_count()).map(move |index| RowView { frame: self, index })
    }

    /// Columns in header order
    pub(crate) fn ordered_columns(&self) -> Vec<(&str, &[Value])> {
        self.header
            .iter()
            .filter_map(|name| {
                self.columns
                    .get(name)
                    .map(|values| (name.as_str(), values.as_slice()))
            })
            .collect()
    }

    /// Copy the given rows, in the given order, into a new frame
    pub(crate) fn take_rows(&self, indices: &[usize]) -> Frame {
        let columns = self
            .columns
            .iter()
            .map(|(name, values)| {
                let taken = indices.iter().map(|&i| values[i].clone()).collect();
                (name.clone(), taken)
            })
            .collect();

        Frame::from_parts(self.header.clone(), columns)
    }

    /// Add a column at the end of the header
    pub fn add_column<S: Into<String>>(&mut self, name: S, values: Vec<Value>) -> FrameResult<()> {
        let name = name.into();

        if self.columns.contains_key(&name) {
            return Err(FrameError::DuplicateColumn(name));
        }

        if !self.header.is_empty() && values.len() != self.row_count() {
            return Err(FrameError::RowCountMismatch {
                column: name,
                expected: self.row_count(),
                actual: values.len(),
            });
        }

        trace!("adding column '{}' with {} values", name, values.len());
        self.header.push(name.clone());
        self.columns.insert(name, values);
        Ok(())
    }

    /// Replace the values of an existing column
    pub fn modify_column(&mut self, name: &str, values: Vec<Value>) -> FrameResult<()> {
        let expected = self.row_count();
        let column = self
            .columns
            .get_mut(name)
            .ok_or_else(|| FrameError::ColumnNotFound(name.to_string()))?;

        if values.len() != expected {
            return Err(FrameError::RowCountMismatch {
                column: name.to_string(),
                expected,
                actual: values.len(),
            });
        }

        *column = values;
        Ok(())
    }

    /// Remove a column and return its values
    pub fn remove_column(&mut self, name: &str) -> FrameResult<Vec<Value>> {
        let index = self.column_index(name)?;
        self.header.remove(index);
        let values = self.columns.remove(name).unwrap_or_default();
        trace!("removed column '{}'", name);
        Ok(values)
    }

    /// Rewrite the header order; `order` must be a permutation of the header
    pub fn reorder_columns<S: AsRef<str>>(&mut self, order: &[S]) -> FrameResult<()> {
        validate_permutation(&self.header, order)?;
        self.header = order.iter().map(|n| n.as_ref().to_string()).collect();
        Ok(())
    }

    /// Rename a column in place
    pub fn rename_column(&mut self, old_name: &str, new_name: &str) -> FrameResult<()> {
        let index = self.column_index(old_name)?;
        if old_name == new_name {
            return Ok(());
        }
        if self.columns.contains_key(new_name) {
            return Err(FrameError::DuplicateColumn(new_name.to_string()));
        }

        let values = self.columns.remove(old_name).unwrap_or_default();
        self.columns.insert(new_name.to_string(), values);
        self.header[index] = new_name.to_string();
        Ok(())
    }

    /// Replace every null cell with `default`, rejecting kind mismatches
    pub fn fill_missing(&mut self, default: Value) -> FrameResult<usize> {
        self.fill_missing_with(default, FillPolicy::Strict)
    }

    /// Replace every null cell with `default` under the given policy.
    ///
    /// Under `Strict`, a column whose non-null values share a kind only
    /// accepts a default of that kind (an integer default is widened for a
    /// float column). Columns that are all-null or already mixed accept any
    /// default. Returns the number of cells filled.
    pub fn fill_missing_with(&mut self, default: Value, policy: FillPolicy) -> FrameResult<usize> {
        if default.is_null() {
            return Ok(0);
        }

        // Decide the value per column before touching anything
        let mut plan: Vec<(String, Value)> = Vec::new();
        for name in &self.header {
            let values = &self.columns[name];
            if !values.iter().any(Value::is_null) {
                continue;
            }

            let fill = match (policy, storage_kind(values)) {
                (FillPolicy::Permissive, _) | (_, None) | (_, Some(DataType::Null)) => {
                    default.clone()
                }
                (FillPolicy::Strict, Some(kind)) if kind == default.data_type() => default.clone(),
                (FillPolicy::Strict, Some(DataType::Float)) => match &default {
                    Value::Integer(i) => Value::Float(*i as f64),
                    _ => {
                        return Err(FrameError::UnsupportedValueKind {
                            column: name.clone(),
                            kind: default.data_type(),
                        })
                    }
                },
                (FillPolicy::Strict, Some(_)) => {
                    return Err(FrameError::UnsupportedValueKind {
                        column: name.clone(),
                        kind: default.data_type(),
                    })
                }
            };
            plan.push((name.clone(), fill));
        }

        let mut filled = 0;
        for (name, fill) in plan {
            if let Some(values) = self.columns.get_mut(&name) {
                for cell in values.iter_mut().filter(|v| v.is_null()) {
                    *cell = fill.clone();
                    filled += 1;
                }
            }
        }

        debug!("filled {} missing cells", filled);
        Ok(filled)
    }

    /// Convert a column to the target kind, all or nothing
    pub fn convert_column(&mut self, name: &str, target: DataType) -> FrameResult<()> {
        let converted = convert_values(self.column(name)?, target)?;
        self.columns.insert(name.to_string(), converted);
        debug!("converted column '{}' to {}", name, target);
        Ok(())
    }

    /// Infer the kind of every column in header order
    pub fn infer_kinds(&self) -> Vec<(String, DataType)> {
        self.ordered_columns()
            .into_iter()
            .map(|(name, values)| (name.to_string(), infer_kind(values)))
            .collect()
    }

    /// Describe the stored kind of every column
    pub fn schema(&self) -> Schema {
        let fields = self
            .ordered_columns()
            .into_iter()
            .map(|(name, values)| {
                Field::new(
                    name.to_string(),
                    storage_kind(values).unwrap_or(DataType::String),
                    values.iter().any(Value::is_null),
                )
            })
            .collect();

        Schema::new(fields)
    }
}
