// Transform operations for frames
// Author: Gabriel Demetrios Lafis

use std::collections::HashSet;

use log::{debug, warn};

use crate::data::{storage_kind, DataType, Frame, Value};
use crate::utils::{validate_unique_names, ConstantColumnPolicy, FillPolicy, FrameError, FrameResult};
use super::{FrameProcessor, ProcessorType};

fn is_numeric_kind(kind: Option<DataType>) -> bool {
    matches!(kind, Some(DataType::Integer) | Some(DataType::Float))
}

/// Min-max rescale of one column; `None` when the column has no spread
fn rescale(name: &str, values: &[Value]) -> FrameResult<Option<Vec<Value>>> {
    let numbers: Vec<f64> = values.iter().filter_map(Value::as_f64).collect();
    if numbers.iter().any(|x| !x.is_finite()) {
        return Err(FrameError::NonFiniteValue(name.to_string()));
    }

    let min = numbers.iter().copied().fold(f64::INFINITY, f64::min);
    let max = numbers.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let spread = max - min;

    // Also covers a column with no numbers at all
    if spread == 0.0 || numbers.is_empty() {
        return Ok(None);
    }

    let scaled = values
        .iter()
        .map(|v| match v.as_f64() {
            Some(x) => Value::Float((x - min) / spread),
            None => Value::Null,
        })
        .collect();
    Ok(Some(scaled))
}

impl Frame {
    /// Rescale every numeric column into [0, 1], zeroing constant columns
    pub fn normalize_numeric_columns(&self) -> FrameResult<Frame> {
        self.normalize_numeric_columns_with(ConstantColumnPolicy::default())
    }

    /// Rescale every numeric column to `(v - min) / (max - min)`.
    ///
    /// Integer and float columns become float columns; nulls stay null and
    /// other columns are copied unchanged. A column with a single distinct
    /// value is handled by `policy`; one holding NaN or an infinity fails
    /// with `NonFiniteValue`.
    pub fn normalize_numeric_columns_with(&self, policy: ConstantColumnPolicy) -> FrameResult<Frame> {
        let mut result = self.clone();

        for (name, values) in self.ordered_columns() {
            if !is_numeric_kind(storage_kind(values)) {
                continue;
            }

            let scaled = match rescale(name, values)? {
                Some(scaled) => scaled,
                None => match policy {
                    ConstantColumnPolicy::Fail => {
                        return Err(FrameError::ConstantColumn(name.to_string()))
                    }
                    ConstantColumnPolicy::Zero => {
                        warn!("column '{}' has no spread, normalizing to 0", name);
                        values
                            .iter()
                            .map(|v| if v.is_null() { Value::Null } else { Value::Float(0.0) })
                            .collect()
                    }
                },
            };
            result.modify_column(name, scaled)?;
        }

        Ok(result)
    }

    /// Replace a text column with one 0/1 indicator column per distinct value.
    ///
    /// Indicator columns are named `<column>_<value>`, follow first-seen
    /// order and are appended after the remaining columns. Null cells are 0
    /// in every indicator.
    pub fn one_hot_encode(&self, column: &str) -> FrameResult<Frame> {
        let values = self.column(column)?;

        if storage_kind(values) != Some(DataType::String) {
            let kind = values
                .iter()
                .map(Value::data_type)
                .find(|k| *k != DataType::String && *k != DataType::Null)
                .unwrap_or(DataType::Null);
            return Err(FrameError::UnsupportedValueKind {
                column: column.to_string(),
                kind,
            });
        }

        let mut seen = HashSet::new();
        let categories: Vec<&str> = values
            .iter()
            .filter_map(Value::as_str)
            .filter(|s| seen.insert(*s))
            .collect();

        let names: Vec<String> = categories
            .iter()
            .map(|c| format!("{}_{}", column, c))
            .collect();
        validate_unique_names(&names)?;
        if let Some(taken) = names.iter().find(|n| self.has_column(n)) {
            return Err(FrameError::DuplicateColumn(taken.clone()));
        }

        let mut result = self.clone();
        result.remove_column(column)?;

        for (name, category) in names.into_iter().zip(&categories) {
            let indicator = values
                .iter()
                .map(|v| Value::Integer(i64::from(v.as_str() == Some(*category))))
                .collect();
            result.add_column(name, indicator)?;
        }

        debug!("one-hot encoded '{}' into {} columns", column, categories.len());
        Ok(result)
    }

    /// Normalize numeric columns, then one-hot encode every text column
    pub fn prepare_features(&self) -> FrameResult<Frame> {
        self.prepare_features_with(ConstantColumnPolicy::default())
    }

    /// `prepare_features` with an explicit constant-column policy
    pub fn prepare_features_with(&self, policy: ConstantColumnPolicy) -> FrameResult<Frame> {
        let mut result = self.normalize_numeric_columns_with(policy)?;

        let text_columns: Vec<String> = self
            .ordered_columns()
            .into_iter()
            .filter(|(_, values)| storage_kind(values) == Some(DataType::String))
            .map(|(name, _)| name.to_string())
            .collect();

        for name in &text_columns {
            result = result.one_hot_encode(name)?;
        }

        Ok(result)
    }
}

/// Select specific columns from a frame, in the given order
pub struct SelectTransform {
    columns: Vec<String>,
}

impl SelectTransform {
    /// Create a new select transform with the given column names
    pub fn new(columns: Vec<String>) -> Self {
        SelectTransform { columns }
    }
}

impl FrameProcessor for SelectTransform {
    fn process(&self, input: &Frame) -> FrameResult<Frame> {
        validate_unique_names(&self.columns)?;

        let selected = self
            .columns
            .iter()
            .map(|name| input.column(name).map(|values| (name.clone(), values.to_vec())))
            .collect::<FrameResult<Vec<_>>>()?;

        Frame::from_columns(selected)
    }

    fn name(&self) -> &str {
        "select"
    }

    fn processor_type(&self) -> ProcessorType {
        ProcessorType::Transform
    }
}

/// Rename columns in a frame
pub struct RenameTransform {
    renames: Vec<(String, String)>, // (old_name, new_name)
}

impl RenameTransform {
    /// Create a new rename transform with the given column renames
    pub fn new(renames: Vec<(String, String)>) -> Self {
        RenameTransform { renames }
    }
}

impl FrameProcessor for RenameTransform {
    fn process(&self, input: &Frame) -> FrameResult<Frame> {
        let mut result = input.clone();
        for (old_name, new_name) in &self.renames {
            result.rename_column(old_name, new_name)?;
        }
        Ok(result)
    }

    fn name(&self) -> &str {
        "rename"
    }

    fn processor_type(&self) -> ProcessorType {
        ProcessorType::Transform
    }
}

/// Drop columns from a frame
pub struct DropColumnsTransform {
    columns: Vec<String>,
}

impl DropColumnsTransform {
    /// Create a new drop columns transform
    pub fn new(columns: Vec<String>) -> Self {
        DropColumnsTransform { columns }
    }
}

impl FrameProcessor for DropColumnsTransform {
    fn process(&self, input: &Frame) -> FrameResult<Frame> {
        let mut result = input.clone();
        for column in &self.columns {
            result.remove_column(column)?;
        }
        Ok(result)
    }

    fn name(&self) -> &str {
        "drop_columns"
    }

    fn processor_type(&self) -> ProcessorType {
        ProcessorType::Transform
    }
}

/// Cast a column to a different kind
pub struct CastTransform {
    column: String,
    target_type: DataType,
}

impl CastTransform {
    /// Create a new cast transform
    pub fn new(column: &str, target_type: DataType) -> Self {
        CastTransform {
            column: column.to_string(),
            target_type,
        }
    }
}

impl FrameProcessor for CastTransform {
    fn process(&self, input: &Frame) -> FrameResult<Frame> {
        let mut result = input.clone();
        result.convert_column(&self.column, self.target_type)?;
        Ok(result)
    }

    fn name(&self) -> &str {
        "cast"
    }

    fn processor_type(&self) -> ProcessorType {
        ProcessorType::Transform
    }
}

/// Replace null cells with a default value
pub struct FillMissingTransform {
    default: Value,
    policy: FillPolicy,
}

impl FillMissingTransform {
    /// Create a new fill transform
    pub fn new(default: Value, policy: FillPolicy) -> Self {
        FillMissingTransform { default, policy }
    }
}

impl FrameProcessor for FillMissingTransform {
    fn process(&self, input: &Frame) -> FrameResult<Frame> {
        let mut result = input.clone();
        result.fill_missing_with(self.default.clone(), self.policy)?;
        Ok(result)
    }

    fn name(&self) -> &str {
        "fill_missing"
    }

    fn processor_type(&self) -> ProcessorType {
        ProcessorType::Transform
    }
}

/// Min-max normalization of numeric columns
pub struct NormalizeTransform {
    policy: ConstantColumnPolicy,
}

impl NormalizeTransform {
    /// Create a new normalize transform
    pub fn new(policy: ConstantColumnPolicy) -> Self {
        NormalizeTransform { policy }
    }
}

impl FrameProcessor for NormalizeTransform {
    fn process(&self, input: &Frame) -> FrameResult<Frame> {
        input.normalize_numeric_columns_with(self.policy)
    }

    fn name(&self) -> &str {
        "normalize"
    }

    fn processor_type(&self) -> ProcessorType {
        ProcessorType::Transform
    }
}

/// One-hot encoding of a text column
pub struct OneHotTransform {
    column: String,
}

impl OneHotTransform {
    /// Create a new one-hot transform
    pub fn new(column: &str) -> Self {
        OneHotTransform {
            column: column.to_string(),
        }
    }
}

impl FrameProcessor for OneHotTransform {
    fn process(&self, input: &Frame) -> FrameResult<Frame> {
        input.one_hot_encode(&self.column)
    }

    fn name(&self) -> &str {
        "one_hot"
    }

    fn processor_type(&self) -> ProcessorType {
        ProcessorType::Transform
    }
}
