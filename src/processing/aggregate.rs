// Aggregate operations for frames
// Author: Gabriel Demetrios Lafis

use std::cmp::Ordering;
use std::collections::HashMap;

use log::debug;

use crate::data::{Frame, Value};
use crate::utils::{validate_unique_names, FrameError, FrameResult};
use super::{FrameProcessor, ProcessorType};

/// Name of the member-count column appended by `group_by`
pub const COUNT_COLUMN: &str = "Count";

/// Reduces the values of one column within one group to a single value
pub trait Aggregator {
    /// Get the name of the aggregator
    fn name(&self) -> &str;

    /// Reduce the group's values, given in original row order
    fn aggregate(&self, values: &[Value]) -> Value;
}

impl<F> Aggregator for F
where
    F: Fn(&[Value]) -> Value,
{
    fn name(&self) -> &str {
        "custom"
    }

    fn aggregate(&self, values: &[Value]) -> Value {
        self(values)
    }
}

/// Counts non-null values
pub struct CountAggregator;

impl Aggregator for CountAggregator {
    fn name(&self) -> &str {
        "count"
    }

    fn aggregate(&self, values: &[Value]) -> Value {
        Value::Integer(values.iter().filter(|v| !v.is_null()).count() as i64)
    }
}

/// Sums numeric values; stays integer until a float is seen or the sum overflows
pub struct SumAggregator;

impl Aggregator for SumAggregator {
    fn name(&self) -> &str {
        "sum"
    }

    fn aggregate(&self, values: &[Value]) -> Value {
        let mut int_sum = 0i64;
        let mut float_sum = 0.0f64;
        let mut is_float = false;

        for value in values {
            match value {
                Value::Integer(i) => {
                    if is_float {
                        float_sum += *i as f64;
                    } else if let Some(sum) = int_sum.checked_add(*i) {
                        int_sum = sum;
                    } else {
                        // Overflow continues as a float sum
                        float_sum = int_sum as f64 + *i as f64;
                        is_float = true;
                    }
                }
                Value::Float(f) => {
                    if !is_float {
                        float_sum = int_sum as f64;
                        is_float = true;
                    }
                    float_sum += *f;
                }
                _ => {} // Ignore other kinds
            }
        }

        if is_float {
            Value::Float(float_sum)
        } else {
            Value::Integer(int_sum)
        }
    }
}

/// Averages numeric values, null when there are none
pub struct MeanAggregator;

impl Aggregator for MeanAggregator {
    fn name(&self) -> &str {
        "mean"
    }

    fn aggregate(&self, values: &[Value]) -> Value {
        let numbers: Vec<f64> = values.iter().filter_map(Value::as_f64).collect();

        if numbers.is_empty() {
            Value::Null
        } else {
            Value::Float(numbers.iter().sum::<f64>() / numbers.len() as f64)
        }
    }
}

/// Smallest value among those comparable with the first non-null value
pub struct MinAggregator;

/// Largest value among those comparable with the first non-null value
pub struct MaxAggregator;

fn extreme(values: &[Value], wanted: Ordering) -> Value {
    let mut best: Option<&Value> = None;

    for value in values.iter().filter(|v| !v.is_null()) {
        best = match best {
            None => Some(value),
            Some(current) => match value.try_cmp(current) {
                Ok(ord) if ord == wanted => Some(value),
                _ => Some(current),
            },
        };
    }

    best.cloned().unwrap_or(Value::Null)
}

impl Aggregator for MinAggregator {
    fn name(&self) -> &str {
        "min"
    }

    fn aggregate(&self, values: &[Value]) -> Value {
        extreme(values, Ordering::Less)
    }
}

impl Aggregator for MaxAggregator {
    fn name(&self) -> &str {
        "max"
    }

    fn aggregate(&self, values: &[Value]) -> Value {
        extreme(values, Ordering::Greater)
    }
}

/// Takes the first value of the group
pub struct FirstAggregator;

impl Aggregator for FirstAggregator {
    fn name(&self) -> &str {
        "first"
    }

    fn aggregate(&self, values: &[Value]) -> Value {
        values.first().cloned().unwrap_or(Value::Null)
    }
}

/// Rows partitioned by key, groups in first-seen order
struct Partition {
    keys: Vec<Vec<Value>>,
    members: Vec<Vec<usize>>,
}

impl Frame {
    fn partition<S: AsRef<str>>(&self, columns: &[S]) -> FrameResult<Partition> {
        if columns.is_empty() {
            return Err(FrameError::SchemaMismatch(
                "group by requires at least one column".to_string(),
            ));
        }
        validate_unique_names(columns)?;

        let key_columns = columns
            .iter()
            .map(|c| self.column(c.as_ref()))
            .collect::<FrameResult<Vec<_>>>()?;

        let mut slots: HashMap<Vec<Value>, usize> = HashMap::new();
        let mut partition = Partition {
            keys: Vec::new(),
            members: Vec::new(),
        };

        for row in 0..self.row_count() {
            let key: Vec<Value> = key_columns.iter().map(|c| c[row].clone()).collect();

            let slot = match slots.get(&key) {
                Some(&slot) => slot,
                None => {
                    let slot = partition.keys.len();
                    slots.insert(key.clone(), slot);
                    partition.keys.push(key);
                    partition.members.push(Vec::new());
                    slot
                }
            };
            partition.members[slot].push(row);
        }

        debug!(
            "partitioned {} rows into {} groups",
            self.row_count(),
            partition.keys.len()
        );
        Ok(partition)
    }

    /// Group rows by the tuple of values in `columns`.
    ///
    /// Emits one row per distinct key in first-seen order: the grouping
    /// columns followed by a `Count` column with each group's size.
    pub fn group_by<S: AsRef<str>>(&self, columns: &[S]) -> FrameResult<Frame> {
        if columns.iter().any(|c| c.as_ref() == COUNT_COLUMN) {
            return Err(FrameError::DuplicateColumn(COUNT_COLUMN.to_string()));
        }

        let partition = self.partition(columns)?;

        let mut header: Vec<String> = columns.iter().map(|c| c.as_ref().to_string()).collect();
        let mut out: HashMap<String, Vec<Value>> = HashMap::new();

        for (position, name) in header.iter().enumerate() {
            let values = partition.keys.iter().map(|k| k[position].clone()).collect();
            out.insert(name.clone(), values);
        }

        let counts = partition
            .members
            .iter()
            .map(|m| Value::Integer(m.len() as i64))
            .collect();
        header.push(COUNT_COLUMN.to_string());
        out.insert(COUNT_COLUMN.to_string(), counts);

        Ok(Frame::from_parts(header, out))
    }

    /// Group rows by `columns` and reduce every other column with `aggregator`.
    ///
    /// The header keeps its order; grouping columns carry the key values.
    pub fn group_by_aggregate<S, A>(&self, columns: &[S], aggregator: &A) -> FrameResult<Frame>
    where
        S: AsRef<str>,
        A: Aggregator + ?Sized,
    {
        let partition = self.partition(columns)?;
        let mut out: HashMap<String, Vec<Value>> = HashMap::new();

        for (name, values) in self.ordered_columns() {
            let key_position = columns.iter().position(|c| c.as_ref() == name);

            let reduced = match key_position {
                Some(position) => partition.keys.iter().map(|k| k[position].clone()).collect(),
                None => partition
                    .members
                    .iter()
                    .map(|rows| {
                        let group: Vec<Value> = rows.iter().map(|&r| values[r].clone()).collect();
                        aggregator.aggregate(&group)
                    })
                    .collect(),
            };
            out.insert(name.to_string(), reduced);
        }

        debug!("aggregated with '{}'", aggregator.name());
        Ok(Frame::from_parts(self.header().to_vec(), out))
    }
}

/// Group by processor for aggregating data
pub struct GroupByProcessor {
    group_by_columns: Vec<String>,
    aggregator: Option<Box<dyn Aggregator>>,
}

impl GroupByProcessor {
    /// Create a new group by processor that counts group members
    pub fn new() -> Self {
        GroupByProcessor {
            group_by_columns: Vec::new(),
            aggregator: None,
        }
    }

    /// Add a column to group by
    pub fn group_by(mut self, column: &str) -> Self {
        self.group_by_columns.push(column.to_string());
        self
    }

    /// Reduce non-group columns with an aggregator instead of counting
    pub fn aggregate<A: Aggregator + 'static>(mut self, aggregator: A) -> Self {
        self.aggregator = Some(Box::new(aggregator));
        self
    }

    /// Add a sum aggregation
    pub fn sum(self) -> Self {
        self.aggregate(SumAggregator)
    }

    /// Add a mean aggregation
    pub fn mean(self) -> Self {
        self.aggregate(MeanAggregator)
    }
}

impl Default for GroupByProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameProcessor for GroupByProcessor {
    fn process(&self, input: &Frame) -> FrameResult<Frame> {
        match &self.aggregator {
            Some(aggregator) => input.group_by_aggregate(&self.group_by_columns, aggregator.as_ref()),
            None => input.group_by(&self.group_by_columns),
        }
    }

    fn name(&self) -> &str {
        "group_by"
    }

    fn processor_type(&self) -> ProcessorType {
        ProcessorType::Aggregate
    }
}
