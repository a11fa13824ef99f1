// Statistical operations for frames
// Author: Gabriel Demetrios Lafis

use log::trace;

use crate::data::{storage_kind, DataType, Frame, Value};
use crate::utils::{validate_unit_interval, FrameError, FrameResult};
use super::{FrameProcessor, ProcessorType};

/// Columns of the frame returned by `describe`
pub const DESCRIBE_COLUMNS: [&str; 7] = ["column", "count", "mean", "std", "min", "median", "max"];

fn mean_of(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Values shifted by the first one, so equal inputs give exact zeros
fn shifted(values: &[f64]) -> Vec<f64> {
    let origin = values.first().copied().unwrap_or(0.0);
    values.iter().map(|&x| x - origin).collect()
}

fn squared_deviations(values: &[f64]) -> f64 {
    let shifted = shifted(values);
    let mean = mean_of(&shifted);
    shifted.iter().map(|&d| (d - mean).powi(2)).sum()
}

fn sorted_copy(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    sorted
}

/// Linear interpolation between the closest ranks of sorted values
fn interpolate(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let idx = pos.floor() as usize;
    let frac = pos - idx as f64;

    if idx + 1 < sorted.len() {
        sorted[idx] + frac * (sorted[idx + 1] - sorted[idx])
    } else {
        sorted[idx]
    }
}

fn require(column: &str, values: &[f64], required: usize) -> FrameResult<()> {
    if values.len() < required {
        return Err(FrameError::InsufficientData {
            column: column.to_string(),
            required,
            actual: values.len(),
        });
    }
    Ok(())
}

fn pair_label(a: &str, b: &str) -> String {
    format!("{}, {}", a, b)
}

impl Frame {
    /// Non-null cells of a numeric column as floats
    fn numeric_values(&self, name: &str) -> FrameResult<Vec<f64>> {
        let column = self.column(name)?;
        let mut values = Vec::with_capacity(column.len());

        for value in column {
            match value {
                Value::Null => {}
                Value::Integer(i) => values.push(*i as f64),
                Value::Float(f) => values.push(*f),
                _ => return Err(FrameError::NonNumericColumn(name.to_string())),
            }
        }

        Ok(values)
    }

    fn non_empty_values(&self, name: &str) -> FrameResult<Vec<f64>> {
        let values = self.numeric_values(name)?;
        if values.is_empty() {
            return Err(FrameError::EmptyColumn(name.to_string()));
        }
        Ok(values)
    }

    /// Values at the rows where both columns hold a number
    fn paired_values(&self, a: &str, b: &str) -> FrameResult<(Vec<f64>, Vec<f64>)> {
        // Validates both columns in full before pairing
        self.numeric_values(a)?;
        self.numeric_values(b)?;

        let (xs, ys): (Vec<f64>, Vec<f64>) = self
            .column(a)?
            .iter()
            .zip(self.column(b)?)
            .filter_map(|(x, y)| Some((x.as_f64()?, y.as_f64()?)))
            .unzip();

        Ok((xs, ys))
    }

    /// Number of non-null cells
    pub fn count(&self, column: &str) -> FrameResult<usize> {
        Ok(self.numeric_values(column)?.len())
    }

    /// Sum of the non-null cells, 0.0 for a column without any
    pub fn sum(&self, column: &str) -> FrameResult<f64> {
        Ok(self.numeric_values(column)?.iter().sum())
    }

    /// Arithmetic mean of the non-null cells
    pub fn mean(&self, column: &str) -> FrameResult<f64> {
        Ok(mean_of(&self.non_empty_values(column)?))
    }

    /// Smallest numeric value
    pub fn min(&self, column: &str) -> FrameResult<f64> {
        let values = self.non_empty_values(column)?;
        Ok(values.iter().copied().fold(f64::INFINITY, f64::min))
    }

    /// Largest numeric value
    pub fn max(&self, column: &str) -> FrameResult<f64> {
        let values = self.non_empty_values(column)?;
        Ok(values.iter().copied().fold(f64::NEG_INFINITY, f64::max))
    }

    /// Difference between the largest and the smallest value
    pub fn range(&self, column: &str) -> FrameResult<f64> {
        Ok(self.max(column)? - self.min(column)?)
    }

    /// Middle value; the mean of the two central values for an even count
    pub fn median(&self, column: &str) -> FrameResult<f64> {
        let sorted = sorted_copy(&self.non_empty_values(column)?);
        let mid = sorted.len() / 2;

        if sorted.len() % 2 == 0 {
            Ok((sorted[mid - 1] + sorted[mid]) / 2.0)
        } else {
            Ok(sorted[mid])
        }
    }

    /// Quantile `q` in [0, 1] with linear interpolation between ranks
    pub fn quantile(&self, column: &str, q: f64) -> FrameResult<f64> {
        validate_unit_interval(q, "quantile")?;
        let sorted = sorted_copy(&self.non_empty_values(column)?);
        Ok(interpolate(&sorted, q))
    }

    /// Population variance (divides by N)
    pub fn variance(&self, column: &str) -> FrameResult<f64> {
        let values = self.non_empty_values(column)?;
        Ok(squared_deviations(&values) / values.len() as f64)
    }

    /// Sample variance (divides by N - 1)
    pub fn sample_variance(&self, column: &str) -> FrameResult<f64> {
        let values = self.numeric_values(column)?;
        require(column, &values, 2)?;
        Ok(squared_deviations(&values) / (values.len() - 1) as f64)
    }

    /// Population standard deviation
    pub fn std_dev(&self, column: &str) -> FrameResult<f64> {
        Ok(self.variance(column)?.sqrt())
    }

    /// Sample standard deviation
    pub fn sample_std_dev(&self, column: &str) -> FrameResult<f64> {
        Ok(self.sample_variance(column)?.sqrt())
    }

    /// Sample covariance over the rows where both columns are numeric
    pub fn covariance(&self, a: &str, b: &str) -> FrameResult<f64> {
        let (xs, ys) = self.paired_values(a, b)?;
        require(&pair_label(a, b), &xs, 2)?;

        let (xs, ys) = (shifted(&xs), shifted(&ys));
        let mean_x = mean_of(&xs);
        let mean_y = mean_of(&ys);
        let sum: f64 = xs
            .iter()
            .zip(&ys)
            .map(|(x, y)| (x - mean_x) * (y - mean_y))
            .sum();

        Ok(sum / (xs.len() - 1) as f64)
    }

    /// Pearson correlation over the rows where both columns are numeric.
    ///
    /// Computed from raw moments. Returns 0.0 when either column has no
    /// spread, and clamps rounding noise into [-1, 1].
    pub fn correlation(&self, a: &str, b: &str) -> FrameResult<f64> {
        let (xs, ys) = self.paired_values(a, b)?;
        require(&pair_label(a, b), &xs, 2)?;

        let n = xs.len() as f64;
        let (mut sx, mut sy, mut sxx, mut syy, mut sxy) = (0.0, 0.0, 0.0, 0.0, 0.0);
        for (x, y) in xs.iter().zip(&ys) {
            sx += x;
            sy += y;
            sxx += x * x;
            syy += y * y;
            sxy += x * y;
        }

        let numerator = n * sxy - sx * sy;
        let denominator = ((n * sxx - sx * sx) * (n * syy - sy * sy)).sqrt();
        trace!("correlation of '{}' and '{}' over {} pairs", a, b, xs.len());

        if denominator == 0.0 || denominator.is_nan() {
            return Ok(0.0);
        }
        Ok((numerator / denominator).clamp(-1.0, 1.0))
    }

    /// Summary statistics with one row per numeric column.
    ///
    /// Columns whose cells are all null are skipped; `std` is the
    /// population standard deviation.
    pub fn describe(&self) -> FrameResult<Frame> {
        let mut summary = Frame::with_header(&DESCRIBE_COLUMNS)?;

        for name in self.header() {
            let kind = storage_kind(self.column(name)?);
            if !matches!(kind, Some(DataType::Integer) | Some(DataType::Float)) {
                continue;
            }

            summary.push_row(vec![
                Value::String(name.clone()),
                Value::Integer(self.count(name)? as i64),
                Value::Float(self.mean(name)?),
                Value::Float(self.std_dev(name)?),
                Value::Float(self.min(name)?),
                Value::Float(self.median(name)?),
                Value::Float(self.max(name)?),
            ])?;
        }

        Ok(summary)
    }
}

/// Type of statistical operation
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StatsType {
    Count,
    Sum,
    Mean,
    Median,
    Variance,
    SampleVariance,
    StdDev,
    SampleStdDev,
    Min,
    Max,
    Range,
    Quantile(f64),
    Covariance,
    Correlation,
}

/// Statistical processor reducing a frame to a single-cell frame
pub struct StatsProcessor {
    name: String,
    columns: Vec<String>,
    stats_type: StatsType,
}

impl StatsProcessor {
    /// Create a new stats processor
    pub fn new(name: &str, columns: Vec<String>, stats_type: StatsType) -> Self {
        StatsProcessor {
            name: name.to_string(),
            columns,
            stats_type,
        }
    }

    fn single(name: &str, column: &str, stats_type: StatsType) -> Self {
        Self::new(name, vec![column.to_string()], stats_type)
    }

    /// Create a mean processor
    pub fn mean(column: &str) -> Self {
        Self::single("mean", column, StatsType::Mean)
    }

    /// Create a median processor
    pub fn median(column: &str) -> Self {
        Self::single("median", column, StatsType::Median)
    }

    /// Create a population variance processor
    pub fn variance(column: &str) -> Self {
        Self::single("variance", column, StatsType::Variance)
    }

    /// Create a population standard deviation processor
    pub fn std_dev(column: &str) -> Self {
        Self::single("std_dev", column, StatsType::StdDev)
    }

    /// Create a sum processor
    pub fn sum(column: &str) -> Self {
        Self::single("sum", column, StatsType::Sum)
    }

    /// Create a count processor
    pub fn count(column: &str) -> Self {
        Self::single("count", column, StatsType::Count)
    }

    /// Create a quantile processor
    pub fn quantile(column: &str, q: f64) -> Self {
        Self::single("quantile", column, StatsType::Quantile(q))
    }

    /// Create a correlation processor
    pub fn correlation(column1: &str, column2: &str) -> Self {
        Self::new(
            "correlation",
            vec![column1.to_string(), column2.to_string()],
            StatsType::Correlation,
        )
    }

    /// Create a covariance processor
    pub fn covariance(column1: &str, column2: &str) -> Self {
        Self::new(
            "covariance",
            vec![column1.to_string(), column2.to_string()],
            StatsType::Covariance,
        )
    }

    fn column(&self, position: usize) -> FrameResult<&str> {
        self.columns
            .get(position)
            .map(String::as_str)
            .ok_or_else(|| {
                FrameError::SchemaMismatch(format!(
                    "'{}' requires {} column(s), got {}",
                    self.name,
                    position + 1,
                    self.columns.len()
                ))
            })
    }

    fn compute(&self, input: &Frame) -> FrameResult<Value> {
        let first = self.column(0)?;

        let value = match self.stats_type {
            StatsType::Count => return Ok(Value::Integer(input.count(first)? as i64)),
            StatsType::Sum => input.sum(first)?,
            StatsType::Mean => input.mean(first)?,
            StatsType::Median => input.median(first)?,
            StatsType::Variance => input.variance(first)?,
            StatsType::SampleVariance => input.sample_variance(first)?,
            StatsType::StdDev => input.std_dev(first)?,
            StatsType::SampleStdDev => input.sample_std_dev(first)?,
            StatsType::Min => input.min(first)?,
            StatsType::Max => input.max(first)?,
            StatsType::Range => input.range(first)?,
            StatsType::Quantile(q) => input.quantile(first, q)?,
            StatsType::Covariance => input.covariance(first, self.column(1)?)?,
            StatsType::Correlation => input.correlation(first, self.column(1)?)?,
        };

        Ok(Value::Float(value))
    }
}

impl FrameProcessor for StatsProcessor {
    fn process(&self, input: &Frame) -> FrameResult<Frame> {
        let value = self.compute(input)?;
        Frame::from_columns(vec![(self.name.clone(), vec![value])])
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn processor_type(&self) -> ProcessorType {
        ProcessorType::Stats
    }
}
