// Join operations for frames
// Author: Gabriel Demetrios Lafis

use std::collections::{HashMap, HashSet};

use log::debug;

use crate::data::{Frame, Value};
use crate::utils::{validate_unique_names, FrameError, FrameResult};
use super::{FrameProcessor, ProcessorType};

/// Inner join on `keys`: left columns, then the right frame's other columns.
///
/// Every left row is paired with every right row whose key values are
/// equal, so duplicate keys multiply. Unmatched rows on either side drop out.
fn inner_join(left: &Frame, right: &Frame, keys: &[String]) -> FrameResult<Frame> {
    let left_keys = keys
        .iter()
        .map(|k| left.column(k))
        .collect::<FrameResult<Vec<_>>>()?;
    let right_keys = keys
        .iter()
        .map(|k| right.column(k))
        .collect::<FrameResult<Vec<_>>>()?;

    // Build hash map for right frame
    let mut right_map: HashMap<Vec<Value>, Vec<usize>> = HashMap::new();
    for row in 0..right.row_count() {
        let key: Vec<Value> = right_keys.iter().map(|c| c[row].clone()).collect();
        right_map.entry(key).or_default().push(row);
    }

    // Pair up matching rows in left order
    let mut left_rows = Vec::new();
    let mut right_rows = Vec::new();
    for row in 0..left.row_count() {
        let key: Vec<Value> = left_keys.iter().map(|c| c[row].clone()).collect();
        if let Some(matches) = right_map.get(&key) {
            for &other in matches {
                left_rows.push(row);
                right_rows.push(other);
            }
        }
    }

    let mut result = left.take_rows(&left_rows);
    for (name, values) in right.ordered_columns() {
        if keys.iter().any(|k| k == name) {
            continue;
        }
        let taken = right_rows.iter().map(|&r| values[r].clone()).collect();
        result.add_column(name, taken)?;
    }

    debug!(
        "joined {} x {} rows on {:?} into {} rows",
        left.row_count(),
        right.row_count(),
        keys,
        result.row_count()
    );
    Ok(result)
}

impl Frame {
    /// Natural inner join on every column both frames share
    pub fn merge(&self, other: &Frame) -> FrameResult<Frame> {
        let common: Vec<String> = self
            .header()
            .iter()
            .filter(|name| other.has_column(name))
            .cloned()
            .collect();

        if common.is_empty() {
            return Err(FrameError::NoCommonColumns);
        }

        inner_join(self, other, &common)
    }

    /// Inner join of several frames on shared key columns, left to right.
    ///
    /// Every frame must hold every key, and apart from the keys no column
    /// name may appear in more than one frame.
    pub fn join<S: AsRef<str>>(frames: &[&Frame], join_columns: &[S]) -> FrameResult<Frame> {
        let (first, rest) = frames.split_first().ok_or_else(|| {
            FrameError::SchemaMismatch("join requires at least one frame".to_string())
        })?;

        if join_columns.is_empty() {
            return Err(FrameError::NoCommonColumns);
        }
        validate_unique_names(join_columns)?;

        let keys: Vec<String> = join_columns.iter().map(|k| k.as_ref().to_string()).collect();

        let mut seen: HashSet<&str> = HashSet::new();
        for frame in frames {
            if let Some(missing) = keys.iter().find(|k| !frame.has_column(k)) {
                return Err(FrameError::ColumnNotFound(missing.clone()));
            }
            for name in frame.header() {
                if keys.contains(name) {
                    continue;
                }
                if !seen.insert(name.as_str()) {
                    return Err(FrameError::DuplicateColumn(name.clone()));
                }
            }
        }

        let mut result = (*first).clone();
        for frame in rest {
            result = inner_join(&result, frame, &keys)?;
        }

        Ok(result)
    }
}

/// Merge processor joining the input with a fixed right-hand frame
pub struct MergeProcessor {
    right: Frame,
}

impl MergeProcessor {
    /// Create a new merge processor
    pub fn new(right: Frame) -> Self {
        MergeProcessor { right }
    }
}

impl FrameProcessor for MergeProcessor {
    fn process(&self, input: &Frame) -> FrameResult<Frame> {
        input.merge(&self.right)
    }

    fn name(&self) -> &str {
        "merge"
    }

    fn processor_type(&self) -> ProcessorType {
        ProcessorType::Join
    }
}

/// Join processor joining the input with further frames on key columns
pub struct JoinProcessor {
    others: Vec<Frame>,
    join_columns: Vec<String>,
}

impl JoinProcessor {
    /// Create a new join processor
    pub fn new(others: Vec<Frame>, join_columns: Vec<String>) -> Self {
        JoinProcessor {
            others,
            join_columns,
        }
    }
}

impl FrameProcessor for JoinProcessor {
    fn process(&self, input: &Frame) -> FrameResult<Frame> {
        let mut frames: Vec<&Frame> = vec![input];
        frames.extend(self.others.iter());
        Frame::join(&frames, &self.join_columns)
    }

    fn name(&self) -> &str {
        "join"
    }

    fn processor_type(&self) -> ProcessorType {
        ProcessorType::Join
    }
}
