// Processing module for relational operations, statistics and transforms
// Author: Gabriel Demetrios Lafis

mod aggregate;
mod filter;
mod join;
mod pivot;
mod sort;
mod stats;
mod transform;

pub use aggregate::*;
pub use filter::*;
pub use join::*;
pub use pivot::*;
pub use sort::*;
pub use stats::*;
pub use transform::*;

use log::debug;

use crate::data::Frame;
use crate::utils::FrameResult;

/// Represents an operation that derives a new frame from an input frame
pub trait FrameProcessor {
    /// Process a frame and return a new frame
    fn process(&self, input: &Frame) -> FrameResult<Frame>;

    /// Get the processor name
    fn name(&self) -> &str;

    /// Get the processor type
    fn processor_type(&self) -> ProcessorType;
}

/// Represents a processor type
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessorType {
    Transform,
    Filter,
    Sort,
    Aggregate,
    Join,
    Pivot,
    Stats,
    Custom(String),
}

/// Pipeline for chaining multiple processors
pub struct Pipeline {
    name: String,
    processors: Vec<Box<dyn FrameProcessor>>,
}

impl Pipeline {
    /// Create a new pipeline with the given name
    pub fn new(name: &str) -> Self {
        Pipeline {
            name: name.to_string(),
            processors: Vec::new(),
        }
    }

    /// Add a processor to the pipeline
    pub fn add<P: FrameProcessor + 'static>(mut self, processor: P) -> Self {
        self.processors.push(Box::new(processor));
        self
    }

    pub fn len(&self) -> usize {
        self.processors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processors.is_empty()
    }

    /// Execute the pipeline on a frame; the input is never modified
    pub fn execute(&self, input: &Frame) -> FrameResult<Frame> {
        let mut current = input.clone();

        for processor in &self.processors {
            current = processor.process(&current)?;
            debug!(
                "pipeline '{}': stage '{}' produced {} rows",
                self.name,
                processor.name(),
                current.row_count()
            );
        }

        Ok(current)
    }
}

impl FrameProcessor for Pipeline {
    fn process(&self, input: &Frame) -> FrameResult<Frame> {
        self.execute(input)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn processor_type(&self) -> ProcessorType {
        ProcessorType::Custom("Pipeline".to_string())
    }
}
