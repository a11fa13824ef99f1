// Record text export
// Author: Gabriel Demetrios Lafis

use std::io::{self, Write};

use log::debug;
use serde_json::{Map, Number, Value as JsonValue};

use super::{Frame, FrameSink, Value};
use crate::utils::{FrameError, FrameResult};

/// Record-oriented sink: one JSON object per row, keys in header order
#[derive(Debug, Clone, Default)]
pub struct RecordSink {
    pretty: bool,
}

impl RecordSink {
    /// Create a new record sink
    pub fn new(pretty: bool) -> Self {
        RecordSink { pretty }
    }

    /// Convert a frame value to a JSON value
    fn value_to_json(value: &Value) -> JsonValue {
        match value {
            Value::Null => JsonValue::Null,
            Value::Boolean(b) => JsonValue::Bool(*b),
            Value::Integer(i) => JsonValue::Number((*i).into()),
            // JSON has no NaN or infinity
            Value::Float(f) => Number::from_f64(*f).map_or(JsonValue::Null, JsonValue::Number),
            Value::String(s) => JsonValue::String(s.clone()),
            Value::DateTime(_) => JsonValue::String(value.to_string()),
        }
    }

    fn records(frame: &Frame) -> JsonValue {
        let records = frame
            .rows()
            .map(|row| {
                let object: Map<String, JsonValue> = frame
                    .header()
                    .iter()
                    .zip(row.values())
                    .map(|(name, value)| (name.clone(), Self::value_to_json(value)))
                    .collect();
                JsonValue::Object(object)
            })
            .collect();

        JsonValue::Array(records)
    }
}

impl FrameSink for RecordSink {
    fn write(&self, frame: &Frame, writer: &mut dyn Write) -> FrameResult<()> {
        let json = Self::records(frame);

        let result = if self.pretty {
            serde_json::to_writer_pretty(&mut *writer, &json)
        } else {
            serde_json::to_writer(&mut *writer, &json)
        };
        result.map_err(|e| FrameError::Io(io::Error::new(io::ErrorKind::Other, e)))?;
        writer.flush()?;

        debug!("wrote {} records", frame.row_count());
        Ok(())
    }

    fn name(&self) -> &str {
        "records"
    }
}

impl Frame {
    /// Render the frame as a compact array of records
    pub fn to_record_text(&self) -> FrameResult<String> {
        RecordSink::default().render(self)
    }
}
