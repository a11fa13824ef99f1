// Delimited text import and export
// Author: Gabriel Demetrios Lafis

use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::Path;

use log::debug;

use super::{convert_values, infer_kind, DataType, Frame, FrameSink, FrameSource, Value};
use crate::utils::{ExportConfig, FrameError, FrameResult};

/// CSV import collaborator producing column-major frames
pub struct CsvSource {
    path: String,
    has_header: bool,
    delimiter: char,
    infer_types: bool,
}

impl CsvSource {
    /// Create a new CSV source
    pub fn new<P: AsRef<Path>>(path: P, has_header: bool, delimiter: char) -> Self {
        CsvSource {
            path: path.as_ref().to_string_lossy().to_string(),
            has_header,
            delimiter,
            infer_types: false,
        }
    }

    /// Convert every column to its inferred kind after reading
    pub fn infer_types(mut self, infer: bool) -> Self {
        self.infer_types = infer;
        self
    }

    /// Read a frame from any reader using this source's settings
    pub fn read_from<R: Read>(&self, reader: R) -> FrameResult<Frame> {
        let mut csv_reader = ::csv::ReaderBuilder::new()
            .delimiter(self.delimiter as u8)
            .has_headers(self.has_header)
            .from_reader(reader);

        let header: Option<Vec<String>> = if self.has_header {
            Some(csv_reader.headers()?.iter().map(|s| s.to_string()).collect())
        } else {
            None
        };

        let mut records = Vec::new();
        for result in csv_reader.records() {
            records.push(result?);
        }

        // Generate column names if no header
        let header = match header {
            Some(header) => header,
            None => {
                let width = records
                    .first()
                    .map(|r| r.len())
                    .ok_or_else(|| FrameError::Parse("Empty CSV file".to_string()))?;
                (0..width).map(|i| format!("column_{}", i)).collect()
            }
        };

        let mut columns: Vec<Vec<Value>> = vec![Vec::with_capacity(records.len()); header.len()];
        for record in &records {
            for (column, field) in columns.iter_mut().zip(record.iter()) {
                column.push(if field.is_empty() {
                    Value::Null
                } else {
                    Value::String(field.to_string())
                });
            }
        }

        if self.infer_types {
            for (name, column) in header.iter().zip(columns.iter_mut()) {
                let kind = infer_kind(column);
                if kind != DataType::Null && kind != DataType::String {
                    debug!("column '{}' inferred as {}", name, kind);
                    *column = convert_values(column, kind)?;
                }
            }
        }

        debug!("read {} rows x {} columns from '{}'", records.len(), header.len(), self.path);
        Frame::from_columns(header.into_iter().zip(columns).collect())
    }
}

impl FrameSource for CsvSource {
    fn read(&self) -> FrameResult<Frame> {
        let file = File::open(&self.path)?;
        self.read_from(BufReader::new(file))
    }

    fn name(&self) -> &str {
        &self.path
    }
}

/// Delimited text sink
///
/// Text cells are wrapped in the quote character without further escaping,
/// so embedded delimiters or quotes are not protected.
#[derive(Debug, Clone)]
pub struct DelimitedSink {
    delimiter: char,
    quote: char,
}

impl DelimitedSink {
    /// Create a new delimited sink
    pub fn new(delimiter: char, quote: char) -> Self {
        DelimitedSink { delimiter, quote }
    }

    /// Create a sink from export settings
    pub fn from_config(config: &ExportConfig) -> Self {
        Self::new(config.delimiter, config.quote)
    }

    fn render_cell(&self, value: &Value) -> String {
        match value {
            Value::Null => String::new(),
            Value::String(s) => format!("{q}{}{q}", s, q = self.quote),
            other => other.to_string(),
        }
    }
}

impl Default for DelimitedSink {
    fn default() -> Self {
        Self::from_config(&ExportConfig::default())
    }
}

impl FrameSink for DelimitedSink {
    fn write(&self, frame: &Frame, writer: &mut dyn Write) -> FrameResult<()> {
        let mut records: Vec<Vec<String>> = Vec::with_capacity(frame.row_count() + 1);
        records.push(frame.header().to_vec());
        records.extend(
            frame
                .rows()
                .map(|row| row.values().map(|v| self.render_cell(v)).collect()),
        );

        if frame.column_count() <= 1 {
            // Nothing to delimit, and the csv writer would quote a lone empty field
            for record in &records {
                writer.write_all(record.concat().as_bytes())?;
                writer.write_all(b"\n")?;
            }
            writer.flush()?;
        } else {
            // Cells arrive pre-quoted, so the writer must not quote or escape
            let mut csv_writer = ::csv::WriterBuilder::new()
                .delimiter(self.delimiter as u8)
                .quote_style(::csv::QuoteStyle::Never)
                .terminator(::csv::Terminator::Any(b'\n'))
                .from_writer(&mut *writer);

            for record in &records {
                csv_writer.write_record(record)?;
            }
            csv_writer.flush()?;
        }

        debug!("wrote {} delimited rows", frame.row_count());
        Ok(())
    }

    fn name(&self) -> &str {
        "delimited"
    }
}

impl Frame {
    /// Render the frame as comma-delimited text with quoted text cells
    pub fn to_delimited_text(&self) -> FrameResult<String> {
        DelimitedSink::default().render(self)
    }
}
