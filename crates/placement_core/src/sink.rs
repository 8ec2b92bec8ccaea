//! Output sinks
//!
//! Append-only: records go out one at a time in the order they were produced.
//! The sink does not own file lifecycle (creation / truncation) beyond what
//! its writer does.

use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::error::{PlacementError, Result};
use crate::models::OutputRecord;

/// Accepts output records one by one
pub trait RecordSink {
    fn append(&mut self, record: &OutputRecord) -> Result<()>;

    /// Called once after the last record.
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

impl RecordSink for Vec<OutputRecord> {
    fn append(&mut self, record: &OutputRecord) -> Result<()> {
        self.push(record.clone());
        Ok(())
    }
}

/// Output layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// `{...},` per record, for pasting into an existing array
    #[default]
    Fragments,
    /// A complete JSON array
    Array,
    /// One compact object per line
    Lines,
}

/// Build the sink for `format` over `writer`.
pub fn sink_for<'w, W: Write + 'w>(format: OutputFormat, writer: W) -> Box<dyn RecordSink + 'w> {
    match format {
        OutputFormat::Fragments => Box::new(JsonFragmentSink::new(writer)),
        OutputFormat::Array => Box::new(JsonArraySink::new(writer)),
        OutputFormat::Lines => Box::new(JsonLinesSink::new(writer)),
    }
}

fn write_pretty<W: Write>(writer: &mut W, record: &OutputRecord) -> Result<()> {
    serde_json::to_writer_pretty(&mut *writer, record).map_err(|e| {
        if e.is_io() {
            PlacementError::SinkWrite(e.into())
        } else {
            PlacementError::Serialization(e)
        }
    })
}

/// Pretty objects each followed by `,` and a newline
pub struct JsonFragmentSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonFragmentSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> RecordSink for JsonFragmentSink<W> {
    fn append(&mut self, record: &OutputRecord) -> Result<()> {
        write_pretty(&mut self.writer, record)?;
        self.writer
            .write_all(b",\n")
            .map_err(PlacementError::SinkWrite)
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush().map_err(PlacementError::SinkWrite)
    }
}

/// A `[ ... ]` document; an empty run still writes `[]`
pub struct JsonArraySink<W: Write> {
    writer: W,
    written: usize,
}

impl<W: Write> JsonArraySink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, written: 0 }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> RecordSink for JsonArraySink<W> {
    fn append(&mut self, record: &OutputRecord) -> Result<()> {
        let sep: &[u8] = if self.written == 0 { b"[\n" } else { b",\n" };
        self.writer.write_all(sep).map_err(PlacementError::SinkWrite)?;
        write_pretty(&mut self.writer, record)?;
        self.written += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        let tail: &[u8] = if self.written == 0 { b"[]\n" } else { b"\n]\n" };
        self.writer.write_all(tail).map_err(PlacementError::SinkWrite)?;
        self.writer.flush().map_err(PlacementError::SinkWrite)
    }
}

/// JSON Lines
pub struct JsonLinesSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> RecordSink for JsonLinesSink<W> {
    fn append(&mut self, record: &OutputRecord) -> Result<()> {
        serde_json::to_writer(&mut self.writer, record).map_err(|e| {
            if e.is_io() {
                PlacementError::SinkWrite(e.into())
            } else {
                PlacementError::Serialization(e)
            }
        })?;
        self.writer.write_all(b"\n").map_err(PlacementError::SinkWrite)
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush().map_err(PlacementError::SinkWrite)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ContainerSettings, Orientation, Pose, Position};
    use std::io;

    fn record(name: &str) -> OutputRecord {
        OutputRecord::new(
            "Land_Shed",
            name.to_string(),
            "SafeLoot".to_string(),
            &Pose::new(Position::new(1.0, 2.0, 3.0), Orientation::new(90.0, 0.0, 0.0)),
            &ContainerSettings::default(),
        )
    }

    #[test]
    fn test_fragments_layout() {
        let mut sink = JsonFragmentSink::new(Vec::new());
        sink.append(&record("Safe")).unwrap();
        sink.append(&record("Toolbox")).unwrap();
        sink.finish().unwrap();

        let text = String::from_utf8(sink.into_inner()).unwrap();
        assert!(text.starts_with("{\n  \"LocationName\": \"Land_Shed\""));
        assert!(text.ends_with("},\n"));
        assert_eq!(text.matches("},\n").count(), 2);
        assert!(text.contains("1.000000"));
    }

    #[test]
    fn test_array_is_valid_json() {
        let mut sink = JsonArraySink::new(Vec::new());
        sink.append(&record("Safe")).unwrap();
        sink.append(&record("Toolbox")).unwrap();
        sink.finish().unwrap();

        let value: serde_json::Value = serde_json::from_slice(&sink.into_inner()).unwrap();
        let items = value.as_array().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1]["ContainerName"], "Toolbox");
        assert_eq!(items[0]["POS"][2], 3.0);
    }

    #[test]
    fn test_empty_array() {
        let mut sink = JsonArraySink::new(Vec::new());
        sink.finish().unwrap();
        assert_eq!(sink.into_inner(), b"[]\n");
    }

    #[test]
    fn test_lines() {
        let mut sink = JsonLinesSink::new(Vec::new());
        sink.append(&record("Safe")).unwrap();
        sink.append(&record("Toolbox")).unwrap();
        let text = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains(r#""ORI":[90.000000,0.000000,0.000000]"#));
    }

    struct BrokenWriter;

    impl Write for BrokenWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "disk gone"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_failure_is_sink_error() {
        let mut sink = JsonLinesSink::new(BrokenWriter);
        let err = sink.append(&record("Safe")).unwrap_err();
        assert!(matches!(err, PlacementError::SinkWrite(_)));
        assert!(err.is_sink_failure());
    }
}
