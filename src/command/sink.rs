use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;

use thiserror::Error;

use super::Command;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not encode command: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("transport is closed")]
    Closed,
}

/// Where outbound commands go. The transport behind it is not this crate's
/// concern; sends are fire and forget.
pub trait CommandSink {
    fn send(&mut self, command: &Command) -> Result<(), SinkError>;
}

/// Writes one JSON document per line.
#[derive(Debug)]
pub struct JsonLineSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonLineSink<W> {
    pub fn new(writer: W) -> Self {
        JsonLineSink { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> CommandSink for JsonLineSink<W> {
    fn send(&mut self, command: &Command) -> Result<(), SinkError> {
        serde_json::to_writer(&mut self.writer, command)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Keeps every command in memory. Clones share the same record, so a test
/// can keep one handle while the session owns another.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    sent: Rc<RefCell<Vec<Command>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<Command> {
        self.sent.borrow().clone()
    }

    pub fn take(&self) -> Vec<Command> {
        self.sent.borrow_mut().drain(..).collect()
    }
}

impl CommandSink for RecordingSink {
    fn send(&mut self, command: &Command) -> Result<(), SinkError> {
        self.sent.borrow_mut().push(command.clone());
        Ok(())
    }
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl CommandSink for NullSink {
    fn send(&mut self, _command: &Command) -> Result<(), SinkError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_lines() {
        let mut sink = JsonLineSink::new(Vec::new());
        sink.send(&Command::heartbeat("p1")).unwrap();
        sink.send(&Command::ResetTable).unwrap();
        let text = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(2, lines.len());
        assert_eq!(r#"{"type":"resetTable"}"#, lines[1]);
    }

    #[test]
    fn test_recording_is_shared() {
        let handle = RecordingSink::new();
        let mut owned = handle.clone();
        owned.send(&Command::leave_now("p1")).unwrap();
        assert_eq!(vec![Command::leave_now("p1")], handle.sent());
        assert_eq!(1, handle.take().len());
        assert!(handle.sent().is_empty());
    }
}
