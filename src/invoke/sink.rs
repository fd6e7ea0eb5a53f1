//! Line sinks that receive analyzer output.

use std::io::{self, Write};

/// Destination for analyzer output lines.
///
/// Lines arrive without their trailing newline. A write error aborts the run
/// as an I/O failure.
pub trait LineSink {
    fn line(&mut self, line: &str) -> io::Result<()>;
}

impl LineSink for Vec<String> {
    fn line(&mut self, line: &str) -> io::Result<()> {
        self.push(line.to_string());
        Ok(())
    }
}

/// Sink that writes each line, newline-terminated, to a writer and flushes.
#[derive(Debug)]
pub struct WriterSink<W: Write> {
    writer: W,
}

impl<W: Write> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> LineSink for WriterSink<W> {
    fn line(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.writer, "{}", line)?;
        self.writer.flush()
    }
}

impl<S: LineSink + ?Sized> LineSink for &mut S {
    fn line(&mut self, line: &str) -> io::Result<()> {
        (**self).line(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vec_sink_collects_lines_in_order() {
        let mut sink: Vec<String> = Vec::new();
        sink.line("A").unwrap();
        sink.line("B").unwrap();
        assert_eq!(sink, vec!["A".to_string(), "B".to_string()]);
    }

    #[test]
    fn writer_sink_appends_newlines() {
        let mut sink = WriterSink::new(Vec::new());
        sink.line("first").unwrap();
        sink.line("").unwrap();
        sink.line("third").unwrap();
        assert_eq!(sink.into_inner(), b"first\n\nthird\n");
    }
}
