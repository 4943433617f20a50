//! Newline-delimited JSON appender
//!
//! Guards each call to the formatter: the event is formatted into a scratch
//! buffer first, so a line reaches the sink whole or not at all as far as
//! formatting is concerned. The sink sits behind a shared mutex, so several
//! appenders writing to one sink never interleave their lines.

use crate::core::{
    Appender, FormatterMetrics, LogEvent, Result, StructuredJsonFormatter,
};
use parking_lot::Mutex;
use std::io::Write;
use std::sync::Arc;

/// A sink shared between appenders
pub type SharedSink<W> = Arc<Mutex<W>>;

/// Appender writing one New Relic JSON line per event to any `Write` sink
///
/// # Example
///
/// ```
/// use newrelic_log_formatter::prelude::*;
///
/// let mut appender = JsonLinesAppender::new(Vec::new());
/// appender.append(&LogEvent::new(LogLevel::Information, "started")).unwrap();
///
/// let output = appender.into_inner().unwrap();
/// assert!(output.ends_with(b"}\n"));
/// ```
pub struct JsonLinesAppender<W: Write + Send> {
    sink: SharedSink<W>,
    formatter: StructuredJsonFormatter,
    metrics: Arc<FormatterMetrics>,
    scratch: Vec<u8>,
}

impl<W: Write + Send> JsonLinesAppender<W> {
    /// Create an appender owning `writer`, using the default formatter configuration
    pub fn new(writer: W) -> Self {
        Self::with_formatter(writer, StructuredJsonFormatter::default())
    }

    pub fn with_formatter(writer: W, formatter: StructuredJsonFormatter) -> Self {
        Self::with_shared_sink(Arc::new(Mutex::new(writer)), formatter)
    }

    /// Create an appender writing to a sink other appenders may also hold
    pub fn with_shared_sink(sink: SharedSink<W>, formatter: StructuredJsonFormatter) -> Self {
        Self {
            sink,
            formatter,
            metrics: Arc::new(FormatterMetrics::new()),
            scratch: Vec::with_capacity(512),
        }
    }

    /// Shared handle to this appender's counters
    pub fn metrics(&self) -> Arc<FormatterMetrics> {
        Arc::clone(&self.metrics)
    }

    pub fn formatter(&self) -> &StructuredJsonFormatter {
        &self.formatter
    }

    /// Another handle to the sink, for building further appenders on it
    pub fn sink(&self) -> SharedSink<W> {
        Arc::clone(&self.sink)
    }

    /// The writer, or `None` while another handle to the sink is alive
    pub fn into_inner(self) -> Option<W> {
        Arc::into_inner(self.sink).map(Mutex::into_inner)
    }

    fn write_line(&mut self, event: &LogEvent) -> Result<()> {
        self.scratch.clear();
        let stats = self.formatter.format_with_stats(event, &mut self.scratch)?;
        self.metrics.record_truncated(stats.truncated_fields);
        self.sink.lock().write_all(&self.scratch)?;
        Ok(())
    }
}

impl<W: Write + Send> Appender for JsonLinesAppender<W> {
    fn name(&self) -> &str {
        "json_lines"
    }

    fn append(&mut self, event: &LogEvent) -> Result<()> {
        match self.write_line(event) {
            Ok(()) => {
                self.metrics.record_formatted();
                Ok(())
            }
            Err(e) => {
                self.metrics.record_failed();
                eprintln!(
                    "[FORMATTER ERROR] Dropped {} event '{}': {}",
                    event.level(),
                    event.template().text(),
                    e
                );
                Err(e)
            }
        }
    }

    fn flush(&mut self) -> Result<()> {
        self.sink.lock().flush()?;
        Ok(())
    }
}
