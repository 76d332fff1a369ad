//! Scalar metric sinks.
//!
//! A sink receives `(name, step, value)` observations and never reports
//! failure back to the trainer: write errors are logged and dropped.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Destination for scalar training metrics.
///
/// Lifecycle: [`open`](MetricsSink::open) once before training,
/// [`add_scalar`](MetricsSink::add_scalar) any number of times,
/// [`close`](MetricsSink::close) once at the end (flushing).
pub trait MetricsSink {
    /// Prepare for writing.
    fn open(&mut self) {}

    /// Record one scalar observation.
    fn add_scalar(&mut self, name: &str, step: usize, value: f32);

    /// Flush any buffered output.
    fn flush(&mut self) {}

    /// Flush and release resources.
    fn close(&mut self) {
        self.flush();
    }
}

impl<S: MetricsSink + ?Sized> MetricsSink for Box<S> {
    fn open(&mut self) {
        (**self).open()
    }

    fn add_scalar(&mut self, name: &str, step: usize, value: f32) {
        (**self).add_scalar(name, step, value)
    }

    fn flush(&mut self) {
        (**self).flush()
    }

    fn close(&mut self) {
        (**self).close()
    }
}

/// Sink that writes every scalar through the `log` facade.
#[derive(Debug, Clone)]
pub struct ConsoleSink {
    level: log::Level,
}

impl ConsoleSink {
    /// Create a console sink logging at `Info`.
    pub fn new() -> Self {
        Self {
            level: log::Level::Info,
        }
    }

    /// Set the log level used for every record.
    pub fn with_level(mut self, level: log::Level) -> Self {
        self.level = level;
        self
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsSink for ConsoleSink {
    fn add_scalar(&mut self, name: &str, step: usize, value: f32) {
        log::log!(self.level, "{:>8} {:<14} {:>12.6}", step, name, value);
    }
}

/// CSV file sink with one `name,step,value` row per scalar.
pub struct CsvSink {
    writer: BufWriter<File>,
}

impl CsvSink {
    /// Create the file at `path` (truncating) and write the header.
    pub fn new(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);

        writeln!(writer, "name,step,value")?;

        Ok(Self { writer })
    }
}

impl MetricsSink for CsvSink {
    fn add_scalar(&mut self, name: &str, step: usize, value: f32) {
        if let Err(e) = writeln!(self.writer, "{},{},{}", name, step, value) {
            log::warn!("Dropping metric {} at step {}: {}", name, step, e);
        }
    }

    fn flush(&mut self) {
        if let Err(e) = self.writer.flush() {
            log::warn!("Failed to flush metrics file: {}", e);
        }
    }
}

impl Drop for CsvSink {
    fn drop(&mut self) {
        self.flush();
    }
}

/// Sink that forwards to several backends.
#[derive(Default)]
pub struct MultiSink {
    sinks: Vec<Box<dyn MetricsSink>>,
}

impl MultiSink {
    /// Create an empty multi-sink.
    pub fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    /// Add a sink.
    pub fn add<S: MetricsSink + 'static>(mut self, sink: S) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }

    /// Number of backends.
    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl MetricsSink for MultiSink {
    fn open(&mut self) {
        for sink in &mut self.sinks {
            sink.open();
        }
    }

    fn add_scalar(&mut self, name: &str, step: usize, value: f32) {
        for sink in &mut self.sinks {
            sink.add_scalar(name, step, value);
        }
    }

    fn flush(&mut self) {
        for sink in &mut self.sinks {
            sink.flush();
        }
    }

    fn close(&mut self) {
        for sink in &mut self.sinks {
            sink.close();
        }
    }
}

/// Sink that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl MetricsSink for NullSink {
    fn add_scalar(&mut self, _name: &str, _step: usize, _value: f32) {}
}

/// One recorded scalar.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarRecord {
    pub name: String,
    pub step: usize,
    pub value: f32,
}

/// In-memory sink for inspection after a run.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    records: Vec<ScalarRecord>,
    opened: bool,
    closed: bool,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All records in arrival order.
    pub fn records(&self) -> &[ScalarRecord] {
        &self.records
    }

    /// Values recorded under `name`, in arrival order.
    pub fn values(&self, name: &str) -> Vec<f32> {
        self.records
            .iter()
            .filter(|r| r.name == name)
            .map(|r| r.value)
            .collect()
    }

    /// Steps recorded under `name`, in arrival order.
    pub fn steps(&self, name: &str) -> Vec<usize> {
        self.records
            .iter()
            .filter(|r| r.name == name)
            .map(|r| r.step)
            .collect()
    }

    pub fn is_open(&self) -> bool {
        self.opened && !self.closed
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl MetricsSink for MemorySink {
    fn open(&mut self) {
        self.opened = true;
        self.closed = false;
    }

    fn add_scalar(&mut self, name: &str, step: usize, value: f32) {
        self.records.push(ScalarRecord {
            name: name.to_string(),
            step,
            value,
        });
    }

    fn close(&mut self) {
        self.closed = true;
    }
}
