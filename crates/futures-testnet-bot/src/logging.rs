/*
[INPUT]:  Log file path, level directive, optional in-memory buffer
[OUTPUT]: Global tracing subscriber and the session log buffer
[POS]:    Logging layer - file sink plus dashboard log tail
[UPDATE]: When changing log sinks, formats, or buffer capacity
*/

use std::collections::VecDeque;
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex as StdMutex, PoisonError};

use anyhow::{Context, Result, anyhow};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::{self, MakeWriter};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

pub const LOG_BUFFER_CAPACITY: usize = 2000;

pub type LogBufferHandle = Arc<StdMutex<LogBuffer>>;

/// Bounded ring of formatted log lines
#[derive(Debug, Default)]
pub struct LogBuffer {
    lines: VecDeque<String>,
    capacity: usize,
}

impl LogBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            lines: VecDeque::new(),
            capacity,
        }
    }

    pub fn handle(capacity: usize) -> LogBufferHandle {
        Arc::new(StdMutex::new(Self::new(capacity)))
    }

    pub fn push_line(&mut self, line: String) {
        if self.capacity == 0 {
            return;
        }
        if self.lines.len() >= self.capacity {
            self.lines.pop_front();
        }
        self.lines.push_back(line);
    }

    pub fn snapshot(&self) -> Vec<String> {
        self.lines.iter().cloned().collect()
    }

    /// Last `count` lines, oldest first
    pub fn tail(&self, count: usize) -> Vec<String> {
        let skip = self.lines.len().saturating_sub(count);
        self.lines.iter().skip(skip).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[derive(Clone)]
pub struct LogWriterFactory {
    buffer: LogBufferHandle,
}

impl LogWriterFactory {
    pub fn new(buffer: LogBufferHandle) -> Self {
        Self { buffer }
    }
}

pub struct LogWriter {
    buffer: LogBufferHandle,
    partial: String,
}

impl LogWriter {
    fn push(&self, line: String) {
        let mut guard = self.buffer.lock().unwrap_or_else(PoisonError::into_inner);
        guard.push_line(line);
    }
}

impl Write for LogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.partial.push_str(&String::from_utf8_lossy(buf));
        while let Some(pos) = self.partial.find('\n') {
            let line = self.partial[..pos].trim_end_matches('\r').to_string();
            self.partial.drain(..=pos);
            self.push(line);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if !self.partial.is_empty() {
            let line = std::mem::take(&mut self.partial);
            self.push(line);
        }
        Ok(())
    }
}

impl Drop for LogWriter {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}

impl<'a> MakeWriter<'a> for LogWriterFactory {
    type Writer = LogWriter;

    fn make_writer(&'a self) -> Self::Writer {
        LogWriter {
            buffer: self.buffer.clone(),
            partial: String::new(),
        }
    }
}

/// Install the global subscriber.
///
/// Everything at or above `level` goes to `log_file` (appended, plain text).
/// When `buffer` is given the same events are also kept in memory for the
/// dashboard. Keep the returned guard alive until exit so the file writer
/// drains.
pub fn init_tracing(
    log_file: &Path,
    level: &str,
    buffer: Option<LogBufferHandle>,
) -> Result<WorkerGuard> {
    let filter = EnvFilter::try_new(level).context("invalid log level")?;

    let file_name = log_file
        .file_name()
        .with_context(|| format!("log file path has no file name: {}", log_file.display()))?;
    let directory = match log_file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(directory)
        .with_context(|| format!("create log directory {}", directory.display()))?;

    let appender = tracing_appender::rolling::never(directory, file_name);
    let (file_writer, guard) = tracing_appender::non_blocking(appender);

    let file_layer = fmt::layer().with_writer(file_writer).with_ansi(false);
    let buffer_layer = buffer.map(|buffer| {
        fmt::layer()
            .with_writer(LogWriterFactory::new(buffer))
            .with_ansi(false)
            .with_target(false)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(buffer_layer)
        .try_init()
        .map_err(|err| anyhow!(err))
        .context("initialize tracing subscriber")?;

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_evicts_oldest() {
        let mut buffer = LogBuffer::new(2);
        buffer.push_line("a".to_string());
        buffer.push_line("b".to_string());
        buffer.push_line("c".to_string());
        assert_eq!(buffer.snapshot(), vec!["b", "c"]);
    }

    #[test]
    fn test_zero_capacity_keeps_nothing() {
        let mut buffer = LogBuffer::new(0);
        buffer.push_line("a".to_string());
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_tail() {
        let mut buffer = LogBuffer::new(10);
        for i in 0..5 {
            buffer.push_line(i.to_string());
        }
        assert_eq!(buffer.tail(2), vec!["3", "4"]);
        assert_eq!(buffer.tail(50).len(), 5);
    }

    #[test]
    fn test_writer_splits_lines_and_flushes_partial() {
        let handle = LogBuffer::handle(10);
        let factory = LogWriterFactory::new(handle.clone());

        {
            let mut writer = factory.make_writer();
            writer.write_all(b"first\r\nsecond\nthi").unwrap();
            writer.write_all(b"rd").unwrap();
        }

        let lines = handle.lock().unwrap().snapshot();
        assert_eq!(lines, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_buffer_layer_captures_events() {
        use tracing_subscriber::layer::SubscriberExt;

        let handle = LogBuffer::handle(10);
        let subscriber = tracing_subscriber::registry().with(
            fmt::layer()
                .with_writer(LogWriterFactory::new(handle.clone()))
                .with_ansi(false),
        );
        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(order_id = 42, "order placed");
        });

        let lines = handle.lock().unwrap().snapshot();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("order placed"));
        assert!(lines[0].contains("order_id=42"));
    }
}
