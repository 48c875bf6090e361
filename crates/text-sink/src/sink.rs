//! Text Sink Implementations

use crate::SinkError;
use std::io::{self, Stdout, Write};
use std::sync::{Arc, Mutex};
use tracing::warn;

/// Destination for human-readable diagnostic lines.
///
/// Implementations must preserve character order within one call and must
/// not interleave two calls, even when they come from different contexts.
pub trait TextSink: Send + Sync {
    /// Send `text` to the external observer
    fn transmit(&self, text: &str) -> Result<(), SinkError>;

    /// Transmit, logging and dropping any failure
    fn transmit_or_log(&self, text: &str) {
        if let Err(err) = self.transmit(text) {
            warn!(error = %err, "Dropping diagnostic line");
        }
    }
}

impl<S: TextSink + ?Sized> TextSink for Arc<S> {
    fn transmit(&self, text: &str) -> Result<(), SinkError> {
        (**self).transmit(text)
    }
}

/// Writer-backed sink that holds a lock for the duration of one write
pub struct SerializedSink<W> {
    writer: Mutex<W>,
}

impl<W: Write + Send> SerializedSink<W> {
    /// Wrap a writer
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Take the writer back out
    pub fn into_inner(self) -> Result<W, SinkError> {
        self.writer.into_inner().map_err(|_| SinkError::Poisoned)
    }
}

impl SerializedSink<Stdout> {
    /// Sink writing to the process's standard output
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> TextSink for SerializedSink<W> {
    fn transmit(&self, text: &str) -> Result<(), SinkError> {
        let mut writer = self.writer.lock().map_err(|_| SinkError::Poisoned)?;
        writer.write_all(text.as_bytes())?;
        writer.flush()?;
        Ok(())
    }
}

/// In-memory sink recording each transmission separately
#[derive(Debug, Default)]
pub struct MemorySink {
    transmissions: Mutex<Vec<String>>,
}

impl MemorySink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything transmitted so far, one entry per call
    pub fn transmissions(&self) -> Vec<String> {
        self.transmissions
            .lock()
            .map(|lines| lines.clone())
            .unwrap_or_default()
    }

    /// Number of transmit calls recorded
    pub fn len(&self) -> usize {
        self.transmissions.lock().map(|lines| lines.len()).unwrap_or(0)
    }

    /// Whether nothing has been transmitted
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Forget everything recorded
    pub fn clear(&self) {
        if let Ok(mut lines) = self.transmissions.lock() {
            lines.clear();
        }
    }
}

impl TextSink for MemorySink {
    fn transmit(&self, text: &str) -> Result<(), SinkError> {
        let mut lines = self
            .transmissions
            .lock()
            .map_err(|_| SinkError::Poisoned)?;
        lines.push(text.to_owned());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_memory_sink_records_calls() {
        let sink = MemorySink::new();
        assert!(sink.is_empty());

        sink.transmit("first\n").unwrap();
        sink.transmit_or_log("second\n");

        assert_eq!(sink.transmissions(), vec!["first\n", "second\n"]);
        sink.clear();
        assert_eq!(sink.len(), 0);
    }

    #[test]
    fn test_serialized_sink_writes_through() {
        let sink = SerializedSink::new(Vec::new());
        sink.transmit("hello ").unwrap();
        sink.transmit("world\n").unwrap();

        let bytes = sink.into_inner().unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), "hello world\n");
    }

    #[test]
    fn test_concurrent_writers_do_not_interleave() {
        let sink = Arc::new(SerializedSink::new(Vec::new()));

        let writers: Vec<_> = ["<<<<< consumer line", ">>>>> producer line"]
            .into_iter()
            .map(|line| {
                let sink = Arc::clone(&sink);
                thread::spawn(move || {
                    for i in 0..500 {
                        sink.transmit(&format!("{} {}\n", line, i)).unwrap();
                    }
                })
            })
            .collect();

        for writer in writers {
            writer.join().unwrap();
        }

        let sink = Arc::try_unwrap(sink).ok().unwrap();
        let output = String::from_utf8(sink.into_inner().unwrap()).unwrap();
        let lines: Vec<_> = output.lines().collect();

        assert_eq!(lines.len(), 1000);
        for line in lines {
            assert!(
                line.starts_with("<<<<< consumer line ") || line.starts_with(">>>>> producer line "),
                "interleaved line: {:?}",
                line
            );
        }
    }

    #[test]
    fn test_arc_sink_forwards() {
        let sink = Arc::new(MemorySink::new());
        let shared: Arc<dyn TextSink> = sink.clone();
        shared.transmit("via arc\n").unwrap();
        assert_eq!(sink.len(), 1);
    }

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::ErrorKind::BrokenPipe.into())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_failure_surfaces_through_arc() {
        let shared: Arc<dyn TextSink> = Arc::new(SerializedSink::new(ClosedPipe));

        assert!(matches!(shared.transmit("lost\n"), Err(SinkError::Io(_))));
        // Logged and dropped
        shared.transmit_or_log("lost\n");
    }
}
