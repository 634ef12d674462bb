use std::sync::{Arc, Mutex};

use deployexec::exec::{InvocationLogger, LineSink, StreamKind};

/// A line sink that records every line it receives, per stream, along with
/// the run id of the logger it was handed.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    lines: Arc<Mutex<Vec<(StreamKind, String)>>>,
    run_ids: Arc<Mutex<Vec<String>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines received from `stream`, in arrival order.
    pub fn lines(&self, stream: StreamKind) -> Vec<String> {
        self.lines
            .lock()
            .unwrap()
            .iter()
            .filter(|(s, _)| *s == stream)
            .map(|(_, l)| l.clone())
            .collect()
    }

    pub fn total_calls(&self) -> usize {
        self.lines.lock().unwrap().len()
    }

    pub fn run_ids(&self) -> Vec<String> {
        self.run_ids.lock().unwrap().clone()
    }
}

impl LineSink for RecordingSink {
    fn on_line(&self, line: &str, stream: StreamKind, logger: &InvocationLogger) {
        self.lines.lock().unwrap().push((stream, line.to_string()));
        self.run_ids
            .lock()
            .unwrap()
            .push(logger.run_id().to_string());
    }
}
