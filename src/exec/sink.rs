// src/exec/sink.rs

//! Caller-supplied handling of output lines.

use super::logger::{InvocationLogger, StreamKind};

/// Receives each newline-delimited output line in place of the default
/// info-level logging.
///
/// Lines arrive without their trailing `\n` (or `\r\n`). Both drains may
/// call the sink at the same time, so implementations that keep state must
/// synchronise it themselves.
pub trait LineSink: Send + Sync {
    fn on_line(&self, line: &str, stream: StreamKind, logger: &InvocationLogger);
}

/// Plain closures `|line, logger| ...` work as sinks.
impl<F> LineSink for F
where
    F: Fn(&str, &InvocationLogger) + Send + Sync,
{
    fn on_line(&self, line: &str, _stream: StreamKind, logger: &InvocationLogger) {
        self(line, logger)
    }
}

/// Sink that strips ANSI colour escapes before logging the line.
///
/// Terraform colours its output unless told not to; the escapes are noise in
/// structured logs.
#[derive(Debug, Clone)]
pub struct StripAnsiSink {
    pattern: regex::Regex,
}

impl StripAnsiSink {
    pub fn new() -> Self {
        Self {
            pattern: regex::Regex::new(r"\x1b\[[0-9;]*[A-Za-z]").expect("static regex is valid"),
        }
    }

    pub fn strip<'a>(&self, line: &'a str) -> std::borrow::Cow<'a, str> {
        self.pattern.replace_all(line, "")
    }
}

impl Default for StripAnsiSink {
    fn default() -> Self {
        Self::new()
    }
}

impl LineSink for StripAnsiSink {
    fn on_line(&self, line: &str, stream: StreamKind, logger: &InvocationLogger) {
        logger.line(stream, &self.strip(line));
    }
}
