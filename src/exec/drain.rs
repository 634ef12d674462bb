// src/exec/drain.rs

//! Draining one output stream of a child process.
//!
//! A drain tees every byte it reads into the stream's buffer and, on the
//! side, splits the bytes into lines for logging. A line longer than the
//! scan limit stops line handling only: reading continues until
//! end-of-stream so the buffer stays complete and the child never blocks on
//! a full pipe. A read error ends the drain with whatever was read so far.

use std::borrow::Cow;
use std::io;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};

use crate::errors::ScanError;

use super::logger::{InvocationLogger, StreamKind};
use super::sink::LineSink;

/// Longest line the scanner will hand to logging or a sink.
pub const MAX_LINE_BYTES: usize = 64 * 1024;

/// Read `reader` to end-of-stream, returning every byte read.
///
/// Each complete line goes to `sink` if one is given, otherwise it is logged
/// at info level through `logger`. Scan failures are logged at error level
/// and stop line handling only.
pub async fn drain_stream<R>(
    reader: R,
    stream: StreamKind,
    logger: &InvocationLogger,
    sink: Option<&dyn LineSink>,
    max_line: usize,
) -> Vec<u8>
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(reader);
    let mut buffer = Vec::new();
    let mut scanner = LineScanner::new(max_line);
    let mut failure: Option<ScanError> = None;

    let mut emit = |line: &str| match sink {
        Some(sink) => sink.on_line(line, stream, logger),
        None => logger.line(stream, line),
    };

    loop {
        let chunk = match reader.fill_buf().await {
            Ok(chunk) if chunk.is_empty() => break,
            Ok(chunk) => chunk,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                failure.get_or_insert(ScanError::Read(e));
                break;
            }
        };

        buffer.extend_from_slice(chunk);
        if failure.is_none() {
            if let Err(e) = scanner.feed(chunk, &mut emit) {
                failure = Some(e);
            }
        }

        let n = chunk.len();
        reader.consume(n);
    }

    match failure {
        None => scanner.finish(&mut emit),
        Some(err) => logger.error(&err, &format!("failed to scan {}", stream.as_str())),
    }

    buffer
}

/// Incremental newline splitter with a per-line size limit.
#[derive(Debug)]
pub(crate) struct LineScanner {
    pending: Vec<u8>,
    limit: usize,
}

impl LineScanner {
    pub(crate) fn new(limit: usize) -> Self {
        Self {
            pending: Vec::new(),
            limit,
        }
    }

    /// Feed the next chunk, emitting every line it completes.
    pub(crate) fn feed(
        &mut self,
        chunk: &[u8],
        emit: &mut impl FnMut(&str),
    ) -> Result<(), ScanError> {
        let mut rest = chunk;

        while let Some(pos) = rest.iter().position(|&b| b == b'\n') {
            let (head, tail) = rest.split_at(pos);
            self.check_len(head.len())?;

            if self.pending.is_empty() {
                emit(&decode_line(head));
            } else {
                self.pending.extend_from_slice(head);
                emit(&decode_line(&self.pending));
                self.pending.clear();
            }

            rest = &tail[1..];
        }

        self.check_len(rest.len())?;
        self.pending.extend_from_slice(rest);
        Ok(())
    }

    /// Emit a trailing line that had no newline.
    pub(crate) fn finish(&mut self, emit: &mut impl FnMut(&str)) {
        if !self.pending.is_empty() {
            emit(&decode_line(&self.pending));
            self.pending.clear();
        }
    }

    fn check_len(&self, extra: usize) -> Result<(), ScanError> {
        if self.pending.len() + extra > self.limit {
            return Err(ScanError::LineTooLong { limit: self.limit });
        }
        Ok(())
    }
}

fn decode_line(bytes: &[u8]) -> Cow<'_, str> {
    let bytes = bytes.strip_suffix(b"\r").unwrap_or(bytes);
    String::from_utf8_lossy(bytes)
}
