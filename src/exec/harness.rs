// src/exec/harness.rs

//! Run one external process while capturing and logging its output.

use std::borrow::Cow;
use std::process::ExitStatus;

use tokio::io::AsyncRead;
use tracing::Instrument;

use crate::errors::InvocationError;

use super::command::ProcessSpec;
use super::drain::{MAX_LINE_BYTES, drain_stream};
use super::logger::{InvocationLogger, StreamKind};
use super::run_id::RunId;
use super::sink::LineSink;

/// Everything captured from one invocation.
///
/// `stdout` and `stderr` are complete on every path, including failures, so
/// callers can inspect what the process wrote before it failed. `outcome` is
/// the authority on success.
#[derive(Debug)]
pub struct RunOutput {
    pub run_id: RunId,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    pub outcome: Result<ExitStatus, InvocationError>,
}

impl RunOutput {
    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }

    pub fn stdout_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.stdout)
    }

    pub fn stderr_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.stderr)
    }

    /// Drop the captured output on failure and keep only the error.
    pub fn into_result(self) -> Result<(Vec<u8>, Vec<u8>), InvocationError> {
        self.outcome.map(|_| (self.stdout, self.stderr))
    }
}

/// Invoke `spec`, draining stdout and stderr concurrently until the process
/// exits and both streams reach end-of-stream.
///
/// Every output line is either logged at info level or handed to `sink`.
/// There is no timeout: a process that never exits keeps this future
/// pending. Dropping the future kills the child.
pub async fn run(spec: &ProcessSpec, sink: Option<&dyn LineSink>) -> RunOutput {
    let run_id = RunId::new();
    let logger = InvocationLogger::new(run_id.clone());
    logger.invoking(spec);

    let mut child = match spec.to_command().spawn() {
        Ok(child) => child,
        Err(source) => {
            let err = InvocationError::Spawn {
                run_id: run_id.clone(),
                program: spec.program_display(),
                source,
            };
            logger.error(&err, "failed invocation");
            return RunOutput {
                run_id,
                stdout: Vec::new(),
                stderr: Vec::new(),
                outcome: Err(err),
            };
        }
    };

    let stdout = child.stdout.take();
    let stderr = child.stderr.take();

    // The pipes hit end-of-stream once the child (and anything it forked
    // that inherited them) has exited, so the drains finish after the wait.
    let (status, stdout, stderr) = async {
        tokio::join!(
            child.wait(),
            drain_optional(stdout, StreamKind::Stdout, &logger, sink),
            drain_optional(stderr, StreamKind::Stderr, &logger, sink),
        )
    }
    .instrument(logger.span().clone())
    .await;

    let outcome = match status {
        Ok(status) if status.success() => Ok(status),
        Ok(status) => Err(InvocationError::Exit {
            run_id: run_id.clone(),
            status,
        }),
        Err(source) => Err(InvocationError::Wait {
            run_id: run_id.clone(),
            source,
        }),
    };

    if let Err(err) = &outcome {
        logger.error(err, "failed invocation");
    }

    RunOutput {
        run_id,
        stdout,
        stderr,
        outcome,
    }
}

async fn drain_optional<R>(
    reader: Option<R>,
    stream: StreamKind,
    logger: &InvocationLogger,
    sink: Option<&dyn LineSink>,
) -> Vec<u8>
where
    R: AsyncRead + Unpin,
{
    match reader {
        Some(reader) => drain_stream(reader, stream, logger, sink, MAX_LINE_BYTES).await,
        None => Vec::new(),
    }
}
