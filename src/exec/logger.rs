// src/exec/logger.rs

//! Logger scoped to a single invocation.

use std::error::Error as StdError;

use tracing::{Span, error, info, info_span};

use super::command::ProcessSpec;
use super::run_id::RunId;

/// Which output stream of the child a line or error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamKind {
    Stdout,
    Stderr,
}

impl StreamKind {
    pub fn as_str(self) -> &'static str {
        match self {
            StreamKind::Stdout => "stdout",
            StreamKind::Stderr => "stderr",
        }
    }
}

/// Handle passed to drains and line sinks.
///
/// Wraps an `invocation` span carrying the `run` field. The harness runs
/// the drains and the process wait inside that span, so any event logged
/// during the invocation (including plain `tracing` macros in a sink) is
/// attributed to the run.
#[derive(Debug, Clone)]
pub struct InvocationLogger {
    run_id: RunId,
    span: Span,
}

impl InvocationLogger {
    pub fn new(run_id: RunId) -> Self {
        let span = info_span!("invocation", run = %run_id);
        Self { run_id, span }
    }

    pub fn run_id(&self) -> &RunId {
        &self.run_id
    }

    pub fn span(&self) -> &Span {
        &self.span
    }

    /// Announce the start of an invocation.
    pub fn invoking(&self, spec: &ProcessSpec) {
        info!(
            parent: &self.span,
            cmd = %spec.program_display(),
            args = ?spec.args_display(),
            "Invoking command"
        );
    }

    pub fn info(&self, message: &str) {
        info!(parent: &self.span, "{message}");
    }

    /// Default handling of one output line.
    pub fn line(&self, stream: StreamKind, line: &str) {
        info!(parent: &self.span, stream = stream.as_str(), "{line}");
    }

    pub fn error(&self, err: &(dyn StdError + 'static), message: &str) {
        error!(parent: &self.span, error = %err, "{message}");
    }
}
