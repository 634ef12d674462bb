// src/errors.rs

//! Crate-wide error types.
//!
//! - [`InvocationError`] is what the execution harness reports when a single
//!   process invocation fails (could not start, could not be waited on, or
//!   exited non-zero).
//! - [`ScanError`] describes a problem while splitting a stream into lines.
//!   It is only ever logged; it never fails an invocation.
//! - [`DeployexecError`] is the top-level error used by config loading, the
//!   tool wrappers and the CLI.

use std::io;
use std::process::ExitStatus;

use thiserror::Error;

use crate::exec::RunId;

#[derive(Error, Debug)]
pub enum DeployexecError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Invocation(#[from] InvocationError),

    #[error("failed to find {0} installed on your PATH")]
    ToolNotFound(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// A failed invocation of an external process.
#[derive(Error, Debug)]
pub enum InvocationError {
    #[error("failed invocation (run {run_id}): could not start {program}")]
    Spawn {
        run_id: RunId,
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("failed invocation (run {run_id}): could not wait for process")]
    Wait {
        run_id: RunId,
        #[source]
        source: io::Error,
    },

    #[error("failed invocation (run {run_id}): {status}")]
    Exit { run_id: RunId, status: ExitStatus },
}

impl InvocationError {
    pub fn run_id(&self) -> &RunId {
        match self {
            InvocationError::Spawn { run_id, .. }
            | InvocationError::Wait { run_id, .. }
            | InvocationError::Exit { run_id, .. } => run_id,
        }
    }

    /// Exit code of the process, if it ran to completion and was not killed
    /// by a signal.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            InvocationError::Exit { status, .. } => status.code(),
            _ => None,
        }
    }
}

/// A problem splitting an output stream into lines.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("line exceeds scan limit of {limit} bytes")]
    LineTooLong { limit: usize },

    #[error("reading stream: {0}")]
    Read(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, DeployexecError>;
