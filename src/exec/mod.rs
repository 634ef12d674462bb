// src/exec/mod.rs

//! Process execution harness.
//!
//! Runs a single external process per call, using `tokio::process::Command`,
//! while draining its stdout and stderr concurrently. Every byte is kept in
//! a per-stream buffer and every line is logged (or handed to a caller's
//! [`LineSink`]) under a fresh [`RunId`].
//!
//! - [`command`] describes the process to start and resolves binaries on `PATH`.
//! - [`run_id`] generates correlation ids.
//! - [`logger`] is the invocation-scoped logging handle.
//! - [`sink`] defines custom line handling.
//! - [`drain`] tees one stream into a buffer while splitting it into lines.
//! - [`harness`] ties it together in [`run`].

pub mod command;
pub mod drain;
pub mod harness;
pub mod logger;
pub mod run_id;
pub mod sink;

pub use command::{ProcessSpec, find_in_path};
pub use harness::{RunOutput, run};
pub use logger::{InvocationLogger, StreamKind};
pub use run_id::RunId;
pub use sink::{LineSink, StripAnsiSink};
