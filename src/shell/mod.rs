//! External process execution.
//!
//! - [`ProcessRunner`] runs one command to completion, streaming its merged
//!   stdout/stderr to a [`StatusSink`](crate::ui::StatusSink)
//! - [`capture`] runs a short lookup command and returns its output
//! - [`Transcript`] is the ordered output of one invocation

pub mod command;
pub mod platform;
pub mod transcript;

pub use command::{
    capture, CommandOutput, CommandSpec, ExecutionResult, ProcessRunner, SystemRunner,
};
pub use platform::{is_ci, is_ci_with};
pub use transcript::{Transcript, TranscriptLog};
