//! Command-line interface for hsdemo.
//!
//! # Architecture
//!
//! - [`args`] - Argument definitions using clap derive macros
//! - [`commands`] - Command implementations

pub mod args;
pub mod commands;

pub use args::{Cli, UpArgs};
pub use commands::{Command, CommandDispatcher, CommandResult, UpCommand};
