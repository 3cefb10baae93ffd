//! Command implementations.
//!
//! - [`dispatcher`] - [`Command`] trait and [`CommandResult`]
//! - [`up`] - the bring-up

pub mod dispatcher;
pub mod up;

pub use dispatcher::{Command, CommandDispatcher, CommandResult};
pub use up::UpCommand;
