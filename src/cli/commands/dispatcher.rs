//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for building the command from parsed arguments

use crate::cli::args::Cli;
use crate::error::Result;
use crate::shell::is_ci;
use crate::ui::UserInterface;

use super::up::UpCommand;

/// Trait for command implementations.
pub trait Command {
    /// Execute the command.
    ///
    /// # Arguments
    ///
    /// * `ui` - User interface for displaying output and prompts
    ///
    /// # Returns
    ///
    /// A [`CommandResult`] indicating success/failure and exit code.
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

/// Builds and runs the command for parsed arguments.
#[derive(Debug, Default)]
pub struct CommandDispatcher;

impl CommandDispatcher {
    pub fn new() -> Self {
        Self
    }

    /// Whether the run may prompt: no `--non-interactive` and not in CI.
    pub fn is_interactive(cli: &Cli) -> bool {
        !cli.up.non_interactive && !is_ci()
    }

    /// Execute the bring-up described by `cli`.
    pub fn dispatch(&self, cli: &Cli, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let settings = cli.up.to_settings(Self::is_interactive(cli) && ui.is_interactive());
        UpCommand::new(settings)
            .with_log_file(cli.up.log_file.clone())
            .execute(ui)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_result_success() {
        let result = CommandResult::success();
        assert!(result.success);
        assert_eq!(result.exit_code, 0);
    }

    #[test]
    fn command_result_failure() {
        let result = CommandResult::failure(1);
        assert!(!result.success);
        assert_eq!(result.exit_code, 1);
    }

    #[test]
    fn non_interactive_flag_disables_prompts() {
        use clap::Parser;
        let cli = Cli::try_parse_from(["hsdemo", "--non-interactive"]).unwrap();
        assert!(!CommandDispatcher::is_interactive(&cli));
    }
}
