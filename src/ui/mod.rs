//! Interactive user interface components.
//!
//! This module provides:
//! - [`UserInterface`] trait for UI abstraction
//! - [`TerminalUI`] for interactive terminal usage
//! - [`NonInteractiveUI`] for CI/headless environments
//! - [`StatusSink`] and [`SpinnerStatus`], the per-step progress surface
//! - Prompts, spinners and the run summary
//!
//! # Example
//!
//! ```
//! use hsdemo::ui::{create_ui, OutputMode};
//!
//! // Use non-interactive mode for testability
//! let mut ui = create_ui(false, OutputMode::Quiet);
//! ui.show_header("Tools");
//! ui.success("kubectl");
//! ```

pub mod mock;
pub mod non_interactive;
pub mod output;
pub mod prompts;
pub mod spinner;
pub mod status;
pub mod terminal;
pub mod theme;

pub use mock::{MockSpinner, MockStatus, MockUI, StatusEvent};
pub use non_interactive::NonInteractiveUI;
pub use output::{format_duration, OutputMode};
pub use prompts::prompt_user;
pub use spinner::ProgressSpinner;
pub use status::{SpinnerStatus, StatusSink};
pub use terminal::{create_ui, TerminalUI};
pub use theme::{should_use_colors, HsdemoTheme};

use std::time::Duration;

use crate::error::Result;
use crate::steps::StepStatus;

/// Trait for user interface interactions.
///
/// This trait allows mocking the UI in tests.
pub trait UserInterface {
    /// Get the current output mode.
    fn output_mode(&self) -> OutputMode;

    /// Display a message to the user.
    fn message(&mut self, msg: &str);

    /// Display a success message.
    fn success(&mut self, msg: &str);

    /// Display a warning message.
    fn warning(&mut self, msg: &str);

    /// Display an error message.
    fn error(&mut self, msg: &str);

    /// Show a prompt and get user input.
    fn prompt(&mut self, prompt: &Prompt) -> Result<PromptResult>;

    /// Start a spinner for an operation.
    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle>;

    /// Show a section header.
    fn show_header(&mut self, title: &str);

    /// Show the captured output of a command that failed.
    ///
    /// This is the persistent log surface: unlike spinner updates, what is
    /// written here stays in the scrollback.
    fn show_transcript(&mut self, step: &str, transcript: &str);

    /// Show the end-of-run summary.
    fn show_run_summary(&mut self, summary: &RunSummary);

    /// Check if running in interactive mode.
    fn is_interactive(&self) -> bool;
}

/// Handle for controlling a spinner.
pub trait SpinnerHandle {
    /// Update the spinner message.
    fn set_message(&mut self, msg: &str);

    /// Hide the spinner while `f` writes to the terminal.
    fn suspend(&mut self, f: &mut dyn FnMut());

    /// Mark the operation as successful.
    fn finish_success(&mut self, msg: &str);

    /// Mark the operation as failed.
    fn finish_error(&mut self, msg: &str);
}

/// A prompt to show to the user.
#[derive(Debug, Clone)]
pub struct Prompt {
    /// Unique key for the prompt (used by mocks and logs).
    pub key: String,
    /// The question to display.
    pub question: String,
    /// The type of prompt.
    pub prompt_type: PromptType,
    /// Default value if user just presses enter.
    pub default: Option<String>,
}

impl Prompt {
    /// Create a yes/no prompt.
    pub fn confirm(key: impl Into<String>, question: impl Into<String>, default: bool) -> Self {
        Self {
            key: key.into(),
            question: question.into(),
            prompt_type: PromptType::Confirm,
            default: Some(default.to_string()),
        }
    }

    /// Create a single-line text prompt.
    pub fn input(key: impl Into<String>, question: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            question: question.into(),
            prompt_type: PromptType::Input,
            default: None,
        }
    }

    /// Set the default answer.
    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }
}

/// The type of prompt.
#[derive(Debug, Clone)]
pub enum PromptType {
    /// Yes/no confirmation.
    Confirm,
    /// Free-form single-line text input.
    Input,
    /// Free-form text spanning several lines, ended by an empty line.
    Multiline,
    /// Select one from a list of options.
    Select { options: Vec<PromptOption> },
}

/// An option in a select prompt.
#[derive(Debug, Clone)]
pub struct PromptOption {
    /// Display label.
    pub label: String,
    /// Value returned when selected.
    pub value: String,
}

/// Result of a prompt.
#[derive(Debug, Clone)]
pub enum PromptResult {
    /// Boolean result from confirm.
    Bool(bool),
    /// String result from input or select.
    String(String),
}

impl PromptResult {
    /// Get as string.
    pub fn as_string(&self) -> String {
        match self {
            Self::Bool(b) => b.to_string(),
            Self::String(s) => s.clone(),
        }
    }

    /// Get as bool if this is a Bool result.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            Self::String(_) => None,
        }
    }
}

/// One line of the end-of-run summary.
#[derive(Debug, Clone)]
pub struct StepSummary {
    /// Step display name.
    pub name: String,
    /// Final status.
    pub status: StepStatus,
    /// Wall time, for steps that ran a command.
    pub duration: Option<Duration>,
    /// Short note, e.g. the failure reason of a soft failure.
    pub detail: Option<String>,
}

/// End-of-run summary.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Per-step lines, in plan order.
    pub step_results: Vec<StepSummary>,
    /// Total wall time.
    pub total_duration: Duration,
    /// Whether every step was reached.
    pub success: bool,
    /// Name of the step that stopped the run, if any.
    pub aborted_at: Option<String>,
}

impl RunSummary {
    /// Number of steps that ran to success.
    pub fn completed(&self) -> usize {
        self.count(StepStatus::Completed)
    }

    /// Number of steps that failed (soft or fatal).
    pub fn failed(&self) -> usize {
        self.count(StepStatus::Failed)
    }

    /// Number of steps never reached.
    pub fn skipped(&self) -> usize {
        self.count(StepStatus::Skipped)
    }

    fn count(&self, status: StepStatus) -> usize {
        self.step_results
            .iter()
            .filter(|s| s.status == status)
            .count()
    }
}
