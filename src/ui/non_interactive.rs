//! Non-interactive UI for CI/headless environments.

use crate::error::{HsdemoError, Result};

use super::{
    format_duration, HsdemoTheme, OutputMode, Prompt, PromptResult, PromptType, RunSummary,
    SpinnerHandle, UserInterface,
};

/// UI implementation for non-interactive mode.
///
/// Prompts never block: they answer with their default or fail. Spinners
/// are replaced by one line when a step starts and one when it ends.
pub struct NonInteractiveUI {
    mode: OutputMode,
}

impl NonInteractiveUI {
    /// Create a new non-interactive UI.
    pub fn new(mode: OutputMode) -> Self {
        Self { mode }
    }
}

impl UserInterface for NonInteractiveUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        println!("{}", msg);
    }

    fn success(&mut self, msg: &str) {
        println!("✓ {}", msg);
    }

    fn warning(&mut self, msg: &str) {
        eprintln!("⚠ {}", msg);
    }

    fn error(&mut self, msg: &str) {
        eprintln!("✗ {}", msg);
    }

    fn prompt(&mut self, prompt: &Prompt) -> Result<PromptResult> {
        match (&prompt.prompt_type, &prompt.default) {
            (PromptType::Confirm, Some(default)) => Ok(PromptResult::Bool(matches!(
                default.as_str(),
                "true" | "yes" | "y"
            ))),
            (_, Some(default)) => Ok(PromptResult::String(default.clone())),
            (_, None) => Err(HsdemoError::Prompt {
                message: format!(
                    "Cannot prompt for '{}' in non-interactive mode (no default value)",
                    prompt.key
                ),
            }),
        }
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        let quiet = !self.mode.shows_progress();
        if !quiet {
            println!("  {}", message);
        }
        Box::new(LineSpinner { quiet })
    }

    fn show_header(&mut self, title: &str) {
        if self.mode.shows_progress() {
            println!("\n{}\n", title);
        }
    }

    fn show_transcript(&mut self, step: &str, transcript: &str) {
        eprintln!("    ┌─ Output of {} ", step);
        for line in transcript.lines() {
            eprintln!("    │ {}", line);
        }
        eprintln!("    └────────────────────────────────────");
    }

    fn show_run_summary(&mut self, summary: &RunSummary) {
        println!();
        println!("  ┌─ Summary ──────────────────────────");
        for step in &summary.step_results {
            let right_side = match (&step.duration, &step.detail) {
                (_, Some(detail)) => detail.clone(),
                (Some(d), None) => format_duration(*d),
                (None, None) => String::new(),
            };
            println!(
                "  │ {} {:<32} {}",
                step.status.display_char(),
                step.name,
                right_side
            );
        }
        println!("  ├────────────────────────────────────");
        println!(
            "  │ Total: {} · {} done · {} failed · {} skipped",
            format_duration(summary.total_duration),
            summary.completed(),
            summary.failed(),
            summary.skipped(),
        );
        println!("  └────────────────────────────────────");
    }

    fn is_interactive(&self) -> bool {
        false
    }
}

/// Spinner stand-in that prints the final status line only.
struct LineSpinner {
    quiet: bool,
}

impl SpinnerHandle for LineSpinner {
    fn set_message(&mut self, _msg: &str) {}

    fn suspend(&mut self, f: &mut dyn FnMut()) {
        f();
    }

    fn finish_success(&mut self, msg: &str) {
        if !self.quiet {
            println!("{}", HsdemoTheme::plain().format_success(msg));
        }
    }

    fn finish_error(&mut self, msg: &str) {
        eprintln!("{}", HsdemoTheme::plain().format_error(msg));
    }
}
