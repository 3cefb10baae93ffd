//! Mock UI implementation for testing.
//!
//! `MockUI` implements the `UserInterface` trait and captures all
//! interactions for later assertion. It can be configured with
//! pre-determined prompt responses.
//!
//! # Example
//!
//! ```
//! use hsdemo::ui::{MockUI, Prompt, UserInterface};
//!
//! let mut ui = MockUI::new();
//! ui.set_prompt_response("cluster_name", "demo-1");
//!
//! let answer = ui.prompt(&Prompt::input("cluster_name", "Cluster name")).unwrap();
//! assert_eq!(answer.as_string(), "demo-1");
//! assert_eq!(ui.prompts_shown(), &["cluster_name".to_string()]);
//! ```

use std::collections::HashMap;

use crate::error::{HsdemoError, Result};
use crate::shell::Transcript;

use super::status::StatusSink;
use super::{OutputMode, Prompt, PromptResult, PromptType, RunSummary, SpinnerHandle, UserInterface};

/// Mock UI implementation for testing.
///
/// Captures all UI interactions and allows pre-configured prompt responses.
#[derive(Debug, Default)]
pub struct MockUI {
    mode: OutputMode,
    interactive: bool,
    messages: Vec<String>,
    successes: Vec<String>,
    warnings: Vec<String>,
    errors: Vec<String>,
    headers: Vec<String>,
    spinners: Vec<String>,
    transcripts: Vec<(String, String)>,
    summaries: Vec<RunSummary>,
    prompt_responses: HashMap<String, String>,
    failing_prompts: Vec<String>,
    prompts_shown: Vec<String>,
}

impl MockUI {
    /// Create a new MockUI with Normal output mode.
    pub fn new() -> Self {
        Self {
            mode: OutputMode::Normal,
            ..Default::default()
        }
    }

    /// Create a new MockUI with a specific output mode.
    pub fn with_mode(mode: OutputMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    /// Set a response for a prompt key.
    pub fn set_prompt_response(&mut self, key: &str, response: &str) {
        self.prompt_responses
            .insert(key.to_string(), response.to_string());
    }

    /// Make the prompt with this key fail as if the terminal went away.
    pub fn fail_prompt(&mut self, key: &str) {
        self.failing_prompts.push(key.to_string());
    }

    /// Set whether this mock behaves as interactive.
    pub fn set_interactive(&mut self, interactive: bool) {
        self.interactive = interactive;
    }

    /// Get all captured messages.
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Get all captured success messages.
    pub fn successes(&self) -> &[String] {
        &self.successes
    }

    /// Get all captured warning messages.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Get all captured error messages.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Get all captured headers.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Get all spinner messages that were started.
    pub fn spinners(&self) -> &[String] {
        &self.spinners
    }

    /// Get all transcripts shown as (step, text).
    pub fn transcripts(&self) -> &[(String, String)] {
        &self.transcripts
    }

    /// Get all captured run summaries.
    pub fn summaries(&self) -> &[RunSummary] {
        &self.summaries
    }

    /// Get all prompts that were shown (by key).
    pub fn prompts_shown(&self) -> &[String] {
        &self.prompts_shown
    }

    /// Check if a specific message was shown.
    pub fn has_message(&self, msg: &str) -> bool {
        self.messages.iter().any(|m| m.contains(msg))
    }

    /// Check if a specific success was shown.
    pub fn has_success(&self, msg: &str) -> bool {
        self.successes.iter().any(|m| m.contains(msg))
    }

    /// Check if a specific error was shown.
    pub fn has_error(&self, msg: &str) -> bool {
        self.errors.iter().any(|m| m.contains(msg))
    }

    /// Check if a specific warning was shown.
    pub fn has_warning(&self, msg: &str) -> bool {
        self.warnings.iter().any(|m| m.contains(msg))
    }

    fn to_result(prompt: &Prompt, response: String) -> PromptResult {
        if matches!(prompt.prompt_type, PromptType::Confirm) {
            PromptResult::Bool(matches!(response.as_str(), "true" | "yes" | "y" | "1"))
        } else {
            PromptResult::String(response)
        }
    }
}

impl UserInterface for MockUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        self.messages.push(msg.to_string());
    }

    fn success(&mut self, msg: &str) {
        self.successes.push(msg.to_string());
    }

    fn warning(&mut self, msg: &str) {
        self.warnings.push(msg.to_string());
    }

    fn error(&mut self, msg: &str) {
        self.errors.push(msg.to_string());
    }

    fn prompt(&mut self, prompt: &Prompt) -> Result<PromptResult> {
        self.prompts_shown.push(prompt.key.clone());

        if self.failing_prompts.contains(&prompt.key) {
            return Err(HsdemoError::Prompt {
                message: format!("no terminal for '{}'", prompt.key),
            });
        }

        if let Some(response) = self.prompt_responses.get(&prompt.key) {
            return Ok(Self::to_result(prompt, response.clone()));
        }

        if let Some(default) = &prompt.default {
            return Ok(Self::to_result(prompt, default.clone()));
        }

        // Type-appropriate empty answer as a last resort
        Ok(Self::to_result(prompt, String::new()))
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        self.spinners.push(message.to_string());
        Box::new(MockSpinner::new())
    }

    fn show_header(&mut self, title: &str) {
        self.headers.push(title.to_string());
    }

    fn show_transcript(&mut self, step: &str, transcript: &str) {
        self.transcripts
            .push((step.to_string(), transcript.to_string()));
    }

    fn show_run_summary(&mut self, summary: &RunSummary) {
        self.summaries.push(summary.clone());
    }

    fn is_interactive(&self) -> bool {
        self.interactive
    }
}

/// Mock spinner that captures messages.
#[derive(Debug, Default)]
pub struct MockSpinner {
    messages: Vec<String>,
    finish_message: Option<String>,
    succeeded: Option<bool>,
}

impl MockSpinner {
    /// Create a new mock spinner.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all messages set during spinning.
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Get the final finish message.
    pub fn finish_message(&self) -> Option<&str> {
        self.finish_message.as_deref()
    }

    /// `Some(true)` after success, `Some(false)` after error.
    pub fn succeeded(&self) -> Option<bool> {
        self.succeeded
    }
}

impl SpinnerHandle for MockSpinner {
    fn set_message(&mut self, msg: &str) {
        self.messages.push(msg.to_string());
    }

    fn suspend(&mut self, f: &mut dyn FnMut()) {
        f();
    }

    fn finish_success(&mut self, msg: &str) {
        self.finish_message = Some(msg.to_string());
        self.succeeded = Some(true);
    }

    fn finish_error(&mut self, msg: &str) {
        self.finish_message = Some(msg.to_string());
        self.succeeded = Some(false);
    }
}

/// One event received by a [`MockStatus`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusEvent {
    Started(String),
    Line(String, String),
    Transcript(String, String),
    Succeeded(String),
    Failed(String, String),
}

/// Status sink that records every event, for runner tests.
#[derive(Debug, Default)]
pub struct MockStatus {
    events: Vec<StatusEvent>,
}

impl MockStatus {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// All events in arrival order.
    pub fn events(&self) -> &[StatusEvent] {
        &self.events
    }

    /// Output lines received through `update_line`.
    pub fn lines(&self) -> Vec<String> {
        self.events
            .iter()
            .filter_map(|e| match e {
                StatusEvent::Line(_, line) => Some(line.clone()),
                _ => None,
            })
            .collect()
    }

    /// Whether a transcript was flushed.
    pub fn flushed(&self) -> bool {
        self.events
            .iter()
            .any(|e| matches!(e, StatusEvent::Transcript(..)))
    }
}

impl StatusSink for MockStatus {
    fn step_started(&mut self, name: &str) {
        self.events.push(StatusEvent::Started(name.to_string()));
    }

    fn update_line(&mut self, name: &str, line: &str) {
        self.events
            .push(StatusEvent::Line(name.to_string(), line.to_string()));
    }

    fn flush_transcript(&mut self, name: &str, transcript: &Transcript) {
        self.events
            .push(StatusEvent::Transcript(name.to_string(), transcript.text()));
    }

    fn step_succeeded(&mut self, name: &str) {
        self.events.push(StatusEvent::Succeeded(name.to_string()));
    }

    fn step_failed(&mut self, name: &str, reason: &str) {
        self.events
            .push(StatusEvent::Failed(name.to_string(), reason.to_string()));
    }
}
