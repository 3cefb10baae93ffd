//! Per-step status reporting.
//!
//! A [`StatusSink`] receives the progress of one running command: a start
//! event, every output line, the transcript when the command fails, and the
//! final result. [`SpinnerStatus`] renders those events on a
//! [`UserInterface`].

use std::collections::VecDeque;

use crate::secrets::OutputMasker;
use crate::shell::{Transcript, TranscriptLog};

use super::{SpinnerHandle, UserInterface};

/// Number of recent output lines shown under a running spinner.
const LIVE_LINES: usize = 3;

/// Longest output line shown under a spinner before truncation.
const LIVE_LINE_WIDTH: usize = 72;

/// Destination for progress of a running step.
pub trait StatusSink {
    /// The step has started.
    fn step_started(&mut self, name: &str);

    /// The step emitted an output line.
    fn update_line(&mut self, name: &str, line: &str);

    /// Write the accumulated transcript to the persistent log surface.
    fn flush_transcript(&mut self, name: &str, transcript: &Transcript);

    /// The step finished successfully.
    fn step_succeeded(&mut self, name: &str);

    /// The step failed.
    fn step_failed(&mut self, name: &str, reason: &str);
}

/// Status sink that drives a spinner on a [`UserInterface`].
///
/// The spinner shows the step name followed by the last few output lines.
/// In verbose mode every line is also printed above the spinner.
pub struct SpinnerStatus<'a> {
    ui: &'a mut dyn UserInterface,
    spinner: Option<Box<dyn SpinnerHandle>>,
    recent: VecDeque<String>,
    masker: Option<&'a OutputMasker>,
    log: Option<&'a TranscriptLog>,
}

impl<'a> SpinnerStatus<'a> {
    /// Create a sink for one step.
    pub fn new(ui: &'a mut dyn UserInterface) -> Self {
        Self {
            ui,
            spinner: None,
            recent: VecDeque::new(),
            masker: None,
            log: None,
        }
    }

    /// Mask secret values in every line and transcript shown.
    pub fn with_masker(mut self, masker: &'a OutputMasker) -> Self {
        self.masker = Some(masker);
        self
    }

    /// Also append failed transcripts to a log file.
    pub fn with_log(mut self, log: Option<&'a TranscriptLog>) -> Self {
        self.log = log;
        self
    }

    fn masked(&self, text: &str) -> String {
        match self.masker {
            Some(masker) => masker.mask(text),
            None => text.to_string(),
        }
    }

    fn live_message(&self, name: &str) -> String {
        let mut msg = name.to_string();
        for line in &self.recent {
            msg.push_str("\n    » ");
            msg.push_str(line);
        }
        msg
    }
}

impl StatusSink for SpinnerStatus<'_> {
    fn step_started(&mut self, name: &str) {
        self.recent.clear();
        self.spinner = Some(self.ui.start_spinner(name));
    }

    fn update_line(&mut self, name: &str, line: &str) {
        let text = self.masked(line.trim_end());
        if text.is_empty() {
            return;
        }

        if self.ui.output_mode().shows_command_output() {
            let ui = &mut *self.ui;
            let printed = format!("    {}", text);
            match self.spinner.as_mut() {
                Some(spinner) => spinner.suspend(&mut || ui.message(&printed)),
                None => ui.message(&printed),
            }
        }

        let display = if text.chars().count() > LIVE_LINE_WIDTH {
            let cut: String = text.chars().take(LIVE_LINE_WIDTH - 3).collect();
            format!("{}...", cut)
        } else {
            text
        };
        self.recent.push_back(display);
        while self.recent.len() > LIVE_LINES {
            self.recent.pop_front();
        }

        let msg = self.live_message(name);
        if let Some(spinner) = self.spinner.as_mut() {
            spinner.set_message(&msg);
        }
    }

    fn flush_transcript(&mut self, name: &str, transcript: &Transcript) {
        let text = self.masked(&transcript.text());

        if let Some(log) = self.log {
            if let Err(e) = log.append(name, &text) {
                tracing::warn!("Could not write transcript log {}: {}", log.path().display(), e);
            }
        }

        let ui = &mut *self.ui;
        match self.spinner.as_mut() {
            Some(spinner) => spinner.suspend(&mut || ui.show_transcript(name, &text)),
            None => ui.show_transcript(name, &text),
        }
    }

    fn step_succeeded(&mut self, name: &str) {
        match self.spinner.take() {
            Some(mut spinner) => spinner.finish_success(name),
            None => self.ui.success(name),
        }
    }

    fn step_failed(&mut self, name: &str, reason: &str) {
        let msg = format!("{} {}", name, self.masked(reason));
        match self.spinner.take() {
            Some(mut spinner) => spinner.finish_error(&msg),
            None => self.ui.error(&msg),
        }
    }
}
