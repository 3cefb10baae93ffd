//! Linear step sequencing.

use std::time::{Duration, Instant};

use crate::error::HsdemoError;
use crate::secrets::OutputMasker;
use crate::shell::{CommandSpec, ExecutionResult, ProcessRunner, TranscriptLog};
use crate::ui::{Prompt, RunSummary, SpinnerStatus, StepSummary, UserInterface};

use super::status::StepStatus;
use super::step::{ConfirmStep, ExecStep, FailurePolicy, Step};

/// Why a run stopped early.
#[derive(Debug)]
pub enum AbortCause {
    /// A fatal step failed.
    Failed(HsdemoError),
    /// The operator answered "no".
    Declined,
    /// The confirmation prompt itself failed.
    Prompt(HsdemoError),
}

/// How a sequence ended.
#[derive(Debug)]
pub enum SequenceOutcome {
    Completed,
    Aborted { step: String, cause: AbortCause },
}

/// Per-step record.
#[derive(Debug, Clone)]
pub struct StepRecord {
    pub name: String,
    pub status: StepStatus,
    pub duration: Option<Duration>,
    pub detail: Option<String>,
}

/// Outcome of a sequence plus the status of every step.
#[derive(Debug)]
pub struct SequenceReport {
    pub outcome: SequenceOutcome,
    pub steps: Vec<StepRecord>,
    pub total_duration: Duration,
}

impl SequenceReport {
    /// Whether every step was reached.
    pub fn is_completed(&self) -> bool {
        matches!(self.outcome, SequenceOutcome::Completed)
    }

    /// Status of the step with this name.
    pub fn status_of(&self, name: &str) -> Option<StepStatus> {
        self.steps.iter().find(|s| s.name == name).map(|s| s.status)
    }

    /// Convert an abort into the error it stands for.
    pub fn into_result(self) -> crate::error::Result<()> {
        match self.outcome {
            SequenceOutcome::Completed => Ok(()),
            SequenceOutcome::Aborted { step, cause } => Err(match cause {
                AbortCause::Failed(error) => HsdemoError::StepFailed {
                    step,
                    message: error.to_string(),
                },
                AbortCause::Declined => HsdemoError::UserDeclined { step },
                AbortCause::Prompt(error) => error,
            }),
        }
    }

    /// Build the end-of-run summary.
    pub fn to_summary(&self) -> RunSummary {
        RunSummary {
            step_results: self
                .steps
                .iter()
                .map(|s| StepSummary {
                    name: s.name.clone(),
                    status: s.status,
                    duration: s.duration,
                    detail: s.detail.clone(),
                })
                .collect(),
            total_duration: self.total_duration,
            success: self.is_completed(),
            aborted_at: match &self.outcome {
                SequenceOutcome::Completed => None,
                SequenceOutcome::Aborted { step, .. } => Some(step.clone()),
            },
        }
    }
}

/// Result of one step, before the policy is applied.
enum StepOutcome {
    Advance,
    SoftFailure(HsdemoError),
    Abort(AbortCause),
}

/// Runs a plan one step at a time.
///
/// Exec steps go through the [`ProcessRunner`]; confirm steps through the
/// [`UserInterface`]. This is the only place a failure policy is applied.
pub struct StepSequencer<'a> {
    ui: &'a mut dyn UserInterface,
    runner: &'a dyn ProcessRunner,
    masker: Option<&'a OutputMasker>,
    log: Option<&'a TranscriptLog>,
}

impl<'a> StepSequencer<'a> {
    pub fn new(ui: &'a mut dyn UserInterface, runner: &'a dyn ProcessRunner) -> Self {
        Self {
            ui,
            runner,
            masker: None,
            log: None,
        }
    }

    /// Mask secrets in live output, transcripts and logged command lines.
    pub fn with_masker(mut self, masker: &'a OutputMasker) -> Self {
        self.masker = Some(masker);
        self
    }

    /// Append failed transcripts to a log file.
    pub fn with_transcript_log(mut self, log: Option<&'a TranscriptLog>) -> Self {
        self.log = log;
        self
    }

    /// Run `steps` in order until one aborts.
    pub fn run(&mut self, steps: &[Step], interactive: bool) -> SequenceReport {
        let start = Instant::now();
        let mut records: Vec<StepRecord> = steps
            .iter()
            .map(|step| StepRecord {
                name: step.name().to_string(),
                status: StepStatus::Pending,
                duration: None,
                detail: None,
            })
            .collect();

        for (index, step) in steps.iter().enumerate() {
            let step_start = Instant::now();
            let outcome = match step {
                Step::Exec(exec) => self.run_exec(exec),
                Step::Confirm(confirm) => self.run_confirm(confirm, interactive),
            };

            let record = &mut records[index];
            if step.command().is_some() {
                record.duration = Some(step_start.elapsed());
            }

            match outcome {
                StepOutcome::Advance => record.status = StepStatus::Completed,
                StepOutcome::SoftFailure(error) => {
                    record.status = StepStatus::Failed;
                    record.detail = Some(self.masked(&error.to_string()));
                    tracing::warn!("{} failed, continuing: {}", step.name(), error);
                    self.ui
                        .warning(&format!("{} failed; continuing with the next step", step.name()));
                }
                StepOutcome::Abort(cause) => {
                    record.status = StepStatus::Failed;
                    if matches!(cause, AbortCause::Declined) {
                        record.detail = Some("declined".to_string());
                    }
                    for later in records.iter_mut().skip(index + 1) {
                        later.status = StepStatus::Skipped;
                    }
                    tracing::info!("Run stopped at {}", step.name());
                    return SequenceReport {
                        outcome: SequenceOutcome::Aborted {
                            step: step.name().to_string(),
                            cause,
                        },
                        steps: records,
                        total_duration: start.elapsed(),
                    };
                }
            }
        }

        SequenceReport {
            outcome: SequenceOutcome::Completed,
            steps: records,
            total_duration: start.elapsed(),
        }
    }

    fn run_exec(&mut self, step: &ExecStep) -> StepOutcome {
        let command = &step.command;
        tracing::info!("{}: {}", step.name, self.command_line(command));

        let result = {
            let mut sink = SpinnerStatus::new(&mut *self.ui).with_log(self.log);
            if let Some(masker) = self.masker {
                sink = sink.with_masker(masker);
            }
            self.runner.run(&step.name, command, &mut sink)
        };

        match (result, step.policy) {
            (ExecutionResult::Success { .. }, _) => StepOutcome::Advance,
            (ExecutionResult::Failure { error, .. }, FailurePolicy::Soft) => {
                StepOutcome::SoftFailure(error)
            }
            (ExecutionResult::Failure { error, .. }, FailurePolicy::Fatal) => {
                StepOutcome::Abort(AbortCause::Failed(error))
            }
        }
    }

    fn run_confirm(&mut self, step: &ConfirmStep, interactive: bool) -> StepOutcome {
        if !interactive {
            tracing::info!("Auto-accepting '{}' in non-interactive mode", step.question);
            self.ui
                .message(&format!("{} (accepted automatically)", step.name));
            return StepOutcome::Advance;
        }

        if let Some(warning) = &step.warning {
            self.ui.warning(warning);
        }

        let prompt = Prompt::confirm(step.name.clone(), step.question.clone(), false);
        match self.ui.prompt(&prompt) {
            Ok(answer) if answer.as_bool() == Some(true) => StepOutcome::Advance,
            Ok(_) => {
                self.ui.warning(&format!("{} declined", step.name));
                StepOutcome::Abort(AbortCause::Declined)
            }
            Err(error) => StepOutcome::Abort(AbortCause::Prompt(error)),
        }
    }

    /// The command line as logged, with secrets masked.
    fn command_line(&self, command: &CommandSpec) -> String {
        let shown = match self.masker {
            Some(masker) => masker.mask_command(&command.program, &command.args),
            None => format!("{} {}", command.program, command.args.join(" ")),
        };
        shown.trim_end().to_string()
    }

    fn masked(&self, text: &str) -> String {
        match self.masker {
            Some(masker) => masker.mask(text),
            None => text.to_string(),
        }
    }
}
