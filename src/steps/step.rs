//! Step definitions.

use crate::shell::CommandSpec;

/// What a failed command means for the rest of the plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Stop the run.
    Fatal,
    /// Warn and continue with the next step.
    Soft,
}

/// One entry of the plan.
#[derive(Debug, Clone)]
pub enum Step {
    Exec(ExecStep),
    Confirm(ConfirmStep),
}

/// Run an external program.
#[derive(Debug, Clone)]
pub struct ExecStep {
    /// Display name.
    pub name: String,
    /// Program, arguments and stdin payload.
    pub command: CommandSpec,
    pub policy: FailurePolicy,
}

/// Ask the operator before continuing.
#[derive(Debug, Clone)]
pub struct ConfirmStep {
    /// Display name.
    pub name: String,
    pub question: String,
    /// Shown before the question.
    pub warning: Option<String>,
}

impl Step {
    /// A step whose failure stops the run.
    pub fn fatal(name: impl Into<String>, command: CommandSpec) -> Self {
        Self::Exec(ExecStep {
            name: name.into(),
            command,
            policy: FailurePolicy::Fatal,
        })
    }

    /// A step whose failure is only reported.
    pub fn soft(name: impl Into<String>, command: CommandSpec) -> Self {
        Self::Exec(ExecStep {
            name: name.into(),
            command,
            policy: FailurePolicy::Soft,
        })
    }

    /// A yes/no gate.
    pub fn confirm(
        name: impl Into<String>,
        question: impl Into<String>,
        warning: Option<String>,
    ) -> Self {
        Self::Confirm(ConfirmStep {
            name: name.into(),
            question: question.into(),
            warning,
        })
    }

    /// Display name.
    pub fn name(&self) -> &str {
        match self {
            Self::Exec(step) => &step.name,
            Self::Confirm(step) => &step.name,
        }
    }

    /// The command, for exec steps.
    pub fn command(&self) -> Option<&CommandSpec> {
        match self {
            Self::Exec(step) => Some(&step.command),
            Self::Confirm(_) => None,
        }
    }
}
