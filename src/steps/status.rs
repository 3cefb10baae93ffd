//! Step status tracking.

/// Status of a step in the plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    /// Step has not been reached.
    Pending,

    /// Step completed successfully (or a confirmation was accepted).
    Completed,

    /// Step failed or was declined.
    Failed,

    /// Step was never started because an earlier step aborted the run.
    Skipped,
}

impl StepStatus {
    /// Get a display character for this status.
    pub fn display_char(&self) -> char {
        match self {
            StepStatus::Pending => '○',
            StepStatus::Completed => '✓',
            StepStatus::Failed => '✗',
            StepStatus::Skipped => '⊘',
        }
    }
}
