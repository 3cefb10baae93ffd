//! Step definitions and the linear sequencer.
//!
//! - [`Step`] - an exec step (with a [`FailurePolicy`]) or a confirmation gate
//! - [`StepSequencer`] - runs a plan in order and stops at the first abort
//! - [`SequenceReport`] - the outcome plus the status of every step
//!
//! # Example
//!
//! ```no_run
//! use hsdemo::shell::{CommandSpec, SystemRunner};
//! use hsdemo::steps::{Step, StepSequencer};
//! use hsdemo::ui::{create_ui, OutputMode};
//!
//! let steps = vec![
//!     Step::confirm("create cluster", "Create a new cluster?", None),
//!     Step::fatal("list nodes", CommandSpec::new("kubectl").args(["get", "nodes"])),
//! ];
//!
//! let mut ui = create_ui(true, OutputMode::Normal);
//! let report = StepSequencer::new(ui.as_mut(), &SystemRunner).run(&steps, true);
//! if !report.is_completed() {
//!     std::process::exit(1);
//! }
//! ```

pub mod sequencer;
pub mod status;
pub mod step;

pub use sequencer::{AbortCause, SequenceOutcome, SequenceReport, StepRecord, StepSequencer};
pub use status::StepStatus;
pub use step::{ConfirmStep, ExecStep, FailurePolicy, Step};
