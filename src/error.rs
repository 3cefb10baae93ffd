//! Error types for hsdemo operations.
//!
//! This module defines [`HsdemoError`], the primary error type used throughout
//! the application, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Process and resolution failures are returned as typed variants, never panics
//! - Use `anyhow::Error` (via `HsdemoError::Other`) for parse failures with context
//! - The step sequencer is the only place a failure is turned into an abort

use thiserror::Error;

/// Core error type for hsdemo operations.
#[derive(Debug, Error)]
pub enum HsdemoError {
    /// One or more required programs are not on the search path.
    #[error("Missing required program(s): {}", .programs.join(", "))]
    MissingDependency { programs: Vec<String> },

    /// No source produced a value for a required setting.
    #[error("Could not resolve {name}: {}", .attempts.join("; "))]
    Unresolved { name: String, attempts: Vec<String> },

    /// The OS failed to start a child process.
    #[error("Failed to start '{program}': {source}")]
    ProcessSpawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Reading the child's combined output failed.
    #[error("Failed reading output of '{program}': {source}")]
    ProcessStream {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The child exited with a non-zero status (None if killed by signal).
    #[error("'{program}' exited with code {}", exit_code_label(.code))]
    ProcessExit { program: String, code: Option<i32> },

    /// Waiting for the child to terminate failed.
    #[error("Failed waiting for '{program}': {source}")]
    ProcessWait {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The operator answered "no" at a confirmation gate.
    #[error("Stopped at '{step}': declined by user")]
    UserDeclined { step: String },

    /// A step with a fatal policy failed.
    #[error("Step '{step}' failed: {message}")]
    StepFailed { step: String, message: String },

    /// There is no cluster to deploy into.
    #[error("No cluster '{name}' available: {message}")]
    ClusterUnavailable { name: String, message: String },

    /// Interactive input could not be obtained.
    #[error("Prompt failed: {message}")]
    Prompt { message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl HsdemoError {
    /// Whether this error ends the run as a normal early termination
    /// rather than an application error.
    pub fn is_user_declined(&self) -> bool {
        matches!(self, Self::UserDeclined { .. })
    }
}

fn exit_code_label(code: &Option<i32>) -> String {
    match code {
        Some(c) => c.to_string(),
        None => "none (signal)".to_string(),
    }
}

/// Result type alias for hsdemo operations.
pub type Result<T> = std::result::Result<T, HsdemoError>;
