//! hsdemo - Hypershield demo environment bring-up on EKS.
//!
//! hsdemo checks for its external tools, resolves credentials from ordered
//! source chains, finds or creates an EKS cluster and runs a fixed plan of
//! `eksdemo`, `helm` and `kubectl` invocations with live progress.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`demo`] - Settings, credential chains, cluster lookups and the plan
//! - [`error`] - Error types and result aliases
//! - [`requirements`] - Preflight check of required programs
//! - [`resolve`] - Value resolution from env, flags, commands and prompts
//! - [`secrets`] - Output masking of credentials
//! - [`shell`] - Process execution with streamed output
//! - [`steps`] - Step definitions and the sequencer
//! - [`ui`] - Interactive prompts, spinners, and terminal output
//!
//! # Example
//!
//! ```
//! use hsdemo::resolve::{Source, SourceKind, ValueResolver};
//! use hsdemo::ui::MockUI;
//!
//! let resolver = ValueResolver::with_env(|_: &str| Err(std::env::VarError::NotPresent));
//! let mut ui = MockUI::new();
//! let value = resolver
//!     .resolve(
//!         "cluster name",
//!         &[Source::env("HSDEMO_CLUSTER"), Source::literal("hsdemo-cluster")],
//!         false,
//!         &mut ui,
//!     )
//!     .unwrap();
//! assert_eq!(value.value(), "hsdemo-cluster");
//! assert_eq!(value.resolved_from(), SourceKind::Literal);
//! ```

pub mod cli;
pub mod demo;
pub mod error;
pub mod requirements;
pub mod resolve;
pub mod secrets;
pub mod shell;
pub mod steps;
pub mod ui;

pub use error::{HsdemoError, Result};
