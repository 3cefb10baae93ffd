//! Required program detection.
//!
//! - [`probe`] - PATH parsing and executable lookup
//! - [`preflight`] - checks every required program before the run starts

pub mod preflight;
pub mod probe;

pub use preflight::{Preflight, REQUIRED_PROGRAMS};
pub use probe::{is_executable, parse_system_path, resolve_tool_path};
