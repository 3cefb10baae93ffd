//! Resolution of configuration values from ordered source chains.
//!
//! A value is looked up in each [`Source`] in turn: environment variables,
//! literals (usually command-line flags), command output and finally
//! interactive prompts. The first non-empty answer wins and becomes an
//! immutable [`ConfigValue`].

pub mod resolver;
pub mod source;
pub mod value;

pub use resolver::{Request, ValueResolver};
pub use source::{Source, SourceKind};
pub use value::ConfigValue;
