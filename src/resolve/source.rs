//! Value sources.

use std::fmt;

/// One place a configuration value may come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// An environment variable; unset and empty are the same.
    Env(String),
    /// A fixed value, typically a flag. Empty means "not given".
    Literal(String),
    /// The trimmed stdout of a command that exits zero.
    Command { program: String, args: Vec<String> },
    /// Ask the operator. Only available in interactive runs.
    Prompt {
        label: String,
        multiline: bool,
        default: Option<String>,
    },
}

impl Source {
    /// Environment variable source.
    pub fn env(name: impl Into<String>) -> Self {
        Self::Env(name.into())
    }

    /// Literal source. An unset optional flag becomes an empty literal.
    pub fn literal(value: impl Into<String>) -> Self {
        Self::Literal(value.into())
    }

    /// Literal source from an optional flag value.
    pub fn flag(value: Option<&str>) -> Self {
        Self::Literal(value.unwrap_or_default().to_string())
    }

    /// Command output source.
    pub fn command<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Command {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Single-line prompt.
    pub fn prompt(label: impl Into<String>) -> Self {
        Self::Prompt {
            label: label.into(),
            multiline: false,
            default: None,
        }
    }

    /// Single-line prompt pre-filled with `default`.
    pub fn prompt_with_default(label: impl Into<String>, default: impl Into<String>) -> Self {
        Self::Prompt {
            label: label.into(),
            multiline: false,
            default: Some(default.into()),
        }
    }

    /// Multi-line prompt; lines are joined until an empty line.
    pub fn multiline_prompt(label: impl Into<String>) -> Self {
        Self::Prompt {
            label: label.into(),
            multiline: true,
            default: None,
        }
    }

    /// The kind of this source.
    pub fn kind(&self) -> SourceKind {
        match self {
            Self::Env(_) => SourceKind::Env,
            Self::Literal(_) => SourceKind::Literal,
            Self::Command { .. } => SourceKind::Command,
            Self::Prompt { .. } => SourceKind::Prompt,
        }
    }
}

/// Names the source without its value: literals and prompts may hold secrets.
impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Env(var) => write!(f, "environment {}", var),
            Self::Command { program, args } if args.is_empty() => {
                write!(f, "command `{}`", program)
            }
            Self::Command { program, args } => {
                write!(f, "command `{} {}`", program, args.join(" "))
            }
            other => write!(f, "{}", other.kind()),
        }
    }
}

/// Where a resolved value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    Env,
    Literal,
    Command,
    Prompt,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Env => write!(f, "environment"),
            Self::Literal => write!(f, "flag"),
            Self::Command => write!(f, "command"),
            Self::Prompt => write!(f, "prompt"),
        }
    }
}
