//! Resolved configuration values.

use std::fmt;

use super::source::{Source, SourceKind};

const REDACTED: &str = "[REDACTED]";

/// A resolved, immutable configuration value.
///
/// Secret values are never shown by `Debug` or `Display`.
#[derive(Clone, PartialEq, Eq)]
pub struct ConfigValue {
    name: String,
    value: String,
    source: Source,
    secret: bool,
}

impl ConfigValue {
    /// A non-secret value taken from `source`.
    pub fn new(name: impl Into<String>, value: impl Into<String>, source: Source) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            source,
            secret: false,
        }
    }

    /// Mark the value as secret.
    pub fn into_secret(mut self) -> Self {
        self.secret = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The raw value. Callers must not display secret values.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// The source that produced the value.
    pub fn source(&self) -> &Source {
        &self.source
    }

    pub fn resolved_from(&self) -> SourceKind {
        self.source.kind()
    }

    pub fn is_secret(&self) -> bool {
        self.secret
    }
}

impl fmt::Debug for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigValue")
            .field("name", &self.name)
            .field("value", &self.to_string())
            .field("resolved_from", &self.source.kind())
            .field("secret", &self.secret)
            .finish()
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.secret {
            f.write_str(REDACTED)
        } else {
            f.write_str(&self.value)
        }
    }
}
