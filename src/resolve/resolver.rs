//! The value resolver.

use std::env::VarError;

use crate::error::{HsdemoError, Result};
use crate::shell::{capture, CommandSpec};
use crate::ui::{Prompt, PromptType, UserInterface};

use super::source::Source;
use super::value::ConfigValue;

type EnvLookup = Box<dyn Fn(&str) -> std::result::Result<String, VarError>>;

/// A named value and the ordered sources it may come from.
#[derive(Debug, Clone)]
pub struct Request {
    name: String,
    sources: Vec<Source>,
    secret: bool,
}

impl Request {
    /// Start a request for the value called `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sources: Vec::new(),
            secret: false,
        }
    }

    /// Append a source to the chain.
    pub fn source(mut self, source: Source) -> Self {
        self.sources.push(source);
        self
    }

    /// Make the resolved value secret.
    pub fn mark_secret(mut self) -> Self {
        self.secret = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sources(&self) -> &[Source] {
        &self.sources
    }

    pub fn is_secret(&self) -> bool {
        self.secret
    }
}

/// Resolves values by trying their sources strictly in order.
pub struct ValueResolver {
    env: EnvLookup,
}

impl ValueResolver {
    /// Resolver reading the process environment.
    pub fn new() -> Self {
        Self::with_env(|key: &str| std::env::var(key))
    }

    /// Resolver with a custom env var lookup function.
    ///
    /// This allows testing without modifying actual environment variables.
    pub fn with_env<F>(env_fn: F) -> Self
    where
        F: Fn(&str) -> std::result::Result<String, VarError> + 'static,
    {
        Self {
            env: Box::new(env_fn),
        }
    }

    /// Resolve a request, honouring its secret marker.
    pub fn resolve_request(
        &self,
        request: &Request,
        interactive: bool,
        ui: &mut dyn UserInterface,
    ) -> Result<ConfigValue> {
        let value = self.resolve(request.name(), request.sources(), interactive, ui)?;
        Ok(if request.is_secret() {
            value.into_secret()
        } else {
            value
        })
    }

    /// Resolve `name` from the first source that yields a non-empty value.
    ///
    /// A prompt reached in a non-interactive run fails the whole resolution
    /// immediately. Every failed attempt is listed in the `Unresolved` error.
    pub fn resolve(
        &self,
        name: &str,
        sources: &[Source],
        interactive: bool,
        ui: &mut dyn UserInterface,
    ) -> Result<ConfigValue> {
        let mut attempts = Vec::new();

        for source in sources {
            let outcome = match source {
                Source::Env(var) => self.from_env(var),
                Source::Literal(value) => from_literal(value),
                Source::Command { program, args } => from_command(program, args),
                Source::Prompt { .. } if !interactive => {
                    attempts.push("prompt unavailable in non-interactive mode".to_string());
                    return Err(HsdemoError::Unresolved {
                        name: name.to_string(),
                        attempts,
                    });
                }
                Source::Prompt {
                    label,
                    multiline,
                    default,
                } => from_prompt(name, label, *multiline, default.as_deref(), ui),
            };

            match outcome {
                Ok(value) => {
                    tracing::debug!("Resolved {} from {}", name, source.kind());
                    return Ok(ConfigValue::new(name, value, source.clone()));
                }
                Err(reason) => {
                    tracing::debug!("{} not resolved from {}: {}", name, source.kind(), reason);
                    attempts.push(reason);
                }
            }
        }

        if attempts.is_empty() {
            attempts.push("no sources configured".to_string());
        }
        Err(HsdemoError::Unresolved {
            name: name.to_string(),
            attempts,
        })
    }

    fn from_env(&self, var: &str) -> std::result::Result<String, String> {
        match (self.env)(var) {
            Ok(value) if !value.is_empty() => Ok(value),
            Ok(_) => Err(format!("{} is empty", var)),
            Err(VarError::NotPresent) => Err(format!("{} is not set", var)),
            Err(VarError::NotUnicode(_)) => Err(format!("{} is not valid unicode", var)),
        }
    }
}

impl Default for ValueResolver {
    fn default() -> Self {
        Self::new()
    }
}

fn from_literal(value: &str) -> std::result::Result<String, String> {
    if value.is_empty() {
        Err("no value given".to_string())
    } else {
        Ok(value.to_string())
    }
}

fn from_command(program: &str, args: &[String]) -> std::result::Result<String, String> {
    let spec = CommandSpec::new(program).args(args.iter().cloned());
    let label = format!("`{} {}`", program, args.join(" "));

    let output = capture(&spec).map_err(|e| format!("{}: {}", label, e))?;
    if !output.success {
        return Err(format!(
            "{} exited with code {}",
            label,
            output
                .exit_code
                .map(|c| c.to_string())
                .unwrap_or_else(|| "unknown".to_string())
        ));
    }

    let value = output.stdout.trim();
    if value.is_empty() {
        Err(format!("{} printed nothing", label))
    } else {
        Ok(value.to_string())
    }
}

fn from_prompt(
    name: &str,
    label: &str,
    multiline: bool,
    default: Option<&str>,
    ui: &mut dyn UserInterface,
) -> std::result::Result<String, String> {
    let prompt = Prompt {
        key: name.to_string(),
        question: label.to_string(),
        prompt_type: if multiline {
            PromptType::Multiline
        } else {
            PromptType::Input
        },
        default: default.map(str::to_string),
    };

    let answer = ui.prompt(&prompt).map_err(|e| e.to_string())?;
    let value = answer.as_string().trim().to_string();
    if value.is_empty() {
        Err("empty answer".to_string())
    } else {
        Ok(value)
    }
}
