//! Output masking for secret values.

/// Masks secret values in text shown to the operator.
///
/// # Example
///
/// ```
/// use hsdemo::secrets::OutputMasker;
///
/// let mut masker = OutputMasker::new();
/// masker.add_secret("super-secret-value");
///
/// let output = masker.mask("The key is super-secret-value here");
/// assert_eq!(output, "The key is [REDACTED] here");
/// ```
#[derive(Debug, Clone)]
pub struct OutputMasker {
    /// Registered secrets, longest first so overlapping values mask fully.
    secrets: Vec<String>,
    /// The mask string to use.
    mask: String,
}

impl OutputMasker {
    /// Create a new masker with default mask string.
    pub fn new() -> Self {
        Self::with_mask("[REDACTED]")
    }

    /// Create a masker with a custom mask string.
    pub fn with_mask(mask: impl Into<String>) -> Self {
        Self {
            secrets: Vec::new(),
            mask: mask.into(),
        }
    }

    /// Register a secret value to be masked.
    ///
    /// Empty strings are ignored.
    pub fn add_secret(&mut self, value: impl Into<String>) {
        let value = value.into();
        if value.is_empty() || self.secrets.contains(&value) {
            return;
        }
        self.secrets.push(value);
        self.secrets.sort_by_key(|s| std::cmp::Reverse(s.len()));
    }

    /// Mask any secret values in the given string.
    pub fn mask(&self, input: &str) -> String {
        let mut result = input.to_string();
        for secret in &self.secrets {
            result = result.replace(secret.as_str(), &self.mask);
        }
        result
    }

    /// Render a program and its arguments as one masked command line.
    pub fn mask_command(&self, program: &str, args: &[String]) -> String {
        let mut line = program.to_string();
        for arg in args {
            line.push(' ');
            line.push_str(arg);
        }
        self.mask(&line)
    }

    /// Get the number of registered secrets.
    pub fn secret_count(&self) -> usize {
        self.secrets.len()
    }
}

impl Default for OutputMasker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masks_single_secret() {
        let mut masker = OutputMasker::new();
        masker.add_secret("super-secret-value");

        let output = masker.mask("The key is super-secret-value here");

        assert_eq!(output, "The key is [REDACTED] here");
    }

    #[test]
    fn masks_multiple_secrets() {
        let mut masker = OutputMasker::new();
        masker.add_secret("secret1");
        masker.add_secret("secret2");

        let output = masker.mask("Values: secret1 and secret2");

        assert_eq!(output, "Values: [REDACTED] and [REDACTED]");
    }

    #[test]
    fn ignores_empty_and_duplicate_secrets() {
        let mut masker = OutputMasker::new();
        masker.add_secret("");
        masker.add_secret("real-secret");
        masker.add_secret("real-secret");

        assert_eq!(masker.secret_count(), 1);
        assert_eq!(masker.mask("The real-secret is here"), "The [REDACTED] is here");
    }

    #[test]
    fn longer_secret_masked_before_its_prefix() {
        let mut masker = OutputMasker::with_mask("***");
        masker.add_secret("abc");
        masker.add_secret("abcdef");

        assert_eq!(masker.mask("token abcdef"), "token ***");
    }

    #[test]
    fn mask_command_joins_and_masks_arguments() {
        let mut masker = OutputMasker::new();
        masker.add_secret("tok3n");

        let args = vec![
            "install".to_string(),
            "--set".to_string(),
            "apiTokenSecret=tok3n".to_string(),
        ];
        assert_eq!(
            masker.mask_command("helm", &args),
            "helm install --set apiTokenSecret=[REDACTED]"
        );
    }

    #[test]
    fn no_masking_without_secrets() {
        let masker = OutputMasker::default();
        let input = "This has no secrets to mask";
        assert_eq!(masker.mask(input), input);
    }
}
