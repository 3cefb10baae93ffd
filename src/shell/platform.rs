//! Platform and environment detection.

/// Environment variables set by common CI providers.
const CI_VARS: &[&str] = &[
    "CI",
    "GITHUB_ACTIONS",
    "GITLAB_CI",
    "CIRCLECI",
    "TRAVIS",
    "JENKINS_URL",
    "BUILDKITE",
];

/// Check if running in a CI environment.
pub fn is_ci() -> bool {
    is_ci_with(|key: &str| std::env::var(key))
}

/// Check for CI with a custom env var lookup function.
pub fn is_ci_with<F>(env_fn: F) -> bool
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    CI_VARS.iter().any(|&var| env_fn(var).is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::env::VarError;

    fn lookup(vars: HashMap<&'static str, &'static str>) -> impl Fn(&str) -> Result<String, VarError> {
        move |key: &str| vars.get(key).map(|v| v.to_string()).ok_or(VarError::NotPresent)
    }

    #[test]
    fn detects_generic_ci_var() {
        assert!(is_ci_with(lookup(HashMap::from([("CI", "true")]))));
    }

    #[test]
    fn detects_github_actions() {
        assert!(is_ci_with(lookup(HashMap::from([("GITHUB_ACTIONS", "true")]))));
    }

    #[test]
    fn no_ci_vars_means_not_ci() {
        assert!(!is_ci_with(lookup(HashMap::from([("HOME", "/root")]))));
    }
}
