//! Preflight check for the external programs a run depends on.

use std::collections::BTreeMap;
use std::path::PathBuf;

use super::probe::{parse_system_path, resolve_tool_path};

/// Programs every bring-up needs.
pub const REQUIRED_PROGRAMS: &[&str] = &["aws", "eksdemo", "helm", "kubectl"];

/// Looks up required programs on a fixed set of search path entries.
#[derive(Debug, Clone)]
pub struct Preflight {
    path: Vec<PathBuf>,
}

impl Preflight {
    /// Check against the current `PATH`.
    pub fn new() -> Self {
        Self::with_path(parse_system_path())
    }

    /// Check against explicit search path entries.
    pub fn with_path(path: Vec<PathBuf>) -> Self {
        Self { path }
    }

    /// Map each program to whether it was found.
    pub fn check(&self, required: &[&str]) -> BTreeMap<String, bool> {
        required
            .iter()
            .map(|program| {
                let found = resolve_tool_path(program, &self.path);
                tracing::debug!("Preflight {}: {:?}", program, found);
                (program.to_string(), found.is_some())
            })
            .collect()
    }
}

impl Default for Preflight {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::requirements::probe::tests::create_fake_binary;
    use tempfile::TempDir;

    #[test]
    fn reports_present_and_missing_programs() {
        let temp = TempDir::new().unwrap();
        create_fake_binary(&temp.path().join("kubectl"));
        create_fake_binary(&temp.path().join("helm"));

        let preflight = Preflight::with_path(vec![temp.path().to_path_buf()]);
        let results = preflight.check(REQUIRED_PROGRAMS);

        assert_eq!(results.len(), 4);
        assert!(results["kubectl"]);
        assert!(results["helm"]);
        assert!(!results["aws"]);
        assert!(!results["eksdemo"]);
    }

    #[test]
    fn check_is_repeatable() {
        let temp = TempDir::new().unwrap();
        create_fake_binary(&temp.path().join("aws"));

        let preflight = Preflight::with_path(vec![temp.path().to_path_buf()]);
        assert_eq!(preflight.check(&["aws", "helm"]), preflight.check(&["aws", "helm"]));
    }

    #[test]
    fn empty_search_path_finds_nothing() {
        let preflight = Preflight::with_path(Vec::new());
        assert!(preflight.check(&["aws"]).values().all(|found| !found));
    }

    #[test]
    fn empty_requirement_list_passes() {
        let preflight = Preflight::with_path(Vec::new());
        assert!(preflight.check(&[]).is_empty());
    }
}
