//! Policy file loading.

use std::path::Path;

use tracing::{info, warn};

use crate::triage_policy::{TriagePolicy, TriagePolicyRule};
use crate::validation::validate_triage_policy;

/// Errors that can occur while loading a policy document.
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    /// Filesystem I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parse/deserialization error.
    #[error("YAML parse error: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// Policy validation error.
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result alias for rule operations.
pub type Result<T> = std::result::Result<T, RuleError>;

/// Parse, validate and compile a policy from YAML text.
pub fn parse_policy(yaml: &str) -> Result<TriagePolicy> {
    let rule: TriagePolicyRule = serde_yaml::from_str(yaml)?;
    let result = validate_triage_policy(&rule);
    for w in &result.warnings {
        warn!(path = %w.path, "policy warning: {}", w.message);
    }
    if !result.valid {
        return Err(RuleError::Validation(result.error_summary()));
    }
    info!(
        id = %rule.metadata.id,
        owner = rule.metadata.owner.as_deref().unwrap_or("unassigned"),
        "policy validated"
    );
    if !rule.metadata.enabled {
        warn!(id = %rule.metadata.id, "policy is disabled; using built-in defaults");
        return Ok(TriagePolicy::default());
    }
    Ok(rule.compile())
}

/// Load a policy file from disk.
pub fn load_policy(path: &Path) -> Result<TriagePolicy> {
    let yaml = std::fs::read_to_string(path)?;
    let policy = parse_policy(&yaml)?;
    info!(path = %path.display(), "loaded triage policy");
    Ok(policy)
}

/// Load the policy at `path` if one is configured, otherwise the built-in defaults.
///
/// A configured path that is missing or invalid is an error: silently
/// falling back would apply thresholds the operator did not ask for.
pub fn load_policy_or_default(path: Option<&Path>) -> Result<TriagePolicy> {
    match path {
        Some(p) => load_policy(p),
        None => {
            info!("no policy file configured; using built-in defaults");
            Ok(TriagePolicy::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn none_yields_defaults() {
        let policy = load_policy_or_default(None).unwrap();
        assert_eq!(policy, TriagePolicy::default());
    }

    #[test]
    fn loads_file_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "apiVersion: v1\nkind: TriagePolicy\nmetadata:\n  id: strict\n  name: Strict\nspec:\n  repro_pack:\n    min_confidence: 0.95\n"
        )
        .unwrap();

        let policy = load_policy_or_default(Some(file.path())).unwrap();
        assert_eq!(policy.repro_pack.min_confidence, 0.95);
        assert_eq!(policy.restraint.external_comms_min_confidence, 0.8);
    }

    #[test]
    fn missing_configured_file_is_error() {
        let err = load_policy_or_default(Some(Path::new("/nonexistent/policy.yml"))).unwrap_err();
        assert!(matches!(err, RuleError::Io(_)));
    }

    #[test]
    fn invalid_policy_is_rejected() {
        let yaml = "apiVersion: v2\nkind: TriagePolicy\nmetadata:\n  id: x\n  name: X\nspec: {}\n";
        let err = parse_policy(yaml).unwrap_err();
        assert!(matches!(err, RuleError::Validation(msg) if msg.contains("apiVersion")));
    }

    #[test]
    fn disabled_policy_falls_back_to_defaults() {
        let yaml = "apiVersion: v1\nkind: TriagePolicy\nmetadata:\n  id: off\n  name: Off\n  enabled: false\nspec:\n  repro_pack:\n    min_confidence: 0.99\n";
        let policy = parse_policy(yaml).unwrap();
        assert_eq!(policy, TriagePolicy::default());
    }
}
