//! Metadata block of a policy document.

use serde::{Deserialize, Serialize};

/// Identifies a policy document and who answers for its thresholds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PolicyMetadata {
    /// Kebab-case identifier, logged with every run that uses the policy.
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Team that owns the thresholds (e.g. `support-oncall`).
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// A disabled policy loads as the built-in defaults.
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

fn enabled_by_default() -> bool {
    true
}
