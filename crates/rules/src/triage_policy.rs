//! TriagePolicy rule kind. Holds every threshold the decision pipeline applies:
//! risk mapping, restraint, global alerting, proactive correlation,
//! reproduction-pack gating, signal trajectory, and counterfactual bounds.

use serde::{Deserialize, Serialize};

use crate::schema::PolicyMetadata;

// ── YAML-level types ────────────────────────────────────────────────

/// Top-level TriagePolicy rule document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TriagePolicyRule {
    #[serde(rename = "apiVersion")]
    pub api_version: String,
    pub kind: String,
    pub metadata: PolicyMetadata,
    pub spec: TriagePolicySpec,
}

/// Specification section of a TriagePolicy rule. Omitted sections take
/// their defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TriagePolicySpec {
    #[serde(default)]
    pub decision: DecisionPolicy,
    #[serde(default)]
    pub restraint: RestraintPolicy,
    #[serde(default)]
    pub global_alert: GlobalAlertPolicy,
    #[serde(default)]
    pub proactive: ProactivePolicy,
    #[serde(default)]
    pub repro_pack: ReproPackPolicy,
    #[serde(default)]
    pub trajectory: TrajectoryPolicy,
    #[serde(default)]
    pub counterfactual: CounterfactualPolicy,
}

/// Risk-level mapping thresholds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DecisionPolicy {
    /// Live + platform clusters at or above this confidence are High risk.
    pub high_min_confidence: f64,
    /// Live or platform clusters at or above this confidence are Medium risk.
    pub medium_min_confidence: f64,
    /// Clusters this large are at least Medium risk regardless of content.
    pub volume_escalation_tickets: usize,
}

impl Default for DecisionPolicy {
    fn default() -> Self {
        Self {
            high_min_confidence: 0.7,
            medium_min_confidence: 0.5,
            volume_escalation_tickets: 10,
        }
    }
}

/// Restraint thresholds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RestraintPolicy {
    /// Below this confidence automated external communication is withheld.
    pub external_comms_min_confidence: f64,
}

impl Default for RestraintPolicy {
    fn default() -> Self {
        Self {
            external_comms_min_confidence: 0.8,
        }
    }
}

/// Conjunctive bar for a cluster to raise the global critical alert.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct GlobalAlertPolicy {
    pub min_ticket_count: usize,
    pub min_confidence: f64,
}

impl Default for GlobalAlertPolicy {
    fn default() -> Self {
        Self {
            min_ticket_count: 3,
            min_confidence: 0.7,
        }
    }
}

/// Telemetry-first detection parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ProactivePolicy {
    /// Signal identifier that is monitored.
    pub monitored_signal: String,
    /// Alert only when the signal value is strictly above this percentage.
    pub value_threshold: f64,
    /// Lower-case keywords; a cluster mentioning any of them covers the signal.
    pub coverage_keywords: Vec<String>,
}

impl Default for ProactivePolicy {
    fn default() -> Self {
        Self {
            monitored_signal: "checkout_error_rate".to_string(),
            value_threshold: 25.0,
            coverage_keywords: vec!["checkout".to_string(), "payment".to_string()],
        }
    }
}

/// Reproduction-pack gate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ReproPackPolicy {
    pub min_confidence: f64,
}

impl Default for ReproPackPolicy {
    fn default() -> Self {
        Self { min_confidence: 0.8 }
    }
}

/// Signal trajectory classification.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TrajectoryPolicy {
    /// Percentage at or above which a signal is Rising.
    pub elevated_threshold: f64,
    /// Percentage above which a signal is Accelerating.
    pub critical_threshold: f64,
    /// History points required before a z-score is computed.
    pub min_data_points: usize,
    /// |z| above this marks a significant move against history.
    pub z_score_trigger: f64,
}

impl Default for TrajectoryPolicy {
    fn default() -> Self {
        Self {
            elevated_threshold: 10.0,
            critical_threshold: 25.0,
            min_data_points: 3,
            z_score_trigger: 2.0,
        }
    }
}

/// Counterfactual bounds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CounterfactualPolicy {
    pub max_alternatives: usize,
}

impl Default for CounterfactualPolicy {
    fn default() -> Self {
        Self { max_alternatives: 3 }
    }
}

// ── Compiled type ───────────────────────────────────────────────────

/// Pre-compiled triage policy (the `spec` section is already typed).
pub type TriagePolicy = TriagePolicySpec;

impl TriagePolicyRule {
    /// Compile the YAML config.
    pub fn compile(&self) -> TriagePolicy {
        self.spec.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHIPPED: &str = include_str!("../../../data/rules/triage-policy.yml");

    #[test]
    fn parse_shipped_policy() {
        let rule: TriagePolicyRule = serde_yaml::from_str(SHIPPED).unwrap();
        assert_eq!(rule.kind, "TriagePolicy");
        assert_eq!(rule.metadata.id, "default-triage-policy");
    }

    #[test]
    fn shipped_policy_matches_defaults() {
        let rule: TriagePolicyRule = serde_yaml::from_str(SHIPPED).unwrap();
        assert_eq!(rule.compile(), TriagePolicy::default());
    }

    #[test]
    fn omitted_sections_take_defaults() {
        let yaml = r#"
apiVersion: v1
kind: TriagePolicy
metadata:
  id: partial
  name: Partial
spec:
  proactive:
    monitored_signal: api_error_rate
    value_threshold: 40
    coverage_keywords: [api]
"#;
        let rule: TriagePolicyRule = serde_yaml::from_str(yaml).unwrap();
        let policy = rule.compile();
        assert_eq!(policy.proactive.monitored_signal, "api_error_rate");
        assert_eq!(policy.proactive.value_threshold, 40.0);
        assert_eq!(policy.repro_pack, ReproPackPolicy::default());
        assert_eq!(policy.decision, DecisionPolicy::default());
    }

    #[test]
    fn unknown_fields_rejected() {
        let yaml = r#"
apiVersion: v1
kind: TriagePolicy
metadata:
  id: typo
  name: Typo
spec:
  restraint:
    external_comms_min_confidense: 0.9
"#;
        assert!(serde_yaml::from_str::<TriagePolicyRule>(yaml).is_err());
    }
}
