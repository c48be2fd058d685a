//! Automated actions the pipeline deliberately does not take.
//!
//! Exactly one restraint applies per cluster, chosen by first match:
//! high risk withholds auto-rollback, low confidence withholds external
//! communication, and anything else withholds executive escalation.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use triage_core::confidence;
use triage_rules::triage_policy::RestraintPolicy;

use crate::decision::RiskLevel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestraintKind {
    AutoRollback,
    ExternalComms,
    ExecutiveEscalation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Restraint {
    pub kind: RestraintKind,
    pub action_not_taken: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default)]
pub struct RestraintLogic {
    policy: RestraintPolicy,
}

impl RestraintLogic {
    pub fn new(policy: RestraintPolicy) -> Self {
        Self { policy }
    }

    /// Non-finite confidence is treated as [`confidence::DEFAULT_CONFIDENCE`].
    pub fn evaluate(&self, risk: RiskLevel, confidence: f64) -> Restraint {
        let confidence = confidence::sanitize(confidence);
        let threshold = self.policy.external_comms_min_confidence;

        if risk == RiskLevel::High {
            Restraint {
                kind: RestraintKind::AutoRollback,
                action_not_taken: "Automatic rollback of the latest deployment".to_string(),
                reason: "High-risk incident: a non-safe rollback requires human approval.".to_string(),
            }
        } else if confidence < threshold {
            Restraint {
                kind: RestraintKind::ExternalComms,
                action_not_taken: "Automated status-page or merchant communication".to_string(),
                // Unrounded, so a value just under the threshold never prints equal to it.
                reason: format!(
                    "Confidence {confidence} is below the {threshold} threshold for external communication."
                ),
            }
        } else {
            Restraint {
                kind: RestraintKind::ExecutiveEscalation,
                action_not_taken: "Executive escalation".to_string(),
                reason: format!("{risk} risk does not meet the escalation SLA for executive involvement."),
            }
        }
    }

    /// Like [`evaluate`](Self::evaluate) for an untyped confidence value.
    pub fn evaluate_raw(&self, risk: RiskLevel, raw_confidence: &Value) -> Restraint {
        self.evaluate(risk, confidence::coerce(raw_confidence))
    }
}
