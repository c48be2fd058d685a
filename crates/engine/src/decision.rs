//! Risk scoring and recommended action per cluster.

use serde::{Deserialize, Serialize};
use triage_core::{vocab, ClusterAnalysis};
use triage_rules::triage_policy::DecisionPolicy;

/// Ordered: `Low < Medium < High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "Low"),
            RiskLevel::Medium => write!(f, "Medium"),
            RiskLevel::High => write!(f, "High"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    pub risk_level: RiskLevel,
    pub recommended_action: String,
}

/// Coarse grouping of root-cause labels that share a response playbook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Family {
    Platform,
    Merchant,
    Documentation,
    ThirdParty,
    Undetermined,
}

impl Family {
    fn of(root_cause: &str) -> Self {
        if vocab::is_platform_scoped(root_cause) {
            Family::Platform
        } else if root_cause == vocab::RC_MERCHANT_CONFIG {
            Family::Merchant
        } else if root_cause == vocab::RC_DOCUMENTATION_GAP {
            Family::Documentation
        } else if root_cause == vocab::RC_THIRD_PARTY {
            Family::ThirdParty
        } else {
            Family::Undetermined
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DecisionEngine {
    policy: DecisionPolicy,
}

impl DecisionEngine {
    pub fn new(policy: DecisionPolicy) -> Self {
        Self { policy }
    }

    pub fn risk_level(&self, analysis: &ClusterAnalysis) -> RiskLevel {
        let live = analysis.is_live_stage();
        let platform = analysis.is_platform_scoped();
        let conf = analysis.confidence;

        if live && platform && conf >= self.policy.high_min_confidence {
            RiskLevel::High
        } else if ((live || platform) && conf >= self.policy.medium_min_confidence)
            || analysis.ticket_count >= self.policy.volume_escalation_tickets
        {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    /// Map an assessment to a risk level and the action to take.
    pub fn determine_action(&self, analysis: &ClusterAnalysis) -> Decision {
        let risk_level = self.risk_level(analysis);
        let rc = analysis.root_cause.as_str();

        let recommended_action = match (risk_level, Family::of(rc)) {
            (RiskLevel::High, _) => format!(
                "Open a SEV-1 incident for {rc} and page the platform on-call engineer; prepare a rollback of the latest related deployment."
            ),
            (RiskLevel::Medium, Family::Platform) => format!(
                "Open an incident with the platform team for {rc} and watch error rates until the cluster stops growing."
            ),
            (RiskLevel::Medium, Family::Merchant) => {
                "Send affected merchants the configuration checklist and have support verify their settings.".to_string()
            }
            (RiskLevel::Medium, Family::Documentation) => {
                "Prioritise a help-center update for this workflow and link it from support replies.".to_string()
            }
            (RiskLevel::Medium, Family::ThirdParty) => {
                "Escalate to the partner integrations team and share the affected ticket ids with the provider.".to_string()
            }
            (RiskLevel::Medium, Family::Undetermined) => {
                "Assign tier-2 support to investigate the cluster; volume is high enough to need an owner.".to_string()
            }
            (RiskLevel::Low, Family::Platform) => format!(
                "File a platform bug for {rc} and handle tickets through the standard queue."
            ),
            (RiskLevel::Low, Family::Merchant) => {
                "Reply with configuration guidance through the standard support queue.".to_string()
            }
            (RiskLevel::Low, Family::Documentation) => {
                "Answer with existing help articles and log the gap for the docs backlog.".to_string()
            }
            (RiskLevel::Low, Family::ThirdParty) => {
                "Point merchants to the provider's support channel and keep monitoring.".to_string()
            }
            (RiskLevel::Low, Family::Undetermined) => {
                "Handle through the standard support queue and re-triage if volume grows.".to_string()
            }
        };

        Decision {
            risk_level,
            recommended_action,
        }
    }
}
