//! System-wide health state from all cluster assessments.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use triage_core::{ClusterAnalysis, ClusterLabel};
use triage_rules::triage_policy::GlobalAlertPolicy;

pub const CRITICAL_RECOMMENDATION: &str = "FREEZE DEPLOYMENTS & PAGE ON-CALL";
pub const NORMAL_RECOMMENDATION: &str = "Continue standard monitoring.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertStatus {
    Normal,
    Critical,
}

/// A cluster that met every severity condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SevereCluster {
    pub cluster_label: ClusterLabel,
    pub cluster_name: String,
    pub ticket_count: usize,
    pub root_cause: String,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalAlertState {
    pub status: AlertStatus,
    pub severe_clusters: Vec<SevereCluster>,
    pub recommendation: String,
}

impl GlobalAlertState {
    pub fn is_critical(&self) -> bool {
        self.status == AlertStatus::Critical
    }
}

#[derive(Debug, Clone, Default)]
pub struct GlobalAlertAggregator {
    policy: GlobalAlertPolicy,
}

impl GlobalAlertAggregator {
    pub fn new(policy: GlobalAlertPolicy) -> Self {
        Self { policy }
    }

    /// All five conditions must hold; there is no partial credit.
    pub fn qualifies(&self, a: &ClusterAnalysis) -> bool {
        !a.is_noise()
            && a.ticket_count >= self.policy.min_ticket_count
            && a.is_live_stage()
            && a.confidence >= self.policy.min_confidence
            && a.is_platform_scoped()
    }

    pub fn aggregate(&self, analyses: &[ClusterAnalysis]) -> GlobalAlertState {
        let severe_clusters: Vec<SevereCluster> = analyses
            .iter()
            .filter(|a| self.qualifies(a))
            .map(|a| SevereCluster {
                cluster_label: a.cluster_label,
                cluster_name: a.cluster_name.clone(),
                ticket_count: a.ticket_count,
                root_cause: a.root_cause.clone(),
                confidence: a.confidence,
            })
            .collect();

        if severe_clusters.is_empty() {
            info!(clusters = analyses.len(), "global health: normal");
            GlobalAlertState {
                status: AlertStatus::Normal,
                severe_clusters,
                recommendation: NORMAL_RECOMMENDATION.to_string(),
            }
        } else {
            warn!(severe = severe_clusters.len(), "global health: CRITICAL");
            GlobalAlertState {
                status: AlertStatus::Critical,
                severe_clusters,
                recommendation: CRITICAL_RECOMMENDATION.to_string(),
            }
        }
    }
}
