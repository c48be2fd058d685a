use serde::{Deserialize, Serialize};

use crate::vocab;

/// Cluster label as produced by the clusterer. Non-negative labels are dense
/// groups; [`NOISE_LABEL`] collects tickets that joined no group.
pub type ClusterLabel = i64;

/// Label reserved for ungrouped ("noise") tickets.
pub const NOISE_LABEL: ClusterLabel = -1;

pub fn is_noise(label: ClusterLabel) -> bool {
    label == NOISE_LABEL
}

/// Structured incident assessment for one cluster.
///
/// Both the rule-based and the classifier-backed analyzers produce this
/// exact shape; downstream components never know which one ran.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterAnalysis {
    pub cluster_label: ClusterLabel,
    pub cluster_name: String,
    pub ticket_count: usize,
    /// One of [`vocab::STAGES`].
    pub stage: String,
    /// One of [`vocab::ROOT_CAUSES`].
    pub root_cause: String,
    /// Always in `[0, 1]`.
    pub confidence: f64,
    pub reasoning: String,
    /// Terms from the ticket text that support the assessment.
    #[serde(default)]
    pub evidence_terms: Vec<String>,
}

impl ClusterAnalysis {
    pub fn is_noise(&self) -> bool {
        is_noise(self.cluster_label)
    }

    pub fn is_live_stage(&self) -> bool {
        vocab::is_live_stage(&self.stage)
    }

    pub fn is_platform_scoped(&self) -> bool {
        vocab::is_platform_scoped(&self.root_cause)
    }

    /// Lower-cased stage and root cause, concatenated, for keyword coverage checks.
    pub fn coverage_text(&self) -> String {
        format!("{}{}", self.stage, self.root_cause).to_lowercase()
    }
}

/// Display name for a cluster.
pub fn cluster_name(label: ClusterLabel, root_cause: &str) -> String {
    if is_noise(label) {
        "Noise (unclustered)".to_string()
    } else {
        format!("Cluster {label}: {root_cause}")
    }
}
