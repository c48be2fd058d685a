use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;
use triage_core::{
    aggregate_text, cluster_name, confidence, vocab, Classifier, ClusterAnalysis, ClusterLabel, Ticket,
    TriageError,
};

use super::evidence::evidence_terms;
use super::ClusterAnalyzer;

/// Classifier-backed analyzer. Whatever the classifier returns is mapped
/// onto the closed vocabulary and its confidence coerced into `[0, 1]`.
#[derive(Clone)]
pub struct SemanticAnalyzer {
    classifier: Arc<dyn Classifier>,
}

impl SemanticAnalyzer {
    pub fn new(classifier: Arc<dyn Classifier>) -> Self {
        Self { classifier }
    }

    /// Classify one cluster's aggregated text (one ticket message per line).
    ///
    /// `ticket_count` is read from the line count; [`ClusterAnalyzer::analyze`]
    /// replaces it with the exact group size.
    pub async fn analyze_semantic(
        &self,
        label: ClusterLabel,
        aggregated_text: &str,
    ) -> Result<ClusterAnalysis, TriageError> {
        let raw = self.classifier.classify(aggregated_text).await?;

        let stage = vocab::normalize_stage(&raw.stage);
        let root_cause = vocab::normalize_root_cause(&raw.root_cause);
        let confidence = confidence::coerce(&raw.confidence);
        if root_cause != raw.root_cause.trim() || stage != raw.stage.trim() {
            debug!(
                label,
                raw_root_cause = %raw.root_cause,
                raw_stage = %raw.stage,
                root_cause,
                stage,
                "classifier labels normalised onto vocabulary"
            );
        }

        let reasoning = match raw.reasoning.trim() {
            "" => "Classifier gave no reasoning.".to_string(),
            r => r.to_string(),
        };

        Ok(ClusterAnalysis {
            cluster_label: label,
            cluster_name: cluster_name(label, root_cause),
            ticket_count: aggregated_text.lines().filter(|l| !l.trim().is_empty()).count(),
            stage: stage.to_string(),
            root_cause: root_cause.to_string(),
            confidence,
            reasoning,
            evidence_terms: evidence_terms(&aggregated_text.to_lowercase(), root_cause, stage),
        })
    }
}

#[async_trait]
impl ClusterAnalyzer for SemanticAnalyzer {
    async fn analyze(&self, label: ClusterLabel, tickets: &[Ticket]) -> Result<ClusterAnalysis, TriageError> {
        let analysis = self.analyze_semantic(label, &aggregate_text(tickets)).await?;
        Ok(ClusterAnalysis {
            ticket_count: tickets.len(),
            ..analysis
        })
    }

    fn name(&self) -> &str {
        "semantic"
    }
}
