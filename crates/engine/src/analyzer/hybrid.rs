use async_trait::async_trait;
use tracing::warn;
use triage_core::{aggregate_text, cluster_name, vocab, ClusterAnalysis, ClusterLabel, Ticket, TriageError};

use super::evidence::{evidence_terms, is_uninformative};
use super::{ClusterAnalyzer, RuleBasedAnalyzer, SemanticAnalyzer};

/// Semantic classification backed by the rulebook.
///
/// The rule-based result is used when the classifier fails or returns
/// neither a stage nor a root cause. When only the root cause is
/// unrecognised, the rulebook's root cause and confidence are kept alongside
/// the classifier's stage. Evidence terms always come from the rulebook.
pub struct HybridAnalyzer {
    rules: RuleBasedAnalyzer,
    semantic: SemanticAnalyzer,
}

impl HybridAnalyzer {
    pub fn new(semantic: SemanticAnalyzer) -> Self {
        Self {
            rules: RuleBasedAnalyzer::new(),
            semantic,
        }
    }
}

#[async_trait]
impl ClusterAnalyzer for HybridAnalyzer {
    async fn analyze(&self, label: ClusterLabel, tickets: &[Ticket]) -> Result<ClusterAnalysis, TriageError> {
        let baseline = self.rules.assess(label, tickets);

        let text = aggregate_text(tickets);
        let semantic = match self.semantic.analyze_semantic(label, &text).await {
            Ok(a) => a,
            Err(e) => {
                warn!(label, error = %e, "classifier failed; using rule-based assessment");
                return Ok(ClusterAnalysis {
                    reasoning: format!("{} (classifier unavailable: {e})", baseline.reasoning),
                    ..baseline
                });
            }
        };

        if is_uninformative(&semantic.root_cause, &semantic.stage) {
            warn!(label, "classifier returned no usable labels; using rule-based assessment");
            return Ok(baseline);
        }

        if semantic.root_cause == vocab::RC_UNDETERMINED && baseline.root_cause != vocab::RC_UNDETERMINED {
            warn!(
                label,
                root_cause = %baseline.root_cause,
                "classifier root cause unrecognised; keeping rule-based root cause"
            );
            return Ok(ClusterAnalysis {
                cluster_name: cluster_name(label, &baseline.root_cause),
                ticket_count: tickets.len(),
                evidence_terms: evidence_terms(&text.to_lowercase(), &baseline.root_cause, &semantic.stage),
                confidence: baseline.confidence,
                reasoning: format!("{} (root cause from rulebook: {})", semantic.reasoning, baseline.reasoning),
                root_cause: baseline.root_cause,
                ..semantic
            });
        }

        Ok(ClusterAnalysis {
            ticket_count: tickets.len(),
            ..semantic
        })
    }

    fn name(&self) -> &str {
        "hybrid"
    }
}
