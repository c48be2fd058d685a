use async_trait::async_trait;
use tracing::debug;
use triage_core::{aggregate_text, cluster_name, vocab, ClusterAnalysis, ClusterLabel, Ticket, TriageError};

use super::evidence::evidence_terms;
use super::ClusterAnalyzer;
use crate::rulebook::{best_root_cause, best_stage, keyword_hits};

/// Confidence assigned when no root-cause keyword matches at all.
const UNDETERMINED_CONFIDENCE: f64 = 0.3;
const BASE_CONFIDENCE: f64 = 0.4;
const MAX_RULE_CONFIDENCE: f64 = 0.95;

/// Keyword-rulebook analyzer. Deterministic and offline.
#[derive(Debug, Clone, Default)]
pub struct RuleBasedAnalyzer;

impl RuleBasedAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Synchronous core of [`ClusterAnalyzer::analyze`].
    pub fn assess(&self, label: ClusterLabel, tickets: &[Ticket]) -> ClusterAnalysis {
        let text = aggregate_text(tickets).to_lowercase();

        let stage = best_stage(&text).map_or(vocab::STAGE_UNKNOWN, |(r, _)| r.label);

        let (root_cause, confidence, reasoning) = match best_root_cause(&text) {
            Some((rule, hits)) => {
                // Share of tickets that individually mention the root cause.
                let supporting = tickets
                    .iter()
                    .filter(|t| !keyword_hits(&t.message.to_lowercase(), rule.keywords).is_empty())
                    .count();
                let coverage = if tickets.is_empty() {
                    0.0
                } else {
                    supporting as f64 / tickets.len() as f64
                };

                let mut score = BASE_CONFIDENCE + 0.1 * hits.len().min(3) as f64 + 0.2 * coverage;
                if stage != vocab::STAGE_UNKNOWN {
                    score += 0.1;
                }
                let confidence = round2(score.min(MAX_RULE_CONFIDENCE));

                let reasoning = format!(
                    "{supporting} of {} tickets mention {} ({}); stage read as {stage}.",
                    tickets.len(),
                    rule.label,
                    hits.join(", ")
                );
                (rule.label, confidence, reasoning)
            }
            None => (
                vocab::RC_UNDETERMINED,
                UNDETERMINED_CONFIDENCE,
                "No rulebook keywords matched the ticket text.".to_string(),
            ),
        };

        debug!(label, root_cause, stage, confidence, "rule-based assessment");

        ClusterAnalysis {
            cluster_label: label,
            cluster_name: cluster_name(label, root_cause),
            ticket_count: tickets.len(),
            stage: stage.to_string(),
            root_cause: root_cause.to_string(),
            confidence,
            reasoning,
            evidence_terms: evidence_terms(&text, root_cause, stage),
        }
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[async_trait]
impl ClusterAnalyzer for RuleBasedAnalyzer {
    async fn analyze(&self, label: ClusterLabel, tickets: &[Ticket]) -> Result<ClusterAnalysis, TriageError> {
        Ok(self.assess(label, tickets))
    }

    fn name(&self) -> &str {
        "rule"
    }
}
