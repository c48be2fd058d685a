use triage_core::vocab;

use crate::rulebook::{keyword_hits, root_cause_rule, STAGE_RULES};

/// Terms in `text_lower` that support `root_cause` and `stage`, root-cause
/// terms first, without duplicates.
pub fn evidence_terms(text_lower: &str, root_cause: &str, stage: &str) -> Vec<String> {
    let mut terms: Vec<String> = Vec::new();

    let rc_hits = root_cause_rule(root_cause)
        .map(|r| keyword_hits(text_lower, r.keywords))
        .unwrap_or_default();
    let stage_hits = STAGE_RULES
        .iter()
        .find(|r| r.label == stage)
        .map(|r| keyword_hits(text_lower, r.keywords))
        .unwrap_or_default();

    for term in rc_hits.into_iter().chain(stage_hits) {
        if !terms.iter().any(|t| t == term) {
            terms.push(term.to_string());
        }
    }
    terms
}

/// Whether a result says nothing useful about the cluster.
pub fn is_uninformative(root_cause: &str, stage: &str) -> bool {
    root_cause == vocab::RC_UNDETERMINED && stage == vocab::STAGE_UNKNOWN
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_root_cause_then_stage_terms() {
        let text = "live checkout broken, payment page blank for customers";
        let terms = evidence_terms(text, vocab::RC_CHECKOUT_FAILURE, vocab::STAGE_LIVE);
        assert_eq!(terms, vec!["checkout", "payment", "live", "customers"]);
    }

    #[test]
    fn labels_without_rules_have_no_evidence() {
        assert!(evidence_terms("anything", vocab::RC_UNDETERMINED, vocab::STAGE_UNKNOWN).is_empty());
    }
}
