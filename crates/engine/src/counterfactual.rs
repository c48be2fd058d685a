//! Alternative root-cause hypotheses that were considered and rejected.

use serde::{Deserialize, Serialize};
use triage_rules::triage_policy::CounterfactualPolicy;

use crate::rulebook::{keyword_hits, root_cause_rule, ROOT_CAUSE_RULES};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alternative {
    pub hypothesis: String,
    pub reason_rejected: String,
}

#[derive(Debug, Clone, Default)]
pub struct CounterfactualGenerator {
    policy: CounterfactualPolicy,
}

impl CounterfactualGenerator {
    pub fn new(policy: CounterfactualPolicy) -> Self {
        Self { policy }
    }

    /// Up to `max_alternatives` rulebook hypotheses other than `root_cause`,
    /// most plausible first.
    ///
    /// Plausibility is the number of the hypothesis's keywords found in
    /// `text`; ties keep rulebook order.
    pub fn generate_alternatives(&self, root_cause: &str, text: &str) -> Vec<Alternative> {
        let text_lower = text.to_lowercase();
        let chosen_hits = root_cause_rule(root_cause).map_or(0, |r| keyword_hits(&text_lower, r.keywords).len());

        let mut candidates: Vec<(usize, Alternative)> = ROOT_CAUSE_RULES
            .iter()
            .filter(|rule| rule.label != root_cause)
            .map(|rule| {
                let hits = keyword_hits(&text_lower, rule.keywords);
                let terms = hits.join(", ");
                // A classifier may pick a label the keywords support less.
                let reason = match hits.len() {
                    0 => format!("Rejected: {}.", rule.rejection),
                    n if n < chosen_hits => {
                        format!("Partial support ({terms}), but weaker than the evidence for {root_cause}.")
                    }
                    n if n == chosen_hits => {
                        format!("Equal keyword support ({terms}); {root_cause} was preferred by the analysis.")
                    }
                    _ => format!(
                        "Stronger keyword support ({terms}) than {root_cause}, which the analysis chose instead; verify the classification."
                    ),
                };
                (
                    hits.len(),
                    Alternative {
                        hypothesis: rule.label.to_string(),
                        reason_rejected: reason,
                    },
                )
            })
            .collect();

        // Stable sort keeps rulebook order among equal hit counts.
        candidates.sort_by(|a, b| b.0.cmp(&a.0));
        candidates
            .into_iter()
            .take(self.policy.max_alternatives)
            .map(|(_, alt)| alt)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use triage_core::vocab;

    fn generator() -> CounterfactualGenerator {
        CounterfactualGenerator::default()
    }

    #[test]
    fn bounded_and_excludes_chosen() {
        let alts = generator().generate_alternatives(vocab::RC_API_TIMEOUT, "requests timeout");
        assert_eq!(alts.len(), 3);
        assert!(alts.iter().all(|a| a.hypothesis != vocab::RC_API_TIMEOUT));
        assert!(alts.iter().all(|a| !a.reason_rejected.is_empty()));
    }

    #[test]
    fn ranked_by_supporting_keywords() {
        let text = "checkout times out; docs unclear; shopify plugin involved";
        let alts = generator().generate_alternatives(vocab::RC_API_TIMEOUT, text);
        let names: Vec<_> = alts.iter().map(|a| a.hypothesis.as_str()).collect();
        // docs+unclear (2), plugin+shopify (2), checkout (1)
        assert_eq!(
            names,
            vec![vocab::RC_DOCUMENTATION_GAP, vocab::RC_THIRD_PARTY, vocab::RC_CHECKOUT_FAILURE]
        );
        assert!(alts[0].reason_rejected.starts_with("Stronger keyword support (docs, unclear)"));
    }

    #[test]
    fn wording_follows_relative_support() {
        // timeout, latency, 504 for the chosen cause; checkout alone for the next.
        let text = "timeout and latency, 504 at checkout";
        let alts = generator().generate_alternatives(vocab::RC_API_TIMEOUT, text);
        assert_eq!(alts[0].hypothesis, vocab::RC_CHECKOUT_FAILURE);
        assert!(alts[0].reason_rejected.starts_with("Partial support (checkout), but weaker"));

        let tie = generator().generate_alternatives(vocab::RC_API_TIMEOUT, "timeout at checkout");
        assert!(tie[0].reason_rejected.starts_with("Equal keyword support (checkout)"));

        let overridden = generator().generate_alternatives(vocab::RC_UNDETERMINED, "payment checkout failing");
        assert_eq!(overridden[0].hypothesis, vocab::RC_CHECKOUT_FAILURE);
        assert!(!overridden[0].reason_rejected.contains("weaker"));
        assert!(overridden[0].reason_rejected.starts_with("Stronger keyword support"));
    }

    #[test]
    fn no_support_uses_rulebook_order() {
        let alts = generator().generate_alternatives(vocab::RC_UNDETERMINED, "nothing relevant");
        let names: Vec<_> = alts.iter().map(|a| a.hypothesis.as_str()).collect();
        assert_eq!(
            names,
            vec![vocab::RC_API_TIMEOUT, vocab::RC_CHECKOUT_FAILURE, vocab::RC_WEBHOOK_DELIVERY]
        );
        assert!(alts[0].reason_rejected.starts_with("Rejected:"));
    }

    #[test]
    fn respects_policy_limit() {
        let g = CounterfactualGenerator::new(CounterfactualPolicy { max_alternatives: 1 });
        assert_eq!(g.generate_alternatives(vocab::RC_API_TIMEOUT, "").len(), 1);
        let none = CounterfactualGenerator::new(CounterfactualPolicy { max_alternatives: 0 });
        assert!(none.generate_alternatives(vocab::RC_API_TIMEOUT, "").is_empty());
    }

    #[test]
    fn stable_for_identical_input() {
        let g = generator();
        let text = "webhook callback failing at checkout";
        assert_eq!(
            g.generate_alternatives(vocab::RC_MERCHANT_CONFIG, text),
            g.generate_alternatives(vocab::RC_MERCHANT_CONFIG, text)
        );
    }
}
