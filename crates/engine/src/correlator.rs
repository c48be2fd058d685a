//! Telemetry-first detection: an elevated signal that no ticket cluster
//! accounts for yet.

use serde::{Deserialize, Serialize};
use tracing::info;
use triage_core::{ClusterAnalysis, SignalRecord};
use triage_rules::triage_policy::ProactivePolicy;

pub const PROACTIVE_ASSUMPTION: &str = "Issue detected before merchant reports.";
pub const PROACTIVE_ACTION: &str = "Notify support team and monitor closely.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProactiveAlert {
    pub signal: String,
    pub value: f64,
    pub time_window: String,
    pub threshold: f64,
    pub assumption: String,
    pub recommended_action: String,
}

#[derive(Debug, Clone, Default)]
pub struct ProactiveCorrelator {
    policy: ProactivePolicy,
}

impl ProactiveCorrelator {
    pub fn new(policy: ProactivePolicy) -> Self {
        Self { policy }
    }

    /// Whether any analysis already covers the monitored category.
    pub fn is_covered(&self, analyses: &[ClusterAnalysis]) -> bool {
        analyses.iter().any(|a| {
            let text = a.coverage_text();
            self.policy
                .coverage_keywords
                .iter()
                .any(|k| text.contains(&k.to_lowercase()))
        })
    }

    /// Fires only for the monitored signal, above the threshold, with no
    /// covering cluster.
    pub fn correlate(&self, signal: Option<&SignalRecord>, analyses: &[ClusterAnalysis]) -> Option<ProactiveAlert> {
        let s = signal?;
        // NaN never counts as elevated.
        let elevated = s.value > self.policy.value_threshold;
        if s.signal != self.policy.monitored_signal || !elevated {
            return None;
        }
        if self.is_covered(analyses) {
            return None;
        }

        info!(
            signal = %s.signal,
            value = s.value,
            window = %s.time_window,
            "proactive alert: elevated signal with no matching ticket cluster"
        );

        Some(ProactiveAlert {
            signal: s.signal.clone(),
            value: s.value,
            time_window: s.time_window.clone(),
            threshold: self.policy.value_threshold,
            assumption: PROACTIVE_ASSUMPTION.to_string(),
            recommended_action: PROACTIVE_ACTION.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use triage_core::{cluster_name, vocab};

    fn analysis(stage: &str, root_cause: &str) -> ClusterAnalysis {
        ClusterAnalysis {
            cluster_label: 0,
            cluster_name: cluster_name(0, root_cause),
            ticket_count: 3,
            stage: stage.into(),
            root_cause: root_cause.into(),
            confidence: 0.9,
            reasoning: String::new(),
            evidence_terms: vec![],
        }
    }

    fn checkout(value: f64) -> SignalRecord {
        SignalRecord::new("checkout_error_rate", value, "1h")
    }

    #[test]
    fn fires_without_covering_cluster() {
        let c = ProactiveCorrelator::default();
        let analyses = [analysis(vocab::STAGE_LIVE, vocab::RC_WEBHOOK_DELIVERY)];
        let alert = c.correlate(Some(&checkout(30.0)), &analyses).unwrap();
        assert_eq!(alert.signal, "checkout_error_rate");
        assert_eq!(alert.value, 30.0);
        assert_eq!(alert.time_window, "1h");
        assert_eq!(alert.assumption, "Issue detected before merchant reports.");
        assert_eq!(alert.recommended_action, "Notify support team and monitor closely.");

        assert!(c.correlate(Some(&checkout(30.0)), &[]).is_some());
    }

    #[test]
    fn payment_cluster_suppresses() {
        let c = ProactiveCorrelator::default();
        let analyses = [analysis(vocab::STAGE_LIVE, "Payment Gateway Platform Issue")];
        assert!(c.correlate(Some(&checkout(30.0)), &analyses).is_none());

        let stage_only = [analysis("Stage 3 - CHECKOUT launch", vocab::RC_UNDETERMINED)];
        assert!(c.correlate(Some(&checkout(30.0)), &stage_only).is_none());
    }

    #[test]
    fn threshold_is_strict() {
        let c = ProactiveCorrelator::default();
        assert!(c.correlate(Some(&checkout(25.0)), &[]).is_none());
        assert!(c.correlate(Some(&checkout(25.01)), &[]).is_some());
        assert!(c.correlate(Some(&checkout(f64::NAN)), &[]).is_none());
    }

    #[test]
    fn other_signals_and_absent_signal_never_fire() {
        let c = ProactiveCorrelator::default();
        let other = SignalRecord::new("api_error_rate", 90.0, "1h");
        assert!(c.correlate(Some(&other), &[]).is_none());
        assert!(c.correlate(None, &[]).is_none());
    }
}
