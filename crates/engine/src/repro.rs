//! Reproduction-pack gating and descriptors.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::info;
use triage_core::{vocab, ClusterAnalysis, SignalRecord, Ticket};
use triage_rules::TriagePolicy;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackType {
    /// No corroborating telemetry at generation time.
    Preliminary,
    Confirmed,
}

impl std::fmt::Display for PackType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PackType::Preliminary => write!(f, "preliminary"),
            PackType::Confirmed => write!(f, "confirmed"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReproPackDescriptor {
    pub path: PathBuf,
    pub incident_id: String,
    pub pack_type: PackType,
    /// The concrete conditions that caused generation, e.g. `confidence:0.85>=0.80`.
    pub triggers: BTreeSet<String>,
}

/// Decides which clusters warrant a reproduction pack and describes it.
#[derive(Debug, Clone)]
pub struct ReproPackGate {
    min_confidence: f64,
    signal_threshold: f64,
    repro_dir: PathBuf,
}

impl Default for ReproPackGate {
    fn default() -> Self {
        Self::from_policy(&TriagePolicy::default(), "repro_packs")
    }
}

impl ReproPackGate {
    /// Packs are placed under `repro_dir`; the signal threshold trigger
    /// reuses the proactive monitoring threshold.
    pub fn from_policy(policy: &TriagePolicy, repro_dir: impl Into<PathBuf>) -> Self {
        Self {
            min_confidence: policy.repro_pack.min_confidence,
            signal_threshold: policy.proactive.value_threshold,
            repro_dir: repro_dir.into(),
        }
    }

    pub fn repro_dir(&self) -> &Path {
        &self.repro_dir
    }

    pub fn should_generate(&self, analysis: &ClusterAnalysis) -> bool {
        !analysis.is_noise()
            && analysis.is_live_stage()
            && analysis.root_cause.contains(vocab::PLATFORM_ISSUE_MARKER)
            && analysis.confidence >= self.min_confidence
    }

    /// Build the descriptor. Callers gate with [`should_generate`](Self::should_generate).
    pub fn generate(
        &self,
        analysis: &ClusterAnalysis,
        tickets: &[Ticket],
        signal: Option<&SignalRecord>,
    ) -> ReproPackDescriptor {
        let incident_id = incident_id(analysis, tickets);

        let mut triggers = BTreeSet::new();
        triggers.insert(format!("stage:{}", vocab::LIVE_STAGE_MARKER));
        triggers.insert(format!("root_cause:{}", vocab::PLATFORM_ISSUE_MARKER));
        triggers.insert(format!(
            "confidence:{:.2}>={:.2}",
            analysis.confidence, self.min_confidence
        ));
        triggers.insert(format!("ticket_count:{}", analysis.ticket_count));

        let pack_type = match signal {
            Some(s) => {
                triggers.insert(format!("signal:{}={}%", s.signal, s.value));
                if s.value > self.signal_threshold {
                    triggers.insert(format!("signal_threshold:{}>{}%", s.signal, self.signal_threshold));
                }
                PackType::Confirmed
            }
            None => PackType::Preliminary,
        };

        let path = self.repro_dir.join(format!("{incident_id}.json"));
        info!(
            label = analysis.cluster_label,
            incident_id = %incident_id,
            pack_type = %pack_type,
            "reproduction pack triggered"
        );

        ReproPackDescriptor {
            path,
            incident_id,
            pack_type,
            triggers,
        }
    }

    /// Gate and generate in one step.
    pub fn evaluate(
        &self,
        analysis: &ClusterAnalysis,
        tickets: &[Ticket],
        signal: Option<&SignalRecord>,
    ) -> Option<ReproPackDescriptor> {
        self.should_generate(analysis)
            .then(|| self.generate(analysis, tickets, signal))
    }
}

/// Stable id from the cluster label and its ticket ids.
fn incident_id(analysis: &ClusterAnalysis, tickets: &[Ticket]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(analysis.cluster_label.to_string().as_bytes());
    for t in tickets {
        hasher.update(b"\n");
        hasher.update(t.id.0.as_bytes());
    }
    let digest = hasher.finalize();
    let hex = format!("{digest:x}");
    format!("INC-{}", &hex[..16])
}

#[cfg(test)]
mod tests {
    use super::*;
    use triage_core::{cluster_name, NOISE_LABEL};

    fn analysis(confidence: f64) -> ClusterAnalysis {
        ClusterAnalysis {
            cluster_label: 2,
            cluster_name: cluster_name(2, vocab::RC_API_TIMEOUT),
            ticket_count: 2,
            stage: "Stage 3 - Live".into(),
            root_cause: vocab::RC_API_TIMEOUT.into(),
            confidence,
            reasoning: String::new(),
            evidence_terms: vec![],
        }
    }

    fn tickets() -> Vec<Ticket> {
        vec![Ticket::new("T-1", "api timeout"), Ticket::new("T-2", "504 again")]
    }

    #[test]
    fn worked_examples() {
        let gate = ReproPackGate::default();
        assert!(gate.should_generate(&analysis(0.85)));
        assert!(!gate.should_generate(&analysis(0.79)));
        assert!(gate.evaluate(&analysis(0.79), &tickets(), None).is_none());
    }

    #[test]
    fn preliminary_without_signal() {
        let pack = ReproPackGate::default()
            .evaluate(&analysis(0.85), &tickets(), None)
            .unwrap();
        assert_eq!(pack.pack_type, PackType::Preliminary);
        let expected: BTreeSet<String> = [
            "stage:Stage 3",
            "root_cause:Platform Issue",
            "confidence:0.85>=0.80",
            "ticket_count:2",
        ]
        .into_iter()
        .map(String::from)
        .collect();
        assert_eq!(pack.triggers, expected);
    }

    #[test]
    fn confirmed_with_signal() {
        let signal = SignalRecord::new("checkout_error_rate", 30.0, "1h");
        let pack = ReproPackGate::default().generate(&analysis(0.85), &tickets(), Some(&signal));
        assert_eq!(pack.pack_type, PackType::Confirmed);
        assert!(pack.triggers.contains("signal:checkout_error_rate=30%"));
        assert!(pack.triggers.contains("signal_threshold:checkout_error_rate>25%"));

        let calm = SignalRecord::new("checkout_error_rate", 3.5, "1h");
        let pack = ReproPackGate::default().generate(&analysis(0.85), &tickets(), Some(&calm));
        assert_eq!(pack.pack_type, PackType::Confirmed);
        assert!(pack.triggers.contains("signal:checkout_error_rate=3.5%"));
        assert!(!pack.triggers.iter().any(|t| t.starts_with("signal_threshold")));
    }

    #[test]
    fn id_and_path_are_deterministic() {
        let gate = ReproPackGate::from_policy(&TriagePolicy::default(), "/tmp/packs");
        let a = gate.generate(&analysis(0.9), &tickets(), None);
        let b = gate.generate(&analysis(0.9), &tickets(), None);
        assert_eq!(a, b);
        assert!(a.incident_id.starts_with("INC-"));
        assert_eq!(a.incident_id.len(), 20);
        assert_eq!(a.path, PathBuf::from(format!("/tmp/packs/{}.json", a.incident_id)));

        let other = gate.generate(&analysis(0.9), &tickets()[..1], None);
        assert_ne!(a.incident_id, other.incident_id);
    }

    #[test]
    fn gate_conditions() {
        let gate = ReproPackGate::default();
        let mut noise = analysis(0.99);
        noise.cluster_label = NOISE_LABEL;
        assert!(!gate.should_generate(&noise));

        let mut staging = analysis(0.99);
        staging.stage = vocab::STAGE_INTEGRATION.into();
        assert!(!gate.should_generate(&staging));

        // "Platform" alone is not enough for a pack.
        let mut vague = analysis(0.99);
        vague.root_cause = "Platform degradation".into();
        assert!(!gate.should_generate(&vague));
    }
}
