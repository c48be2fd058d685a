use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use triage_compute::{Clusterer, ClustererConfig, DistanceMetric, Trajectory};
use triage_core::{vocab, Classification, Classifier, SignalRecord, Snapshot, Ticket, TriageError};
use triage_engine::{
    AlertStatus, ClusterAnalyzer, HybridAnalyzer, PackType, RestraintKind, RiskLevel, RuleBasedAnalyzer,
    SemanticAnalyzer, TriagePipeline,
};
use triage_rules::TriagePolicy;

/// Two dense groups and one outlier, interleaved so input order matters.
fn snapshot(signal: Option<SignalRecord>) -> Snapshot {
    let rows: [(&str, &str, [f32; 3]); 6] = [
        ("T-100", "Our live store API requests timeout since the deploy", [1.0, 0.0, 0.0]),
        ("T-101", "How do I set up webhooks? The docs are unclear", [0.0, 1.0, 0.0]),
        ("T-102", "Production API calls fail with 504", [1.1, 0.0, 0.0]),
        ("T-103", "Random question about our invoice address", [0.0, 0.0, 50.0]),
        ("T-104", "Customers see timeout errors on orders", [1.0, 0.1, 0.0]),
        ("T-105", "Need an example of how to verify signatures, docs missing it", [0.0, 1.1, 0.0]),
    ];
    Snapshot {
        tickets: rows.iter().map(|(id, msg, _)| Ticket::new(*id, *msg)).collect(),
        embeddings: rows.iter().map(|(_, _, e)| e.to_vec()).collect(),
        signal,
    }
}

fn checkout_signal() -> SignalRecord {
    SignalRecord::new("checkout_error_rate", 30.0, "1h")
}

fn clusterer() -> Clusterer {
    Clusterer::new(ClustererConfig {
        eps: 0.5,
        min_pts: 2,
        metric: DistanceMetric::Euclidean,
    })
}

fn pipeline(analyzer: Arc<dyn ClusterAnalyzer>) -> TriagePipeline {
    TriagePipeline::new(clusterer(), analyzer, TriagePolicy::default())
        .with_repro_dir("packs")
        .with_concurrency(2)
}

fn rule_pipeline() -> TriagePipeline {
    pipeline(Arc::new(RuleBasedAnalyzer::new()))
}

#[tokio::test]
async fn full_run_with_signal() {
    let report = rule_pipeline().run(&snapshot(Some(checkout_signal()))).await.unwrap();

    assert_eq!(report.ticket_count, 6);
    assert_eq!(report.noise.ticket_count, 1);
    assert_eq!(report.noise.ticket_ids[0].0, "T-103");
    assert_eq!(report.trend.trajectory, Trajectory::Accelerating);
    assert_eq!(report.clusters.len(), 2);

    // Cluster 0: live API timeouts.
    let api = &report.clusters[0];
    assert_eq!(api.analysis.cluster_label, 0);
    assert_eq!(api.analysis.ticket_count, 3);
    assert_eq!(api.analysis.root_cause, vocab::RC_API_TIMEOUT);
    assert_eq!(api.analysis.stage, vocab::STAGE_LIVE);
    assert!(api.analysis.confidence >= 0.8);
    assert_eq!(api.decision.risk_level, RiskLevel::High);
    assert_eq!(api.restraint.kind, RestraintKind::AutoRollback);
    assert_eq!(api.alternatives.len(), 3);
    assert!(api.alternatives.iter().all(|a| a.hypothesis != vocab::RC_API_TIMEOUT));
    let pack = api.repro_pack.as_ref().unwrap();
    assert_eq!(pack.pack_type, PackType::Confirmed);
    assert!(pack.path.starts_with("packs"));
    assert!(pack.triggers.contains("signal_threshold:checkout_error_rate>25%"));
    assert!(pack.triggers.contains("ticket_count:3"));

    // Cluster 1: documentation questions.
    let docs = &report.clusters[1];
    assert_eq!(docs.analysis.root_cause, vocab::RC_DOCUMENTATION_GAP);
    assert_eq!(docs.decision.risk_level, RiskLevel::Low);
    assert_eq!(docs.restraint.kind, RestraintKind::ExecutiveEscalation);
    assert!(docs.repro_pack.is_none());

    assert_eq!(report.global.status, AlertStatus::Critical);
    assert_eq!(report.global.severe_clusters.len(), 1);
    assert_eq!(report.global.recommendation, "FREEZE DEPLOYMENTS & PAGE ON-CALL");

    // No cluster mentions checkout or payment, so telemetry is ahead of tickets.
    let proactive = report.proactive.as_ref().unwrap();
    assert_eq!(proactive.value, 30.0);
    assert_eq!(proactive.assumption, "Issue detected before merchant reports.");

    assert_eq!(report.repro_packs().count(), 1);
}

#[tokio::test]
async fn without_signal_everything_still_works() {
    let report = rule_pipeline().run(&snapshot(None)).await.unwrap();
    assert_eq!(report.trend.trajectory, Trajectory::NoTelemetry);
    assert!(report.proactive.is_none());
    let pack = report.clusters[0].repro_pack.as_ref().unwrap();
    assert_eq!(pack.pack_type, PackType::Preliminary);
    assert!(!pack.triggers.iter().any(|t| t.starts_with("signal")));
    assert!(report.global.status == AlertStatus::Critical);
}

#[tokio::test]
async fn reruns_are_identical() {
    let p = rule_pipeline();
    let snap = snapshot(Some(checkout_signal()));
    let a = p.run(&snap).await.unwrap();
    let b = p.run(&snap).await.unwrap();
    assert!(a.same_outcome(&b));
    assert_ne!(a.run_id, b.run_id);
}

#[tokio::test]
async fn concurrency_does_not_change_results() {
    let snap = snapshot(Some(checkout_signal()));
    let serial = rule_pipeline().with_concurrency(1).run(&snap).await.unwrap();
    let wide = rule_pipeline().with_concurrency(16).run(&snap).await.unwrap();
    assert!(serial.same_outcome(&wide));
}

struct ScriptedClassifier {
    reply: Option<Classification>,
}

#[async_trait]
impl Classifier for ScriptedClassifier {
    async fn classify(&self, _text: &str) -> Result<Classification, TriageError> {
        self.reply
            .clone()
            .ok_or_else(|| TriageError::Classifier("model offline".into()))
    }
}

fn reply(root_cause: &str) -> Classification {
    Classification {
        root_cause: root_cause.into(),
        stage: "Stage 3 - Live Production".into(),
        confidence: json!(0.9),
        reasoning: "free-text label".into(),
    }
}

fn semantic_only(reply: Classification) -> TriagePipeline {
    pipeline(Arc::new(SemanticAnalyzer::new(Arc::new(ScriptedClassifier { reply: Some(reply) }))))
}

fn hybrid(reply: Option<Classification>) -> TriagePipeline {
    let semantic = SemanticAnalyzer::new(Arc::new(ScriptedClassifier { reply }));
    pipeline(Arc::new(HybridAnalyzer::new(semantic)))
}

#[tokio::test]
async fn payment_cluster_suppresses_proactive_alert() {
    let reply = Classification {
        root_cause: "Payment Gateway Platform Issue".into(),
        stage: "Stage 3 - Live".into(),
        confidence: json!("0.85"),
        reasoning: "gateway errors".into(),
    };
    let report = hybrid(Some(reply)).run(&snapshot(Some(checkout_signal()))).await.unwrap();

    assert_eq!(report.analyzer, "hybrid");
    assert!(report
        .clusters
        .iter()
        .all(|c| c.analysis.root_cause == vocab::RC_CHECKOUT_FAILURE && c.analysis.confidence == 0.85));
    assert!(report.proactive.is_none());
    // Only the three-ticket cluster clears the global ticket-count bar.
    assert_eq!(report.global.severe_clusters.len(), 1);
    // Both clusters clear the pack gate.
    assert_eq!(report.repro_packs().count(), 2);
}

#[tokio::test]
async fn classifier_outage_degrades_to_rules() {
    let snap = snapshot(Some(checkout_signal()));
    let degraded = hybrid(None).run(&snap).await.unwrap();
    let rules = rule_pipeline().run(&snap).await.unwrap();

    assert_eq!(degraded.clusters.len(), rules.clusters.len());
    for (d, r) in degraded.clusters.iter().zip(&rules.clusters) {
        assert_eq!(d.analysis.root_cause, r.analysis.root_cause);
        assert_eq!(d.analysis.confidence, r.analysis.confidence);
        assert_eq!(d.decision, r.decision);
        assert_eq!(d.restraint, r.restraint);
        assert!(d.analysis.reasoning.contains("classifier unavailable"));
    }
    assert_eq!(degraded.global, rules.global);
    assert_eq!(degraded.proactive, rules.proactive);
}

#[tokio::test]
async fn free_text_payment_label_keeps_checkout_coverage() {
    let snap = snapshot(Some(checkout_signal()));
    let report = hybrid(Some(reply("Payment Processor Timeout"))).run(&snap).await.unwrap();

    assert!(report
        .clusters
        .iter()
        .all(|c| c.analysis.root_cause == vocab::RC_CHECKOUT_FAILURE));
    assert!(report.proactive.is_none());
}

#[tokio::test]
async fn bare_symptom_labels_do_not_invent_platform_issues() {
    let snap = snapshot(Some(checkout_signal()));
    for label in ["Timeout", "Platform degradation"] {
        let report = semantic_only(reply(label)).run(&snap).await.unwrap();
        assert!(
            report.clusters.iter().all(|c| c.analysis.root_cause == vocab::RC_UNDETERMINED),
            "{label}"
        );
        assert_eq!(report.global.status, AlertStatus::Normal, "{label}");
        assert_eq!(report.repro_packs().count(), 0, "{label}");
    }
}

#[tokio::test]
async fn hybrid_keeps_rulebook_root_cause_for_unrecognised_labels() {
    let snap = snapshot(Some(checkout_signal()));
    let rules = rule_pipeline().run(&snap).await.unwrap();
    for label in ["Timeout", "Platform degradation"] {
        let report = hybrid(Some(reply(label))).run(&snap).await.unwrap();
        for (h, r) in report.clusters.iter().zip(&rules.clusters) {
            assert_eq!(h.analysis.root_cause, r.analysis.root_cause, "{label}");
            assert_eq!(h.analysis.confidence, r.analysis.confidence, "{label}");
        }
        // The documentation cluster never picks up a platform label.
        assert_eq!(report.clusters[1].analysis.root_cause, vocab::RC_DOCUMENTATION_GAP);
        assert_eq!(report.global.severe_clusters.len(), 1, "{label}");
    }
}
