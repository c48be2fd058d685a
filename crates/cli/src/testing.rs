//! Shared fixtures for the binary's unit tests.

use std::path::Path;
use std::sync::Arc;

use triage_compute::{Clusterer, ClustererConfig, DistanceMetric};
use triage_core::{SignalRecord, Snapshot, Ticket};
use triage_engine::{RuleBasedAnalyzer, RunReport, TriagePipeline};
use triage_rules::TriagePolicy;

/// A real rule-based run: one live API-timeout cluster (critical, with a
/// confirmed pack), one documentation cluster and one noise ticket.
pub fn sample_report(repro_dir: &Path) -> (RunReport, Snapshot) {
    let rows: [(&str, &str, [f32; 2]); 6] = [
        ("T-1", "Our live store API requests timeout since the deploy", [1.0, 0.0]),
        ("T-2", "How do I set up webhooks? The docs are unclear", [0.0, 1.0]),
        ("T-3", "Production API calls fail with 504", [1.1, 0.0]),
        ("T-4", "Random question about our invoice address", [50.0, 50.0]),
        ("T-5", "Customers see timeout errors on orders", [1.0, 0.1]),
        ("T-6", "Need an example of how to verify signatures, docs missing it", [0.0, 1.1]),
    ];
    let snapshot = Snapshot {
        tickets: rows.iter().map(|(id, msg, _)| Ticket::new(*id, *msg)).collect(),
        embeddings: rows.iter().map(|(_, _, e)| e.to_vec()).collect(),
        signal: Some(SignalRecord::new("checkout_error_rate", 30.0, "1h")),
    };

    let clusterer = Clusterer::new(ClustererConfig {
        eps: 0.5,
        min_pts: 2,
        metric: DistanceMetric::Euclidean,
    });
    let pipeline = TriagePipeline::new(clusterer, Arc::new(RuleBasedAnalyzer::new()), TriagePolicy::default())
        .with_repro_dir(repro_dir);

    let rt = tokio::runtime::Runtime::new().unwrap();
    let report = rt.block_on(pipeline.run(&snapshot)).unwrap();
    (report, snapshot)
}
