//! End-to-end triage run over one snapshot.
//!
//! Clusters are analysed concurrently; every run-level step (global alert,
//! proactive correlation) waits until the ledger holds all of them.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use futures::stream::{self, StreamExt};
use tracing::{debug, info};
use triage_compute::{analyze_signal_trend, Clusterer, TrendInfo};
use triage_core::{aggregate_text, vocab, ClusterAnalysis, Snapshot, Ticket, TriageError};
use triage_rules::TriagePolicy;
use uuid::Uuid;

use crate::alert::GlobalAlertAggregator;
use crate::analyzer::ClusterAnalyzer;
use crate::correlator::ProactiveCorrelator;
use crate::counterfactual::CounterfactualGenerator;
use crate::decision::DecisionEngine;
use crate::repro::ReproPackGate;
use crate::report::{projected_outcome, ClusterReport, NoiseSummary, RunReport};
use crate::restraint::RestraintLogic;

const DEFAULT_CONCURRENCY: usize = 4;

/// Per-cluster analyses collected at the join point, in label order.
#[derive(Debug, Default)]
pub struct AnalysisLedger<'a> {
    analyses: Vec<ClusterAnalysis>,
    tickets: Vec<&'a [Ticket]>,
}

impl<'a> AnalysisLedger<'a> {
    pub fn record(&mut self, analysis: ClusterAnalysis, tickets: &'a [Ticket]) {
        self.analyses.push(analysis);
        self.tickets.push(tickets);
    }

    pub fn analyses(&self) -> &[ClusterAnalysis] {
        &self.analyses
    }

    pub fn entries(&self) -> impl Iterator<Item = (&ClusterAnalysis, &'a [Ticket])> + '_ {
        self.analyses.iter().zip(self.tickets.iter().copied())
    }

    pub fn len(&self) -> usize {
        self.analyses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.analyses.is_empty()
    }
}

pub struct TriagePipeline {
    clusterer: Clusterer,
    analyzer: Arc<dyn ClusterAnalyzer>,
    policy: TriagePolicy,
    counterfactuals: CounterfactualGenerator,
    decisions: DecisionEngine,
    restraint: RestraintLogic,
    aggregator: GlobalAlertAggregator,
    correlator: ProactiveCorrelator,
    repro: ReproPackGate,
    concurrency: usize,
}

impl TriagePipeline {
    pub fn new(clusterer: Clusterer, analyzer: Arc<dyn ClusterAnalyzer>, policy: TriagePolicy) -> Self {
        Self {
            clusterer,
            analyzer,
            counterfactuals: CounterfactualGenerator::new(policy.counterfactual.clone()),
            decisions: DecisionEngine::new(policy.decision.clone()),
            restraint: RestraintLogic::new(policy.restraint.clone()),
            aggregator: GlobalAlertAggregator::new(policy.global_alert.clone()),
            correlator: ProactiveCorrelator::new(policy.proactive.clone()),
            repro: ReproPackGate::from_policy(&policy, "repro_packs"),
            policy,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    /// Directory that reproduction-pack paths point into.
    pub fn with_repro_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.repro = ReproPackGate::from_policy(&self.policy, dir);
        self
    }

    /// Maximum clusters analysed at once. Clamped to at least 1.
    pub fn with_concurrency(mut self, n: usize) -> Self {
        self.concurrency = n.max(1);
        self
    }

    pub fn policy(&self) -> &TriagePolicy {
        &self.policy
    }

    pub async fn run(&self, snapshot: &Snapshot) -> Result<RunReport, TriageError> {
        let start = Instant::now();
        let signal = snapshot.signal.as_ref();

        let assignment = self.clusterer.cluster(&snapshot.tickets, &snapshot.embeddings)?;
        let trend = analyze_signal_trend(signal, &self.policy.trajectory);

        // Noise is reported, never analysed.
        let mut results = stream::iter(assignment.clusters())
            .map(|(label, tickets)| {
                let analyzer = Arc::clone(&self.analyzer);
                async move { analyzer.analyze(label, tickets).await.map(|a| (a, tickets)) }
            })
            .buffered(self.concurrency);

        let mut ledger = AnalysisLedger::default();
        while let Some(result) = results.next().await {
            let (analysis, tickets) = result?;
            debug!(
                label = analysis.cluster_label,
                root_cause = %analysis.root_cause,
                confidence = analysis.confidence,
                "cluster analysed"
            );
            ledger.record(analysis, tickets);
        }

        let clusters: Vec<ClusterReport> = ledger
            .entries()
            .map(|(analysis, tickets)| self.cluster_report(analysis, tickets, &trend, snapshot))
            .collect();

        let global = self.aggregator.aggregate(ledger.analyses());
        let proactive = self.correlator.correlate(signal, ledger.analyses());

        info!(
            analyzer = self.analyzer.name(),
            tickets = snapshot.tickets.len(),
            clusters = ledger.len(),
            noise = assignment.noise().len(),
            global = ?global.status,
            proactive = proactive.is_some(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "triage run complete"
        );

        Ok(RunReport {
            run_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            vocabulary_version: vocab::VOCABULARY_VERSION.to_string(),
            analyzer: self.analyzer.name().to_string(),
            ticket_count: snapshot.tickets.len(),
            noise: NoiseSummary::from_tickets(assignment.noise()),
            trend,
            clusters,
            global,
            proactive,
        })
    }

    fn cluster_report(
        &self,
        analysis: &ClusterAnalysis,
        tickets: &[Ticket],
        trend: &TrendInfo,
        snapshot: &Snapshot,
    ) -> ClusterReport {
        let text = aggregate_text(tickets);
        let alternatives = self
            .counterfactuals
            .generate_alternatives(&analysis.root_cause, &text);
        let decision = self.decisions.determine_action(analysis);
        let restraint = self.restraint.evaluate(decision.risk_level, analysis.confidence);
        let repro_pack = self.repro.evaluate(analysis, tickets, snapshot.signal.as_ref());

        ClusterReport {
            analysis: analysis.clone(),
            ticket_ids: tickets.iter().map(|t| t.id.clone()).collect(),
            trend: trend.clone(),
            alternatives,
            projected_outcome: projected_outcome(&decision, trend),
            decision,
            restraint,
            repro_pack,
        }
    }
}
