//! Structured run output, ready for rendering or JSON serialisation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use triage_compute::{Trajectory, TrendInfo};
use triage_core::{ClusterAnalysis, Ticket, TicketId};
use uuid::Uuid;

use crate::alert::GlobalAlertState;
use crate::correlator::ProactiveAlert;
use crate::counterfactual::Alternative;
use crate::decision::{Decision, RiskLevel};
use crate::repro::ReproPackDescriptor;
use crate::restraint::Restraint;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterReport {
    pub analysis: ClusterAnalysis,
    /// Member tickets, in input order.
    pub ticket_ids: Vec<TicketId>,
    pub trend: TrendInfo,
    pub alternatives: Vec<Alternative>,
    pub decision: Decision,
    pub restraint: Restraint,
    pub projected_outcome: String,
    pub repro_pack: Option<ReproPackDescriptor>,
}

/// Tickets that joined no cluster. Listed, never analysed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NoiseSummary {
    pub ticket_count: usize,
    pub ticket_ids: Vec<TicketId>,
}

impl NoiseSummary {
    pub fn from_tickets(tickets: &[Ticket]) -> Self {
        Self {
            ticket_count: tickets.len(),
            ticket_ids: tickets.iter().map(|t| t.id.clone()).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub vocabulary_version: String,
    pub analyzer: String,
    pub ticket_count: usize,
    pub noise: NoiseSummary,
    pub trend: TrendInfo,
    pub clusters: Vec<ClusterReport>,
    pub global: GlobalAlertState,
    pub proactive: Option<ProactiveAlert>,
}

impl RunReport {
    /// Descriptors of every pack triggered in this run, in cluster order.
    pub fn repro_packs(&self) -> impl Iterator<Item = &ReproPackDescriptor> {
        self.clusters.iter().filter_map(|c| c.repro_pack.as_ref())
    }

    /// Everything except the envelope (`run_id`, `generated_at`), for
    /// comparing runs.
    pub fn same_outcome(&self, other: &RunReport) -> bool {
        self.vocabulary_version == other.vocabulary_version
            && self.analyzer == other.analyzer
            && self.ticket_count == other.ticket_count
            && self.noise == other.noise
            && self.trend == other.trend
            && self.clusters == other.clusters
            && self.global == other.global
            && self.proactive == other.proactive
    }
}

/// One-line outlook for a cluster given its decision and the run's trend.
pub fn projected_outcome(decision: &Decision, trend: &TrendInfo) -> String {
    let base = match decision.risk_level {
        RiskLevel::High => "With on-call engaged, the incident should be contained before merchant impact widens.",
        RiskLevel::Medium => "Ticket volume for this cluster should plateau once the owning team acts.",
        RiskLevel::Low => "Expected to resolve through the standard support queue without escalation.",
    };
    let outlook = match trend.trajectory {
        Trajectory::Accelerating => " Telemetry is accelerating, so expect new related tickets until mitigation lands.",
        Trajectory::Rising => " Telemetry is rising; related tickets may keep arriving.",
        Trajectory::Recovering => " Telemetry is recovering, which supports a quick resolution.",
        Trajectory::Stable => "",
        Trajectory::NoTelemetry => " No telemetry is available to confirm this.",
    };
    format!("{base}{outlook}")
}
