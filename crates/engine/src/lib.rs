//! Per-cluster assessment and run-level decision logic.
//!
//! Everything here is a pure function of the run snapshot and the loaded
//! [`TriagePolicy`](triage_rules::TriagePolicy), except the analyzers, which
//! may consult an external classifier.

pub mod alert;
pub mod analyzer;
pub mod correlator;
pub mod counterfactual;
pub mod decision;
pub mod pipeline;
pub mod report;
pub mod repro;
pub mod restraint;
pub mod rulebook;

pub use alert::{AlertStatus, GlobalAlertAggregator, GlobalAlertState};
pub use analyzer::{AnalyzerMode, ClusterAnalyzer, HybridAnalyzer, RuleBasedAnalyzer, SemanticAnalyzer};
pub use correlator::{ProactiveAlert, ProactiveCorrelator};
pub use counterfactual::{Alternative, CounterfactualGenerator};
pub use decision::{Decision, DecisionEngine, RiskLevel};
pub use pipeline::{AnalysisLedger, TriagePipeline};
pub use report::{ClusterReport, NoiseSummary, RunReport};
pub use repro::{PackType, ReproPackDescriptor, ReproPackGate};
pub use restraint::{Restraint, RestraintKind, RestraintLogic};
