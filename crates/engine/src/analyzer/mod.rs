//! Cluster analyzers. Every variant produces the same [`ClusterAnalysis`]
//! shape, so the rest of the pipeline never knows which one ran.

mod evidence;
mod hybrid;
mod rule_based;
mod semantic;

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use triage_core::{ClusterAnalysis, ClusterLabel, Ticket, TriageError};

pub use evidence::evidence_terms;
pub use hybrid::HybridAnalyzer;
pub use rule_based::RuleBasedAnalyzer;
pub use semantic::SemanticAnalyzer;

/// Produces an assessment for one dense cluster.
#[async_trait]
pub trait ClusterAnalyzer: Send + Sync {
    async fn analyze(&self, label: ClusterLabel, tickets: &[Ticket]) -> Result<ClusterAnalysis, TriageError>;

    /// Short name for logs and the run report.
    fn name(&self) -> &str;
}

/// Which orchestration variant to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalyzerMode {
    /// Rulebook only; needs no external service.
    Rule,
    /// Classifier with rulebook fallback.
    Hybrid,
}

impl FromStr for AnalyzerMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "rule" | "rules" => Ok(Self::Rule),
            "hybrid" | "llm" => Ok(Self::Hybrid),
            other => Err(format!("unknown analyzer mode: '{other}'")),
        }
    }
}

impl fmt::Display for AnalyzerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rule => write!(f, "rule"),
            Self::Hybrid => write!(f, "hybrid"),
        }
    }
}
