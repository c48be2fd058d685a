use std::collections::BTreeMap;

use tracing::{debug, info};
use triage_core::config::ClusteringConfig;
use triage_core::{ClusterLabel, Ticket, TriageError, NOISE_LABEL};

use crate::algorithms::dbscan::{dbscan, DistanceMetric};

/// DBSCAN parameters for ticket clustering.
#[derive(Debug, Clone, PartialEq)]
pub struct ClustererConfig {
    pub eps: f64,
    pub min_pts: usize,
    pub metric: DistanceMetric,
}

impl Default for ClustererConfig {
    fn default() -> Self {
        Self {
            eps: 0.35,
            min_pts: 2,
            metric: DistanceMetric::Cosine,
        }
    }
}

impl ClustererConfig {
    pub fn from_config(cfg: &ClusteringConfig) -> Result<Self, TriageError> {
        let metric = cfg
            .metric
            .parse::<DistanceMetric>()
            .map_err(TriageError::Other)?;
        Ok(Self {
            eps: cfg.eps,
            min_pts: cfg.min_pts.max(1),
            metric,
        })
    }
}

/// Tickets grouped by cluster label.
///
/// Every input ticket appears in exactly one group, in input order within
/// the group. Labels iterate in ascending order, so noise (`-1`) comes first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClusterAssignment {
    groups: BTreeMap<ClusterLabel, Vec<Ticket>>,
}

impl ClusterAssignment {
    /// All groups, noise included.
    pub fn groups(&self) -> &BTreeMap<ClusterLabel, Vec<Ticket>> {
        &self.groups
    }

    pub fn get(&self, label: ClusterLabel) -> Option<&[Ticket]> {
        self.groups.get(&label).map(Vec::as_slice)
    }

    /// Tickets that joined no cluster.
    pub fn noise(&self) -> &[Ticket] {
        self.get(NOISE_LABEL).unwrap_or(&[])
    }

    /// Dense clusters only, in label order.
    pub fn clusters(&self) -> impl Iterator<Item = (ClusterLabel, &[Ticket])> {
        self.groups
            .iter()
            .filter(|(label, _)| **label != NOISE_LABEL)
            .map(|(label, tickets)| (*label, tickets.as_slice()))
    }

    pub fn num_clusters(&self) -> usize {
        self.clusters().count()
    }

    pub fn total_tickets(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    pub fn is_all_noise(&self) -> bool {
        self.num_clusters() == 0
    }
}

/// Groups tickets by embedding density.
#[derive(Debug, Clone, Default)]
pub struct Clusterer {
    config: ClustererConfig,
}

impl Clusterer {
    pub fn new(config: ClustererConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClustererConfig {
        &self.config
    }

    /// Cluster `tickets` using `embeddings` (one per ticket, by position).
    pub fn cluster(
        &self,
        tickets: &[Ticket],
        embeddings: &[Vec<f32>],
    ) -> Result<ClusterAssignment, TriageError> {
        if tickets.len() != embeddings.len() {
            return Err(TriageError::EmbeddingMismatch {
                tickets: tickets.len(),
                embeddings: embeddings.len(),
            });
        }
        if let Some(first) = embeddings.first() {
            let expected = first.len();
            if let Some((index, e)) = embeddings
                .iter()
                .enumerate()
                .find(|(_, e)| e.len() != expected)
            {
                return Err(TriageError::DimensionMismatch {
                    index,
                    expected,
                    actual: e.len(),
                });
            }
        }

        let result = dbscan(
            embeddings,
            self.config.eps,
            self.config.min_pts,
            self.config.metric,
        );

        let mut groups: BTreeMap<ClusterLabel, Vec<Ticket>> = BTreeMap::new();
        for (ticket, label) in tickets.iter().zip(result.labels.iter()) {
            groups.entry(*label).or_default().push(ticket.clone());
        }

        info!(
            tickets = tickets.len(),
            clusters = result.num_clusters,
            noise = result.noise_count(),
            "clustering complete"
        );
        for (label, group) in &groups {
            debug!(label, size = group.len(), "cluster group");
        }

        Ok(ClusterAssignment { groups })
    }
}
