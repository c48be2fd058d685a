use std::collections::VecDeque;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use triage_core::{ClusterLabel, NOISE_LABEL};

/// Distance function used for neighbourhood queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceMetric {
    /// `1 - cosine_similarity`, in `[0, 2]`. Suited to sentence embeddings.
    Cosine,
    Euclidean,
}

impl std::str::FromStr for DistanceMetric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cosine" => Ok(Self::Cosine),
            "euclidean" => Ok(Self::Euclidean),
            other => Err(format!("unknown distance metric: '{other}'")),
        }
    }
}

impl std::fmt::Display for DistanceMetric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cosine => write!(f, "cosine"),
            Self::Euclidean => write!(f, "euclidean"),
        }
    }
}

/// Result of DBSCAN clustering.
#[derive(Debug, Clone, PartialEq)]
pub struct DbscanResult {
    /// One label per input point, by position. Noise is [`NOISE_LABEL`].
    pub labels: Vec<ClusterLabel>,
    /// Total number of clusters found.
    pub num_clusters: usize,
}

impl DbscanResult {
    pub fn noise_count(&self) -> usize {
        self.labels.iter().filter(|&&l| l == NOISE_LABEL).count()
    }
}

/// Run DBSCAN density-based clustering over positional vectors.
///
/// # Arguments
/// * `points`: one vector per item
/// * `eps`: neighbourhood radius under `metric`
/// * `min_pts`: minimum number of neighbours (including the point itself) to form a core point
///
/// Points are visited in input order and clusters are numbered in discovery
/// order, so the result is a pure function of the inputs.
pub fn dbscan(points: &[Vec<f32>], eps: f64, min_pts: usize, metric: DistanceMetric) -> DbscanResult {
    let n = points.len();
    if n == 0 {
        return DbscanResult {
            labels: Vec::new(),
            num_clusters: 0,
        };
    }

    // Pairwise neighbour lists, computed in parallel. Each list is built in
    // index order, which keeps expansion order deterministic.
    let neighbors: Vec<Vec<usize>> = (0..n)
        .into_par_iter()
        .map(|i| {
            (0..n)
                .filter(|&j| distance(&points[i], &points[j], metric) <= eps)
                .collect()
        })
        .collect();

    let mut labels: Vec<Option<ClusterLabel>> = vec![None; n];
    let mut visited = vec![false; n];
    let mut current_cluster: ClusterLabel = 0;

    for i in 0..n {
        if visited[i] {
            continue;
        }
        visited[i] = true;

        if neighbors[i].len() < min_pts {
            // Not a core point; tentatively noise (may be claimed by a cluster later).
            continue;
        }

        labels[i] = Some(current_cluster);

        let mut queue: VecDeque<usize> = neighbors[i]
            .iter()
            .copied()
            .filter(|&j| j != i)
            .collect();

        while let Some(j) = queue.pop_front() {
            if labels[j].is_none() {
                labels[j] = Some(current_cluster);
            }

            if visited[j] {
                continue;
            }
            visited[j] = true;

            if neighbors[j].len() >= min_pts {
                for &nb in &neighbors[j] {
                    if labels[nb].is_none() {
                        queue.push_back(nb);
                    }
                }
            }
        }

        current_cluster += 1;
    }

    DbscanResult {
        labels: labels.into_iter().map(|l| l.unwrap_or(NOISE_LABEL)).collect(),
        num_clusters: current_cluster as usize,
    }
}

fn distance(a: &[f32], b: &[f32], metric: DistanceMetric) -> f64 {
    match metric {
        DistanceMetric::Euclidean => squared_euclidean(a, b).sqrt(),
        DistanceMetric::Cosine => 1.0 - cosine_similarity(a, b),
    }
}

#[inline]
fn squared_euclidean(a: &[f32], b: &[f32]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = f64::from(*x) - f64::from(*y);
            d * d
        })
        .sum()
}

/// Cosine similarity. Returns 0.0 for zero-norm vectors.
pub(crate) fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    let mut dot = 0.0;
    let mut norm_a = 0.0;
    let mut norm_b = 0.0;
    for (x, y) in a.iter().zip(b.iter()) {
        let (x, y) = (f64::from(*x), f64::from(*y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom <= f64::EPSILON {
        return 0.0;
    }
    (dot / denom).clamp(-1.0, 1.0)
}
