//! Clustering and signal-trajectory computation for the triage pipeline.

pub mod algorithms;
pub mod cluster;
pub mod trajectory;

pub use algorithms::dbscan::{dbscan, DbscanResult, DistanceMetric};
pub use cluster::{ClusterAssignment, Clusterer, ClustererConfig};
pub use trajectory::{analyze_signal_trend, Trajectory, TrendInfo};
