//! Cluster statistics and metrics

use crate::cluster::ClusterRegistry;
use serde::Serialize;

/// Size statistics over one cluster registry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegistryStats {
    pub cluster_count: usize,
    pub member_count: usize,
    pub singleton_count: usize,
    pub largest_cluster_size: usize,
    pub avg_cluster_size: f64,
}

/// Calculate size statistics for a registry
pub fn calculate_registry_stats(registry: &ClusterRegistry) -> RegistryStats {
    let cluster_count = registry.len();
    let member_count: usize = registry.iter().map(|c| c.size()).sum();

    RegistryStats {
        cluster_count,
        member_count,
        singleton_count: registry.iter().filter(|c| c.size() == 1).count(),
        largest_cluster_size: registry.iter().map(|c| c.size()).max().unwrap_or(0),
        avg_cluster_size: member_count as f64
            / if cluster_count == 0 { 1.0 } else { cluster_count as f64 },
    }
}
