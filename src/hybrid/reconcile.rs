//! Cross-source connectivity of source clusters

use crate::config::Config;
use crate::error::HomologyError;
use crate::graph::algorithms::connected_components;
use crate::graph::CompressedGraph;
use crate::hybrid::rules::decide;
use crate::hybrid::{HybridDecision, SourceCluster, SourceRole};
use rayon::prelude::*;
use std::collections::HashMap;

/// Identifier → owning clusters, one map per source.
///
/// Clusters are addressed by node index: primary clusters take `0..p`,
/// secondary clusters `p..p+s`. Owned by a single reconciliation run.
pub struct ClusterIndex<'a> {
    primary: HashMap<&'a str, Vec<u32>>,
    secondary: HashMap<&'a str, Vec<u32>>,
}

impl<'a> ClusterIndex<'a> {
    pub fn new(primary: &'a [SourceCluster], secondary: &'a [SourceCluster]) -> Self {
        Self {
            primary: index_members(primary, 0),
            secondary: index_members(secondary, primary.len() as u32),
        }
    }

    /// Clusters of `source` that contain `identifier`
    pub fn owners(&self, source: SourceRole, identifier: &str) -> &[u32] {
        let map = match source {
            SourceRole::Primary => &self.primary,
            SourceRole::Secondary => &self.secondary,
        };
        map.get(identifier).map(Vec::as_slice).unwrap_or(&[])
    }
}

fn index_members(clusters: &[SourceCluster], offset: u32) -> HashMap<&str, Vec<u32>> {
    let mut index: HashMap<&str, Vec<u32>> = HashMap::new();
    for (i, cluster) in clusters.iter().enumerate() {
        let node = offset + i as u32;
        for member in &cluster.members {
            let owners = index.entry(member.identifier.as_str()).or_default();
            if owners.last() != Some(&node) {
                owners.push(node);
            }
        }
    }
    index
}

/// Reconcile with the default organism priority (human before mouse)
pub fn reconcile_hybrid(
    primary: &[SourceCluster],
    secondary: &[SourceCluster],
) -> Result<Vec<HybridDecision>, HomologyError> {
    reconcile_hybrid_with(primary, secondary, &Config::default())
}

/// Group clusters of both sources into connected components and decide
/// which clusters each component keeps.
///
/// Two clusters are linked when they come from different sources and share a
/// member identifier. Components are numbered in order of their first
/// cluster, primary clusters first.
pub fn reconcile_hybrid_with(
    primary: &[SourceCluster],
    secondary: &[SourceCluster],
    config: &Config,
) -> Result<Vec<HybridDecision>, HomologyError> {
    validate(primary, SourceRole::Primary)?;
    validate(secondary, SourceRole::Secondary)?;

    log::info!(
        "Reconciling {} primary and {} secondary clusters",
        primary.len(),
        secondary.len()
    );

    let all: Vec<&SourceCluster> = primary.iter().chain(secondary.iter()).collect();
    let index = ClusterIndex::new(primary, secondary);

    // Supernode graph: edges only cross between sources
    let adjacency: Vec<Vec<u32>> = all
        .iter()
        .map(|cluster| {
            let other = cluster.source.other();
            cluster
                .members
                .iter()
                .flat_map(|m| index.owners(other, &m.identifier).iter().copied())
                .collect()
        })
        .collect();
    let graph = CompressedGraph::from_adjacency(adjacency);

    let components = connected_components(&graph);
    check_partition(&components, all.len())?;

    log::info!("Found {} connected components", components.len());

    let decisions: Vec<HybridDecision> = components
        .into_par_iter()
        .enumerate()
        .map(|(i, nodes)| {
            let clusters = nodes.iter().map(|&n| all[n as usize].clone()).collect();
            decide(i + 1, clusters, config)
        })
        .collect();

    Ok(decisions)
}

fn validate(clusters: &[SourceCluster], expected: SourceRole) -> Result<(), HomologyError> {
    for (i, cluster) in clusters.iter().enumerate() {
        if cluster.source != expected {
            return Err(HomologyError::input_shape(
                i + 1,
                format!(
                    "cluster {} is tagged {:?} but was supplied as {:?}",
                    cluster.cluster_key, cluster.source, expected
                ),
            ));
        }
        if cluster.members.is_empty() {
            return Err(HomologyError::input_shape(
                i + 1,
                format!("cluster {} has no members", cluster.cluster_key),
            ));
        }
    }
    Ok(())
}

/// Every cluster must land in exactly one component
fn check_partition(components: &[Vec<u32>], cluster_count: usize) -> Result<(), HomologyError> {
    let mut seen = vec![false; cluster_count];
    for component in components {
        if component.is_empty() {
            return Err(HomologyError::InternalConsistency(
                "empty connected component".to_string(),
            ));
        }
        for &node in component {
            let slot = seen.get_mut(node as usize).ok_or_else(|| {
                HomologyError::InternalConsistency(format!("component references unknown cluster {}", node))
            })?;
            if *slot {
                return Err(HomologyError::InternalConsistency(format!(
                    "cluster {} visited twice",
                    node
                )));
            }
            *slot = true;
        }
    }

    if let Some(missing) = seen.iter().position(|&s| !s) {
        return Err(HomologyError::InternalConsistency(format!(
            "cluster {} not reached by any traversal",
            missing
        )));
    }

    Ok(())
}
