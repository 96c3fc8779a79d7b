//! Pairwise-to-cluster resolution module

pub mod detection;
pub mod metrics;

use serde::{Serialize, Deserialize};
use std::collections::HashMap;

/// One reported homology association between two identifiers
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pair {
    /// First identifier; always clustered
    pub id_one: String,

    /// Partner identifier, `None` when the row names no partner
    pub id_two: Option<String>,
}

impl Pair {
    pub fn new(id_one: impl Into<String>, id_two: impl Into<String>) -> Self {
        Self {
            id_one: id_one.into(),
            id_two: Some(id_two.into()),
        }
    }

    /// A pair with no partner; `id_one` becomes a singleton unless linked elsewhere
    pub fn unpartnered(id_one: impl Into<String>) -> Self {
        Self {
            id_one: id_one.into(),
            id_two: None,
        }
    }
}

/// A generated homology cluster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cluster {
    /// Generated identifier, `{prefix}:{n}`
    pub id: String,

    /// Members in identifier string order
    pub members: Vec<String>,
}

impl Cluster {
    pub fn size(&self) -> usize {
        self.members.len()
    }
}

/// Ordered mapping from generated cluster ID to members.
///
/// Built once per run by [`detection::cluster`] and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClusterRegistry {
    clusters: Vec<Cluster>,
    position: HashMap<String, usize>,
}

impl ClusterRegistry {
    pub(crate) fn from_clusters(clusters: Vec<Cluster>) -> Self {
        let position = clusters
            .iter()
            .enumerate()
            .map(|(i, c)| (c.id.clone(), i))
            .collect();
        Self { clusters, position }
    }

    /// Look up a cluster by its generated ID
    pub fn get(&self, cluster_id: &str) -> Option<&Cluster> {
        self.position.get(cluster_id).map(|&i| &self.clusters[i])
    }

    /// Clusters in ID assignment order
    pub fn iter(&self) -> std::slice::Iter<'_, Cluster> {
        self.clusters.iter()
    }

    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }
}
