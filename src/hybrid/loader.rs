//! Folding pre-grouped source rows into source clusters

use crate::error::{AmbiguousResolutionWarning, HomologyError};
use crate::hybrid::{MarkerRef, SourceCluster, SourceRole};
use std::collections::{BTreeMap, HashMap};

/// One `(clusterKey, identifier, organism)` row as stored by a source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRow {
    pub cluster_key: String,
    pub identifier: String,
    pub organism: String,
}

impl SourceRow {
    pub fn new(
        cluster_key: impl Into<String>,
        identifier: impl Into<String>,
        organism: impl Into<String>,
    ) -> Self {
        Self {
            cluster_key: cluster_key.into(),
            identifier: identifier.into(),
            organism: organism.into(),
        }
    }
}

/// Fold rows sharing a cluster key into one cluster each.
///
/// Clusters come out in order of first appearance; members keep row order.
pub fn load_source_clusters(
    rows: &[SourceRow],
    source: SourceRole,
) -> Result<Vec<SourceCluster>, HomologyError> {
    let mut clusters: Vec<SourceCluster> = Vec::new();
    let mut position: HashMap<&str, usize> = HashMap::new();

    for (i, row) in rows.iter().enumerate() {
        if row.cluster_key.is_empty() {
            return Err(HomologyError::input_shape(i + 1, "empty cluster key"));
        }
        if row.identifier.is_empty() {
            return Err(HomologyError::input_shape(i + 1, "empty member identifier"));
        }

        let idx = *position.entry(row.cluster_key.as_str()).or_insert_with(|| {
            clusters.push(SourceCluster::new(row.cluster_key.clone(), source));
            clusters.len() - 1
        });
        clusters[idx]
            .members
            .push(MarkerRef::new(row.identifier.clone(), row.organism.clone()));
    }

    log::info!(
        "Folded {} {:?} rows into {} clusters",
        rows.len(),
        source,
        clusters.len()
    );

    Ok(clusters)
}

/// Identifiers claimed by more than one cluster of the same source
pub fn find_ambiguous_members(
    clusters: &[SourceCluster],
    source_name: &str,
) -> Vec<AmbiguousResolutionWarning> {
    let mut owners: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for cluster in clusters {
        for member in &cluster.members {
            let keys = owners.entry(member.identifier.as_str()).or_default();
            if !keys.contains(&cluster.cluster_key.as_str()) {
                keys.push(cluster.cluster_key.as_str());
            }
        }
    }

    let warnings: Vec<AmbiguousResolutionWarning> = owners
        .into_iter()
        .filter(|(_, keys)| keys.len() > 1)
        .map(|(identifier, keys)| AmbiguousResolutionWarning {
            source: source_name.to_string(),
            identifier: identifier.to_string(),
            cluster_keys: keys.into_iter().map(str::to_string).collect(),
        })
        .collect();

    for warning in &warnings {
        log::warn!("{}", warning);
    }

    warnings
}
