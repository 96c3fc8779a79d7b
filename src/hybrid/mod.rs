//! Hybrid reconciliation of two sources' homology clusters

pub mod loader;
pub mod reconcile;
pub mod rules;

pub use reconcile::{reconcile_hybrid, reconcile_hybrid_with};

use crate::config::Config;
use serde::{Serialize, Deserialize};
use std::collections::BTreeSet;
use std::fmt;

/// Which of the two reconciled sources a cluster came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceRole {
    Primary,
    Secondary,
}

impl SourceRole {
    pub fn other(self) -> Self {
        match self {
            SourceRole::Primary => SourceRole::Secondary,
            SourceRole::Secondary => SourceRole::Primary,
        }
    }

    /// Configured display name of this source
    pub fn name(self, config: &Config) -> &str {
        match self {
            SourceRole::Primary => &config.primary_source,
            SourceRole::Secondary => &config.secondary_source,
        }
    }
}

/// A cluster member with its organism.
///
/// Organism tags are stored lowercase so span checks and output ordering agree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerRef {
    pub identifier: String,
    pub organism: String,
}

impl MarkerRef {
    pub fn new(identifier: impl Into<String>, organism: impl Into<String>) -> Self {
        let organism: String = organism.into();
        Self {
            identifier: identifier.into(),
            organism: organism.to_ascii_lowercase(),
        }
    }
}

/// A pre-existing cluster as recorded by one source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceCluster {
    /// The source's own key for this cluster
    pub cluster_key: String,

    pub source: SourceRole,

    /// Members in the order the source listed them
    pub members: Vec<MarkerRef>,
}

impl SourceCluster {
    pub fn new(cluster_key: impl Into<String>, source: SourceRole) -> Self {
        Self {
            cluster_key: cluster_key.into(),
            source,
            members: Vec::new(),
        }
    }

    /// Builder-style helper for adding a member
    pub fn with_member(mut self, identifier: impl Into<String>, organism: impl Into<String>) -> Self {
        self.members.push(MarkerRef::new(identifier, organism));
        self
    }

    /// Distinct organisms spanned by the members
    pub fn organisms(&self) -> BTreeSet<&str> {
        self.members.iter().map(|m| m.organism.as_str()).collect()
    }

    pub fn is_multi_organism(&self) -> bool {
        self.organisms().len() > 1
    }

    /// Member identifiers as a set, ignoring order and organism
    pub fn identifier_set(&self) -> BTreeSet<&str> {
        self.members.iter().map(|m| m.identifier.as_str()).collect()
    }

    /// Copy with members stably reordered by configured organism priority
    pub fn ordered_by_organism(&self, config: &Config) -> SourceCluster {
        let mut members = self.members.clone();
        members.sort_by_key(|m| config.organism_rank(&m.organism));
        SourceCluster {
            cluster_key: self.cluster_key.clone(),
            source: self.source,
            members,
        }
    }
}

/// Provenance of a retained hybrid cluster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HybridSource {
    Source(SourceRole),
    /// Both sources reported the identical cluster
    Both,
}

impl HybridSource {
    pub fn display(self, config: &Config) -> String {
        match self {
            HybridSource::Source(role) => role.name(config).to_string(),
            HybridSource::Both => format!("{} and {}", config.primary_source, config.secondary_source),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Conflict {
    None,
    Conflict,
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Conflict::None => f.write_str("none"),
            Conflict::Conflict => f.write_str("conflict"),
        }
    }
}

/// Rule that produced a hybrid decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rule {
    /// Rule 1: one multi-organism cluster per source, same members
    IdenticalPair,
    /// Rule 2: the component is a single cluster
    Singleton,
    /// Rule 3: only one source has multi-organism clusters
    Asymmetric,
    /// Rule 3b: every cluster spans a single organism
    SingleOrganism,
    /// Rule 4: both sources have multi-organism clusters that disagree
    Disagreement,
}

impl Rule {
    pub fn id(self) -> &'static str {
        match self {
            Rule::IdenticalPair => "1",
            Rule::Singleton => "2",
            Rule::Asymmetric => "3",
            Rule::SingleOrganism => "3b",
            Rule::Disagreement => "4",
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Outcome of the rule engine for one connected component of clusters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HybridDecision {
    /// 1-based component number in enumeration order
    pub component: usize,

    /// Every cluster of the component, primary clusters first
    pub clusters: Vec<SourceCluster>,

    /// Clusters to load, members in organism priority order
    pub retained: Vec<SourceCluster>,

    pub hybrid_source: HybridSource,

    pub conflict: Conflict,

    pub rule: Rule,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordered_by_organism_is_stable() {
        let cluster = SourceCluster::new("7", SourceRole::Secondary)
            .with_member("MGI:1", "mouse")
            .with_member("HGNC:1", "human")
            .with_member("ZDB:1", "zebrafish")
            .with_member("MGI:2", "mouse")
            .with_member("HGNC:2", "human");

        let ordered = cluster.ordered_by_organism(&Config::default());
        let ids: Vec<&str> = ordered.members.iter().map(|m| m.identifier.as_str()).collect();
        assert_eq!(ids, vec!["HGNC:1", "HGNC:2", "MGI:1", "MGI:2", "ZDB:1"]);
        assert_eq!(ordered.cluster_key, "7");
    }

    #[test]
    fn test_organism_span() {
        let single = SourceCluster::new("1", SourceRole::Primary)
            .with_member("a", "mouse")
            .with_member("b", "mouse");
        let multi = single.clone().with_member("c", "human");
        assert!(!single.is_multi_organism());
        assert!(multi.is_multi_organism());
        assert_eq!(multi.organisms().len(), 2);
    }

    #[test]
    fn test_organism_case_is_one_organism() {
        let cluster = SourceCluster::new("3", SourceRole::Primary)
            .with_member("HGNC:1", "Human")
            .with_member("HGNC:2", "human")
            .with_member("MGI:1", "MOUSE");
        assert_eq!(cluster.organisms().into_iter().collect::<Vec<_>>(), vec!["human", "mouse"]);

        let humans_only = SourceCluster::new("4", SourceRole::Primary)
            .with_member("HGNC:1", "Human")
            .with_member("HGNC:2", "human");
        assert!(!humans_only.is_multi_organism());
    }

    #[test]
    fn test_hybrid_source_names() {
        let config = Config::default();
        assert_eq!(HybridSource::Both.display(&config), "HomoloGene and HGNC");
        assert_eq!(HybridSource::Source(SourceRole::Secondary).display(&config), "HGNC");
        assert_eq!(Conflict::Conflict.to_string(), "conflict");
        assert_eq!(Rule::SingleOrganism.to_string(), "3b");
    }
}
