//! Cluster detection algorithms

use crate::cluster::{Cluster, ClusterRegistry, Pair};
use crate::error::HomologyError;
use crate::graph::GraphBuilder;
use std::collections::HashMap;
use log;

/// Union-Find data structure for connected component analysis
pub struct DisjointSets {
    /// Parent pointers (parent[i] = parent of node i)
    parent: Vec<u32>,

    /// Upper bound on tree depth below each root (union by rank)
    rank: Vec<u32>,
}

impl DisjointSets {
    /// Create a new DisjointSets data structure
    pub fn new(size: usize) -> Self {
        Self {
            parent: (0..size as u32).collect(),
            rank: vec![0; size],
        }
    }

    /// Find the root of the set containing x with path compression
    pub fn find(&mut self, x: u32) -> u32 {
        let mut root = x;
        while self.parent[root as usize] != root {
            root = self.parent[root as usize];
        }

        // Path compression: point every node on the path at the root
        let mut node = x;
        while self.parent[node as usize] != root {
            let next = self.parent[node as usize];
            self.parent[node as usize] = root;
            node = next;
        }

        root
    }

    /// Union the sets containing x and y
    pub fn union(&mut self, x: u32, y: u32) {
        let root_x = self.find(x);
        let root_y = self.find(y);

        if root_x == root_y {
            return;
        }

        // Attach the shallower tree; depth only grows on a tie
        let rank_x = self.rank[root_x as usize];
        let rank_y = self.rank[root_y as usize];

        if rank_x > rank_y {
            self.parent[root_y as usize] = root_x;
        } else if rank_x < rank_y {
            self.parent[root_x as usize] = root_y;
        } else {
            self.parent[root_y as usize] = root_x;
            self.rank[root_x as usize] += 1;
        }
    }
}

/// Group identifiers connected by pairs into clusters named `{id_prefix}:{n}`.
///
/// Members are sorted by identifier; clusters are numbered from 1 in order of
/// their smallest member, so any permutation of the same pairs gives the same
/// registry.
pub fn cluster(pairs: &[Pair], id_prefix: &str) -> Result<ClusterRegistry, HomologyError> {
    log::info!("Clustering {} identifier pairs", pairs.len());

    let mut builder = GraphBuilder::with_capacity(pairs.len() * 2);
    for (i, pair) in pairs.iter().enumerate() {
        if pair.id_one.is_empty() {
            return Err(HomologyError::input_shape(i + 1, "pair has an empty first identifier"));
        }

        match pair.id_two.as_deref() {
            Some(id_two) if !id_two.is_empty() => builder.add_edge(&pair.id_one, id_two),
            _ => {
                builder.get_or_create_node(&pair.id_one);
            }
        }
    }

    let graph = builder.build();
    let node_count = graph.node_count;
    log::debug!(
        "Pair graph has {} identifiers, {} bytes",
        node_count,
        graph.memory_usage()
    );

    let mut sets = DisjointSets::new(node_count);
    for node in 0..node_count {
        for &next in graph.neighbors(node) {
            if (node as u32) < next {
                sets.union(node as u32, next);
            }
        }
    }

    // Group identifiers by resolved root
    let node_ids = graph.node_ids.unwrap_or_default();
    let mut by_root: HashMap<u32, Vec<String>> = HashMap::new();
    for (node, id) in node_ids.into_iter().enumerate() {
        let root = sets.find(node as u32);
        by_root.entry(root).or_default().push(id);
    }

    let mut components: Vec<Vec<String>> = by_root
        .into_values()
        .map(|mut members| {
            members.sort();
            members
        })
        .collect();

    // Components are disjoint, so their smallest members are distinct
    components.sort_by(|a, b| a[0].cmp(&b[0]));

    let clusters: Vec<Cluster> = components
        .into_iter()
        .enumerate()
        .map(|(i, members)| Cluster {
            id: format!("{}:{}", id_prefix, i + 1),
            members,
        })
        .collect();

    log::info!("Found {} clusters", clusters.len());

    Ok(ClusterRegistry::from_clusters(clusters))
}
