//! Memory-efficient undirected graph representation

use std::mem;
use serde::{Serialize, Deserialize};

/// Compressed sparse representation of an undirected graph.
///
/// Every edge is stored in both endpoint lists, so `neighbors` is symmetric.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompressedGraph {
    /// Number of nodes in the graph
    pub node_count: usize,

    /// Offset array: index where each node's edges begin
    /// offsets[i] to offsets[i+1] defines the edge range for node i
    pub offsets: Vec<u32>,

    /// Edge array: concatenated, sorted, deduplicated neighbor lists
    pub edges: Vec<u32>,

    /// Optional mapping from internal node IDs to original identifiers
    pub node_ids: Option<Vec<String>>,
}

impl CompressedGraph {
    /// Create a new graph with pre-allocated capacity
    pub fn with_capacity(node_count: usize, edge_count: usize) -> Self {
        Self {
            node_count,
            offsets: Vec::with_capacity(node_count + 1),
            edges: Vec::with_capacity(edge_count),
            node_ids: None,
        }
    }

    /// Build from per-node adjacency lists; lists are sorted and deduplicated
    pub fn from_adjacency(mut adjacency_lists: Vec<Vec<u32>>) -> Self {
        let node_count = adjacency_lists.len();
        let edge_count = adjacency_lists.iter().map(|list| list.len()).sum();
        let mut graph = Self::with_capacity(node_count, edge_count);

        graph.offsets.push(0);
        let mut offset = 0;
        for list in &mut adjacency_lists {
            list.sort_unstable();
            list.dedup();
            offset += list.len() as u32;
            graph.edges.extend_from_slice(list);
            graph.offsets.push(offset);
        }

        graph
    }

    /// Get the neighbors of a node
    pub fn neighbors(&self, node: usize) -> &[u32] {
        let start = self.offsets[node] as usize;
        let end = self.offsets[node + 1] as usize;
        &self.edges[start..end]
    }

    /// Estimate memory usage in bytes
    pub fn memory_usage(&self) -> usize {
        let base = mem::size_of::<Self>();
        let offsets = self.offsets.capacity() * mem::size_of::<u32>();
        let edges = self.edges.capacity() * mem::size_of::<u32>();

        let ids = self.node_ids.as_ref()
            .map(|ids| ids.iter().map(|s| s.capacity()).sum::<usize>())
            .unwrap_or(0);

        base + offsets + edges + ids
    }
}
