//! Graph construction module

use crate::graph::CompressedGraph;
use std::collections::HashMap;

/// Builder for incrementally constructing an undirected identifier graph
pub struct GraphBuilder {
    /// Mapping from identifiers to node indices
    id_to_index: HashMap<String, u32>,

    /// Node identifiers, by index
    node_ids: Vec<String>,

    /// Adjacency lists for each node
    adjacency_lists: Vec<Vec<u32>>,
}

impl GraphBuilder {
    /// Create a new graph builder with the given capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            id_to_index: HashMap::with_capacity(capacity),
            node_ids: Vec::with_capacity(capacity),
            adjacency_lists: Vec::with_capacity(capacity),
        }
    }

    /// Get or create a node index for the given identifier
    pub fn get_or_create_node(&mut self, id: &str) -> u32 {
        if let Some(&idx) = self.id_to_index.get(id) {
            return idx;
        }

        let idx = self.node_ids.len() as u32;
        self.id_to_index.insert(id.to_string(), idx);
        self.node_ids.push(id.to_string());
        self.adjacency_lists.push(Vec::new());

        idx
    }

    /// Add an undirected edge; a self-edge only registers the node
    pub fn add_edge(&mut self, a: &str, b: &str) {
        let a_idx = self.get_or_create_node(a);
        let b_idx = self.get_or_create_node(b);

        if a_idx == b_idx {
            return;
        }

        self.adjacency_lists[a_idx as usize].push(b_idx);
        self.adjacency_lists[b_idx as usize].push(a_idx);
    }

    /// Build the compressed graph
    pub fn build(self) -> CompressedGraph {
        let mut graph = CompressedGraph::from_adjacency(self.adjacency_lists);
        graph.node_ids = Some(self.node_ids);
        graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_interns_identifiers() {
        let mut builder = GraphBuilder::with_capacity(4);
        builder.add_edge("A", "B");
        builder.add_edge("B", "A");
        builder.get_or_create_node("C");

        let graph = builder.build();
        assert_eq!(graph.node_count, 3);
        assert_eq!(graph.node_ids, Some(vec!["A".to_string(), "B".to_string(), "C".to_string()]));
        assert_eq!(graph.neighbors(0), &[1]);
        assert_eq!(graph.neighbors(1), &[0]);
        assert!(graph.neighbors(2).is_empty());
    }

    #[test]
    fn test_self_edge_is_isolated_node() {
        let mut builder = GraphBuilder::with_capacity(1);
        builder.add_edge("X", "X");
        let graph = builder.build();
        assert_eq!(graph.node_count, 1);
        assert!(graph.neighbors(0).is_empty());
    }
}
