//! Graph algorithms for analysis

use crate::graph::CompressedGraph;
use log;

/// Enumerate connected components with an explicit-stack depth-first search.
///
/// Components are returned in order of their lowest node index, each with
/// its node indices sorted ascending.
pub fn connected_components(graph: &CompressedGraph) -> Vec<Vec<u32>> {
    let node_count = graph.node_count;
    let mut visited = vec![false; node_count];
    let mut components = Vec::new();
    let mut stack: Vec<u32> = Vec::new();

    for root in 0..node_count {
        if visited[root] {
            continue;
        }

        let mut component = Vec::new();
        visited[root] = true;
        stack.push(root as u32);

        while let Some(node) = stack.pop() {
            component.push(node);
            for &next in graph.neighbors(node as usize) {
                if !visited[next as usize] {
                    visited[next as usize] = true;
                    stack.push(next);
                }
            }
        }

        component.sort_unstable();
        components.push(component);
    }

    log::debug!(
        "Enumerated {} components over {} nodes",
        components.len(),
        node_count
    );

    components
}
