use crate::scan::domain::{DependencyGraph, DependencyNode};
use std::collections::HashSet;

/// GraphTraversal service for walking a dependency graph
///
/// This service contains pure graph logic with no I/O dependencies.
pub struct GraphTraversal;

impl GraphTraversal {
    /// Returns every node reachable from the roots, pre-order depth-first
    ///
    /// Roots and each node's children are visited in the order they are
    /// listed, so the output is fully determined by the graph. Each node is
    /// emitted once; child ids missing from the graph are skipped.
    ///
    /// Uses an explicit stack so deep chains cannot overflow the call stack.
    pub fn reachable(graph: &DependencyGraph) -> Vec<DependencyNode> {
        let mut visited: HashSet<&str> = HashSet::with_capacity(graph.node_count());
        let mut ordered = Vec::with_capacity(graph.node_count());
        let mut stack: Vec<&str> = graph.roots().iter().rev().map(String::as_str).collect();

        while let Some(id) = stack.pop() {
            let Some(node) = graph.get(id) else {
                continue;
            };
            if !visited.insert(node.id()) {
                continue;
            }

            ordered.push(node.clone());
            stack.extend(node.dependencies().iter().rev().map(String::as_str));
        }

        ordered
    }
}
