use super::{DependencyNode, NodeId};
use std::collections::HashMap;

/// DependencyGraph aggregate representing the complete dependency structure
///
/// `roots` lists the traversal entry points in declaration order. Every root
/// has a node; nodes never reached from a root are simply not scanned.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    nodes: HashMap<NodeId, DependencyNode>,
    roots: Vec<NodeId>,
}

impl DependencyGraph {
    pub fn builder() -> GraphBuilder {
        GraphBuilder::default()
    }

    pub fn nodes(&self) -> &HashMap<NodeId, DependencyNode> {
        &self.nodes
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn get(&self, id: &str) -> Option<&DependencyNode> {
        self.nodes.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn root_count(&self) -> usize {
        self.roots.len()
    }
}

/// Mutable staging area owned by a single parser run.
///
/// Parsers fill a builder and hand back the frozen [`DependencyGraph`];
/// nothing downstream ever sees the builder.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    nodes: HashMap<NodeId, DependencyNode>,
    roots: Vec<NodeId>,
}

impl GraphBuilder {
    /// Inserts a node unless one with the same id exists.
    ///
    /// Returns `true` when the node was inserted; the first insertion wins.
    pub fn add_node(&mut self, node: DependencyNode) -> bool {
        if self.nodes.contains_key(node.id()) {
            return false;
        }
        self.nodes.insert(node.id().to_string(), node);
        true
    }

    /// Appends a root id, ignoring repeats
    pub fn add_root(&mut self, id: impl Into<NodeId>) {
        let id = id.into();
        if !self.roots.contains(&id) {
            self.roots.push(id);
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn build(self) -> DependencyGraph {
        DependencyGraph {
            nodes: self.nodes,
            roots: self.roots,
        }
    }
}
