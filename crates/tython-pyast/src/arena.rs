use std::fmt;

use crate::node::Node;

/// A stable handle into an [`Arena`].
///
/// The original implementation keyed its three hoisting maps on Python
/// object identity (`id(node)`). Rust has no equivalent of reference
/// identity for owned, immutable values, so every constructed node instead
/// gets an arena slot and callers address it by `NodeId`. Two structurally
/// identical nodes built separately get distinct ids, matching "identity
/// comparison distinguishes two nodes with equal structure" in the data
/// model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Owns every Python AST node produced while translating one file.
///
/// Nodes are immutable once pushed; the only mutation an arena supports is
/// appending new nodes. A fresh `Arena` is created per file, matching the
/// "Lifecycles" note in the data model (transformer state is reset per
/// file).
#[derive(Debug, Default)]
pub struct Arena {
    nodes: Vec<Node>,
}

impl Arena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.0 as usize]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
