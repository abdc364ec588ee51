//! The transformer's per-file state and the small set of helpers every
//! handler in `expr.rs`/`stmt.rs`/`function_class.rs`/`destructure.rs`
//! shares: pushing nodes into the arena, adapting/bubbling through the
//! hoist registry, and turning a CST node's span into a line/col for
//! error reporting.

use tython_parser::{LineIndex, SyntaxNode};
use tython_pyast::{Arena, HoistRegistry, NameManager, Node, NodeId};

use crate::error::TransformError;

/// What a rule handler produced: nothing (`Skip`), one AST node, or a
/// statement list (C-style `for`, multi-declarator `var`, destructuring).
pub enum Out {
    None,
    One(NodeId),
    Many(Vec<NodeId>),
}

impl Out {
    /// Flattens into a `Vec<NodeId>` for splicing into an enclosing
    /// statement body.
    pub fn into_stmts(self) -> Vec<NodeId> {
        match self {
            Out::None => vec![],
            Out::One(id) => vec![id],
            Out::Many(ids) => ids,
        }
    }

    /// The single node this handler produced, if it produced exactly one.
    /// Used by expression contexts, which never expect `Many`.
    pub fn into_node(self, arena: &mut Arena, fallback: Node) -> NodeId {
        match self {
            Out::One(id) => id,
            Out::None => arena.push(fallback),
            Out::Many(mut ids) => {
                if ids.is_empty() {
                    arena.push(fallback)
                } else {
                    ids.pop().unwrap()
                }
            }
        }
    }
}

pub struct Transformer {
    pub(crate) arena: Arena,
    pub(crate) names: NameManager,
    pub(crate) hoist: HoistRegistry,
    line_index: LineIndex,
}

impl Transformer {
    pub fn new(source: &str, convert_snake_case: bool) -> Self {
        Self {
            arena: Arena::new(),
            names: NameManager::new(convert_snake_case),
            hoist: HoistRegistry::new(),
            line_index: LineIndex::new(source),
        }
    }

    pub fn push(&mut self, node: Node) -> NodeId {
        self.arena.push(node)
    }

    pub fn get(&self, id: NodeId) -> &Node {
        self.arena.get(id)
    }

    /// Rewrites `id` to its hoisted synthetic name if it is a registered
    /// `FunctionDef`, per "Adapt (children)" in the glossary.
    pub fn adapt(&self, id: NodeId) -> NodeId {
        self.hoist.adapt(id)
    }

    pub fn adapt_all(&self, ids: &[NodeId]) -> Vec<NodeId> {
        self.hoist.adapt_children(ids)
    }

    /// Records that `parent` must carry any hoisted defs implied by its
    /// pre-adapt `raw_children`, per §4.2's "the dispatcher records the
    /// parent→child hoist relationship" step. Call this after building any
    /// single-node result whose children were adapted.
    pub fn bubble(&mut self, parent: NodeId, raw_children: &[NodeId]) {
        self.hoist.add_to_tree(parent, raw_children);
    }

    /// Runs `adapt_body` (the hoisting fixpoint, §4.7) on a freshly built
    /// statement list. Every `ContainsBody` handler calls this exactly
    /// once on its own body before returning.
    pub fn adapt_body(&mut self, body: Vec<NodeId>) -> Vec<NodeId> {
        self.hoist.adapt_body(body)
    }

    pub fn finish(self) -> (Arena, HoistRegistry) {
        (self.arena, self.hoist)
    }

    pub(crate) fn error_at(&self, node: &SyntaxNode, make: impl FnOnce(u32, u32) -> TransformError) -> TransformError {
        let offset: u32 = node.text_range().start().into();
        let (line, col) = self.line_index.line_col(offset);
        make(line, col)
    }
}
