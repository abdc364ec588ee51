//! Tracks anonymous `FunctionDef`s that must be hoisted out of an expression
//! position (e.g. a callback passed inline to `.then(...)`) and spliced back
//! in as a statement ahead of whatever first references them.
//!
//! This is the most literal port in the crate: it mirrors `_add_to_tree`,
//! `_add_to_tree_single` and `_adapt_body` from the original JS
//! transformer, with one structural change recorded in the design notes —
//! the three maps are keyed on arena [`NodeId`] handles instead of Python
//! object identity, since Rust gives owned values no equivalent of
//! reference identity.

use indexmap::{IndexMap, IndexSet};

use crate::arena::NodeId;

/// Maps a hoisted `FunctionDef` to the synthetic `Name` that stands in for
/// it at its original expression position, the inverse map, and the set of
/// hoisted defs pending under each ancestor that has not yet spliced them
/// into a statement body.
///
/// Invariants (see the data model):
/// - **I1 (completeness):** every `def` passed to [`HoistRegistry::register`]
///   is eventually spliced into exactly one body by [`HoistRegistry::adapt_body`].
/// - **I2 (ordering):** a hoisted def appears before the statement that
///   triggered its emission; sibling defs preserve the order they were
///   registered in.
/// - **I3 (single consumption):** once [`HoistRegistry::adapt_body`] splices
///   a def in, it is removed from both `def_to_name` and `name_to_def` and
///   cannot be emitted again.
#[derive(Debug, Default)]
pub struct HoistRegistry {
    def_to_name: IndexMap<NodeId, NodeId>,
    name_to_def: IndexMap<NodeId, NodeId>,
    parent_defs: IndexMap<NodeId, IndexSet<NodeId>>,
}

impl HoistRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `def` (a `FunctionDef`/`AsyncFunctionDef` arena slot) as
    /// hoisted, standing in at its original position as the arena slot
    /// `synthetic_name` (a `Name` node holding `__definition_of__<fn>`, see
    /// [`crate::NameManager::definition_marker`]).
    pub fn register(&mut self, def: NodeId, synthetic_name: NodeId) {
        self.def_to_name.insert(def, synthetic_name);
        self.name_to_def.insert(synthetic_name, def);
    }

    /// Rewrites `child` to its synthetic name if it is a hoisted def,
    /// otherwise returns it unchanged. Called by the dispatcher before
    /// invoking a custom handler, on every child that was not itself a
    /// `contains-body` rule.
    pub fn adapt(&self, child: NodeId) -> NodeId {
        self.def_to_name.get(&child).copied().unwrap_or(child)
    }

    pub fn adapt_children(&self, children: &[NodeId]) -> Vec<NodeId> {
        children.iter().map(|&c| self.adapt(c)).collect()
    }

    /// Records that `parent` must eventually carry the hoisted defs implied
    /// by `raw_children` — the pre-`adapt` children the dispatcher saw
    /// before rewriting. A raw child can be:
    /// - a synthetic name itself (the handler returned the hoisted
    ///   reference directly),
    /// - the original `FunctionDef` (registered moments earlier by the same
    ///   dispatch step),
    /// - or an earlier `parent` that itself has pending defs, in which case
    ///   they bubble up one level.
    pub fn add_to_tree(&mut self, parent: NodeId, raw_children: &[NodeId]) {
        for &child in raw_children {
            self.add_to_tree_single(parent, child);
        }
    }

    fn add_to_tree_single(&mut self, parent: NodeId, child: NodeId) {
        if let Some(&def) = self.name_to_def.get(&child) {
            self.parent_defs.entry(parent).or_default().insert(def);
        } else if self.def_to_name.contains_key(&child) {
            self.parent_defs.entry(parent).or_default().insert(child);
        } else if let Some(defs) = self.parent_defs.shift_remove(&child) {
            self.parent_defs.entry(parent).or_default().extend(defs);
        }
    }

    /// Splices pending hoisted defs into `body` ahead of whichever
    /// statement carries them, recursing to a fixpoint: a just-prepended
    /// `FunctionDef` can itself be a carrier if one of its own default
    /// argument values was a further hoisted callback.
    ///
    /// Terminates because each iteration either returns immediately (no
    /// pending defs found) or removes at least one entry from
    /// `parent_defs`, which can only happen finitely many times.
    pub fn adapt_body(&mut self, mut body: Vec<NodeId>) -> Vec<NodeId> {
        loop {
            let mut prelude: IndexSet<NodeId> = IndexSet::new();
            for stmt in &body {
                if let Some(defs) = self.parent_defs.shift_remove(stmt) {
                    prelude.extend(defs);
                }
            }
            if prelude.is_empty() {
                return body;
            }
            for &def in &prelude {
                if let Some(name) = self.def_to_name.shift_remove(&def) {
                    self.name_to_def.shift_remove(&name);
                }
            }
            let mut spliced = Vec::with_capacity(prelude.len() + body.len());
            spliced.extend(prelude.into_iter());
            spliced.extend(body);
            body = spliced;
        }
    }

    /// True once every registered def has been consumed by `adapt_body`.
    /// Used to assert I1 at the end of translating a file: nothing should
    /// still be sitting in `def_to_name` once the module body has been
    /// adapted.
    pub fn is_fully_consumed(&self) -> bool {
        self.def_to_name.is_empty() && self.name_to_def.is_empty()
    }

    /// Defs that were registered but never attached to any ancestor via
    /// `add_to_tree` — would be silently dropped by `adapt_body` since no
    /// body will ever see them in `parent_defs`. Exposed for tests and for
    /// a debug-level log line in the transformer.
    pub fn orphaned_defs(&self) -> Vec<NodeId> {
        let reachable: IndexSet<NodeId> = self.parent_defs.values().flatten().copied().collect();
        self.def_to_name
            .keys()
            .copied()
            .filter(|def| !reachable.contains(def))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// NodeId has no public constructor outside an Arena; tests mint one by
    /// pushing `n + 1` throwaway nodes into a scratch arena and keeping the
    /// last handle, so the handle space matches production use.
    fn id(n: u32) -> NodeId {
        let mut arena = crate::Arena::new();
        let mut last = arena.push(crate::Node::Break);
        for _ in 0..n {
            last = arena.push(crate::Node::Break);
        }
        last
    }

    #[test]
    fn single_hoist_splices_before_referencing_statement() {
        let mut reg = HoistRegistry::new();
        let def = id(0);
        let name = id(1);
        let stmt = id(2);
        reg.register(def, name);
        reg.add_to_tree(stmt, &[name]);

        let body = vec![stmt];
        let adapted = reg.adapt_body(body);

        assert_eq!(adapted, vec![def, stmt]);
        assert!(reg.is_fully_consumed());
    }

    #[test]
    fn bubbles_through_intermediate_parent() {
        let mut reg = HoistRegistry::new();
        let def = id(0);
        let name = id(1);
        let call_expr = id(2);
        let stmt = id(3);

        reg.register(def, name);
        // call_expr's child was the synthetic name; call_expr itself is not
        // yet a statement, so its defs bubble up to the enclosing stmt.
        reg.add_to_tree(call_expr, &[name]);
        reg.add_to_tree(stmt, &[call_expr]);

        let adapted = reg.adapt_body(vec![stmt]);
        assert_eq!(adapted, vec![def, stmt]);
    }

    #[test]
    fn unrelated_children_are_a_no_op() {
        let mut reg = HoistRegistry::new();
        let parent = id(0);
        let unrelated = id(1);
        reg.add_to_tree(parent, &[unrelated]);
        assert!(reg.orphaned_defs().is_empty());
    }

    #[test]
    fn never_attached_def_is_orphaned() {
        let mut reg = HoistRegistry::new();
        let def = id(0);
        let name = id(1);
        reg.register(def, name);
        assert_eq!(reg.orphaned_defs(), vec![def]);
    }

    #[test]
    fn sibling_order_is_preserved() {
        let mut reg = HoistRegistry::new();
        let def_a = id(0);
        let name_a = id(1);
        let def_b = id(2);
        let name_b = id(3);
        let stmt = id(4);

        reg.register(def_a, name_a);
        reg.register(def_b, name_b);
        reg.add_to_tree(stmt, &[name_a, name_b]);

        let adapted = reg.adapt_body(vec![stmt]);
        assert_eq!(adapted, vec![def_a, def_b, stmt]);
    }
}
