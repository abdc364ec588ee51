//! CST -> Python AST transformer: the default rule dispatch table
//! (`bucket.rs`), the per-file transformer state (`context.rs`), and the
//! expression/statement/function-class/destructuring handlers that turn a
//! parsed [`tython_parser::SyntaxTree`]'s `PROGRAM` node into a Python
//! `Module`.
//!
//! This is the largest component in the workspace: everything else either
//! feeds a CST to this crate (`tython-parser`) or consumes the `Module` it
//! produces (`tython-encoder`, `tython-postprocess`).

mod bucket;
mod context;
mod destructure;
mod error;
mod expr;
mod function_class;
mod stmt;

pub use bucket::{rule_bucket, RuleBucket};
pub use context::{Out, Transformer};
pub use error::TransformError;

use tython_parser::SyntaxNode;
use tython_pyast::{Arena, HoistRegistry, Node, NodeId};

/// One fully translated file: the arena every node lives in, the id of the
/// `Module` root, and the hoist registry left over after translation
/// (non-empty `orphaned_defs()` here is a transformer bug, not a user
/// error — see [`TranslatedModule::assert_hoisting_complete`]).
pub struct TranslatedModule {
    pub arena: Arena,
    pub module: NodeId,
    hoist: HoistRegistry,
}

impl TranslatedModule {
    pub fn get(&self, id: NodeId) -> &Node {
        self.arena.get(id)
    }

    /// Checks testable property 3 (§8): after translating a file, every
    /// registered hoisted def was consumed by `adapt_body` exactly once.
    /// Returns the orphaned defs, if any, rather than panicking — callers
    /// decide whether that is fatal.
    pub fn orphaned_hoists(&self) -> Vec<NodeId> {
        self.hoist.orphaned_defs()
    }
}

/// Translates one file's `PROGRAM` root node into a Python `Module`.
///
/// The module body is the `Out::Many`-flattened transform of every direct
/// child statement, followed by a single top-level `adapt_body` pass —
/// the same contract every other `ContainsBody` rule gets, just applied by
/// hand at the root since there is no enclosing rule to dispatch from.
pub fn translate_program(root: &SyntaxNode, convert_snake_case: bool) -> Result<TranslatedModule, TransformError> {
    let mut tx = Transformer::new(&root.text().to_string(), convert_snake_case);

    let mut raw = Vec::new();
    for child in root.children() {
        raw.extend(tx.transform_stmt(&child)?.into_stmts());
    }
    let body = tx.adapt_body(raw);
    let module = tx.push(Node::Module(body));

    let (arena, hoist) = tx.finish();
    Ok(TranslatedModule { arena, module, hoist })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tython_parser::{parse, Dialect};
    use tython_pyast::Constant;

    fn grammar_dir() -> std::path::PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("../../grammar")
    }

    fn translate(src: &str) -> TranslatedModule {
        let tree = parse(src, Dialect::Js, &grammar_dir()).expect("grammar loads");
        let root = tree.ok().expect("parses cleanly");
        translate_program(&root, false).expect("translates cleanly")
    }

    #[test]
    fn s1_simple_assignment() {
        let m = translate("let x = 1 + 2;");
        let Node::Module(body) = m.get(m.module) else { panic!() };
        assert_eq!(body.len(), 1);
        let Node::Assign(a) = m.get(body[0]) else { panic!("expected Assign") };
        let Node::BinOp(b) = m.get(a.value) else { panic!("expected BinOp") };
        assert_eq!(b.op, tython_pyast::BinOpKind::Add);
    }

    #[test]
    fn s2_map_callback_is_hoisted_before_the_call() {
        let m = translate("arr.map((v) => v * 2);");
        let Node::Module(body) = m.get(m.module) else { panic!() };
        assert_eq!(body.len(), 2, "expected [FunctionDef, ExprStmt]");
        assert!(matches!(m.get(body[0]), Node::FunctionDef(_)));
        assert!(matches!(m.get(body[1]), Node::ExprStmt(_)));
        assert!(m.orphaned_hoists().is_empty());
    }

    #[test]
    fn s3_c_style_for_desugars_to_init_plus_while() {
        let m = translate("for (let i = 0; i < 3; i++) { sum += i; }");
        let Node::Module(body) = m.get(m.module) else { panic!() };
        assert_eq!(body.len(), 2);
        assert!(matches!(m.get(body[0]), Node::Assign(_)));
        let Node::While(w) = m.get(body[1]) else { panic!("expected While") };
        // body ++ [step]: the `sum += i` assign, then the `i = i + 1` step.
        assert_eq!(w.body.len(), 2);
    }

    #[test]
    fn s5_switch_desugars_to_if_elif_else_without_break() {
        let src = "switch (x) { case 1: a(); break; case 2: b(); break; default: c(); }";
        let m = translate(src);
        let Node::Module(body) = m.get(m.module) else { panic!() };
        assert_eq!(body.len(), 1);
        let Node::If(outer) = m.get(body[0]) else { panic!("expected If") };
        assert_eq!(outer.body.len(), 1);
        assert_eq!(outer.orelse.len(), 1);
        let Node::Compare(cmp) = m.get(outer.test) else { panic!("expected Compare") };
        let Node::Name(subject) = m.get(cmp.left) else { panic!("expected subject Name") };
        assert_eq!(subject.id, "x", "case test compares the subject directly, no temporary");
        let Node::If(inner) = m.get(outer.orelse[0]) else { panic!("expected nested If for case 2") };
        assert_eq!(inner.orelse.len(), 1, "default clause becomes the innermost else");
    }

    #[test]
    fn s6_try_catch_finally() {
        let m = translate("try { f(); } catch (e) { g(e); } finally { h(); }");
        let Node::Module(body) = m.get(m.module) else { panic!() };
        assert_eq!(body.len(), 1);
        let Node::Try(t) = m.get(body[0]) else { panic!("expected Try") };
        assert_eq!(t.body.len(), 1);
        assert_eq!(t.handlers.len(), 1);
        assert_eq!(t.finalbody.len(), 1);
    }

    #[test]
    fn nested_callback_hoists_to_the_enclosing_if_body() {
        let src = "if (ready) { arr.forEach((x) => { log(x); }); }";
        let m = translate(src);
        let Node::Module(body) = m.get(m.module) else { panic!() };
        let Node::If(if_) = m.get(body[0]) else { panic!("expected If") };
        assert_eq!(if_.body.len(), 2, "callback def spliced ahead of the forEach call inside the if body");
        assert!(matches!(m.get(if_.body[0]), Node::FunctionDef(_)));
    }

    #[test]
    fn destructuring_uses_a_single_deepcopy_temporary() {
        let m = translate("let [a, b] = src;");
        let Node::Module(body) = m.get(m.module) else { panic!() };
        // tmp_cp = deepcopy(src); a = tmp_cp.pop(0); b = tmp_cp.pop(1)
        assert_eq!(body.len(), 3);
        let Node::Assign(first) = m.get(body[0]) else { panic!() };
        let Node::Call(deepcopy_call) = m.get(first.value) else { panic!("expected deepcopy(...) call") };
        let Node::Name(callee) = m.get(deepcopy_call.func) else { panic!() };
        assert_eq!(callee.id, "deepcopy");

        let Node::Assign(second) = m.get(body[1]) else { panic!() };
        let Node::Call(pop_b) = m.get(second.value) else { panic!("expected pop(...) call") };
        let Node::Constant(Constant::Int(idx)) = m.get(pop_b.args[0]) else { panic!("expected index constant") };
        assert_eq!(*idx, 0);

        let Node::Assign(third) = m.get(body[2]) else { panic!() };
        let Node::Call(pop_c) = m.get(third.value) else { panic!("expected pop(...) call") };
        let Node::Constant(Constant::Int(idx)) = m.get(pop_c.args[0]) else { panic!("expected index constant") };
        assert_eq!(*idx, 1);
    }
}
