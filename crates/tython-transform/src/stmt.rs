//! Statement handlers (spec.md §4.5): control flow, declarations,
//! imports/exports, and the small per-body plumbing (`stmt_body`,
//! `raw_body_stmts`, `raw_stmts_of`) shared by every construct that owns a
//! statement list — a function body, an `if`/`while`/`for` arm, a `try`
//! block, a `case` clause.
//!
//! `BLOCK_STMT` is the only rule the dispatch table (`bucket.rs`) actually
//! marks `ContainsBody`; everything else here that owns a body (`IfStmt`,
//! `WhileStmt`, the synthetic `While` a C-style `for` desugars into, each
//! `switch` arm) runs its own `adapt_body` pass directly, the same
//! contract `ContainsBody` rules get from the dispatcher, just applied by
//! hand since there is no generic dispatcher driving these from bucket.rs.

use rowan::NodeOrToken;
use tython_parser::{self as parser, SyntaxElement, SyntaxKind, SyntaxNode};
use tython_pyast::{
    Alias, Assign, Compare, CmpOp, Constant, ExceptHandler, For, If, Import, ImportFrom, Name,
    Node, NodeId, Try, While,
};

use crate::context::{Out, Transformer};
use crate::error::TransformError;
use crate::expr::{expr_children, is_literal_token};

impl Transformer {
    /// Transforms one statement-position CST node, returning however many
    /// Python statements it expands to (destructuring and a C-style `for`
    /// both produce more than one).
    pub fn transform_stmt(&mut self, node: &SyntaxNode) -> Result<Out, TransformError> {
        match node.kind() {
            SyntaxKind::VAR_DECL => Ok(Out::Many(self.transform_var_decl(node)?)),
            SyntaxKind::FUNCTION_DECL => Ok(Out::One(self.transform_function_decl_stmt(node)?)),
            SyntaxKind::CLASS_DECL => Ok(Out::One(self.transform_class_decl(node)?)),
            SyntaxKind::BLOCK_STMT => Ok(Out::Many(self.stmt_body(node)?)),
            SyntaxKind::EXPR_STMT => Ok(Out::One(self.transform_expr_stmt(node)?)),
            SyntaxKind::IF_STMT => Ok(Out::One(self.transform_if_stmt(node)?)),
            SyntaxKind::FOR_STMT => Ok(Out::Many(self.transform_for_stmt(node)?)),
            SyntaxKind::FOR_IN_STMT | SyntaxKind::FOR_OF_STMT => Ok(Out::Many(self.transform_for_in_of(node)?)),
            SyntaxKind::WHILE_STMT => Ok(Out::One(self.transform_while_stmt(node)?)),
            SyntaxKind::DO_WHILE_STMT => Ok(Out::Many(self.transform_do_while_stmt(node)?)),
            SyntaxKind::SWITCH_STMT => Ok(Out::Many(self.transform_switch_stmt(node)?)),
            SyntaxKind::BREAK_STMT => Ok(Out::One(self.push(Node::Break))),
            SyntaxKind::CONTINUE_STMT => Ok(Out::One(self.push(Node::Continue))),
            SyntaxKind::RETURN_STMT => Ok(Out::One(self.transform_return_stmt(node)?)),
            SyntaxKind::THROW_STMT => Ok(Out::One(self.transform_throw_stmt(node)?)),
            SyntaxKind::TRY_STMT => Ok(Out::One(self.transform_try_stmt(node)?)),
            SyntaxKind::IMPORT_DECL => Ok(Out::Many(self.transform_import_decl(node)?)),
            SyntaxKind::EXPORT_DECL | SyntaxKind::EXPORT_DEFAULT_DECL => self.transform_export_like(node),
            // TS-only declarations carry no runtime behavior; nothing to emit.
            SyntaxKind::INTERFACE_DECL | SyntaxKind::TYPE_ALIAS_DECL => Ok(Out::None),
            other => Err(self.error_at(node, move |line, col| TransformError::UnrecognizedShape { rule: other, line, col })),
        }
    }

    /// The body of a function, method, or class (`BLOCK_STMT`/`CLASS_BODY`
    /// children in document order): each statement transformed, flattened,
    /// then hoisted defs settled with a single `adapt_body` pass.
    pub(crate) fn stmt_body(&mut self, block: &SyntaxNode) -> Result<Vec<NodeId>, TransformError> {
        let raw = self.raw_stmts_of(parser::child_nodes(block))?;
        Ok(self.adapt_body(raw))
    }

    /// Same as [`Self::stmt_body`], but for a construct's body *position*
    /// rather than a literal `BLOCK_STMT`: JS allows a single bare
    /// statement there (`if (x) return;`), which this treats as a
    /// one-statement body rather than requiring a nested `{}`. Does not
    /// itself call `adapt_body` — callers combine this with sibling
    /// statements (a C-style `for`'s step, a `for...of` tuple binder's
    /// prelude) before running the fixpoint once.
    fn raw_body_stmts(&mut self, stmt_node: &SyntaxNode) -> Result<Vec<NodeId>, TransformError> {
        if stmt_node.kind() == SyntaxKind::BLOCK_STMT {
            self.raw_stmts_of(parser::child_nodes(stmt_node))
        } else {
            Ok(self.transform_stmt(stmt_node)?.into_stmts())
        }
    }

    fn raw_stmts_of(&mut self, nodes: impl Iterator<Item = SyntaxNode>) -> Result<Vec<NodeId>, TransformError> {
        let mut out = Vec::new();
        for child in nodes {
            out.extend(self.transform_stmt(&child)?.into_stmts());
        }
        Ok(out)
    }

    fn drop_trailing_break(&self, stmts: &mut Vec<NodeId>) {
        if let Some(&last) = stmts.last() {
            if matches!(self.get(last), Node::Break) {
                stmts.pop();
            }
        }
    }

    // -- declarations --

    fn transform_var_decl(&mut self, node: &SyntaxNode) -> Result<Vec<NodeId>, TransformError> {
        let mut stmts = Vec::new();
        for declarator in parser::children(node, SyntaxKind::VAR_DECLARATOR) {
            stmts.extend(self.transform_var_declarator(&declarator)?);
        }
        Ok(stmts)
    }

    fn transform_var_declarator(&mut self, node: &SyntaxNode) -> Result<Vec<NodeId>, TransformError> {
        let elements = non_type_children(node);
        let pattern_node = elements
            .first()
            .and_then(|e| e.as_node().cloned())
            .ok_or_else(|| self.error_at(node, |line, col| TransformError::UnrecognizedShape { rule: node.kind(), line, col }))?;

        let value_raw = match elements.get(1) {
            Some(el) => self.transform_expr_el(el)?,
            None => self.push(Node::Constant(Constant::None)),
        };
        let value = self.adapt(value_raw);

        let stmts = self.bind_pattern(&pattern_node, value)?;
        if let Some(&first) = stmts.first() {
            self.bubble(first, &[value_raw]);
        }
        Ok(stmts)
    }

    fn transform_expr_stmt(&mut self, node: &SyntaxNode) -> Result<NodeId, TransformError> {
        let elements = expr_children(node);
        let el = elements
            .first()
            .ok_or_else(|| self.error_at(node, |line, col| TransformError::UnrecognizedShape { rule: node.kind(), line, col }))?;
        let raw = self.transform_expr_el(el)?;
        let adapted = self.adapt(raw);
        let id = self.push(Node::ExprStmt(adapted));
        self.bubble(id, &[raw]);
        Ok(id)
    }

    // -- control flow --

    fn transform_if_stmt(&mut self, node: &SyntaxNode) -> Result<NodeId, TransformError> {
        let elements = expr_children(node);
        let test_el = elements
            .first()
            .ok_or_else(|| self.error_at(node, |line, col| TransformError::UnrecognizedShape { rule: node.kind(), line, col }))?;
        let then_node = elements
            .get(1)
            .and_then(|e| e.as_node().cloned())
            .ok_or_else(|| self.error_at(node, |line, col| TransformError::UnrecognizedShape { rule: node.kind(), line, col }))?;

        let test_raw = self.transform_expr_el(test_el)?;
        let test = self.adapt(test_raw);

        let body_raw = self.raw_body_stmts(&then_node)?;
        let body = self.adapt_body(body_raw);

        // An `else if` is just a nested `IF_STMT` in the `else` position;
        // folding it into `orelse: [If(...)]` falls out of this recursion
        // without any special-cased elif handling.
        let orelse = match elements.get(2).and_then(|e| e.as_node().cloned()) {
            Some(else_node) => {
                let raw = self.raw_body_stmts(&else_node)?;
                self.adapt_body(raw)
            }
            None => vec![],
        };

        let id = self.push(Node::If(If { test, body, orelse }));
        self.bubble(id, &[test_raw]);
        Ok(id)
    }

    fn transform_while_stmt(&mut self, node: &SyntaxNode) -> Result<NodeId, TransformError> {
        let elements = expr_children(node);
        let test_el = elements
            .first()
            .ok_or_else(|| self.error_at(node, |line, col| TransformError::UnrecognizedShape { rule: node.kind(), line, col }))?;
        let body_node = elements
            .get(1)
            .and_then(|e| e.as_node().cloned())
            .ok_or_else(|| self.error_at(node, |line, col| TransformError::UnrecognizedShape { rule: node.kind(), line, col }))?;

        let test_raw = self.transform_expr_el(test_el)?;
        let test = self.adapt(test_raw);
        let body_raw = self.raw_body_stmts(&body_node)?;
        let body = self.adapt_body(body_raw);

        let id = self.push(Node::While(While { test, body }));
        self.bubble(id, &[test_raw]);
        Ok(id)
    }

    /// `do body while (test);` has no direct Python equivalent, so the body
    /// is transformed twice — once unconditionally up front, once as the
    /// body of an ordinary `While` — rather than introducing a `while True`
    /// plus a synthetic `break` the source never had (see DESIGN.md).
    fn transform_do_while_stmt(&mut self, node: &SyntaxNode) -> Result<Vec<NodeId>, TransformError> {
        let elements = expr_children(node);
        let body_node = elements
            .first()
            .and_then(|e| e.as_node().cloned())
            .ok_or_else(|| self.error_at(node, |line, col| TransformError::UnrecognizedShape { rule: node.kind(), line, col }))?;
        let test_el = elements
            .get(1)
            .ok_or_else(|| self.error_at(node, |line, col| TransformError::UnrecognizedShape { rule: node.kind(), line, col }))?;

        let first_pass = self.raw_body_stmts(&body_node)?;
        let mut stmts = self.adapt_body(first_pass);

        let test_raw = self.transform_expr_el(test_el)?;
        let test = self.adapt(test_raw);
        let loop_body = self.raw_body_stmts(&body_node)?;
        let loop_body = self.adapt_body(loop_body);

        let while_id = self.push(Node::While(While { test, body: loop_body }));
        self.bubble(while_id, &[test_raw]);
        stmts.push(while_id);
        Ok(stmts)
    }

    /// `for (init; test; update) body` desugars into `[init, While(test,
    /// body + [update])]` (spec.md §4.5). Each of `init`/`test`/`update`
    /// is optional; a missing `test` means an infinite loop (`while True`).
    fn transform_for_stmt(&mut self, node: &SyntaxNode) -> Result<Vec<NodeId>, TransformError> {
        let mut semi_count = 0u8;
        let mut seen_rparen = false;
        let mut init_el: Option<SyntaxElement> = None;
        let mut test_el: Option<SyntaxElement> = None;
        let mut update_el: Option<SyntaxElement> = None;
        let mut body_node: Option<SyntaxNode> = None;

        for el in node.children_with_tokens() {
            match &el {
                NodeOrToken::Token(t) if t.kind() == SyntaxKind::SEMI => {
                    semi_count += 1;
                    continue;
                }
                NodeOrToken::Token(t) if t.kind() == SyntaxKind::R_PAREN => {
                    seen_rparen = true;
                    continue;
                }
                NodeOrToken::Token(t) if t.kind().is_trivia() => continue,
                NodeOrToken::Token(t) if !is_literal_token(t.kind()) => continue,
                _ => {}
            }
            if seen_rparen {
                if let NodeOrToken::Node(n) = &el {
                    body_node = Some(n.clone());
                }
            } else {
                match semi_count {
                    0 => init_el = Some(el),
                    1 => test_el = Some(el),
                    _ => update_el = Some(el),
                }
            }
        }

        let body_node = body_node
            .ok_or_else(|| self.error_at(node, |line, col| TransformError::UnrecognizedShape { rule: node.kind(), line, col }))?;

        let mut lead_stmts = Vec::new();
        if let Some(el) = init_el {
            match &el {
                NodeOrToken::Node(n) if n.kind() == SyntaxKind::VAR_DECL => {
                    lead_stmts.extend(self.transform_var_decl(n)?);
                }
                _ => {
                    let raw = self.transform_expr_el(&el)?;
                    let adapted = self.adapt(raw);
                    let es = self.push(Node::ExprStmt(adapted));
                    self.bubble(es, &[raw]);
                    lead_stmts.push(es);
                }
            }
        }

        let (test_raw, test) = match test_el {
            Some(el) => {
                let raw = self.transform_expr_el(&el)?;
                (Some(raw), self.adapt(raw))
            }
            None => (None, self.push(Node::Constant(Constant::Bool(true)))),
        };

        let mut raw_body = self.raw_body_stmts(&body_node)?;
        if let Some(el) = update_el {
            let raw = self.transform_expr_el(&el)?;
            let adapted = self.adapt(raw);
            let step = self.push(Node::ExprStmt(adapted));
            self.bubble(step, &[raw]);
            raw_body.push(step);
        }
        let body = self.adapt_body(raw_body);

        let while_id = self.push(Node::While(While { test, body }));
        if let Some(raw) = test_raw {
            self.bubble(while_id, &[raw]);
        }

        lead_stmts.push(while_id);
        Ok(lead_stmts)
    }

    /// `for (x of/in src) body`: a single-`IDENT` binder maps straight to
    /// `For(target, iter, body)`; an array/object binder introduces an
    /// `iter_item` temporary and prepends the body with the statements that
    /// bind it, the same "synthesize a target, destructure it first thing
    /// in the body" shape used for a destructured function parameter.
    fn transform_for_in_of(&mut self, node: &SyntaxNode) -> Result<Vec<NodeId>, TransformError> {
        let elements = expr_children(node);
        let pattern_node = elements
            .first()
            .and_then(|e| e.as_node().cloned())
            .ok_or_else(|| self.error_at(node, |line, col| TransformError::UnrecognizedShape { rule: node.kind(), line, col }))?;
        let iter_el = elements
            .get(1)
            .ok_or_else(|| self.error_at(node, |line, col| TransformError::UnrecognizedShape { rule: node.kind(), line, col }))?;
        let body_node = elements
            .get(2)
            .and_then(|e| e.as_node().cloned())
            .ok_or_else(|| self.error_at(node, |line, col| TransformError::UnrecognizedShape { rule: node.kind(), line, col }))?;

        let iter_raw = self.transform_expr_el(iter_el)?;
        let iter = self.adapt(iter_raw);

        let (target, prelude) = match pattern_node.kind() {
            SyntaxKind::IDENT => {
                let name = self.names.apply(pattern_node.text().to_string().trim());
                (self.push(Node::Name(Name { id: name })), vec![])
            }
            SyntaxKind::ARRAY_PATTERN => {
                let tmp = self.names.fresh_iter_item();
                let target = self.push(Node::Name(Name { id: tmp.clone() }));
                let prelude = self.bind_for_of_tuple(&pattern_node, &tmp)?;
                (target, prelude)
            }
            SyntaxKind::OBJECT_PATTERN => {
                let tmp = self.names.fresh_iter_item();
                let target = self.push(Node::Name(Name { id: tmp.clone() }));
                let tmp_ref = self.push(Node::Name(Name { id: tmp }));
                let prelude = self.bind_pattern(&pattern_node, tmp_ref)?;
                (target, prelude)
            }
            other => {
                return Err(self.error_at(&pattern_node, move |line, col| TransformError::UnrecognizedShape { rule: other, line, col }))
            }
        };

        let mut full_body = prelude;
        full_body.extend(self.raw_body_stmts(&body_node)?);
        let body = self.adapt_body(full_body);

        let id = self.push(Node::For(For { target, iter, body }));
        self.bubble(id, &[iter_raw]);
        Ok(vec![id])
    }

    /// Binds an array-pattern `for...of` tuple binder by index
    /// (`k = iter_item[0]; v = iter_item[1]; ...`), per spec.md §4.5,
    /// rather than the `deepcopy`+`.pop()` scheme `bind_pattern` uses for a
    /// `var`/`let`/`const` destructuring: each loop iteration's value only
    /// needs reading, never mutating, so there is nothing for a copy to
    /// protect.
    fn bind_for_of_tuple(&mut self, pattern: &SyntaxNode, tmp_name: &str) -> Result<Vec<NodeId>, TransformError> {
        let mut stmts = Vec::new();
        for (i, element) in pattern.children().enumerate() {
            if element.kind() == SyntaxKind::REST_ELEMENT {
                return Err(self.error_at(&element, |line, col| TransformError::UnrecognizedShape { rule: element.kind(), line, col }));
            }
            let base = self.push(Node::Name(Name { id: tmp_name.to_string() }));
            let idx = self.push(Node::Constant(Constant::Int(i as i64)));
            let sub = self.push(Node::Subscript(tython_pyast::Subscript { value: base, index: idx }));
            stmts.extend(self.bind_pattern(&element, sub)?);
        }
        Ok(stmts)
    }

    /// `switch` lowers to an `if`/`elif`/`else` chain (spec.md §4.5's
    /// default `switch_case_to_if_else=true`, the only mode this crate
    /// implements — see DESIGN.md): the subject is transformed once and the
    /// same node is re-referenced as the `left` of every case's `==` test,
    /// with no intervening temporary. A clause's trailing `break` is dropped
    /// as a terminator rather than carried through (a Python `if` body needs
    /// no exit marker). Case fallthrough (no `break`) is not replicated —
    /// the chain always stops at the first matching branch.
    fn transform_switch_stmt(&mut self, node: &SyntaxNode) -> Result<Vec<NodeId>, TransformError> {
        let clauses: Vec<SyntaxNode> = node
            .children()
            .filter(|n| matches!(n.kind(), SyntaxKind::CASE_CLAUSE | SyntaxKind::DEFAULT_CLAUSE))
            .collect();
        if clauses.is_empty() {
            return Err(self.error_at(node, |line, col| TransformError::EmptySwitch { line, col }));
        }

        let subject_el = expr_children(node)
            .into_iter()
            .find(|el| !matches!(el, NodeOrToken::Node(n) if matches!(n.kind(), SyntaxKind::CASE_CLAUSE | SyntaxKind::DEFAULT_CLAUSE)))
            .ok_or_else(|| self.error_at(node, |line, col| TransformError::UnrecognizedShape { rule: node.kind(), line, col }))?;
        let subject_raw = self.transform_expr_el(&subject_el)?;
        let subject_adapted = self.adapt(subject_raw);

        let mut chain: Vec<NodeId> = Vec::new();
        for clause in clauses.into_iter().rev() {
            let clause_elements = expr_children(&clause);
            match clause.kind() {
                SyntaxKind::DEFAULT_CLAUSE => {
                    let body_nodes: Vec<SyntaxNode> = clause_elements.iter().filter_map(|e| e.as_node().cloned()).collect();
                    let mut raw_body = self.raw_stmts_of(body_nodes.into_iter())?;
                    self.drop_trailing_break(&mut raw_body);
                    chain = self.adapt_body(raw_body);
                }
                SyntaxKind::CASE_CLAUSE => {
                    let test_el = clause_elements
                        .first()
                        .cloned()
                        .ok_or_else(|| self.error_at(&clause, |line, col| TransformError::UnrecognizedShape { rule: clause.kind(), line, col }))?;
                    let test_raw = self.transform_expr_el(&test_el)?;
                    let test_adapted = self.adapt(test_raw);
                    let cmp = self.push(Node::Compare(Compare { left: subject_adapted, op: CmpOp::Eq, right: test_adapted }));

                    let body_nodes: Vec<SyntaxNode> = clause_elements[1..].iter().filter_map(|e| e.as_node().cloned()).collect();
                    let mut raw_body = self.raw_stmts_of(body_nodes.into_iter())?;
                    self.drop_trailing_break(&mut raw_body);
                    let body = self.adapt_body(raw_body);

                    let orelse = std::mem::take(&mut chain);
                    let if_id = self.push(Node::If(If { test: cmp, body, orelse }));
                    self.bubble(if_id, &[test_raw]);
                    chain = vec![if_id];
                }
                _ => unreachable!("clauses is filtered to CASE_CLAUSE/DEFAULT_CLAUSE"),
            }
        }

        if let Some(&first) = chain.first() {
            self.bubble(first, &[subject_raw]);
        }
        Ok(chain)
    }

    fn transform_return_stmt(&mut self, node: &SyntaxNode) -> Result<NodeId, TransformError> {
        let elements = expr_children(node);
        match elements.first() {
            Some(el) => {
                let raw = self.transform_expr_el(el)?;
                let adapted = self.adapt(raw);
                let id = self.push(Node::Return(Some(adapted)));
                self.bubble(id, &[raw]);
                Ok(id)
            }
            None => Ok(self.push(Node::Return(None))),
        }
    }

    fn transform_throw_stmt(&mut self, node: &SyntaxNode) -> Result<NodeId, TransformError> {
        let elements = expr_children(node);
        let el = elements
            .first()
            .ok_or_else(|| self.error_at(node, |line, col| TransformError::UnrecognizedShape { rule: node.kind(), line, col }))?;
        let raw = self.transform_expr_el(el)?;
        let adapted = self.adapt(raw);
        let id = self.push(Node::Raise(Some(adapted)));
        self.bubble(id, &[raw]);
        Ok(id)
    }

    fn transform_try_stmt(&mut self, node: &SyntaxNode) -> Result<NodeId, TransformError> {
        let blocks: Vec<SyntaxNode> = parser::children(node, SyntaxKind::BLOCK_STMT).collect();
        let try_block = blocks
            .first()
            .ok_or_else(|| self.error_at(node, |line, col| TransformError::UnrecognizedShape { rule: node.kind(), line, col }))?;
        let finally_block = blocks.get(1);

        let body = self.stmt_body(try_block)?;

        let mut handlers = Vec::new();
        if let Some(catch) = parser::child(node, SyntaxKind::CATCH_CLAUSE) {
            let name = parser::child(&catch, SyntaxKind::IDENT).map(|n| self.names.apply(n.text().to_string().trim()));
            let catch_block = parser::child(&catch, SyntaxKind::BLOCK_STMT)
                .ok_or_else(|| self.error_at(&catch, |line, col| TransformError::UnrecognizedShape { rule: catch.kind(), line, col }))?;
            let handler_body = self.stmt_body(&catch_block)?;
            handlers.push(self.push(Node::ExceptHandler(ExceptHandler { name, body: handler_body })));
        }

        let finalbody = match finally_block {
            Some(b) => self.stmt_body(b)?,
            None => vec![],
        };

        Ok(self.push(Node::Try(Try { body, handlers, finalbody })))
    }

    // -- imports / exports --

    /// Every `ImportDecl` alternative (spec.md §4.3's supplemented import
    /// forms): bare side-effect (`import "mod"`), default
    /// (`import Default from "mod"` -> `import mod as Default`), named with
    /// optional rename, namespace (`import * as ns from "mod"`), and
    /// default combined with a named/namespace specifier, which becomes
    /// two statements rather than one combined node shape.
    fn transform_import_decl(&mut self, node: &SyntaxNode) -> Result<Vec<NodeId>, TransformError> {
        let module_strings: Vec<String> = node
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .filter(|t| t.kind() == SyntaxKind::STRING)
            .map(|t| strip_quotes(t.text()))
            .collect();

        let default_spec = parser::child(node, SyntaxKind::IMPORT_DEFAULT_SPECIFIER);
        let namespace_spec = parser::child(node, SyntaxKind::IMPORT_NAMESPACE_SPECIFIER);
        let named_spec = parser::child(node, SyntaxKind::IMPORT_SPECIFIER);

        if default_spec.is_none() && namespace_spec.is_none() && named_spec.is_none() {
            let module = module_strings.first().cloned().unwrap_or_default();
            let alias = Alias { name: module, as_name: None };
            return Ok(vec![self.push(Node::Import(Import { names: vec![alias] }))]);
        }

        let module = module_strings.last().cloned().unwrap_or_default();
        let mut stmts = Vec::new();

        if let Some(spec) = &default_spec {
            let name = parser::child(spec, SyntaxKind::IDENT)
                .map(|n| self.names.apply(n.text().to_string().trim()))
                .ok_or_else(|| self.error_at(spec, |line, col| TransformError::UnrecognizedShape { rule: spec.kind(), line, col }))?;
            let alias = Alias { name: module.clone(), as_name: Some(name) };
            stmts.push(self.push(Node::Import(Import { names: vec![alias] })));
        }

        if let Some(spec) = &namespace_spec {
            let name = parser::child(spec, SyntaxKind::IDENT)
                .map(|n| self.names.apply(n.text().to_string().trim()))
                .ok_or_else(|| self.error_at(spec, |line, col| TransformError::UnrecognizedShape { rule: spec.kind(), line, col }))?;
            let alias = Alias { name: module.clone(), as_name: Some(name) };
            stmts.push(self.push(Node::Import(Import { names: vec![alias] })));
        } else if let Some(spec) = &named_spec {
            let names = self.collect_import_aliases(spec)?;
            stmts.push(self.push(Node::ImportFrom(ImportFrom { module: module.clone(), names })));
        }

        Ok(stmts)
    }

    /// Walks an `ImportSpecifier`'s `Name ('as' Name)? (',' ...)*` token
    /// stream pairing each name with its optional rename, the same
    /// token-level scan `collect_params` uses to spot a rest parameter.
    fn collect_import_aliases(&mut self, spec: &SyntaxNode) -> Result<Vec<Alias>, TransformError> {
        let mut names = Vec::new();
        let mut pending: Option<String> = None;
        let mut saw_as = false;
        for el in spec.children_with_tokens() {
            match el {
                NodeOrToken::Node(n) if n.kind() == SyntaxKind::IDENT => {
                    let text = self.names.apply(n.text().to_string().trim());
                    if saw_as {
                        if let Some(name) = pending.take() {
                            names.push(Alias { name, as_name: Some(text) });
                        }
                        saw_as = false;
                    } else {
                        if let Some(name) = pending.take() {
                            names.push(Alias { name, as_name: None });
                        }
                        pending = Some(text);
                    }
                }
                NodeOrToken::Token(t) if t.kind() == SyntaxKind::AS_KW => saw_as = true,
                _ => {}
            }
        }
        if let Some(name) = pending.take() {
            names.push(Alias { name, as_name: None });
        }
        Ok(names)
    }

    /// `export`/`export default` unwrapping (spec.md §4.3): a wrapped
    /// declaration (`var`/`function`/`class`) becomes that declaration; a
    /// wrapped bare expression (`export default 42;`) becomes an
    /// `ExprStmt`; a re-export (`export { a } from "mod"`) has no Python
    /// counterpart and is dropped.
    fn transform_export_like(&mut self, node: &SyntaxNode) -> Result<Out, TransformError> {
        match node.children().next() {
            Some(n) if n.kind() == SyntaxKind::IMPORT_SPECIFIER => Ok(Out::None),
            Some(n) if matches!(n.kind(), SyntaxKind::VAR_DECL | SyntaxKind::FUNCTION_DECL | SyntaxKind::CLASS_DECL) => {
                self.transform_stmt(&n)
            }
            _ => {
                let elements = expr_children(node);
                let value_el = elements
                    .last()
                    .cloned()
                    .ok_or_else(|| self.error_at(node, |line, col| TransformError::UnrecognizedShape { rule: node.kind(), line, col }))?;
                let raw = self.transform_expr_el(&value_el)?;
                let adapted = self.adapt(raw);
                let id = self.push(Node::ExprStmt(adapted));
                self.bubble(id, &[raw]);
                Ok(Out::One(id))
            }
        }
    }
}

/// A `VAR_DECLARATOR`'s children with the TS `: Type` annotation (if any)
/// dropped, keeping the bare-literal-token initializer (`let x = 5`) the
/// same way [`expr_children`] does for expression nodes.
fn non_type_children(node: &SyntaxNode) -> Vec<SyntaxElement> {
    node.children_with_tokens()
        .filter(|el| match el {
            NodeOrToken::Token(t) => is_literal_token(t.kind()),
            NodeOrToken::Node(n) => n.kind() != SyntaxKind::TYPE_ANNOTATION,
        })
        .collect()
}

fn strip_quotes(text: &str) -> String {
    let mut chars = text.chars();
    chars.next();
    chars.next_back();
    chars.as_str().to_string()
}
