//! Expression handlers: literals, identifiers, operators,
//! `typeof`/`instanceof`, regex, collections, and the anonymous
//! function/arrow hoisting entry points (the bodies of those live in
//! `function_class.rs`; this module only builds the synthetic-name
//! reference at the expression's original position).

use rowan::NodeOrToken;
use tython_parser::{self as parser, SyntaxElement, SyntaxKind, SyntaxNode, SyntaxToken};
use tython_pyast::{
    Attribute, BinOp, BinOpKind, BoolOp, BoolOpKind, Call, CmpOp, Compare, Constant, Dict, FString,
    IfExp, List, Name, Node, NodeId, Subscript, UnaryOp, UnaryOpKind,
};

use crate::bucket::{rule_bucket, RuleBucket};
use crate::context::Transformer;
use crate::error::TransformError;

/// JS array-method names the transformer rewrites to the equivalent
/// Python builtin with swapped argument order (`arr.map(fn)` ->
/// `map(fn, arr)`), matching scenario S2. Every other member call stays a
/// plain `receiver.method(args)` `Call(Attribute(...))`.
const BUILTIN_HOF: &[&str] = &["map", "filter", "reduce"];

/// Non-trivia children worth transforming as expressions: every child
/// `SyntaxNode`, plus the bare literal tokens the parser emits directly
/// into the parent rather than wrapping in their own node (numbers,
/// strings, `this`, booleans, `null`/`undefined`, regex).
pub(crate) fn expr_children(parent: &SyntaxNode) -> Vec<SyntaxElement> {
    parent
        .children_with_tokens()
        .filter(|el| match el {
            NodeOrToken::Token(t) => is_literal_token(t.kind()),
            NodeOrToken::Node(_) => true,
        })
        .collect()
}

pub(crate) fn is_literal_token(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::INT_NUMBER
            | SyntaxKind::FLOAT_NUMBER
            | SyntaxKind::STRING
            | SyntaxKind::REGEX
            | SyntaxKind::TRUE_KW
            | SyntaxKind::FALSE_KW
            | SyntaxKind::NULL_KW
            | SyntaxKind::UNDEFINED_KW
            | SyntaxKind::THIS_KW
    )
}

fn find_op_token(node: &SyntaxNode, candidates: &[SyntaxKind]) -> Option<SyntaxKind> {
    node.children_with_tokens()
        .filter_map(|e| e.into_token())
        .map(|t| t.kind())
        .find(|k| candidates.contains(k))
}

impl Transformer {
    /// Transforms one expression-position CST element (a node, or a bare
    /// literal token) into an arena `NodeId`.
    pub fn transform_expr_el(&mut self, el: &SyntaxElement) -> Result<NodeId, TransformError> {
        match el {
            NodeOrToken::Node(n) => self.transform_expr(n),
            NodeOrToken::Token(t) => Ok(self.transform_literal_token(t)),
        }
    }

    fn transform_literal_token(&mut self, tok: &SyntaxToken) -> NodeId {
        let text = tok.text();
        match tok.kind() {
            SyntaxKind::INT_NUMBER => self.push(Node::Constant(Constant::Int(text.parse().unwrap_or(0)))),
            SyntaxKind::FLOAT_NUMBER => self.push(Node::Constant(Constant::Float(text.parse().unwrap_or(0.0)))),
            SyntaxKind::STRING => self.push(Node::Constant(Constant::Str(strip_quotes(text)))),
            SyntaxKind::TRUE_KW => self.push(Node::Constant(Constant::Bool(true))),
            SyntaxKind::FALSE_KW => self.push(Node::Constant(Constant::Bool(false))),
            SyntaxKind::NULL_KW | SyntaxKind::UNDEFINED_KW => self.push(Node::Constant(Constant::None)),
            SyntaxKind::THIS_KW => self.push(Node::Name(Name { id: "this".to_string() })),
            SyntaxKind::REGEX => {
                let re = self.push(Node::Constant(Constant::Str(text.to_string())));
                let compile = self.push(Node::Name(Name { id: "re.compile".to_string() }));
                self.push(Node::Call(Call { func: compile, args: vec![re] }))
            }
            other => unreachable!("{other:?} is not a literal token"),
        }
    }

    pub fn transform_expr(&mut self, node: &SyntaxNode) -> Result<NodeId, TransformError> {
        if rule_bucket(node.kind()) == RuleBucket::First {
            // PAREN_EXPR / AS_EXPR: the parenthesized value or the checked
            // expression is the only child worth keeping; the type itself
            // was already dropped by the parser.
            let first = expr_children(node)
                .into_iter()
                .next()
                .ok_or_else(|| self.error_at(node, |line, col| TransformError::UnrecognizedShape { rule: node.kind(), line, col }))?;
            return self.transform_expr_el(&first);
        }

        match node.kind() {
            SyntaxKind::IDENT => {
                let name = self.names.apply(node.text().to_string().trim());
                Ok(self.push(Node::Name(Name { id: name })))
            }
            SyntaxKind::TEMPLATE_LITERAL => {
                let raw = node.text().to_string();
                Ok(self.push(Node::FString(FString { body: strip_backticks(&raw) })))
            }
            SyntaxKind::ARRAY_EXPR => self.transform_array_expr(node),
            SyntaxKind::OBJECT_EXPR => self.transform_object_expr(node),
            SyntaxKind::SPREAD_ELEMENT => {
                let inner = expr_children(node)
                    .into_iter()
                    .next()
                    .ok_or_else(|| self.error_at(node, |line, col| TransformError::UnrecognizedShape { rule: node.kind(), line, col }))?;
                let raw = self.transform_expr_el(&inner)?;
                let adapted = self.adapt(raw);
                let id = self.push(Node::Starred(adapted));
                self.bubble(id, &[raw]);
                Ok(id)
            }
            SyntaxKind::MEMBER_EXPR => self.transform_member_expr(node),
            SyntaxKind::CALL_EXPR => self.transform_call_expr(node),
            SyntaxKind::NEW_EXPR => self.transform_new_expr(node),
            SyntaxKind::BINARY_EXPR => self.transform_binary_expr(node),
            SyntaxKind::LOGICAL_EXPR => self.transform_logical_expr(node),
            SyntaxKind::UNARY_EXPR => self.transform_unary_expr(node),
            SyntaxKind::UPDATE_EXPR => {
                let (target_raw, target) = self.single_operand(node)?;
                let op = if find_op_token(node, &[SyntaxKind::PLUS_PLUS]).is_some() {
                    BinOpKind::Add
                } else {
                    BinOpKind::Sub
                };
                let one = self.push(Node::Constant(Constant::Int(1)));
                let bin = self.push(Node::BinOp(BinOp { left: target, op, right: one }));
                let assign_id = self.push(Node::Assign(tython_pyast::Assign { targets: vec![target], value: bin }));
                self.bubble(assign_id, &[target_raw]);
                Ok(assign_id)
            }
            SyntaxKind::ASSIGN_EXPR => self.transform_assign_expr(node),
            SyntaxKind::CONDITIONAL_EXPR => self.transform_conditional_expr(node),
            SyntaxKind::SEQUENCE_EXPR => {
                // Unreachable with the current parser (see parse_sequence_expr);
                // best-effort: JS comma operator evaluates all and yields the
                // last, so keep only the last child's value.
                let children = expr_children(node);
                let last = children
                    .last()
                    .cloned()
                    .ok_or_else(|| self.error_at(node, |line, col| TransformError::UnrecognizedShape { rule: node.kind(), line, col }))?;
                self.transform_expr_el(&last)
            }
            SyntaxKind::TAGGED_TEMPLATE => Err(self.error_at(node, |line, col| TransformError::TaggedTemplateUnsupported { line, col })),
            SyntaxKind::ARROW_FUNCTION => self.transform_arrow_function(node),
            SyntaxKind::FUNCTION_DECL => self.transform_function_expr(node),
            other => Err(self.error_at(node, move |line, col| TransformError::UnrecognizedShape { rule: other, line, col })),
        }
    }

    fn single_operand(&mut self, node: &SyntaxNode) -> Result<(NodeId, NodeId), TransformError> {
        let el = expr_children(node)
            .into_iter()
            .next()
            .ok_or_else(|| self.error_at(node, |line, col| TransformError::UnrecognizedShape { rule: node.kind(), line, col }))?;
        let raw = self.transform_expr_el(&el)?;
        Ok((raw, self.adapt(raw)))
    }

    fn transform_array_expr(&mut self, node: &SyntaxNode) -> Result<NodeId, TransformError> {
        let raw: Vec<NodeId> = expr_children(node)
            .iter()
            .map(|el| self.transform_expr_el(el))
            .collect::<Result<_, _>>()?;
        let adapted = self.adapt_all(&raw);
        let id = self.push(Node::List(List { elts: adapted }));
        self.bubble(id, &raw);
        Ok(id)
    }

    fn transform_object_expr(&mut self, node: &SyntaxNode) -> Result<NodeId, TransformError> {
        let mut raw_all = Vec::new();
        let mut keys: Vec<Option<NodeId>> = Vec::new();
        let mut values: Vec<NodeId> = Vec::new();
        for child in node.children() {
            match child.kind() {
                SyntaxKind::SPREAD_ELEMENT => {
                    let inner = expr_children(&child)
                        .into_iter()
                        .next()
                        .ok_or_else(|| self.error_at(&child, |line, col| TransformError::UnknownDictItem { line, col }))?;
                    let raw = self.transform_expr_el(&inner)?;
                    raw_all.push(raw);
                    keys.push(None);
                    values.push(self.adapt(raw));
                }
                SyntaxKind::PROPERTY => {
                    let (key_raw, key, value_raw, value) = self.transform_property(&child)?;
                    if let Some(k) = key_raw {
                        raw_all.push(k);
                    }
                    raw_all.push(value_raw);
                    keys.push(Some(key));
                    values.push(value);
                }
                _ => {}
            }
        }
        let dict = self.push(Node::Dict(Dict { keys, values }));
        let ensure = self.push(Node::Name(Name { id: "ensureDottedAccess".to_string() }));
        let id = self.push(Node::Call(Call { func: ensure, args: vec![dict] }));
        self.bubble(id, &raw_all);
        Ok(id)
    }

    /// Returns `(raw_key_child_if_any, key_id, raw_value_child, value_id)`.
    fn transform_property(&mut self, prop: &SyntaxNode) -> Result<(Option<NodeId>, NodeId, NodeId, NodeId), TransformError> {
        let elements: Vec<SyntaxElement> = prop
            .children_with_tokens()
            .filter(|el| match el {
                NodeOrToken::Token(t) => !t.kind().is_trivia() && t.kind() != SyntaxKind::COLON,
                NodeOrToken::Node(_) => true,
            })
            .collect();

        let err = || self.error_at(prop, |line, col| TransformError::UnknownDictItem { line, col });

        match elements.first() {
            Some(NodeOrToken::Token(t)) if t.kind() == SyntaxKind::L_BRACK => {
                let key_el = elements.get(1).ok_or_else(err)?.clone();
                let value_el = elements.get(3).ok_or_else(err)?.clone();
                let key_raw = self.transform_expr_el(&key_el)?;
                let value_raw = self.transform_expr_el(&value_el)?;
                let key = self.adapt(key_raw);
                let value = self.adapt(value_raw);
                Ok((Some(key_raw), key, value_raw, value))
            }
            Some(NodeOrToken::Token(t)) if t.kind() == SyntaxKind::STRING => {
                let key = self.push(Node::Constant(Constant::Str(strip_quotes(t.text()))));
                let value_el = elements.get(1).ok_or_else(err)?.clone();
                let value_raw = self.transform_expr_el(&value_el)?;
                let value = self.adapt(value_raw);
                Ok((None, key, value_raw, value))
            }
            Some(NodeOrToken::Node(key_node)) if key_node.kind() == SyntaxKind::IDENT => {
                let ident = self.names.apply(key_node.text().to_string().trim());
                let key = self.push(Node::Constant(Constant::Str(ident.clone())));
                match elements.get(1) {
                    None => {
                        // shorthand { x }
                        let value_raw = self.push(Node::Name(Name { id: ident }));
                        Ok((None, key, value_raw, value_raw))
                    }
                    Some(NodeOrToken::Node(n)) if n.kind() == SyntaxKind::PARAM_LIST => {
                        let body_node = elements
                            .get(2)
                            .and_then(|e| e.as_node().cloned())
                            .ok_or_else(err)?;
                        let def_id = self.build_function_def(&ident, n, &body_node, false, vec![])?;
                        let marker_name = tython_pyast::NameManager::definition_marker(&ident);
                        let marker = self.push(Node::Name(Name { id: marker_name }));
                        self.hoist.register(def_id, marker);
                        Ok((None, key, def_id, marker))
                    }
                    Some(value_el) => {
                        let value_raw = self.transform_expr_el(value_el)?;
                        let value = self.adapt(value_raw);
                        Ok((None, key, value_raw, value))
                    }
                }
            }
            _ => Err(err()),
        }
    }

    fn transform_member_expr(&mut self, node: &SyntaxNode) -> Result<NodeId, TransformError> {
        let children = expr_children(node);
        let object_el = children
            .first()
            .ok_or_else(|| self.error_at(node, |line, col| TransformError::UnrecognizedShape { rule: node.kind(), line, col }))?
            .clone();
        let object_raw = self.transform_expr_el(&object_el)?;
        let object = self.adapt(object_raw);

        if find_op_token(node, &[SyntaxKind::L_BRACK]).is_some() {
            let index_el = children
                .get(1)
                .cloned()
                .ok_or_else(|| self.error_at(node, |line, col| TransformError::UnrecognizedShape { rule: node.kind(), line, col }))?;
            let index_raw = self.transform_expr_el(&index_el)?;
            let index = self.adapt(index_raw);
            let id = self.push(Node::Subscript(Subscript { value: object, index }));
            self.bubble(id, &[object_raw, index_raw]);
            Ok(id)
        } else {
            let attr = children
                .get(1)
                .and_then(|e| e.as_node())
                .map(|n| n.text().to_string())
                .ok_or_else(|| self.error_at(node, |line, col| TransformError::UnrecognizedShape { rule: node.kind(), line, col }))?;
            let id = self.push(Node::Attribute(Attribute { value: object, attr: self.names.apply(attr.trim()) }));
            self.bubble(id, &[object_raw]);
            Ok(id)
        }
    }

    fn transform_call_expr(&mut self, node: &SyntaxNode) -> Result<NodeId, TransformError> {
        let args_node = parser::child(node, SyntaxKind::ARGUMENTS);
        let callee_el = expr_children(node)
            .into_iter()
            .find(|el| !matches!(el, NodeOrToken::Node(n) if n.kind() == SyntaxKind::ARGUMENTS))
            .ok_or_else(|| self.error_at(node, |line, col| TransformError::UnrecognizedShape { rule: node.kind(), line, col }))?;

        let mut raw_all = Vec::new();
        let raw_args: Vec<NodeId> = match &args_node {
            Some(n) => expr_children(n).iter().map(|el| self.transform_expr_el(el)).collect::<Result<_, _>>()?,
            None => vec![],
        };
        raw_all.extend(&raw_args);
        let args = self.adapt_all(&raw_args);

        if let NodeOrToken::Node(callee_node) = &callee_el {
            if callee_node.kind() == SyntaxKind::MEMBER_EXPR {
                if let Some(rewritten) = self.try_builtin_hof(callee_node, &args, &raw_args)? {
                    return Ok(rewritten);
                }
            }
        }

        let callee_raw = self.transform_expr_el(&callee_el)?;
        raw_all.push(callee_raw);
        let callee = self.adapt(callee_raw);
        let id = self.push(Node::Call(Call { func: callee, args }));
        self.bubble(id, &raw_all);
        Ok(id)
    }

    /// Rewrites `recv.map(fn)`/`recv.filter(fn)`/`recv.reduce(fn, init)`
    /// into `map(fn, recv)`/`filter(fn, recv)`/`reduce(fn, recv, init)`
    /// when the member name matches, per scenario S2. Returns `None` for
    /// every other member call, which falls back to the ordinary
    /// `Call(Attribute(...))` shape.
    fn try_builtin_hof(
        &mut self,
        member: &SyntaxNode,
        call_args: &[NodeId],
        raw_call_args: &[NodeId],
    ) -> Result<Option<NodeId>, TransformError> {
        let children = expr_children(member);
        if find_op_token(member, &[SyntaxKind::L_BRACK]).is_some() {
            return Ok(None);
        }
        let prop_name = match children.get(1) {
            Some(NodeOrToken::Node(n)) if n.kind() == SyntaxKind::IDENT => n.text().to_string(),
            _ => return Ok(None),
        };
        if !BUILTIN_HOF.contains(&prop_name.trim()) || call_args.is_empty() {
            return Ok(None);
        }
        let object_el = match children.first() {
            Some(e) => e.clone(),
            None => return Ok(None),
        };
        let object_raw = self.transform_expr_el(&object_el)?;
        let object = self.adapt(object_raw);
        let func_name = self.push(Node::Name(Name { id: prop_name.trim().to_string() }));
        let mut all_args = vec![call_args[0], object];
        all_args.extend_from_slice(&call_args[1..]);
        let id = self.push(Node::Call(Call { func: func_name, args: all_args }));
        let mut raw = raw_call_args.to_vec();
        raw.push(object_raw);
        self.bubble(id, &raw);
        Ok(Some(id))
    }

    fn transform_new_expr(&mut self, node: &SyntaxNode) -> Result<NodeId, TransformError> {
        let args_node = parser::child(node, SyntaxKind::ARGUMENTS);
        let callee_el = expr_children(node)
            .into_iter()
            .find(|el| !matches!(el, NodeOrToken::Node(n) if n.kind() == SyntaxKind::ARGUMENTS))
            .ok_or_else(|| self.error_at(node, |line, col| TransformError::UnrecognizedShape { rule: node.kind(), line, col }))?;
        let callee_raw = self.transform_expr_el(&callee_el)?;
        let callee = self.adapt(callee_raw);
        let raw_args: Vec<NodeId> = match &args_node {
            Some(n) => expr_children(n).iter().map(|el| self.transform_expr_el(el)).collect::<Result<_, _>>()?,
            None => vec![],
        };
        let args = self.adapt_all(&raw_args);
        let id = self.push(Node::Call(Call { func: callee, args }));
        let mut raw_all = raw_args;
        raw_all.push(callee_raw);
        self.bubble(id, &raw_all);
        Ok(id)
    }

    fn transform_binary_expr(&mut self, node: &SyntaxNode) -> Result<NodeId, TransformError> {
        let children = expr_children(node);
        let lhs_el = children.first().cloned().ok_or_else(|| self.error_at(node, |line, col| TransformError::UnrecognizedShape { rule: node.kind(), line, col }))?;
        let rhs_el = children.get(1).cloned().ok_or_else(|| self.error_at(node, |line, col| TransformError::UnrecognizedShape { rule: node.kind(), line, col }))?;

        if find_op_token(node, &[SyntaxKind::TYPEOF_KW]).is_some() {
            // unreachable: typeof is a UNARY_EXPR, not BINARY_EXPR; kept
            // out of the operator candidate list below for clarity.
        }

        let op_kind = find_op_token(
            node,
            &[
                SyntaxKind::PLUS,
                SyntaxKind::MINUS,
                SyntaxKind::STAR,
                SyntaxKind::SLASH,
                SyntaxKind::PERCENT,
                SyntaxKind::EQ_EQ,
                SyntaxKind::EQ_EQ_EQ,
                SyntaxKind::BANG_EQ,
                SyntaxKind::BANG_EQ_EQ,
                SyntaxKind::LT,
                SyntaxKind::GT,
                SyntaxKind::LT_EQ,
                SyntaxKind::GT_EQ,
                SyntaxKind::INSTANCEOF_KW,
                SyntaxKind::IN_KW,
            ],
        )
        .ok_or_else(|| self.error_at(node, |line, col| TransformError::UnrecognizedShape { rule: node.kind(), line, col }))?;

        let lhs_raw = self.transform_expr_el(&lhs_el)?;
        let rhs_raw = self.transform_expr_el(&rhs_el)?;
        let lhs = self.adapt(lhs_raw);
        let rhs = self.adapt(rhs_raw);

        let id = match op_kind {
            SyntaxKind::PLUS => self.push(Node::BinOp(BinOp { left: lhs, op: BinOpKind::Add, right: rhs })),
            SyntaxKind::MINUS => self.push(Node::BinOp(BinOp { left: lhs, op: BinOpKind::Sub, right: rhs })),
            SyntaxKind::STAR => self.push(Node::BinOp(BinOp { left: lhs, op: BinOpKind::Mult, right: rhs })),
            SyntaxKind::SLASH => self.push(Node::BinOp(BinOp { left: lhs, op: BinOpKind::Div, right: rhs })),
            SyntaxKind::PERCENT => self.push(Node::BinOp(BinOp { left: lhs, op: BinOpKind::Mod, right: rhs })),
            SyntaxKind::EQ_EQ | SyntaxKind::EQ_EQ_EQ => self.push(Node::Compare(Compare { left: lhs, op: CmpOp::Eq, right: rhs })),
            SyntaxKind::BANG_EQ | SyntaxKind::BANG_EQ_EQ => self.push(Node::Compare(Compare { left: lhs, op: CmpOp::NotEq, right: rhs })),
            SyntaxKind::LT => self.push(Node::Compare(Compare { left: lhs, op: CmpOp::Lt, right: rhs })),
            SyntaxKind::GT => self.push(Node::Compare(Compare { left: lhs, op: CmpOp::Gt, right: rhs })),
            SyntaxKind::LT_EQ => self.push(Node::Compare(Compare { left: lhs, op: CmpOp::LtE, right: rhs })),
            SyntaxKind::GT_EQ => self.push(Node::Compare(Compare { left: lhs, op: CmpOp::GtE, right: rhs })),
            SyntaxKind::IN_KW => self.push(Node::Compare(Compare { left: lhs, op: CmpOp::In, right: rhs })),
            SyntaxKind::INSTANCEOF_KW => {
                let isinstance = self.push(Node::Name(Name { id: "isinstance".to_string() }));
                self.push(Node::Call(Call { func: isinstance, args: vec![lhs, rhs] }))
            }
            _ => unreachable!(),
        };
        self.bubble(id, &[lhs_raw, rhs_raw]);
        Ok(id)
    }

    fn transform_logical_expr(&mut self, node: &SyntaxNode) -> Result<NodeId, TransformError> {
        let children = expr_children(node);
        let lhs_el = children.first().cloned().ok_or_else(|| self.error_at(node, |line, col| TransformError::UnrecognizedShape { rule: node.kind(), line, col }))?;
        let rhs_el = children.get(1).cloned().ok_or_else(|| self.error_at(node, |line, col| TransformError::UnrecognizedShape { rule: node.kind(), line, col }))?;
        let lhs_raw = self.transform_expr_el(&lhs_el)?;
        let rhs_raw = self.transform_expr_el(&rhs_el)?;
        let lhs = self.adapt(lhs_raw);
        let rhs = self.adapt(rhs_raw);
        let op = if find_op_token(node, &[SyntaxKind::AMP_AMP]).is_some() { BoolOpKind::And } else { BoolOpKind::Or };
        let id = self.push(Node::BoolOp(BoolOp { op, values: vec![lhs, rhs] }));
        self.bubble(id, &[lhs_raw, rhs_raw]);
        Ok(id)
    }

    fn transform_unary_expr(&mut self, node: &SyntaxNode) -> Result<NodeId, TransformError> {
        let op_kind = find_op_token(
            node,
            &[SyntaxKind::BANG, SyntaxKind::MINUS, SyntaxKind::TYPEOF_KW, SyntaxKind::DELETE_KW, SyntaxKind::AWAIT_KW],
        )
        .ok_or_else(|| self.error_at(node, |line, col| TransformError::UnrecognizedShape { rule: node.kind(), line, col }))?;
        let (operand_raw, operand) = self.single_operand(node)?;

        let id = match op_kind {
            SyntaxKind::BANG => self.push(Node::UnaryOp(UnaryOp { op: UnaryOpKind::Not, operand })),
            SyntaxKind::MINUS => self.push(Node::UnaryOp(UnaryOp { op: UnaryOpKind::USub, operand })),
            SyntaxKind::TYPEOF_KW => {
                let type_fn = self.push(Node::Name(Name { id: "type".to_string() }));
                self.push(Node::Call(Call { func: type_fn, args: vec![operand] }))
            }
            SyntaxKind::DELETE_KW => self.push(Node::Delete(vec![operand])),
            SyntaxKind::AWAIT_KW => self.push(Node::Await(operand)),
            _ => unreachable!(),
        };
        self.bubble(id, &[operand_raw]);
        Ok(id)
    }

    fn transform_assign_expr(&mut self, node: &SyntaxNode) -> Result<NodeId, TransformError> {
        let children = expr_children(node);
        let target_el = children.first().cloned().ok_or_else(|| self.error_at(node, |line, col| TransformError::UnrecognizedShape { rule: node.kind(), line, col }))?;
        let value_el = children.get(1).cloned().ok_or_else(|| self.error_at(node, |line, col| TransformError::UnrecognizedShape { rule: node.kind(), line, col }))?;
        let op = find_op_token(
            node,
            &[SyntaxKind::EQ, SyntaxKind::PLUS_EQ, SyntaxKind::MINUS_EQ, SyntaxKind::STAR_EQ, SyntaxKind::SLASH_EQ],
        )
        .ok_or_else(|| self.error_at(node, |line, col| TransformError::UnrecognizedShape { rule: node.kind(), line, col }))?;

        let target_raw = self.transform_expr_el(&target_el)?;
        let value_raw = self.transform_expr_el(&value_el)?;
        let target = self.adapt(target_raw);
        let value = self.adapt(value_raw);

        let rhs = match op {
            SyntaxKind::EQ => value,
            SyntaxKind::PLUS_EQ => self.push(Node::BinOp(BinOp { left: target, op: BinOpKind::Add, right: value })),
            SyntaxKind::MINUS_EQ => self.push(Node::BinOp(BinOp { left: target, op: BinOpKind::Sub, right: value })),
            SyntaxKind::STAR_EQ => self.push(Node::BinOp(BinOp { left: target, op: BinOpKind::Mult, right: value })),
            SyntaxKind::SLASH_EQ => self.push(Node::BinOp(BinOp { left: target, op: BinOpKind::Div, right: value })),
            _ => unreachable!(),
        };
        let id = self.push(Node::Assign(tython_pyast::Assign { targets: vec![target], value: rhs }));
        self.bubble(id, &[target_raw, value_raw]);
        Ok(id)
    }

    fn transform_conditional_expr(&mut self, node: &SyntaxNode) -> Result<NodeId, TransformError> {
        let children = expr_children(node);
        let test_raw = self.transform_expr_el(children.first().ok_or_else(|| self.error_at(node, |l, c| TransformError::UnrecognizedShape { rule: node.kind(), line: l, col: c }))?)?;
        let body_raw = self.transform_expr_el(children.get(1).ok_or_else(|| self.error_at(node, |l, c| TransformError::UnrecognizedShape { rule: node.kind(), line: l, col: c }))?)?;
        let orelse_raw = self.transform_expr_el(children.get(2).ok_or_else(|| self.error_at(node, |l, c| TransformError::UnrecognizedShape { rule: node.kind(), line: l, col: c }))?)?;
        let test = self.adapt(test_raw);
        let body = self.adapt(body_raw);
        let orelse = self.adapt(orelse_raw);
        let id = self.push(Node::IfExp(IfExp { test, body, orelse }));
        self.bubble(id, &[test_raw, body_raw, orelse_raw]);
        Ok(id)
    }
}

fn strip_quotes(text: &str) -> String {
    let mut chars = text.chars();
    chars.next();
    chars.next_back();
    chars.as_str().to_string()
}

fn strip_backticks(text: &str) -> String {
    strip_quotes(text)
}
