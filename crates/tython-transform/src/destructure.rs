//! Array/object destructuring, shared by `var`/`let`/`const` declarators,
//! function parameters and `for...of`/`for...in` tuple binders.
//!
//! Ported verbatim from the original's `tmp_cp = deepcopy(src)` +
//! positional `.pop(i)` / keyed `.pop("key")` scheme rather than rewritten
//! into idiomatic Python unpacking: the original pops mutate the copy in
//! place, which is also how a trailing `...rest` element picks up
//! "whatever is left" for free — it is just the temporary itself once every
//! preceding element has been popped off.

use tython_parser::{SyntaxKind, SyntaxNode};
use tython_pyast::{Assign, Attribute, Call, Constant, Name, Node, NodeId};

use crate::context::Transformer;
use crate::error::TransformError;

impl Transformer {
    /// Binds `pattern` (`IDENT`, `ARRAY_PATTERN` or `OBJECT_PATTERN`)
    /// against `source`, an already-built and already-adapted expression,
    /// returning the statement list that performs the binding.
    pub fn bind_pattern(&mut self, pattern: &SyntaxNode, source: NodeId) -> Result<Vec<NodeId>, TransformError> {
        match pattern.kind() {
            SyntaxKind::IDENT => {
                let name = self.names.apply(pattern.text().to_string().trim());
                let target = self.push(Node::Name(Name { id: name }));
                Ok(vec![self.push(Node::Assign(Assign { targets: vec![target], value: source }))])
            }
            SyntaxKind::ARRAY_PATTERN => self.bind_array_pattern(pattern, source),
            SyntaxKind::OBJECT_PATTERN => self.bind_object_pattern(pattern, source),
            other => Err(self.error_at(pattern, move |line, col| TransformError::UnrecognizedShape { rule: other, line, col })),
        }
    }

    fn deepcopy(&mut self, source: NodeId) -> NodeId {
        let callee = self.push(Node::Name(Name { id: "deepcopy".to_string() }));
        self.push(Node::Call(Call { func: callee, args: vec![source] }))
    }

    fn pop_call(&mut self, tmp_ref: NodeId, key: NodeId) -> NodeId {
        let attr = self.push(Node::Attribute(Attribute { value: tmp_ref, attr: "pop".to_string() }));
        self.push(Node::Call(Call { func: attr, args: vec![key] }))
    }

    fn bind_array_pattern(&mut self, pattern: &SyntaxNode, source: NodeId) -> Result<Vec<NodeId>, TransformError> {
        let tmp_name = self.names.fresh_tmp_cp();
        let deep = self.deepcopy(source);
        let tmp_target = self.push(Node::Name(Name { id: tmp_name.clone() }));
        let mut stmts = vec![self.push(Node::Assign(Assign { targets: vec![tmp_target], value: deep }))];

        let mut idx: i64 = 0;
        for element in pattern.children() {
            let tmp_ref = self.push(Node::Name(Name { id: tmp_name.clone() }));
            if element.kind() == SyntaxKind::REST_ELEMENT {
                let inner = element
                    .children()
                    .next()
                    .ok_or_else(|| self.error_at(&element, |line, col| TransformError::UnrecognizedShape { rule: element.kind(), line, col }))?;
                // whatever is left in tmp_ref once every earlier element has
                // popped its own slot off is exactly the rest binding.
                stmts.extend(self.bind_pattern(&inner, tmp_ref)?);
            } else {
                let index = self.push(Node::Constant(Constant::Int(idx)));
                idx += 1;
                let popped = self.pop_call(tmp_ref, index);
                stmts.extend(self.bind_pattern(&element, popped)?);
            }
        }
        Ok(stmts)
    }

    fn bind_object_pattern(&mut self, pattern: &SyntaxNode, source: NodeId) -> Result<Vec<NodeId>, TransformError> {
        let tmp_name = self.names.fresh_tmp_cp();
        let deep = self.deepcopy(source);
        let tmp_target = self.push(Node::Name(Name { id: tmp_name.clone() }));
        let mut stmts = vec![self.push(Node::Assign(Assign { targets: vec![tmp_target], value: deep }))];

        for element in pattern.children() {
            let tmp_ref = self.push(Node::Name(Name { id: tmp_name.clone() }));
            match element.kind() {
                SyntaxKind::REST_ELEMENT => {
                    let inner = element
                        .children()
                        .next()
                        .ok_or_else(|| self.error_at(&element, |line, col| TransformError::UnrecognizedShape { rule: element.kind(), line, col }))?;
                    stmts.extend(self.bind_pattern(&inner, tmp_ref)?);
                }
                SyntaxKind::ASSIGN_PATTERN => {
                    // `{ key: renamed }`, optionally `= default` (the
                    // default expression is not threaded through — see
                    // DESIGN.md).
                    let mut idents = element.children().filter(|n| n.kind() == SyntaxKind::IDENT);
                    let key_node = idents
                        .next()
                        .ok_or_else(|| self.error_at(&element, |line, col| TransformError::UnrecognizedShape { rule: element.kind(), line, col }))?;
                    let target_node = idents
                        .next()
                        .ok_or_else(|| self.error_at(&element, |line, col| TransformError::UnrecognizedShape { rule: element.kind(), line, col }))?;
                    let key = self.names.apply(key_node.text().to_string().trim());
                    let key_const = self.push(Node::Constant(Constant::Str(key)));
                    let popped = self.pop_call(tmp_ref, key_const);
                    stmts.extend(self.bind_pattern(&target_node, popped)?);
                }
                SyntaxKind::IDENT => {
                    // shorthand `{ x }`
                    let key = self.names.apply(element.text().to_string().trim());
                    let key_const = self.push(Node::Constant(Constant::Str(key)));
                    let popped = self.pop_call(tmp_ref, key_const);
                    stmts.extend(self.bind_pattern(&element, popped)?);
                }
                _ => stmts.extend(self.bind_pattern(&element, tmp_ref)?),
            }
        }
        Ok(stmts)
    }
}
