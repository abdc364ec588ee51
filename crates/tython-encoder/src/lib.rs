//! Renders a [`tython_pyast::Arena`] to Python 3 source text (spec.md
//! §4.8). A straightforward recursive renderer over the closed node set,
//! per the "Python AST serialization" design note in spec.md §9 — no
//! subprocess call-out to a reference implementation.
//!
//! Grounded on `apollo-encoder`'s per-node `Display`-style rendering
//! (`crates/apollo-encoder/src/field.rs` et al.), adapted for an
//! arena-addressed tree: every node here needs the `Arena` to resolve a
//! child `NodeId`, so rendering is a method on [`Encoder`] rather than a
//! `Display` impl on each node type.

use std::fmt::Write as _;

use tython_pyast::{
    Arena, BinOpKind, BoolOpKind, CmpOp, Constant, Node, NodeId, UnaryOpKind,
};

const INDENT_WIDTH: usize = 4;

/// Binding power of an expression node, used to decide whether a child
/// needs parentheses when rendered inside a parent with higher
/// precedence. Larger binds tighter. Mirrors Python's own precedence
/// ordering from conditional expressions (loosest) down to atoms
/// (tightest).
fn precedence(arena: &Arena, id: NodeId) -> u8 {
    match arena.get(id) {
        Node::IfExp(_) => 0,
        Node::BoolOp(b) if b.op == BoolOpKind::Or => 1,
        Node::BoolOp(_) => 2,
        Node::UnaryOp(u) if u.op == UnaryOpKind::Not => 3,
        Node::Compare(_) => 4,
        Node::BinOp(b) if matches!(b.op, BinOpKind::Add | BinOpKind::Sub) => 5,
        Node::BinOp(_) => 6,
        Node::UnaryOp(_) => 7,
        Node::Await(_) | Node::Starred(_) => 8,
        Node::Call(_) | Node::Attribute(_) | Node::Subscript(_) => 9,
        _ => 10,
    }
}

/// Renders the full Python source text for the module rooted at `module`
/// (expected to be a [`Node::Module`]).
pub fn serialize(arena: &Arena, module: NodeId) -> String {
    let Node::Module(body) = arena.get(module) else {
        unreachable!("serialize is only ever called with a Node::Module root");
    };
    let mut enc = Encoder { arena, out: String::new() };
    enc.write_block(body, 0);
    enc.out
}

struct Encoder<'a> {
    arena: &'a Arena,
    out: String,
}

impl<'a> Encoder<'a> {
    fn indent(&mut self, level: usize) {
        for _ in 0..(level * INDENT_WIDTH) {
            self.out.push(' ');
        }
    }

    /// Writes a statement list, one statement per line, each at `level`.
    /// An empty body renders as `pass` — every Python suite needs at least
    /// one statement.
    fn write_block(&mut self, body: &[NodeId], level: usize) {
        if body.is_empty() {
            self.indent(level);
            self.out.push_str("pass\n");
            return;
        }
        for &stmt in body {
            self.write_stmt(&stmt, level);
        }
    }

    fn write_stmt(&mut self, id: &NodeId, level: usize) {
        let id = *id;
        match self.arena.get(id) {
            Node::Assign(a) => {
                self.indent(level);
                for (i, &t) in a.targets.iter().enumerate() {
                    if i > 0 {
                        self.out.push_str(" = ");
                    }
                    self.write_expr(t, 0);
                }
                self.out.push_str(" = ");
                self.write_expr(a.value, 0);
                self.out.push('\n');
            }
            Node::ExprStmt(e) => {
                self.indent(level);
                self.write_expr(*e, 0);
                self.out.push('\n');
            }
            Node::If(stmt) => {
                self.indent(level);
                self.out.push_str("if ");
                self.write_expr(stmt.test, 0);
                self.out.push_str(":\n");
                self.write_block(&stmt.body, level + 1);
                self.write_orelse(&stmt.orelse, level);
            }
            Node::While(stmt) => {
                self.indent(level);
                self.out.push_str("while ");
                self.write_expr(stmt.test, 0);
                self.out.push_str(":\n");
                self.write_block(&stmt.body, level + 1);
            }
            Node::For(stmt) => {
                self.indent(level);
                self.out.push_str("for ");
                self.write_expr(stmt.target, 0);
                self.out.push_str(" in ");
                self.write_expr(stmt.iter, 0);
                self.out.push_str(":\n");
                self.write_block(&stmt.body, level + 1);
            }
            Node::FunctionDef(def) => self.write_function_def(def, level, "def"),
            Node::AsyncFunctionDef(def) => self.write_function_def(def, level, "async def"),
            Node::ClassDef(c) => {
                self.indent(level);
                write!(self.out, "class {}", c.name).unwrap();
                if !c.bases.is_empty() {
                    self.out.push('(');
                    for (i, &b) in c.bases.iter().enumerate() {
                        if i > 0 {
                            self.out.push_str(", ");
                        }
                        self.write_expr(b, 0);
                    }
                    self.out.push(')');
                }
                self.out.push_str(":\n");
                self.write_block(&c.body, level + 1);
            }
            Node::Return(value) => {
                self.indent(level);
                self.out.push_str("return");
                if let Some(v) = value {
                    self.out.push(' ');
                    self.write_expr(*v, 0);
                }
                self.out.push('\n');
            }
            Node::Raise(value) => {
                self.indent(level);
                self.out.push_str("raise");
                if let Some(v) = value {
                    self.out.push(' ');
                    self.write_expr(*v, 0);
                }
                self.out.push('\n');
            }
            Node::Try(t) => {
                self.indent(level);
                self.out.push_str("try:\n");
                self.write_block(&t.body, level + 1);
                for &h in &t.handlers {
                    self.write_except_handler(h, level);
                }
                if !t.finalbody.is_empty() {
                    self.indent(level);
                    self.out.push_str("finally:\n");
                    self.write_block(&t.finalbody, level + 1);
                }
            }
            Node::ExceptHandler(_) => self.write_except_handler(id, level),
            Node::Import(imp) => {
                self.indent(level);
                self.out.push_str("import ");
                self.write_aliases(&imp.names);
                self.out.push('\n');
            }
            Node::ImportFrom(imp) => {
                self.indent(level);
                write!(self.out, "from {} import ", imp.module).unwrap();
                self.write_aliases(&imp.names);
                self.out.push('\n');
            }
            Node::Delete(targets) => {
                self.indent(level);
                self.out.push_str("del ");
                for (i, &t) in targets.iter().enumerate() {
                    if i > 0 {
                        self.out.push_str(", ");
                    }
                    self.write_expr(t, 0);
                }
                self.out.push('\n');
            }
            Node::Break => {
                self.indent(level);
                self.out.push_str("break\n");
            }
            Node::Continue => {
                self.indent(level);
                self.out.push_str("continue\n");
            }
            Node::Match(m) => {
                self.indent(level);
                self.out.push_str("match ");
                self.write_expr(m.subject, 0);
                self.out.push_str(":\n");
                for case in &m.cases {
                    self.indent(level + 1);
                    self.out.push_str("case ");
                    self.write_expr(case.pattern, 0);
                    self.out.push_str(":\n");
                    self.write_block(&case.body, level + 2);
                }
            }
            // Anything else reached in statement position is an expression
            // used as a bare statement (shouldn't normally happen, but
            // renders sensibly rather than panicking).
            _ => {
                self.indent(level);
                self.write_expr(id, 0);
                self.out.push('\n');
            }
        }
    }

    fn write_orelse(&mut self, orelse: &[NodeId], level: usize) {
        if orelse.is_empty() {
            return;
        }
        // A single nested `If` in the else slot is an `elif` chain link
        // (spec.md §4.5's right-associative elif folding); anything else
        // is a plain `else:`.
        if orelse.len() == 1 {
            if let Node::If(inner) = self.arena.get(orelse[0]) {
                self.indent(level);
                self.out.push_str("elif ");
                self.write_expr(inner.test, 0);
                self.out.push_str(":\n");
                self.write_block(&inner.body, level + 1);
                self.write_orelse(&inner.orelse, level);
                return;
            }
        }
        self.indent(level);
        self.out.push_str("else:\n");
        self.write_block(orelse, level + 1);
    }

    fn write_except_handler(&mut self, id: NodeId, level: usize) {
        let Node::ExceptHandler(h) = self.arena.get(id) else { return };
        self.indent(level);
        self.out.push_str("except Exception");
        if let Some(name) = &h.name {
            write!(self.out, " as {name}").unwrap();
        }
        self.out.push_str(":\n");
        self.write_block(&h.body, level + 1);
    }

    fn write_function_def(&mut self, def: &tython_pyast::FunctionDef, level: usize, keyword: &str) {
        self.indent(level);
        for &d in &def.decorators {
            self.out.push('@');
            self.write_expr(d, 0);
            self.out.push('\n');
            self.indent(level);
        }
        write!(self.out, "{keyword} {}(", def.name).unwrap();
        let positional_count = def.args.positional.len();
        let default_start = positional_count - def.args.defaults.len();
        for (i, arg) in def.args.positional.iter().enumerate() {
            if i > 0 {
                self.out.push_str(", ");
            }
            self.out.push_str(&arg.name);
            if i >= default_start {
                self.out.push('=');
                self.write_expr(def.args.defaults[i - default_start], 0);
            }
        }
        if let Some(vararg) = &def.args.vararg {
            if positional_count > 0 {
                self.out.push_str(", ");
            }
            write!(self.out, "*{}", vararg.name).unwrap();
        }
        self.out.push_str("):\n");
        self.write_block(&def.body, level + 1);
    }

    fn write_aliases(&mut self, names: &[tython_pyast::Alias]) {
        for (i, alias) in names.iter().enumerate() {
            if i > 0 {
                self.out.push_str(", ");
            }
            self.out.push_str(&alias.name);
            if let Some(as_name) = &alias.as_name {
                write!(self.out, " as {as_name}").unwrap();
            }
        }
    }

    /// Renders an expression, parenthesizing `id` when its precedence is
    /// lower than `parent_prec` (e.g. `(a + b) * c`).
    fn write_expr(&mut self, id: NodeId, parent_prec: u8) {
        let prec = precedence(self.arena, id);
        let needs_parens = prec < parent_prec;
        if needs_parens {
            self.out.push('(');
        }
        self.write_expr_inner(id, prec);
        if needs_parens {
            self.out.push(')');
        }
    }

    fn write_expr_inner(&mut self, id: NodeId, own_prec: u8) {
        match self.arena.get(id) {
            Node::Name(n) => self.out.push_str(&n.id),
            Node::Constant(c) => self.write_constant(c),
            Node::BinOp(b) => {
                self.write_expr(b.left, own_prec);
                self.out.push_str(bin_op_symbol(b.op));
                self.write_expr(b.right, own_prec + 1);
            }
            Node::UnaryOp(u) => {
                self.out.push_str(unary_op_symbol(u.op));
                self.write_expr(u.operand, own_prec);
            }
            Node::Compare(c) => {
                self.write_expr(c.left, own_prec + 1);
                self.out.push_str(cmp_op_symbol(c.op));
                self.write_expr(c.right, own_prec + 1);
            }
            Node::BoolOp(b) => {
                let sym = match b.op {
                    BoolOpKind::And => " and ",
                    BoolOpKind::Or => " or ",
                };
                for (i, &v) in b.values.iter().enumerate() {
                    if i > 0 {
                        self.out.push_str(sym);
                    }
                    self.write_expr(v, own_prec + 1);
                }
            }
            Node::Call(c) => {
                self.write_expr(c.func, own_prec);
                self.out.push('(');
                for (i, &a) in c.args.iter().enumerate() {
                    if i > 0 {
                        self.out.push_str(", ");
                    }
                    self.write_expr(a, 0);
                }
                self.out.push(')');
            }
            Node::Attribute(a) => {
                self.write_expr(a.value, own_prec);
                self.out.push('.');
                self.out.push_str(&a.attr);
            }
            Node::Subscript(s) => {
                self.write_expr(s.value, own_prec);
                self.out.push('[');
                self.write_expr(s.index, 0);
                self.out.push(']');
            }
            Node::List(l) => {
                self.out.push('[');
                for (i, &e) in l.elts.iter().enumerate() {
                    if i > 0 {
                        self.out.push_str(", ");
                    }
                    self.write_expr(e, 0);
                }
                self.out.push(']');
            }
            Node::Dict(d) => {
                self.out.push('{');
                for (i, (k, v)) in d.keys.iter().zip(d.values.iter()).enumerate() {
                    if i > 0 {
                        self.out.push_str(", ");
                    }
                    match k {
                        Some(key) => {
                            self.write_expr(*key, 0);
                            self.out.push_str(": ");
                            self.write_expr(*v, 0);
                        }
                        None => {
                            self.out.push_str("**");
                            self.write_expr(*v, 9);
                        }
                    }
                }
                self.out.push('}');
            }
            Node::Starred(v) => {
                self.out.push('*');
                self.write_expr(*v, own_prec);
            }
            Node::IfExp(e) => {
                self.write_expr(e.body, own_prec + 1);
                self.out.push_str(" if ");
                self.write_expr(e.test, own_prec + 1);
                self.out.push_str(" else ");
                self.write_expr(e.orelse, own_prec);
            }
            Node::Await(v) => {
                self.out.push_str("await ");
                self.write_expr(*v, own_prec);
            }
            Node::FString(fs) => {
                self.out.push('f');
                self.out.push_str(&render_str_literal(&fs.body));
            }
            other => unreachable!("{other:?} is a statement shape, not an expression"),
        }
    }

    fn write_constant(&mut self, c: &Constant) {
        match c {
            Constant::Int(i) => write!(self.out, "{i}").unwrap(),
            Constant::Float(f) => write!(self.out, "{f}").unwrap(),
            Constant::Str(s) => self.out.push_str(&render_str_literal(s)),
            Constant::Bool(true) => self.out.push_str("True"),
            Constant::Bool(false) => self.out.push_str("False"),
            Constant::None => self.out.push_str("None"),
        }
    }
}

/// Single-quoted unless the value contains a single quote, in which case
/// double-quoted (spec.md §4.8); escape sequences already present in the
/// source text are carried through unchanged, the delimiter character
/// itself is escaped if it would otherwise appear unescaped inside it.
fn render_str_literal(value: &str) -> String {
    let quote = if value.contains('\'') { '"' } else { '\'' };
    let mut out = String::with_capacity(value.len() + 2);
    out.push(quote);
    for ch in value.chars() {
        if ch == quote {
            out.push('\\');
        }
        out.push(ch);
    }
    out.push(quote);
    out
}

fn bin_op_symbol(op: BinOpKind) -> &'static str {
    match op {
        BinOpKind::Add => " + ",
        BinOpKind::Sub => " - ",
        BinOpKind::Mult => " * ",
        BinOpKind::Div => " / ",
        BinOpKind::Mod => " % ",
    }
}

fn unary_op_symbol(op: UnaryOpKind) -> &'static str {
    match op {
        UnaryOpKind::Not => "not ",
        UnaryOpKind::USub => "-",
    }
}

fn cmp_op_symbol(op: CmpOp) -> &'static str {
    match op {
        CmpOp::Eq => " == ",
        CmpOp::NotEq => " != ",
        CmpOp::Gt => " > ",
        CmpOp::Lt => " < ",
        CmpOp::GtE => " >= ",
        CmpOp::LtE => " <= ",
        CmpOp::In => " in ",
        CmpOp::Is => " is ",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tython_pyast::*;

    fn push_module(arena: &mut Arena, body: Vec<NodeId>) -> NodeId {
        arena.push(Node::Module(body))
    }

    #[test]
    fn s1_assignment_with_precedence() {
        let mut arena = Arena::new();
        let x = arena.push(Node::Name(Name { id: "x".into() }));
        let one = arena.push(Node::Constant(Constant::Int(1)));
        let two = arena.push(Node::Constant(Constant::Int(2)));
        let add = arena.push(Node::BinOp(BinOp { left: one, op: BinOpKind::Add, right: two }));
        let assign = arena.push(Node::Assign(Assign { targets: vec![x], value: add }));
        let module = push_module(&mut arena, vec![assign]);
        assert_eq!(serialize(&arena, module), "x = 1 + 2\n");
    }

    #[test]
    fn s3_while_loop_body_indented() {
        let mut arena = Arena::new();
        let sum = arena.push(Node::Name(Name { id: "sum".into() }));
        let i = arena.push(Node::Name(Name { id: "i".into() }));
        let body_expr = arena.push(Node::BinOp(BinOp { left: sum, op: BinOpKind::Add, right: i }));
        let assign = arena.push(Node::Assign(Assign { targets: vec![sum], value: body_expr }));
        let i2 = arena.push(Node::Name(Name { id: "i".into() }));
        let three = arena.push(Node::Constant(Constant::Int(3)));
        let test = arena.push(Node::Compare(Compare { left: i2, op: CmpOp::Lt, right: three }));
        let while_id = arena.push(Node::While(While { test, body: vec![assign] }));
        let module = push_module(&mut arena, vec![while_id]);
        assert_eq!(serialize(&arena, module), "while i < 3:\n    sum = sum + i\n");
    }

    #[test]
    fn parenthesizes_lower_precedence_child() {
        let mut arena = Arena::new();
        let a = arena.push(Node::Name(Name { id: "a".into() }));
        let b = arena.push(Node::Name(Name { id: "b".into() }));
        let c = arena.push(Node::Name(Name { id: "c".into() }));
        let add = arena.push(Node::BinOp(BinOp { left: a, op: BinOpKind::Add, right: b }));
        let mult = arena.push(Node::BinOp(BinOp { left: add, op: BinOpKind::Mult, right: c }));
        let module = push_module(&mut arena, vec![arena.push(Node::ExprStmt(mult))]);
        assert_eq!(serialize(&arena, module), "(a + b) * c\n");
    }

    #[test]
    fn string_literal_quote_choice() {
        let mut arena = Arena::new();
        let plain = arena.push(Node::Constant(Constant::Str("hello".into())));
        let with_single = arena.push(Node::Constant(Constant::Str("it's".into())));
        let plain_stmt = arena.push(Node::ExprStmt(plain));
        let single_stmt = arena.push(Node::ExprStmt(with_single));
        let module = push_module(&mut arena, vec![plain_stmt, single_stmt]);
        assert_eq!(serialize(&arena, module), "'hello'\n\"it's\"\n");
    }

    #[test]
    fn function_def_with_default_and_vararg() {
        let mut arena = Arena::new();
        let one = arena.push(Node::Constant(Constant::Int(1)));
        let ret_name = arena.push(Node::Name(Name { id: "x".into() }));
        let ret = arena.push(Node::Return(Some(ret_name)));
        let def = FunctionDef {
            name: "f".into(),
            args: Arguments {
                positional: vec![Arg { name: "x".into() }, Arg { name: "y".into() }],
                defaults: vec![one],
                vararg: Some(Arg { name: "rest".into() }),
            },
            body: vec![ret],
            decorators: vec![],
        };
        let def_id = arena.push(Node::FunctionDef(def));
        let module = push_module(&mut arena, vec![def_id]);
        assert_eq!(serialize(&arena, module), "def f(x, y=1, *rest):\n    return x\n");
    }

    #[test]
    fn if_elif_else_chain() {
        let mut arena = Arena::new();
        let x = arena.push(Node::Name(Name { id: "x".into() }));
        let one = arena.push(Node::Constant(Constant::Int(1)));
        let two = arena.push(Node::Constant(Constant::Int(2)));
        let test1 = arena.push(Node::Compare(Compare { left: x, op: CmpOp::Eq, right: one }));
        let a_call_name = arena.push(Node::Name(Name { id: "a".into() }));
        let a_call = arena.push(Node::Call(Call { func: a_call_name, args: vec![] }));
        let a_stmt = arena.push(Node::ExprStmt(a_call));

        let x2 = arena.push(Node::Name(Name { id: "x".into() }));
        let test2 = arena.push(Node::Compare(Compare { left: x2, op: CmpOp::Eq, right: two }));
        let b_call_name = arena.push(Node::Name(Name { id: "b".into() }));
        let b_call = arena.push(Node::Call(Call { func: b_call_name, args: vec![] }));
        let b_stmt = arena.push(Node::ExprStmt(b_call));

        let c_call_name = arena.push(Node::Name(Name { id: "c".into() }));
        let c_call = arena.push(Node::Call(Call { func: c_call_name, args: vec![] }));
        let c_stmt = arena.push(Node::ExprStmt(c_call));

        let inner_if = arena.push(Node::If(If { test: test2, body: vec![b_stmt], orelse: vec![c_stmt] }));
        let outer_if = arena.push(Node::If(If { test: test1, body: vec![a_stmt], orelse: vec![inner_if] }));
        let module = push_module(&mut arena, vec![outer_if]);
        assert_eq!(
            serialize(&arena, module),
            "if x == 1:\n    a()\nelif x == 2:\n    b()\nelse:\n    c()\n"
        );
    }
}
