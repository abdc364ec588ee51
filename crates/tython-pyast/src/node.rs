//! The closed set of Python AST node shapes the transformer is allowed to
//! produce. Anything not listed here cannot be emitted; the encoder is
//! written as an exhaustive match over this enum so adding a shape here is
//! the only way to make the serializer aware of it.

use crate::arena::NodeId;

/// A literal value embedded in a `Constant` expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Constant {
    Int(i64),
    Float(f64),
    Str(String),
    Bool(bool),
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOpKind {
    Add,
    Sub,
    Mult,
    Div,
    /// `%`. Not in spec.md's closed operator-token list, but the source
    /// grammar's `BinaryExpr` accepts it and Python's `%` is the direct
    /// equivalent, so it is carried the same way `+=`/`-=` were (see
    /// SPEC_FULL.md's supplemented-operators note).
    Mod,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOpKind {
    Not,
    USub,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    NotEq,
    Gt,
    Lt,
    GtE,
    LtE,
    In,
    Is,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoolOpKind {
    And,
    Or,
}

/// One positional or rest parameter in a function signature.
#[derive(Debug, Clone, PartialEq)]
pub struct Arg {
    pub name: String,
}

/// `FunctionDef`/`AsyncFunctionDef`/lambda argument list: positional names,
/// the default values aligned to the tail of `positional`, and an optional
/// rest parameter (`...args`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments {
    pub positional: Vec<Arg>,
    pub defaults: Vec<NodeId>,
    pub vararg: Option<Arg>,
}

/// One `import ... as ...` binding.
#[derive(Debug, Clone, PartialEq)]
pub struct Alias {
    pub name: String,
    pub as_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Assign {
    pub targets: Vec<NodeId>,
    pub value: NodeId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct If {
    pub test: NodeId,
    pub body: Vec<NodeId>,
    pub orelse: Vec<NodeId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct While {
    pub test: NodeId,
    pub body: Vec<NodeId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct For {
    pub target: NodeId,
    pub iter: NodeId,
    pub body: Vec<NodeId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDef {
    pub name: String,
    pub args: Arguments,
    pub body: Vec<NodeId>,
    pub decorators: Vec<NodeId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassDef {
    pub name: String,
    pub bases: Vec<NodeId>,
    pub body: Vec<NodeId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Try {
    pub body: Vec<NodeId>,
    pub handlers: Vec<NodeId>,
    pub finalbody: Vec<NodeId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExceptHandler {
    pub name: Option<String>,
    pub body: Vec<NodeId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Import {
    pub names: Vec<Alias>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportFrom {
    pub module: String,
    pub names: Vec<Alias>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchCase {
    pub pattern: NodeId,
    pub body: Vec<NodeId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    pub subject: NodeId,
    pub cases: Vec<MatchCase>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Name {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinOp {
    pub left: NodeId,
    pub op: BinOpKind,
    pub right: NodeId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnaryOp {
    pub op: UnaryOpKind,
    pub operand: NodeId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Compare {
    pub left: NodeId,
    pub op: CmpOp,
    pub right: NodeId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoolOp {
    pub op: BoolOpKind,
    pub values: Vec<NodeId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub func: NodeId,
    pub args: Vec<NodeId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub value: NodeId,
    pub attr: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Subscript {
    pub value: NodeId,
    pub index: NodeId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct List {
    pub elts: Vec<NodeId>,
}

/// `None` at index `i` means `values[i]` is a spread (`{...o}`), rendered
/// as `**o` — Python dict-literal unpacking — matching "spread `{...o}` ->
/// key absent (None), value = o" in spec.md §4.4.
#[derive(Debug, Clone, PartialEq)]
pub struct Dict {
    pub keys: Vec<Option<NodeId>>,
    pub values: Vec<NodeId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfExp {
    pub test: NodeId,
    pub body: NodeId,
    pub orelse: NodeId,
}

/// A template literal, carried as an f-string rather than a plain
/// `Constant(str)`. `body` still holds the source's `${...}` interpolation
/// syntax verbatim; the post-processor's `${` → `{` substitution (§4.9)
/// turns it into Python's `{...}` as a textual safety net, same as every
/// other entry in that table.
#[derive(Debug, Clone, PartialEq)]
pub struct FString {
    pub body: String,
}

/// One node in the closed Python AST. Every arena slot holds exactly one of
/// these. Statement lists (`Module.body`, `FunctionDef.body`, ...) are
/// `Vec<NodeId>` rather than a further wrapper node, matching the data
/// model's "ordered children: CST nodes, tokens, or absent" shape carried
/// over to the Python side.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Module(Vec<NodeId>),

    // statements
    Assign(Assign),
    ExprStmt(NodeId),
    If(If),
    While(While),
    For(For),
    FunctionDef(FunctionDef),
    AsyncFunctionDef(FunctionDef),
    ClassDef(ClassDef),
    Return(Option<NodeId>),
    Raise(Option<NodeId>),
    Try(Try),
    ExceptHandler(ExceptHandler),
    Import(Import),
    ImportFrom(ImportFrom),
    Delete(Vec<NodeId>),
    Break,
    Continue,
    Match(Match),

    // expressions
    Name(Name),
    Constant(Constant),
    BinOp(BinOp),
    UnaryOp(UnaryOp),
    Compare(Compare),
    BoolOp(BoolOp),
    Call(Call),
    Attribute(Attribute),
    Subscript(Subscript),
    List(List),
    Dict(Dict),
    Starred(NodeId),
    IfExp(IfExp),
    Await(NodeId),
    FString(FString),
}

impl Node {
    /// Whether this node shape is a statement, i.e. legal directly inside a
    /// `Vec<NodeId>` body rather than only as an expression operand.
    pub fn is_statement(&self) -> bool {
        matches!(
            self,
            Node::Assign(_)
                | Node::ExprStmt(_)
                | Node::If(_)
                | Node::While(_)
                | Node::For(_)
                | Node::FunctionDef(_)
                | Node::AsyncFunctionDef(_)
                | Node::ClassDef(_)
                | Node::Return(_)
                | Node::Raise(_)
                | Node::Try(_)
                | Node::ExceptHandler(_)
                | Node::Import(_)
                | Node::ImportFrom(_)
                | Node::Delete(_)
                | Node::Break
                | Node::Continue
                | Node::Match(_)
        )
    }
}
