//! The closed Python AST node set the transformer produces, the arena it
//! lives in, and the two pieces of per-file state that exist solely to
//! support translation: the name manager (fresh identifiers) and the hoist
//! registry (anonymous-function hoisting).

mod arena;
mod hoist;
mod name_manager;
mod node;

pub use arena::{Arena, NodeId};
pub use hoist::HoistRegistry;
pub use name_manager::{to_snake_case, NameManager};
pub use node::{
    Alias, Arg, Arguments, Assign, Attribute, BinOp, BinOpKind, BoolOp, BoolOpKind, Call,
    ClassDef, CmpOp, Compare, Constant, Dict, ExceptHandler, For, FString, FunctionDef, If, IfExp,
    Import, ImportFrom, List, Match, MatchCase, Name, Node, Subscript, Try, UnaryOp, UnaryOpKind,
    While,
};
