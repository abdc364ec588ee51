//! Grammar loader, lexer and hand-written recursive-descent parser that
//! produces the lossless CST the rest of tython transforms.
//!
//! Split into a `syntax_kind` module, a `lexer`, and a `parser` that builds
//! a `rowan` tree, with no generated typed AST layer on top:
//! `tython-transform` walks `SyntaxNode`s directly via [`support`].

mod error;
mod grammar;
mod lexer;
mod parser;
mod support;
mod syntax_kind;
mod syntax_tree;

pub use error::{LineIndex, ParseError};
pub use grammar::{Dialect, GrammarDef, GrammarLoadError};
pub use parser::{parse, ConfigError};
pub use support::{child, child_nodes, children, token};
pub use strum::IntoEnumIterator;
pub use syntax_kind::{SyntaxElement, SyntaxKind, SyntaxNode, SyntaxNodeChildren, SyntaxToken, TythonLanguage};
pub use syntax_tree::SyntaxTree;
