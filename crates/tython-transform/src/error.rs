//! `TransformError`: raised when a CST rule's handler cannot produce a
//! Python AST fragment. Handlers never swallow these; `tython-cli` surfaces
//! them per-file and skips the offending file rather than aborting the
//! whole run.

use tython_parser::SyntaxKind;

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum TransformError {
    #[error("{rule:?} at {line}:{col}: more than one rest parameter in a single parameter list")]
    MultipleRestParams { rule: SyntaxKind, line: u32, col: u32 },

    #[error("{line}:{col}: object literal member has an unrecognized shape")]
    UnknownDictItem { line: u32, col: u32 },

    #[error("{line}:{col}: switch statement has no case or default clauses")]
    EmptySwitch { line: u32, col: u32 },

    #[error("{line}:{col}: tagged template literals are not supported")]
    TaggedTemplateUnsupported { line: u32, col: u32 },

    #[error("{line}:{col}: unrecognized CST shape for rule {rule:?}")]
    UnrecognizedShape { rule: SyntaxKind, line: u32, col: u32 },
}
