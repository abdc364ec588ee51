//! Small accessor helpers for walking a [`SyntaxNode`] by
//! [`SyntaxKind`]. There is no generated typed-wrapper layer on top of
//! these — the transformer dispatches on `SyntaxKind` directly (see
//! `tython-transform`), so these three functions are the entire CST access
//! surface.

use crate::syntax_kind::{SyntaxKind, SyntaxNode, SyntaxToken};

/// The first direct child node of `kind`, if any.
pub fn child(parent: &SyntaxNode, kind: SyntaxKind) -> Option<SyntaxNode> {
    parent.children().find(|n| n.kind() == kind)
}

/// Every direct child node of `kind`, in document order.
pub fn children(parent: &SyntaxNode, kind: SyntaxKind) -> impl Iterator<Item = SyntaxNode> {
    parent.children().filter(move |n| n.kind() == kind)
}

/// The first direct child token of `kind`, if any.
pub fn token(parent: &SyntaxNode, kind: SyntaxKind) -> Option<SyntaxToken> {
    parent
        .children_with_tokens()
        .filter_map(|it| it.into_token())
        .find(|t| t.kind() == kind)
}

/// Direct child nodes in document order regardless of kind, skipping
/// tokens — used where a rule's children are a closed alternation (e.g.
/// `Stmt`) rather than a single fixed kind.
pub fn child_nodes(parent: &SyntaxNode) -> impl Iterator<Item = SyntaxNode> {
    parent.children()
}
