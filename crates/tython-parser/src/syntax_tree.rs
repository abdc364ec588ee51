//! Wraps a `rowan::GreenNodeBuilder` with checkpoint/retroactive-wrap
//! support, and bundles the finished tree with the parse errors collected
//! along the way.

use rowan::GreenNodeBuilder;

use crate::error::ParseError;
use crate::syntax_kind::{SyntaxKind, SyntaxNode, TythonLanguage};

pub(crate) struct SyntaxTreeBuilder {
    builder: GreenNodeBuilder<'static>,
}

impl SyntaxTreeBuilder {
    pub(crate) fn new() -> Self {
        Self {
            builder: GreenNodeBuilder::new(),
        }
    }

    pub(crate) fn start_node(&mut self, kind: SyntaxKind) {
        self.builder
            .start_node(rowan::SyntaxKind(kind as u16));
    }

    pub(crate) fn token(&mut self, kind: SyntaxKind, text: &str) {
        self.builder.token(rowan::SyntaxKind(kind as u16), text);
    }

    pub(crate) fn finish_node(&mut self) {
        self.builder.finish_node();
    }

    /// Marks the current builder position so a node can be opened
    /// retroactively around everything emitted since, the way rowan's
    /// checkpoint API supports building left-associative binary
    /// expressions without knowing the wrapping node's kind until the
    /// operator token is seen.
    pub(crate) fn checkpoint(&self) -> rowan::Checkpoint {
        self.builder.checkpoint()
    }

    pub(crate) fn start_node_at(&mut self, checkpoint: rowan::Checkpoint, kind: SyntaxKind) {
        self.builder
            .start_node_at(checkpoint, rowan::SyntaxKind(kind as u16));
    }

    pub(crate) fn finish(self, errors: Vec<ParseError>) -> SyntaxTree {
        let green = self.builder.finish();
        SyntaxTree {
            node: SyntaxNode::new_root(green),
            errors,
        }
    }
}

/// A fully parsed file: the CST root plus every error recovered from
/// during the parse. `errors` is empty for a clean parse; a non-empty list
/// does not necessarily mean the caller should discard `node` — the parser
/// recovers and keeps building where it can, matching "graceful recovery
/// is out of scope; fail fast with a precise location" from the error
/// design only for the *first* error, while still returning a best-effort
/// tree for tooling that wants it.
#[derive(Debug, Clone)]
pub struct SyntaxTree {
    node: SyntaxNode,
    errors: Vec<ParseError>,
}

impl SyntaxTree {
    pub fn root(&self) -> &SyntaxNode {
        &self.node
    }

    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    pub fn ok(self) -> Result<SyntaxNode, ParseError> {
        match self.errors.into_iter().next() {
            Some(first) => Err(first),
            None => Ok(self.node),
        }
    }
}

#[allow(dead_code)]
fn _assert_language_kind_roundtrips(kind: SyntaxKind) -> SyntaxKind {
    <TythonLanguage as rowan::Language>::kind_from_raw(<TythonLanguage as rowan::Language>::kind_to_raw(kind))
}
