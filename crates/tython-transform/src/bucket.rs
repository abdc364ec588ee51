//! The dispatch-bucket classification, as an explicit table rather than a
//! reflection-based dispatch over handler method names. Every grammar rule
//! name from `grammar/js.ungram`/`grammar/ts.ungram` is classified here;
//! `xtask check-grammar` verifies the table doesn't drift from the grammar
//! files.
//!
//! `RuleBucket` is consulted by [`crate::context::Transformer`] to decide
//! whether a node's children are adapted (hoisted defs rewritten to their
//! synthetic name) before a custom handler runs: `ContainsBody` rules must
//! NOT have their children pre-adapted, since the handler's own body walk
//! absorbs hoisted definitions itself.

use tython_parser::SyntaxKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleBucket {
    /// Discard; yields nothing.
    Skip,
    /// Return the first non-absent child unchanged.
    First,
    /// Return all children as an ordered list.
    All,
    /// A dedicated handler produces a specific AST fragment; children are
    /// adapted before the handler runs.
    Custom,
    /// Custom, but the handler's own body absorbs hoisted definitions;
    /// children are NOT pre-adapted.
    ContainsBody,
}

/// Rule-name lists for each bucket, grouped by what a generic handler can
/// do with the rule's children without any rule-specific knowledge.
const SKIP: &[SyntaxKind] = &[
    SyntaxKind::EXPORT_KW,
    SyntaxKind::DECLARE_KW,
    SyntaxKind::SEMI,
    SyntaxKind::INTERFACE_DECL,
    SyntaxKind::TYPE_ALIAS_DECL,
    SyntaxKind::TYPE_ANNOTATION,
];

const FIRST: &[SyntaxKind] = &[
    SyntaxKind::PAREN_EXPR,
    SyntaxKind::AS_EXPR,
    SyntaxKind::EXPORT_DECL,
    SyntaxKind::EXPORT_DEFAULT_DECL,
];

const ALL: &[SyntaxKind] = &[SyntaxKind::PROGRAM, SyntaxKind::ARGUMENTS, SyntaxKind::PARAM_LIST];

const CONTAINS_BODY: &[SyntaxKind] = &[
    SyntaxKind::BLOCK_STMT,
    SyntaxKind::FUNCTION_DECL,
    SyntaxKind::ARROW_FUNCTION,
    SyntaxKind::CLASS_BODY,
];

/// Classifies a CST rule into its dispatch bucket. Rules absent from every
/// list above fall through to `Custom`, the default for rules with a
/// dedicated handler (the overwhelming majority: every expression and
/// statement shape).
pub fn rule_bucket(kind: SyntaxKind) -> RuleBucket {
    if SKIP.contains(&kind) {
        RuleBucket::Skip
    } else if FIRST.contains(&kind) {
        RuleBucket::First
    } else if ALL.contains(&kind) {
        RuleBucket::All
    } else if CONTAINS_BODY.contains(&kind) {
        RuleBucket::ContainsBody
    } else {
        RuleBucket::Custom
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_stmt_absorbs_hoists() {
        assert_eq!(rule_bucket(SyntaxKind::BLOCK_STMT), RuleBucket::ContainsBody);
    }

    #[test]
    fn export_kw_is_discarded() {
        assert_eq!(rule_bucket(SyntaxKind::EXPORT_KW), RuleBucket::Skip);
    }

    #[test]
    fn unclassified_rules_default_to_custom() {
        assert_eq!(rule_bucket(SyntaxKind::IF_STMT), RuleBucket::Custom);
        assert_eq!(rule_bucket(SyntaxKind::BINARY_EXPR), RuleBucket::Custom);
    }
}
