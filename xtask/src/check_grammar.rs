//! `xtask check-grammar`: loads `grammar/js.ungram` and `grammar/ts.ungram`
//! the same way `tython-parser`'s `GrammarDef` does, and checks that every
//! concrete rule they declare — the ones that actually produce a CST node,
//! as opposed to a pure alternation like `Stmt = VarDecl | FunctionDecl |
//! ...` — has a matching `SyntaxKind` variant with a dispatch-bucket
//! classification in `tython-transform`. This is the drift check spec.md
//! §4.2/§9's "explicit dispatch table" design note calls for: a grammar
//! rule renamed or added without a corresponding `SyntaxKind`/bucket entry
//! fails the build instead of silently falling through to `Custom`.

use anyhow::{bail, Result};
use clap::Args;
use std::collections::BTreeSet;
use ungrammar::Rule;

use tython_parser::{Dialect, GrammarDef, IntoEnumIterator, SyntaxKind};
use tython_transform::rule_bucket;

use crate::root_path;
use crate::utils::to_upper_snake_case;

#[derive(Debug, Args)]
pub struct CheckGrammar {}

impl CheckGrammar {
    pub(crate) fn run(&self, verbose: bool) -> Result<()> {
        let grammar_dir = root_path().join("grammar");
        let js = GrammarDef::load(Dialect::Js, &grammar_dir)?;
        let ts = GrammarDef::load(Dialect::Ts, &grammar_dir)?;

        let known_kinds: BTreeSet<String> = SyntaxKind::iter().map(|kind| kind.to_string()).collect();

        // Rules whose CST node is deliberately built under a different kind
        // than their grammar name would suggest. `Name` is the only one: the
        // parser wraps identifier references as `SyntaxKind::IDENT` itself
        // rather than introducing a second, always-single-token `NAME` node
        // kind, so a name reference and a bare identifier token share a kind.
        let renamed: &[(&str, &str)] = &[("Name", "IDENT")];

        let mut missing = Vec::new();
        let mut checked = 0usize;
        for (dialect_name, grammar) in [("js", &js), ("ts", &ts)] {
            for node in grammar.underlying().iter() {
                let data = &grammar.underlying()[node];
                if matches!(&data.rule, Rule::Alt(_)) {
                    // Pure alternation ("Stmt = VarDecl | FunctionDecl | ...")
                    // enumerates other rules' kinds; it has no CST node of
                    // its own.
                    continue;
                }
                checked += 1;
                let expected_kind = renamed
                    .iter()
                    .find(|(rule, _)| *rule == data.name)
                    .map(|(_, kind)| kind.to_string())
                    .unwrap_or_else(|| to_upper_snake_case(&data.name));
                if !known_kinds.contains(&expected_kind) {
                    missing.push(format!("{dialect_name}: {} (expected SyntaxKind::{expected_kind})", data.name));
                }
            }
        }

        if verbose {
            for kind in SyntaxKind::iter() {
                eprintln!("{kind} -> {:?}", rule_bucket(kind));
            }
        }

        if !missing.is_empty() {
            bail!(
                "{} grammar rule(s) have no matching SyntaxKind (the table in tython-transform::bucket has drifted from the grammar):\n{}",
                missing.len(),
                missing.join("\n")
            );
        }

        eprintln!("checked {checked} grammar rule(s) across js.ungram and ts.ungram: all classified");
        Ok(())
    }
}
