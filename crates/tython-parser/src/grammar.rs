//! Loads the declarative `.ungram` grammar description for a dialect from
//! disk at parser-construction time and exposes the set of rule names it
//! declares legal. The hand-written recursive-descent parser in
//! [`crate::parser`] dispatches on the active [`Dialect`] directly for most
//! TS-only constructs, and consults `is_known_rule` for the one case where
//! the legality check is itself rule-shaped (`Type` annotations) — it does
//! not generate parsing code from the grammar the way the teacher's `xtask`
//! does.

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use ungrammar::Grammar;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Js,
    Ts,
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dialect::Js => write!(f, "js"),
            Dialect::Ts => write!(f, "ts"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GrammarLoadError {
    #[error("failed to read grammar file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed grammar in {path}: {message}")]
    Parse { path: String, message: String },
}

/// The set of rule names a dialect's grammar file declares, plus the
/// underlying parsed [`ungrammar::Grammar`] for deeper inspection (used by
/// `xtask check-grammar`).
pub struct GrammarDef {
    dialect: Dialect,
    grammar: Grammar,
    rule_names: HashSet<String>,
}

impl GrammarDef {
    /// Loads `grammar/js.ungram` or `grammar/ts.ungram` relative to
    /// `grammar_dir`. A missing file or one `ungrammar` cannot parse is a
    /// [`GrammarLoadError`], which callers surface as a fatal
    /// `ConfigError` — never as a silent parse success.
    pub fn load(dialect: Dialect, grammar_dir: &Path) -> Result<Self, GrammarLoadError> {
        let file_name = match dialect {
            Dialect::Js => "js.ungram",
            Dialect::Ts => "ts.ungram",
        };
        let path = grammar_dir.join(file_name);
        let source = std::fs::read_to_string(&path).map_err(|source| GrammarLoadError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(dialect, &path.display().to_string(), &source)
    }

    fn parse(dialect: Dialect, path: &str, source: &str) -> Result<Self, GrammarLoadError> {
        let grammar: Grammar = source.parse().map_err(|err| GrammarLoadError::Parse {
            path: path.to_string(),
            message: err.to_string(),
        })?;
        let rule_names = grammar
            .iter()
            .map(|node| grammar[node].name.clone())
            .collect();
        Ok(Self {
            dialect,
            grammar,
            rule_names,
        })
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn is_known_rule(&self, rule_name: &str) -> bool {
        self.rule_names.contains(rule_name)
    }

    pub fn rule_names(&self) -> impl Iterator<Item = &str> {
        self.rule_names.iter().map(String::as_str)
    }

    pub fn underlying(&self) -> &Grammar {
        &self.grammar
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const JS_SRC: &str = "Program = stmt*\nStmt = ExprStmt\nExprStmt = 'x'";
    const TS_SRC: &str = "Program = stmt*\nStmt = ExprStmt\nExprStmt = 'x'\nInterfaceDecl = 'interface'";

    #[test]
    fn parses_minimal_grammar() {
        let def = GrammarDef::parse(Dialect::Js, "js.ungram", JS_SRC).unwrap();
        assert!(def.is_known_rule("Program"));
        assert!(!def.is_known_rule("InterfaceDecl"));
    }

    #[test]
    fn ts_grammar_declares_js_only_rule_names_too() {
        let ts = GrammarDef::parse(Dialect::Ts, "ts.ungram", TS_SRC).unwrap();
        assert!(ts.is_known_rule("InterfaceDecl"));
        assert!(ts.is_known_rule("Program"));
    }
}
