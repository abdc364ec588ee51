//! Hand-written recursive-descent parser producing a lossless `rowan` CST.
//!
//! Trivia (whitespace, comments) is attached to the tree as it is
//! encountered rather than filtered out, keeping the tree round-trippable
//! back to source text. The transformer never sees trivia —
//! `tython-transform` walks only non-trivia children.

use std::path::Path;

use crate::error::{LineIndex, ParseError};
use crate::grammar::{Dialect, GrammarDef, GrammarLoadError};
use crate::lexer::{self, Token};
use crate::syntax_kind::SyntaxKind;
use crate::syntax_tree::{SyntaxTree, SyntaxTreeBuilder};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error(transparent)]
    Grammar(#[from] GrammarLoadError),
}

/// Parses `source` as the given dialect, loading both grammar files from
/// `grammar_dir` (the JS grammar is always loaded too, since the parser
/// uses it to recognize and reject TS-only constructs appearing in a `.js`
/// file).
pub fn parse(source: &str, dialect: Dialect, grammar_dir: &Path) -> Result<SyntaxTree, ConfigError> {
    let js_grammar = GrammarDef::load(Dialect::Js, grammar_dir)?;
    let ts_grammar = GrammarDef::load(Dialect::Ts, grammar_dir)?;
    let active_grammar = match dialect {
        Dialect::Js => &js_grammar,
        Dialect::Ts => &ts_grammar,
    };
    let mut parser = Parser::new(source, dialect, active_grammar, &ts_grammar);
    Ok(parser.parse_program())
}

struct Parser<'a> {
    source: &'a str,
    tokens: Vec<Token>,
    offsets: Vec<u32>,
    cursor: usize,
    builder: SyntaxTreeBuilder,
    errors: Vec<ParseError>,
    line_index: LineIndex,
    dialect: Dialect,
    grammar: &'a GrammarDef,
    ts_grammar: &'a GrammarDef,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str, dialect: Dialect, grammar: &'a GrammarDef, ts_grammar: &'a GrammarDef) -> Self {
        let tokens = lexer::tokenize(source);
        let mut offsets = Vec::with_capacity(tokens.len() + 1);
        let mut offset = 0u32;
        for t in &tokens {
            offsets.push(offset);
            offset += t.len as u32;
        }
        offsets.push(offset);
        Self {
            source,
            tokens,
            offsets,
            cursor: 0,
            builder: SyntaxTreeBuilder::new(),
            errors: Vec::new(),
            line_index: LineIndex::new(source),
            dialect,
            grammar,
            ts_grammar,
        }
    }

    // -- low-level token handling --

    fn nth_raw(&self, n: usize) -> SyntaxKind {
        self.tokens
            .get(self.cursor + n)
            .map(|t| t.kind)
            .unwrap_or(SyntaxKind::EOF)
    }

    fn is_trivia_at(&self, idx: usize) -> bool {
        self.tokens
            .get(idx)
            .map(|t| t.kind.is_trivia())
            .unwrap_or(false)
    }

    /// Kind of the next non-trivia token, looking past any whitespace or
    /// comments.
    fn peek(&self) -> SyntaxKind {
        self.peek_nth(0)
    }

    fn peek_nth(&self, n: usize) -> SyntaxKind {
        let mut seen = 0;
        let mut idx = self.cursor;
        loop {
            if idx >= self.tokens.len() {
                return SyntaxKind::EOF;
            }
            if self.is_trivia_at(idx) {
                idx += 1;
                continue;
            }
            if seen == n {
                return self.tokens[idx].kind;
            }
            seen += 1;
            idx += 1;
        }
    }

    fn current_text(&self) -> &str {
        let idx = self.first_non_trivia_index();
        let start = self.offsets[idx] as usize;
        let end = self.offsets[idx + 1] as usize;
        &self.source[start..end]
    }

    fn first_non_trivia_index(&self) -> usize {
        let mut idx = self.cursor;
        while self.is_trivia_at(idx) {
            idx += 1;
        }
        idx
    }

    /// Emits every trivia token up to (not including) the next
    /// significant token into the tree, leaving `cursor` pointing at that
    /// significant token.
    fn eat_trivia(&mut self) {
        while self.is_trivia_at(self.cursor) {
            let token = self.tokens[self.cursor];
            let start = self.offsets[self.cursor] as usize;
            let end = self.offsets[self.cursor + 1] as usize;
            self.builder.token(token.kind, &self.source[start..end]);
            self.cursor += 1;
        }
    }

    /// Consumes and emits the next significant token, whatever kind it
    /// is, after flushing any leading trivia.
    fn bump_any(&mut self) {
        self.eat_trivia();
        if self.cursor >= self.tokens.len() {
            return;
        }
        let token = self.tokens[self.cursor];
        let start = self.offsets[self.cursor] as usize;
        let end = self.offsets[self.cursor + 1] as usize;
        self.builder.token(token.kind, &self.source[start..end]);
        self.cursor += 1;
    }

    /// Consumes the expected kind, or records a parse error at the current
    /// position and consumes nothing (error recovery: the caller moves on
    /// rather than looping forever).
    fn expect(&mut self, kind: SyntaxKind) {
        if self.peek() == kind {
            self.bump_any();
        } else {
            self.error(format!("expected {kind:?}, found {:?}", self.peek()));
        }
    }

    fn at(&self, kind: SyntaxKind) -> bool {
        self.peek() == kind
    }

    fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.bump_any();
            true
        } else {
            false
        }
    }

    fn error(&mut self, message: String) {
        let idx = self.first_non_trivia_index();
        let offset = *self.offsets.get(idx).unwrap_or(&(self.source.len() as u32));
        let (line, col) = self.line_index.line_col(offset);
        self.errors.push(ParseError { line, col, message });
    }

    fn start(&mut self, kind: SyntaxKind) {
        self.eat_trivia();
        self.builder.start_node(kind);
    }

    fn finish(&mut self) {
        self.builder.finish_node();
    }

    /// A position in the tree, to retroactively wrap whatever gets built
    /// starting here in a new node once we know its kind (e.g. seeing a
    /// binary operator only after the left operand is already parsed).
    /// Leading trivia is flushed first so it lands outside the wrapped
    /// node, matching `start`.
    fn checkpoint(&mut self) -> rowan::Checkpoint {
        self.eat_trivia();
        self.builder.checkpoint()
    }

    fn is_ts(&self) -> bool {
        self.dialect == Dialect::Ts
    }

    // -- grammar entry point --

    fn parse_program(&mut self) -> SyntaxTree {
        self.start(SyntaxKind::PROGRAM);
        while self.peek() != SyntaxKind::EOF {
            let before = self.cursor;
            self.parse_stmt();
            if self.cursor == before {
                // Nothing consumed: avoid looping forever on unrecognized
                // input by skipping one token and reporting it.
                self.error(format!("unexpected token {:?}", self.peek()));
                self.bump_any();
            }
        }
        self.eat_trivia();
        self.finish();
        let errors = std::mem::take(&mut self.errors);
        std::mem::replace(&mut self.builder, SyntaxTreeBuilder::new()).finish(errors)
    }

    // -- statements --

    fn parse_stmt(&mut self) {
        match self.peek() {
            SyntaxKind::VAR_KW | SyntaxKind::LET_KW | SyntaxKind::CONST_KW => self.parse_var_decl(),
            SyntaxKind::ASYNC_KW | SyntaxKind::FUNCTION_KW => self.parse_function_decl(),
            SyntaxKind::CLASS_KW => self.parse_class_decl(),
            SyntaxKind::L_BRACE => self.parse_block_stmt(),
            SyntaxKind::IF_KW => self.parse_if_stmt(),
            SyntaxKind::FOR_KW => self.parse_for_stmt(),
            SyntaxKind::WHILE_KW => self.parse_while_stmt(),
            SyntaxKind::DO_KW => self.parse_do_while_stmt(),
            SyntaxKind::SWITCH_KW => self.parse_switch_stmt(),
            SyntaxKind::BREAK_KW => self.parse_simple_kw_stmt(SyntaxKind::BREAK_KW, SyntaxKind::BREAK_STMT),
            SyntaxKind::CONTINUE_KW => {
                self.parse_simple_kw_stmt(SyntaxKind::CONTINUE_KW, SyntaxKind::CONTINUE_STMT)
            }
            SyntaxKind::RETURN_KW => self.parse_return_stmt(),
            SyntaxKind::THROW_KW => self.parse_throw_stmt(),
            SyntaxKind::TRY_KW => self.parse_try_stmt(),
            SyntaxKind::IMPORT_KW => self.parse_import_decl(),
            SyntaxKind::EXPORT_KW => self.parse_export_decl(),
            SyntaxKind::INTERFACE_KW if self.is_ts() => self.parse_interface_decl(),
            SyntaxKind::TYPE_KW if self.is_ts() => self.parse_type_alias_decl(),
            SyntaxKind::DECLARE_KW if self.is_ts() => self.parse_function_decl(),
            SyntaxKind::SEMI => {
                self.bump_any();
            }
            _ => self.parse_expr_stmt(),
        }
    }

    fn parse_simple_kw_stmt(&mut self, kw: SyntaxKind, node: SyntaxKind) {
        self.start(node);
        self.expect(kw);
        self.eat(SyntaxKind::SEMI);
        self.finish();
    }

    fn parse_var_decl(&mut self) {
        self.start(SyntaxKind::VAR_DECL);
        self.bump_any(); // var | let | const
        loop {
            self.parse_var_declarator();
            if !self.eat(SyntaxKind::COMMA) {
                break;
            }
        }
        self.eat(SyntaxKind::SEMI);
        self.finish();
    }

    fn parse_var_declarator(&mut self) {
        self.start(SyntaxKind::VAR_DECLARATOR);
        self.parse_pattern();
        if self.is_ts() && self.eat(SyntaxKind::COLON) {
            self.parse_type();
        }
        if self.eat(SyntaxKind::EQ) {
            self.parse_expr();
        }
        self.finish();
    }

    fn parse_pattern(&mut self) {
        match self.peek() {
            SyntaxKind::L_BRACK => self.parse_array_pattern(),
            SyntaxKind::L_BRACE => self.parse_object_pattern(),
            _ => self.parse_name(),
        }
    }

    fn parse_array_pattern(&mut self) {
        self.start(SyntaxKind::ARRAY_PATTERN);
        self.expect(SyntaxKind::L_BRACK);
        while !self.at(SyntaxKind::R_BRACK) && self.peek() != SyntaxKind::EOF {
            if self.at(SyntaxKind::DOT_DOT_DOT) {
                self.start(SyntaxKind::REST_ELEMENT);
                self.bump_any();
                self.parse_pattern();
                self.finish();
            } else {
                self.parse_pattern();
            }
            if !self.eat(SyntaxKind::COMMA) {
                break;
            }
        }
        self.expect(SyntaxKind::R_BRACK);
        self.finish();
    }

    fn parse_object_pattern(&mut self) {
        self.start(SyntaxKind::OBJECT_PATTERN);
        self.expect(SyntaxKind::L_BRACE);
        while !self.at(SyntaxKind::R_BRACE) && self.peek() != SyntaxKind::EOF {
            if self.at(SyntaxKind::DOT_DOT_DOT) {
                self.start(SyntaxKind::REST_ELEMENT);
                self.bump_any();
                self.parse_pattern();
                self.finish();
            } else if self.peek_nth(1) == SyntaxKind::COLON {
                self.start(SyntaxKind::ASSIGN_PATTERN);
                self.parse_name();
                self.bump_any(); // ':'
                self.parse_name();
                if self.eat(SyntaxKind::EQ) {
                    self.parse_expr();
                }
                self.finish();
            } else {
                self.parse_pattern();
                if self.eat(SyntaxKind::EQ) {
                    self.parse_expr();
                }
            }
            if !self.eat(SyntaxKind::COMMA) {
                break;
            }
        }
        self.expect(SyntaxKind::R_BRACE);
        self.finish();
    }

    fn parse_name(&mut self) {
        self.start(SyntaxKind::IDENT);
        if self.at(SyntaxKind::IDENT) {
            self.bump_any();
        } else {
            self.error(format!("expected identifier, found {:?}", self.peek()));
        }
        self.finish();
    }

    fn parse_function_decl(&mut self) {
        self.start(SyntaxKind::FUNCTION_DECL);
        self.eat(SyntaxKind::DECLARE_KW);
        self.eat(SyntaxKind::ASYNC_KW);
        self.expect(SyntaxKind::FUNCTION_KW);
        if self.at(SyntaxKind::IDENT) {
            self.parse_name();
        }
        self.parse_param_list();
        if self.is_ts() && self.eat(SyntaxKind::COLON) {
            self.parse_type();
        }
        if self.at(SyntaxKind::L_BRACE) {
            self.parse_block_stmt();
        } else {
            self.eat(SyntaxKind::SEMI);
        }
        self.finish();
    }

    fn parse_param_list(&mut self) {
        self.start(SyntaxKind::PARAM_LIST);
        self.expect(SyntaxKind::L_PAREN);
        while !self.at(SyntaxKind::R_PAREN) && self.peek() != SyntaxKind::EOF {
            self.parse_param();
            if !self.eat(SyntaxKind::COMMA) {
                break;
            }
        }
        self.expect(SyntaxKind::R_PAREN);
        self.finish();
    }

    fn parse_param(&mut self) {
        self.start(SyntaxKind::PARAM);
        if self.at(SyntaxKind::DOT_DOT_DOT) {
            self.bump_any();
        }
        self.parse_pattern();
        if self.is_ts() && self.eat(SyntaxKind::COLON) {
            self.parse_type();
        }
        if self.eat(SyntaxKind::EQ) {
            self.parse_expr();
        }
        self.finish();
    }

    fn parse_block_stmt(&mut self) {
        self.start(SyntaxKind::BLOCK_STMT);
        self.expect(SyntaxKind::L_BRACE);
        while !self.at(SyntaxKind::R_BRACE) && self.peek() != SyntaxKind::EOF {
            let before = self.cursor;
            self.parse_stmt();
            if self.cursor == before {
                self.error(format!("unexpected token {:?} in block", self.peek()));
                self.bump_any();
            }
        }
        self.expect(SyntaxKind::R_BRACE);
        self.finish();
    }

    fn parse_if_stmt(&mut self) {
        self.start(SyntaxKind::IF_STMT);
        self.expect(SyntaxKind::IF_KW);
        self.expect(SyntaxKind::L_PAREN);
        self.parse_expr();
        self.expect(SyntaxKind::R_PAREN);
        self.parse_stmt();
        if self.eat(SyntaxKind::ELSE_KW) {
            self.parse_stmt();
        }
        self.finish();
    }

    /// `for (...)`: dispatches between the three CST shapes (`ForStmt`,
    /// `ForInStmt`, `ForOfStmt`) by scanning ahead for a bare `in`/`of`
    /// keyword before the matching `)`.
    fn parse_for_stmt(&mut self) {
        let for_kind = self.classify_for_head();
        self.start(for_kind);
        self.expect(SyntaxKind::FOR_KW);
        self.expect(SyntaxKind::L_PAREN);
        match for_kind {
            SyntaxKind::FOR_IN_STMT | SyntaxKind::FOR_OF_STMT => {
                if matches!(self.peek(), SyntaxKind::VAR_KW | SyntaxKind::LET_KW | SyntaxKind::CONST_KW) {
                    self.bump_any();
                    self.parse_pattern();
                } else {
                    self.parse_pattern();
                }
                self.bump_any(); // 'in' | 'of'
                self.parse_expr();
            }
            _ => {
                if matches!(self.peek(), SyntaxKind::VAR_KW | SyntaxKind::LET_KW | SyntaxKind::CONST_KW) {
                    self.parse_var_decl_headless();
                } else if !self.at(SyntaxKind::SEMI) {
                    self.parse_expr();
                }
                self.expect(SyntaxKind::SEMI);
                if !self.at(SyntaxKind::SEMI) {
                    self.parse_expr();
                }
                self.expect(SyntaxKind::SEMI);
                if !self.at(SyntaxKind::R_PAREN) {
                    self.parse_expr();
                }
            }
        }
        self.expect(SyntaxKind::R_PAREN);
        self.parse_stmt();
        self.finish();
    }

    /// `VarDecl` without the trailing `;`/splitting logic, for the
    /// init clause of a C-style `for`.
    fn parse_var_decl_headless(&mut self) {
        self.start(SyntaxKind::VAR_DECL);
        self.bump_any();
        loop {
            self.parse_var_declarator();
            if !self.eat(SyntaxKind::COMMA) {
                break;
            }
        }
        self.finish();
    }

    fn classify_for_head(&self) -> SyntaxKind {
        let mut idx = self.cursor;
        let mut depth = 0i32;
        let mut seen_open = false;
        loop {
            let kind = self
                .tokens
                .get(idx)
                .map(|t| t.kind)
                .unwrap_or(SyntaxKind::EOF);
            match kind {
                SyntaxKind::EOF => return SyntaxKind::FOR_STMT,
                SyntaxKind::L_PAREN => {
                    depth += 1;
                    seen_open = true;
                }
                SyntaxKind::R_PAREN => {
                    depth -= 1;
                    if seen_open && depth == 0 {
                        return SyntaxKind::FOR_STMT;
                    }
                }
                SyntaxKind::SEMI if seen_open && depth == 1 => return SyntaxKind::FOR_STMT,
                SyntaxKind::IN_KW if seen_open && depth == 1 => return SyntaxKind::FOR_IN_STMT,
                SyntaxKind::OF_KW if seen_open && depth == 1 => return SyntaxKind::FOR_OF_STMT,
                _ => {}
            }
            idx += 1;
        }
    }

    fn parse_while_stmt(&mut self) {
        self.start(SyntaxKind::WHILE_STMT);
        self.expect(SyntaxKind::WHILE_KW);
        self.expect(SyntaxKind::L_PAREN);
        self.parse_expr();
        self.expect(SyntaxKind::R_PAREN);
        self.parse_stmt();
        self.finish();
    }

    fn parse_do_while_stmt(&mut self) {
        self.start(SyntaxKind::DO_WHILE_STMT);
        self.expect(SyntaxKind::DO_KW);
        self.parse_stmt();
        self.expect(SyntaxKind::WHILE_KW);
        self.expect(SyntaxKind::L_PAREN);
        self.parse_expr();
        self.expect(SyntaxKind::R_PAREN);
        self.eat(SyntaxKind::SEMI);
        self.finish();
    }

    fn parse_switch_stmt(&mut self) {
        self.start(SyntaxKind::SWITCH_STMT);
        self.expect(SyntaxKind::SWITCH_KW);
        self.expect(SyntaxKind::L_PAREN);
        self.parse_expr();
        self.expect(SyntaxKind::R_PAREN);
        self.expect(SyntaxKind::L_BRACE);
        while matches!(self.peek(), SyntaxKind::CASE_KW | SyntaxKind::DEFAULT_KW) {
            if self.at(SyntaxKind::CASE_KW) {
                self.start(SyntaxKind::CASE_CLAUSE);
                self.bump_any();
                self.parse_expr();
                self.expect(SyntaxKind::COLON);
                self.parse_case_body();
                self.finish();
            } else {
                self.start(SyntaxKind::DEFAULT_CLAUSE);
                self.bump_any();
                self.expect(SyntaxKind::COLON);
                self.parse_case_body();
                self.finish();
            }
        }
        self.expect(SyntaxKind::R_BRACE);
        self.finish();
    }

    fn parse_case_body(&mut self) {
        while !matches!(
            self.peek(),
            SyntaxKind::CASE_KW | SyntaxKind::DEFAULT_KW | SyntaxKind::R_BRACE | SyntaxKind::EOF
        ) {
            let before = self.cursor;
            self.parse_stmt();
            if self.cursor == before {
                self.bump_any();
            }
        }
    }

    fn parse_return_stmt(&mut self) {
        self.start(SyntaxKind::RETURN_STMT);
        self.expect(SyntaxKind::RETURN_KW);
        if !matches!(self.peek(), SyntaxKind::SEMI | SyntaxKind::R_BRACE | SyntaxKind::EOF) {
            self.parse_expr();
        }
        self.eat(SyntaxKind::SEMI);
        self.finish();
    }

    fn parse_throw_stmt(&mut self) {
        self.start(SyntaxKind::THROW_STMT);
        self.expect(SyntaxKind::THROW_KW);
        self.parse_expr();
        self.eat(SyntaxKind::SEMI);
        self.finish();
    }

    fn parse_try_stmt(&mut self) {
        self.start(SyntaxKind::TRY_STMT);
        self.expect(SyntaxKind::TRY_KW);
        self.parse_block_stmt();
        if self.at(SyntaxKind::CATCH_KW) {
            self.start(SyntaxKind::CATCH_CLAUSE);
            self.bump_any();
            if self.eat(SyntaxKind::L_PAREN) {
                self.parse_name();
                self.expect(SyntaxKind::R_PAREN);
            }
            self.parse_block_stmt();
            self.finish();
        }
        if self.eat(SyntaxKind::FINALLY_KW) {
            self.parse_block_stmt();
        }
        self.finish();
    }

    fn parse_class_decl(&mut self) {
        self.start(SyntaxKind::CLASS_DECL);
        self.expect(SyntaxKind::CLASS_KW);
        self.parse_name();
        if self.eat(SyntaxKind::EXTENDS_KW) {
            self.parse_unary_expr();
        }
        self.parse_class_body();
        self.finish();
    }

    fn parse_class_body(&mut self) {
        self.start(SyntaxKind::CLASS_BODY);
        self.expect(SyntaxKind::L_BRACE);
        while !self.at(SyntaxKind::R_BRACE) && self.peek() != SyntaxKind::EOF {
            self.parse_class_member();
        }
        self.expect(SyntaxKind::R_BRACE);
        self.finish();
    }

    fn parse_class_member(&mut self) {
        let is_static = self.at(SyntaxKind::STATIC_KW);
        let after_static = if is_static { 1 } else { 0 };
        let is_async = self.peek_nth(after_static) == SyntaxKind::ASYNC_KW
            && self.peek_nth(after_static + 1) != SyntaxKind::L_PAREN;
        let after_async = after_static + if is_async { 1 } else { 0 };
        let is_accessor = matches!(self.peek_nth(after_async), SyntaxKind::GET_KW | SyntaxKind::SET_KW);
        let after_accessor = after_async + if is_accessor { 1 } else { 0 };
        if self.peek_nth(after_accessor + 1) == SyntaxKind::L_PAREN
            || self.peek_nth(after_accessor) == SyntaxKind::IDENT
                && matches!(self.peek_nth(after_accessor + 1), SyntaxKind::L_PAREN)
        {
            self.start(SyntaxKind::METHOD_DEF);
            self.eat(SyntaxKind::STATIC_KW);
            self.eat(SyntaxKind::ASYNC_KW);
            if matches!(self.peek(), SyntaxKind::GET_KW | SyntaxKind::SET_KW) {
                self.bump_any();
            }
            self.parse_name();
            self.parse_param_list();
            if self.is_ts() && self.eat(SyntaxKind::COLON) {
                self.parse_type();
            }
            self.parse_block_stmt();
            self.finish();
        } else {
            self.start(SyntaxKind::PROPERTY_DEF);
            self.eat(SyntaxKind::STATIC_KW);
            self.parse_name();
            if self.is_ts() && self.eat(SyntaxKind::COLON) {
                self.parse_type();
            }
            if self.eat(SyntaxKind::EQ) {
                self.parse_expr();
            }
            self.eat(SyntaxKind::SEMI);
            self.finish();
        }
    }

    fn parse_import_decl(&mut self) {
        self.start(SyntaxKind::IMPORT_DECL);
        self.expect(SyntaxKind::IMPORT_KW);
        if self.at(SyntaxKind::STRING) {
            self.bump_any();
            self.eat(SyntaxKind::SEMI);
            self.finish();
            return;
        }
        if self.at(SyntaxKind::STAR) {
            self.start(SyntaxKind::IMPORT_NAMESPACE_SPECIFIER);
            self.bump_any();
            self.expect(SyntaxKind::AS_KW);
            self.parse_name();
            self.finish();
        } else if self.at(SyntaxKind::L_BRACE) {
            self.parse_import_specifier();
        } else {
            self.start(SyntaxKind::IMPORT_DEFAULT_SPECIFIER);
            self.parse_name();
            self.finish();
            if self.eat(SyntaxKind::COMMA) {
                if self.at(SyntaxKind::STAR) {
                    self.start(SyntaxKind::IMPORT_NAMESPACE_SPECIFIER);
                    self.bump_any();
                    self.expect(SyntaxKind::AS_KW);
                    self.parse_name();
                    self.finish();
                } else {
                    self.parse_import_specifier();
                }
            }
        }
        self.expect(SyntaxKind::FROM_KW);
        self.expect(SyntaxKind::STRING);
        self.eat(SyntaxKind::SEMI);
        self.finish();
    }

    fn parse_import_specifier(&mut self) {
        self.start(SyntaxKind::IMPORT_SPECIFIER);
        self.expect(SyntaxKind::L_BRACE);
        while !self.at(SyntaxKind::R_BRACE) && self.peek() != SyntaxKind::EOF {
            self.parse_name();
            if self.eat(SyntaxKind::AS_KW) {
                self.parse_name();
            }
            if !self.eat(SyntaxKind::COMMA) {
                break;
            }
        }
        self.expect(SyntaxKind::R_BRACE);
        self.finish();
    }

    fn parse_export_decl(&mut self) {
        if self.peek_nth(1) == SyntaxKind::DEFAULT_KW {
            self.start(SyntaxKind::EXPORT_DEFAULT_DECL);
            self.bump_any();
            self.bump_any();
            match self.peek() {
                SyntaxKind::FUNCTION_KW | SyntaxKind::ASYNC_KW => self.parse_function_decl(),
                SyntaxKind::CLASS_KW => self.parse_class_decl(),
                _ => {
                    self.parse_expr();
                    self.eat(SyntaxKind::SEMI);
                }
            }
            self.finish();
            return;
        }
        if self.is_ts() && self.peek_nth(1) == SyntaxKind::INTERFACE_KW {
            self.parse_interface_decl();
            return;
        }
        if self.is_ts() && self.peek_nth(1) == SyntaxKind::TYPE_KW {
            self.parse_type_alias_decl();
            return;
        }
        self.start(SyntaxKind::EXPORT_DECL);
        self.bump_any();
        match self.peek() {
            SyntaxKind::VAR_KW | SyntaxKind::LET_KW | SyntaxKind::CONST_KW => self.parse_var_decl(),
            SyntaxKind::FUNCTION_KW | SyntaxKind::ASYNC_KW | SyntaxKind::DECLARE_KW => self.parse_function_decl(),
            SyntaxKind::CLASS_KW => self.parse_class_decl(),
            SyntaxKind::L_BRACE => {
                self.parse_import_specifier();
                if self.eat(SyntaxKind::FROM_KW) {
                    self.expect(SyntaxKind::STRING);
                }
                self.eat(SyntaxKind::SEMI);
            }
            _ => self.error(format!("unexpected token {:?} after export", self.peek())),
        }
        self.finish();
    }

    fn parse_interface_decl(&mut self) {
        self.start(SyntaxKind::INTERFACE_DECL);
        self.eat(SyntaxKind::EXPORT_KW);
        self.expect(SyntaxKind::INTERFACE_KW);
        self.parse_name();
        if self.eat(SyntaxKind::EXTENDS_KW) {
            self.parse_name();
        }
        self.expect(SyntaxKind::L_BRACE);
        while !self.at(SyntaxKind::R_BRACE) && self.peek() != SyntaxKind::EOF {
            self.start(SyntaxKind::INTERFACE_MEMBER);
            self.parse_name();
            self.eat(SyntaxKind::QUESTION);
            self.expect(SyntaxKind::COLON);
            self.parse_type();
            self.eat(SyntaxKind::SEMI);
            self.finish();
        }
        self.expect(SyntaxKind::R_BRACE);
        self.finish();
    }

    fn parse_type_alias_decl(&mut self) {
        self.start(SyntaxKind::TYPE_ALIAS_DECL);
        self.eat(SyntaxKind::EXPORT_KW);
        self.expect(SyntaxKind::TYPE_KW);
        self.parse_name();
        self.expect(SyntaxKind::EQ);
        self.parse_type();
        self.eat(SyntaxKind::SEMI);
        self.finish();
    }

    /// Parses and discards a TS type: it is checked for syntactic legality
    /// against the grammar and then dropped, never carried into the
    /// Python AST (see the data model note on types).
    fn parse_type(&mut self) {
        self.start(SyntaxKind::TYPE_ANNOTATION);
        if !self.grammar.is_known_rule("Type") && self.ts_grammar.is_known_rule("Type") {
            self.error("type annotations are not legal in this dialect".to_string());
        }
        self.parse_type_atom();
        while self.at(SyntaxKind::L_BRACK) {
            self.bump_any();
            self.expect(SyntaxKind::R_BRACK);
        }
        while matches!(self.peek(), SyntaxKind::PIPE | SyntaxKind::AMP) {
            self.bump_any();
            self.parse_type_atom();
        }
        self.finish();
    }

    fn parse_type_atom(&mut self) {
        if self.eat(SyntaxKind::L_PAREN) {
            self.parse_type();
            self.expect(SyntaxKind::R_PAREN);
        } else {
            self.parse_name();
        }
    }

    fn parse_expr_stmt(&mut self) {
        self.start(SyntaxKind::EXPR_STMT);
        self.parse_expr();
        self.eat(SyntaxKind::SEMI);
        self.finish();
    }

    // -- expressions --
    //
    // Precedence climbing, loosest to tightest:
    // sequence > assignment > conditional > logical-or > logical-and >
    // equality > relational > additive > multiplicative > unary >
    // update/postfix > call/member > primary.

    fn parse_expr(&mut self) {
        self.parse_sequence_expr();
    }

    /// The comma operator. Only reachable from contexts that delimit the
    /// expression with something other than a comma (parens, `;`, block
    /// braces) — argument lists, array/object literals and for-loop heads
    /// call `parse_assign_expr` directly and never hit this.
    fn parse_sequence_expr(&mut self) {
        let checkpoint = self.checkpoint();
        self.parse_assign_expr();
        while self.at(SyntaxKind::COMMA) {
            self.wrap_at(checkpoint, SyntaxKind::SEQUENCE_EXPR, |p| {
                p.bump_any();
                p.parse_assign_expr();
            });
        }
    }

    fn parse_assign_expr(&mut self) {
        let checkpoint = self.checkpoint();
        self.parse_conditional_expr();
        if matches!(
            self.peek(),
            SyntaxKind::EQ | SyntaxKind::PLUS_EQ | SyntaxKind::MINUS_EQ | SyntaxKind::STAR_EQ | SyntaxKind::SLASH_EQ
        ) {
            self.wrap_at(checkpoint, SyntaxKind::ASSIGN_EXPR, |p| {
                p.bump_any();
                p.parse_assign_expr();
            });
        }
    }

    fn parse_conditional_expr(&mut self) {
        let checkpoint = self.checkpoint();
        self.parse_logical_or_expr();
        if self.at(SyntaxKind::QUESTION) {
            self.wrap_at(checkpoint, SyntaxKind::CONDITIONAL_EXPR, |p| {
                p.bump_any();
                p.parse_assign_expr();
                p.expect(SyntaxKind::COLON);
                p.parse_assign_expr();
            });
        }
    }

    fn parse_logical_or_expr(&mut self) {
        let checkpoint = self.checkpoint();
        self.parse_logical_and_expr();
        while self.at(SyntaxKind::PIPE_PIPE) {
            self.wrap_at(checkpoint, SyntaxKind::LOGICAL_EXPR, |p| {
                p.bump_any();
                p.parse_logical_and_expr();
            });
        }
    }

    fn parse_logical_and_expr(&mut self) {
        let checkpoint = self.checkpoint();
        self.parse_equality_expr();
        while self.at(SyntaxKind::AMP_AMP) {
            self.wrap_at(checkpoint, SyntaxKind::LOGICAL_EXPR, |p| {
                p.bump_any();
                p.parse_equality_expr();
            });
        }
    }

    fn parse_equality_expr(&mut self) {
        let checkpoint = self.checkpoint();
        self.parse_relational_expr();
        while matches!(
            self.peek(),
            SyntaxKind::EQ_EQ | SyntaxKind::EQ_EQ_EQ | SyntaxKind::BANG_EQ | SyntaxKind::BANG_EQ_EQ
        ) {
            self.wrap_at(checkpoint, SyntaxKind::BINARY_EXPR, |p| {
                p.bump_any();
                p.parse_relational_expr();
            });
        }
    }

    fn parse_relational_expr(&mut self) {
        let checkpoint = self.checkpoint();
        self.parse_additive_expr();
        while matches!(
            self.peek(),
            SyntaxKind::LT
                | SyntaxKind::GT
                | SyntaxKind::LT_EQ
                | SyntaxKind::GT_EQ
                | SyntaxKind::INSTANCEOF_KW
                | SyntaxKind::IN_KW
        ) {
            self.wrap_at(checkpoint, SyntaxKind::BINARY_EXPR, |p| {
                p.bump_any();
                p.parse_additive_expr();
            });
        }
        if self.is_ts() && self.at(SyntaxKind::AS_KW) {
            self.wrap_at(checkpoint, SyntaxKind::AS_EXPR, |p| {
                p.bump_any();
                p.parse_type();
            });
        }
    }

    fn parse_additive_expr(&mut self) {
        let checkpoint = self.checkpoint();
        self.parse_multiplicative_expr();
        while matches!(self.peek(), SyntaxKind::PLUS | SyntaxKind::MINUS) {
            self.wrap_at(checkpoint, SyntaxKind::BINARY_EXPR, |p| {
                p.bump_any();
                p.parse_multiplicative_expr();
            });
        }
    }

    fn parse_multiplicative_expr(&mut self) {
        let checkpoint = self.checkpoint();
        self.parse_unary_expr();
        while matches!(self.peek(), SyntaxKind::STAR | SyntaxKind::SLASH | SyntaxKind::PERCENT) {
            self.wrap_at(checkpoint, SyntaxKind::BINARY_EXPR, |p| {
                p.bump_any();
                p.parse_unary_expr();
            });
        }
    }

    fn parse_unary_expr(&mut self) {
        if matches!(
            self.peek(),
            SyntaxKind::BANG | SyntaxKind::MINUS | SyntaxKind::TYPEOF_KW | SyntaxKind::DELETE_KW | SyntaxKind::AWAIT_KW
        ) {
            self.start(SyntaxKind::UNARY_EXPR);
            self.bump_any();
            self.parse_unary_expr();
            self.finish();
        } else if matches!(self.peek(), SyntaxKind::PLUS_PLUS | SyntaxKind::MINUS_MINUS) {
            self.start(SyntaxKind::UPDATE_EXPR);
            self.bump_any();
            self.parse_unary_expr();
            self.finish();
        } else {
            self.parse_postfix_expr();
        }
    }

    fn parse_postfix_expr(&mut self) {
        let checkpoint = self.checkpoint();
        self.parse_call_or_member_expr();
        if matches!(self.peek(), SyntaxKind::PLUS_PLUS | SyntaxKind::MINUS_MINUS) {
            self.wrap_at(checkpoint, SyntaxKind::UPDATE_EXPR, |p| {
                p.bump_any();
            });
        }
    }

    fn parse_call_or_member_expr(&mut self) {
        let checkpoint = self.checkpoint();
        if self.at(SyntaxKind::NEW_KW) {
            self.start(SyntaxKind::NEW_EXPR);
            self.bump_any();
            self.parse_member_chain_head();
            if self.at(SyntaxKind::L_PAREN) {
                self.parse_arguments();
            }
            self.finish();
        } else {
            self.parse_primary_expr();
        }
        loop {
            match self.peek() {
                SyntaxKind::DOT => {
                    self.wrap_at(checkpoint, SyntaxKind::MEMBER_EXPR, |p| {
                        p.bump_any();
                        p.parse_name();
                    });
                }
                SyntaxKind::L_BRACK => {
                    self.wrap_at(checkpoint, SyntaxKind::MEMBER_EXPR, |p| {
                        p.bump_any();
                        p.parse_expr();
                        p.expect(SyntaxKind::R_BRACK);
                    });
                }
                SyntaxKind::L_PAREN => {
                    self.wrap_at(checkpoint, SyntaxKind::CALL_EXPR, |p| {
                        p.parse_arguments();
                    });
                }
                SyntaxKind::TEMPLATE_STRING => {
                    self.wrap_at(checkpoint, SyntaxKind::TAGGED_TEMPLATE, |p| {
                        p.bump_any();
                    });
                }
                _ => break,
            }
        }
    }

    fn parse_member_chain_head(&mut self) {
        let checkpoint = self.checkpoint();
        self.parse_primary_expr();
        while matches!(self.peek(), SyntaxKind::DOT | SyntaxKind::L_BRACK) {
            if self.at(SyntaxKind::DOT) {
                self.wrap_at(checkpoint, SyntaxKind::MEMBER_EXPR, |p| {
                    p.bump_any();
                    p.parse_name();
                });
            } else {
                self.wrap_at(checkpoint, SyntaxKind::MEMBER_EXPR, |p| {
                    p.bump_any();
                    p.parse_expr();
                    p.expect(SyntaxKind::R_BRACK);
                });
            }
        }
    }

    fn parse_arguments(&mut self) {
        self.start(SyntaxKind::ARGUMENTS);
        self.expect(SyntaxKind::L_PAREN);
        while !self.at(SyntaxKind::R_PAREN) && self.peek() != SyntaxKind::EOF {
            if self.at(SyntaxKind::DOT_DOT_DOT) {
                self.start(SyntaxKind::SPREAD_ELEMENT);
                self.bump_any();
                self.parse_assign_expr();
                self.finish();
            } else {
                self.parse_assign_expr();
            }
            if !self.eat(SyntaxKind::COMMA) {
                break;
            }
        }
        self.expect(SyntaxKind::R_PAREN);
        self.finish();
    }

    fn parse_primary_expr(&mut self) {
        match self.peek() {
            SyntaxKind::IDENT => self.parse_name(),
            SyntaxKind::THIS_KW
            | SyntaxKind::INT_NUMBER
            | SyntaxKind::FLOAT_NUMBER
            | SyntaxKind::STRING
            | SyntaxKind::REGEX
            | SyntaxKind::TRUE_KW
            | SyntaxKind::FALSE_KW
            | SyntaxKind::NULL_KW
            | SyntaxKind::UNDEFINED_KW => {
                self.bump_any();
            }
            SyntaxKind::TEMPLATE_STRING => {
                self.start(SyntaxKind::TEMPLATE_LITERAL);
                self.bump_any();
                self.finish();
            }
            SyntaxKind::L_PAREN => self.parse_paren_or_arrow(),
            SyntaxKind::L_BRACK => self.parse_array_expr(),
            SyntaxKind::L_BRACE => self.parse_object_expr(),
            SyntaxKind::ASYNC_KW => self.parse_arrow_function(),
            SyntaxKind::FUNCTION_KW => self.parse_function_decl(),
            SyntaxKind::DOT_DOT_DOT => {
                self.start(SyntaxKind::SPREAD_ELEMENT);
                self.bump_any();
                self.parse_assign_expr();
                self.finish();
            }
            other => {
                self.error(format!("unexpected token {other:?} in expression"));
                self.bump_any();
            }
        }
    }

    /// Disambiguates `(expr)` from `(params) => body` by scanning ahead
    /// for `=>` after the matching `)`.
    fn parse_paren_or_arrow(&mut self) {
        if self.looks_like_arrow_params() {
            self.parse_arrow_function();
        } else {
            self.start(SyntaxKind::PAREN_EXPR);
            self.expect(SyntaxKind::L_PAREN);
            self.parse_expr();
            self.expect(SyntaxKind::R_PAREN);
            self.finish();
        }
    }

    fn looks_like_arrow_params(&self) -> bool {
        let mut idx = self.cursor;
        let mut depth = 0i32;
        loop {
            let kind = self.tokens.get(idx).map(|t| t.kind).unwrap_or(SyntaxKind::EOF);
            match kind {
                SyntaxKind::EOF => return false,
                SyntaxKind::L_PAREN => depth += 1,
                SyntaxKind::R_PAREN => {
                    depth -= 1;
                    if depth == 0 {
                        let mut next = idx + 1;
                        while self.is_trivia_at(next) {
                            next += 1;
                        }
                        return self.tokens.get(next).map(|t| t.kind) == Some(SyntaxKind::ARROW);
                    }
                }
                _ => {}
            }
            idx += 1;
        }
    }

    fn parse_arrow_function(&mut self) {
        self.start(SyntaxKind::ARROW_FUNCTION);
        self.eat(SyntaxKind::ASYNC_KW);
        if self.at(SyntaxKind::IDENT) {
            self.parse_name();
        } else {
            self.parse_param_list();
        }
        if self.is_ts() && self.eat(SyntaxKind::COLON) {
            self.parse_type();
        }
        self.expect(SyntaxKind::ARROW);
        if self.at(SyntaxKind::L_BRACE) {
            self.parse_block_stmt();
        } else {
            self.parse_assign_expr();
        }
        self.finish();
    }

    fn parse_array_expr(&mut self) {
        self.start(SyntaxKind::ARRAY_EXPR);
        self.expect(SyntaxKind::L_BRACK);
        while !self.at(SyntaxKind::R_BRACK) && self.peek() != SyntaxKind::EOF {
            if self.at(SyntaxKind::DOT_DOT_DOT) {
                self.start(SyntaxKind::SPREAD_ELEMENT);
                self.bump_any();
                self.parse_assign_expr();
                self.finish();
            } else {
                self.parse_assign_expr();
            }
            if !self.eat(SyntaxKind::COMMA) {
                break;
            }
        }
        self.expect(SyntaxKind::R_BRACK);
        self.finish();
    }

    fn parse_object_expr(&mut self) {
        self.start(SyntaxKind::OBJECT_EXPR);
        self.expect(SyntaxKind::L_BRACE);
        while !self.at(SyntaxKind::R_BRACE) && self.peek() != SyntaxKind::EOF {
            if self.at(SyntaxKind::DOT_DOT_DOT) {
                self.start(SyntaxKind::SPREAD_ELEMENT);
                self.bump_any();
                self.parse_assign_expr();
                self.finish();
                if !self.eat(SyntaxKind::COMMA) {
                    break;
                }
                continue;
            }
            self.start(SyntaxKind::PROPERTY);
            if self.at(SyntaxKind::L_BRACK) {
                self.bump_any();
                self.parse_expr();
                self.expect(SyntaxKind::R_BRACK);
            } else if self.at(SyntaxKind::STRING) {
                self.bump_any();
            } else {
                self.parse_name();
            }
            if self.eat(SyntaxKind::COLON) {
                self.parse_assign_expr();
            } else if self.at(SyntaxKind::L_PAREN) {
                // shorthand method: name(...) { ... }
                self.parse_param_list();
                self.parse_block_stmt();
            }
            self.finish();
            if !self.eat(SyntaxKind::COMMA) {
                break;
            }
        }
        self.expect(SyntaxKind::R_BRACE);
        self.finish();
    }

    /// Opens `kind` retroactively at `checkpoint`, so everything built
    /// since that checkpoint (the left operand, already parsed) becomes
    /// its first child, then runs `rest` (the operator and right operand)
    /// as the remaining children before closing it. The same checkpoint
    /// can be reused across loop iterations to build a left-associative
    /// chain, since each wrap only ever adds a new outermost layer.
    fn wrap_at(&mut self, checkpoint: rowan::Checkpoint, kind: SyntaxKind, rest: impl FnOnce(&mut Self)) {
        self.builder.start_node_at(checkpoint, kind);
        rest(self);
        self.finish();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grammar_dir() -> std::path::PathBuf {
        std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("../../grammar")
    }

    fn parse_ok(src: &str) -> crate::syntax_kind::SyntaxNode {
        parse(src, Dialect::Js, &grammar_dir())
            .expect("grammar loads")
            .ok()
            .expect("parses cleanly")
    }

    /// First non-trivia node child of `node`, the way `expr_children` in
    /// `tython-transform` walks a binary/member/call expression's operand.
    fn only_stmt_expr(root: &crate::syntax_kind::SyntaxNode) -> crate::syntax_kind::SyntaxNode {
        let expr_stmt = root.children().next().expect("one statement");
        assert_eq!(expr_stmt.kind(), SyntaxKind::EXPR_STMT);
        expr_stmt.children().next().expect("one expression")
    }

    fn non_trivia_node_children(node: &crate::syntax_kind::SyntaxNode) -> Vec<crate::syntax_kind::SyntaxNode> {
        node.children().collect()
    }

    #[test]
    fn left_associative_subtraction_nests_to_the_left() {
        // 1 - 2 - 3 == (1 - 2) - 3, not 1 - (2 - 3).
        let root = parse_ok("1 - 2 - 3;");
        let outer = only_stmt_expr(&root);
        assert_eq!(outer.kind(), SyntaxKind::BINARY_EXPR);
        let children = non_trivia_node_children(&outer);
        assert_eq!(children.len(), 1, "rhs `3` is a bare token, not a node");
        assert_eq!(children[0].kind(), SyntaxKind::BINARY_EXPR, "lhs is the inner `1 - 2`");
    }

    #[test]
    fn multiplication_binds_tighter_than_addition() {
        // 1 + 2 * 3 == 1 + (2 * 3): the right child of the outer `+` node
        // is a nested `*` node, not a bare literal.
        let root = parse_ok("1 + 2 * 3;");
        let outer = only_stmt_expr(&root);
        assert_eq!(outer.kind(), SyntaxKind::BINARY_EXPR);
        let children = non_trivia_node_children(&outer);
        assert_eq!(children.len(), 1, "lhs `1` is a bare token");
        assert_eq!(children[0].kind(), SyntaxKind::BINARY_EXPR, "rhs is the inner `2 * 3`");
    }

    #[test]
    fn member_and_call_chain_nests_the_whole_prefix_each_step() {
        // a.b().c chains as MemberExpr(CallExpr(MemberExpr(a, b)), c).
        let root = parse_ok("a.b().c;");
        let outer = only_stmt_expr(&root);
        assert_eq!(outer.kind(), SyntaxKind::MEMBER_EXPR);
        let children = non_trivia_node_children(&outer);
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].kind(), SyntaxKind::CALL_EXPR);
        let call_children = non_trivia_node_children(&children[0]);
        assert_eq!(call_children.len(), 1, "ARGUMENTS is a sibling node, not nested under the callee");
        assert_eq!(call_children[0].kind(), SyntaxKind::MEMBER_EXPR, "callee is `a.b`");
    }

    #[test]
    fn comma_operator_builds_a_left_associative_sequence() {
        let root = parse_ok("a, b, c;");
        let outer = only_stmt_expr(&root);
        assert_eq!(outer.kind(), SyntaxKind::SEQUENCE_EXPR);
        let children = non_trivia_node_children(&outer);
        assert_eq!(children.len(), 1, "rhs `c` is a bare token");
        assert_eq!(children[0].kind(), SyntaxKind::SEQUENCE_EXPR, "lhs is the inner `a, b`");
    }

    #[test]
    fn assignment_is_right_associative_around_a_binary_rhs() {
        let root = parse_ok("x = 1 + 2;");
        let outer = only_stmt_expr(&root);
        assert_eq!(outer.kind(), SyntaxKind::ASSIGN_EXPR);
        let children = non_trivia_node_children(&outer);
        assert_eq!(children.len(), 1, "lhs `x` is a bare token");
        assert_eq!(children[0].kind(), SyntaxKind::BINARY_EXPR);
    }
}
