//! Turns source text into a flat token stream. Tokenising is dialect
//! agnostic — the same tokens come out for JS and TS input; the parser is
//! what decides which rules a given dialect accepts (see
//! [`crate::grammar::GrammarDef`]).

mod cursor;

use cursor::Cursor;

use crate::syntax_kind::SyntaxKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: SyntaxKind,
    pub len: usize,
}

/// Runs the whole lexer over `input` and returns every token, trivia
/// included. The parser is responsible for skipping whitespace/comments
/// where the grammar doesn't want them.
pub fn tokenize(input: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut rest = input;
    // Tracks the last non-trivia token so `/` can be disambiguated between
    // division and the start of a regex literal (see `regex_allowed`).
    let mut prev_significant: Option<SyntaxKind> = None;
    while !rest.is_empty() {
        let token = next_token(rest, prev_significant);
        rest = &rest[token.len..];
        if !matches!(token.kind, SyntaxKind::WHITESPACE | SyntaxKind::COMMENT) {
            prev_significant = Some(token.kind);
        }
        tokens.push(token);
    }
    tokens
}

fn next_token(input: &str, prev: Option<SyntaxKind>) -> Token {
    let mut cursor = Cursor::new(input);
    let first_char = cursor.bump().expect("next_token called on empty input");

    let kind = match first_char {
        c if is_whitespace(c) => {
            cursor.eat_while(is_whitespace);
            SyntaxKind::WHITESPACE
        }
        '/' if cursor.first() == '/' => {
            cursor.eat_while(|c| c != '\n');
            SyntaxKind::COMMENT
        }
        '/' if cursor.first() == '*' => {
            cursor.bump();
            while !cursor.is_eof() {
                if cursor.first() == '*' && cursor.second() == '/' {
                    cursor.bump();
                    cursor.bump();
                    break;
                }
                cursor.bump();
            }
            SyntaxKind::COMMENT
        }
        c if is_ident_start(c) => {
            cursor.eat_while(is_ident_continue);
            keyword_or_ident(&input[..cursor.len_consumed()])
        }
        c if c.is_ascii_digit() => number(&mut cursor),
        '"' | '\'' => {
            quoted_string(&mut cursor, first_char);
            SyntaxKind::STRING
        }
        '`' => {
            template_string(&mut cursor);
            SyntaxKind::TEMPLATE_STRING
        }
        '.' if cursor.first() == '.' && cursor.second() == '.' => {
            cursor.bump();
            cursor.bump();
            SyntaxKind::DOT_DOT_DOT
        }
        '.' => SyntaxKind::DOT,
        '(' => SyntaxKind::L_PAREN,
        ')' => SyntaxKind::R_PAREN,
        '{' => SyntaxKind::L_BRACE,
        '}' => SyntaxKind::R_BRACE,
        '[' => SyntaxKind::L_BRACK,
        ']' => SyntaxKind::R_BRACK,
        ';' => SyntaxKind::SEMI,
        ',' => SyntaxKind::COMMA,
        ':' => SyntaxKind::COLON,
        '?' => SyntaxKind::QUESTION,
        '@' => SyntaxKind::AT,
        '=' if cursor.first() == '>' => {
            cursor.bump();
            SyntaxKind::ARROW
        }
        '=' if cursor.first() == '=' && cursor.second() == '=' => {
            cursor.bump();
            cursor.bump();
            SyntaxKind::EQ_EQ_EQ
        }
        '=' if cursor.first() == '=' => {
            cursor.bump();
            SyntaxKind::EQ_EQ
        }
        '=' => SyntaxKind::EQ,
        '!' if cursor.first() == '=' && cursor.second() == '=' => {
            cursor.bump();
            cursor.bump();
            SyntaxKind::BANG_EQ_EQ
        }
        '!' if cursor.first() == '=' => {
            cursor.bump();
            SyntaxKind::BANG_EQ
        }
        '!' => SyntaxKind::BANG,
        '+' if cursor.first() == '+' => {
            cursor.bump();
            SyntaxKind::PLUS_PLUS
        }
        '+' if cursor.first() == '=' => {
            cursor.bump();
            SyntaxKind::PLUS_EQ
        }
        '+' => SyntaxKind::PLUS,
        '-' if cursor.first() == '-' => {
            cursor.bump();
            SyntaxKind::MINUS_MINUS
        }
        '-' if cursor.first() == '=' => {
            cursor.bump();
            SyntaxKind::MINUS_EQ
        }
        '-' => SyntaxKind::MINUS,
        '*' if cursor.first() == '=' => {
            cursor.bump();
            SyntaxKind::STAR_EQ
        }
        '*' => SyntaxKind::STAR,
        '/' if regex_allowed(prev) => {
            regex_literal(&mut cursor);
            SyntaxKind::REGEX
        }
        '/' if cursor.first() == '=' => {
            cursor.bump();
            SyntaxKind::SLASH_EQ
        }
        '/' => SyntaxKind::SLASH,
        '%' => SyntaxKind::PERCENT,
        '&' if cursor.first() == '&' => {
            cursor.bump();
            SyntaxKind::AMP_AMP
        }
        '&' => SyntaxKind::AMP,
        '|' if cursor.first() == '|' => {
            cursor.bump();
            SyntaxKind::PIPE_PIPE
        }
        '|' => SyntaxKind::PIPE,
        '^' => SyntaxKind::CARET,
        '<' if cursor.first() == '=' => {
            cursor.bump();
            SyntaxKind::LT_EQ
        }
        '<' => SyntaxKind::LT,
        '>' if cursor.first() == '=' => {
            cursor.bump();
            SyntaxKind::GT_EQ
        }
        '>' => SyntaxKind::GT,
        _ => SyntaxKind::ERROR,
    };

    Token {
        kind,
        len: first_char.len_utf8() + cursor.len_consumed(),
    }
}

fn keyword_or_ident(text: &str) -> SyntaxKind {
    match text {
        "var" => SyntaxKind::VAR_KW,
        "let" => SyntaxKind::LET_KW,
        "const" => SyntaxKind::CONST_KW,
        "function" => SyntaxKind::FUNCTION_KW,
        "return" => SyntaxKind::RETURN_KW,
        "if" => SyntaxKind::IF_KW,
        "else" => SyntaxKind::ELSE_KW,
        "for" => SyntaxKind::FOR_KW,
        "while" => SyntaxKind::WHILE_KW,
        "do" => SyntaxKind::DO_KW,
        "switch" => SyntaxKind::SWITCH_KW,
        "case" => SyntaxKind::CASE_KW,
        "default" => SyntaxKind::DEFAULT_KW,
        "break" => SyntaxKind::BREAK_KW,
        "continue" => SyntaxKind::CONTINUE_KW,
        "try" => SyntaxKind::TRY_KW,
        "catch" => SyntaxKind::CATCH_KW,
        "finally" => SyntaxKind::FINALLY_KW,
        "throw" => SyntaxKind::THROW_KW,
        "new" => SyntaxKind::NEW_KW,
        "delete" => SyntaxKind::DELETE_KW,
        "typeof" => SyntaxKind::TYPEOF_KW,
        "instanceof" => SyntaxKind::INSTANCEOF_KW,
        "in" => SyntaxKind::IN_KW,
        "of" => SyntaxKind::OF_KW,
        "this" => SyntaxKind::THIS_KW,
        "class" => SyntaxKind::CLASS_KW,
        "extends" => SyntaxKind::EXTENDS_KW,
        "super" => SyntaxKind::SUPER_KW,
        "static" => SyntaxKind::STATIC_KW,
        "get" => SyntaxKind::GET_KW,
        "set" => SyntaxKind::SET_KW,
        "import" => SyntaxKind::IMPORT_KW,
        "export" => SyntaxKind::EXPORT_KW,
        "from" => SyntaxKind::FROM_KW,
        "as" => SyntaxKind::AS_KW,
        "async" => SyntaxKind::ASYNC_KW,
        "await" => SyntaxKind::AWAIT_KW,
        "yield" => SyntaxKind::YIELD_KW,
        "interface" => SyntaxKind::INTERFACE_KW,
        "declare" => SyntaxKind::DECLARE_KW,
        "type" => SyntaxKind::TYPE_KW,
        "true" => SyntaxKind::TRUE_KW,
        "false" => SyntaxKind::FALSE_KW,
        "null" => SyntaxKind::NULL_KW,
        "undefined" => SyntaxKind::UNDEFINED_KW,
        _ => SyntaxKind::IDENT,
    }
}

fn number(cursor: &mut Cursor<'_>) -> SyntaxKind {
    cursor.eat_while(|c| c.is_ascii_digit());
    let mut is_float = false;
    if cursor.first() == '.' && cursor.second().is_ascii_digit() {
        is_float = true;
        cursor.bump();
        cursor.eat_while(|c| c.is_ascii_digit());
    }
    if matches!(cursor.first(), 'e' | 'E') {
        is_float = true;
        cursor.bump();
        if matches!(cursor.first(), '+' | '-') {
            cursor.bump();
        }
        cursor.eat_while(|c| c.is_ascii_digit());
    }
    if is_float {
        SyntaxKind::FLOAT_NUMBER
    } else {
        SyntaxKind::INT_NUMBER
    }
}

fn quoted_string(cursor: &mut Cursor<'_>, quote: char) {
    while !cursor.is_eof() {
        match cursor.first() {
            '\\' => {
                cursor.bump();
                cursor.bump();
            }
            c if c == quote => {
                cursor.bump();
                break;
            }
            _ => {
                cursor.bump();
            }
        }
    }
}

fn template_string(cursor: &mut Cursor<'_>) {
    while !cursor.is_eof() {
        match cursor.first() {
            '\\' => {
                cursor.bump();
                cursor.bump();
            }
            '`' => {
                cursor.bump();
                break;
            }
            _ => {
                cursor.bump();
            }
        }
    }
}

/// A `/` starts a regex literal unless the previous significant token could
/// itself be the end of a value, in which case `/` has to be division.
fn regex_allowed(prev: Option<SyntaxKind>) -> bool {
    match prev {
        None => true,
        Some(kind) => !matches!(
            kind,
            SyntaxKind::IDENT
                | SyntaxKind::INT_NUMBER
                | SyntaxKind::FLOAT_NUMBER
                | SyntaxKind::STRING
                | SyntaxKind::TEMPLATE_STRING
                | SyntaxKind::REGEX
                | SyntaxKind::R_PAREN
                | SyntaxKind::R_BRACK
                | SyntaxKind::THIS_KW
                | SyntaxKind::SUPER_KW
                | SyntaxKind::TRUE_KW
                | SyntaxKind::FALSE_KW
                | SyntaxKind::NULL_KW
                | SyntaxKind::UNDEFINED_KW
                | SyntaxKind::PLUS_PLUS
                | SyntaxKind::MINUS_MINUS
        ),
    }
}

fn regex_literal(cursor: &mut Cursor<'_>) {
    let mut in_class = false;
    while !cursor.is_eof() {
        match cursor.first() {
            '\\' => {
                cursor.bump();
                cursor.bump();
            }
            '[' => {
                in_class = true;
                cursor.bump();
            }
            ']' if in_class => {
                in_class = false;
                cursor.bump();
            }
            '/' if !in_class => {
                cursor.bump();
                break;
            }
            '\n' => break,
            _ => {
                cursor.bump();
            }
        }
    }
    cursor.eat_while(is_ident_continue);
}

fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\u{000B}' | '\u{000C}' | '\u{FEFF}')
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<SyntaxKind> {
        tokenize(src).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn lexes_a_const_declaration() {
        assert_eq!(
            kinds("const x = 1;"),
            vec![
                SyntaxKind::CONST_KW,
                SyntaxKind::WHITESPACE,
                SyntaxKind::IDENT,
                SyntaxKind::WHITESPACE,
                SyntaxKind::EQ,
                SyntaxKind::WHITESPACE,
                SyntaxKind::INT_NUMBER,
                SyntaxKind::SEMI,
            ]
        );
    }

    #[test]
    fn lexes_arrow_and_strict_eq() {
        assert_eq!(
            kinds("=>==="),
            vec![SyntaxKind::ARROW, SyntaxKind::EQ_EQ_EQ]
        );
    }

    #[test]
    fn lexes_template_literal_as_one_token() {
        assert_eq!(kinds("`hi ${x}`"), vec![SyntaxKind::TEMPLATE_STRING]);
    }

    #[test]
    fn keyword_lookup_does_not_shadow_identifiers() {
        assert_eq!(kinds("offset"), vec![SyntaxKind::IDENT]);
    }

    #[test]
    fn lexes_regex_literal_at_expression_start() {
        assert_eq!(kinds("/abc/g"), vec![SyntaxKind::REGEX]);
        assert_eq!(
            kinds("return /abc/;"),
            vec![SyntaxKind::RETURN_KW, SyntaxKind::WHITESPACE, SyntaxKind::REGEX, SyntaxKind::SEMI]
        );
    }

    #[test]
    fn lexes_slash_as_division_after_a_value() {
        assert_eq!(
            kinds("x / y"),
            vec![
                SyntaxKind::IDENT,
                SyntaxKind::WHITESPACE,
                SyntaxKind::SLASH,
                SyntaxKind::WHITESPACE,
                SyntaxKind::IDENT,
            ]
        );
    }

    #[test]
    fn regex_character_class_can_contain_a_slash() {
        assert_eq!(kinds("/[a/b]/"), vec![SyntaxKind::REGEX]);
    }
}
