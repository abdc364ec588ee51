//! The flat kind space shared by tokens and CST nodes for both the JS and
//! TS dialects. One enum covers both token and node kinds so it can double
//! as `rowan`'s `SyntaxKind` without a second mapping table, matching the
//! teacher's `parser/generated/syntax_kind.rs` layout.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, strum::EnumIter, strum::Display)]
#[repr(u16)]
#[allow(non_camel_case_types)]
pub enum SyntaxKind {
    // -- trivia --
    WHITESPACE,
    COMMENT,

    // -- literals / identifiers --
    IDENT,
    INT_NUMBER,
    FLOAT_NUMBER,
    STRING,
    TEMPLATE_STRING,
    REGEX,
    TRUE_KW,
    FALSE_KW,
    NULL_KW,
    UNDEFINED_KW,

    // -- keywords --
    VAR_KW,
    LET_KW,
    CONST_KW,
    FUNCTION_KW,
    RETURN_KW,
    IF_KW,
    ELSE_KW,
    FOR_KW,
    WHILE_KW,
    DO_KW,
    SWITCH_KW,
    CASE_KW,
    DEFAULT_KW,
    BREAK_KW,
    CONTINUE_KW,
    TRY_KW,
    CATCH_KW,
    FINALLY_KW,
    THROW_KW,
    NEW_KW,
    DELETE_KW,
    TYPEOF_KW,
    INSTANCEOF_KW,
    IN_KW,
    OF_KW,
    THIS_KW,
    CLASS_KW,
    EXTENDS_KW,
    SUPER_KW,
    STATIC_KW,
    GET_KW,
    SET_KW,
    IMPORT_KW,
    EXPORT_KW,
    FROM_KW,
    AS_KW,
    ASYNC_KW,
    AWAIT_KW,
    YIELD_KW,
    INTERFACE_KW,
    DECLARE_KW,
    TYPE_KW,

    // -- punctuation / operators --
    L_PAREN,
    R_PAREN,
    L_BRACE,
    R_BRACE,
    L_BRACK,
    R_BRACK,
    SEMI,
    COMMA,
    DOT,
    DOT_DOT_DOT,
    COLON,
    QUESTION,
    ARROW,
    EQ,
    EQ_EQ,
    EQ_EQ_EQ,
    BANG_EQ,
    BANG_EQ_EQ,
    BANG,
    PLUS,
    MINUS,
    STAR,
    SLASH,
    PERCENT,
    PLUS_EQ,
    MINUS_EQ,
    STAR_EQ,
    SLASH_EQ,
    PLUS_PLUS,
    MINUS_MINUS,
    AMP_AMP,
    PIPE_PIPE,
    AMP,
    PIPE,
    CARET,
    LT,
    GT,
    LT_EQ,
    GT_EQ,
    AT,

    // -- node kinds --
    PROGRAM,
    VAR_DECL,
    VAR_DECLARATOR,
    FUNCTION_DECL,
    ARROW_FUNCTION,
    PARAM_LIST,
    PARAM,
    BLOCK_STMT,
    EXPR_STMT,
    IF_STMT,
    FOR_STMT,
    FOR_IN_STMT,
    FOR_OF_STMT,
    WHILE_STMT,
    DO_WHILE_STMT,
    SWITCH_STMT,
    CASE_CLAUSE,
    DEFAULT_CLAUSE,
    BREAK_STMT,
    CONTINUE_STMT,
    RETURN_STMT,
    THROW_STMT,
    TRY_STMT,
    CATCH_CLAUSE,
    CLASS_DECL,
    CLASS_BODY,
    METHOD_DEF,
    PROPERTY_DEF,
    IMPORT_DECL,
    IMPORT_SPECIFIER,
    IMPORT_NAMESPACE_SPECIFIER,
    IMPORT_DEFAULT_SPECIFIER,
    EXPORT_DECL,
    EXPORT_DEFAULT_DECL,

    CALL_EXPR,
    NEW_EXPR,
    MEMBER_EXPR,
    BINARY_EXPR,
    LOGICAL_EXPR,
    UNARY_EXPR,
    UPDATE_EXPR,
    ASSIGN_EXPR,
    CONDITIONAL_EXPR,
    SEQUENCE_EXPR,
    ARRAY_EXPR,
    OBJECT_EXPR,
    PROPERTY,
    SPREAD_ELEMENT,
    TEMPLATE_LITERAL,
    TAGGED_TEMPLATE,
    ARGUMENTS,
    ARRAY_PATTERN,
    OBJECT_PATTERN,
    ASSIGN_PATTERN,
    REST_ELEMENT,
    PAREN_EXPR,

    TYPE_ANNOTATION,
    INTERFACE_DECL,
    INTERFACE_MEMBER,
    TYPE_ALIAS_DECL,
    AS_EXPR,

    ERROR,
    EOF,
}

impl SyntaxKind {
    pub fn is_trivia(self) -> bool {
        matches!(self, SyntaxKind::WHITESPACE | SyntaxKind::COMMENT)
    }
}

/// Glue between `rowan`'s erased `u16` kind space and [`SyntaxKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TythonLanguage {}

impl rowan::Language for TythonLanguage {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> SyntaxKind {
        assert!(raw.0 <= SyntaxKind::EOF as u16);
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }

    fn kind_to_raw(kind: SyntaxKind) -> rowan::SyntaxKind {
        rowan::SyntaxKind(kind as u16)
    }
}

pub type SyntaxNode = rowan::SyntaxNode<TythonLanguage>;
pub type SyntaxToken = rowan::SyntaxToken<TythonLanguage>;
pub type SyntaxElement = rowan::NodeOrToken<SyntaxNode, SyntaxToken>;
pub type SyntaxNodeChildren = rowan::SyntaxNodeChildren<TythonLanguage>;
