use serde::Serialize;

use crate::span::Span;

/// A token produced by the sift lexer.
///
/// `text` is the token's canonical spelling, which may differ from the raw
/// source slice: `<>` is rewritten to `!=`, numeric underscores are stripped,
/// string bodies are unescaped, and compound literals collapse the keyword
/// and the body into a single `TIMESTAMP <body>` / `INTERVAL <body>` payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub span: Span,
    /// Sequence number within the token stream, assigned after lexing.
    pub id: u32,
}

impl Token {
    /// Create a new token. The sequence id is patched in by the lexer once
    /// the whole stream is known.
    pub fn new(kind: TokenKind, text: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            text: text.into(),
            span,
            id: 0,
        }
    }
}

/// Every kind of token the sift lexer can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TokenKind {
    /// Numeric literal (integer or decimal, underscores stripped).
    Number,
    /// Arithmetic operator (`+ - * /`), `::`, or a stray `:`.
    Operator,
    /// Comparison operator (`= == != < <= > >=`) or LIKE/IN/BETWEEN.
    Comparison,
    And,
    Or,
    Not,
    OpenParen,
    CloseParen,
    OpenBracket,
    CloseBracket,
    Comma,
    Semicolon,
    /// A reserved keyword (SELECT, FROM, WHERE, AS, IS, type names, ...).
    Keyword,
    /// A name registered in the spec registry.
    Function,
    /// A spec name used without parentheses (e.g. CURRENT_TIMESTAMP).
    /// Produced by the parser, never by the lexer.
    FunctionLiteral,
    /// `--` or `/* */` comment, body included.
    Comment,
    /// An unclassified name, resolved against the column schema later.
    Identifier,
    /// Single-quoted string literal, body unescaped.
    Literal,
    /// `TIMESTAMP <body>` or `INTERVAL <body>` as a single literal unit.
    CompoundLiteral,
    /// The NULL literal.
    Null,
}

impl TokenKind {
    /// Stable display name, matching what the dump harness prints.
    pub fn name(self) -> &'static str {
        match self {
            TokenKind::Number => "NUMBER",
            TokenKind::Operator => "OPERATOR",
            TokenKind::Comparison => "COMPARISON",
            TokenKind::And => "AND",
            TokenKind::Or => "OR",
            TokenKind::Not => "NOT",
            TokenKind::OpenParen => "OPEN_PAREN",
            TokenKind::CloseParen => "CLOSE_PAREN",
            TokenKind::OpenBracket => "OPEN_BRACKET",
            TokenKind::CloseBracket => "CLOSE_BRACKET",
            TokenKind::Comma => "COMMA",
            TokenKind::Semicolon => "SEMICOLON",
            TokenKind::Keyword => "KEYWORD",
            TokenKind::Function => "FUNCTION",
            TokenKind::FunctionLiteral => "FUNCTION_LITERAL",
            TokenKind::Comment => "COMMENT",
            TokenKind::Identifier => "IDENTIFIER",
            TokenKind::Literal => "LITERAL",
            TokenKind::CompoundLiteral => "COMPOUND_LITERAL",
            TokenKind::Null => "NULL",
        }
    }
}
