use std::fmt::Write as _;

use sift_common::{DataType, Span, Token, TokenKind};

/// Node kind in the untyped AST. Mostly mirrors [`TokenKind`], with the
/// parser-only kinds `List` (IN lists), `Carrier` (the BETWEEN bounds
/// holder), and `FunctionLiteral` (a spec name used without parentheses).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AstKind {
    Number,
    Operator,
    Comparison,
    And,
    Or,
    Not,
    Keyword,
    Function,
    FunctionLiteral,
    Identifier,
    Literal,
    CompoundLiteral,
    Null,
    List,
    Carrier,
}

impl AstKind {
    pub fn from_token(kind: TokenKind) -> AstKind {
        match kind {
            TokenKind::Number => AstKind::Number,
            TokenKind::Operator => AstKind::Operator,
            TokenKind::Comparison => AstKind::Comparison,
            TokenKind::And => AstKind::And,
            TokenKind::Or => AstKind::Or,
            TokenKind::Not => AstKind::Not,
            TokenKind::Keyword => AstKind::Keyword,
            TokenKind::Function => AstKind::Function,
            TokenKind::FunctionLiteral => AstKind::FunctionLiteral,
            TokenKind::Identifier => AstKind::Identifier,
            TokenKind::Literal => AstKind::Literal,
            TokenKind::CompoundLiteral => AstKind::CompoundLiteral,
            TokenKind::Null => AstKind::Null,
            // Structural tokens never become AST nodes directly.
            _ => AstKind::Keyword,
        }
    }

    /// Stable display name for dumps.
    pub fn name(self) -> &'static str {
        match self {
            AstKind::Number => "NUMBER",
            AstKind::Operator => "OPERATOR",
            AstKind::Comparison => "COMPARISON",
            AstKind::And => "AND",
            AstKind::Or => "OR",
            AstKind::Not => "NOT",
            AstKind::Keyword => "KEYWORD",
            AstKind::Function => "FUNCTION",
            AstKind::FunctionLiteral => "FUNCTION_LITERAL",
            AstKind::Identifier => "IDENTIFIER",
            AstKind::Literal => "LITERAL",
            AstKind::CompoundLiteral => "COMPOUND_LITERAL",
            AstKind::Null => "NULL",
            AstKind::List => "LIST",
            AstKind::Carrier => "TOKEN",
        }
    }
}

/// One node of the untyped AST.
///
/// `data_type` is only a hint at this stage: literal kinds carry their
/// obvious tag (`12` is INT, `'x'` is STRING, logic nodes are BOOL) while
/// identifiers stay UNKNOWN until lowering resolves them against the
/// column schema.
#[derive(Debug, Clone)]
pub struct AstNode {
    pub kind: AstKind,
    pub text: String,
    pub data_type: DataType,
    pub children: Vec<AstNode>,
    pub span: Span,
}

impl AstNode {
    pub fn new(kind: AstKind, text: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            text: text.into(),
            data_type: DataType::Unknown,
            children: Vec::new(),
            span,
        }
    }

    /// Build a leaf from a token, assigning the literal-type hints.
    pub fn from_token(token: &Token) -> Self {
        let kind = AstKind::from_token(token.kind);
        let data_type = match token.kind {
            TokenKind::Number => {
                if token.text.contains('.') {
                    DataType::Double
                } else {
                    DataType::Int
                }
            }
            TokenKind::Literal | TokenKind::CompoundLiteral => DataType::String,
            TokenKind::Comparison | TokenKind::And | TokenKind::Or | TokenKind::Not => {
                DataType::Bool
            }
            _ => DataType::Unknown,
        };
        Self {
            kind,
            text: token.text.clone(),
            data_type,
            children: Vec::new(),
            span: token.span,
        }
    }

    /// Indented tree dump, one node per line.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        self.dump_into(&mut out, 0);
        out
    }

    fn dump_into(&self, out: &mut String, depth: usize) {
        for _ in 0..depth {
            out.push_str("  ");
        }
        if self.text.is_empty() {
            let _ = writeln!(out, "[{}] (DataType: {})", self.kind.name(), self.data_type);
        } else {
            let _ = writeln!(
                out,
                "[{}] {} (DataType: {})",
                self.kind.name(),
                self.text,
                self.data_type
            );
        }
        for child in &self.children {
            child.dump_into(out, depth + 1);
        }
    }
}
