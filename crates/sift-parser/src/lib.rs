// sift parser -- tokens to untyped AST.
//
// Recursive descent with the precedence ladder
// `OR < AND < NOT < comparison < additive < multiplicative < primary`.
// The parser knows nothing about column schemas or function specs beyond
// what the token kinds already encode; identifier resolution and typing
// happen during lowering in the engine.

pub mod ast;
pub mod parser;

pub use ast::{AstKind, AstNode};
pub use parser::{build_ast, find_clause};

use sift_common::{Catalog, Messages};

/// Convenience: tokenize and parse in one step.
///
/// Comments are dropped before parsing. Returns `None` if any stage
/// recorded an error on `messages`.
pub fn parse_source(catalog: &dyn Catalog, messages: &Messages, source: &str) -> Option<AstNode> {
    let tokens = sift_lexer::tokenize(catalog, messages, source);
    if messages.has_errors() {
        return None;
    }
    build_ast(messages, &tokens)
}
