// Shared vocabulary for the sift SQL expression engine.
//
// Everything the pipeline crates need to agree on lives here: byte-offset
// spans, the token model produced by the lexer, the scalar result-type tags,
// the append-only error/warning sink, and the `Catalog` trait through which
// the tokenizer classifies identifiers without depending on the engine.

pub mod catalog;
pub mod datetime;
pub mod messages;
pub mod span;
pub mod token;
pub mod types;

pub use catalog::Catalog;
pub use messages::Messages;
pub use span::Span;
pub use token::{Token, TokenKind};
pub use types::DataType;
