// sift engine -- the typed half of the expression pipeline.
//
// Lowering turns the untyped AST into a call tree of `Node`s, resolution
// asks each node's `Spec` for an implementation and inserts implicit
// conversions, the simplifier folds constants, and the evaluator walks the
// result per row. Everything hangs off a `Context`.
//
// The usual flow:
//
// ```
// use std::rc::Rc;
// use sift_engine::{evaluate, Context};
//
// let mut ctx = Context::with_defaults();
// // ctx.register_column(...);
// let tree = ctx.compile("WHERE 1 + 2 = 3").unwrap();
// let result = evaluate(&ctx, &tree);
// assert!(result.as_bool());
// # let _ = Rc::new(());
// ```

pub mod ctx;
pub mod error;
pub mod eval;
pub mod interval;
pub mod lower;
pub mod names;
pub mod node;
pub mod resolve;
pub mod simplify;
pub mod specs;
pub mod tz;

pub use ctx::{Builtin, Column, Context, NodeFn, Spec, UpdateFn, UpdatePlan};
pub use error::TypeError;
pub use eval::{eval, evaluate};
pub use lower::lower;
pub use node::{common_type, Node, Value};
pub use resolve::{apply_type_conversions, convert_node};
pub use simplify::simplify;

pub use sift_common::{Catalog, DataType, Messages, Span, Token, TokenKind};
pub use sift_parser::ast::{AstKind, AstNode};
pub use sift_parser::{build_ast, find_clause};
