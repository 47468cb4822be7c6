//! The evaluator: a one-step dispatch.
//!
//! All interesting behavior (short-circuiting, null propagation, argument
//! evaluation order) lives inside the builtins themselves; the walker just
//! invokes the resolved thunk. A node with no thunk evaluates to itself.

use crate::ctx::Context;
use crate::node::Node;

/// Evaluate a node: run its resolved thunk, or return the node itself.
pub fn eval(ctx: &Context, node: &Node) -> Node {
    match node.builtin {
        Some(builtin) => (builtin.run)(ctx, node),
        None => node.clone(),
    }
}

/// Entry point honoring the error contract: once the context has recorded
/// an error, the tree is unfit for evaluation and the result is a null
/// bool without walking anything.
pub fn evaluate(ctx: &Context, node: &Node) -> Node {
    if ctx.messages().has_errors() {
        return Node::bool_lit(false, true);
    }
    eval(ctx, node)
}
