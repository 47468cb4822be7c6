//! The simplifier: constant folding, boolean algebra, and no-op
//! conversion removal, interleaved in one post-order pass.

use sift_common::DataType;
use sift_parser::ast::AstKind;

use crate::ctx::Context;
use crate::node::Node;

/// Simplify the tree in place.
///
/// A call node whose arguments are all literals folds to the literal
/// result of its thunk, except volatile specs (the NOW family) unless the
/// context opts in. AND/OR collapse around non-null bool literals, and
/// conversions whose target equals their operand's type are removed.
pub fn simplify(ctx: &Context, node: &mut Node) {
    if node.args.is_empty() && node.builtin.is_none() {
        return;
    }

    for arg in &mut node.args {
        simplify(ctx, arg);
    }

    fold_constants(ctx, node);
    drop_noop_convert(node);
    fold_logic(node);
}

fn fold_constants(ctx: &Context, node: &mut Node) {
    let all_literals = node.args.iter().all(Node::is_literal);
    if !all_literals {
        return;
    }
    let Some(builtin) = node.builtin else {
        return;
    };
    // Column getters carry no spec and only make sense against a row.
    if node.spec.is_none() && ctx.current_row().is_none() {
        return;
    }
    if node.spec.is_some_and(|s| s.volatile) && !ctx.fold_volatile() {
        return;
    }
    let folded = (builtin.run)(ctx, node);
    *node = folded;
}

/// A conversion that ended up converting to its operand's own type has no
/// implementation; collapse it onto the operand.
fn drop_noop_convert(node: &mut Node) {
    let is_convert = node
        .spec
        .is_some_and(|s| matches!(s.name, "CONVERT" | "CAST" | "::"));
    if is_convert
        && node.builtin.is_none()
        && node.args.len() == 1
        && node.args[0].data_type == node.data_type
    {
        let child = node.args.remove(0);
        *node = child;
    }
}

fn is_bool_literal(node: &Node, value: bool) -> bool {
    node.is_literal()
        && node.data_type == DataType::Bool
        && !node.is_null
        && node.as_bool() == value
}

fn fold_logic(node: &mut Node) {
    match node.origin {
        AstKind::And => {
            if node.args.iter().any(|a| is_bool_literal(a, false)) {
                *node = Node::bool_lit(false, false);
                return;
            }
            node.args.retain(|a| !is_bool_literal(a, true));
            if node.args.len() == 1 {
                let child = node.args.remove(0);
                *node = child;
            }
        }
        AstKind::Or => {
            if node.args.iter().any(|a| is_bool_literal(a, true)) {
                *node = Node::bool_lit(true, false);
                return;
            }
            node.args.retain(|a| !is_bool_literal(a, false));
            if node.args.len() == 1 {
                let child = node.args.remove(0);
                *node = child;
            }
        }
        _ => {}
    }
}
