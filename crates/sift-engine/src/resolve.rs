//! Type resolution: spec-driven overload selection and implicit
//! conversion insertion.
//!
//! Works post-order. Binary operators and comparisons first go through a
//! pre-pass that reconciles operand types (preferring to convert a literal
//! toward a column or function result), then every call node asks its spec
//! for an [`UpdatePlan`] and gets its arguments wrapped in CONVERT calls
//! where the plan's expected types disagree.

use sift_common::DataType;
use sift_parser::ast::AstKind;

use crate::ctx::{Context, UpdatePlan};
use crate::node::Node;

/// Resolve the whole tree in place. Errors are recorded on the context;
/// nodes that could not be resolved keep `builtin = None`.
pub fn apply_type_conversions(ctx: &Context, node: &mut Node) {
    for arg in &mut node.args {
        apply_type_conversions(ctx, arg);
    }

    if matches!(node.origin, AstKind::Operator | AstKind::Comparison) && node.args.len() == 2 {
        binary_pre_pass(ctx, node);
    }

    // A bare function literal resolves only if its spec accepts the empty
    // argument list (the NOW family). A spec name used as a plain word --
    // the field argument of DATEPART, say -- stays an inert string.
    if node.origin == AstKind::FunctionLiteral {
        if let Some(spec) = node.spec {
            if let Ok(plan) = (spec.update)(ctx, spec, node) {
                apply_plan(ctx, node, plan);
            }
        }
        return;
    }

    if matches!(
        node.origin,
        AstKind::Function
            | AstKind::Operator
            | AstKind::Comparison
            | AstKind::And
            | AstKind::Or
            | AstKind::Not
    ) {
        if let Some(spec) = node.spec {
            match (spec.update)(ctx, spec, node) {
                Ok(plan) => apply_plan(ctx, node, plan),
                Err(err) => ctx.error(err.to_string()),
            }
        }
    }
}

/// Install a plan on its call node: trim the argument list to the retained
/// range, wrap arguments whose types disagree with the plan in CONVERT
/// calls, and take over the return type and implementation.
fn apply_plan(ctx: &Context, node: &mut Node, plan: UpdatePlan) {
    if plan.retain != (0..node.args.len()) {
        let kept: Vec<Node> = node.args.drain(plan.retain.clone()).collect();
        node.args = kept;
    }
    for (i, expected) in plan.expected.iter().enumerate() {
        if *expected != DataType::Unknown
            && i < node.args.len()
            && node.args[i].data_type != *expected
        {
            let arg = std::mem::replace(&mut node.args[i], Node::bool_lit(false, true));
            node.args[i] = convert_node(ctx, arg, *expected);
        }
    }
    node.data_type = plan.return_type;
    node.builtin = plan.builtin;
}

/// The operand-reconciliation promotion: int/double mix to double, any
/// datetime wins, anything else meets at string.
fn pair_promotion(a: DataType, b: DataType) -> DataType {
    use DataType::*;
    if a == b {
        return a;
    }
    if matches!((a, b), (Int, Double) | (Double, Int)) {
        return Double;
    }
    if a == DateTime || b == DateTime {
        return DateTime;
    }
    String
}

/// Reconcile the two operands of a binary operator/comparison before its
/// spec runs.
///
/// Skipped for `::` (the cast resolves through the conversion matrix), for
/// a datetime paired with an INTERVAL compound literal, for arithmetic
/// whose left side is a datetime (the arithmetic spec dispatches on the
/// right operand's type), and for list operands (the IN spec owns list
/// promotion).
fn binary_pre_pass(ctx: &Context, node: &mut Node) {
    if node.text == "::" {
        return;
    }

    let left_type = node.args[0].data_type;
    let right_type = node.args[1].data_type;

    if left_type == DataType::DateTime
        && node.args[1].origin == AstKind::CompoundLiteral
        && node.args[1].text.len() >= 8
        && node.args[1].text[..8].eq_ignore_ascii_case("INTERVAL")
    {
        return;
    }
    if node.origin == AstKind::Operator && left_type == DataType::DateTime {
        return;
    }
    if node.args[1].origin == AstKind::List {
        return;
    }
    if left_type == right_type {
        return;
    }

    let left_is_ref = matches!(node.args[0].origin, AstKind::Identifier | AstKind::Function);
    let right_is_ref = matches!(node.args[1].origin, AstKind::Identifier | AstKind::Function);

    if left_is_ref && node.args[1].is_literal() {
        let arg = std::mem::replace(&mut node.args[1], Node::bool_lit(false, true));
        node.args[1] = convert_node(ctx, arg, left_type);
    } else if node.args[0].is_literal() && right_is_ref {
        let arg = std::mem::replace(&mut node.args[0], Node::bool_lit(false, true));
        node.args[0] = convert_node(ctx, arg, right_type);
    } else {
        let common = pair_promotion(left_type, right_type);
        if left_type != common {
            let arg = std::mem::replace(&mut node.args[0], Node::bool_lit(false, true));
            node.args[0] = convert_node(ctx, arg, common);
        }
        if right_type != common {
            let arg = std::mem::replace(&mut node.args[1], Node::bool_lit(false, true));
            node.args[1] = convert_node(ctx, arg, common);
        }
    }
}

/// Wrap `arg` in a resolved `CONVERT(<type>, arg)` call.
///
/// Two shortcuts: an argument already of the target type is returned
/// unchanged, and a NULL literal is retagged to the target type instead of
/// being wrapped (unknown promotes to the other side).
pub fn convert_node(ctx: &Context, arg: Node, target: DataType) -> Node {
    if arg.data_type == target {
        return arg;
    }
    if arg.is_null && arg.is_literal() && arg.data_type == DataType::Unknown {
        let mut retagged = arg;
        retagged.data_type = target;
        return retagged;
    }

    let mut node = Node::function("CONVERT");
    node.span = arg.span;
    node.data_type = target;
    node.args = vec![Node::string_lit(target.name(), false), arg];
    node.spec = ctx.spec("CONVERT");

    if let Some(spec) = node.spec {
        match (spec.update)(ctx, spec, &node) {
            Ok(plan) => apply_plan(ctx, &mut node, plan),
            Err(err) => ctx.error(err.to_string()),
        }
    }

    node
}
