//! BETWEEN / NOT BETWEEN: inclusive range check over three arguments
//! (probe, lower, upper) promoted to a common type.

use std::cmp::Ordering;

use sift_common::DataType;

use crate::ctx::{Builtin, Context, Spec, UpdatePlan};
use crate::error::TypeError;
use crate::eval::eval;
use crate::node::{common_type, Node};

fn between_with(ctx: &Context, f: &Node, ordering_of: fn(&Node, &Node) -> Ordering, negate: bool) -> Node {
    if f.args.len() != 3 {
        return Node::bool_lit(false, true);
    }
    let value = eval(ctx, &f.args[0]);
    let lower = eval(ctx, &f.args[1]);
    let upper = eval(ctx, &f.args[2]);
    if value.is_null || lower.is_null || upper.is_null {
        return Node::bool_lit(false, true);
    }
    let inside = ordering_of(&lower, &value) != Ordering::Greater
        && ordering_of(&value, &upper) != Ordering::Greater;
    Node::bool_lit(inside != negate, false)
}

fn int_ordering(a: &Node, b: &Node) -> Ordering {
    a.as_int().cmp(&b.as_int())
}

fn double_ordering(a: &Node, b: &Node) -> Ordering {
    a.as_double().partial_cmp(&b.as_double()).unwrap_or(Ordering::Equal)
}

fn string_ordering(a: &Node, b: &Node) -> Ordering {
    let left = a.as_str().bytes().map(|b| b.to_ascii_lowercase());
    let right = b.as_str().bytes().map(|b| b.to_ascii_lowercase());
    left.cmp(right)
}

fn datetime_ordering(a: &Node, b: &Node) -> Ordering {
    a.as_epoch().cmp(&b.as_epoch())
}

fn int_between(ctx: &Context, f: &Node) -> Node {
    between_with(ctx, f, int_ordering, false)
}

fn double_between(ctx: &Context, f: &Node) -> Node {
    between_with(ctx, f, double_ordering, false)
}

fn string_between(ctx: &Context, f: &Node) -> Node {
    between_with(ctx, f, string_ordering, false)
}

fn datetime_between(ctx: &Context, f: &Node) -> Node {
    between_with(ctx, f, datetime_ordering, false)
}

fn int_not_between(ctx: &Context, f: &Node) -> Node {
    between_with(ctx, f, int_ordering, true)
}

fn double_not_between(ctx: &Context, f: &Node) -> Node {
    between_with(ctx, f, double_ordering, true)
}

fn string_not_between(ctx: &Context, f: &Node) -> Node {
    between_with(ctx, f, string_ordering, true)
}

fn datetime_not_between(ctx: &Context, f: &Node) -> Node {
    between_with(ctx, f, datetime_ordering, true)
}

static INT_BETWEEN: Builtin = Builtin { name: "int_between", summary: "Check if value is between two integers", run: int_between };
static DOUBLE_BETWEEN: Builtin = Builtin { name: "double_between", summary: "Check if value is between two doubles", run: double_between };
static STRING_BETWEEN: Builtin = Builtin { name: "string_between", summary: "Check if value is between two strings", run: string_between };
static DATETIME_BETWEEN: Builtin = Builtin { name: "datetime_between", summary: "Check if value is between two datetimes", run: datetime_between };
static INT_NOT_BETWEEN: Builtin = Builtin { name: "int_not_between", summary: "Check if value is not between two integers", run: int_not_between };
static DOUBLE_NOT_BETWEEN: Builtin = Builtin { name: "double_not_between", summary: "Check if value is not between two doubles", run: double_not_between };
static STRING_NOT_BETWEEN: Builtin = Builtin { name: "string_not_between", summary: "Check if value is not between two strings", run: string_not_between };
static DATETIME_NOT_BETWEEN: Builtin = Builtin { name: "datetime_not_between", summary: "Check if value is not between two datetimes", run: datetime_not_between };

fn update_between_impl(spec: &Spec, f: &Node, negated: bool) -> Result<UpdatePlan, TypeError> {
    if f.args.len() != 3 {
        return Err(TypeError::Arity {
            spec: spec.name,
            expected: "exactly three arguments",
        });
    }

    let common = common_type(
        common_type(f.args[0].data_type, f.args[1].data_type),
        f.args[2].data_type,
    );

    let builtin: &'static Builtin = match (common, negated) {
        (DataType::Int, false) => &INT_BETWEEN,
        (DataType::Double, false) => &DOUBLE_BETWEEN,
        (DataType::String, false) => &STRING_BETWEEN,
        (DataType::DateTime, false) => &DATETIME_BETWEEN,
        (DataType::Int, true) => &INT_NOT_BETWEEN,
        (DataType::Double, true) => &DOUBLE_NOT_BETWEEN,
        (DataType::String, true) => &STRING_NOT_BETWEEN,
        (DataType::DateTime, true) => &DATETIME_NOT_BETWEEN,
        _ => {
            return Err(TypeError::Incompatible {
                spec: spec.name,
                detail: "only supports string, numeric, and datetime types",
            });
        }
    };

    Ok(UpdatePlan::new(vec![common; 3], DataType::Bool, builtin))
}

fn update_between(_ctx: &Context, spec: &Spec, f: &Node) -> Result<UpdatePlan, TypeError> {
    update_between_impl(spec, f, false)
}

fn update_not_between(_ctx: &Context, spec: &Spec, f: &Node) -> Result<UpdatePlan, TypeError> {
    update_between_impl(spec, f, true)
}

static BETWEEN_SPEC: Spec = Spec {
    name: "BETWEEN",
    description: "Checks if a value is between two values.",
    volatile: false,
    update: update_between,
};

static NOT_BETWEEN_SPEC: Spec = Spec {
    name: "NOT BETWEEN",
    description: "Checks if a value is not between two values.",
    volatile: false,
    update: update_not_between,
};

pub fn register(ctx: &mut Context) {
    ctx.register_spec(&BETWEEN_SPEC);
    ctx.register_spec(&NOT_BETWEEN_SPEC);

    ctx.register_builtin(&INT_BETWEEN);
    ctx.register_builtin(&DOUBLE_BETWEEN);
    ctx.register_builtin(&STRING_BETWEEN);
    ctx.register_builtin(&DATETIME_BETWEEN);
    ctx.register_builtin(&INT_NOT_BETWEEN);
    ctx.register_builtin(&DOUBLE_NOT_BETWEEN);
    ctx.register_builtin(&STRING_NOT_BETWEEN);
    ctx.register_builtin(&DATETIME_NOT_BETWEEN);
}
