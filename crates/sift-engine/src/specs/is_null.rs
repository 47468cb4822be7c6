//! IS NULL / IS NOT NULL. One argument of any type; the result is never
//! null.

use crate::ctx::{Builtin, Context, Spec, UpdatePlan};
use crate::error::TypeError;
use crate::eval::eval;
use crate::node::Node;
use sift_common::DataType;

fn is_null(ctx: &Context, f: &Node) -> Node {
    if f.args.len() != 1 {
        return Node::bool_lit(false, true);
    }
    let child = eval(ctx, &f.args[0]);
    Node::bool_lit(child.is_null, false)
}

fn is_not_null(ctx: &Context, f: &Node) -> Node {
    if f.args.len() != 1 {
        return Node::bool_lit(false, true);
    }
    let child = eval(ctx, &f.args[0]);
    Node::bool_lit(!child.is_null, false)
}

static IS_NULL: Builtin = Builtin {
    name: "is_null",
    summary: "Check if a value is NULL.",
    run: is_null,
};

static IS_NOT_NULL: Builtin = Builtin {
    name: "is_not_null",
    summary: "Check if a value is NOT NULL.",
    run: is_not_null,
};

fn update_impl(
    spec: &Spec,
    f: &Node,
    builtin: &'static Builtin,
) -> Result<UpdatePlan, TypeError> {
    if f.args.len() != 1 {
        return Err(TypeError::Arity {
            spec: spec.name,
            expected: "exactly one argument",
        });
    }
    // Any argument type is acceptable.
    Ok(UpdatePlan::new(
        vec![f.args[0].data_type],
        DataType::Bool,
        builtin,
    ))
}

fn update_is_null(_ctx: &Context, spec: &Spec, f: &Node) -> Result<UpdatePlan, TypeError> {
    update_impl(spec, f, &IS_NULL)
}

fn update_is_not_null(_ctx: &Context, spec: &Spec, f: &Node) -> Result<UpdatePlan, TypeError> {
    update_impl(spec, f, &IS_NOT_NULL)
}

static IS_NULL_SPEC: Spec = Spec {
    name: "IS NULL",
    description: "Checks if a value is NULL.",
    volatile: false,
    update: update_is_null,
};

static IS_NOT_NULL_SPEC: Spec = Spec {
    name: "IS NOT NULL",
    description: "Checks if a value is NOT NULL.",
    volatile: false,
    update: update_is_not_null,
};

pub fn register(ctx: &mut Context) {
    ctx.register_spec(&IS_NULL_SPEC);
    ctx.register_spec(&IS_NOT_NULL_SPEC);

    ctx.register_builtin(&IS_NULL);
    ctx.register_builtin(&IS_NOT_NULL);
}
