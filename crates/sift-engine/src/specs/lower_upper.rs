//! LOWER / UPPER.

use sift_common::DataType;

use crate::ctx::{Builtin, Context, Spec, UpdatePlan};
use crate::error::TypeError;
use crate::eval::eval;
use crate::node::Node;

fn lower(ctx: &Context, f: &Node) -> Node {
    let child = eval(ctx, &f.args[0]);
    if child.is_null {
        return Node::string_lit("", true);
    }
    Node::string_lit(&child.as_str().to_lowercase(), false)
}

fn upper(ctx: &Context, f: &Node) -> Node {
    let child = eval(ctx, &f.args[0]);
    if child.is_null {
        return Node::string_lit("", true);
    }
    Node::string_lit(&child.as_str().to_uppercase(), false)
}

static LOWER: Builtin = Builtin {
    name: "lower",
    summary: "Converts a string to lowercase.",
    run: lower,
};

static UPPER: Builtin = Builtin {
    name: "upper",
    summary: "Converts a string to uppercase.",
    run: upper,
};

fn update_case(
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
    if f.args[0].data_type != DataType::String {
        return Err(TypeError::Unsupported {
            spec: spec.name,
            data_type: f.args[0].data_type,
        });
    }
    Ok(UpdatePlan::new(
        vec![DataType::String],
        DataType::String,
        builtin,
    ))
}

fn update_lower(_ctx: &Context, spec: &Spec, f: &Node) -> Result<UpdatePlan, TypeError> {
    update_case(spec, f, &LOWER)
}

fn update_upper(_ctx: &Context, spec: &Spec, f: &Node) -> Result<UpdatePlan, TypeError> {
    update_case(spec, f, &UPPER)
}

static LOWER_SPEC: Spec = Spec {
    name: "LOWER",
    description: "Converts a string to lowercase.",
    volatile: false,
    update: update_lower,
};

static UPPER_SPEC: Spec = Spec {
    name: "UPPER",
    description: "Converts a string to uppercase.",
    volatile: false,
    update: update_upper,
};

pub fn register(ctx: &mut Context) {
    ctx.register_spec(&LOWER_SPEC);
    ctx.register_spec(&UPPER_SPEC);

    ctx.register_builtin(&LOWER);
    ctx.register_builtin(&UPPER);
}
