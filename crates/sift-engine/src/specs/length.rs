//! LENGTH: byte length of a string.

use sift_common::DataType;

use crate::ctx::{Builtin, Context, Spec, UpdatePlan};
use crate::error::TypeError;
use crate::eval::eval;
use crate::node::Node;

fn string_length(ctx: &Context, f: &Node) -> Node {
    let child = eval(ctx, &f.args[0]);
    if child.is_null {
        return Node::int_lit(0, true);
    }
    Node::int_lit(child.as_str().len() as i32, false)
}

static STRING_LENGTH: Builtin = Builtin {
    name: "string_length",
    summary: "Returns the length of a string.",
    run: string_length,
};

fn update_length(_ctx: &Context, spec: &Spec, f: &Node) -> Result<UpdatePlan, TypeError> {
    if f.args.len() != 1 {
        return Err(TypeError::Arity {
            spec: spec.name,
            expected: "exactly one argument",
        });
    }
    Ok(UpdatePlan::new(
        vec![DataType::String],
        DataType::Int,
        &STRING_LENGTH,
    ))
}

static LENGTH_SPEC: Spec = Spec {
    name: "LENGTH",
    description: "Returns the length of a string.",
    volatile: false,
    update: update_length,
};

pub fn register(ctx: &mut Context) {
    ctx.register_spec(&LENGTH_SPEC);
    ctx.register_builtin(&STRING_LENGTH);
}
