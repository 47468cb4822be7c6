//! SUM: row-local sum over its arguments, skipping nulls.

use sift_common::DataType;

use crate::ctx::{Builtin, Context, Spec, UpdatePlan};
use crate::error::TypeError;
use crate::eval::eval;
use crate::node::Node;

fn sum(ctx: &Context, f: &Node) -> Node {
    let mut total = 0.0;
    for arg in &f.args {
        let child = eval(ctx, arg);
        if child.is_null {
            continue;
        }
        total += child.as_double();
    }
    Node::double_lit(total, false)
}

static SUM: Builtin = Builtin {
    name: "sum",
    summary: "Calculates the sum of numeric values.",
    run: sum,
};

fn update_sum(_ctx: &Context, spec: &Spec, f: &Node) -> Result<UpdatePlan, TypeError> {
    if f.args.is_empty() {
        return Err(TypeError::Arity {
            spec: spec.name,
            expected: "at least one argument",
        });
    }
    Ok(UpdatePlan::new(
        vec![DataType::Double; f.args.len()],
        DataType::Double,
        &SUM,
    ))
}

static SUM_SPEC: Spec = Spec {
    name: "SUM",
    description: "Calculates the sum of numeric values.",
    volatile: false,
    update: update_sum,
};

pub fn register(ctx: &mut Context) {
    ctx.register_spec(&SUM_SPEC);
    ctx.register_builtin(&SUM);
}
