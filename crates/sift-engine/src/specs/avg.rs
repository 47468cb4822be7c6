//! AVG: row-local mean over its arguments. Any null argument makes the
//! result null. Arguments must be numeric.

use sift_common::DataType;

use crate::ctx::{Builtin, Context, Spec, UpdatePlan};
use crate::error::TypeError;
use crate::eval::eval;
use crate::node::Node;

fn avg(ctx: &Context, f: &Node) -> Node {
    let mut total = 0.0;
    for arg in &f.args {
        let child = eval(ctx, arg);
        if child.is_null {
            return Node::double_lit(0.0, true);
        }
        total += child.as_double();
    }
    Node::double_lit(total / f.args.len() as f64, false)
}

static AVG: Builtin = Builtin {
    name: "avg",
    summary: "Calculates the average of numeric values.",
    run: avg,
};

fn update_avg(_ctx: &Context, spec: &Spec, f: &Node) -> Result<UpdatePlan, TypeError> {
    if f.args.is_empty() {
        return Err(TypeError::Arity {
            spec: spec.name,
            expected: "at least one argument",
        });
    }
    for arg in &f.args {
        if !matches!(arg.data_type, DataType::Int | DataType::Double) {
            return Err(TypeError::Incompatible {
                spec: spec.name,
                detail: "only supports numeric data types (INT, DOUBLE)",
            });
        }
    }
    Ok(UpdatePlan::new(
        vec![DataType::Double; f.args.len()],
        DataType::Double,
        &AVG,
    ))
}

static AVG_SPEC: Spec = Spec {
    name: "AVG",
    description: "Calculates the average of numeric values.",
    volatile: false,
    update: update_avg,
};

pub fn register(ctx: &mut Context) {
    ctx.register_spec(&AVG_SPEC);
    ctx.register_builtin(&AVG);
}
