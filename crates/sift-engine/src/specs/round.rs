//! ROUND / FLOOR / CEIL. Numeric arguments arrive as doubles; ROUND
//! optionally takes a decimal-place count.

use sift_common::DataType;

use crate::ctx::{Builtin, Context, Spec, UpdatePlan};
use crate::error::TypeError;
use crate::eval::eval;
use crate::node::Node;

fn round(ctx: &Context, f: &Node) -> Node {
    let value = eval(ctx, &f.args[0]);
    if value.is_null {
        return Node::double_lit(0.0, true);
    }
    Node::double_lit(value.as_double().round(), false)
}

fn round_with_decimal_places(ctx: &Context, f: &Node) -> Node {
    let value = eval(ctx, &f.args[0]);
    let places = eval(ctx, &f.args[1]);
    if value.is_null || places.is_null {
        return Node::double_lit(0.0, true);
    }
    let factor = 10f64.powi(places.as_int());
    Node::double_lit((value.as_double() * factor).round() / factor, false)
}

fn floor(ctx: &Context, f: &Node) -> Node {
    let value = eval(ctx, &f.args[0]);
    if value.is_null {
        return Node::double_lit(0.0, true);
    }
    Node::double_lit(value.as_double().floor(), false)
}

fn ceil(ctx: &Context, f: &Node) -> Node {
    let value = eval(ctx, &f.args[0]);
    if value.is_null {
        return Node::double_lit(0.0, true);
    }
    Node::double_lit(value.as_double().ceil(), false)
}

static ROUND: Builtin = Builtin {
    name: "round",
    summary: "Rounds a number to the nearest integer.",
    run: round,
};

static ROUND_WITH_DECIMAL_PLACES: Builtin = Builtin {
    name: "round_with_decimal_places",
    summary: "Rounds a number to the specified number of decimal places.",
    run: round_with_decimal_places,
};

static FLOOR: Builtin = Builtin {
    name: "floor",
    summary: "Rounds a number down to the nearest integer.",
    run: floor,
};

static CEIL: Builtin = Builtin {
    name: "ceil",
    summary: "Rounds a number up to the nearest integer.",
    run: ceil,
};

fn update_round(_ctx: &Context, spec: &Spec, f: &Node) -> Result<UpdatePlan, TypeError> {
    if f.args.is_empty() || f.args.len() > 2 {
        return Err(TypeError::Arity {
            spec: spec.name,
            expected: "one or two arguments",
        });
    }
    if f.args.len() == 1 {
        Ok(UpdatePlan::new(
            vec![DataType::Double],
            DataType::Double,
            &ROUND,
        ))
    } else {
        Ok(UpdatePlan::new(
            vec![DataType::Double, DataType::Int],
            DataType::Double,
            &ROUND_WITH_DECIMAL_PLACES,
        ))
    }
}

fn update_single(
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
    Ok(UpdatePlan::new(
        vec![DataType::Double],
        DataType::Double,
        builtin,
    ))
}

fn update_floor(_ctx: &Context, spec: &Spec, f: &Node) -> Result<UpdatePlan, TypeError> {
    update_single(spec, f, &FLOOR)
}

fn update_ceil(_ctx: &Context, spec: &Spec, f: &Node) -> Result<UpdatePlan, TypeError> {
    update_single(spec, f, &CEIL)
}

static ROUND_SPEC: Spec = Spec {
    name: "ROUND",
    description: "Rounds a number to the nearest integer or specified decimal places.",
    volatile: false,
    update: update_round,
};

static FLOOR_SPEC: Spec = Spec {
    name: "FLOOR",
    description: "Rounds a number down to the nearest integer.",
    volatile: false,
    update: update_floor,
};

static CEIL_SPEC: Spec = Spec {
    name: "CEIL",
    description: "Rounds a number up to the nearest integer.",
    volatile: false,
    update: update_ceil,
};

pub fn register(ctx: &mut Context) {
    ctx.register_spec(&ROUND_SPEC);
    ctx.register_spec(&FLOOR_SPEC);
    ctx.register_spec(&CEIL_SPEC);

    ctx.register_builtin(&ROUND);
    ctx.register_builtin(&ROUND_WITH_DECIMAL_PLACES);
    ctx.register_builtin(&FLOOR);
    ctx.register_builtin(&CEIL);
}
