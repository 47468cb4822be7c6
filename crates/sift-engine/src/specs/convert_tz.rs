//! CONVERT_TZ: shift a UTC datetime into a named timezone's local clock.

use sift_common::DataType;

use crate::ctx::{Builtin, Context, Spec, UpdatePlan};
use crate::error::TypeError;
use crate::eval::eval;
use crate::node::Node;
use crate::tz;

fn convert_tz(ctx: &Context, f: &Node) -> Node {
    if f.args.len() != 2 {
        return Node::datetime_lit(0, true);
    }
    let datetime_node = eval(ctx, &f.args[0]);
    let zone_node = eval(ctx, &f.args[1]);
    if datetime_node.is_null || zone_node.is_null {
        return Node::datetime_lit(0, true);
    }
    match tz::local_time(zone_node.as_str(), datetime_node.as_epoch()) {
        Some(local) => Node::datetime_lit(local, false),
        None => {
            ctx.error(format!(
                "Invalid or unknown target timezone: {}",
                zone_node.as_str()
            ));
            Node::datetime_lit(0, true)
        }
    }
}

static CONVERT_TZ: Builtin = Builtin {
    name: "convert_tz",
    summary: "Converts a datetime value from UTC to another timezone.",
    run: convert_tz,
};

fn update_convert_tz(_ctx: &Context, spec: &Spec, f: &Node) -> Result<UpdatePlan, TypeError> {
    if f.args.len() != 2 {
        return Err(TypeError::Arity {
            spec: spec.name,
            expected: "exactly two arguments: datetime and timezone name",
        });
    }
    Ok(UpdatePlan::new(
        vec![DataType::DateTime, DataType::String],
        DataType::DateTime,
        &CONVERT_TZ,
    ))
}

static CONVERT_TZ_SPEC: Spec = Spec {
    name: "CONVERT_TZ",
    description: "Converts a datetime value from UTC to another timezone.",
    volatile: false,
    update: update_convert_tz,
};

pub fn register(ctx: &mut Context) {
    ctx.register_spec(&CONVERT_TZ_SPEC);
    ctx.register_builtin(&CONVERT_TZ);
}
