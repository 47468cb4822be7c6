//! IN / NOT IN over a literal list.
//!
//! The probe and every element promote to one common type (mixed types
//! meet at string). An unmatched probe with a null among the candidates
//! yields null; an empty list yields null.
//!
//! NOT IN deliberately deviates from strict SQL three-valued logic: it is
//! the plain negation of the IN match, so `3 NOT IN (1, 2, NULL)` is true
//! where SQL would say null. Callers relying on SQL semantics must filter
//! nulls out of the list themselves.

use sift_common::DataType;
use sift_parser::ast::AstKind;

use crate::ctx::{Builtin, Context, Spec, UpdatePlan};
use crate::error::TypeError;
use crate::eval::eval;
use crate::node::Node;

/// The IN promotion: identical types keep, int/double meet at double,
/// anything else meets at string.
fn in_common_type(a: DataType, b: DataType) -> DataType {
    if a == b {
        return a;
    }
    if matches!(
        (a, b),
        (DataType::Int, DataType::Double) | (DataType::Double, DataType::Int)
    ) {
        return DataType::Double;
    }
    DataType::String
}

fn in_with(ctx: &Context, f: &Node, matches_probe: fn(&Node, &Node) -> bool) -> Node {
    if f.args.len() != 2 {
        return Node::bool_lit(false, true);
    }
    let value = eval(ctx, &f.args[0]);
    // The list may sit under an element-wise conversion; evaluate first.
    let list = eval(ctx, &f.args[1]);
    if value.is_null || list.origin != AstKind::List {
        return Node::bool_lit(false, true);
    }

    let mut has_null = list.args.is_empty();
    for element in &list.args {
        let element = eval(ctx, element);
        if element.is_null {
            has_null = true;
            continue;
        }
        if matches_probe(&element, &value) {
            return Node::bool_lit(true, false);
        }
    }
    Node::bool_lit(false, has_null)
}

fn int_matches(a: &Node, b: &Node) -> bool {
    a.as_int() == b.as_int()
}

fn double_matches(a: &Node, b: &Node) -> bool {
    a.as_double() == b.as_double()
}

fn string_matches(a: &Node, b: &Node) -> bool {
    a.as_str().eq_ignore_ascii_case(b.as_str())
}

fn int_in(ctx: &Context, f: &Node) -> Node {
    in_with(ctx, f, int_matches)
}

fn double_in(ctx: &Context, f: &Node) -> Node {
    in_with(ctx, f, double_matches)
}

fn string_in(ctx: &Context, f: &Node) -> Node {
    in_with(ctx, f, string_matches)
}

/// See the module docs for the NOT IN null rule.
fn not_in_with(ctx: &Context, f: &Node, run_in: fn(&Context, &Node) -> Node) -> Node {
    let in_result = run_in(ctx, f);
    Node::bool_lit(!in_result.as_bool(), false)
}

fn int_not_in(ctx: &Context, f: &Node) -> Node {
    not_in_with(ctx, f, int_in)
}

fn double_not_in(ctx: &Context, f: &Node) -> Node {
    not_in_with(ctx, f, double_in)
}

fn string_not_in(ctx: &Context, f: &Node) -> Node {
    not_in_with(ctx, f, string_in)
}

static INT_IN: Builtin = Builtin { name: "int_in", summary: "Check if an integer is in a list", run: int_in };
static DOUBLE_IN: Builtin = Builtin { name: "double_in", summary: "Check if a double is in a list", run: double_in };
static STRING_IN: Builtin = Builtin { name: "string_in", summary: "Check if a string is in a list", run: string_in };
static INT_NOT_IN: Builtin = Builtin { name: "int_not_in", summary: "Check if an integer is NOT in a list", run: int_not_in };
static DOUBLE_NOT_IN: Builtin = Builtin { name: "double_not_in", summary: "Check if a double is NOT in a list", run: double_not_in };
static STRING_NOT_IN: Builtin = Builtin { name: "string_not_in", summary: "Check if a string is NOT in a list", run: string_not_in };

fn update_in_impl(spec: &Spec, f: &Node, negated: bool) -> Result<UpdatePlan, TypeError> {
    if f.args.len() != 2 {
        return Err(TypeError::Arity {
            spec: spec.name,
            expected: "exactly two arguments: a value and a list",
        });
    }
    let list = &f.args[1];
    if list.origin != AstKind::List {
        return Err(TypeError::Incompatible {
            spec: spec.name,
            detail: "requires a list as its second argument",
        });
    }

    let mut common = f.args[0].data_type;
    for element in &list.args {
        common = in_common_type(common, element.data_type);
    }

    let builtin: &'static Builtin = match (common, negated) {
        (DataType::Int, false) => &INT_IN,
        (DataType::Double, false) => &DOUBLE_IN,
        (DataType::String, false) => &STRING_IN,
        (DataType::Int, true) => &INT_NOT_IN,
        (DataType::Double, true) => &DOUBLE_NOT_IN,
        (DataType::String, true) => &STRING_NOT_IN,
        _ => {
            return Err(TypeError::Unsupported {
                spec: spec.name,
                data_type: common,
            });
        }
    };

    Ok(UpdatePlan::new(vec![common; 2], DataType::Bool, builtin))
}

fn update_in(_ctx: &Context, spec: &Spec, f: &Node) -> Result<UpdatePlan, TypeError> {
    update_in_impl(spec, f, false)
}

fn update_not_in(_ctx: &Context, spec: &Spec, f: &Node) -> Result<UpdatePlan, TypeError> {
    update_in_impl(spec, f, true)
}

static IN_SPEC: Spec = Spec {
    name: "IN",
    description: "Checks if a value is in a list (supports type promotion).",
    volatile: false,
    update: update_in,
};

static NOT_IN_SPEC: Spec = Spec {
    name: "NOT IN",
    description: "Checks if a value is not in a list (supports type promotion).",
    volatile: false,
    update: update_not_in,
};

pub fn register(ctx: &mut Context) {
    ctx.register_spec(&IN_SPEC);
    ctx.register_spec(&NOT_IN_SPEC);

    ctx.register_builtin(&INT_IN);
    ctx.register_builtin(&DOUBLE_IN);
    ctx.register_builtin(&STRING_IN);
    ctx.register_builtin(&INT_NOT_IN);
    ctx.register_builtin(&DOUBLE_NOT_IN);
    ctx.register_builtin(&STRING_NOT_IN);
}
