//! COALESCE: the first non-null argument, or null of the promoted type.
//! Arguments must share a type, except int/double which meet at double.

use sift_common::DataType;

use crate::ctx::{Builtin, Context, Spec, UpdatePlan};
use crate::error::TypeError;
use crate::eval::eval;
use crate::node::Node;

fn first_non_null(ctx: &Context, f: &Node) -> Option<Node> {
    for arg in &f.args {
        let child = eval(ctx, arg);
        if !child.is_null {
            return Some(child);
        }
    }
    None
}

fn bool_coalesce(ctx: &Context, f: &Node) -> Node {
    match first_non_null(ctx, f) {
        Some(child) => Node::bool_lit(child.as_bool(), false),
        None => Node::bool_lit(false, true),
    }
}

fn int_coalesce(ctx: &Context, f: &Node) -> Node {
    match first_non_null(ctx, f) {
        Some(child) => Node::int_lit(child.as_int(), false),
        None => Node::int_lit(0, true),
    }
}

fn double_coalesce(ctx: &Context, f: &Node) -> Node {
    match first_non_null(ctx, f) {
        Some(child) => Node::double_lit(child.as_double(), false),
        None => Node::double_lit(0.0, true),
    }
}

fn string_coalesce(ctx: &Context, f: &Node) -> Node {
    match first_non_null(ctx, f) {
        Some(child) => Node::string_lit(child.as_str(), false),
        None => Node::string_lit("", true),
    }
}

fn datetime_coalesce(ctx: &Context, f: &Node) -> Node {
    match first_non_null(ctx, f) {
        Some(child) => Node::datetime_lit(child.as_epoch(), false),
        None => Node::datetime_lit(0, true),
    }
}

static BOOL_COALESCE: Builtin = Builtin { name: "bool_coalesce", summary: "Returns the first non-NULL boolean value.", run: bool_coalesce };
static INT_COALESCE: Builtin = Builtin { name: "int_coalesce", summary: "Returns the first non-NULL integer value.", run: int_coalesce };
static DOUBLE_COALESCE: Builtin = Builtin { name: "double_coalesce", summary: "Returns the first non-NULL double value.", run: double_coalesce };
static STRING_COALESCE: Builtin = Builtin { name: "string_coalesce", summary: "Returns the first non-NULL string value.", run: string_coalesce };
static DATETIME_COALESCE: Builtin = Builtin { name: "datetime_coalesce", summary: "Returns the first non-NULL datetime value.", run: datetime_coalesce };

fn update_coalesce(_ctx: &Context, spec: &Spec, f: &Node) -> Result<UpdatePlan, TypeError> {
    if f.args.is_empty() {
        return Err(TypeError::Arity {
            spec: spec.name,
            expected: "at least one argument",
        });
    }

    let mut common = f.args[0].data_type;
    for arg in &f.args[1..] {
        // Null literals were retagged already; Unknown shows up only for
        // bare NULL arguments, which adopt the common type.
        if arg.data_type == common || arg.data_type == DataType::Unknown {
            continue;
        }
        if common == DataType::Unknown {
            common = arg.data_type;
            continue;
        }
        if matches!(
            (common, arg.data_type),
            (DataType::Int, DataType::Double) | (DataType::Double, DataType::Int)
        ) {
            common = DataType::Double;
        } else {
            return Err(TypeError::Incompatible {
                spec: spec.name,
                detail: "arguments must have compatible types",
            });
        }
    }

    let builtin: &'static Builtin = match common {
        DataType::Bool => &BOOL_COALESCE,
        DataType::Int => &INT_COALESCE,
        DataType::Double => &DOUBLE_COALESCE,
        DataType::String => &STRING_COALESCE,
        DataType::DateTime => &DATETIME_COALESCE,
        _ => {
            return Err(TypeError::Unsupported {
                spec: spec.name,
                data_type: common,
            });
        }
    };

    Ok(UpdatePlan::new(
        vec![common; f.args.len()],
        common,
        builtin,
    ))
}

static COALESCE_SPEC: Spec = Spec {
    name: "COALESCE",
    description: "Returns the first non-NULL value from the list of arguments.",
    volatile: false,
    update: update_coalesce,
};

pub fn register(ctx: &mut Context) {
    ctx.register_spec(&COALESCE_SPEC);

    ctx.register_builtin(&BOOL_COALESCE);
    ctx.register_builtin(&INT_COALESCE);
    ctx.register_builtin(&DOUBLE_COALESCE);
    ctx.register_builtin(&STRING_COALESCE);
    ctx.register_builtin(&DATETIME_COALESCE);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(args: Vec<Node>) -> Node {
        let mut node = Node::function("COALESCE");
        node.args = args;
        node
    }

    #[test]
    fn first_non_null_wins() {
        let ctx = Context::new();
        let node = call(vec![
            Node::int_lit(0, true),
            Node::int_lit(7, false),
            Node::int_lit(9, false),
        ]);
        let result = int_coalesce(&ctx, &node);
        assert_eq!(result.as_int(), 7);
        assert!(!result.is_null);
    }

    #[test]
    fn all_null_is_null() {
        let ctx = Context::new();
        let node = call(vec![Node::string_lit("", true), Node::string_lit("", true)]);
        assert!(string_coalesce(&ctx, &node).is_null);
    }

    #[test]
    fn update_promotes_numeric_mix() {
        let ctx = Context::new();
        let node = call(vec![Node::int_lit(1, false), Node::double_lit(2.0, false)]);
        let plan = update_coalesce(&ctx, &COALESCE_SPEC, &node).unwrap();
        assert_eq!(plan.return_type, DataType::Double);
    }

    #[test]
    fn update_rejects_mixed_string_and_int() {
        let ctx = Context::new();
        let node = call(vec![Node::int_lit(1, false), Node::string_lit("x", false)]);
        assert!(update_coalesce(&ctx, &COALESCE_SPEC, &node).is_err());
    }
}
