//! Comparison operators `< <= = == !=`.
//!
//! `>` and `>=` never reach this module; the parser rewrites them into
//! the flipped forms. Exactly two arguments, promoted to a common type;
//! null on either side yields a null bool. String comparison is
//! case-insensitive; datetimes compare on their epochs.

use std::cmp::Ordering;

use sift_common::DataType;

use crate::ctx::{Builtin, Context, Spec, UpdatePlan};
use crate::error::TypeError;
use crate::eval::eval;
use crate::node::Node;

#[derive(Clone, Copy)]
enum CmpOp {
    Less,
    LessOrEqual,
    NotEqual,
    Equal,
}

impl CmpOp {
    fn apply(self, ordering: Ordering) -> bool {
        match self {
            CmpOp::Less => ordering == Ordering::Less,
            CmpOp::LessOrEqual => ordering != Ordering::Greater,
            CmpOp::NotEqual => ordering != Ordering::Equal,
            CmpOp::Equal => ordering == Ordering::Equal,
        }
    }
}

fn compare_with(ctx: &Context, f: &Node, op: CmpOp, ordering_of: fn(&Node, &Node) -> Ordering) -> Node {
    if f.args.len() != 2 {
        return Node::bool_lit(false, true);
    }
    let left = eval(ctx, &f.args[0]);
    let right = eval(ctx, &f.args[1]);
    if left.is_null || right.is_null {
        return Node::bool_lit(false, true);
    }
    Node::bool_lit(op.apply(ordering_of(&left, &right)), false)
}

fn bool_ordering(a: &Node, b: &Node) -> Ordering {
    a.as_bool().cmp(&b.as_bool())
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

macro_rules! cmp_builtin {
    ($fn_name:ident, $static_name:ident, $name:literal, $summary:literal, $op:expr, $ordering:expr) => {
        fn $fn_name(ctx: &Context, f: &Node) -> Node {
            compare_with(ctx, f, $op, $ordering)
        }
        static $static_name: Builtin = Builtin {
            name: $name,
            summary: $summary,
            run: $fn_name,
        };
    };
}

cmp_builtin!(bool_less, BOOL_LESS, "bool_less", "Compare two boolean values", CmpOp::Less, bool_ordering);
cmp_builtin!(bool_less_or_equal, BOOL_LESS_OR_EQUAL, "bool_less_or_equal", "Compare two boolean values", CmpOp::LessOrEqual, bool_ordering);
cmp_builtin!(bool_not_equal, BOOL_NOT_EQUAL, "bool_not_equal", "Compare two boolean values", CmpOp::NotEqual, bool_ordering);
cmp_builtin!(bool_equal, BOOL_EQUAL, "bool_equal", "Compare two boolean values", CmpOp::Equal, bool_ordering);
cmp_builtin!(int_less, INT_LESS, "int_less", "Compare two integer values", CmpOp::Less, int_ordering);
cmp_builtin!(int_less_or_equal, INT_LESS_OR_EQUAL, "int_less_or_equal", "Compare two integer values", CmpOp::LessOrEqual, int_ordering);
cmp_builtin!(int_not_equal, INT_NOT_EQUAL, "int_not_equal", "Compare two integer values", CmpOp::NotEqual, int_ordering);
cmp_builtin!(int_equal, INT_EQUAL, "int_equal", "Compare two integer values", CmpOp::Equal, int_ordering);
cmp_builtin!(double_less, DOUBLE_LESS, "double_less", "Compare two double values", CmpOp::Less, double_ordering);
cmp_builtin!(double_less_or_equal, DOUBLE_LESS_OR_EQUAL, "double_less_or_equal", "Compare two double values", CmpOp::LessOrEqual, double_ordering);
cmp_builtin!(double_not_equal, DOUBLE_NOT_EQUAL, "double_not_equal", "Compare two double values", CmpOp::NotEqual, double_ordering);
cmp_builtin!(double_equal, DOUBLE_EQUAL, "double_equal", "Compare two double values", CmpOp::Equal, double_ordering);
cmp_builtin!(string_less, STRING_LESS, "string_less", "Compare two string values", CmpOp::Less, string_ordering);
cmp_builtin!(string_less_or_equal, STRING_LESS_OR_EQUAL, "string_less_or_equal", "Compare two string values", CmpOp::LessOrEqual, string_ordering);
cmp_builtin!(string_not_equal, STRING_NOT_EQUAL, "string_not_equal", "Compare two string values", CmpOp::NotEqual, string_ordering);
cmp_builtin!(string_equal, STRING_EQUAL, "string_equal", "Compare two string values", CmpOp::Equal, string_ordering);
cmp_builtin!(datetime_less, DATETIME_LESS, "datetime_less", "Compare two datetime values", CmpOp::Less, datetime_ordering);
cmp_builtin!(datetime_less_or_equal, DATETIME_LESS_OR_EQUAL, "datetime_less_or_equal", "Compare two datetime values", CmpOp::LessOrEqual, datetime_ordering);
cmp_builtin!(datetime_not_equal, DATETIME_NOT_EQUAL, "datetime_not_equal", "Compare two datetime values", CmpOp::NotEqual, datetime_ordering);
cmp_builtin!(datetime_equal, DATETIME_EQUAL, "datetime_equal", "Compare two datetime values", CmpOp::Equal, datetime_ordering);

fn builtin_for(data_type: DataType, op: CmpOp) -> Option<&'static Builtin> {
    let builtin = match (data_type, op) {
        (DataType::Bool, CmpOp::Less) => &BOOL_LESS,
        (DataType::Bool, CmpOp::LessOrEqual) => &BOOL_LESS_OR_EQUAL,
        (DataType::Bool, CmpOp::NotEqual) => &BOOL_NOT_EQUAL,
        (DataType::Bool, CmpOp::Equal) => &BOOL_EQUAL,
        (DataType::Int, CmpOp::Less) => &INT_LESS,
        (DataType::Int, CmpOp::LessOrEqual) => &INT_LESS_OR_EQUAL,
        (DataType::Int, CmpOp::NotEqual) => &INT_NOT_EQUAL,
        (DataType::Int, CmpOp::Equal) => &INT_EQUAL,
        (DataType::Double, CmpOp::Less) => &DOUBLE_LESS,
        (DataType::Double, CmpOp::LessOrEqual) => &DOUBLE_LESS_OR_EQUAL,
        (DataType::Double, CmpOp::NotEqual) => &DOUBLE_NOT_EQUAL,
        (DataType::Double, CmpOp::Equal) => &DOUBLE_EQUAL,
        (DataType::String, CmpOp::Less) => &STRING_LESS,
        (DataType::String, CmpOp::LessOrEqual) => &STRING_LESS_OR_EQUAL,
        (DataType::String, CmpOp::NotEqual) => &STRING_NOT_EQUAL,
        (DataType::String, CmpOp::Equal) => &STRING_EQUAL,
        (DataType::DateTime, CmpOp::Less) => &DATETIME_LESS,
        (DataType::DateTime, CmpOp::LessOrEqual) => &DATETIME_LESS_OR_EQUAL,
        (DataType::DateTime, CmpOp::NotEqual) => &DATETIME_NOT_EQUAL,
        (DataType::DateTime, CmpOp::Equal) => &DATETIME_EQUAL,
        _ => return None,
    };
    Some(builtin)
}

fn update_comparison(spec: &Spec, f: &Node, op: CmpOp) -> Result<UpdatePlan, TypeError> {
    if f.args.len() != 2 {
        return Err(TypeError::Arity {
            spec: spec.name,
            expected: "exactly two arguments",
        });
    }

    let mut common = f.args[0].data_type;
    if common == DataType::Int && f.args[1].data_type == DataType::Double {
        common = DataType::Double;
    }

    let builtin = builtin_for(common, op).ok_or(TypeError::Unsupported {
        spec: spec.name,
        data_type: common,
    })?;

    Ok(UpdatePlan::new(vec![common; 2], DataType::Bool, builtin))
}

fn update_less(_ctx: &Context, spec: &Spec, f: &Node) -> Result<UpdatePlan, TypeError> {
    update_comparison(spec, f, CmpOp::Less)
}

fn update_less_or_equal(_ctx: &Context, spec: &Spec, f: &Node) -> Result<UpdatePlan, TypeError> {
    update_comparison(spec, f, CmpOp::LessOrEqual)
}

fn update_not_equal(_ctx: &Context, spec: &Spec, f: &Node) -> Result<UpdatePlan, TypeError> {
    update_comparison(spec, f, CmpOp::NotEqual)
}

fn update_equal(_ctx: &Context, spec: &Spec, f: &Node) -> Result<UpdatePlan, TypeError> {
    update_comparison(spec, f, CmpOp::Equal)
}

static LESS_SPEC: Spec = Spec {
    name: "<",
    description: "Less than",
    volatile: false,
    update: update_less,
};

static LESS_OR_EQUAL_SPEC: Spec = Spec {
    name: "<=",
    description: "Less than or equal",
    volatile: false,
    update: update_less_or_equal,
};

static NOT_EQUAL_SPEC: Spec = Spec {
    name: "!=",
    description: "Not equal",
    volatile: false,
    update: update_not_equal,
};

static EQUAL_SPEC: Spec = Spec {
    name: "=",
    description: "Equal",
    volatile: false,
    update: update_equal,
};

static DOUBLE_EQUAL_SPEC: Spec = Spec {
    name: "==",
    description: "Equal",
    volatile: false,
    update: update_equal,
};

pub fn register(ctx: &mut Context) {
    ctx.register_spec(&LESS_SPEC);
    ctx.register_spec(&LESS_OR_EQUAL_SPEC);
    ctx.register_spec(&NOT_EQUAL_SPEC);
    ctx.register_spec(&EQUAL_SPEC);
    ctx.register_spec(&DOUBLE_EQUAL_SPEC);

    for builtin in [
        &BOOL_LESS, &BOOL_LESS_OR_EQUAL, &BOOL_NOT_EQUAL, &BOOL_EQUAL,
        &INT_LESS, &INT_LESS_OR_EQUAL, &INT_NOT_EQUAL, &INT_EQUAL,
        &DOUBLE_LESS, &DOUBLE_LESS_OR_EQUAL, &DOUBLE_NOT_EQUAL, &DOUBLE_EQUAL,
        &STRING_LESS, &STRING_LESS_OR_EQUAL, &STRING_NOT_EQUAL, &STRING_EQUAL,
        &DATETIME_LESS, &DATETIME_LESS_OR_EQUAL, &DATETIME_NOT_EQUAL, &DATETIME_EQUAL,
    ] {
        ctx.register_builtin(builtin);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(left: Node, right: Node) -> Node {
        let mut node = Node::function("=");
        node.args = vec![left, right];
        node
    }

    #[test]
    fn string_comparison_ignores_case() {
        let ctx = Context::new();
        let node = pair(Node::string_lit("Bob", false), Node::string_lit("bob", false));
        assert!(string_equal(&ctx, &node).as_bool());

        let node = pair(Node::string_lit("Apple", false), Node::string_lit("banana", false));
        assert!(string_less(&ctx, &node).as_bool());
    }

    #[test]
    fn null_operand_yields_null_bool() {
        let ctx = Context::new();
        let node = pair(Node::int_lit(3, true), Node::int_lit(3, false));
        let result = int_equal(&ctx, &node);
        assert!(result.is_null);
        assert_eq!(result.data_type, DataType::Bool);
    }

    #[test]
    fn datetime_compares_on_epoch() {
        let ctx = Context::new();
        let node = pair(Node::datetime_lit(100, false), Node::datetime_lit(200, false));
        assert!(datetime_less(&ctx, &node).as_bool());
        assert!(!datetime_equal(&ctx, &node).as_bool());
    }

    #[test]
    fn int_double_promotes() {
        let ctx = Context::new();
        let node = pair(Node::int_lit(1, false), Node::double_lit(1.5, false));
        let spec = &EQUAL_SPEC;
        let plan = update_equal(&ctx, spec, &node).unwrap();
        assert_eq!(plan.expected, vec![DataType::Double, DataType::Double]);
        assert_eq!(plan.builtin.unwrap().name, "double_equal");
    }

    #[test]
    fn unknown_type_is_rejected() {
        let ctx = Context::new();
        let node = pair(Node::function("mystery"), Node::int_lit(1, false));
        assert!(update_equal(&ctx, &EQUAL_SPEC, &node).is_err());
    }
}
