//! MIN / MAX: row-local reductions across the argument list. Any null
//! argument makes the result null. Mixed int/double promotes to double;
//! other mixes keep the first argument's type and convert the rest.

use sift_common::DataType;

use crate::ctx::{Builtin, Context, Spec, UpdatePlan};
use crate::error::TypeError;
use crate::eval::eval;
use crate::node::Node;

macro_rules! reduce {
    ($ctx:expr, $f:expr, $get:ident, $make:ident, $keep:expr) => {{
        let mut best = None;
        for arg in &$f.args {
            let child = eval($ctx, arg);
            if child.is_null {
                return Node::$make(Default::default(), true);
            }
            let value = child.$get().to_owned();
            best = Some(match best {
                None => value,
                Some(current) => $keep(current, value),
            });
        }
        match best {
            Some(value) => Node::$make(value, false),
            None => Node::$make(Default::default(), true),
        }
    }};
}

fn bool_min(ctx: &Context, f: &Node) -> Node {
    let mut result = true;
    for arg in &f.args {
        let child = eval(ctx, arg);
        if child.is_null {
            return Node::bool_lit(false, true);
        }
        result = result && child.as_bool();
    }
    Node::bool_lit(result, false)
}

fn bool_max(ctx: &Context, f: &Node) -> Node {
    let mut result = false;
    for arg in &f.args {
        let child = eval(ctx, arg);
        if child.is_null {
            return Node::bool_lit(false, true);
        }
        result = result || child.as_bool();
    }
    Node::bool_lit(result, false)
}

fn int_min(ctx: &Context, f: &Node) -> Node {
    reduce!(ctx, f, as_int, int_lit, |a: i32, b: i32| a.min(b))
}

fn int_max(ctx: &Context, f: &Node) -> Node {
    reduce!(ctx, f, as_int, int_lit, |a: i32, b: i32| a.max(b))
}

fn double_min(ctx: &Context, f: &Node) -> Node {
    reduce!(ctx, f, as_double, double_lit, |a: f64, b: f64| a.min(b))
}

fn double_max(ctx: &Context, f: &Node) -> Node {
    reduce!(ctx, f, as_double, double_lit, |a: f64, b: f64| a.max(b))
}

fn datetime_min(ctx: &Context, f: &Node) -> Node {
    reduce!(ctx, f, as_epoch, datetime_lit, |a: i64, b: i64| a.min(b))
}

fn datetime_max(ctx: &Context, f: &Node) -> Node {
    reduce!(ctx, f, as_epoch, datetime_lit, |a: i64, b: i64| a.max(b))
}

fn string_reduce(ctx: &Context, f: &Node, want_less: bool) -> Node {
    let mut best: Option<String> = None;
    for arg in &f.args {
        let child = eval(ctx, arg);
        if child.is_null {
            return Node::string_lit("", true);
        }
        let value = child.as_str().to_string();
        best = Some(match best {
            None => value,
            Some(current) => {
                let ordering = current
                    .bytes()
                    .map(|b| b.to_ascii_lowercase())
                    .cmp(value.bytes().map(|b| b.to_ascii_lowercase()));
                let value_wins = if want_less {
                    ordering == std::cmp::Ordering::Greater
                } else {
                    ordering == std::cmp::Ordering::Less
                };
                if value_wins {
                    value
                } else {
                    current
                }
            }
        });
    }
    match best {
        Some(value) => Node::string_lit(&value, false),
        None => Node::string_lit("", true),
    }
}

fn string_min(ctx: &Context, f: &Node) -> Node {
    string_reduce(ctx, f, true)
}

fn string_max(ctx: &Context, f: &Node) -> Node {
    string_reduce(ctx, f, false)
}

static BOOL_MIN: Builtin = Builtin { name: "bool_min", summary: "Returns the minimum value of a boolean list.", run: bool_min };
static BOOL_MAX: Builtin = Builtin { name: "bool_max", summary: "Returns the maximum value of a boolean list.", run: bool_max };
static INT_MIN: Builtin = Builtin { name: "int_min", summary: "Returns the minimum value of an integer list.", run: int_min };
static INT_MAX: Builtin = Builtin { name: "int_max", summary: "Returns the maximum value of an integer list.", run: int_max };
static DOUBLE_MIN: Builtin = Builtin { name: "double_min", summary: "Returns the minimum value of a double list.", run: double_min };
static DOUBLE_MAX: Builtin = Builtin { name: "double_max", summary: "Returns the maximum value of a double list.", run: double_max };
static STRING_MIN: Builtin = Builtin { name: "string_min", summary: "Returns the minimum value of a string list.", run: string_min };
static STRING_MAX: Builtin = Builtin { name: "string_max", summary: "Returns the maximum value of a string list.", run: string_max };
static DATETIME_MIN: Builtin = Builtin { name: "datetime_min", summary: "Returns the minimum value of a datetime list.", run: datetime_min };
static DATETIME_MAX: Builtin = Builtin { name: "datetime_max", summary: "Returns the maximum value of a datetime list.", run: datetime_max };

fn update_min_max(spec: &Spec, f: &Node, want_min: bool) -> Result<UpdatePlan, TypeError> {
    if f.args.is_empty() {
        return Err(TypeError::Arity {
            spec: spec.name,
            expected: "at least one argument",
        });
    }

    let mut common = f.args[0].data_type;
    if common == DataType::Int
        && f.args[1..].iter().any(|a| a.data_type == DataType::Double)
    {
        common = DataType::Double;
    }

    let builtin: &'static Builtin = match (common, want_min) {
        (DataType::Bool, true) => &BOOL_MIN,
        (DataType::Bool, false) => &BOOL_MAX,
        (DataType::Int, true) => &INT_MIN,
        (DataType::Int, false) => &INT_MAX,
        (DataType::Double, true) => &DOUBLE_MIN,
        (DataType::Double, false) => &DOUBLE_MAX,
        (DataType::String, true) => &STRING_MIN,
        (DataType::String, false) => &STRING_MAX,
        (DataType::DateTime, true) => &DATETIME_MIN,
        (DataType::DateTime, false) => &DATETIME_MAX,
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

fn update_min(_ctx: &Context, spec: &Spec, f: &Node) -> Result<UpdatePlan, TypeError> {
    update_min_max(spec, f, true)
}

fn update_max(_ctx: &Context, spec: &Spec, f: &Node) -> Result<UpdatePlan, TypeError> {
    update_min_max(spec, f, false)
}

static MIN_SPEC: Spec = Spec {
    name: "MIN",
    description: "Returns the minimum value.",
    volatile: false,
    update: update_min,
};

static MAX_SPEC: Spec = Spec {
    name: "MAX",
    description: "Returns the maximum value.",
    volatile: false,
    update: update_max,
};

pub fn register(ctx: &mut Context) {
    ctx.register_spec(&MIN_SPEC);
    ctx.register_spec(&MAX_SPEC);

    for builtin in [
        &BOOL_MIN, &BOOL_MAX, &INT_MIN, &INT_MAX, &DOUBLE_MIN, &DOUBLE_MAX,
        &STRING_MIN, &STRING_MAX, &DATETIME_MIN, &DATETIME_MAX,
    ] {
        ctx.register_builtin(builtin);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(args: Vec<Node>) -> Node {
        let mut node = Node::function("MIN");
        node.args = args;
        node
    }

    #[test]
    fn int_reduction() {
        let ctx = Context::new();
        let node = call(vec![
            Node::int_lit(5, false),
            Node::int_lit(2, false),
            Node::int_lit(9, false),
        ]);
        assert_eq!(int_min(&ctx, &node).as_int(), 2);
        assert_eq!(int_max(&ctx, &node).as_int(), 9);
    }

    #[test]
    fn null_makes_null() {
        let ctx = Context::new();
        let node = call(vec![Node::int_lit(5, false), Node::int_lit(0, true)]);
        assert!(int_min(&ctx, &node).is_null);
        assert!(int_max(&ctx, &node).is_null);
    }

    #[test]
    fn string_reduction_ignores_case() {
        let ctx = Context::new();
        let node = call(vec![
            Node::string_lit("Banana", false),
            Node::string_lit("apple", false),
        ]);
        assert_eq!(string_min(&ctx, &node).as_str(), "apple");
        assert_eq!(string_max(&ctx, &node).as_str(), "Banana");
    }

    #[test]
    fn update_promotes_int_double_mix() {
        let ctx = Context::new();
        let node = call(vec![Node::int_lit(1, false), Node::double_lit(0.5, false)]);
        let plan = update_min(&ctx, &MIN_SPEC, &node).unwrap();
        assert_eq!(plan.return_type, DataType::Double);
        assert_eq!(plan.builtin.unwrap().name, "double_min");
    }
}
