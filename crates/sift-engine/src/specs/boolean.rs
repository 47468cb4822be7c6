//! Logical AND, OR, NOT with three-valued semantics.
//!
//! AND is false if any operand is false, null if none is false but one is
//! null. OR is true if any operand is true, null if none is true but one
//! is null. NOT of null is null. Evaluation short-circuits on the
//! deciding operand.

use sift_common::DataType;

use crate::ctx::{Builtin, Context, Spec, UpdatePlan};
use crate::error::TypeError;
use crate::eval::eval;
use crate::node::Node;

fn logical_and(ctx: &Context, f: &Node) -> Node {
    let mut saw_null = false;
    for arg in &f.args {
        let child = eval(ctx, arg);
        if child.is_null {
            saw_null = true;
            continue;
        }
        if !child.as_bool() {
            return Node::bool_lit(false, false);
        }
    }
    if saw_null {
        Node::bool_lit(false, true)
    } else {
        Node::bool_lit(true, false)
    }
}

fn logical_or(ctx: &Context, f: &Node) -> Node {
    let mut saw_null = false;
    for arg in &f.args {
        let child = eval(ctx, arg);
        if child.is_null {
            saw_null = true;
            continue;
        }
        if child.as_bool() {
            return Node::bool_lit(true, false);
        }
    }
    if saw_null {
        Node::bool_lit(false, true)
    } else {
        Node::bool_lit(false, false)
    }
}

fn logical_not(ctx: &Context, f: &Node) -> Node {
    let child = eval(ctx, &f.args[0]);
    if child.is_null {
        return Node::bool_lit(false, true);
    }
    Node::bool_lit(!child.as_bool(), false)
}

static AND: Builtin = Builtin {
    name: "and",
    summary: "Performs logical AND on boolean values.",
    run: logical_and,
};

static OR: Builtin = Builtin {
    name: "or",
    summary: "Performs logical OR on boolean values.",
    run: logical_or,
};

static NOT: Builtin = Builtin {
    name: "not",
    summary: "Performs logical NOT on a boolean value.",
    run: logical_not,
};

fn update_and(_ctx: &Context, _spec: &Spec, f: &Node) -> Result<UpdatePlan, TypeError> {
    Ok(UpdatePlan::new(
        vec![DataType::Bool; f.args.len()],
        DataType::Bool,
        &AND,
    ))
}

fn update_or(_ctx: &Context, _spec: &Spec, f: &Node) -> Result<UpdatePlan, TypeError> {
    Ok(UpdatePlan::new(
        vec![DataType::Bool; f.args.len()],
        DataType::Bool,
        &OR,
    ))
}

fn update_not(_ctx: &Context, spec: &Spec, f: &Node) -> Result<UpdatePlan, TypeError> {
    if f.args.len() != 1 {
        return Err(TypeError::Arity {
            spec: spec.name,
            expected: "exactly one argument",
        });
    }
    Ok(UpdatePlan::new(vec![DataType::Bool], DataType::Bool, &NOT))
}

static AND_SPEC: Spec = Spec {
    name: "AND",
    description: "Logical AND operation.",
    volatile: false,
    update: update_and,
};

static OR_SPEC: Spec = Spec {
    name: "OR",
    description: "Logical OR operation.",
    volatile: false,
    update: update_or,
};

static NOT_SPEC: Spec = Spec {
    name: "NOT",
    description: "Logical NOT operation.",
    volatile: false,
    update: update_not,
};

pub fn register(ctx: &mut Context) {
    ctx.register_spec(&AND_SPEC);
    ctx.register_spec(&OR_SPEC);
    ctx.register_spec(&NOT_SPEC);

    ctx.register_builtin(&AND);
    ctx.register_builtin(&OR);
    ctx.register_builtin(&NOT);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bools(values: &[Option<bool>]) -> Node {
        let args = values
            .iter()
            .map(|v| match v {
                Some(b) => Node::bool_lit(*b, false),
                None => Node::bool_lit(false, true),
            })
            .collect();
        let mut node = Node::function("AND");
        node.args = args;
        node
    }

    #[test]
    fn three_valued_and() {
        let ctx = Context::new();
        // null AND false = false
        let result = logical_and(&ctx, &bools(&[None, Some(false)]));
        assert!(!result.is_null);
        assert!(!result.as_bool());
        // null AND true = null
        assert!(logical_and(&ctx, &bools(&[None, Some(true)])).is_null);
        // true AND true = true
        let result = logical_and(&ctx, &bools(&[Some(true), Some(true)]));
        assert!(result.as_bool());
    }

    #[test]
    fn three_valued_or() {
        let ctx = Context::new();
        // null OR true = true
        let result = logical_or(&ctx, &bools(&[None, Some(true)]));
        assert!(!result.is_null);
        assert!(result.as_bool());
        // null OR false = null
        assert!(logical_or(&ctx, &bools(&[None, Some(false)])).is_null);
        // false OR false = false
        let result = logical_or(&ctx, &bools(&[Some(false), Some(false)]));
        assert!(!result.as_bool());
        assert!(!result.is_null);
    }

    #[test]
    fn not_propagates_null() {
        let ctx = Context::new();
        assert!(logical_not(&ctx, &bools(&[None])).is_null);
        assert!(!logical_not(&ctx, &bools(&[Some(true)])).as_bool());
        assert!(logical_not(&ctx, &bools(&[Some(false)])).as_bool());
    }
}
