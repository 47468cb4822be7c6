//! IS TRUE / IS NOT TRUE / IS FALSE / IS NOT FALSE.
//!
//! Null is distinct from both truth values: `IS TRUE(null)` and
//! `IS FALSE(null)` are false, their negations true.

use sift_common::DataType;

use crate::ctx::{Builtin, Context, Spec, UpdatePlan};
use crate::error::TypeError;
use crate::eval::eval;
use crate::node::Node;

fn is_true(ctx: &Context, f: &Node) -> Node {
    if f.args.len() != 1 {
        return Node::bool_lit(false, true);
    }
    let child = eval(ctx, &f.args[0]);
    Node::bool_lit(!child.is_null && child.as_bool(), false)
}

fn is_not_true(ctx: &Context, f: &Node) -> Node {
    if f.args.len() != 1 {
        return Node::bool_lit(false, true);
    }
    let child = eval(ctx, &f.args[0]);
    Node::bool_lit(child.is_null || !child.as_bool(), false)
}

fn is_false(ctx: &Context, f: &Node) -> Node {
    if f.args.len() != 1 {
        return Node::bool_lit(false, true);
    }
    let child = eval(ctx, &f.args[0]);
    Node::bool_lit(!child.is_null && !child.as_bool(), false)
}

fn is_not_false(ctx: &Context, f: &Node) -> Node {
    if f.args.len() != 1 {
        return Node::bool_lit(false, true);
    }
    let child = eval(ctx, &f.args[0]);
    Node::bool_lit(child.is_null || child.as_bool(), false)
}

static IS_TRUE: Builtin = Builtin {
    name: "is_true",
    summary: "Check if a value is TRUE.",
    run: is_true,
};

static IS_NOT_TRUE: Builtin = Builtin {
    name: "is_not_true",
    summary: "Check if a value is NOT TRUE.",
    run: is_not_true,
};

static IS_FALSE: Builtin = Builtin {
    name: "is_false",
    summary: "Check if a value is FALSE.",
    run: is_false,
};

static IS_NOT_FALSE: Builtin = Builtin {
    name: "is_not_false",
    summary: "Check if a value is NOT FALSE.",
    run: is_not_false,
};

fn update_impl(
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
        vec![f.args[0].data_type],
        DataType::Bool,
        builtin,
    ))
}

fn update_is_true(_ctx: &Context, spec: &Spec, f: &Node) -> Result<UpdatePlan, TypeError> {
    update_impl(spec, f, &IS_TRUE)
}

fn update_is_not_true(_ctx: &Context, spec: &Spec, f: &Node) -> Result<UpdatePlan, TypeError> {
    update_impl(spec, f, &IS_NOT_TRUE)
}

fn update_is_false(_ctx: &Context, spec: &Spec, f: &Node) -> Result<UpdatePlan, TypeError> {
    update_impl(spec, f, &IS_FALSE)
}

fn update_is_not_false(_ctx: &Context, spec: &Spec, f: &Node) -> Result<UpdatePlan, TypeError> {
    update_impl(spec, f, &IS_NOT_FALSE)
}

static IS_TRUE_SPEC: Spec = Spec {
    name: "IS TRUE",
    description: "Checks if a value is TRUE.",
    volatile: false,
    update: update_is_true,
};

static IS_NOT_TRUE_SPEC: Spec = Spec {
    name: "IS NOT TRUE",
    description: "Checks if a value is NOT TRUE.",
    volatile: false,
    update: update_is_not_true,
};

static IS_FALSE_SPEC: Spec = Spec {
    name: "IS FALSE",
    description: "Checks if a value is FALSE.",
    volatile: false,
    update: update_is_false,
};

static IS_NOT_FALSE_SPEC: Spec = Spec {
    name: "IS NOT FALSE",
    description: "Checks if a value is NOT FALSE.",
    volatile: false,
    update: update_is_not_false,
};

pub fn register(ctx: &mut Context) {
    ctx.register_spec(&IS_TRUE_SPEC);
    ctx.register_spec(&IS_NOT_TRUE_SPEC);
    ctx.register_spec(&IS_FALSE_SPEC);
    ctx.register_spec(&IS_NOT_FALSE_SPEC);

    ctx.register_builtin(&IS_TRUE);
    ctx.register_builtin(&IS_NOT_TRUE);
    ctx.register_builtin(&IS_FALSE);
    ctx.register_builtin(&IS_NOT_FALSE);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unary(arg: Node) -> Node {
        let mut node = Node::function("IS TRUE");
        node.args = vec![arg];
        node
    }

    #[test]
    fn truth_table_for_null() {
        let ctx = Context::new();
        let node = unary(Node::bool_lit(false, true));
        assert!(!is_true(&ctx, &node).as_bool());
        assert!(is_not_true(&ctx, &node).as_bool());
        assert!(!is_false(&ctx, &node).as_bool());
        assert!(is_not_false(&ctx, &node).as_bool());
    }

    #[test]
    fn truth_table_for_true() {
        let ctx = Context::new();
        let node = unary(Node::bool_lit(true, false));
        assert!(is_true(&ctx, &node).as_bool());
        assert!(!is_not_true(&ctx, &node).as_bool());
        assert!(!is_false(&ctx, &node).as_bool());
        assert!(is_not_false(&ctx, &node).as_bool());
    }

    #[test]
    fn truth_table_for_false() {
        let ctx = Context::new();
        let node = unary(Node::bool_lit(false, false));
        assert!(!is_true(&ctx, &node).as_bool());
        assert!(is_not_true(&ctx, &node).as_bool());
        assert!(is_false(&ctx, &node).as_bool());
        assert!(!is_not_false(&ctx, &node).as_bool());
    }
}
