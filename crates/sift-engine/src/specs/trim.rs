//! TRIM / LTRIM / RTRIM. Space characters only, matching the SQL forms.

use sift_common::DataType;

use crate::ctx::{Builtin, Context, Spec, UpdatePlan};
use crate::error::TypeError;
use crate::eval::eval;
use crate::node::Node;

fn trim_with(ctx: &Context, f: &Node, apply: fn(&str) -> &str) -> Node {
    let child = eval(ctx, &f.args[0]);
    if child.is_null {
        return Node::string_lit("", true);
    }
    Node::string_lit(apply(child.as_str()), false)
}

fn trim(ctx: &Context, f: &Node) -> Node {
    trim_with(ctx, f, |s| s.trim_matches(' '))
}

fn ltrim(ctx: &Context, f: &Node) -> Node {
    trim_with(ctx, f, |s| s.trim_start_matches(' '))
}

fn rtrim(ctx: &Context, f: &Node) -> Node {
    trim_with(ctx, f, |s| s.trim_end_matches(' '))
}

static TRIM: Builtin = Builtin {
    name: "trim",
    summary: "Removes leading and trailing spaces.",
    run: trim,
};

static LTRIM: Builtin = Builtin {
    name: "ltrim",
    summary: "Removes leading spaces.",
    run: ltrim,
};

static RTRIM: Builtin = Builtin {
    name: "rtrim",
    summary: "Removes trailing spaces.",
    run: rtrim,
};

fn update_trim(_ctx: &Context, spec: &Spec, f: &Node) -> Result<UpdatePlan, TypeError> {
    if f.args.len() != 1 {
        return Err(TypeError::Arity {
            spec: spec.name,
            expected: "exactly one argument",
        });
    }
    let builtin: &'static Builtin = match spec.name {
        "TRIM" => &TRIM,
        "LTRIM" => &LTRIM,
        _ => &RTRIM,
    };
    Ok(UpdatePlan::new(
        vec![DataType::String],
        DataType::String,
        builtin,
    ))
}

static TRIM_SPEC: Spec = Spec {
    name: "TRIM",
    description: "Removes leading and trailing spaces from a string.",
    volatile: false,
    update: update_trim,
};

static LTRIM_SPEC: Spec = Spec {
    name: "LTRIM",
    description: "Removes leading spaces from a string.",
    volatile: false,
    update: update_trim,
};

static RTRIM_SPEC: Spec = Spec {
    name: "RTRIM",
    description: "Removes trailing spaces from a string.",
    volatile: false,
    update: update_trim,
};

pub fn register(ctx: &mut Context) {
    ctx.register_spec(&TRIM_SPEC);
    ctx.register_spec(&LTRIM_SPEC);
    ctx.register_spec(&RTRIM_SPEC);

    ctx.register_builtin(&TRIM);
    ctx.register_builtin(&LTRIM);
    ctx.register_builtin(&RTRIM);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(text: &str) -> Node {
        let mut node = Node::function("TRIM");
        node.args = vec![Node::string_lit(text, false)];
        node
    }

    #[test]
    fn trim_variants() {
        let ctx = Context::new();
        let node = call("  hello  ");
        assert_eq!(trim(&ctx, &node).as_str(), "hello");
        assert_eq!(ltrim(&ctx, &node).as_str(), "hello  ");
        assert_eq!(rtrim(&ctx, &node).as_str(), "  hello");
    }

    #[test]
    fn tabs_are_not_trimmed() {
        let ctx = Context::new();
        let node = call("\thello\t");
        assert_eq!(trim(&ctx, &node).as_str(), "\thello\t");
    }

    #[test]
    fn null_propagates() {
        let ctx = Context::new();
        let mut node = Node::function("TRIM");
        node.args = vec![Node::string_lit("", true)];
        assert!(trim(&ctx, &node).is_null);
    }
}
