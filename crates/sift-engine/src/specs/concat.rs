//! CONCAT: string concatenation skipping null arguments; null only when
//! every argument is null.

use sift_common::DataType;

use crate::ctx::{Builtin, Context, Spec, UpdatePlan};
use crate::error::TypeError;
use crate::eval::eval;
use crate::node::Node;

fn string_concat(ctx: &Context, f: &Node) -> Node {
    let mut result = String::new();
    let mut any_non_null = false;
    for arg in &f.args {
        let child = eval(ctx, arg);
        if child.is_null {
            continue;
        }
        any_non_null = true;
        result.push_str(child.as_str());
    }
    if any_non_null {
        Node::string_lit(&result, false)
    } else {
        Node::string_lit("", true)
    }
}

static STRING_CONCAT: Builtin = Builtin {
    name: "string_concat",
    summary: "Concatenates multiple string values into a single string.",
    run: string_concat,
};

fn update_concat(_ctx: &Context, spec: &Spec, f: &Node) -> Result<UpdatePlan, TypeError> {
    if f.args.is_empty() {
        return Err(TypeError::Arity {
            spec: spec.name,
            expected: "at least one argument",
        });
    }
    Ok(UpdatePlan::new(
        vec![DataType::String; f.args.len()],
        DataType::String,
        &STRING_CONCAT,
    ))
}

static CONCAT_SPEC: Spec = Spec {
    name: "CONCAT",
    description: "Concatenates multiple string values into a single string.",
    volatile: false,
    update: update_concat,
};

pub fn register(ctx: &mut Context) {
    ctx.register_spec(&CONCAT_SPEC);
    ctx.register_builtin(&STRING_CONCAT);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(args: Vec<Node>) -> Node {
        let mut node = Node::function("CONCAT");
        node.args = args;
        node
    }

    #[test]
    fn concatenates_in_order() {
        let ctx = Context::new();
        let node = call(vec![
            Node::string_lit("foo", false),
            Node::string_lit("bar", false),
        ]);
        assert_eq!(string_concat(&ctx, &node).as_str(), "foobar");
    }

    #[test]
    fn nulls_are_skipped() {
        let ctx = Context::new();
        let node = call(vec![
            Node::string_lit("a", false),
            Node::string_lit("", true),
            Node::string_lit("b", false),
        ]);
        let result = string_concat(&ctx, &node);
        assert_eq!(result.as_str(), "ab");
        assert!(!result.is_null);
    }

    #[test]
    fn empty_strings_are_not_null() {
        let ctx = Context::new();
        let node = call(vec![Node::string_lit("", false), Node::string_lit("", false)]);
        let result = string_concat(&ctx, &node);
        assert_eq!(result.as_str(), "");
        assert!(!result.is_null);
    }

    #[test]
    fn all_null_is_null() {
        let ctx = Context::new();
        let node = call(vec![Node::string_lit("", true), Node::string_lit("", true)]);
        assert!(string_concat(&ctx, &node).is_null);
    }
}
