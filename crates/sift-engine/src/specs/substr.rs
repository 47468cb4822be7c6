//! SUBSTR / SUBSTRING. 1-based start, optional length; out-of-range
//! indices return null.

use sift_common::DataType;

use crate::ctx::{Builtin, Context, Spec, UpdatePlan};
use crate::error::TypeError;
use crate::eval::eval;
use crate::node::Node;

fn substr_two(ctx: &Context, f: &Node) -> Node {
    let text = eval(ctx, &f.args[0]);
    let start = eval(ctx, &f.args[1]);
    if text.is_null || start.is_null {
        return Node::string_lit("", true);
    }
    let bytes = text.as_str().as_bytes();
    let start_pos = start.as_int() as i64 - 1;
    if start_pos < 0 || start_pos >= bytes.len() as i64 {
        return Node::string_lit("", true);
    }
    let slice = &bytes[start_pos as usize..];
    Node::string_lit(&String::from_utf8_lossy(slice), false)
}

fn substr_three(ctx: &Context, f: &Node) -> Node {
    let text = eval(ctx, &f.args[0]);
    let start = eval(ctx, &f.args[1]);
    let length = eval(ctx, &f.args[2]);
    if text.is_null || start.is_null || length.is_null {
        return Node::string_lit("", true);
    }
    let bytes = text.as_str().as_bytes();
    let start_pos = start.as_int() as i64 - 1;
    let length = length.as_int() as i64;
    if start_pos < 0 || start_pos >= bytes.len() as i64 || length < 0 {
        return Node::string_lit("", true);
    }
    let end = (start_pos + length).min(bytes.len() as i64) as usize;
    let slice = &bytes[start_pos as usize..end];
    Node::string_lit(&String::from_utf8_lossy(slice), false)
}

static SUBSTR_TWO: Builtin = Builtin {
    name: "substr_two_params",
    summary: "Extract substring from a start position.",
    run: substr_two,
};

static SUBSTR_THREE: Builtin = Builtin {
    name: "substr_three_params",
    summary: "Extract substring from a start position up to a length.",
    run: substr_three,
};

fn update_substr(_ctx: &Context, spec: &Spec, f: &Node) -> Result<UpdatePlan, TypeError> {
    if f.args.len() < 2 || f.args.len() > 3 {
        return Err(TypeError::Arity {
            spec: spec.name,
            expected: "either two or three arguments",
        });
    }
    let mut expected = vec![DataType::String, DataType::Int];
    let builtin: &'static Builtin = if f.args.len() == 2 {
        &SUBSTR_TWO
    } else {
        expected.push(DataType::Int);
        &SUBSTR_THREE
    };
    Ok(UpdatePlan::new(expected, DataType::String, builtin))
}

static SUBSTR_SPEC: Spec = Spec {
    name: "SUBSTR",
    description: "Extracts a substring starting at a position, optionally up to a length.",
    volatile: false,
    update: update_substr,
};

static SUBSTRING_SPEC: Spec = Spec {
    name: "SUBSTRING",
    description: "Extracts a substring starting at a position, optionally up to a length.",
    volatile: false,
    update: update_substr,
};

pub fn register(ctx: &mut Context) {
    ctx.register_spec(&SUBSTR_SPEC);
    ctx.register_spec(&SUBSTRING_SPEC);

    ctx.register_builtin(&SUBSTR_TWO);
    ctx.register_builtin(&SUBSTR_THREE);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(args: Vec<Node>) -> Node {
        let mut node = Node::function("SUBSTR");
        node.args = args;
        node
    }

    #[test]
    fn start_is_one_based() {
        let ctx = Context::new();
        let node = call(vec![
            Node::string_lit("hello", false),
            Node::int_lit(2, false),
        ]);
        assert_eq!(substr_two(&ctx, &node).as_str(), "ello");
    }

    #[test]
    fn three_arg_form_caps_length() {
        let ctx = Context::new();
        let node = call(vec![
            Node::string_lit("hello", false),
            Node::int_lit(2, false),
            Node::int_lit(3, false),
        ]);
        assert_eq!(substr_three(&ctx, &node).as_str(), "ell");

        let node = call(vec![
            Node::string_lit("hello", false),
            Node::int_lit(4, false),
            Node::int_lit(10, false),
        ]);
        assert_eq!(substr_three(&ctx, &node).as_str(), "lo");
    }

    #[test]
    fn out_of_range_is_null() {
        let ctx = Context::new();
        let node = call(vec![
            Node::string_lit("hello", false),
            Node::int_lit(0, false),
        ]);
        assert!(substr_two(&ctx, &node).is_null);

        let node = call(vec![
            Node::string_lit("hello", false),
            Node::int_lit(6, false),
        ]);
        assert!(substr_two(&ctx, &node).is_null);

        let node = call(vec![
            Node::string_lit("hello", false),
            Node::int_lit(1, false),
            Node::int_lit(-1, false),
        ]);
        assert!(substr_three(&ctx, &node).is_null);
    }
}
