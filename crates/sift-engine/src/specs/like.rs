//! LIKE / NOT LIKE pattern matching.
//!
//! Case-insensitive, `%` matches any run, `_` matches one character, and
//! a literal space in the pattern also acts as a `%` wildcard. The space
//! rule is an extension over SQL, kept because callers rely on loose
//! phrase matching.

use sift_common::DataType;

use crate::ctx::{Builtin, Context, Spec, UpdatePlan};
use crate::error::TypeError;
use crate::eval::eval;
use crate::node::Node;

/// Greedy wildcard match with backtracking.
pub fn like_match(value: &str, pattern: &str) -> bool {
    let value: Vec<u8> = value.bytes().collect();
    let pattern: Vec<u8> = pattern.bytes().collect();

    let mut v = 0;
    let mut p = 0;
    let mut star_p: Option<usize> = None;
    let mut star_v = 0;

    while v < value.len() {
        if p < pattern.len() && (pattern[p] == b'%' || pattern[p] == b' ') {
            p += 1;
            star_p = Some(p);
            star_v = v;
        } else if p < pattern.len() && pattern[p] == b'_' {
            p += 1;
            v += 1;
        } else if p < pattern.len()
            && pattern[p].to_ascii_lowercase() == value[v].to_ascii_lowercase()
        {
            p += 1;
            v += 1;
        } else if let Some(sp) = star_p {
            p = sp;
            star_v += 1;
            v = star_v;
        } else {
            return false;
        }
    }

    while p < pattern.len() && (pattern[p] == b'%' || pattern[p] == b' ') {
        p += 1;
    }
    p == pattern.len()
}

fn like(ctx: &Context, f: &Node) -> Node {
    if f.args.len() != 2 {
        return Node::bool_lit(false, true);
    }
    let value = eval(ctx, &f.args[0]);
    let pattern = eval(ctx, &f.args[1]);
    if value.is_null || pattern.is_null {
        return Node::bool_lit(false, true);
    }
    Node::bool_lit(like_match(value.as_str(), pattern.as_str()), false)
}

fn not_like(ctx: &Context, f: &Node) -> Node {
    let result = like(ctx, f);
    if result.is_null {
        return result;
    }
    Node::bool_lit(!result.as_bool(), false)
}

static LIKE: Builtin = Builtin {
    name: "like",
    summary: "Check if value matches a pattern",
    run: like,
};

static NOT_LIKE: Builtin = Builtin {
    name: "not_like",
    summary: "Check if value does not match a pattern",
    run: not_like,
};

fn update_like_impl(
    spec: &Spec,
    f: &Node,
    builtin: &'static Builtin,
) -> Result<UpdatePlan, TypeError> {
    if f.args.len() != 2 {
        return Err(TypeError::Arity {
            spec: spec.name,
            expected: "exactly two arguments",
        });
    }
    for arg in &f.args {
        if arg.data_type != DataType::String {
            return Err(TypeError::Incompatible {
                spec: spec.name,
                detail: "arguments must be of type STRING",
            });
        }
    }
    Ok(UpdatePlan::new(
        vec![DataType::String; 2],
        DataType::Bool,
        builtin,
    ))
}

fn update_like(_ctx: &Context, spec: &Spec, f: &Node) -> Result<UpdatePlan, TypeError> {
    update_like_impl(spec, f, &LIKE)
}

fn update_not_like(_ctx: &Context, spec: &Spec, f: &Node) -> Result<UpdatePlan, TypeError> {
    update_like_impl(spec, f, &NOT_LIKE)
}

static LIKE_SPEC: Spec = Spec {
    name: "LIKE",
    description: "Checks if a value matches a pattern.",
    volatile: false,
    update: update_like,
};

static NOT_LIKE_SPEC: Spec = Spec {
    name: "NOT LIKE",
    description: "Checks if a value does not match a pattern.",
    volatile: false,
    update: update_not_like,
};

pub fn register(ctx: &mut Context) {
    ctx.register_spec(&LIKE_SPEC);
    ctx.register_spec(&NOT_LIKE_SPEC);

    ctx.register_builtin(&LIKE);
    ctx.register_builtin(&NOT_LIKE);
}
