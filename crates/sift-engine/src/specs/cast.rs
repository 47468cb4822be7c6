//! The conversion matrix behind CONVERT, CAST, and `::`.
//!
//! All three route through the same update: `CONVERT(T, x)` carries the
//! type name first, `CAST(x AS T)` and `x::T` carry the value first. A
//! conversion to the value's own type resolves to a no-op plan that the
//! simplifier collapses. Lists convert element-wise.

use sift_common::{datetime, DataType};
use sift_parser::ast::AstKind;

use crate::ctx::{Builtin, Context, Spec, UpdatePlan};
use crate::error::TypeError;
use crate::eval::eval;
use crate::node::Node;

// ── Scalar conversions ────────────────────────────────────────────────

fn bool_to_int(ctx: &Context, f: &Node) -> Node {
    let child = eval(ctx, &f.args[0]);
    if child.is_null {
        return Node::int_lit(0, true);
    }
    Node::int_lit(if child.as_bool() { 1 } else { 0 }, false)
}

fn bool_to_double(ctx: &Context, f: &Node) -> Node {
    let child = eval(ctx, &f.args[0]);
    if child.is_null {
        return Node::double_lit(0.0, true);
    }
    Node::double_lit(if child.as_bool() { 1.0 } else { 0.0 }, false)
}

fn bool_to_string(ctx: &Context, f: &Node) -> Node {
    let child = eval(ctx, &f.args[0]);
    if child.is_null {
        return Node::string_lit("", true);
    }
    Node::string_lit(if child.as_bool() { "true" } else { "false" }, false)
}

fn int_to_bool(ctx: &Context, f: &Node) -> Node {
    let child = eval(ctx, &f.args[0]);
    if child.is_null {
        return Node::bool_lit(false, true);
    }
    Node::bool_lit(child.as_int() != 0, false)
}

fn int_to_datetime(ctx: &Context, f: &Node) -> Node {
    let child = eval(ctx, &f.args[0]);
    if child.is_null {
        return Node::datetime_lit(0, true);
    }
    Node::datetime_lit(child.as_int() as i64, false)
}

fn int_to_double(ctx: &Context, f: &Node) -> Node {
    let child = eval(ctx, &f.args[0]);
    if child.is_null {
        return Node::double_lit(0.0, true);
    }
    Node::double_lit(child.as_int() as f64, false)
}

fn int_to_string(ctx: &Context, f: &Node) -> Node {
    let child = eval(ctx, &f.args[0]);
    if child.is_null {
        return Node::string_lit("", true);
    }
    Node::string_lit(&child.as_int().to_string(), false)
}

fn double_to_bool(ctx: &Context, f: &Node) -> Node {
    let child = eval(ctx, &f.args[0]);
    if child.is_null {
        return Node::bool_lit(false, true);
    }
    Node::bool_lit(child.as_double() != 0.0, false)
}

fn double_to_datetime(ctx: &Context, f: &Node) -> Node {
    let child = eval(ctx, &f.args[0]);
    if child.is_null {
        return Node::datetime_lit(0, true);
    }
    Node::datetime_lit(child.as_double() as i64, false)
}

fn double_to_int(ctx: &Context, f: &Node) -> Node {
    let child = eval(ctx, &f.args[0]);
    if child.is_null {
        return Node::int_lit(0, true);
    }
    Node::int_lit(child.as_double() as i32, false)
}

fn double_to_string(ctx: &Context, f: &Node) -> Node {
    let child = eval(ctx, &f.args[0]);
    if child.is_null {
        return Node::string_lit("", true);
    }
    Node::string_lit(&format!("{:.6}", child.as_double()), false)
}

fn string_to_bool(ctx: &Context, f: &Node) -> Node {
    let child = eval(ctx, &f.args[0]);
    if child.is_null {
        return Node::bool_lit(false, true);
    }
    let text = child.as_str();
    if text.eq_ignore_ascii_case("TRUE") || text == "1" {
        Node::bool_lit(true, false)
    } else if text.eq_ignore_ascii_case("FALSE") || text == "0" {
        Node::bool_lit(false, false)
    } else {
        Node::bool_lit(false, true)
    }
}

fn string_to_int(ctx: &Context, f: &Node) -> Node {
    let child = eval(ctx, &f.args[0]);
    if child.is_null {
        return Node::int_lit(0, true);
    }
    match leading_int(child.as_str()) {
        Some(value) => Node::int_lit(value, false),
        None => Node::int_lit(0, true),
    }
}

fn string_to_double(ctx: &Context, f: &Node) -> Node {
    let child = eval(ctx, &f.args[0]);
    if child.is_null {
        return Node::double_lit(0.0, true);
    }
    match child.as_str().trim().parse::<f64>() {
        Ok(value) => Node::double_lit(value, false),
        Err(_) => Node::double_lit(0.0, true),
    }
}

fn string_to_datetime(ctx: &Context, f: &Node) -> Node {
    let child = eval(ctx, &f.args[0]);
    if child.is_null {
        return Node::datetime_lit(0, true);
    }
    let text = child.as_str();
    if text.is_empty() {
        return Node::datetime_lit(0, true);
    }
    // An INTERVAL compound stays as-is; datetime arithmetic consumes it.
    if child.origin == AstKind::CompoundLiteral
        && text.len() >= 8
        && text[..8].eq_ignore_ascii_case("INTERVAL")
    {
        return Node::compound_lit(text, false);
    }
    match datetime::parse_datetime(text) {
        Some(epoch) => Node::datetime_lit(epoch, false),
        None => {
            ctx.error(format!("Failed to convert string to datetime: {text}"));
            Node::datetime_lit(0, true)
        }
    }
}

fn datetime_to_string(ctx: &Context, f: &Node) -> Node {
    let child = eval(ctx, &f.args[0]);
    if child.is_null {
        return Node::string_lit("", true);
    }
    Node::string_lit(&datetime::epoch_to_iso_utc(child.as_epoch()), false)
}

/// Element-wise list conversion: produces a list of CONVERTed elements.
fn list_to_type(ctx: &Context, f: &Node) -> Node {
    let list = eval(ctx, &f.args[0]);
    if list.is_null || list.origin != AstKind::List {
        return Node::bool_lit(false, true);
    }
    let target = f.data_type;
    let elements = list
        .args
        .iter()
        .map(|element| {
            let value = eval(ctx, element);
            convert_value(ctx, value, target)
        })
        .collect();
    let mut out = Node::list(elements, false);
    out.data_type = target;
    out
}

fn leading_int(text: &str) -> Option<i32> {
    let trimmed = text.trim_start();
    let bytes = trimmed.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    trimmed[..end].parse().ok()
}

// ── Builtins ──────────────────────────────────────────────────────────

static BOOL_TO_INT: Builtin = Builtin { name: "convert_bool_to_int", summary: "Converts a BOOL to an INT.", run: bool_to_int };
static BOOL_TO_DOUBLE: Builtin = Builtin { name: "convert_bool_to_double", summary: "Converts a BOOL to a DOUBLE.", run: bool_to_double };
static BOOL_TO_STRING: Builtin = Builtin { name: "convert_bool_to_string", summary: "Converts a BOOL to a STRING.", run: bool_to_string };
static INT_TO_BOOL: Builtin = Builtin { name: "convert_int_to_bool", summary: "Converts an INT to a BOOL.", run: int_to_bool };
static INT_TO_DATETIME: Builtin = Builtin { name: "convert_int_to_datetime", summary: "Converts an INT to a DATETIME.", run: int_to_datetime };
static INT_TO_DOUBLE: Builtin = Builtin { name: "convert_int_to_double", summary: "Converts an INT to a DOUBLE.", run: int_to_double };
static INT_TO_STRING: Builtin = Builtin { name: "convert_int_to_string", summary: "Converts an INT to a STRING.", run: int_to_string };
static DOUBLE_TO_BOOL: Builtin = Builtin { name: "convert_double_to_bool", summary: "Converts a DOUBLE to a BOOL.", run: double_to_bool };
static DOUBLE_TO_DATETIME: Builtin = Builtin { name: "convert_double_to_datetime", summary: "Converts a DOUBLE to a DATETIME.", run: double_to_datetime };
static DOUBLE_TO_INT: Builtin = Builtin { name: "convert_double_to_int", summary: "Converts a DOUBLE to an INT.", run: double_to_int };
static DOUBLE_TO_STRING: Builtin = Builtin { name: "convert_double_to_string", summary: "Converts a DOUBLE to a STRING.", run: double_to_string };
static STRING_TO_BOOL: Builtin = Builtin { name: "convert_string_to_bool", summary: "Converts a STRING to a BOOL.", run: string_to_bool };
static STRING_TO_INT: Builtin = Builtin { name: "convert_string_to_int", summary: "Converts a STRING to an INT.", run: string_to_int };
static STRING_TO_DOUBLE: Builtin = Builtin { name: "convert_string_to_double", summary: "Converts a STRING to a DOUBLE.", run: string_to_double };
static STRING_TO_DATETIME: Builtin = Builtin { name: "convert_string_to_datetime", summary: "Converts a STRING to a DATETIME.", run: string_to_datetime };
static DATETIME_TO_STRING: Builtin = Builtin { name: "convert_datetime_to_string", summary: "Converts a DATETIME to a STRING.", run: datetime_to_string };
static LIST_TO_TYPE: Builtin = Builtin { name: "convert_list_to_type", summary: "Converts list elements to a target type.", run: list_to_type };

/// The conversion matrix. `None` for missing cells.
pub fn conversion_builtin(from: DataType, to: DataType) -> Option<&'static Builtin> {
    use DataType::*;
    let builtin = match (from, to) {
        (Bool, Int) => &BOOL_TO_INT,
        (Bool, Double) => &BOOL_TO_DOUBLE,
        (Bool, String) => &BOOL_TO_STRING,
        (Int, Bool) => &INT_TO_BOOL,
        (Int, DateTime) => &INT_TO_DATETIME,
        (Int, Double) => &INT_TO_DOUBLE,
        (Int, String) => &INT_TO_STRING,
        (Double, Bool) => &DOUBLE_TO_BOOL,
        (Double, DateTime) => &DOUBLE_TO_DATETIME,
        (Double, Int) => &DOUBLE_TO_INT,
        (Double, String) => &DOUBLE_TO_STRING,
        (String, Bool) => &STRING_TO_BOOL,
        (String, Int) => &STRING_TO_INT,
        (String, Double) => &STRING_TO_DOUBLE,
        (String, DateTime) => &STRING_TO_DATETIME,
        (DateTime, String) => &DATETIME_TO_STRING,
        _ => return None,
    };
    Some(builtin)
}

/// Eagerly convert an already-evaluated value to `target`.
pub fn convert_value(ctx: &Context, value: Node, target: DataType) -> Node {
    if value.data_type == target {
        return value;
    }
    if value.is_null {
        let mut retagged = value;
        retagged.data_type = target;
        return retagged;
    }
    let Some(builtin) = conversion_builtin(value.data_type, target) else {
        ctx.error(
            TypeError::NoConversion {
                from: value.data_type,
                to: target,
            }
            .to_string(),
        );
        return Node::bool_lit(false, true);
    };
    let mut call = Node::function("CONVERT");
    call.data_type = target;
    call.args = vec![value];
    (builtin.run)(ctx, &call)
}

// ── Spec ──────────────────────────────────────────────────────────────

fn update_convert(_ctx: &Context, spec: &Spec, f: &Node) -> Result<UpdatePlan, TypeError> {
    let (type_name, value_idx) = match spec.name {
        "CONVERT" => {
            if f.args.len() != 2 {
                return Err(TypeError::Arity {
                    spec: spec.name,
                    expected: "exactly two arguments: a type name and a value",
                });
            }
            (&f.args[0].text, 1)
        }
        // CAST(x AS T) and x::T both lower to (value, type).
        _ => {
            if f.args.len() != 2 {
                return Err(TypeError::Arity {
                    spec: spec.name,
                    expected: "exactly two arguments: a value and a type name",
                });
            }
            (&f.args[1].text, 0)
        }
    };

    let target = DataType::from_type_name(type_name);
    if target == DataType::Unknown {
        return Err(TypeError::InvalidTypeName {
            spec: spec.name,
            name: type_name.clone(),
        });
    }

    let value = &f.args[value_idx];
    let input = value.data_type;
    let retain = value_idx..value_idx + 1;

    if input == target {
        return Ok(UpdatePlan {
            expected: vec![input],
            return_type: target,
            builtin: None,
            retain,
        });
    }

    if value.origin == AstKind::List {
        return Ok(UpdatePlan {
            expected: vec![input],
            return_type: target,
            builtin: Some(&LIST_TO_TYPE),
            retain,
        });
    }

    match conversion_builtin(input, target) {
        Some(builtin) => Ok(UpdatePlan {
            expected: vec![input],
            return_type: target,
            builtin: Some(builtin),
            retain,
        }),
        None => Err(TypeError::NoConversion {
            from: input,
            to: target,
        }),
    }
}

static CONVERT_SPEC: Spec = Spec {
    name: "CONVERT",
    description: "Converts a value to a specified type.",
    volatile: false,
    update: update_convert,
};

static CAST_SPEC: Spec = Spec {
    name: "CAST",
    description: "Converts a value to a specified type.",
    volatile: false,
    update: update_convert,
};

static CAST_OPERATOR_SPEC: Spec = Spec {
    name: "::",
    description: "Converts a value to a specified type.",
    volatile: false,
    update: update_convert,
};

pub fn register(ctx: &mut Context) {
    ctx.register_spec(&CONVERT_SPEC);
    ctx.register_spec(&CAST_SPEC);
    ctx.register_spec(&CAST_OPERATOR_SPEC);

    for builtin in [
        &BOOL_TO_INT, &BOOL_TO_DOUBLE, &BOOL_TO_STRING,
        &INT_TO_BOOL, &INT_TO_DATETIME, &INT_TO_DOUBLE, &INT_TO_STRING,
        &DOUBLE_TO_BOOL, &DOUBLE_TO_DATETIME, &DOUBLE_TO_INT, &DOUBLE_TO_STRING,
        &STRING_TO_BOOL, &STRING_TO_INT, &STRING_TO_DOUBLE, &STRING_TO_DATETIME,
        &DATETIME_TO_STRING, &LIST_TO_TYPE,
    ] {
        ctx.register_builtin(builtin);
    }
}
