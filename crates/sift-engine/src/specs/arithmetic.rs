//! Arithmetic operators `+ - * /`.
//!
//! `+` and `*` accept two or more arguments, `-` and `/` exactly two.
//! `+` on strings concatenates. Datetime arithmetic dispatches on the
//! second operand: int/double add or subtract (fractional) days, an
//! INTERVAL compound applies through broken-down civil time, and
//! datetime - datetime yields the difference in seconds as a double.

use sift_common::datetime::{CivilTime, SECS_PER_DAY};
use sift_common::DataType;
use sift_parser::ast::AstKind;

use crate::ctx::{Builtin, Context, Spec, UpdatePlan};
use crate::error::TypeError;
use crate::eval::eval;
use crate::interval::{self, Interval};
use crate::node::Node;

// ── Int ───────────────────────────────────────────────────────────────

fn int_add(ctx: &Context, f: &Node) -> Node {
    let mut result: i32 = 0;
    for arg in &f.args {
        let child = eval(ctx, arg);
        if child.is_null {
            return Node::int_lit(0, true);
        }
        result = result.wrapping_add(child.as_int());
    }
    Node::int_lit(result, false)
}

fn int_subtract(ctx: &Context, f: &Node) -> Node {
    let left = eval(ctx, &f.args[0]);
    let right = eval(ctx, &f.args[1]);
    if left.is_null || right.is_null {
        return Node::int_lit(0, true);
    }
    Node::int_lit(left.as_int().wrapping_sub(right.as_int()), false)
}

fn int_multiply(ctx: &Context, f: &Node) -> Node {
    let mut result: i32 = 1;
    for arg in &f.args {
        let child = eval(ctx, arg);
        if child.is_null {
            return Node::int_lit(0, true);
        }
        result = result.wrapping_mul(child.as_int());
    }
    Node::int_lit(result, false)
}

/// Integer division returns a double; division by zero is null.
fn int_divide(ctx: &Context, f: &Node) -> Node {
    let left = eval(ctx, &f.args[0]);
    let right = eval(ctx, &f.args[1]);
    if left.is_null || right.is_null || right.as_int() == 0 {
        return Node::int_lit(0, true);
    }
    Node::double_lit(left.as_int() as f64 / right.as_int() as f64, false)
}

// ── Double ────────────────────────────────────────────────────────────

fn double_add(ctx: &Context, f: &Node) -> Node {
    let mut result = 0.0;
    for arg in &f.args {
        let child = eval(ctx, arg);
        if child.is_null {
            return Node::double_lit(0.0, true);
        }
        result += child.as_double();
    }
    Node::double_lit(result, false)
}

fn double_subtract(ctx: &Context, f: &Node) -> Node {
    let left = eval(ctx, &f.args[0]);
    let right = eval(ctx, &f.args[1]);
    if left.is_null || right.is_null {
        return Node::double_lit(0.0, true);
    }
    Node::double_lit(left.as_double() - right.as_double(), false)
}

fn double_multiply(ctx: &Context, f: &Node) -> Node {
    let mut result = 1.0;
    for arg in &f.args {
        let child = eval(ctx, arg);
        if child.is_null {
            return Node::double_lit(0.0, true);
        }
        result *= child.as_double();
    }
    Node::double_lit(result, false)
}

fn double_divide(ctx: &Context, f: &Node) -> Node {
    let left = eval(ctx, &f.args[0]);
    let right = eval(ctx, &f.args[1]);
    if left.is_null || right.is_null || right.as_double() == 0.0 {
        return Node::double_lit(0.0, true);
    }
    Node::double_lit(left.as_double() / right.as_double(), false)
}

// ── String ────────────────────────────────────────────────────────────

fn string_add(ctx: &Context, f: &Node) -> Node {
    let mut result = String::new();
    for arg in &f.args {
        let child = eval(ctx, arg);
        if child.is_null {
            return Node::string_lit("", true);
        }
        result.push_str(child.as_str());
    }
    Node::string_lit(&result, false)
}

// ── Datetime ──────────────────────────────────────────────────────────

fn datetime_shift_days(ctx: &Context, f: &Node, days: f64, sign: f64) -> Node {
    let dt = eval(ctx, &f.args[0]);
    if dt.is_null {
        return Node::datetime_lit(0, true);
    }
    let shift = (sign * days * SECS_PER_DAY as f64) as i64;
    Node::datetime_lit(dt.as_epoch() + shift, false)
}

fn datetime_int_add(ctx: &Context, f: &Node) -> Node {
    let days = eval(ctx, &f.args[1]);
    if days.is_null {
        return Node::datetime_lit(0, true);
    }
    datetime_shift_days(ctx, f, days.as_int() as f64, 1.0)
}

fn datetime_int_subtract(ctx: &Context, f: &Node) -> Node {
    let days = eval(ctx, &f.args[1]);
    if days.is_null {
        return Node::datetime_lit(0, true);
    }
    datetime_shift_days(ctx, f, days.as_int() as f64, -1.0)
}

fn datetime_double_add(ctx: &Context, f: &Node) -> Node {
    let days = eval(ctx, &f.args[1]);
    if days.is_null {
        return Node::datetime_lit(0, true);
    }
    datetime_shift_days(ctx, f, days.as_double(), 1.0)
}

fn datetime_double_subtract(ctx: &Context, f: &Node) -> Node {
    let days = eval(ctx, &f.args[1]);
    if days.is_null {
        return Node::datetime_lit(0, true);
    }
    datetime_shift_days(ctx, f, days.as_double(), -1.0)
}

/// datetime - datetime, in seconds.
fn datetime_subtract(ctx: &Context, f: &Node) -> Node {
    let left = eval(ctx, &f.args[0]);
    let right = eval(ctx, &f.args[1]);
    if left.is_null || right.is_null {
        return Node::double_lit(0.0, true);
    }
    Node::double_lit((left.as_epoch() - right.as_epoch()) as f64, false)
}

/// Read the interval body of a compound literal, tolerating the leading
/// `INTERVAL ` word.
fn interval_of(ctx: &Context, node: &Node) -> Interval {
    let text = node.as_str();
    let body = if text.len() > 8 && text[..8].eq_ignore_ascii_case("INTERVAL") {
        text[8..].trim_start()
    } else {
        text
    };
    interval::parse_interval(ctx.messages(), body)
}

fn apply_interval(epoch: i64, iv: &Interval, sign: i32) -> i64 {
    let mut ct = CivilTime::from_epoch(epoch);
    ct.year += sign * iv.years;
    ct.month += sign * iv.months;
    ct.day += sign * iv.days;
    ct.hour += sign * iv.hours;
    ct.minute += sign * iv.minutes;
    ct.second += sign * iv.seconds;
    ct.to_epoch() + sign as i64 * (iv.microseconds / 1_000_000) as i64
}

fn datetime_interval_add(ctx: &Context, f: &Node) -> Node {
    let dt = eval(ctx, &f.args[0]);
    let iv_node = eval(ctx, &f.args[1]);
    if dt.is_null || iv_node.is_null {
        return Node::datetime_lit(0, true);
    }
    let iv = interval_of(ctx, &iv_node);
    Node::datetime_lit(apply_interval(dt.as_epoch(), &iv, 1), false)
}

fn datetime_interval_subtract(ctx: &Context, f: &Node) -> Node {
    let dt = eval(ctx, &f.args[0]);
    let iv_node = eval(ctx, &f.args[1]);
    if dt.is_null || iv_node.is_null {
        return Node::datetime_lit(0, true);
    }
    let iv = interval_of(ctx, &iv_node);
    Node::datetime_lit(apply_interval(dt.as_epoch(), &iv, -1), false)
}

// ── Builtins ──────────────────────────────────────────────────────────

static INT_ADD: Builtin = Builtin { name: "int_add", summary: "INT + INT", run: int_add };
static INT_SUBTRACT: Builtin = Builtin { name: "int_subtract", summary: "INT - INT", run: int_subtract };
static INT_MULTIPLY: Builtin = Builtin { name: "int_multiply", summary: "INT * INT", run: int_multiply };
static INT_DIVIDE: Builtin = Builtin { name: "int_divide", summary: "INT / INT - returns DOUBLE", run: int_divide };
static DOUBLE_ADD: Builtin = Builtin { name: "double_add", summary: "DOUBLE + DOUBLE", run: double_add };
static DOUBLE_SUBTRACT: Builtin = Builtin { name: "double_subtract", summary: "DOUBLE - DOUBLE", run: double_subtract };
static DOUBLE_MULTIPLY: Builtin = Builtin { name: "double_multiply", summary: "DOUBLE * DOUBLE", run: double_multiply };
static DOUBLE_DIVIDE: Builtin = Builtin { name: "double_divide", summary: "DOUBLE / DOUBLE", run: double_divide };
static STRING_ADD: Builtin = Builtin { name: "string_add", summary: "STRING + STRING", run: string_add };
static DATETIME_INT_ADD: Builtin = Builtin { name: "datetime_int_add", summary: "Adds days to a DATETIME", run: datetime_int_add };
static DATETIME_INT_SUBTRACT: Builtin = Builtin { name: "datetime_int_subtract", summary: "Subtracts days from a DATETIME", run: datetime_int_subtract };
static DATETIME_DOUBLE_ADD: Builtin = Builtin { name: "datetime_double_add", summary: "Adds fractional days to a DATETIME", run: datetime_double_add };
static DATETIME_DOUBLE_SUBTRACT: Builtin = Builtin { name: "datetime_double_subtract", summary: "Subtracts fractional days from a DATETIME", run: datetime_double_subtract };
static DATETIME_SUBTRACT: Builtin = Builtin { name: "datetime_subtract", summary: "Subtracts two DATETIME values (returns seconds)", run: datetime_subtract };
static DATETIME_INTERVAL_ADD: Builtin = Builtin { name: "datetime_interval_add", summary: "Adds an INTERVAL to a DATETIME", run: datetime_interval_add };
static DATETIME_INTERVAL_SUBTRACT: Builtin = Builtin { name: "datetime_interval_subtract", summary: "Subtracts an INTERVAL from a DATETIME", run: datetime_interval_subtract };

// ── Spec ──────────────────────────────────────────────────────────────

fn update_arithmetic(_ctx: &Context, spec: &Spec, f: &Node) -> Result<UpdatePlan, TypeError> {
    let exact_two = matches!(spec.name, "-" | "/");
    if f.args.len() < 2 || (exact_two && f.args.len() != 2) {
        return Err(TypeError::Arity {
            spec: spec.name,
            expected: if exact_two {
                "exactly two arguments"
            } else {
                "at least two arguments"
            },
        });
    }

    let mut data_type = f.args[0].data_type;
    for arg in &f.args[1..] {
        if arg.data_type != data_type
            && matches!(
                (data_type, arg.data_type),
                (DataType::Int, DataType::Double) | (DataType::Double, DataType::Int)
            )
        {
            data_type = DataType::Double;
        }
    }

    let mut expected = vec![data_type; f.args.len()];
    let mut return_type = data_type;

    let builtin: &'static Builtin = match data_type {
        DataType::Int => match spec.name {
            "+" => &INT_ADD,
            "-" => &INT_SUBTRACT,
            "*" => &INT_MULTIPLY,
            _ => {
                return_type = DataType::Double;
                &INT_DIVIDE
            }
        },
        DataType::Double => match spec.name {
            "+" => &DOUBLE_ADD,
            "-" => &DOUBLE_SUBTRACT,
            "*" => &DOUBLE_MULTIPLY,
            _ => &DOUBLE_DIVIDE,
        },
        DataType::String => {
            if spec.name == "+" {
                &STRING_ADD
            } else {
                return Err(TypeError::Unsupported {
                    spec: spec.name,
                    data_type,
                });
            }
        }
        DataType::DateTime => {
            // Dispatch on the second operand; its type is kept as-is so no
            // conversion gets inserted underneath the chosen thunk.
            let rhs = f.args[1].data_type;
            expected[1] = rhs;
            let is_interval = rhs == DataType::String
                && f.args[1].origin == AstKind::CompoundLiteral;
            match (spec.name, rhs) {
                ("+", DataType::Int) => &DATETIME_INT_ADD,
                ("-", DataType::Int) => &DATETIME_INT_SUBTRACT,
                ("+", DataType::Double) => &DATETIME_DOUBLE_ADD,
                ("-", DataType::Double) => &DATETIME_DOUBLE_SUBTRACT,
                ("-", DataType::DateTime) => {
                    return_type = DataType::Double;
                    &DATETIME_SUBTRACT
                }
                ("+", DataType::String) if is_interval => &DATETIME_INTERVAL_ADD,
                ("-", DataType::String) if is_interval => &DATETIME_INTERVAL_SUBTRACT,
                _ => {
                    return Err(TypeError::Incompatible {
                        spec: spec.name,
                        detail: "does not support this datetime operand combination",
                    });
                }
            }
        }
        _ => {
            return Err(TypeError::Unsupported {
                spec: spec.name,
                data_type,
            });
        }
    };

    Ok(UpdatePlan {
        expected,
        return_type,
        builtin: Some(builtin),
        retain: 0..f.args.len(),
    })
}

static ADD_SPEC: Spec = Spec {
    name: "+",
    description: "Addition operator",
    volatile: false,
    update: update_arithmetic,
};

static SUBTRACT_SPEC: Spec = Spec {
    name: "-",
    description: "Subtraction operator",
    volatile: false,
    update: update_arithmetic,
};

static MULTIPLY_SPEC: Spec = Spec {
    name: "*",
    description: "Multiplication operator",
    volatile: false,
    update: update_arithmetic,
};

static DIVIDE_SPEC: Spec = Spec {
    name: "/",
    description: "Division operator",
    volatile: false,
    update: update_arithmetic,
};

pub fn register(ctx: &mut Context) {
    ctx.register_spec(&ADD_SPEC);
    ctx.register_spec(&SUBTRACT_SPEC);
    ctx.register_spec(&MULTIPLY_SPEC);
    ctx.register_spec(&DIVIDE_SPEC);

    ctx.register_builtin(&INT_ADD);
    ctx.register_builtin(&INT_SUBTRACT);
    ctx.register_builtin(&INT_MULTIPLY);
    ctx.register_builtin(&INT_DIVIDE);
    ctx.register_builtin(&DOUBLE_ADD);
    ctx.register_builtin(&DOUBLE_SUBTRACT);
    ctx.register_builtin(&DOUBLE_MULTIPLY);
    ctx.register_builtin(&DOUBLE_DIVIDE);
    ctx.register_builtin(&STRING_ADD);
    ctx.register_builtin(&DATETIME_INT_ADD);
    ctx.register_builtin(&DATETIME_INT_SUBTRACT);
    ctx.register_builtin(&DATETIME_DOUBLE_ADD);
    ctx.register_builtin(&DATETIME_DOUBLE_SUBTRACT);
    ctx.register_builtin(&DATETIME_SUBTRACT);
    ctx.register_builtin(&DATETIME_INTERVAL_ADD);
    ctx.register_builtin(&DATETIME_INTERVAL_SUBTRACT);
}
