//! EXTRACT / DATEPART and the shorthand date-part functions
//! (`YEAR(dt)`, `MONTH(dt)`, ... `ISODAYOFWEEK(dt)`).
//!
//! The field argument is consumed at resolution time: the resolver looks
//! the field name up, drops the argument, and wires the field-specific
//! implementation directly onto the call.

use sift_common::datetime::{self, CivilTime};
use sift_common::DataType;

use crate::ctx::{Builtin, Context, Spec, UpdatePlan};
use crate::error::TypeError;
use crate::eval::eval;
use crate::node::Node;

fn field_with(ctx: &Context, f: &Node, compute: fn(i64) -> i32) -> Node {
    let child = eval(ctx, &f.args[0]);
    if child.is_null || child.data_type != DataType::DateTime {
        return Node::int_lit(0, true);
    }
    Node::int_lit(compute(child.as_epoch()), false)
}

fn year_of(epoch: i64) -> i32 {
    CivilTime::from_epoch(epoch).year
}

fn month_of(epoch: i64) -> i32 {
    CivilTime::from_epoch(epoch).month
}

fn day_of(epoch: i64) -> i32 {
    CivilTime::from_epoch(epoch).day
}

fn hour_of(epoch: i64) -> i32 {
    CivilTime::from_epoch(epoch).hour
}

fn minute_of(epoch: i64) -> i32 {
    CivilTime::from_epoch(epoch).minute
}

fn second_of(epoch: i64) -> i32 {
    CivilTime::from_epoch(epoch).second
}

fn quarter_of(epoch: i64) -> i32 {
    (CivilTime::from_epoch(epoch).month - 1) / 3 + 1
}

fn week_of(epoch: i64) -> i32 {
    datetime::iso_week(epoch)
}

fn doy_of(epoch: i64) -> i32 {
    let ct = CivilTime::from_epoch(epoch);
    datetime::day_of_year(ct.year, ct.month, ct.day)
}

fn dow_of(epoch: i64) -> i32 {
    datetime::weekday(epoch)
}

fn isodow_of(epoch: i64) -> i32 {
    datetime::iso_weekday(epoch)
}

macro_rules! extract_builtin {
    ($fn_name:ident, $static_name:ident, $name:literal, $summary:literal, $compute:expr) => {
        fn $fn_name(ctx: &Context, f: &Node) -> Node {
            field_with(ctx, f, $compute)
        }
        static $static_name: Builtin = Builtin {
            name: $name,
            summary: $summary,
            run: $fn_name,
        };
    };
}

extract_builtin!(extract_year, EXTRACT_YEAR, "extract_year", "Extracts the year from a DATETIME.", year_of);
extract_builtin!(extract_month, EXTRACT_MONTH, "extract_month", "Extracts the month from a DATETIME.", month_of);
extract_builtin!(extract_day, EXTRACT_DAY, "extract_day", "Extracts the day from a DATETIME.", day_of);
extract_builtin!(extract_hour, EXTRACT_HOUR, "extract_hour", "Extracts the hour from a DATETIME.", hour_of);
extract_builtin!(extract_minute, EXTRACT_MINUTE, "extract_minute", "Extracts the minute from a DATETIME.", minute_of);
extract_builtin!(extract_second, EXTRACT_SECOND, "extract_second", "Extracts the second from a DATETIME.", second_of);
extract_builtin!(extract_quarter, EXTRACT_QUARTER, "extract_quarter", "Extracts the quarter of the year from a DATETIME.", quarter_of);
extract_builtin!(extract_week, EXTRACT_WEEK, "extract_week", "Extracts the ISO week number from a DATETIME.", week_of);
extract_builtin!(extract_doy, EXTRACT_DOY, "extract_doy", "Extracts the day of the year from a DATETIME.", doy_of);
extract_builtin!(extract_dow, EXTRACT_DOW, "extract_dow", "Extracts the day of the week (0 for Sunday) from a DATETIME.", dow_of);
extract_builtin!(extract_isodow, EXTRACT_ISODOW, "extract_isodow", "Extracts the ISO day of the week (1 for Monday to 7 for Sunday) from a DATETIME.", isodow_of);

/// Field-name lookup shared by EXTRACT, DATEPART, and the shorthands.
fn field_builtin(field: &str) -> Option<&'static Builtin> {
    let builtin = if field.eq_ignore_ascii_case("YEAR") {
        &EXTRACT_YEAR
    } else if field.eq_ignore_ascii_case("MONTH") {
        &EXTRACT_MONTH
    } else if field.eq_ignore_ascii_case("DAY") {
        &EXTRACT_DAY
    } else if field.eq_ignore_ascii_case("HOUR") {
        &EXTRACT_HOUR
    } else if field.eq_ignore_ascii_case("MINUTE") {
        &EXTRACT_MINUTE
    } else if field.eq_ignore_ascii_case("SECOND") {
        &EXTRACT_SECOND
    } else if field.eq_ignore_ascii_case("QUARTER") {
        &EXTRACT_QUARTER
    } else if field.eq_ignore_ascii_case("WEEK") {
        &EXTRACT_WEEK
    } else if field.eq_ignore_ascii_case("DOY") || field.eq_ignore_ascii_case("DAYOFYEAR") {
        &EXTRACT_DOY
    } else if field.eq_ignore_ascii_case("DOW") || field.eq_ignore_ascii_case("DAYOFWEEK") {
        &EXTRACT_DOW
    } else if field.eq_ignore_ascii_case("ISODOW") || field.eq_ignore_ascii_case("ISODAYOFWEEK") {
        &EXTRACT_ISODOW
    } else {
        return None;
    };
    Some(builtin)
}

/// Whether a name is a valid EXTRACT field; the lowerer checks this while
/// flattening the `field FROM source` shape.
pub fn is_valid_field(field: &str) -> bool {
    field_builtin(field).is_some()
}

fn update_extract(_ctx: &Context, spec: &Spec, f: &Node) -> Result<UpdatePlan, TypeError> {
    if f.args.len() != 2 {
        return Err(TypeError::Arity {
            spec: spec.name,
            expected: "exactly two arguments: field and datetime",
        });
    }
    let field_node = &f.args[0];
    let datetime_node = &f.args[1];
    if field_node.data_type != DataType::String || datetime_node.data_type != DataType::DateTime {
        return Err(TypeError::Incompatible {
            spec: spec.name,
            detail: "expects (STRING, DATETIME) arguments",
        });
    }

    let builtin = field_builtin(&field_node.text).ok_or_else(|| TypeError::InvalidField {
        spec: spec.name,
        field: field_node.text.clone(),
    })?;

    // The field argument is resolved away; only the datetime remains.
    Ok(UpdatePlan {
        expected: vec![DataType::DateTime],
        return_type: DataType::Int,
        builtin: Some(builtin),
        retain: 1..2,
    })
}

fn update_shorthand(_ctx: &Context, spec: &Spec, f: &Node) -> Result<UpdatePlan, TypeError> {
    if f.args.len() != 1 {
        return Err(TypeError::Arity {
            spec: spec.name,
            expected: "exactly one argument: datetime",
        });
    }
    if f.args[0].data_type != DataType::DateTime {
        return Err(TypeError::Incompatible {
            spec: spec.name,
            detail: "expects a DATETIME argument",
        });
    }
    let builtin = field_builtin(spec.name).ok_or_else(|| TypeError::InvalidField {
        spec: spec.name,
        field: spec.name.to_string(),
    })?;
    Ok(UpdatePlan::new(
        vec![DataType::DateTime],
        DataType::Int,
        builtin,
    ))
}

static EXTRACT_SPEC: Spec = Spec {
    name: "EXTRACT",
    description: "Extracts a specified date/time part from a DATETIME value.",
    volatile: false,
    update: update_extract,
};

static DATEPART_SPEC: Spec = Spec {
    name: "DATEPART",
    description: "Extracts a specified date/time part from a DATETIME value.",
    volatile: false,
    update: update_extract,
};

macro_rules! shorthand_spec {
    ($static_name:ident, $name:literal, $description:literal) => {
        static $static_name: Spec = Spec {
            name: $name,
            description: $description,
            volatile: false,
            update: update_shorthand,
        };
    };
}

shorthand_spec!(YEAR_SPEC, "YEAR", "Returns the year from a DATETIME value.");
shorthand_spec!(MONTH_SPEC, "MONTH", "Returns the month from a DATETIME value.");
shorthand_spec!(DAY_SPEC, "DAY", "Returns the day from a DATETIME value.");
shorthand_spec!(HOUR_SPEC, "HOUR", "Returns the hour from a DATETIME value.");
shorthand_spec!(MINUTE_SPEC, "MINUTE", "Returns the minute from a DATETIME value.");
shorthand_spec!(SECOND_SPEC, "SECOND", "Returns the second from a DATETIME value.");
shorthand_spec!(QUARTER_SPEC, "QUARTER", "Returns the quarter from a DATETIME value.");
shorthand_spec!(WEEK_SPEC, "WEEK", "Returns the ISO week number from a DATETIME value.");
shorthand_spec!(DOY_SPEC, "DOY", "Returns the day of the year from a DATETIME value.");
shorthand_spec!(DAYOFYEAR_SPEC, "DAYOFYEAR", "Returns the day of the year from a DATETIME value.");
shorthand_spec!(DOW_SPEC, "DOW", "Returns the day of the week (0 for Sunday) from a DATETIME value.");
shorthand_spec!(DAYOFWEEK_SPEC, "DAYOFWEEK", "Returns the day of the week (0 for Sunday) from a DATETIME value.");
shorthand_spec!(ISODOW_SPEC, "ISODOW", "Returns the ISO day of the week (1 for Monday to 7 for Sunday) from a DATETIME value.");
shorthand_spec!(ISODAYOFWEEK_SPEC, "ISODAYOFWEEK", "Returns the ISO day of the week (1 for Monday to 7 for Sunday) from a DATETIME value.");

pub fn register(ctx: &mut Context) {
    ctx.register_spec(&EXTRACT_SPEC);
    ctx.register_spec(&DATEPART_SPEC);
    ctx.register_spec(&YEAR_SPEC);
    ctx.register_spec(&MONTH_SPEC);
    ctx.register_spec(&DAY_SPEC);
    ctx.register_spec(&HOUR_SPEC);
    ctx.register_spec(&MINUTE_SPEC);
    ctx.register_spec(&SECOND_SPEC);
    ctx.register_spec(&QUARTER_SPEC);
    ctx.register_spec(&WEEK_SPEC);
    ctx.register_spec(&DOY_SPEC);
    ctx.register_spec(&DAYOFYEAR_SPEC);
    ctx.register_spec(&DOW_SPEC);
    ctx.register_spec(&DAYOFWEEK_SPEC);
    ctx.register_spec(&ISODOW_SPEC);
    ctx.register_spec(&ISODAYOFWEEK_SPEC);

    for builtin in [
        &EXTRACT_YEAR, &EXTRACT_MONTH, &EXTRACT_DAY, &EXTRACT_HOUR, &EXTRACT_MINUTE,
        &EXTRACT_SECOND, &EXTRACT_QUARTER, &EXTRACT_WEEK, &EXTRACT_DOY, &EXTRACT_DOW,
        &EXTRACT_ISODOW,
    ] {
        ctx.register_builtin(builtin);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sift_common::datetime::parse_datetime;

    fn unary(epoch: i64) -> Node {
        let mut node = Node::function("YEAR");
        node.args = vec![Node::datetime_lit(epoch, false)];
        node
    }

    #[test]
    fn field_values() {
        let ctx = Context::new();
        let epoch = parse_datetime("2021-06-15T08:09:10").unwrap();
        let node = unary(epoch);
        assert_eq!(extract_year(&ctx, &node).as_int(), 2021);
        assert_eq!(extract_month(&ctx, &node).as_int(), 6);
        assert_eq!(extract_day(&ctx, &node).as_int(), 15);
        assert_eq!(extract_hour(&ctx, &node).as_int(), 8);
        assert_eq!(extract_minute(&ctx, &node).as_int(), 9);
        assert_eq!(extract_second(&ctx, &node).as_int(), 10);
        assert_eq!(extract_quarter(&ctx, &node).as_int(), 2);
        assert_eq!(extract_week(&ctx, &node).as_int(), 24);
        assert_eq!(extract_doy(&ctx, &node).as_int(), 166);
        // 2021-06-15 was a Tuesday.
        assert_eq!(extract_dow(&ctx, &node).as_int(), 2);
        assert_eq!(extract_isodow(&ctx, &node).as_int(), 2);
    }

    #[test]
    fn sunday_weekday_forms() {
        let ctx = Context::new();
        let node = unary(parse_datetime("2021-01-03").unwrap());
        assert_eq!(extract_dow(&ctx, &node).as_int(), 0);
        assert_eq!(extract_isodow(&ctx, &node).as_int(), 7);
    }

    #[test]
    fn invalid_field_is_rejected() {
        assert!(is_valid_field("year"));
        assert!(is_valid_field("ISODAYOFWEEK"));
        assert!(!is_valid_field("FORTNIGHT"));
    }

    #[test]
    fn update_drops_field_argument() {
        let ctx = Context::new();
        let mut node = Node::function("EXTRACT");
        node.args = vec![
            Node::string_lit("YEAR", false),
            Node::datetime_lit(0, false),
        ];
        let plan = update_extract(&ctx, &EXTRACT_SPEC, &node).unwrap();
        assert_eq!(plan.retain, 1..2);
        assert_eq!(plan.return_type, DataType::Int);
        assert_eq!(plan.builtin.unwrap().name, "extract_year");
    }
}
