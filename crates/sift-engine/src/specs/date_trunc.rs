//! DATE_TRUNC: truncate a datetime to the start of a part. Weeks start on
//! Sunday.

use sift_common::datetime::{self, CivilTime};
use sift_common::DataType;

use crate::ctx::{Builtin, Context, Spec, UpdatePlan};
use crate::error::TypeError;
use crate::eval::eval;
use crate::node::Node;

fn trunc_with(ctx: &Context, f: &Node, truncate: fn(i64) -> i64) -> Node {
    let child = eval(ctx, &f.args[0]);
    if child.is_null || child.data_type != DataType::DateTime {
        return Node::datetime_lit(0, true);
    }
    Node::datetime_lit(truncate(child.as_epoch()), false)
}

fn to_midnight(ct: &mut CivilTime) {
    ct.hour = 0;
    ct.minute = 0;
    ct.second = 0;
}

fn trunc_second_epoch(epoch: i64) -> i64 {
    // time is already second-precision
    epoch
}

fn trunc_minute_epoch(epoch: i64) -> i64 {
    let mut ct = CivilTime::from_epoch(epoch);
    ct.second = 0;
    ct.to_epoch()
}

fn trunc_hour_epoch(epoch: i64) -> i64 {
    let mut ct = CivilTime::from_epoch(epoch);
    ct.minute = 0;
    ct.second = 0;
    ct.to_epoch()
}

fn trunc_day_epoch(epoch: i64) -> i64 {
    let mut ct = CivilTime::from_epoch(epoch);
    to_midnight(&mut ct);
    ct.to_epoch()
}

fn trunc_week_epoch(epoch: i64) -> i64 {
    let mut ct = CivilTime::from_epoch(epoch);
    to_midnight(&mut ct);
    // Back to Sunday; normalization absorbs day <= 0.
    ct.day -= datetime::weekday(epoch);
    ct.to_epoch()
}

fn trunc_month_epoch(epoch: i64) -> i64 {
    let mut ct = CivilTime::from_epoch(epoch);
    to_midnight(&mut ct);
    ct.day = 1;
    ct.to_epoch()
}

fn trunc_quarter_epoch(epoch: i64) -> i64 {
    let mut ct = CivilTime::from_epoch(epoch);
    to_midnight(&mut ct);
    ct.day = 1;
    ct.month = ((ct.month - 1) / 3) * 3 + 1;
    ct.to_epoch()
}

fn trunc_year_epoch(epoch: i64) -> i64 {
    let mut ct = CivilTime::from_epoch(epoch);
    to_midnight(&mut ct);
    ct.day = 1;
    ct.month = 1;
    ct.to_epoch()
}

fn trunc_decade_epoch(epoch: i64) -> i64 {
    let mut ct = CivilTime::from_epoch(epoch);
    to_midnight(&mut ct);
    ct.day = 1;
    ct.month = 1;
    ct.year = (ct.year / 10) * 10;
    ct.to_epoch()
}

fn trunc_century_epoch(epoch: i64) -> i64 {
    let mut ct = CivilTime::from_epoch(epoch);
    to_midnight(&mut ct);
    ct.day = 1;
    ct.month = 1;
    ct.year = (ct.year / 100) * 100;
    ct.to_epoch()
}

fn trunc_millennium_epoch(epoch: i64) -> i64 {
    let mut ct = CivilTime::from_epoch(epoch);
    to_midnight(&mut ct);
    ct.day = 1;
    ct.month = 1;
    ct.year = (ct.year / 1000) * 1000;
    ct.to_epoch()
}

macro_rules! trunc_builtin {
    ($fn_name:ident, $static_name:ident, $name:literal, $summary:literal, $truncate:expr) => {
        fn $fn_name(ctx: &Context, f: &Node) -> Node {
            trunc_with(ctx, f, $truncate)
        }
        static $static_name: Builtin = Builtin {
            name: $name,
            summary: $summary,
            run: $fn_name,
        };
    };
}

trunc_builtin!(trunc_second, TRUNC_SECOND, "trunc_second", "Truncates a DATETIME to the second.", trunc_second_epoch);
trunc_builtin!(trunc_minute, TRUNC_MINUTE, "trunc_minute", "Truncates a DATETIME to the minute.", trunc_minute_epoch);
trunc_builtin!(trunc_hour, TRUNC_HOUR, "trunc_hour", "Truncates a DATETIME to the hour.", trunc_hour_epoch);
trunc_builtin!(trunc_day, TRUNC_DAY, "trunc_day", "Truncates a DATETIME to the day.", trunc_day_epoch);
trunc_builtin!(trunc_week, TRUNC_WEEK, "trunc_week", "Truncates a DATETIME to the week.", trunc_week_epoch);
trunc_builtin!(trunc_month, TRUNC_MONTH, "trunc_month", "Truncates a DATETIME to the month.", trunc_month_epoch);
trunc_builtin!(trunc_quarter, TRUNC_QUARTER, "trunc_quarter", "Truncates a DATETIME to the quarter.", trunc_quarter_epoch);
trunc_builtin!(trunc_year, TRUNC_YEAR, "trunc_year", "Truncates a DATETIME to the year.", trunc_year_epoch);
trunc_builtin!(trunc_decade, TRUNC_DECADE, "trunc_decade", "Truncates a DATETIME to the decade.", trunc_decade_epoch);
trunc_builtin!(trunc_century, TRUNC_CENTURY, "trunc_century", "Truncates a DATETIME to the century.", trunc_century_epoch);
trunc_builtin!(trunc_millennium, TRUNC_MILLENNIUM, "trunc_millennium", "Truncates a DATETIME to the millennium.", trunc_millennium_epoch);

fn part_builtin(part: &str) -> Option<&'static Builtin> {
    let builtin = if part.eq_ignore_ascii_case("SECOND") {
        &TRUNC_SECOND
    } else if part.eq_ignore_ascii_case("MINUTE") {
        &TRUNC_MINUTE
    } else if part.eq_ignore_ascii_case("HOUR") {
        &TRUNC_HOUR
    } else if part.eq_ignore_ascii_case("DAY") {
        &TRUNC_DAY
    } else if part.eq_ignore_ascii_case("WEEK") {
        &TRUNC_WEEK
    } else if part.eq_ignore_ascii_case("MONTH") {
        &TRUNC_MONTH
    } else if part.eq_ignore_ascii_case("QUARTER") {
        &TRUNC_QUARTER
    } else if part.eq_ignore_ascii_case("YEAR") {
        &TRUNC_YEAR
    } else if part.eq_ignore_ascii_case("DECADE") {
        &TRUNC_DECADE
    } else if part.eq_ignore_ascii_case("CENTURY") {
        &TRUNC_CENTURY
    } else if part.eq_ignore_ascii_case("MILLENNIUM") {
        &TRUNC_MILLENNIUM
    } else {
        return None;
    };
    Some(builtin)
}

fn update_date_trunc(_ctx: &Context, spec: &Spec, f: &Node) -> Result<UpdatePlan, TypeError> {
    if f.args.len() != 2 {
        return Err(TypeError::Arity {
            spec: spec.name,
            expected: "exactly two arguments: part and datetime",
        });
    }
    let part_node = &f.args[0];
    let datetime_node = &f.args[1];
    if part_node.data_type != DataType::String || datetime_node.data_type != DataType::DateTime {
        return Err(TypeError::Incompatible {
            spec: spec.name,
            detail: "expects (STRING, DATETIME) arguments",
        });
    }

    let builtin = part_builtin(&part_node.text).ok_or_else(|| TypeError::InvalidField {
        spec: spec.name,
        field: part_node.text.clone(),
    })?;

    Ok(UpdatePlan {
        expected: vec![DataType::DateTime],
        return_type: DataType::DateTime,
        builtin: Some(builtin),
        retain: 1..2,
    })
}

static DATE_TRUNC_SPEC: Spec = Spec {
    name: "DATE_TRUNC",
    description: "Truncates a DATETIME value to a specified part.",
    volatile: false,
    update: update_date_trunc,
};

pub fn register(ctx: &mut Context) {
    ctx.register_spec(&DATE_TRUNC_SPEC);

    for builtin in [
        &TRUNC_SECOND, &TRUNC_MINUTE, &TRUNC_HOUR, &TRUNC_DAY, &TRUNC_WEEK, &TRUNC_MONTH,
        &TRUNC_QUARTER, &TRUNC_YEAR, &TRUNC_DECADE, &TRUNC_CENTURY, &TRUNC_MILLENNIUM,
    ] {
        ctx.register_builtin(builtin);
    }
}
