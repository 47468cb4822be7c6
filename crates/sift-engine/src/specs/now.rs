//! NOW / CURRENT_TIMESTAMP / GETDATE / CURRENT_DATE. Zero-argument,
//! volatile: the simplifier leaves them alone unless the context opts in
//! to folding.

use std::time::{SystemTime, UNIX_EPOCH};

use sift_common::datetime::CivilTime;
use sift_common::DataType;

use crate::ctx::{Builtin, Context, Spec, UpdatePlan};
use crate::error::TypeError;
use crate::node::Node;

fn utc_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

fn now(_ctx: &Context, _f: &Node) -> Node {
    Node::datetime_lit(utc_now(), false)
}

fn current_date(_ctx: &Context, _f: &Node) -> Node {
    let mut ct = CivilTime::from_epoch(utc_now());
    ct.hour = 0;
    ct.minute = 0;
    ct.second = 0;
    Node::datetime_lit(ct.to_epoch(), false)
}

static NOW: Builtin = Builtin {
    name: "now",
    summary: "Returns the current date and time.",
    run: now,
};

static CURRENT_DATE: Builtin = Builtin {
    name: "current_date",
    summary: "Returns the current date.",
    run: current_date,
};

fn update_now(_ctx: &Context, _spec: &Spec, _f: &Node) -> Result<UpdatePlan, TypeError> {
    Ok(UpdatePlan {
        expected: Vec::new(),
        return_type: DataType::DateTime,
        builtin: Some(&NOW),
        retain: 0..0,
    })
}

fn update_current_date(_ctx: &Context, _spec: &Spec, _f: &Node) -> Result<UpdatePlan, TypeError> {
    Ok(UpdatePlan {
        expected: Vec::new(),
        return_type: DataType::DateTime,
        builtin: Some(&CURRENT_DATE),
        retain: 0..0,
    })
}

static NOW_SPEC: Spec = Spec {
    name: "NOW",
    description: "Returns the current date and time.",
    volatile: true,
    update: update_now,
};

static GETDATE_SPEC: Spec = Spec {
    name: "GETDATE",
    description: "Returns the current date and time (DATETIME).",
    volatile: true,
    update: update_now,
};

static CURRENT_TIMESTAMP_SPEC: Spec = Spec {
    name: "CURRENT_TIMESTAMP",
    description: "Returns the current date and time (DATETIME).",
    volatile: true,
    update: update_now,
};

static CURRENT_DATE_SPEC: Spec = Spec {
    name: "CURRENT_DATE",
    description: "Returns the current date (DATE).",
    volatile: true,
    update: update_current_date,
};

pub fn register(ctx: &mut Context) {
    ctx.register_spec(&NOW_SPEC);
    ctx.register_spec(&GETDATE_SPEC);
    ctx.register_spec(&CURRENT_DATE_SPEC);
    ctx.register_spec(&CURRENT_TIMESTAMP_SPEC);

    ctx.register_builtin(&NOW);
    ctx.register_builtin(&CURRENT_DATE);
}

#[cfg(test)]
mod tests {
    use super::*;
    use sift_common::datetime::SECS_PER_DAY;

    #[test]
    fn current_date_truncates_to_day() {
        let ctx = Context::new();
        let result = current_date(&ctx, &Node::function("CURRENT_DATE"));
        assert_eq!(result.as_epoch() % SECS_PER_DAY, 0);
        assert!(!result.is_null);
    }

    #[test]
    fn now_is_after_2020() {
        let ctx = Context::new();
        let result = now(&ctx, &Node::function("NOW"));
        assert!(result.as_epoch() > 1_577_836_800); // 2020-01-01
    }

    #[test]
    fn now_specs_are_volatile() {
        assert!(NOW_SPEC.volatile);
        assert!(CURRENT_DATE_SPEC.volatile);
    }
}
