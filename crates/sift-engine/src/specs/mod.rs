//! The default spec set: one module per operator/function family, each
//! exposing `register(ctx)` to install its specs and builtins.

pub mod arithmetic;
pub mod avg;
pub mod between;
pub mod boolean;
pub mod cast;
pub mod coalesce;
pub mod comparison;
pub mod concat;
pub mod convert_tz;
pub mod date_trunc;
pub mod extract;
pub mod in_list;
pub mod is_boolean;
pub mod is_null;
pub mod length;
pub mod like;
pub mod lower_upper;
pub mod min_max;
pub mod now;
pub mod round;
pub mod substr;
pub mod sum;
pub mod trim;

use crate::ctx::Context;

/// Install every default spec and builtin.
pub fn register_all(ctx: &mut Context) {
    arithmetic::register(ctx);
    boolean::register(ctx);
    between::register(ctx);
    coalesce::register(ctx);
    comparison::register(ctx);
    convert_tz::register(ctx);
    concat::register(ctx);
    date_trunc::register(ctx);
    extract::register(ctx);
    is_boolean::register(ctx);
    is_null::register(ctx);
    in_list::register(ctx);
    like::register(ctx);
    cast::register(ctx);
    avg::register(ctx);
    length::register(ctx);
    lower_upper::register(ctx);
    min_max::register(ctx);
    now::register(ctx);
    round::register(ctx);
    substr::register(ctx);
    sum::register(ctx);
    trim::register(ctx);
}
