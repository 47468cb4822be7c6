//! JSON-backed row source: the current row is a `serde_json::Value`
//! object and every registered column reads from it through one shared
//! getter builtin.

use sift_common::datetime;
use sift_engine::{Builtin, Context, DataType, Node};

use crate::fixture::Table;

/// A typed null node matching a column's declared type.
pub fn typed_null(data_type: DataType) -> Node {
    match data_type {
        DataType::Int => Node::int_lit(0, true),
        DataType::Double => Node::double_lit(0.0, true),
        DataType::Bool => Node::bool_lit(false, true),
        DataType::DateTime => Node::datetime_lit(0, true),
        _ => Node::string_lit("", true),
    }
}

/// Case-insensitive field lookup in a JSON object.
fn field<'v>(row: &'v serde_json::Value, name: &str) -> Option<&'v serde_json::Value> {
    let object = row.as_object()?;
    object
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value)
}

/// Column getter over the context's current JSON row. Missing fields and
/// JSON nulls become typed nulls of the column type.
fn json_column(ctx: &Context, f: &Node) -> Node {
    let Some(row) = ctx.current_row() else {
        return typed_null(f.data_type);
    };
    let Some(row) = row.downcast_ref::<serde_json::Value>() else {
        return typed_null(f.data_type);
    };
    let Some(value) = field(row, &f.text) else {
        return typed_null(f.data_type);
    };
    if value.is_null() {
        return typed_null(f.data_type);
    }

    match f.data_type {
        DataType::Int => match value {
            serde_json::Value::Number(n) => {
                Node::int_lit(n.as_f64().unwrap_or(0.0) as i32, false)
            }
            serde_json::Value::String(s) => match s.trim().parse::<i32>() {
                Ok(v) => Node::int_lit(v, false),
                Err(_) => typed_null(DataType::Int),
            },
            _ => typed_null(DataType::Int),
        },
        DataType::Double => match value {
            serde_json::Value::Number(n) => Node::double_lit(n.as_f64().unwrap_or(0.0), false),
            serde_json::Value::String(s) => match s.trim().parse::<f64>() {
                Ok(v) => Node::double_lit(v, false),
                Err(_) => typed_null(DataType::Double),
            },
            _ => typed_null(DataType::Double),
        },
        DataType::Bool => match value {
            serde_json::Value::Bool(b) => Node::bool_lit(*b, false),
            _ => typed_null(DataType::Bool),
        },
        DataType::DateTime => match value {
            // Date strings parse through the shared date reader; bare
            // numbers are taken as UTC epochs with zero meaning null.
            serde_json::Value::String(s) => match datetime::parse_datetime(s) {
                Some(epoch) => Node::datetime_lit(epoch, false),
                None => typed_null(DataType::DateTime),
            },
            serde_json::Value::Number(n) => {
                let epoch = n.as_i64().unwrap_or(0);
                Node::datetime_lit(epoch, epoch == 0)
            }
            _ => typed_null(DataType::DateTime),
        },
        _ => match value {
            serde_json::Value::String(s) => Node::string_lit(s, s.is_empty()),
            serde_json::Value::Number(n) => Node::string_lit(&n.to_string(), false),
            serde_json::Value::Bool(b) => {
                Node::string_lit(if *b { "true" } else { "false" }, false)
            }
            _ => typed_null(DataType::String),
        },
    }
}

pub static JSON_COLUMN: Builtin = Builtin {
    name: "json_column",
    summary: "Reads the named column from the current JSON row.",
    run: json_column,
};

/// A fresh engine context with the defaults installed and the table's
/// columns registered against the JSON getter. Unknown type names fall
/// back to STRING.
pub fn build_context(table: &Table) -> Context {
    let mut ctx = Context::with_defaults();
    for column in &table.columns {
        let mut data_type = DataType::from_type_name(&column.data_type);
        if data_type == DataType::Unknown {
            data_type = DataType::String;
        }
        ctx.register_column(&column.name, data_type, &JSON_COLUMN);
    }
    ctx
}
