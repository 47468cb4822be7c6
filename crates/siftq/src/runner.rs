//! The fixture runner: compile each query once, evaluate it against every
//! row, collect the matching `id` values, and compare with the expected
//! list.

use std::rc::Rc;

use sift_engine::{evaluate, DataType};

use crate::fixture::{Fixture, Query};
use crate::json_rows::build_context;

/// The result of one query of a fixture.
#[derive(Debug)]
pub struct QueryOutcome {
    pub sql: String,
    pub matched: Vec<String>,
    pub expected: Vec<String>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl QueryOutcome {
    pub fn passed(&self) -> bool {
        self.errors.is_empty() && self.matched == self.expected
    }
}

/// The `id` value of a row, for reporting: the row's `id` field when
/// present, else its position.
fn row_id(row: &serde_json::Value, index: usize) -> String {
    row.as_object()
        .and_then(|object| {
            object
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case("id"))
                .map(|(_, value)| id_text(value))
        })
        .unwrap_or_else(|| index.to_string())
}

/// Render an id the same way whether it arrives as a JSON number or
/// string, so expectation lists can use either.
fn id_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Run one query against the fixture's table.
pub fn run_query(fixture: &Fixture, query: &Query) -> QueryOutcome {
    let ctx = build_context(&fixture.table);
    let expected: Vec<String> = query.expected.iter().map(id_text).collect();

    let tree = ctx.compile(&query.sql);
    let mut matched = Vec::new();
    if ctx.get_errors().is_empty() {
        for (index, row) in fixture.table.rows.iter().enumerate() {
            // A query with no WHERE clause matches every row.
            let row_matches = match &tree {
                Some(tree) => {
                    ctx.set_current_row(Some(Rc::new(row.clone())));
                    let result = evaluate(&ctx, tree);
                    result.data_type == DataType::Bool && !result.is_null && result.as_bool()
                }
                None => true,
            };
            if row_matches {
                matched.push(row_id(row, index));
            }
        }
    }

    QueryOutcome {
        sql: query.sql.clone(),
        matched,
        expected,
        errors: ctx.get_errors(),
        warnings: ctx.get_warnings(),
    }
}

/// Run every query of a fixture.
pub fn run_fixture(fixture: &Fixture) -> Vec<QueryOutcome> {
    fixture
        .queries
        .iter()
        .map(|query| run_query(fixture, query))
        .collect()
}
