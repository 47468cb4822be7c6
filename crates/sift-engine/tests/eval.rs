//! End-to-end pipeline tests: source text through tokenize, parse, lower,
//! resolve, simplify, and per-row evaluation.

use std::collections::HashMap;
use std::rc::Rc;

use sift_engine::{evaluate, Builtin, Context, DataType, Node};

/// Row representation for these tests: column name (lowercase) to value.
type Row = HashMap<String, Node>;

fn typed_null(data_type: DataType) -> Node {
    match data_type {
        DataType::Int => Node::int_lit(0, true),
        DataType::Double => Node::double_lit(0.0, true),
        DataType::Bool => Node::bool_lit(false, true),
        DataType::DateTime => Node::datetime_lit(0, true),
        _ => Node::string_lit("", true),
    }
}

fn map_getter(ctx: &Context, f: &Node) -> Node {
    let Some(row) = ctx.current_row() else {
        return typed_null(f.data_type);
    };
    let Some(map) = row.downcast_ref::<Row>() else {
        return typed_null(f.data_type);
    };
    match map.get(&f.text.to_ascii_lowercase()) {
        Some(value) => value.clone(),
        None => typed_null(f.data_type),
    }
}

static MAP_GETTER: Builtin = Builtin {
    name: "map_column",
    summary: "Reads a column from the in-memory test row.",
    run: map_getter,
};

fn test_context() -> Context {
    let mut ctx = Context::with_defaults();
    ctx.register_column("id", DataType::Int, &MAP_GETTER);
    ctx.register_column("name", DataType::String, &MAP_GETTER);
    ctx.register_column("age", DataType::Int, &MAP_GETTER);
    ctx.register_column("created", DataType::DateTime, &MAP_GETTER);
    ctx.register_column("x", DataType::Int, &MAP_GETTER);
    ctx.register_column("y", DataType::Int, &MAP_GETTER);
    ctx.register_column("s", DataType::String, &MAP_GETTER);
    ctx.register_column("v", DataType::Int, &MAP_GETTER);
    ctx.register_column("score", DataType::Double, &MAP_GETTER);
    ctx.register_column("flag", DataType::Bool, &MAP_GETTER);
    ctx
}

fn row(entries: &[(&str, Node)]) -> Rc<Row> {
    let mut map = Row::new();
    for (name, value) in entries {
        map.insert(name.to_string(), value.clone());
    }
    Rc::new(map)
}

fn dt(text: &str) -> Node {
    Node::datetime_lit(sift_common::datetime::parse_datetime(text).unwrap(), false)
}

/// Compile `sql` and evaluate it against `entries`. Panics on pipeline
/// errors so tests fail loudly.
fn run(sql: &str, entries: &[(&str, Node)]) -> Node {
    let ctx = test_context();
    let compiled = ctx
        .compile(sql)
        .unwrap_or_else(|| panic!("compile failed: {:?}", ctx.get_errors()));
    assert!(ctx.get_errors().is_empty(), "errors: {:?}", ctx.get_errors());
    ctx.set_current_row(Some(row(entries)));
    evaluate(&ctx, &compiled)
}

fn expect_true(sql: &str, entries: &[(&str, Node)]) {
    let result = run(sql, entries);
    assert_eq!(result.data_type, DataType::Bool, "{sql}");
    assert!(!result.is_null, "{sql} was null");
    assert!(result.as_bool(), "{sql} was false");
}

fn expect_false(sql: &str, entries: &[(&str, Node)]) {
    let result = run(sql, entries);
    assert!(!result.is_null, "{sql} was null");
    assert!(!result.as_bool(), "{sql} was true");
}

fn expect_null(sql: &str, entries: &[(&str, Node)]) {
    let result = run(sql, entries);
    assert!(result.is_null, "{sql} was not null");
}

// ── The end-to-end scenarios ──────────────────────────────────────────

#[test]
fn between_and_like_match() {
    let entries = [
        ("id", Node::int_lit(2, false)),
        ("name", Node::string_lit("Bob", false)),
        ("age", Node::int_lit(30, false)),
        ("created", dt("2021-01-02T00:00:00Z")),
    ];
    expect_true("WHERE age BETWEEN 20 AND 40 AND name LIKE 'b%'", &entries);
    expect_false("WHERE age BETWEEN 35 AND 40 AND name LIKE 'b%'", &entries);
}

#[test]
fn null_column_is_null_not_false_equal() {
    let entries = [("age", Node::int_lit(0, true))];
    expect_true("WHERE age IS NULL", &entries);
    expect_null("WHERE age = 30", &entries);
    expect_false("WHERE age IS NOT NULL", &entries);
}

#[test]
fn interval_addition_hits_timestamp() {
    let entries = [("created", dt("2021-01-02T00:00:00Z"))];
    expect_true(
        "WHERE created + INTERVAL '1 day' = TIMESTAMP '2021-01-03T00:00:00Z'",
        &entries,
    );
    expect_false(
        "WHERE created + INTERVAL '2 days' = TIMESTAMP '2021-01-03T00:00:00Z'",
        &entries,
    );
}

#[test]
fn int_division_promotes() {
    let entries = [("x", Node::int_lit(5, false)), ("y", Node::int_lit(2, false))];
    expect_true("WHERE x / y = 2.5", &entries);
}

#[test]
fn trim_cleans_spaces() {
    let entries = [("s", Node::string_lit("  hello  ", false))];
    expect_true("WHERE TRIM(s) = 'hello'", &entries);
    expect_true("WHERE LTRIM(s) = 'hello  '", &entries);
    expect_true("WHERE RTRIM(s) = '  hello'", &entries);
}

#[test]
fn in_with_null_candidates() {
    let entries = [("v", Node::int_lit(3, false))];
    // No match with a null in the list: null.
    expect_null("WHERE v IN (1, 2, NULL)", &entries);
    // The documented deviation: NOT IN is a plain negation.
    expect_true("WHERE v NOT IN (1, 2, NULL)", &entries);
    // A hit is a hit regardless of nulls.
    let entries = [("v", Node::int_lit(2, false))];
    expect_true("WHERE v IN (1, 2, NULL)", &entries);
    expect_false("WHERE v NOT IN (1, 2, NULL)", &entries);
}

// ── More operator coverage ────────────────────────────────────────────

#[test]
fn flipped_comparisons() {
    let entries = [("age", Node::int_lit(30, false))];
    expect_true("WHERE age > 20", &entries);
    expect_true("WHERE age >= 30", &entries);
    expect_false("WHERE age > 30", &entries);
    expect_true("WHERE 20 < age", &entries);
    expect_true("WHERE age <> 31", &entries);
    expect_true("WHERE age != 31", &entries);
    expect_true("WHERE age == 30", &entries);
}

#[test]
fn string_comparison_is_case_insensitive() {
    let entries = [("name", Node::string_lit("Bob", false))];
    expect_true("WHERE name = 'BOB'", &entries);
    expect_true("WHERE name != 'alice'", &entries);
}

#[test]
fn literal_column_comparison_converts_the_literal() {
    let entries = [("created", dt("2021-01-02T00:00:00Z"))];
    // The string literal converts toward the datetime column.
    expect_true("WHERE created = '2021-01-02T00:00:00Z'", &entries);
    expect_true("WHERE created < '2021-02-01'", &entries);
}

#[test]
fn not_forms() {
    let entries = [
        ("age", Node::int_lit(30, false)),
        ("name", Node::string_lit("Bob", false)),
    ];
    expect_true("WHERE age NOT BETWEEN 31 AND 40", &entries);
    expect_true("WHERE name NOT LIKE 'a%'", &entries);
    expect_true("WHERE NOT age = 31", &entries);
    expect_false("WHERE NOT age = 30", &entries);
}

#[test]
fn is_boolean_predicates() {
    // Null is distinct from both truth values.
    let null_flag = [("flag", Node::bool_lit(false, true))];
    expect_false("WHERE flag IS TRUE", &null_flag);
    expect_true("WHERE flag IS NOT TRUE", &null_flag);
    expect_false("WHERE flag IS FALSE", &null_flag);
    expect_true("WHERE flag IS NOT FALSE", &null_flag);

    let set_flag = [("flag", Node::bool_lit(true, false))];
    expect_true("WHERE flag IS TRUE", &set_flag);
    expect_false("WHERE flag IS NOT TRUE", &set_flag);
    expect_false("WHERE flag IS FALSE", &set_flag);
    expect_true("WHERE flag IS NOT FALSE", &set_flag);
}

#[test]
fn three_valued_logic_end_to_end() {
    let entries = [("age", Node::int_lit(0, true)), ("x", Node::int_lit(1, false))];
    // AND(null, false) = false
    expect_false("WHERE age = 30 AND x = 2", &entries);
    // AND(null, true) = null
    expect_null("WHERE age = 30 AND x = 1", &entries);
    // OR(null, true) = true
    expect_true("WHERE age = 30 OR x = 1", &entries);
    // OR(null, false) = null
    expect_null("WHERE age = 30 OR x = 2", &entries);
    // NOT(null) = null
    expect_null("WHERE NOT age = 30", &entries);
}

#[test]
fn cast_forms_are_equivalent() {
    let entries = [("x", Node::int_lit(5, false))];
    expect_true("WHERE x::STRING = '5'", &entries);
    expect_true("WHERE CAST(x AS STRING) = '5'", &entries);
    expect_true("WHERE CONVERT(STRING, x) = '5'", &entries);
    expect_true("WHERE x::DOUBLE = 5.0", &entries);
    expect_true("WHERE CAST(x AS BOOL) = TRUE", &entries);
}

#[test]
fn datetime_string_round_trip() {
    let entries = [("created", dt("2021-06-15T06:09:10Z"))];
    expect_true("WHERE created::STRING = '2021-06-15T06:09:10'", &entries);
    expect_true("WHERE created::STRING::DATETIME = created", &entries);
}

#[test]
fn coalesce_picks_first_non_null() {
    let entries = [("age", Node::int_lit(0, true)), ("x", Node::int_lit(7, false))];
    expect_true("WHERE COALESCE(age, x, 9) = 7", &entries);
    expect_true("WHERE COALESCE(age, age) IS NULL", &entries);
}

#[test]
fn string_functions() {
    let entries = [("name", Node::string_lit("Bob", false))];
    expect_true("WHERE LENGTH(name) = 3", &entries);
    expect_true("WHERE LOWER(name) = 'bob'", &entries);
    expect_true("WHERE UPPER(name) = 'BOB'", &entries);
    expect_true("WHERE SUBSTR(name, 2) = 'ob'", &entries);
    expect_true("WHERE SUBSTR(name, 1, 2) = 'bo'", &entries);
    expect_true("WHERE SUBSTRING(name, 1, 2) = 'bo'", &entries);
    expect_true("WHERE CONCAT(name, '!') = 'Bob!'", &entries);
    expect_true("WHERE name + '!' = 'Bob!'", &entries);
    expect_null("WHERE SUBSTR(name, 9) = 'x'", &entries);
}

#[test]
fn numeric_functions() {
    // 2.75 is exact in binary, which keeps the equality checks honest.
    let entries = [("score", Node::double_lit(2.75, false))];
    expect_true("WHERE ROUND(score) = 3.0", &entries);
    expect_true("WHERE ROUND(score, 1) = 2.8", &entries);
    expect_true("WHERE FLOOR(score) = 2.0", &entries);
    expect_true("WHERE CEIL(score) = 3.0", &entries);
    expect_true("WHERE AVG(score, 3.25) = 3.0", &entries);
    expect_true("WHERE SUM(score, 1) = 3.75", &entries);
    expect_true("WHERE MIN(score, 9.0) = score", &entries);
    expect_true("WHERE MAX(1, 2, 3) = 3", &entries);
}

#[test]
fn extract_and_shorthands_agree() {
    let entries = [("created", dt("2021-06-15T08:09:10Z"))];
    expect_true("WHERE EXTRACT(YEAR FROM created) = 2021", &entries);
    expect_true("WHERE YEAR(created) = 2021", &entries);
    expect_true("WHERE EXTRACT(MONTH FROM created) = MONTH(created)", &entries);
    expect_true("WHERE EXTRACT(DOY FROM created) = DAYOFYEAR(created)", &entries);
    expect_true("WHERE DATEPART('QUARTER', created) = 2", &entries);
    expect_true("WHERE WEEK(created) = 24", &entries);
    // 2021-06-15 was a Tuesday.
    expect_true("WHERE DOW(created) = 2", &entries);
    expect_true("WHERE ISODOW(created) = 2", &entries);
}

#[test]
fn date_trunc_parts() {
    let entries = [("created", dt("2021-06-15T08:09:10Z"))];
    expect_true(
        "WHERE DATE_TRUNC('MONTH', created) = TIMESTAMP '2021-06-01'",
        &entries,
    );
    expect_true(
        "WHERE DATE_TRUNC('WEEK', created) = TIMESTAMP '2021-06-13'",
        &entries,
    );
    expect_true(
        "WHERE DATE_TRUNC('YEAR', created) = TIMESTAMP '2021-01-01'",
        &entries,
    );
}

#[test]
fn convert_tz_shifts() {
    let entries = [("created", dt("2021-01-02T12:00:00Z"))];
    expect_true(
        "WHERE CONVERT_TZ(created, 'America/New_York') = TIMESTAMP '2021-01-02T07:00:00'",
        &entries,
    );
}

#[test]
fn datetime_day_arithmetic() {
    let entries = [("created", dt("2021-01-02T00:00:00Z"))];
    expect_true("WHERE created + 1 = TIMESTAMP '2021-01-03'", &entries);
    expect_true("WHERE created - 1 = TIMESTAMP '2021-01-01'", &entries);
    expect_true("WHERE created + 0.5 = TIMESTAMP '2021-01-02T12:00:00'", &entries);
    expect_true(
        "WHERE created - TIMESTAMP '2021-01-01' = 86400.0",
        &entries,
    );
}

#[test]
fn month_interval_respects_calendar() {
    let entries = [("created", dt("2021-01-31T00:00:00Z"))];
    expect_true(
        "WHERE created + INTERVAL '1 month' = TIMESTAMP '2021-03-03'",
        &entries,
    );
    let entries = [("created", dt("2021-03-15T00:00:00Z"))];
    expect_true(
        "WHERE created - INTERVAL '1 month 14 days' = TIMESTAMP '2021-02-01'",
        &entries,
    );
}

// ── Simplifier properties ─────────────────────────────────────────────

#[test]
fn constant_expressions_fold_to_literals() {
    let ctx = test_context();
    let compiled = ctx.compile("WHERE 1 + 2 * 3 = 7").unwrap();
    assert!(compiled.is_literal(), "got: {}", compiled.dump());
    assert!(compiled.as_bool());
    // Still evaluates correctly with no row at all.
    assert!(evaluate(&ctx, &compiled).as_bool());
}

#[test]
fn boolean_algebra_laws() {
    let ctx = test_context();

    // AND(x, true) = x
    let and_true = ctx.compile("WHERE age = 30 AND TRUE").unwrap();
    let plain = ctx.compile("WHERE age = 30").unwrap();
    assert_eq!(and_true.dump(), plain.dump());

    // AND(x, false) = false
    let and_false = ctx.compile("WHERE age = 30 AND FALSE").unwrap();
    assert!(and_false.is_literal());
    assert!(!and_false.as_bool());

    // OR(x, false) = x
    let or_false = ctx.compile("WHERE age = 30 OR FALSE").unwrap();
    assert_eq!(or_false.dump(), plain.dump());

    // OR(x, true) = true
    let or_true = ctx.compile("WHERE age = 30 OR TRUE").unwrap();
    assert!(or_true.is_literal());
    assert!(or_true.as_bool());
}

#[test]
fn simplified_tree_evaluates_like_the_original() {
    // The same predicate with and without foldable padding, across rows.
    let rows: Vec<Vec<(&str, Node)>> = vec![
        vec![("age", Node::int_lit(25, false))],
        vec![("age", Node::int_lit(35, false))],
        vec![("age", Node::int_lit(0, true))],
    ];
    for entries in &rows {
        let padded = run("WHERE (age < 30 OR FALSE) AND TRUE", entries);
        let plain = run("WHERE age < 30", entries);
        assert_eq!(padded.is_null, plain.is_null);
        assert_eq!(padded.as_bool(), plain.as_bool());
    }
}

#[test]
fn now_family_does_not_fold_by_default() {
    let ctx = test_context();
    let compiled = ctx.compile("WHERE NOW >= TIMESTAMP '2020-01-01'").unwrap();
    assert!(!compiled.is_literal());
    ctx.set_current_row(None);
    assert!(evaluate(&ctx, &compiled).as_bool());

    let folding = test_context();
    folding.set_fold_volatile(true);
    let compiled = folding.compile("WHERE NOW >= TIMESTAMP '2020-01-01'").unwrap();
    assert!(compiled.is_literal());
    assert!(compiled.as_bool());
}

#[test]
fn bare_function_literals_resolve() {
    let ctx = test_context();
    let compiled = ctx
        .compile("WHERE CURRENT_TIMESTAMP >= TIMESTAMP '2020-01-01'")
        .unwrap();
    assert!(evaluate(&ctx, &compiled).as_bool());
    let compiled = ctx.compile("WHERE CURRENT_DATE <= NOW").unwrap();
    assert!(evaluate(&ctx, &compiled).as_bool());
}

#[test]
fn noop_conversions_are_removed() {
    let ctx = test_context();
    let compiled = ctx.compile("WHERE x::INT = 5").unwrap();
    // The x::INT wrapper must be gone: left side is the bare column.
    assert_eq!(compiled.args[0].text, "x");
}

// ── Error and warning behavior ────────────────────────────────────────

#[test]
fn unknown_column_is_a_warning() {
    let ctx = test_context();
    let compiled = ctx.compile("WHERE mystery = 1");
    assert!(!ctx.get_warnings().is_empty());
    // The comparison over an unknown type then fails to resolve.
    assert!(compiled.is_none() || !ctx.get_errors().is_empty());
}

#[test]
fn syntax_error_surfaces() {
    let ctx = test_context();
    assert!(ctx.compile("WHERE (age = 1").is_none());
    assert!(!ctx.get_errors().is_empty());
}

#[test]
fn evaluate_refuses_after_errors() {
    let ctx = test_context();
    let _ = ctx.compile("WHERE (age = 1");
    assert!(!ctx.get_errors().is_empty());
    let result = evaluate(&ctx, &Node::bool_lit(true, false));
    assert!(result.is_null);
    // After clearing, evaluation works again.
    ctx.clear_messages();
    assert!(evaluate(&ctx, &Node::bool_lit(true, false)).as_bool());
}

#[test]
fn division_by_zero_is_null_not_error() {
    let entries = [("x", Node::int_lit(5, false)), ("y", Node::int_lit(0, false))];
    expect_null("WHERE x / y = 1", &entries);
}

#[test]
fn between_null_bound_propagates() {
    let entries = [("age", Node::int_lit(30, false))];
    expect_null("WHERE age BETWEEN 20 AND NULL", &entries);
}

#[test]
fn select_from_framing_is_recognized() {
    let ctx = test_context();
    let tokens = ctx.tokenize("SELECT id, name FROM people WHERE age > 21");
    let ast = ctx.build_ast(&tokens).unwrap();
    assert!(sift_engine::find_clause(&ast, "SELECT").is_some());
    assert!(sift_engine::find_clause(&ast, "FROM").is_some());
    let compiled = ctx.compile("SELECT id, name FROM people WHERE age > 21").unwrap();
    ctx.set_current_row(Some(row(&[("age", Node::int_lit(30, false))])));
    assert!(evaluate(&ctx, &compiled).as_bool());
}

#[test]
fn repeated_queries_share_a_context() {
    let ctx = test_context();
    let first = ctx.compile("WHERE age = 30").unwrap();
    let second = ctx.compile("WHERE age = 31").unwrap();
    ctx.set_current_row(Some(row(&[("age", Node::int_lit(30, false))])));
    assert!(evaluate(&ctx, &first).as_bool());
    assert!(!evaluate(&ctx, &second).as_bool());
}
