//! Lowering: untyped AST to the runtime call tree.
//!
//! After lowering, every internal node is a literal with its payload
//! parsed, a column reference carrying the column's type and getter, or a
//! call node with its spec attached and its arguments already lowered.

use sift_common::{datetime, DataType};
use sift_parser::ast::{AstKind, AstNode};

use crate::ctx::Context;
use crate::node::{common_type, Node, Value};
use crate::specs::extract;

/// Lower one AST subtree.
pub fn lower(ctx: &Context, ast: &AstNode) -> Node {
    let mut node = Node {
        origin: ast.kind,
        text: ast.text.clone(),
        data_type: ast.data_type,
        is_null: false,
        value: Value::None,
        args: Vec::new(),
        spec: spec_for(ctx, ast),
        builtin: None,
        span: ast.span,
    };

    match ast.kind {
        AstKind::List => {
            node.args = ast.children.iter().map(|child| lower(ctx, child)).collect();
            node.data_type = infer_list_type(&node.args);
        }

        AstKind::Identifier => lower_identifier(ctx, ast, &mut node),

        AstKind::Number | AstKind::Literal | AstKind::CompoundLiteral | AstKind::Null => {
            lower_literal(ctx, &mut node);
        }

        AstKind::Comparison
            if ast.text.eq_ignore_ascii_case("BETWEEN")
                || ast.text.eq_ignore_ascii_case("NOT BETWEEN") =>
        {
            // Flatten probe + bounds carrier into (probe, lo, hi).
            let bounds = &ast.children[1];
            node.args = vec![
                lower(ctx, &ast.children[0]),
                lower(ctx, &bounds.children[0]),
                lower(ctx, &bounds.children[1]),
            ];
        }

        AstKind::Function if is_extract_shape(ast) => lower_extract(ctx, ast, &mut node),

        AstKind::Function if is_cast_shape(ast) => {
            // CAST(x AS T) arrives as a single AS subtree; flatten to (x, T).
            let as_node = &ast.children[0];
            node.args = vec![lower(ctx, &as_node.children[0]), lower(ctx, &as_node.children[1])];
        }

        _ => {
            node.args = ast.children.iter().map(|child| lower(ctx, child)).collect();
            if ast.kind == AstKind::Comparison
                && (ast.text.eq_ignore_ascii_case("IS NULL")
                    || ast.text.eq_ignore_ascii_case("IS NOT NULL"))
            {
                node.data_type = DataType::Bool;
            }
        }
    }

    node
}

fn spec_for(ctx: &Context, ast: &AstNode) -> Option<&'static crate::ctx::Spec> {
    match ast.kind {
        AstKind::Function
        | AstKind::FunctionLiteral
        | AstKind::Operator
        | AstKind::Comparison
        | AstKind::And
        | AstKind::Or
        | AstKind::Not => ctx.spec(&ast.text),
        _ => None,
    }
}

/// Common element type of a lowered list.
fn infer_list_type(elements: &[Node]) -> DataType {
    let mut common = DataType::Unknown;
    for element in elements {
        common = if common == DataType::Unknown {
            element.data_type
        } else {
            common_type(common, element.data_type)
        };
    }
    common
}

/// Resolve an identifier against the column schema; TRUE/FALSE become bool
/// literals, anything else unresolved stays untyped with a warning.
fn lower_identifier(ctx: &Context, ast: &AstNode, node: &mut Node) {
    if let Some(column) = ctx.column(&ast.text) {
        node.data_type = column.data_type;
        node.builtin = Some(column.getter);
        return;
    }
    if ast.text.eq_ignore_ascii_case("TRUE") || ast.text.eq_ignore_ascii_case("FALSE") {
        let value = ast.text.eq_ignore_ascii_case("TRUE");
        node.origin = AstKind::Literal;
        node.data_type = DataType::Bool;
        node.value = Value::Bool(value);
        return;
    }
    ctx.warning(format!("Unknown column '{}'", ast.text));
}

/// Parse a literal's payload into the tag-matching field.
fn lower_literal(ctx: &Context, node: &mut Node) {
    if node.origin == AstKind::Null {
        node.is_null = true;
        return;
    }

    if node.origin == AstKind::CompoundLiteral {
        if let Some(body) = strip_word_prefix(&node.text, "TIMESTAMP") {
            match datetime::parse_datetime(body) {
                Some(epoch) => {
                    node.data_type = DataType::DateTime;
                    node.value = Value::DateTime(epoch);
                    node.text = datetime::epoch_to_iso_utc(epoch);
                }
                None => {
                    ctx.error(format!("Invalid timestamp format: {}", node.text));
                    node.data_type = DataType::String;
                    node.value = Value::Str(node.text.clone());
                }
            }
        } else {
            // INTERVAL bodies keep their text; arithmetic parses them.
            node.data_type = DataType::String;
            node.value = Value::Str(node.text.clone());
        }
        return;
    }

    match node.data_type {
        DataType::Int => match parse_int_prefix(&node.text) {
            Some(value) => node.value = Value::Int(value),
            None => node.is_null = true,
        },
        DataType::Double => match parse_double_prefix(&node.text) {
            Some(value) => node.value = Value::Double(value),
            None => node.is_null = true,
        },
        DataType::Bool => {
            let truthy = node.text.eq_ignore_ascii_case("true") || node.text == "1";
            node.value = Value::Bool(truthy);
        }
        DataType::DateTime => match datetime::parse_datetime(&node.text) {
            Some(epoch) => node.value = Value::DateTime(epoch),
            None => node.is_null = true,
        },
        DataType::String => node.value = Value::Str(node.text.clone()),
        _ => node.is_null = true,
    }
}

/// `EXTRACT(field FROM source)`: the FROM subtree becomes a two-argument
/// call whose first argument is the field name as a string literal.
fn lower_extract(ctx: &Context, ast: &AstNode, node: &mut Node) {
    let from = &ast.children[0];
    let field = &from.children[0].text;
    if extract::is_valid_field(field) {
        node.args = vec![
            Node::string_lit(field, false),
            lower(ctx, &from.children[1]),
        ];
    } else {
        ctx.error("Invalid EXTRACT syntax: invalid field");
        node.is_null = true;
    }
}

fn is_extract_shape(ast: &AstNode) -> bool {
    if !ast.text.eq_ignore_ascii_case("EXTRACT") {
        return false;
    }
    matches!(ast.children.as_slice(),
        [only] if only.text.eq_ignore_ascii_case("FROM") && only.children.len() == 2)
}

fn is_cast_shape(ast: &AstNode) -> bool {
    ast.text.eq_ignore_ascii_case("CAST")
        && matches!(ast.children.as_slice(),
            [only] if only.text.eq_ignore_ascii_case("AS") && only.children.len() == 2)
}

/// Case-insensitive `WORD ` prefix strip.
fn strip_word_prefix<'a>(text: &'a str, word: &str) -> Option<&'a str> {
    if text.len() > word.len()
        && text[..word.len()].eq_ignore_ascii_case(word)
        && text.as_bytes()[word.len()] == b' '
    {
        Some(&text[word.len() + 1..])
    } else {
        None
    }
}

/// Longest leading integer, the way `sscanf("%d")` reads one.
fn parse_int_prefix(text: &str) -> Option<i32> {
    let bytes = text.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    text[..end].parse().ok()
}

/// Longest leading float.
fn parse_double_prefix(text: &str) -> Option<f64> {
    for end in (1..=text.len()).rev() {
        if !text.is_char_boundary(end) {
            continue;
        }
        if let Ok(value) = text[..end].parse::<f64>() {
            return Some(value);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_prefix_parsing_matches_scanf() {
        assert_eq!(parse_int_prefix("42"), Some(42));
        assert_eq!(parse_int_prefix("-7"), Some(-7));
        assert_eq!(parse_int_prefix("1e3"), Some(1));
        assert_eq!(parse_int_prefix("abc"), None);
    }

    #[test]
    fn double_prefix_parsing() {
        assert_eq!(parse_double_prefix("2.5e-3"), Some(0.0025));
        assert_eq!(parse_double_prefix("12E"), Some(12.0));
        assert_eq!(parse_double_prefix("x"), None);
    }

    #[test]
    fn word_prefix_strip() {
        assert_eq!(strip_word_prefix("TIMESTAMP 2021", "TIMESTAMP"), Some("2021"));
        assert_eq!(strip_word_prefix("timestamp 2021", "TIMESTAMP"), Some("2021"));
        assert_eq!(strip_word_prefix("TIMESTAMPX", "TIMESTAMP"), None);
        assert_eq!(strip_word_prefix("INTERVAL 1 day", "TIMESTAMP"), None);
    }
}
