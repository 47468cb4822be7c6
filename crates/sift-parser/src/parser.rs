//! Recursive-descent parser for the expression language.
//!
//! The entry point is [`build_ast`], which recognizes the top-level
//! `SELECT … FROM … WHERE …` framing and parses only the WHERE body as an
//! expression; SELECT and FROM children are kept as raw leaves. Use
//! [`find_clause`] to pull a clause subtree back out.
//!
//! Errors are recorded on the shared [`Messages`] sink and parsing stops at
//! the first one (every production checks the error state after its
//! sub-parses), so a `None` return always has at least one message behind it.

use sift_common::{DataType, Messages, Span, Token, TokenKind};

use crate::ast::{AstKind, AstNode};

/// Build the clause-framed AST from a token stream.
///
/// Comment tokens are skipped. Returns `None` when a parse error was
/// recorded on `messages`.
pub fn build_ast(messages: &Messages, tokens: &[Token]) -> Option<AstNode> {
    let tokens: Vec<&Token> = tokens.iter().filter(|t| t.kind != TokenKind::Comment).collect();
    Parser {
        tokens,
        pos: 0,
        messages,
    }
    .build_root()
}

/// Depth-first search for a clause node (`"SELECT"`, `"FROM"`, `"WHERE"`).
pub fn find_clause<'t>(root: &'t AstNode, clause_name: &str) -> Option<&'t AstNode> {
    if root.kind == AstKind::Keyword && root.text.eq_ignore_ascii_case(clause_name) {
        return Some(root);
    }
    root.children
        .iter()
        .find_map(|child| find_clause(child, clause_name))
}

struct Parser<'a> {
    tokens: Vec<&'a Token>,
    pos: usize,
    messages: &'a Messages,
}

impl<'a> Parser<'a> {
    fn build_root(&mut self) -> Option<AstNode> {
        let mut root = AstNode::new(AstKind::Keyword, "ROOT", Span::synthetic());
        let len = self.tokens.len();

        while self.pos < len {
            let token = self.tokens[self.pos];
            if token.kind != TokenKind::Keyword {
                self.pos += 1;
                continue;
            }
            if token.text.eq_ignore_ascii_case("SELECT") || token.text.eq_ignore_ascii_case("FROM")
            {
                let mut clause = AstNode::from_token(token);
                self.pos += 1;
                // Raw leaves up to the next keyword; their semantics are
                // outside the expression core.
                while self.pos < len && self.tokens[self.pos].kind != TokenKind::Keyword {
                    if self.tokens[self.pos].kind == TokenKind::Comma {
                        self.pos += 1;
                        continue;
                    }
                    clause.children.push(AstNode::from_token(self.tokens[self.pos]));
                    self.pos += 1;
                }
                root.children.push(clause);
            } else if token.text.eq_ignore_ascii_case("WHERE") {
                let mut clause = AstNode::from_token(token);
                self.pos += 1;
                let expr = self.parse_expression(len)?;
                clause.children.push(expr);
                root.children.push(clause);
            } else {
                self.pos += 1;
            }
        }

        Some(root)
    }

    // ── Token helpers ─────────────────────────────────────────────────

    fn kind_at(&self, pos: usize) -> TokenKind {
        self.tokens[pos].kind
    }

    fn text_at(&self, pos: usize) -> &str {
        &self.tokens[pos].text
    }

    fn at(&self, end: usize, kind: TokenKind) -> bool {
        self.pos < end && self.kind_at(self.pos) == kind
    }

    fn at_operator(&self, end: usize, ops: &[&str]) -> bool {
        self.pos < end
            && self.kind_at(self.pos) == TokenKind::Operator
            && ops.iter().any(|op| self.text_at(self.pos) == *op)
    }

    fn bump(&mut self) -> &'a Token {
        let token = self.tokens[self.pos];
        self.pos += 1;
        token
    }

    fn expect_close_paren(&mut self, end: usize, context: &str) {
        if self.at(end, TokenKind::CloseParen) {
            self.pos += 1;
        } else {
            self.messages
                .error(format!("Expected closing parenthesis in {context}"));
        }
    }

    // ── Expression ladder ─────────────────────────────────────────────

    /// expression := and_expr ( OR and_expr )*
    fn parse_expression(&mut self, end: usize) -> Option<AstNode> {
        let mut left = self.parse_and_expression(end)?;

        while self.pos < end {
            match self.kind_at(self.pos) {
                TokenKind::Or => {
                    let mut node = AstNode::from_token(self.bump());
                    let right = self.parse_and_expression(end)?;
                    node.children.push(left);
                    node.children.push(right);
                    node.data_type = DataType::Bool;
                    left = node;
                }
                _ => break,
            }
        }

        Some(left)
    }

    /// and_expr := unary ( AND unary )*
    fn parse_and_expression(&mut self, end: usize) -> Option<AstNode> {
        let mut left = self.parse_unary(end)?;

        while self.pos < end {
            match self.kind_at(self.pos) {
                TokenKind::And => {
                    let mut node = AstNode::from_token(self.bump());
                    let right = self.parse_unary(end)?;
                    node.children.push(left);
                    node.children.push(right);
                    node.data_type = DataType::Bool;
                    left = node;
                }
                _ => break,
            }
        }

        Some(left)
    }

    /// unary := NOT unary | '(' expression ')' | comparison
    fn parse_unary(&mut self, end: usize) -> Option<AstNode> {
        if self.at(end, TokenKind::Not) {
            let mut node = AstNode::from_token(self.bump());
            let child = self.parse_unary(end)?;
            node.children.push(child);
            return Some(node);
        }

        if self.at(end, TokenKind::OpenParen) {
            self.pos += 1;
            let expr = self.parse_expression(end)?;
            self.expect_close_paren(end, "expression");
            return Some(expr);
        }

        self.parse_comparison(end)
    }

    /// comparison := arithmetic ( comparison_tail )?
    ///
    /// The tail also accepts a bare KEYWORD as a generic binary operator;
    /// that is what carries `EXTRACT(field FROM dt)` and `CAST(x AS T)`
    /// through as recognizable subtrees.
    fn parse_comparison(&mut self, end: usize) -> Option<AstNode> {
        let left = self.parse_arithmetic(end)?;

        if self.pos < end {
            if self.kind_at(self.pos) == TokenKind::Not {
                return self.parse_not_comparison(left, end);
            }
            if matches!(self.kind_at(self.pos), TokenKind::Comparison | TokenKind::Keyword) {
                let op = self.bump();
                if op.text.eq_ignore_ascii_case("BETWEEN") {
                    return self.parse_between(left, end, false);
                }
                if op.text.eq_ignore_ascii_case("IN") {
                    let mut node =
                        AstNode::new(AstKind::Comparison, "IN", op.span);
                    node.data_type = DataType::Bool;
                    let list = self.parse_in_list(end)?;
                    node.children.push(left);
                    node.children.push(list);
                    return Some(node);
                }
                return self.parse_standard_comparison(left, op, end);
            }
        }

        Some(left)
    }

    /// `NOT BETWEEN`, `NOT IN`, `NOT LIKE` merge into single canonical
    /// nodes. Any other token after NOT means the NOT belongs to an outer
    /// production: rewind and hand `left` back.
    fn parse_not_comparison(&mut self, left: AstNode, end: usize) -> Option<AstNode> {
        let not_pos = self.pos;
        self.pos += 1; // NOT

        if self.pos < end
            && matches!(self.kind_at(self.pos), TokenKind::Comparison | TokenKind::Keyword)
        {
            let op = self.tokens[self.pos];
            if op.text.eq_ignore_ascii_case("BETWEEN") {
                self.pos += 1;
                return self.parse_between(left, end, true);
            }
            if op.text.eq_ignore_ascii_case("LIKE") {
                self.pos += 1;
                let mut node = AstNode::new(AstKind::Comparison, "NOT LIKE", op.span);
                node.data_type = DataType::Bool;
                let right = self.parse_arithmetic(end)?;
                node.children.push(left);
                node.children.push(right);
                return Some(node);
            }
            if op.text.eq_ignore_ascii_case("IN") {
                self.pos += 1;
                let mut node = AstNode::new(AstKind::Comparison, "NOT IN", op.span);
                node.data_type = DataType::Bool;
                let list = self.parse_in_list(end)?;
                node.children.push(left);
                node.children.push(list);
                return Some(node);
            }
        }

        self.pos = not_pos;
        Some(left)
    }

    /// BETWEEN lo AND hi. The bounds ride in a carrier node so the
    /// comparison keeps exactly two children until lowering flattens it.
    fn parse_between(&mut self, left: AstNode, end: usize, negated: bool) -> Option<AstNode> {
        let name = if negated { "NOT BETWEEN" } else { "BETWEEN" };
        let span = left.span;
        let mut node = AstNode::new(AstKind::Comparison, name, span);
        node.data_type = DataType::Bool;

        let Some(lower) = self.parse_arithmetic(end) else {
            self.messages
                .error(format!("Expected lower bound after '{name}'"));
            return None;
        };

        if self.pos < end && self.text_at(self.pos).eq_ignore_ascii_case("AND") {
            self.pos += 1;
        } else {
            self.messages
                .error(format!("Expected 'AND' in {name} clause"));
            return None;
        }

        let Some(upper) = self.parse_arithmetic(end) else {
            self.messages
                .error(format!("Expected upper bound after 'AND' in {name}"));
            return None;
        };

        let mut bounds = AstNode::new(AstKind::Carrier, "", span);
        bounds.children.push(lower);
        bounds.children.push(upper);
        node.children.push(left);
        node.children.push(bounds);
        Some(node)
    }

    /// IS [NOT] NULL/TRUE/FALSE and the plain binary comparisons.
    ///
    /// `>` and `>=` are rewritten into `<`/`<=` with swapped operands so
    /// downstream stages only ever see the flipped forms.
    fn parse_standard_comparison(
        &mut self,
        left: AstNode,
        op: &Token,
        end: usize,
    ) -> Option<AstNode> {
        if op.text.eq_ignore_ascii_case("IS") {
            let canonical = self.parse_is_tail(end)?;
            let mut node = AstNode::new(AstKind::Comparison, canonical, op.span);
            node.data_type = DataType::Bool;
            node.children.push(left);
            return Some(node);
        }

        let right = self.parse_arithmetic(end)?;

        let mut node = AstNode::from_token(op);
        node.data_type = DataType::Bool;
        if let Some(rest) = op.text.strip_prefix('>') {
            node.text = format!("<{rest}");
            node.children.push(right);
            node.children.push(left);
        } else {
            node.children.push(left);
            node.children.push(right);
        }
        Some(node)
    }

    /// The words after IS, returned as the canonical spec name.
    fn parse_is_tail(&mut self, end: usize) -> Option<&'static str> {
        if self.pos < end && self.text_at(self.pos).eq_ignore_ascii_case("NOT") {
            if self.pos + 1 >= end {
                self.messages.error("Invalid syntax after 'IS NOT'");
                return None;
            }
            let target = self.text_at(self.pos + 1);
            let name = if target.eq_ignore_ascii_case("NULL") {
                "IS NOT NULL"
            } else if target.eq_ignore_ascii_case("TRUE") {
                "IS NOT TRUE"
            } else if target.eq_ignore_ascii_case("FALSE") {
                "IS NOT FALSE"
            } else {
                self.messages.error("Invalid syntax after 'IS NOT'");
                return None;
            };
            self.pos += 2;
            return Some(name);
        }

        if self.pos < end {
            let target = self.text_at(self.pos);
            let name = if target.eq_ignore_ascii_case("NULL") {
                "IS NULL"
            } else if target.eq_ignore_ascii_case("TRUE") {
                "IS TRUE"
            } else if target.eq_ignore_ascii_case("FALSE") {
                "IS FALSE"
            } else {
                self.messages.error("Invalid syntax after 'IS'");
                return None;
            };
            self.pos += 1;
            return Some(name);
        }

        self.messages.error("Invalid syntax after 'IS'");
        None
    }

    // ── Arithmetic ladder ─────────────────────────────────────────────

    /// arithmetic := ('+'|'-')? term ( ('+'|'-') term )*
    fn parse_arithmetic(&mut self, end: usize) -> Option<AstNode> {
        if self.at_operator(end, &["+", "-"]) {
            let mut node = AstNode::from_token(self.bump());
            let child = self.parse_arithmetic(end)?;
            node.children.push(child);
            return Some(node);
        }

        let mut left = self.parse_term(end)?;
        while self.at_operator(end, &["+", "-"]) {
            let mut node = AstNode::from_token(self.bump());
            let right = self.parse_term(end)?;
            node.children.push(left);
            node.children.push(right);
            left = node;
        }
        Some(left)
    }

    /// term := factor ( ('*'|'/') factor )*
    fn parse_term(&mut self, end: usize) -> Option<AstNode> {
        let mut left = self.parse_factor(end)?;
        while self.at_operator(end, &["*", "/"]) {
            let mut node = AstNode::from_token(self.bump());
            let right = self.parse_factor(end)?;
            node.children.push(left);
            node.children.push(right);
            left = node;
        }
        Some(left)
    }

    /// factor := '(' arithmetic ')' | primary
    fn parse_factor(&mut self, end: usize) -> Option<AstNode> {
        if self.at(end, TokenKind::OpenParen) {
            self.pos += 1;
            let node = self.parse_arithmetic(end)?;
            self.expect_close_paren(end, "arithmetic expression");
            return Some(node);
        }
        self.parse_primary(end)
    }

    /// primary := '(' expression ')' | function_call | atom ( '::' type )?
    fn parse_primary(&mut self, end: usize) -> Option<AstNode> {
        if self.pos >= end {
            self.messages.error("Unexpected end of tokens in expression");
            return None;
        }

        let token = self.tokens[self.pos];
        match token.kind {
            TokenKind::OpenParen => {
                self.pos += 1;
                let expr = self.parse_expression(end)?;
                self.expect_close_paren(end, "expression");
                Some(expr)
            }
            TokenKind::Function => {
                self.pos += 1;
                let call = self.parse_function_call(end)?;
                self.parse_cast_chain(call, end)
            }
            TokenKind::Identifier
            | TokenKind::CompoundLiteral
            | TokenKind::Literal
            | TokenKind::Number
            | TokenKind::Null
            | TokenKind::Keyword => {
                let node = AstNode::from_token(token);
                self.pos += 1;
                self.parse_cast_chain(node, end)
            }
            _ => {
                self.messages
                    .error(format!("Unexpected token in expression: {}", token.text));
                None
            }
        }
    }

    /// `value :: typename [:: typename ...]` becomes nested CAST call
    /// nodes named `::`.
    fn parse_cast_chain(&mut self, value: AstNode, end: usize) -> Option<AstNode> {
        let mut node = value;
        while self.at_operator(end, &["::"]) {
            self.pos += 1;
            if self.pos < end
                && matches!(
                    self.kind_at(self.pos),
                    TokenKind::Keyword | TokenKind::Identifier | TokenKind::Function
                )
            {
                let type_node = AstNode::from_token(self.bump());
                let mut cast = AstNode::new(AstKind::Function, "::", node.span);
                cast.children.push(node);
                cast.children.push(type_node);
                node = cast;
            } else {
                self.messages.error("Expected type identifier after '::'");
                return None;
            }
        }
        Some(node)
    }

    /// FUNCTION '(' expr_list? ')' or a bare FUNCTION name.
    fn parse_function_call(&mut self, end: usize) -> Option<AstNode> {
        let func_token = self.tokens[self.pos - 1];
        let mut node = AstNode::from_token(func_token);
        node.kind = AstKind::Function;

        if self.at(end, TokenKind::OpenParen) {
            self.pos += 1;
            while self.pos < end {
                if self.at(end, TokenKind::CloseParen) {
                    self.pos += 1;
                    break;
                }
                let arg_end = self.find_argument_end(end, TokenKind::CloseParen);
                if self.messages.has_errors() {
                    return None;
                }
                let Some(arg) = self.parse_expression(arg_end) else {
                    self.messages.error("Error parsing function argument");
                    return None;
                };
                node.children.push(arg);
                if self.at(end, TokenKind::Comma) {
                    self.pos += 1;
                }
            }
        } else {
            node.kind = AstKind::FunctionLiteral;
            node.data_type = DataType::String;
        }

        Some(node)
    }

    /// list := '(' expr_list ')' | '[' expr_list ']'
    fn parse_in_list(&mut self, end: usize) -> Option<AstNode> {
        let span = if self.pos < end {
            self.tokens[self.pos].span
        } else {
            Span::synthetic()
        };
        let mut list = AstNode::new(AstKind::List, "", span);

        if self.at(end, TokenKind::OpenParen) || self.at(end, TokenKind::OpenBracket) {
            let closing = if self.kind_at(self.pos) == TokenKind::OpenBracket {
                TokenKind::CloseBracket
            } else {
                TokenKind::CloseParen
            };
            self.pos += 1;

            while self.pos < end {
                if self.at(end, closing) {
                    self.pos += 1;
                    break;
                }
                let expr_end = self.find_argument_end(end, closing);
                if self.messages.has_errors() {
                    return None;
                }
                let Some(expr) = self.parse_expression(expr_end) else {
                    self.messages.error("Error parsing expression in IN list");
                    return None;
                };
                list.children.push(expr);
                if self.at(end, TokenKind::Comma) {
                    self.pos += 1;
                }
            }
        } else {
            self.messages.error("Expected '(' or '[' after IN");
        }

        Some(list)
    }

    /// Scan forward from the current position to the next top-level comma
    /// or the closing delimiter, balancing nested parens and brackets.
    fn find_argument_end(&self, end: usize, closing: TokenKind) -> usize {
        let mut paren_level = 0u32;
        let mut bracket_level = 0u32;
        let mut current = self.pos;

        while current < end {
            match self.kind_at(current) {
                TokenKind::OpenParen => paren_level += 1,
                TokenKind::CloseParen => {
                    if paren_level > 0 {
                        paren_level -= 1;
                    } else if closing == TokenKind::CloseParen {
                        break;
                    } else {
                        self.messages.error("Unexpected closing parenthesis");
                        break;
                    }
                }
                TokenKind::OpenBracket => bracket_level += 1,
                TokenKind::CloseBracket => {
                    if bracket_level > 0 {
                        bracket_level -= 1;
                    } else if closing == TokenKind::CloseBracket {
                        break;
                    } else {
                        self.messages.error("Unexpected closing bracket");
                        break;
                    }
                }
                TokenKind::Comma => {
                    if paren_level == 0 && bracket_level == 0 {
                        break;
                    }
                }
                _ => {}
            }
            current += 1;
        }

        current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_source;
    use sift_common::Catalog;

    struct TestCatalog;

    impl Catalog for TestCatalog {
        fn is_reserved_keyword(&self, word: &str) -> bool {
            ["SELECT", "FROM", "WHERE", "AS", "IS", "INT", "DOUBLE", "DATETIME", "STRING"]
                .iter()
                .any(|k| k.eq_ignore_ascii_case(word))
        }

        fn is_function(&self, name: &str) -> bool {
            ["LOWER", "NOW", "CAST", "CONVERT", "EXTRACT", "YEAR", "COALESCE"]
                .iter()
                .any(|k| k.eq_ignore_ascii_case(name))
        }
    }

    fn parse_where(source: &str) -> AstNode {
        let messages = Messages::new();
        let root = parse_source(&TestCatalog, &messages, source)
            .unwrap_or_else(|| panic!("parse failed: {:?}", messages.errors()));
        assert!(!messages.has_errors(), "errors: {:?}", messages.errors());
        find_clause(&root, "WHERE").expect("no WHERE clause").children[0].clone()
    }

    #[test]
    fn precedence_or_over_and() {
        let expr = parse_where("WHERE a = 1 OR b = 2 AND c = 3");
        assert_eq!(expr.kind, AstKind::Or);
        assert_eq!(expr.children[1].kind, AstKind::And);
    }

    #[test]
    fn precedence_mul_over_add() {
        let expr = parse_where("WHERE a + b * c = 1");
        let sum = &expr.children[0];
        assert_eq!(sum.text, "+");
        assert_eq!(sum.children[1].text, "*");
    }

    #[test]
    fn greater_than_flips_to_less_than() {
        let expr = parse_where("WHERE a > b");
        assert_eq!(expr.text, "<");
        assert_eq!(expr.children[0].text, "b");
        assert_eq!(expr.children[1].text, "a");

        let expr = parse_where("WHERE a >= b");
        assert_eq!(expr.text, "<=");
    }

    #[test]
    fn between_builds_bounds_carrier() {
        let expr = parse_where("WHERE age BETWEEN 20 AND 40");
        assert_eq!(expr.text, "BETWEEN");
        assert_eq!(expr.children.len(), 2);
        assert_eq!(expr.children[0].text, "age");
        let bounds = &expr.children[1];
        assert_eq!(bounds.kind, AstKind::Carrier);
        assert_eq!(bounds.children[0].text, "20");
        assert_eq!(bounds.children[1].text, "40");
    }

    #[test]
    fn between_binds_inner_and() {
        // The AND after BETWEEN belongs to the bounds; the second AND is logical.
        let expr = parse_where("WHERE age BETWEEN 20 AND 40 AND age = 30");
        assert_eq!(expr.kind, AstKind::And);
        assert_eq!(expr.children[0].text, "BETWEEN");
        assert_eq!(expr.children[1].text, "=");
    }

    #[test]
    fn not_forms_merge_into_single_nodes() {
        assert_eq!(parse_where("WHERE a NOT LIKE 'x%'").text, "NOT LIKE");
        assert_eq!(parse_where("WHERE a NOT IN (1, 2)").text, "NOT IN");
        assert_eq!(parse_where("WHERE a NOT BETWEEN 1 AND 2").text, "NOT BETWEEN");
    }

    #[test]
    fn lone_not_is_unary() {
        let expr = parse_where("WHERE NOT a = 1");
        assert_eq!(expr.kind, AstKind::Not);
        assert_eq!(expr.children[0].text, "=");
    }

    #[test]
    fn is_forms_canonicalize() {
        assert_eq!(parse_where("WHERE a IS NULL").text, "IS NULL");
        assert_eq!(parse_where("WHERE a IS NOT NULL").text, "IS NOT NULL");
        assert_eq!(parse_where("WHERE a IS TRUE").text, "IS TRUE");
        assert_eq!(parse_where("WHERE a IS NOT FALSE").text, "IS NOT FALSE");
        let expr = parse_where("WHERE a IS NULL");
        assert_eq!(expr.children.len(), 1);
    }

    #[test]
    fn in_list_with_brackets_and_null() {
        let expr = parse_where("WHERE v IN [1, 2, NULL]");
        assert_eq!(expr.text, "IN");
        let list = &expr.children[1];
        assert_eq!(list.kind, AstKind::List);
        assert_eq!(list.children.len(), 3);
        assert_eq!(list.children[2].kind, AstKind::Null);
    }

    #[test]
    fn nested_parens_inside_list_do_not_split() {
        let expr = parse_where("WHERE v IN ((1 + 2), 3)");
        let list = &expr.children[1];
        assert_eq!(list.children.len(), 2);
        assert_eq!(list.children[0].text, "+");
    }

    #[test]
    fn cast_operator_builds_call() {
        let expr = parse_where("WHERE x::INT = 1");
        let cast = &expr.children[0];
        assert_eq!(cast.kind, AstKind::Function);
        assert_eq!(cast.text, "::");
        assert_eq!(cast.children[0].text, "x");
        assert_eq!(cast.children[1].text, "INT");
    }

    #[test]
    fn function_call_and_literal() {
        let expr = parse_where("WHERE LOWER(name) = 'bo' AND NOW = 1");
        let call = &expr.children[0].children[0];
        assert_eq!(call.kind, AstKind::Function);
        assert_eq!(call.children.len(), 1);
        let literal = &expr.children[1].children[0];
        assert_eq!(literal.kind, AstKind::FunctionLiteral);
        assert_eq!(literal.text, "NOW");
    }

    #[test]
    fn extract_keeps_from_subtree() {
        let expr = parse_where("WHERE EXTRACT(YEAR FROM created) = 2021");
        let extract = &expr.children[0];
        assert_eq!(extract.text, "EXTRACT");
        assert_eq!(extract.children.len(), 1);
        let from = &extract.children[0];
        assert!(from.text.eq_ignore_ascii_case("FROM"));
        assert_eq!(from.children[0].text, "YEAR");
        assert_eq!(from.children[1].text, "created");
    }

    #[test]
    fn cast_as_keeps_as_subtree() {
        let expr = parse_where("WHERE CAST(x AS INT) = 1");
        let cast = &expr.children[0];
        assert_eq!(cast.text, "CAST");
        assert_eq!(cast.children.len(), 1);
        let as_node = &cast.children[0];
        assert!(as_node.text.eq_ignore_ascii_case("AS"));
        assert_eq!(as_node.children[0].text, "x");
        assert_eq!(as_node.children[1].text, "INT");
    }

    #[test]
    fn clause_splitting() {
        let messages = Messages::new();
        let root = parse_source(&TestCatalog, &messages, "SELECT a, b FROM t WHERE a = 1").unwrap();
        assert_eq!(find_clause(&root, "SELECT").unwrap().children.len(), 2);
        assert_eq!(find_clause(&root, "FROM").unwrap().children.len(), 1);
        assert!(find_clause(&root, "WHERE").is_some());
        assert!(find_clause(&root, "GROUP").is_none());
    }

    #[test]
    fn missing_paren_records_error() {
        let messages = Messages::new();
        let result = parse_source(&TestCatalog, &messages, "WHERE (a = 1");
        assert!(result.is_none() || messages.has_errors());
        assert!(messages.has_errors());
    }

    #[test]
    fn comments_are_ignored_by_parser() {
        let expr = parse_where("WHERE a = 1 -- check a\nAND b = 2");
        assert_eq!(expr.kind, AstKind::And);
    }
}
