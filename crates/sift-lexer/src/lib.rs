// sift lexer -- tokenizer for the SQL-dialect expression language.

mod cursor;

use cursor::Cursor;
use sift_common::datetime;
use sift_common::{Catalog, Messages, Span, Token, TokenKind};

/// The sift lexer. Converts source text into a stream of classified tokens.
///
/// Wraps a [`Cursor`] for byte-level iteration. Identifier-shaped tokens are
/// classified against the supplied [`Catalog`]: reserved names become
/// KEYWORD, registered spec names become FUNCTION, the rest stay
/// IDENTIFIER. Lexical problems (unknown characters, unterminated strings)
/// are recorded on the [`Messages`] sink; the lexer always produces a token
/// stream so later stages can report more than one problem per input.
pub struct Lexer<'src, 'env> {
    cursor: Cursor<'src>,
    source: &'src str,
    catalog: &'env dyn Catalog,
    messages: &'env Messages,
    tokens: Vec<Token>,
}

/// Tokenize `source`, classifying names against `catalog` and recording
/// lexical errors on `messages`. Token ids are sequence numbers.
pub fn tokenize(catalog: &dyn Catalog, messages: &Messages, source: &str) -> Vec<Token> {
    Lexer::new(catalog, messages, source).run()
}

impl<'src, 'env> Lexer<'src, 'env> {
    pub fn new(catalog: &'env dyn Catalog, messages: &'env Messages, source: &'src str) -> Self {
        Self {
            cursor: Cursor::new(source),
            source,
            catalog,
            messages,
            tokens: Vec::new(),
        }
    }

    /// Consume the whole input and return the token stream.
    pub fn run(mut self) -> Vec<Token> {
        while let Some(c) = self.cursor.peek() {
            match c {
                c if c.is_ascii_alphabetic() || c == '_' => self.lex_word(),
                c if c.is_ascii_digit() => {
                    let start = self.cursor.pos();
                    self.lex_number(start);
                }
                '+' | '-' => self.lex_sign(),
                '=' | '<' | '>' | '!' | '*' | ':' => self.lex_operator(),
                '/' => self.lex_slash(),
                '(' | ')' | '[' | ']' | ',' | ';' => self.lex_punct(),
                '\'' => self.lex_string(),
                c if c.is_whitespace() => {
                    self.cursor.advance();
                }
                c => {
                    self.messages.error(format!("Unknown character: {c}"));
                    self.cursor.advance();
                }
            }
        }

        for (i, token) in self.tokens.iter_mut().enumerate() {
            token.id = i as u32;
        }
        self.tokens
    }

    fn push(&mut self, kind: TokenKind, text: impl Into<String>, start: u32) {
        let span = Span::new(start, self.cursor.pos());
        self.tokens.push(Token::new(kind, text, span));
    }

    // ── Identifiers, keywords, compound literals ──────────────────────

    fn lex_word(&mut self) {
        let start = self.cursor.pos();
        self.cursor.advance();
        self.cursor
            .eat_while(|c| c.is_ascii_alphanumeric() || c == '_');
        let text = self.cursor.slice(start, self.cursor.pos()).to_string();

        let at_space = matches!(self.cursor.peek(), Some(c) if c.is_whitespace());
        if text.eq_ignore_ascii_case("INTERVAL") && at_space {
            self.lex_interval(start);
        } else if text.eq_ignore_ascii_case("TIMESTAMP") && at_space {
            self.lex_timestamp(start);
        } else if text.eq_ignore_ascii_case("AND") {
            self.push(TokenKind::And, text, start);
        } else if text.eq_ignore_ascii_case("OR") {
            self.push(TokenKind::Or, text, start);
        } else if text.eq_ignore_ascii_case("NOT") {
            self.push(TokenKind::Not, text, start);
        } else if text.eq_ignore_ascii_case("NULL") {
            self.push(TokenKind::Null, text, start);
        } else if text.eq_ignore_ascii_case("LIKE")
            || text.eq_ignore_ascii_case("IN")
            || text.eq_ignore_ascii_case("BETWEEN")
        {
            self.push(TokenKind::Comparison, text, start);
        } else if self.catalog.is_reserved_keyword(&text) {
            self.push(TokenKind::Keyword, text, start);
        } else if self.catalog.is_function(&text) {
            self.push(TokenKind::Function, text, start);
        } else {
            self.push(TokenKind::Identifier, text, start);
        }
    }

    /// `INTERVAL` followed by whitespace: consume a quoted body or an
    /// unquoted `<digits> <unit>` run and emit one compound literal.
    fn lex_interval(&mut self, start: u32) {
        self.cursor.eat_while(|c| c.is_whitespace());
        if self.cursor.peek() == Some('\'') {
            let Some(body) = self.quoted_body("interval") else {
                return;
            };
            self.push(TokenKind::CompoundLiteral, format!("INTERVAL {body}"), start);
        } else {
            let body = self.unquoted_interval_body();
            self.push(TokenKind::CompoundLiteral, format!("INTERVAL {body}"), start);
        }
    }

    /// The unquoted interval span rule: alphanumeric blocks with at most one
    /// internal space run, the space joining only between a leading digit
    /// block and a following letter block.
    fn unquoted_interval_body(&mut self) -> String {
        let bytes = self.source.as_bytes();
        let lit_start = self.cursor.pos() as usize;
        let first_is_digit = bytes.get(lit_start).is_some_and(|b| b.is_ascii_digit());

        let mut i = lit_start;
        let mut space_found = false;
        while i < bytes.len() {
            let b = bytes[i];
            if b.is_ascii_alphanumeric() {
                i += 1;
            } else if b.is_ascii_whitespace() && !space_found {
                let space_start = i;
                while i < bytes.len() && bytes[i].is_ascii_whitespace() {
                    i += 1;
                }
                space_found = true;
                let next_is_alpha = bytes.get(i).is_some_and(|b| b.is_ascii_alphabetic());
                if !first_is_digit || !next_is_alpha {
                    i = space_start;
                    break;
                }
            } else {
                break;
            }
        }

        let body = self.source[lit_start..i].to_string();
        while (self.cursor.pos() as usize) < i {
            self.cursor.advance();
        }
        body
    }

    /// `TIMESTAMP` followed by whitespace: consume a quoted body or an
    /// unquoted datetime run. A body that parses as a datetime is rewritten
    /// to the canonical ISO-UTC spelling.
    fn lex_timestamp(&mut self, start: u32) {
        self.cursor.eat_while(|c| c.is_whitespace());
        let body = if self.cursor.peek() == Some('\'') {
            match self.quoted_body("timestamp") {
                Some(body) => body,
                None => return,
            }
        } else {
            let body_start = self.cursor.pos();
            self.cursor
                .eat_while(|c| c.is_ascii_alphanumeric() || c == '-' || c == ':' || c == ' ');
            self.cursor.slice(body_start, self.cursor.pos()).to_string()
        };

        let text = match datetime::parse_datetime(&body) {
            Some(epoch) => format!("TIMESTAMP {}", datetime::epoch_to_iso_utc(epoch)),
            None => format!("TIMESTAMP {body}"),
        };
        self.push(TokenKind::CompoundLiteral, text, start);
    }

    /// Consume a single-quoted body (no escape handling; compound-literal
    /// bodies keep their text verbatim). `None` means unterminated.
    fn quoted_body(&mut self, what: &str) -> Option<String> {
        self.cursor.advance(); // opening quote
        let body_start = self.cursor.pos();
        self.cursor.eat_while(|c| c != '\'');
        let body = self.cursor.slice(body_start, self.cursor.pos()).to_string();
        if self.cursor.peek() == Some('\'') {
            self.cursor.advance();
            Some(body)
        } else {
            self.messages
                .error(format!("Unterminated quoted {what} literal"));
            None
        }
    }

    // ── Numbers ───────────────────────────────────────────────────────

    /// A `+`/`-` starts a signed number only when a digit (or `.digit`)
    /// follows and the previous emitted token is an operator, an opening
    /// paren, a comparison, or absent. Otherwise it is a binary operator.
    /// `--` always starts a line comment.
    fn lex_sign(&mut self) {
        let start = self.cursor.pos();
        let c = self.cursor.peek().unwrap();
        if c == '-' && self.cursor.peek_next() == Some('-') {
            self.lex_line_comment(start);
            return;
        }

        let next = self.cursor.peek_next();
        let starts_number = matches!(next, Some(d) if d.is_ascii_digit())
            || (next == Some('.')
                && matches!(self.cursor.peek_third(), Some(d) if d.is_ascii_digit()));
        let prev = self.tokens.last().map(|t| t.kind);
        let unary_position = matches!(
            prev,
            None | Some(TokenKind::Operator) | Some(TokenKind::OpenParen) | Some(TokenKind::Comparison)
        );

        if starts_number && unary_position {
            self.lex_number(start);
        } else {
            self.cursor.advance();
            self.push(TokenKind::Operator, c.to_string(), start);
        }
    }

    /// Decimal number with optional sign, fraction, exponent, and
    /// underscore separators. Underscores and a leading `+` are stripped
    /// from the token text.
    fn lex_number(&mut self, start: u32) {
        if matches!(self.cursor.peek(), Some('+' | '-')) {
            self.cursor.advance();
        }
        let mut seen_dot = false;
        let mut seen_e = false;
        while let Some(c) = self.cursor.peek() {
            if c.is_ascii_digit() || c == '_' {
                self.cursor.advance();
            } else if c == '.' && !seen_dot && !seen_e {
                seen_dot = true;
                self.cursor.advance();
            } else if (c == 'e' || c == 'E') && !seen_e {
                seen_e = true;
                self.cursor.advance();
                if matches!(self.cursor.peek(), Some('+' | '-')) {
                    self.cursor.advance();
                }
            } else {
                break;
            }
        }

        let raw = self.cursor.slice(start, self.cursor.pos());
        let mut text: String = raw.chars().filter(|&c| c != '_').collect();
        if let Some(stripped) = text.strip_prefix('+') {
            text = stripped.to_string();
        }
        self.push(TokenKind::Number, text, start);
    }

    // ── Operators ─────────────────────────────────────────────────────

    fn lex_operator(&mut self) {
        let start = self.cursor.pos();
        let c = self.cursor.advance().unwrap();
        match c {
            ':' if self.cursor.peek() == Some(':') => {
                self.cursor.advance();
                self.push(TokenKind::Operator, "::", start);
            }
            '<' if self.cursor.peek() == Some('>') => {
                self.cursor.advance();
                // <> is spelled != from here on.
                self.push(TokenKind::Comparison, "!=", start);
            }
            '=' | '<' | '>' | '!' => {
                if self.cursor.peek() == Some('=') {
                    self.cursor.advance();
                    let text = self.cursor.slice(start, self.cursor.pos()).to_string();
                    self.push(TokenKind::Comparison, text, start);
                } else {
                    self.push(TokenKind::Comparison, c.to_string(), start);
                }
            }
            _ => self.push(TokenKind::Operator, c.to_string(), start),
        }
    }

    fn lex_slash(&mut self) {
        let start = self.cursor.pos();
        if self.cursor.peek_next() == Some('*') {
            self.cursor.advance();
            self.cursor.advance();
            loop {
                match self.cursor.peek() {
                    None => break,
                    Some('*') if self.cursor.peek_next() == Some('/') => {
                        self.cursor.advance();
                        self.cursor.advance();
                        break;
                    }
                    Some(_) => {
                        self.cursor.advance();
                    }
                }
            }
            let text = self.cursor.slice(start, self.cursor.pos()).to_string();
            self.push(TokenKind::Comment, text, start);
        } else {
            self.cursor.advance();
            self.push(TokenKind::Operator, "/", start);
        }
    }

    fn lex_line_comment(&mut self, start: u32) {
        self.cursor.advance();
        self.cursor.advance();
        self.cursor.eat_while(|c| c != '\n');
        let text = self.cursor.slice(start, self.cursor.pos()).to_string();
        self.push(TokenKind::Comment, text, start);
    }

    // ── Punctuation and strings ───────────────────────────────────────

    fn lex_punct(&mut self) {
        let start = self.cursor.pos();
        let c = self.cursor.advance().unwrap();
        let kind = match c {
            '(' => TokenKind::OpenParen,
            ')' => TokenKind::CloseParen,
            '[' => TokenKind::OpenBracket,
            ']' => TokenKind::CloseBracket,
            ',' => TokenKind::Comma,
            _ => TokenKind::Semicolon,
        };
        self.push(kind, c.to_string(), start);
    }

    /// Single-quoted string; `''` unescapes to `'` in the token text.
    fn lex_string(&mut self) {
        let start = self.cursor.pos();
        self.cursor.advance(); // opening quote
        let mut body = String::new();
        loop {
            match self.cursor.peek() {
                None => {
                    self.messages.error("Unterminated string literal");
                    break;
                }
                Some('\'') if self.cursor.peek_next() == Some('\'') => {
                    self.cursor.advance();
                    self.cursor.advance();
                    body.push('\'');
                }
                Some('\'') => {
                    self.cursor.advance();
                    break;
                }
                Some(c) => {
                    self.cursor.advance();
                    body.push(c);
                }
            }
        }
        self.push(TokenKind::Literal, body, start);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sift_common::catalog::EmptyCatalog;

    /// Catalog with the handful of names the lexer tests care about.
    struct TestCatalog;

    impl Catalog for TestCatalog {
        fn is_reserved_keyword(&self, word: &str) -> bool {
            ["SELECT", "FROM", "WHERE", "AS", "IS", "INT", "DATETIME"]
                .iter()
                .any(|k| k.eq_ignore_ascii_case(word))
        }

        fn is_function(&self, name: &str) -> bool {
            ["LOWER", "NOW", "CAST", "EXTRACT"]
                .iter()
                .any(|k| k.eq_ignore_ascii_case(name))
        }
    }

    fn lex(source: &str) -> Vec<Token> {
        let messages = Messages::new();
        let tokens = tokenize(&TestCatalog, &messages, source);
        assert!(
            !messages.has_errors(),
            "unexpected lex errors: {:?}",
            messages.errors()
        );
        tokens
    }

    fn kinds(tokens: &[Token]) -> Vec<TokenKind> {
        tokens.iter().map(|t| t.kind).collect()
    }

    #[test]
    fn lex_simple_predicate() {
        let tokens = lex("age >= 21 AND name = 'Bo''b'");
        assert_eq!(
            kinds(&tokens),
            vec![
                TokenKind::Identifier,
                TokenKind::Comparison,
                TokenKind::Number,
                TokenKind::And,
                TokenKind::Identifier,
                TokenKind::Comparison,
                TokenKind::Literal,
            ]
        );
        assert_eq!(tokens[6].text, "Bo'b");
    }

    #[test]
    fn lex_spans_and_ids() {
        let tokens = lex("a = 10");
        assert_eq!(tokens[0].span, Span::new(0, 1));
        assert_eq!(tokens[1].span, Span::new(2, 3));
        assert_eq!(tokens[2].span, Span::new(4, 6));
        assert_eq!(
            tokens.iter().map(|t| t.id).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
    }

    #[test]
    fn spans_stay_inside_source() {
        let src = "WHERE created + INTERVAL '1 day' = TIMESTAMP '2021-01-03' -- x";
        let messages = Messages::new();
        for token in tokenize(&TestCatalog, &messages, src) {
            assert!(token.span.end as usize <= src.len());
            assert!(token.span.start <= token.span.end);
        }
    }

    #[test]
    fn diamond_becomes_not_equal() {
        let tokens = lex("a <> b");
        assert_eq!(tokens[1].kind, TokenKind::Comparison);
        assert_eq!(tokens[1].text, "!=");
    }

    #[test]
    fn double_colon_is_one_operator() {
        let tokens = lex("x::INT");
        assert_eq!(
            kinds(&tokens),
            vec![TokenKind::Identifier, TokenKind::Operator, TokenKind::Keyword]
        );
        assert_eq!(tokens[1].text, "::");
    }

    #[test]
    fn classification_consults_catalog() {
        let tokens = lex("SELECT LOWER(name), widget FROM t");
        assert_eq!(tokens[0].kind, TokenKind::Keyword);
        assert_eq!(tokens[1].kind, TokenKind::Function);
        assert_eq!(tokens[5].kind, TokenKind::Comma);
        assert_eq!(tokens[6].kind, TokenKind::Identifier);
        assert_eq!(tokens[7].kind, TokenKind::Keyword);
    }

    #[test]
    fn like_in_between_are_comparisons() {
        let tokens = lex("a LIKE b IN c BETWEEN d");
        assert_eq!(tokens[1].kind, TokenKind::Comparison);
        assert_eq!(tokens[3].kind, TokenKind::Comparison);
        assert_eq!(tokens[5].kind, TokenKind::Comparison);
    }

    #[test]
    fn signed_number_after_comparison() {
        let tokens = lex("x = -5");
        assert_eq!(tokens[2].kind, TokenKind::Number);
        assert_eq!(tokens[2].text, "-5");
    }

    #[test]
    fn minus_between_operands_is_binary() {
        let tokens = lex("x -5");
        assert_eq!(
            kinds(&tokens),
            vec![TokenKind::Identifier, TokenKind::Operator, TokenKind::Number]
        );
        assert_eq!(tokens[1].text, "-");
        assert_eq!(tokens[2].text, "5");
    }

    #[test]
    fn number_cleanup() {
        let tokens = lex("1_000_000 +2.5e-3");
        assert_eq!(tokens[0].text, "1000000");
        // `+` attaches: previous token is a NUMBER, so it is a binary operator.
        assert_eq!(tokens[1].kind, TokenKind::Operator);
        assert_eq!(tokens[2].text, "2.5e-3");
    }

    #[test]
    fn leading_plus_is_stripped_from_number() {
        let tokens = lex("(+42)");
        assert_eq!(tokens[1].kind, TokenKind::Number);
        assert_eq!(tokens[1].text, "42");
    }

    #[test]
    fn quoted_interval_compound() {
        let tokens = lex("INTERVAL '1 year 2 months'");
        assert_eq!(kinds(&tokens), vec![TokenKind::CompoundLiteral]);
        assert_eq!(tokens[0].text, "INTERVAL 1 year 2 months");
    }

    #[test]
    fn unquoted_interval_takes_one_unit_pair() {
        let tokens = lex("INTERVAL 5 days + x");
        assert_eq!(tokens[0].kind, TokenKind::CompoundLiteral);
        assert_eq!(tokens[0].text, "INTERVAL 5 days");
        assert_eq!(tokens[1].kind, TokenKind::Operator);
        assert_eq!(tokens[2].kind, TokenKind::Identifier);
    }

    #[test]
    fn unquoted_interval_stops_before_second_pair() {
        let tokens = lex("INTERVAL 1 day 2 hours");
        assert_eq!(tokens[0].text, "INTERVAL 1 day");
        // The rest lexes as ordinary tokens.
        assert_eq!(tokens[1].kind, TokenKind::Number);
        assert_eq!(tokens[2].kind, TokenKind::Identifier);
    }

    #[test]
    fn timestamp_body_is_canonicalized() {
        let tokens = lex("TIMESTAMP '2021-01-02'");
        assert_eq!(tokens[0].kind, TokenKind::CompoundLiteral);
        assert_eq!(tokens[0].text, "TIMESTAMP 2021-01-02T00:00:00");
    }

    #[test]
    fn unparseable_timestamp_keeps_raw_body() {
        let tokens = lex("TIMESTAMP 'someday'");
        assert_eq!(tokens[0].text, "TIMESTAMP someday");
    }

    #[test]
    fn comments_are_tokens() {
        let tokens = lex("a -- trailing\n/* block */ b");
        assert_eq!(
            kinds(&tokens),
            vec![
                TokenKind::Identifier,
                TokenKind::Comment,
                TokenKind::Comment,
                TokenKind::Identifier,
            ]
        );
        assert_eq!(tokens[1].text, "-- trailing");
        assert_eq!(tokens[2].text, "/* block */");
    }

    #[test]
    fn null_and_booleans_of_logic() {
        let tokens = lex("NOT a OR NULL");
        assert_eq!(
            kinds(&tokens),
            vec![TokenKind::Not, TokenKind::Identifier, TokenKind::Or, TokenKind::Null]
        );
    }

    #[test]
    fn unterminated_string_is_an_error() {
        let messages = Messages::new();
        let tokens = tokenize(&EmptyCatalog, &messages, "'oops");
        assert!(messages.has_errors());
        assert_eq!(tokens[0].kind, TokenKind::Literal);
        assert_eq!(tokens[0].text, "oops");
    }

    #[test]
    fn unknown_character_is_an_error() {
        let messages = Messages::new();
        let tokens = tokenize(&EmptyCatalog, &messages, "a ? b");
        assert!(messages.has_errors());
        assert_eq!(tokens.len(), 2);
    }
}
