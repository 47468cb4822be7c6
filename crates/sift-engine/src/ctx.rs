//! The engine context: column schema, reserved keywords, the spec and
//! builtin registries, message queues, and per-evaluation state (current
//! row, timezone offset, fold flag).
//!
//! A context is created empty, the default keyword and spec sets are
//! installed once, and parses and evaluations may then be repeated against
//! it. Registration takes `&mut self`; everything the pipeline stages and
//! thunks need goes through `&self`, with interior mutability for the
//! message queues and the row pointer.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::ops::Range;
use std::rc::Rc;

use rustc_hash::FxHashMap;
use sift_common::{Catalog, DataType, Messages, Token};
use sift_parser::ast::AstNode;

use crate::error::TypeError;
use crate::names::{CaseMap, CaseSet};
use crate::node::Node;
use crate::specs;

/// An executable thunk: computes a call node's value, evaluating the
/// node's arguments recursively as needed.
pub type NodeFn = fn(&Context, &Node) -> Node;

/// A named implementation record. Every thunk in the engine is a static
/// `Builtin`, which gives the two-way name/implementation mapping used by
/// debug dumps without comparing function pointers.
pub struct Builtin {
    pub name: &'static str,
    pub summary: &'static str,
    pub run: NodeFn,
}

impl fmt::Debug for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Builtin").field("name", &self.name).finish()
    }
}

/// A spec's answer for one call site: the argument types after promotion,
/// the return type, the chosen implementation, and which of the call's
/// arguments to keep (EXTRACT and DATE_TRUNC drop their field argument,
/// CONVERT drops the type name).
#[derive(Debug)]
pub struct UpdatePlan {
    pub expected: Vec<DataType>,
    pub return_type: DataType,
    /// `None` means the call is a no-op (a conversion to the same type);
    /// the simplifier collapses it onto its argument.
    pub builtin: Option<&'static Builtin>,
    pub retain: Range<usize>,
}

impl UpdatePlan {
    /// A plan keeping all current arguments.
    pub fn new(expected: Vec<DataType>, return_type: DataType, builtin: &'static Builtin) -> Self {
        let retain = 0..expected.len();
        UpdatePlan {
            expected,
            return_type,
            builtin: Some(builtin),
            retain,
        }
    }

    pub fn retaining(mut self, retain: Range<usize>) -> Self {
        self.retain = retain;
        self
    }
}

/// Resolves a call node whose arguments are already typed into an
/// [`UpdatePlan`], or explains why it cannot.
pub type UpdateFn = fn(&Context, &Spec, &Node) -> Result<UpdatePlan, TypeError>;

/// An operator/function specification. Specs are immutable statics, keyed
/// case-insensitively by canonical name in the context registry.
pub struct Spec {
    pub name: &'static str,
    pub description: &'static str,
    /// Volatile specs (the NOW family) are excluded from constant folding
    /// unless the context opts in.
    pub volatile: bool,
    pub update: UpdateFn,
}

impl fmt::Debug for Spec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Spec").field("name", &self.name).finish()
    }
}

/// A column of the external schema. The getter reads the current row from
/// the context and returns a freshly built value node of the column's type.
#[derive(Debug)]
pub struct Column {
    pub name: String,
    pub data_type: DataType,
    pub getter: &'static Builtin,
}

/// See module docs.
pub struct Context {
    columns: Vec<Column>,
    keywords: CaseSet,
    specs: CaseMap<&'static Spec>,
    builtins: FxHashMap<String, &'static Builtin>,
    messages: Messages,
    row: RefCell<Option<Rc<dyn Any>>>,
    time_zone_offset: Cell<i32>,
    fold_volatile: Cell<bool>,
}

impl Context {
    /// An empty context: no columns, keywords, or specs.
    pub fn new() -> Self {
        Context {
            columns: Vec::new(),
            keywords: CaseSet::new(),
            specs: CaseMap::new(),
            builtins: FxHashMap::default(),
            messages: Messages::new(),
            row: RefCell::new(None),
            time_zone_offset: Cell::new(0),
            fold_volatile: Cell::new(false),
        }
    }

    /// A context with the default keyword and spec sets installed.
    pub fn with_defaults() -> Self {
        let mut ctx = Context::new();
        ctx.install_default_keywords();
        ctx.install_default_specs();
        ctx
    }

    /// Reserve the standard SQL keywords plus every type name spellable in
    /// CONVERT/CAST targets.
    pub fn install_default_keywords(&mut self) {
        const KEYWORDS: &[&str] = &[
            "SELECT", "FROM", "WHERE", "JOIN", "ON", "GROUP", "BY", "ORDER", "LIMIT", "OFFSET",
            "AS", "IS", "DISTINCT", "HAVING", "CASE", "WHEN", "THEN", "END", "EXISTS", "UNION",
            "ALL", "DOUBLE", "FLOAT", "INT", "INTEGER", "BOOL", "BOOLEAN", "DATETIME", "STRING",
            "VARCHAR", "CHAR", "NUMERIC", "DECIMAL",
        ];
        for keyword in KEYWORDS {
            self.reserve_keyword(keyword);
        }
    }

    /// Register every operator and function spec the engine ships with.
    pub fn install_default_specs(&mut self) {
        specs::register_all(self);
    }

    // ── Columns ───────────────────────────────────────────────────────

    pub fn register_column(&mut self, name: &str, data_type: DataType, getter: &'static Builtin) {
        self.columns.push(Column {
            name: name.to_string(),
            data_type,
            getter,
        });
    }

    /// Case-insensitive column lookup.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    // ── Keywords ──────────────────────────────────────────────────────

    pub fn reserve_keyword(&mut self, keyword: &str) {
        self.keywords.insert(keyword);
    }

    // ── Spec and builtin registries ───────────────────────────────────

    pub fn register_spec(&mut self, spec: &'static Spec) {
        self.specs.insert(spec.name, spec);
    }

    pub fn spec(&self, name: &str) -> Option<&'static Spec> {
        self.specs.get(name).copied()
    }

    /// Iterate registered specs in name order (for the dump harness).
    pub fn specs(&self) -> impl Iterator<Item = &'static Spec> + '_ {
        self.specs.iter().map(|(_, spec)| *spec)
    }

    pub fn register_builtin(&mut self, builtin: &'static Builtin) {
        self.builtins
            .insert(builtin.name.to_ascii_lowercase(), builtin);
    }

    pub fn builtin(&self, name: &str) -> Option<&'static Builtin> {
        self.builtins.get(&name.to_ascii_lowercase()).copied()
    }

    // ── Messages ──────────────────────────────────────────────────────

    pub fn messages(&self) -> &Messages {
        &self.messages
    }

    pub fn error(&self, message: impl Into<String>) {
        self.messages.error(message);
    }

    pub fn warning(&self, message: impl Into<String>) {
        self.messages.warning(message);
    }

    pub fn get_errors(&self) -> Vec<String> {
        self.messages.errors()
    }

    pub fn get_warnings(&self) -> Vec<String> {
        self.messages.warnings()
    }

    pub fn clear_messages(&self) {
        self.messages.clear();
    }

    // ── Per-evaluation state ──────────────────────────────────────────

    /// Point the context at the row subsequent evaluations read through
    /// the column getters.
    pub fn set_current_row(&self, row: Option<Rc<dyn Any>>) {
        *self.row.borrow_mut() = row;
    }

    pub fn current_row(&self) -> Option<Rc<dyn Any>> {
        self.row.borrow().clone()
    }

    pub fn set_time_zone_offset(&self, seconds: i32) {
        self.time_zone_offset.set(seconds);
    }

    pub fn time_zone_offset(&self) -> i32 {
        self.time_zone_offset.get()
    }

    /// Allow the simplifier to fold NOW-family calls.
    pub fn set_fold_volatile(&self, fold: bool) {
        self.fold_volatile.set(fold);
    }

    pub fn fold_volatile(&self) -> bool {
        self.fold_volatile.get()
    }

    // ── Pipeline conveniences ─────────────────────────────────────────

    pub fn tokenize(&self, source: &str) -> Vec<Token> {
        sift_lexer::tokenize(self, &self.messages, source)
    }

    pub fn build_ast(&self, tokens: &[Token]) -> Option<AstNode> {
        sift_parser::build_ast(&self.messages, tokens)
    }

    /// Tokenize, parse, lower the WHERE body, resolve types, and simplify.
    /// `None` when any stage recorded an error or there is no WHERE clause.
    pub fn compile(&self, sql: &str) -> Option<Node> {
        let tokens = self.tokenize(sql);
        if self.messages.has_errors() {
            return None;
        }
        let ast = self.build_ast(&tokens)?;
        if self.messages.has_errors() {
            return None;
        }
        let where_clause = sift_parser::find_clause(&ast, "WHERE")?;
        let expr = where_clause.children.first()?;
        let mut node = crate::lower::lower(self, expr);
        if self.messages.has_errors() {
            return None;
        }
        crate::resolve::apply_type_conversions(self, &mut node);
        if self.messages.has_errors() {
            return None;
        }
        crate::simplify::simplify(self, &mut node);
        Some(node)
    }
}

impl Default for Context {
    fn default() -> Self {
        Context::new()
    }
}

impl Catalog for Context {
    fn is_reserved_keyword(&self, word: &str) -> bool {
        self.keywords.contains(word)
    }

    fn is_function(&self, name: &str) -> bool {
        self.specs.contains(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_install_keywords_and_specs() {
        let ctx = Context::with_defaults();
        assert!(ctx.is_reserved_keyword("select"));
        assert!(ctx.is_reserved_keyword("STRING"));
        assert!(ctx.is_function("between"));
        assert!(ctx.spec("COALESCE").is_some());
        assert!(ctx.spec("NO_SUCH_FN").is_none());
    }

    #[test]
    fn builtin_registry_is_two_way() {
        let ctx = Context::with_defaults();
        let builtin = ctx.builtin("int_add").expect("int_add registered");
        assert_eq!(builtin.name, "int_add");
    }

    #[test]
    fn spec_registry_is_ordered_and_complete() {
        let ctx = Context::with_defaults();
        let names: Vec<&str> = ctx.specs().map(|s| s.name).collect();
        // Case-folded order, and the whole default set is present.
        let mut sorted = names.clone();
        sorted.sort_by_key(|n| n.to_ascii_uppercase());
        assert_eq!(names, sorted);
        assert!(names.len() > 55, "only {} specs registered", names.len());
        for expected in ["BETWEEN", "COALESCE", "DATE_TRUNC", "IS NOT NULL", "::"] {
            assert!(names.contains(&expected), "missing {expected}");
        }
    }

    #[test]
    fn row_and_tz_state() {
        let ctx = Context::new();
        assert!(ctx.current_row().is_none());
        ctx.set_current_row(Some(Rc::new(7i32)));
        let row = ctx.current_row().unwrap();
        assert_eq!(*row.downcast_ref::<i32>().unwrap(), 7);
        ctx.set_time_zone_offset(-18_000);
        assert_eq!(ctx.time_zone_offset(), -18_000);
    }
}
