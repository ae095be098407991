#![allow(dead_code)]

use std::path::PathBuf;

use cfront_rs::walk::{self, Visitor};
use cfront_rs::{
    Enumerator, Expr, Item, Mode, Param, ParseOptions, Parsed, SourceBuffer, Span, Stmt,
    TranslationUnit, Type, parse_with,
};

pub fn parse(input: &str, mode: Mode) -> Parsed {
    parse_with(SourceBuffer::from(input), &ParseOptions::new().mode(mode))
        .unwrap_or_else(|e| panic!("parse aborted: {e}\n--- input ---\n{input}"))
}

/// Parse and insist on a diagnostic-free result.
pub fn parse_clean(input: &str, mode: Mode) -> Vec<Item> {
    let parsed = parse(input, mode);
    assert!(
        parsed.diagnostics.is_empty(),
        "unexpected diagnostics:\n{}--- input ---\n{input}",
        parsed.render_diagnostics()
    );
    parsed.unit.items
}

pub fn fixture_path(relative: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(relative)
}

pub fn fixture(relative: &str) -> String {
    std::fs::read_to_string(fixture_path(relative))
        .unwrap_or_else(|e| panic!("cannot read fixture {relative}: {e}"))
}

/// Every node lies inside its parent, and siblings come in source order
/// without overlapping. Types carry no spans, so expressions reached
/// through a type are not checked.
pub fn assert_spans_nested(unit: &TranslationUnit) {
    let mut checker = SpanChecker {
        frames: vec![Frame {
            span: unit.span,
            last_end: unit.span.start,
            what: "TranslationUnit".to_string(),
        }],
    };
    walk::walk_unit(&mut checker, unit);
}

struct Frame {
    span: Span,
    last_end: usize,
    what: String,
}

struct SpanChecker {
    frames: Vec<Frame>,
}

impl SpanChecker {
    fn enter(&mut self, span: Span, what: &str) {
        let parent = self.frames.last().expect("root frame");
        assert!(
            span.start >= parent.span.start && span.end <= parent.span.end,
            "{what} {span} escapes its parent {} {}",
            parent.what,
            parent.span
        );
        assert!(
            span.start >= parent.last_end,
            "{what} {span} overlaps a previous sibling inside {} (last end {})",
            parent.what,
            parent.last_end
        );
        self.frames.push(Frame {
            span,
            last_end: span.start,
            what: what.to_string(),
        });
    }

    /// Attached directives only need to lie inside their owner.
    fn contained(&self, span: Span, what: &str) {
        let owner = self.frames.last().expect("owner frame");
        assert!(
            span.start >= owner.span.start && span.end <= owner.span.end,
            "{what} {span} escapes its owner {} {}",
            owner.what,
            owner.span
        );
    }

    fn leave(&mut self) {
        let done = self.frames.pop().expect("frame");
        if let Some(parent) = self.frames.last_mut() {
            parent.last_end = done.span.end;
        }
    }
}

impl<'ast> Visitor<'ast> for SpanChecker {
    fn visit_item(&mut self, item: &'ast Item) {
        self.enter(item.span, item.kind.tag());
        walk::walk_item(self, item);
        self.leave();
    }

    fn visit_stmt(&mut self, stmt: &'ast Stmt) {
        self.enter(stmt.span, "statement");
        walk::walk_stmt(self, stmt);
        self.leave();
    }

    fn visit_expr(&mut self, expr: &'ast Expr) {
        self.enter(expr.span, "expression");
        walk::walk_expr(self, expr);
        self.leave();
    }

    fn visit_type(&mut self, _ty: &'ast Type) {}

    fn visit_inner_directive(&mut self, directive: &'ast Item) {
        self.contained(directive.span, directive.kind.tag());
    }

    fn visit_param(&mut self, param: &'ast Param) {
        self.enter(param.span, "parameter");
        walk::walk_param(self, param);
        self.leave();
    }

    fn visit_enumerator(&mut self, entry: &'ast Enumerator) {
        self.enter(entry.span, "enumerator");
        walk::walk_enumerator(self, entry);
        self.leave();
    }
}
