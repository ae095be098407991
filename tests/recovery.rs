//! Error recovery: diagnostics are collected and parsing carries on.

mod common;

use cfront_rs::{DiagnosticKind, ItemKind, Mode, Severity};
use common::{assert_spans_nested, parse};

fn error_starts(input: &str, mode: Mode) -> Vec<usize> {
    parse(input, mode)
        .diagnostics
        .errors()
        .map(|d| d.span.start)
        .collect()
}

#[test]
fn bad_declaration_is_skipped() {
    let parsed = parse("int a = ; int b = 2; int c = 3;", Mode::C);
    assert_eq!(parsed.diagnostics.len(), 1);
    let names: Vec<_> = parsed.unit.items.iter().filter_map(|i| i.name()).collect();
    assert_eq!(names, ["b", "c"]);
}

#[test]
fn missing_semicolon_keeps_the_declaration() {
    let parsed = parse("int a = 1\nint b;", Mode::C);
    assert_eq!(parsed.diagnostics.len(), 1);
    let d = parsed.diagnostics.iter().next().expect("diagnostic");
    assert_eq!(d.kind, DiagnosticKind::Syntax);
    assert_eq!(d.message, "expected ';', found 'int'");
    let names: Vec<_> = parsed.unit.items.iter().filter_map(|i| i.name()).collect();
    assert_eq!(names, ["a", "b"]);
}

#[test]
fn errors_inside_a_body_do_not_lose_the_function() {
    let parsed = parse(
        "int f(void) { x = ; return 1; }\nint g(void) { return 2; }",
        Mode::C,
    );
    assert_eq!(parsed.diagnostics.len(), 1);
    let functions: Vec<_> = parsed
        .unit
        .items
        .iter()
        .filter_map(|item| match &item.kind {
            ItemKind::FunctionDecl(f) => Some((f.name.as_str(), f.body.is_some())),
            _ => None,
        })
        .collect();
    assert_eq!(functions, [("f", true), ("g", true)]);
    assert_spans_nested(&parsed.unit);
}

#[test]
fn errors_inside_a_class_keep_later_members() {
    let parsed = parse(
        "class A {\npublic:\n  int x = ;\n  void ok();\n};\nint after;",
        Mode::Cpp,
    );
    assert_eq!(parsed.diagnostics.len(), 1, "{}", parsed.render_diagnostics());
    let ItemKind::ClassDecl(class) = &parsed.unit.items[0].kind else {
        panic!("expected ClassDecl");
    };
    let members: Vec<_> = class.members.iter().flatten().filter_map(|m| m.name()).collect();
    assert_eq!(members, ["ok"]);
    assert_eq!(parsed.unit.items[1].name(), Some("after"));
}

#[test]
fn unclosed_block_at_end_of_file() {
    let parsed = parse("void f(void) {\n  if (x) {\n    g();\n", Mode::C);
    let severities: Vec<_> = parsed.diagnostics.iter().map(|d| d.severity).collect();
    assert_eq!(severities, [Severity::Error, Severity::Note, Severity::Note]);
    let errors: Vec<_> = parsed.diagnostics.errors().collect();
    assert_eq!(errors[0].message, "expected '}', found end of file");
    // the partial function survives
    assert!(matches!(
        &parsed.unit.items[0].kind,
        ItemKind::FunctionDecl(f) if f.body.is_some()
    ));
}

#[test]
fn stray_closing_brace_at_file_scope() {
    let parsed = parse("int a; } int b;", Mode::C);
    assert_eq!(parsed.diagnostics.len(), 1);
    let names: Vec<_> = parsed.unit.items.iter().filter_map(|i| i.name()).collect();
    assert_eq!(names, ["a", "b"]);
}

#[test]
fn error_offsets_strictly_increase() {
    let inputs = [
        "int = ; float ) ; char [ ; } } int ok;",
        "void f() { ) ) ; if ( ; while }",
        "struct { int ; } ; enum { = } ; typedef ;",
    ];
    for input in inputs {
        let starts = error_starts(input, Mode::C);
        assert!(!starts.is_empty(), "{input}");
        assert!(
            starts.windows(2).all(|w| w[0] < w[1]),
            "{input}: {starts:?}"
        );
    }
}

#[test]
fn garbage_never_aborts() {
    let inputs = [
        "))))",
        "{{{{",
        "< > :: ... ->",
        "template < < <",
        "class : : public",
        "int (*(*(*x",
        "#define\n#include\n#if\n",
        "a b c d e f g",
    ];
    for mode in [Mode::C, Mode::Cpp] {
        for input in inputs {
            let parsed = parse(input, mode);
            assert_spans_nested(&parsed.unit);
        }
    }
}

#[test]
fn statements_at_file_scope_are_reported_and_skipped() {
    let parsed = parse(
        "std::string val;\nstd::cin >> val;\nvals.push_back(val);\nint after;\n",
        Mode::Cpp,
    );
    let lines: Vec<_> = parsed
        .diagnostics
        .errors()
        .map(|d| parsed.source.locate(d.span.start).line)
        .collect();
    assert_eq!(lines, [2, 3], "{}", parsed.render_diagnostics());
    let names: Vec<_> = parsed.unit.items.iter().filter_map(|i| i.name()).collect();
    assert_eq!(names, ["val", "after"]);
    assert_spans_nested(&parsed.unit);
}
