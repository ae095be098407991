//! Property-based tests for the parser.
//!
//! Generated well-formed declarations must parse cleanly into one item
//! each; arbitrary token soup must never abort the parse.

mod common;

use cfront_rs::{ItemKind, Mode};
use common::{assert_spans_nested, parse};
use proptest::prelude::*;

/// One top-level construct with a known item kind and name.
#[derive(Debug, Clone)]
struct Decl {
    text: String,
    kind: &'static str,
    name: String,
}

fn base_type() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec![
        "int",
        "char",
        "unsigned long",
        "double",
        "const char *",
        "struct point",
    ])
}

fn decl(index: usize) -> impl Strategy<Value = Decl> {
    prop_oneof![
        (base_type(), 0..1000u32).prop_map(move |(ty, n)| {
            let init = if ty.ends_with('*') || ty.starts_with("struct") {
                String::new()
            } else {
                format!(" = {n}")
            };
            Decl {
                text: format!("{ty} v{index}{init};"),
                kind: "VarDecl",
                name: format!("v{index}"),
            }
        }),
        (base_type(), base_type()).prop_map(move |(a, b)| Decl {
            text: format!("struct s{index} {{ {a} a; {b} b[4]; }};"),
            kind: "StructDecl",
            name: format!("s{index}"),
        }),
        (1..5usize, 0..100i64).prop_map(move |(count, start)| {
            let entries: Vec<_> = (0..count)
                .map(|i| {
                    if i == 0 {
                        format!("E{index}_{i} = {start}")
                    } else {
                        format!("E{index}_{i}")
                    }
                })
                .collect();
            Decl {
                text: format!("enum e{index} {{ {} }};", entries.join(", ")),
                kind: "EnumDecl",
                name: format!("e{index}"),
            }
        }),
        (base_type(), 1..10u32).prop_map(move |(ty, n)| Decl {
            text: format!("static {ty} f{index}(int x, {ty} y) {{ if (x > {n}) return y; return y; }}"),
            kind: "FunctionDecl",
            name: format!("f{index}"),
        }),
        base_type().prop_map(move |ty| Decl {
            text: format!("typedef {ty} t{index};"),
            kind: "TypedefDecl",
            name: format!("t{index}"),
        }),
        (0..100u32).prop_map(move |n| Decl {
            text: format!("#define M{index} {n}"),
            kind: "DefineDirective",
            name: format!("M{index}"),
        }),
    ]
}

fn program() -> impl Strategy<Value = Vec<Decl>> {
    (0..12usize).prop_flat_map(|len| (0..len).map(decl).collect::<Vec<_>>())
}

fn soup() -> impl Strategy<Value = String> {
    let words = vec![
        "int", "x", "y", "(", ")", "{", "}", ";", "=", "1", "*", "&", ",", "struct",
        "class", "enum", "typedef", "template", "<", ">", "::", "namespace", "if",
        "else", "return", "while", "public", ":", "[", "]", "~", "operator", "+",
        "\"s\"", "extern", "using", "new", "delete", "...",
    ];
    prop::collection::vec(prop::sample::select(words), 0..40).prop_map(|w| w.join(" "))
}

proptest! {
    #[test]
    fn generated_declarations_parse_cleanly(decls in program()) {
        let input = format!("struct point {{ int x, y; }};\n{}\n",
            decls.iter().map(|d| d.text.as_str()).collect::<Vec<_>>().join("\n"));
        let parsed = parse(&input, Mode::C);
        prop_assert!(
            parsed.diagnostics.is_empty(),
            "{}--- input ---\n{input}",
            parsed.render_diagnostics()
        );
        let items = &parsed.unit.items[1..];
        prop_assert_eq!(items.len(), decls.len());
        for (item, decl) in items.iter().zip(&decls) {
            prop_assert_eq!(item.kind.tag(), decl.kind);
            prop_assert_eq!(item.name(), Some(decl.name.as_str()));
        }
        assert_spans_nested(&parsed.unit);
    }

    #[test]
    fn enum_values_count_up_from_the_first(start in 0..1000i64, count in 1..20usize) {
        let entries: Vec<_> = (0..count)
            .map(|i| if i == 0 { format!("K0 = {start}") } else { format!("K{i}") })
            .collect();
        let input = format!("enum k {{ {} }};", entries.join(", "));
        let parsed = parse(&input, Mode::C);
        let ItemKind::EnumDecl(decl) = &parsed.unit.items[0].kind else {
            return Err(TestCaseError::fail("expected EnumDecl"));
        };
        let values: Vec<_> = decl.entries.iter().flatten().map(|e| e.value).collect();
        let expected: Vec<_> = (start..).take(count).map(Some).collect();
        prop_assert_eq!(values, expected);
    }

    /// Whatever the input, the parse finishes, errors move forward, and
    /// the tree that comes back is well nested.
    #[test]
    fn token_soup_never_aborts(input in soup(), cpp in any::<bool>()) {
        let mode = if cpp { Mode::Cpp } else { Mode::C };
        let parsed = parse(&input, mode);
        let starts: Vec<_> = parsed.diagnostics.errors().map(|d| d.span.start).collect();
        prop_assert!(starts.windows(2).all(|w| w[0] < w[1]), "{:?}", starts);
        assert_spans_nested(&parsed.unit);
    }
}
