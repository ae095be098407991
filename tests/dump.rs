//! JSON and S-expression dumps of whole files.

mod common;

use cfront_rs::{Mode, dump};
use common::{fixture_path, parse};

fn fixture_unit(relative: &str) -> cfront_rs::TranslationUnit {
    cfront_rs::parse_file(fixture_path(relative), &cfront_rs::ParseOptions::new())
        .expect("readable fixture")
        .into_unit()
}

#[test]
fn json_is_valid_and_mirrors_the_tree() {
    let unit = fixture_unit("c/basic.c");
    let json = dump::to_json(&unit).expect("serializable");
    let value: serde_json::Value = serde_json::from_str(&json).expect("valid JSON");
    let items = value["items"].as_array().expect("items array");
    assert_eq!(items.len(), unit.items.len());
    for (dumped, item) in items.iter().zip(&unit.items) {
        assert_eq!(dumped["kind"], item.kind.tag());
        assert_eq!(dumped["span"][0], item.span.start);
        assert_eq!(dumped["span"][1], item.span.end);
    }
}

#[test]
fn sexp_parentheses_balance() {
    for fixture in ["c/basic.c", "cpp/basic.cpp"] {
        let sexp = dump::to_sexp(&fixture_unit(fixture)).expect("serializable");
        let mut depth = 0i64;
        let mut in_string = false;
        let mut escaped = false;
        for c in sexp.chars() {
            if in_string {
                match (escaped, c) {
                    (true, _) => escaped = false,
                    (false, '\\') => escaped = true,
                    (false, '"') => in_string = false,
                    _ => {}
                }
                continue;
            }
            match c {
                '"' => in_string = true,
                '(' => depth += 1,
                ')' => depth -= 1,
                _ => {}
            }
            assert!(depth >= 0, "{fixture}: closed too early");
        }
        assert_eq!(depth, 0, "{fixture}");
        assert!(sexp.ends_with(")\n"), "{fixture}");
    }
}

#[test]
fn dumps_are_deterministic() {
    let input = "namespace n { template<class T> struct S { T v; }; }";
    let first = parse(input, Mode::Cpp);
    let second = parse(input, Mode::Cpp);
    assert_eq!(
        dump::to_sexp(&first.unit).expect("sexp"),
        dump::to_sexp(&second.unit).expect("sexp")
    );
    assert_eq!(
        dump::to_json(&first.unit).expect("json"),
        dump::to_json(&second.unit).expect("json")
    );
}

#[test]
fn types_appear_structurally() {
    let parsed = parse("const char *name;", Mode::C);
    let sexp = dump::to_sexp(&parsed.unit).expect("sexp");
    assert!(sexp.contains("(Pointer"), "{sexp}");
    assert!(sexp.contains("(Qualified"), "{sexp}");
    assert!(sexp.contains(":name \"char\""), "{sexp}");
}
