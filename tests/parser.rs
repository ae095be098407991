//! End-to-end parser scenarios over small C and C++ inputs.

mod common;

use cfront_rs::ast::{BinaryOp, FnQualifier, TagKind};
use cfront_rs::{
    Access, ExprKind, ItemKind, Language, Mode, StmtKind, StorageClass, Type, parse_str,
};
use common::{assert_spans_nested, parse, parse_clean};

// -----------------------------------------------------------
// Literal scenarios
// -----------------------------------------------------------

#[test]
fn enum_entries_are_numbered() {
    let items = parse_clean("enum E {A, B=5, C};", Mode::C);
    assert_eq!(items.len(), 1);
    let ItemKind::EnumDecl(decl) = &items[0].kind else {
        panic!("expected EnumDecl, got {:?}", items[0].kind);
    };
    assert_eq!(decl.name.as_deref(), Some("E"));
    let entries: Vec<_> = decl
        .entries
        .as_ref()
        .expect("entries")
        .iter()
        .map(|e| (e.name.as_str(), e.value))
        .collect();
    assert_eq!(entries, [("A", Some(0)), ("B", Some(5)), ("C", Some(6))]);
}

#[test]
fn function_definition_with_return() {
    let items = parse_clean("int add(int x, int y) { return x + y; }", Mode::C);
    let ItemKind::FunctionDecl(f) = &items[0].kind else {
        panic!("expected FunctionDecl");
    };
    assert_eq!(f.name, "add");
    assert_eq!(f.return_type, Some(Type::named("int")));
    let params: Vec<_> = f
        .params
        .iter()
        .map(|p| (p.name.as_deref(), p.ty.to_string()))
        .collect();
    assert_eq!(
        params,
        [(Some("x"), "int".to_string()), (Some("y"), "int".to_string())]
    );

    let Some(StmtKind::Compound { stmts }) = f.body.as_ref().map(|b| &b.kind) else {
        panic!("expected a compound body");
    };
    assert_eq!(stmts.len(), 1);
    let StmtKind::Return { value: Some(value) } = &stmts[0].kind else {
        panic!("expected return with a value");
    };
    let ExprKind::Binary { op, lhs, rhs } = &value.kind else {
        panic!("expected a binary expression");
    };
    assert_eq!(*op, BinaryOp::Add);
    assert!(matches!(&lhs.kind, ExprKind::Ident { name } if name == "x"));
    assert!(matches!(&rhs.kind, ExprKind::Ident { name } if name == "y"));
}

#[test]
fn typedef_of_struct_definition() {
    let items = parse_clean(
        "typedef struct rectangle { int width; int height; } rect;",
        Mode::C,
    );
    assert_eq!(items.len(), 2);
    let ItemKind::StructDecl(decl) = &items[0].kind else {
        panic!("expected StructDecl");
    };
    assert_eq!(decl.name.as_deref(), Some("rectangle"));
    let fields: Vec<_> = decl
        .fields
        .as_ref()
        .expect("fields")
        .iter()
        .map(|f| match &f.kind {
            ItemKind::FieldDecl(field) => (field.name.clone(), field.ty.to_string()),
            other => panic!("expected FieldDecl, got {other:?}"),
        })
        .collect();
    assert_eq!(
        fields,
        [
            (Some("width".to_string()), "int".to_string()),
            (Some("height".to_string()), "int".to_string()),
        ]
    );
    let ItemKind::TypedefDecl { name, aliased_type } = &items[1].kind else {
        panic!("expected TypedefDecl");
    };
    assert_eq!(name, "rect");
    assert_eq!(aliased_type, &Type::tagged(TagKind::Struct, "rectangle"));
}

#[test]
fn function_pointer_variable() {
    let items = parse_clean("void (*f)(char *);", Mode::C);
    assert_eq!(items.len(), 1);
    let ItemKind::VarDecl(var) = &items[0].kind else {
        panic!("expected VarDecl, got {:?}", items[0].kind);
    };
    assert_eq!(var.name, "f");
    assert_eq!(
        var.ty,
        Type::pointer_to(Type::Function {
            ret: Box::new(Type::named("void")),
            params: vec![Type::pointer_to(Type::named("char"))],
            variadic: false,
        })
    );
}

#[test]
fn namespace_with_function() {
    let items = parse_clean("namespace N { void foo(){} }", Mode::Cpp);
    let ItemKind::NamespaceDecl { name, items } = &items[0].kind else {
        panic!("expected NamespaceDecl");
    };
    assert_eq!(name.as_deref(), Some("N"));
    assert_eq!(items.len(), 1);
    assert!(matches!(&items[0].kind, ItemKind::FunctionDecl(f) if f.name == "foo"));
}

#[test]
fn class_with_base_and_override() {
    let items = parse_clean(
        "class D : public B { public: void print() const override; };",
        Mode::Cpp,
    );
    let ItemKind::ClassDecl(class) = &items[0].kind else {
        panic!("expected ClassDecl");
    };
    assert_eq!(class.name.as_deref(), Some("D"));
    assert_eq!(class.bases.len(), 1);
    assert_eq!(class.bases[0].access, Some(Access::Public));
    assert_eq!(class.bases[0].ty, Type::named("B"));
    let members = class.members.as_ref().expect("members");
    assert_eq!(members.len(), 1);
    let ItemKind::FunctionDecl(print) = &members[0].kind else {
        panic!("expected a member function");
    };
    assert_eq!(print.name, "print");
    assert!(print.has(FnQualifier::Const));
    assert!(print.has(FnQualifier::Override));
    assert_eq!(print.access, Some(Access::Public));
}

// -----------------------------------------------------------
// Declarations
// -----------------------------------------------------------

#[test]
fn enum_numbering_continues_after_explicit_value() {
    let items = parse_clean("enum {A, B=10, C, D};", Mode::C);
    let ItemKind::EnumDecl(decl) = &items[0].kind else {
        panic!("expected EnumDecl");
    };
    assert!(decl.name.is_none());
    let values: Vec<_> = decl
        .entries
        .iter()
        .flatten()
        .map(|e| e.value)
        .collect();
    assert_eq!(values, [Some(0), Some(10), Some(11), Some(12)]);
}

#[test]
fn pointer_declarator_is_not_shared() {
    let items = parse_clean("int *px, not_a_pointer;", Mode::C);
    let types: Vec<_> = items
        .iter()
        .map(|item| match &item.kind {
            ItemKind::VarDecl(var) => (var.name.as_str(), var.ty.to_string()),
            other => panic!("expected VarDecl, got {other:?}"),
        })
        .collect();
    assert_eq!(types, [("px", "int *".to_string()), ("not_a_pointer", "int".to_string())]);
}

#[test]
fn anonymous_struct_with_typedef() {
    let items = parse_clean("typedef struct { int width; int height; } rect; rect r;", Mode::C);
    assert_eq!(items.len(), 3);
    let ItemKind::StructDecl(decl) = &items[0].kind else {
        panic!("expected StructDecl");
    };
    assert!(decl.name.is_none());
    let ItemKind::TypedefDecl { name, aliased_type } = &items[1].kind else {
        panic!("expected TypedefDecl");
    };
    assert_eq!(name, "rect");
    assert!(matches!(
        aliased_type,
        Type::Anonymous { tag: TagKind::Struct, decl } if *decl == items[0].span
    ));
    assert!(matches!(&items[2].kind, ItemKind::VarDecl(v) if v.ty == Type::named("rect")));
}

#[test]
fn access_sections_apply_to_following_members() {
    let items = parse_clean(
        "class C { int a; public: int b; void f(); protected: int c; private: int d; };",
        Mode::Cpp,
    );
    let ItemKind::ClassDecl(class) = &items[0].kind else {
        panic!("expected ClassDecl");
    };
    let access: Vec<_> = class
        .members
        .iter()
        .flatten()
        .map(|m| match &m.kind {
            ItemKind::FieldDecl(f) => (f.name.clone().unwrap_or_default(), f.access),
            ItemKind::FunctionDecl(f) => (f.name.clone(), f.access),
            other => panic!("unexpected member {other:?}"),
        })
        .collect();
    assert_eq!(
        access,
        [
            ("a".to_string(), Some(Access::Private)),
            ("b".to_string(), Some(Access::Public)),
            ("f".to_string(), Some(Access::Public)),
            ("c".to_string(), Some(Access::Protected)),
            ("d".to_string(), Some(Access::Private)),
        ]
    );
}

#[test]
fn self_referential_struct_uses_named_reference() {
    let items = parse_clean("struct Node { int val; struct Node *next; };", Mode::C);
    let ItemKind::StructDecl(decl) = &items[0].kind else {
        panic!("expected StructDecl");
    };
    let fields = decl.fields.as_ref().expect("fields");
    let ItemKind::FieldDecl(next) = &fields[1].kind else {
        panic!("expected FieldDecl");
    };
    assert_eq!(next.ty, Type::pointer_to(Type::tagged(TagKind::Struct, "Node")));
}

#[test]
fn storage_classes() {
    let items = parse_clean(
        "static int a; extern int b; int c; void f(void) { register int d; extern int c; }",
        Mode::C,
    );
    let classes: Vec<_> = items
        .iter()
        .filter_map(|item| match &item.kind {
            ItemKind::VarDecl(var) => Some(var.storage_class),
            _ => None,
        })
        .collect();
    assert_eq!(
        classes,
        [StorageClass::Static, StorageClass::Extern, StorageClass::Auto]
    );

    let ItemKind::FunctionDecl(f) = &items[3].kind else {
        panic!("expected FunctionDecl");
    };
    let Some(StmtKind::Compound { stmts }) = f.body.as_ref().map(|b| &b.kind) else {
        panic!("expected body");
    };
    let locals: Vec<_> = stmts
        .iter()
        .map(|s| match &s.kind {
            StmtKind::DeclStmt { decls } => match &decls[0].kind {
                ItemKind::VarDecl(var) => var.storage_class,
                other => panic!("expected VarDecl, got {other:?}"),
            },
            other => panic!("expected DeclStmt, got {other:?}"),
        })
        .collect();
    assert_eq!(locals, [StorageClass::Register, StorageClass::Extern]);
}

#[test]
fn semantic_errors_parse_without_diagnostics() {
    // Undeclared names and duplicate definitions are left to later passes.
    parse_clean(
        "typedef struct rectangle rect;\n\
         rect r;\n\
         struct rectangle r;\n\
         void f(void) { int *px; px = &x; }\n",
        Mode::C,
    );
    parse_clean("int main() { use(intBox); return 0; }", Mode::Cpp);
}

// -----------------------------------------------------------
// Directives and language selection
// -----------------------------------------------------------

#[test]
fn directives_are_items_in_source_order() {
    let items = parse_clean(
        "#include <stdio.h>\n#define MAX 10\nint x;\n#ifdef DEBUG\nint y;\n#endif\n",
        Mode::C,
    );
    let tags: Vec<_> = items.iter().map(|i| i.kind.tag()).collect();
    assert_eq!(
        tags,
        [
            "IncludeDirective",
            "DefineDirective",
            "VarDecl",
            "ConditionalDirective",
            "VarDecl",
            "ConditionalDirective",
        ]
    );
    let ItemKind::IncludeDirective { path, is_system } = &items[0].kind else {
        panic!("expected include");
    };
    assert_eq!(path, "stdio.h");
    assert!(is_system);
}

#[test]
fn auto_mode_detects_cpp() {
    let parsed = parse_str("namespace n { int x; }").expect("parse");
    assert_eq!(parsed.unit.language, Language::Cpp);
    assert!(parsed.diagnostics.is_empty());

    let parsed = parse_str("int class_count = 0;").expect("parse");
    assert_eq!(parsed.unit.language, Language::C);
}

#[test]
fn template_closing_angles_split() {
    let items = parse_clean(
        "template<class T> class Box { public: void insert(const T &); };\n\
         Box<Box<int>> boxOfBox;",
        Mode::Cpp,
    );
    let ItemKind::VarDecl(var) = &items[1].kind else {
        panic!("expected VarDecl, got {:?}", items[1].kind);
    };
    assert_eq!(var.ty.to_string(), "Box<Box<int>>");
}

#[test]
fn spans_nest_for_mixed_input() {
    let parsed = parse(
        "#define N 4\n\
         struct s { int a[N]; unsigned bits : 3; };\n\
         static int table[N] = {1, 2, 3, 4};\n\
         int sum(const int *v, int n) {\n\
           int total = 0;\n\
           for (int i = 0; i < n; i++) total += v[i];\n\
           return total > 0 ? total : -total;\n\
         }\n",
        Mode::C,
    );
    assert!(parsed.diagnostics.is_empty(), "{}", parsed.render_diagnostics());
    assert_spans_nested(&parsed.unit);
}

#[test]
fn directives_inside_an_enum_stay_with_it() {
    let input = "enum E {\n  A,\n#ifdef X\n  B,\n#endif\n  C\n};\nint y;";
    let parsed = parse(input, Mode::C);
    assert!(parsed.diagnostics.is_empty(), "{}", parsed.render_diagnostics());
    assert_spans_nested(&parsed.unit);
    let tags: Vec<_> = parsed.unit.items.iter().map(|i| i.kind.tag()).collect();
    assert_eq!(tags, ["EnumDecl", "VarDecl"]);
    let inner: Vec<_> = parsed.unit.items[0]
        .directives
        .iter()
        .map(|d| &d.kind)
        .collect();
    assert!(matches!(
        inner.as_slice(),
        [
            ItemKind::ConditionalDirective { condition: Some(c), .. },
            ItemKind::ConditionalDirective { condition: None, .. },
        ] if c == "X"
    ));
}

#[test]
fn directives_inside_initializers_and_parameters() {
    let parsed = parse(
        "static int table[] = {\n  1,\n#if WIDE\n  2,\n#endif\n  3\n};\n\
         int f(int a,\n#ifdef EXTRA\n      int b,\n#endif\n      int c) {\n  return a;\n}\n\
         int g(void) {\n  return 1 +\n#if ONE\n    1;\n#else\n    2;\n#endif\n}\n",
        Mode::C,
    );
    assert_spans_nested(&parsed.unit);
    let items = &parsed.unit.items;
    let names: Vec<_> = items.iter().map(|i| i.name()).collect();
    assert_eq!(names, [Some("table"), Some("f"), Some("g")]);
    assert_eq!(items[0].directives.len(), 2);
    assert_eq!(items[1].directives.len(), 2);
    let ItemKind::FunctionDecl(f) = &items[1].kind else {
        panic!("expected f");
    };
    assert_eq!(f.params.len(), 3);
    let ItemKind::FunctionDecl(g) = &items[2].kind else {
        panic!("expected g");
    };
    let Some(StmtKind::Compound { stmts }) = g.body.as_ref().map(|b| &b.kind) else {
        panic!("expected a body");
    };
    assert!(g.body.as_ref().is_some_and(|b| b.directives.is_empty()));
    assert!(matches!(stmts[0].kind, StmtKind::Return { .. }));
    assert_eq!(stmts[0].directives.len(), 1);
}

#[test]
fn directive_between_declarators_widens_the_next_one() {
    let parsed = parse("int a,\n#ifdef X\n  b,\n#endif\n  c;\n", Mode::C);
    assert!(parsed.diagnostics.is_empty(), "{}", parsed.render_diagnostics());
    assert_spans_nested(&parsed.unit);
    let counts: Vec<_> = parsed
        .unit
        .items
        .iter()
        .map(|i| (i.name(), i.directives.len()))
        .collect();
    assert_eq!(counts, [(Some("a"), 0), (Some("b"), 1), (Some("c"), 1)]);
}

#[test]
fn c_treats_bool_and_its_values_as_names() {
    let items = parse_clean("typedef enum { false, true } bool;\nbool ready = true;\n", Mode::C);
    let ItemKind::TypedefDecl { name, .. } = &items[0].kind else {
        panic!("expected typedef, got {:?}", items[0].kind);
    };
    assert_eq!(name, "bool");
    let ItemKind::VarDecl(ready) = &items[1].kind else {
        panic!("expected variable");
    };
    assert_eq!(ready.ty.to_string(), "bool");
    assert!(matches!(
        ready.init.as_ref().map(|e| &e.kind),
        Some(ExprKind::Ident { name }) if name == "true"
    ));

    let items = parse_clean("bool ready = true;", Mode::Cpp);
    let ItemKind::VarDecl(ready) = &items[0].kind else {
        panic!("expected variable");
    };
    assert!(matches!(
        ready.init.as_ref().map(|e| &e.kind),
        Some(ExprKind::BoolLit { value: true })
    ));
}
