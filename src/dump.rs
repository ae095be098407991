//! Textual dumps of a [`TranslationUnit`]: pretty JSON and S-expressions.
//!
//! Both forms come from the same serde tree, so every node shows up as
//! `{kind, span, ...fields}` in JSON and `(Kind :field value ...)` in the
//! S-expression rendering.

use serde_json::{Map, Value};

use crate::Error;
use crate::ast::TranslationUnit;

/// Pretty-printed JSON.
///
/// # Errors
///
/// Returns [`Error::Dump`] if serialization fails.
pub fn to_json(unit: &TranslationUnit) -> Result<String, Error> {
    let mut out = serde_json::to_string_pretty(unit)?;
    out.push('\n');
    Ok(out)
}

/// S-expression rendering, one field per line for nodes with children.
///
/// Fields are listed in key order after the node kind. Nodes whose fields
/// are all atoms stay on one line: `(IntLit :span (8 9) :text "1" :value 1)`.
///
/// # Errors
///
/// Returns [`Error::Dump`] if serialization fails.
pub fn to_sexp(unit: &TranslationUnit) -> Result<String, Error> {
    let value = serde_json::to_value(unit)?;
    let mut out = String::new();
    match &value {
        Value::Object(map) => write_node(&mut out, "TranslationUnit", map, 0),
        other => write_value(&mut out, other, 0),
    }
    out.push('\n');
    Ok(out)
}

fn write_value(out: &mut String, value: &Value, indent: usize) {
    match value {
        Value::Null => out.push_str("nil"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => out.push_str(&n.to_string()),
        Value::String(s) => write_string(out, s),
        Value::Array(items) => write_list(out, items, indent),
        Value::Object(map) => {
            let head = map.get("kind").and_then(Value::as_str).unwrap_or("_");
            write_node(out, head, map, indent);
        }
    }
}

fn write_list(out: &mut String, items: &[Value], indent: usize) {
    out.push('(');
    if items.iter().all(is_atom) {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            write_value(out, item, indent);
        }
    } else {
        for item in items {
            newline(out, indent + 1);
            write_value(out, item, indent + 1);
        }
    }
    out.push(')');
}

fn write_node(out: &mut String, head: &str, map: &Map<String, Value>, indent: usize) {
    out.push('(');
    out.push_str(head);
    let mut fields: Vec<_> = map.iter().filter(|(key, _)| key.as_str() != "kind").collect();
    fields.sort_unstable_by(|a, b| a.0.cmp(b.0));
    let flat = fields.iter().all(|(_, value)| is_inline(value));
    for (key, value) in fields {
        if flat {
            out.push(' ');
        } else {
            newline(out, indent + 1);
        }
        out.push(':');
        out.push_str(key);
        out.push(' ');
        write_value(out, value, indent + 1);
    }
    out.push(')');
}

fn newline(out: &mut String, indent: usize) {
    out.push('\n');
    for _ in 0..indent {
        out.push_str("  ");
    }
}

fn write_string(out: &mut String, s: &str) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c if c.is_control() => out.push_str(&format!("\\u{{{:x}}}", u32::from(c))),
            c => out.push(c),
        }
    }
    out.push('"');
}

const fn is_atom(value: &Value) -> bool {
    !matches!(value, Value::Array(_) | Value::Object(_))
}

fn is_inline(value: &Value) -> bool {
    match value {
        Value::Array(items) => items.iter().all(is_atom),
        other => is_atom(other),
    }
}
