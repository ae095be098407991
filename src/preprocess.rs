//! Preprocessor-aware token filter.
//!
//! Directives are recognised and turned into [`Item`]s; nothing is
//! expanded or evaluated.

use crate::ast::{Conditional, Item, ItemKind};
use crate::lexer::LexError;
use crate::token::{Span, Token, TokenKind};

/// One element of the filtered stream.
#[derive(Debug, Clone, PartialEq)]
pub enum Filtered {
    Token(Token),
    Directive(Item),
    Error(LexError),
}

/// Adapts a token stream, converting directive tokens into items.
#[derive(Debug, Clone)]
pub struct DirectiveFilter<I> {
    inner: I,
}

impl<I> DirectiveFilter<I>
where
    I: Iterator<Item = Result<Token, LexError>>,
{
    pub const fn new(inner: I) -> Self {
        Self { inner }
    }
}

impl<I> Iterator for DirectiveFilter<I>
where
    I: Iterator<Item = Result<Token, LexError>>,
{
    type Item = Filtered;

    fn next(&mut self) -> Option<Filtered> {
        Some(match self.inner.next()? {
            Ok(token) if token.kind == TokenKind::Directive => {
                Filtered::Directive(parse_directive(&token.text, token.span))
            }
            Ok(token) => Filtered::Token(token),
            Err(err) => Filtered::Error(err),
        })
    }
}

/// Remove backslash-newline splices.
fn splice(text: &str) -> String {
    text.replace("\\\r\n", "").replace("\\\n", "")
}

fn is_ident(text: &str) -> bool {
    let mut chars = text.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn split_ident(text: &str) -> (&str, &str) {
    let end = text
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .unwrap_or(text.len());
    text.split_at(end)
}

/// Classify the raw text of one directive line.
#[must_use]
pub fn parse_directive(raw: &str, span: Span) -> Item {
    let text = splice(raw);
    let body = text.trim_start_matches('#').trim_start();
    let (name, rest) = split_ident(body);

    let kind = match name {
        "include" => parse_include(rest),
        "define" => parse_define(rest),
        _ => Conditional::from_name(name).map(|directive| {
            let condition = rest.trim();
            ItemKind::ConditionalDirective {
                directive,
                condition: match directive {
                    Conditional::Else | Conditional::Endif => None,
                    _ if condition.is_empty() => None,
                    _ => Some(condition.to_string()),
                },
            }
        }),
    };

    let kind = kind.unwrap_or_else(|| ItemKind::OtherDirective {
        name: name.to_string(),
        text: text.trim().to_string(),
    });
    Item::new(kind, span)
}

fn parse_include(rest: &str) -> Option<ItemKind> {
    let rest = rest.trim();
    let (close, is_system) = match rest.chars().next()? {
        '"' => ('"', false),
        '<' => ('>', true),
        _ => return None,
    };
    let end = rest[1..].find(close)?;
    let path = &rest[1..=end];
    if path.is_empty() {
        return None;
    }
    Some(ItemKind::IncludeDirective {
        path: path.to_string(),
        is_system,
    })
}

fn parse_define(rest: &str) -> Option<ItemKind> {
    let rest = rest.trim_start();
    let (name, after) = split_ident(rest);
    if !is_ident(name) {
        return None;
    }

    // A parameter list only when `(` follows the name directly.
    let (params, replacement) = if let Some(list) = after.strip_prefix('(') {
        let close = list.find(')')?;
        let inner = list[..close].trim();
        let params: Vec<String> = if inner.is_empty() {
            Vec::new()
        } else {
            inner.split(',').map(|p| p.trim().to_string()).collect()
        };
        if !params.iter().all(|p| is_ident(p) || p == "...") {
            return None;
        }
        (Some(params), &list[close + 1..])
    } else {
        if after.chars().next().is_some_and(|c| !c.is_whitespace()) {
            return None;
        }
        (None, after)
    };

    Some(ItemKind::DefineDirective {
        name: name.to_string(),
        params,
        replacement: replacement.trim().to_string(),
    })
}
