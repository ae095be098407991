//! Lexer behaviour seen through the public API.

mod common;

use cfront_rs::{
    DiagnosticKind, Keyword, LexErrorKind, LexOptions, Lexer, Mode, Punct, SourceBuffer,
    TokenKind, tokenize,
};
use common::parse;

// -----------------------------------------------------------
// Tokens
// -----------------------------------------------------------

#[test]
fn token_spans_cover_their_text() {
    let input = "static const char *names[] = { \"a\\\"b\", 'c', 0x1f, 2.5e-3 }; // end";
    let source = SourceBuffer::from(input);
    for token in tokenize(input).expect("should tokenize") {
        assert_eq!(source.slice(token.span), token.text, "{token:?}");
    }
}

#[test]
fn every_punctuator_lexes_as_itself() {
    for punct in Punct::ALL {
        let text = format!("a {} b", punct.as_str());
        let tokens = tokenize(&text).unwrap_or_else(|e| panic!("{text}: {e}"));
        // `#` and `##` are punctuators only away from the start of a line.
        assert_eq!(tokens[1].kind, TokenKind::Punct(punct), "{text}");
        assert_eq!(tokens.len(), 4, "{text}");
    }
}

#[test]
fn longest_match_wins() {
    let kinds: Vec<_> = tokenize("a>>=b->c...d::e")
        .expect("should tokenize")
        .into_iter()
        .map(|t| t.kind)
        .collect();
    assert_eq!(
        kinds,
        [
            TokenKind::Ident,
            TokenKind::Punct(Punct::ShrEq),
            TokenKind::Ident,
            TokenKind::Punct(Punct::Arrow),
            TokenKind::Ident,
            TokenKind::Punct(Punct::Ellipsis),
            TokenKind::Ident,
            TokenKind::Punct(Punct::ColonColon),
            TokenKind::Ident,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn keywords_are_shared_between_languages() {
    let tokens = tokenize("class struct unsigned template").expect("should tokenize");
    assert_eq!(tokens[0].kind, TokenKind::Keyword(Keyword::Class));
    assert_eq!(tokens[1].kind, TokenKind::Keyword(Keyword::Struct));
    assert_eq!(tokens[2].kind, TokenKind::Keyword(Keyword::Unsigned));
    assert_eq!(tokens[3].kind, TokenKind::Keyword(Keyword::Template));
}

#[test]
fn comments_are_trivia_unless_requested() {
    let input = b"int /* a */ x; // b\n";
    let skipped = Lexer::new(input).filter_map(Result::ok).count();
    let kept: Vec<_> = Lexer::with_options(
        input,
        LexOptions {
            keep_comments: true,
        },
    )
    .filter_map(Result::ok)
    .filter(|t| t.kind == TokenKind::Comment)
    .map(|t| t.text)
    .collect();
    assert_eq!(skipped, 4);
    assert_eq!(kept, ["/* a */", "// b"]);
}

// -----------------------------------------------------------
// Errors
// -----------------------------------------------------------

#[test]
fn first_error_stops_tokenize() {
    let err = tokenize("int x = 'ab").unwrap_err();
    assert_eq!(err.kind, LexErrorKind::UnterminatedChar);
    assert_eq!(err.span.start, 8);
}

#[test]
fn lex_errors_become_diagnostics_and_parsing_continues() {
    let parsed = parse("int a = 1;\nint @b = 2;\n", Mode::C);
    assert_eq!(parsed.diagnostics.len(), 1, "{}", parsed.render_diagnostics());
    let diagnostic = parsed.diagnostics.iter().next().expect("one diagnostic");
    assert_eq!(diagnostic.kind, DiagnosticKind::Lex);
    assert_eq!(diagnostic.message, "unexpected character '@'");
    let names: Vec<_> = parsed.unit.items.iter().filter_map(|i| i.name()).collect();
    assert_eq!(names, ["a", "b"]);
}

#[test]
fn rendered_diagnostics_carry_line_and_column() {
    let parsed = parse("int a;\n  int $;\n", Mode::C);
    let rendered = parsed.render_diagnostics();
    assert!(
        rendered.starts_with("error: <input>:2:7: unexpected character '$'"),
        "{rendered}"
    );
}
