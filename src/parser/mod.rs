//! Recursive-descent parser for C and C++.
//!
//! Tokens are pulled lazily from the [`DirectiveFilter`]; directives are
//! queued. Those between two items or statements become entries of the
//! list; those inside one, such as an `#ifdef` among enumerators, go on its
//! `directives`. Syntax errors are recorded as diagnostics and the parser
//! resynchronizes, so a best-effort tree is always produced.

mod decl;
mod expr;
mod stmt;

use std::collections::{HashSet, VecDeque};

use crate::Error;
use crate::ast::{Comment, Item, Stmt, StmtKind, TranslationUnit};
use crate::config::{Language, ParseOptions};
use crate::diagnostics::{Diagnostic, Diagnostics, SyntaxError};
use crate::lexer::{LexOptions, Lexer};
use crate::preprocess::{DirectiveFilter, Filtered};
use crate::source::SourceBuffer;
use crate::token::{Keyword, Punct, Span, Token, TokenKind};

use decl::Scope;

/// Why a parse routine gave up.
#[derive(Debug)]
pub(crate) enum Failure {
    /// Recoverable: report and resynchronize.
    Syntax(SyntaxError),
    /// The parser stopped making progress; aborts the whole parse.
    Internal(String),
}

impl From<SyntaxError> for Failure {
    fn from(err: SyntaxError) -> Self {
        Self::Syntax(err)
    }
}

type PResult<T> = Result<T, Failure>;

/// Recursion limit for nested expressions, statements, and declarators.
const MAX_DEPTH: usize = 128;

/// Typedef names every translation unit may use without declaring.
const SEED_TYPES: &[&str] = &[
    "size_t", "ssize_t", "ptrdiff_t", "intptr_t", "uintptr_t", "intmax_t", "uintmax_t", "int8_t",
    "int16_t", "int32_t", "int64_t", "uint8_t", "uint16_t", "uint32_t", "uint64_t", "wchar_t",
    "_Bool", "bool", "FILE", "va_list", "time_t", "clock_t", "off_t", "pid_t",
];

/// Unqualified C++ library names treated as types.
const SEED_CPP_TYPES: &[&str] = &[
    "auto",
    "string",
    "wstring",
    "string_view",
    "vector",
    "map",
    "pair",
    "unique_ptr",
    "shared_ptr",
    "nullptr_t",
    "ostream",
    "istream",
];

/// Names under `std::` treated as types.
const STD_TYPES: &[&str] = &[
    "array",
    "deque",
    "function",
    "list",
    "optional",
    "set",
    "tuple",
    "unordered_map",
    "unordered_set",
    "weak_ptr",
    "basic_string",
    "iostream",
    "size_t",
];

/// Library class templates.
const SEED_TEMPLATES: &[&str] = &[
    "vector",
    "map",
    "pair",
    "unique_ptr",
    "shared_ptr",
    "array",
    "deque",
    "function",
    "list",
    "optional",
    "set",
    "tuple",
    "unordered_map",
    "unordered_set",
    "weak_ptr",
    "basic_string",
];

/// Parse one translation unit.
///
/// # Errors
///
/// Returns [`Error::Internal`] if the parser stops making progress.
pub(crate) fn parse_unit(
    source: &SourceBuffer,
    options: &ParseOptions,
) -> Result<(TranslationUnit, Diagnostics), Error> {
    let language = options.mode.resolve(source.bytes());
    let lexer = Lexer::with_options(
        source.bytes(),
        LexOptions {
            keep_comments: options.keep_comments,
        },
    );
    let mut parser = Parser::new(DirectiveFilter::new(lexer), language);
    let items = match parser.parse_items(Scope::File, false) {
        Ok(items) => items,
        Err(Failure::Internal(message)) => return Err(Error::Internal(message)),
        Err(Failure::Syntax(err)) => {
            // parse_items reports syntax errors itself
            return Err(Error::Internal(err.to_string()));
        }
    };
    let unit = TranslationUnit {
        language,
        items,
        comments: parser.comments,
        span: Span::new(0, source.len()),
    };
    Ok((unit, parser.diagnostics))
}

pub(crate) struct Parser<'src> {
    stream: DirectiveFilter<Lexer<'src>>,
    tokens: Vec<Token>,
    pos: usize,
    exhausted: bool,
    /// End offset of the last consumed token.
    prev_end: usize,
    pending: VecDeque<Item>,
    /// Directives met before the opening brace of a body, waiting for the
    /// enclosing item or statement to finish.
    held: Vec<Item>,
    comments: Vec<Comment>,
    diagnostics: Diagnostics,
    language: Language,
    types: HashSet<String>,
    templates: HashSet<String>,
    /// Names of the classes whose bodies are being parsed.
    classes: Vec<String>,
    /// Opening delimiters not yet closed.
    open: Vec<(Span, &'static str)>,
    /// Nesting of template argument lists; `>` closes while positive.
    template_depth: usize,
    depth: usize,
    last_error: Option<usize>,
    eof_error: Option<usize>,
}

impl<'src> Parser<'src> {
    fn new(stream: DirectiveFilter<Lexer<'src>>, language: Language) -> Self {
        let mut types: HashSet<String> = SEED_TYPES.iter().map(|s| (*s).to_string()).collect();
        let mut templates = HashSet::new();
        if language == Language::Cpp {
            types.extend(SEED_CPP_TYPES.iter().map(|s| (*s).to_string()));
            templates.extend(SEED_TEMPLATES.iter().map(|s| (*s).to_string()));
        }
        Self {
            stream,
            tokens: Vec::new(),
            pos: 0,
            exhausted: false,
            prev_end: 0,
            pending: VecDeque::new(),
            held: Vec::new(),
            comments: Vec::new(),
            diagnostics: Diagnostics::new(),
            language,
            types,
            templates,
            classes: Vec::new(),
            open: Vec::new(),
            template_depth: 0,
            depth: 0,
            last_error: None,
            eof_error: None,
        }
    }

    // ---- token buffer ----

    /// Pull from the stream until `pos + n` is buffered or input ends.
    fn fill(&mut self, n: usize) {
        while self.tokens.len() <= self.pos + n && !self.exhausted {
            match self.stream.next() {
                Some(Filtered::Token(token)) if token.kind == TokenKind::Comment => {
                    self.comments.push(Comment {
                        text: token.text,
                        span: token.span,
                    });
                }
                Some(Filtered::Token(mut token)) => {
                    if self.language == Language::C
                        && matches!(token.kind, TokenKind::Keyword(kw) if kw.is_cpp_only())
                    {
                        token.kind = TokenKind::Ident;
                    }
                    self.exhausted = token.kind == TokenKind::Eof;
                    self.tokens.push(token);
                }
                Some(Filtered::Directive(item)) => self.pending.push_back(item),
                Some(Filtered::Error(err)) => self.diagnostics.push(Diagnostic::from(err)),
                None => {
                    self.exhausted = true;
                    if self.tokens.last().is_none_or(|t| t.kind != TokenKind::Eof) {
                        self.tokens.push(Token {
                            kind: TokenKind::Eof,
                            text: String::new(),
                            span: Span::empty_at(self.prev_end),
                        });
                    }
                }
            }
        }
    }

    fn nth(&mut self, n: usize) -> &Token {
        self.fill(n);
        let index = (self.pos + n).min(self.tokens.len() - 1);
        &self.tokens[index]
    }

    fn peek(&mut self) -> &Token {
        self.nth(0)
    }

    fn kind(&mut self) -> TokenKind {
        self.nth(0).kind
    }

    fn kind_at(&mut self, n: usize) -> TokenKind {
        self.nth(n).kind
    }

    fn span(&mut self) -> Span {
        self.nth(0).span
    }

    fn at(&mut self, punct: Punct) -> bool {
        self.nth(0).is_punct(punct)
    }

    fn at_nth(&mut self, n: usize, punct: Punct) -> bool {
        self.nth(n).is_punct(punct)
    }

    fn at_kw(&mut self, keyword: Keyword) -> bool {
        self.nth(0).is_keyword(keyword)
    }

    fn at_eof(&mut self) -> bool {
        self.kind() == TokenKind::Eof
    }

    /// Identifier with exactly this spelling at offset `n`.
    fn at_word(&mut self, n: usize, word: &str) -> bool {
        let token = self.nth(n);
        token.kind == TokenKind::Ident && token.text == word
    }

    fn bump(&mut self) -> Token {
        let token = self.peek().clone();
        if token.kind != TokenKind::Eof {
            self.pos += 1;
            self.prev_end = token.span.end;
        }
        token
    }

    fn eat(&mut self, punct: Punct) -> bool {
        let found = self.at(punct);
        if found {
            self.bump();
        }
        found
    }

    fn eat_kw(&mut self, keyword: Keyword) -> bool {
        let found = self.at_kw(keyword);
        if found {
            self.bump();
        }
        found
    }

    fn expect(&mut self, punct: Punct) -> PResult<Span> {
        if self.at(punct) {
            Ok(self.bump().span)
        } else {
            Err(self.error_here(format!("'{punct}'")))
        }
    }

    fn expect_ident(&mut self, what: &str) -> PResult<(String, Span)> {
        if self.kind() == TokenKind::Ident {
            let token = self.bump();
            Ok((token.text, token.span))
        } else {
            Err(self.error_here(what))
        }
    }

    /// Split a `>>` token in place so the first `>` can close a template
    /// argument list.
    fn split_shr(&mut self) {
        self.fill(0);
        let token = &mut self.tokens[self.pos];
        if token.is_punct(Punct::Shr) {
            let split = token.span.start + 1;
            let second = Token {
                kind: TokenKind::Punct(Punct::Gt),
                text: ">".to_string(),
                span: Span::new(split, token.span.end),
            };
            token.kind = TokenKind::Punct(Punct::Gt);
            token.text = ">".to_string();
            token.span.end = split;
            self.tokens.insert(self.pos + 1, second);
        }
    }

    // ---- diagnostics and recovery ----

    /// Build an error at the current token. At end of file the error is
    /// reported at once, with a note for every unclosed delimiter.
    fn error_here(&mut self, expected: impl Into<String>) -> Failure {
        let token = self.peek();
        let err = SyntaxError {
            span: token.span,
            expected: expected.into(),
            found: token.describe(),
        };
        if token.kind == TokenKind::Eof {
            self.report_eof(err.clone());
        }
        Failure::Syntax(err)
    }

    fn report_eof(&mut self, err: SyntaxError) {
        if self.eof_error.is_some() {
            return;
        }
        self.eof_error = Some(err.span.start);
        self.last_error = Some(err.span.start);
        self.diagnostics.push(err);
        for (span, what) in self.open.iter().rev() {
            self.diagnostics
                .push(Diagnostic::note(*span, format!("unclosed {what} starts here")));
        }
    }

    /// Record a syntax error unless one was already reported at or after
    /// its position.
    fn report(&mut self, err: SyntaxError) {
        if self.eof_error.is_some_and(|eof| err.span.start >= eof)
            || self.last_error.is_some_and(|last| err.span.start <= last)
        {
            return;
        }
        self.last_error = Some(err.span.start);
        self.diagnostics.push(err);
    }

    /// Skip to the next synchronization point: past a `;`, before an
    /// unbalanced `}`, after a balanced `{...}`, or before a keyword that
    /// starts an item or statement. `start` is the token position where the
    /// failed construct began; a `}` there is consumed.
    fn synchronize(&mut self, start: usize) {
        loop {
            match self.kind() {
                TokenKind::Eof => break,
                TokenKind::Punct(Punct::Semi) => {
                    self.bump();
                    break;
                }
                TokenKind::Punct(Punct::LBrace) => {
                    self.skip_balanced_braces();
                    break;
                }
                TokenKind::Punct(Punct::RBrace) => {
                    if self.pos == start {
                        self.bump();
                    }
                    break;
                }
                TokenKind::Keyword(kw) if self.pos > start && is_sync_keyword(kw) => break,
                _ => {
                    self.bump();
                }
            }
        }
    }

    fn skip_balanced_braces(&mut self) {
        let mut depth = 0usize;
        loop {
            match self.kind() {
                TokenKind::Eof => return,
                TokenKind::Punct(Punct::LBrace) => depth += 1,
                TokenKind::Punct(Punct::RBrace) => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        self.bump();
                        return;
                    }
                }
                _ => {}
            }
            self.bump();
        }
    }

    /// Run `body` between the delimiter at the current token and `close`.
    ///
    /// A missing closer at end of file is reported (once, with notes) and
    /// the partial result is kept.
    fn enclosed<T>(
        &mut self,
        close: Punct,
        what: &'static str,
        body: impl FnOnce(&mut Self) -> PResult<T>,
    ) -> PResult<T> {
        let open = self.bump().span;
        self.open.push((open, what));
        let saved_depth = std::mem::take(&mut self.template_depth);
        let result = body(self).and_then(|value| {
            if self.eat(close) {
                Ok(value)
            } else if self.at_eof() {
                let _ = self.error_here(format!("'{close}'"));
                Ok(value)
            } else {
                Err(self.error_here(format!("'{close}'")))
            }
        });
        self.template_depth = saved_depth;
        self.open.pop();
        result
    }

    fn enter(&mut self) -> PResult<()> {
        if self.depth >= MAX_DEPTH {
            return Err(self.error_here("less deeply nested code"));
        }
        self.depth += 1;
        Ok(())
    }

    const fn leave(&mut self) {
        self.depth -= 1;
    }

    fn stalled(&mut self) -> Failure {
        let at = self.span().start;
        Failure::Internal(format!("parser made no progress at byte {at}"))
    }

    // ---- directives ----

    /// Queued directives that precede the current token.
    fn take_directives(&mut self) -> Vec<Item> {
        let limit = if self.at_eof() {
            usize::MAX
        } else {
            self.span().start
        };
        let mut taken = Vec::new();
        while self.pending.front().is_some_and(|item| item.span.start < limit) {
            if let Some(item) = self.pending.pop_front() {
                taken.push(item);
            }
        }
        taken
    }

    fn take_directive_stmts(&mut self) -> Vec<Stmt> {
        self.take_directives()
            .into_iter()
            .map(|item| {
                let span = item.span;
                Stmt::new(
                    StmtKind::Directive {
                        directive: Box::new(item),
                    },
                    span,
                )
            })
            .collect()
    }

    /// Set aside queued directives that end up before the first entry of a
    /// body, so the loop over its entries does not claim them.
    fn hold_directives(&mut self) {
        while self
            .pending
            .front()
            .is_some_and(|item| item.span.start < self.prev_end)
        {
            if let Some(item) = self.pending.pop_front() {
                self.held.push(item);
            }
        }
    }

    /// Directives inside the construct that started at `start` and ends at
    /// the last consumed token. Held entries below `mark` belong to an
    /// enclosing construct.
    fn inner_directives(&mut self, start: usize, mark: usize) -> Vec<Item> {
        let mut found = Vec::new();
        let mut index = mark;
        while index < self.held.len() {
            if self.held[index].span.start >= start {
                found.push(self.held.remove(index));
            } else {
                index += 1;
            }
        }
        let skip = self
            .pending
            .iter()
            .take_while(|item| item.span.start < start)
            .count();
        while self
            .pending
            .get(skip)
            .is_some_and(|item| item.span.start < self.prev_end)
        {
            if let Some(item) = self.pending.remove(skip) {
                found.push(item);
            }
        }
        found.sort_by_key(|item| item.span.start);
        found
    }

    /// Give directives back to the queue after a failed parse, so the
    /// enclosing list keeps them as entries of its own.
    fn release_directives(&mut self, mut directives: Vec<Item>) {
        directives.sort_by_key(|item| item.span.start);
        for item in directives.into_iter().rev() {
            self.pending.push_front(item);
        }
    }

    fn release_held(&mut self, mark: usize) {
        let held = self.held.split_off(mark.min(self.held.len()));
        self.release_directives(held);
    }

    // ---- item lists ----

    /// Items until end of file, or until `}` when `closing` is set.
    fn parse_items(&mut self, scope: Scope, closing: bool) -> PResult<Vec<Item>> {
        let mut items = Vec::new();
        self.hold_directives();
        loop {
            items.extend(self.take_directives());
            if self.at_eof() || (closing && self.at(Punct::RBrace)) {
                break;
            }
            let before = self.pos;
            match self.parse_item(scope) {
                Ok(parsed) => items.extend(parsed),
                Err(Failure::Syntax(err)) => {
                    self.report(err);
                    self.synchronize(before);
                }
                Err(internal @ Failure::Internal(_)) => return Err(internal),
            }
            if self.pos == before && !self.at_eof() {
                return Err(self.stalled());
            }
        }
        Ok(items)
    }

    /// Whether `name` (the last component of a possibly qualified name)
    /// denotes a type.
    fn is_type_name(&self, scope: Option<&str>, name: &str) -> bool {
        self.types.contains(name)
            || (self.language == Language::Cpp
                && scope == Some("std")
                && STD_TYPES.contains(&name))
    }
}

const fn is_sync_keyword(kw: Keyword) -> bool {
    matches!(
        kw,
        Keyword::Typedef
            | Keyword::Struct
            | Keyword::Union
            | Keyword::Enum
            | Keyword::Class
            | Keyword::Namespace
            | Keyword::Template
            | Keyword::Using
            | Keyword::Extern
            | Keyword::If
            | Keyword::For
            | Keyword::While
            | Keyword::Do
            | Keyword::Switch
            | Keyword::Return
            | Keyword::Break
            | Keyword::Continue
            | Keyword::Goto
            | Keyword::Case
    )
}
