use std::fmt;

use crate::token::{Keyword, Punct, Span, Token, TokenKind};

/// Classifies a lexer error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexErrorKind {
    /// String literal not closed before end of line or file.
    UnterminatedString,
    /// Character literal not closed before end of line or file.
    UnterminatedChar,
    /// `/*` without a matching `*/`.
    UnterminatedComment,
    /// `''`.
    EmptyCharLiteral,
    /// Backslash followed by a character that is not an escape.
    InvalidEscape(char),
    /// Malformed numeric literal; carries the offending text.
    InvalidNumber(String),
    /// Character that cannot start any token.
    UnexpectedCharacter(char),
}

impl fmt::Display for LexErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnterminatedString => write!(f, "unterminated string literal"),
            Self::UnterminatedChar => write!(f, "unterminated character literal"),
            Self::UnterminatedComment => write!(f, "unterminated block comment"),
            Self::EmptyCharLiteral => write!(f, "empty character literal"),
            Self::InvalidEscape(ch) => write!(f, "invalid escape sequence '\\{ch}'"),
            Self::InvalidNumber(text) => write!(f, "invalid numeric literal '{text}'"),
            Self::UnexpectedCharacter(ch) => write!(f, "unexpected character '{ch}'"),
        }
    }
}

/// Error produced during lexing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} at byte {}", span.start)]
pub struct LexError {
    pub kind: LexErrorKind,
    pub span: Span,
}

/// Lexer switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LexOptions {
    /// Emit comments as [`TokenKind::Comment`] tokens instead of skipping them.
    pub keep_comments: bool,
}

/// Tokenize a C or C++ source string, stopping at the first error.
///
/// The returned vector always ends with an end-of-file token.
///
/// # Errors
///
/// Returns `LexError` on unterminated literals or comments, invalid
/// escapes, malformed numbers, or stray characters.
pub fn tokenize(input: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(input.as_bytes()).collect()
}

/// Lazy token stream over a byte slice.
///
/// Yields `Ok(token)` or `Err(error)` items; after an error the cursor is
/// already past the offending text so iteration can continue. The stream
/// ends after exactly one end-of-file token.
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    input: &'a [u8],
    origin: usize,
    pos: usize,
    at_line_start: bool,
    done: bool,
    options: LexOptions,
}

impl<'a> Lexer<'a> {
    #[must_use]
    pub fn new(input: &'a [u8]) -> Self {
        Self::with_options(input, LexOptions::default())
    }

    #[must_use]
    pub fn with_options(input: &'a [u8], options: LexOptions) -> Self {
        let origin = if input.starts_with(&[0xEF, 0xBB, 0xBF]) {
            3
        } else {
            0
        };
        Self {
            input,
            origin,
            pos: origin,
            at_line_start: true,
            done: false,
            options,
        }
    }

    /// Rewind to the beginning of the input.
    pub const fn restart(&mut self) {
        self.pos = self.origin;
        self.at_line_start = true;
        self.done = false;
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.input.get(self.pos + offset).copied()
    }

    fn text(&self, start: usize, end: usize) -> String {
        String::from_utf8_lossy(&self.input[start..end]).into_owned()
    }

    fn token(&self, kind: TokenKind, start: usize) -> Token {
        Token {
            kind,
            text: self.text(start, self.pos),
            span: Span::new(start, self.pos),
        }
    }

    const fn error(kind: LexErrorKind, start: usize, end: usize) -> LexError {
        LexError {
            kind,
            span: Span::new(start, end),
        }
    }

    /// Skip blanks and line splices; returns once a non-blank byte is next.
    fn skip_whitespace(&mut self) {
        while let Some(b) = self.peek() {
            match b {
                b'\n' => {
                    self.at_line_start = true;
                    self.pos += 1;
                }
                b' ' | b'\t' | b'\r' | 0x0B | 0x0C => self.pos += 1,
                b'\\' if self.peek_at(1) == Some(b'\n') => self.pos += 2,
                b'\\' if self.peek_at(1) == Some(b'\r') && self.peek_at(2) == Some(b'\n') => {
                    self.pos += 3;
                }
                _ => break,
            }
        }
    }

    fn read_line_comment(&mut self) -> Token {
        let start = self.pos;
        while let Some(b) = self.peek() {
            if b == b'\n' {
                break;
            }
            self.pos += 1;
        }
        let mut token = self.token(TokenKind::Comment, start);
        if token.text.ends_with('\r') {
            token.text.pop();
            token.span.end -= 1;
        }
        token
    }

    fn read_block_comment(&mut self) -> Result<Token, LexError> {
        let start = self.pos;
        self.pos += 2; // skip /*
        while self.pos < self.input.len() {
            if self.input[self.pos] == b'*' && self.peek_at(1) == Some(b'/') {
                self.pos += 2;
                if self.input[start..self.pos].contains(&b'\n') {
                    self.at_line_start = true;
                }
                return Ok(self.token(TokenKind::Comment, start));
            }
            self.pos += 1;
        }
        Err(Self::error(
            LexErrorKind::UnterminatedComment,
            start,
            self.pos,
        ))
    }

    /// Capture a whole logical preprocessor line as one token.
    fn read_directive(&mut self) -> Token {
        let start = self.pos;
        let mut quote: Option<u8> = None;
        while let Some(b) = self.peek() {
            match b {
                b'\n' => break,
                b'\\' if self.peek_at(1) == Some(b'\n') => {
                    self.pos += 2;
                    continue;
                }
                b'\\' if self.peek_at(1) == Some(b'\r') && self.peek_at(2) == Some(b'\n') => {
                    self.pos += 3;
                    continue;
                }
                b'\\' if quote.is_some() => {
                    self.pos = (self.pos + 2).min(self.input.len());
                    continue;
                }
                b'"' | b'\'' => {
                    quote = match quote {
                        Some(q) if q == b => None,
                        None => Some(b),
                        other => other,
                    };
                }
                b'/' if quote.is_none() && self.peek_at(1) == Some(b'/') => break,
                _ => {}
            }
            self.pos += 1;
        }
        let mut end = self.pos;
        while end > start && self.input[end - 1].is_ascii_whitespace() {
            end -= 1;
        }
        Token {
            kind: TokenKind::Directive,
            text: self.text(start, end),
            span: Span::new(start, end),
        }
    }

    fn read_ident_or_keyword(&mut self) -> Result<Token, LexError> {
        let start = self.pos;
        while let Some(b) = self.peek() {
            if b.is_ascii_alphanumeric() || b == b'_' {
                self.pos += 1;
            } else {
                break;
            }
        }
        let word = &self.input[start..self.pos];
        // Encoding prefixes glue onto a following literal: L"x", u8"x", U'c'.
        if matches!(word, b"L" | b"u" | b"U" | b"u8") {
            match self.peek() {
                Some(b'"') => return self.read_quoted(start, b'"'),
                Some(b'\'') if word != b"u8" => return self.read_quoted(start, b'\''),
                _ => {}
            }
        }
        let text = self.text(start, self.pos);
        let kind = Keyword::from_ident(&text).map_or(TokenKind::Ident, TokenKind::Keyword);
        Ok(Token {
            kind,
            text,
            span: Span::new(start, self.pos),
        })
    }

    /// Read a string or character literal whose opening quote is at `self.pos`;
    /// `start` may precede it when an encoding prefix was consumed.
    fn read_quoted(&mut self, start: usize, quote: u8) -> Result<Token, LexError> {
        self.pos += 1; // opening quote
        let unterminated = if quote == b'"' {
            LexErrorKind::UnterminatedString
        } else {
            LexErrorKind::UnterminatedChar
        };
        let mut bad_escape: Option<LexError> = None;
        let mut chars = 0usize;
        loop {
            match self.peek() {
                None | Some(b'\n') => {
                    return Err(Self::error(unterminated, start, self.pos));
                }
                Some(b'\\') => {
                    let escape_start = self.pos;
                    self.pos += 1;
                    match self.read_escape() {
                        Ok(()) => {}
                        Err(ch) => {
                            if bad_escape.is_none() {
                                bad_escape = Some(Self::error(
                                    LexErrorKind::InvalidEscape(ch),
                                    escape_start,
                                    self.pos,
                                ));
                            }
                        }
                    }
                    chars += 1;
                }
                Some(b) if b == quote => {
                    self.pos += 1;
                    break;
                }
                Some(_) => {
                    self.pos += 1;
                    chars += 1;
                }
            }
        }
        if let Some(err) = bad_escape {
            return Err(err);
        }
        if quote == b'\'' && chars == 0 {
            return Err(Self::error(
                LexErrorKind::EmptyCharLiteral,
                start,
                self.pos,
            ));
        }
        let kind = if quote == b'"' {
            TokenKind::StringLit
        } else {
            TokenKind::CharLit
        };
        Ok(self.token(kind, start))
    }

    /// Consume the body of an escape; the backslash is already consumed.
    fn read_escape(&mut self) -> Result<(), char> {
        let Some(b) = self.peek() else {
            return Ok(());
        };
        match b {
            b'n' | b't' | b'r' | b'\\' | b'\'' | b'"' | b'a' | b'b' | b'f' | b'v' | b'?' => {
                self.pos += 1;
                Ok(())
            }
            b'0'..=b'7' => {
                let mut n = 0;
                while n < 3 && matches!(self.peek(), Some(b'0'..=b'7')) {
                    self.pos += 1;
                    n += 1;
                }
                Ok(())
            }
            b'x' => {
                self.pos += 1;
                let mut n = 0;
                while n < 2 && self.peek().is_some_and(|c| c.is_ascii_hexdigit()) {
                    self.pos += 1;
                    n += 1;
                }
                if n == 0 { Err('x') } else { Ok(()) }
            }
            b'\n' => {
                self.pos += 1;
                Ok(())
            }
            b'\r' if self.peek_at(1) == Some(b'\n') => {
                self.pos += 2;
                Ok(())
            }
            _ => {
                let (ch, width) = self.decode_char();
                self.pos += width;
                Err(ch)
            }
        }
    }

    /// Character at the cursor and its encoded width; invalid UTF-8 decodes
    /// to U+FFFD with width 1.
    fn decode_char(&self) -> (char, usize) {
        let rest = &self.input[self.pos..self.input.len().min(self.pos + 4)];
        let valid = match std::str::from_utf8(rest) {
            Ok(s) => s,
            Err(e) => std::str::from_utf8(&rest[..e.valid_up_to()]).unwrap_or_default(),
        };
        valid
            .chars()
            .next()
            .map_or((char::REPLACEMENT_CHARACTER, 1), |c| (c, c.len_utf8()))
    }

    fn read_number(&mut self) -> Result<Token, LexError> {
        let start = self.pos;
        let mut is_float = false;
        let hex = self.peek() == Some(b'0') && matches!(self.peek_at(1), Some(b'x' | b'X'));
        let mut malformed = false;

        if hex {
            self.pos += 2;
            let digits_start = self.pos;
            while self.peek().is_some_and(|c| c.is_ascii_hexdigit()) {
                self.pos += 1;
            }
            malformed |= self.pos == digits_start;
        } else {
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.pos += 1;
            }
            if self.peek() == Some(b'.') {
                is_float = true;
                self.pos += 1;
                while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                    self.pos += 1;
                }
            }
            if matches!(self.peek(), Some(b'e' | b'E')) {
                is_float = true;
                self.pos += 1;
                if matches!(self.peek(), Some(b'+' | b'-')) {
                    self.pos += 1;
                }
                let exp_start = self.pos;
                while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                    self.pos += 1;
                }
                malformed |= self.pos == exp_start;
            }
        }

        let suffix_start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == b'_')
        {
            self.pos += 1;
        }
        let suffix = self.text(suffix_start, self.pos).to_ascii_lowercase();
        let text = self.text(start, self.pos);

        let valid = !malformed
            && if is_float {
                matches!(suffix.as_str(), "" | "f" | "l")
            } else {
                matches!(
                    suffix.as_str(),
                    "" | "u" | "l" | "ul" | "lu" | "ll" | "ull" | "llu"
                ) && int_value(&text).is_some()
            };

        if !valid {
            return Err(Self::error(
                LexErrorKind::InvalidNumber(text),
                start,
                self.pos,
            ));
        }

        let kind = if is_float {
            TokenKind::FloatLit
        } else {
            TokenKind::IntLit
        };
        Ok(Token {
            kind,
            text,
            span: Span::new(start, self.pos),
        })
    }

    fn read_punct(&mut self) -> Option<Token> {
        let rest = &self.input[self.pos..];
        let punct = Punct::ALL
            .into_iter()
            .find(|p| rest.starts_with(p.as_str().as_bytes()))?;
        let start = self.pos;
        self.pos += punct.as_str().len();
        Some(self.token(TokenKind::Punct(punct), start))
    }

    fn lex_token(&mut self) -> Result<Token, LexError> {
        let ch = self.input[self.pos];
        match ch {
            b'a'..=b'z' | b'A'..=b'Z' | b'_' => self.read_ident_or_keyword(),
            b'0'..=b'9' => self.read_number(),
            b'.' if self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) => self.read_number(),
            b'"' | b'\'' => self.read_quoted(self.pos, ch),
            _ => {
                if let Some(token) = self.read_punct() {
                    return Ok(token);
                }
                let start = self.pos;
                let (stray, width) = self.decode_char();
                self.pos += width;
                Err(Self::error(
                    LexErrorKind::UnexpectedCharacter(stray),
                    start,
                    self.pos,
                ))
            }
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            self.skip_whitespace();
            let Some(ch) = self.peek() else {
                self.done = true;
                return Some(Ok(Token {
                    kind: TokenKind::Eof,
                    text: String::new(),
                    span: Span::empty_at(self.input.len()),
                }));
            };

            match ch {
                b'/' if self.peek_at(1) == Some(b'/') => {
                    let comment = self.read_line_comment();
                    if self.options.keep_comments {
                        return Some(Ok(comment));
                    }
                }
                b'/' if self.peek_at(1) == Some(b'*') => match self.read_block_comment() {
                    Ok(comment) if self.options.keep_comments => return Some(Ok(comment)),
                    Ok(_) => {}
                    Err(err) => return Some(Err(err)),
                },
                b'#' if self.at_line_start => {
                    self.at_line_start = false;
                    return Some(Ok(self.read_directive()));
                }
                _ => {
                    self.at_line_start = false;
                    return Some(self.lex_token());
                }
            }
        }
    }
}

/// Value of an integer literal (decimal, octal, or hex, with any suffix).
#[must_use]
pub fn int_value(text: &str) -> Option<u64> {
    let digits = text.trim_end_matches(['u', 'U', 'l', 'L']);
    if let Some(hex) = digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        u64::from_str_radix(hex, 16).ok()
    } else if digits.len() > 1 && digits.starts_with('0') {
        u64::from_str_radix(&digits[1..], 8).ok()
    } else {
        digits.parse().ok()
    }
}

/// Value of a floating literal, ignoring its suffix.
#[must_use]
pub fn float_value(text: &str) -> Option<f64> {
    text.trim_end_matches(['f', 'F', 'l', 'L']).parse().ok()
}

/// Decode the escapes in the body of a string or character literal.
///
/// `raw` is the full lexeme including any encoding prefix and quotes.
/// Escapes are assumed valid (the lexer rejects bad ones); unknown
/// escapes decode to the escaped character.
#[must_use]
pub fn unescape(raw: &str) -> String {
    let quoted = raw.trim_start_matches(|c: char| c.is_ascii_alphanumeric());
    let body = quoted
        .get(1..quoted.len().saturating_sub(1))
        .unwrap_or_default();
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let Some(esc) = chars.next() else {
            out.push('\\');
            break;
        };
        match esc {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            'a' => out.push('\u{7}'),
            'b' => out.push('\u{8}'),
            'f' => out.push('\u{c}'),
            'v' => out.push('\u{b}'),
            '0'..='7' => {
                let mut value = esc.to_digit(8).unwrap_or_default();
                for _ in 0..2 {
                    match chars.peek().and_then(|d| d.to_digit(8)) {
                        Some(d) => {
                            value = value * 8 + d;
                            chars.next();
                        }
                        None => break,
                    }
                }
                out.push(char::from(u8::try_from(value & 0xFF).unwrap_or_default()));
            }
            'x' => {
                let mut value = 0;
                for _ in 0..2 {
                    match chars.peek().and_then(|d| d.to_digit(16)) {
                        Some(d) => {
                            value = value * 16 + d;
                            chars.next();
                        }
                        None => break,
                    }
                }
                out.push(char::from(u8::try_from(value & 0xFF).unwrap_or_default()));
            }
            '\n' => {}
            other => out.push(other),
        }
    }
    out
}
