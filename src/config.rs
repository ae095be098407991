//! Parse options and language selection.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::lexer::Lexer;
use crate::token::{Keyword, Punct, TokenKind};

/// Number of leading tokens inspected by [`Mode::Auto`].
pub const AUTO_DETECT_WINDOW: usize = 256;

/// Concrete language a unit is parsed as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    C,
    Cpp,
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::C => write!(f, "c"),
            Self::Cpp => write!(f, "cpp"),
        }
    }
}

/// Requested language mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Mode {
    C,
    Cpp,
    /// Guess from the first tokens of the input.
    #[default]
    Auto,
}

impl Mode {
    /// Pick the language for `input`.
    #[must_use]
    pub fn resolve(self, input: &[u8]) -> Language {
        match self {
            Self::C => Language::C,
            Self::Cpp => Language::Cpp,
            Self::Auto => detect_language(input),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::C => write!(f, "c"),
            Self::Cpp => write!(f, "cpp"),
            Self::Auto => write!(f, "auto"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown language mode '{0}' (expected c, cpp, or auto)")]
pub struct ParseModeError(String);

impl FromStr for Mode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "c" => Ok(Self::C),
            "cpp" | "c++" | "cxx" => Ok(Self::Cpp),
            "auto" => Ok(Self::Auto),
            _ => Err(ParseModeError(s.to_string())),
        }
    }
}

/// C++ if a C++-only construct shows up early: `class`, `namespace`,
/// `template`, `::`, or an access label.
#[must_use]
pub fn detect_language(input: &[u8]) -> Language {
    let tokens: Vec<_> = Lexer::new(input)
        .filter_map(Result::ok)
        .take(AUTO_DETECT_WINDOW)
        .collect();
    let cpp = tokens.iter().enumerate().any(|(i, token)| match token.kind {
        TokenKind::Keyword(Keyword::Class | Keyword::Namespace | Keyword::Template)
        | TokenKind::Punct(Punct::ColonColon) => true,
        TokenKind::Keyword(Keyword::Public) => tokens
            .get(i + 1)
            .is_some_and(|next| next.is_punct(Punct::Colon)),
        _ => false,
    });
    if cpp { Language::Cpp } else { Language::C }
}

/// Options for one parse.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseOptions {
    pub mode: Mode,
    pub keep_comments: bool,
}

impl ParseOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Collect comments into [`TranslationUnit::comments`](crate::ast::TranslationUnit).
    #[must_use]
    pub const fn keep_comments(mut self, keep: bool) -> Self {
        self.keep_comments = keep;
        self
    }
}
