use std::fmt;

use serde::{Serialize, Serializer};

/// Half-open byte range `[start, end)` into the source buffer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Zero-width span at `pos`.
    #[must_use]
    pub const fn empty_at(pos: usize) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    /// Smallest span covering both `self` and `other`.
    #[must_use]
    pub const fn to(self, other: Self) -> Self {
        let start = if self.start < other.start {
            self.start
        } else {
            other.start
        };
        let end = if self.end > other.end {
            self.end
        } else {
            other.end
        };
        Self { start, end }
    }

    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    #[must_use]
    pub const fn len(self) -> usize {
        self.end - self.start
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.start == self.end
    }
}

impl Serialize for Span {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        [self.start, self.end].serialize(serializer)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Reserved words recognised by the lexer, shared by C and C++.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    Int,
    Char,
    Float,
    Double,
    Short,
    Long,
    Unsigned,
    Signed,
    Void,
    Bool,
    Static,
    Extern,
    Register,
    Inline,
    Const,
    Volatile,
    Struct,
    Union,
    Enum,
    Typedef,
    Return,
    If,
    Else,
    For,
    While,
    Do,
    Switch,
    Case,
    Default,
    Break,
    Continue,
    Goto,
    Sizeof,
    Class,
    Namespace,
    Using,
    Public,
    Private,
    Protected,
    Virtual,
    Override,
    Template,
    Typename,
    Operator,
    This,
    New,
    Delete,
    True,
    False,
    Nullptr,
}

impl Keyword {
    /// Look up a keyword by its spelling.
    #[must_use]
    pub fn from_ident(ident: &str) -> Option<Self> {
        let kw = match ident {
            "int" => Self::Int,
            "char" => Self::Char,
            "float" => Self::Float,
            "double" => Self::Double,
            "short" => Self::Short,
            "long" => Self::Long,
            "unsigned" => Self::Unsigned,
            "signed" => Self::Signed,
            "void" => Self::Void,
            "bool" => Self::Bool,
            "static" => Self::Static,
            "extern" => Self::Extern,
            "register" => Self::Register,
            "inline" => Self::Inline,
            "const" => Self::Const,
            "volatile" => Self::Volatile,
            "struct" => Self::Struct,
            "union" => Self::Union,
            "enum" => Self::Enum,
            "typedef" => Self::Typedef,
            "return" => Self::Return,
            "if" => Self::If,
            "else" => Self::Else,
            "for" => Self::For,
            "while" => Self::While,
            "do" => Self::Do,
            "switch" => Self::Switch,
            "case" => Self::Case,
            "default" => Self::Default,
            "break" => Self::Break,
            "continue" => Self::Continue,
            "goto" => Self::Goto,
            "sizeof" => Self::Sizeof,
            "class" => Self::Class,
            "namespace" => Self::Namespace,
            "using" => Self::Using,
            "public" => Self::Public,
            "private" => Self::Private,
            "protected" => Self::Protected,
            "virtual" => Self::Virtual,
            "override" => Self::Override,
            "template" => Self::Template,
            "typename" => Self::Typename,
            "operator" => Self::Operator,
            "this" => Self::This,
            "new" => Self::New,
            "delete" => Self::Delete,
            "true" => Self::True,
            "false" => Self::False,
            "nullptr" => Self::Nullptr,
            _ => return None,
        };
        Some(kw)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::Char => "char",
            Self::Float => "float",
            Self::Double => "double",
            Self::Short => "short",
            Self::Long => "long",
            Self::Unsigned => "unsigned",
            Self::Signed => "signed",
            Self::Void => "void",
            Self::Bool => "bool",
            Self::Static => "static",
            Self::Extern => "extern",
            Self::Register => "register",
            Self::Inline => "inline",
            Self::Const => "const",
            Self::Volatile => "volatile",
            Self::Struct => "struct",
            Self::Union => "union",
            Self::Enum => "enum",
            Self::Typedef => "typedef",
            Self::Return => "return",
            Self::If => "if",
            Self::Else => "else",
            Self::For => "for",
            Self::While => "while",
            Self::Do => "do",
            Self::Switch => "switch",
            Self::Case => "case",
            Self::Default => "default",
            Self::Break => "break",
            Self::Continue => "continue",
            Self::Goto => "goto",
            Self::Sizeof => "sizeof",
            Self::Class => "class",
            Self::Namespace => "namespace",
            Self::Using => "using",
            Self::Public => "public",
            Self::Private => "private",
            Self::Protected => "protected",
            Self::Virtual => "virtual",
            Self::Override => "override",
            Self::Template => "template",
            Self::Typename => "typename",
            Self::Operator => "operator",
            Self::This => "this",
            Self::New => "new",
            Self::Delete => "delete",
            Self::True => "true",
            Self::False => "false",
            Self::Nullptr => "nullptr",
        }
    }

    /// Built-in type keywords that may be combined (`unsigned long long`).
    #[must_use]
    pub const fn is_builtin_type(self) -> bool {
        matches!(
            self,
            Self::Int
                | Self::Char
                | Self::Float
                | Self::Double
                | Self::Short
                | Self::Long
                | Self::Unsigned
                | Self::Signed
                | Self::Void
                | Self::Bool
        )
    }
}

impl Keyword {
    /// Words reserved only in C++; ordinary identifiers in C, where `bool`
    /// and its values come from `<stdbool.h>` or a user typedef.
    #[must_use]
    pub const fn is_cpp_only(self) -> bool {
        matches!(
            self,
            Self::Bool
                | Self::True
                | Self::False
                | Self::Class
                | Self::Namespace
                | Self::Using
                | Self::Public
                | Self::Private
                | Self::Protected
                | Self::Virtual
                | Self::Override
                | Self::Template
                | Self::Typename
                | Self::Operator
                | Self::This
                | Self::New
                | Self::Delete
                | Self::Nullptr
        )
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operators and separators, matched greedily by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Punct {
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Semi,
    Comma,
    Dot,
    Ellipsis,
    Arrow,
    ColonColon,
    Colon,
    Question,
    Lt,
    Gt,
    Le,
    Ge,
    EqEq,
    Ne,
    AndAnd,
    OrOr,
    Bang,
    Eq,
    PlusEq,
    MinusEq,
    StarEq,
    SlashEq,
    PercentEq,
    AmpEq,
    PipeEq,
    CaretEq,
    ShlEq,
    ShrEq,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Amp,
    Pipe,
    Caret,
    Tilde,
    Shl,
    Shr,
    PlusPlus,
    MinusMinus,
    Hash,
    HashHash,
}

impl Punct {
    /// Punctuators ordered longest first so a linear scan is a greedy match.
    pub const ALL: [Self; 49] = [
        Self::Ellipsis,
        Self::ShlEq,
        Self::ShrEq,
        Self::Arrow,
        Self::ColonColon,
        Self::Le,
        Self::Ge,
        Self::EqEq,
        Self::Ne,
        Self::AndAnd,
        Self::OrOr,
        Self::PlusEq,
        Self::MinusEq,
        Self::StarEq,
        Self::SlashEq,
        Self::PercentEq,
        Self::AmpEq,
        Self::PipeEq,
        Self::CaretEq,
        Self::Shl,
        Self::Shr,
        Self::PlusPlus,
        Self::MinusMinus,
        Self::HashHash,
        Self::LParen,
        Self::RParen,
        Self::LBrace,
        Self::RBrace,
        Self::LBracket,
        Self::RBracket,
        Self::Semi,
        Self::Comma,
        Self::Dot,
        Self::Colon,
        Self::Question,
        Self::Lt,
        Self::Gt,
        Self::Bang,
        Self::Eq,
        Self::Plus,
        Self::Minus,
        Self::Star,
        Self::Slash,
        Self::Percent,
        Self::Amp,
        Self::Pipe,
        Self::Caret,
        Self::Tilde,
        Self::Hash,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LParen => "(",
            Self::RParen => ")",
            Self::LBrace => "{",
            Self::RBrace => "}",
            Self::LBracket => "[",
            Self::RBracket => "]",
            Self::Semi => ";",
            Self::Comma => ",",
            Self::Dot => ".",
            Self::Ellipsis => "...",
            Self::Arrow => "->",
            Self::ColonColon => "::",
            Self::Colon => ":",
            Self::Question => "?",
            Self::Lt => "<",
            Self::Gt => ">",
            Self::Le => "<=",
            Self::Ge => ">=",
            Self::EqEq => "==",
            Self::Ne => "!=",
            Self::AndAnd => "&&",
            Self::OrOr => "||",
            Self::Bang => "!",
            Self::Eq => "=",
            Self::PlusEq => "+=",
            Self::MinusEq => "-=",
            Self::StarEq => "*=",
            Self::SlashEq => "/=",
            Self::PercentEq => "%=",
            Self::AmpEq => "&=",
            Self::PipeEq => "|=",
            Self::CaretEq => "^=",
            Self::ShlEq => "<<=",
            Self::ShrEq => ">>=",
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Star => "*",
            Self::Slash => "/",
            Self::Percent => "%",
            Self::Amp => "&",
            Self::Pipe => "|",
            Self::Caret => "^",
            Self::Tilde => "~",
            Self::Shl => "<<",
            Self::Shr => ">>",
            Self::PlusPlus => "++",
            Self::MinusMinus => "--",
            Self::Hash => "#",
            Self::HashHash => "##",
        }
    }
}

impl fmt::Display for Punct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Token kinds produced by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Ident,
    IntLit,
    FloatLit,
    CharLit,
    StringLit,
    Punct(Punct),
    Keyword(Keyword),
    /// A whole preprocessor line, text captured raw.
    Directive,
    /// `//` or `/* */` comment, only when trivia are kept.
    Comment,
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ident => write!(f, "identifier"),
            Self::IntLit => write!(f, "integer literal"),
            Self::FloatLit => write!(f, "floating literal"),
            Self::CharLit => write!(f, "character literal"),
            Self::StringLit => write!(f, "string literal"),
            Self::Punct(p) => write!(f, "'{p}'"),
            Self::Keyword(k) => write!(f, "'{k}'"),
            Self::Directive => write!(f, "preprocessor directive"),
            Self::Comment => write!(f, "comment"),
            Self::Eof => write!(f, "end of file"),
        }
    }
}

/// A single token with its kind, raw text, and byte span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub span: Span,
}

impl Token {
    #[must_use]
    pub fn is_punct(&self, punct: Punct) -> bool {
        self.kind == TokenKind::Punct(punct)
    }

    #[must_use]
    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        self.kind == TokenKind::Keyword(keyword)
    }

    /// Human-readable description used in diagnostics.
    #[must_use]
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::Eof => "end of file".to_string(),
            TokenKind::Ident => format!("identifier '{}'", self.text),
            TokenKind::Punct(_) | TokenKind::Keyword(_) => format!("'{}'", self.text),
            TokenKind::Directive => "preprocessor directive".to_string(),
            _ => format!("{} {}", self.kind, self.text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn punct_table_is_longest_first() {
        for (i, a) in Punct::ALL.iter().enumerate() {
            for b in &Punct::ALL[i + 1..] {
                assert!(
                    !b.as_str().starts_with(a.as_str()) || b.as_str() == a.as_str(),
                    "{b} must come before {a}"
                );
            }
        }
    }

    #[test]
    fn keyword_round_trip() {
        for word in ["int", "nullptr", "override", "typename", "goto"] {
            let kw = Keyword::from_ident(word).expect("keyword");
            assert_eq!(kw.as_str(), word);
        }
        assert_eq!(Keyword::from_ident("final"), None);
    }

    #[test]
    fn span_join_and_contains() {
        let a = Span::new(2, 5);
        let b = Span::new(4, 9);
        let joined = a.to(b);
        assert_eq!(joined, Span::new(2, 9));
        assert!(joined.contains(a));
        assert!(joined.contains(b));
        assert!(!a.contains(b));
        assert_eq!(joined.len(), 7);
    }
}
