//! C and C++ lexer, parser, and AST dumper.
//!
//! A hand-written front-end producing a typed syntax tree with byte spans.
//! Preprocessor directives are kept as items instead of being expanded,
//! syntax errors are collected as diagnostics while parsing carries on, and
//! the tree can be dumped as JSON, S-expressions, or Vi-compatible tags.
//!
//! # Quick start
//!
//! ## Parse a C snippet
//!
//! ```
//! use cfront_rs::{ItemKind, parse_str};
//!
//! let parsed = parse_str("enum color { RED, GREEN = 5, BLUE };").unwrap();
//! assert!(parsed.diagnostics.is_empty());
//!
//! let ItemKind::EnumDecl(decl) = &parsed.unit.items[0].kind else {
//!     panic!("expected an enum");
//! };
//! let values: Vec<_> = decl.entries.as_ref().unwrap().iter().map(|e| e.value).collect();
//! assert_eq!(values, [Some(0), Some(5), Some(6)]);
//! ```
//!
//! ## Pick the language and dump the tree
//!
//! ```
//! use cfront_rs::{Mode, ParseOptions, SourceBuffer, dump, parse_with};
//!
//! let source = SourceBuffer::from("class Dog { public: void bark(); };");
//! let parsed = parse_with(source, &ParseOptions::new().mode(Mode::Cpp)).unwrap();
//! let sexp = dump::to_sexp(&parsed.unit).unwrap();
//! assert!(sexp.contains("(ClassDecl"));
//! ```
//!
//! ## Recover from errors
//!
//! ```
//! use cfront_rs::parse_str;
//!
//! let parsed = parse_str("int a = ; int b = 2;").unwrap();
//! assert_eq!(parsed.diagnostics.len(), 1);
//! assert_eq!(parsed.unit.items.len(), 1);
//! assert_eq!(parsed.unit.items[0].name(), Some("b"));
//! ```

// Allow noisy pedantic lints that don't add value for
// a library crate.
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

pub mod ast;
pub mod config;
pub mod consteval;
pub mod diagnostics;
pub mod dump;
pub mod lexer;
mod parser;
pub mod preprocess;
pub mod source;
pub mod tags;
pub mod token;
pub mod walk;

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;

pub use ast::{
    Access, ClassDecl, EnumDecl, Enumerator, Expr, ExprKind, FieldDecl, FunctionDecl, Item,
    ItemKind, Param, Stmt, StmtKind, StorageClass, StructDecl, TranslationUnit, Type, VarDecl,
};
pub use config::{Language, Mode, ParseModeError, ParseOptions};
pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics, Severity, SyntaxError};
pub use lexer::{LexError, LexErrorKind, LexOptions, Lexer, tokenize};
pub use source::{LineCol, SourceBuffer};
pub use tags::Tag;
pub use token::{Keyword, Punct, Span, Token, TokenKind};
pub use walk::Visitor;

/// Failures that abort a parse. Syntax and lexical problems are not
/// errors here; they are reported through [`Parsed::diagnostics`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The input file could not be read.
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The parser stopped making progress.
    #[error("internal parser error: {0}")]
    Internal(String),
    /// The tree could not be serialized.
    #[error("dump failed: {0}")]
    Dump(#[from] serde_json::Error),
}

/// Result of parsing one translation unit.
#[derive(Debug, Clone, PartialEq)]
pub struct Parsed {
    pub source: SourceBuffer,
    pub unit: TranslationUnit,
    pub diagnostics: Diagnostics,
}

impl Parsed {
    #[must_use]
    pub fn into_unit(self) -> TranslationUnit {
        self.unit
    }

    /// Every diagnostic rendered as `severity: name:line:col: message`.
    #[must_use]
    pub fn render_diagnostics(&self) -> String {
        self.diagnostics.render(&self.source)
    }
}

/// Parse a source string with default options (language detected).
pub fn parse_str(input: &str) -> Result<Parsed, Error> {
    parse_with(SourceBuffer::from(input), &ParseOptions::default())
}

/// Parse an in-memory buffer.
pub fn parse_with(source: SourceBuffer, options: &ParseOptions) -> Result<Parsed, Error> {
    let (unit, diagnostics) = parser::parse_unit(&source, options)?;
    Ok(Parsed {
        source,
        unit,
        diagnostics,
    })
}

/// Read and parse one file. The buffer is named after `path`.
pub fn parse_file(path: impl AsRef<Path>, options: &ParseOptions) -> Result<Parsed, Error> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let source = SourceBuffer::new(bytes).with_name(path.display().to_string());
    parse_with(source, options)
}

/// Parse several files in parallel. Results keep the order of `paths`.
pub fn parse_files<P>(paths: &[P], options: &ParseOptions) -> Vec<Result<Parsed, Error>>
where
    P: AsRef<Path> + Sync,
{
    paths
        .par_iter()
        .map(|path| parse_file(path, options))
        .collect()
}
