//! Vi-compatible tag lines for the declarations of a translation unit.
//!
//! Only file-level and member declarations are tagged; function bodies are
//! not searched. Each line reads
//! `name<TAB>file<TAB>/^line$/;"<TAB>kind<TAB>line:N` followed by optional
//! `file:`, scope, `access:`, `signature:`, `typeref:` and `end:` fields.
//! [`TagOptions`] picks the fields, the extra entries and the ordering.

use std::borrow::Cow;
use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;

use crate::ast::{
    Access, ClassDecl, EnumDecl, FunctionDecl, Item, ItemKind, StorageClass, StructDecl,
    TranslationUnit, Type,
};
use crate::config::Language;
use crate::source::SourceBuffer;
use crate::token::Span;

/// Tag kind, printed as its single-letter ctags code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Macro,
    Enumerator,
    Function,
    Prototype,
    Enum,
    Struct,
    Union,
    Class,
    Typedef,
    Variable,
    Extern,
    Member,
    Namespace,
    Include,
}

impl Kind {
    #[must_use]
    pub const fn letter(self) -> char {
        match self {
            Self::Macro => 'd',
            Self::Enumerator => 'e',
            Self::Function => 'f',
            Self::Prototype => 'p',
            Self::Enum => 'g',
            Self::Struct => 's',
            Self::Union => 'u',
            Self::Class => 'c',
            Self::Typedef => 't',
            Self::Variable => 'v',
            Self::Extern => 'x',
            Self::Member => 'm',
            Self::Namespace => 'n',
            Self::Include => 'h',
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// Enclosing scope of a tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeKind {
    Namespace,
    Class,
    Struct,
    Union,
    Enum,
}

impl ScopeKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Namespace => "namespace",
            Self::Class => "class",
            Self::Struct => "struct",
            Self::Union => "union",
            Self::Enum => "enum",
        }
    }
}

/// One optional field of a tag line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Kind,
    Line,
    Access,
    Signature,
    Scope,
    Typeref,
    End,
}

impl Field {
    pub const ALL: [Self; 7] = [
        Self::Kind,
        Self::Line,
        Self::Access,
        Self::Signature,
        Self::Scope,
        Self::Typeref,
        Self::End,
    ];

    /// ctags field letter.
    #[must_use]
    pub const fn letter(self) -> char {
        match self {
            Self::Kind => 'k',
            Self::Line => 'n',
            Self::Access => 'a',
            Self::Signature => 'S',
            Self::Scope => 's',
            Self::Typeref => 't',
            Self::End => 'e',
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Kind => "kind",
            Self::Line => "line",
            Self::Access => "access",
            Self::Signature => "signature",
            Self::Scope => "scope",
            Self::Typeref => "typeref",
            Self::End => "end",
        }
    }

    const fn bit(self) -> u8 {
        1 << self as u8
    }

    fn from_letter(letter: char) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.letter() == letter)
    }

    fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.name() == name)
    }
}

/// Set of enabled [`Field`]s.
///
/// Parsed from a ctags-style list: `nkS` names the whole set, `+e-a` edits
/// the default one. Long names go in braces (`+{end}`) or in a comma list
/// (`+line,-access`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fields(u8);

impl Fields {
    #[must_use]
    pub const fn none() -> Self {
        Self(0)
    }

    #[must_use]
    pub const fn contains(self, field: Field) -> bool {
        self.0 & field.bit() != 0
    }

    #[must_use]
    pub const fn with(self, field: Field) -> Self {
        Self(self.0 | field.bit())
    }

    #[must_use]
    pub const fn without(self, field: Field) -> Self {
        Self(self.0 & !field.bit())
    }

    const fn set(self, field: Field, on: bool) -> Self {
        if on { self.with(field) } else { self.without(field) }
    }
}

impl Default for Fields {
    /// Everything but `end`.
    fn default() -> Self {
        Self::none()
            .with(Field::Kind)
            .with(Field::Line)
            .with(Field::Access)
            .with(Field::Signature)
            .with(Field::Scope)
            .with(Field::Typeref)
    }
}

impl FromStr for Fields {
    type Err = TagOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let spec = s.trim();
        let start = if spec.starts_with(['+', '-']) {
            Self::default()
        } else {
            Self::none()
        };
        edit_flags(spec, start, |fields, word, on| {
            let field = if word.chars().count() == 1 {
                word.chars().next().and_then(Field::from_letter)
            } else {
                Field::from_name(word)
            };
            field.map(|field| fields.set(field, on))
        })
        .ok_or_else(|| TagOptionError::Field(s.to_string()))
    }
}

/// Extra entries and markers beyond one plain tag per declaration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Extras {
    /// Also emit `Scope::name` entries for scoped tags (`q`).
    pub qualified: bool,
    /// Mark tags only visible in their file with a `file:` field (`f`).
    pub file_scope: bool,
}

impl FromStr for Extras {
    type Err = TagOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        edit_flags(s.trim(), Self::default(), |mut extras, word, on| {
            match word {
                "q" | "qualified" => extras.qualified = on,
                "f" | "fileScope" => extras.file_scope = on,
                _ => return None,
            }
            Some(extras)
        })
        .ok_or_else(|| TagOptionError::Extra(s.to_string()))
    }
}

/// Walk a ctags flag list. `+` and `-` switch between enabling and
/// disabling until the next sign; a comma part or a `{braced}` word that
/// is a long name counts as one flag, anything else is read letter by
/// letter.
fn edit_flags<T: Copy>(
    spec: &str,
    start: T,
    apply: impl Fn(T, &str, bool) -> Option<T>,
) -> Option<T> {
    let mut value = start;
    let mut on = true;
    for part in spec.split(',').map(str::trim).filter(|part| !part.is_empty()) {
        let mut rest = part;
        while !rest.is_empty() {
            if let Some(tail) = rest.strip_prefix('+') {
                on = true;
                rest = tail;
            } else if let Some(tail) = rest.strip_prefix('-') {
                on = false;
                rest = tail;
            } else if let Some(tail) = rest.strip_prefix('{') {
                let (word, after) = tail.split_once('}')?;
                value = apply(value, word, on)?;
                rest = after;
            } else if let Some(next) = (rest.chars().count() > 1)
                .then(|| apply(value, rest, on))
                .flatten()
            {
                value = next;
                rest = "";
            } else {
                let letter = rest.chars().next()?;
                let (word, tail) = rest.split_at(letter.len_utf8());
                value = apply(value, word, on)?;
                rest = tail;
            }
        }
    }
    Some(value)
}

/// Rejected `--fields` or `--extras` value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TagOptionError {
    #[error("unknown tag field in '{0}'")]
    Field(String),
    #[error("unknown tag extra in '{0}'")]
    Extra(String),
}

/// What to emit and in which order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagOptions {
    /// Order tags by name. Ties keep their collection order.
    pub sort: bool,
    pub extras: Extras,
    pub fields: Fields,
}

impl Default for TagOptions {
    fn default() -> Self {
        Self {
            sort: true,
            extras: Extras::default(),
            fields: Fields::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub name: String,
    pub file: String,
    /// 1-based line of the declaration.
    pub line: usize,
    /// 1-based line where the declaration ends.
    pub end_line: usize,
    /// Full text of that line, used as the search address.
    pub pattern: String,
    pub kind: Kind,
    /// Namespace path first, then the innermost aggregate.
    pub scope: Vec<(ScopeKind, String)>,
    pub access: Option<Access>,
    pub signature: Option<String>,
    pub typeref: Option<String>,
    /// Declared `static` outside any aggregate, so only visible in its file.
    pub file_scope: bool,
}

impl Tag {
    /// Render with the default fields, without the trailing newline.
    #[must_use]
    pub fn to_line(&self) -> String {
        self.render(&TagOptions::default())
    }

    /// Render as one line of a tags file, without the trailing newline.
    #[must_use]
    pub fn render(&self, options: &TagOptions) -> String {
        let fields = options.fields;
        let mut line = format!(
            "{}\t{}\t/^{}$/;\"",
            self.name,
            self.file,
            escape_pattern(&self.pattern)
        );
        if fields.contains(Field::Kind) {
            line.push('\t');
            line.push(self.kind.letter());
        }
        if fields.contains(Field::Line) {
            line.push_str(&format!("\tline:{}", self.line));
        }
        if options.extras.file_scope && self.file_scope {
            line.push_str("\tfile:");
        }
        if fields.contains(Field::Scope) || options.extras.qualified {
            for (kind, name) in &self.scope {
                line.push('\t');
                line.push_str(kind.as_str());
                line.push(':');
                line.push_str(name);
            }
        }
        if let Some(access) = self.access.filter(|_| fields.contains(Field::Access)) {
            line.push_str("\taccess:");
            line.push_str(access.as_str());
        }
        if let Some(signature) = self
            .signature
            .as_ref()
            .filter(|_| fields.contains(Field::Signature))
        {
            line.push_str("\tsignature:");
            line.push_str(signature);
        }
        if let Some(typeref) = self
            .typeref
            .as_ref()
            .filter(|_| fields.contains(Field::Typeref))
        {
            line.push_str("\ttyperef:typename:");
            line.push_str(typeref);
        }
        if fields.contains(Field::End) {
            line.push_str(&format!("\tend:{}", self.end_line));
        }
        line
    }

    /// Name prefixed with every enclosing scope.
    #[must_use]
    pub fn qualified_name(&self, separator: &str) -> String {
        let mut name = String::new();
        for (_, scope) in &self.scope {
            name.push_str(&scope.replace("::", separator));
            name.push_str(separator);
        }
        name.push_str(&self.name);
        name
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_line())
    }
}

/// Stable sort by name.
pub fn sort(tags: &mut [Tag]) {
    tags.sort_by(|a, b| a.name.cmp(&b.name));
}

/// Write one rendered line per tag.
pub fn write_tags<W: Write>(mut out: W, tags: &[Tag], options: &TagOptions) -> io::Result<()> {
    for tag in tags {
        writeln!(out, "{}", tag.render(options))?;
    }
    out.flush()
}

fn escape_pattern(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '/' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Collect tags in source order. Directives found inside a declaration
/// follow the tags of that declaration.
#[must_use]
pub fn collect(unit: &TranslationUnit, source: &SourceBuffer, file_name: &str) -> Vec<Tag> {
    let mut collector = Collector {
        source,
        file: file_name,
        scopes: Vec::new(),
        tags: Vec::new(),
    };
    collector.items(&unit.items);
    collector.tags
}

/// [`collect`], plus the qualified entries asked for by `options`, sorted
/// when `options.sort` is set.
#[must_use]
pub fn collect_with(
    unit: &TranslationUnit,
    source: &SourceBuffer,
    file_name: &str,
    options: &TagOptions,
) -> Vec<Tag> {
    let mut tags = collect(unit, source, file_name);
    if options.extras.qualified {
        let separator = match unit.language {
            Language::C => ".",
            Language::Cpp => "::",
        };
        let qualified: Vec<Tag> = tags
            .iter()
            .filter(|tag| !tag.scope.is_empty())
            .map(|tag| Tag {
                name: tag.qualified_name(separator),
                ..tag.clone()
            })
            .collect();
        tags.extend(qualified);
    }
    if options.sort {
        sort(&mut tags);
    }
    tags
}

struct Collector<'a> {
    source: &'a SourceBuffer,
    file: &'a str,
    scopes: Vec<(ScopeKind, String)>,
    tags: Vec<Tag>,
}

impl Collector<'_> {
    fn items(&mut self, items: &[Item]) {
        for item in items {
            self.item(item);
        }
    }

    fn item(&mut self, item: &Item) {
        match &item.kind {
            ItemKind::IncludeDirective { path, .. } => {
                self.push(path, Kind::Include, item.span);
            }
            ItemKind::DefineDirective { name, params, .. } => {
                let tag = self.push(name, Kind::Macro, item.span);
                tag.signature = params.as_ref().map(|p| format!("({})", p.join(", ")));
            }
            ItemKind::EnumDecl(decl) => self.enumeration(decl, item.span),
            ItemKind::StructDecl(decl) => self.record(decl, item.span),
            ItemKind::ClassDecl(decl) => self.class(decl, item.span),
            ItemKind::TypedefDecl { name, aliased_type } => {
                let tag = self.push(name, Kind::Typedef, item.span);
                tag.typeref = Some(aliased_type.to_string());
            }
            ItemKind::FunctionDecl(func) => self.function(func, item.span),
            ItemKind::VarDecl(var) => {
                let kind = if var.storage_class == StorageClass::Extern {
                    Kind::Extern
                } else {
                    Kind::Variable
                };
                let file_scope =
                    var.storage_class == StorageClass::Static && self.outside_aggregates();
                let tag = self.push(&var.name, kind, item.span);
                tag.typeref = Some(var.ty.to_string());
                tag.file_scope = file_scope;
            }
            ItemKind::FieldDecl(field) => {
                if let Some(name) = &field.name {
                    let tag = self.push(name, Kind::Member, item.span);
                    tag.access = field.access;
                    tag.typeref = Some(field.ty.to_string());
                }
            }
            ItemKind::NamespaceDecl { name, items } => match name {
                Some(name) => {
                    self.push(name, Kind::Namespace, item.span);
                    self.scoped(ScopeKind::Namespace, name, items);
                }
                None => self.items(items),
            },
            ItemKind::TemplateDecl { inner, .. } => self.item(inner),
            ItemKind::LinkageSpec { items, .. } => self.items(items),
            ItemKind::ConditionalDirective { .. }
            | ItemKind::OtherDirective { .. }
            | ItemKind::UsingDirective { .. } => {}
        }
        self.items(&item.directives);
    }

    fn enumeration(&mut self, decl: &EnumDecl, span: Span) {
        let Some(entries) = &decl.entries else {
            return;
        };
        match &decl.name {
            Some(name) => {
                let tag = self.push(name, Kind::Enum, span);
                tag.typeref = decl.underlying.as_ref().map(Type::to_string);
                self.scopes.push((ScopeKind::Enum, name.clone()));
                for entry in entries {
                    self.push(&entry.name, Kind::Enumerator, entry.span);
                }
                self.scopes.pop();
            }
            // Enumerators of an unnamed enum still land in the enclosing scope.
            None => {
                for entry in entries {
                    self.push(&entry.name, Kind::Enumerator, entry.span);
                }
            }
        }
    }

    fn record(&mut self, decl: &StructDecl, span: Span) {
        let (Some(name), Some(fields)) = (&decl.name, &decl.fields) else {
            return;
        };
        let (kind, scope) = if decl.is_union {
            (Kind::Union, ScopeKind::Union)
        } else {
            (Kind::Struct, ScopeKind::Struct)
        };
        self.push(name, kind, span);
        self.scoped(scope, name, fields);
    }

    fn class(&mut self, decl: &ClassDecl, span: Span) {
        let (Some(name), Some(members)) = (&decl.name, &decl.members) else {
            return;
        };
        let (kind, scope) = if decl.is_struct {
            (Kind::Struct, ScopeKind::Struct)
        } else {
            (Kind::Class, ScopeKind::Class)
        };
        self.push(name, kind, span);
        self.scoped(scope, name, members);
    }

    fn function(&mut self, func: &FunctionDecl, span: Span) {
        let kind = if func.body.is_some() {
            Kind::Function
        } else {
            Kind::Prototype
        };
        // `A::B::f` is tagged as a member of B; outer qualifiers read as namespaces.
        let qualified = func.scope.split_last().map(|(class, outer)| {
            let mut path: Vec<String> = self
                .scopes
                .iter()
                .filter(|(kind, _)| *kind == ScopeKind::Namespace)
                .map(|(_, name)| name.clone())
                .collect();
            path.extend(outer.iter().cloned());
            let mut scope = Vec::new();
            if !path.is_empty() {
                scope.push((ScopeKind::Namespace, path.join("::")));
            }
            scope.push((ScopeKind::Class, class.clone()));
            scope
        });
        let file_scope = func.storage_class == StorageClass::Static
            && func.scope.is_empty()
            && self.outside_aggregates();
        let tag = self.push(&func.name, kind, span);
        if let Some(scope) = qualified {
            tag.scope = scope;
        }
        tag.file_scope = file_scope;
        tag.access = func.access;
        tag.signature = Some(signature(func));
        tag.typeref = func.return_type.as_ref().map(Type::to_string);
    }

    fn scoped(&mut self, kind: ScopeKind, name: &str, items: &[Item]) {
        self.scopes.push((kind, name.to_string()));
        self.items(items);
        self.scopes.pop();
    }

    fn outside_aggregates(&self) -> bool {
        self.scopes
            .iter()
            .all(|(kind, _)| *kind == ScopeKind::Namespace)
    }

    /// Namespaces joined with `::`, plus the innermost non-namespace scope.
    fn resolve_scope(&self) -> Vec<(ScopeKind, String)> {
        let namespaces: Vec<&str> = self
            .scopes
            .iter()
            .filter(|(kind, _)| *kind == ScopeKind::Namespace)
            .map(|(_, name)| name.as_str())
            .collect();
        let mut scope = Vec::new();
        if !namespaces.is_empty() {
            scope.push((ScopeKind::Namespace, namespaces.join("::")));
        }
        if let Some(inner) = self
            .scopes
            .iter()
            .rev()
            .find(|(kind, _)| *kind != ScopeKind::Namespace)
        {
            scope.push(inner.clone());
        }
        scope
    }

    fn push(&mut self, name: &str, kind: Kind, span: Span) -> &mut Tag {
        let line = self.source.locate(span.start).line;
        let end_line = self.source.locate(span.end.max(span.start + 1) - 1).line;
        let pattern = self
            .source
            .line_text(line)
            .map(Cow::into_owned)
            .unwrap_or_default();
        let scope = self.resolve_scope();
        self.tags.push(Tag {
            name: name.to_string(),
            file: self.file.to_string(),
            line,
            end_line,
            pattern,
            kind,
            scope,
            access: None,
            signature: None,
            typeref: None,
            file_scope: false,
        });
        let last = self.tags.len() - 1;
        &mut self.tags[last]
    }
}

fn signature(func: &FunctionDecl) -> String {
    let mut parts: Vec<String> = func
        .params
        .iter()
        .map(|param| match &param.name {
            Some(name) => format!("{} {name}", param.ty),
            None => param.ty.to_string(),
        })
        .collect();
    if func.variadic {
        parts.push("...".to_string());
    }
    format!("({})", parts.join(", "))
}
