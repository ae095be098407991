//! Syntax tree for C and C++ translation units.
//!
//! Every node owns copies of its lexemes; spans are plain byte offsets so
//! the tree outlives the [`SourceBuffer`](crate::SourceBuffer). Node kinds
//! serialize with a `kind` tag named after the Rust variant.

use std::fmt;

use serde::Serialize;

use crate::config::Language;
use crate::token::Span;

/// One parsed source file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranslationUnit {
    pub language: Language,
    pub items: Vec<Item>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub comments: Vec<Comment>,
    pub span: Span,
}

/// Comment trivia, only collected on request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Comment {
    pub text: String,
    pub span: Span,
}

/// Top-level or member declaration, or a preprocessor directive.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Item {
    #[serde(flatten)]
    pub kind: ItemKind,
    pub span: Span,
    /// Directives found inside the item, such as an `#ifdef` between two
    /// enumerators, in source order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub directives: Vec<Item>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind")]
pub enum ItemKind {
    IncludeDirective {
        path: String,
        is_system: bool,
    },
    DefineDirective {
        name: String,
        /// Present for function-like macros.
        #[serde(skip_serializing_if = "Option::is_none")]
        params: Option<Vec<String>>,
        replacement: String,
    },
    ConditionalDirective {
        directive: Conditional,
        #[serde(skip_serializing_if = "Option::is_none")]
        condition: Option<String>,
    },
    /// Any other directive (`#pragma`, `#undef`, `#error`, ...) or a
    /// malformed include/define line, kept verbatim.
    OtherDirective {
        name: String,
        text: String,
    },
    EnumDecl(EnumDecl),
    StructDecl(StructDecl),
    TypedefDecl {
        name: String,
        aliased_type: Type,
    },
    FunctionDecl(FunctionDecl),
    VarDecl(VarDecl),
    FieldDecl(FieldDecl),
    NamespaceDecl {
        #[serde(skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        items: Vec<Item>,
    },
    ClassDecl(ClassDecl),
    TemplateDecl {
        params: Vec<TemplateParam>,
        inner: Box<Item>,
    },
    UsingDirective {
        form: UsingForm,
        name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        alias: Option<String>,
    },
    /// `extern "C" { ... }` or `extern "C" decl`.
    LinkageSpec {
        abi: String,
        items: Vec<Item>,
    },
}

impl ItemKind {
    /// Tag name used in serialized output.
    #[must_use]
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::IncludeDirective { .. } => "IncludeDirective",
            Self::DefineDirective { .. } => "DefineDirective",
            Self::ConditionalDirective { .. } => "ConditionalDirective",
            Self::OtherDirective { .. } => "OtherDirective",
            Self::EnumDecl(_) => "EnumDecl",
            Self::StructDecl(_) => "StructDecl",
            Self::TypedefDecl { .. } => "TypedefDecl",
            Self::FunctionDecl(_) => "FunctionDecl",
            Self::VarDecl(_) => "VarDecl",
            Self::FieldDecl(_) => "FieldDecl",
            Self::NamespaceDecl { .. } => "NamespaceDecl",
            Self::ClassDecl(_) => "ClassDecl",
            Self::TemplateDecl { .. } => "TemplateDecl",
            Self::UsingDirective { .. } => "UsingDirective",
            Self::LinkageSpec { .. } => "LinkageSpec",
        }
    }

    #[must_use]
    pub const fn is_directive(&self) -> bool {
        matches!(
            self,
            Self::IncludeDirective { .. }
                | Self::DefineDirective { .. }
                | Self::ConditionalDirective { .. }
                | Self::OtherDirective { .. }
        )
    }
}

impl Item {
    #[must_use]
    pub const fn new(kind: ItemKind, span: Span) -> Self {
        Self {
            kind,
            span,
            directives: Vec::new(),
        }
    }

    /// Declared name, when the item has one.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match &self.kind {
            ItemKind::DefineDirective { name, .. }
            | ItemKind::OtherDirective { name, .. }
            | ItemKind::TypedefDecl { name, .. }
            | ItemKind::UsingDirective { name, .. } => Some(name),
            ItemKind::FunctionDecl(f) => Some(&f.name),
            ItemKind::VarDecl(v) => Some(&v.name),
            ItemKind::EnumDecl(e) => e.name.as_deref(),
            ItemKind::StructDecl(s) => s.name.as_deref(),
            ItemKind::ClassDecl(c) => c.name.as_deref(),
            ItemKind::FieldDecl(f) => f.name.as_deref(),
            ItemKind::NamespaceDecl { name, .. } => name.as_deref(),
            ItemKind::TemplateDecl { inner, .. } => inner.name(),
            ItemKind::IncludeDirective { .. }
            | ItemKind::ConditionalDirective { .. }
            | ItemKind::LinkageSpec { .. } => None,
        }
    }
}

/// Conditional-compilation directive keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Conditional {
    If,
    Ifdef,
    Ifndef,
    Elif,
    Else,
    Endif,
}

impl Conditional {
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "if" => Some(Self::If),
            "ifdef" => Some(Self::Ifdef),
            "ifndef" => Some(Self::Ifndef),
            "elif" => Some(Self::Elif),
            "else" => Some(Self::Else),
            "endif" => Some(Self::Endif),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnumDecl {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// `enum class` / `enum struct`.
    pub scoped: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub underlying: Option<Type>,
    /// `None` for a forward declaration.
    pub entries: Option<Vec<Enumerator>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Enumerator {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_expr: Option<Expr>,
    /// Computed value; `None` when it cannot be evaluated.
    pub value: Option<i64>,
    pub span: Span,
}

/// C-style aggregate: `struct` or `union`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StructDecl {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// `None` for a forward declaration.
    pub fields: Option<Vec<Item>>,
    pub is_union: bool,
}

/// C++ class, or a struct using class features.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassDecl {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub bases: Vec<BaseSpec>,
    /// `None` for a forward declaration.
    pub members: Option<Vec<Item>>,
    pub is_struct: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BaseSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access: Option<Access>,
    pub is_virtual: bool,
    #[serde(rename = "type")]
    pub ty: Type,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Access {
    Public,
    Private,
    Protected,
}

impl Access {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Private => "private",
            Self::Protected => "protected",
        }
    }
}

impl fmt::Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageClass {
    #[default]
    Auto,
    Static,
    Extern,
    Register,
}

/// Function specifier or trailing qualifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FnQualifier {
    Inline,
    Virtual,
    Explicit,
    Const,
    Override,
    Final,
    /// `= 0`.
    Pure,
    /// `= default`.
    Default,
    /// `= delete`.
    Delete,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionDecl {
    pub name: String,
    /// Qualifying scopes of an out-of-class definition, outermost first.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub scope: Vec<String>,
    /// `None` for constructors, destructors, and conversion operators.
    pub return_type: Option<Type>,
    pub params: Vec<Param>,
    pub variadic: bool,
    pub body: Option<Stmt>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub qualifiers: Vec<FnQualifier>,
    pub storage_class: StorageClass,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access: Option<Access>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub initializers: Vec<MemberInit>,
}

impl FunctionDecl {
    #[must_use]
    pub fn has(&self, qualifier: FnQualifier) -> bool {
        self.qualifiers.contains(&qualifier)
    }

    /// `Scope::name`, or the bare name.
    #[must_use]
    pub fn qualified_name(&self) -> String {
        if self.scope.is_empty() {
            self.name.clone()
        } else {
            format!("{}::{}", self.scope.join("::"), self.name)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Param {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub ty: Type,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Expr>,
    pub span: Span,
}

/// Constructor initializer `member(args)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberInit {
    pub name: String,
    pub args: Vec<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VarDecl {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: Type,
    /// `= expr`, or an [`ExprKind::InitList`] for `{...}` and `(...)` forms.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub init: Option<Expr>,
    pub storage_class: StorageClass,
}

/// Data member of a struct, union, or class.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDecl {
    /// `None` for unnamed bit-fields.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub ty: Type,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bit_width: Option<Expr>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub init: Option<Expr>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access: Option<Access>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemplateParam {
    #[serde(flatten)]
    pub kind: TemplateParamKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind")]
pub enum TemplateParamKind {
    /// `typename T = Default` / `class T`.
    TypeParam {
        #[serde(skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        default: Option<Type>,
    },
    /// `int N = 4`.
    ValueParam {
        #[serde(rename = "type")]
        ty: Type,
        #[serde(skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        default: Option<Expr>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UsingForm {
    /// `using namespace std;`
    Namespace,
    /// `using std::cout;`
    Declaration,
    /// `namespace fs = std::filesystem;`
    NamespaceAlias,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TagKind {
    Struct,
    Union,
    Enum,
    Class,
}

impl TagKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Struct => "struct",
            Self::Union => "union",
            Self::Enum => "enum",
            Self::Class => "class",
        }
    }
}

/// `const` / `volatile` qualifiers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Cv {
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_const: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_volatile: bool,
}

impl Cv {
    pub const CONST: Self = Self {
        is_const: true,
        is_volatile: false,
    };

    #[must_use]
    pub const fn is_empty(self) -> bool {
        !self.is_const && !self.is_volatile
    }

    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self {
            is_const: self.is_const || other.is_const,
            is_volatile: self.is_volatile || other.is_volatile,
        }
    }
}

#[allow(clippy::trivially_copy_pass_by_ref)] // serde hands fields over by reference
const fn cv_is_empty(cv: &Cv) -> bool {
    cv.is_empty()
}

impl fmt::Display for Cv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.is_const, self.is_volatile) {
            (true, true) => f.write_str("const volatile"),
            (true, false) => f.write_str("const"),
            (false, true) => f.write_str("volatile"),
            (false, false) => Ok(()),
        }
    }
}

/// Structural type descriptor; carries no span of its own.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind")]
pub enum Type {
    /// Builtin (`unsigned int`), typedef name, or tag reference (`struct Node`).
    Named {
        name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        tag: Option<TagKind>,
    },
    /// Unnamed aggregate, referenced by the span of its definition.
    Anonymous { tag: TagKind, decl: Span },
    Pointer {
        inner: Box<Self>,
        #[serde(skip_serializing_if = "cv_is_empty")]
        cv: Cv,
    },
    Reference { inner: Box<Self>, rvalue: bool },
    Array {
        inner: Box<Self>,
        #[serde(skip_serializing_if = "Option::is_none")]
        size: Option<Box<Expr>>,
    },
    Function {
        ret: Box<Self>,
        params: Vec<Self>,
        variadic: bool,
    },
    Qualified { inner: Box<Self>, cv: Cv },
    /// Template-id `base<args>`.
    Template { base: String, args: Vec<TemplateArg> },
    /// `scope::inner`.
    Nested { scope: String, inner: Box<Self> },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TemplateArg {
    Type(Type),
    Expr(Expr),
}

impl Type {
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named {
            name: name.into(),
            tag: None,
        }
    }

    #[must_use]
    pub fn tagged(tag: TagKind, name: impl Into<String>) -> Self {
        Self::Named {
            name: name.into(),
            tag: Some(tag),
        }
    }

    #[must_use]
    pub fn pointer_to(inner: Self) -> Self {
        Self::Pointer {
            inner: Box::new(inner),
            cv: Cv::default(),
        }
    }

    /// Wrap in cv-qualifiers; a no-op for empty `cv`.
    #[must_use]
    pub fn qualified(self, cv: Cv) -> Self {
        if cv.is_empty() {
            return self;
        }
        match self {
            Self::Qualified { inner, cv: old } => Self::Qualified {
                inner,
                cv: old.union(cv),
            },
            other => Self::Qualified {
                inner: Box::new(other),
                cv,
            },
        }
    }

    /// Strip cv-qualification.
    #[must_use]
    pub fn unqualified(&self) -> &Self {
        match self {
            Self::Qualified { inner, .. } => inner.unqualified(),
            other => other,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named { name, tag } => match tag {
                Some(tag) => write!(f, "{} {name}", tag.as_str()),
                None => f.write_str(name),
            },
            Self::Anonymous { tag, .. } => write!(f, "{} <anonymous>", tag.as_str()),
            Self::Pointer { inner, cv } => {
                write!(f, "{inner} *")?;
                if !cv.is_empty() {
                    write!(f, "{cv}")?;
                }
                Ok(())
            }
            Self::Reference { inner, rvalue } => {
                write!(f, "{inner} {}", if *rvalue { "&&" } else { "&" })
            }
            Self::Array { inner, size } => {
                if size.is_some() {
                    write!(f, "{inner} [N]")
                } else {
                    write!(f, "{inner} []")
                }
            }
            Self::Function {
                ret,
                params,
                variadic,
            } => {
                write!(f, "{ret} (")?;
                for (i, param) in params.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{param}")?;
                }
                if *variadic {
                    f.write_str(if params.is_empty() { "..." } else { ", ..." })?;
                }
                f.write_str(")")
            }
            Self::Qualified { inner, cv } => write!(f, "{cv} {inner}"),
            Self::Template { base, args } => {
                write!(f, "{base}<")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    match arg {
                        TemplateArg::Type(ty) => write!(f, "{ty}")?,
                        TemplateArg::Expr(_) => f.write_str("expr")?,
                    }
                }
                f.write_str(">")
            }
            Self::Nested { scope, inner } => write!(f, "{scope}::{inner}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stmt {
    #[serde(flatten)]
    pub kind: StmtKind,
    pub span: Span,
    /// Directives found inside the statement's expressions.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub directives: Vec<Item>,
}

impl Stmt {
    #[must_use]
    pub const fn new(kind: StmtKind, span: Span) -> Self {
        Self {
            kind,
            span,
            directives: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind")]
pub enum StmtKind {
    Compound {
        stmts: Vec<Stmt>,
    },
    Expression {
        expr: Expr,
    },
    Return {
        #[serde(skip_serializing_if = "Option::is_none")]
        value: Option<Expr>,
    },
    If {
        cond: Expr,
        then_branch: Box<Stmt>,
        #[serde(skip_serializing_if = "Option::is_none")]
        else_branch: Option<Box<Stmt>>,
    },
    For {
        #[serde(skip_serializing_if = "Option::is_none")]
        init: Option<Box<Stmt>>,
        #[serde(skip_serializing_if = "Option::is_none")]
        cond: Option<Expr>,
        #[serde(skip_serializing_if = "Option::is_none")]
        step: Option<Expr>,
        body: Box<Stmt>,
    },
    While {
        cond: Expr,
        body: Box<Stmt>,
    },
    DoWhile {
        body: Box<Stmt>,
        cond: Expr,
    },
    Switch {
        cond: Expr,
        body: Box<Stmt>,
    },
    /// `case value:` or, with no value, `default:`.
    Case {
        #[serde(skip_serializing_if = "Option::is_none")]
        value: Option<Expr>,
    },
    Break,
    Continue,
    Goto {
        label: String,
    },
    Label {
        name: String,
    },
    DeclStmt {
        decls: Vec<Item>,
    },
    Empty,
    Directive {
        directive: Box<Item>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Expr {
    #[serde(flatten)]
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    #[must_use]
    pub const fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind")]
pub enum ExprKind {
    IntLit {
        value: u64,
        text: String,
    },
    FloatLit {
        value: f64,
        text: String,
    },
    /// Adjacent literals are merged; `text` joins the raw pieces with a space.
    StringLit {
        value: String,
        text: String,
    },
    CharLit {
        value: char,
        text: String,
    },
    BoolLit {
        value: bool,
    },
    Nullptr,
    This,
    /// Possibly qualified name such as `std::cout`.
    Ident {
        name: String,
    },
    Unary {
        op: UnaryOp,
        arg: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Assign {
        op: AssignOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Ternary {
        cond: Box<Expr>,
        then_expr: Box<Expr>,
        else_expr: Box<Expr>,
    },
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },
    Index {
        base: Box<Expr>,
        index: Box<Expr>,
    },
    Member {
        base: Box<Expr>,
        name: String,
        arrow: bool,
    },
    Cast {
        #[serde(rename = "type")]
        ty: Type,
        expr: Box<Expr>,
    },
    Sizeof {
        operand: SizeofOperand,
    },
    Paren {
        expr: Box<Expr>,
    },
    /// `{a, b}`, or with `braced == false` a parenthesized direct initializer.
    InitList {
        elements: Vec<Expr>,
        braced: bool,
    },
    New {
        #[serde(rename = "type")]
        ty: Type,
        #[serde(skip_serializing_if = "Option::is_none")]
        args: Option<Vec<Expr>>,
        #[serde(skip_serializing_if = "Option::is_none")]
        array_size: Option<Box<Expr>>,
    },
    Delete {
        arg: Box<Expr>,
        array: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SizeofOperand {
    Type(Type),
    Expr(Box<Expr>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnaryOp {
    PreInc,
    PreDec,
    PostInc,
    PostDec,
    Deref,
    AddrOf,
    Neg,
    Plus,
    Not,
    BitNot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BinaryOp {
    #[serde(rename = "*")]
    Mul,
    #[serde(rename = "/")]
    Div,
    #[serde(rename = "%")]
    Rem,
    #[serde(rename = "+")]
    Add,
    #[serde(rename = "-")]
    Sub,
    #[serde(rename = "<<")]
    Shl,
    #[serde(rename = ">>")]
    Shr,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = "<=")]
    Le,
    #[serde(rename = ">=")]
    Ge,
    #[serde(rename = "==")]
    Eq,
    #[serde(rename = "!=")]
    Ne,
    #[serde(rename = "&")]
    BitAnd,
    #[serde(rename = "^")]
    BitXor,
    #[serde(rename = "|")]
    BitOr,
    #[serde(rename = "&&")]
    And,
    #[serde(rename = "||")]
    Or,
    #[serde(rename = ",")]
    Comma,
}

impl BinaryOp {
    /// Binding strength; higher binds tighter.
    #[must_use]
    pub const fn precedence(self) -> u8 {
        match self {
            Self::Mul | Self::Div | Self::Rem => 10,
            Self::Add | Self::Sub => 9,
            Self::Shl | Self::Shr => 8,
            Self::Lt | Self::Gt | Self::Le | Self::Ge => 7,
            Self::Eq | Self::Ne => 6,
            Self::BitAnd => 5,
            Self::BitXor => 4,
            Self::BitOr => 3,
            Self::And => 2,
            Self::Or => 1,
            Self::Comma => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AssignOp {
    #[serde(rename = "=")]
    Assign,
    #[serde(rename = "+=")]
    Add,
    #[serde(rename = "-=")]
    Sub,
    #[serde(rename = "*=")]
    Mul,
    #[serde(rename = "/=")]
    Div,
    #[serde(rename = "%=")]
    Rem,
    #[serde(rename = "&=")]
    BitAnd,
    #[serde(rename = "|=")]
    BitOr,
    #[serde(rename = "^=")]
    BitXor,
    #[serde(rename = "<<=")]
    Shl,
    #[serde(rename = ">>=")]
    Shr,
}
