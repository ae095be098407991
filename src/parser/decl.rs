//! Declarations: specifiers, declarators, aggregates, templates.

use crate::ast::{
    Access, BaseSpec, ClassDecl, Cv, EnumDecl, Enumerator, Expr, ExprKind, FieldDecl,
    FnQualifier, FunctionDecl, Item, ItemKind, MemberInit, Param, StorageClass, StructDecl,
    TagKind, TemplateArg, TemplateParam, TemplateParamKind, Type, UsingForm, VarDecl,
};
use crate::config::Language;
use crate::consteval::{self, Env};
use crate::diagnostics::SyntaxError;
use crate::lexer::unescape;
use crate::token::{Keyword, Punct, Span, TokenKind};

use super::{Failure, PResult, Parser};

/// Where an item appears; decides field versus variable and whether
/// constructors and direct initialization are recognised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Scope {
    File,
    Block,
    Member(Option<Access>),
}

impl Scope {
    const fn access(self) -> Option<Access> {
        match self {
            Self::Member(access) => access,
            Self::File | Self::Block => None,
        }
    }
}

/// Words accepted among the declaration specifiers of C++ code.
const CONTEXTUAL_SPECIFIERS: &[&str] =
    &["explicit", "constexpr", "mutable", "friend", "thread_local"];

#[derive(Debug, Default)]
struct Specifiers {
    storage: StorageClass,
    is_typedef: bool,
    qualifiers: Vec<FnQualifier>,
    cv: Cv,
    /// Builtin type keywords in order, e.g. `unsigned long long`.
    words: Vec<&'static str>,
    base: Option<Type>,
    /// Aggregate defined inside the specifiers.
    defined: Option<Item>,
    /// `struct X` without a body; becomes an item only if `;` follows.
    forward: Option<Item>,
}

impl Specifiers {
    fn has_type(&self) -> bool {
        !self.words.is_empty() || self.base.is_some()
    }

    fn ty(&self) -> Option<Type> {
        let base = if self.words.is_empty() {
            self.base.clone()?
        } else {
            Type::named(self.words.join(" "))
        };
        Some(base.qualified(self.cv))
    }
}

#[derive(Debug)]
enum PtrOp {
    Pointer(Cv),
    Ref { rvalue: bool },
}

#[derive(Debug)]
struct DeclName {
    scope: Vec<String>,
    name: String,
}

#[derive(Debug)]
struct FuncSuffix {
    params: Vec<Param>,
    variadic: bool,
    qualifiers: Vec<FnQualifier>,
    trailing: Option<Type>,
}

#[derive(Debug)]
enum Suffix {
    Array(Option<Expr>),
    Func(FuncSuffix),
}

/// A parsed declarator, applied to the specifier type afterwards.
#[derive(Debug, Default)]
struct Declarator {
    prefix: Vec<PtrOp>,
    inner: Option<Box<Declarator>>,
    name: Option<DeclName>,
    suffixes: Vec<Suffix>,
}

/// Wrap `ty` as the declarator describes: pointer operators bind looser
/// than array and function suffixes, and a parenthesized declarator binds
/// loosest of all.
fn apply(mut ty: Type, declarator: Declarator) -> (Type, Option<DeclName>) {
    for op in declarator.prefix {
        ty = match op {
            PtrOp::Pointer(cv) => Type::Pointer {
                inner: Box::new(ty),
                cv,
            },
            PtrOp::Ref { rvalue } => Type::Reference {
                inner: Box::new(ty),
                rvalue,
            },
        };
    }
    for suffix in declarator.suffixes.into_iter().rev() {
        ty = match suffix {
            Suffix::Array(size) => Type::Array {
                inner: Box::new(ty),
                size: size.map(Box::new),
            },
            Suffix::Func(func) => Type::Function {
                ret: Box::new(func.trailing.unwrap_or(ty)),
                params: func.params.into_iter().map(|p| p.ty).collect(),
                variadic: func.variadic,
            },
        };
    }
    match declarator.inner {
        Some(inner) => apply(ty, *inner),
        None => (ty, declarator.name),
    }
}

fn into_name(declarator: Declarator) -> Option<DeclName> {
    match declarator.inner {
        Some(inner) => into_name(*inner),
        None => declarator.name,
    }
}

/// Detach the parameter list if the declarator names a function.
fn take_function(declarator: &mut Declarator) -> Option<FuncSuffix> {
    if let Some(inner) = &mut declarator.inner {
        return take_function(inner);
    }
    if matches!(declarator.suffixes.first(), Some(Suffix::Func(_))) {
        if let Suffix::Func(func) = declarator.suffixes.remove(0) {
            return Some(func);
        }
    }
    None
}

/// Hang each directive on the item containing it. One that falls between
/// two declarators of the same declaration widens the next item to cover
/// it.
fn attach_directives(items: &mut [Item], directives: Vec<Item>) {
    for directive in directives {
        let at = directive.span;
        let index = items
            .iter()
            .position(|item| item.span.start <= at.start && at.end <= item.span.end)
            .or_else(|| items.iter().position(|item| item.span.start > at.start));
        if let Some(item) = index.and_then(|i| items.get_mut(i)) {
            item.span.start = item.span.start.min(at.start);
            item.directives.push(directive);
        } else if let Some(last) = items.last_mut() {
            last.span.end = last.span.end.max(at.end);
            last.directives.push(directive);
        }
    }
}

impl Parser<'_> {
    pub(super) fn parse_item(&mut self, scope: Scope) -> PResult<Vec<Item>> {
        self.enter()?;
        let start = self.span().start;
        let mark = self.held.len();
        let result = self.parse_item_inner(scope);
        self.leave();
        let mut items = match result {
            Ok(items) => items,
            Err(err) => {
                self.release_held(mark);
                return Err(err);
            }
        };
        let directives = self.inner_directives(start, mark);
        if items.is_empty() {
            self.release_directives(directives);
        } else {
            attach_directives(&mut items, directives);
        }
        Ok(items)
    }

    fn parse_item_inner(&mut self, scope: Scope) -> PResult<Vec<Item>> {
        match self.kind() {
            TokenKind::Punct(Punct::Semi) => {
                self.bump();
                Ok(Vec::new())
            }
            TokenKind::Keyword(Keyword::Namespace) => Ok(vec![self.parse_namespace()?]),
            TokenKind::Keyword(Keyword::Inline)
                if self.nth(1).is_keyword(Keyword::Namespace) =>
            {
                self.bump();
                Ok(vec![self.parse_namespace()?])
            }
            TokenKind::Keyword(Keyword::Template) => self.parse_template(scope),
            TokenKind::Keyword(Keyword::Using) => Ok(vec![self.parse_using()?]),
            TokenKind::Keyword(Keyword::Extern) if self.kind_at(1) == TokenKind::StringLit => {
                Ok(vec![self.parse_linkage(scope)?])
            }
            _ => self.parse_declaration(scope),
        }
    }

    fn parse_qualified_ident(&mut self, what: &str) -> PResult<String> {
        let mut name = String::new();
        if self.eat(Punct::ColonColon) {
            name.push_str("::");
        }
        name.push_str(&self.expect_ident(what)?.0);
        while self.at(Punct::ColonColon) && self.kind_at(1) == TokenKind::Ident {
            self.bump();
            name.push_str("::");
            name.push_str(&self.bump().text);
        }
        Ok(name)
    }

    fn parse_namespace(&mut self) -> PResult<Item> {
        let start = self.bump().span.start;
        let name = if self.kind() == TokenKind::Ident {
            Some(self.parse_qualified_ident("a namespace name")?)
        } else {
            None
        };
        if let Some(alias) = &name {
            if self.eat(Punct::Eq) {
                let target = self.parse_qualified_ident("a namespace name")?;
                self.expect(Punct::Semi)?;
                return Ok(Item::new(
                    ItemKind::UsingDirective {
                        form: UsingForm::NamespaceAlias,
                        name: target,
                        alias: Some(alias.clone()),
                    },
                    Span::new(start, self.prev_end),
                ));
            }
        }
        if !self.at(Punct::LBrace) {
            return Err(self.error_here("'{'"));
        }
        let items = self.enclosed(Punct::RBrace, "namespace", |p| {
            p.parse_items(Scope::File, true)
        })?;
        Ok(Item::new(
            ItemKind::NamespaceDecl { name, items },
            Span::new(start, self.prev_end),
        ))
    }

    fn parse_using(&mut self) -> PResult<Item> {
        let start = self.bump().span.start;
        let kind = if self.eat_kw(Keyword::Namespace) {
            ItemKind::UsingDirective {
                form: UsingForm::Namespace,
                name: self.parse_qualified_ident("a namespace name")?,
                alias: None,
            }
        } else if self.kind() == TokenKind::Ident && self.at_nth(1, Punct::Eq) {
            let name = self.bump().text;
            self.bump();
            let aliased_type = self.parse_type_id()?;
            self.types.insert(name.clone());
            ItemKind::TypedefDecl { name, aliased_type }
        } else {
            self.eat_kw(Keyword::Typename);
            ItemKind::UsingDirective {
                form: UsingForm::Declaration,
                name: self.parse_qualified_ident("a qualified name")?,
                alias: None,
            }
        };
        self.expect(Punct::Semi)?;
        Ok(Item::new(kind, Span::new(start, self.prev_end)))
    }

    fn parse_linkage(&mut self, scope: Scope) -> PResult<Item> {
        let start = self.bump().span.start;
        let abi = unescape(&self.bump().text);
        let items = if self.at(Punct::LBrace) {
            self.enclosed(Punct::RBrace, "linkage block", |p| {
                p.parse_items(Scope::File, true)
            })?
        } else {
            self.parse_item(scope)?
        };
        Ok(Item::new(
            ItemKind::LinkageSpec { abi, items },
            Span::new(start, self.prev_end),
        ))
    }

    fn parse_template(&mut self, scope: Scope) -> PResult<Vec<Item>> {
        let start = self.bump().span.start;
        let params = if self.at(Punct::Lt) {
            self.bump();
            self.template_depth += 1;
            let params = self.comma_list(Punct::Gt, Self::parse_template_param);
            self.template_depth -= 1;
            let params = params?;
            self.split_shr();
            self.expect(Punct::Gt)?;
            params
        } else {
            Vec::new()
        };

        let mut items = self.parse_item(scope)?.into_iter();
        let Some(inner) = items.next() else {
            return Err(self.error_here("a declaration"));
        };
        if let ItemKind::ClassDecl(ClassDecl { name: Some(name), .. })
        | ItemKind::StructDecl(StructDecl { name: Some(name), .. }) = &inner.kind
        {
            self.templates.insert(name.clone());
        }
        let span = Span::new(start, inner.span.end);
        let mut out = vec![Item::new(
            ItemKind::TemplateDecl {
                params,
                inner: Box::new(inner),
            },
            span,
        )];
        out.extend(items);
        Ok(out)
    }

    fn parse_template_param(&mut self) -> PResult<TemplateParam> {
        let start = self.span().start;
        let kind = if self.at_kw(Keyword::Class) || self.at_kw(Keyword::Typename) {
            self.bump();
            self.eat(Punct::Ellipsis);
            let name = if self.kind() == TokenKind::Ident {
                let name = self.bump().text;
                self.types.insert(name.clone());
                Some(name)
            } else {
                None
            };
            let default = if self.eat(Punct::Eq) {
                Some(self.parse_type_id()?)
            } else {
                None
            };
            TemplateParamKind::TypeParam { name, default }
        } else {
            let specs = self.parse_specifiers(false)?;
            let Some(base) = specs.ty() else {
                return Err(self.error_here("a template parameter"));
            };
            let declarator = self.parse_declarator(true)?;
            let (ty, name) = apply(base, declarator);
            let default = if self.eat(Punct::Eq) {
                Some(self.parse_conditional()?)
            } else {
                None
            };
            TemplateParamKind::ValueParam {
                ty,
                name: name.map(|n| n.name),
                default,
            }
        };
        Ok(TemplateParam {
            kind,
            span: Span::new(start, self.prev_end),
        })
    }

    // ---- specifiers ----

    fn parse_specifiers(&mut self, allow_ctor: bool) -> PResult<Specifiers> {
        let mut specs = Specifiers::default();
        let start = self.span().start;
        loop {
            match self.kind() {
                TokenKind::Keyword(kw) => match kw {
                    Keyword::Typedef => specs.is_typedef = true,
                    Keyword::Static => specs.storage = StorageClass::Static,
                    Keyword::Extern => specs.storage = StorageClass::Extern,
                    Keyword::Register => specs.storage = StorageClass::Register,
                    Keyword::Inline => specs.qualifiers.push(FnQualifier::Inline),
                    Keyword::Virtual => specs.qualifiers.push(FnQualifier::Virtual),
                    Keyword::Const => specs.cv.is_const = true,
                    Keyword::Volatile => specs.cv.is_volatile = true,
                    Keyword::Typename => {}
                    kw if kw.is_builtin_type() && specs.base.is_none() => {
                        specs.words.push(kw.as_str());
                    }
                    Keyword::Struct | Keyword::Union | Keyword::Class | Keyword::Enum
                        if !specs.has_type() =>
                    {
                        self.parse_tag(start, &mut specs)?;
                        continue;
                    }
                    _ => break,
                },
                TokenKind::Ident
                    if self.language == Language::Cpp
                        && CONTEXTUAL_SPECIFIERS.contains(&self.peek().text.as_str()) =>
                {
                    if self.at_word(0, "explicit") {
                        specs.qualifiers.push(FnQualifier::Explicit);
                    }
                }
                TokenKind::Ident | TokenKind::Punct(Punct::ColonColon) if !specs.has_type() => {
                    if allow_ctor && self.at_constructor_name() {
                        break;
                    }
                    specs.base = Some(self.parse_type_name()?);
                    continue;
                }
                _ => break,
            }
            self.bump();
        }
        Ok(specs)
    }

    /// A constructor, destructor, or conversion operator declared without a
    /// return type: `Name(` inside its class, or `A::A(`, `A::~A`, and
    /// `A::operator` anywhere.
    fn at_constructor_name(&mut self) -> bool {
        if self.kind() != TokenKind::Ident {
            return false;
        }
        if self.at_nth(1, Punct::LParen) {
            let name = self.peek().text.clone();
            return self.classes.last().is_some_and(|class| *class == name);
        }
        let mut i = 0;
        let mut previous = self.nth(0).text.clone();
        while self.at_nth(i + 1, Punct::ColonColon) {
            let next = self.nth(i + 2);
            if next.is_punct(Punct::Tilde) || next.is_keyword(Keyword::Operator) {
                return true;
            }
            if next.kind != TokenKind::Ident {
                return false;
            }
            let name = next.text.clone();
            if name == previous && self.at_nth(i + 3, Punct::LParen) {
                return true;
            }
            previous = name;
            i += 2;
        }
        false
    }

    /// A possibly qualified type name; template arguments are always
    /// parsed in type position.
    fn parse_type_name(&mut self) -> PResult<Type> {
        let global = self.eat(Punct::ColonColon);
        let mut components = Vec::new();
        loop {
            let (name, _) = self.expect_ident("a type name")?;
            let component = if self.at(Punct::Lt) {
                Type::Template {
                    base: name,
                    args: self.parse_template_args()?,
                }
            } else {
                Type::named(name)
            };
            components.push(component);
            if self.at(Punct::ColonColon) && self.kind_at(1) == TokenKind::Ident {
                self.bump();
            } else {
                break;
            }
        }
        let Some(last) = components.pop() else {
            return Err(self.error_here("a type name"));
        };
        if components.is_empty() && !global {
            return Ok(last);
        }
        let mut scope: Vec<String> = components.iter().map(ToString::to_string).collect();
        if global {
            scope.insert(0, String::new());
        }
        Ok(Type::Nested {
            scope: scope.join("::"),
            inner: Box::new(last),
        })
    }

    /// `< args >`; a `>>` token is split to close nested lists.
    pub(super) fn parse_template_args(&mut self) -> PResult<Vec<TemplateArg>> {
        self.enter()?;
        self.bump();
        self.template_depth += 1;
        let args = self.comma_list(Punct::Gt, |p| {
            let is_type = p.starts_type(0)
                || (p.kind() == TokenKind::Ident
                    && matches!(
                        p.kind_at(1),
                        TokenKind::Punct(
                            Punct::Gt | Punct::Shr | Punct::Comma | Punct::Lt | Punct::ColonColon
                        )
                    ));
            if is_type {
                Ok(TemplateArg::Type(p.parse_type_id()?))
            } else {
                Ok(TemplateArg::Expr(p.parse_conditional()?))
            }
        });
        self.template_depth -= 1;
        self.leave();
        let args = args?;
        self.split_shr();
        self.expect(Punct::Gt)?;
        Ok(args)
    }

    // ---- aggregates ----

    fn parse_tag(&mut self, start: usize, specs: &mut Specifiers) -> PResult<()> {
        let tag = match self.bump().kind {
            TokenKind::Keyword(Keyword::Union) => TagKind::Union,
            TokenKind::Keyword(Keyword::Class) => TagKind::Class,
            TokenKind::Keyword(Keyword::Enum) => TagKind::Enum,
            _ => TagKind::Struct,
        };
        let scoped =
            tag == TagKind::Enum && (self.eat_kw(Keyword::Class) || self.eat_kw(Keyword::Struct));
        let name = if self.kind() == TokenKind::Ident {
            Some(self.bump().text)
        } else {
            None
        };
        if self.language == Language::Cpp {
            if self.at_word(0, "final") {
                self.bump();
            }
            if let Some(name) = &name {
                self.types.insert(name.clone());
            }
        }

        let underlying = if tag == TagKind::Enum && self.at(Punct::Colon) && self.starts_type(1) {
            self.bump();
            Some(self.parse_type_id()?)
        } else {
            None
        };
        let bases = if matches!(tag, TagKind::Struct | TagKind::Class)
            && self.language == Language::Cpp
            && self.at(Punct::Colon)
        {
            self.bump();
            self.comma_list(Punct::LBrace, Self::parse_base)?
        } else {
            Vec::new()
        };

        if !self.at(Punct::LBrace) {
            let Some(name) = name else {
                return Err(self.error_here("a tag name or '{'"));
            };
            let kind = match tag {
                TagKind::Enum => ItemKind::EnumDecl(EnumDecl {
                    name: Some(name.clone()),
                    scoped,
                    underlying,
                    entries: None,
                }),
                TagKind::Class => ItemKind::ClassDecl(ClassDecl {
                    name: Some(name.clone()),
                    bases,
                    members: None,
                    is_struct: false,
                }),
                TagKind::Struct | TagKind::Union => ItemKind::StructDecl(StructDecl {
                    name: Some(name.clone()),
                    fields: None,
                    is_union: tag == TagKind::Union,
                }),
            };
            specs.forward = Some(Item::new(kind, Span::new(start, self.prev_end)));
            specs.base = Some(Type::tagged(tag, name));
            return Ok(());
        }

        let kind = if tag == TagKind::Enum {
            ItemKind::EnumDecl(EnumDecl {
                name: name.clone(),
                scoped,
                underlying,
                entries: Some(self.parse_enum_body()?),
            })
        } else {
            self.parse_record_body(tag, name.clone(), bases)?
        };
        let span = Span::new(start, self.prev_end);
        specs.base = Some(match name {
            Some(name) => Type::tagged(tag, name),
            None => Type::Anonymous { tag, decl: span },
        });
        specs.defined = Some(Item::new(kind, span));
        Ok(())
    }

    fn parse_base(&mut self) -> PResult<BaseSpec> {
        let start = self.span().start;
        let mut access = None;
        let mut is_virtual = false;
        loop {
            match self.kind() {
                TokenKind::Keyword(Keyword::Public) => access = Some(Access::Public),
                TokenKind::Keyword(Keyword::Private) => access = Some(Access::Private),
                TokenKind::Keyword(Keyword::Protected) => access = Some(Access::Protected),
                TokenKind::Keyword(Keyword::Virtual) => is_virtual = true,
                _ => break,
            }
            self.bump();
        }
        let ty = self.parse_type_name()?;
        Ok(BaseSpec {
            access,
            is_virtual,
            ty,
            span: Span::new(start, self.prev_end),
        })
    }

    /// Enumerators are numbered as they are parsed; an entry whose value
    /// cannot be computed leaves the following implicit ones unknown too.
    fn parse_enum_body(&mut self) -> PResult<Vec<Enumerator>> {
        let mut env = Env::new();
        let mut next = Some(0_i64);
        self.enclosed(Punct::RBrace, "enum body", |p| {
            p.comma_list(Punct::RBrace, |p| {
                let (name, name_span) = p.expect_ident("an enumerator name")?;
                let value_expr = if p.eat(Punct::Eq) {
                    Some(p.parse_conditional()?)
                } else {
                    None
                };
                let value = match &value_expr {
                    Some(expr) => consteval::eval(expr, &env),
                    None => next,
                };
                next = value.and_then(|v| v.checked_add(1));
                if let Some(value) = value {
                    env.insert(name.clone(), value);
                }
                Ok(Enumerator {
                    name,
                    value_expr,
                    value,
                    span: Span::new(name_span.start, p.prev_end),
                })
            })
        })
    }

    fn parse_record_body(
        &mut self,
        tag: TagKind,
        name: Option<String>,
        bases: Vec<BaseSpec>,
    ) -> PResult<ItemKind> {
        let access = match (self.language, tag) {
            (Language::C, _) => None,
            (Language::Cpp, TagKind::Class) => Some(Access::Private),
            (Language::Cpp, _) => Some(Access::Public),
        };
        self.classes.push(name.clone().unwrap_or_default());
        let body = self.enclosed(Punct::RBrace, "body", |p| p.parse_members(access));
        self.classes.pop();
        let (members, saw_access) = body?;

        let promote = match tag {
            TagKind::Class => true,
            TagKind::Struct => {
                self.language == Language::Cpp
                    && (saw_access
                        || !bases.is_empty()
                        || members.iter().any(|member| {
                            matches!(
                                member.kind,
                                ItemKind::FunctionDecl(_)
                                    | ItemKind::TemplateDecl { .. }
                                    | ItemKind::UsingDirective { .. }
                            )
                        }))
            }
            TagKind::Union | TagKind::Enum => false,
        };
        Ok(if promote {
            ItemKind::ClassDecl(ClassDecl {
                name,
                bases,
                members: Some(members),
                is_struct: tag == TagKind::Struct,
            })
        } else {
            ItemKind::StructDecl(StructDecl {
                name,
                fields: Some(members),
                is_union: tag == TagKind::Union,
            })
        })
    }

    /// Member list up to the closing brace. Returns whether an access label
    /// was seen.
    fn parse_members(&mut self, mut access: Option<Access>) -> PResult<(Vec<Item>, bool)> {
        let mut members = Vec::new();
        self.hold_directives();
        let mut saw_access = false;
        loop {
            members.extend(self.take_directives());
            if self.at_eof() || self.at(Punct::RBrace) {
                break;
            }
            let before = self.pos;
            let label = match self.kind() {
                TokenKind::Keyword(Keyword::Public) => Some(Access::Public),
                TokenKind::Keyword(Keyword::Private) => Some(Access::Private),
                TokenKind::Keyword(Keyword::Protected) => Some(Access::Protected),
                _ => None,
            };
            if label.is_some() && self.at_nth(1, Punct::Colon) {
                self.bump();
                self.bump();
                access = label;
                saw_access = true;
                continue;
            }
            if self.language == Language::C
                && self.at_nth(1, Punct::Colon)
                && ["public", "private", "protected"]
                    .iter()
                    .any(|word| self.at_word(0, word))
            {
                let token = self.bump();
                self.bump();
                self.report(SyntaxError {
                    span: token.span,
                    expected: "a member declaration".to_string(),
                    found: format!("access specifier '{}'", token.text),
                });
                continue;
            }
            match self.parse_item(Scope::Member(access)) {
                Ok(items) => members.extend(items),
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
        Ok((members, saw_access))
    }

    // ---- declarations ----

    fn parse_declaration(&mut self, scope: Scope) -> PResult<Vec<Item>> {
        let start = self.span().start;
        let mut specs = self.parse_specifiers(scope != Scope::Block)?;
        let mut items: Vec<Item> = specs.defined.take().into_iter().collect();

        if self.at(Punct::Semi) {
            items.extend(specs.forward.take());
            if items.is_empty() {
                return Err(self.error_here("a declarator"));
            }
            self.bump();
            if let Some(last) = items.last_mut() {
                last.span.end = self.prev_end;
            }
            return Ok(items);
        }

        let mut first = items.is_empty();
        let abstract_ok = matches!(scope, Scope::Member(_));
        loop {
            let item_start = if first { start } else { self.span().start };
            first = false;
            let mut declarator = self.parse_declarator(abstract_ok)?;
            let func = if specs.is_typedef {
                None
            } else {
                take_function(&mut declarator)
            };
            if let Some(func) = func {
                let (decl, has_body) = self.parse_function(&specs, declarator, func, scope)?;
                items.push(Item::new(
                    ItemKind::FunctionDecl(decl),
                    Span::new(item_start, self.prev_end),
                ));
                if has_body {
                    return Ok(items);
                }
            } else {
                let kind = self.parse_object(&specs, declarator, scope)?;
                items.push(Item::new(kind, Span::new(item_start, self.prev_end)));
            }
            if !self.eat(Punct::Comma) {
                break;
            }
        }

        if self.eat(Punct::Semi) {
            if let Some(last) = items.last_mut() {
                last.span.end = self.prev_end;
            }
        } else {
            // keep what was parsed; the next item resynchronizes
            match self.error_here("';'") {
                Failure::Syntax(err) => self.report(err),
                internal @ Failure::Internal(_) => return Err(internal),
            }
        }
        Ok(items)
    }

    fn parse_function(
        &mut self,
        specs: &Specifiers,
        declarator: Declarator,
        func: FuncSuffix,
        scope: Scope,
    ) -> PResult<(FunctionDecl, bool)> {
        let (return_type, name) = match specs.ty() {
            Some(base) => {
                let (ty, name) = apply(base, declarator);
                (Some(func.trailing.unwrap_or(ty)), name)
            }
            None => (func.trailing, into_name(declarator)),
        };
        let Some(name) = name else {
            return Err(self.error_here("a function name"));
        };

        let mut qualifiers = specs.qualifiers.clone();
        qualifiers.extend(func.qualifiers);
        if self.at(Punct::Eq) {
            let next = self.nth(1);
            let qualifier = match next.kind {
                TokenKind::IntLit if next.text == "0" => Some(FnQualifier::Pure),
                TokenKind::Keyword(Keyword::Default) => Some(FnQualifier::Default),
                TokenKind::Keyword(Keyword::Delete) => Some(FnQualifier::Delete),
                _ => None,
            };
            self.bump();
            let Some(qualifier) = qualifier else {
                return Err(self.error_here("'0', 'default', or 'delete'"));
            };
            self.bump();
            qualifiers.push(qualifier);
        }

        let initializers = if self.eat(Punct::Colon) {
            self.comma_list(Punct::LBrace, Self::parse_member_init)?
        } else {
            Vec::new()
        };
        let body = if self.at(Punct::LBrace) {
            Some(self.parse_compound()?)
        } else {
            None
        };
        let has_body = body.is_some();
        let decl = FunctionDecl {
            name: name.name,
            scope: name.scope,
            return_type,
            params: func.params,
            variadic: func.variadic,
            body,
            qualifiers,
            storage_class: specs.storage,
            access: scope.access(),
            initializers,
        };
        Ok((decl, has_body))
    }

    fn parse_member_init(&mut self) -> PResult<MemberInit> {
        let start = self.span().start;
        let name = self.parse_qualified_ident("a member name")?;
        if self.at(Punct::Lt) {
            self.parse_template_args()?;
        }
        let args = if self.at(Punct::LBrace) {
            match self.parse_braced_init()?.kind {
                ExprKind::InitList { elements, .. } => elements,
                _ => Vec::new(),
            }
        } else if self.at(Punct::LParen) {
            self.parse_call_args()?
        } else {
            return Err(self.error_here("'(' or '{'"));
        };
        Ok(MemberInit {
            name,
            args,
            span: Span::new(start, self.prev_end),
        })
    }

    /// Variable, field, or typedef from one declarator.
    fn parse_object(
        &mut self,
        specs: &Specifiers,
        declarator: Declarator,
        scope: Scope,
    ) -> PResult<ItemKind> {
        let Some(base) = specs.ty() else {
            return Err(self.error_here("a type"));
        };
        let (ty, name) = apply(base, declarator);
        let name = name.map(|n| n.name);

        if specs.is_typedef {
            let Some(name) = name else {
                return Err(self.error_here("a typedef name"));
            };
            self.types.insert(name.clone());
            return Ok(ItemKind::TypedefDecl {
                name,
                aliased_type: ty,
            });
        }

        if let Scope::Member(access) = scope {
            let bit_width = if self.eat(Punct::Colon) {
                Some(self.parse_conditional()?)
            } else {
                None
            };
            let init = self.parse_initializer(false)?;
            return Ok(ItemKind::FieldDecl(FieldDecl {
                name,
                ty,
                bit_width,
                init,
                access,
            }));
        }

        let Some(name) = name else {
            return Err(self.error_here("a variable name"));
        };
        let init = self.parse_initializer(true)?;
        Ok(ItemKind::VarDecl(VarDecl {
            name,
            ty,
            init,
            storage_class: specs.storage,
        }))
    }

    /// `= expr`, `= {..}`, `{..}`, or a direct-initialization `( args )`.
    fn parse_initializer(&mut self, direct: bool) -> PResult<Option<Expr>> {
        if self.eat(Punct::Eq) {
            return self.parse_init_clause().map(Some);
        }
        if self.at(Punct::LBrace) && self.language == Language::Cpp {
            return self.parse_braced_init().map(Some);
        }
        if direct && self.at(Punct::LParen) {
            let start = self.span().start;
            let elements = self.parse_call_args()?;
            return Ok(Some(Expr::new(
                ExprKind::InitList {
                    elements,
                    braced: false,
                },
                Span::new(start, self.prev_end),
            )));
        }
        Ok(None)
    }

    // ---- declarators ----

    fn parse_declarator(&mut self, abstract_ok: bool) -> PResult<Declarator> {
        self.enter()?;
        let result = self.parse_declarator_inner(abstract_ok);
        self.leave();
        result
    }

    fn parse_declarator_inner(&mut self, abstract_ok: bool) -> PResult<Declarator> {
        let mut declarator = Declarator {
            prefix: self.parse_ptr_ops(),
            ..Declarator::default()
        };

        let nested = self.at(Punct::LParen)
            && matches!(
                self.kind_at(1),
                TokenKind::Punct(Punct::Star | Punct::Amp | Punct::AndAnd)
            );
        if nested {
            let inner = self.enclosed(Punct::RParen, "parenthesis", |p| {
                p.parse_declarator(abstract_ok)
            })?;
            declarator.inner = Some(Box::new(inner));
        } else if matches!(
            self.kind(),
            TokenKind::Ident
                | TokenKind::Punct(Punct::ColonColon | Punct::Tilde)
                | TokenKind::Keyword(Keyword::Operator)
        ) {
            declarator.name = Some(self.parse_decl_name()?);
        } else if !abstract_ok {
            return Err(self.error_here("a declarator"));
        }

        loop {
            if self.at(Punct::LBracket) {
                let size = self.enclosed(Punct::RBracket, "bracket", |p| {
                    if p.at(Punct::RBracket) {
                        Ok(None)
                    } else {
                        p.parse_conditional().map(Some)
                    }
                })?;
                declarator.suffixes.push(Suffix::Array(size));
            } else if self.at(Punct::LParen) && self.looks_like_params() {
                let suffix = self.parse_func_suffix()?;
                declarator.suffixes.push(Suffix::Func(suffix));
            } else {
                break;
            }
        }
        Ok(declarator)
    }

    fn parse_ptr_ops(&mut self) -> Vec<PtrOp> {
        let mut ops = Vec::new();
        loop {
            match self.kind() {
                TokenKind::Punct(Punct::Star) => {
                    self.bump();
                    let mut cv = Cv::default();
                    loop {
                        if self.eat_kw(Keyword::Const) {
                            cv.is_const = true;
                        } else if self.eat_kw(Keyword::Volatile) {
                            cv.is_volatile = true;
                        } else {
                            break;
                        }
                    }
                    ops.push(PtrOp::Pointer(cv));
                }
                TokenKind::Punct(Punct::Amp) => {
                    self.bump();
                    ops.push(PtrOp::Ref { rvalue: false });
                }
                TokenKind::Punct(Punct::AndAnd) => {
                    self.bump();
                    ops.push(PtrOp::Ref { rvalue: true });
                }
                _ => return ops,
            }
        }
    }

    fn parse_decl_name(&mut self) -> PResult<DeclName> {
        let mut scope = Vec::new();
        self.eat(Punct::ColonColon);
        let name = loop {
            if self.eat(Punct::Tilde) {
                break format!("~{}", self.expect_ident("a destructor name")?.0);
            }
            if self.at_kw(Keyword::Operator) {
                break self.parse_operator_name()?;
            }
            let (mut name, _) = self.expect_ident("a declarator name")?;
            if self.at(Punct::Lt) && self.templates.contains(&name) {
                let args = self.parse_template_args()?;
                name = Type::Template { base: name, args }.to_string();
            }
            if self.at(Punct::ColonColon) {
                self.bump();
                scope.push(name);
            } else {
                break name;
            }
        };
        Ok(DeclName { scope, name })
    }

    fn parse_operator_name(&mut self) -> PResult<String> {
        self.bump();
        let symbol = match self.kind() {
            TokenKind::Punct(Punct::LParen) if self.at_nth(1, Punct::RParen) => {
                self.bump();
                self.bump();
                "()".to_string()
            }
            TokenKind::Punct(Punct::LBracket) if self.at_nth(1, Punct::RBracket) => {
                self.bump();
                self.bump();
                "[]".to_string()
            }
            TokenKind::Keyword(kw @ (Keyword::New | Keyword::Delete)) => {
                self.bump();
                let mut symbol = format!(" {}", kw.as_str());
                if self.at(Punct::LBracket) && self.at_nth(1, Punct::RBracket) {
                    self.bump();
                    self.bump();
                    symbol.push_str("[]");
                }
                symbol
            }
            TokenKind::Punct(punct) => {
                self.bump();
                punct.as_str().to_string()
            }
            _ => format!(" {}", self.parse_simple_type()?),
        };
        Ok(format!("operator{symbol}"))
    }

    /// Whether `(` at the current token opens a parameter list rather than
    /// a direct initializer.
    fn looks_like_params(&mut self) -> bool {
        if self.language == Language::C {
            return true;
        }
        match self.kind_at(1) {
            TokenKind::Punct(Punct::RParen | Punct::Ellipsis) => true,
            TokenKind::Ident => {
                self.starts_type(1)
                    || self.kind_at(2) == TokenKind::Ident
                    || (matches!(
                        self.kind_at(2),
                        TokenKind::Punct(Punct::Star | Punct::Amp | Punct::AndAnd)
                    ) && self.kind_at(3) == TokenKind::Ident
                        && matches!(
                            self.kind_at(4),
                            TokenKind::Punct(Punct::Comma | Punct::RParen | Punct::Eq)
                        ))
            }
            _ => self.starts_type(1),
        }
    }

    fn parse_func_suffix(&mut self) -> PResult<FuncSuffix> {
        let (params, variadic) =
            self.enclosed(Punct::RParen, "parameter list", Self::parse_params)?;
        let mut qualifiers = Vec::new();
        let mut trailing = None;
        loop {
            if self.eat_kw(Keyword::Const) {
                qualifiers.push(FnQualifier::Const);
            } else if self.eat_kw(Keyword::Volatile) {
                // volatile member functions are not recorded
                continue;
            } else if self.eat_kw(Keyword::Override) {
                qualifiers.push(FnQualifier::Override);
            } else if self.language == Language::Cpp && self.at_word(0, "final") {
                self.bump();
                qualifiers.push(FnQualifier::Final);
            } else if self.language == Language::Cpp
                && (self.at_word(0, "noexcept") || self.at_word(0, "throw"))
            {
                self.bump();
                if self.at(Punct::LParen) {
                    self.enclosed(Punct::RParen, "parenthesis", |p| {
                        p.skip_until(Punct::RParen);
                        Ok(())
                    })?;
                }
            } else if self.language == Language::Cpp && self.eat(Punct::Arrow) {
                trailing = Some(self.parse_type_id()?);
            } else {
                break;
            }
        }
        Ok(FuncSuffix {
            params,
            variadic,
            qualifiers,
            trailing,
        })
    }

    /// Skip balanced tokens up to an unnested `close`.
    fn skip_until(&mut self, close: Punct) {
        let mut depth = 0usize;
        while !self.at_eof() {
            match self.kind() {
                TokenKind::Punct(Punct::LParen | Punct::LBracket | Punct::LBrace) => depth += 1,
                TokenKind::Punct(p @ (Punct::RParen | Punct::RBracket | Punct::RBrace)) => {
                    if depth == 0 && p == close {
                        return;
                    }
                    depth = depth.saturating_sub(1);
                }
                _ => {}
            }
            self.bump();
        }
    }

    fn parse_params(&mut self) -> PResult<(Vec<Param>, bool)> {
        if self.at_kw(Keyword::Void) && self.at_nth(1, Punct::RParen) {
            self.bump();
            return Ok((Vec::new(), false));
        }
        let mut params = Vec::new();
        let mut variadic = false;
        while !self.at(Punct::RParen) && !self.at_eof() {
            if self.eat(Punct::Ellipsis) {
                variadic = true;
                break;
            }
            params.push(self.parse_param()?);
            if !self.eat(Punct::Comma) {
                break;
            }
        }
        Ok((params, variadic))
    }

    fn parse_param(&mut self) -> PResult<Param> {
        let start = self.span().start;
        let specs = self.parse_specifiers(false)?;
        let Some(base) = specs.ty() else {
            return Err(self.error_here("a parameter type"));
        };
        let declarator = self.parse_declarator(true)?;
        let (ty, name) = apply(base, declarator);
        let default = if self.eat(Punct::Eq) {
            Some(self.parse_init_clause()?)
        } else {
            None
        };
        Ok(Param {
            name: name.map(|n| n.name),
            ty,
            default,
            span: Span::new(start, self.prev_end),
        })
    }

    // ---- type ids ----

    /// A type with an abstract declarator, as in casts and `sizeof`.
    pub(super) fn parse_type_id(&mut self) -> PResult<Type> {
        let specs = self.parse_specifiers(false)?;
        let Some(base) = specs.ty() else {
            return Err(self.error_here("a type"));
        };
        let declarator = self.parse_declarator(true)?;
        Ok(apply(base, declarator).0)
    }

    /// Specifiers and pointer operators only, as after `new` or in a
    /// conversion operator name.
    pub(super) fn parse_simple_type(&mut self) -> PResult<Type> {
        let specs = self.parse_specifiers(false)?;
        let Some(base) = specs.ty() else {
            return Err(self.error_here("a type"));
        };
        let declarator = Declarator {
            prefix: self.parse_ptr_ops(),
            ..Declarator::default()
        };
        Ok(apply(base, declarator).0)
    }

    // ---- lookahead ----

    /// Scan a possibly qualified name at offset `n`. Returns the offset just
    /// past it and whether it names a known type.
    fn scan_name(&mut self, n: usize) -> Option<(usize, bool)> {
        let mut i = n;
        if self.at_nth(i, Punct::ColonColon) {
            i += 1;
        }
        let mut scope: Option<String> = None;
        loop {
            let token = self.nth(i);
            if token.kind != TokenKind::Ident {
                return None;
            }
            let last = token.text.clone();
            i += 1;
            if self.at_nth(i, Punct::Lt) && self.templates.contains(&last) {
                i = self.skip_angles(i)?;
            }
            if self.at_nth(i, Punct::ColonColon) && self.kind_at(i + 1) == TokenKind::Ident {
                scope = Some(last);
                i += 1;
            } else {
                let known =
                    self.is_type_name(scope.as_deref(), &last) || self.templates.contains(&last);
                return Some((i, known));
            }
        }
    }

    /// Offset just past the `>` matching the `<` at offset `n`.
    fn skip_angles(&mut self, n: usize) -> Option<usize> {
        let mut depth = 0usize;
        let mut i = n;
        loop {
            match self.kind_at(i) {
                TokenKind::Punct(Punct::Lt) => depth += 1,
                TokenKind::Punct(Punct::Gt) => depth = depth.saturating_sub(1),
                TokenKind::Punct(Punct::Shr) => depth = depth.saturating_sub(2),
                TokenKind::Punct(Punct::Semi | Punct::LBrace | Punct::RBrace) | TokenKind::Eof => {
                    return None;
                }
                _ => {}
            }
            i += 1;
            if depth == 0 {
                return Some(i);
            }
        }
    }

    /// Whether the token at offset `n` begins a type.
    pub(super) fn starts_type(&mut self, n: usize) -> bool {
        match self.kind_at(n) {
            TokenKind::Keyword(kw) => {
                kw.is_builtin_type()
                    || matches!(
                        kw,
                        Keyword::Const
                            | Keyword::Volatile
                            | Keyword::Struct
                            | Keyword::Union
                            | Keyword::Enum
                            | Keyword::Class
                            | Keyword::Typename
                    )
            }
            TokenKind::Ident | TokenKind::Punct(Punct::ColonColon) => {
                self.scan_name(n).is_some_and(|(_, known)| known)
            }
            _ => false,
        }
    }

    /// Whether a statement starting with a name is a declaration: the name
    /// is followed by another name, or it is a known type followed by
    /// pointer operators and a name.
    pub(super) fn ident_starts_declaration(&mut self) -> bool {
        let Some((end, known)) = self.scan_name(0) else {
            return false;
        };
        match self.kind_at(end) {
            TokenKind::Ident => true,
            TokenKind::Keyword(Keyword::Const | Keyword::Volatile) => known,
            TokenKind::Punct(Punct::Star | Punct::Amp | Punct::AndAnd) if known => {
                let mut i = end;
                while matches!(
                    self.kind_at(i),
                    TokenKind::Punct(Punct::Star | Punct::Amp | Punct::AndAnd)
                        | TokenKind::Keyword(Keyword::Const | Keyword::Volatile)
                ) {
                    i += 1;
                }
                self.kind_at(i) == TokenKind::Ident
            }
            TokenKind::Punct(Punct::LParen) => known && self.at_nth(end + 1, Punct::Star),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::TranslationUnit;
    use crate::config::{Mode, ParseOptions};
    use crate::diagnostics::Diagnostics;
    use crate::parser::parse_unit;
    use crate::source::SourceBuffer;

    fn parse(input: &str, mode: Mode) -> (TranslationUnit, Diagnostics) {
        let source = SourceBuffer::from(input);
        parse_unit(&source, &ParseOptions::new().mode(mode)).expect("parse should not abort")
    }

    fn clean(input: &str, mode: Mode) -> Vec<Item> {
        let (unit, diags) = parse(input, mode);
        assert!(diags.is_empty(), "{diags:?}");
        unit.items
    }

    fn var_type(item: &Item) -> String {
        match &item.kind {
            ItemKind::VarDecl(var) => var.ty.to_string(),
            ItemKind::TypedefDecl { aliased_type, .. } => aliased_type.to_string(),
            other => panic!("not a variable: {other:?}"),
        }
    }

    #[test]
    fn declarator_shapes() {
        let items = clean(
            "char **argv; int *a[5]; int m[2][3]; void (*f)(char *); typedef void (*fnp)(int, ...);",
            Mode::C,
        );
        assert_eq!(var_type(&items[0]), "char * *");
        assert_eq!(var_type(&items[1]), "int * [N]");
        assert_eq!(var_type(&items[2]), "int [N] [N]");
        assert_eq!(var_type(&items[3]), "void (char *) *");
        assert_eq!(var_type(&items[4]), "void (int, ...) *");
    }

    #[test]
    fn multiple_declarators_split_spans() {
        let items = clean("int i1 = 1, i2 = 2;", Mode::C);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].span, Span::new(0, 10));
        assert_eq!(items[1].span, Span::new(12, 19));
    }

    #[test]
    fn function_prototypes_and_definitions() {
        let items = clean("void f(void); int g(int a, char *b, ...) { return a; }", Mode::C);
        let ItemKind::FunctionDecl(f) = &items[0].kind else {
            panic!("not a function");
        };
        assert!(f.params.is_empty() && f.body.is_none());
        let ItemKind::FunctionDecl(g) = &items[1].kind else {
            panic!("not a function");
        };
        assert_eq!(g.params.len(), 2);
        assert!(g.variadic);
        assert_eq!(g.params[1].ty.to_string(), "char *");
        assert!(g.body.is_some());
    }

    #[test]
    fn typedef_struct_and_enum_values() {
        let items = clean(
            "typedef struct Node { int val; struct Node *next; } Node;\n\
             enum days { SUN = 1, MON, WED = 99, THU, X = Y, Z };",
            Mode::C,
        );
        assert_eq!(items[0].kind.tag(), "StructDecl");
        assert_eq!(items[1].kind.tag(), "TypedefDecl");
        assert!(items[0].span.end <= items[1].span.start);
        let ItemKind::EnumDecl(e) = &items[2].kind else {
            panic!("not an enum");
        };
        let values: Vec<_> = e.entries.iter().flatten().map(|x| x.value).collect();
        assert_eq!(
            values,
            [Some(1), Some(2), Some(99), Some(100), None, None]
        );
    }

    #[test]
    fn anonymous_struct_variable() {
        let items = clean("struct { int x; int y; } point;", Mode::C);
        assert_eq!(items.len(), 2);
        let ItemKind::VarDecl(var) = &items[1].kind else {
            panic!("not a variable");
        };
        assert!(matches!(var.ty, Type::Anonymous { tag: TagKind::Struct, decl } if decl == items[0].span));
    }

    #[test]
    fn class_members_and_access() {
        let items = clean(
            "class Dog : public Animal {\n  std::string name;\npublic:\n  Dog();\n  virtual ~Dog();\n  void bark() const { }\n  int weight = 0;\n};",
            Mode::Cpp,
        );
        let ItemKind::ClassDecl(class) = &items[0].kind else {
            panic!("not a class");
        };
        assert_eq!(class.bases.len(), 1);
        assert_eq!(class.bases[0].access, Some(Access::Public));
        let members = class.members.as_ref().expect("members");
        let ItemKind::FieldDecl(name) = &members[0].kind else {
            panic!("not a field");
        };
        assert_eq!(name.access, Some(Access::Private));
        let ItemKind::FunctionDecl(ctor) = &members[1].kind else {
            panic!("not a constructor");
        };
        assert!(ctor.return_type.is_none());
        assert_eq!(ctor.access, Some(Access::Public));
        let ItemKind::FunctionDecl(dtor) = &members[2].kind else {
            panic!("not a destructor");
        };
        assert_eq!(dtor.name, "~Dog");
        assert!(dtor.has(FnQualifier::Virtual));
        let ItemKind::FunctionDecl(bark) = &members[3].kind else {
            panic!("not a method");
        };
        assert!(bark.has(FnQualifier::Const) && bark.body.is_some());
    }

    #[test]
    fn out_of_class_definitions() {
        let items = clean(
            "class P { public: P(double a) : x(a) {} P operator+(const P &r) const; double x; };\n\
             P::P(double a) : x(a) {}\n\
             P P::operator+(const P &r) const { return P(x + r.x); }\n\
             P::~P() {}",
            Mode::Cpp,
        );
        let names: Vec<_> = items
            .iter()
            .filter_map(|item| match &item.kind {
                ItemKind::FunctionDecl(f) => Some(f.qualified_name()),
                _ => None,
            })
            .collect();
        assert_eq!(names, ["P::P", "P::operator+", "P::~P"]);
        let ItemKind::FunctionDecl(ctor) = &items[1].kind else {
            panic!("not a constructor");
        };
        assert_eq!(ctor.initializers.len(), 1);
        assert_eq!(ctor.initializers[0].name, "x");
    }

    #[test]
    fn struct_promotion() {
        let items = clean(
            "struct A { int x; }; struct B { void f(); }; union U { int a; float b; };",
            Mode::Cpp,
        );
        assert_eq!(items[0].kind.tag(), "StructDecl");
        assert!(matches!(&items[1].kind, ItemKind::ClassDecl(c) if c.is_struct));
        assert!(matches!(&items[2].kind, ItemKind::StructDecl(s) if s.is_union));
    }

    #[test]
    fn templates_namespaces_using() {
        let items = clean(
            "namespace a { template <class T, int N = 3> class Box { T items[N]; }; }\n\
             using namespace std;\nusing std::string;\nusing Int = int;\n\
             a::Box<Box<int>> nested;\nextern \"C\" { int c_fn(void); }",
            Mode::Cpp,
        );
        let ItemKind::NamespaceDecl { items: inner, .. } = &items[0].kind else {
            panic!("not a namespace");
        };
        let ItemKind::TemplateDecl { params, inner } = &inner[0].kind else {
            panic!("not a template");
        };
        assert_eq!(params.len(), 2);
        assert_eq!(inner.name(), Some("Box"));
        assert!(matches!(
            items[1].kind,
            ItemKind::UsingDirective {
                form: UsingForm::Namespace,
                ..
            }
        ));
        assert_eq!(items[3].kind.tag(), "TypedefDecl");
        assert_eq!(var_type(&items[4]), "a::Box<Box<int>>");
        assert!(matches!(&items[5].kind, ItemKind::LinkageSpec { abi, .. } if abi == "C"));
    }

    #[test]
    fn direct_initialization_is_not_a_function() {
        let items = clean("int x(5); Foo y(a, b); Foo z(int n);", Mode::Cpp);
        let ItemKind::VarDecl(x) = &items[0].kind else {
            panic!("not a variable");
        };
        assert!(matches!(
            x.init.as_ref().map(|e| &e.kind),
            Some(ExprKind::InitList { braced: false, .. })
        ));
        assert_eq!(items[1].kind.tag(), "VarDecl");
        assert_eq!(items[2].kind.tag(), "FunctionDecl");
    }

    #[test]
    fn bit_fields() {
        let items = clean("struct F { unsigned a : 3; unsigned : 5; };", Mode::C);
        let ItemKind::StructDecl(s) = &items[0].kind else {
            panic!("not a struct");
        };
        let fields = s.fields.as_ref().expect("fields");
        assert!(matches!(&fields[0].kind, ItemKind::FieldDecl(f) if f.bit_width.is_some()));
        assert!(matches!(&fields[1].kind, ItemKind::FieldDecl(f) if f.name.is_none()));
    }

    #[test]
    fn access_label_in_c_is_an_error() {
        let (unit, diags) = parse("struct S { public: int x; };", Mode::C);
        assert_eq!(diags.len(), 1);
        assert!(diags.iter().next().is_some_and(|d| d.message.contains("access specifier")));
        let ItemKind::StructDecl(s) = &unit.items[0].kind else {
            panic!("not a struct");
        };
        assert_eq!(s.fields.as_ref().map(Vec::len), Some(1));
    }

    #[test]
    fn missing_semicolon_keeps_items() {
        let (unit, diags) = parse("int x = 1\nint y;", Mode::C);
        assert_eq!(diags.len(), 1, "{diags:?}");
        assert_eq!(unit.items.len(), 2);
    }
}
