//! Read-only traversal of the syntax tree.
//!
//! Override the `visit_*` hooks you care about and call the matching
//! `walk_*` function to keep descending. Children are visited in source
//! order. Directives attached to an item or statement come after its
//! other children, through [`Visitor::visit_inner_directive`].

use crate::ast::{
    BaseSpec, Enumerator, Expr, ExprKind, Item, ItemKind, MemberInit, Param, SizeofOperand, Stmt,
    StmtKind, TemplateArg, TemplateParam, TemplateParamKind, TranslationUnit, Type,
};

pub trait Visitor<'ast> {
    fn visit_item(&mut self, item: &'ast Item) {
        walk_item(self, item);
    }

    fn visit_stmt(&mut self, stmt: &'ast Stmt) {
        walk_stmt(self, stmt);
    }

    fn visit_expr(&mut self, expr: &'ast Expr) {
        walk_expr(self, expr);
    }

    fn visit_type(&mut self, ty: &'ast Type) {
        walk_type(self, ty);
    }

    fn visit_param(&mut self, param: &'ast Param) {
        walk_param(self, param);
    }

    fn visit_enumerator(&mut self, entry: &'ast Enumerator) {
        walk_enumerator(self, entry);
    }

    fn visit_base(&mut self, base: &'ast BaseSpec) {
        self.visit_type(&base.ty);
    }

    fn visit_member_init(&mut self, init: &'ast MemberInit) {
        for arg in &init.args {
            self.visit_expr(arg);
        }
    }

    fn visit_template_param(&mut self, param: &'ast TemplateParam) {
        walk_template_param(self, param);
    }

    fn visit_inner_directive(&mut self, directive: &'ast Item) {
        self.visit_item(directive);
    }
}

pub fn walk_unit<'ast, V: Visitor<'ast> + ?Sized>(v: &mut V, unit: &'ast TranslationUnit) {
    for item in &unit.items {
        v.visit_item(item);
    }
}

pub fn walk_item<'ast, V: Visitor<'ast> + ?Sized>(v: &mut V, item: &'ast Item) {
    match &item.kind {
        ItemKind::IncludeDirective { .. }
        | ItemKind::DefineDirective { .. }
        | ItemKind::ConditionalDirective { .. }
        | ItemKind::OtherDirective { .. }
        | ItemKind::UsingDirective { .. } => {}
        ItemKind::EnumDecl(decl) => {
            if let Some(ty) = &decl.underlying {
                v.visit_type(ty);
            }
            for entry in decl.entries.iter().flatten() {
                v.visit_enumerator(entry);
            }
        }
        ItemKind::StructDecl(decl) => {
            for field in decl.fields.iter().flatten() {
                v.visit_item(field);
            }
        }
        ItemKind::ClassDecl(decl) => {
            for base in &decl.bases {
                v.visit_base(base);
            }
            for member in decl.members.iter().flatten() {
                v.visit_item(member);
            }
        }
        ItemKind::TypedefDecl { aliased_type, .. } => v.visit_type(aliased_type),
        ItemKind::FunctionDecl(decl) => {
            if let Some(ty) = &decl.return_type {
                v.visit_type(ty);
            }
            for param in &decl.params {
                v.visit_param(param);
            }
            for init in &decl.initializers {
                v.visit_member_init(init);
            }
            if let Some(body) = &decl.body {
                v.visit_stmt(body);
            }
        }
        ItemKind::VarDecl(decl) => {
            v.visit_type(&decl.ty);
            if let Some(init) = &decl.init {
                v.visit_expr(init);
            }
        }
        ItemKind::FieldDecl(decl) => {
            v.visit_type(&decl.ty);
            if let Some(width) = &decl.bit_width {
                v.visit_expr(width);
            }
            if let Some(init) = &decl.init {
                v.visit_expr(init);
            }
        }
        ItemKind::NamespaceDecl { items, .. } | ItemKind::LinkageSpec { items, .. } => {
            for item in items {
                v.visit_item(item);
            }
        }
        ItemKind::TemplateDecl { params, inner } => {
            for param in params {
                v.visit_template_param(param);
            }
            v.visit_item(inner);
        }
    }
    for directive in &item.directives {
        v.visit_inner_directive(directive);
    }
}

pub fn walk_param<'ast, V: Visitor<'ast> + ?Sized>(v: &mut V, param: &'ast Param) {
    v.visit_type(&param.ty);
    if let Some(default) = &param.default {
        v.visit_expr(default);
    }
}

pub fn walk_enumerator<'ast, V: Visitor<'ast> + ?Sized>(v: &mut V, entry: &'ast Enumerator) {
    if let Some(expr) = &entry.value_expr {
        v.visit_expr(expr);
    }
}

pub fn walk_template_param<'ast, V: Visitor<'ast> + ?Sized>(
    v: &mut V,
    param: &'ast TemplateParam,
) {
    match &param.kind {
        TemplateParamKind::TypeParam { default, .. } => {
            if let Some(ty) = default {
                v.visit_type(ty);
            }
        }
        TemplateParamKind::ValueParam { ty, default, .. } => {
            v.visit_type(ty);
            if let Some(expr) = default {
                v.visit_expr(expr);
            }
        }
    }
}

/// Types carry no spans, but array sizes and template arguments hold
/// expressions.
pub fn walk_type<'ast, V: Visitor<'ast> + ?Sized>(v: &mut V, ty: &'ast Type) {
    match ty {
        Type::Named { .. } | Type::Anonymous { .. } => {}
        Type::Pointer { inner, .. }
        | Type::Reference { inner, .. }
        | Type::Qualified { inner, .. }
        | Type::Nested { inner, .. } => v.visit_type(inner),
        Type::Array { inner, size } => {
            v.visit_type(inner);
            if let Some(size) = size {
                v.visit_expr(size);
            }
        }
        Type::Function { ret, params, .. } => {
            v.visit_type(ret);
            for param in params {
                v.visit_type(param);
            }
        }
        Type::Template { args, .. } => {
            for arg in args {
                match arg {
                    TemplateArg::Type(ty) => v.visit_type(ty),
                    TemplateArg::Expr(expr) => v.visit_expr(expr),
                }
            }
        }
    }
}

pub fn walk_stmt<'ast, V: Visitor<'ast> + ?Sized>(v: &mut V, stmt: &'ast Stmt) {
    match &stmt.kind {
        StmtKind::Compound { stmts } => {
            for stmt in stmts {
                v.visit_stmt(stmt);
            }
        }
        StmtKind::Expression { expr } => v.visit_expr(expr),
        StmtKind::Return { value } | StmtKind::Case { value } => {
            if let Some(expr) = value {
                v.visit_expr(expr);
            }
        }
        StmtKind::If {
            cond,
            then_branch,
            else_branch,
        } => {
            v.visit_expr(cond);
            v.visit_stmt(then_branch);
            if let Some(stmt) = else_branch {
                v.visit_stmt(stmt);
            }
        }
        StmtKind::For {
            init,
            cond,
            step,
            body,
        } => {
            if let Some(init) = init {
                v.visit_stmt(init);
            }
            if let Some(cond) = cond {
                v.visit_expr(cond);
            }
            if let Some(step) = step {
                v.visit_expr(step);
            }
            v.visit_stmt(body);
        }
        StmtKind::While { cond, body } | StmtKind::Switch { cond, body } => {
            v.visit_expr(cond);
            v.visit_stmt(body);
        }
        StmtKind::DoWhile { body, cond } => {
            v.visit_stmt(body);
            v.visit_expr(cond);
        }
        StmtKind::DeclStmt { decls } => {
            for decl in decls {
                v.visit_item(decl);
            }
        }
        StmtKind::Directive { directive } => v.visit_item(directive),
        StmtKind::Break
        | StmtKind::Continue
        | StmtKind::Goto { .. }
        | StmtKind::Label { .. }
        | StmtKind::Empty => {}
    }
    for directive in &stmt.directives {
        v.visit_inner_directive(directive);
    }
}

pub fn walk_expr<'ast, V: Visitor<'ast> + ?Sized>(v: &mut V, expr: &'ast Expr) {
    match &expr.kind {
        ExprKind::IntLit { .. }
        | ExprKind::FloatLit { .. }
        | ExprKind::StringLit { .. }
        | ExprKind::CharLit { .. }
        | ExprKind::BoolLit { .. }
        | ExprKind::Nullptr
        | ExprKind::This
        | ExprKind::Ident { .. } => {}
        ExprKind::Unary { arg, .. } | ExprKind::Delete { arg, .. } => v.visit_expr(arg),
        ExprKind::Binary { lhs, rhs, .. } | ExprKind::Assign { lhs, rhs, .. } => {
            v.visit_expr(lhs);
            v.visit_expr(rhs);
        }
        ExprKind::Ternary {
            cond,
            then_expr,
            else_expr,
        } => {
            v.visit_expr(cond);
            v.visit_expr(then_expr);
            v.visit_expr(else_expr);
        }
        ExprKind::Call { callee, args } => {
            v.visit_expr(callee);
            for arg in args {
                v.visit_expr(arg);
            }
        }
        ExprKind::Index { base, index } => {
            v.visit_expr(base);
            v.visit_expr(index);
        }
        ExprKind::Member { base, .. } => v.visit_expr(base),
        ExprKind::Cast { ty, expr } => {
            v.visit_type(ty);
            v.visit_expr(expr);
        }
        ExprKind::Sizeof { operand } => match operand {
            SizeofOperand::Type(ty) => v.visit_type(ty),
            SizeofOperand::Expr(expr) => v.visit_expr(expr),
        },
        ExprKind::Paren { expr } => v.visit_expr(expr),
        ExprKind::InitList { elements, .. } => {
            for element in elements {
                v.visit_expr(element);
            }
        }
        ExprKind::New {
            ty,
            args,
            array_size,
        } => {
            v.visit_type(ty);
            if let Some(size) = array_size {
                v.visit_expr(size);
            }
            for arg in args.iter().flatten() {
                v.visit_expr(arg);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::Span;

    #[derive(Default)]
    struct Counter {
        items: usize,
        exprs: usize,
    }

    impl<'ast> Visitor<'ast> for Counter {
        fn visit_item(&mut self, item: &'ast Item) {
            self.items += 1;
            walk_item(self, item);
        }

        fn visit_expr(&mut self, expr: &'ast Expr) {
            self.exprs += 1;
            walk_expr(self, expr);
        }
    }

    #[test]
    fn counts_nested_nodes() {
        let value = Expr::new(
            ExprKind::Paren {
                expr: Box::new(Expr::new(ExprKind::BoolLit { value: true }, Span::new(9, 13))),
            },
            Span::new(8, 14),
        );
        let var = Item::new(
            ItemKind::VarDecl(crate::ast::VarDecl {
                name: "b".to_string(),
                ty: Type::named("bool"),
                init: Some(value),
                storage_class: crate::ast::StorageClass::Auto,
            }),
            Span::new(0, 15),
        );
        let ns = Item::new(
            ItemKind::NamespaceDecl {
                name: Some("n".to_string()),
                items: vec![var],
            },
            Span::new(0, 20),
        );
        let mut counter = Counter::default();
        counter.visit_item(&ns);
        assert_eq!(counter.items, 2);
        assert_eq!(counter.exprs, 2);
    }
}
