//! Statements and blocks.

use crate::ast::{Expr, Stmt, StmtKind};
use crate::config::Language;
use crate::token::{Keyword, Punct, Span, TokenKind};

use super::{Failure, PResult, Parser, Scope};

impl Parser<'_> {
    pub(super) fn parse_compound(&mut self) -> PResult<Stmt> {
        let start = self.span().start;
        let stmts = self.enclosed(Punct::RBrace, "block", Self::parse_block_items)?;
        Ok(Stmt::new(
            StmtKind::Compound { stmts },
            Span::new(start, self.prev_end),
        ))
    }

    fn parse_block_items(&mut self) -> PResult<Vec<Stmt>> {
        let mut stmts = Vec::new();
        self.hold_directives();
        loop {
            stmts.extend(self.take_directive_stmts());
            if self.at_eof() || self.at(Punct::RBrace) {
                break;
            }
            let before = self.pos;
            match self.parse_stmt() {
                Ok(stmt) => stmts.push(stmt),
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
        Ok(stmts)
    }

    fn parse_stmt(&mut self) -> PResult<Stmt> {
        self.enter()?;
        let start = self.span().start;
        let mark = self.held.len();
        let result = self.parse_stmt_inner();
        self.leave();
        match result {
            Ok(mut stmt) => {
                stmt.directives = self.inner_directives(start, mark);
                Ok(stmt)
            }
            Err(err) => {
                self.release_held(mark);
                Err(err)
            }
        }
    }

    fn parse_stmt_inner(&mut self) -> PResult<Stmt> {
        let start = self.span().start;
        let kind = match self.kind() {
            TokenKind::Punct(Punct::LBrace) => return self.parse_compound(),
            TokenKind::Punct(Punct::Semi) => {
                self.bump();
                StmtKind::Empty
            }
            TokenKind::Keyword(Keyword::If) => {
                self.bump();
                let cond = self.parse_condition()?;
                let then_branch = Box::new(self.parse_stmt()?);
                let else_branch = if self.eat_kw(Keyword::Else) {
                    Some(Box::new(self.parse_stmt()?))
                } else {
                    None
                };
                StmtKind::If {
                    cond,
                    then_branch,
                    else_branch,
                }
            }
            TokenKind::Keyword(Keyword::While) => {
                self.bump();
                let cond = self.parse_condition()?;
                let body = Box::new(self.parse_stmt()?);
                StmtKind::While { cond, body }
            }
            TokenKind::Keyword(Keyword::Do) => {
                self.bump();
                let body = Box::new(self.parse_stmt()?);
                if !self.eat_kw(Keyword::While) {
                    return Err(self.error_here("'while'"));
                }
                let cond = self.parse_condition()?;
                self.expect(Punct::Semi)?;
                StmtKind::DoWhile { body, cond }
            }
            TokenKind::Keyword(Keyword::For) => self.parse_for()?,
            TokenKind::Keyword(Keyword::Switch) => {
                self.bump();
                let cond = self.parse_condition()?;
                let body = Box::new(self.parse_stmt()?);
                StmtKind::Switch { cond, body }
            }
            TokenKind::Keyword(Keyword::Case) => {
                self.bump();
                let value = self.parse_conditional()?;
                self.expect(Punct::Colon)?;
                StmtKind::Case { value: Some(value) }
            }
            TokenKind::Keyword(Keyword::Default) if self.at_nth(1, Punct::Colon) => {
                self.bump();
                self.bump();
                StmtKind::Case { value: None }
            }
            TokenKind::Keyword(Keyword::Break) => {
                self.bump();
                self.expect(Punct::Semi)?;
                StmtKind::Break
            }
            TokenKind::Keyword(Keyword::Continue) => {
                self.bump();
                self.expect(Punct::Semi)?;
                StmtKind::Continue
            }
            TokenKind::Keyword(Keyword::Return) => {
                self.bump();
                let value = match self.kind() {
                    TokenKind::Punct(Punct::Semi) => None,
                    TokenKind::Punct(Punct::LBrace) => Some(self.parse_braced_init()?),
                    _ => Some(self.parse_expr()?),
                };
                self.expect(Punct::Semi)?;
                StmtKind::Return { value }
            }
            TokenKind::Keyword(Keyword::Goto) => {
                self.bump();
                let (label, _) = self.expect_ident("a label")?;
                self.expect(Punct::Semi)?;
                StmtKind::Goto { label }
            }
            TokenKind::Ident if self.at_nth(1, Punct::Colon) => {
                let name = self.bump().text;
                self.bump();
                StmtKind::Label { name }
            }
            _ if self.starts_declaration() => StmtKind::DeclStmt {
                decls: self.parse_item(Scope::Block)?,
            },
            _ => {
                let expr = self.parse_expr()?;
                self.expect(Punct::Semi)?;
                StmtKind::Expression { expr }
            }
        };
        Ok(Stmt::new(kind, Span::new(start, self.prev_end)))
    }

    /// `( expr )` after `if`, `while`, `switch`.
    fn parse_condition(&mut self) -> PResult<Expr> {
        if !self.at(Punct::LParen) {
            return Err(self.error_here("'('"));
        }
        self.enclosed(Punct::RParen, "parenthesis", Self::parse_expr)
    }

    fn parse_for(&mut self) -> PResult<StmtKind> {
        self.bump();
        if !self.at(Punct::LParen) {
            return Err(self.error_here("'('"));
        }
        let (init, cond, step) = self.enclosed(Punct::RParen, "parenthesis", |p| {
            let init_start = p.span().start;
            let init = if p.eat(Punct::Semi) {
                None
            } else if p.starts_declaration() {
                let decls = p.parse_item(Scope::Block)?;
                Some(Box::new(Stmt::new(
                    StmtKind::DeclStmt { decls },
                    Span::new(init_start, p.prev_end),
                )))
            } else {
                let expr = p.parse_expr()?;
                p.expect(Punct::Semi)?;
                Some(Box::new(Stmt::new(
                    StmtKind::Expression { expr },
                    Span::new(init_start, p.prev_end),
                )))
            };
            let cond = if p.at(Punct::Semi) {
                None
            } else {
                Some(p.parse_expr()?)
            };
            p.expect(Punct::Semi)?;
            let step = if p.at(Punct::RParen) {
                None
            } else {
                Some(p.parse_expr()?)
            };
            Ok((init, cond, step))
        })?;
        let body = Box::new(self.parse_stmt()?);
        Ok(StmtKind::For {
            init,
            cond,
            step,
            body,
        })
    }

    fn starts_declaration(&mut self) -> bool {
        match self.kind() {
            TokenKind::Keyword(kw) => {
                kw.is_builtin_type()
                    || matches!(
                        kw,
                        Keyword::Const
                            | Keyword::Volatile
                            | Keyword::Static
                            | Keyword::Extern
                            | Keyword::Register
                            | Keyword::Inline
                            | Keyword::Typedef
                            | Keyword::Struct
                            | Keyword::Union
                            | Keyword::Enum
                            | Keyword::Class
                            | Keyword::Using
                            | Keyword::Template
                            | Keyword::Typename
                            | Keyword::Namespace
                    )
            }
            TokenKind::Ident
                if self.language == Language::Cpp
                    && (self.at_word(0, "constexpr") || self.at_word(0, "thread_local")) =>
            {
                true
            }
            TokenKind::Ident | TokenKind::Punct(Punct::ColonColon) => {
                self.ident_starts_declaration()
            }
            _ => false,
        }
    }
}
