//! Expressions: precedence climbing over [`BinaryOp::precedence`].

use crate::ast::{AssignOp, BinaryOp, Expr, ExprKind, SizeofOperand, Type, UnaryOp};
use crate::lexer::{float_value, int_value, unescape};
use crate::token::{Keyword, Punct, Span, TokenKind};

use super::{PResult, Parser};

const CAST_NAMES: &[&str] = &["static_cast", "dynamic_cast", "reinterpret_cast", "const_cast"];

impl Parser<'_> {
    /// Full expression, including the comma operator.
    pub(super) fn parse_expr(&mut self) -> PResult<Expr> {
        let mut expr = self.parse_assign()?;
        while self.eat(Punct::Comma) {
            let rhs = self.parse_assign()?;
            expr = binary(BinaryOp::Comma, expr, rhs);
        }
        Ok(expr)
    }

    /// Assignment expression; the right-hand side may be a braced list.
    pub(super) fn parse_assign(&mut self) -> PResult<Expr> {
        self.enter()?;
        let result = self.parse_assign_inner();
        self.leave();
        result
    }

    fn parse_assign_inner(&mut self) -> PResult<Expr> {
        let lhs = self.parse_conditional()?;
        let Some(op) = self.assign_op() else {
            return Ok(lhs);
        };
        self.bump();
        let rhs = if self.at(Punct::LBrace) {
            self.parse_braced_init()?
        } else {
            self.parse_assign()?
        };
        let span = lhs.span.to(rhs.span);
        Ok(Expr::new(
            ExprKind::Assign {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            },
            span,
        ))
    }

    /// Conditional expression; also the grammar of bit widths and case
    /// labels.
    pub(super) fn parse_conditional(&mut self) -> PResult<Expr> {
        let cond = self.parse_binary(1)?;
        if !self.eat(Punct::Question) {
            return Ok(cond);
        }
        let then_expr = self.parse_expr()?;
        self.expect(Punct::Colon)?;
        let else_expr = self.parse_assign()?;
        let span = cond.span.to(else_expr.span);
        Ok(Expr::new(
            ExprKind::Ternary {
                cond: Box::new(cond),
                then_expr: Box::new(then_expr),
                else_expr: Box::new(else_expr),
            },
            span,
        ))
    }

    fn parse_binary(&mut self, min: u8) -> PResult<Expr> {
        let mut lhs = self.parse_unary()?;
        while let Some(op) = self.binary_op() {
            let prec = op.precedence();
            if prec < min {
                break;
            }
            self.bump();
            let rhs = self.parse_binary(prec + 1)?;
            lhs = binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn binary_op(&mut self) -> Option<BinaryOp> {
        let TokenKind::Punct(punct) = self.kind() else {
            return None;
        };
        let op = match punct {
            Punct::Star => BinaryOp::Mul,
            Punct::Slash => BinaryOp::Div,
            Punct::Percent => BinaryOp::Rem,
            Punct::Plus => BinaryOp::Add,
            Punct::Minus => BinaryOp::Sub,
            Punct::Shl => BinaryOp::Shl,
            Punct::Lt => BinaryOp::Lt,
            Punct::Le => BinaryOp::Le,
            Punct::Ge => BinaryOp::Ge,
            // `>` closes a template argument list instead
            Punct::Shr if self.template_depth == 0 => BinaryOp::Shr,
            Punct::Gt if self.template_depth == 0 => BinaryOp::Gt,
            Punct::EqEq => BinaryOp::Eq,
            Punct::Ne => BinaryOp::Ne,
            Punct::Amp => BinaryOp::BitAnd,
            Punct::Caret => BinaryOp::BitXor,
            Punct::Pipe => BinaryOp::BitOr,
            Punct::AndAnd => BinaryOp::And,
            Punct::OrOr => BinaryOp::Or,
            _ => return None,
        };
        Some(op)
    }

    fn assign_op(&mut self) -> Option<AssignOp> {
        let TokenKind::Punct(punct) = self.kind() else {
            return None;
        };
        let op = match punct {
            Punct::Eq => AssignOp::Assign,
            Punct::PlusEq => AssignOp::Add,
            Punct::MinusEq => AssignOp::Sub,
            Punct::StarEq => AssignOp::Mul,
            Punct::SlashEq => AssignOp::Div,
            Punct::PercentEq => AssignOp::Rem,
            Punct::AmpEq => AssignOp::BitAnd,
            Punct::PipeEq => AssignOp::BitOr,
            Punct::CaretEq => AssignOp::BitXor,
            Punct::ShlEq => AssignOp::Shl,
            Punct::ShrEq if self.template_depth == 0 => AssignOp::Shr,
            _ => return None,
        };
        Some(op)
    }

    fn parse_unary(&mut self) -> PResult<Expr> {
        self.enter()?;
        let result = self.parse_unary_inner();
        self.leave();
        result
    }

    fn parse_unary_inner(&mut self) -> PResult<Expr> {
        let start = self.span().start;
        let op = match self.kind() {
            TokenKind::Punct(Punct::PlusPlus) => Some(UnaryOp::PreInc),
            TokenKind::Punct(Punct::MinusMinus) => Some(UnaryOp::PreDec),
            TokenKind::Punct(Punct::Plus) => Some(UnaryOp::Plus),
            TokenKind::Punct(Punct::Minus) => Some(UnaryOp::Neg),
            TokenKind::Punct(Punct::Bang) => Some(UnaryOp::Not),
            TokenKind::Punct(Punct::Tilde) => Some(UnaryOp::BitNot),
            TokenKind::Punct(Punct::Star) => Some(UnaryOp::Deref),
            TokenKind::Punct(Punct::Amp) => Some(UnaryOp::AddrOf),
            _ => None,
        };
        if let Some(op) = op {
            self.bump();
            let arg = self.parse_unary()?;
            let span = Span::new(start, arg.span.end);
            return Ok(Expr::new(
                ExprKind::Unary {
                    op,
                    arg: Box::new(arg),
                },
                span,
            ));
        }

        match self.kind() {
            TokenKind::Keyword(Keyword::Sizeof) => self.parse_sizeof(start),
            TokenKind::Keyword(Keyword::New) => self.parse_new(start),
            TokenKind::Keyword(Keyword::Delete) => {
                self.bump();
                let array = self.at(Punct::LBracket) && self.at_nth(1, Punct::RBracket);
                if array {
                    self.bump();
                    self.bump();
                }
                let arg = self.parse_unary()?;
                let span = Span::new(start, arg.span.end);
                Ok(Expr::new(
                    ExprKind::Delete {
                        arg: Box::new(arg),
                        array,
                    },
                    span,
                ))
            }
            TokenKind::Punct(Punct::LParen) if self.starts_type(1) => {
                let ty = self.enclosed(Punct::RParen, "parenthesis", Self::parse_type_id)?;
                let expr = self.parse_unary()?;
                let span = Span::new(start, expr.span.end);
                Ok(Expr::new(
                    ExprKind::Cast {
                        ty,
                        expr: Box::new(expr),
                    },
                    span,
                ))
            }
            _ => self.parse_postfix(),
        }
    }

    fn parse_sizeof(&mut self, start: usize) -> PResult<Expr> {
        self.bump();
        let operand = if self.at(Punct::LParen) && self.starts_type(1) {
            SizeofOperand::Type(self.enclosed(Punct::RParen, "parenthesis", Self::parse_type_id)?)
        } else {
            SizeofOperand::Expr(Box::new(self.parse_unary()?))
        };
        Ok(Expr::new(
            ExprKind::Sizeof { operand },
            Span::new(start, self.prev_end),
        ))
    }

    fn parse_new(&mut self, start: usize) -> PResult<Expr> {
        self.bump();
        let ty = self.parse_simple_type()?;
        let array_size = if self.at(Punct::LBracket) {
            Some(Box::new(self.enclosed(
                Punct::RBracket,
                "bracket",
                Self::parse_expr,
            )?))
        } else {
            None
        };
        let args = if self.at(Punct::LParen) {
            Some(self.parse_call_args()?)
        } else if self.at(Punct::LBrace) {
            match self.parse_braced_init()?.kind {
                ExprKind::InitList { elements, .. } => Some(elements),
                _ => None,
            }
        } else {
            None
        };
        Ok(Expr::new(
            ExprKind::New {
                ty,
                args,
                array_size,
            },
            Span::new(start, self.prev_end),
        ))
    }

    fn parse_postfix(&mut self) -> PResult<Expr> {
        let mut expr = self.parse_primary()?;
        loop {
            let start = expr.span.start;
            expr = match self.kind() {
                TokenKind::Punct(Punct::LParen) => {
                    let args = self.parse_call_args()?;
                    Expr::new(
                        ExprKind::Call {
                            callee: Box::new(expr),
                            args,
                        },
                        Span::new(start, self.prev_end),
                    )
                }
                TokenKind::Punct(Punct::LBracket) => {
                    let index = self.enclosed(Punct::RBracket, "bracket", Self::parse_expr)?;
                    Expr::new(
                        ExprKind::Index {
                            base: Box::new(expr),
                            index: Box::new(index),
                        },
                        Span::new(start, self.prev_end),
                    )
                }
                TokenKind::Punct(punct @ (Punct::Dot | Punct::Arrow)) => {
                    self.bump();
                    let name = if self.eat(Punct::Tilde) {
                        format!("~{}", self.expect_ident("a destructor name")?.0)
                    } else {
                        self.expect_ident("a member name")?.0
                    };
                    Expr::new(
                        ExprKind::Member {
                            base: Box::new(expr),
                            name,
                            arrow: punct == Punct::Arrow,
                        },
                        Span::new(start, self.prev_end),
                    )
                }
                TokenKind::Punct(punct @ (Punct::PlusPlus | Punct::MinusMinus)) => {
                    self.bump();
                    let op = if punct == Punct::PlusPlus {
                        UnaryOp::PostInc
                    } else {
                        UnaryOp::PostDec
                    };
                    Expr::new(
                        ExprKind::Unary {
                            op,
                            arg: Box::new(expr),
                        },
                        Span::new(start, self.prev_end),
                    )
                }
                _ => return Ok(expr),
            };
        }
    }

    fn parse_primary(&mut self) -> PResult<Expr> {
        let span = self.span();
        match self.kind() {
            TokenKind::IntLit => {
                let token = self.bump();
                let value = int_value(&token.text).unwrap_or_default();
                Ok(Expr::new(
                    ExprKind::IntLit {
                        value,
                        text: token.text,
                    },
                    span,
                ))
            }
            TokenKind::FloatLit => {
                let token = self.bump();
                let value = float_value(&token.text).unwrap_or_default();
                Ok(Expr::new(
                    ExprKind::FloatLit {
                        value,
                        text: token.text,
                    },
                    span,
                ))
            }
            TokenKind::StringLit => Ok(self.parse_strings()),
            TokenKind::CharLit => {
                let token = self.bump();
                let value = unescape(&token.text).chars().next().unwrap_or('\0');
                Ok(Expr::new(
                    ExprKind::CharLit {
                        value,
                        text: token.text,
                    },
                    span,
                ))
            }
            TokenKind::Keyword(kw @ (Keyword::True | Keyword::False)) => {
                self.bump();
                Ok(Expr::new(
                    ExprKind::BoolLit {
                        value: kw == Keyword::True,
                    },
                    span,
                ))
            }
            TokenKind::Keyword(Keyword::Nullptr) => {
                self.bump();
                Ok(Expr::new(ExprKind::Nullptr, span))
            }
            TokenKind::Keyword(Keyword::This) => {
                self.bump();
                Ok(Expr::new(ExprKind::This, span))
            }
            TokenKind::Ident | TokenKind::Punct(Punct::ColonColon) => self.parse_id_expr(),
            TokenKind::Keyword(kw) if kw.is_builtin_type() && self.at_nth(1, Punct::LParen) => {
                // functional cast: `int(x)`
                self.bump();
                let expr = self.enclosed(Punct::RParen, "parenthesis", Self::parse_expr)?;
                Ok(Expr::new(
                    ExprKind::Cast {
                        ty: Type::named(kw.as_str()),
                        expr: Box::new(expr),
                    },
                    Span::new(span.start, self.prev_end),
                ))
            }
            TokenKind::Punct(Punct::LParen) => {
                let expr = self.enclosed(Punct::RParen, "parenthesis", Self::parse_expr)?;
                Ok(Expr::new(
                    ExprKind::Paren {
                        expr: Box::new(expr),
                    },
                    Span::new(span.start, self.prev_end),
                ))
            }
            TokenKind::Punct(Punct::LBrace) => self.parse_braced_init(),
            _ => Err(self.error_here("an expression")),
        }
    }

    /// Adjacent string literals concatenate.
    fn parse_strings(&mut self) -> Expr {
        let start = self.span().start;
        let mut value = String::new();
        let mut texts = Vec::new();
        while self.kind() == TokenKind::StringLit {
            let token = self.bump();
            value.push_str(&unescape(&token.text));
            texts.push(token.text);
        }
        Expr::new(
            ExprKind::StringLit {
                value,
                text: texts.join(" "),
            },
            Span::new(start, self.prev_end),
        )
    }

    /// Possibly qualified name, a `*_cast<T>(e)` expression, or a known
    /// template-id.
    fn parse_id_expr(&mut self) -> PResult<Expr> {
        let start = self.span().start;
        let mut name = String::new();
        if self.eat(Punct::ColonColon) {
            name.push_str("::");
        }
        loop {
            if self.eat(Punct::Tilde) {
                name.push('~');
            }
            name.push_str(&self.expect_ident("an identifier")?.0);
            if self.at(Punct::ColonColon)
                && (self.kind_at(1) == TokenKind::Ident || self.at_nth(1, Punct::Tilde))
            {
                self.bump();
                name.push_str("::");
            } else {
                break;
            }
        }

        let last = name.rsplit("::").next().unwrap_or_default().to_string();
        if self.at(Punct::Lt) && CAST_NAMES.contains(&last.as_str()) {
            let ty = self.parse_cast_target()?;
            let expr = self.enclosed(Punct::RParen, "parenthesis", Self::parse_expr)?;
            return Ok(Expr::new(
                ExprKind::Cast {
                    ty,
                    expr: Box::new(expr),
                },
                Span::new(start, self.prev_end),
            ));
        }
        if self.at(Punct::Lt) && self.templates.contains(&last) {
            let args = self.parse_template_args()?;
            let rendered = Type::Template {
                base: name,
                args,
            };
            name = rendered.to_string();
        }
        Ok(Expr::new(
            ExprKind::Ident { name },
            Span::new(start, self.prev_end),
        ))
    }

    fn parse_cast_target(&mut self) -> PResult<Type> {
        self.bump();
        self.template_depth += 1;
        let ty = self.parse_type_id();
        self.template_depth -= 1;
        let ty = ty?;
        self.split_shr();
        self.expect(Punct::Gt)?;
        if !self.at(Punct::LParen) {
            return Err(self.error_here("'('"));
        }
        Ok(ty)
    }

    /// `( args )` of a call, constructor, or `new` expression.
    pub(super) fn parse_call_args(&mut self) -> PResult<Vec<Expr>> {
        self.enclosed(Punct::RParen, "parenthesis", |p| {
            p.comma_list(Punct::RParen, Self::parse_init_clause)
        })
    }

    /// `{ elements }`, nested lists allowed.
    pub(super) fn parse_braced_init(&mut self) -> PResult<Expr> {
        self.enter()?;
        let result = self.parse_braced_init_inner();
        self.leave();
        result
    }

    fn parse_braced_init_inner(&mut self) -> PResult<Expr> {
        let start = self.span().start;
        let elements = self.enclosed(Punct::RBrace, "brace", |p| {
            p.comma_list(Punct::RBrace, Self::parse_init_clause)
        })?;
        Ok(Expr::new(
            ExprKind::InitList {
                elements,
                braced: true,
            },
            Span::new(start, self.prev_end),
        ))
    }

    pub(super) fn parse_init_clause(&mut self) -> PResult<Expr> {
        if self.at(Punct::LBrace) {
            self.parse_braced_init()
        } else {
            self.parse_assign()
        }
    }

    /// Items separated by commas up to (not including) `close`; a
    /// trailing comma is allowed.
    pub(super) fn comma_list<T>(
        &mut self,
        close: Punct,
        mut item: impl FnMut(&mut Self) -> PResult<T>,
    ) -> PResult<Vec<T>> {
        let mut items = Vec::new();
        while !self.at(close) && !self.at_eof() {
            items.push(item(self)?);
            if !self.eat(Punct::Comma) {
                break;
            }
        }
        Ok(items)
    }
}

fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Expr {
    let span = lhs.span.to(rhs.span);
    Expr::new(
        ExprKind::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        },
        span,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{ItemKind, StmtKind};
    use crate::config::{Mode, ParseOptions};
    use crate::parser::parse_unit;
    use crate::source::SourceBuffer;

    fn init_of(input: &str, mode: Mode) -> Expr {
        let source = SourceBuffer::from(input);
        let (unit, diags) = parse_unit(&source, &ParseOptions::new().mode(mode))
            .expect("parse should not abort");
        assert!(diags.is_empty(), "{diags:?}");
        match unit.items.into_iter().next().map(|i| i.kind) {
            Some(ItemKind::VarDecl(var)) => var.init.expect("initializer"),
            other => panic!("expected a variable, got {other:?}"),
        }
    }

    fn body_expr(input: &str) -> Expr {
        let source = SourceBuffer::from(input);
        let (unit, diags) = parse_unit(&source, &ParseOptions::new().mode(Mode::Cpp))
            .expect("parse should not abort");
        assert!(diags.is_empty(), "{diags:?}");
        let Some(ItemKind::FunctionDecl(f)) = unit.items.into_iter().next().map(|i| i.kind) else {
            panic!("expected a function");
        };
        let Some(StmtKind::Compound { stmts }) = f.body.map(|b| b.kind) else {
            panic!("expected a body");
        };
        match stmts.into_iter().next().map(|s| s.kind) {
            Some(StmtKind::Expression { expr }) => expr,
            other => panic!("expected an expression statement, got {other:?}"),
        }
    }

    #[test]
    fn precedence_and_associativity() {
        let expr = init_of("int x = 1 + 2 * 3 - 4;", Mode::C);
        let ExprKind::Binary { op, lhs, .. } = expr.kind else {
            panic!("not binary");
        };
        assert_eq!(op, BinaryOp::Sub);
        assert!(matches!(lhs.kind, ExprKind::Binary { op: BinaryOp::Add, .. }));
        assert_eq!(expr.span, Span::new(8, 21));
    }

    #[test]
    fn ternary_and_logical() {
        let expr = init_of("int x = a && b || c ? 1 : 2;", Mode::C);
        let ExprKind::Ternary { cond, .. } = expr.kind else {
            panic!("not ternary");
        };
        assert!(matches!(cond.kind, ExprKind::Binary { op: BinaryOp::Or, .. }));
    }

    #[test]
    fn casts_and_sizeof() {
        let expr = init_of("int x = (int)sizeof(struct node) + sizeof x;", Mode::C);
        let ExprKind::Binary { lhs, rhs, .. } = expr.kind else {
            panic!("not binary");
        };
        assert!(matches!(lhs.kind, ExprKind::Cast { .. }));
        assert!(matches!(
            rhs.kind,
            ExprKind::Sizeof {
                operand: SizeofOperand::Expr(_)
            }
        ));
    }

    #[test]
    fn postfix_chain() {
        let expr = body_expr("void f() { a.b->c[1](2, 3)++; }");
        let ExprKind::Unary { op, arg } = expr.kind else {
            panic!("not unary");
        };
        assert_eq!(op, UnaryOp::PostInc);
        assert!(matches!(arg.kind, ExprKind::Call { ref args, .. } if args.len() == 2));
    }

    #[test]
    fn adjacent_strings_merge() {
        let expr = init_of("const char *s = \"ab\" \"c\\n\";", Mode::C);
        assert_eq!(
            expr.kind,
            ExprKind::StringLit {
                value: "abc\n".to_string(),
                text: "\"ab\" \"c\\n\"".to_string(),
            }
        );
    }

    #[test]
    fn qualified_names_and_casts() {
        let expr = body_expr("void f() { std::cout << static_cast<int>(x) << std::endl; }");
        let ExprKind::Binary { lhs, .. } = expr.kind else {
            panic!("not binary");
        };
        let ExprKind::Binary { lhs, rhs, .. } = lhs.kind else {
            panic!("not binary");
        };
        assert_eq!(
            lhs.kind,
            ExprKind::Ident {
                name: "std::cout".to_string()
            }
        );
        assert!(matches!(rhs.kind, ExprKind::Cast { .. }));
    }

    #[test]
    fn new_and_delete() {
        let expr = body_expr("void f() { p = new int[n]; }");
        let ExprKind::Assign { rhs, .. } = expr.kind else {
            panic!("not assign");
        };
        assert!(matches!(
            rhs.kind,
            ExprKind::New {
                array_size: Some(_),
                ..
            }
        ));
        let expr = body_expr("void f() { delete[] p; }");
        assert!(matches!(expr.kind, ExprKind::Delete { array: true, .. }));
    }

    #[test]
    fn braced_initializer() {
        let expr = init_of("int a[] = {1, {2, 3}, };", Mode::C);
        let ExprKind::InitList { elements, braced } = expr.kind else {
            panic!("not a list");
        };
        assert!(braced);
        assert_eq!(elements.len(), 2);
    }
}
