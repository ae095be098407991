//! Integer constant evaluation, used to number enumerators.

use std::collections::HashMap;

use crate::ast::{BinaryOp, Expr, ExprKind, UnaryOp};

/// Names with known values, e.g. enumerators declared so far.
pub type Env = HashMap<String, i64>;

/// Evaluate `expr` as an integer constant expression.
///
/// Returns `None` for anything that is not a constant, for division by
/// zero, and on overflow.
#[must_use]
pub fn eval(expr: &Expr, env: &Env) -> Option<i64> {
    match &expr.kind {
        ExprKind::IntLit { value, .. } => i64::try_from(*value).ok(),
        ExprKind::CharLit { value, .. } => Some(i64::from(u32::from(*value))),
        ExprKind::BoolLit { value } => Some(i64::from(*value)),
        ExprKind::Ident { name } => env.get(name).copied(),
        ExprKind::Paren { expr } | ExprKind::Cast { expr, .. } => eval(expr, env),
        ExprKind::Unary { op, arg } => {
            let value = eval(arg, env)?;
            match op {
                UnaryOp::Neg => value.checked_neg(),
                UnaryOp::Plus => Some(value),
                UnaryOp::Not => Some(i64::from(value == 0)),
                UnaryOp::BitNot => Some(!value),
                _ => None,
            }
        }
        ExprKind::Binary { op, lhs, rhs } => {
            let lhs = eval(lhs, env)?;
            // Short-circuit like the language does.
            match op {
                BinaryOp::And if lhs == 0 => return Some(0),
                BinaryOp::Or if lhs != 0 => return Some(1),
                _ => {}
            }
            binary(*op, lhs, eval(rhs, env)?)
        }
        ExprKind::Ternary {
            cond,
            then_expr,
            else_expr,
        } => {
            if eval(cond, env)? == 0 {
                eval(else_expr, env)
            } else {
                eval(then_expr, env)
            }
        }
        _ => None,
    }
}

fn binary(op: BinaryOp, lhs: i64, rhs: i64) -> Option<i64> {
    match op {
        BinaryOp::Mul => lhs.checked_mul(rhs),
        BinaryOp::Div => lhs.checked_div(rhs),
        BinaryOp::Rem => lhs.checked_rem(rhs),
        BinaryOp::Add => lhs.checked_add(rhs),
        BinaryOp::Sub => lhs.checked_sub(rhs),
        BinaryOp::Shl => lhs.checked_shl(u32::try_from(rhs).ok()?),
        BinaryOp::Shr => lhs.checked_shr(u32::try_from(rhs).ok()?),
        BinaryOp::Lt => Some(i64::from(lhs < rhs)),
        BinaryOp::Gt => Some(i64::from(lhs > rhs)),
        BinaryOp::Le => Some(i64::from(lhs <= rhs)),
        BinaryOp::Ge => Some(i64::from(lhs >= rhs)),
        BinaryOp::Eq => Some(i64::from(lhs == rhs)),
        BinaryOp::Ne => Some(i64::from(lhs != rhs)),
        BinaryOp::BitAnd => Some(lhs & rhs),
        BinaryOp::BitXor => Some(lhs ^ rhs),
        BinaryOp::BitOr => Some(lhs | rhs),
        BinaryOp::And => Some(i64::from(lhs != 0 && rhs != 0)),
        BinaryOp::Or => Some(i64::from(lhs != 0 || rhs != 0)),
        BinaryOp::Comma => Some(rhs),
    }
}
