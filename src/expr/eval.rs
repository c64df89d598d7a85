//! In-memory predicate evaluation
//!
//! Evaluates predicate trees against already loaded values with SQL three-valued
//! logic: `None` is UNKNOWN. Comparing a member with a NULL constant follows the
//! generator's `IS` / `IS NOT` rewrite, so a tree selects the same rows here as
//! its compiled WHERE clause does in the database (modulo collation: text is
//! compared case-sensitively).

use super::{BinaryOp, Expr, Method, UnaryOp, Value};
use std::cmp::Ordering;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum EvalError {
    #[error("Cannot evaluate {0} as a condition")]
    Unsupported(String),
}

/// Evaluate `expr` with `lookup` resolving member names to their values.
pub fn evaluate<F>(expr: &Expr, lookup: &F) -> Result<Option<bool>, EvalError>
where
    F: Fn(&str) -> Value,
{
    match expr {
        Expr::Binary(b) => match b.op {
            BinaryOp::AndAlso => {
                let left = evaluate(&b.left, lookup)?;
                let right = evaluate(&b.right, lookup)?;
                Ok(match (left, right) {
                    (Some(false), _) | (_, Some(false)) => Some(false),
                    (Some(true), Some(true)) => Some(true),
                    _ => None,
                })
            }
            BinaryOp::OrElse => {
                let left = evaluate(&b.left, lookup)?;
                let right = evaluate(&b.right, lookup)?;
                Ok(match (left, right) {
                    (Some(true), _) | (_, Some(true)) => Some(true),
                    (Some(false), Some(false)) => Some(false),
                    _ => None,
                })
            }
            op if op.is_comparison() => {
                let member = b
                    .left
                    .as_member()
                    .ok_or_else(|| EvalError::Unsupported(b.left.shape()))?;
                let constant = b
                    .right
                    .as_constant()
                    .ok_or_else(|| EvalError::Unsupported(b.right.shape()))?;
                Ok(compare(op, &lookup(member), constant))
            }
            _ => Err(EvalError::Unsupported(expr.shape())),
        },
        Expr::Unary(u) => match u.op {
            UnaryOp::Not => Ok(evaluate(&u.operand, lookup)?.map(|b| !b)),
            UnaryOp::Convert => evaluate(&u.operand, lookup),
        },
        Expr::MethodCall(call) => evaluate_call(call, lookup),
        Expr::Member(name) => match lookup(name) {
            Value::Bool(b) => Ok(Some(b)),
            Value::Int(i) => Ok(Some(i == 1)),
            Value::Null => Ok(None),
            _ => Err(EvalError::Unsupported(expr.shape())),
        },
        Expr::Constant(Value::Bool(b)) => Ok(Some(*b)),
        _ => Err(EvalError::Unsupported(expr.shape())),
    }
}

/// True only when `expr` evaluates to TRUE (UNKNOWN rows are not selected).
pub fn matches<F>(expr: &Expr, lookup: &F) -> Result<bool, EvalError>
where
    F: Fn(&str) -> Value,
{
    Ok(evaluate(expr, lookup)? == Some(true))
}

fn evaluate_call<F>(call: &super::MethodCall, lookup: &F) -> Result<Option<bool>, EvalError>
where
    F: Fn(&str) -> Value,
{
    let unsupported = || EvalError::Unsupported(format!("call {}()", call.method));

    if let (Method::Contains, Some(Value::List(items))) = (call.method, call.target.as_constant()) {
        let member = call
            .args
            .first()
            .and_then(Expr::as_member)
            .ok_or_else(unsupported)?;
        let value = lookup(member);
        if value.is_null() {
            return Ok(None);
        }
        return Ok(Some(
            items
                .iter()
                .any(|item| compare_values(&value, item) == Some(Ordering::Equal)),
        ));
    }

    let member = call.target.as_member().ok_or_else(unsupported)?;
    let arg = call
        .args
        .first()
        .and_then(Expr::as_constant)
        .ok_or_else(unsupported)?;
    let value = lookup(member);

    match call.method {
        Method::Equals => Ok(compare(BinaryOp::Equal, &value, arg)),
        method => {
            let (Value::Text(haystack), Value::Text(needle)) = (&value, arg) else {
                return Ok(None);
            };
            Ok(Some(match method {
                Method::Contains => haystack.contains(needle.as_str()),
                Method::StartsWith => haystack.starts_with(needle.as_str()),
                _ => haystack.ends_with(needle.as_str()),
            }))
        }
    }
}

fn compare(op: BinaryOp, value: &Value, constant: &Value) -> Option<bool> {
    if constant.is_null() {
        return match op {
            BinaryOp::Equal => Some(value.is_null()),
            BinaryOp::NotEqual => Some(!value.is_null()),
            _ => None,
        };
    }
    let ordering = compare_values(value, constant)?;
    Some(match op {
        BinaryOp::Equal => ordering == Ordering::Equal,
        BinaryOp::NotEqual => ordering != Ordering::Equal,
        BinaryOp::GreaterThan => ordering == Ordering::Greater,
        BinaryOp::GreaterThanOrEqual => ordering != Ordering::Less,
        BinaryOp::LessThan => ordering == Ordering::Less,
        BinaryOp::LessThanOrEqual => ordering != Ordering::Greater,
        _ => return None,
    })
}

/// Order two values; `None` for NULLs and incomparable types.
pub fn compare_values(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
        (Value::Int(a), Value::Float(b)) => (*a as f64).partial_cmp(b),
        (Value::Float(a), Value::Int(b)) => a.partial_cmp(&(*b as f64)),
        (Value::Float(a), Value::Float(b)) => a.partial_cmp(b),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Int(b)) => Some(i64::from(*a).cmp(b)),
        (Value::Int(a), Value::Bool(b)) => Some(a.cmp(&i64::from(*b))),
        (Value::Text(a), Value::Text(b)) => Some(a.cmp(b)),
        (Value::DateTime(a), Value::DateTime(b)) => Some(a.cmp(b)),
        (Value::Uuid(a), Value::Uuid(b)) => Some(a.cmp(b)),
        _ => None,
    }
}
