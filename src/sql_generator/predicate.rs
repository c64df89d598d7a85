//! WHERE clause compilation
//!
//! Every value reaching the clause is bound as a parameter; the only text spliced
//! into the SQL are mapped column names, operators and parameter placeholders.

use super::common::{escape_like, quote_identifier, resolve_column};
use super::errors::{CompileError, CompilerRole};
use super::params::ParameterBag;
use crate::entity_catalog::{ColumnDescriptor, EntityMetadata};
use crate::expr::{BinaryOp, Expr, Method, MethodCall, UnaryExpr, UnaryOp, Value, ValueKind};

const ALWAYS_TRUE: &str = "1 = 1";
const ALWAYS_FALSE: &str = "1 = 0";

pub fn compile_predicate(
    expr: &Expr,
    metadata: &EntityMetadata,
    params: &mut ParameterBag,
) -> Result<String, CompileError> {
    match expr.unwrap_convert() {
        Expr::Binary(b) => match b.op {
            BinaryOp::AndAlso => {
                let left = compile_predicate(&b.left, metadata, params)?;
                let right = compile_predicate(&b.right, metadata, params)?;
                Ok(format!("{} AND {}", left, right))
            }
            BinaryOp::OrElse => {
                let left = compile_predicate(&b.left, metadata, params)?;
                let right = compile_predicate(&b.right, metadata, params)?;
                Ok(format!("({} OR {})", left, right))
            }
            op if op.is_comparison() => compile_comparison(op, &b.left, &b.right, metadata, params),
            op => Err(CompileError::unsupported(
                CompilerRole::Predicate,
                format!("arithmetic {:?} is not a condition", op),
            )),
        },
        Expr::Unary(UnaryExpr {
            op: UnaryOp::Not,
            operand,
        }) => {
            let inner = compile_predicate(operand, metadata, params)?;
            Ok(format!("NOT ({})", inner))
        }
        Expr::MethodCall(call) => compile_call(call, metadata, params),
        Expr::Member(member) => {
            let column = resolve_column(metadata, member)?;
            if column.kind != ValueKind::Bool {
                return Err(CompileError::unsupported(
                    CompilerRole::Predicate,
                    format!("{} member `{}` used as a condition", column.kind, member),
                ));
            }
            let placeholder = params.bind(Value::Bool(true))?;
            Ok(format!("{} = {}", column.quoted(), placeholder))
        }
        Expr::Constant(Value::Bool(true)) => Ok(ALWAYS_TRUE.to_string()),
        Expr::Constant(Value::Bool(false)) => Ok(ALWAYS_FALSE.to_string()),
        other => Err(CompileError::unsupported(
            CompilerRole::Predicate,
            other.shape(),
        )),
    }
}

fn compile_comparison(
    op: BinaryOp,
    left: &Expr,
    right: &Expr,
    metadata: &EntityMetadata,
    params: &mut ParameterBag,
) -> Result<String, CompileError> {
    let member = left
        .as_member()
        .ok_or_else(|| CompileError::NonMemberOperand(left.shape()))?;
    let column = resolve_column(metadata, member)?;
    let value = right.as_constant().ok_or_else(|| {
        CompileError::unsupported(
            CompilerRole::Predicate,
            format!("right side of {:?} must be a value, found {}", op, right.shape()),
        )
    })?;

    if value.is_null() {
        let keyword = match op {
            BinaryOp::Equal => "IS",
            BinaryOp::NotEqual => "IS NOT",
            _ => {
                return Err(CompileError::NullComparison {
                    column: column.column_name.clone(),
                    op: op.sql_symbol().to_string(),
                })
            }
        };
        let placeholder = params.bind(Value::Null)?;
        return Ok(format!("{} {} {}", column.quoted(), keyword, placeholder));
    }

    let placeholder = params.bind(predicate_value(column, value)?)?;
    Ok(format!("{} {} {}", column.quoted(), op.sql_symbol(), placeholder))
}

fn compile_call(
    call: &MethodCall,
    metadata: &EntityMetadata,
    params: &mut ParameterBag,
) -> Result<String, CompileError> {
    if let (Method::Contains, Some(target)) = (call.method, call.target.as_constant()) {
        return compile_membership(call, target, metadata, params);
    }

    let member = call
        .target
        .as_member()
        .ok_or_else(|| CompileError::NonMemberOperand(call.target.shape()))?;
    let [arg] = call.args.as_slice() else {
        return Err(CompileError::unsupported(
            CompilerRole::Predicate,
            format!("{}() takes one argument, got {}", call.method, call.args.len()),
        ));
    };
    let value = arg.as_constant().ok_or_else(|| {
        CompileError::unsupported(
            CompilerRole::Predicate,
            format!("argument of {}() must be a value, found {}", call.method, arg.shape()),
        )
    })?;

    if call.method == Method::Equals {
        return compile_comparison(
            BinaryOp::Equal,
            &call.target,
            &Expr::Constant(value.clone()),
            metadata,
            params,
        );
    }

    let column = resolve_column(metadata, member)?;
    let Value::Text(text) = value else {
        return Err(CompileError::unsupported(
            CompilerRole::Predicate,
            format!("{}() needs a text argument, found {}", call.method, value.type_name()),
        ));
    };
    let escaped = escape_like(text);
    let pattern = match call.method {
        Method::Contains => format!("%{}%", escaped),
        Method::StartsWith => format!("{}%", escaped),
        _ => format!("%{}", escaped),
    };
    let placeholder = params.bind(Value::Text(pattern))?;
    Ok(format!("{} LIKE {}", column.quoted(), placeholder))
}

fn compile_membership(
    call: &MethodCall,
    target: &Value,
    metadata: &EntityMetadata,
    params: &mut ParameterBag,
) -> Result<String, CompileError> {
    let Value::List(items) = target else {
        return Err(CompileError::unsupported(
            CompilerRole::Predicate,
            format!("Contains() on a {} value", target.type_name()),
        ));
    };
    let member = call
        .args
        .first()
        .and_then(Expr::as_member)
        .ok_or_else(|| {
            CompileError::unsupported(
                CompilerRole::Predicate,
                "list Contains() must test a member of the entity",
            )
        })?;
    let column = resolve_column(metadata, member)?;

    if items.is_empty() {
        log::warn!(
            "Empty IN list for `{}`; predicate always false",
            column.column_name
        );
        return Ok(ALWAYS_FALSE.to_string());
    }

    let placeholders = items
        .iter()
        .map(|item| {
            let value = predicate_value(column, item)?;
            params.bind(value)
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(format!(
        "{} IN ({})",
        quote_identifier(&column.column_name),
        placeholders.join(",")
    ))
}

/// Text constants compared with datetime or uuid columns are parsed first.
fn predicate_value(column: &ColumnDescriptor, value: &Value) -> Result<Value, CompileError> {
    match (column.kind, value) {
        (ValueKind::DateTime | ValueKind::Uuid, Value::Text(_)) => value
            .clone()
            .coerce(column.kind)
            .map_err(|source| CompileError::Coercion {
                member: column.member_name.clone(),
                source,
            }),
        (_, Value::List(_)) => Err(CompileError::unsupported(
            CompilerRole::Predicate,
            format!("list value compared with `{}`", column.column_name),
        )),
        _ => Ok(value.clone()),
    }
}
