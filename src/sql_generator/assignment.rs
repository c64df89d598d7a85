//! SET and INSERT column lists
//!
//! Two sources: a member initializer (`Assignments`), or a concrete entity value
//! whose persisted columns are all written.

use super::common::resolve_column;
use super::errors::{CompileError, CompilerRole};
use super::params::ParameterBag;
use crate::entity_catalog::{ColumnDescriptor, EntityMetadata};
use crate::expr::{Expr, MemberBinding, Value};

/// One written column: quoted column name and its rendered right side.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnWrite {
    pub column: String,
    pub value: String,
}

impl ColumnWrite {
    /// `` `col`=<value> `` as used in UPDATE SET.
    pub fn to_set_item(&self) -> String {
        format!("{}={}", self.column, self.value)
    }
}

fn bindings(expr: &Expr, role: CompilerRole) -> Result<&[MemberBinding], CompileError> {
    match expr {
        Expr::MemberInit(bindings) => Ok(bindings),
        other => Err(CompileError::unsupported(
            role,
            format!("expected a member initializer, found {}", other.shape()),
        )),
    }
}

fn target_column<'m>(
    metadata: &'m EntityMetadata,
    member: &str,
) -> Result<&'m ColumnDescriptor, CompileError> {
    let column = resolve_column(metadata, member)?;
    if column.is_computed || !column.writable {
        return Err(CompileError::ReadOnlyMember(member.to_string()));
    }
    Ok(column)
}

fn bind_coerced(
    column: &ColumnDescriptor,
    value: Value,
    params: &mut ParameterBag,
) -> Result<String, CompileError> {
    let value = value
        .coerce(column.kind)
        .map_err(|source| CompileError::Coercion {
            member: column.member_name.clone(),
            source,
        })?;
    params.bind(value)
}

/// Compile an UPDATE initializer into SET items.
///
/// Right sides may be values, columns of the same row, or `+ - * /` over both.
pub fn compile_update(
    expr: &Expr,
    metadata: &EntityMetadata,
    params: &mut ParameterBag,
) -> Result<Vec<ColumnWrite>, CompileError> {
    bindings(expr, CompilerRole::Update)?
        .iter()
        .map(|binding| {
            let column = target_column(metadata, &binding.member)?;
            let value = match binding.value.as_constant() {
                Some(value) => bind_coerced(column, value.clone(), params)?,
                None => compile_operand(&binding.value, metadata, params, false)?,
            };
            Ok(ColumnWrite {
                column: column.quoted(),
                value,
            })
        })
        .collect()
}

fn compile_operand(
    expr: &Expr,
    metadata: &EntityMetadata,
    params: &mut ParameterBag,
    nested: bool,
) -> Result<String, CompileError> {
    match expr.unwrap_convert() {
        Expr::Constant(Value::List(_)) => Err(CompileError::unsupported(
            CompilerRole::Update,
            "list value on the right side of an assignment",
        )),
        Expr::Constant(value) => params.bind(value.clone()),
        Expr::Member(member) => Ok(resolve_column(metadata, member)?.quoted()),
        Expr::Binary(b) if b.op.is_arithmetic() => {
            let left = compile_operand(&b.left, metadata, params, true)?;
            let right = compile_operand(&b.right, metadata, params, true)?;
            let rendered = format!("{} {} {}", left, b.op.sql_symbol(), right);
            Ok(if nested {
                format!("({})", rendered)
            } else {
                rendered
            })
        }
        other => Err(CompileError::unsupported(CompilerRole::Update, other.shape())),
    }
}

/// Compile an INSERT initializer; every right side must be a value.
pub fn compile_insert(
    expr: &Expr,
    metadata: &EntityMetadata,
    params: &mut ParameterBag,
) -> Result<Vec<ColumnWrite>, CompileError> {
    bindings(expr, CompilerRole::Insert)?
        .iter()
        .map(|binding| {
            let column = target_column(metadata, &binding.member)?;
            let value = binding.value.as_constant().ok_or_else(|| {
                CompileError::unsupported(
                    CompilerRole::Insert,
                    format!(
                        "value for `{}` must be a constant, found {}",
                        binding.member,
                        binding.value.shape()
                    ),
                )
            })?;
            Ok(ColumnWrite {
                column: column.quoted(),
                value: bind_coerced(column, value.clone(), params)?,
            })
        })
        .collect()
}

/// Bind every persisted column of an entity value, in declaration order.
pub fn compile_instance(
    values: &[(&str, Value)],
    metadata: &EntityMetadata,
    params: &mut ParameterBag,
) -> Result<Vec<ColumnWrite>, CompileError> {
    metadata
        .persisted_columns()
        .map(|column| {
            let value = member_value(values, &column.member_name)?;
            Ok(ColumnWrite {
                column: column.quoted(),
                value: bind_coerced(column, value.clone(), params)?,
            })
        })
        .collect()
}

pub(crate) fn member_value<'v>(
    values: &'v [(&str, Value)],
    member: &str,
) -> Result<&'v Value, CompileError> {
    values
        .iter()
        .find(|(name, _)| *name == member)
        .map(|(_, value)| value)
        .ok_or_else(|| CompileError::MissingMemberValue(member.to_string()))
}
