//! Common utilities for MySQL statement rendering

use super::errors::{CompileError, CompilerRole};
use crate::entity_catalog::{ColumnDescriptor, EntityMetadata};
use crate::expr::Value;

/// Look up the column a member maps to.
pub fn resolve_column<'m>(
    metadata: &'m EntityMetadata,
    member: &str,
) -> Result<&'m ColumnDescriptor, CompileError> {
    metadata
        .column(member)
        .ok_or_else(|| CompileError::UnknownMember {
            entity: metadata.entity_name.clone(),
            member: member.to_string(),
        })
}

/// Backtick-quote a MySQL identifier (column or table name).
///
/// Embedded backticks are doubled.
///
/// # Examples
/// ```
/// use sqlcraft::sql_generator::common::quote_identifier;
/// assert_eq!(quote_identifier("user_id"), "`user_id`");
/// assert_eq!(quote_identifier("odd`name"), "`odd``name`");
/// ```
pub fn quote_identifier(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

/// Format a qualified column reference: `T1.\`col\``
pub fn qualified_column(table_alias: &str, column_name: &str) -> String {
    format!("{}.{}", table_alias, quote_identifier(column_name))
}

/// Escape a string for use inside a single-quoted MySQL literal
pub fn escape_string(s: &str) -> String {
    s.replace('\\', "\\\\") // Must be first!
        .replace('\'', "\\'")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\0', "\\0")
}

/// Escape LIKE metacharacters so the pattern matches `s` literally.
pub fn escape_like(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Format a value as an inline SQL literal (bulk statements only).
pub fn format_literal(value: &Value) -> Result<String, CompileError> {
    match value {
        Value::Null => Ok("null".to_string()),
        Value::Bool(b) => Ok(if *b { "1".to_string() } else { "0".to_string() }),
        Value::Int(i) => Ok(i.to_string()),
        Value::Float(f) if f.is_finite() => Ok(f.to_string()),
        Value::Float(f) => Err(CompileError::unsupported(
            CompilerRole::Insert,
            format!("non-finite float {}", f),
        )),
        Value::Text(_) | Value::DateTime(_) | Value::Uuid(_) => {
            Ok(format!("'{}'", escape_string(&value.to_string())))
        }
        Value::List(_) => Err(CompileError::unsupported(
            CompilerRole::Insert,
            "list values cannot be written to a column",
        )),
    }
}
