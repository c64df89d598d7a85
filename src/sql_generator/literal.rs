//! Multi-row statements with inline literals
//!
//! Values are rendered into the SQL text instead of being bound, so these
//! statements are only for trusted, program-generated data. Text is quoted and
//! escaped for MySQL's default `sql_mode`; that escaping is not a security
//! boundary.

use super::assignment::member_value;
use super::common::{format_literal, qualified_column, quote_identifier};
use super::errors::CompileError;
use crate::entity_catalog::EntityMetadata;
use crate::expr::Value;

/// Member values of one entity, as returned by `Entity::values`.
pub type RowValues<'a> = Vec<(&'a str, Value)>;

fn literal_for(
    metadata: &EntityMetadata,
    member: &str,
    values: &[(&str, Value)],
) -> Result<String, CompileError> {
    let column = metadata
        .column(member)
        .ok_or_else(|| CompileError::MissingMemberValue(member.to_string()))?;
    let value = member_value(values, member)?
        .clone()
        .coerce(column.kind)
        .map_err(|source| CompileError::Coercion {
            member: member.to_string(),
            source,
        })?;
    format_literal(&value)
}

/// `` INSERT INTO `t` (`a`,`b`) VALUES (1,'x'),(2,'y') ``
pub fn bulk_insert_sql(
    metadata: &EntityMetadata,
    table: &str,
    rows: &[RowValues<'_>],
) -> Result<String, CompileError> {
    let columns: Vec<_> = metadata.persisted_columns().collect();
    if columns.is_empty() || rows.is_empty() {
        return Err(CompileError::EmptyStatement("INSERT"));
    }

    let tuples = rows
        .iter()
        .map(|row| {
            let literals = columns
                .iter()
                .map(|c| literal_for(metadata, &c.member_name, row))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(format!("({})", literals.join(",")))
        })
        .collect::<Result<Vec<_>, CompileError>>()?;

    let column_list = columns
        .iter()
        .map(|c| c.quoted())
        .collect::<Vec<_>>()
        .join(",");
    Ok(format!(
        "INSERT INTO {} ({}) VALUES {}",
        quote_identifier(table),
        column_list,
        tuples.join(",")
    ))
}

/// Update many rows in one statement by joining a `UNION ALL` derived table on
/// the key column:
///
/// ```text
/// UPDATE `t` T1 JOIN (SELECT 1 AS `id`,'a' AS `name` UNION ALL SELECT 2 AS `id`,'b' AS `name`) T2
///   ON T1.`id` = T2.`id` SET T1.`name`=T2.`name`
/// ```
pub fn bulk_update_sql(
    metadata: &EntityMetadata,
    table: &str,
    rows: &[RowValues<'_>],
) -> Result<String, CompileError> {
    let key = metadata
        .key_column()
        .ok_or_else(|| CompileError::MissingKeyColumn(metadata.entity_name.clone()))?;
    let columns: Vec<_> = metadata.persisted_columns().collect();
    if columns.is_empty() || rows.is_empty() {
        return Err(CompileError::EmptyStatement("UPDATE"));
    }

    let selects = rows
        .iter()
        .map(|row| {
            let fields = std::iter::once(key)
                .chain(columns.iter().copied())
                .map(|c| {
                    Ok(format!(
                        "{} AS {}",
                        literal_for(metadata, &c.member_name, row)?,
                        c.quoted()
                    ))
                })
                .collect::<Result<Vec<_>, CompileError>>()?;
            Ok(format!("SELECT {}", fields.join(",")))
        })
        .collect::<Result<Vec<_>, CompileError>>()?;

    let assignments = columns
        .iter()
        .map(|c| {
            format!(
                "{}={}",
                qualified_column("T1", &c.column_name),
                qualified_column("T2", &c.column_name)
            )
        })
        .collect::<Vec<_>>()
        .join(",");

    Ok(format!(
        "UPDATE {} T1 JOIN ({}) T2 ON {} = {} SET {}",
        quote_identifier(table),
        selects.join(" UNION ALL "),
        qualified_column("T1", &key.column_name),
        qualified_column("T2", &key.column_name),
        assignments
    ))
}
