use super::common::resolve_column;
use super::errors::{CompileError, CompilerRole};
use crate::entity_catalog::EntityMetadata;
use crate::expr::Expr;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// `` `col` ASC|DESC `` for a member selector.
pub fn compile_ordering(
    expr: &Expr,
    direction: SortDirection,
    metadata: &EntityMetadata,
) -> Result<String, CompileError> {
    let member = expr
        .as_member()
        .ok_or_else(|| CompileError::unsupported(CompilerRole::Ordering, expr.shape()))?;
    let column = resolve_column(metadata, member)?;
    Ok(format!("{} {}", column.quoted(), direction.as_sql()))
}
