use super::common::resolve_column;
use super::errors::{CompileError, CompilerRole};
use crate::entity_catalog::EntityMetadata;
use crate::expr::Expr;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregate {
    Distinct,
    Max,
    Sum,
}

impl Aggregate {
    fn function(self) -> &'static str {
        match self {
            Aggregate::Distinct => "DISTINCT",
            Aggregate::Max => "MAX",
            Aggregate::Sum => "SUM",
        }
    }
}

/// Field list for a projection: one member or `New([members..])`.
pub fn compile_projection(expr: &Expr, metadata: &EntityMetadata) -> Result<String, CompileError> {
    let members: Vec<&Expr> = match expr {
        Expr::New(items) if !items.is_empty() => items.iter().collect(),
        Expr::New(_) => {
            return Err(CompileError::unsupported(
                CompilerRole::Projection,
                "empty projection",
            ))
        }
        single => vec![single],
    };

    let columns = members
        .into_iter()
        .map(|item| {
            let member = item
                .as_member()
                .ok_or_else(|| CompileError::unsupported(CompilerRole::Projection, item.shape()))?;
            Ok(resolve_column(metadata, member)?.quoted())
        })
        .collect::<Result<Vec<_>, CompileError>>()?;
    Ok(columns.join(","))
}

/// `` FUNC(`col`) `` over a single member selector.
pub fn compile_aggregate(
    aggregate: Aggregate,
    expr: &Expr,
    metadata: &EntityMetadata,
) -> Result<String, CompileError> {
    let member = expr.as_member().ok_or_else(|| {
        CompileError::unsupported(
            CompilerRole::Projection,
            format!("{} needs a single member, found {}", aggregate.function(), expr.shape()),
        )
    })?;
    let column = resolve_column(metadata, member)?;
    Ok(format!("{}({})", aggregate.function(), column.quoted()))
}
