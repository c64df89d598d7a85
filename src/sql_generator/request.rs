//! JSON statement requests
//!
//! A serialized description of one statement, for callers that cannot build typed
//! expressions (the `sqlcraft` binary reads these from files or stdin).
//!
//! ```json
//! {
//!   "kind": "select",
//!   "filter": [{ "binary": { "op": "greater_than",
//!                            "left": { "member": "Age" },
//!                            "right": { "constant": 18 } } }],
//!   "order_by": [{ "member": "UserName", "direction": "desc" }],
//!   "page": { "page": 2, "size": 25 }
//! }
//! ```

use super::errors::CompileError;
use super::ordering::SortDirection;
use super::params::ParameterBag;
use super::projection::Aggregate;
use super::statement::{SqlBuilder, StatementKind};
use crate::config::DialectConfig;
use crate::entity_catalog::EntityMetadata;
use crate::expr::{Expr, Value};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub member: String,
    #[serde(default)]
    pub direction: SortDirection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateRequest {
    pub function: Aggregate,
    pub member: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: u64,
    pub size: u64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StatementRequest {
    #[serde(default)]
    pub kind: StatementKind,
    #[serde(default)]
    pub table: Option<String>,
    #[serde(default)]
    pub table_index: Option<usize>,
    /// AND-ed in order.
    #[serde(default)]
    pub filter: Vec<Expr>,
    /// Member initializer for insert/update.
    #[serde(default)]
    pub assignments: Option<Expr>,
    /// Whole-entity values for insert/update, keyed by member name.
    #[serde(default)]
    pub values: Option<BTreeMap<String, Value>>,
    #[serde(default)]
    pub order_by: Vec<OrderItem>,
    #[serde(default)]
    pub projection: Option<Expr>,
    #[serde(default)]
    pub aggregate: Option<AggregateRequest>,
    #[serde(default)]
    pub top: Option<u64>,
    #[serde(default)]
    pub page: Option<PageRequest>,
}

/// Rendered statement text with its bindings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedStatement {
    pub sql: String,
    pub parameters: ParameterBag,
}

impl StatementRequest {
    pub fn build(
        &self,
        metadata: Arc<EntityMetadata>,
        config: &DialectConfig,
    ) -> Result<SqlBuilder, CompileError> {
        let mut builder = SqlBuilder::with_config(metadata, config);
        if let Some(index) = self.table_index {
            builder.set_table_index(index)?;
        }
        if let Some(table) = &self.table {
            builder.set_table(table)?;
        }

        match self.kind {
            StatementKind::Insert | StatementKind::Update => {
                let values: Option<Vec<(&str, Value)>> = self.values.as_ref().map(|values| {
                    values
                        .iter()
                        .map(|(member, value)| (member.as_str(), value.clone()))
                        .collect()
                });
                match (self.kind, &self.assignments, values) {
                    (StatementKind::Insert, Some(expr), _) => builder.insert(expr)?,
                    (StatementKind::Insert, None, Some(values)) => builder.insert_values(&values)?,
                    (_, Some(expr), _) => builder.update(expr)?,
                    (_, None, Some(values)) => builder.update_values(&values)?,
                    (kind, None, None) => builder.set_kind(kind),
                };
            }
            kind => {
                builder.set_kind(kind);
            }
        }

        for predicate in &self.filter {
            builder.where_(predicate)?;
        }
        for item in &self.order_by {
            builder.push_ordering(&Expr::member(item.member.as_str()), item.direction)?;
        }
        if let Some(projection) = &self.projection {
            builder.select(projection)?;
        }
        if let Some(aggregate) = &self.aggregate {
            builder.aggregate(aggregate.function, &Expr::member(aggregate.member.as_str()))?;
        }
        if let Some(top) = self.top {
            builder.top(top)?;
        }
        if let Some(page) = self.page {
            builder.range(page.page, page.size)?;
        }
        Ok(builder)
    }

    pub fn render(
        &self,
        metadata: Arc<EntityMetadata>,
        config: &DialectConfig,
    ) -> Result<RenderedStatement, CompileError> {
        let builder = self.build(metadata, config)?;
        let sql = builder.sql()?;
        Ok(RenderedStatement {
            sql,
            parameters: builder.into_parameters(),
        })
    }
}
