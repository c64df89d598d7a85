//! Statement assembly
//!
//! `SqlBuilder` holds the compiled fragments of one statement. Each call compiles
//! its tree immediately against the entity metadata and the statement's
//! [`ParameterBag`]; [`SqlBuilder::sql`] only stitches fragments together, so it can
//! be called any number of times.

use super::assignment::{compile_insert, compile_instance, compile_update, ColumnWrite};
use super::common::quote_identifier;
use super::errors::CompileError;
use super::ordering::{compile_ordering, SortDirection};
use super::params::ParameterBag;
use super::predicate::compile_predicate;
use super::projection::{compile_aggregate, compile_projection, Aggregate};
use crate::config::DialectConfig;
use crate::entity_catalog::{validate_table_name, EntityMetadata};
use crate::expr::{Expr, Value};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementKind {
    #[default]
    Select,
    Insert,
    Update,
    Delete,
    Count,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Paging {
    Top(u64),
    /// Offset is `(page - 1) * size`, checked when the page is set.
    Page { offset: u64, size: u64 },
}

impl Paging {
    fn limit_clause(self) -> String {
        match self {
            Paging::Top(n) => format!(" LIMIT {}", n),
            Paging::Page { offset, size } => format!(" LIMIT {},{}", offset, size),
        }
    }
}

#[derive(Debug, Clone)]
struct BuilderState {
    kind: StatementKind,
    explicit_table: Option<String>,
    table_index: usize,
    where_clause: Option<String>,
    order_by: Vec<String>,
    set_items: Vec<String>,
    insert_columns: Vec<String>,
    insert_values: Vec<String>,
    projection: Option<String>,
    paging: Option<Paging>,
    params: ParameterBag,
}

#[derive(Debug, Clone)]
pub struct SqlBuilder {
    metadata: Arc<EntityMetadata>,
    log_statements: bool,
    state: BuilderState,
}

impl SqlBuilder {
    pub fn new(metadata: Arc<EntityMetadata>) -> Self {
        Self::with_config(metadata, &DialectConfig::default())
    }

    pub fn with_config(metadata: Arc<EntityMetadata>, config: &DialectConfig) -> Self {
        Self {
            metadata,
            log_statements: config.log_statements,
            state: BuilderState {
                kind: StatementKind::default(),
                explicit_table: None,
                table_index: 0,
                where_clause: None,
                order_by: Vec::new(),
                set_items: Vec::new(),
                insert_columns: Vec::new(),
                insert_values: Vec::new(),
                projection: None,
                paging: None,
                params: ParameterBag::new(config.parameter_prefix.clone()),
            },
        }
    }

    pub fn metadata(&self) -> &Arc<EntityMetadata> {
        &self.metadata
    }

    /// Use an explicit physical table; wins over any candidate index.
    pub fn set_table(&mut self, name: &str) -> Result<&mut Self, CompileError> {
        validate_table_name(name)?;
        self.state.explicit_table = Some(name.to_string());
        Ok(self)
    }

    /// Select one of the entity's candidate tables.
    pub fn set_table_index(&mut self, index: usize) -> Result<&mut Self, CompileError> {
        self.metadata.table_candidate(index)?;
        self.state.table_index = index;
        Ok(self)
    }

    pub fn table_name(&self) -> &str {
        match &self.state.explicit_table {
            Some(name) => name,
            None => &self.metadata.table_name_candidates[self.state.table_index],
        }
    }

    pub fn kind(&self) -> StatementKind {
        self.state.kind
    }

    pub fn set_kind(&mut self, kind: StatementKind) -> &mut Self {
        self.state.kind = kind;
        self
    }

    /// AND the predicate onto the WHERE clause.
    pub fn where_(&mut self, predicate: &Expr) -> Result<&mut Self, CompileError> {
        let mut params = self.state.params.clone();
        let compiled = compile_predicate(predicate, &self.metadata, &mut params)?;
        self.state.params = params;
        self.state.where_clause = Some(match self.state.where_clause.take() {
            Some(existing) => format!("{} AND {}", existing, compiled),
            None => compiled,
        });
        Ok(self)
    }

    pub fn update(&mut self, assignments: &Expr) -> Result<&mut Self, CompileError> {
        let mut params = self.state.params.clone();
        let writes = compile_update(assignments, &self.metadata, &mut params)?;
        self.state.params = params;
        Ok(self.push_set_items(writes))
    }

    /// SET every persisted column from an entity value.
    pub fn update_values(&mut self, values: &[(&str, Value)]) -> Result<&mut Self, CompileError> {
        let mut params = self.state.params.clone();
        let writes = compile_instance(values, &self.metadata, &mut params)?;
        self.state.params = params;
        Ok(self.push_set_items(writes))
    }

    fn push_set_items(&mut self, writes: Vec<ColumnWrite>) -> &mut Self {
        self.state.kind = StatementKind::Update;
        self.state
            .set_items
            .extend(writes.iter().map(ColumnWrite::to_set_item));
        self
    }

    pub fn insert(&mut self, assignments: &Expr) -> Result<&mut Self, CompileError> {
        let mut params = self.state.params.clone();
        let writes = compile_insert(assignments, &self.metadata, &mut params)?;
        self.state.params = params;
        Ok(self.push_insert_columns(writes))
    }

    /// INSERT every persisted column from an entity value.
    pub fn insert_values(&mut self, values: &[(&str, Value)]) -> Result<&mut Self, CompileError> {
        let mut params = self.state.params.clone();
        let writes = compile_instance(values, &self.metadata, &mut params)?;
        self.state.params = params;
        Ok(self.push_insert_columns(writes))
    }

    fn push_insert_columns(&mut self, writes: Vec<ColumnWrite>) -> &mut Self {
        self.state.kind = StatementKind::Insert;
        for write in writes {
            self.state.insert_columns.push(write.column);
            self.state.insert_values.push(write.value);
        }
        self
    }

    pub fn delete(&mut self) -> &mut Self {
        self.set_kind(StatementKind::Delete)
    }

    pub fn count(&mut self) -> &mut Self {
        self.set_kind(StatementKind::Count)
    }

    pub fn order_by(&mut self, key: &Expr) -> Result<&mut Self, CompileError> {
        self.push_ordering(key, SortDirection::Asc)
    }

    pub fn order_by_desc(&mut self, key: &Expr) -> Result<&mut Self, CompileError> {
        self.push_ordering(key, SortDirection::Desc)
    }

    pub fn push_ordering(
        &mut self,
        key: &Expr,
        direction: SortDirection,
    ) -> Result<&mut Self, CompileError> {
        let item = compile_ordering(key, direction, &self.metadata)?;
        self.state.order_by.push(item);
        Ok(self)
    }

    /// Replace the field list.
    pub fn select(&mut self, projection: &Expr) -> Result<&mut Self, CompileError> {
        self.state.projection = Some(compile_projection(projection, &self.metadata)?);
        Ok(self)
    }

    /// Replace the field list with an aggregate over one member.
    pub fn aggregate(
        &mut self,
        aggregate: Aggregate,
        selector: &Expr,
    ) -> Result<&mut Self, CompileError> {
        self.state.projection = Some(compile_aggregate(aggregate, selector, &self.metadata)?);
        Ok(self)
    }

    pub fn distinct(&mut self, selector: &Expr) -> Result<&mut Self, CompileError> {
        self.aggregate(Aggregate::Distinct, selector)
    }

    pub fn max(&mut self, selector: &Expr) -> Result<&mut Self, CompileError> {
        self.aggregate(Aggregate::Max, selector)
    }

    pub fn sum(&mut self, selector: &Expr) -> Result<&mut Self, CompileError> {
        self.aggregate(Aggregate::Sum, selector)
    }

    /// First `n` rows; replaces any earlier paging.
    pub fn top(&mut self, n: u64) -> Result<&mut Self, CompileError> {
        if n == 0 {
            return Err(CompileError::InvalidPaging("top(0) selects nothing".to_string()));
        }
        self.state.paging = Some(Paging::Top(n));
        Ok(self)
    }

    /// Page `page` (1-based) of `size` rows; replaces any earlier paging.
    pub fn range(&mut self, page: u64, size: u64) -> Result<&mut Self, CompileError> {
        if page < 1 || size < 1 {
            return Err(CompileError::InvalidPaging(format!(
                "page {} of size {} (both start at 1)",
                page, size
            )));
        }
        let offset = (page - 1).checked_mul(size).ok_or_else(|| {
            CompileError::InvalidPaging(format!(
                "page {} of size {} overflows the row offset",
                page, size
            ))
        })?;
        self.state.paging = Some(Paging::Page { offset, size });
        Ok(self)
    }

    pub fn paging(&self) -> Option<Paging> {
        self.state.paging
    }

    pub fn parameters(&self) -> &ParameterBag {
        &self.state.params
    }

    pub fn into_parameters(self) -> ParameterBag {
        self.state.params
    }

    pub fn sql(&self) -> Result<String, CompileError> {
        let state = &self.state;
        let table = quote_identifier(self.table_name());
        let where_clause = state
            .where_clause
            .as_ref()
            .map(|w| format!(" WHERE {}", w))
            .unwrap_or_default();

        let sql = match state.kind {
            StatementKind::Select => {
                let fields = state.projection.as_deref().unwrap_or("*");
                let mut sql = format!("SELECT {} FROM {}{}", fields, table, where_clause);
                if !state.order_by.is_empty() {
                    sql.push_str(" ORDER BY ");
                    sql.push_str(&state.order_by.join(","));
                }
                if let Some(paging) = state.paging {
                    sql.push_str(&paging.limit_clause());
                }
                sql
            }
            StatementKind::Count => format!("SELECT COUNT(*) FROM {}{}", table, where_clause),
            StatementKind::Insert => {
                if state.insert_columns.is_empty() {
                    return Err(CompileError::EmptyStatement("INSERT"));
                }
                format!(
                    "INSERT INTO {} ({}) VALUES ({})",
                    table,
                    state.insert_columns.join(","),
                    state.insert_values.join(",")
                )
            }
            StatementKind::Update => {
                if state.set_items.is_empty() {
                    return Err(CompileError::EmptyStatement("UPDATE"));
                }
                format!(
                    "UPDATE {} SET {}{}",
                    table,
                    state.set_items.join(","),
                    where_clause
                )
            }
            StatementKind::Delete => format!("DELETE FROM {}{}", table, where_clause),
        };

        if self.log_statements {
            log::debug!("{} ({} parameters)", sql, state.params.len());
        }
        Ok(sql)
    }
}
