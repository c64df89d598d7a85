//! Fluent query façade
//!
//! A [`Query`] accumulates one statement against one entity type and hands it to a
//! [`SqlExecutor`] when a terminal method runs:
//!
//! ```ignore
//! let adults = Query::<User>::new(&executor)?
//!     .filter(User::AGE.ge(18))
//!     .order_by_desc(User::CREATED_AT)
//!     .range(2, 25)
//!     .to_list()
//!     .await?;
//! ```
//!
//! Chain methods compile their tree right away. The first failure is kept and
//! returned by the next terminal (or [`Query::sql`]); nothing reaches the executor
//! after a failure.

pub mod errors;
pub mod executor;
pub mod row;

pub use errors::QueryError;
pub use executor::{Connection, ExecutorError, SqlExecutor};
pub use row::{Row, RowError};

use crate::config::DialectConfig;
use crate::entity_catalog::naming::column_name;
use crate::entity_catalog::{resolve, Entity, EntityMetadata};
use crate::expr::value::optional;
use crate::expr::{Assignments, Field, Predicate, Projection, Value, ValueError};
use crate::sql_generator::literal::{bulk_insert_sql, bulk_update_sql, RowValues};
use crate::sql_generator::{CompileError, ParameterBag, SqlBuilder, StatementKind};
use std::marker::PhantomData;
use std::sync::Arc;

pub struct Query<'a, T: Entity> {
    executor: &'a dyn SqlExecutor,
    config: Arc<DialectConfig>,
    builder: SqlBuilder,
    error: Option<CompileError>,
    _entity: PhantomData<fn() -> T>,
}

impl<'a, T: Entity> Query<'a, T> {
    pub fn new(executor: &'a dyn SqlExecutor) -> Result<Self, QueryError> {
        Self::with_config(executor, Arc::new(DialectConfig::default()))
    }

    pub fn with_config(
        executor: &'a dyn SqlExecutor,
        config: Arc<DialectConfig>,
    ) -> Result<Self, QueryError> {
        let metadata = resolve::<T>()?;
        let builder = SqlBuilder::with_config(metadata, &config);
        Ok(Self {
            executor,
            config,
            builder,
            error: None,
            _entity: PhantomData,
        })
    }

    fn apply<F>(mut self, step: F) -> Self
    where
        F: FnOnce(&mut SqlBuilder) -> Result<(), CompileError>,
    {
        if self.error.is_none() {
            if let Err(e) = step(&mut self.builder) {
                log::debug!("Deferring query error: {}", e);
                self.error = Some(e);
            }
        }
        self
    }

    fn checked(&mut self) -> Result<(), QueryError> {
        match self.error.take() {
            Some(e) => Err(e.into()),
            None => Ok(()),
        }
    }

    fn metadata(&self) -> Arc<EntityMetadata> {
        Arc::clone(self.builder.metadata())
    }

    pub fn set_table(self, name: &str) -> Self {
        self.apply(|b| b.set_table(name).map(drop))
    }

    pub fn set_table_index(self, index: usize) -> Self {
        self.apply(|b| b.set_table_index(index).map(drop))
    }

    pub fn table_name(&self) -> &str {
        self.builder.table_name()
    }

    /// AND a condition onto the WHERE clause.
    pub fn filter(self, predicate: Predicate<T>) -> Self {
        self.apply(|b| b.where_(predicate.expr()).map(drop))
    }

    /// Filter and keep only the first row.
    pub fn find(self, predicate: Predicate<T>) -> Self {
        self.filter(predicate).top(1)
    }

    pub fn order_by<V>(self, field: Field<T, V>) -> Self {
        self.apply(|b| b.order_by(&field.expr()).map(drop))
    }

    pub fn order_by_desc<V>(self, field: Field<T, V>) -> Self {
        self.apply(|b| b.order_by_desc(&field.expr()).map(drop))
    }

    pub fn select(self, projection: impl Into<Projection<T>>) -> Self {
        let expr = projection.into().into_expr();
        self.apply(|b| b.select(&expr).map(drop))
    }

    pub fn top(self, n: u64) -> Self {
        self.apply(|b| b.top(n).map(drop))
    }

    /// Page `page` (1-based) of `size` rows.
    pub fn range(self, page: u64, size: u64) -> Self {
        self.apply(|b| b.range(page, size).map(drop))
    }

    /// Current statement text.
    pub fn sql(&self) -> Result<String, QueryError> {
        if let Some(e) = &self.error {
            return Err(e.clone().into());
        }
        Ok(self.builder.sql()?)
    }

    pub fn parameters(&self) -> &ParameterBag {
        self.builder.parameters()
    }

    pub fn kind(&self) -> StatementKind {
        self.builder.kind()
    }

    pub async fn to_list(mut self) -> Result<Vec<T>, QueryError> {
        self.checked()?;
        self.builder.set_kind(StatementKind::Select);
        let sql = self.builder.sql()?;
        let rows = self.executor.query(&sql, self.builder.parameters()).await?;
        rows.iter()
            .map(|row| T::from_row(row).map_err(QueryError::from))
            .collect()
    }

    /// First row of the current page when one is set, otherwise `LIMIT 1`.
    pub async fn first(self) -> Result<Option<T>, QueryError> {
        let query = match self.builder.paging() {
            Some(_) => self,
            None => self.top(1),
        };
        Ok(query.to_list().await?.into_iter().next())
    }

    pub async fn count(mut self) -> Result<u64, QueryError> {
        self.checked()?;
        self.builder.count();
        let sql = self.builder.sql()?;
        let value = self
            .executor
            .query_scalar(&sql, self.builder.parameters())
            .await?;
        match value {
            None | Some(Value::Null) => Ok(0),
            Some(v) => Ok(u64::try_from(i64::try_from(v)?).unwrap_or(0)),
        }
    }

    async fn aggregate_scalar<V>(mut self) -> Result<Option<V>, QueryError>
    where
        V: TryFrom<Value, Error = ValueError>,
    {
        self.checked()?;
        self.builder.set_kind(StatementKind::Select);
        let sql = self.builder.sql()?;
        let value = self
            .executor
            .query_scalar(&sql, self.builder.parameters())
            .await?;
        Ok(optional(value.unwrap_or(Value::Null))?)
    }

    /// `MAX(member)`; `None` for an empty match.
    pub async fn max<V>(self, field: Field<T, V>) -> Result<Option<V>, QueryError>
    where
        V: TryFrom<Value, Error = ValueError>,
    {
        self.apply(|b| b.max(&field.expr()).map(drop))
            .aggregate_scalar()
            .await
    }

    /// `SUM(member)`; `None` for an empty match.
    pub async fn sum<V>(self, field: Field<T, V>) -> Result<Option<V>, QueryError>
    where
        V: TryFrom<Value, Error = ValueError>,
    {
        self.apply(|b| b.sum(&field.expr()).map(drop))
            .aggregate_scalar()
            .await
    }

    /// `DISTINCT(member)` over the matching rows, decoded column by column.
    pub async fn distinct<V>(self, field: Field<T, V>) -> Result<Vec<V>, QueryError>
    where
        V: TryFrom<Value, Error = ValueError>,
    {
        let mut this = self.apply(|b| b.distinct(&field.expr()).map(drop));
        this.checked()?;
        this.builder.set_kind(StatementKind::Select);
        let sql = this.builder.sql()?;
        let rows = this.executor.query(&sql, this.builder.parameters()).await?;
        let column = column_name(field.name());
        rows.iter()
            .map(|row| row.get_as::<V>(&column).map_err(QueryError::from))
            .collect()
    }

    async fn execute_write(mut self) -> Result<u64, QueryError> {
        self.checked()?;
        let sql = self.builder.sql()?;
        Ok(self.executor.execute(&sql, self.builder.parameters()).await?)
    }

    /// Insert an entity value.
    ///
    /// With an identity column the statement and the identity query run on one
    /// connection and the generated id is written back into `entity`; the result is
    /// true only if exactly one row was inserted and an id came back. Without one,
    /// the result is whether any row was inserted.
    pub async fn insert(mut self, entity: &mut T) -> Result<bool, QueryError> {
        let values = entity.values();
        self = self.apply(|b| b.insert_values(&values).map(drop));
        self.checked()?;
        let sql = self.builder.sql()?;

        let metadata = self.metadata();
        let Some(identity) = metadata.identity_column() else {
            let affected = self.executor.execute(&sql, self.builder.parameters()).await?;
            return Ok(affected > 0);
        };

        let mut connection = self.executor.connect().await?;
        let affected = connection.execute(&sql, self.builder.parameters()).await?;
        let no_params = ParameterBag::new(self.config.parameter_prefix.clone());
        let id = connection
            .query_scalar(&self.config.identity_query, &no_params)
            .await?;

        let id = match id {
            Some(id) if !id.is_null() && affected == 1 => id,
            other => {
                log::warn!(
                    "Insert into `{}` affected {} rows, identity {:?}",
                    self.builder.table_name(),
                    affected,
                    other
                );
                return Ok(false);
            }
        };
        id.coerce(identity.kind)
            .and_then(|id| entity.assign(&identity.member_name, id))
            .map_err(|source| QueryError::Identity {
                member: identity.member_name.clone(),
                source,
            })?;
        Ok(true)
    }

    /// Insert from a member initializer; returns the affected row count.
    pub async fn insert_with(self, assignments: Assignments<T>) -> Result<u64, QueryError> {
        let expr = assignments.into_expr();
        self.apply(|b| b.insert(&expr).map(drop))
            .execute_write()
            .await
    }

    pub async fn update(
        self,
        predicate: Predicate<T>,
        assignments: Assignments<T>,
    ) -> Result<u64, QueryError> {
        let expr = assignments.into_expr();
        self.apply(|b| b.update(&expr).map(drop))
            .filter(predicate)
            .execute_write()
            .await
    }

    /// SET every persisted column from `entity` on the matching rows.
    pub async fn update_entity(self, predicate: Predicate<T>, entity: &T) -> Result<u64, QueryError> {
        let values = entity.values();
        self.apply(|b| b.update_values(&values).map(drop))
            .filter(predicate)
            .execute_write()
            .await
    }

    pub async fn delete(self, predicate: Predicate<T>) -> Result<u64, QueryError> {
        self.apply(|b| {
            b.delete();
            Ok(())
        })
        .filter(predicate)
        .execute_write()
        .await
    }

    /// Insert many rows in one statement with inline literals. Trusted data only.
    pub async fn bulk_insert(self, entities: &[T]) -> Result<u64, QueryError> {
        self.bulk(entities, bulk_insert_sql).await
    }

    /// Update many rows by key in one statement with inline literals. Trusted data
    /// only.
    pub async fn bulk_update(self, entities: &[T]) -> Result<u64, QueryError> {
        self.bulk(entities, bulk_update_sql).await
    }

    async fn bulk<F>(mut self, entities: &[T], render: F) -> Result<u64, QueryError>
    where
        F: FnOnce(&EntityMetadata, &str, &[RowValues<'_>]) -> Result<String, CompileError>,
    {
        self.checked()?;
        if entities.is_empty() {
            return Ok(0);
        }
        let rows: Vec<RowValues<'_>> = entities.iter().map(Entity::values).collect();
        let sql = render(self.builder.metadata().as_ref(), self.builder.table_name(), &rows)?;
        log::warn!(
            "Bulk statement on `{}` with {} inline rows",
            self.builder.table_name(),
            rows.len()
        );
        if self.config.log_statements {
            log::debug!("{}", sql);
        }

        let mut connection = self.executor.connect().await?;
        let no_params = ParameterBag::new(self.config.parameter_prefix.clone());
        Ok(connection.execute(&sql, &no_params).await?)
    }
}
