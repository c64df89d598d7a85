//! SQL execution interface
//!
//! The crate renders statements; running them is up to the caller's driver.
//! Parameters arrive as a [`ParameterBag`] whose names already carry the dialect
//! prefix.

use super::row::Row;
use crate::expr::Value;
use crate::sql_generator::ParameterBag;
use async_trait::async_trait;
use std::error::Error as StdError;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("{message}")]
pub struct ExecutorError {
    message: String,
    #[source]
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl ExecutorError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        message: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Runs rendered statements, typically over a connection pool.
#[async_trait]
pub trait SqlExecutor: Send + Sync {
    /// Run a write statement and return the affected row count.
    async fn execute(&self, sql: &str, params: &ParameterBag) -> Result<u64, ExecutorError>;

    async fn query(&self, sql: &str, params: &ParameterBag) -> Result<Vec<Row>, ExecutorError>;

    /// First column of the first row, `None` when there is no row.
    async fn query_scalar(
        &self,
        sql: &str,
        params: &ParameterBag,
    ) -> Result<Option<Value>, ExecutorError>;

    /// A dedicated connection, for statements that must share session state.
    async fn connect(&self) -> Result<Box<dyn Connection>, ExecutorError>;
}

/// One physical connection; `LAST_INSERT_ID()` and friends are scoped to it.
#[async_trait]
pub trait Connection: Send {
    async fn execute(&mut self, sql: &str, params: &ParameterBag) -> Result<u64, ExecutorError>;

    async fn query_scalar(
        &mut self,
        sql: &str,
        params: &ParameterBag,
    ) -> Result<Option<Value>, ExecutorError>;
}
