use crate::entity_catalog::naming::column_name;
use crate::expr::value::optional;
use crate::expr::{Value, ValueError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum RowError {
    #[error("Result row has no column `{0}`")]
    MissingColumn(String),
    #[error("Column `{column}`: {source}")]
    Value { column: String, source: ValueError },
}

/// One result row, keyed by column name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row {
    columns: HashMap<String, Value>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(column, value);
        self
    }

    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        self.columns.insert(column.into(), value.into());
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns.get(column)
    }

    pub fn columns(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.columns.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Decode a column; NULL is an error for non-optional targets.
    pub fn get_as<V>(&self, column: &str) -> Result<V, RowError>
    where
        V: TryFrom<Value, Error = ValueError>,
    {
        let value = self
            .get(column)
            .cloned()
            .ok_or_else(|| RowError::MissingColumn(column.to_string()))?;
        V::try_from(value).map_err(|source| RowError::Value {
            column: column.to_string(),
            source,
        })
    }

    /// Decode a nullable column. A missing column is still an error.
    pub fn get_optional<V>(&self, column: &str) -> Result<Option<V>, RowError>
    where
        V: TryFrom<Value, Error = ValueError>,
    {
        let value = self
            .get(column)
            .cloned()
            .ok_or_else(|| RowError::MissingColumn(column.to_string()))?;
        optional(value).map_err(|source| RowError::Value {
            column: column.to_string(),
            source,
        })
    }

    /// [`Row::get_as`] addressed by member name.
    pub fn member<V>(&self, member: &str) -> Result<V, RowError>
    where
        V: TryFrom<Value, Error = ValueError>,
    {
        self.get_as(&column_name(member))
    }

    /// [`Row::get_optional`] addressed by member name.
    pub fn optional_member<V>(&self, member: &str) -> Result<Option<V>, RowError>
    where
        V: TryFrom<Value, Error = ValueError>,
    {
        self.get_optional(&column_name(member))
    }
}

impl FromIterator<(String, Value)> for Row {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            columns: iter.into_iter().collect(),
        }
    }
}
