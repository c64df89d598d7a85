//! Entity descriptors and resolved metadata
//!
//! A descriptor is the declarative input an entity type registers once: its table
//! (a single name, or a [`TableSet`] of shard tables) and its members with their
//! flags. [`EntityMetadata::from_descriptor`] validates it and derives everything
//! the generator needs at request time: mapped column names, the identity column
//! and the write sets.

use super::errors::MetadataError;
use super::naming::column_name;
use crate::expr::ValueKind;
use crate::sql_generator::common::quote_identifier;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

lazy_static! {
    static ref TABLE_NAME: Regex =
        Regex::new(r"^[A-Za-z_][A-Za-z0-9_$]*$").expect("table name pattern is valid");
}

/// Validate a physical table name before it is spliced between backticks.
pub fn validate_table_name(name: &str) -> Result<(), MetadataError> {
    if TABLE_NAME.is_match(name) {
        Ok(())
    } else {
        Err(MetadataError::InvalidTableName {
            name: name.to_string(),
        })
    }
}

/// An enumeration whose members name the physical tables of a sharded entity.
///
/// The order of [`TableSet::members`] is the candidate order; the first member is
/// the default table.
///
/// ```
/// use sqlcraft::entity_catalog::TableSet;
///
/// #[derive(Clone, Copy)]
/// enum LogShard { Current, Archive }
///
/// impl TableSet for LogShard {
///     fn members() -> &'static [Self] {
///         &[LogShard::Current, LogShard::Archive]
///     }
///
///     fn description(&self) -> &'static str {
///         match self {
///             LogShard::Current => "device_log",
///             LogShard::Archive => "device_log_archive",
///         }
///     }
/// }
/// ```
pub trait TableSet: Sized + 'static {
    fn members() -> &'static [Self];
    fn description(&self) -> &'static str;
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDef {
    member: String,
    kind: ValueKind,
    key: bool,
    computed: bool,
    read_only: bool,
}

impl ColumnDef {
    pub fn new(member: impl Into<String>, kind: ValueKind) -> Self {
        Self {
            member: member.into(),
            kind,
            key: false,
            computed: false,
            read_only: false,
        }
    }

    /// Key column; the first writable key becomes the identity column.
    pub fn key(mut self) -> Self {
        self.key = true;
        self
    }

    /// Computed or extension member, never written by INSERT/UPDATE.
    pub fn computed(mut self) -> Self {
        self.computed = true;
        self
    }

    /// Member without a setter.
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EntityDescriptor {
    name: String,
    table: Option<String>,
    table_set: Vec<String>,
    columns: Vec<ColumnDef>,
}

impl EntityDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            table: None,
            table_set: Vec::new(),
            columns: Vec::new(),
        }
    }

    /// Single physical table. Takes precedence over any table set.
    pub fn table(mut self, name: impl Into<String>) -> Self {
        self.table = Some(name.into());
        self
    }

    /// Candidate tables from an enumeration's descriptions.
    pub fn table_set<S: TableSet>(self) -> Self {
        let names = S::members().iter().map(|m| m.description().to_string());
        self.tables(names)
    }

    /// Candidate tables given directly, in order.
    pub fn tables<I, N>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        self.table_set = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn column(mut self, column: ColumnDef) -> Self {
        self.columns.push(column);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    pub member_name: String,
    pub column_name: String,
    pub kind: ValueKind,
    pub is_identity: bool,
    pub is_key: bool,
    pub is_computed: bool,
    pub writable: bool,
}

impl ColumnDescriptor {
    pub fn quoted(&self) -> String {
        quote_identifier(&self.column_name)
    }

    /// Written by instance inserts and updates.
    pub fn is_persisted(&self) -> bool {
        self.writable && !self.is_key && !self.is_computed
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityMetadata {
    pub entity_name: String,
    pub table_name_candidates: Vec<String>,
    pub columns: Vec<ColumnDescriptor>,
    identity_index: Option<usize>,
}

impl EntityMetadata {
    pub fn from_descriptor(descriptor: &EntityDescriptor) -> Result<Self, MetadataError> {
        let table_name_candidates = match &descriptor.table {
            Some(name) => vec![name.clone()],
            None => descriptor.table_set.clone(),
        };
        if table_name_candidates.is_empty() {
            return Err(MetadataError::NoTableCandidates {
                entity: descriptor.name.clone(),
            });
        }
        for name in &table_name_candidates {
            validate_table_name(name)?;
        }

        let mut seen = HashSet::new();
        let mut identity_index = None;
        let mut columns = Vec::with_capacity(descriptor.columns.len());
        for (index, def) in descriptor.columns.iter().enumerate() {
            if !seen.insert(def.member.as_str()) {
                return Err(MetadataError::DuplicateMember {
                    entity: descriptor.name.clone(),
                    member: def.member.clone(),
                });
            }
            let writable = !def.read_only;
            let is_identity = identity_index.is_none() && def.key && writable;
            if is_identity {
                identity_index = Some(index);
            }
            columns.push(ColumnDescriptor {
                member_name: def.member.clone(),
                column_name: column_name(&def.member),
                kind: def.kind,
                is_identity,
                is_key: def.key,
                is_computed: def.computed,
                writable,
            });
        }

        Ok(Self {
            entity_name: descriptor.name.clone(),
            table_name_candidates,
            columns,
            identity_index,
        })
    }

    pub fn default_table(&self) -> &str {
        &self.table_name_candidates[0]
    }

    pub fn table_candidate(&self, index: usize) -> Result<&str, MetadataError> {
        self.table_name_candidates
            .get(index)
            .map(String::as_str)
            .ok_or_else(|| MetadataError::TableIndexOutOfRange {
                entity: self.entity_name.clone(),
                index,
                count: self.table_name_candidates.len(),
            })
    }

    pub fn identity_column(&self) -> Option<&ColumnDescriptor> {
        self.identity_index.map(|i| &self.columns[i])
    }

    /// First key-flagged column, used to join rows in bulk updates.
    pub fn key_column(&self) -> Option<&ColumnDescriptor> {
        self.columns.iter().find(|c| c.is_key)
    }

    pub fn column(&self, member: &str) -> Option<&ColumnDescriptor> {
        self.columns.iter().find(|c| c.member_name == member)
    }

    /// Columns written from an entity instance, in declaration order.
    pub fn persisted_columns(&self) -> impl Iterator<Item = &ColumnDescriptor> {
        self.columns.iter().filter(|c| c.is_persisted())
    }
}
