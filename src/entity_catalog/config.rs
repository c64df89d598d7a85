//! YAML entity catalogs
//!
//! Lets the CLI (and any caller without Rust entity types) describe entities in a
//! file. Every definition goes through the same validation as an
//! [`EntityDescriptor`]:
//!
//! ```yaml
//! entities:
//!   - name: User
//!     table: user
//!     columns:
//!       - { member: Id, kind: int, key: true }
//!       - { member: UserName, kind: text }
//!   - name: DeviceLog
//!     table: [device_log, device_log_archive]
//!     columns:
//!       - { member: Id, kind: int, key: true }
//! ```

use super::errors::MetadataError;
use super::metadata::{ColumnDef, EntityDescriptor, EntityMetadata};
use crate::expr::ValueKind;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// One table, or an ordered list of shard tables.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum TableSpec {
    Single(String),
    Candidates(Vec<String>),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ColumnDefinition {
    pub member: String,
    pub kind: ValueKind,
    #[serde(default)]
    pub key: bool,
    #[serde(default)]
    pub computed: bool,
    #[serde(default)]
    pub read_only: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EntityDefinition {
    pub name: String,
    #[serde(default)]
    pub table: Option<TableSpec>,
    #[serde(default)]
    pub columns: Vec<ColumnDefinition>,
}

impl EntityDefinition {
    pub fn to_descriptor(&self) -> EntityDescriptor {
        let mut descriptor = EntityDescriptor::new(&self.name);
        descriptor = match &self.table {
            Some(TableSpec::Single(name)) => descriptor.table(name),
            Some(TableSpec::Candidates(names)) => descriptor.tables(names.iter().cloned()),
            None => descriptor,
        };
        for column in &self.columns {
            let mut def = ColumnDef::new(&column.member, column.kind);
            if column.key {
                def = def.key();
            }
            if column.computed {
                def = def.computed();
            }
            if column.read_only {
                def = def.read_only();
            }
            descriptor = descriptor.column(def);
        }
        descriptor
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogDefinition {
    pub entities: Vec<EntityDefinition>,
}

/// Resolved metadata for every entity of a catalog file, by entity name.
#[derive(Debug, Clone, Default)]
pub struct EntityCatalog {
    entities: HashMap<String, Arc<EntityMetadata>>,
}

impl EntityCatalog {
    /// Load an entity catalog from a YAML file
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, MetadataError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| {
            MetadataError::catalog_error_with_context(path.display().to_string(), e.to_string())
        })?;
        Self::from_yaml_str(&contents)
    }

    /// Parse and resolve an entity catalog from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, MetadataError> {
        let definition: CatalogDefinition =
            serde_yaml::from_str(yaml).map_err(|e| MetadataError::CatalogParse {
                error: e.to_string(),
            })?;
        Self::from_definition(&definition)
    }

    pub fn from_definition(definition: &CatalogDefinition) -> Result<Self, MetadataError> {
        let mut entities = HashMap::new();
        for entity in &definition.entities {
            let metadata = EntityMetadata::from_descriptor(&entity.to_descriptor())?;
            if entities
                .insert(entity.name.clone(), Arc::new(metadata))
                .is_some()
            {
                return Err(MetadataError::CatalogParse {
                    error: format!("entity `{}` is defined twice", entity.name),
                });
            }
        }
        log::info!("Loaded {} entity definitions", entities.len());
        Ok(Self { entities })
    }

    pub fn get(&self, name: &str) -> Result<Arc<EntityMetadata>, MetadataError> {
        self.entities
            .get(name)
            .cloned()
            .ok_or_else(|| MetadataError::UnknownEntity {
                name: name.to_string(),
            })
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.entities.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}
