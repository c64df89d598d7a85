//! # Entity Metadata Error Types
//!
//! Errors raised while turning entity descriptors (or YAML catalog entries) into
//! resolved [`EntityMetadata`](super::EntityMetadata), and while selecting one of
//! an entity's candidate tables.
//!
//! When returning catalog errors, attach where the problem was found:
//!
//! ```ignore
//! MetadataError::catalog_error_with_context(
//!     "entities.yaml",
//!     "While loading entity definitions at startup"
//! )
//! ```

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum MetadataError {
    #[error("Entity `{entity}` declares no table name (add a table or a table set)")]
    NoTableCandidates { entity: String },
    #[error("Table index {index} is out of range for `{entity}` ({count} candidate tables)")]
    TableIndexOutOfRange {
        entity: String,
        index: usize,
        count: usize,
    },
    #[error("Invalid table name '{name}' (letters, digits, `_` and `$` only)")]
    InvalidTableName { name: String },
    #[error("Member `{member}` is declared twice on `{entity}`")]
    DuplicateMember { entity: String, member: String },
    #[error("No entity named `{name}` in catalog")]
    UnknownEntity { name: String },
    #[error("Failed to read entity catalog: {error}")]
    CatalogRead { error: String },
    #[error("Failed to parse entity catalog: {error}")]
    CatalogParse { error: String },
}

impl MetadataError {
    /// Create a catalog read error with context information
    pub fn catalog_error_with_context(path: impl Into<String>, context: impl Into<String>) -> Self {
        MetadataError::CatalogRead {
            error: format!("'{}'\n  Context: {}", path.into(), context.into()),
        }
    }

    /// Create an unknown entity error with context information
    pub fn unknown_entity_with_context(name: impl Into<String>, context: impl Into<String>) -> Self {
        MetadataError::UnknownEntity {
            name: format!("{}\n  Context: {}", name.into(), context.into()),
        }
    }
}
