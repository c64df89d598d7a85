//! Entity metadata: which table an entity lives in and how its members map to
//! columns.

pub mod config;
pub mod entity;
pub mod errors;
pub mod metadata;
pub mod naming;
pub mod resolver;

pub use config::EntityCatalog;
pub use entity::Entity;
pub use errors::MetadataError;
pub use metadata::{
    validate_table_name, ColumnDef, ColumnDescriptor, EntityDescriptor, EntityMetadata, TableSet,
};
pub use resolver::resolve;
