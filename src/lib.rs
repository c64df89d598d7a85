//! sqlcraft - typed expression trees to parameterized MySQL
//!
//! This crate compiles predicate, assignment, sort and projection trees over an
//! entity into SQL text plus bound parameters:
//! - Entity metadata declared once per type (or loaded from YAML catalogs)
//! - Expression compilation with fail-fast errors on unsupported shapes
//! - Statement assembly for SELECT/INSERT/UPDATE/DELETE/COUNT
//! - A fluent query façade over an injected SQL executor

pub mod config;
pub mod entity_catalog;
pub mod expr;
pub mod query;
pub mod sql_generator;

pub use entity_catalog::{Entity, EntityDescriptor, EntityMetadata};
pub use query::{Query, QueryError, SqlExecutor};
pub use sql_generator::{CompileError, SqlBuilder};
