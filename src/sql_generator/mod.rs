//! MySQL statement generation from expression trees
//!
//! The compilers in this module turn [`Expr`](crate::expr::Expr) trees into SQL
//! fragments for one entity:
//!
//! - [`predicate`]: WHERE conditions
//! - [`assignment`]: UPDATE SET lists and INSERT column/value lists
//! - [`ordering`]: ORDER BY items
//! - [`projection`]: field lists and single-column aggregates
//!
//! [`statement::SqlBuilder`] assembles the fragments into a full statement and owns
//! the statement's [`params::ParameterBag`]. [`literal`] renders multi-row bulk
//! statements with inline values.

pub mod assignment;
pub mod common;
pub mod errors;
pub mod literal;
pub mod ordering;
pub mod params;
pub mod predicate;
pub mod projection;
pub mod request;
pub mod statement;

pub use errors::{CompileError, CompilerRole};
pub use ordering::SortDirection;
pub use params::ParameterBag;
pub use projection::Aggregate;
pub use request::{RenderedStatement, StatementRequest};
pub use statement::{Paging, SqlBuilder, StatementKind};
