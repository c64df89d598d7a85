use super::metadata::EntityDescriptor;
use crate::expr::{Value, ValueError};
use crate::query::row::{Row, RowError};

/// A type that maps to one table (or one of a set of shard tables).
///
/// Implementations declare their storage layout once through [`Entity::describe`];
/// the resolved metadata is cached per type. Member names passed to
/// [`Entity::assign`] and returned by [`Entity::values`] are the declared member
/// names, not column names.
pub trait Entity: Sized + Send + Sync + 'static {
    fn describe() -> EntityDescriptor;

    /// Current member values, keyed by member name.
    fn values(&self) -> Vec<(&'static str, Value)>;

    /// Write one member, used to store the generated identity after an insert.
    fn assign(&mut self, member: &str, value: Value) -> Result<(), ValueError>;

    fn from_row(row: &Row) -> Result<Self, RowError>;
}
