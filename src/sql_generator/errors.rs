use crate::entity_catalog::MetadataError;
use crate::expr::ValueError;
use std::fmt;
use thiserror::Error;

/// Which compiler rejected a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompilerRole {
    Predicate,
    Update,
    Insert,
    Ordering,
    Projection,
}

impl fmt::Display for CompilerRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let role = match self {
            CompilerRole::Predicate => "WHERE",
            CompilerRole::Update => "UPDATE SET",
            CompilerRole::Insert => "INSERT",
            CompilerRole::Ordering => "ORDER BY",
            CompilerRole::Projection => "SELECT",
        };
        f.write_str(role)
    }
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CompileError {
    #[error("Unsupported expression in {role} clause: {detail}")]
    UnsupportedExpression { role: CompilerRole, detail: String },
    #[error("Left side of a comparison must be a member of the entity, found {0}")]
    NonMemberOperand(String),
    #[error("Member `{member}` is not declared on `{entity}`")]
    UnknownMember { entity: String, member: String },
    #[error("Member `{0}` is computed or read-only and cannot be written")]
    ReadOnlyMember(String),
    #[error("Cannot compare `{column}` {op} NULL (only = and <> accept NULL)")]
    NullComparison { column: String, op: String },
    #[error("Value for `{member}` does not fit its column: {source}")]
    Coercion { member: String, source: ValueError },
    #[error("Entity value has no member `{0}`")]
    MissingMemberValue(String),
    #[error("Invalid paging: {0}")]
    InvalidPaging(String),
    #[error("{0} statement has nothing to write")]
    EmptyStatement(&'static str),
    #[error("Entity `{0}` has no key column to match rows on")]
    MissingKeyColumn(String),
    #[error("Parameter {0} was bound twice in one statement")]
    ParameterCollision(String),
    #[error(transparent)]
    Metadata(#[from] MetadataError),
}

impl CompileError {
    pub fn unsupported(role: CompilerRole, detail: impl Into<String>) -> Self {
        CompileError::UnsupportedExpression {
            role,
            detail: detail.into(),
        }
    }

    /// Create an unsupported expression error with context information
    pub fn unsupported_with_context(
        role: CompilerRole,
        detail: impl Into<String>,
        context: impl Into<String>,
    ) -> Self {
        CompileError::UnsupportedExpression {
            role,
            detail: format!("{}\n  Context: {}", detail.into(), context.into()),
        }
    }
}
