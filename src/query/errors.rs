use super::executor::ExecutorError;
use super::row::RowError;
use crate::entity_catalog::MetadataError;
use crate::expr::ValueError;
use crate::sql_generator::CompileError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum QueryError {
    #[error(transparent)]
    Metadata(#[from] MetadataError),
    #[error(transparent)]
    Compile(#[from] CompileError),
    #[error(transparent)]
    Executor(#[from] ExecutorError),
    #[error(transparent)]
    Row(#[from] RowError),
    #[error("Unexpected scalar result: {0}")]
    Scalar(#[from] ValueError),
    #[error("Cannot store generated id in `{member}`: {source}")]
    Identity { member: String, source: ValueError },
}
