//! Query-level error type: any sub-task failure fails the whole query.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] hostgraph_common::Error),

    #[error(transparent)]
    Store(#[from] hostgraph_store::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
