//! Store-level error type: widens the common core error with the
//! aggregated-failure shape `get_by_ids` needs.

use hostgraph_common::Vertex;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] hostgraph_common::Error),

    /// One or more ids failed to resolve in `get_by_ids`. Carries whatever
    /// resolved successfully alongside the `(id, error)` pairs that didn't,
    /// so the caller decides whether to proceed on partial data.
    #[error("{} of {} ids failed to resolve", errors.len(), errors.len() + vertices.len())]
    PartialFailure {
        vertices: Vec<Vertex>,
        errors: Vec<(String, hostgraph_common::Error)>,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
